//! In-memory storage for probe records

use crate::models::{MetricsSummary, ProbeRecord};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Append-only, chronologically ordered series of probe records.
///
/// Records live behind an `Arc` that is swapped copy-on-write: a snapshot is
/// just a clone of the current `Arc`, and an append only copies the series
/// when some reader still holds the previous snapshot.
#[derive(Debug, Default)]
pub struct MetricsStore {
    records: RwLock<Arc<Vec<ProbeRecord>>>,
}

impl MetricsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record at the end of the series
    pub async fn append(&self, record: ProbeRecord) {
        let mut records = self.records.write().await;
        Arc::make_mut(&mut *records).push(record);
        debug!("Appended probe record, series length: {}", records.len());
    }

    /// Immutable view of every record appended so far
    pub async fn snapshot(&self) -> Arc<Vec<ProbeRecord>> {
        Arc::clone(&*self.records.read().await)
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Success/failure counts and response time statistics
    pub async fn summary(&self) -> MetricsSummary {
        summarize(&self.snapshot().await)
    }
}

fn summarize(records: &[ProbeRecord]) -> MetricsSummary {
    let total = records.len();
    if total == 0 {
        return MetricsSummary::default();
    }

    let successes = records.iter().filter(|r| r.is_success()).count();
    let times: Vec<f64> = records.iter().filter_map(|r| r.response_time_seconds).collect();

    let (avg, min, max) = if times.is_empty() {
        (None, None, None)
    } else {
        let sum: f64 = times.iter().sum();
        let min = times.iter().copied().fold(f64::INFINITY, f64::min);
        let max = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (Some(sum / times.len() as f64), Some(min), Some(max))
    };

    MetricsSummary {
        total,
        successes,
        failures: total - successes,
        success_rate: (successes as f64 / total as f64) * 100.0,
        avg_response_time: avg,
        min_response_time: min,
        max_response_time: max,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProbeOutcome;
    use std::time::Duration;

    fn ok(ms: u64) -> ProbeRecord {
        ProbeRecord::response(200, Duration::from_millis(ms), 200)
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = MetricsStore::new();
        assert!(store.is_empty().await);
        assert!(store.snapshot().await.is_empty());
        assert_eq!(store.summary().await, MetricsSummary::default());
    }

    #[tokio::test]
    async fn test_append_preserves_order() {
        let store = MetricsStore::new();
        store.append(ok(10)).await;
        store.append(ProbeRecord::transport_failure()).await;
        store.append(ok(30)).await;

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].response_time_seconds, Some(0.01));
        assert_eq!(snapshot[1].outcome, ProbeOutcome::Failure);
        assert_eq!(snapshot[2].response_time_seconds, Some(0.03));
    }

    #[tokio::test]
    async fn test_snapshot_is_not_affected_by_later_appends() {
        let store = MetricsStore::new();
        store.append(ok(10)).await;

        let before = store.snapshot().await;
        store.append(ok(20)).await;
        store.append(ok(30)).await;

        assert_eq!(before.len(), 1);
        assert_eq!(store.snapshot().await.len(), 3);
    }

    #[tokio::test]
    async fn test_reads_do_not_mutate() {
        let store = MetricsStore::new();
        store.append(ok(10)).await;

        for _ in 0..3 {
            assert_eq!(store.snapshot().await.len(), 1);
            assert_eq!(store.summary().await.total, 1);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writers_and_readers() {
        let store = Arc::new(MetricsStore::new());

        let mut writers = Vec::new();
        for _ in 0..4 {
            let store = Arc::clone(&store);
            writers.push(tokio::spawn(async move {
                for i in 0..50 {
                    store.append(ok(i)).await;
                }
            }));
        }

        let reader = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                let mut last = 0;
                for _ in 0..100 {
                    let len = store.snapshot().await.len();
                    assert!(len >= last, "snapshot length went backwards");
                    last = len;
                    tokio::task::yield_now().await;
                }
            })
        };

        for writer in writers {
            writer.await.unwrap();
        }
        reader.await.unwrap();

        assert_eq!(store.len().await, 200);
    }

    #[tokio::test]
    async fn test_summary() {
        let store = MetricsStore::new();
        store.append(ok(100)).await;
        store.append(ok(300)).await;
        store.append(ProbeRecord::response(503, Duration::from_millis(200), 200)).await;
        store.append(ProbeRecord::transport_failure()).await;

        let summary = store.summary().await;
        assert_eq!(summary.total, 4);
        assert_eq!(summary.successes, 2);
        assert_eq!(summary.failures, 2);
        assert_eq!(summary.success_rate, 50.0);
        assert_eq!(summary.min_response_time, Some(0.1));
        assert_eq!(summary.max_response_time, Some(0.3));
        let avg = summary.avg_response_time.unwrap();
        assert!((avg - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_summary_without_any_response() {
        let summary = summarize(&[ProbeRecord::transport_failure()]);
        assert_eq!(summary.total, 1);
        assert_eq!(summary.failures, 1);
        assert_eq!(summary.success_rate, 0.0);
        assert!(summary.avg_response_time.is_none());
    }
}
