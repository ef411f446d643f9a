//! Monitoring loop lifecycle

use crate::config::Config;
use crate::errors::{MonitorError, Result};
use crate::models::{MonitorState, MonitorStatus, ProbeRecord, StartOutcome, StopOutcome};
use crate::services::prober::{HttpProber, Probe};
use crate::store::MetricsStore;

use chrono::{Local, NaiveDateTime, SubsecRound};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::runtime::Handle;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Owns the probe, the metrics series and the state machine
/// `Idle -> Running -> Stopped -> Running -> ...`.
///
/// At most one loop is ever started per `Running` state; `start` while
/// running is a no-op. Stopping is cooperative: the flag is only observed
/// between iterations, so an in-flight probe still completes and is recorded.
pub struct MonitorController {
    config: Config,
    probe: Arc<dyn Probe>,
    store: Arc<MetricsStore>,
    lifecycle: Arc<Mutex<Lifecycle>>,
    runtime: Handle,
}

#[derive(Debug)]
struct Lifecycle {
    state: MonitorState,
    current: Option<Run>,
}

#[derive(Debug, Clone)]
struct Run {
    id: Uuid,
    started_at: NaiveDateTime,
    started: Instant,
    cancelled: Arc<AtomicBool>,
}

impl MonitorController {
    /// Build a controller probing `config.target_url` over HTTP.
    ///
    /// Must be called from within a tokio runtime; runs are spawned on it.
    pub fn new(config: Config) -> Result<Self> {
        let prober = HttpProber::from_config(&config)?;
        Self::with_probe(config, Arc::new(prober))
    }

    pub fn with_probe(config: Config, probe: Arc<dyn Probe>) -> Result<Self> {
        config.validate().map_err(MonitorError::Config)?;

        let runtime = Handle::try_current().map_err(|e| {
            MonitorError::Runtime(format!("monitor must be created inside a tokio runtime: {}", e))
        })?;

        Ok(Self {
            config,
            probe,
            store: Arc::new(MetricsStore::new()),
            lifecycle: Arc::new(Mutex::new(Lifecycle {
                state: MonitorState::Idle,
                current: None,
            })),
            runtime,
        })
    }

    /// Begin a new run unless one is already active.
    ///
    /// Previously recorded probes are kept; the new run appends to them.
    pub async fn start(&self) -> StartOutcome {
        let mut lifecycle = self.lifecycle.lock().await;

        if lifecycle.state == MonitorState::Running {
            if let Some(run) = &lifecycle.current {
                debug!("Start requested while run {} is active, ignoring", run.id);
                return StartOutcome::AlreadyRunning { run_id: run.id };
            }
        }

        let run = Run {
            id: Uuid::new_v4(),
            started_at: Local::now().naive_local().trunc_subsecs(0),
            started: Instant::now(),
            cancelled: Arc::new(AtomicBool::new(false)),
        };
        let run_id = run.id;

        lifecycle.state = MonitorState::Running;
        lifecycle.current = Some(run.clone());

        let run_loop = RunLoop {
            run,
            config: self.config.clone(),
            probe: Arc::clone(&self.probe),
            store: Arc::clone(&self.store),
            lifecycle: Arc::clone(&self.lifecycle),
        };
        self.runtime.spawn(run_loop.execute());

        info!(
            "Started monitoring run {} against {} (interval {}ms, max {}s)",
            run_id,
            self.config.target_url,
            self.config.poll_interval.as_millis(),
            self.config.max_run_duration.as_secs()
        );

        StartOutcome::Started { run_id }
    }

    /// Ask the active run to stop at its next iteration boundary
    pub async fn stop(&self) -> StopOutcome {
        let mut lifecycle = self.lifecycle.lock().await;

        if lifecycle.state != MonitorState::Running {
            debug!("Stop requested while {}, nothing to do", lifecycle.state);
            return StopOutcome::NotRunning;
        }

        lifecycle.state = MonitorState::Stopped;
        match &lifecycle.current {
            Some(run) => {
                run.cancelled.store(true, Ordering::Release);
                info!("Stop requested for monitoring run {}", run.id);
                StopOutcome::Stopped { run_id: run.id }
            }
            None => StopOutcome::NotRunning,
        }
    }

    pub async fn state(&self) -> MonitorState {
        self.lifecycle.lock().await.state
    }

    pub async fn status(&self) -> MonitorStatus {
        let (state, run) = {
            let lifecycle = self.lifecycle.lock().await;
            (lifecycle.state, lifecycle.current.clone())
        };

        MonitorStatus {
            state,
            run_id: run.as_ref().map(|r| r.id),
            run_started_at: run.as_ref().map(|r| r.started_at),
            elapsed_seconds: run
                .as_ref()
                .filter(|_| state == MonitorState::Running)
                .map(|r| r.started.elapsed().as_secs()),
            target_url: self.config.target_url.clone(),
            poll_interval_seconds: self.config.poll_interval.as_secs_f64(),
            probe_timeout_seconds: self.config.probe_timeout.as_secs_f64(),
            max_run_duration_seconds: self.config.max_run_duration.as_secs(),
            records: self.store.len().await,
        }
    }

    pub fn store(&self) -> Arc<MetricsStore> {
        Arc::clone(&self.store)
    }

    pub async fn snapshot(&self) -> Arc<Vec<ProbeRecord>> {
        self.store.snapshot().await
    }
}

/// The background unit of work for one run
struct RunLoop {
    run: Run,
    config: Config,
    probe: Arc<dyn Probe>,
    store: Arc<MetricsStore>,
    lifecycle: Arc<Mutex<Lifecycle>>,
}

impl RunLoop {
    #[instrument(skip(self), fields(run_id = %self.run.id))]
    async fn execute(self) {
        let mut probes = 0u64;

        loop {
            if self.run.cancelled.load(Ordering::Acquire) {
                info!("Monitoring run {} stopped after {} probes", self.run.id, probes);
                break;
            }

            if self.run.started.elapsed() >= self.config.max_run_duration {
                info!(
                    "Monitoring run {} reached its {}s limit after {} probes",
                    self.run.id,
                    self.config.max_run_duration.as_secs(),
                    probes
                );
                self.finish().await;
                break;
            }

            let record = self.probe.probe().await;
            self.store.append(record).await;
            probes += 1;

            sleep(self.config.poll_interval).await;
        }
    }

    /// Move the controller to `Stopped`, unless a newer run has taken over
    async fn finish(&self) {
        let mut lifecycle = self.lifecycle.lock().await;
        let is_current = lifecycle
            .current
            .as_ref()
            .is_some_and(|run| run.id == self.run.id);

        if is_current && lifecycle.state == MonitorState::Running {
            lifecycle.state = MonitorState::Stopped;
        }
    }
}
