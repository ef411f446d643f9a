//! HTTP reachability probe

use crate::config::Config;
use crate::errors::{MonitorError, Result};
use crate::models::ProbeRecord;
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, warn};

/// A single reachability check, executed once per loop iteration
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self) -> ProbeRecord;
}

/// Probes the configured target with one GET request
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
    target: Url,
    timeout: Duration,
    healthy_status_code: u16,
}

impl HttpProber {
    pub fn new(target: Url, probe_timeout: Duration, healthy_status_code: u16) -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("uptime-monitor/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(MonitorError::Http)?;

        Ok(Self {
            client,
            target,
            timeout: probe_timeout,
            healthy_status_code,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let target = config.target().map_err(MonitorError::Config)?;
        Self::new(target, config.probe_timeout, config.healthy_status_code)
    }

    /// Issue one GET against `target` and download the body, all bounded by
    /// `probe_timeout`.
    ///
    /// The response time covers the full body. Any transport error (timeout,
    /// refused connection, DNS, broken body...) yields a failed record without
    /// status code or response time. There are no retries.
    pub async fn probe_url(&self, target: &Url, probe_timeout: Duration) -> ProbeRecord {
        let start_time = Instant::now();

        let exchange = async {
            let response = self
                .client
                .get(target.clone())
                .timeout(probe_timeout)
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, body.len()))
        };

        match timeout(probe_timeout, exchange).await {
            Ok(Ok((status, body_len))) => {
                let elapsed = start_time.elapsed();
                debug!(
                    "Probe of {} answered {} with {} bytes in {}ms",
                    target,
                    status,
                    body_len,
                    elapsed.as_millis()
                );
                if status != self.healthy_status_code {
                    warn!(
                        "Target {} returned status {} (expected {})",
                        target, status, self.healthy_status_code
                    );
                }
                ProbeRecord::response(status, elapsed, self.healthy_status_code)
            }
            Ok(Err(e)) => {
                warn!("Failed to reach target {}: {}", target, e);
                ProbeRecord::transport_failure()
            }
            Err(_) => {
                warn!(
                    "Probe of {} timed out after {}ms",
                    target,
                    probe_timeout.as_millis()
                );
                ProbeRecord::transport_failure()
            }
        }
    }
}

#[async_trait]
impl Probe for HttpProber {
    async fn probe(&self) -> ProbeRecord {
        self.probe_url(&self.target, self.timeout).await
    }
}
