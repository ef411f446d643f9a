use chrono::{Local, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Classification of a single probe
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProbeOutcome {
    Success,
    Failure,
}

impl std::fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeOutcome::Success => write!(f, "success"),
            ProbeOutcome::Failure => write!(f, "failure"),
        }
    }
}

/// One observation of the target.
///
/// `status_code` and `response_time_seconds` are present exactly when the
/// target answered before the probe timed out. `outcome` is `Success` only
/// when that answer carried the healthy status code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbeRecord {
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    #[serde(rename = "status")]
    pub outcome: ProbeOutcome,
    pub status_code: Option<u16>,
    #[serde(rename = "response_time")]
    pub response_time_seconds: Option<f64>,
}

impl ProbeRecord {
    /// Record for a probe that received a response
    pub fn response(status_code: u16, elapsed: Duration, healthy_status_code: u16) -> Self {
        let outcome = if status_code == healthy_status_code {
            ProbeOutcome::Success
        } else {
            ProbeOutcome::Failure
        };

        Self {
            timestamp: now(),
            outcome,
            status_code: Some(status_code),
            response_time_seconds: Some(round_millis(elapsed)),
        }
    }

    /// Record for a probe that never got a response (timeout, refused, DNS...)
    pub fn transport_failure() -> Self {
        Self {
            timestamp: now(),
            outcome: ProbeOutcome::Failure,
            status_code: None,
            response_time_seconds: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == ProbeOutcome::Success
    }
}

/// Local wall-clock time truncated to whole seconds
fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

fn round_millis(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 1000.0).round() / 1000.0
}

mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(timestamp: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&timestamp.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
