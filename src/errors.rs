//! Error types for the uptime monitor

use std::fmt;

pub type Result<T> = std::result::Result<T, MonitorError>;

/// Errors surfaced by the monitor outside of probing.
///
/// Transport failures against the probed target are never represented here:
/// they are recorded as failed [`ProbeRecord`](crate::models::ProbeRecord)s.
#[derive(Debug)]
pub enum MonitorError {
    /// Invalid monitor configuration
    Config(String),

    /// HTTP client could not be built
    Http(reqwest::Error),

    /// IO operation failed
    Io(std::io::Error),

    /// No async runtime available to drive the monitoring loop
    Runtime(String),
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorError::Config(msg) => write!(f, "Configuration error: {}", msg),
            MonitorError::Http(err) => write!(f, "HTTP error: {}", err),
            MonitorError::Io(err) => write!(f, "IO error: {}", err),
            MonitorError::Runtime(msg) => write!(f, "Runtime error: {}", msg),
        }
    }
}

impl std::error::Error for MonitorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MonitorError::Http(err) => Some(err),
            MonitorError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MonitorError {
    fn from(err: std::io::Error) -> Self {
        MonitorError::Io(err)
    }
}

impl From<reqwest::Error> for MonitorError {
    fn from(err: reqwest::Error) -> Self {
        MonitorError::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = MonitorError::Config("poll_interval must be greater than 0".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: poll_interval must be greater than 0"
        );
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken");
        let err: MonitorError = io.into();
        assert!(matches!(err, MonitorError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
