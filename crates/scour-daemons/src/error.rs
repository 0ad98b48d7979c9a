//! Error types for the Scour daemons

use std::fmt;

#[derive(Debug)]
pub enum DaemonError {
    Database(Box<sqlx::Error>),
    Config(String),
    Signal(std::io::Error),
}

impl fmt::Display for DaemonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaemonError::Database(err) => write!(f, "Database error: {}", err),
            DaemonError::Config(msg) => write!(f, "Configuration error: {}", msg),
            DaemonError::Signal(err) => write!(f, "Signal handler error: {}", err),
        }
    }
}

impl std::error::Error for DaemonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DaemonError::Database(err) => Some(err.as_ref()),
            DaemonError::Signal(err) => Some(err),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for DaemonError {
    fn from(err: sqlx::Error) -> Self {
        DaemonError::Database(Box::new(err))
    }
}

impl From<tracing_subscriber::filter::ParseError> for DaemonError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        DaemonError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DaemonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = DaemonError::Config("missing DATABASE_URL".to_string());
        assert_eq!(
            format!("{}", err),
            "Configuration error: missing DATABASE_URL"
        );
    }

    #[test]
    fn test_signal_error_display() {
        let io = std::io::Error::other("registration failed");
        let err = DaemonError::Signal(io);
        assert_eq!(format!("{}", err), "Signal handler error: registration failed");
    }

    #[test]
    fn test_error_is_debug() {
        let err = DaemonError::Config("bad".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("Config"));
    }
}
