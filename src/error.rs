use thiserror::Error;

/// Startup failures. Always fatal; the poll loop never sees these.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),

    #[error("failed to read config file {path}: {message}")]
    Read { path: String, message: String },

    #[error("TOML parse error: {0}")]
    Toml(String),
}

/// Everything that can go wrong inside one poll iteration.
///
/// All variants are recoverable: the loop logs them, maybe notifies, and
/// tries again on the next tick.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PollError {
    #[error("request to {endpoint} failed: {cause}")]
    Transport { endpoint: String, cause: String },

    #[error("endpoint {endpoint} answered with HTTP {code}")]
    HttpStatus { endpoint: String, code: u16 },

    #[error("API reported an error ({key}): {value}")]
    ApiData { key: String, value: String },

    #[error("unexpected API response: {0}")]
    Shape(String),

    #[error("homework is missing the \"{0}\" field")]
    Field(&'static str),

    #[error("homework field \"{field}\" is not a string: {value}")]
    InvalidField { field: &'static str, value: String },

    #[error("unknown homework status: \"{status}\"")]
    UnknownStatus { status: String },
}

impl PollError {
    /// Which side of the wire the failure came from.
    pub fn kind(&self) -> FailureKind {
        match self {
            PollError::Transport { .. } | PollError::HttpStatus { .. } => FailureKind::System,
            PollError::ApiData { .. }
            | PollError::Shape(_)
            | PollError::Field(_)
            | PollError::InvalidField { .. }
            | PollError::UnknownStatus { .. } => FailureKind::Business,
        }
    }
}

/// Classifies a poll failure for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The payload was delivered but its content is wrong or an error report.
    Business,
    /// Network or server failure (DNS, timeout, non-200 status).
    System,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Business => write!(f, "business"),
            FailureKind::System => write!(f, "system"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credentials_lists_names_in_order() {
        let err = ConfigError::MissingCredentials(vec!["PRACTICUM_TOKEN", "TELEGRAM_CHAT_ID"]);
        assert_eq!(
            err.to_string(),
            "missing required environment variables: PRACTICUM_TOKEN, TELEGRAM_CHAT_ID"
        );
    }

    #[test]
    fn transport_and_status_errors_are_system_failures() {
        let transport = PollError::Transport {
            endpoint: "http://x".into(),
            cause: "connection refused".into(),
        };
        let status = PollError::HttpStatus {
            endpoint: "http://x".into(),
            code: 503,
        };
        assert_eq!(transport.kind(), FailureKind::System);
        assert_eq!(status.kind(), FailureKind::System);
        assert_eq!(status.to_string(), "endpoint http://x answered with HTTP 503");
    }

    #[test]
    fn data_errors_are_business_failures() {
        assert_eq!(PollError::Shape("not a mapping".into()).kind(), FailureKind::Business);
        assert_eq!(PollError::Field("homework_name").kind(), FailureKind::Business);
        assert_eq!(
            PollError::UnknownStatus { status: "bogus".into() }.to_string(),
            "unknown homework status: \"bogus\""
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PollError>();
        assert_send_sync::<ConfigError>();
    }
}
