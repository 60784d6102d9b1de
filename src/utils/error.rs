use thiserror::Error;

#[derive(Error, Debug)]
pub enum UsageError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("HTTP client construction failed: {0}")]
    Client(#[source] reqwest::Error),

    #[error("no data returned from {url}, please check mobile number")]
    EmptyResponse { url: String },

    #[error("Format error: {message}")]
    Format { message: String },

    #[error("Decode error in {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected result message from provider: {message:?}")]
    UnexpectedResult { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfig { field: String },

    #[error("Invalid value for {field} ({value:?}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Authentication,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl UsageError {
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Request { .. } | Self::Client(_) | Self::EmptyResponse { .. } => {
                ErrorCategory::Network
            }
            // 401/403 from the login form are credential problems, not transport
            Self::Status { status, .. } if matches!(*status, 401 | 403) => {
                ErrorCategory::Authentication
            }
            Self::Status { .. } => ErrorCategory::Network,
            Self::Format { .. } | Self::Decode { .. } => ErrorCategory::Data,
            Self::UnexpectedResult { .. } => ErrorCategory::Authentication,
            Self::Config { .. } | Self::MissingConfig { .. } | Self::InvalidConfigValue { .. } => {
                ErrorCategory::Configuration
            }
            Self::Io(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Authentication => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::EmptyResponse { .. } => {
                "Make sure the mobile number belongs to the SIM currently connected to the network"
            }
            Self::UnexpectedResult { .. } => {
                "Check the portal credentials; the provider may also have changed its API"
            }
            Self::Format { .. } | Self::Decode { .. } => {
                "The provider response format may have changed; re-run with --verbose and inspect the payload"
            }
            _ => match self.category() {
                ErrorCategory::Network => "Check network connectivity and try again later",
                ErrorCategory::Authentication => "Check the portal username and password",
                ErrorCategory::Configuration => "Check command line flags and the configuration file",
                _ => "Re-run with --verbose for more detail",
            },
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the provider: {}", self),
            ErrorCategory::Data => format!("Could not understand the provider response: {}", self),
            ErrorCategory::Authentication => format!("Portal rejected the session: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, UsageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_category_depends_on_code() {
        let unauthorized = UsageError::Status {
            url: "https://example.com/login".to_string(),
            status: 401,
        };
        let unavailable = UsageError::Status {
            url: "https://example.com/login".to_string(),
            status: 503,
        };

        assert_eq!(unauthorized.category(), ErrorCategory::Authentication);
        assert_eq!(unavailable.category(), ErrorCategory::Network);
        assert!(unavailable.to_string().contains("https://example.com/login"));
        assert!(unavailable.to_string().contains("503"));
    }

    #[test]
    fn test_unexpected_result_is_high_severity() {
        let err = UsageError::UnexpectedResult {
            message: "INVALID SESSION".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("INVALID SESSION"));
    }
}
