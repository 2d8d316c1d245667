use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("{service} API returned {status}: {message}")]
    ApiError {
        service: String,
        status: u16,
        message: String,
    },

    #[error("Failed to connect to {service}: {message}")]
    ConnectionError { service: String, message: String },

    #[error("Missing required configuration: {}", fields.join(", "))]
    MissingConfigError { fields: Vec<String> },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("No destination model available")]
    NoDestinationModel,

    #[error("Migration error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Remote,
    Storage,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MigrateError {
    pub fn processing(message: impl Into<String>) -> Self {
        Self::ProcessingError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::HttpError(_) | Self::ConnectionError { .. } => ErrorCategory::Network,
            Self::ApiError { .. } | Self::NoDestinationModel => ErrorCategory::Remote,
            Self::IoError(_) => ErrorCategory::Storage,
            Self::SerializationError(_) | Self::ProcessingError { .. } => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ConnectionError { .. } => ErrorSeverity::Critical,
            Self::MissingConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorSeverity::High
            }
            Self::HttpError(_) | Self::ApiError { .. } | Self::IoError(_) => ErrorSeverity::Medium,
            Self::SerializationError(_) | Self::NoDestinationModel | Self::ProcessingError { .. } => {
                ErrorSeverity::Low
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::MissingConfigError { .. } => {
                "Set the listed environment variables or pass them as command-line flags"
            }
            Self::InvalidConfigValueError { .. } => "Correct the configuration value and retry",
            Self::ConnectionError { .. } => {
                "Check the API key, endpoint URL and network access for the service"
            }
            Self::HttpError(_) => "Check network connectivity and retry",
            Self::ApiError { status, .. } if *status == 429 => {
                "Rate limited; raise --throttle-ms and retry"
            }
            Self::ApiError { .. } => "Inspect the API error message for the rejected request",
            Self::NoDestinationModel => "Create at least one model deployment on the destination",
            Self::IoError(_) => "Check free space and permissions of the temporary directory",
            Self::SerializationError(_) | Self::ProcessingError { .. } => {
                "Re-run with --verbose to see the offending payload"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::MissingConfigError { fields } => format!(
                "Please set the following environment variables:\n{}",
                fields
                    .iter()
                    .map(|f| format!("- {}", f))
                    .collect::<Vec<_>>()
                    .join("\n")
            ),
            Self::ConnectionError { service, .. } => format!("Could not reach {}", service),
            other => other.to_string(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low | ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, MigrateError>;
