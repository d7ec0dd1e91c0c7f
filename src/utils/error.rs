use thiserror::Error;

#[derive(Error, Debug)]
pub enum BulkError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Sink '{sink}' failed: {details}")]
    SinkError { sink: String, details: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Delivery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BulkError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BulkError::ConfigError { .. }
            | BulkError::InvalidConfigValueError { .. }
            | BulkError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            BulkError::IoError(_) => ErrorCategory::Input,
            BulkError::SinkError { .. } => ErrorCategory::Delivery,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // a sink failure never stops the run
            ErrorCategory::Delivery => ErrorSeverity::Medium,
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BulkError::IoError(e) => format!("Could not read input: {}", e),
            BulkError::ConfigError { message } => format!("Invalid configuration: {}", message),
            BulkError::InvalidConfigValueError {
                field,
                value,
                reason,
            } => format!("'{}' is not a valid {}: {}", value, field, reason),
            BulkError::ConfigValidationError { field, message } => {
                format!("Configuration problem in {}: {}", field, message)
            }
            BulkError::SinkError { sink, details } => {
                format!("Output '{}' could not write a block: {}", sink, details)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BulkError::IoError(_) => "Make sure the input is valid UTF-8 text",
            BulkError::InvalidConfigValueError { .. } => {
                "Pass a block size of at least 1, e.g. `bulk 3`"
            }
            BulkError::ConfigError { .. } | BulkError::ConfigValidationError { .. } => {
                "Check the configuration file path and its TOML syntax"
            }
            BulkError::SinkError { .. } => {
                "Check that the output directory exists and is writable"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, BulkError>;
