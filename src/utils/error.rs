use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Fetch failed{}: {message}", status_suffix(.status))]
    FetchFailed {
        status: Option<u16>,
        message: String,
    },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Dashboard session error: {message}")]
    SessionError { message: String },
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (status {})", code),
        None => String::new(),
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        DashboardError::FetchFailed {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DashboardError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DashboardError::FetchFailed { .. } => ErrorCategory::Network,
            DashboardError::MalformedResponse { .. }
            | DashboardError::CsvError(_)
            | DashboardError::SerializationError(_) => ErrorCategory::Data,
            DashboardError::ConfigError { .. }
            | DashboardError::InvalidConfigValueError { .. }
            | DashboardError::MissingConfigError { .. } => ErrorCategory::Configuration,
            DashboardError::IoError(_) | DashboardError::SessionError { .. } => {
                ErrorCategory::System
            }
        }
    }

    /// Fetch problems are recoverable by reselecting a cluster, so they rank
    /// below configuration mistakes that stop the tool from starting.
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DashboardError::FetchFailed { message, .. } => message.clone(),
            DashboardError::MalformedResponse { .. } => "Invalid response format".to_string(),
            DashboardError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            DashboardError::MissingConfigError { field } => {
                format!("Missing setting '{}'", field)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the endpoint and your session cookies, then reselect the cluster",
            ErrorCategory::Data => "The endpoint must return a JSON array of deployment records",
            ErrorCategory::Configuration => "Fix the flag or the TOML setting named above",
            ErrorCategory::System => "Check file paths and permissions, then rerun with --verbose",
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
