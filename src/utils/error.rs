use thiserror::Error;

#[derive(Error, Debug)]
pub enum UsersError {
    #[error("Malformed {entity} field: {message}")]
    MalformedField {
        entity: &'static str,
        message: String,
    },

    #[error("Upstream {endpoint} unavailable: {reason}")]
    UpstreamUnavailable { endpoint: String, reason: String },

    #[error("Upstream {endpoint} responded with status {status}")]
    UpstreamStatus { endpoint: String, status: u16 },

    #[error("Upstream schema error: {message}")]
    UpstreamSchema { message: String },

    #[error("Malformed limit '{value}': {reason}")]
    MalformedLimit { value: String, reason: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV rendering error: {0}")]
    CsvError(#[from] csv::Error),
}

/// 錯誤分類，對應呼叫端需要區分的失敗種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedField,
    UpstreamUnavailable,
    UpstreamSchema,
    MalformedLimit,
    Configuration,
    Output,
}

impl UsersError {
    /// Tags a field error with the position of the record it came from.
    pub fn in_record(self, index: usize) -> Self {
        match self {
            UsersError::MalformedField { entity, message } => UsersError::MalformedField {
                entity,
                message: format!("record {}: {}", index, message),
            },
            other => other,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            UsersError::MalformedField { .. } => ErrorKind::MalformedField,
            UsersError::UpstreamUnavailable { .. } | UsersError::UpstreamStatus { .. } => {
                ErrorKind::UpstreamUnavailable
            }
            UsersError::UpstreamSchema { .. } => ErrorKind::UpstreamSchema,
            UsersError::MalformedLimit { .. } => ErrorKind::MalformedLimit,
            UsersError::ConfigError { .. } | UsersError::InvalidConfigValueError { .. } => {
                ErrorKind::Configuration
            }
            UsersError::IoError(_)
            | UsersError::SerializationError(_)
            | UsersError::CsvError(_) => ErrorKind::Output,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            UsersError::MalformedField { entity, message } => {
                format!("A {} from the upstream could not be read ({})", entity, message)
            }
            UsersError::UpstreamUnavailable { endpoint, .. } => {
                format!("Could not reach the users service at {}", endpoint)
            }
            UsersError::UpstreamStatus { endpoint, status } => {
                format!("The users service at {} failed with HTTP {}", endpoint, status)
            }
            UsersError::UpstreamSchema { .. } => {
                "The users service returned an unexpected response".to_string()
            }
            UsersError::MalformedLimit { value, .. } => {
                format!("'{}' is not a valid number of users", value)
            }
            UsersError::ConfigError { .. } | UsersError::InvalidConfigValueError { .. } => {
                format!("Invalid configuration: {}", self)
            }
            UsersError::IoError(_)
            | UsersError::SerializationError(_)
            | UsersError::CsvError(_) => format!("Could not write the user listing: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.kind() {
            ErrorKind::MalformedField | ErrorKind::UpstreamSchema => {
                "Check that the endpoint returns a JSON array of user objects"
            }
            ErrorKind::UpstreamUnavailable => {
                "Check the network connection and the upstream endpoint, then try again"
            }
            ErrorKind::MalformedLimit => "Pass a positive whole number, or omit the limit to get 10",
            ErrorKind::Configuration => "Fix the configuration value named above",
            ErrorKind::Output => "Check that the output path is writable",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::MalformedLimit | ErrorKind::Configuration => 2,
            ErrorKind::UpstreamUnavailable => 3,
            ErrorKind::MalformedField | ErrorKind::UpstreamSchema => 4,
            ErrorKind::Output => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, UsersError>;
