use thiserror::Error;

/// Rejected configuration. Every variant names the offending field so the
/// message can be shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be within [0, 1], got {value}")]
    ProbabilityOutOfRange { field: &'static str, value: f64 },

    #[error("{field} must be greater than 0, got {value}")]
    NonPositive { field: &'static str, value: i64 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: i64 },

    #[error("{field} is too large, got {value}")]
    TooLarge { field: &'static str, value: i64 },
}

impl ConfigError {
    /// Name of the configuration field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            ConfigError::ProbabilityOutOfRange { field, .. }
            | ConfigError::NonPositive { field, .. }
            | ConfigError::Negative { field, .. }
            | ConfigError::TooLarge { field, .. } => field,
        }
    }
}
