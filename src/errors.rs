//! Unified error type for plan operations.
//!
//! Domain failures split into two families: a referenced plan does not exist
//! (`PlanNotFound`, `ParentPlanNotFound`) and the caller supplied something
//! unusable (`BadRequest`). Everything else is infrastructure.

use thiserror::Error;

/// Errors returned by plan operations and their setup.
#[derive(Debug, Error)]
pub enum Error {
    /// The plan addressed by the operation does not exist.
    #[error("Plan not found: {id}")]
    PlanNotFound {
        /// Id that matched no row
        id: i64,
    },

    /// A parent plan referenced by the operation does not exist.
    #[error("Parent plan not found: {id}")]
    ParentPlanNotFound {
        /// Parent id that matched no row
        id: i64,
    },

    /// Missing or malformed input, or an operation not allowed on this plan.
    #[error("Bad request: {message}")]
    BadRequest {
        /// What was wrong with the input
        message: String,
    },

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the failure
        message: String,
    },

    /// The database rejected or failed a statement.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl Error {
    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// True for every "referenced id does not exist" failure.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::PlanNotFound { .. } | Self::ParentPlanNotFound { .. }
        )
    }

    /// True when the caller's input was rejected.
    #[must_use]
    pub const fn is_bad_request(&self) -> bool {
        matches!(self, Self::BadRequest { .. })
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(Error::PlanNotFound { id: 1 }.is_not_found());
        assert!(Error::ParentPlanNotFound { id: 2 }.is_not_found());
        assert!(!Error::bad_request("nope").is_not_found());
        assert!(Error::bad_request("nope").is_bad_request());
        assert!(
            !Error::Config {
                message: "x".to_string()
            }
            .is_bad_request()
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(Error::PlanNotFound { id: 7 }.to_string(), "Plan not found: 7");
        assert_eq!(
            Error::bad_request("startDate and endDate are required").to_string(),
            "Bad request: startDate and endDate are required"
        );
    }
}
