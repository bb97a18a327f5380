//! Error handling for the SpiceTrack client core
//!
//! Every fallible operation returns [`AppResult`]; nothing here is fatal to the
//! process. [`AppError::user_message`] maps each kind to the text the
//! presentation layer shows (inline for validation, banner for storage,
//! blocking retry screen for gateway failures).

use thiserror::Error;
use uuid::Uuid;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    // Validation errors
    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// A mutation referenced an entity that does not exist in the collections
    #[error("Referenced {entity} {id} not found")]
    ReferenceNotFound { entity: &'static str, id: Uuid },

    // Persistence errors
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    /// Message suitable for direct display to the user
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidCredentials => {
                "Invalid password. Please try again.".to_string()
            }
            AppError::Validation { message, .. } => message.clone(),
            AppError::DuplicateEntry(what) => {
                format!("An account with this {} already exists.", what)
            }
            AppError::NotFound(resource) => {
                format!("{} not found.", resource)
            }
            AppError::ReferenceNotFound { entity, .. } => {
                format!("The referenced {} no longer exists.", entity)
            }
            AppError::Storage(_) | AppError::Serialization(_) => {
                "Failed to save data. Changes may be lost on restart.".to_string()
            }
            AppError::Database(_) => {
                "Could not reach the data service. Please retry.".to_string()
            }
            AppError::Configuration(_)
            | AppError::Internal(_)
            | AppError::InternalError(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }

    /// Whether the error came from the persistence layer rather than the
    /// operation itself (these never roll back in-memory state)
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            AppError::Storage(_) | AppError::Serialization(_) | AppError::Database(_)
        )
    }
}

/// Result type alias for service operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_not_found_names_the_entity() {
        let err = AppError::ReferenceNotFound {
            entity: "product",
            id: Uuid::nil(),
        };
        assert!(err.to_string().contains("product"));
        assert!(err.user_message().contains("product"));
    }

    #[test]
    fn persistence_errors_are_classified() {
        assert!(AppError::Storage("disk full".into()).is_persistence());
        assert!(!AppError::InvalidCredentials.is_persistence());
    }
}
