use thiserror::Error;
use uuid::Uuid;

/// Failures surfaced by the evaluation pipeline and the evaluation stores.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("evaluation {0} not found")]
    NotFound(Uuid),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EvaluationError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, EvaluationError>;
