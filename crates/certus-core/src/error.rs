/// Core engine errors.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid hash: {0}")]
    InvalidHash(String),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("missing required field: {0}")]
    MissingField(String),
}
