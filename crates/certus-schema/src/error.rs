/// Schema subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("schema format error: {0}")]
    Format(String),

    #[error("schema not found: {0}")]
    NotFound(String),

    #[error("schema directory unavailable: {0}")]
    Unavailable(String),

    #[error("crypto error: {0}")]
    Crypto(#[from] certus_crypto::CryptoError),
}
