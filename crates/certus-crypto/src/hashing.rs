use serde::Serialize;

use crate::error::CryptoError;

/// BLAKE3 hash (32 bytes).
pub type Hash = [u8; 32];

/// Hash arbitrary data using BLAKE3.
pub fn hash(data: &[u8]) -> Hash {
    *blake3::hash(data).as_bytes()
}

/// Hash a serializable value over its canonical JSON form.
///
/// `serde_json` maps serialize with sorted keys, so the payload is
/// deterministic for a given value regardless of insertion order.
pub fn hash_json<T: Serialize>(value: &T) -> Result<Hash, CryptoError> {
    let payload =
        serde_json::to_vec(value).map_err(|e| CryptoError::Serialization(e.to_string()))?;
    Ok(hash(&payload))
}
