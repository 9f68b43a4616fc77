//! Certus Crypto — Ed25519 keypairs and signatures, BLAKE3 content hashing.

pub mod error;
pub mod hashing;
pub mod keys;
pub mod signing;

pub use error::CryptoError;
pub use hashing::{hash, hash_json, Hash};
pub use keys::{KeyPair, PublicKey};
pub use signing::{sign, verify, Signature};
