use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the trust verifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Maximum number of sibling legitimations verified concurrently.
    /// `None` means fan-out is bounded only by the graph structure.
    pub max_fanout: Option<usize>,
    /// Age after which a cached terminal verification result is discarded
    /// and re-verified on the next request. `None` means cached results
    /// live until explicitly re-verified.
    pub cache_ttl: Option<Duration>,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            max_fanout: None,
            cache_ttl: None,
        }
    }
}
