//! Stored form of the transaction PIN

use serde::{Deserialize, Serialize};

pub const PIN_HASH_LEN: usize = 32;

/// Argon2id work factors recorded next to each hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinCost {
    pub memory_kib: u32,
    pub passes: u32,
    pub lanes: u32,
}

impl Default for PinCost {
    fn default() -> Self {
        // 19 MiB, two passes: the OWASP argon2id baseline
        Self {
            memory_kib: 19 * 1024,
            passes: 2,
            lanes: 1,
        }
    }
}

/// Contents of `pin.json`; salt and hash are base64
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredPin {
    pub salt: String,
    pub hash: String,
    pub cost: PinCost,
    /// Unix milliseconds
    pub set_at: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PinStatus {
    pub configured: bool,
    pub set_at: Option<i64>,
}
