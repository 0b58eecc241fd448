//! Outgoing nonce counter.
//!
//! A channel has exactly one sequence, used only for the encrypt
//! direction. Incoming messages carry their own nonce.
//!
//! # Thread Safety
//!
//! Advancing is not synchronized. Two unsynchronized encryptions on one
//! channel can reuse a nonce, so callers must serialize access.

use tracing::error;

use crate::backend;
use crate::constants::NONCE_LEN;
use crate::error::ChannelError;

/// A 24-byte counter treated as a little-endian unsigned integer.
///
/// The only way to start a sequence from outside this crate is a fresh
/// random seed:
///
/// ```compile_fail
/// use rift_crypto::nonce::NonceSequencer;
///
/// let _chosen = NonceSequencer::from_bytes([0u8; 24]);
/// ```
#[derive(Debug)]
pub struct NonceSequencer {
    nonce: [u8; NONCE_LEN],
}

impl NonceSequencer {
    /// Draw the initial value from the OS CSPRNG.
    pub fn seed() -> Result<Self, ChannelError> {
        let mut nonce = [0u8; NONCE_LEN];
        backend::fill_random(&mut nonce).map_err(|e| {
            error!(error = %e, "failed to seed nonce");
            ChannelError::InitializationError
        })?;
        Ok(Self { nonce })
    }

    /// Start from a known value.
    #[cfg(test)]
    pub(crate) fn from_bytes(nonce: [u8; NONCE_LEN]) -> Self {
        Self { nonce }
    }

    /// Increment by one, wrapping on overflow, and return the new value.
    pub fn advance(&mut self) -> [u8; NONCE_LEN] {
        increment(&mut self.nonce);
        self.nonce
    }

    /// The most recently issued value (or the seed, before any advance).
    pub fn current(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }
}

/// Add one to a little-endian integer of any width, wrapping to zero.
pub fn increment(bytes: &mut [u8]) {
    for byte in bytes.iter_mut() {
        let (value, carry) = byte.overflowing_add(1);
        *byte = value;
        if !carry {
            return;
        }
    }
}
