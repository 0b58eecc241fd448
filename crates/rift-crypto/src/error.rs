//! Channel error taxonomy.
//!
//! Every fallible operation in this crate returns one of these kinds.
//! None of them is ever folded into an empty result.

use thiserror::Error;

/// Errors produced while creating or driving a [`SecureChannel`](crate::SecureChannel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// The process-wide crypto backend could not be brought up.
    /// Sticky until the process restarts.
    #[error("crypto backend initialization failed")]
    InitializationError,

    #[error("keypair generation failed")]
    KeypairGenerationFailed,

    /// Peer public key has the wrong length. The channel stays usable
    /// for another `set_remote_public_key` attempt.
    #[error("invalid public key size: expected {expected} bytes, got {actual}")]
    InvalidKeySize { expected: usize, actual: usize },

    /// Key exchange rejected the peer key material. Treat the channel as dead.
    #[error("session key derivation failed")]
    DerivationFailed,

    #[error("session keys already exchanged")]
    AlreadyExchanged,

    #[error("channel not ready: session keys not exchanged")]
    ChannelNotReady,

    #[error("invalid message size: need at least {minimum} bytes, got {actual}")]
    InvalidMessageSize { minimum: usize, actual: usize },

    /// Tag mismatch: tampering, wrong key or corruption.
    #[error("message authentication failed")]
    AuthenticationFailed,

    /// The nonce has already advanced when this is returned; the channel
    /// should be discarded.
    #[error("encryption failed")]
    EncryptionFailed,
}

impl ChannelError {
    /// Whether the channel instance must be abandoned after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InitializationError
                | Self::KeypairGenerationFailed
                | Self::DerivationFailed
                | Self::EncryptionFailed
        )
    }
}
