//! Per-message authenticated encryption.
//!
//! # Wire Format
//!
//! ```text
//! [24 bytes: nonce] [ciphertext, same length as plaintext] [16 bytes: tag]
//! ```
//!
//! The blob does not delimit itself; the transport must preserve its
//! boundaries.

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use tracing::{error, warn};

use crate::constants::{MESSAGE_OVERHEAD, NONCE_LEN};
use crate::derivation::SessionKeys;
use crate::error::ChannelError;
use crate::nonce::NonceSequencer;

/// XChaCha20-Poly1305 over a channel's directional session keys.
///
/// Only [`SecureChannel`](crate::SecureChannel) builds one, so the
/// channel's own sequencer is the sole source of encrypt nonces:
///
/// ```compile_fail
/// use rift_crypto::cipher::Cipher;
/// use rift_crypto::derivation::derive_session_keys;
/// use rift_crypto::{KeyPair, Role, SecureBytes};
///
/// let peer = KeyPair::generate(Role::Responder).unwrap();
/// let secret = SecureBytes::new(32);
/// let mut peer_key = peer.public_key().to_vec();
/// let keys = derive_session_keys(Role::Initiator, &[0u8; 32], &secret, &mut peer_key).unwrap();
/// let _cipher = Cipher::new(keys);
/// ```
#[derive(Debug)]
pub struct Cipher {
    keys: SessionKeys,
}

impl Cipher {
    pub(crate) fn new(keys: SessionKeys) -> Self {
        Self { keys }
    }

    /// Advance `nonce` and seal `plaintext` under the encrypt key.
    ///
    /// The nonce is not rolled back if sealing fails.
    pub fn encrypt(
        &self,
        nonce: &mut NonceSequencer,
        plaintext: &[u8],
    ) -> Result<Vec<u8>, ChannelError> {
        let nonce = nonce.advance();

        let aead = XChaCha20Poly1305::new_from_slice(self.keys.encrypt_key()).map_err(|_| {
            error!("encrypt key has the wrong length");
            ChannelError::EncryptionFailed
        })?;
        let sealed = aead
            .encrypt(XNonce::from_slice(&nonce), plaintext)
            .map_err(|_| {
                error!(len = plaintext.len(), "message encryption failed");
                ChannelError::EncryptionFailed
            })?;

        let mut message = Vec::with_capacity(NONCE_LEN + sealed.len());
        message.extend_from_slice(&nonce);
        message.extend_from_slice(&sealed);
        Ok(message)
    }

    #[cfg(test)]
    pub(crate) fn keys(&self) -> &SessionKeys {
        &self.keys
    }

    /// Open a message under the decrypt key, using the nonce it carries.
    ///
    /// No plaintext is released unless the tag verifies.
    pub fn decrypt(&self, message: &[u8]) -> Result<Vec<u8>, ChannelError> {
        if message.len() < MESSAGE_OVERHEAD {
            warn!(len = message.len(), "message too short to decrypt");
            return Err(ChannelError::InvalidMessageSize {
                minimum: MESSAGE_OVERHEAD,
                actual: message.len(),
            });
        }

        let (nonce, sealed) = message.split_at(NONCE_LEN);

        let aead = XChaCha20Poly1305::new_from_slice(self.keys.decrypt_key()).map_err(|_| {
            error!("decrypt key has the wrong length");
            ChannelError::AuthenticationFailed
        })?;
        aead.decrypt(XNonce::from_slice(nonce), sealed)
            .map_err(|_| {
                warn!(len = message.len(), "message authentication failed");
                ChannelError::AuthenticationFailed
            })
    }
}
