//! Local X25519 keypair generation.

use std::fmt;

use tracing::error;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroizing;

use crate::backend;
use crate::constants::{PUBLIC_KEY_LEN, SECRET_KEY_LEN};
use crate::error::ChannelError;
use crate::role::Role;
use crate::secure_bytes::SecureBytes;

/// A channel's local keypair.
///
/// Only the public half ever leaves the channel.
pub struct KeyPair {
    public_key: [u8; PUBLIC_KEY_LEN],
    secret_key: SecureBytes,
}

impl KeyPair {
    /// Generate a fresh keypair, initializing the backend on first use.
    ///
    /// The role does not change the key material; it is accepted so the
    /// failure can be attributed in logs.
    pub fn generate(role: Role) -> Result<Self, ChannelError> {
        backend::ensure_initialized()?;

        let mut secret = SecureBytes::new(SECRET_KEY_LEN);
        if let Err(e) = backend::fill_random(secret.as_mut_slice()) {
            error!(%role, error = %e, "keypair generation failed");
            return Err(ChannelError::KeypairGenerationFailed);
        }

        let static_secret = static_secret(&secret)?;
        let public_key = *PublicKey::from(&static_secret).as_bytes();

        Ok(Self {
            public_key,
            secret_key: secret,
        })
    }

    pub fn public_key(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.public_key
    }

    pub(crate) fn secret_key(&self) -> &SecureBytes {
        &self.secret_key
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key)
            .field("secret_key", &self.secret_key)
            .finish()
    }
}

/// Rebuild the dalek secret from its stored bytes.
pub(crate) fn static_secret(secret: &SecureBytes) -> Result<StaticSecret, ChannelError> {
    if secret.len() != SECRET_KEY_LEN {
        return Err(ChannelError::KeypairGenerationFailed);
    }
    let mut bytes = Zeroizing::new([0u8; SECRET_KEY_LEN]);
    bytes.copy_from_slice(secret.as_slice());
    Ok(StaticSecret::from(*bytes))
}
