//! Directional session key derivation.
//!
//! Both sides compute the X25519 shared secret and run it through
//! HKDF-SHA256, salted with `initiator_public || responder_public`, to get
//! one key per direction:
//!
//! ```text
//! i2r = HKDF-Expand(prk, "rift-channel initiator-to-responder v1")
//! r2i = HKDF-Expand(prk, "rift-channel responder-to-initiator v1")
//!
//! Initiator: encrypt = i2r, decrypt = r2i
//! Responder: encrypt = r2i, decrypt = i2r
//! ```
//!
//! Knowing one direction's key reveals nothing about the other.

use std::fmt;

use hkdf::Hkdf;
use sha2::Sha256;
use tracing::{error, warn};
use x25519_dalek::PublicKey;
use zeroize::Zeroize;

use crate::constants::{PUBLIC_KEY_LEN, SESSION_KEY_LEN};
use crate::error::ChannelError;
use crate::keypair::static_secret;
use crate::role::Role;
use crate::secure_bytes::SecureBytes;

const LABEL_I2R: &[u8] = b"rift-channel initiator-to-responder v1";
const LABEL_R2I: &[u8] = b"rift-channel responder-to-initiator v1";

/// The pair of directional keys held by a channel after key exchange.
pub struct SessionKeys {
    encrypt_key: SecureBytes,
    decrypt_key: SecureBytes,
}

impl SessionKeys {
    fn oriented(role: Role, i2r: SecureBytes, r2i: SecureBytes) -> Self {
        match role {
            Role::Initiator => Self {
                encrypt_key: i2r,
                decrypt_key: r2i,
            },
            Role::Responder => Self {
                encrypt_key: r2i,
                decrypt_key: i2r,
            },
        }
    }

    #[cfg(test)]
    pub(crate) fn from_raw(encrypt_key: SecureBytes, decrypt_key: SecureBytes) -> Self {
        Self {
            encrypt_key,
            decrypt_key,
        }
    }

    pub(crate) fn encrypt_key(&self) -> &[u8] {
        self.encrypt_key.as_slice()
    }

    pub(crate) fn decrypt_key(&self) -> &[u8] {
        self.decrypt_key.as_slice()
    }
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys")
            .field("encrypt_key", &self.encrypt_key)
            .field("decrypt_key", &self.decrypt_key)
            .finish()
    }
}

/// Derive the session keys for `role` from the local keypair and the
/// peer's public key.
///
/// On success `peer_public_key` is overwritten with zeros. The value is
/// not secret; scrubbing it just keeps stray copies out of memory. On
/// failure it is left untouched.
pub fn derive_session_keys(
    role: Role,
    local_public_key: &[u8; PUBLIC_KEY_LEN],
    local_secret_key: &SecureBytes,
    peer_public_key: &mut [u8],
) -> Result<SessionKeys, ChannelError> {
    if peer_public_key.is_empty() {
        warn!(%role, "empty peer public key");
    }
    if peer_public_key.len() != PUBLIC_KEY_LEN {
        warn!(%role, len = peer_public_key.len(), "wrong peer public key size");
        return Err(ChannelError::InvalidKeySize {
            expected: PUBLIC_KEY_LEN,
            actual: peer_public_key.len(),
        });
    }

    let mut peer = [0u8; PUBLIC_KEY_LEN];
    peer.copy_from_slice(peer_public_key);

    let result = derive_with_peer(role, local_public_key, local_secret_key, &peer);
    peer.zeroize();

    let keys = result?;
    peer_public_key.zeroize();
    Ok(keys)
}

fn derive_with_peer(
    role: Role,
    local_public_key: &[u8; PUBLIC_KEY_LEN],
    local_secret_key: &SecureBytes,
    peer: &[u8; PUBLIC_KEY_LEN],
) -> Result<SessionKeys, ChannelError> {
    let secret = static_secret(local_secret_key).map_err(|_| ChannelError::DerivationFailed)?;
    let shared = secret.diffie_hellman(&PublicKey::from(*peer));

    // A low-order peer point collapses the shared secret to zero.
    if !shared.was_contributory() {
        error!(%role, "key exchange produced a non-contributory shared secret");
        return Err(ChannelError::DerivationFailed);
    }

    let (initiator_public, responder_public) = match role {
        Role::Initiator => (local_public_key, peer),
        Role::Responder => (peer, local_public_key),
    };
    let mut salt = [0u8; 2 * PUBLIC_KEY_LEN];
    salt[..PUBLIC_KEY_LEN].copy_from_slice(initiator_public);
    salt[PUBLIC_KEY_LEN..].copy_from_slice(responder_public);

    let hkdf = Hkdf::<Sha256>::new(Some(salt.as_slice()), shared.as_bytes());

    let mut i2r = SecureBytes::new(SESSION_KEY_LEN);
    let mut r2i = SecureBytes::new(SESSION_KEY_LEN);
    if hkdf.expand(LABEL_I2R, i2r.as_mut_slice()).is_err()
        || hkdf.expand(LABEL_R2I, r2i.as_mut_slice()).is_err()
    {
        error!(%role, "session key expansion failed");
        return Err(ChannelError::DerivationFailed);
    }

    Ok(SessionKeys::oriented(role, i2r, r2i))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypair::KeyPair;

    fn derive(role: Role, local: &KeyPair, peer: &KeyPair) -> SessionKeys {
        let mut peer_key = peer.public_key().to_vec();
        derive_session_keys(role, local.public_key(), local.secret_key(), &mut peer_key).unwrap()
    }

    #[test]
    fn test_key_symmetry() {
        let alice = KeyPair::generate(Role::Initiator).unwrap();
        let bob = KeyPair::generate(Role::Responder).unwrap();

        let a = derive(Role::Initiator, &alice, &bob);
        let b = derive(Role::Responder, &bob, &alice);

        assert_eq!(a.encrypt_key(), b.decrypt_key());
        assert_eq!(b.encrypt_key(), a.decrypt_key());
        assert_ne!(a.encrypt_key(), a.decrypt_key());
        assert_eq!(a.encrypt_key().len(), SESSION_KEY_LEN);
    }

    #[test]
    fn test_same_role_does_not_pair() {
        let alice = KeyPair::generate(Role::Initiator).unwrap();
        let bob = KeyPair::generate(Role::Initiator).unwrap();

        let a = derive(Role::Initiator, &alice, &bob);
        let b = derive(Role::Initiator, &bob, &alice);

        assert_ne!(a.encrypt_key(), b.decrypt_key());
    }

    #[test]
    fn test_peer_key_scrubbed_on_success() {
        let alice = KeyPair::generate(Role::Initiator).unwrap();
        let bob = KeyPair::generate(Role::Responder).unwrap();

        let mut peer_key = bob.public_key().to_vec();
        derive_session_keys(
            Role::Initiator,
            alice.public_key(),
            alice.secret_key(),
            &mut peer_key,
        )
        .unwrap();

        assert_eq!(peer_key, vec![0u8; PUBLIC_KEY_LEN]);
    }

    #[test]
    fn test_short_key_rejected() {
        let alice = KeyPair::generate(Role::Initiator).unwrap();
        let mut short = vec![7u8; PUBLIC_KEY_LEN - 1];

        let err = derive_session_keys(
            Role::Initiator,
            alice.public_key(),
            alice.secret_key(),
            &mut short,
        )
        .unwrap_err();

        assert_eq!(
            err,
            ChannelError::InvalidKeySize {
                expected: PUBLIC_KEY_LEN,
                actual: PUBLIC_KEY_LEN - 1
            }
        );
        // Untouched on failure
        assert_eq!(short, vec![7u8; PUBLIC_KEY_LEN - 1]);
    }

    #[test]
    fn test_empty_key_rejected() {
        let alice = KeyPair::generate(Role::Responder).unwrap();
        let err = derive_session_keys(
            Role::Responder,
            alice.public_key(),
            alice.secret_key(),
            &mut [],
        )
        .unwrap_err();

        assert!(matches!(err, ChannelError::InvalidKeySize { actual: 0, .. }));
    }

    #[test]
    fn test_low_order_point_rejected() {
        let alice = KeyPair::generate(Role::Initiator).unwrap();
        // u = 0 is a low-order point; DH with it is always zero
        let mut identity = vec![0u8; PUBLIC_KEY_LEN];

        let err = derive_session_keys(
            Role::Initiator,
            alice.public_key(),
            alice.secret_key(),
            &mut identity,
        )
        .unwrap_err();

        assert_eq!(err, ChannelError::DerivationFailed);
    }
}
