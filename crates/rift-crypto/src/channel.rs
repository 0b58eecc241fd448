//! Secure channel lifecycle.
//!
//! ```text
//! create(role) ──> Created ──set_remote_public_key──> KeysExchanged
//!                    │                                    │
//!            encrypt/decrypt:                      encrypt/decrypt
//!            ChannelNotReady                          enabled
//! ```
//!
//! A channel serves one connection and is driven by one flow of control
//! at a time. `encrypt` takes `&mut self`, so sharing a channel across
//! threads requires an external lock such as a `Mutex`.

use tracing::{debug, warn};

use crate::cipher::Cipher;
use crate::derivation::derive_session_keys;
use crate::error::ChannelError;
use crate::keypair::KeyPair;
use crate::nonce::NonceSequencer;
use crate::role::Role;

/// Lifecycle state of a [`SecureChannel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// Keypair generated, no session keys.
    Created,
    /// Session keys derived; encrypt and decrypt are enabled.
    KeysExchanged,
}

/// Message encryption endpoint, as seen by the session layer.
pub trait Encryptor {
    /// Public key to send to the peer.
    fn local_public_key(&self) -> Vec<u8>;

    /// Install the peer's public key and derive session keys.
    ///
    /// `peer_public_key` is zeroed on success.
    fn set_remote_public_key(&mut self, peer_public_key: &mut [u8]) -> Result<(), ChannelError>;

    fn encrypt(&mut self, plaintext: &[u8]) -> Result<Vec<u8>, ChannelError>;

    fn decrypt(&self, message: &[u8]) -> Result<Vec<u8>, ChannelError>;
}

/// Authenticated, encrypted, bidirectional message channel.
#[derive(Debug)]
pub struct SecureChannel {
    role: Role,
    keypair: KeyPair,
    nonce: NonceSequencer,
    /// Present exactly when the channel is in `KeysExchanged`.
    cipher: Option<Cipher>,
}

impl SecureChannel {
    /// Generate a keypair and seed the nonce.
    pub fn create(role: Role) -> Result<Self, ChannelError> {
        let keypair = KeyPair::generate(role)?;
        let nonce = NonceSequencer::seed()?;

        debug!(%role, "secure channel created");

        Ok(Self {
            role,
            keypair,
            nonce,
            cipher: None,
        })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> ChannelState {
        if self.cipher.is_some() {
            ChannelState::KeysExchanged
        } else {
            ChannelState::Created
        }
    }

    pub fn is_ready(&self) -> bool {
        self.cipher.is_some()
    }

    /// Local public key bytes. Available in every state.
    pub fn local_public_key(&self) -> Vec<u8> {
        self.keypair.public_key().to_vec()
    }

    /// Derive session keys from the peer's public key.
    ///
    /// Only valid once. A second call fails with `AlreadyExchanged`
    /// instead of rotating keys. On failure the channel stays in
    /// `Created`; only `InvalidKeySize` is worth retrying.
    pub fn set_remote_public_key(&mut self, peer_public_key: &mut [u8]) -> Result<(), ChannelError> {
        if self.cipher.is_some() {
            warn!(role = %self.role, "rejecting repeated key exchange");
            return Err(ChannelError::AlreadyExchanged);
        }

        let keys = derive_session_keys(
            self.role,
            self.keypair.public_key(),
            self.keypair.secret_key(),
            peer_public_key,
        )?;
        self.cipher = Some(Cipher::new(keys));

        debug!(role = %self.role, "session keys exchanged");
        Ok(())
    }

    /// Encrypt one application message.
    ///
    /// Output is `nonce || ciphertext || tag`.
    pub fn encrypt(&mut self, plaintext: &[u8]) -> Result<Vec<u8>, ChannelError> {
        let Some(cipher) = self.cipher.as_ref() else {
            warn!(role = %self.role, "encrypt before key exchange");
            return Err(ChannelError::ChannelNotReady);
        };
        cipher.encrypt(&mut self.nonce, plaintext)
    }

    /// Decrypt one application message produced by the peer.
    ///
    /// Does not track incoming nonces; ordering and replay checks belong
    /// to the session layer.
    pub fn decrypt(&self, message: &[u8]) -> Result<Vec<u8>, ChannelError> {
        let Some(cipher) = self.cipher.as_ref() else {
            warn!(role = %self.role, "decrypt before key exchange");
            return Err(ChannelError::ChannelNotReady);
        };
        cipher.decrypt(message)
    }
}

impl Encryptor for SecureChannel {
    fn local_public_key(&self) -> Vec<u8> {
        SecureChannel::local_public_key(self)
    }

    fn set_remote_public_key(&mut self, peer_public_key: &mut [u8]) -> Result<(), ChannelError> {
        SecureChannel::set_remote_public_key(self, peer_public_key)
    }

    fn encrypt(&mut self, plaintext: &[u8]) -> Result<Vec<u8>, ChannelError> {
        SecureChannel::encrypt(self, plaintext)
    }

    fn decrypt(&self, message: &[u8]) -> Result<Vec<u8>, ChannelError> {
        SecureChannel::decrypt(self, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{MESSAGE_OVERHEAD, NONCE_LEN, PUBLIC_KEY_LEN};
    use crate::nonce::increment;

    fn create_channel_pair() -> (SecureChannel, SecureChannel) {
        let mut initiator = SecureChannel::create(Role::Initiator).unwrap();
        let mut responder = SecureChannel::create(Role::Responder).unwrap();

        let mut pk_a = initiator.local_public_key();
        let mut pk_b = responder.local_public_key();
        initiator.set_remote_public_key(&mut pk_b).unwrap();
        responder.set_remote_public_key(&mut pk_a).unwrap();

        (initiator, responder)
    }

    #[test]
    fn test_initial_state() {
        let channel = SecureChannel::create(Role::Initiator).unwrap();
        assert_eq!(channel.state(), ChannelState::Created);
        assert_eq!(channel.role(), Role::Initiator);
        assert_eq!(channel.local_public_key().len(), PUBLIC_KEY_LEN);
    }

    #[test]
    fn test_key_symmetry() {
        let (a, b) = create_channel_pair();
        let a_keys = a.cipher.as_ref().unwrap().keys();
        let b_keys = b.cipher.as_ref().unwrap().keys();

        assert_eq!(a_keys.encrypt_key(), b_keys.decrypt_key());
        assert_eq!(b_keys.encrypt_key(), a_keys.decrypt_key());
        assert_ne!(a_keys.encrypt_key(), a_keys.decrypt_key());
    }

    #[test]
    fn test_roundtrip() {
        let (mut a, mut b) = create_channel_pair();
        assert_eq!(a.state(), ChannelState::KeysExchanged);

        let m = a.encrypt(b"hello").unwrap();
        assert_eq!(b.decrypt(&m).unwrap(), b"hello");

        let m = b.encrypt(b"").unwrap();
        assert_eq!(m.len(), MESSAGE_OVERHEAD);
        assert_eq!(a.decrypt(&m).unwrap(), b"");
    }

    #[test]
    fn test_nonce_monotonic() {
        let (mut a, _b) = create_channel_pair();

        let m1 = a.encrypt(b"first").unwrap();
        let m2 = a.encrypt(b"second").unwrap();

        let mut expected = [0u8; NONCE_LEN];
        expected.copy_from_slice(&m1[..NONCE_LEN]);
        increment(&mut expected);
        assert_eq!(&m2[..NONCE_LEN], &expected);
    }

    #[test]
    fn test_not_ready_before_exchange() {
        let mut channel = SecureChannel::create(Role::Responder).unwrap();
        assert_eq!(channel.encrypt(b"x"), Err(ChannelError::ChannelNotReady));
        assert_eq!(
            channel.decrypt(&[0u8; 64]),
            Err(ChannelError::ChannelNotReady)
        );
    }

    #[test]
    fn test_already_exchanged() {
        let (mut a, mut b) = create_channel_pair();
        let mut again = b.local_public_key();

        assert_eq!(
            a.set_remote_public_key(&mut again),
            Err(ChannelError::AlreadyExchanged)
        );

        // First keys still in force
        let m = a.encrypt(b"still paired").unwrap();
        assert_eq!(b.decrypt(&m).unwrap(), b"still paired");
        let m = b.encrypt(b"both ways").unwrap();
        assert_eq!(a.decrypt(&m).unwrap(), b"both ways");
    }

    #[test]
    fn test_retry_after_bad_key_size() {
        let mut a = SecureChannel::create(Role::Initiator).unwrap();
        let mut b = SecureChannel::create(Role::Responder).unwrap();

        let mut pk_b = b.local_public_key();
        let mut truncated = pk_b[..PUBLIC_KEY_LEN - 1].to_vec();
        assert!(matches!(
            a.set_remote_public_key(&mut truncated),
            Err(ChannelError::InvalidKeySize { .. })
        ));
        assert_eq!(a.state(), ChannelState::Created);

        a.set_remote_public_key(&mut pk_b).unwrap();
        let mut pk_a = a.local_public_key();
        b.set_remote_public_key(&mut pk_a).unwrap();

        let m = a.encrypt(b"retry ok").unwrap();
        assert_eq!(b.decrypt(&m).unwrap(), b"retry ok");
    }

    #[test]
    fn test_through_trait_object() {
        let (a, b) = create_channel_pair();
        let mut a: Box<dyn Encryptor> = Box::new(a);
        let b: Box<dyn Encryptor> = Box::new(b);

        let m = a.encrypt(b"dyn").unwrap();
        assert_eq!(b.decrypt(&m).unwrap(), b"dyn");
    }
}
