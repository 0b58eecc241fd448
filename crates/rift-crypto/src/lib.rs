//! Cryptographic core for Wavry's RIFT channel.
//!
//! This crate provides:
//! - Zeroing buffers for secret material
//! - X25519 keypairs with one-time, process-wide backend initialization
//! - Role-aware derivation of directional session keys
//! - A secure channel that seals and opens individual messages
//!
//! # Design
//!
//! Each side creates a [`SecureChannel`] with its [`Role`], sends
//! [`SecureChannel::local_public_key`] to the peer over whatever
//! transport it has, and feeds the peer's key to
//! [`SecureChannel::set_remote_public_key`]. From then on every message
//! is sealed with XChaCha20-Poly1305 under a per-direction key and a
//! counter nonce carried in front of the ciphertext:
//!
//! ```text
//! [24 bytes: nonce] [ciphertext] [16 bytes: tag]
//! ```
//!
//! Framing, retransmission and replay protection are left to the
//! transport and session layers.
//!
//! # Example
//!
//! ```
//! use rift_crypto::{Role, SecureChannel};
//!
//! let mut client = SecureChannel::create(Role::Initiator)?;
//! let mut host = SecureChannel::create(Role::Responder)?;
//!
//! let mut client_key = client.local_public_key();
//! let mut host_key = host.local_public_key();
//! client.set_remote_public_key(&mut host_key)?;
//! host.set_remote_public_key(&mut client_key)?;
//!
//! let message = client.encrypt(b"hello")?;
//! assert_eq!(host.decrypt(&message)?, b"hello");
//! # Ok::<(), rift_crypto::ChannelError>(())
//! ```

#![forbid(unsafe_code)]

pub mod backend;
pub mod channel;
pub mod cipher;
pub mod constants;
pub mod derivation;
pub mod error;
pub mod keypair;
pub mod nonce;
pub mod role;
pub mod secure_bytes;

pub use channel::{ChannelState, Encryptor, SecureChannel};
pub use error::ChannelError;
pub use keypair::KeyPair;
pub use role::Role;
pub use secure_bytes::SecureBytes;
