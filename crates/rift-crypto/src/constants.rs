//! Fixed sizes of the primitives backing the channel.

/// X25519 public key length.
pub const PUBLIC_KEY_LEN: usize = 32;

/// X25519 secret key length.
pub const SECRET_KEY_LEN: usize = 32;

/// Length of each directional session key (XChaCha20-Poly1305 key).
pub const SESSION_KEY_LEN: usize = 32;

/// XChaCha20-Poly1305 nonce length.
pub const NONCE_LEN: usize = 24;

/// Poly1305 tag length.
pub const TAG_LEN: usize = 16;

/// Bytes added to every plaintext on the wire: `nonce || ciphertext || tag`.
pub const MESSAGE_OVERHEAD: usize = NONCE_LEN + TAG_LEN;
