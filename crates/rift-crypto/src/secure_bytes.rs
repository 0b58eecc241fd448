//! Owned byte buffer for secret material.
//!
//! The buffer is zero-filled on allocation and overwritten with zeros
//! before its memory is released, whether by drop, [`SecureBytes::release`]
//! or being moved out with [`SecureBytes::take`]. It is deliberately not
//! `Clone`.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

#[derive(Default, Zeroize, ZeroizeOnDrop)]
pub struct SecureBytes {
    data: Vec<u8>,
}

impl SecureBytes {
    /// Allocate `size` zeroed bytes.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0u8; size],
        }
    }

    /// Copy `bytes` into a fresh secure buffer.
    pub fn from_slice(bytes: &[u8]) -> Self {
        let mut buf = Self::new(bytes.len());
        buf.data.copy_from_slice(bytes);
        buf
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True for a zero-length buffer, including one that was moved out of
    /// or released.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Move the contents out, leaving `self` empty.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Zero and free the contents now rather than at drop.
    pub fn release(&mut self) {
        self.data.zeroize();
        self.data = Vec::new();
    }
}

impl fmt::Debug for SecureBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecureBytes([REDACTED; {}])", self.data.len())
    }
}
