//! Process-wide crypto backend initialization.
//!
//! The backend is the OS random source that seeds keypairs and nonces.
//! It is probed once per process; the outcome is cached, so a failed
//! probe keeps failing until the process restarts.

use std::sync::OnceLock;

use rand::rngs::OsRng;
use rand::RngCore;
use tracing::{debug, error};
use zeroize::Zeroizing;

use crate::error::ChannelError;

static BACKEND_READY: OnceLock<bool> = OnceLock::new();

/// Bring the backend up if this is the first call in the process.
///
/// Idempotent and safe to call from any thread.
pub fn ensure_initialized() -> Result<(), ChannelError> {
    initialize_once(&BACKEND_READY, &mut OsRng)
}

/// Whether a previous call already brought the backend up.
pub fn is_initialized() -> bool {
    BACKEND_READY.get().copied().unwrap_or(false)
}

/// Probe `rng` the first time `cell` is consulted; later calls reuse
/// that outcome.
fn initialize_once<R: RngCore>(cell: &OnceLock<bool>, rng: &mut R) -> Result<(), ChannelError> {
    let ready = *cell.get_or_init(|| probe_random_source(rng));
    if ready {
        Ok(())
    } else {
        Err(ChannelError::InitializationError)
    }
}

fn probe_random_source<R: RngCore>(rng: &mut R) -> bool {
    let mut probe = Zeroizing::new([0u8; 32]);
    match rng.try_fill_bytes(probe.as_mut()) {
        Ok(()) => {
            debug!("crypto backend initialized");
            true
        }
        Err(e) => {
            error!(error = %e, "crypto backend initialization failed");
            false
        }
    }
}

/// Fill `dest` from the OS CSPRNG.
pub(crate) fn fill_random(dest: &mut [u8]) -> Result<(), rand::Error> {
    OsRng.try_fill_bytes(dest)
}
