//! Channel role.

use std::fmt;

/// Which half of the key-exchange formula a channel applies.
///
/// Fixed for the life of a channel. Two correctly paired channels must
/// hold opposite roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The connecting side (client).
    Initiator,
    /// The accepting side (host).
    Responder,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initiator => write!(f, "initiator"),
            Self::Responder => write!(f, "responder"),
        }
    }
}
