//! Guest-visible handle values

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque 32-bit handle value as it appears in guest command buffers.
///
/// The value 0 is reserved and always means "no object". Any non-zero value
/// is only meaningful relative to the handle table that issued it; the same
/// raw value resolves to different objects (or nothing) in different tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handle(u32);

impl Handle {
    /// The reserved "no object" handle.
    pub const NULL: Handle = Handle(0);

    /// Wraps a raw guest handle value
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw guest handle value
    pub fn raw(&self) -> u32 {
        self.0
    }

    /// Checks whether this is the reserved null handle
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({:#010x})", self.0)
    }
}
