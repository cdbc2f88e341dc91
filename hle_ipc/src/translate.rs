//! Handle translation
//!
//! The two directions are deliberately asymmetric. Incoming translation
//! resolves guest handle values against the caller's table, either taking
//! the table entry (move) or sharing it (copy). Outgoing translation always
//! allocates a fresh handle in the target table; whether the *receiver*
//! later moves or copies it is encoded in the descriptor word, not decided
//! here.

use core_types::{Handle, ObjectRef};
use sim_kernel::{HandleError, HandleTable};

/// Ownership mode of an incoming handle descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Ownership {
    /// The table entry is closed; the context becomes the sole holder
    Move,
    /// The table entry stays live alongside the context's reference
    Copy,
}

/// Resolves one incoming handle value.
///
/// Null handles and stale handles both translate to "no object"; a stale
/// handle is not a request failure. On a move hit the source table entry is
/// closed before returning.
pub(crate) fn resolve_incoming(
    handle: Handle,
    table: &mut HandleTable,
    ownership: Ownership,
) -> Option<ObjectRef> {
    if handle.is_null() {
        return None;
    }
    let object = table.get(handle)?;
    if ownership == Ownership::Move {
        // The lookup above just resolved this handle, so the close cannot
        // miss; the entry is gone either way.
        let _ = table.close(handle);
    }
    Some(object)
}

/// Allocates a handle in the target table for one outgoing reference.
///
/// "No object" serializes to the null handle without touching the table.
pub(crate) fn allocate_outgoing(
    object: Option<&ObjectRef>,
    table: &mut HandleTable,
) -> Result<Handle, HandleError> {
    match object {
        None => Ok(Handle::NULL),
        Some(object) => table.create(object.clone()),
    }
}
