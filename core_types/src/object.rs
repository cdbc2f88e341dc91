//! Kernel object references
//!
//! The kernel object hierarchy itself (events, sessions, mutexes and their
//! behaviors) lives in `sim_kernel`; this module only defines the capability
//! surface the marshaling layer needs: shared ownership and identity
//! comparison.

use crate::ids::ObjectId;
use std::fmt;
use std::sync::Arc;

/// A kernel object that can be referenced through handle tables.
///
/// Implementations are concrete object kinds, not a deep hierarchy: the
/// marshaling layer never downcasts, it only moves and copies references.
pub trait KernelObject: fmt::Debug + Send + Sync {
    /// Returns the debugging identity of this object
    fn object_id(&self) -> ObjectId;

    /// Returns the object kind name (e.g. `"event"`)
    fn type_name(&self) -> &'static str;
}

/// A shared-ownership reference to a kernel object.
///
/// Multiple handles (in the same or different tables) may hold references to
/// one object; the object is dropped when the last reference goes away.
pub type ObjectRef = Arc<dyn KernelObject>;

/// Checks whether two references point at the same kernel object.
///
/// Identity is pointer identity, not structural equality: two distinct
/// events with identical state are still different objects.
pub fn same_object(a: &ObjectRef, b: &ObjectRef) -> bool {
    Arc::ptr_eq(a, b)
}
