//! Concrete kernel object kinds
//!
//! Only as much of the object hierarchy as handle translation needs: each
//! kind is a plain struct behind [`KernelObject`], constructed directly into
//! an [`ObjectRef`]. Signaling, waiting and locking behaviors are out of
//! scope.

use core_types::{KernelObject, ObjectId, ObjectRef};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Reset behavior of an event object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetType {
    /// Cleared automatically after waking one waiter
    OneShot,
    /// Stays signaled until cleared explicitly
    Sticky,
}

/// A guest event object
#[derive(Debug)]
pub struct Event {
    id: ObjectId,
    reset_type: ResetType,
}

impl Event {
    /// Creates an event behind a shared reference
    pub fn create(reset_type: ResetType) -> ObjectRef {
        Arc::new(Self {
            id: ObjectId::new(),
            reset_type,
        })
    }

    /// Returns the reset behavior
    pub fn reset_type(&self) -> ResetType {
        self.reset_type
    }
}

impl KernelObject for Event {
    fn object_id(&self) -> ObjectId {
        self.id
    }

    fn type_name(&self) -> &'static str {
        "event"
    }
}

/// A guest mutex object
#[derive(Debug)]
pub struct Mutex {
    id: ObjectId,
}

impl Mutex {
    /// Creates a mutex behind a shared reference
    pub fn create() -> ObjectRef {
        Arc::new(Self { id: ObjectId::new() })
    }
}

impl KernelObject for Mutex {
    fn object_id(&self) -> ObjectId {
        self.id
    }

    fn type_name(&self) -> &'static str {
        "mutex"
    }
}
