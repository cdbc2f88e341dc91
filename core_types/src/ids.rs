//! Unique identifiers for system entities

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable numeric identifier for a guest process.
///
/// Unlike the other identifiers in this crate, process ids are visible on the
/// wire: the CallingPid descriptor injects them into command buffers, so they
/// are plain integers of the width the protocol dictates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcessId(u32);

impl ProcessId {
    /// Creates a process ID from its raw numeric value
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric value
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Process({})", self.0)
    }
}

/// Debugging identity for a kernel object.
///
/// Object ids never appear in command buffers; they exist so audit events and
/// diagnostics can name an object without holding a reference to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(Uuid);

impl ObjectId {
    /// Creates a new random object ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an object ID from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_id_roundtrip() {
        let id = ProcessId::new(42);
        assert_eq!(id.raw(), 42);
    }

    #[test]
    fn test_process_id_display() {
        let id = ProcessId::new(7);
        assert_eq!(id.to_string(), "Process(7)");
    }

    #[test]
    fn test_object_id_unique() {
        let id1 = ObjectId::new();
        let id2 = ObjectId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_object_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = ObjectId::from_uuid(uuid);
        assert_eq!(id.as_uuid(), uuid);
    }

    #[test]
    fn test_object_id_display() {
        let id = ObjectId::new();
        let display = format!("{}", id);
        assert!(display.starts_with("Object("));
    }

    #[test]
    fn test_process_id_serializes_as_raw_number() {
        // Wire-visible ids must serialize as their numeric value, nothing more.
        let json = serde_json::to_string(&ProcessId::new(17)).unwrap();
        assert_eq!(json, "17");

        let back: ProcessId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ProcessId::new(17));
    }
}
