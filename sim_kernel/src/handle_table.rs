//! Generation-checked handle table
//!
//! Maps guest handle values to kernel object references. A handle packs a
//! slot index and a 15-bit generation; a lookup only succeeds while the
//! slot's generation matches, so a handle left over from a closed slot can
//! never resolve to whatever object reuses that slot later.

use core_types::{Handle, ObjectId, ObjectRef};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of live handles per table
pub const MAX_HANDLES: usize = 4096;

const GENERATION_BITS: u32 = 15;
const GENERATION_MASK: u32 = (1 << GENERATION_BITS) - 1;

/// Handle table errors.
///
/// A stale or unknown handle is only an error for `close`; lookups resolve
/// it to "no object" per the platform convention.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HandleError {
    #[error("handle table is full ({MAX_HANDLES} live handles)")]
    TableFull,

    #[error("{handle} does not name a live object")]
    NotFound { handle: Handle },
}

/// Handle table audit events (test-only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandleTableEvent {
    /// A handle was allocated for an object
    Created { handle: Handle, object: ObjectId },
    /// A handle was closed and its slot freed
    Closed { handle: Handle, object: ObjectId },
}

/// Audit log for handle table operations
#[derive(Debug, Clone, Default)]
pub struct HandleAuditLog {
    events: Vec<HandleTableEvent>,
}

impl HandleAuditLog {
    /// Creates a new empty audit log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Records an event
    pub fn record(&mut self, event: HandleTableEvent) {
        self.events.push(event);
    }

    /// Returns all recorded events
    pub fn events(&self) -> &[HandleTableEvent] {
        &self.events
    }

    /// Clears all events
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Checks if an event matching the predicate exists
    pub fn has_event<F>(&self, predicate: F) -> bool
    where
        F: Fn(&HandleTableEvent) -> bool,
    {
        self.events.iter().any(predicate)
    }

    /// Counts events matching the predicate
    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&HandleTableEvent) -> bool,
    {
        self.events.iter().filter(|e| predicate(e)).count()
    }
}

#[derive(Debug)]
struct Slot {
    object: Option<ObjectRef>,
    generation: u16,
}

/// A process's handle table.
///
/// Multiple handles may reference the same underlying object; the table does
/// not dedupe. Slots are recycled through a free list, with the per-create
/// generation counter guarding against stale handles.
#[derive(Debug)]
pub struct HandleTable {
    slots: Vec<Slot>,
    free_slots: Vec<u16>,
    next_generation: u16,
    audit_log: HandleAuditLog,
}

impl Default for HandleTable {
    fn default() -> Self {
        Self::new()
    }
}

impl HandleTable {
    /// Creates a new empty handle table
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_slots: Vec::new(),
            next_generation: 1,
            audit_log: HandleAuditLog::new(),
        }
    }

    /// Allocates a fresh handle for `object`.
    ///
    /// The same object may be inserted any number of times; each call yields
    /// a distinct handle.
    pub fn create(&mut self, object: ObjectRef) -> Result<Handle, HandleError> {
        let slot_index = match self.free_slots.pop() {
            Some(index) => index,
            None => {
                if self.slots.len() >= MAX_HANDLES {
                    return Err(HandleError::TableFull);
                }
                self.slots.push(Slot {
                    object: None,
                    generation: 0,
                });
                (self.slots.len() - 1) as u16
            }
        };

        let generation = self.next_generation;
        // Generation 0 is never issued, so a zeroed word cannot pass the
        // generation check.
        self.next_generation = if generation == GENERATION_MASK as u16 {
            1
        } else {
            generation + 1
        };

        let object_id = object.object_id();
        let slot = &mut self.slots[slot_index as usize];
        slot.object = Some(object);
        slot.generation = generation;

        let handle = Handle::from_raw((slot_index as u32) << GENERATION_BITS | generation as u32);
        self.audit_log.record(HandleTableEvent::Created {
            handle,
            object: object_id,
        });
        Ok(handle)
    }

    /// Resolves a handle to its object.
    ///
    /// Returns `None` for the null handle, an unknown slot, or a stale
    /// generation. Never fails: staleness is not an error at lookup time.
    pub fn get(&self, handle: Handle) -> Option<ObjectRef> {
        let slot = self.resolve(handle)?;
        self.slots[slot as usize].object.clone()
    }

    /// Closes a handle, freeing its slot.
    ///
    /// The object reference held by the slot is dropped; the object itself
    /// lives on while other references exist.
    pub fn close(&mut self, handle: Handle) -> Result<(), HandleError> {
        let slot_index = self
            .resolve(handle)
            .ok_or(HandleError::NotFound { handle })?;
        let slot = &mut self.slots[slot_index as usize];
        let object = slot.object.take().ok_or(HandleError::NotFound { handle })?;
        slot.generation = 0;
        self.free_slots.push(slot_index);
        self.audit_log.record(HandleTableEvent::Closed {
            handle,
            object: object.object_id(),
        });
        Ok(())
    }

    /// Number of live handles
    pub fn active_handles(&self) -> usize {
        self.slots.iter().filter(|s| s.object.is_some()).count()
    }

    /// Returns the audit log (test-only)
    pub fn audit_log(&self) -> &HandleAuditLog {
        &self.audit_log
    }

    /// Clears the audit log (test-only)
    pub fn clear_audit_log(&mut self) {
        self.audit_log.clear();
    }

    /// Maps a handle to its slot index if it names a live entry
    fn resolve(&self, handle: Handle) -> Option<u16> {
        if handle.is_null() {
            return None;
        }
        let raw = handle.raw();
        let slot_index = (raw >> GENERATION_BITS) as usize;
        let generation = (raw & GENERATION_MASK) as u16;
        let slot = self.slots.get(slot_index)?;
        if generation == 0 || slot.generation != generation || slot.object.is_none() {
            return None;
        }
        Some(slot_index as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{Event, ResetType};
    use core_types::same_object;

    fn make_object() -> ObjectRef {
        Event::create(ResetType::OneShot)
    }

    #[test]
    fn test_create_and_get() {
        let mut table = HandleTable::new();
        let object = make_object();

        let handle = table.create(object.clone()).unwrap();
        assert!(!handle.is_null());

        let resolved = table.get(handle).unwrap();
        assert!(same_object(&resolved, &object));
        assert_eq!(table.active_handles(), 1);
    }

    #[test]
    fn test_null_handle_never_resolves() {
        let table = HandleTable::new();
        assert!(table.get(Handle::NULL).is_none());
    }

    #[test]
    fn test_close_invalidates() {
        let mut table = HandleTable::new();
        let handle = table.create(make_object()).unwrap();

        table.close(handle).unwrap();

        assert!(table.get(handle).is_none());
        assert_eq!(table.active_handles(), 0);
        assert_eq!(
            table.close(handle),
            Err(HandleError::NotFound { handle })
        );
    }

    #[test]
    fn test_stale_handle_after_slot_reuse() {
        let mut table = HandleTable::new();
        let old_handle = table.create(make_object()).unwrap();
        table.close(old_handle).unwrap();

        // The freed slot is recycled with a new generation; the old handle
        // must not resolve to the new occupant.
        let new_handle = table.create(make_object()).unwrap();
        assert_ne!(old_handle, new_handle);
        assert!(table.get(old_handle).is_none());
        assert!(table.get(new_handle).is_some());
    }

    #[test]
    fn test_same_object_multiple_handles() {
        let mut table = HandleTable::new();
        let object = make_object();

        let first = table.create(object.clone()).unwrap();
        let second = table.create(object.clone()).unwrap();
        assert_ne!(first, second);

        let a = table.get(first).unwrap();
        let b = table.get(second).unwrap();
        assert!(same_object(&a, &b));

        // Closing one handle leaves the other resolvable.
        table.close(first).unwrap();
        assert!(table.get(second).is_some());
    }

    #[test]
    fn test_table_full() {
        let mut table = HandleTable::new();
        let object = make_object();
        for _ in 0..MAX_HANDLES {
            table.create(object.clone()).unwrap();
        }
        assert_eq!(table.create(object.clone()), Err(HandleError::TableFull));
    }

    #[test]
    fn test_audit_events() {
        let mut table = HandleTable::new();
        let object = make_object();
        let object_id = object.object_id();

        let handle = table.create(object).unwrap();
        table.close(handle).unwrap();

        assert_eq!(table.audit_log().events().len(), 2);
        assert!(table.audit_log().has_event(|e| matches!(
            e,
            HandleTableEvent::Created { object, .. } if *object == object_id
        )));
        assert!(table
            .audit_log()
            .has_event(|e| matches!(e, HandleTableEvent::Closed { .. })));

        table.clear_audit_log();
        assert!(table.audit_log().events().is_empty());
    }

    #[test]
    fn test_audit_event_shape_is_stable() {
        let mut table = HandleTable::new();
        let handle = table.create(make_object()).unwrap();

        let json = serde_json::to_value(table.audit_log().events()).unwrap();
        let created = &json[0]["Created"];
        assert_eq!(created["handle"], handle.raw());
        assert!(created["object"].is_string());
    }
}
