//! Static buffer transfer
//!
//! Static buffers travel out-of-band: the descriptor word in the command
//! buffer names a slot and a size, and the payload word is a virtual address
//! in the sending process. On the reply path the *receiver* controls where
//! payloads land: it declares one descriptor/address pair per slot in a
//! side-channel region just beyond the logical command buffer, and the
//! serializer honors those declarations instead of choosing addresses
//! itself.

use core_types::VAddr;
use ipc::{Descriptor, WireError, COMMAND_BUFFER_WORDS, MAX_STATIC_BUFFERS, MAX_STATIC_BUFFER_BYTES};

/// Per-request store of static buffer payloads, keyed by slot id
#[derive(Debug, Default)]
pub struct StaticBufferStore {
    buffers: [Vec<u8>; MAX_STATIC_BUFFERS],
}

impl StaticBufferStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages `bytes` under `buffer_id`, replacing any previous payload
    pub fn insert(&mut self, buffer_id: u8, bytes: Vec<u8>) -> Result<(), WireError> {
        if bytes.len() > MAX_STATIC_BUFFER_BYTES {
            return Err(WireError::BufferTooLarge {
                size: bytes.len(),
                limit: MAX_STATIC_BUFFER_BYTES,
            });
        }
        let slot = self.slot_mut(buffer_id)?;
        *slot = bytes;
        Ok(())
    }

    /// Returns the payload staged under `buffer_id` (empty if none)
    pub fn get(&self, buffer_id: u8) -> Result<&[u8], WireError> {
        if buffer_id as usize >= MAX_STATIC_BUFFERS {
            return Err(WireError::InvalidBufferId { id: buffer_id });
        }
        Ok(&self.buffers[buffer_id as usize])
    }

    fn slot_mut(&mut self, buffer_id: u8) -> Result<&mut Vec<u8>, WireError> {
        if buffer_id as usize >= MAX_STATIC_BUFFERS {
            return Err(WireError::InvalidBufferId { id: buffer_id });
        }
        Ok(&mut self.buffers[buffer_id as usize])
    }
}

/// One receiver-declared reply target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyTarget {
    /// The receiver's own descriptor word, copied verbatim into the output
    pub descriptor_word: u32,
    /// Where the payload must be written in the receiver's address space
    pub address: VAddr,
    /// Capacity the receiver declared for this slot, in bytes
    pub capacity: usize,
}

/// The side-channel declaration region of a reply buffer.
///
/// Two words per slot id, located immediately beyond the logical command
/// buffer: a `StaticBuffer` descriptor and a target address. Captured by
/// value before serialization starts, since the serializer overwrites the
/// same raw buffer.
#[derive(Debug)]
pub struct ReplyTargets {
    words: Vec<u32>,
}

impl ReplyTargets {
    /// Captures the declaration region from a raw reply buffer
    pub fn capture(raw: &[u32]) -> Self {
        let declared = raw
            .get(COMMAND_BUFFER_WORDS..)
            .unwrap_or(&[])
            .iter()
            .take(2 * MAX_STATIC_BUFFERS)
            .copied()
            .collect();
        Self { words: declared }
    }

    /// Looks up the declaration for `buffer_id`.
    ///
    /// Fails when the region is too short, the declared word is not a
    /// `StaticBuffer` descriptor, or it names a different slot.
    pub fn declaration(&self, buffer_id: u8) -> Result<ReplyTarget, WireError> {
        let base = 2 * buffer_id as usize;
        let missing = WireError::MissingReplyTarget { id: buffer_id };
        let descriptor_word = *self.words.get(base).ok_or(missing.clone())?;
        let address = *self.words.get(base + 1).ok_or(missing.clone())?;
        match Descriptor::decode(descriptor_word) {
            Ok(Descriptor::StaticBuffer {
                size,
                buffer_id: declared_id,
            }) if declared_id == buffer_id => Ok(ReplyTarget {
                descriptor_word,
                address,
                capacity: size,
            }),
            _ => Err(missing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_roundtrip() {
        let mut store = StaticBufferStore::new();
        store.insert(1, vec![7, 8, 9]).unwrap();

        assert_eq!(store.get(1).unwrap(), &[7, 8, 9]);
        assert_eq!(store.get(0).unwrap(), &[] as &[u8]);
    }

    #[test]
    fn test_store_replaces_payload() {
        let mut store = StaticBufferStore::new();
        store.insert(0, vec![1]).unwrap();
        store.insert(0, vec![2, 3]).unwrap();
        assert_eq!(store.get(0).unwrap(), &[2, 3]);
    }

    #[test]
    fn test_store_rejects_out_of_range_id() {
        let mut store = StaticBufferStore::new();
        assert_eq!(
            store.insert(4, vec![0]),
            Err(WireError::InvalidBufferId { id: 4 })
        );
        assert_eq!(store.get(9), Err(WireError::InvalidBufferId { id: 9 }));
    }

    #[test]
    fn test_store_enforces_ceiling() {
        let mut store = StaticBufferStore::new();
        assert!(store.insert(0, vec![0; MAX_STATIC_BUFFER_BYTES]).is_ok());
        assert_eq!(
            store.insert(0, vec![0; MAX_STATIC_BUFFER_BYTES + 1]),
            Err(WireError::BufferTooLarge {
                size: MAX_STATIC_BUFFER_BYTES + 1,
                limit: MAX_STATIC_BUFFER_BYTES,
            })
        );
    }

    fn raw_with_declaration(buffer_id: u8, size: usize, address: VAddr) -> Vec<u32> {
        let mut raw = vec![0u32; COMMAND_BUFFER_WORDS + 2 * MAX_STATIC_BUFFERS];
        let base = COMMAND_BUFFER_WORDS + 2 * buffer_id as usize;
        raw[base] = Descriptor::StaticBuffer { size, buffer_id }.encode().unwrap();
        raw[base + 1] = address;
        raw
    }

    #[test]
    fn test_declaration_lookup() {
        let raw = raw_with_declaration(2, 128, 0x1000_0000);
        let targets = ReplyTargets::capture(&raw);

        let target = targets.declaration(2).unwrap();
        assert_eq!(target.address, 0x1000_0000);
        assert_eq!(target.capacity, 128);
        assert_eq!(
            Descriptor::decode(target.descriptor_word).unwrap(),
            Descriptor::StaticBuffer {
                size: 128,
                buffer_id: 2
            }
        );
    }

    #[test]
    fn test_missing_declaration() {
        // A zero word is a copy-handle descriptor, not a static buffer, so
        // an undeclared slot fails the lookup.
        let raw = raw_with_declaration(2, 128, 0x1000_0000);
        let targets = ReplyTargets::capture(&raw);
        assert_eq!(
            targets.declaration(0),
            Err(WireError::MissingReplyTarget { id: 0 })
        );
    }

    #[test]
    fn test_truncated_region() {
        let raw = vec![0u32; COMMAND_BUFFER_WORDS];
        let targets = ReplyTargets::capture(&raw);
        assert_eq!(
            targets.declaration(0),
            Err(WireError::MissingReplyTarget { id: 0 })
        );
    }

    #[test]
    fn test_declaration_for_wrong_slot_rejected() {
        // Slot 1's position declares a descriptor naming slot 0.
        let mut raw = vec![0u32; COMMAND_BUFFER_WORDS + 4];
        raw[COMMAND_BUFFER_WORDS + 2] = Descriptor::StaticBuffer {
            size: 16,
            buffer_id: 0,
        }
        .encode()
        .unwrap();
        raw[COMMAND_BUFFER_WORDS + 3] = 0x2000_0000;

        let targets = ReplyTargets::capture(&raw);
        assert_eq!(
            targets.declaration(1),
            Err(WireError::MissingReplyTarget { id: 1 })
        );
    }
}
