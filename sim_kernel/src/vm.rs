//! Simulated virtual address space
//!
//! Byte-level read/write against page-aligned mapped blocks. This models the
//! only contract the marshaling layer consumes from the guest's memory
//! manager: map, unmap, and bounds-checked access. Paging, permissions and
//! sharing stay out of scope.

use core_types::{MemoryError, VAddr, PAGE_SIZE};
use std::collections::BTreeMap;

/// A guest process's simulated address space.
///
/// Blocks are non-overlapping and page-aligned. An access must fall entirely
/// inside one mapped block; ranges touching a gap fail with
/// [`MemoryError::Unmapped`].
#[derive(Debug, Default)]
pub struct VmSpace {
    blocks: BTreeMap<VAddr, Vec<u8>>,
}

impl VmSpace {
    /// Creates a new empty address space
    pub fn new() -> Self {
        Self {
            blocks: BTreeMap::new(),
        }
    }

    /// Maps `bytes` at `address`.
    ///
    /// The address must be page-aligned and the new block must not overlap
    /// any existing one.
    pub fn map_block(&mut self, address: VAddr, bytes: Vec<u8>) -> Result<(), MemoryError> {
        if address as usize % PAGE_SIZE != 0 {
            return Err(MemoryError::Misaligned { address });
        }
        let end = address as u64 + bytes.len() as u64;
        if let Some((&prev_start, prev)) = self.blocks.range(..=address).next_back() {
            if prev_start as u64 + prev.len() as u64 > address as u64 {
                return Err(MemoryError::Overlap { address });
            }
        }
        if let Some((&next_start, _)) = self.blocks.range(address..).next() {
            if (next_start as u64) < end {
                return Err(MemoryError::Overlap { address });
            }
        }
        self.blocks.insert(address, bytes);
        Ok(())
    }

    /// Unmaps the block mapped at exactly `address`, returning its bytes
    pub fn unmap_block(&mut self, address: VAddr) -> Result<Vec<u8>, MemoryError> {
        self.blocks
            .remove(&address)
            .ok_or(MemoryError::Unmapped { address, len: 0 })
    }

    /// Reads `len` bytes starting at `address`
    pub fn read_bytes(&self, address: VAddr, len: usize) -> Result<Vec<u8>, MemoryError> {
        if len == 0 {
            return Ok(Vec::new());
        }
        let (block_start, block) = self.locate(address, len)?;
        let offset = (address - block_start) as usize;
        Ok(block[offset..offset + len].to_vec())
    }

    /// Writes `bytes` starting at `address`
    pub fn write_bytes(&mut self, address: VAddr, bytes: &[u8]) -> Result<(), MemoryError> {
        if bytes.is_empty() {
            return Ok(());
        }
        let (block_start, _) = self.locate(address, bytes.len())?;
        let offset = (address - block_start) as usize;
        // locate() proved containment, so the entry and range both exist.
        if let Some(block) = self.blocks.get_mut(&block_start) {
            block[offset..offset + bytes.len()].copy_from_slice(bytes);
        }
        Ok(())
    }

    /// Checks whether the whole range is mapped
    pub fn is_mapped(&self, address: VAddr, len: usize) -> bool {
        len == 0 || self.locate(address, len).is_ok()
    }

    /// Finds the block containing `[address, address + len)`
    fn locate(&self, address: VAddr, len: usize) -> Result<(VAddr, &Vec<u8>), MemoryError> {
        let unmapped = MemoryError::Unmapped { address, len };
        let (&start, block) = self
            .blocks
            .range(..=address)
            .next_back()
            .ok_or(unmapped.clone())?;
        let end = address as u64 + len as u64;
        if start as u64 + (block.len() as u64) < end {
            return Err(unmapped);
        }
        Ok((start, block))
    }
}
