//! Descriptor word codec
//!
//! Each word in the translate region either is a descriptor or belongs to
//! the payload of the descriptor before it. The low nibble distinguishes
//! buffer descriptors; for handle-family descriptors (low nibble zero) bits
//! 4 and 5 select move and calling-pid, and bits 26..32 carry `count - 1`.
//! Static buffer descriptors carry the buffer id in bits 10..14 and the size
//! from bit 14 up.

use crate::error::WireError;
use crate::MAX_STATIC_BUFFERS;

const BUFFER_TAG_MASK: u32 = 0xF;
const STATIC_BUFFER_TAG: u32 = 0x2;
const MOVE_FLAG: u32 = 0x10;
const CALLING_PID_FLAG: u32 = 0x20;

const HANDLE_COUNT_SHIFT: u32 = 26;
const BUFFER_ID_SHIFT: u32 = 10;
const BUFFER_SIZE_SHIFT: u32 = 14;

/// Largest handle count one descriptor can carry (`count - 1` in 6 bits)
pub const MAX_HANDLES_PER_DESCRIPTOR: usize = 64;

/// Largest size the static buffer descriptor field can express
pub const MAX_ENCODABLE_BUFFER_SIZE: usize = (u32::MAX >> BUFFER_SIZE_SHIFT) as usize;

/// A decoded translate-region descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Descriptor {
    /// Transfer ownership of the next `count` handles
    MoveHandles { count: usize },
    /// Share ownership of the next `count` handles
    CopyHandles { count: usize },
    /// Inject the calling process id over the next word
    CallingPid,
    /// Transfer `size` out-of-band bytes for buffer slot `buffer_id`;
    /// the next word is a virtual address
    StaticBuffer { size: usize, buffer_id: u8 },
}

impl Descriptor {
    /// Packs this descriptor into its wire word
    pub fn encode(&self) -> Result<u32, WireError> {
        match *self {
            Descriptor::MoveHandles { count } => Ok(MOVE_FLAG | encode_handle_count(count)?),
            Descriptor::CopyHandles { count } => encode_handle_count(count),
            Descriptor::CallingPid => Ok(CALLING_PID_FLAG),
            Descriptor::StaticBuffer { size, buffer_id } => {
                if buffer_id as usize >= MAX_STATIC_BUFFERS {
                    return Err(WireError::InvalidBufferId { id: buffer_id });
                }
                if size > MAX_ENCODABLE_BUFFER_SIZE {
                    return Err(WireError::SizeOutOfRange { size });
                }
                Ok(STATIC_BUFFER_TAG
                    | (size as u32) << BUFFER_SIZE_SHIFT
                    | (buffer_id as u32) << BUFFER_ID_SHIFT)
            }
        }
    }

    /// Unpacks a descriptor word.
    ///
    /// Descriptor families this layer does not translate (the guest's mapped
    /// read/write buffers among them) are rejected explicitly so a request
    /// carrying them fails instead of being misparsed.
    pub fn decode(word: u32) -> Result<Self, WireError> {
        match word & BUFFER_TAG_MASK {
            0 => {
                let count = (word >> HANDLE_COUNT_SHIFT) as usize + 1;
                if word & MOVE_FLAG != 0 {
                    Ok(Descriptor::MoveHandles { count })
                } else if word & CALLING_PID_FLAG != 0 {
                    Ok(Descriptor::CallingPid)
                } else {
                    Ok(Descriptor::CopyHandles { count })
                }
            }
            STATIC_BUFFER_TAG => Ok(Descriptor::StaticBuffer {
                size: (word >> BUFFER_SIZE_SHIFT) as usize,
                buffer_id: ((word >> BUFFER_ID_SHIFT) & 0xF) as u8,
            }),
            _ => Err(WireError::UnsupportedDescriptor { word }),
        }
    }

    /// Number of payload words following this descriptor
    pub fn payload_words(&self) -> usize {
        match *self {
            Descriptor::MoveHandles { count } | Descriptor::CopyHandles { count } => count,
            Descriptor::CallingPid => 1,
            Descriptor::StaticBuffer { .. } => 1,
        }
    }
}

fn encode_handle_count(count: usize) -> Result<u32, WireError> {
    if count == 0 || count > MAX_HANDLES_PER_DESCRIPTOR {
        return Err(WireError::CountOutOfRange { count });
    }
    Ok(((count - 1) as u32) << HANDLE_COUNT_SHIFT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_handle_golden_words() {
        assert_eq!(
            Descriptor::MoveHandles { count: 1 }.encode().unwrap(),
            0x10
        );
        assert_eq!(Descriptor::CopyHandles { count: 1 }.encode().unwrap(), 0x0);
        assert_eq!(Descriptor::CallingPid.encode().unwrap(), 0x20);
    }

    #[test]
    fn test_zero_word_is_a_single_copy_descriptor() {
        // A zero word in the translate region reads as CopyHandles{1};
        // the parser relies on this when walking canonical buffers.
        assert_eq!(
            Descriptor::decode(0).unwrap(),
            Descriptor::CopyHandles { count: 1 }
        );
    }

    #[test]
    fn test_handle_count_roundtrip() {
        for count in [1usize, 2, 3, 63, 64] {
            for descriptor in [
                Descriptor::MoveHandles { count },
                Descriptor::CopyHandles { count },
            ] {
                let word = descriptor.encode().unwrap();
                assert_eq!(Descriptor::decode(word).unwrap(), descriptor);
            }
        }
    }

    #[test]
    fn test_handle_count_bounds() {
        assert_eq!(
            Descriptor::MoveHandles { count: 0 }.encode(),
            Err(WireError::CountOutOfRange { count: 0 })
        );
        assert_eq!(
            Descriptor::CopyHandles { count: 65 }.encode(),
            Err(WireError::CountOutOfRange { count: 65 })
        );
    }

    #[test]
    fn test_static_buffer_roundtrip() {
        for (size, buffer_id) in [(0usize, 0u8), (1, 1), (0x1000, 3), (0x3FFFF, 2)] {
            let descriptor = Descriptor::StaticBuffer { size, buffer_id };
            let word = descriptor.encode().unwrap();
            assert_eq!(Descriptor::decode(word).unwrap(), descriptor);
        }
    }

    #[test]
    fn test_static_buffer_field_layout() {
        let word = Descriptor::StaticBuffer {
            size: 0x1000,
            buffer_id: 1,
        }
        .encode()
        .unwrap();
        assert_eq!(word, 0x2 | 0x1000 << 14 | 1 << 10);
    }

    #[test]
    fn test_static_buffer_encode_bounds() {
        assert_eq!(
            Descriptor::StaticBuffer {
                size: 0,
                buffer_id: 4
            }
            .encode(),
            Err(WireError::InvalidBufferId { id: 4 })
        );
    }

    #[test]
    fn test_unsupported_families_rejected() {
        // Mapped read/write buffer tags (and the guest's other buffer
        // families) must fail loudly.
        for word in [0x4u32, 0x8, 0xA, 0xC, 0xE] {
            assert_eq!(
                Descriptor::decode(word),
                Err(WireError::UnsupportedDescriptor { word })
            );
        }
    }

    #[test]
    fn test_payload_words() {
        assert_eq!(Descriptor::MoveHandles { count: 3 }.payload_words(), 3);
        assert_eq!(Descriptor::CopyHandles { count: 1 }.payload_words(), 1);
        assert_eq!(Descriptor::CallingPid.payload_words(), 1);
        assert_eq!(
            Descriptor::StaticBuffer {
                size: 64,
                buffer_id: 0
            }
            .payload_words(),
            1
        );
    }
}
