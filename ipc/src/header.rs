//! Command header codec
//!
//! Word 0 of every command buffer packs the command id and the two region
//! lengths: `command_id:16 | normal_params:6 | translate_params:6`.

use crate::error::WireError;
use crate::COMMAND_BUFFER_WORDS;

const PARAM_FIELD_MAX: u8 = 0x3F;

/// Decoded command header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Service-defined command tag
    pub command_id: u16,
    /// Number of plain data words following the header
    pub normal_params: u8,
    /// Number of words in the translate region
    pub translate_params: u8,
}

impl Header {
    /// Creates a header from its fields
    pub fn new(command_id: u16, normal_params: u8, translate_params: u8) -> Self {
        Self {
            command_id,
            normal_params,
            translate_params,
        }
    }

    /// Packs this header into its wire word.
    ///
    /// Fails when either count exceeds its 6-bit field; a header that packs
    /// successfully can still declare more words than a buffer holds, which
    /// is the caller's bound check (see [`Header::total_words`]).
    pub fn encode(&self) -> Result<u32, WireError> {
        if self.normal_params > PARAM_FIELD_MAX {
            return Err(WireError::CountOutOfRange {
                count: self.normal_params as usize,
            });
        }
        if self.translate_params > PARAM_FIELD_MAX {
            return Err(WireError::CountOutOfRange {
                count: self.translate_params as usize,
            });
        }
        Ok((self.command_id as u32) << 16
            | (self.normal_params as u32) << 6
            | self.translate_params as u32)
    }

    /// Unpacks a header word.
    ///
    /// Pure bit extraction: malformed counts are surfaced by
    /// [`Header::validate`], not here.
    pub fn decode(word: u32) -> Self {
        Self {
            command_id: (word >> 16) as u16,
            normal_params: ((word >> 6) & PARAM_FIELD_MAX as u32) as u8,
            translate_params: (word & PARAM_FIELD_MAX as u32) as u8,
        }
    }

    /// Total words this header claims: itself plus both regions
    pub fn total_words(&self) -> usize {
        1 + self.normal_params as usize + self.translate_params as usize
    }

    /// Checks the declared regions against a buffer capacity.
    ///
    /// `capacity` is normally [`COMMAND_BUFFER_WORDS`] but may be smaller
    /// when the caller only has a partial view of the raw words.
    pub fn validate(&self, capacity: usize) -> Result<(), WireError> {
        if self.total_words() > capacity.min(COMMAND_BUFFER_WORDS) {
            return Err(WireError::MalformedHeader {
                normal: self.normal_params as usize,
                translate: self.translate_params as usize,
                capacity: capacity.min(COMMAND_BUFFER_WORDS),
            });
        }
        Ok(())
    }
}
