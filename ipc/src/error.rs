//! Wire format errors

use thiserror::Error;

/// Errors raised while encoding or decoding command buffer words
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WireError {
    /// Header counts exceed the buffer capacity
    #[error("header declares {normal} normal + {translate} translate words, exceeding the {capacity}-word buffer")]
    MalformedHeader {
        normal: usize,
        translate: usize,
        capacity: usize,
    },

    /// A descriptor's declared payload runs past the translate region
    #[error("descriptor at word {index} declares {payload} payload words, overrunning the translate region")]
    DescriptorOverrun { index: usize, payload: usize },

    /// A descriptor family this layer does not translate
    #[error("unsupported descriptor word {word:#010x}")]
    UnsupportedDescriptor { word: u32 },

    /// A count does not fit its 6-bit field
    #[error("count {count} does not fit a 6-bit descriptor field")]
    CountOutOfRange { count: usize },

    /// A static buffer size does not fit the descriptor size field
    #[error("static buffer size {size} does not fit the descriptor size field")]
    SizeOutOfRange { size: usize },

    /// A static buffer id outside the slot range
    #[error("static buffer id {id} out of range")]
    InvalidBufferId { id: u8 },

    /// A static buffer above the transfer ceiling
    #[error("static buffer of {size} bytes exceeds the {limit}-byte transfer ceiling")]
    BufferTooLarge { size: usize, limit: usize },

    /// The receiver declared less space than the staged payload needs
    #[error("reply target for static buffer {id} declares {declared} bytes, less than the {staged} staged")]
    ReplyBufferTooSmall {
        id: u8,
        declared: usize,
        staged: usize,
    },

    /// The receiver declared no target for a staged static buffer
    #[error("reply buffer declares no static buffer target for id {id}")]
    MissingReplyTarget { id: u8 },
}
