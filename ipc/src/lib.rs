//! # Command Buffer Wire Format
//!
//! This crate defines the guest's fixed-size command-buffer protocol: the
//! packed header word and the descriptor words of the translate region.
//!
//! ## Philosophy
//!
//! - **Pure codec, no side effects**: Everything here maps between 32-bit
//!   words and typed values. Handle tables, address spaces and request state
//!   live elsewhere.
//! - **Internally consistent**: Encode and decode share one set of tag
//!   constants; golden tests in `contract_tests` pin the observable words.
//! - **Reject, don't skip**: Descriptor families this layer does not
//!   translate decode to an explicit error, never to silent consumption.
//!
//! ## Buffer Layout
//!
//! A command buffer is [`COMMAND_BUFFER_WORDS`] 32-bit words. Word 0 is the
//! [`Header`]; the next `normal_params` words are plain data; the following
//! `translate_params` words are the translate region, a sequence of
//! [`Descriptor`] words each followed by its payload words. A reply buffer
//! additionally carries a small side-channel region beyond the logical
//! buffer, declaring where incoming static buffers must land.

pub mod descriptor;
pub mod error;
pub mod header;

pub use descriptor::Descriptor;
pub use error::WireError;
pub use header::Header;

/// Length of a command buffer in 32-bit words
pub const COMMAND_BUFFER_WORDS: usize = 64;

/// Number of static buffer slots a request context can carry
pub const MAX_STATIC_BUFFERS: usize = 4;

/// Transfer ceiling for a single static buffer, in bytes
pub const MAX_STATIC_BUFFER_BYTES: usize = core_types::PAGE_SIZE;
