//! # Marshaling Contract Tests
//!
//! This crate provides "golden" tests for the command-buffer protocol to
//! ensure it doesn't drift accidentally over time.
//!
//! ## Philosophy
//!
//! - **Explicit over implicit**: The wire words a guest observes are written
//!   down as constants, not derived from the encoder under test
//! - **Testability first**: Contract tests fail when the protocol changes
//! - **Both directions**: Population and serialization are pinned end to
//!   end, against real handle tables and address spaces
//!
//! ## Structure
//!
//! - [`wire_format`]: Golden header and descriptor words
//! - [`marshaling`]: End-to-end populate/serialize behavior

pub mod marshaling;
pub mod wire_format;

/// Common helpers for building raw command buffers
pub mod test_helpers {
    use ipc::{Descriptor, Header};

    /// Packs a header word, panicking on invalid counts (test input bug)
    pub fn make_header(command_id: u16, normal: u8, translate: u8) -> u32 {
        Header::new(command_id, normal, translate)
            .encode()
            .expect("test header must encode")
    }

    /// Packs a move-handle descriptor word
    pub fn move_handles(count: usize) -> u32 {
        Descriptor::MoveHandles { count }
            .encode()
            .expect("test descriptor must encode")
    }

    /// Packs a copy-handle descriptor word
    pub fn copy_handles(count: usize) -> u32 {
        Descriptor::CopyHandles { count }
            .encode()
            .expect("test descriptor must encode")
    }

    /// Packs a calling-pid descriptor word
    pub fn calling_pid() -> u32 {
        Descriptor::CallingPid
            .encode()
            .expect("test descriptor must encode")
    }

    /// Packs a static-buffer descriptor word
    pub fn static_buffer(size: usize, buffer_id: u8) -> u32 {
        Descriptor::StaticBuffer { size, buffer_id }
            .encode()
            .expect("test descriptor must encode")
    }
}
