//! # Simulated Kernel
//!
//! This crate provides the simulated kernel collaborators the marshaling
//! layer translates against: handle tables, guest processes and their
//! virtual address spaces, and concrete kernel object kinds.
//!
//! ## Purpose
//!
//! The simulated kernel allows testing marshaling behavior without a guest:
//! - Runs under `cargo test`
//! - Deterministic (no real concurrency, no real MMU)
//! - Fast (address spaces are plain byte blocks)
//! - Inspectable (all state is accessible, table mutations are audited)
//!
//! ## Philosophy
//!
//! **Testability is a first-class design constraint.**
//!
//! Handle tables and address spaces are process-wide shared resources in the
//! guest; here they are plain values passed explicitly to every operation
//! that touches them. No global setup or teardown is ever required to
//! exercise a translation path.

pub mod handle_table;
pub mod objects;
pub mod process;
pub mod test_utils;
pub mod vm;

pub use handle_table::{HandleError, HandleTable, HandleTableEvent};
pub use objects::{Event, Mutex, ResetType};
pub use process::Process;
pub use vm::VmSpace;
