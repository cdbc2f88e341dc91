//! # Core Types
//!
//! This crate defines the fundamental types used throughout Mirage.
//!
//! ## Philosophy
//!
//! Core types are designed with these principles:
//! - **Explicit over implicit**: Handles, process ids and object references
//!   are distinct types and cannot be confused.
//! - **Type safety first**: Ownership transfer of kernel objects is expressed
//!   through the type system, not by convention.
//! - **No ambient authority**: Resolving a handle requires the handle table
//!   it was issued by.
//!
//! ## Key Types
//!
//! - [`Handle`]: An opaque 32-bit guest handle value
//! - [`ProcessId`]: Stable numeric identifier for a guest process
//! - [`ObjectId`]: Debugging identity for a kernel object
//! - [`KernelObject`] / [`ObjectRef`]: Shared-ownership kernel object references
//! - [`MemoryError`]: Errors raised by virtual memory accessors

pub mod handle;
pub mod ids;
pub mod memory;
pub mod object;

pub use handle::Handle;
pub use ids::{ObjectId, ProcessId};
pub use memory::{MemoryError, VAddr, PAGE_SIZE};
pub use object::{same_object, KernelObject, ObjectRef};
