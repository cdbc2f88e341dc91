//! # Request/Response Translation Engine
//!
//! This crate marshals guest IPC requests at the host level. When a guest
//! process invokes a service, its raw command buffer is translated into a
//! [`RequestContext`]: handles become owned object references, static buffer
//! payloads are pulled out of guest memory, and the calling pid is injected
//! over whatever the client claimed. After the service handler runs, the
//! context serializes the reply back into a target process's command buffer,
//! handle table and address space.
//!
//! ## Philosophy
//!
//! - **Ownership is enforced, not conventional**: A moved handle leaves the
//!   source table before the handler ever runs; the type system makes
//!   use-after-move of the table entry impossible rather than merely wrong.
//! - **Collaborators are arguments**: Handle tables and processes are passed
//!   into every operation that touches them. Nothing here reaches for
//!   ambient state, so every path is testable single-threaded.
//! - **One request, one context**: A [`RequestContext`] lives from request
//!   arrival to reply serialization and is never reused or shared.

pub mod context;
pub mod error;
pub mod static_buffer;
mod translate;

pub use context::{RequestContext, RequestState};
pub use error::IpcError;
pub use static_buffer::{ReplyTarget, ReplyTargets, StaticBufferStore};
