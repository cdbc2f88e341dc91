//! Marshaling errors

use core_types::MemoryError;
use ipc::WireError;
use sim_kernel::HandleError;
use thiserror::Error;

/// Errors surfaced by request population and reply serialization.
///
/// Stale handles never appear here: they resolve to "no object" during
/// translation, per the platform convention. Everything else is an explicit
/// result the session layer decides how to report to the guest.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IpcError {
    /// Malformed or out-of-scope wire data
    #[error(transparent)]
    Wire(#[from] WireError),

    /// A static buffer address was not backed by mapped memory
    #[error(transparent)]
    Memory(#[from] MemoryError),

    /// The target handle table could not allocate an outgoing handle
    #[error(transparent)]
    Handles(#[from] HandleError),

    /// The semantic buffer names an outgoing handle token that was never
    /// staged via `add_outgoing_handle`
    #[error("outgoing handle token {token} was never staged")]
    UnknownHandleToken { token: u32 },
}
