//! Per-request marshaling context

use crate::error::IpcError;
use crate::static_buffer::{ReplyTargets, StaticBufferStore};
use crate::translate::{self, Ownership};
use core_types::{Handle, ObjectRef};
use ipc::{Descriptor, Header, WireError, COMMAND_BUFFER_WORDS, MAX_STATIC_BUFFER_BYTES};
use sim_kernel::{HandleTable, Process};

/// Lifecycle of a request context.
///
/// Transitions run one way: `Empty → Populated → Serialized` for a request
/// that is answered, or `Empty → Serialized` for a reply the service authors
/// directly into the semantic buffer. A context is single-use either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    /// Freshly created, semantic buffer untranslated
    #[default]
    Empty,
    /// An incoming buffer has been translated into the context
    Populated,
    /// The context has been written out to a target process
    Serialized,
}

/// Marshaling state for one guest IPC request.
///
/// Owns the semantic command buffer, the translated incoming references, the
/// staged outgoing references and the static buffer payloads. Created when a
/// session receives a request, dropped after the reply is written; never
/// shared across threads or reused for a second request.
///
/// Handles moved in from a source table are owned here exclusively: dropping
/// an unconsumed context releases them, and nothing can resolve them through
/// the source table again.
#[derive(Debug)]
pub struct RequestContext {
    command_buffer: [u32; COMMAND_BUFFER_WORDS],
    incoming_handles: Vec<Option<ObjectRef>>,
    outgoing_handles: Vec<Option<ObjectRef>>,
    static_buffers: StaticBufferStore,
    state: RequestState,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestContext {
    /// Creates an empty context
    pub fn new() -> Self {
        Self {
            command_buffer: [0; COMMAND_BUFFER_WORDS],
            incoming_handles: Vec::new(),
            outgoing_handles: Vec::new(),
            static_buffers: StaticBufferStore::new(),
            state: RequestState::Empty,
        }
    }

    /// Returns the lifecycle state
    pub fn state(&self) -> RequestState {
        self.state
    }

    /// Returns the semantic command buffer
    pub fn command_buffer(&self) -> &[u32; COMMAND_BUFFER_WORDS] {
        &self.command_buffer
    }

    /// Returns the semantic command buffer for the service handler to author
    /// its reply into
    pub fn command_buffer_mut(&mut self) -> &mut [u32; COMMAND_BUFFER_WORDS] {
        &mut self.command_buffer
    }

    /// Translates a raw incoming command buffer into this context.
    ///
    /// Normal words are copied verbatim. Handle payload words are replaced
    /// by context-local tokens for [`RequestContext::get_incoming_handle`];
    /// moved handles leave `src_table` immediately. CallingPid payloads are
    /// overwritten with `src_process`'s id no matter what the client sent.
    /// Static buffer payloads are read out of `src_process`'s memory into
    /// the store.
    ///
    /// Population is best-effort: on error, handles and buffers consumed
    /// before the failing word stay translated (and moved table entries stay
    /// closed). There is no rollback; the caller abandons the context.
    pub fn populate_from_incoming_command_buffer(
        &mut self,
        src: &[u32],
        src_process: &Process,
        src_table: &mut HandleTable,
    ) -> Result<(), IpcError> {
        let header = match src.first() {
            Some(&word) => Header::decode(word),
            None => {
                return Err(WireError::MalformedHeader {
                    normal: 0,
                    translate: 0,
                    capacity: 0,
                }
                .into())
            }
        };
        header.validate(src.len())?;

        let normal_end = 1 + header.normal_params as usize;
        let translate_end = header.total_words();
        self.command_buffer[..normal_end].copy_from_slice(&src[..normal_end]);

        let mut index = normal_end;
        while index < translate_end {
            let descriptor_word = src[index];
            let descriptor = Descriptor::decode(descriptor_word)?;
            let payload = descriptor.payload_words();
            if index + 1 + payload > translate_end {
                return Err(WireError::DescriptorOverrun { index, payload }.into());
            }
            self.command_buffer[index] = descriptor_word;
            index += 1;

            match descriptor {
                Descriptor::MoveHandles { count } | Descriptor::CopyHandles { count } => {
                    let ownership = match descriptor {
                        Descriptor::MoveHandles { .. } => Ownership::Move,
                        _ => Ownership::Copy,
                    };
                    for _ in 0..count {
                        let handle = Handle::from_raw(src[index]);
                        let object = translate::resolve_incoming(handle, src_table, ownership);
                        self.command_buffer[index] = self.add_incoming_handle(object);
                        index += 1;
                    }
                }
                Descriptor::CallingPid => {
                    self.command_buffer[index] = src_process.id().raw();
                    index += 1;
                }
                Descriptor::StaticBuffer { size, buffer_id } => {
                    if size > MAX_STATIC_BUFFER_BYTES {
                        return Err(WireError::BufferTooLarge {
                            size,
                            limit: MAX_STATIC_BUFFER_BYTES,
                        }
                        .into());
                    }
                    let address = src[index];
                    let bytes = src_process.vm().read_bytes(address, size)?;
                    self.static_buffers.insert(buffer_id, bytes)?;
                    self.command_buffer[index] = address;
                    index += 1;
                }
            }
        }

        self.state = RequestState::Populated;
        Ok(())
    }

    /// Serializes this context's semantic buffer into a raw target buffer.
    ///
    /// Staged outgoing handles are allocated in `dst_table`; static buffer
    /// payloads are written to the addresses the receiver declared in the
    /// side-channel region of `dst` (see [`ReplyTargets`]). On error the
    /// words and payloads written so far remain in `dst` and the target
    /// process; callers treat the error as the request outcome, they do not
    /// retry the write.
    pub fn write_to_outgoing_command_buffer(
        &mut self,
        dst: &mut [u32],
        dst_process: &mut Process,
        dst_table: &mut HandleTable,
    ) -> Result<(), IpcError> {
        let header = Header::decode(self.command_buffer[0]);
        header.validate(dst.len())?;

        let reply_targets = ReplyTargets::capture(dst);

        let normal_end = 1 + header.normal_params as usize;
        let translate_end = header.total_words();
        dst[..normal_end].copy_from_slice(&self.command_buffer[..normal_end]);

        let mut index = normal_end;
        while index < translate_end {
            let descriptor_word = self.command_buffer[index];
            let descriptor = Descriptor::decode(descriptor_word)?;
            let payload = descriptor.payload_words();
            if index + 1 + payload > translate_end {
                return Err(WireError::DescriptorOverrun { index, payload }.into());
            }
            dst[index] = descriptor_word;
            index += 1;

            match descriptor {
                Descriptor::MoveHandles { count } | Descriptor::CopyHandles { count } => {
                    for _ in 0..count {
                        let token = self.command_buffer[index];
                        let object = self
                            .outgoing_handles
                            .get(token as usize)
                            .ok_or(IpcError::UnknownHandleToken { token })?;
                        let handle = translate::allocate_outgoing(object.as_ref(), dst_table)?;
                        dst[index] = handle.raw();
                        index += 1;
                    }
                }
                Descriptor::CallingPid => {
                    dst[index] = dst_process.id().raw();
                    index += 1;
                }
                Descriptor::StaticBuffer { size: _, buffer_id } => {
                    let staged = self.static_buffers.get(buffer_id)?;
                    let target = reply_targets.declaration(buffer_id)?;
                    if target.capacity < staged.len() {
                        return Err(WireError::ReplyBufferTooSmall {
                            id: buffer_id,
                            declared: target.capacity,
                            staged: staged.len(),
                        }
                        .into());
                    }
                    dst_process.vm_mut().write_bytes(target.address, staged)?;
                    // The receiver's own declaration words go out verbatim,
                    // replacing the service-authored descriptor and address.
                    dst[index - 1] = target.descriptor_word;
                    dst[index] = target.address;
                    index += 1;
                }
            }
        }

        self.state = RequestState::Serialized;
        Ok(())
    }

    /// Resolves a token produced during population.
    ///
    /// Never touches any handle table. Returns `None` both for a slot that
    /// translated to "no object" and for a token this context never issued.
    pub fn get_incoming_handle(&self, token: u32) -> Option<ObjectRef> {
        self.incoming_handles.get(token as usize)?.clone()
    }

    /// Stages an object reference for the reply and returns the token to
    /// embed at the matching descriptor payload position.
    ///
    /// Always appends, including for "no object" (which serializes to the
    /// null handle).
    pub fn add_outgoing_handle(&mut self, object: Option<ObjectRef>) -> u32 {
        self.outgoing_handles.push(object);
        (self.outgoing_handles.len() - 1) as u32
    }

    /// Stages a static buffer payload under `buffer_id`
    pub fn add_static_buffer(&mut self, buffer_id: u8, bytes: Vec<u8>) -> Result<(), IpcError> {
        self.static_buffers.insert(buffer_id, bytes)?;
        Ok(())
    }

    /// Returns the payload stored under `buffer_id` (empty if none staged)
    pub fn get_static_buffer(&self, buffer_id: u8) -> Result<&[u8], IpcError> {
        Ok(self.static_buffers.get(buffer_id)?)
    }

    fn add_incoming_handle(&mut self, object: Option<ObjectRef>) -> u32 {
        self.incoming_handles.push(object);
        (self.incoming_handles.len() - 1) as u32
    }
}
