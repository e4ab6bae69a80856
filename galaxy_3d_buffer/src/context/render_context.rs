/// RenderContext trait - the device entry points consumed by buffers

use crate::context::{
    AttribLayout, AttribLocation, BufferId, BufferTarget, BufferUsage, ContextCapabilities,
    DeviceError, DiagnosticMessage,
};

/// Live connection to a graphics device
///
/// Implemented by backends (`SoftwareContext`, `GlContext`). A context is
/// single-threaded: every call is made from the thread owning it and is
/// synchronous. Buffers borrow it for the duration of one operation and never
/// store it.
///
/// Entry points follow the device's own model: binding state is global per
/// context, transfers operate on whatever buffer is bound to `target`, and
/// failures are reported through `get_error` rather than return values.
pub trait RenderContext {
    /// Whether the device connection is still alive
    fn is_valid(&self) -> bool;

    /// Optional entry points exposed by this context
    fn capabilities(&self) -> ContextCapabilities;

    /// Allocate one buffer name, `None` if the device refused
    fn gen_buffer(&mut self) -> Option<BufferId>;

    /// Free a buffer name and its storage
    fn delete_buffer(&mut self, id: BufferId);

    /// Attach `id` to `target`, or detach whatever is bound when `None`
    fn bind_buffer(&mut self, target: BufferTarget, id: Option<BufferId>);

    /// (Re)allocate `size` bytes for the bound buffer, copying `data` when given
    fn buffer_data(&mut self, target: BufferTarget, size: usize, data: Option<&[u8]>, usage: BufferUsage);

    /// Overwrite `data.len()` bytes of the bound buffer starting at `offset`
    fn buffer_sub_data(&mut self, target: BufferTarget, offset: usize, data: &[u8]);

    /// Copy `out.len()` bytes of the bound buffer starting at `offset` into `out`
    ///
    /// Returns false when the context cannot perform the readback at all.
    fn get_buffer_sub_data(&mut self, target: BufferTarget, offset: usize, out: &mut [u8]) -> bool;

    fn enable_vertex_attrib_array(&mut self, location: AttribLocation);

    fn disable_vertex_attrib_array(&mut self, location: AttribLocation);

    /// Describe the layout of `location`, sourced from the buffer bound to the array target
    fn vertex_attrib_pointer(&mut self, location: AttribLocation, layout: AttribLayout);

    /// Take the pending device error, clearing it
    fn get_error(&mut self) -> Option<DeviceError>;

    /// Append a message to the context's diagnostic sink
    fn push_message(&mut self, message: DiagnosticMessage);
}
