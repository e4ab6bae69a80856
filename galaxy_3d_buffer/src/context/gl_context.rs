/// OpenGL rendering context backed by glow (feature "gl")

use glow::HasContext;

use crate::context::{
    AttribLayout, AttribLocation, BufferId, BufferTarget, BufferUsage, ContextCapabilities,
    DeviceError, DiagnosticMessage, MessageSeverity, RenderContext,
};
use crate::{gpu_debug, gpu_error, gpu_info, gpu_warn};

const SOURCE: &str = "galaxy3d::GlContext";

/// RenderContext over a live `glow::Context`
///
/// The GL context must be current on the calling thread for every call.
/// Readback is advertised on desktop GL only, OpenGL ES has no
/// `glGetBufferSubData`. Messages pushed into the diagnostic sink are
/// forwarded to the crate logger.
pub struct GlContext {
    gl: glow::Context,
    capabilities: ContextCapabilities,
    valid: bool,
    /// Errors detected before reaching GL (sizes beyond GLsizeiptr)
    pending_error: Option<DeviceError>,
}

impl GlContext {
    pub fn new(gl: glow::Context) -> Self {
        let mut capabilities = ContextCapabilities::BUFFER_OBJECTS | ContextCapabilities::VERTEX_ATTRIBUTES;
        if !gl.version().is_embedded {
            capabilities |= ContextCapabilities::BUFFER_READBACK;
        }
        gpu_info!(SOURCE, "GL context attached, capabilities {:?}", capabilities);
        Self {
            gl,
            capabilities,
            valid: true,
            pending_error: None,
        }
    }

    /// Mark the context as destroyed; buffers released afterwards only forget their names
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    fn to_i32(&mut self, value: usize) -> Option<i32> {
        let converted = i32::try_from(value).ok();
        if converted.is_none() && self.pending_error.is_none() {
            self.pending_error = Some(DeviceError::InvalidValue);
        }
        converted
    }
}

fn native(id: BufferId) -> glow::NativeBuffer {
    glow::NativeBuffer(id.as_non_zero())
}

impl RenderContext for GlContext {
    fn is_valid(&self) -> bool {
        self.valid
    }

    fn capabilities(&self) -> ContextCapabilities {
        self.capabilities
    }

    fn gen_buffer(&mut self) -> Option<BufferId> {
        match unsafe { self.gl.create_buffer() } {
            Ok(buffer) => BufferId::new(buffer.0.get()),
            Err(msg) => {
                gpu_warn!(SOURCE, "glGenBuffers failed: {}", msg);
                None
            }
        }
    }

    fn delete_buffer(&mut self, id: BufferId) {
        unsafe { self.gl.delete_buffer(native(id)) }
    }

    fn bind_buffer(&mut self, target: BufferTarget, id: Option<BufferId>) {
        unsafe { self.gl.bind_buffer(target.gl_enum(), id.map(native)) }
    }

    fn buffer_data(&mut self, target: BufferTarget, size: usize, data: Option<&[u8]>, usage: BufferUsage) {
        let Some(gl_size) = self.to_i32(size) else {
            return;
        };
        match data {
            Some(bytes) => unsafe {
                self.gl.buffer_data_u8_slice(target.gl_enum(), &bytes[..size], usage.gl_enum())
            },
            None => unsafe { self.gl.buffer_data_size(target.gl_enum(), gl_size, usage.gl_enum()) },
        }
    }

    fn buffer_sub_data(&mut self, target: BufferTarget, offset: usize, data: &[u8]) {
        let Some(gl_offset) = self.to_i32(offset) else {
            return;
        };
        unsafe { self.gl.buffer_sub_data_u8_slice(target.gl_enum(), gl_offset, data) }
    }

    fn get_buffer_sub_data(&mut self, target: BufferTarget, offset: usize, out: &mut [u8]) -> bool {
        if !self.capabilities.contains(ContextCapabilities::BUFFER_READBACK) {
            return false;
        }
        let Some(gl_offset) = self.to_i32(offset) else {
            return true;
        };
        unsafe { self.gl.get_buffer_sub_data(target.gl_enum(), gl_offset, out) };
        true
    }

    fn enable_vertex_attrib_array(&mut self, location: AttribLocation) {
        unsafe { self.gl.enable_vertex_attrib_array(location.0) }
    }

    fn disable_vertex_attrib_array(&mut self, location: AttribLocation) {
        unsafe { self.gl.disable_vertex_attrib_array(location.0) }
    }

    fn vertex_attrib_pointer(&mut self, location: AttribLocation, layout: AttribLayout) {
        let (Some(stride), Some(offset)) = (self.to_i32(layout.stride), self.to_i32(layout.offset)) else {
            return;
        };
        unsafe {
            self.gl.vertex_attrib_pointer_f32(
                location.0,
                layout.components as i32,
                layout.data_type.gl_enum(),
                layout.normalized,
                stride,
                offset,
            )
        }
    }

    fn get_error(&mut self) -> Option<DeviceError> {
        if let Some(error) = self.pending_error.take() {
            // Drain GL's own flag as well so it does not leak into the next query
            unsafe { self.gl.get_error() };
            return Some(error);
        }
        DeviceError::from_code(unsafe { self.gl.get_error() })
    }

    fn push_message(&mut self, message: DiagnosticMessage) {
        match message.severity {
            MessageSeverity::High => gpu_error!(SOURCE, "{}", message.text),
            MessageSeverity::Medium => gpu_warn!(SOURCE, "{}", message.text),
            MessageSeverity::Low | MessageSeverity::Notification => gpu_debug!(SOURCE, "{}", message.text),
        }
    }
}
