/// Attribute-stream capability hooks
///
/// Generic rendering code binds a buffer's streams and branches on which
/// optional per-vertex streams it carries through this trait, without
/// knowing the concrete buffer variant. Every hook defaults to inert
/// behavior: a plain GpuBuffer exposes one stream through
/// `GpuBuffer::bind_attribute` and advertises nothing else.

use crate::buffer::{BufferKind, GpuBuffer};
use crate::context::RenderContext;

pub trait AttributeStreams {
    /// Bind the buffer and activate every attribute stream it carries
    fn bind_all_attributes(&self, _ctx: &mut dyn RenderContext) {}

    /// Bind the buffer and activate only the position stream
    fn bind_position_attribute(&self, _ctx: &mut dyn RenderContext) {}

    /// Deactivate every attribute stream and unbind the buffer
    fn unbind_all_attributes(&self, _ctx: &mut dyn RenderContext) {}

    /// Whether a per-vertex color stream is carried
    fn has_color_attribute(&self) -> bool {
        false
    }

    /// Whether a per-vertex normal stream is carried
    fn has_normal_attribute(&self) -> bool {
        false
    }
}

impl<K: BufferKind> AttributeStreams for GpuBuffer<K> {}
