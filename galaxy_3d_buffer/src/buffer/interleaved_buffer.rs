/// Interleaved vertex buffer carrying several attribute streams
///
/// All streams live in one array buffer, vertex after vertex:
///
/// ```text
/// | position (12) | normal (12) | color (4) | position (12) | normal (12) | ...
/// |<------------- stride 28 ------------->|
/// ```
///
/// The underlying GpuBuffer stores raw bytes: one element per vertex, with
/// `stride` unsigned-byte components. Sub-range updates therefore address
/// whole vertices.

use crate::buffer::{AttributeStreams, VertexBuffer};
use crate::context::{AttribLayout, AttribLocation, DataType, RenderContext};
use crate::error::{Error, Result};

/// One stream of an interleaved vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: AttribLocation,
    pub components: u32,
    pub data_type: DataType,
    pub normalized: bool,
}

impl VertexAttribute {
    /// Three float coordinates
    pub fn position() -> Self {
        Self::new(AttribLocation::POSITION, 3, DataType::Float)
    }

    /// Three float components
    pub fn normal() -> Self {
        Self::new(AttribLocation::NORMAL, 3, DataType::Float)
    }

    /// Two float coordinates
    pub fn tex_coord() -> Self {
        Self::new(AttribLocation::TEX_COORD, 2, DataType::Float)
    }

    /// RGBA as four normalized unsigned bytes
    pub fn color() -> Self {
        Self {
            normalized: true,
            ..Self::new(AttribLocation::COLOR, 4, DataType::UnsignedByte)
        }
    }

    pub fn new(location: AttribLocation, components: u32, data_type: DataType) -> Self {
        Self {
            location,
            components,
            data_type,
            normalized: false,
        }
    }

    /// Bytes occupied inside one vertex
    pub fn size_bytes(&self) -> usize {
        self.components as usize * self.data_type.size_bytes()
    }
}

pub struct InterleavedBuffer {
    buffer: VertexBuffer,
    attributes: Vec<VertexAttribute>,
    offsets: Vec<usize>,
    stride: usize,
}

impl InterleavedBuffer {
    /// Describe the vertex layout; streams are packed in the given order
    ///
    /// # Errors
    ///
    /// `InvalidResource` if the list is empty, a location is `UNUSED` or
    /// repeated, or a stream has no components or more than four.
    pub fn new(attributes: Vec<VertexAttribute>) -> Result<Self> {
        if attributes.is_empty() {
            return Err(Error::InvalidResource(
                "interleaved buffer needs at least one attribute".to_string(),
            ));
        }

        let mut offsets = Vec::with_capacity(attributes.len());
        let mut stride = 0;
        for (index, attribute) in attributes.iter().enumerate() {
            if attribute.location.is_unused() {
                return Err(Error::InvalidResource(format!(
                    "attribute #{} has no location",
                    index
                )));
            }
            if !(1..=4).contains(&attribute.components) {
                return Err(Error::InvalidResource(format!(
                    "attribute at location {} has {} components",
                    attribute.location, attribute.components
                )));
            }
            if attributes[..index].iter().any(|other| other.location == attribute.location) {
                return Err(Error::InvalidResource(format!(
                    "duplicate attribute location {}",
                    attribute.location
                )));
            }
            offsets.push(stride);
            stride += attribute.size_bytes();
        }

        Ok(Self {
            buffer: VertexBuffer::new(),
            attributes,
            offsets,
            stride,
        })
    }

    // ===== ACCESSORS =====

    /// Bytes per vertex
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    /// Byte offset of stream `index` inside a vertex
    pub fn attribute_offset(&self, index: usize) -> Option<usize> {
        self.offsets.get(index).copied()
    }

    pub fn vertex_count(&self) -> usize {
        self.buffer.element_count()
    }

    pub fn buffer(&self) -> &VertexBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut VertexBuffer {
        &mut self.buffer
    }

    fn has_location(&self, location: AttribLocation) -> bool {
        self.attributes.iter().any(|attribute| attribute.location == location)
    }

    // ===== TRANSFERS =====

    /// Upload `vertices` as the whole content; `V` must be exactly one vertex
    pub fn upload_vertices<V: bytemuck::Pod>(&mut self, ctx: &mut dyn RenderContext, vertices: &[V]) -> Result<()> {
        self.check_vertex_size::<V>()?;
        self.buffer.upload_full(
            ctx,
            self.stride as u32,
            vertices.len(),
            Some(bytemuck::cast_slice(vertices)),
            DataType::UnsignedByte,
            self.stride,
        )
    }

    /// Overwrite vertices starting at `first`
    pub fn update_vertices<V: bytemuck::Pod>(
        &self,
        ctx: &mut dyn RenderContext,
        first: isize,
        vertices: &[V],
    ) -> Result<()> {
        self.check_vertex_size::<V>()?;
        self.buffer.upload_sub(
            ctx,
            first,
            vertices.len(),
            bytemuck::cast_slice(vertices),
            DataType::UnsignedByte,
        )
    }

    /// Read vertices starting at `first` until `out` is filled
    pub fn read_vertices<V: bytemuck::Pod>(
        &self,
        ctx: &mut dyn RenderContext,
        first: isize,
        out: &mut [V],
    ) -> Result<()> {
        self.check_vertex_size::<V>()?;
        let count = out.len();
        self.buffer.read_sub(
            ctx,
            first,
            count,
            bytemuck::cast_slice_mut(out),
            DataType::UnsignedByte,
        )
    }

    pub fn release(&mut self, ctx: Option<&mut dyn RenderContext>) {
        self.buffer.release(ctx);
    }

    fn check_vertex_size<V>(&self) -> Result<()> {
        let size = std::mem::size_of::<V>();
        if size != self.stride {
            return Err(Error::InvalidResource(format!(
                "vertex type of {} bytes does not match the {} bytes stride",
                size, self.stride
            )));
        }
        Ok(())
    }

    fn enable_attribute(&self, ctx: &mut dyn RenderContext, index: usize) {
        let attribute = &self.attributes[index];
        let base = self.buffer.byte_offset().unwrap_or(0);
        ctx.enable_vertex_attrib_array(attribute.location);
        ctx.vertex_attrib_pointer(
            attribute.location,
            AttribLayout {
                components: attribute.components,
                data_type: attribute.data_type,
                normalized: attribute.normalized,
                stride: self.stride,
                offset: base + self.offsets[index],
            },
        );
    }
}

impl AttributeStreams for InterleavedBuffer {
    fn bind_all_attributes(&self, ctx: &mut dyn RenderContext) {
        if !self.buffer.feeds_attributes(ctx) {
            return;
        }
        self.buffer.bind(ctx);
        for index in 0..self.attributes.len() {
            self.enable_attribute(ctx, index);
        }
    }

    fn bind_position_attribute(&self, ctx: &mut dyn RenderContext) {
        if !self.buffer.feeds_attributes(ctx) {
            return;
        }
        let Some(index) = self
            .attributes
            .iter()
            .position(|attribute| attribute.location == AttribLocation::POSITION)
        else {
            return;
        };
        self.buffer.bind(ctx);
        self.enable_attribute(ctx, index);
    }

    fn unbind_all_attributes(&self, ctx: &mut dyn RenderContext) {
        if !self.buffer.feeds_attributes(ctx) {
            return;
        }
        for attribute in &self.attributes {
            ctx.disable_vertex_attrib_array(attribute.location);
        }
        self.buffer.unbind(ctx);
    }

    fn has_color_attribute(&self) -> bool {
        self.has_location(AttribLocation::COLOR)
    }

    fn has_normal_attribute(&self) -> bool {
        self.has_location(AttribLocation::NORMAL)
    }
}

#[cfg(test)]
#[path = "interleaved_buffer_tests.rs"]
mod tests;
