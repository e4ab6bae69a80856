/// Binding-target kinds of GpuBuffer
///
/// The target is fixed per buffer variant, so it lives in the type rather
/// than in each instance: `GpuBuffer<ArrayData>` always operates on
/// `GL_ARRAY_BUFFER`, `GpuBuffer<IndexData>` on `GL_ELEMENT_ARRAY_BUFFER`.

use std::fmt::Debug;

use crate::buffer::GpuBuffer;
use crate::context::BufferTarget;

/// Type-level binding target of a GpuBuffer
pub trait BufferKind: Debug + 'static {
    const TARGET: BufferTarget;
}

/// Generic per-vertex attribute data
#[derive(Debug)]
pub struct ArrayData;

/// Element indices
#[derive(Debug)]
pub struct IndexData;

/// Texel data sampled through a buffer texture
#[derive(Debug)]
pub struct TexelData;

impl BufferKind for ArrayData {
    const TARGET: BufferTarget = BufferTarget::Array;
}

impl BufferKind for IndexData {
    const TARGET: BufferTarget = BufferTarget::ElementArray;
}

impl BufferKind for TexelData {
    const TARGET: BufferTarget = BufferTarget::Texture;
}

pub type VertexBuffer = GpuBuffer<ArrayData>;
pub type IndexBuffer = GpuBuffer<IndexData>;
pub type TexelBuffer = GpuBuffer<TexelData>;
