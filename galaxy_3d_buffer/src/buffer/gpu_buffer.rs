/// GPU buffer-object resource
///
/// A GpuBuffer owns one device buffer name and describes its contents with a
/// logical shape: `components` scalars of `data_type` per element, and
/// `element_count` elements. The rendering context is never stored, every
/// operation borrows it for the duration of the call.
///
/// Lifecycle:
/// - `new()` → uninitialized (no name)
/// - `create()` → created, empty
/// - `upload_full()` → populated
/// - `release()` → uninitialized again; may be recreated any number of times
///
/// The name must be released with a live context before the buffer is
/// dropped. Dropping a buffer that still holds a name cannot free it: the
/// leak is reported through the crate logger at ERROR severity.

use std::marker::PhantomData;

use crate::buffer::{ArrayData, BufferElement, BufferKind, BufferState};
use crate::collections::SharedArray;
use crate::context::{
    AttribLayout, AttribLocation, BufferId, BufferTarget, BufferUsage, ContextCapabilities,
    DataType, DeviceError, DiagnosticMessage, RenderContext,
};
use crate::error::{Error, Result};
use crate::{gpu_error, gpu_trace};

const SOURCE: &str = "galaxy3d::GpuBuffer";

// ===== GPU BUFFER =====

#[derive(Debug)]
pub struct GpuBuffer<K: BufferKind = ArrayData> {
    id: Option<BufferId>,
    /// Base offset when this buffer is a view into a shared store
    byte_offset: Option<usize>,
    components: u32,
    elements: usize,
    data_type: DataType,
    _kind: PhantomData<K>,
}

impl<K: BufferKind> GpuBuffer<K> {
    /// Create an uninitialized buffer (4 float components, no elements)
    pub fn new() -> Self {
        Self {
            id: None,
            byte_offset: None,
            components: 4,
            elements: 0,
            data_type: DataType::Float,
            _kind: PhantomData,
        }
    }

    // ===== ACCESSORS =====

    /// Binding target this buffer operates on
    pub fn target(&self) -> BufferTarget {
        K::TARGET
    }

    /// True iff the buffer holds a device name
    pub fn is_valid(&self) -> bool {
        self.id.is_some()
    }

    /// Device name, `None` when not created
    pub fn handle(&self) -> Option<BufferId> {
        self.id
    }

    /// Components per element
    pub fn components(&self) -> u32 {
        self.components
    }

    /// Number of elements described by the last full upload
    pub fn element_count(&self) -> usize {
        self.elements
    }

    /// Override the element count, e.g. to draw only a prefix of the data
    ///
    /// The caller is responsible for keeping it within the allocated storage.
    pub fn set_element_count(&mut self, elements: usize) {
        self.elements = elements;
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn byte_offset(&self) -> Option<usize> {
        self.byte_offset
    }

    /// Set the base offset used when describing attributes
    ///
    /// The offset addresses a store this buffer does not own; it is forgotten
    /// on release.
    pub fn set_byte_offset(&mut self, offset: Option<usize>) {
        self.byte_offset = offset;
    }

    /// Whether the storage only emulates a device buffer in host memory
    pub fn is_virtual(&self) -> bool {
        false
    }

    /// Bytes held on the device, 0 when not created
    pub fn estimated_data_size(&self) -> usize {
        if !self.is_valid() {
            return 0;
        }
        self.elements * self.element_size()
    }

    fn element_size(&self) -> usize {
        self.components as usize * self.data_type.size_bytes()
    }

    // ===== LIFECYCLE =====

    /// Allocate the device name if not done yet
    ///
    /// Calling it on a valid buffer is a no-op success. Never uploads data.
    ///
    /// # Errors
    ///
    /// - `Unsupported` if the context exposes no buffer objects
    /// - `ContextLost` if the context is no longer valid
    /// - `BackendError` if the device refused to hand out a name
    pub fn create(&mut self, ctx: &mut dyn RenderContext) -> Result<()> {
        if self.id.is_some() {
            return Ok(());
        }
        if !ctx.capabilities().contains(ContextCapabilities::BUFFER_OBJECTS) {
            return Err(Error::Unsupported(
                "rendering context exposes no buffer objects".to_string(),
            ));
        }
        if !ctx.is_valid() {
            return Err(Error::ContextLost);
        }

        let id = ctx.gen_buffer().ok_or_else(|| {
            Error::BackendError(format!("glGenBuffers ({}) returned no name", K::TARGET))
        })?;
        gpu_trace!(SOURCE, "Created {} buffer {}", K::TARGET, id);
        self.id = Some(id);
        Ok(())
    }

    /// Free the device name
    ///
    /// No-op on an invalid buffer. Without a context the name cannot be
    /// freed: the misuse is logged as a possible GPU memory leak and the
    /// buffer keeps its name. With a context the name is deleted if the
    /// context is still valid, and the buffer is reset either way.
    pub fn release(&mut self, ctx: Option<&mut dyn RenderContext>) {
        let Some(id) = self.id else {
            return;
        };
        let Some(ctx) = ctx else {
            gpu_error!(
                SOURCE,
                "{} buffer {} destroyed without GL context! Possible GPU memory leakage...",
                K::TARGET,
                id
            );
            return;
        };

        if ctx.is_valid() {
            ctx.delete_buffer(id);
            gpu_trace!(SOURCE, "Deleted {} buffer {}", K::TARGET, id);
        }
        self.byte_offset = None;
        self.id = None;
    }

    /// Attach this buffer to its target's binding point
    ///
    /// Guarded: an invalid buffer issues no device call. Bindings are not
    /// nested, binding another buffer simply overwrites the device state.
    pub fn bind(&self, ctx: &mut dyn RenderContext) {
        if let Some(id) = self.id {
            ctx.bind_buffer(K::TARGET, Some(id));
        }
    }

    /// Detach whatever is bound to this buffer's target
    pub fn unbind(&self, ctx: &mut dyn RenderContext) {
        if self.id.is_some() {
            ctx.bind_buffer(K::TARGET, None);
        }
    }

    // ===== DATA TRANSFER =====

    /// (Re)allocate the device storage and fill it from `data`
    ///
    /// Creates the buffer if needed, then transfers `element_count * stride`
    /// bytes with static usage; `None` allocates without copying. The shape
    /// fields are updated before the transfer, whatever its outcome.
    ///
    /// # Errors
    ///
    /// - `OutOfMemory` when the device cannot hold the storage. Expected
    ///   under memory pressure, nothing is pushed to the diagnostic sink.
    /// - `Device` for any other device error, which is also pushed to the
    ///   context's diagnostic sink.
    /// - `BufferTooSmall` / `InvalidResource` for rejected arguments, before
    ///   any device call.
    pub fn upload_full(
        &mut self,
        ctx: &mut dyn RenderContext,
        components: u32,
        element_count: usize,
        data: Option<&[u8]>,
        data_type: DataType,
        stride: usize,
    ) -> Result<()> {
        if components == 0 {
            return Err(Error::InvalidResource(
                "buffer elements need at least one component".to_string(),
            ));
        }
        let size = element_count.checked_mul(stride).ok_or_else(|| {
            Error::InvalidResource(format!("{} elements of {} bytes overflow", element_count, stride))
        })?;
        let source = match data {
            Some(bytes) if bytes.len() < size => {
                return Err(Error::BufferTooSmall { required: size, provided: bytes.len() });
            }
            Some(bytes) => Some(&bytes[..size]),
            None => None,
        };

        self.create(ctx)?;
        self.bind(ctx);
        self.data_type = data_type;
        self.components = components;
        self.elements = element_count;
        ctx.buffer_data(K::TARGET, size, source, BufferUsage::StaticDraw);
        let error = ctx.get_error();
        if let Some(err) = error.filter(|err| *err != DeviceError::OutOfMemory) {
            ctx.push_message(DiagnosticMessage::error(format!(
                "Error: glBufferData ({},{},{}) Id: {} failed with {}",
                K::TARGET,
                format_size(size),
                format_pointer(source),
                self.name(),
                err
            )));
        }
        self.unbind(ctx);

        match error {
            None => Ok(()),
            Some(err) => Err(err.into()),
        }
    }

    /// Overwrite `elem_count` elements starting at element `elem_from`
    ///
    /// Rejected without any device call when the buffer is invalid, when
    /// `data_type` is not the stored type, or when the range leaves
    /// `[0, element_count)`. Ranges are never clamped.
    ///
    /// Every device error is pushed to the diagnostic sink, out-of-memory
    /// included, since the destination storage already exists.
    pub fn upload_sub(
        &self,
        ctx: &mut dyn RenderContext,
        elem_from: isize,
        elem_count: usize,
        data: &[u8],
        data_type: DataType,
    ) -> Result<()> {
        let (offset, size) = self.checked_range(elem_from, elem_count, data_type)?;
        if data.len() < size {
            return Err(Error::BufferTooSmall { required: size, provided: data.len() });
        }
        let source = &data[..size];

        self.bind(ctx);
        ctx.buffer_sub_data(K::TARGET, offset, source);
        let error = ctx.get_error();
        if let Some(err) = error {
            ctx.push_message(DiagnosticMessage::error(format!(
                "Error: glBufferSubData ({},{},{},{}) Id: {} failed with {}",
                K::TARGET,
                format_size(offset),
                format_size(size),
                format_pointer(Some(source)),
                self.name(),
                err
            )));
        }
        self.unbind(ctx);

        match error {
            None => Ok(()),
            Some(err) => Err(err.into()),
        }
    }

    /// Copy `elem_count` elements starting at element `elem_from` into `out`
    ///
    /// Same validation as `upload_sub`, and additionally rejected when the
    /// context has no readback capability. Errors are returned to the caller
    /// only, nothing is pushed to the diagnostic sink.
    pub fn read_sub(
        &self,
        ctx: &mut dyn RenderContext,
        elem_from: isize,
        elem_count: usize,
        out: &mut [u8],
        data_type: DataType,
    ) -> Result<()> {
        let (offset, size) = self.checked_range(elem_from, elem_count, data_type)?;
        if !ctx.capabilities().contains(ContextCapabilities::BUFFER_READBACK) {
            return Err(Error::Unsupported(
                "rendering context cannot read buffers back".to_string(),
            ));
        }
        if out.len() < size {
            return Err(Error::BufferTooSmall { required: size, provided: out.len() });
        }

        self.bind(ctx);
        let done = ctx.get_buffer_sub_data(K::TARGET, offset, &mut out[..size]);
        let error = ctx.get_error();
        self.unbind(ctx);

        if let Some(err) = error {
            return Err(err.into());
        }
        if !done {
            return Err(Error::BackendError(format!(
                "glGetBufferSubData ({}) Id: {} not performed",
                K::TARGET,
                self.name()
            )));
        }
        Ok(())
    }

    /// Validate a sub-range request, returning its byte offset and length
    fn checked_range(&self, elem_from: isize, elem_count: usize, data_type: DataType) -> Result<(usize, usize)> {
        if self.id.is_none() {
            return Err(Error::InvalidResource(format!("{} buffer is not created", K::TARGET)));
        }
        if data_type != self.data_type {
            return Err(Error::TypeMismatch { expected: self.data_type, actual: data_type });
        }

        let out_of_range = || Error::OutOfRange {
            from: elem_from,
            count: elem_count,
            available: self.elements,
        };
        let from = usize::try_from(elem_from).map_err(|_| out_of_range())?;
        let end = from.checked_add(elem_count).ok_or_else(out_of_range)?;
        if end > self.elements {
            return Err(out_of_range());
        }

        let element_size = self.element_size();
        let offset = from.checked_mul(element_size).ok_or_else(out_of_range)?;
        let size = elem_count.checked_mul(element_size).ok_or_else(out_of_range)?;
        Ok((offset, size))
    }

    // ===== TYPED OVERLOADS =====

    /// Upload `data` as the whole content, one `T` per element
    pub fn init<T: BufferElement>(&mut self, ctx: &mut dyn RenderContext, data: &[T]) -> Result<()> {
        self.upload_full(
            ctx,
            T::COMPONENTS,
            data.len(),
            Some(bytemuck::cast_slice(data)),
            T::DATA_TYPE,
            std::mem::size_of::<T>(),
        )
    }

    /// Upload `data` as the whole content, grouping its scalars into elements of `components`
    pub fn init_components<T: BufferElement>(
        &mut self,
        ctx: &mut dyn RenderContext,
        components: u32,
        data: &[T],
    ) -> Result<()> {
        let elements = whole_elements::<T>(components, data.len())?;
        self.upload_full(
            ctx,
            components,
            elements,
            Some(bytemuck::cast_slice(data)),
            T::DATA_TYPE,
            components as usize * T::DATA_TYPE.size_bytes(),
        )
    }

    /// Upload the content of a shared array, one `T` per element
    pub fn init_from_array<T: BufferElement>(
        &mut self,
        ctx: &mut dyn RenderContext,
        array: &SharedArray<T>,
    ) -> Result<()> {
        self.init(ctx, array.as_slice())
    }

    /// Overwrite elements starting at `elem_from` with the scalars of `data`
    pub fn sub_data<T: BufferElement>(
        &self,
        ctx: &mut dyn RenderContext,
        elem_from: isize,
        data: &[T],
    ) -> Result<()> {
        let elements = whole_elements::<T>(self.components, data.len())?;
        self.upload_sub(ctx, elem_from, elements, bytemuck::cast_slice(data), T::DATA_TYPE)
    }

    /// Read elements starting at `elem_from` until `out` is filled
    pub fn get_sub_data<T: BufferElement>(
        &self,
        ctx: &mut dyn RenderContext,
        elem_from: isize,
        out: &mut [T],
    ) -> Result<()> {
        let elements = whole_elements::<T>(self.components, out.len())?;
        self.read_sub(ctx, elem_from, elements, bytemuck::cast_slice_mut(out), T::DATA_TYPE)
    }

    // ===== ATTRIBUTES =====

    /// Feed this buffer into the pipeline's attribute slot `location`
    ///
    /// No-op on an invalid buffer, the `UNUSED` location, or a context
    /// without `VERTEX_ATTRIBUTES`. The buffer stays bound on return;
    /// `unbind_attribute` ends the scope.
    pub fn bind_attribute(&self, ctx: &mut dyn RenderContext, location: AttribLocation) {
        if !self.feeds_attributes(ctx) || location.is_unused() {
            return;
        }
        self.bind(ctx);
        ctx.enable_vertex_attrib_array(location);
        ctx.vertex_attrib_pointer(
            location,
            AttribLayout {
                components: self.components,
                data_type: self.data_type,
                normalized: false,
                stride: 0,
                offset: self.byte_offset.unwrap_or(0),
            },
        );
    }

    /// Disable the attribute slot `location` and unbind the buffer
    pub fn unbind_attribute(&self, ctx: &mut dyn RenderContext, location: AttribLocation) {
        if !self.feeds_attributes(ctx) || location.is_unused() {
            return;
        }
        ctx.disable_vertex_attrib_array(location);
        self.unbind(ctx);
    }

    /// Whether attribute calls can reach the device for this buffer
    pub(crate) fn feeds_attributes(&self, ctx: &dyn RenderContext) -> bool {
        self.is_valid() && ctx.capabilities().contains(ContextCapabilities::VERTEX_ATTRIBUTES)
    }

    // ===== DIAGNOSTICS =====

    /// Structured snapshot of the buffer for debugging and tooling
    pub fn describe_state(&self) -> BufferState {
        BufferState {
            target: K::TARGET,
            byte_offset: self.byte_offset,
            handle: self.id,
            components: self.components,
            element_count: self.elements,
            data_type: self.data_type,
        }
    }

    fn name(&self) -> u32 {
        self.id.map_or(0, BufferId::get)
    }
}

impl<K: BufferKind> Default for GpuBuffer<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: BufferKind> Drop for GpuBuffer<K> {
    fn drop(&mut self) {
        self.release(None);
    }
}

/// Number of elements of `components` scalars made up by `len` values of `T`
fn whole_elements<T: BufferElement>(components: u32, len: usize) -> Result<usize> {
    if components == 0 {
        return Err(Error::InvalidResource(
            "buffer elements need at least one component".to_string(),
        ));
    }
    let scalars = len * T::COMPONENTS as usize;
    if scalars % components as usize != 0 {
        return Err(Error::InvalidResource(format!(
            "{} scalars do not form whole elements of {} components",
            scalars, components
        )));
    }
    Ok(scalars / components as usize)
}

fn format_size(size: usize) -> String {
    size.to_string()
}

fn format_pointer(data: Option<&[u8]>) -> String {
    match data {
        Some(bytes) => format!("{:p}", bytes.as_ptr()),
        None => "NULL".to_string(),
    }
}

#[cfg(test)]
#[path = "gpu_buffer_tests.rs"]
mod tests;
