/// Chunked sequential writer over a created GpuBuffer
///
/// Values are staged in host memory and sent with one partial upload per
/// chunk, so filling a large buffer element by element does not cost one
/// device call per element.
///
/// ```ignore
/// let mut editor = BufferEditor::<_, Vec3>::new(&buffer, 256)?;
/// for position in positions {
///     editor.push(ctx, position)?;
/// }
/// editor.flush(ctx)?;
/// ```
///
/// Staged values not flushed before the editor is dropped are lost.

use crate::buffer::{BufferElement, BufferKind, GpuBuffer};
use crate::context::RenderContext;
use crate::error::{Error, Result};

pub struct BufferEditor<'a, K: BufferKind, T: BufferElement> {
    buffer: &'a GpuBuffer<K>,
    chunk_len: usize,
    /// Element index the staged chunk starts at
    chunk_start: usize,
    staged: Vec<T>,
}

impl<'a, K: BufferKind, T: BufferElement> BufferEditor<'a, K, T> {
    /// Start editing `buffer` at element 0, staging up to `chunk_len` values
    ///
    /// # Errors
    ///
    /// - `InvalidResource` if the buffer is not created, `chunk_len` is 0, or
    ///   `T` does not carry the buffer's component count
    /// - `TypeMismatch` if `T` is not of the buffer's data type
    pub fn new(buffer: &'a GpuBuffer<K>, chunk_len: usize) -> Result<Self> {
        if !buffer.is_valid() {
            return Err(Error::InvalidResource(format!(
                "cannot edit {} buffer: not created",
                buffer.target()
            )));
        }
        if T::DATA_TYPE != buffer.data_type() {
            return Err(Error::TypeMismatch {
                expected: buffer.data_type(),
                actual: T::DATA_TYPE,
            });
        }
        if T::COMPONENTS != buffer.components() {
            return Err(Error::InvalidResource(format!(
                "editor elements have {} components, buffer has {}",
                T::COMPONENTS,
                buffer.components()
            )));
        }
        if chunk_len == 0 {
            return Err(Error::InvalidResource("editor chunk length must be positive".to_string()));
        }

        Ok(Self {
            buffer,
            chunk_len,
            chunk_start: 0,
            staged: Vec::with_capacity(chunk_len),
        })
    }

    /// Index of the element the next `push` writes
    pub fn cursor(&self) -> usize {
        self.chunk_start + self.staged.len()
    }

    /// Values waiting for the next flush
    pub fn staged(&self) -> &[T] {
        &self.staged
    }

    pub fn chunk_len(&self) -> usize {
        self.chunk_len
    }

    /// Stage `value` at the cursor; uploads the chunk once it is full
    ///
    /// A value past the buffer's last element is rejected immediately.
    /// A full chunk left over by a failed flush is retried first; if the
    /// retry fails too, `value` is not staged.
    pub fn push(&mut self, ctx: &mut dyn RenderContext, value: T) -> Result<()> {
        let index = self.cursor();
        if index >= self.buffer.element_count() {
            return Err(Error::OutOfRange {
                from: index as isize,
                count: 1,
                available: self.buffer.element_count(),
            });
        }
        if self.staged.len() >= self.chunk_len {
            self.flush(ctx)?;
        }
        self.staged.push(value);
        if self.staged.len() >= self.chunk_len {
            self.flush(ctx)?;
        }
        Ok(())
    }

    /// Upload the staged values
    ///
    /// On failure the values stay staged and the cursor does not move.
    pub fn flush(&mut self, ctx: &mut dyn RenderContext) -> Result<()> {
        if self.staged.is_empty() {
            return Ok(());
        }
        self.buffer.sub_data(ctx, self.chunk_start as isize, &self.staged)?;
        self.chunk_start += self.staged.len();
        self.staged.clear();
        Ok(())
    }

    /// Flush, then move the cursor to `element`
    pub fn seek(&mut self, ctx: &mut dyn RenderContext, element: usize) -> Result<()> {
        if element > self.buffer.element_count() {
            return Err(Error::OutOfRange {
                from: element as isize,
                count: 0,
                available: self.buffer.element_count(),
            });
        }
        self.flush(ctx)?;
        self.chunk_start = element;
        Ok(())
    }
}

#[cfg(test)]
#[path = "buffer_editor_tests.rs"]
mod tests;
