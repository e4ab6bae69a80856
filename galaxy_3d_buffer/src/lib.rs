/*!
# Galaxy 3D Buffer

GPU buffer-object resources for the Galaxy 3D rendering engine.

A `GpuBuffer` owns one device buffer name and keeps its lifecycle in step
with the rendering context that created it: creation, full and partial
uploads, synchronous readback, binding to vertex attribute slots, and
release. The context is never stored; every operation borrows it through
the `RenderContext` trait.

## Architecture

- **RenderContext**: device entry points a buffer needs (trait)
- **SoftwareContext**: host-memory context, no GPU required
- **GlContext**: OpenGL context over `glow` (feature `gl`)
- **GpuBuffer**: one buffer object, target fixed by its kind
  (`VertexBuffer`, `IndexBuffer`, `TexelBuffer`)
- **InterleavedBuffer**: several attribute streams in one array buffer
- **BufferEditor**: chunked sequential writer over a buffer
- **SharedArray**: reference-counted host array with value semantics

## Example

```ignore
use galaxy_3d_buffer::galaxy3d::context::SoftwareContext;
use galaxy_3d_buffer::galaxy3d::buffer::VertexBuffer;
use galaxy_3d_buffer::glam::Vec3;

let mut ctx = SoftwareContext::new();
let mut positions = VertexBuffer::new();
positions.init(&mut ctx, &[Vec3::ZERO, Vec3::X, Vec3::Y])?;
positions.release(Some(&mut ctx));
```
*/

// Internal modules
mod error;
pub mod log;
pub mod context;
pub mod buffer;
pub mod collections;
pub mod utils;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging sub-module (types and global logger management)
    pub mod log {
        pub use crate::log::{
            log, log_detailed, min_severity, reset_logger, set_logger, set_min_severity,
            DefaultLogger, LogEntry, LogSeverity, Logger,
        };
    }

    // Rendering context sub-module
    pub mod context {
        pub use crate::context::*;
    }

    // Buffer resources sub-module
    pub mod buffer {
        pub use crate::buffer::*;
    }

    // Host-side arrays sub-module
    pub mod collections {
        pub use crate::collections::*;
    }
}

// Re-export math library at crate root
pub use glam;
