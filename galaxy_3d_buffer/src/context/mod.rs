/// Rendering context module - the device side of buffer operations

pub mod render_context;
pub mod software_context;
pub mod types;

#[cfg(feature = "gl")]
pub mod gl_context;

pub use render_context::*;
pub use software_context::*;
pub use types::*;

#[cfg(feature = "gl")]
pub use gl_context::*;
