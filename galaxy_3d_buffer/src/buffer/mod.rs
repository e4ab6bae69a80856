/// Buffer module - GPU buffer-object resources and their helpers

pub mod attributes;
pub mod buffer_editor;
pub mod element;
pub mod gpu_buffer;
pub mod interleaved_buffer;
pub mod state;
pub mod target;

pub use attributes::*;
pub use buffer_editor::*;
pub use element::*;
pub use gpu_buffer::*;
pub use interleaved_buffer::*;
pub use state::*;
pub use target::*;
