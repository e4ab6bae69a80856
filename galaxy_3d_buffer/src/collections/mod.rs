/// Collections module - shared host-side arrays feeding buffer uploads

pub mod shared_array;

pub use shared_array::*;
