/// Typed elements accepted by the typed upload/readback overloads

use glam::{IVec2, IVec3, IVec4, UVec2, UVec3, UVec4, Vec2, Vec3, Vec4};

use crate::context::DataType;

/// Plain-old-data element with a known component layout
///
/// `COMPONENTS` scalars of `DATA_TYPE` stored back to back, without padding,
/// so a slice of elements can be reinterpreted as bytes with `bytemuck`.
pub trait BufferElement: bytemuck::Pod {
    const COMPONENTS: u32;
    const DATA_TYPE: DataType;
}

macro_rules! impl_buffer_element {
    ($($ty:ty => ($components:expr, $data_type:ident)),* $(,)?) => {
        $(
            impl BufferElement for $ty {
                const COMPONENTS: u32 = $components;
                const DATA_TYPE: DataType = DataType::$data_type;
            }
        )*
    };
}

impl_buffer_element! {
    i8 => (1, Byte),
    u8 => (1, UnsignedByte),
    i16 => (1, Short),
    u16 => (1, UnsignedShort),
    i32 => (1, Int),
    u32 => (1, UnsignedInt),
    f32 => (1, Float),
    f64 => (1, Double),
    [u8; 4] => (4, UnsignedByte),
    Vec2 => (2, Float),
    Vec3 => (3, Float),
    Vec4 => (4, Float),
    IVec2 => (2, Int),
    IVec3 => (3, Int),
    IVec4 => (4, Int),
    UVec2 => (2, UnsignedInt),
    UVec3 => (3, UnsignedInt),
    UVec4 => (4, UnsignedInt),
}

#[cfg(test)]
#[path = "element_tests.rs"]
mod tests;
