/// Vocabulary shared by rendering contexts and buffers
///
/// Values mirror the OpenGL enumerants they stand for, so a GL-backed
/// context can pass them through unchanged (`gl_enum()`).

use std::fmt;
use std::num::NonZeroU32;

use bitflags::bitflags;
use serde::Serialize;

// ===== BUFFER ID =====

/// Opaque device-assigned buffer name
///
/// Zero is reserved by the device for "no buffer", so the name is stored as
/// a `NonZeroU32` and "not created" is expressed as `Option<BufferId>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BufferId(NonZeroU32);

impl BufferId {
    /// Wrap a raw device name, `None` for the reserved zero name
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }

    /// Raw device name
    pub fn get(self) -> u32 {
        self.0.get()
    }

    pub fn as_non_zero(self) -> NonZeroU32 {
        self.0
    }
}

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ===== BUFFER TARGET =====

/// Binding point a buffer is attached to when operated on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BufferTarget {
    /// Generic vertex attribute data
    #[serde(rename = "GL_ARRAY_BUFFER")]
    Array,
    /// Index data
    #[serde(rename = "GL_ELEMENT_ARRAY_BUFFER")]
    ElementArray,
    /// Texel buffer backing a buffer texture
    #[serde(rename = "GL_TEXTURE_BUFFER")]
    Texture,
}

impl BufferTarget {
    pub fn gl_enum(self) -> u32 {
        match self {
            BufferTarget::Array => 0x8892,
            BufferTarget::ElementArray => 0x8893,
            BufferTarget::Texture => 0x8C2A,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BufferTarget::Array => "GL_ARRAY_BUFFER",
            BufferTarget::ElementArray => "GL_ELEMENT_ARRAY_BUFFER",
            BufferTarget::Texture => "GL_TEXTURE_BUFFER",
        }
    }
}

impl fmt::Display for BufferTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ===== DATA TYPE =====

/// Scalar type of the stored components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DataType {
    #[serde(rename = "GL_BYTE")]
    Byte,
    #[serde(rename = "GL_UNSIGNED_BYTE")]
    UnsignedByte,
    #[serde(rename = "GL_SHORT")]
    Short,
    #[serde(rename = "GL_UNSIGNED_SHORT")]
    UnsignedShort,
    #[serde(rename = "GL_INT")]
    Int,
    #[serde(rename = "GL_UNSIGNED_INT")]
    UnsignedInt,
    #[serde(rename = "GL_HALF_FLOAT")]
    HalfFloat,
    #[serde(rename = "GL_FLOAT")]
    Float,
    #[serde(rename = "GL_DOUBLE")]
    Double,
}

impl DataType {
    /// Returns size in bytes of one component of this type
    pub fn size_bytes(self) -> usize {
        match self {
            DataType::Byte | DataType::UnsignedByte => 1,
            DataType::Short | DataType::UnsignedShort | DataType::HalfFloat => 2,
            DataType::Int | DataType::UnsignedInt | DataType::Float => 4,
            DataType::Double => 8,
        }
    }

    pub fn gl_enum(self) -> u32 {
        match self {
            DataType::Byte => 0x1400,
            DataType::UnsignedByte => 0x1401,
            DataType::Short => 0x1402,
            DataType::UnsignedShort => 0x1403,
            DataType::Int => 0x1404,
            DataType::UnsignedInt => 0x1405,
            DataType::Float => 0x1406,
            DataType::Double => 0x140A,
            DataType::HalfFloat => 0x140B,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DataType::Byte => "GL_BYTE",
            DataType::UnsignedByte => "GL_UNSIGNED_BYTE",
            DataType::Short => "GL_SHORT",
            DataType::UnsignedShort => "GL_UNSIGNED_SHORT",
            DataType::Int => "GL_INT",
            DataType::UnsignedInt => "GL_UNSIGNED_INT",
            DataType::HalfFloat => "GL_HALF_FLOAT",
            DataType::Float => "GL_FLOAT",
            DataType::Double => "GL_DOUBLE",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ===== BUFFER USAGE =====

/// Expected update frequency of a buffer's storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Uploaded once (or rarely), drawn many times
    StaticDraw,
    /// Updated repeatedly, drawn many times
    DynamicDraw,
    /// Updated once per draw
    StreamDraw,
}

impl BufferUsage {
    pub fn gl_enum(self) -> u32 {
        match self {
            BufferUsage::StaticDraw => 0x88E4,
            BufferUsage::DynamicDraw => 0x88E8,
            BufferUsage::StreamDraw => 0x88E0,
        }
    }
}

// ===== DEVICE ERROR =====

/// Error code reported by the device's current-error query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    InvalidEnum,
    InvalidValue,
    InvalidOperation,
    StackOverflow,
    StackUnderflow,
    OutOfMemory,
    InvalidFramebufferOperation,
    ContextLost,
    /// Code without a known name
    Other(u32),
}

impl DeviceError {
    /// Decode a raw error code, `None` for `GL_NO_ERROR`
    pub fn from_code(code: u32) -> Option<Self> {
        let error = match code {
            0 => return None,
            0x0500 => DeviceError::InvalidEnum,
            0x0501 => DeviceError::InvalidValue,
            0x0502 => DeviceError::InvalidOperation,
            0x0503 => DeviceError::StackOverflow,
            0x0504 => DeviceError::StackUnderflow,
            0x0505 => DeviceError::OutOfMemory,
            0x0506 => DeviceError::InvalidFramebufferOperation,
            0x0507 => DeviceError::ContextLost,
            other => DeviceError::Other(other),
        };
        Some(error)
    }

    pub fn code(self) -> u32 {
        match self {
            DeviceError::InvalidEnum => 0x0500,
            DeviceError::InvalidValue => 0x0501,
            DeviceError::InvalidOperation => 0x0502,
            DeviceError::StackOverflow => 0x0503,
            DeviceError::StackUnderflow => 0x0504,
            DeviceError::OutOfMemory => 0x0505,
            DeviceError::InvalidFramebufferOperation => 0x0506,
            DeviceError::ContextLost => 0x0507,
            DeviceError::Other(code) => code,
        }
    }

    fn name(self) -> Option<&'static str> {
        match self {
            DeviceError::InvalidEnum => Some("GL_INVALID_ENUM"),
            DeviceError::InvalidValue => Some("GL_INVALID_VALUE"),
            DeviceError::InvalidOperation => Some("GL_INVALID_OPERATION"),
            DeviceError::StackOverflow => Some("GL_STACK_OVERFLOW"),
            DeviceError::StackUnderflow => Some("GL_STACK_UNDERFLOW"),
            DeviceError::OutOfMemory => Some("GL_OUT_OF_MEMORY"),
            DeviceError::InvalidFramebufferOperation => Some("GL_INVALID_FRAMEBUFFER_OPERATION"),
            DeviceError::ContextLost => Some("GL_CONTEXT_LOST"),
            DeviceError::Other(_) => None,
        }
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({:#06X})", name, self.code()),
            None => write!(f, "{:#06X}", self.code()),
        }
    }
}

// ===== ATTRIBUTES =====

/// Index of a per-vertex input slot of the active shader pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttribLocation(pub u32);

impl AttribLocation {
    pub const POSITION: AttribLocation = AttribLocation(0);
    pub const NORMAL: AttribLocation = AttribLocation(1);
    pub const TEX_COORD: AttribLocation = AttribLocation(2);
    pub const COLOR: AttribLocation = AttribLocation(3);
    /// Reserved sentinel: the shader does not consume this stream
    pub const UNUSED: AttribLocation = AttribLocation(u32::MAX);

    pub fn is_unused(self) -> bool {
        self == Self::UNUSED
    }
}

impl fmt::Display for AttribLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unused() {
            f.write_str("unused")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Layout of an attribute slot as described to the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttribLayout {
    /// Components per vertex (1..=4)
    pub components: u32,
    pub data_type: DataType,
    /// Fixed-point values are mapped to [0, 1] / [-1, 1]
    pub normalized: bool,
    /// Byte distance between vertices, 0 means tightly packed
    pub stride: usize,
    /// Byte offset of the first component inside the bound buffer
    pub offset: usize,
}

// ===== CAPABILITIES =====

bitflags! {
    /// Optional entry points exposed by a rendering context
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ContextCapabilities: u32 {
        /// Buffer create/delete/bind/upload entry points
        const BUFFER_OBJECTS    = 1 << 0;
        /// Vertex attribute enable/disable/layout entry points
        const VERTEX_ATTRIBUTES = 1 << 1;
        /// Synchronous readback of buffer contents
        const BUFFER_READBACK   = 1 << 2;
    }
}

// ===== DIAGNOSTIC MESSAGES =====

/// Severity attached to a message pushed into a context's diagnostic sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MessageSeverity {
    Notification,
    Low,
    Medium,
    High,
}

/// Category of a diagnostic message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Error,
    Performance,
    Portability,
    Other,
}

/// Structured message recorded through `RenderContext::push_message`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub kind: MessageKind,
    pub severity: MessageSeverity,
    pub id: u32,
    pub text: String,
}

impl DiagnosticMessage {
    /// High-severity error raised by the application layer
    pub fn error(text: String) -> Self {
        Self {
            kind: MessageKind::Error,
            severity: MessageSeverity::High,
            id: 0,
            text,
        }
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
