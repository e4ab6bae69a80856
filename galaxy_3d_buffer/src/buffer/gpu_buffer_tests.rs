/// Unit tests for GpuBuffer
///
/// Every test runs against a SoftwareContext and checks both the returned
/// result and the device calls recorded by the context. Tests that do not
/// swap the global logger release all their buffers, so no leak is logged
/// while a serial test captures entries.

use super::*;
use crate::buffer::{AttributeStreams, IndexBuffer, VertexBuffer};
use crate::context::{MessageSeverity, SoftwareContext, SoftwareContextConfig};
use crate::log::{self, LogEntry, LogSeverity, Logger};
use glam::Vec3;
use serial_test::serial;
use std::sync::{Arc, Mutex};

fn created(ctx: &mut SoftwareContext) -> VertexBuffer {
    let mut buffer = VertexBuffer::new();
    buffer.create(ctx).unwrap();
    buffer
}

/// 100 four-byte elements holding bytes 0, 1, 2, ... (mod 256)
fn hundred_words(ctx: &mut SoftwareContext) -> VertexBuffer {
    let bytes: Vec<u8> = (0..400).map(|i| (i % 256) as u8).collect();
    let mut buffer = VertexBuffer::new();
    buffer
        .upload_full(ctx, 1, 100, Some(bytes.as_slice()), DataType::UnsignedInt, 4)
        .unwrap();
    ctx.clear_calls();
    buffer
}

// ============================================================================
// Construction and lifecycle
// ============================================================================

#[test]
fn test_new_buffer_defaults() {
    let buffer = VertexBuffer::new();
    assert!(!buffer.is_valid());
    assert_eq!(buffer.handle(), None);
    assert_eq!(buffer.target(), BufferTarget::Array);
    assert_eq!(buffer.components(), 4);
    assert_eq!(buffer.element_count(), 0);
    assert_eq!(buffer.data_type(), DataType::Float);
    assert_eq!(buffer.byte_offset(), None);
    assert!(!buffer.is_virtual());
    assert_eq!(buffer.estimated_data_size(), 0);
}

#[test]
fn test_index_buffer_target() {
    let mut ctx = SoftwareContext::new();
    let mut buffer = IndexBuffer::default();
    assert_eq!(buffer.target(), BufferTarget::ElementArray);

    buffer.create(&mut ctx).unwrap();
    buffer.bind(&mut ctx);
    assert_eq!(ctx.bound_buffer(BufferTarget::ElementArray), buffer.handle());
    assert!(ctx.bound_buffer(BufferTarget::Array).is_none());

    buffer.release(Some(&mut ctx));
}

#[test]
fn test_create_is_idempotent() {
    let mut ctx = SoftwareContext::new();
    let mut buffer = VertexBuffer::new();

    assert_eq!(buffer.create(&mut ctx), Ok(()));
    let handle = buffer.handle();
    assert_eq!(buffer.create(&mut ctx), Ok(()));

    assert!(buffer.is_valid());
    assert_eq!(buffer.handle(), handle);
    assert_eq!(ctx.live_buffers(), 1);
    assert_eq!(ctx.calls(), &["gen_buffer"]);

    buffer.release(Some(&mut ctx));
}

#[test]
fn test_create_requires_buffer_objects() {
    let mut ctx = SoftwareContext::with_config(SoftwareContextConfig {
        capabilities: ContextCapabilities::VERTEX_ATTRIBUTES,
        ..Default::default()
    });
    let mut buffer = VertexBuffer::new();
    assert!(matches!(buffer.create(&mut ctx), Err(Error::Unsupported(_))));
    assert!(!buffer.is_valid());
    assert!(ctx.calls().is_empty());
}

#[test]
fn test_create_on_lost_context() {
    let mut ctx = SoftwareContext::new();
    ctx.set_valid(false);
    let mut buffer = VertexBuffer::new();
    assert_eq!(buffer.create(&mut ctx), Err(Error::ContextLost));
    assert!(!buffer.is_valid());
    assert!(ctx.calls().is_empty());
}

#[test]
fn test_release_deletes_name() {
    let mut ctx = SoftwareContext::new();
    let mut buffer = created(&mut ctx);
    buffer.set_byte_offset(Some(32));

    buffer.release(Some(&mut ctx));
    assert!(!buffer.is_valid());
    assert_eq!(buffer.byte_offset(), None);
    assert_eq!(ctx.live_buffers(), 0);

    // Second release is a no-op
    ctx.clear_calls();
    buffer.release(Some(&mut ctx));
    assert!(ctx.calls().is_empty());
}

#[test]
fn test_bind_after_release_is_guarded() {
    let mut ctx = SoftwareContext::new();
    let mut buffer = created(&mut ctx);
    buffer.release(Some(&mut ctx));
    ctx.clear_calls();

    buffer.bind(&mut ctx);
    buffer.unbind(&mut ctx);
    assert!(ctx.calls().is_empty());
    assert!(ctx.bound_buffer(BufferTarget::Array).is_none());
}

#[test]
fn test_release_on_lost_context_forgets_name() {
    let mut ctx = SoftwareContext::new();
    let mut buffer = created(&mut ctx);
    ctx.set_valid(false);
    ctx.clear_calls();

    buffer.release(Some(&mut ctx));
    assert!(!buffer.is_valid());
    assert!(ctx.calls().is_empty());
}

#[test]
fn test_recreate_after_release() {
    let mut ctx = SoftwareContext::new();
    let mut buffer = created(&mut ctx);
    buffer.release(Some(&mut ctx));

    buffer.create(&mut ctx).unwrap();
    assert!(buffer.is_valid());
    assert_eq!(ctx.live_buffers(), 1);

    buffer.release(Some(&mut ctx));
}

#[test]
fn test_bind_and_unbind() {
    let mut ctx = SoftwareContext::new();
    let mut buffer = created(&mut ctx);

    buffer.bind(&mut ctx);
    assert_eq!(ctx.bound_buffer(BufferTarget::Array), buffer.handle());
    buffer.unbind(&mut ctx);
    assert!(ctx.bound_buffer(BufferTarget::Array).is_none());

    buffer.release(Some(&mut ctx));
}

// ============================================================================
// Full upload
// ============================================================================

#[test]
fn test_empty_upload_then_sub_upload_fails() {
    let mut ctx = SoftwareContext::new();
    let mut buffer = VertexBuffer::new();

    assert_eq!(buffer.upload_full(&mut ctx, 3, 0, None, DataType::Float, 12), Ok(()));
    assert!(buffer.is_valid());
    assert_eq!(buffer.element_count(), 0);
    assert_eq!(buffer.components(), 3);
    ctx.clear_calls();

    let result = buffer.upload_sub(&mut ctx, 0, 1, &[0u8; 12], DataType::Float);
    assert_eq!(result, Err(Error::OutOfRange { from: 0, count: 1, available: 0 }));
    assert!(ctx.calls().is_empty());

    buffer.release(Some(&mut ctx));
}

#[test]
fn test_upload_full_call_sequence() {
    let mut ctx = SoftwareContext::new();
    let mut buffer = VertexBuffer::new();
    buffer.init(&mut ctx, &[1.0f32, 2.0, 3.0]).unwrap();

    assert_eq!(ctx.calls(), &["gen_buffer", "bind_buffer", "buffer_data", "bind_buffer"]);
    let id = buffer.handle().unwrap();
    assert_eq!(ctx.buffer_usage(id), Some(BufferUsage::StaticDraw));
    assert_eq!(ctx.buffer_contents(id).map(<[u8]>::len), Some(12));
    assert!(ctx.bound_buffer(BufferTarget::Array).is_none());
    assert!(ctx.messages().is_empty());

    buffer.release(Some(&mut ctx));
}

#[test]
fn test_upload_full_without_data_allocates() {
    let mut ctx = SoftwareContext::new();
    let mut buffer = VertexBuffer::new();
    buffer.upload_full(&mut ctx, 4, 8, None, DataType::Float, 16).unwrap();

    assert_eq!(buffer.element_count(), 8);
    assert_eq!(ctx.allocated_bytes(), 128);
    assert_eq!(buffer.estimated_data_size(), 128);

    buffer.release(Some(&mut ctx));
}

#[test]
fn test_upload_full_rejects_short_source() {
    let mut ctx = SoftwareContext::new();
    let mut buffer = VertexBuffer::new();
    let result = buffer.upload_full(&mut ctx, 1, 4, Some(&[0u8; 15][..]), DataType::Float, 4);
    assert_eq!(result, Err(Error::BufferTooSmall { required: 16, provided: 15 }));
    assert!(!buffer.is_valid());
    assert!(ctx.calls().is_empty());
}

#[test]
fn test_upload_full_rejects_zero_components() {
    let mut ctx = SoftwareContext::new();
    let mut buffer = VertexBuffer::new();
    let result = buffer.upload_full(&mut ctx, 0, 4, None, DataType::Float, 4);
    assert!(matches!(result, Err(Error::InvalidResource(_))));
    assert!(ctx.calls().is_empty());
}

#[test]
fn test_out_of_memory_is_silent_and_keeps_name() {
    let mut ctx = SoftwareContext::with_config(SoftwareContextConfig {
        memory_limit: Some(64),
        ..Default::default()
    });
    let mut buffer = VertexBuffer::new();

    let result = buffer.init(&mut ctx, &[0.0f32; 100]);
    assert_eq!(result, Err(Error::OutOfMemory));
    assert!(ctx.messages().is_empty());
    assert!(buffer.is_valid());
    assert_eq!(ctx.live_buffers(), 1);
    // Shape describes the request, not the (missing) storage
    assert_eq!(buffer.element_count(), 100);
    assert!(ctx.bound_buffer(BufferTarget::Array).is_none());

    // A smaller upload into the same name succeeds
    assert_eq!(buffer.init(&mut ctx, &[0.0f32; 16]), Ok(()));

    buffer.release(Some(&mut ctx));
}

#[test]
fn test_device_error_on_upload_full_is_reported() {
    let mut ctx = SoftwareContext::new();
    ctx.inject_error(DeviceError::InvalidEnum);
    let mut buffer = VertexBuffer::new();

    let result = buffer.init(&mut ctx, &[1u32, 2, 3, 4]);
    assert_eq!(result, Err(Error::Device(DeviceError::InvalidEnum)));

    assert_eq!(ctx.messages().len(), 1);
    let message = &ctx.messages()[0];
    assert_eq!(message.severity, MessageSeverity::High);
    assert!(message.text.starts_with("Error: glBufferData (GL_ARRAY_BUFFER,16,0x"));
    assert!(message.text.ends_with("Id: 1 failed with GL_INVALID_ENUM (0x0500)"));

    buffer.release(Some(&mut ctx));
}

#[test]
fn test_device_error_without_source_reports_null() {
    let mut ctx = SoftwareContext::new();
    ctx.inject_error(DeviceError::InvalidValue);
    let mut buffer = VertexBuffer::new();

    let result = buffer.upload_full(&mut ctx, 2, 3, None, DataType::Short, 4);
    assert_eq!(result, Err(Error::Device(DeviceError::InvalidValue)));
    assert!(ctx.messages()[0].text.contains("(GL_ARRAY_BUFFER,12,NULL)"));

    buffer.release(Some(&mut ctx));
}

// ============================================================================
// Partial upload
// ============================================================================

#[test]
fn test_sub_upload_touches_only_its_range() {
    let mut ctx = SoftwareContext::new();
    let mut buffer = hundred_words(&mut ctx);
    let before = ctx.buffer_contents(buffer.handle().unwrap()).unwrap().to_vec();

    assert_eq!(buffer.upload_sub(&mut ctx, 50, 10, &[0xFF; 40], DataType::UnsignedInt), Ok(()));
    assert_eq!(ctx.calls(), &["bind_buffer", "buffer_sub_data", "bind_buffer"]);

    let after = ctx.buffer_contents(buffer.handle().unwrap()).unwrap();
    assert_eq!(after[..200], before[..200]);
    assert!(after[200..240].iter().all(|b| *b == 0xFF));
    assert_eq!(after[240..], before[240..]);

    buffer.release(Some(&mut ctx));
}

#[test]
fn test_sub_upload_range_checks() {
    let mut ctx = SoftwareContext::new();
    let mut buffer = hundred_words(&mut ctx);
    let data = [0u8; 400];

    assert!(matches!(
        buffer.upload_sub(&mut ctx, -1, 1, &data, DataType::UnsignedInt),
        Err(Error::OutOfRange { from: -1, .. })
    ));
    assert!(matches!(
        buffer.upload_sub(&mut ctx, 95, 6, &data, DataType::UnsignedInt),
        Err(Error::OutOfRange { available: 100, .. })
    ));
    assert!(matches!(
        buffer.upload_sub(&mut ctx, 1, usize::MAX, &data, DataType::UnsignedInt),
        Err(Error::OutOfRange { .. })
    ));
    assert_eq!(
        buffer.upload_sub(&mut ctx, 0, 1, &data, DataType::Float),
        Err(Error::TypeMismatch { expected: DataType::UnsignedInt, actual: DataType::Float })
    );
    assert_eq!(
        buffer.upload_sub(&mut ctx, 0, 2, &data[..7], DataType::UnsignedInt),
        Err(Error::BufferTooSmall { required: 8, provided: 7 })
    );
    assert!(ctx.calls().is_empty());

    // The last element is still reachable
    assert_eq!(buffer.upload_sub(&mut ctx, 99, 1, &data, DataType::UnsignedInt), Ok(()));

    buffer.release(Some(&mut ctx));
}

#[test]
fn test_byte_offset_overflow_is_out_of_range() {
    let mut ctx = SoftwareContext::new();
    let mut buffer = VertexBuffer::new();
    buffer.upload_full(&mut ctx, 4, 1, None, DataType::Float, 16).unwrap();
    buffer.set_element_count(usize::MAX);
    ctx.clear_calls();

    let data = [0u8; 16];
    assert!(matches!(
        buffer.upload_sub(&mut ctx, isize::MAX, 1, &data, DataType::Float),
        Err(Error::OutOfRange { from: isize::MAX, count: 1, .. })
    ));
    let mut out = [0u8; 16];
    assert!(matches!(
        buffer.read_sub(&mut ctx, isize::MAX, 1, &mut out, DataType::Float),
        Err(Error::OutOfRange { from: isize::MAX, count: 1, .. })
    ));
    assert!(matches!(
        buffer.upload_sub(&mut ctx, 0, usize::MAX / 8, &data, DataType::Float),
        Err(Error::OutOfRange { .. })
    ));
    assert!(ctx.calls().is_empty());

    buffer.set_element_count(1);
    buffer.release(Some(&mut ctx));
}

#[test]
fn test_sub_upload_on_invalid_buffer() {
    let mut ctx = SoftwareContext::new();
    let buffer = VertexBuffer::new();
    let result = buffer.upload_sub(&mut ctx, 0, 0, &[], DataType::Float);
    assert!(matches!(result, Err(Error::InvalidResource(_))));
    assert!(ctx.calls().is_empty());
}

#[test]
fn test_sub_upload_reports_every_device_error() {
    let mut ctx = SoftwareContext::new();
    let mut buffer = hundred_words(&mut ctx);

    ctx.inject_error(DeviceError::OutOfMemory);
    let result = buffer.upload_sub(&mut ctx, 0, 1, &[1, 2, 3, 4], DataType::UnsignedInt);
    assert_eq!(result, Err(Error::OutOfMemory));
    assert_eq!(ctx.messages().len(), 1);
    assert!(ctx.messages()[0].text.starts_with("Error: glBufferSubData (GL_ARRAY_BUFFER,0,4,0x"));
    assert!(ctx.messages()[0].text.contains("failed with GL_OUT_OF_MEMORY"));

    ctx.inject_error(DeviceError::InvalidOperation);
    let result = buffer.upload_sub(&mut ctx, 2, 1, &[1, 2, 3, 4], DataType::UnsignedInt);
    assert_eq!(result, Err(Error::Device(DeviceError::InvalidOperation)));
    assert_eq!(ctx.messages().len(), 2);
    assert!(ctx.messages()[1].text.contains("(GL_ARRAY_BUFFER,8,4,"));
    assert!(ctx.bound_buffer(BufferTarget::Array).is_none());

    buffer.release(Some(&mut ctx));
}

// ============================================================================
// Readback
// ============================================================================

#[test]
fn test_upload_then_read_back() {
    let mut ctx = SoftwareContext::new();
    let mut buffer = hundred_words(&mut ctx);

    let mut out = [0u8; 400];
    assert_eq!(buffer.read_sub(&mut ctx, 0, 100, &mut out, DataType::UnsignedInt), Ok(()));
    assert!(out.iter().enumerate().all(|(i, b)| *b == (i % 256) as u8));
    assert_eq!(ctx.calls(), &["bind_buffer", "get_buffer_sub_data", "bind_buffer"]);

    let mut tail = [0u8; 8];
    buffer.read_sub(&mut ctx, 98, 2, &mut tail, DataType::UnsignedInt).unwrap();
    assert_eq!(tail, [136, 137, 138, 139, 140, 141, 142, 143]);

    buffer.release(Some(&mut ctx));
}

#[test]
fn test_read_back_rejections() {
    let mut ctx = SoftwareContext::new();
    let mut buffer = hundred_words(&mut ctx);
    let mut out = [0u8; 400];

    assert!(matches!(
        buffer.read_sub(&mut ctx, -3, 1, &mut out, DataType::UnsignedInt),
        Err(Error::OutOfRange { .. })
    ));
    assert!(matches!(
        buffer.read_sub(&mut ctx, 100, 1, &mut out, DataType::UnsignedInt),
        Err(Error::OutOfRange { .. })
    ));
    assert!(matches!(
        buffer.read_sub(&mut ctx, 0, 1, &mut out, DataType::Int),
        Err(Error::TypeMismatch { .. })
    ));
    assert_eq!(
        buffer.read_sub(&mut ctx, 0, 3, &mut out[..11], DataType::UnsignedInt),
        Err(Error::BufferTooSmall { required: 12, provided: 11 })
    );

    ctx.set_capabilities(ContextCapabilities::BUFFER_OBJECTS | ContextCapabilities::VERTEX_ATTRIBUTES);
    assert!(matches!(
        buffer.read_sub(&mut ctx, 0, 1, &mut out, DataType::UnsignedInt),
        Err(Error::Unsupported(_))
    ));
    assert!(ctx.calls().is_empty());

    buffer.release(Some(&mut ctx));
}

#[test]
fn test_read_back_error_is_not_reported() {
    let mut ctx = SoftwareContext::new();
    let mut buffer = hundred_words(&mut ctx);
    let mut out = [0u8; 4];

    ctx.inject_error(DeviceError::InvalidOperation);
    let result = buffer.read_sub(&mut ctx, 0, 1, &mut out, DataType::UnsignedInt);
    assert_eq!(result, Err(Error::Device(DeviceError::InvalidOperation)));
    assert!(ctx.messages().is_empty());
    assert!(ctx.bound_buffer(BufferTarget::Array).is_none());

    buffer.release(Some(&mut ctx));
}

// ============================================================================
// Typed overloads
// ============================================================================

#[test]
fn test_typed_round_trip() {
    let mut ctx = SoftwareContext::new();
    let mut buffer = VertexBuffer::new();
    let positions = [Vec3::new(0.0, 1.0, 2.0), Vec3::new(3.0, 4.0, 5.0), Vec3::X];

    buffer.init(&mut ctx, &positions).unwrap();
    assert_eq!(buffer.components(), 3);
    assert_eq!(buffer.data_type(), DataType::Float);
    assert_eq!(buffer.element_count(), 3);
    assert_eq!(buffer.estimated_data_size(), 36);

    // Scalars are regrouped into whole elements
    buffer.sub_data(&mut ctx, 1, &[7.0f32, 8.0, 9.0]).unwrap();
    let mut out = [Vec3::ZERO; 3];
    buffer.get_sub_data(&mut ctx, 0, &mut out).unwrap();
    assert_eq!(out, [positions[0], Vec3::new(7.0, 8.0, 9.0), Vec3::X]);

    assert!(matches!(
        buffer.sub_data(&mut ctx, 0, &[1.0f32, 2.0]),
        Err(Error::InvalidResource(_))
    ));

    buffer.release(Some(&mut ctx));
}

#[test]
fn test_init_components_groups_scalars() {
    let mut ctx = SoftwareContext::new();
    let mut buffer = VertexBuffer::new();
    buffer.init_components(&mut ctx, 2, &[0.0f32, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
    assert_eq!(buffer.components(), 2);
    assert_eq!(buffer.element_count(), 3);

    assert!(matches!(
        buffer.init_components(&mut ctx, 4, &[0.0f32; 6]),
        Err(Error::InvalidResource(_))
    ));

    buffer.release(Some(&mut ctx));
}

#[test]
fn test_init_from_shared_array() {
    let mut ctx = SoftwareContext::new();
    let mut buffer = IndexBuffer::new();
    let indices = SharedArray::from_vec(vec![0u16, 1, 2, 2, 3, 0]);

    buffer.init_from_array(&mut ctx, &indices).unwrap();
    assert_eq!(buffer.element_count(), 6);
    assert_eq!(buffer.data_type(), DataType::UnsignedShort);

    let mut out = [0u16; 6];
    buffer.get_sub_data(&mut ctx, 0, &mut out).unwrap();
    assert_eq!(&out[..], indices.as_slice());

    buffer.release(Some(&mut ctx));
}

// ============================================================================
// Attributes
// ============================================================================

#[test]
fn test_bind_attribute_describes_layout() {
    let mut ctx = SoftwareContext::new();
    let mut buffer = VertexBuffer::new();
    buffer.init(&mut ctx, &[Vec3::ZERO; 4]).unwrap();
    buffer.set_byte_offset(Some(48));

    buffer.bind_attribute(&mut ctx, AttribLocation::NORMAL);
    assert_eq!(ctx.get_error(), None);
    assert!(ctx.is_attribute_enabled(AttribLocation::NORMAL));
    assert_eq!(
        ctx.attribute_layout(AttribLocation::NORMAL),
        Some(AttribLayout {
            components: 3,
            data_type: DataType::Float,
            normalized: false,
            stride: 0,
            offset: 48,
        })
    );
    // Left bound until the attribute scope ends
    assert_eq!(ctx.bound_buffer(BufferTarget::Array), buffer.handle());

    buffer.unbind_attribute(&mut ctx, AttribLocation::NORMAL);
    assert!(!ctx.is_attribute_enabled(AttribLocation::NORMAL));
    assert!(ctx.bound_buffer(BufferTarget::Array).is_none());

    buffer.release(Some(&mut ctx));
}

#[test]
fn test_attribute_guards() {
    let mut ctx = SoftwareContext::new();
    let uncreated = VertexBuffer::new();
    uncreated.bind_attribute(&mut ctx, AttribLocation::POSITION);
    uncreated.unbind_attribute(&mut ctx, AttribLocation::POSITION);

    let mut buffer = created(&mut ctx);
    ctx.clear_calls();
    buffer.bind_attribute(&mut ctx, AttribLocation::UNUSED);
    buffer.unbind_attribute(&mut ctx, AttribLocation::UNUSED);
    assert!(ctx.calls().is_empty());

    buffer.release(Some(&mut ctx));
}

#[test]
fn test_attributes_need_vertex_attribute_capability() {
    let mut ctx = SoftwareContext::new();
    let mut buffer = created(&mut ctx);
    ctx.set_capabilities(ContextCapabilities::BUFFER_OBJECTS | ContextCapabilities::BUFFER_READBACK);
    ctx.clear_calls();

    buffer.bind_attribute(&mut ctx, AttribLocation::POSITION);
    assert!(!ctx.is_attribute_enabled(AttribLocation::POSITION));
    buffer.unbind_attribute(&mut ctx, AttribLocation::POSITION);
    assert!(ctx.calls().is_empty());

    buffer.release(Some(&mut ctx));
}

#[test]
fn test_default_attribute_hooks_are_inert() {
    let mut ctx = SoftwareContext::new();
    let mut buffer = created(&mut ctx);
    ctx.clear_calls();

    buffer.bind_all_attributes(&mut ctx);
    buffer.bind_position_attribute(&mut ctx);
    buffer.unbind_all_attributes(&mut ctx);
    assert!(ctx.calls().is_empty());
    assert!(!buffer.has_color_attribute());
    assert!(!buffer.has_normal_attribute());

    buffer.release(Some(&mut ctx));
}

// ============================================================================
// Leak detection
// ============================================================================

struct CaptureLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

fn leak_reports(entries: &Arc<Mutex<Vec<LogEntry>>>) -> Vec<LogEntry> {
    entries
        .lock()
        .unwrap()
        .iter()
        .filter(|entry| entry.source == "galaxy3d::GpuBuffer" && entry.severity == LogSeverity::Error)
        .cloned()
        .collect()
}

#[test]
#[serial]
fn test_drop_without_release_reports_leak() {
    let entries = Arc::new(Mutex::new(Vec::new()));
    log::set_logger(CaptureLogger { entries: entries.clone() });

    let mut ctx = SoftwareContext::new();
    {
        let _buffer = created(&mut ctx);
    }

    let reports = leak_reports(&entries);
    log::reset_logger();

    assert!(reports
        .iter()
        .any(|entry| entry.message.contains("destroyed without GL context! Possible GPU memory leakage")));
    assert!(reports.iter().all(|entry| entry.file.is_some() && entry.line.is_some()));
    // The name is still alive on the context
    assert_eq!(ctx.live_buffers(), 1);
}

#[test]
#[serial]
fn test_release_without_context_keeps_name() {
    let entries = Arc::new(Mutex::new(Vec::new()));
    log::set_logger(CaptureLogger { entries: entries.clone() });

    let mut ctx = SoftwareContext::new();
    let mut buffer = created(&mut ctx);
    buffer.release(None);
    let reports = leak_reports(&entries);
    log::reset_logger();

    assert!(!reports.is_empty());
    assert!(buffer.is_valid());

    buffer.release(Some(&mut ctx));
    assert!(!buffer.is_valid());
    assert_eq!(ctx.live_buffers(), 0);
}

#[test]
#[serial]
fn test_release_of_invalid_buffer_logs_nothing() {
    let entries = Arc::new(Mutex::new(Vec::new()));
    log::set_logger(CaptureLogger { entries: entries.clone() });

    let mut buffer = VertexBuffer::new();
    buffer.release(None);
    drop(buffer);

    let reports = leak_reports(&entries);
    log::reset_logger();
    assert!(reports.is_empty());
}
