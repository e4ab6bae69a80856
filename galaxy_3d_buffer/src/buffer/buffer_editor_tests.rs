use super::*;
use crate::buffer::{IndexBuffer, VertexBuffer};
use crate::context::{DataType, DeviceError, SoftwareContext};
use glam::Vec3;

fn index_buffer(ctx: &mut SoftwareContext, count: usize) -> IndexBuffer {
    let mut buffer = IndexBuffer::new();
    buffer.init(ctx, &vec![0u32; count]).unwrap();
    ctx.clear_calls();
    buffer
}

#[test]
fn test_push_flushes_full_chunks() {
    let mut ctx = SoftwareContext::new();
    let mut buffer = index_buffer(&mut ctx, 5);

    {
        let mut editor = BufferEditor::<_, u32>::new(&buffer, 2).unwrap();
        editor.push(&mut ctx, 10).unwrap();
        assert_eq!(editor.staged(), &[10]);
        assert!(ctx.calls().is_empty());

        editor.push(&mut ctx, 11).unwrap();
        assert!(editor.staged().is_empty());
        assert_eq!(editor.cursor(), 2);
        assert_eq!(
            ctx.calls().iter().filter(|c| *c == "buffer_sub_data").count(),
            1
        );

        editor.push(&mut ctx, 12).unwrap();
        editor.flush(&mut ctx).unwrap();
        assert_eq!(editor.cursor(), 3);
    }

    let mut out = [0u32; 5];
    buffer.get_sub_data(&mut ctx, 0, &mut out).unwrap();
    assert_eq!(out, [10, 11, 12, 0, 0]);

    buffer.release(Some(&mut ctx));
}

#[test]
fn test_push_past_end_is_rejected() {
    let mut ctx = SoftwareContext::new();
    let mut buffer = index_buffer(&mut ctx, 2);

    {
        let mut editor = BufferEditor::<_, u32>::new(&buffer, 8).unwrap();
        editor.push(&mut ctx, 1).unwrap();
        editor.push(&mut ctx, 2).unwrap();
        let result = editor.push(&mut ctx, 3);
        assert_eq!(result, Err(Error::OutOfRange { from: 2, count: 1, available: 2 }));
        assert_eq!(editor.staged(), &[1, 2]);
        editor.flush(&mut ctx).unwrap();
    }

    buffer.release(Some(&mut ctx));
}

#[test]
fn test_seek_flushes_and_moves_cursor() {
    let mut ctx = SoftwareContext::new();
    let mut buffer = index_buffer(&mut ctx, 4);

    {
        let mut editor = BufferEditor::<_, u32>::new(&buffer, 4).unwrap();
        editor.push(&mut ctx, 7).unwrap();
        editor.seek(&mut ctx, 3).unwrap();
        assert!(editor.staged().is_empty());
        editor.push(&mut ctx, 9).unwrap();
        editor.flush(&mut ctx).unwrap();
        assert!(matches!(editor.seek(&mut ctx, 5), Err(Error::OutOfRange { .. })));
    }

    let mut out = [0u32; 4];
    buffer.get_sub_data(&mut ctx, 0, &mut out).unwrap();
    assert_eq!(out, [7, 0, 0, 9]);

    buffer.release(Some(&mut ctx));
}

#[test]
fn test_failed_flush_keeps_staged_values() {
    let mut ctx = SoftwareContext::new();
    let mut buffer = index_buffer(&mut ctx, 4);

    {
        let mut editor = BufferEditor::<_, u32>::new(&buffer, 4).unwrap();
        editor.push(&mut ctx, 1).unwrap();
        ctx.inject_error(DeviceError::InvalidOperation);
        assert_eq!(
            editor.flush(&mut ctx),
            Err(Error::Device(DeviceError::InvalidOperation))
        );
        assert_eq!(editor.staged(), &[1]);
        assert_eq!(editor.cursor(), 1);

        editor.flush(&mut ctx).unwrap();
        assert!(editor.staged().is_empty());
    }

    buffer.release(Some(&mut ctx));
}

#[test]
fn test_failed_chunk_flush_retries_before_staging_more() {
    let mut ctx = SoftwareContext::new();
    let mut buffer = index_buffer(&mut ctx, 6);

    {
        let mut editor = BufferEditor::<_, u32>::new(&buffer, 2).unwrap();
        editor.push(&mut ctx, 1).unwrap();
        ctx.inject_error(DeviceError::InvalidOperation);
        assert_eq!(
            editor.push(&mut ctx, 2),
            Err(Error::Device(DeviceError::InvalidOperation))
        );
        assert_eq!(editor.staged(), &[1, 2]);

        // The retry fails again: the new value is not staged
        ctx.inject_error(DeviceError::InvalidOperation);
        assert_eq!(
            editor.push(&mut ctx, 3),
            Err(Error::Device(DeviceError::InvalidOperation))
        );
        assert_eq!(editor.staged(), &[1, 2]);
        assert_eq!(editor.cursor(), 2);

        for value in 3..6 {
            editor.push(&mut ctx, value).unwrap();
            assert!(editor.staged().len() <= editor.chunk_len());
        }
        assert_eq!(editor.staged(), &[5]);
        assert_eq!(editor.cursor(), 5);
        editor.flush(&mut ctx).unwrap();
    }

    let mut out = [0u32; 6];
    buffer.get_sub_data(&mut ctx, 0, &mut out).unwrap();
    assert_eq!(out, [1, 2, 3, 4, 5, 0]);

    buffer.release(Some(&mut ctx));
}

#[test]
fn test_vector_elements() {
    let mut ctx = SoftwareContext::new();
    let mut buffer = VertexBuffer::new();
    buffer.init(&mut ctx, &[Vec3::ZERO; 3]).unwrap();

    {
        let mut editor = BufferEditor::<_, Vec3>::new(&buffer, 3).unwrap();
        for i in 0..3 {
            editor.push(&mut ctx, Vec3::splat(i as f32)).unwrap();
        }
        assert!(editor.staged().is_empty());
    }

    let mut out = [Vec3::ZERO; 3];
    buffer.get_sub_data(&mut ctx, 0, &mut out).unwrap();
    assert_eq!(out, [Vec3::splat(0.0), Vec3::splat(1.0), Vec3::splat(2.0)]);

    buffer.release(Some(&mut ctx));
}

#[test]
fn test_new_rejects_mismatched_buffers() {
    let mut ctx = SoftwareContext::new();

    let uncreated = VertexBuffer::new();
    assert!(matches!(
        BufferEditor::<_, f32>::new(&uncreated, 4),
        Err(Error::InvalidResource(_))
    ));

    let mut buffer = VertexBuffer::new();
    buffer.init(&mut ctx, &[Vec3::ZERO; 2]).unwrap();
    assert_eq!(
        BufferEditor::<_, u32>::new(&buffer, 4).err(),
        Some(Error::TypeMismatch { expected: DataType::Float, actual: DataType::UnsignedInt })
    );
    assert!(matches!(BufferEditor::<_, f32>::new(&buffer, 4), Err(Error::InvalidResource(_))));
    assert!(matches!(BufferEditor::<_, Vec3>::new(&buffer, 0), Err(Error::InvalidResource(_))));

    buffer.release(Some(&mut ctx));
}
