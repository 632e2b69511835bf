use geometry_renderer::layout::{
    uniform_buffer_size, uniform_stride, InstanceUniform, LayoutError, UniformPlan,
};

#[test]
fn test_stride_is_aligned_and_covers_block() {
    for block_size in [1u64, 15, 16, 32, 33, 255, 256, 1000] {
        for min_alignment in [16u64, 64, 256] {
            let stride = uniform_stride(block_size, min_alignment).unwrap();
            assert_eq!(stride % min_alignment, 0);
            assert!(stride >= block_size);
            // Smallest such multiple.
            assert!(stride - block_size < min_alignment);
        }
    }
}

#[test]
fn test_buffer_size_lower_bounds() {
    let block_size = InstanceUniform::SIZE;
    let stride = uniform_stride(block_size, 256).unwrap();
    for instance_count in 1..=8 {
        let size = uniform_buffer_size(stride, block_size, instance_count);
        assert!(size >= block_size);
        if instance_count == 1 {
            assert_eq!(size, block_size);
        }
    }
}

#[test]
fn test_zero_alignment_fails() {
    assert_eq!(
        uniform_stride(InstanceUniform::SIZE, 0),
        Err(LayoutError::ZeroAlignment)
    );
}

#[test]
fn test_block_size_is_multiple_of_16() {
    assert_eq!(InstanceUniform::SIZE % 16, 0);
    assert_eq!(InstanceUniform::SIZE, 32);
}

#[test]
fn test_uniform_round_trip_through_staging_buffer() {
    // Two blocks written at their planned offsets into a CPU image of the
    // shared buffer, then read back at 0 and stride.
    let plan = UniformPlan::new(InstanceUniform::SIZE, 256, 2).unwrap();
    let first = InstanceUniform::new([0.0, 1.0, 0.4, 1.0], 1.0);
    let second = InstanceUniform::new([1.0, 1.0, 1.0, 0.7], -1.0);

    let mut staging = vec![0u8; plan.buffer_size as usize];
    for (instance, block) in [(0, &first), (1, &second)] {
        let offset = plan.offset_for(instance).unwrap() as usize;
        let size = InstanceUniform::SIZE as usize;
        staging[offset..offset + size].copy_from_slice(bytemuck::bytes_of(block));
    }

    let read_first: InstanceUniform =
        bytemuck::pod_read_unaligned(&staging[0..InstanceUniform::SIZE as usize]);
    let stride = plan.stride as usize;
    let read_second: InstanceUniform =
        bytemuck::pod_read_unaligned(&staging[stride..stride + InstanceUniform::SIZE as usize]);

    assert_eq!(read_first, first);
    assert_eq!(read_second, second);
}

#[test]
fn test_offsets_are_stride_spaced() {
    let plan = UniformPlan::new(InstanceUniform::SIZE, 64, 5).unwrap();
    for instance in 1..5 {
        let prev = plan.offset_for(instance - 1).unwrap();
        let cur = plan.offset_for(instance).unwrap();
        assert_eq!(cur - prev, plan.stride);
    }
}

#[test]
fn test_offset_past_buffer_end_fails() {
    let plan = UniformPlan::new(InstanceUniform::SIZE, 256, 2).unwrap();
    let err = plan.offset_for(2).unwrap_err();
    assert!(matches!(err, LayoutError::OffsetOutOfRange { .. }));
}
