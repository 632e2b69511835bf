//! Uniform buffer layout planning.
//!
//! Packs one fixed-size uniform block per instance into a single shared
//! buffer, spaced by the device's minimum uniform-offset alignment.

use bytemuck::{Pod, Zeroable};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("minimum uniform alignment must be non-zero")]
    ZeroAlignment,
    #[error("instance count must be at least 1")]
    NoInstances,
    #[error("offset {offset} + block size {block_size} exceeds buffer size {buffer_size}")]
    OffsetOutOfRange {
        offset: u64,
        block_size: u64,
        buffer_size: u64,
    },
}

/// Per-instance uniform block. 32 bytes, padded to the 16-byte uniform rule.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct InstanceUniform {
    pub tint: [f32; 4],
    pub time: f32,
    pub _pad: [f32; 3],
}

const _: () = assert!(std::mem::size_of::<InstanceUniform>() % 16 == 0);

impl InstanceUniform {
    pub fn new(tint: [f32; 4], time: f32) -> Self {
        Self {
            tint,
            time,
            _pad: [0.0; 3],
        }
    }

    pub const SIZE: u64 = std::mem::size_of::<InstanceUniform>() as u64;
}

/// Smallest multiple of `min_alignment` that is >= `block_size`.
pub fn uniform_stride(block_size: u64, min_alignment: u64) -> Result<u64, LayoutError> {
    if min_alignment == 0 {
        return Err(LayoutError::ZeroAlignment);
    }
    Ok(min_alignment * block_size.div_ceil(min_alignment))
}

/// Total buffer size for `instance_count` blocks spaced by `stride`. The last
/// instance needs no trailing pad.
pub fn uniform_buffer_size(stride: u64, block_size: u64, instance_count: usize) -> u64 {
    debug_assert!(instance_count >= 1);
    stride * (instance_count as u64 - 1) + block_size
}

/// Offset bookkeeping for one shared uniform buffer. Computed once before the
/// buffer is created; a different instance count needs a new plan and a new
/// buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformPlan {
    pub stride: u64,
    pub block_size: u64,
    pub instance_count: usize,
    pub buffer_size: u64,
}

impl UniformPlan {
    pub fn new(
        block_size: u64,
        min_alignment: u64,
        instance_count: usize,
    ) -> Result<Self, LayoutError> {
        if instance_count == 0 {
            return Err(LayoutError::NoInstances);
        }
        let stride = uniform_stride(block_size, min_alignment)?;
        Ok(Self {
            stride,
            block_size,
            instance_count,
            buffer_size: uniform_buffer_size(stride, block_size, instance_count),
        })
    }

    /// Byte offset of one instance's block inside the shared buffer.
    pub fn offset_for(&self, instance: usize) -> Result<u64, LayoutError> {
        let offset = instance as u64 * self.stride;
        if offset + self.block_size > self.buffer_size {
            return Err(LayoutError::OffsetOutOfRange {
                offset,
                block_size: self.block_size,
                buffer_size: self.buffer_size,
            });
        }
        Ok(offset)
    }
}
