//! GPU buffer helpers.

use wgpu::util::DeviceExt;

/// Creates a uniform buffer initialized with `data`.
pub fn create_uniform_buffer<T: bytemuck::Pod>(
    device: &wgpu::Device,
    data: &T,
    label: Option<&str>,
) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label,
        contents: bytemuck::bytes_of(data),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

/// Creates a zeroed, writable storage buffer holding `capacity` elements of `T`.
pub fn create_storage_buffer<T: bytemuck::Pod>(
    device: &wgpu::Device,
    capacity: usize,
    label: Option<&str>,
) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label,
        size: (capacity.max(1) * std::mem::size_of::<T>()) as u64,
        usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Overwrites the start of `buffer` with `data`.
pub fn update_buffer<T: bytemuck::Pod>(queue: &wgpu::Queue, buffer: &wgpu::Buffer, data: &[T]) {
    if !data.is_empty() {
        queue.write_buffer(buffer, 0, bytemuck::cast_slice(data));
    }
}

/// Element capacity for `needed` elements. Keeps `current` if it suffices,
/// otherwise rounds `needed` up to a power of two.
#[must_use]
pub fn grow_capacity(current: usize, needed: usize) -> usize {
    if needed <= current {
        current
    } else {
        needed.next_power_of_two()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grow_capacity() {
        assert_eq!(grow_capacity(1024, 10), 1024);
        assert_eq!(grow_capacity(1024, 1024), 1024);
        assert_eq!(grow_capacity(1024, 1025), 2048);
        assert_eq!(grow_capacity(0, 3), 4);
    }
}
