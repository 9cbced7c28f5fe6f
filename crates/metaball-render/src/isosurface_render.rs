//! GPU resources for the metaball isosurface.

use glam::Vec3;
use metaball_core::{IsoSurface, Sphere, MAX_SHADER_SPHERES};

use crate::buffer::{create_storage_buffer, create_uniform_buffer, grow_capacity, update_buffer};

/// Scene uniforms for the isosurface shader.
/// Layout must match WGSL `SceneUniforms` exactly.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
#[allow(clippy::pub_underscore_fields)]
pub struct SceneUniforms {
    /// Point light position (w unused).
    pub light_position: [f32; 4],
    /// Point light color (a unused).
    pub light_color: [f32; 4],
    /// Sphere centers in xyz, radius in w.
    pub spheres: [[f32; 4]; MAX_SHADER_SPHERES],
    /// Sphere colors in rgb.
    pub colors: [[f32; 4]; MAX_SHADER_SPHERES],
    /// Number of valid entries in `spheres` and `colors`.
    pub sphere_count: u32,
    pub _pad0: u32,
    pub _pad1: u32,
    pub _pad2: u32,
}

impl Default for SceneUniforms {
    fn default() -> Self {
        Self {
            light_position: [5.0, 5.0, 5.0, 1.0],
            light_color: [1.0, 1.0, 1.0, 1.0],
            spheres: [[0.0; 4]; MAX_SHADER_SPHERES],
            colors: [[0.0; 4]; MAX_SHADER_SPHERES],
            sphere_count: 0,
            _pad0: 0,
            _pad1: 0,
            _pad2: 0,
        }
    }
}

impl SceneUniforms {
    /// Packs the light and the first `MAX_SHADER_SPHERES` spheres.
    #[must_use]
    pub fn new(spheres: &[Sphere], light_position: Vec3, light_color: Vec3) -> Self {
        let mut uniforms = Self {
            light_position: light_position.extend(1.0).to_array(),
            light_color: light_color.extend(1.0).to_array(),
            ..Self::default()
        };
        let count = spheres.len().min(MAX_SHADER_SPHERES);
        for (i, sphere) in spheres.iter().take(count).enumerate() {
            uniforms.spheres[i] = sphere.position.extend(sphere.radius).to_array();
            uniforms.colors[i] = sphere.color.extend(1.0).to_array();
        }
        uniforms.sphere_count = count as u32;
        uniforms
    }
}

/// Expands an indexed surface into per-triangle-vertex `vec4` positions and normals.
#[must_use]
pub fn expand_triangles(surface: &IsoSurface) -> (Vec<[f32; 4]>, Vec<[f32; 4]>) {
    surface
        .indices
        .iter()
        .map(|&i| {
            let i = i as usize;
            (
                surface.positions[i].extend(1.0).to_array(),
                surface.normals[i].extend(0.0).to_array(),
            )
        })
        .unzip()
}

/// Storage buffers holding the current surface plus the bind group over them.
///
/// Buffers are reused across frames and only reallocated when a surface
/// outgrows them.
pub struct IsosurfaceRenderData {
    /// Position buffer (storage, vec4 per expanded triangle vertex).
    pub vertex_buffer: wgpu::Buffer,
    /// Normal buffer (storage, vec4 per expanded triangle vertex).
    pub normal_buffer: wgpu::Buffer,
    /// Scene uniform buffer.
    pub uniform_buffer: wgpu::Buffer,
    /// Bind group (Group 0).
    pub bind_group: wgpu::BindGroup,
    /// Vertices to draw this frame.
    pub num_vertices: u32,
    capacity: usize,
}

impl IsosurfaceRenderData {
    /// Initial vertex capacity; enough for the default scene without regrowth.
    const INITIAL_CAPACITY: usize = 1 << 15;

    /// Allocates empty buffers.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        bind_group_layout: &wgpu::BindGroupLayout,
        camera_buffer: &wgpu::Buffer,
    ) -> Self {
        let uniform_buffer = create_uniform_buffer(
            device,
            &SceneUniforms::default(),
            Some("isosurface scene uniforms"),
        );
        let capacity = Self::INITIAL_CAPACITY;
        let (vertex_buffer, normal_buffer) = Self::create_vertex_buffers(device, capacity);
        let bind_group = Self::create_bind_group(
            device,
            bind_group_layout,
            camera_buffer,
            &uniform_buffer,
            &vertex_buffer,
            &normal_buffer,
        );

        Self {
            vertex_buffer,
            normal_buffer,
            uniform_buffer,
            bind_group,
            num_vertices: 0,
            capacity,
        }
    }

    /// Uploads a freshly extracted surface, growing the buffers if needed.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bind_group_layout: &wgpu::BindGroupLayout,
        camera_buffer: &wgpu::Buffer,
        surface: &IsoSurface,
    ) {
        let (positions, normals) = expand_triangles(surface);

        let capacity = grow_capacity(self.capacity, positions.len());
        if capacity != self.capacity {
            log::debug!(
                "growing isosurface buffers from {} to {capacity} vertices",
                self.capacity
            );
            let (vertex_buffer, normal_buffer) = Self::create_vertex_buffers(device, capacity);
            self.bind_group = Self::create_bind_group(
                device,
                bind_group_layout,
                camera_buffer,
                &self.uniform_buffer,
                &vertex_buffer,
                &normal_buffer,
            );
            self.vertex_buffer = vertex_buffer;
            self.normal_buffer = normal_buffer;
            self.capacity = capacity;
        }

        update_buffer(queue, &self.vertex_buffer, &positions);
        update_buffer(queue, &self.normal_buffer, &normals);
        self.num_vertices = positions.len() as u32;
    }

    /// Updates the scene uniform buffer.
    pub fn update_uniforms(&self, queue: &wgpu::Queue, uniforms: &SceneUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    fn create_vertex_buffers(device: &wgpu::Device, capacity: usize) -> (wgpu::Buffer, wgpu::Buffer) {
        (
            create_storage_buffer::<[f32; 4]>(device, capacity, Some("isosurface vertices")),
            create_storage_buffer::<[f32; 4]>(device, capacity, Some("isosurface normals")),
        )
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        camera_buffer: &wgpu::Buffer,
        uniform_buffer: &wgpu::Buffer,
        vertex_buffer: &wgpu::Buffer,
        normal_buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("isosurface bind group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: vertex_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: normal_buffer.as_entire_binding(),
                },
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_uniforms_size() {
        let size = std::mem::size_of::<SceneUniforms>();
        assert_eq!(size % 16, 0, "SceneUniforms size ({size} bytes) must be 16-byte aligned");
        // light(16) + light color(16) + spheres(80) + colors(80) + count/pad(16) = 208
        assert_eq!(size, 208, "SceneUniforms should be 208 bytes, got {size}");
    }

    #[test]
    fn test_scene_uniforms_tail_matches_wgsl() {
        let shader = crate::shader::ISOSURFACE_SHADER;
        assert!(shader.contains("sphere_count: u32,\n    _pad0: u32,\n    _pad1: u32,\n    _pad2: u32,"));
        assert!(!shader.contains("iso_level"));
        assert_eq!(SceneUniforms::default()._pad2, 0);
    }

    #[test]
    fn test_scene_uniforms_pack_spheres() {
        let spheres = [
            Sphere::stationary(Vec3::new(1.0, 2.0, 3.0), 0.5).with_color(Vec3::X),
            Sphere::stationary(Vec3::ZERO, 1.5),
        ];
        let u = SceneUniforms::new(&spheres, Vec3::splat(5.0), Vec3::ONE);
        assert_eq!(u.sphere_count, 2);
        assert_eq!(u.spheres[0], [1.0, 2.0, 3.0, 0.5]);
        assert_eq!(u.colors[0], [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(u.spheres[1][3], 1.5);
        assert_eq!(u.spheres[2], [0.0; 4]);
        assert_eq!(u.light_position, [5.0, 5.0, 5.0, 1.0]);
    }

    #[test]
    fn test_scene_uniforms_truncate_extra_spheres() {
        let spheres: Vec<Sphere> = (0..8)
            .map(|i| Sphere::stationary(Vec3::new(i as f32, 0.0, 0.0), 1.0))
            .collect();
        let u = SceneUniforms::new(&spheres, Vec3::ZERO, Vec3::ONE);
        assert_eq!(u.sphere_count as usize, MAX_SHADER_SPHERES);
        assert_eq!(u.spheres[MAX_SHADER_SPHERES - 1][0], 4.0);
    }

    #[test]
    fn test_expand_triangles() {
        let surface = IsoSurface {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z],
            normals: vec![Vec3::Z; 4],
            indices: vec![0, 1, 2, 2, 1, 3],
        };
        let (positions, normals) = expand_triangles(&surface);
        assert_eq!(positions.len(), 6);
        assert_eq!(normals.len(), 6);
        assert_eq!(positions[3], [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(positions[5], [0.0, 0.0, 1.0, 1.0]);
        assert!(normals.iter().all(|n| *n == [0.0, 0.0, 1.0, 0.0]));
    }
}
