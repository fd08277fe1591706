//! # skin2d_wgpu
//! A wgpu renderer for [skin2d_model] meshes.
//!
//! Meshes can be skinned in the vertex shader or on the CPU with
//! [skin2d_model::SkinningContext::skin_mesh] for comparison.
//! Both paths produce the same positions and colors.
use wgpu::util::DeviceExt;

mod mesh;
mod pipeline;
mod renderer;
pub mod shader;
mod skeleton;

pub use mesh::SkinnedMeshBuffers;
pub use renderer::{CameraData, CreateRendererError, Skin2dRenderer, SkinningMode};

pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Bgra8Unorm;

/// The maximum number of joints supported by the skinning shader.
pub const MAX_JOINTS: usize = 32;

pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.1,
    g: 0.1,
    b: 0.12,
    a: 1.0,
};

trait DeviceBufferExt {
    fn create_uniform_buffer<T: bytemuck::Pod>(&self, label: &str, contents: &[T])
    -> wgpu::Buffer;

    fn create_vertex_buffer<T: bytemuck::Pod>(&self, label: &str, contents: &[T]) -> wgpu::Buffer;

    fn create_index_buffer(&self, label: &str, contents: &[u16]) -> wgpu::Buffer;
}

impl DeviceBufferExt for wgpu::Device {
    fn create_uniform_buffer<T: bytemuck::Pod>(
        &self,
        label: &str,
        contents: &[T],
    ) -> wgpu::Buffer {
        self.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(contents),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        })
    }

    fn create_vertex_buffer<T: bytemuck::Pod>(&self, label: &str, contents: &[T]) -> wgpu::Buffer {
        // Allow overwriting vertices for CPU skinning and debug overlays.
        self.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(contents),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        })
    }

    fn create_index_buffer(&self, label: &str, contents: &[u16]) -> wgpu::Buffer {
        self.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(contents),
            usage: wgpu::BufferUsages::INDEX,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_max_joints_matches() {
        let wgsl = include_str!("shader/skinning.wgsl");
        assert!(wgsl.contains(&format!("const MAX_JOINTS: u32 = {MAX_JOINTS}u;")));
        assert_eq!(3, wgsl.matches("MAX_JOINTS>").count());
    }
}
