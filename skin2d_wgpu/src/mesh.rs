use glam::{UVec3, Vec3, Vec4};
use log::warn;
use skin2d_model::{SkinnedMesh, SkinnedVertex};

use crate::{DeviceBufferExt, shader};

/// Vertex and index buffers for a [SkinnedMesh].
///
/// The bind pose vertices and indices are uploaded once.
/// A second vertex buffer holds vertices skinned on the CPU.
pub struct SkinnedMeshBuffers {
    vertex_buffer: wgpu::Buffer,
    skinned_vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    vertex_count: usize,
    index_count: u32,
}

impl SkinnedMeshBuffers {
    pub fn new(device: &wgpu::Device, mesh: &SkinnedMesh) -> Self {
        let vertices: Vec<_> = mesh
            .vertices()
            .iter()
            .map(|v| shader::skinning::VertexInput {
                position: v.position,
                joint_indices: UVec3::from_array(v.joint_indices),
                joint_weights: Vec3::from_array(v.joint_weights),
            })
            .collect();

        // Start with the unmodified bind pose until the first CPU update.
        let skinned_vertices: Vec<_> = mesh
            .vertices()
            .iter()
            .map(|v| shader::solid::VertexInput {
                position: v.position.extend(0.0).extend(1.0),
                color: Vec4::ONE,
            })
            .collect();

        Self {
            vertex_buffer: device.create_vertex_buffer("skinned mesh vertex buffer", &vertices),
            skinned_vertex_buffer: device
                .create_vertex_buffer("cpu skinned vertex buffer", &skinned_vertices),
            index_buffer: device.create_index_buffer("skinned mesh index buffer", mesh.indices()),
            vertex_count: vertices.len(),
            index_count: mesh.indices().len() as u32,
        }
    }

    /// Replace the vertices used for [SkinningMode::Cpu](crate::SkinningMode::Cpu).
    pub fn update_skinned_vertices(&self, queue: &wgpu::Queue, vertices: &[SkinnedVertex]) {
        if vertices.len() != self.vertex_count {
            warn!(
                "Expected {} skinned vertices but found {}",
                self.vertex_count,
                vertices.len()
            );
        }

        let vertices: Vec<_> = vertices
            .iter()
            .take(self.vertex_count)
            .map(|v| shader::solid::VertexInput {
                position: v.position,
                color: v.color,
            })
            .collect();
        queue.write_buffer(&self.skinned_vertex_buffer, 0, bytemuck::cast_slice(&vertices));
    }

    /// Draw the bind pose vertices with the skinning pipeline already set.
    pub(crate) fn draw_gpu_skinned<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        self.draw(render_pass, &self.vertex_buffer);
    }

    /// Draw the CPU skinned vertices with the solid pipeline already set.
    pub(crate) fn draw_cpu_skinned<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        self.draw(render_pass, &self.skinned_vertex_buffer);
    }

    fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>, vertex_buffer: &'a wgpu::Buffer) {
        if self.index_count > 0 {
            render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            render_pass.draw_indexed(0..self.index_count, 0, 0..1);
        }
    }
}
