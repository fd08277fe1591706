use glam::{Vec4, vec4};
use skin2d_model::FrameTransforms;

use crate::{
    DeviceBufferExt, MAX_JOINTS,
    pipeline::{solid_bind_group0, solid_pipeline},
    shader::{self, solid::VertexInput},
};

/// Draws joint origins as points and parent to child connections as lines.
pub struct JointRenderer {
    line_buffer: wgpu::Buffer,
    point_buffer: wgpu::Buffer,
    line_pipeline: wgpu::RenderPipeline,
    point_pipeline: wgpu::RenderPipeline,
    bind_group0: shader::solid::bind_groups::BindGroup0,
    line_vertex_count: u32,
    point_count: u32,
}

impl JointRenderer {
    pub(crate) fn new(
        device: &wgpu::Device,
        camera_buffer: &wgpu::Buffer,
        format: wgpu::TextureFormat,
    ) -> Self {
        let zeros = [VertexInput {
            position: Vec4::ZERO,
            color: Vec4::ZERO,
        }; MAX_JOINTS * 2];

        let line_buffer = device.create_vertex_buffer("joint line buffer", &zeros);
        let point_buffer = device.create_vertex_buffer("joint point buffer", &zeros[..MAX_JOINTS]);

        let line_pipeline = solid_pipeline(
            device,
            format,
            wgpu::PrimitiveTopology::LineList,
            "Joint Line Pipeline",
        );
        let point_pipeline = solid_pipeline(
            device,
            format,
            wgpu::PrimitiveTopology::PointList,
            "Joint Point Pipeline",
        );

        let bind_group0 = solid_bind_group0(device, camera_buffer);

        Self {
            line_buffer,
            point_buffer,
            line_pipeline,
            point_pipeline,
            bind_group0,
            line_vertex_count: 0,
            point_count: 0,
        }
    }

    /// Update the joint positions and colors from the current pose.
    pub fn update(&mut self, queue: &wgpu::Queue, frame: &FrameTransforms) {
        let points: Vec<_> = frame
            .world_transforms
            .iter()
            .zip(&frame.colors)
            .take(MAX_JOINTS)
            .map(|(transform, color)| VertexInput {
                position: *transform * vec4(0.0, 0.0, 0.0, 1.0),
                color: *color,
            })
            .collect();

        let lines: Vec<_> = frame
            .parent_indices
            .iter()
            .enumerate()
            .take(points.len())
            .filter_map(|(i, parent_index)| {
                let parent = points.get((*parent_index)?)?;
                Some([
                    VertexInput {
                        position: parent.position,
                        color: points[i].color,
                    },
                    points[i],
                ])
            })
            .flatten()
            .collect();

        if !points.is_empty() {
            queue.write_buffer(&self.point_buffer, 0, bytemuck::cast_slice(&points));
        }
        if !lines.is_empty() {
            queue.write_buffer(&self.line_buffer, 0, bytemuck::cast_slice(&lines));
        }
        self.point_count = points.len() as u32;
        self.line_vertex_count = lines.len() as u32;
    }

    pub fn draw_joints<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        shader::solid::bind_groups::BindGroups {
            bind_group0: &self.bind_group0,
        }
        .set(render_pass);

        if self.line_vertex_count > 0 {
            render_pass.set_pipeline(&self.line_pipeline);
            render_pass.set_vertex_buffer(0, self.line_buffer.slice(..));
            render_pass.draw(0..self.line_vertex_count, 0..1);
        }

        if self.point_count > 0 {
            render_pass.set_pipeline(&self.point_pipeline);
            render_pass.set_vertex_buffer(0, self.point_buffer.slice(..));
            render_pass.draw(0..self.point_count, 0..1);
        }
    }
}
