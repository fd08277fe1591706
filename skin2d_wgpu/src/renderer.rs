use encase::ShaderType;
use glam::{Mat4, Vec4};
use log::{error, info, warn};
use skin2d_model::FrameTransforms;
use thiserror::Error;

use crate::{
    CLEAR_COLOR, DeviceBufferExt, MAX_JOINTS, SkinnedMeshBuffers,
    pipeline::{skinning_pipeline, solid_bind_group0, solid_pipeline},
    shader,
    skeleton::JointRenderer,
};

pub struct Skin2dRenderer {
    camera_buffer: wgpu::Buffer,

    // Bind pose inverses are written once and never change.
    _bind_pose_inverse_buffer: wgpu::Buffer,
    current_pose_buffer: wgpu::Buffer,
    current_pose_colors_buffer: wgpu::Buffer,
    joint_count: usize,

    skinning_bind_group0: shader::skinning::bind_groups::BindGroup0,
    skinning_bind_group1: shader::skinning::bind_groups::BindGroup1,
    solid_bind_group0: shader::solid::bind_groups::BindGroup0,

    skinning_pipeline: wgpu::RenderPipeline,
    solid_pipeline: wgpu::RenderPipeline,
    joint_renderer: JointRenderer,
}

pub struct CameraData {
    pub view_projection: Mat4,
}

/// Selects where vertices are skinned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkinningMode {
    /// Skin vertices in the vertex shader.
    #[default]
    Gpu,
    /// Draw vertices skinned on the CPU with [SkinnedMeshBuffers::update_skinned_vertices].
    Cpu,
}

#[derive(Debug, Error, PartialEq)]
pub enum CreateRendererError {
    #[error("skeleton has {joint_count} joints but at most {max} are supported")]
    TooManyJoints { joint_count: usize, max: usize },
}

impl Skin2dRenderer {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        bind_pose_inverses: &[Mat4],
    ) -> Result<Self, CreateRendererError> {
        if bind_pose_inverses.len() > MAX_JOINTS {
            return Err(CreateRendererError::TooManyJoints {
                joint_count: bind_pose_inverses.len(),
                max: MAX_JOINTS,
            });
        }

        // The camera is written by update_camera before the first render.
        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("camera buffer"),
            size: shader::skinning::Camera::min_size().get(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Unused joints use the identity so the uniform arrays are always fully initialized.
        let mut inverses = [Mat4::IDENTITY; MAX_JOINTS];
        inverses[..bind_pose_inverses.len()].copy_from_slice(bind_pose_inverses);

        let bind_pose_inverse_buffer =
            device.create_uniform_buffer("bind pose inverse buffer", &inverses);
        let current_pose_buffer =
            device.create_uniform_buffer("current pose buffer", &[Mat4::IDENTITY; MAX_JOINTS]);
        let current_pose_colors_buffer =
            device.create_uniform_buffer("current pose color buffer", &[Vec4::ONE; MAX_JOINTS]);

        let skinning_bind_group0 = shader::skinning::bind_groups::BindGroup0::from_bindings(
            device,
            shader::skinning::bind_groups::BindGroupLayout0 {
                camera: camera_buffer.as_entire_buffer_binding(),
            },
        );
        let skinning_bind_group1 = shader::skinning::bind_groups::BindGroup1::from_bindings(
            device,
            shader::skinning::bind_groups::BindGroupLayout1 {
                bind_pose_inv: bind_pose_inverse_buffer.as_entire_buffer_binding(),
                current_pose: current_pose_buffer.as_entire_buffer_binding(),
                current_pose_colors: current_pose_colors_buffer.as_entire_buffer_binding(),
            },
        );
        let solid_bind_group0 = solid_bind_group0(device, &camera_buffer);

        let skinning_pipeline = skinning_pipeline(device, format);
        let solid_pipeline = solid_pipeline(
            device,
            format,
            wgpu::PrimitiveTopology::TriangleList,
            "Solid Pipeline",
        );
        let joint_renderer = JointRenderer::new(device, &camera_buffer, format);

        info!("Created renderer for {} joints", bind_pose_inverses.len());

        Ok(Self {
            camera_buffer,
            _bind_pose_inverse_buffer: bind_pose_inverse_buffer,
            current_pose_buffer,
            current_pose_colors_buffer,
            joint_count: bind_pose_inverses.len(),
            skinning_bind_group0,
            skinning_bind_group1,
            solid_bind_group0,
            skinning_pipeline,
            solid_pipeline,
            joint_renderer,
        })
    }

    pub fn update_camera(&self, queue: &wgpu::Queue, camera_data: &CameraData) {
        let mut bytes = encase::UniformBuffer::new(Vec::new());
        match bytes.write(&shader::skinning::Camera {
            view_projection: camera_data.view_projection,
        }) {
            Ok(()) => queue.write_buffer(&self.camera_buffer, 0, &bytes.into_inner()),
            Err(e) => error!("Error writing camera: {e:?}"),
        }
    }

    /// Upload the joint transforms and colors for the current pose.
    pub fn update_pose(&mut self, queue: &wgpu::Queue, frame: &FrameTransforms) {
        if frame.world_transforms.len() != self.joint_count {
            warn!(
                "Expected {} joint transforms but found {}",
                self.joint_count,
                frame.world_transforms.len()
            );
        }

        let count = frame.world_transforms.len().min(MAX_JOINTS);
        if count > 0 {
            queue.write_buffer(
                &self.current_pose_buffer,
                0,
                bytemuck::cast_slice(&frame.world_transforms[..count]),
            );
        }

        let count = frame.colors.len().min(MAX_JOINTS);
        if count > 0 {
            queue.write_buffer(
                &self.current_pose_colors_buffer,
                0,
                bytemuck::cast_slice(&frame.colors[..count]),
            );
        }

        self.joint_renderer.update(queue, frame);
    }

    pub fn render(
        &self,
        output_view: &wgpu::TextureView,
        encoder: &mut wgpu::CommandEncoder,
        buffers: &SkinnedMeshBuffers,
        mode: SkinningMode,
        draw_joints: bool,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Skin2d Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: output_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        self.draw(&mut render_pass, buffers, mode, draw_joints);
    }

    fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        buffers: &'a SkinnedMeshBuffers,
        mode: SkinningMode,
        draw_joints: bool,
    ) {
        match mode {
            SkinningMode::Gpu => {
                render_pass.set_pipeline(&self.skinning_pipeline);
                shader::skinning::bind_groups::BindGroups {
                    bind_group0: &self.skinning_bind_group0,
                    bind_group1: &self.skinning_bind_group1,
                }
                .set(render_pass);
                buffers.draw_gpu_skinned(render_pass);
            }
            SkinningMode::Cpu => {
                render_pass.set_pipeline(&self.solid_pipeline);
                shader::solid::bind_groups::BindGroups {
                    bind_group0: &self.solid_bind_group0,
                }
                .set(render_pass);
                buffers.draw_cpu_skinned(render_pass);
            }
        }

        // Joints are drawn last to appear on top of the mesh.
        if draw_joints {
            self.joint_renderer.draw_joints(render_pass);
        }
    }
}
