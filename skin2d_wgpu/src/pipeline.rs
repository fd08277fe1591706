use crate::shader;

pub fn skinning_pipeline(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::RenderPipeline {
    let module = shader::skinning::create_shader_module(device);
    let layout = shader::skinning::create_pipeline_layout(device);

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Skinning Pipeline"),
        layout: Some(&layout),
        vertex: shader::skinning::vertex_state(
            &module,
            &shader::skinning::vs_main_entry(wgpu::VertexStepMode::Vertex),
        ),
        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: shader::skinning::ENTRY_FS_MAIN,
            targets: &[Some(color_target(format))],
        }),
        primitive: triangles(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
    })
}

/// A pipeline for vertices that are already in model space.
pub fn solid_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    topology: wgpu::PrimitiveTopology,
    label: &str,
) -> wgpu::RenderPipeline {
    let module = shader::solid::create_shader_module(device);
    let layout = shader::solid::create_pipeline_layout(device);

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&layout),
        vertex: shader::solid::vertex_state(
            &module,
            &shader::solid::vs_main_entry(wgpu::VertexStepMode::Vertex),
        ),
        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: shader::solid::ENTRY_FS_MAIN,
            targets: &[Some(color_target(format))],
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            ..triangles()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
    })
}

/// The camera bind group for [solid_pipeline].
pub fn solid_bind_group0(
    device: &wgpu::Device,
    camera_buffer: &wgpu::Buffer,
) -> shader::solid::bind_groups::BindGroup0 {
    shader::solid::bind_groups::BindGroup0::from_bindings(
        device,
        shader::solid::bind_groups::BindGroupLayout0 {
            camera: camera_buffer.as_entire_buffer_binding(),
        },
    )
}

fn color_target(format: wgpu::TextureFormat) -> wgpu::ColorTargetState {
    wgpu::ColorTargetState {
        format,
        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
        write_mask: wgpu::ColorWrites::all(),
    }
}

fn triangles() -> wgpu::PrimitiveState {
    // Posed triangles can flip, so don't cull either side.
    wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleList,
        polygon_mode: wgpu::PolygonMode::Fill,
        cull_mode: None,
        ..Default::default()
    }
}
