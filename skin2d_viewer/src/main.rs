use anyhow::anyhow;
use clap::Parser;
use futures::executor::block_on;
use log::{debug, error, info};
use skin2d_model::{PoseBlend, SkinnedMesh, SkinningContext, demo};
use skin2d_wgpu::{
    COLOR_FORMAT, CameraData, Skin2dRenderer, SkinnedMeshBuffers, SkinningMode,
};
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::NamedKey,
    window::{Window, WindowBuilder},
};

// The demo character fits in this range on both axes.
const VIEW_HALF_EXTENT: f32 = 1.0;

struct State<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    size: winit::dpi::PhysicalSize<u32>,
    config: wgpu::SurfaceConfiguration,

    renderer: Skin2dRenderer,
    buffers: SkinnedMeshBuffers,

    context: SkinningContext,
    mesh: SkinnedMesh,
    blend: PoseBlend,

    mode: SkinningMode,
    draw_joints: bool,

    input_state: InputState,
}

#[derive(Default)]
struct InputState {
    is_mouse_left_clicked: bool,
}

impl<'a> State<'a> {
    async fn new(window: &'a Window, cli: &Cli) -> anyhow::Result<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow!("no compatible adapter found"))?;
        debug!("{:?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await?;

        let size = window.inner_size();
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: COLOR_FORMAT,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: Vec::new(),
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let start = std::time::Instant::now();
        let mut context = demo::context()?;
        let mesh = demo::mesh()?;
        info!(
            "Load {} poses and {} triangles: {:?}",
            context.poses().len(),
            mesh.triangle_count(),
            start.elapsed()
        );

        let blend = cli
            .blend
            .map(|x| PoseBlend::from_cursor(x, context.poses().len()))
            .unwrap_or(PoseBlend::single(0));
        context.update_pose(blend)?;

        let renderer = Skin2dRenderer::new(&device, COLOR_FORMAT, context.bind_pose_inverses())?;
        renderer.update_camera(&queue, &calculate_camera_data(size));

        let buffers = SkinnedMeshBuffers::new(&device, &mesh);

        update_window_title(window, blend);

        Ok(Self {
            surface,
            device,
            queue,
            size,
            config,
            renderer,
            buffers,
            context,
            mesh,
            blend,
            mode: if cli.cpu {
                SkinningMode::Cpu
            } else {
                SkinningMode::Gpu
            },
            draw_joints: !cli.hide_joints,
            input_state: InputState::default(),
        })
    }

    fn update_camera(&self, size: winit::dpi::PhysicalSize<u32>) {
        self.renderer
            .update_camera(&self.queue, &calculate_camera_data(size));
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn update_blend(&mut self, blend: PoseBlend, window: &Window) {
        match self.context.update_pose(blend) {
            Ok(()) => {
                self.blend = blend;
                update_window_title(window, blend);
            }
            Err(e) => error!("{e}"),
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.frame_transforms();
        self.renderer.update_pose(&self.queue, &frame);

        if self.mode == SkinningMode::Cpu {
            match self.context.skin_mesh_frame(&self.mesh, &frame) {
                Ok(vertices) => self.buffers.update_skinned_vertices(&self.queue, &vertices),
                Err(e) => error!("{e}"),
            }
        }

        let output = self.surface.get_current_texture()?;
        let output_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer.render(
            &output_view,
            &mut encoder,
            &self.buffers,
            self.mode,
            self.draw_joints,
        );

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn handle_input(&mut self, event: &WindowEvent, window: &Window) {
        match event {
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Released => {
                match &event.logical_key {
                    winit::keyboard::Key::Named(NamedKey::Space) => {
                        self.update_blend(PoseBlend::single(0), window)
                    }
                    winit::keyboard::Key::Character(c) => match c.as_str() {
                        "c" => {
                            self.mode = match self.mode {
                                SkinningMode::Gpu => SkinningMode::Cpu,
                                SkinningMode::Cpu => SkinningMode::Gpu,
                            };
                            info!("Skinning mode: {:?}", self.mode);
                        }
                        "j" => self.draw_joints = !self.draw_joints,
                        _ => (),
                    },
                    _ => (),
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                self.input_state.is_mouse_left_clicked = *state == ElementState::Pressed;
            }
            WindowEvent::CursorMoved { position, .. } => {
                // Dragging left to right moves through the poses in order.
                if self.input_state.is_mouse_left_clicked && self.size.width > 0 {
                    let x = position.x as f32 / self.size.width as f32;
                    let blend = PoseBlend::from_cursor(x, self.context.poses().len());
                    self.update_blend(blend, window);
                }
            }
            _ => (),
        }
    }
}

fn update_window_title(window: &Window, blend: PoseBlend) {
    let name = |i: usize| demo::POSE_NAMES.get(i).copied().unwrap_or("?");
    window.set_title(&format!(
        "{} - {} - {} - {:.2}",
        concat!("skin2d_viewer ", env!("CARGO_PKG_VERSION")),
        name(blend.left),
        name(blend.right),
        blend.factor
    ));
}

fn calculate_camera_data(size: winit::dpi::PhysicalSize<u32>) -> CameraData {
    let aspect = size.width.max(1) as f32 / size.height.max(1) as f32;

    // Keep the full extent visible along the shorter axis.
    let (half_width, half_height) = if aspect >= 1.0 {
        (VIEW_HALF_EXTENT * aspect, VIEW_HALF_EXTENT)
    } else {
        (VIEW_HALF_EXTENT, VIEW_HALF_EXTENT / aspect)
    };

    let view_projection = glam::Mat4::orthographic_rh(
        -half_width,
        half_width,
        -half_height,
        half_height,
        -1.0,
        1.0,
    );

    CameraData { view_projection }
}

#[derive(Parser)]
#[command(author, version, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Skin vertices on the CPU instead of in the vertex shader.
    #[arg(long)]
    cpu: bool,
    /// Hide the joint overlay.
    #[arg(long)]
    hide_joints: bool,
    /// The initial horizontal cursor position from 0.0 to 1.0 for selecting poses.
    #[arg(long)]
    blend: Option<f32>,
}

fn main() -> anyhow::Result<()> {
    // Ignore most logs to avoid flooding the console.
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .with_module_level("wgpu", log::LevelFilter::Warn)
        .with_module_level("naga", log::LevelFilter::Warn)
        .init()?;

    let cli = Cli::parse();

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title(concat!("skin2d_viewer ", env!("CARGO_PKG_VERSION")))
        .build(&event_loop)?;

    let mut state = block_on(State::new(&window, &cli))?;
    event_loop.run(|event, target| match event {
        Event::WindowEvent {
            ref event,
            window_id,
        } if window_id == window.id() => match event {
            WindowEvent::CloseRequested => target.exit(),
            WindowEvent::Resized(physical_size) => {
                state.resize(*physical_size);
                state.update_camera(*physical_size);
                window.request_redraw();
            }
            WindowEvent::ScaleFactorChanged { .. } => {}
            WindowEvent::RedrawRequested => {
                match state.render() {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => state.resize(state.size),
                    Err(wgpu::SurfaceError::OutOfMemory) => target.exit(),
                    Err(e) => error!("{e:?}"),
                }
                window.request_redraw();
            }
            _ => {
                state.handle_input(event, &window);
                window.request_redraw();
            }
        },
        _ => (),
    })?;

    Ok(())
}
