use anyhow::{Context, Result, anyhow};
use clap::Parser;
use egui::Context as EguiContext;
use std::path::PathBuf;
use std::sync::Arc;
use textscene_assets::FontSource;
use textscene_input::KeyState;
use textscene_render::{Preset, Scene, SceneBuilder, SceneConfig};
use textscene_render_wgpu::WgpuRenderer;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "textscene-desktop", about = "Extruded text under a movable point light")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene variation: basic, glow, glow-interactive, lit
    #[arg(short, long, default_value = "lit")]
    preset: Preset,

    /// JSON scene config; replaces the preset
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fetch the typeface from this URL
    #[arg(long, conflicts_with = "font_path")]
    font_url: Option<String>,

    /// Read the typeface from a local file
    #[arg(long)]
    font_path: Option<PathBuf>,

    /// Character(s) shown on the left
    #[arg(long)]
    letter: Option<String>,

    /// Character(s) shown on the right
    #[arg(long)]
    digit: Option<String>,
}

impl Cli {
    fn scene_config(&self) -> Result<SceneConfig> {
        let mut config = match &self.config {
            Some(path) => SceneConfig::from_path(path)
                .with_context(|| format!("loading scene config {}", path.display()))?,
            None => SceneConfig::preset(self.preset),
        };
        if let Some(url) = &self.font_url {
            config.font = FontSource::Url(url.clone());
        }
        if let Some(path) = &self.font_path {
            config.font = FontSource::Path(path.clone());
        }
        if let Some(letter) = &self.letter {
            config.letter = letter.clone();
        }
        if let Some(digit) = &self.digit {
            config.digit = digit.clone();
        }
        config.validate()?;
        Ok(config)
    }

    fn label(&self) -> String {
        match &self.config {
            Some(path) => path.display().to_string(),
            None => self.preset.to_string(),
        }
    }
}

/// Application state.
struct AppState {
    scene: Scene,
    keys: KeyState,
    label: String,
    show_overlay: bool,
}

impl AppState {
    /// Blocks on the typeface load. A failed load still yields a scene:
    /// camera and light only, with the error kept for the overlay.
    fn new(config: SceneConfig, label: String) -> Self {
        let keys = config
            .input
            .as_ref()
            .map(|bindings| bindings.key_state())
            .unwrap_or_default();
        let builder = SceneBuilder::new(config);
        let scene = match builder.load_and_build() {
            Ok(scene) => scene,
            Err(e) => {
                tracing::error!("failed to build text meshes: {e}");
                let mut scene = builder.build_empty();
                scene.set_load_error(e.to_string());
                scene
            }
        };
        Self {
            scene,
            keys,
            label,
            show_overlay: true,
        }
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        let pressed = event.state == ElementState::Pressed;
        match &event.logical_key {
            Key::Character(text) => {
                if self.keys.apply_text(text.as_str(), pressed) {
                    tracing::trace!(key = %text, pressed, "key");
                }
            }
            Key::Named(NamedKey::F1) if pressed && !event.repeat => {
                self.show_overlay = !self.show_overlay;
            }
            _ => {}
        }
    }

    fn draw_ui(&self, ctx: &EguiContext) {
        if let Some(err) = self.scene.load_error() {
            egui::TopBottomPanel::top("load_error").show(ctx, |ui| {
                ui.colored_label(egui::Color32::from_rgb(255, 80, 80), "Typeface failed to load");
                ui.label(err);
            });
        }

        if !self.show_overlay {
            return;
        }

        let camera = self.scene.camera().position;
        let light = self.scene.light_position();
        egui::Window::new("textscene")
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.label(format!("Scene: {}", self.label));
                ui.label(format!("Frame: {}", self.scene.frame()));
                ui.label(format!(
                    "Camera: ({:.2}, {:.2}, {:.2})",
                    camera.x, camera.y, camera.z
                ));
                ui.label(format!(
                    "Light: ({:.2}, {:.2}, {:.2})",
                    light.x, light.y, light.z
                ));
                ui.separator();
                for object in self.scene.objects() {
                    ui.label(format!(
                        "{} [{}] {} tris",
                        object.name,
                        object.material.label(),
                        object.geometry.triangle_count()
                    ));
                }
                ui.separator();
                if let Some(bindings) = self.scene.input() {
                    ui.small(format!(
                        "{}/{}: light up/down | {}/{}: camera left/right | F1: overlay",
                        bindings.light_up.to_ascii_uppercase(),
                        bindings.light_down.to_ascii_uppercase(),
                        bindings.camera_left.to_ascii_uppercase(),
                        bindings.camera_right.to_ascii_uppercase()
                    ));
                } else {
                    ui.small("Static scene | F1: overlay");
                }
            });
    }
}

struct GpuApp {
    state: AppState,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<WgpuRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
    fatal: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
            fatal: None,
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("textscene")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| anyhow!("no compatible GPU adapter"))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("textscene_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = pick_surface_format(&surface_caps.formats)
            .ok_or_else(|| anyhow!("surface reports no texture formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        self.state.scene.set_viewport(config.width, config.height);

        let renderer = WgpuRenderer::new(&device, surface_format, config.width, config.height);

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer =
            egui_wgpu::Renderer::new(&device, renderer.surface_format(), None, 1, false);

        tracing::info!(
            format = ?surface_format,
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);
        Ok(())
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if let (Some(surface), Some(device), Some(config)) =
            (&self.surface, &self.device, &mut self.config)
        {
            config.width = new_size.width.max(1);
            config.height = new_size.height.max(1);
            surface.configure(device, config);
            self.state.scene.set_viewport(config.width, config.height);
            if let Some(renderer) = &mut self.renderer {
                renderer.resize(device, config.width, config.height);
            }
        }
    }

    /// Update, then draw the scene and the overlay on top.
    fn redraw(&mut self) {
        self.state.scene.update(&self.state.keys);

        let (
            Some(window),
            Some(surface),
            Some(device),
            Some(queue),
            Some(config),
            Some(renderer),
            Some(egui_winit),
            Some(egui_renderer),
        ) = (
            &self.window,
            &self.surface,
            &self.device,
            &self.queue,
            &self.config,
            &mut self.renderer,
            &mut self.egui_winit,
            &mut self.egui_renderer,
        )
        else {
            return;
        };

        let output = match surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                surface.configure(device, config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        renderer.prepare(device, queue, &self.state.scene);
        renderer.render(device, queue, &view, &self.state.scene);

        let raw_input = egui_winit.take_egui_input(window);
        let state = &self.state;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            state.draw_ui(ctx);
        });
        egui_winit.handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [config.width, config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        egui_renderer.update_buffers(
            device,
            queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }

        output.present();
        window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_gpu(event_loop) {
            tracing::error!("GPU initialization failed: {e:#}");
            self.fatal = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
            let response = egui_winit.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.resize(new_size);
            }
            WindowEvent::Focused(false) => {
                self.state.keys.release_all();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.state.handle_key(&event);
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("textscene-desktop starting");

    let config = cli.scene_config()?;
    tracing::info!(scene = %cli.label(), font = %config.font, "loading typeface");
    let state = AppState::new(config, cli.label());

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(state);
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Prefer a non-sRGB surface. Scene colors are written as given, so
/// `#00008b` reaches the screen as `#00008b`; egui expects the same.
fn pick_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .find(|f| !f.is_srgb())
        .or_else(|| formats.first())
        .copied()
}
