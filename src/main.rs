use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use spanrast::config::{BACKGROUND_COLOR, DEFAULT_FOV};
use spanrast::prelude::*;

/// Degrees per second about X, Y and Z.
const SPIN_SPEED: [f32; 3] = [60.0, 45.0, 40.0];
const START_DEPTH: f32 = 3.0;
const DEPTH_STEP: f32 = 0.2;
/// Span rows reserved so the window can be resized taller than it opened.
const MAX_WINDOW_ROWS: u32 = 1440;

#[derive(Parser)]
#[command(name = "spanrast", about = "Spinning textured mesh on the span rasterizer")]
struct Cli {
    /// Window width in pixels
    #[arg(long, default_value_t = spanrast::config::DESKTOP_WIDTH)]
    width: u32,

    /// Window height in pixels
    #[arg(long, default_value_t = spanrast::config::DESKTOP_HEIGHT)]
    height: u32,

    /// Field of view in degrees (clamped to 60..100)
    #[arg(long, default_value_t = DEFAULT_FOV)]
    fov: f32,

    /// Use the 320x240 handheld screen, ignoring --width/--height
    #[arg(long)]
    handheld: bool,

    /// OBJ mesh to display instead of the built-in cube
    #[arg(long)]
    mesh: Option<PathBuf>,

    /// Image to map onto the mesh instead of a checkerboard
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Start with triangle outlines on
    #[arg(long)]
    wireframe: bool,

    /// Start with texturing off
    #[arg(long)]
    untextured: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Append log output to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn renderer_config(&self) -> RendererConfig {
        let mut config = if self.handheld {
            RendererConfig::handheld()
        } else {
            RendererConfig::with_screen(self.width.max(1), self.height.max(1))
        };
        config.fov = self.fov;
        config.max_screen_height = config.max_screen_height.max(MAX_WINDOW_ROWS);
        if self.wireframe {
            config.render_mode |= RenderMode::WIREFRAME;
        }
        if self.untextured {
            config.render_mode.remove(RenderMode::TEXTURED);
        }
        config
    }
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let filter = if cli.verbose { "debug" } else { "info" };
    match &cli.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::new(filter))
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::new(filter))
                .init();
        }
    }
    Ok(())
}

/// Demo state driven by key commands.
struct Scene {
    angles: Vec3,
    spin: [bool; 3],
    depth: f32,
    paused: bool,
}

impl Scene {
    fn new() -> Self {
        Self {
            angles: Vec3::ZERO,
            spin: [true; 3],
            depth: START_DEPTH,
            paused: false,
        }
    }

    fn advance(&mut self, dt: f32) {
        if self.paused {
            return;
        }
        let step = |on: bool, speed: f32| if on { speed * dt } else { 0.0 };
        self.angles = self.angles
            + Vec3::new(
                step(self.spin[0], SPIN_SPEED[0]),
                step(self.spin[1], SPIN_SPEED[1]),
                step(self.spin[2], SPIN_SPEED[2]),
            );
        self.angles = Vec3::new(
            self.angles.x % 360.0,
            self.angles.y % 360.0,
            self.angles.z % 360.0,
        );
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = cli.renderer_config();
    let (width, height) = (config.viewport.width, config.viewport.height);
    let mut renderer = Renderer::new(config);

    let mut textures = TextureBank::new();
    let texture = match &cli.texture {
        Some(path) => textures
            .load(path)
            .with_context(|| format!("loading texture {}", path.display()))?,
        None => textures.add(Texture::checkerboard(64, 8, 0xFFF0F0F0, 0xFF3050A0)),
    };

    let object = match &cli.mesh {
        Some(path) => Object::from_obj("mesh", path)
            .with_context(|| format!("loading mesh {}", path.display()))?,
        None => Object::new("cube", Mesh::cube()),
    };
    let mut objects = vec![object.with_texture(texture)];
    tracing::info!(
        faces = objects[0].mesh().faces().len(),
        vertices = objects[0].mesh().vertices().len(),
        width,
        height,
        "scene ready"
    );

    let mut window = Window::new("spanrast", width, height).map_err(anyhow::Error::msg)?;
    let mut surface = Surface::new(width, height, BACKGROUND_COLOR);
    let mut limiter = FrameLimiter::new(&window);
    let mut fps = FpsCounter::new();
    let mut scene = Scene::new();
    let mut commands = Vec::new();

    'frames: loop {
        window.poll_commands(&mut commands);
        for command in commands.drain(..) {
            match command {
                Command::Quit => break 'frames,
                Command::ToggleTextured => renderer.toggle_render_mode(RenderMode::TEXTURED),
                Command::ToggleWireframe => renderer.toggle_render_mode(RenderMode::WIREFRAME),
                Command::ToggleSpin(axis) => {
                    let i = match axis {
                        Axis::X => 0,
                        Axis::Y => 1,
                        Axis::Z => 2,
                    };
                    scene.spin[i] = !scene.spin[i];
                }
                Command::Push => scene.depth += DEPTH_STEP,
                Command::Pull => scene.depth -= DEPTH_STEP,
                Command::TogglePause => scene.paused = !scene.paused,
                Command::Zoom(degrees) => {
                    renderer.set_fov(renderer.fov() + degrees);
                    tracing::debug!(fov = renderer.fov(), "field of view changed");
                }
                Command::Resize(w, h) => {
                    window.resize(w, h).map_err(anyhow::Error::msg)?;
                    surface.resize(w, h, BACKGROUND_COLOR);
                    renderer.set_viewport(0, 0, w as i32, h as i32);
                }
            }
        }

        let delta_ms = limiter.wait_and_get_delta(&window);
        let dt = delta_ms as f32 / 1000.0;
        scene.advance(dt);
        if !scene.paused {
            for object in &mut objects {
                object.body_mut().step(dt);
            }
        }

        {
            let mut buffer = surface.frame_buffer();
            buffer.clear(BACKGROUND_COLOR);
            renderer.identity();
            renderer.translate(Vec3::new(0.0, 0.0, scene.depth));
            renderer.rotate(scene.angles);
            renderer.render_scene(&mut objects, &textures, &mut buffer);
        }
        window.present(surface.as_bytes()).map_err(anyhow::Error::msg)?;

        if let Some(rate) = fps.tick(delta_ms) {
            window.set_title(&format!("spanrast - {rate:.0} fps"));
            tracing::debug!(fps = rate, "frame rate");
        }
    }

    tracing::info!("bye");
    Ok(())
}
