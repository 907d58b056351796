//! SDL2 window used as the display: it uploads finished frames and turns key
//! presses into renderer commands.
//!
//! Nothing here touches the pipeline itself. The demo binary reads
//! [`Command`]s, applies them to the renderer and hands the finished surface to
//! [`Window::present`].

use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::Rect;

pub const FPS: u64 = 60;
pub const FRAME_TARGET_TIME: f64 = 1000.0 / FPS as f64;

/// Field-of-view change per `[` / `]` press, in degrees.
pub const FOV_STEP: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Quit,
    ToggleTextured,
    ToggleWireframe,
    /// Start or stop spinning about one axis.
    ToggleSpin(Axis),
    /// Move the scene away from the viewer.
    Push,
    /// Move the scene toward the viewer.
    Pull,
    TogglePause,
    /// Change the field of view by the given number of degrees.
    Zoom(f32),
    Resize(u32, u32),
}

impl Command {
    /// Key bindings: T/W toggle textured/wireframe, X/Y/Z toggle a spin axis,
    /// M/P push/pull, Space pauses, `[`/`]` narrow/widen the view, Esc quits.
    pub fn from_key(key: Keycode) -> Option<Self> {
        let command = match key {
            Keycode::Escape => Command::Quit,
            Keycode::T => Command::ToggleTextured,
            Keycode::W => Command::ToggleWireframe,
            Keycode::X => Command::ToggleSpin(Axis::X),
            Keycode::Y => Command::ToggleSpin(Axis::Y),
            Keycode::Z => Command::ToggleSpin(Axis::Z),
            Keycode::M => Command::Push,
            Keycode::P => Command::Pull,
            Keycode::Space => Command::TogglePause,
            Keycode::LeftBracket => Command::Zoom(-FOV_STEP),
            Keycode::RightBracket => Command::Zoom(FOV_STEP),
            _ => return None,
        };
        Some(command)
    }

    pub fn from_event(event: &Event) -> Option<Self> {
        match *event {
            Event::Quit { .. } => Some(Command::Quit),
            Event::KeyDown {
                keycode: Some(key),
                repeat: false,
                ..
            } => Command::from_key(key),
            Event::Window {
                win_event: WindowEvent::Resized(w, h),
                ..
            } => Some(Command::Resize(w.max(1) as u32, h.max(1) as u32)),
            _ => None,
        }
    }
}

pub struct FrameLimiter {
    previous_frame_time: u64,
}

impl FrameLimiter {
    pub fn new(window: &Window) -> Self {
        Self {
            previous_frame_time: window.timer().ticks64(),
        }
    }

    /// Waits if necessary to maintain frame rate and returns the delta time in milliseconds.
    /// Delta time represents the time elapsed since the last call to this method.
    pub fn wait_and_get_delta(&mut self, window: &Window) -> u64 {
        let mut current_time = window.timer().ticks64();
        let mut delta_time = current_time.saturating_sub(self.previous_frame_time);

        if delta_time < FRAME_TARGET_TIME as u64 {
            let time_to_wait = (FRAME_TARGET_TIME as u64) - delta_time;
            std::thread::sleep(std::time::Duration::from_millis(time_to_wait));
            current_time = window.timer().ticks64();
            delta_time = current_time.saturating_sub(self.previous_frame_time);
        }

        self.previous_frame_time = current_time;
        delta_time
    }
}

/// Frames-per-second over one-second windows.
#[derive(Debug, Default)]
pub struct FpsCounter {
    frames: u32,
    elapsed_ms: u64,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one frame that took `delta_ms`. Returns the rate once per
    /// elapsed second.
    pub fn tick(&mut self, delta_ms: u64) -> Option<f32> {
        self.frames += 1;
        self.elapsed_ms += delta_ms;
        if self.elapsed_ms < 1000 {
            return None;
        }
        let fps = self.frames as f32 * 1000.0 / self.elapsed_ms as f32;
        self.frames = 0;
        self.elapsed_ms = 0;
        Some(fps)
    }
}

pub struct Window {
    canvas: sdl2::render::Canvas<sdl2::video::Window>,
    // Field order matters: `texture` borrows from `texture_creator` and must drop first.
    texture: sdl2::render::Texture<'static>,
    texture_creator: Box<sdl2::render::TextureCreator<sdl2::video::WindowContext>>,
    event_pump: sdl2::EventPump,
    timer_subsystem: sdl2::TimerSubsystem,
    width: u32,
    height: u32,
}

impl Window {
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self, String> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;
        let timer_subsystem = sdl_context.timer()?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .resizable()
            .build()
            .map_err(|e| e.to_string())?;

        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
        let texture_creator = Box::new(canvas.texture_creator());
        let event_pump = sdl_context.event_pump()?;

        // SAFETY: texture_creator is heap-allocated and lives as long as Window.
        // We ensure texture is dropped before texture_creator by struct field order.
        let texture_creator_ref: &'static sdl2::render::TextureCreator<sdl2::video::WindowContext> =
            unsafe { &*(texture_creator.as_ref() as *const _) };
        let texture = texture_creator_ref
            .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
            .map_err(|e| e.to_string())?;

        Ok(Self {
            canvas,
            texture,
            texture_creator,
            event_pump,
            timer_subsystem,
            width,
            height,
        })
    }

    /// Drains pending events into `commands`.
    pub fn poll_commands(&mut self, commands: &mut Vec<Command>) {
        commands.extend(self.event_pump.poll_iter().filter_map(|e| Command::from_event(&e)));
    }

    /// Uploads a finished ARGB8888 frame and flips it to the screen.
    pub fn present(&mut self, pixels: &[u8]) -> Result<(), String> {
        self.texture
            .update(None, pixels, (self.width * 4) as usize)
            .map_err(|e| e.to_string())?;

        self.canvas.clear();
        self.canvas
            .copy(&self.texture, None, Some(Rect::new(0, 0, self.width, self.height)))?;
        self.canvas.present();
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), String> {
        self.width = width;
        self.height = height;
        // SAFETY: Same as in new() - texture_creator outlives texture
        let texture_creator_ref: &'static sdl2::render::TextureCreator<sdl2::video::WindowContext> =
            unsafe { &*(self.texture_creator.as_ref() as *const _) };
        self.texture = texture_creator_ref
            .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
            .map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn set_title(&mut self, title: &str) {
        // Titles with interior NULs are rejected by SDL; keep the old one then.
        let _ = self.canvas.window_mut().set_title(title);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn timer(&self) -> &sdl2::TimerSubsystem {
        &self.timer_subsystem
    }
}
