use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use glam::{IVec2, Vec2};
use instant::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalPosition, LogicalSize, PhysicalSize};
use winit::event::{DeviceEvent, DeviceId, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, DeviceEvents, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId, WindowLevel};

use crate::assets::{self, AssetBundle};
use crate::audio::AudioOutput;
use crate::input::{CursorTracker, PressLatch};
use crate::pet::{PetState, Simulated, TickInput, TickOutput, SPRITE_SIZE};
#[cfg(windows)]
use crate::platform;
use crate::render::GpuState;

/// Target simulation tick rate (seconds per tick).
const TICK_RATE: f64 = 1.0 / 50.0;
/// Max accumulated time before we clamp (prevents spiral of death).
const MAX_ACCUMULATOR: f64 = 0.25;
/// How often to log loop stats (seconds).
const STATS_LOG_INTERVAL: f64 = 5.0;
/// Window title and X11 class/instance name.
const APP_NAME: &str = "deskpet";

/// Monitor size in logical pixels.
fn logical_bounds(size: PhysicalSize<u32>, scale_factor: f64) -> IVec2 {
    let size = size.to_logical::<i32>(scale_factor);
    IVec2::new(size.width, size.height)
}

// ---------------------------------------------------------------------------
// Loop stats
// ---------------------------------------------------------------------------

struct LoopStats {
    tick_count: u64,
    last_log_time: Instant,
    ticks_since_log: u32,
    redraws_since_log: u32,
}

impl LoopStats {
    fn new() -> Self {
        Self {
            tick_count: 0,
            last_log_time: Instant::now(),
            ticks_since_log: 0,
            redraws_since_log: 0,
        }
    }

    fn record_tick(&mut self) {
        self.tick_count += 1;
        self.ticks_since_log += 1;
    }

    fn record_redraw(&mut self) {
        self.redraws_since_log += 1;
    }

    fn maybe_log(&mut self) {
        let elapsed = self.last_log_time.elapsed().as_secs_f64();
        if elapsed >= STATS_LOG_INTERVAL {
            log::debug!(
                "ticks/s: {:.1} | redraws: {} | total ticks: {}",
                self.ticks_since_log as f64 / elapsed,
                self.redraws_since_log,
                self.tick_count,
            );
            self.last_log_time = Instant::now();
            self.ticks_since_log = 0;
            self.redraws_since_log = 0;
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Top-level application state.
struct App {
    assets: AssetBundle,
    audio: AudioOutput,

    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,

    // Created once the monitor size is known.
    pet: Option<PetState>,

    // RNG (shared, passed into every tick)
    rng: fastrand::Rng,

    // Input
    press: PressLatch,
    cursor: CursorTracker,

    // Monitor size in logical pixels
    bounds: IVec2,
    scale_factor: f64,

    // Fixed timestep
    last_frame_time: Option<Instant>,
    accumulator: f64,

    stats: LoopStats,
    needs_redraw: bool,

    // First fatal error raised inside an event callback.
    error: Option<Box<dyn Error>>,
}

impl App {
    fn new(assets: AssetBundle, audio: AudioOutput) -> Self {
        Self {
            assets,
            audio,
            window: None,
            gpu: None,
            pet: None,
            rng: fastrand::Rng::new(),
            press: PressLatch::new(),
            cursor: CursorTracker::new(Vec2::ZERO),
            bounds: IVec2::ZERO,
            scale_factor: 1.0,
            last_frame_time: None,
            accumulator: 0.0,
            stats: LoopStats::new(),
            needs_redraw: true,
            error: None,
        }
    }

    /// Record a fatal error and stop the event loop.
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: Box<dyn Error>) {
        log::error!("{error}");
        self.error.get_or_insert(error);
        event_loop.exit();
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), Box<dyn Error>> {
        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next())
            .ok_or("no monitor found")?;
        self.scale_factor = monitor.scale_factor();
        self.bounds = logical_bounds(monitor.size(), self.scale_factor);

        let pet = PetState::new(self.bounds, &mut self.rng);
        self.cursor = CursorTracker::new(pet.center().as_vec2());

        // Start hidden so DWM doesn't cache stale frame state before our
        // window style changes take effect.
        let attrs = WindowAttributes::default()
            .with_title(APP_NAME)
            .with_decorations(false)
            .with_resizable(false)
            .with_active(false)
            .with_visible(false)
            .with_window_level(WindowLevel::AlwaysOnTop)
            .with_inner_size(LogicalSize::new(SPRITE_SIZE as f64, SPRITE_SIZE as f64))
            .with_position(LogicalPosition::new(pet.position().x, pet.position().y));

        // On Windows transparency comes from wgpu's DxgiFromVisual, and
        // with_transparent would add a conflicting WS_EX_LAYERED surface.
        #[cfg(not(windows))]
        let attrs = attrs.with_transparent(true);

        #[cfg(all(unix, not(any(target_os = "macos", target_os = "ios", target_os = "android"))))]
        let attrs = {
            use winit::platform::x11::{WindowAttributesExtX11, WindowType};
            attrs
                .with_name(APP_NAME, APP_NAME)
                .with_x11_window_type(vec![WindowType::Utility])
        };

        let window = Arc::new(event_loop.create_window(attrs)?);

        #[cfg(windows)]
        platform::win32::setup_overlay(&window);

        log::info!(
            "Pet window created at {} on {:?} ({}x{} logical, scale {})",
            pet.position(),
            monitor.name().unwrap_or_default(),
            self.bounds.x,
            self.bounds.y,
            self.scale_factor,
        );

        let gpu = GpuState::new(window.clone(), &self.assets)?;
        log::info!("wgpu + sprite pipeline initialized");

        // Cursor tracking outside our window relies on raw device motion.
        event_loop.listen_device_events(DeviceEvents::Always);

        window.set_visible(true);

        self.gpu = Some(gpu);
        self.pet = Some(pet);
        self.window = Some(window);
        Ok(())
    }

    /// Run fixed-timestep simulation ticks.
    fn run_fixed_update(&mut self, dt: f64) {
        self.accumulator += dt;

        if self.accumulator > MAX_ACCUMULATOR {
            self.accumulator = MAX_ACCUMULATOR;
        }

        // Get mouse position once per frame (not per tick)
        #[cfg(windows)]
        {
            let (x, y) = platform::win32::get_mouse_pos();
            self.cursor
                .set_screen(Vec2::new(x, y) / self.scale_factor as f32);
        }

        while self.accumulator >= TICK_RATE {
            let Some(pet) = self.pet.as_mut() else {
                return;
            };

            let input = TickInput {
                pressed: self.press.take(),
                cursor: self.cursor.position(),
                bounds: self.bounds,
            };
            let output = pet.tick(&input, &mut self.rng);
            if input.pressed {
                let t = pet.thresholds();
                log::info!("Pet is now {:?} (animation {}..{})", pet.mode(), t.min, t.max);
            }
            self.apply(output);

            self.accumulator -= TICK_RATE;
            self.stats.record_tick();
        }
    }

    /// Push a tick's output to the window, renderer and speakers.
    fn apply(&mut self, output: TickOutput) {
        if let (Some(position), Some(window)) = (output.position, &self.window) {
            window.set_outer_position(LogicalPosition::new(position.x, position.y));
        }

        if output.sprite.is_some() {
            self.needs_redraw = true;
        }

        if let Some(cue) = output.sound {
            match self.assets.sound(cue) {
                Some(clip) => {
                    log::debug!("Playing {}", cue.name());
                    self.audio.play(clip);
                }
                None => log::warn!("No sound loaded for {}", cue.name()),
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.create_window(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if let Some(last) = self.last_frame_time {
            let dt = now.duration_since(last).as_secs_f64();
            self.run_fixed_update(dt);
        }
        self.last_frame_time = Some(now);
        self.stats.maybe_log();

        if self.needs_redraw {
            if let Some(w) = &self.window {
                w.request_redraw();
            }
        }

        event_loop.set_control_flow(ControlFlow::WaitUntil(
            now + Duration::from_secs_f64(TICK_RATE),
        ));
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                    self.needs_redraw = true;
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale_factor = scale_factor;
                match self.window.as_ref().and_then(|w| w.current_monitor()) {
                    Some(monitor) => {
                        self.bounds = logical_bounds(monitor.size(), scale_factor);
                        log::info!(
                            "Scale factor now {scale_factor}, screen {}x{}",
                            self.bounds.x,
                            self.bounds.y
                        );
                    }
                    None => log::warn!("Scale factor changed but current monitor is unknown"),
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.press.update(state.is_pressed());
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(pet) = &self.pet {
                    let local = position.to_logical::<f32>(self.scale_factor);
                    self.cursor
                        .on_cursor_moved(pet.position(), Vec2::new(local.x, local.y));
                }
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor.on_cursor_left();
            }
            WindowEvent::RedrawRequested => {
                if let (Some(gpu), Some(pet)) = (&self.gpu, &self.pet) {
                    if gpu.render_sprite(pet.sprite()) {
                        self.needs_redraw = false;
                        self.stats.record_redraw();
                    }
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            let delta = Vec2::new(dx as f32, dy as f32) / self.scale_factor as f32;
            self.cursor.on_motion(delta, self.bounds);
        }
    }
}

/// Entry point: decode assets, open audio, then run the event loop.
pub fn run() -> Result<(), Box<dyn Error>> {
    let assets = assets::load(assets::BUNDLE)?;
    log::info!(
        "Loaded {} sprites and {} sounds",
        assets.sprite_count(),
        assets.sound_count()
    );

    let audio = AudioOutput::open()?;

    let event_loop = EventLoop::new()?;
    let mut app = App::new(assets, audio);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_follow_the_scale_factor() {
        let size = PhysicalSize::new(3840, 2160);
        assert_eq!(logical_bounds(size, 1.0), IVec2::new(3840, 2160));
        assert_eq!(logical_bounds(size, 2.0), IVec2::new(1920, 1080));
        assert_eq!(logical_bounds(size, 1.5), IVec2::new(2560, 1440));
    }
}
