//! Windowed presenter on top of `minifb`.
//!
//! The window must be created and driven on the main thread, which is why
//! the engine runs presentation on the calling thread.

use minifb::{Window, WindowOptions};
use oldschool_core::{DemoConfig, EngineError, EngineResult, FrameBuffer, Presenter};
use tracing::info;

/// Window title.
pub const TITLE: &str = "Old-school CG";

/// Refresh rate assumed for `--vsync`.
const VSYNC_FPS: usize = 60;

/// Shows frames in a native window.
///
/// Frames are repacked from RGBA bytes to the `0x00RRGGBB` words `minifb`
/// expects. Any key release or closing the window ends the run.
pub struct WindowPresenter {
    window: Window,
    staging: Vec<u32>,
    width: usize,
    height: usize,
}

impl WindowPresenter {
    /// Opens the window described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Presenter`] if the window cannot be created.
    pub fn open(config: &DemoConfig) -> EngineResult<Self> {
        let options = WindowOptions {
            borderless: config.fullscreen,
            title: !config.fullscreen,
            topmost: config.fullscreen,
            ..WindowOptions::default()
        };

        let mut window = Window::new(TITLE, config.width as usize, config.height as usize, options)
            .map_err(|e| EngineError::Presenter(format!("could not create window: {e}")))?;
        // 0 turns the limiter off
        window.set_target_fps(if config.vsync { VSYNC_FPS } else { 0 });

        // frames are rendered at whatever size the window actually got
        let (width, height) = window.get_size();
        info!(
            width,
            height,
            fullscreen = config.fullscreen,
            vsync = config.vsync,
            "window created: {width}x{height}"
        );

        Ok(Self {
            window,
            staging: vec![0; width * height],
            width,
            height,
        })
    }

    /// Size of the drawable area in pixels.
    #[must_use]
    pub fn drawable_size(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}

impl Presenter for WindowPresenter {
    fn present(&mut self, buffer: &FrameBuffer) -> EngineResult<()> {
        for (word, px) in self.staging.iter_mut().zip(buffer.pixels()) {
            *word = px.to_0rgb();
        }
        self.window
            .update_with_buffer(&self.staging, self.width, self.height)
            .map_err(|e| EngineError::Presenter(e.to_string()))
    }

    fn termination_requested(&mut self) -> bool {
        !self.window.is_open() || !self.window.get_keys_released().is_empty()
    }
}
