mod glyphs;
mod pixel_buffer;

pub use glyphs::{load_atlas, TtfRasterizer};
pub use pixel_buffer::PixelBuffer;

use crate::driver::Frontend;
use crate::error::{FxError, Result};
use crate::viewport::Viewport;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::{EventPump, Sdl};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown(Keycode),
}

/// Full-screen kiosk window at the desktop resolution
pub struct Display {
    _sdl: Sdl,
    canvas: Canvas<Window>,
    event_pump: EventPump,
    viewport: Viewport,
}

pub struct RenderTarget<'a> {
    texture: Texture<'a>,
}

impl Display {
    /// Open a borderless full-screen window covering the primary display
    ///
    /// Input is grabbed and the cursor hidden so the effect owns the screen.
    /// Presentation is not vsynced; pacing comes from the frame driver.
    pub fn fullscreen(title: &str) -> Result<(Self, TextureCreator<WindowContext>)> {
        let sdl_context = sdl2::init().map_err(FxError::Sdl)?;
        let video_subsystem = sdl_context.video().map_err(FxError::Sdl)?;

        let mode = video_subsystem
            .desktop_display_mode(0)
            .map_err(FxError::Sdl)?;
        if mode.w <= 0 || mode.h <= 0 {
            return Err(FxError::Sdl(format!(
                "desktop reports an empty display mode {}x{}",
                mode.w, mode.h
            )));
        }
        let viewport = Viewport::new(mode.w as u32, mode.h as u32);

        sdl2::hint::set("SDL_GRAB_KEYBOARD", "1");

        let mut window = video_subsystem
            .window(title, viewport.width, viewport.height)
            .fullscreen_desktop()
            .borderless()
            .input_grabbed()
            .build()
            .map_err(|e| FxError::Sdl(e.to_string()))?;
        window.raise();
        sdl_context.mouse().show_cursor(false);

        let canvas = window
            .into_canvas()
            .accelerated()
            .build()
            .map_err(|e| FxError::Sdl(e.to_string()))?;

        let texture_creator = canvas.texture_creator();
        let event_pump = sdl_context.event_pump().map_err(FxError::Sdl)?;

        tracing::info!(
            width = viewport.width,
            height = viewport.height,
            "opened full-screen display"
        );

        Ok((
            Self {
                _sdl: sdl_context,
                canvas,
                event_pump,
                viewport,
            },
            texture_creator,
        ))
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn present(&mut self, target: &mut RenderTarget, buffer: &PixelBuffer) -> Result<()> {
        target
            .texture
            .update(None, buffer.as_bytes(), (buffer.width() * 4) as usize)
            .map_err(|e| FxError::Sdl(e.to_string()))?;

        self.canvas
            .copy(&target.texture, None, None)
            .map_err(FxError::Sdl)?;
        self.canvas.present();
        Ok(())
    }

    pub fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();

        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => events.push(InputEvent::Quit),
                Event::KeyDown {
                    keycode: Some(k), ..
                } => events.push(InputEvent::KeyDown(k)),
                _ => {},
            }
        }

        events
    }
}

impl<'a> RenderTarget<'a> {
    /// Create a streaming texture matching the viewport
    pub fn for_viewport(
        texture_creator: &'a TextureCreator<WindowContext>,
        viewport: Viewport,
    ) -> Result<Self> {
        let texture = texture_creator
            .create_texture_streaming(PixelFormatEnum::RGBA8888, viewport.width, viewport.height)
            .map_err(|e| FxError::Sdl(e.to_string()))?;
        Ok(Self { texture })
    }
}

/// Display plus its streaming texture, driven one frame at a time
pub struct SdlFrontend<'a> {
    // Texture is released before the renderer that owns it
    target: RenderTarget<'a>,
    display: Display,
}

impl<'a> SdlFrontend<'a> {
    pub fn new(display: Display, target: RenderTarget<'a>) -> Self {
        Self { display, target }
    }
}

impl Frontend for SdlFrontend<'_> {
    fn quit_requested(&mut self) -> bool {
        self.display
            .poll_events()
            .iter()
            .any(|event| matches!(event, InputEvent::Quit | InputEvent::KeyDown(Keycode::Escape)))
    }

    fn present(&mut self, buffer: &PixelBuffer) -> Result<()> {
        self.display.present(&mut self.target, buffer)
    }
}
