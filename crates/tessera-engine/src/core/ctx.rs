use winit::window::Window;

use crate::coords::{ColorRgba, Viewport};
use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::{InputFrame, InputState};
use crate::render::{RenderCtx, RenderTarget};
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// The window being driven.
pub struct WindowCtx<'a> {
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Returns `(width, height)` in logical pixels.
    pub fn logical_size(&self) -> (f32, f32) {
        let phys = self.window.inner_size();
        let logi: winit::dpi::LogicalSize<f64> = phys.to_logical(self.window.scale_factor());
        (logi.width as f32, logi.height as f32)
    }

    pub fn viewport(&self) -> Viewport {
        let (w, h) = self.logical_size();
        Viewport::new(w, h)
    }

    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Clears the surface with `clear`, calls `draw` with a ready [`RenderCtx`]
    /// and [`RenderTarget`], then presents the frame.
    ///
    /// Surface errors skip the frame; a fatal one returns `AppControl::Exit`.
    pub fn render<F>(&mut self, clear: ColorRgba, draw: F) -> AppControl
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        let viewport = self.window.viewport();

        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                log::debug!("surface error: {err}");
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => AppControl::Exit,
                    _ => AppControl::Continue,
                };
            }
        };

        let rctx = RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
            viewport,
        );

        {
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            target.clear(clear);
            draw(&rctx, &mut target);
        }

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);

        AppControl::Continue
    }
}
