use winit::window::Window;

use crate::coords::ColorRgba;
use crate::device::{Gpu, SurfaceErrorAction};
use crate::render::RenderCtx;
use crate::time::FrameTime;

use super::app::AppControl;

/// Per-frame context passed to `App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: &'a Window,
    pub gpu: &'a mut Gpu<'w>,
    pub time: FrameTime,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Handles for creating GPU resources.
    pub fn render_ctx(&self) -> RenderCtx<'_> {
        self.gpu.render_ctx()
    }

    /// Acquires a frame, clears it to `clear`, calls `draw` with the frame's view,
    /// then presents.
    ///
    /// `draw` must submit everything it records before returning. A skipped or
    /// reconfigured frame returns `Continue` without calling `draw`.
    pub fn render<F>(&mut self, clear: ColorRgba, draw: F) -> AppControl
    where
        F: FnOnce(&RenderCtx<'_>, &wgpu::TextureView) -> AppControl,
    {
        let size = self.gpu.size();
        if size.width == 0 || size.height == 0 {
            return AppControl::Continue;
        }

        let frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => {
                        log::error!("unrecoverable surface error");
                        AppControl::Exit
                    }
                    _ => AppControl::Continue,
                };
            }
        };

        self.gpu.clear(&frame, clear);

        let control = draw(&self.gpu.render_ctx(), &frame.view);

        self.window.pre_present_notify();
        self.gpu.present(frame);

        control
    }
}
