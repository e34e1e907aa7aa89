use pixels::{Pixels, PixelsBuilder, SurfaceTexture};
use winit::window::Window;

use crate::error::EngineError;
use crate::graphics::CpuRenderer;
use crate::surface::SurfaceSize;

/// Headful presenter built on `pixels`.
///
/// The pixel buffer always matches the window's inner size 1:1 so UI coordinates are window
/// coordinates; drawing goes through a `CpuRenderer` borrowed over the buffer.
pub struct PixelsPresenter {
    pixels: Pixels,
    size: SurfaceSize,
}

impl PixelsPresenter {
    pub fn new(window: &Window, vsync: bool) -> Result<Self, EngineError> {
        let inner = window.inner_size();
        let size = SurfaceSize::new(inner.width.max(1), inner.height.max(1));
        let texture = SurfaceTexture::new(size.width, size.height, window);
        let pixels = PixelsBuilder::new(size.width, size.height, texture)
            .enable_vsync(vsync)
            .build()?;
        Ok(Self { pixels, size })
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Resizes surface and buffer together. Zero sizes (minimised windows) are ignored.
    pub fn resize(&mut self, size: SurfaceSize) -> Result<(), EngineError> {
        if size.is_empty() || size == self.size {
            return Ok(());
        }
        self.pixels.resize_surface(size.width, size.height)?;
        self.pixels.resize_buffer(size.width, size.height)?;
        log::debug!("presenter resized to {}x{}", size.width, size.height);
        self.size = size;
        Ok(())
    }

    pub fn renderer(&mut self) -> CpuRenderer<'_> {
        CpuRenderer::new(self.pixels.frame_mut(), self.size)
    }

    pub fn present(&mut self) -> Result<(), EngineError> {
        self.pixels.render()?;
        Ok(())
    }
}
