use sha2::{Digest, Sha256};

use crate::graphics::CpuRenderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn rgba_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

/// An owned RGBA frame for offscreen rendering and tests.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    size: SurfaceSize,
    buf: Vec<u8>,
}

impl FrameBuffer {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            buf: vec![0u8; size.rgba_len()],
        }
    }

    /// A frame pre-filled with `color`.
    pub fn filled(size: SurfaceSize, color: [u8; 4]) -> Self {
        let mut fb = Self::new(size);
        for px in fb.buf.chunks_exact_mut(4) {
            px.copy_from_slice(&color);
        }
        fb
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn frame(&self) -> &[u8] {
        &self.buf
    }

    pub fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
        self.buf.resize(size.rgba_len(), 0u8);
    }

    pub fn renderer(&mut self) -> CpuRenderer<'_> {
        CpuRenderer::new(&mut self.buf, self.size)
    }

    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let idx = ((y as usize) * (self.size.width as usize) + x as usize) * 4;
        let px = self.buf.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Number of pixels equal to `color`, for coarse "was anything drawn here" assertions.
    pub fn count_color(&self, color: [u8; 4]) -> usize {
        self.buf.chunks_exact(4).filter(|px| *px == color).count()
    }

    /// SHA-256 of the RGBA bytes as lowercase hex.
    pub fn digest(&self) -> String {
        rgba_sha256_hex(&self.buf)
    }
}

pub fn rgba_sha256_hex(rgba: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(rgba);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::Renderer2d;
    use crate::ui::Rect;

    #[test]
    fn digest_changes_when_a_pixel_changes() {
        let mut fb = FrameBuffer::new(SurfaceSize::new(4, 4));
        let before = fb.digest();
        fb.renderer().fill_rect(Rect::new(1, 1, 1, 1), [1, 2, 3, 255]);
        assert_ne!(before, fb.digest());
        assert_eq!(fb.pixel(1, 1), Some([1, 2, 3, 255]));
        assert_eq!(fb.pixel(4, 0), None);
    }

    #[test]
    fn resize_keeps_buffer_length_in_sync() {
        let mut fb = FrameBuffer::new(SurfaceSize::new(2, 2));
        fb.resize(SurfaceSize::new(3, 5));
        assert_eq!(fb.frame().len(), 3 * 5 * 4);
    }
}
