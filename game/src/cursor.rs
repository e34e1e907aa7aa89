//! Pixel-art mouse cursor drawn on top of the UI.

use engine::graphics::Renderer2d;

use crate::palette::Palette;
use crate::widgets::clip_signed;

/// `#` is outline, `.` is fill, anything else is transparent.
const ARROW: &[&str] = &[
    "#         ",
    "##        ",
    "#.#       ",
    "#..#      ",
    "#...#     ",
    "#....#    ",
    "#.....#   ",
    "#......#  ",
    "#.......# ",
    "#....#####",
    "#..#..#   ",
    "#.# #..#  ",
    "##  #..#  ",
    "     ##   ",
];

const POINTER: &[&str] = &[
    "    ##      ",
    "   #..#     ",
    "   #..#     ",
    "   #..###   ",
    "   #..#..## ",
    "## #..#..#.#",
    "#.##.......#",
    "#..#.......#",
    " #.........#",
    "  #........#",
    "  #.......# ",
    "   #......# ",
    "   ######## ",
];

const CROSSHAIR: &[&str] = &[
    "    ###    ",
    "    #.#    ",
    "    #.#    ",
    "    #.#    ",
    "#####.#####",
    "#.........#",
    "#####.#####",
    "    #.#    ",
    "    #.#    ",
    "    #.#    ",
    "    ###    ",
];

const GRAB: &[&str] = &[
    "  ## ## ##  ",
    " #..#..#..# ",
    " #........##",
    "##.........#",
    "#..........#",
    "#..........#",
    " #.........#",
    "  #.......# ",
    "   #......# ",
    "   ######## ",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CursorKind {
    #[default]
    Arrow,
    Pointer,
    Crosshair,
    Grab,
}

impl CursorKind {
    pub fn bitmap(self) -> &'static [&'static str] {
        match self {
            CursorKind::Arrow => ARROW,
            CursorKind::Pointer => POINTER,
            CursorKind::Crosshair => CROSSHAIR,
            CursorKind::Grab => GRAB,
        }
    }

    /// Bitmap cell that sits exactly under the pointer position.
    pub fn hotspot(self) -> (u32, u32) {
        match self {
            CursorKind::Arrow => (0, 0),
            CursorKind::Pointer => (4, 0),
            CursorKind::Crosshair => (5, 5),
            CursorKind::Grab => (6, 4),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PixelCursor {
    kind: CursorKind,
    scale: u32,
    pos: Option<(u32, u32)>,
    system_preferred: bool,
}

impl PixelCursor {
    pub fn new(scale: u32) -> Self {
        Self {
            kind: CursorKind::Arrow,
            scale: scale.max(1),
            pos: None,
            system_preferred: false,
        }
    }

    pub fn kind(&self) -> CursorKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: CursorKind) {
        self.kind = kind;
    }

    pub fn set_system_preferred(&mut self, preferred: bool) {
        self.system_preferred = preferred;
    }

    /// `None` when the pointer is outside the window.
    pub fn update(&mut self, pointer: Option<(u32, u32)>) {
        self.pos = pointer;
    }

    pub fn is_visible(&self) -> bool {
        self.pos.is_some() && !self.system_preferred
    }

    pub fn draw(&self, r: &mut dyn Renderer2d, palette: &Palette) {
        if self.system_preferred {
            return;
        }
        let Some((px, py)) = self.pos else {
            return;
        };
        let s = self.scale;
        let (hx, hy) = self.kind.hotspot();
        let x0 = px as i32 - (hx * s) as i32;
        let y0 = py as i32 - (hy * s) as i32;
        for (row, line) in self.kind.bitmap().iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                let color = match ch {
                    '#' => palette.cursor_outline,
                    '.' => palette.cursor_fill,
                    _ => continue,
                };
                let x = x0 + (col as u32 * s) as i32;
                let y = y0 + (row as u32 * s) as i32;
                if let Some(rect) = clip_signed(x, y, s, s) {
                    r.fill_rect(rect, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use engine::surface::{FrameBuffer, SurfaceSize};

    use super::*;
    use crate::palette::PALETTES;

    const KINDS: [CursorKind; 4] = [
        CursorKind::Arrow,
        CursorKind::Pointer,
        CursorKind::Crosshair,
        CursorKind::Grab,
    ];

    #[test]
    fn bitmaps_are_rectangular_and_hotspots_inside() {
        for kind in KINDS {
            let rows = kind.bitmap();
            let w = rows[0].len();
            assert!(rows.iter().all(|r| r.len() == w), "{kind:?}");
            let (hx, hy) = kind.hotspot();
            assert!((hx as usize) < w && (hy as usize) < rows.len());
        }
    }

    #[test]
    fn arrow_tip_lands_on_the_pointer() {
        let palette = &PALETTES[0];
        let mut cursor = PixelCursor::new(2);
        cursor.update(Some((10, 10)));
        let mut fb = FrameBuffer::new(SurfaceSize::new(64, 64));
        cursor.draw(&mut fb.renderer(), palette);
        assert_eq!(fb.pixel(10, 10), Some(palette.cursor_outline));
        assert_eq!(fb.pixel(11, 11), Some(palette.cursor_outline));
        // Row 3, column 1 of the arrow is fill.
        assert_eq!(fb.pixel(12, 16), Some(palette.cursor_fill));
        assert_eq!(fb.pixel(9, 9), Some([0, 0, 0, 0]));
    }

    #[test]
    fn hidden_without_pointer_or_when_system_cursor_is_preferred() {
        let palette = &PALETTES[0];
        let mut cursor = PixelCursor::new(2);
        let mut fb = FrameBuffer::new(SurfaceSize::new(32, 32));
        cursor.draw(&mut fb.renderer(), palette);
        assert!(!cursor.is_visible());

        cursor.update(Some((4, 4)));
        cursor.set_system_preferred(true);
        cursor.draw(&mut fb.renderer(), palette);
        assert!(!cursor.is_visible());
        assert_eq!(fb.count_color([0, 0, 0, 0]), 32 * 32);
    }

    #[test]
    fn cursor_near_the_corner_clips_without_panicking() {
        let mut cursor = PixelCursor::new(3);
        cursor.set_kind(CursorKind::Crosshair);
        cursor.update(Some((0, 0)));
        let mut fb = FrameBuffer::new(SurfaceSize::new(8, 8));
        cursor.draw(&mut fb.renderer(), &PALETTES[0]);
        assert_eq!(fb.pixel(0, 0), Some(PALETTES[0].cursor_fill));
    }
}
