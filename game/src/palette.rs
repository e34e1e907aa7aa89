//! Fixed palette table and the current style selection.

use engine::graphics::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub name: &'static str,
    pub background: Color,
    pub panel: Color,
    pub panel_alt: Color,
    pub border: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub gold: Color,
    pub lives: Color,
    pub danger: Color,
    pub ok: Color,
    pub highlight: Color,
    pub dim: Color,
    pub cursor_fill: Color,
    pub cursor_outline: Color,
}

pub const PALETTES: [Palette; 4] = [
    Palette {
        name: "DUSK",
        background: [14, 14, 22, 255],
        panel: [22, 22, 34, 255],
        panel_alt: [30, 30, 46, 255],
        border: [58, 58, 84, 255],
        text: [235, 235, 245, 255],
        muted: [140, 140, 160, 255],
        accent: [110, 170, 255, 255],
        gold: [255, 204, 64, 255],
        lives: [235, 80, 96, 255],
        danger: [220, 60, 60, 255],
        ok: [96, 210, 120, 255],
        highlight: [255, 240, 170, 255],
        dim: [0, 0, 0, 255],
        cursor_fill: [245, 245, 250, 255],
        cursor_outline: [10, 10, 14, 255],
    },
    Palette {
        name: "MOSS",
        background: [16, 22, 16, 255],
        panel: [24, 34, 24, 255],
        panel_alt: [32, 46, 30, 255],
        border: [70, 96, 62, 255],
        text: [230, 240, 220, 255],
        muted: [140, 160, 128, 255],
        accent: [150, 220, 110, 255],
        gold: [240, 200, 80, 255],
        lives: [230, 100, 90, 255],
        danger: [210, 70, 50, 255],
        ok: [120, 230, 120, 255],
        highlight: [250, 250, 190, 255],
        dim: [4, 8, 4, 255],
        cursor_fill: [236, 244, 224, 255],
        cursor_outline: [12, 20, 10, 255],
    },
    Palette {
        name: "EMBER",
        background: [24, 12, 10, 255],
        panel: [38, 20, 16, 255],
        panel_alt: [52, 28, 20, 255],
        border: [110, 58, 40, 255],
        text: [250, 232, 214, 255],
        muted: [170, 130, 110, 255],
        accent: [255, 140, 60, 255],
        gold: [255, 210, 90, 255],
        lives: [255, 90, 90, 255],
        danger: [240, 60, 40, 255],
        ok: [170, 220, 100, 255],
        highlight: [255, 236, 180, 255],
        dim: [8, 2, 0, 255],
        cursor_fill: [255, 240, 220, 255],
        cursor_outline: [30, 10, 6, 255],
    },
    Palette {
        name: "CONTRAST",
        background: [0, 0, 0, 255],
        panel: [12, 12, 12, 255],
        panel_alt: [28, 28, 28, 255],
        border: [255, 255, 255, 255],
        text: [255, 255, 255, 255],
        muted: [200, 200, 200, 255],
        accent: [0, 220, 255, 255],
        gold: [255, 230, 0, 255],
        lives: [255, 60, 120, 255],
        danger: [255, 40, 40, 255],
        ok: [0, 255, 100, 255],
        highlight: [255, 255, 0, 255],
        dim: [0, 0, 0, 255],
        cursor_fill: [255, 255, 255, 255],
        cursor_outline: [0, 0, 0, 255],
    },
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleSelection {
    index: usize,
}

impl StyleSelection {
    pub fn new(index: usize) -> Self {
        Self {
            index: index % PALETTES.len(),
        }
    }

    pub fn index(self) -> usize {
        self.index
    }

    pub fn palette(self) -> &'static Palette {
        &PALETTES[self.index % PALETTES.len()]
    }

    pub fn set(&mut self, index: usize) {
        self.index = index % PALETTES.len();
    }

    /// Advances to the next palette, wrapping around. Returns the new index.
    pub fn cycle(&mut self) -> usize {
        self.index = (self.index + 1) % PALETTES.len();
        self.index
    }
}
