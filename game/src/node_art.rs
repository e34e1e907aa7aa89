//! Procedural pixel-art icons for skill-tree nodes.
//!
//! Each node kind has an 8x8 one-bit bitmap. Icons are drawn cell by cell as filled squares at
//! the current zoom, inside a framed tile whose colors follow the node state.

use engine::graphics::{Color, Renderer2d};

use crate::palette::Palette;
use crate::skilltree::{NodeKind, NodeState};
use crate::widgets::{brighten_color, clip_signed, mix_color};

pub const ART_CELLS: u32 = 8;
/// Tile edge length in art cells: the icon plus a one-cell margin each side.
const TILE_CELLS: u32 = ART_CELLS + 2;
const GLOW_ALPHA: u8 = 90;

pub fn bitmap(kind: NodeKind) -> [u8; 8] {
    match kind {
        // Keep tower.
        NodeKind::Root => [
            0b10100101, 0b11111111, 0b01111110, 0b01100110, 0b01100110, 0b01111110, 0b01111110,
            0b11111111,
        ],
        // Sword.
        NodeKind::Offense => [
            0b00000011, 0b00000111, 0b00001110, 0b00011100, 0b11111000, 0b01110000, 0b01101000,
            0b10000100,
        ],
        // Shield.
        NodeKind::Defense => [
            0b11111111, 0b10011001, 0b10011001, 0b11111111, 0b10011001, 0b01011010, 0b00111100,
            0b00011000,
        ],
        // Coin.
        NodeKind::Economy => [
            0b00111100, 0b01111110, 0b11100111, 0b11011111, 0b11011111, 0b11100111, 0b01111110,
            0b00111100,
        ],
        // Gear.
        NodeKind::Utility => [
            0b00011000, 0b01111110, 0b01100110, 0b11000011, 0b11000011, 0b01100110, 0b01111110,
            0b00011000,
        ],
        // Star.
        NodeKind::Keystone => [
            0b00011000, 0b00011000, 0b11111111, 0b01111110, 0b00111100, 0b01111110, 0b01100110,
            0b11000011,
        ],
    }
}

pub fn kind_color(kind: NodeKind, palette: &Palette) -> Color {
    match kind {
        NodeKind::Root => palette.highlight,
        NodeKind::Offense => palette.danger,
        NodeKind::Defense => palette.accent,
        NodeKind::Economy => palette.gold,
        NodeKind::Utility => palette.ok,
        NodeKind::Keystone => palette.lives,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeColors {
    pub fill: Color,
    pub frame: Color,
    pub ink: Color,
}

pub fn node_colors(kind: NodeKind, state: NodeState, palette: &Palette, hovered: bool) -> NodeColors {
    let base = kind_color(kind, palette);
    let mut colors = match state {
        NodeState::Allocated => NodeColors {
            fill: mix_color(palette.panel, base, 0.35),
            frame: base,
            ink: brighten_color(base, 0.3),
        },
        NodeState::Available => NodeColors {
            fill: palette.panel_alt,
            frame: mix_color(palette.border, base, 0.5),
            ink: base,
        },
        NodeState::Locked => NodeColors {
            fill: palette.panel,
            frame: palette.border,
            ink: mix_color(palette.panel, palette.muted, 0.5),
        },
    };
    if hovered {
        colors.frame = brighten_color(colors.frame, 0.35);
        colors.fill = brighten_color(colors.fill, 0.08);
    }
    colors
}

/// Screen pixels per art cell for a tile of `size_px`.
pub fn cell_px(size_px: u32) -> u32 {
    (size_px / TILE_CELLS).max(1)
}

/// Draws a node tile centered at `center`. `size_px` is the tile edge length at current zoom.
pub fn draw_node(
    r: &mut dyn Renderer2d,
    center: (i32, i32),
    size_px: u32,
    kind: NodeKind,
    state: NodeState,
    palette: &Palette,
    hovered: bool,
) {
    let cell = cell_px(size_px);
    let tile = cell * TILE_CELLS;
    let half = (tile / 2) as i32;
    let x0 = center.0 - half;
    let y0 = center.1 - half;
    let colors = node_colors(kind, state, palette, hovered);

    if state == NodeState::Allocated {
        let glow = cell as i32 * 2;
        if let Some(rect) = clip_signed(
            x0 - glow,
            y0 - glow,
            tile + glow as u32 * 2,
            tile + glow as u32 * 2,
        ) {
            r.blend_rect(rect, colors.frame, GLOW_ALPHA);
        }
    }

    if let Some(rect) = clip_signed(x0, y0, tile, tile) {
        r.fill_rect(rect, colors.fill);
    }

    let rows = bitmap(kind);
    for (row, bits) in rows.iter().enumerate() {
        for col in 0..ART_CELLS {
            if bits & (0x80 >> col) == 0 {
                continue;
            }
            let px = x0 + ((col + 1) * cell) as i32;
            let py = y0 + ((row as u32 + 1) * cell) as i32;
            if let Some(rect) = clip_signed(px, py, cell, cell) {
                r.fill_rect(rect, colors.ink);
            }
        }
    }

    // Frame border; one art cell thick once the tile is large enough.
    let border = if cell >= 3 { cell / 2 } else { 1 };
    for (x, y, w, h) in [
        (x0, y0, tile, border),
        (x0, y0 + (tile - border) as i32, tile, border),
        (x0, y0, border, tile),
        (x0 + (tile - border) as i32, y0, border, tile),
    ] {
        if let Some(rect) = clip_signed(x, y, w, h) {
            r.fill_rect(rect, colors.frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use engine::surface::{FrameBuffer, SurfaceSize};

    use super::*;
    use crate::palette::PALETTES;

    const KINDS: [NodeKind; 6] = [
        NodeKind::Root,
        NodeKind::Offense,
        NodeKind::Defense,
        NodeKind::Economy,
        NodeKind::Utility,
        NodeKind::Keystone,
    ];

    #[test]
    fn every_kind_has_a_distinct_non_empty_bitmap() {
        for (i, a) in KINDS.iter().enumerate() {
            assert!(bitmap(*a).iter().any(|row| *row != 0));
            for b in &KINDS[i + 1..] {
                assert_ne!(bitmap(*a), bitmap(*b));
            }
        }
    }

    #[test]
    fn icon_pixels_use_ink_color() {
        let palette = &PALETTES[0];
        let mut fb = FrameBuffer::new(SurfaceSize::new(64, 64));
        // 40px tile => 4px cells, tile spans [12, 52).
        draw_node(
            &mut fb.renderer(),
            (32, 32),
            40,
            NodeKind::Economy,
            NodeState::Available,
            palette,
            false,
        );
        let colors = node_colors(NodeKind::Economy, NodeState::Available, palette, false);
        // Economy row 0 is 0b00111100: column 2 is set, column 0 is not.
        assert_eq!(fb.pixel(12 + 3 * 4 + 1, 12 + 4 + 1), Some(colors.ink));
        assert_eq!(fb.pixel(12 + 4 + 1, 12 + 4 + 1), Some(colors.fill));
        assert_eq!(fb.pixel(12, 30), Some(colors.frame));
    }

    #[test]
    fn partially_offscreen_nodes_draw_clipped() {
        let mut fb = FrameBuffer::new(SurfaceSize::new(32, 32));
        draw_node(
            &mut fb.renderer(),
            (-5, 10),
            40,
            NodeKind::Root,
            NodeState::Allocated,
            &PALETTES[1],
            true,
        );
        assert_ne!(fb.pixel(0, 10), Some([0, 0, 0, 0]));
        assert_eq!(fb.pixel(31, 31), Some([0, 0, 0, 0]));
    }

    #[test]
    fn locked_nodes_are_not_colored_by_kind() {
        let palette = &PALETTES[0];
        let colors = node_colors(NodeKind::Offense, NodeState::Locked, palette, false);
        assert_ne!(colors.ink, kind_color(NodeKind::Offense, palette));
    }
}
