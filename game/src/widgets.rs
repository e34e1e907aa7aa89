//! Drawing helpers shared by the screens: buttons, panels, centered text and bars.

use engine::controls::{Control, ControlSet};
use engine::graphics::{Color, Renderer2d, text_height, text_width};
use engine::ui::Rect;

use crate::palette::Palette;

pub const BUTTON_HOVER_BRIGHTEN: f32 = 0.12;
pub const BUTTON_PRESS_BRIGHTEN: f32 = 0.22;
pub const DIM_ALPHA: u8 = 170;
pub const DISABLED_TEXT_ALPHA: f32 = 0.45;

pub fn brighten_color(mut c: Color, amount: f32) -> Color {
    let t = amount.clamp(0.0, 1.0);
    for v in c.iter_mut().take(3) {
        let f = *v as f32;
        *v = (f + (255.0 - f) * t).round().clamp(0.0, 255.0) as u8;
    }
    c
}

/// Linear blend from `a` (t = 0) to `b` (t = 1).
pub fn mix_color(a: Color, b: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let mut out = a;
    for i in 0..3 {
        out[i] = (a[i] as f32 + (b[i] as f32 - a[i] as f32) * t).round() as u8;
    }
    out[3] = 255;
    out
}

/// Clips a rect given in signed screen coordinates to the non-negative quadrant.
pub fn clip_signed(x: i32, y: i32, w: u32, h: u32) -> Option<Rect> {
    let x1 = x.saturating_add(w.min(i32::MAX as u32) as i32);
    let y1 = y.saturating_add(h.min(i32::MAX as u32) as i32);
    let x0 = x.max(0);
    let y0 = y.max(0);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(Rect::new(
        x0 as u32,
        y0 as u32,
        (x1 - x0) as u32,
        (y1 - y0) as u32,
    ))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonVisual {
    pub hovered: bool,
    pub pressed: bool,
    pub enabled: bool,
    pub selected: bool,
}

impl ButtonVisual {
    pub fn of<A>(set: &ControlSet<A>, control: &Control<A>) -> Self {
        Self {
            hovered: set.is_hovered(control.id),
            pressed: set.is_pressed(control.id),
            enabled: control.enabled,
            selected: control.selected,
        }
    }
}

pub fn button_colors(palette: &Palette, visual: ButtonVisual) -> (Color, Color) {
    let (mut fill, mut border) = (palette.panel, palette.border);
    if visual.selected {
        border = palette.accent;
    }
    if !visual.enabled {
        return (palette.panel, mix_color(palette.border, palette.panel, 0.5));
    }
    if visual.pressed {
        fill = brighten_color(fill, BUTTON_PRESS_BRIGHTEN);
        border = brighten_color(border, BUTTON_PRESS_BRIGHTEN);
    } else if visual.hovered {
        fill = brighten_color(fill, BUTTON_HOVER_BRIGHTEN);
        border = brighten_color(border, BUTTON_HOVER_BRIGHTEN);
    }
    (fill, border)
}

pub fn text_color(palette: &Palette, enabled: bool) -> Color {
    if enabled {
        palette.text
    } else {
        mix_color(palette.panel, palette.muted, DISABLED_TEXT_ALPHA)
    }
}

pub fn draw_button(
    r: &mut dyn Renderer2d,
    rect: Rect,
    label: &str,
    palette: &Palette,
    visual: ButtonVisual,
    scale: u32,
) {
    let (fill, border) = button_colors(palette, visual);
    r.fill_rect(rect, fill);
    r.rect_outline(rect, border);
    draw_text_centered(r, rect, label, text_color(palette, visual.enabled), scale);
}

/// Button with the label flush left, for list rows.
pub fn draw_list_button(
    r: &mut dyn Renderer2d,
    rect: Rect,
    label: &str,
    palette: &Palette,
    visual: ButtonVisual,
    scale: u32,
) {
    let (fill, border) = button_colors(palette, visual);
    r.fill_rect(rect, fill);
    r.rect_outline(rect, border);
    let ty = rect
        .y
        .saturating_add(rect.h / 2)
        .saturating_sub(text_height(scale) / 2);
    r.draw_text_scaled(
        rect.x.saturating_add(8),
        ty,
        label,
        text_color(palette, visual.enabled),
        scale,
    );
}

pub fn draw_panel(r: &mut dyn Renderer2d, rect: Rect, palette: &Palette) {
    r.fill_rect(rect, palette.panel);
    r.rect_outline(rect, palette.border);
}

/// Darkens everything drawn so far.
pub fn dim_screen(r: &mut dyn Renderer2d, palette: &Palette) {
    let s = r.size();
    r.blend_rect(Rect::from_size(s.width, s.height), palette.dim, DIM_ALPHA);
}

pub fn draw_text_centered(r: &mut dyn Renderer2d, rect: Rect, text: &str, color: Color, scale: u32) {
    let tw = text_width(text, scale);
    let th = text_height(scale);
    let x = rect.x.saturating_add(rect.w.saturating_sub(tw) / 2);
    let y = rect.y.saturating_add(rect.h.saturating_sub(th) / 2);
    r.draw_text_scaled(x, y, text, color, scale);
}

/// Horizontal bar filled to `t` in `[0, 1]`.
pub fn draw_progress_bar(r: &mut dyn Renderer2d, rect: Rect, t: f32, fill: Color, palette: &Palette) {
    r.fill_rect(rect, palette.panel_alt);
    let inner = Rect::new(
        rect.x.saturating_add(1),
        rect.y.saturating_add(1),
        rect.w.saturating_sub(2),
        rect.h.saturating_sub(2),
    );
    let filled = (inner.w as f32 * t.clamp(0.0, 1.0)).round() as u32;
    if filled > 0 {
        r.fill_rect(Rect::new(inner.x, inner.y, filled, inner.h), fill);
    }
    r.rect_outline(rect, palette.border);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brighten_moves_towards_white() {
        assert_eq!(brighten_color([0, 100, 255, 7], 0.5), [128, 178, 255, 7]);
    }

    #[test]
    fn clip_signed_drops_offscreen_part() {
        assert_eq!(clip_signed(-4, 2, 10, 3), Some(Rect::new(0, 2, 6, 3)));
        assert_eq!(clip_signed(-20, 0, 10, 3), None);
    }

    #[test]
    fn disabled_buttons_ignore_hover() {
        let palette = &crate::palette::PALETTES[0];
        let disabled = ButtonVisual {
            hovered: true,
            ..ButtonVisual::default()
        };
        let (fill, _) = button_colors(palette, disabled);
        assert_eq!(fill, palette.panel);
    }
}
