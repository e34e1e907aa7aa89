//! Hover tooltips: delayed show, word wrapping, and on-screen placement.

use std::time::Duration;

use engine::graphics::{Renderer2d, glyph_advance_x, line_advance_y, text_width};
use engine::ui::{Insets, Rect};

use crate::config::UiConfig;
use crate::palette::Palette;

const CURSOR_OFFSET_X: u32 = 16;
const CURSOR_OFFSET_Y: u32 = 20;
const PAD: u32 = 8;
const SECTION_GAP: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooltipCost {
    pub amount: u32,
    pub affordable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipContent {
    pub title: String,
    pub body: String,
    pub cost: Option<TooltipCost>,
}

impl TooltipContent {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            cost: None,
        }
    }

    pub fn with_cost(mut self, amount: u32, affordable: bool) -> Self {
        self.cost = Some(TooltipCost { amount, affordable });
        self
    }
}

/// Greedy word wrap to at most `max_chars` per line; words longer than a line are split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_len = 0usize;
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if line_len > 0 {
                    lines.push(std::mem::take(&mut line));
                    line_len = 0;
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let needed = if line_len == 0 { word.len() } else { line_len + 1 + word.len() };
            if needed > max_chars {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }
            if line_len > 0 {
                line.push(' ');
                line_len += 1;
            }
            line.extend(word.iter());
            line_len += word.len();
        }
        if line_len > 0 || paragraph.trim().is_empty() {
            lines.push(line);
        }
    }
    lines
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipLayout {
    pub rect: Rect,
    pub body_lines: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Tooltip {
    content: Option<TooltipContent>,
    pointer: (u32, u32),
    hover: Duration,
    delay: Duration,
    max_width: u32,
    scale: u32,
}

impl Tooltip {
    pub fn new(config: &UiConfig) -> Self {
        Self {
            content: None,
            pointer: (0, 0),
            hover: Duration::ZERO,
            delay: Duration::from_secs_f32(config.tooltip_delay_s.max(0.0)),
            max_width: config.tooltip_max_width,
            scale: config.text_scale,
        }
    }

    /// Requests `content` at `at`. Re-showing the same content keeps the running delay.
    pub fn show(&mut self, content: TooltipContent, at: (u32, u32)) {
        if self.content.as_ref() != Some(&content) {
            self.hover = Duration::ZERO;
            self.content = Some(content);
        }
        self.pointer = at;
    }

    pub fn hide(&mut self) {
        self.content = None;
        self.hover = Duration::ZERO;
    }

    /// Tracks the pointer and advances the hover delay. Leaving the window hides the tooltip.
    pub fn update(&mut self, mouse: Option<(u32, u32)>, dt: Duration) {
        let Some(pos) = mouse else {
            self.hide();
            return;
        };
        self.pointer = pos;
        if self.content.is_some() {
            self.hover = self.hover.saturating_add(dt);
        }
    }

    pub fn content(&self) -> Option<&TooltipContent> {
        self.content.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.content.is_some() && self.hover >= self.delay
    }

    pub fn layout(&self, screen: Rect) -> Option<TooltipLayout> {
        if !self.is_visible() {
            return None;
        }
        let content = self.content.as_ref()?;
        let scale = self.scale;
        let adv = glyph_advance_x(scale);
        let line_h = line_advance_y(scale);

        let inner_max = self.max_width.min(screen.w).saturating_sub(PAD * 2);
        let max_chars = ((inner_max + scale) / adv).max(1) as usize;
        let body_lines = if content.body.is_empty() {
            Vec::new()
        } else {
            wrap_text(&content.body, max_chars)
        };

        let mut inner_w = text_width(&content.title, scale);
        for line in &body_lines {
            inner_w = inner_w.max(text_width(line, scale));
        }
        let cost_line = content.cost.map(cost_label);
        if let Some(label) = &cost_line {
            inner_w = inner_w.max(text_width(label, scale));
        }

        let mut inner_h = line_h;
        if !body_lines.is_empty() {
            inner_h += SECTION_GAP + line_h * body_lines.len() as u32;
        }
        if cost_line.is_some() {
            inner_h += SECTION_GAP + line_h;
        }

        let w = inner_w.saturating_add(PAD * 2);
        let h = inner_h.saturating_add(PAD * 2);
        let (px, py) = self.pointer;

        let mut x = px.saturating_add(CURSOR_OFFSET_X);
        if x.saturating_add(w) > screen.right() {
            x = px.saturating_sub(CURSOR_OFFSET_X / 2).saturating_sub(w);
        }
        let mut y = py.saturating_add(CURSOR_OFFSET_Y);
        if y.saturating_add(h) > screen.bottom() {
            y = py.saturating_sub(CURSOR_OFFSET_Y / 2).saturating_sub(h);
        }

        let rect = Rect::new(x, y, w, h).clamp_inside(screen);
        Some(TooltipLayout { rect, body_lines })
    }

    pub fn draw(&self, r: &mut dyn Renderer2d, palette: &Palette) -> Option<TooltipLayout> {
        let s = r.size();
        let layout = self.layout(Rect::from_size(s.width, s.height))?;
        let content = self.content.as_ref()?;
        let scale = self.scale;
        let line_h = line_advance_y(scale);

        r.fill_rect(layout.rect, palette.panel_alt);
        r.rect_outline(layout.rect, palette.accent);

        let inner = layout.rect.inset(Insets::all(PAD));
        let mut y = inner.y;
        r.draw_text_scaled(inner.x, y, &content.title, palette.highlight, scale);
        y = y.saturating_add(line_h);

        if !layout.body_lines.is_empty() {
            y = y.saturating_add(SECTION_GAP);
            for line in &layout.body_lines {
                r.draw_text_scaled(inner.x, y, line, palette.text, scale);
                y = y.saturating_add(line_h);
            }
        }

        if let Some(cost) = content.cost {
            y = y.saturating_add(SECTION_GAP);
            let color = if cost.affordable { palette.gold } else { palette.danger };
            r.draw_text_scaled(inner.x, y, &cost_label(cost), color, scale);
        }
        Some(layout)
    }
}

fn cost_label(cost: TooltipCost) -> String {
    if cost.affordable {
        format!("COST {}", cost.amount)
    } else {
        format!("COST {} - NOT ENOUGH", cost.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tooltip() -> Tooltip {
        Tooltip::new(&UiConfig {
            tooltip_delay_s: 0.5,
            tooltip_max_width: 200,
            text_scale: 2,
            ..UiConfig::default()
        })
    }

    #[test]
    fn wrap_text_breaks_on_words_and_splits_long_words() {
        assert_eq!(wrap_text("ONE TWO THREE", 7), vec!["ONE TWO", "THREE"]);
        assert_eq!(wrap_text("ABCDEFGHIJ", 4), vec!["ABCD", "EFGH", "IJ"]);
        assert_eq!(wrap_text("A\nB", 10), vec!["A", "B"]);
    }

    #[test]
    fn tooltip_waits_for_the_hover_delay() {
        let mut tip = tooltip();
        tip.show(TooltipContent::new("ARROW", "FAST"), (10, 10));
        tip.update(Some((10, 10)), Duration::from_millis(300));
        assert!(!tip.is_visible());
        tip.show(TooltipContent::new("ARROW", "FAST"), (11, 10));
        tip.update(Some((11, 10)), Duration::from_millis(300));
        assert!(tip.is_visible());
    }

    #[test]
    fn new_content_restarts_the_delay() {
        let mut tip = tooltip();
        tip.show(TooltipContent::new("A", ""), (0, 0));
        tip.update(Some((0, 0)), Duration::from_secs(1));
        assert!(tip.is_visible());
        tip.show(TooltipContent::new("B", ""), (0, 0));
        assert!(!tip.is_visible());
    }

    #[test]
    fn leaving_the_window_hides() {
        let mut tip = tooltip();
        tip.show(TooltipContent::new("A", ""), (0, 0));
        tip.update(None, Duration::from_secs(1));
        assert!(tip.content().is_none());
    }

    #[test]
    fn layout_flips_left_and_up_near_the_bottom_right_corner() {
        let mut tip = tooltip();
        let screen = Rect::from_size(400, 300);
        tip.show(TooltipContent::new("TITLE", "SOME BODY TEXT"), (390, 290));
        tip.update(Some((390, 290)), Duration::from_secs(1));
        let layout = tip.layout(screen).expect("visible");
        assert!(layout.rect.right() <= 390);
        assert!(layout.rect.bottom() <= 290);
    }

    #[test]
    fn layout_wraps_body_to_max_width_and_stays_on_screen() {
        let mut tip = tooltip();
        let screen = Rect::from_size(640, 480);
        tip.show(
            TooltipContent::new("T", "A LONG DESCRIPTION THAT NEEDS SEVERAL LINES TO FIT").with_cost(50, false),
            (100, 100),
        );
        tip.update(Some((100, 100)), Duration::from_secs(1));
        let layout = tip.layout(screen).expect("visible");
        assert!(layout.body_lines.len() > 1);
        assert!(layout.rect.w <= 200);
        assert_eq!(layout.rect, layout.rect.clamp_inside(screen));
    }
}
