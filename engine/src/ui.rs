//! Minimal UI layout primitives.
//!
//! `Rect` and `Circle` are the two hit shapes every control uses; the remaining helpers cover the
//! common layout tasks of screen-space UI (padding, anchored placement, row splitting and keeping
//! floating boxes on screen).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub const fn from_size(w: u32, h: u32) -> Self {
        Self { x: 0, y: 0, w, h }
    }

    pub fn size(&self) -> Size {
        Size {
            w: self.w,
            h: self.h,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.w)
    }

    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }

    pub fn center(&self) -> (u32, u32) {
        (self.x.saturating_add(self.w / 2), self.y.saturating_add(self.h / 2))
    }

    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Returns the rectangle inset by `insets` (i.e. the inner content area).
    ///
    /// If insets exceed the rect size, the resulting width/height will saturate to 0.
    pub fn inset(&self, insets: Insets) -> Self {
        let w = self
            .w
            .saturating_sub(insets.left.saturating_add(insets.right));
        let h = self
            .h
            .saturating_sub(insets.top.saturating_add(insets.bottom));
        Self {
            x: self.x.saturating_add(insets.left),
            y: self.y.saturating_add(insets.top),
            w,
            h,
        }
    }

    /// Places a child of `size` inside this rect using the requested `anchor`.
    ///
    /// If `size` exceeds this rect, it is clamped to fit.
    pub fn place(&self, size: Size, anchor: Anchor) -> Self {
        let w = size.w.min(self.w);
        let h = size.h.min(self.h);
        let free_w = self.w.saturating_sub(w);
        let free_h = self.h.saturating_sub(h);

        let x = match anchor {
            Anchor::TopLeft | Anchor::CenterLeft | Anchor::BottomLeft => self.x,
            Anchor::TopCenter | Anchor::Center | Anchor::BottomCenter => {
                self.x.saturating_add(free_w / 2)
            }
            Anchor::TopRight | Anchor::CenterRight | Anchor::BottomRight => {
                self.x.saturating_add(free_w)
            }
        };

        let y = match anchor {
            Anchor::TopLeft | Anchor::TopCenter | Anchor::TopRight => self.y,
            Anchor::CenterLeft | Anchor::Center | Anchor::CenterRight => {
                self.y.saturating_add(free_h / 2)
            }
            Anchor::BottomLeft | Anchor::BottomCenter | Anchor::BottomRight => {
                self.y.saturating_add(free_h)
            }
        };

        Self { x, y, w, h }
    }

    /// Moves the rect by a signed offset, saturating at the origin.
    pub fn translate(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: offset_u32(self.x, dx),
            y: offset_u32(self.y, dy),
            w: self.w,
            h: self.h,
        }
    }

    /// Shifts the rect so it lies within `bounds`, shrinking it only when it is larger.
    pub fn clamp_inside(&self, bounds: Rect) -> Self {
        let w = self.w.min(bounds.w);
        let h = self.h.min(bounds.h);
        let max_x = bounds.right().saturating_sub(w);
        let max_y = bounds.bottom().saturating_sub(h);
        Self {
            x: self.x.clamp(bounds.x, max_x.max(bounds.x)),
            y: self.y.clamp(bounds.y, max_y.max(bounds.y)),
            w,
            h,
        }
    }

    /// Splits the rect into `count` stacked rows of `row_h` separated by `gap`, starting at the top.
    ///
    /// Rows that would not fit are dropped.
    pub fn split_rows(&self, count: usize, row_h: u32, gap: u32) -> Vec<Rect> {
        let mut rows = Vec::with_capacity(count);
        let mut y = self.y;
        for _ in 0..count {
            if y.saturating_add(row_h) > self.bottom() {
                break;
            }
            rows.push(Rect::new(self.x, y, self.w, row_h));
            y = y.saturating_add(row_h).saturating_add(gap);
        }
        rows
    }
}

fn offset_u32(v: u32, d: i32) -> u32 {
    if d >= 0 {
        v.saturating_add(d as u32)
    } else {
        v.saturating_sub(d.unsigned_abs())
    }
}

/// Circle in screen pixels, used for round buttons and radial hit areas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circle {
    pub cx: u32,
    pub cy: u32,
    pub r: u32,
}

impl Circle {
    pub const fn new(cx: u32, cy: u32, r: u32) -> Self {
        Self { cx, cy, r }
    }

    pub fn contains(&self, px: u32, py: u32) -> bool {
        let dx = px as i64 - self.cx as i64;
        let dy = py as i64 - self.cy as i64;
        let r = self.r as i64;
        dx * dx + dy * dy <= r * r
    }

    pub fn bounds(&self) -> Rect {
        let d = self.r.saturating_mul(2).saturating_add(1);
        Rect::new(self.cx.saturating_sub(self.r), self.cy.saturating_sub(self.r), d, d)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    pub const fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    pub fn clamp_max(self, max: Size) -> Self {
        Self {
            w: self.w.min(max.w),
            h: self.h.min(max.h),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Insets {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Insets {
    pub const ZERO: Insets = Insets {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    pub const fn all(v: u32) -> Self {
        Self {
            left: v,
            top: v,
            right: v,
            bottom: v,
        }
    }

    pub const fn symmetric(horizontal: u32, vertical: u32) -> Self {
        Self {
            left: horizontal,
            top: vertical,
            right: horizontal,
            bottom: vertical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inset_shrinks_rect_and_moves_origin() {
        let r = Rect::from_size(100, 80);
        let inner = r.inset(Insets::all(10));
        assert_eq!(inner, Rect::new(10, 10, 80, 60));
    }

    #[test]
    fn place_center_positions_child_in_parent() {
        let parent = Rect::from_size(100, 100);
        let child = parent.place(Size::new(20, 10), Anchor::Center);
        assert_eq!(child, Rect::new(40, 45, 20, 10));
    }

    #[test]
    fn place_clamps_size_to_parent() {
        let parent = Rect::from_size(50, 40);
        let child = parent.place(Size::new(999, 999), Anchor::BottomRight);
        assert_eq!(child, Rect::new(0, 0, 50, 40));
    }

    #[test]
    fn clamp_inside_pulls_overflowing_box_back_on_screen() {
        let screen = Rect::from_size(200, 100);
        let tip = Rect::new(180, 90, 60, 30).clamp_inside(screen);
        assert_eq!(tip, Rect::new(140, 70, 60, 30));
    }

    #[test]
    fn clamp_inside_shrinks_box_larger_than_bounds() {
        let screen = Rect::from_size(40, 30);
        let tip = Rect::new(5, 5, 60, 60).clamp_inside(screen);
        assert_eq!(tip, Rect::new(0, 0, 40, 30));
    }

    #[test]
    fn translate_saturates_at_origin() {
        assert_eq!(Rect::new(5, 5, 1, 1).translate(-10, 3), Rect::new(0, 8, 1, 1));
    }

    #[test]
    fn split_rows_drops_rows_that_do_not_fit() {
        let rows = Rect::new(0, 0, 10, 50).split_rows(5, 20, 5);
        assert_eq!(rows, vec![Rect::new(0, 0, 10, 20), Rect::new(0, 25, 10, 20)]);
    }

    #[test]
    fn circle_contains_edge_but_not_corner() {
        let c = Circle::new(10, 10, 5);
        assert!(c.contains(15, 10));
        assert!(c.contains(10, 5));
        assert!(!c.contains(15, 15));
    }
}
