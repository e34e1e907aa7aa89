use crate::ui::Rect;

/// Horizontal slider: geometry, value mapping and drag state.
///
/// Rendering stays in callers; this type turns pointer positions into values in `[min, max]`,
/// snapped to `step` when one is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slider {
    pub track: Rect,
    pub min: f32,
    pub max: f32,
    pub step: Option<f32>,
    value: f32,
    dragging: bool,
}

impl Slider {
    pub fn new(track: Rect, min: f32, max: f32, value: f32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            track,
            min,
            max,
            step: None,
            value: value.clamp(min, max),
            dragging: false,
        }
    }

    pub fn with_step(mut self, step: f32) -> Self {
        self.step = (step > 0.0).then_some(step);
        self.value = self.snap(self.value);
        self
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn set_value(&mut self, value: f32) {
        self.value = self.snap(value);
    }

    fn snap(&self, value: f32) -> f32 {
        let value = value.clamp(self.min, self.max);
        match self.step {
            Some(step) => {
                let steps = ((value - self.min) / step).round();
                (self.min + steps * step).clamp(self.min, self.max)
            }
            None => value,
        }
    }

    pub fn normalized_value(&self) -> f32 {
        let span = self.max - self.min;
        if self.track.w == 0 || span.abs() <= f32::EPSILON {
            0.0
        } else {
            ((self.value - self.min) / span).clamp(0.0, 1.0)
        }
    }

    pub fn value_from_x(&self, x: u32) -> f32 {
        if self.track.w <= 1 {
            return self.min;
        }
        let last = self.track.w - 1;
        let local = x.clamp(self.track.x, self.track.x + last) - self.track.x;
        let t = local as f32 / last as f32;
        self.snap(self.min + (self.max - self.min) * t)
    }

    pub fn set_value_from_x(&mut self, x: u32) {
        self.value = self.value_from_x(x);
    }

    /// Starts a drag when the press lands on the track or thumb. Returns whether it did.
    pub fn begin_drag(&mut self, x: u32, y: u32, thumb_h: u32) -> bool {
        let grab = self.thumb_rect(thumb_h.max(1), thumb_h);
        let hit_band = Rect::new(
            self.track.x,
            grab.y.min(self.track.y),
            self.track.w,
            grab.h.max(self.track.h),
        );
        if !hit_band.contains(x, y) {
            return false;
        }
        self.dragging = true;
        self.set_value_from_x(x);
        true
    }

    /// Follows the pointer while dragging. Returns `true` if the value changed.
    pub fn drag_to(&mut self, x: u32) -> bool {
        if !self.dragging {
            return false;
        }
        let before = self.value;
        self.set_value_from_x(x);
        (self.value - before).abs() > f32::EPSILON
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    pub fn thumb_center_x(&self) -> u32 {
        if self.track.w == 0 {
            return self.track.x;
        }
        let t = self.normalized_value();
        self.track.x + ((self.track.w - 1) as f32 * t).round() as u32
    }

    pub fn thumb_rect(&self, thumb_w: u32, thumb_h: u32) -> Rect {
        let thumb_w = thumb_w.max(1).min(self.track.w.max(1));
        let thumb_h = thumb_h.max(1);
        let x = self
            .thumb_center_x()
            .saturating_sub(thumb_w / 2)
            .clamp(self.track.x, self.track.right().saturating_sub(thumb_w).max(self.track.x));
        let y = if thumb_h > self.track.h {
            self.track.y.saturating_sub((thumb_h - self.track.h) / 2)
        } else {
            self.track.y + (self.track.h - thumb_h) / 2
        };
        Rect::new(x, y, thumb_w, thumb_h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_from_x_clamps_to_range() {
        let slider = Slider::new(Rect::new(10, 20, 100, 8), 0.0, 1.0, 0.5);
        assert!((slider.value_from_x(0) - 0.0).abs() < 1e-6);
        assert!((slider.value_from_x(999) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn step_snaps_values_to_grid() {
        let slider = Slider::new(Rect::new(0, 0, 101, 8), 0.0, 1.0, 0.33).with_step(0.25);
        assert!((slider.value() - 0.25).abs() < 1e-6);
        assert!((slider.value_from_x(40) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn drag_only_follows_pointer_after_grab() {
        let mut slider = Slider::new(Rect::new(100, 50, 101, 6), 0.0, 1.0, 0.0);
        assert!(!slider.drag_to(200));
        assert!(!slider.begin_drag(100, 10, 14));
        assert!(slider.begin_drag(150, 52, 14));
        assert!((slider.value() - 0.5).abs() < 0.01);
        assert!(slider.drag_to(200));
        assert!((slider.value() - 1.0).abs() < 1e-6);
        slider.end_drag();
        assert!(!slider.drag_to(100));
    }

    #[test]
    fn thumb_rect_stays_on_track() {
        let mut slider = Slider::new(Rect::new(0, 0, 100, 6), 0.0, 1.0, 0.0);
        let left = slider.thumb_rect(10, 14);
        slider.set_value(1.0);
        let right = slider.thumb_rect(10, 14);
        assert_eq!(left.x, 0);
        assert_eq!(right.x, 90);
    }
}
