use std::time::Duration;

use engine::ui::Rect;

use crate::config::UiConfig;
use crate::skilltree::{SkillTreeWorldBounds, Vec2f};

pub const SKILLTREE_DRAG_THRESHOLD_PX: f32 = 4.0;
pub const SKILLTREE_WHEEL_ZOOM_STEP: f32 = 1.12;
/// Exponential approach rate of `zoom` towards `target_zoom`, per second.
pub const SKILLTREE_ZOOM_LERP_PER_S: f32 = 14.0;
pub const SKILLTREE_EDGE_PAN_MARGIN_PX: f32 = 28.0;
pub const SKILLTREE_EDGE_PAN_MAX_SPEED_PX_PER_S: f32 = 600.0;
/// Extra world units allowed past the outermost node centers.
pub const SKILLTREE_CAMERA_BOUNDS_PAD: f32 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragState {
    down: (u32, u32),
    last: (u32, u32),
    started: bool,
}

/// Keeps a world point pinned under a screen point while the zoom animates.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ZoomAnchor {
    screen: (f32, f32),
    world: Vec2f,
}

/// Pan/zoom state of the skill-tree view.
///
/// `pan` is the world point shown at the viewport center. `zoom` is screen pixels per world unit
/// and eases towards `target_zoom`.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillTreeCamera {
    pub pan: Vec2f,
    pub zoom: f32,
    pub target_zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    viewport: Rect,
    bounds: Option<SkillTreeWorldBounds>,
    drag: Option<DragState>,
    anchor: Option<ZoomAnchor>,
}

impl SkillTreeCamera {
    pub fn new(viewport: Rect, min_zoom: f32, max_zoom: f32) -> Self {
        let min_zoom = min_zoom.max(0.01);
        let max_zoom = max_zoom.max(min_zoom);
        let zoom = 1.0f32.clamp(min_zoom, max_zoom);
        Self {
            pan: Vec2f::default(),
            zoom,
            target_zoom: zoom,
            min_zoom,
            max_zoom,
            viewport,
            bounds: None,
            drag: None,
            anchor: None,
        }
    }

    pub fn from_config(config: &UiConfig, viewport: Rect) -> Self {
        Self::new(viewport, config.skilltree_min_zoom, config.skilltree_max_zoom)
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
        self.clamp_pan();
    }

    pub fn set_bounds(&mut self, bounds: Option<SkillTreeWorldBounds>) {
        self.bounds = bounds;
        self.clamp_pan();
    }

    fn center(&self) -> (f32, f32) {
        (
            self.viewport.x as f32 + self.viewport.w as f32 / 2.0,
            self.viewport.y as f32 + self.viewport.h as f32 / 2.0,
        )
    }

    pub fn world_to_screen(&self, world: Vec2f) -> (f32, f32) {
        let (cx, cy) = self.center();
        (
            cx + (world.x - self.pan.x) * self.zoom,
            cy + (world.y - self.pan.y) * self.zoom,
        )
    }

    pub fn screen_to_world(&self, sx: f32, sy: f32) -> Vec2f {
        let (cx, cy) = self.center();
        Vec2f::new(
            self.pan.x + (sx - cx) / self.zoom,
            self.pan.y + (sy - cy) / self.zoom,
        )
    }

    /// Centers the view on `world`.
    pub fn focus(&mut self, world: Vec2f) {
        self.pan = world;
        self.anchor = None;
        self.clamp_pan();
    }

    /// Arms a drag when the press lands inside the viewport.
    pub fn press(&mut self, x: u32, y: u32) {
        self.drag = self.viewport.contains(x, y).then_some(DragState {
            down: (x, y),
            last: (x, y),
            started: false,
        });
    }

    /// Follows the pointer while the button is held. Returns `true` once the press has turned
    /// into a pan.
    pub fn drag_to(&mut self, x: u32, y: u32) -> bool {
        let Some(mut drag) = self.drag else {
            return false;
        };

        if !drag.started {
            let tdx = x as f32 - drag.down.0 as f32;
            let tdy = y as f32 - drag.down.1 as f32;
            if tdx * tdx + tdy * tdy >= SKILLTREE_DRAG_THRESHOLD_PX * SKILLTREE_DRAG_THRESHOLD_PX {
                drag.started = true;
                // The threshold distance is applied too so the grab point stays under the pointer.
                drag.last = drag.down;
            }
        }

        if drag.started {
            let dx = x as f32 - drag.last.0 as f32;
            let dy = y as f32 - drag.last.1 as f32;
            self.pan.x -= dx / self.zoom;
            self.pan.y -= dy / self.zoom;
            self.anchor = None;
            self.clamp_pan();
            drag.last = (x, y);
        }

        self.drag = Some(drag);
        drag.started
    }

    /// Ends the press. Returns whether it was a pan (callers suppress the click then).
    pub fn release(&mut self) -> bool {
        self.drag.take().is_some_and(|d| d.started)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some_and(|d| d.started)
    }

    /// Wheel zoom anchored at the cursor: the world point under `(x, y)` stays put.
    pub fn zoom_at(&mut self, x: u32, y: u32, scroll_y: f32) {
        if scroll_y == 0.0 || !scroll_y.is_finite() {
            return;
        }
        self.target_zoom = (self.target_zoom * SKILLTREE_WHEEL_ZOOM_STEP.powf(scroll_y))
            .clamp(self.min_zoom, self.max_zoom);

        self.anchor = if self.viewport.contains(x, y) {
            let screen = (x as f32 + 0.5, y as f32 + 0.5);
            Some(ZoomAnchor {
                screen,
                world: self.screen_to_world(screen.0, screen.1),
            })
        } else {
            None
        };
    }

    /// Scrolls when the pointer rests near a viewport edge.
    pub fn apply_edge_pan(&mut self, mouse: (u32, u32), dt: Duration) {
        if self.is_dragging() || !self.viewport.contains(mouse.0, mouse.1) {
            return;
        }
        let dt_s = dt.as_secs_f32();
        if dt_s <= 0.0 {
            return;
        }

        let margin = SKILLTREE_EDGE_PAN_MARGIN_PX.max(1.0);
        let (mx, my) = (mouse.0 as f32, mouse.1 as f32);
        let v = self.viewport;
        let left = mx - v.x as f32;
        let right = v.right() as f32 - mx;
        let top = my - v.y as f32;
        let bottom = v.bottom() as f32 - my;

        let push = |dist: f32| {
            if dist < margin {
                let t = 1.0 - dist.max(0.0) / margin;
                t * t
            } else {
                0.0
            }
        };
        let vx = push(right) - push(left);
        let vy = push(bottom) - push(top);
        if vx == 0.0 && vy == 0.0 {
            return;
        }

        let step = SKILLTREE_EDGE_PAN_MAX_SPEED_PX_PER_S * dt_s / self.zoom;
        self.pan.x += vx * step;
        self.pan.y += vy * step;
        self.anchor = None;
        self.clamp_pan();
    }

    /// Eases the zoom towards its target, keeping any wheel anchor fixed on screen.
    pub fn update(&mut self, dt: Duration) {
        let diff = self.target_zoom - self.zoom;
        if diff.abs() <= 1e-4 {
            self.zoom = self.target_zoom;
        } else {
            let t = 1.0 - (-SKILLTREE_ZOOM_LERP_PER_S * dt.as_secs_f32()).exp();
            self.zoom += diff * t.clamp(0.0, 1.0);
        }
        self.zoom = self.zoom.clamp(self.min_zoom, self.max_zoom);

        if let Some(anchor) = self.anchor {
            let (cx, cy) = self.center();
            self.pan = Vec2f::new(
                anchor.world.x - (anchor.screen.0 - cx) / self.zoom,
                anchor.world.y - (anchor.screen.1 - cy) / self.zoom,
            );
            if self.zoom == self.target_zoom {
                self.anchor = None;
            }
        }
        self.clamp_pan();
    }

    /// Jumps to the target zoom immediately.
    pub fn settle(&mut self) {
        self.zoom = self.target_zoom;
        self.update(Duration::ZERO);
    }

    fn clamp_pan(&mut self) {
        let Some(bounds) = self.bounds else {
            return;
        };
        let view = Vec2f::new(
            self.viewport.w as f32 / self.zoom,
            self.viewport.h as f32 / self.zoom,
        );
        self.pan = clamp_pan_to_bounds(self.pan, view, bounds, SKILLTREE_CAMERA_BOUNDS_PAD);
    }
}

/// Clamps a view center so the view (sized in world units) stays within the padded bounds,
/// centering on an axis where the view is larger than the bounds.
pub fn clamp_pan_to_bounds(
    pan: Vec2f,
    view_size: Vec2f,
    bounds: SkillTreeWorldBounds,
    pad: f32,
) -> Vec2f {
    let half_w = view_size.x.max(0.0) / 2.0;
    let half_h = view_size.y.max(0.0) / 2.0;

    let min_x = bounds.min.x - pad + half_w;
    let max_x = bounds.max.x + pad - half_w;
    let min_y = bounds.min.y - pad + half_h;
    let max_y = bounds.max.y + pad - half_h;

    let x = if min_x <= max_x {
        pan.x.clamp(min_x, max_x)
    } else {
        (bounds.min.x + bounds.max.x) / 2.0
    };
    let y = if min_y <= max_y {
        pan.y.clamp(min_y, max_y)
    } else {
        (bounds.min.y + bounds.max.y) / 2.0
    };
    Vec2f::new(x, y)
}
