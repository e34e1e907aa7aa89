//! Flat control lists with linear hit-testing.
//!
//! Screens rebuild their `ControlSet` whenever their layout changes and query it every frame for
//! hover state and clicks. Controls pushed later sit on top and win the hit test.

use crate::ui::{Circle, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hitbox {
    Rect(Rect),
    Circle(Circle),
}

impl Hitbox {
    pub fn contains(&self, x: u32, y: u32) -> bool {
        match self {
            Hitbox::Rect(r) => r.contains(x, y),
            Hitbox::Circle(c) => c.contains(x, y),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Hitbox::Rect(r) => *r,
            Hitbox::Circle(c) => c.bounds(),
        }
    }
}

impl From<Rect> for Hitbox {
    fn from(r: Rect) -> Self {
        Hitbox::Rect(r)
    }
}

impl From<Circle> for Hitbox {
    fn from(c: Circle) -> Self {
        Hitbox::Circle(c)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Control<A> {
    pub id: ControlId,
    pub hitbox: Hitbox,
    pub action: A,
    pub enabled: bool,
    pub selected: bool,
}

impl<A> Control<A> {
    pub fn new(id: ControlId, hitbox: impl Into<Hitbox>, action: A) -> Self {
        Self {
            id,
            hitbox: hitbox.into(),
            action,
            enabled: true,
            selected: false,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn rect(&self) -> Rect {
        self.hitbox.bounds()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverChange {
    pub left: Option<ControlId>,
    pub entered: Option<ControlId>,
}

#[derive(Debug, Clone)]
pub struct ControlSet<A> {
    controls: Vec<Control<A>>,
    hovered: Option<ControlId>,
    pressed: Option<ControlId>,
}

impl<A> Default for ControlSet<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> ControlSet<A> {
    pub fn new() -> Self {
        Self {
            controls: Vec::new(),
            hovered: None,
            pressed: None,
        }
    }

    /// Drops every control. Hover state survives so a rebuild under a stationary cursor does not
    /// flicker; it is re-resolved on the next `update_hover`.
    pub fn clear(&mut self) {
        self.controls.clear();
    }

    pub fn push(&mut self, control: Control<A>) {
        self.controls.push(control);
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Control<A>> {
        self.controls.iter()
    }

    pub fn get(&self, id: ControlId) -> Option<&Control<A>> {
        self.controls.iter().find(|c| c.id == id)
    }

    pub fn hovered(&self) -> Option<ControlId> {
        self.hovered
    }

    pub fn is_hovered(&self, id: ControlId) -> bool {
        self.hovered == Some(id)
    }

    pub fn is_pressed(&self, id: ControlId) -> bool {
        self.pressed == Some(id)
    }

    pub fn set_selected(&mut self, id: ControlId, selected: bool) {
        if let Some(c) = self.controls.iter_mut().find(|c| c.id == id) {
            c.selected = selected;
        }
    }

    /// Topmost enabled control under the point.
    pub fn hit(&self, x: u32, y: u32) -> Option<&Control<A>> {
        self.controls
            .iter()
            .rev()
            .find(|c| c.enabled && c.hitbox.contains(x, y))
    }

    /// Re-resolves hover for a pointer position (`None` when the pointer left the window).
    pub fn update_hover(&mut self, pos: Option<(u32, u32)>) -> Option<HoverChange> {
        let next = pos.and_then(|(x, y)| self.hit(x, y).map(|c| c.id));
        if next == self.hovered {
            return None;
        }
        let change = HoverChange {
            left: self.hovered,
            entered: next,
        };
        self.hovered = next;
        Some(change)
    }

    pub fn press(&mut self, x: u32, y: u32) {
        self.pressed = self.hit(x, y).map(|c| c.id);
    }

    /// Forgets the pending press without resolving it.
    pub fn cancel_press(&mut self) {
        self.pressed = None;
    }

    /// Completes a press/release pair; yields the action only when released over the pressed
    /// control.
    pub fn release(&mut self, x: u32, y: u32) -> Option<A>
    where
        A: Clone,
    {
        let pressed = self.pressed.take()?;
        let hit = self.hit(x, y)?;
        (hit.id == pressed).then(|| hit.action.clone())
    }

    /// Single-shot click: the action of the topmost enabled control under the point.
    pub fn click(&self, x: u32, y: u32) -> Option<A>
    where
        A: Clone,
    {
        self.hit(x, y).map(|c| c.action.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Act {
        A,
        B,
    }

    fn set() -> ControlSet<Act> {
        let mut set = ControlSet::new();
        set.push(Control::new(ControlId(1), Rect::new(0, 0, 20, 20), Act::A));
        set.push(Control::new(ControlId(2), Rect::new(10, 10, 20, 20), Act::B));
        set
    }

    #[test]
    fn later_controls_win_overlapping_hit_tests() {
        let set = set();
        assert_eq!(set.click(15, 15), Some(Act::B));
        assert_eq!(set.click(2, 2), Some(Act::A));
        assert_eq!(set.click(100, 100), None);
    }

    #[test]
    fn disabled_controls_are_transparent_to_hits() {
        let mut set = ControlSet::new();
        set.push(Control::new(ControlId(1), Rect::new(0, 0, 20, 20), Act::A));
        set.push(Control::new(ControlId(2), Rect::new(0, 0, 20, 20), Act::B).enabled(false));
        assert_eq!(set.click(5, 5), Some(Act::A));
    }

    #[test]
    fn circle_hitbox_rejects_bounding_box_corners() {
        let mut set = ControlSet::new();
        set.push(Control::new(ControlId(1), Circle::new(10, 10, 8), Act::A));
        assert_eq!(set.click(10, 3), Some(Act::A));
        assert_eq!(set.click(3, 3), None);
    }

    #[test]
    fn update_hover_reports_enter_and_leave_once() {
        let mut set = set();
        let change = set.update_hover(Some((2, 2))).expect("entered A");
        assert_eq!(change.entered, Some(ControlId(1)));
        assert!(set.update_hover(Some((3, 3))).is_none());
        let change = set.update_hover(None).expect("left A");
        assert_eq!(change.left, Some(ControlId(1)));
        assert_eq!(change.entered, None);
    }

    #[test]
    fn release_requires_same_control_as_press() {
        let mut set = set();
        set.press(2, 2);
        assert_eq!(set.release(25, 25), None);
        set.press(25, 25);
        assert_eq!(set.release(26, 26), Some(Act::B));
        assert!(!set.is_pressed(ControlId(2)));
    }

    #[test]
    fn cancel_press_drops_the_pressed_visual() {
        let mut set = set();
        set.press(25, 25);
        assert!(set.is_pressed(ControlId(2)));
        assert_eq!(set.click(25, 25), Some(Act::B));
        assert!(set.is_pressed(ControlId(2)));
        set.cancel_press();
        assert!(!set.is_pressed(ControlId(2)));
        assert_eq!(set.release(25, 25), None);
    }
}
