//! Skill-tree screen: pan/zoom canvas of pixel-art nodes with a header bar.

use std::time::Duration;

use engine::controls::{Control, ControlId, ControlSet};
use engine::graphics::{Color, Renderer2d, text_height, text_width};
use engine::ui::{Anchor, Rect, Size};

use crate::config::UiConfig;
use crate::events::{EventBus, GameEvent};
use crate::node_art;
use crate::palette::Palette;
use crate::skilltree::{NodeState, ROOT_NODE_ID, SkillNodeDef, skilltree_world_bounds};
use crate::skilltree_camera::SkillTreeCamera;
use crate::tooltip::TooltipContent;
use crate::widgets::{ButtonVisual, draw_button, mix_color};
use crate::world::SkillTreeData;

const HEADER_H: u32 = 48;
const BACK_W: u32 = 96;
const PAD: u32 = 8;
const LINK_THICKNESS: u32 = 3;
const ALLOCATE_FLASH_S: f32 = 0.5;

const ID_BACK: ControlId = ControlId(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillTreeAction {
    Back,
    Allocated(String),
}

#[derive(Debug, Clone)]
pub struct SkillTreeView {
    camera: SkillTreeCamera,
    header: Rect,
    controls: ControlSet<SkillTreeAction>,
    node_size: u32,
    scale: u32,
    pointer: Option<(u32, u32)>,
    hovered: Option<String>,
    flash: Option<(String, f32)>,
}

impl SkillTreeView {
    pub fn new(config: &UiConfig) -> Self {
        let mut view = Self {
            camera: SkillTreeCamera::from_config(config, Rect::default()),
            header: Rect::default(),
            controls: ControlSet::new(),
            node_size: config.skilltree_node_size,
            scale: config.text_scale,
            pointer: None,
            hovered: None,
            flash: None,
        };
        view.resize(config.screen_width, config.screen_height);
        view
    }

    pub fn camera(&self) -> &SkillTreeCamera {
        &self.camera
    }

    pub fn header(&self) -> Rect {
        self.header
    }

    pub fn back_button(&self) -> Rect {
        self.controls.get(ID_BACK).map(|c| c.rect()).unwrap_or_default()
    }

    pub fn hovered_node(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn is_hovering(&self) -> bool {
        self.hovered.is_some() || self.controls.hovered().is_some()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        let header_h = HEADER_H.min(height);
        self.header = Rect::new(0, 0, width, header_h);
        self.camera
            .set_viewport(Rect::new(0, header_h, width, height.saturating_sub(header_h)));

        let row = Rect::new(PAD, 0, width.saturating_sub(PAD * 2), header_h);
        let back = row.place(Size::new(BACK_W, header_h.saturating_sub(12)), Anchor::CenterRight);
        self.controls.clear();
        self.controls
            .push(Control::new(ID_BACK, back, SkillTreeAction::Back));
    }

    /// Resets the screen when it is opened: camera bounds from the node set, view focused on
    /// the root.
    pub fn activate(&mut self, skills: &dyn SkillTreeData) {
        self.camera.set_bounds(skilltree_world_bounds(skills.nodes()));
        let root = skills.node(ROOT_NODE_ID).or_else(|| skills.nodes().first());
        self.camera.zoom = 1.0f32.clamp(self.camera.min_zoom, self.camera.max_zoom);
        self.camera.target_zoom = self.camera.zoom;
        if let Some(root) = root {
            self.camera.focus(root.pos);
        }
        self.hovered = None;
        self.flash = None;
        self.camera.release();
    }

    fn tile_px(&self) -> u32 {
        ((self.node_size as f32) * self.camera.zoom).round().max(1.0) as u32
    }

    fn node_center(&self, node: &SkillNodeDef) -> (i32, i32) {
        let (sx, sy) = self.camera.world_to_screen(node.pos);
        (sx.round() as i32, sy.round() as i32)
    }

    /// Topmost node whose tile covers the point. Header pixels never hit a node.
    pub fn node_at<'a>(&self, skills: &'a dyn SkillTreeData, x: u32, y: u32) -> Option<&'a SkillNodeDef> {
        if !self.camera.viewport().contains(x, y) {
            return None;
        }
        let half = (node_art::cell_px(self.tile_px()) * (node_art::ART_CELLS + 2) / 2) as i32;
        skills.nodes().iter().rev().find(|node| {
            let (cx, cy) = self.node_center(node);
            let (dx, dy) = (x as i32 - cx, y as i32 - cy);
            dx >= -half && dx < half && dy >= -half && dy < half
        })
    }

    pub fn press(&mut self, x: u32, y: u32) {
        self.controls.press(x, y);
        if !self.header.contains(x, y) {
            self.camera.press(x, y);
        }
    }

    pub fn scroll(&mut self, x: u32, y: u32, amount: f32) {
        self.camera.zoom_at(x, y, amount);
    }

    pub fn update(&mut self, pointer: Option<(u32, u32)>, dt: Duration, skills: &dyn SkillTreeData) {
        self.pointer = pointer;
        self.controls.update_hover(pointer);
        if let Some((x, y)) = pointer {
            self.camera.drag_to(x, y);
            self.camera.apply_edge_pan((x, y), dt);
        }
        self.camera.update(dt);

        self.hovered = match pointer {
            Some((x, y)) if !self.camera.is_dragging() => {
                self.node_at(skills, x, y).map(|n| n.id.clone())
            }
            _ => None,
        };

        if let Some((_, t)) = &mut self.flash {
            *t -= dt.as_secs_f32();
            if *t <= 0.0 {
                self.flash = None;
            }
        }
    }

    pub fn hover_tooltip(&self, skills: &dyn SkillTreeData) -> Option<(TooltipContent, (u32, u32))> {
        let id = self.hovered.as_deref()?;
        let node = skills.node(id)?;
        let pointer = self.pointer?;

        let effect = node.effect.summary();
        let body = match (node.description.is_empty(), effect.is_empty()) {
            (true, _) => effect,
            (false, true) => node.description.clone(),
            (false, false) => format!("{}\n{}", node.description, effect),
        };
        let mut content = TooltipContent::new(node.name.clone(), body);
        match skills.node_state(id) {
            NodeState::Allocated => {}
            NodeState::Available => {
                content = content.with_cost(node.cost, skills.currency() >= node.cost);
            }
            NodeState::Locked => {
                content.body = if content.body.is_empty() {
                    "LOCKED".to_string()
                } else {
                    format!("{}\nLOCKED", content.body)
                };
                content = content.with_cost(node.cost, false);
            }
        }
        Some((content, pointer))
    }

    /// Completes a press. Pans swallow the click; otherwise the back button or an allocatable
    /// node under the pointer is activated.
    pub fn handle_click(
        &mut self,
        x: u32,
        y: u32,
        skills: &mut dyn SkillTreeData,
        bus: &mut EventBus,
    ) -> Option<SkillTreeAction> {
        self.controls.cancel_press();
        if self.camera.release() {
            return None;
        }
        if let Some(action) = self.controls.click(x, y) {
            return Some(action);
        }

        let id = self.node_at(&*skills, x, y)?.id.clone();
        if !skills.can_allocate(&id) {
            log::debug!("skill node {id} is not allocatable");
            return None;
        }
        if !skills.try_allocate(&id) {
            return None;
        }
        bus.publish(GameEvent::SkillAllocated { node: id.clone() });
        self.flash = Some((id.clone(), ALLOCATE_FLASH_S));
        Some(SkillTreeAction::Allocated(id))
    }

    pub fn draw(&self, r: &mut dyn Renderer2d, skills: &dyn SkillTreeData, palette: &Palette) {
        let viewport = self.camera.viewport();
        r.fill_rect(viewport, palette.background);

        let nodes = skills.nodes();
        for node in nodes {
            let to = self.node_center(node);
            let child_allocated = skills.node_state(&node.id) == NodeState::Allocated;
            for req in &node.requires {
                let Some(parent) = skills.node(req) else {
                    continue;
                };
                let parent_allocated = skills.node_state(req) == NodeState::Allocated;
                let color = link_color(parent_allocated, child_allocated, palette);
                r.draw_line(self.node_center(parent), to, LINK_THICKNESS, color);
            }
        }

        let tile = self.tile_px();
        let reach = tile as i32;
        for node in nodes {
            let center = self.node_center(node);
            if center.0 < viewport.x as i32 - reach
                || center.0 > viewport.right() as i32 + reach
                || center.1 < viewport.y as i32 - reach
                || center.1 > viewport.bottom() as i32 + reach
            {
                continue;
            }
            let hovered = self.hovered.as_deref() == Some(node.id.as_str());
            let flashing = self
                .flash
                .as_ref()
                .is_some_and(|(id, _)| *id == node.id);
            let size = if flashing { tile + tile / 5 } else { tile };
            node_art::draw_node(
                r,
                center,
                size,
                node.kind,
                skills.node_state(&node.id),
                palette,
                hovered,
            );
        }

        self.draw_header(r, skills, palette);

        let hint = "DRAG TO PAN - WHEEL TO ZOOM";
        let th = text_height(self.scale);
        if viewport.h > th + PAD * 2 {
            r.draw_text_scaled(
                viewport.x + PAD,
                viewport.bottom() - th - PAD,
                hint,
                palette.muted,
                self.scale,
            );
        }
    }

    fn draw_header(&self, r: &mut dyn Renderer2d, skills: &dyn SkillTreeData, palette: &Palette) {
        let h = self.header;
        if h.is_empty() {
            return;
        }
        r.fill_rect(h, palette.panel);
        r.fill_rect(
            Rect::new(h.x, h.bottom().saturating_sub(1), h.w, 1),
            palette.border,
        );
        let scale = self.scale;
        let ty = h.y + h.h.saturating_sub(text_height(scale)) / 2;
        r.draw_text_scaled(h.x + PAD * 2, ty, "SKILL TREE", palette.highlight, scale);

        let points = format!("POINTS {}", skills.currency());
        let back = self.back_button();
        let px = back
            .x
            .saturating_sub(PAD * 3)
            .saturating_sub(text_width(&points, scale));
        r.draw_text_scaled(px, ty, &points, palette.gold, scale);

        for control in self.controls.iter() {
            let visual = ButtonVisual::of(&self.controls, control);
            draw_button(r, control.rect(), "BACK", palette, visual, scale);
        }
    }
}

fn link_color(parent_allocated: bool, child_allocated: bool, palette: &Palette) -> Color {
    match (parent_allocated, child_allocated) {
        (true, true) => palette.gold,
        (true, false) => mix_color(palette.border, palette.gold, 0.35),
        _ => palette.border,
    }
}
