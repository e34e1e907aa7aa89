//! Right-hand side panel: tower build list and the selected tower's upgrades.

use std::time::Duration;

use engine::controls::{Control, ControlId, ControlSet};
use engine::graphics::{Renderer2d, line_advance_y, text_height, text_width};
use engine::ui::{Insets, Rect};

use crate::config::{TowerDef, UiConfig};
use crate::events::{EventKind, EventListener, GameEvent};
use crate::palette::Palette;
use crate::tooltip::TooltipContent;
use crate::widgets::{ButtonVisual, button_colors, draw_button, draw_panel, text_color};
use crate::world::{GameSnapshot, TowerSelection, UpgradePath};

const PAD: u32 = 8;
const TOGGLE_H: u32 = 24;
const ROW_H: u32 = 34;
const ROW_GAP: u32 = 4;
const SWATCH: u32 = 18;

const ID_TOGGLE: ControlId = ControlId(1);
const ID_SELL: ControlId = ControlId(2);
const ID_BUILD_BASE: u32 = 100;
const ID_UPGRADE_BASE: u32 = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelAction {
    ToggleExpand,
    SelectBuild(String),
    ClearBuild,
    Upgrade(usize),
    Sell,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelLayout {
    pub panel: Rect,
    pub toggle: Rect,
    pub build_header: Option<Rect>,
    pub build_rows: Vec<Rect>,
    pub selection_header: Option<Rect>,
    pub upgrade_rows: Vec<Rect>,
    pub sell_button: Option<Rect>,
}

/// Collaborator state the controls depend on; a change triggers a rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct PanelModel {
    gold: u32,
    /// Effective build price per catalog entry, as the world charges it.
    build_costs: Vec<u32>,
    selection: Option<TowerSelection>,
}

#[derive(Debug, Clone)]
pub struct SidePanel {
    towers: Vec<TowerDef>,
    expanded: bool,
    expanded_w: u32,
    collapsed_w: u32,
    top: u32,
    screen: (u32, u32),
    scale: u32,
    selected_build: Option<String>,
    model: PanelModel,
    layout: PanelLayout,
    controls: ControlSet<PanelAction>,
    pointer: Option<(u32, u32)>,
}

impl SidePanel {
    pub fn new(config: &UiConfig) -> Self {
        let mut panel = Self {
            towers: config.towers.clone(),
            expanded: config.panel_starts_expanded,
            expanded_w: config.panel_width,
            collapsed_w: config.panel_collapsed_width,
            top: config.hud_height,
            screen: (config.screen_width, config.screen_height),
            scale: config.text_scale,
            selected_build: None,
            model: PanelModel::default(),
            layout: PanelLayout::default(),
            controls: ControlSet::new(),
            pointer: None,
        };
        panel.rebuild();
        panel
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn selected_build(&self) -> Option<&str> {
        self.selected_build.as_deref()
    }

    pub fn clear_build_selection(&mut self) {
        if self.selected_build.take().is_some() {
            self.rebuild();
        }
    }

    pub fn layout(&self) -> &PanelLayout {
        &self.layout
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        self.layout.panel.contains(x, y)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.screen = (width, height);
        self.rebuild();
    }

    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
        self.rebuild();
    }

    pub fn update(&mut self, pointer: Option<(u32, u32)>, _dt: Duration, snapshot: &GameSnapshot<'_>) {
        let model = PanelModel {
            gold: snapshot.economy.gold(),
            build_costs: self.towers.iter().map(|t| snapshot.economy.build_cost(t)).collect(),
            selection: snapshot.upgrades.selected_tower(),
        };
        if model != self.model {
            self.model = model;
            self.rebuild();
        }
        self.pointer = pointer;
        self.controls.update_hover(pointer);
    }

    /// Price shown and checked for the build row at `index`.
    pub fn build_cost(&self, index: usize) -> Option<u32> {
        let tower = self.towers.get(index)?;
        Some(self.model.build_costs.get(index).copied().unwrap_or(tower.cost))
    }

    fn rebuild(&mut self) {
        let (sw, sh) = self.screen;
        let w = if self.expanded {
            self.expanded_w
        } else {
            self.collapsed_w
        }
        .min(sw);
        let panel = Rect::new(sw.saturating_sub(w), self.top, w, sh.saturating_sub(self.top));
        let toggle = Rect::new(panel.x, panel.y, panel.w, TOGGLE_H.min(panel.h));

        let mut layout = PanelLayout {
            panel,
            toggle,
            ..PanelLayout::default()
        };
        self.controls.clear();
        self.controls
            .push(Control::new(ID_TOGGLE, toggle, PanelAction::ToggleExpand));

        if self.expanded {
            let line_h = line_advance_y(self.scale);
            let content = Rect::new(
                panel.x,
                toggle.bottom(),
                panel.w,
                panel.bottom().saturating_sub(toggle.bottom()),
            )
            .inset(Insets::all(PAD));

            let header = Rect::new(content.x, content.y, content.w, line_h);
            layout.build_header = Some(header);
            let list = Rect::new(
                content.x,
                header.bottom() + ROW_GAP,
                content.w,
                content.bottom().saturating_sub(header.bottom() + ROW_GAP),
            );
            layout.build_rows = list.split_rows(self.towers.len(), ROW_H, ROW_GAP);
            for (i, row) in layout.build_rows.iter().enumerate() {
                let tower = &self.towers[i];
                let cost = self.model.build_costs.get(i).copied().unwrap_or(tower.cost);
                let selected = self.selected_build.as_deref() == Some(tower.id.as_str());
                let action = if selected {
                    PanelAction::ClearBuild
                } else {
                    PanelAction::SelectBuild(tower.id.clone())
                };
                self.controls.push(
                    Control::new(ControlId(ID_BUILD_BASE + i as u32), *row, action)
                        .enabled(self.model.gold >= cost)
                        .selected(selected),
                );
            }

            if let Some(selection) = &self.model.selection {
                let below = layout
                    .build_rows
                    .last()
                    .map(|r| r.bottom())
                    .unwrap_or(list.y)
                    .saturating_add(PAD * 2);
                let header = Rect::new(content.x, below, content.w, line_h);
                let area = Rect::new(
                    content.x,
                    header.bottom() + ROW_GAP,
                    content.w,
                    content.bottom().saturating_sub(header.bottom() + ROW_GAP),
                );
                let mut rows = area.split_rows(selection.paths.len() + 1, ROW_H, ROW_GAP);
                let sell = if rows.len() > selection.paths.len() {
                    rows.pop()
                } else {
                    None
                };
                layout.selection_header = (header.bottom() <= content.bottom()).then_some(header);

                for (i, row) in rows.iter().enumerate() {
                    let path = &selection.paths[i];
                    let affordable = path.next_cost.is_some_and(|c| self.model.gold >= c);
                    self.controls.push(
                        Control::new(
                            ControlId(ID_UPGRADE_BASE + i as u32),
                            *row,
                            PanelAction::Upgrade(i),
                        )
                        .enabled(!path.is_maxed() && affordable),
                    );
                }
                layout.upgrade_rows = rows;
                if let Some(sell) = sell {
                    self.controls
                        .push(Control::new(ID_SELL, sell, PanelAction::Sell));
                    layout.sell_button = Some(sell);
                }
            }
        }
        self.layout = layout;
    }

    /// Whether an enabled control is under the pointer.
    pub fn is_hovering(&self) -> bool {
        self.controls.hovered().is_some()
    }

    pub fn handle_click(&mut self, x: u32, y: u32) -> Option<PanelAction> {
        let action = self.controls.click(x, y)?;
        match &action {
            PanelAction::ToggleExpand => self.toggle_expanded(),
            PanelAction::SelectBuild(id) => {
                self.selected_build = Some(id.clone());
                self.rebuild();
            }
            PanelAction::ClearBuild => self.clear_build_selection(),
            PanelAction::Upgrade(_) | PanelAction::Sell => {}
        }
        log::debug!("panel action {action:?}");
        Some(action)
    }

    /// Tooltip for the entry under the pointer. Unaffordable entries still report their cost.
    pub fn hover_tooltip(&self) -> Option<(TooltipContent, (u32, u32))> {
        let (x, y) = self.pointer?;
        let gold = self.model.gold;
        if let Some(i) = self.layout.build_rows.iter().position(|r| r.contains(x, y)) {
            let tower = self.towers.get(i)?;
            let cost = self.build_cost(i)?;
            let content = TooltipContent::new(tower.name.clone(), tower.description.clone())
                .with_cost(cost, gold >= cost);
            return Some((content, (x, y)));
        }
        let selection = self.model.selection.as_ref()?;
        if let Some(i) = self.layout.upgrade_rows.iter().position(|r| r.contains(x, y)) {
            let path = selection.paths.get(i)?;
            let mut content = TooltipContent::new(path.name.clone(), path.description.clone());
            if let Some(cost) = path.next_cost {
                content = content.with_cost(cost, gold >= cost);
            }
            return Some((content, (x, y)));
        }
        if self.layout.sell_button.is_some_and(|r| r.contains(x, y)) {
            let content = TooltipContent::new(
                format!("SELL {}", selection.name),
                format!("Refunds {} gold.", selection.sell_value),
            );
            return Some((content, (x, y)));
        }
        None
    }

    pub fn draw(&self, r: &mut dyn Renderer2d, palette: &Palette) {
        let l = &self.layout;
        let scale = self.scale;
        draw_panel(r, l.panel, palette);

        for control in self.controls.iter() {
            let visual = ButtonVisual::of(&self.controls, control);
            let rect = control.rect();
            let id = control.id.0;
            if control.id == ID_TOGGLE {
                let label = if self.expanded { ">" } else { "<" };
                draw_button(r, rect, label, palette, visual, scale);
            } else if control.id == ID_SELL {
                let value = self.model.selection.as_ref().map_or(0, |s| s.sell_value);
                draw_button(r, rect, &format!("SELL +{value}"), palette, visual, scale);
            } else if (ID_BUILD_BASE..ID_UPGRADE_BASE).contains(&id) {
                let index = (id - ID_BUILD_BASE) as usize;
                if let (Some(tower), Some(cost)) = (self.towers.get(index), self.build_cost(index)) {
                    self.draw_build_row(r, rect, tower, cost, visual, palette);
                }
            } else if let Some(selection) = &self.model.selection {
                let i = (id - ID_UPGRADE_BASE) as usize;
                if let Some(path) = selection.paths.get(i) {
                    self.draw_upgrade_row(r, rect, path, visual, palette);
                }
            }
        }

        if let Some(header) = l.build_header {
            r.draw_text_scaled(header.x, header.y, "BUILD", palette.muted, scale);
        }
        if let (Some(header), Some(selection)) = (l.selection_header, &self.model.selection) {
            r.draw_text_scaled(header.x, header.y, &selection.name, palette.highlight, scale);
        }
    }

    fn draw_build_row(
        &self,
        r: &mut dyn Renderer2d,
        rect: Rect,
        tower: &TowerDef,
        cost: u32,
        visual: ButtonVisual,
        palette: &Palette,
    ) {
        let scale = self.scale;
        let (fill, border) = button_colors(palette, visual);
        r.fill_rect(rect, fill);
        r.rect_outline(rect, border);

        let swatch_y = rect.y + rect.h.saturating_sub(SWATCH) / 2;
        let swatch = Rect::new(rect.x + PAD, swatch_y, SWATCH, SWATCH);
        if visual.enabled {
            r.fill_rect(swatch, tower.color);
        } else {
            r.rect_outline(swatch, tower.color);
        }

        let ty = rect.y + rect.h.saturating_sub(text_height(scale)) / 2;
        let color = text_color(palette, visual.enabled);
        r.draw_text_scaled(swatch.right() + PAD, ty, &tower.name, color, scale);

        let cost = cost.to_string();
        let cost_color = if visual.enabled { palette.gold } else { palette.danger };
        let cx = rect
            .right()
            .saturating_sub(PAD + text_width(&cost, scale));
        r.draw_text_scaled(cx, ty, &cost, cost_color, scale);
    }

    fn draw_upgrade_row(
        &self,
        r: &mut dyn Renderer2d,
        rect: Rect,
        path: &UpgradePath,
        visual: ButtonVisual,
        palette: &Palette,
    ) {
        let scale = self.scale;
        let (fill, border) = button_colors(palette, visual);
        r.fill_rect(rect, fill);
        r.rect_outline(rect, border);

        let line_h = line_advance_y(scale);
        let top = rect.y + rect.h.saturating_sub(line_h + text_height(scale)) / 2;
        let color = text_color(palette, visual.enabled || path.is_maxed());
        r.draw_text_scaled(rect.x + PAD, top, &path.name, color, scale);
        r.draw_text_scaled(
            rect.x + PAD,
            top + line_h,
            &format!("LV {}/{}", path.level, path.max_level),
            palette.muted,
            scale,
        );

        let (label, label_color) = match path.next_cost {
            Some(cost) if !path.is_maxed() => (
                cost.to_string(),
                if self.model.gold >= cost { palette.gold } else { palette.danger },
            ),
            _ => ("MAX".to_string(), palette.ok),
        };
        let lx = rect
            .right()
            .saturating_sub(PAD + text_width(&label, scale));
        let ly = rect.y + rect.h.saturating_sub(text_height(scale)) / 2;
        r.draw_text_scaled(lx, ly, &label, label_color, scale);
    }
}

impl EventListener for SidePanel {
    fn interests(&self) -> &'static [EventKind] {
        &[EventKind::TowerSelected]
    }

    fn on_event(&mut self, event: &GameEvent) {
        // Selecting a placed tower cancels the pending build choice.
        if let GameEvent::TowerSelected { .. } = event {
            self.clear_build_selection();
        }
    }
}
