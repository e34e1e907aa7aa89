use engine::controls::{Control, ControlId, ControlSet};
use engine::graphics::{Renderer2d, line_advance_y};
use engine::ui::{Anchor, Insets, Rect, Size};

use crate::config::UiConfig;
use crate::palette::Palette;
use crate::widgets::{ButtonVisual, dim_screen, draw_button, draw_panel};

const MARGIN: u32 = 32;
const PAD: u32 = 18;
const GAP: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseAction {
    Resume,
    Settings,
    Restart,
    MainMenu,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PauseMenuLayout {
    pub panel: Rect,
    pub resume_button: Rect,
    pub settings_button: Rect,
    pub restart_button: Rect,
    pub main_menu_button: Rect,
}

#[derive(Debug, Clone)]
pub struct PauseMenu {
    layout: PauseMenuLayout,
    controls: ControlSet<PauseAction>,
    scale: u32,
}

impl PauseMenu {
    pub fn new(config: &UiConfig) -> Self {
        let mut menu = Self {
            layout: PauseMenuLayout::default(),
            controls: ControlSet::new(),
            scale: config.text_scale,
        };
        menu.resize(config.screen_width, config.screen_height);
        menu
    }

    pub fn layout(&self) -> PauseMenuLayout {
        self.layout
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.controls.clear();
        let safe = Rect::from_size(width, height).inset(Insets::all(MARGIN));
        if safe.is_empty() {
            self.layout = PauseMenuLayout::default();
            return;
        }

        let header_h = line_advance_y(self.scale) * 2 + PAD;
        let button_h = 44u32;
        let panel_h = PAD * 2 + header_h + button_h * 4 + GAP * 3;
        let panel_size = Size::new(360, panel_h).clamp_max(safe.size());
        let panel = safe.place(panel_size, Anchor::Center);

        // Buttons stack upwards from the bottom edge so the header keeps its space.
        let content = panel.inset(Insets::all(PAD));
        let button_size = Size::new(240, button_h).clamp_max(content.size());
        let main_menu_button = content.place(button_size, Anchor::BottomCenter);
        let step = button_size.h.saturating_add(GAP) as i32;
        let restart_button = main_menu_button.translate(0, -step);
        let settings_button = restart_button.translate(0, -step);
        let resume_button = settings_button.translate(0, -step);

        for (id, rect, action) in [
            (1, resume_button, PauseAction::Resume),
            (2, settings_button, PauseAction::Settings),
            (3, restart_button, PauseAction::Restart),
            (4, main_menu_button, PauseAction::MainMenu),
        ] {
            if rect.y >= content.y {
                self.controls.push(Control::new(ControlId(id), rect, action));
            }
        }

        self.layout = PauseMenuLayout {
            panel,
            resume_button,
            settings_button,
            restart_button,
            main_menu_button,
        };
    }

    pub fn update(&mut self, pointer: Option<(u32, u32)>) {
        self.controls.update_hover(pointer);
    }

    /// Whether an enabled control is under the pointer.
    pub fn is_hovering(&self) -> bool {
        self.controls.hovered().is_some()
    }

    pub fn handle_click(&mut self, x: u32, y: u32) -> Option<PauseAction> {
        let action = self.controls.click(x, y)?;
        log::debug!("pause menu action {action:?}");
        Some(action)
    }

    /// Draws over the frozen game view.
    pub fn draw(&self, r: &mut dyn Renderer2d, palette: &Palette) {
        dim_screen(r, palette);
        let l = self.layout;
        if l.panel.is_empty() {
            return;
        }
        draw_panel(r, l.panel, palette);
        let x = l.panel.x.saturating_add(PAD);
        let y = l.panel.y.saturating_add(PAD);
        r.draw_text_scaled(x, y, "PAUSED", palette.highlight, self.scale);
        r.draw_text_scaled(
            x,
            y + line_advance_y(self.scale),
            "ESC TO RESUME",
            palette.muted,
            self.scale,
        );

        for control in self.controls.iter() {
            let visual = ButtonVisual::of(&self.controls, control);
            let label = match control.action {
                PauseAction::Resume => "RESUME",
                PauseAction::Settings => "SETTINGS",
                PauseAction::Restart => "RESTART",
                PauseAction::MainMenu => "MAIN MENU",
            };
            draw_button(r, control.rect(), label, palette, visual, self.scale);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_are_inside_the_panel_and_map_to_actions() {
        let mut menu = PauseMenu::new(&UiConfig::default());
        let l = menu.layout();
        for (rect, action) in [
            (l.resume_button, PauseAction::Resume),
            (l.settings_button, PauseAction::Settings),
            (l.restart_button, PauseAction::Restart),
            (l.main_menu_button, PauseAction::MainMenu),
        ] {
            assert!(rect.x >= l.panel.x && rect.bottom() <= l.panel.bottom());
            let (x, y) = rect.center();
            assert_eq!(menu.handle_click(x, y), Some(action));
        }
    }

    #[test]
    fn clicks_outside_the_buttons_do_nothing() {
        let mut menu = PauseMenu::new(&UiConfig::default());
        let panel = menu.layout().panel;
        assert_eq!(menu.handle_click(panel.x + 2, panel.y + 2), None);
        assert_eq!(menu.handle_click(0, 0), None);
    }
}
