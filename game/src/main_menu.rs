use std::time::Duration;

use engine::controls::{Control, ControlId, ControlSet};
use engine::graphics::{Renderer2d, glyph_advance_x, text_height, text_width};
use engine::ui::{Insets, Rect, Size};

use crate::config::UiConfig;
use crate::palette::Palette;
use crate::widgets::{ButtonVisual, clip_signed, draw_button, mix_color};

pub const MAIN_MENU_TITLE: &str = "BASTION";

const MARGIN: u32 = 32;
const PAD: u32 = 18;
const BUTTON_GAP: u32 = 12;
const TITLE_BUTTON_GAP: u32 = 40;
const MOTE_COUNT: u32 = 28;
const TITLE_BOB_PX: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainMenuAction {
    Play,
    SkillTree,
    Settings,
    Quit,
}

impl MainMenuAction {
    const ALL: [MainMenuAction; 4] = [
        MainMenuAction::Play,
        MainMenuAction::SkillTree,
        MainMenuAction::Settings,
        MainMenuAction::Quit,
    ];

    fn label(self) -> &'static str {
        match self {
            MainMenuAction::Play => "PLAY",
            MainMenuAction::SkillTree => "SKILL TREE",
            MainMenuAction::Settings => "SETTINGS",
            MainMenuAction::Quit => "QUIT",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MainMenuLayout {
    pub panel: Rect,
    pub title: Rect,
    pub title_scale: u32,
    pub play_button: Rect,
    pub skilltree_button: Rect,
    pub settings_button: Rect,
    pub quit_button: Rect,
}

#[derive(Debug, Clone)]
pub struct MainMenu {
    layout: MainMenuLayout,
    controls: ControlSet<MainMenuAction>,
    elapsed: Duration,
    max_title_scale: u32,
    scale: u32,
}

impl MainMenu {
    pub fn new(config: &UiConfig) -> Self {
        let mut menu = Self {
            layout: MainMenuLayout::default(),
            controls: ControlSet::new(),
            elapsed: Duration::ZERO,
            max_title_scale: config.title_scale,
            scale: config.text_scale,
        };
        menu.resize(config.screen_width, config.screen_height);
        menu
    }

    pub fn layout(&self) -> MainMenuLayout {
        self.layout
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Restarts the title animation when the menu becomes the active screen.
    pub fn activate(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.controls.clear();
        let screen = Rect::from_size(width, height);
        let safe = screen.inset(Insets::all(MARGIN));
        if safe.is_empty() {
            self.layout = MainMenuLayout::default();
            return;
        }

        // Largest title scale that fits the safe width, capped by config.
        let denom = glyph_advance_x(1)
            .saturating_mul(MAIN_MENU_TITLE.chars().count() as u32)
            .max(1);
        let title_scale = (safe.w / denom).clamp(2, self.max_title_scale.max(2));
        let title_w = text_width(MAIN_MENU_TITLE, title_scale).min(safe.w);
        let title_h = text_height(title_scale).min(safe.h);

        let content = safe.inset(Insets::all(PAD));
        let button_size = Size::new(260, 44).clamp_max(content.size());
        let count = MainMenuAction::ALL.len() as u32;
        let stack_h = title_h
            .saturating_add(TITLE_BUTTON_GAP)
            .saturating_add(button_size.h.saturating_mul(count))
            .saturating_add(BUTTON_GAP.saturating_mul(count - 1));
        let top_y = content
            .y
            .saturating_add(content.h.saturating_sub(stack_h) / 2);

        let title = Rect::new(
            content.x.saturating_add(content.w.saturating_sub(title_w) / 2),
            top_y,
            title_w,
            title_h,
        );

        let mut y = title.bottom().saturating_add(TITLE_BUTTON_GAP);
        let x = content.x.saturating_add(content.w.saturating_sub(button_size.w) / 2);
        let mut buttons = [Rect::default(); 4];
        for (i, action) in MainMenuAction::ALL.iter().enumerate() {
            let rect = Rect::new(x, y, button_size.w, button_size.h);
            buttons[i] = rect;
            self.controls
                .push(Control::new(ControlId(i as u32 + 1), rect, *action));
            y = y.saturating_add(button_size.h).saturating_add(BUTTON_GAP);
        }

        self.layout = MainMenuLayout {
            panel: safe,
            title,
            title_scale,
            play_button: buttons[0],
            skilltree_button: buttons[1],
            settings_button: buttons[2],
            quit_button: buttons[3],
        };
    }

    pub fn update(&mut self, pointer: Option<(u32, u32)>, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
        self.controls.update_hover(pointer);
    }

    /// Whether an enabled control is under the pointer.
    pub fn is_hovering(&self) -> bool {
        self.controls.hovered().is_some()
    }

    pub fn handle_click(&mut self, x: u32, y: u32) -> Option<MainMenuAction> {
        let action = self.controls.click(x, y)?;
        log::debug!("main menu action {action:?}");
        Some(action)
    }

    pub fn draw(&self, r: &mut dyn Renderer2d, palette: &Palette) {
        r.clear(palette.background);
        self.draw_motes(r, palette);

        let l = self.layout;
        if l.title.is_empty() {
            return;
        }
        let t = self.elapsed.as_secs_f32();
        let bob = ((t * 1.6).sin() * TITLE_BOB_PX).round() as i32;
        let title = l.title.translate(0, bob);
        let glow = 0.5 + 0.5 * (t * 0.9).sin();
        let shadow = title.translate(l.title_scale as i32 / 2, l.title_scale as i32 / 2);
        r.draw_text_scaled(shadow.x, shadow.y, MAIN_MENU_TITLE, palette.panel_alt, l.title_scale);
        r.draw_text_scaled(
            title.x,
            title.y,
            MAIN_MENU_TITLE,
            mix_color(palette.highlight, palette.accent, glow * 0.5),
            l.title_scale,
        );

        for control in self.controls.iter() {
            let visual = ButtonVisual::of(&self.controls, control);
            draw_button(r, control.rect(), control.action.label(), palette, visual, self.scale);
        }
    }

    /// Slow upward drift of small squares, wrapping at the top edge.
    fn draw_motes(&self, r: &mut dyn Renderer2d, palette: &Palette) {
        let s = r.size();
        if s.is_empty() {
            return;
        }
        let t = self.elapsed.as_secs_f32();
        let (w, h) = (s.width as f32, s.height as f32);
        for i in 0..MOTE_COUNT {
            let fx = ((i * 97 + 13) % 101) as f32 / 101.0;
            let fy = ((i * 61 + 7) % 89) as f32 / 89.0;
            let speed = 10.0 + ((i * 37) % 23) as f32;
            let sway = (t * 0.7 + i as f32).sin() * 6.0;
            let x = fx * w + sway;
            let y = h - (fy * h + t * speed).rem_euclid(h);
            let size = 2 + i % 3;
            let color = mix_color(palette.background, palette.muted, 0.25 + (i % 4) as f32 * 0.1);
            if let Some(rect) = clip_signed(x.round() as i32, y.round() as i32, size, size) {
                r.fill_rect(rect, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_stack_below_the_title_in_order() {
        let menu = MainMenu::new(&UiConfig::default());
        let l = menu.layout();
        assert!(l.title.bottom() < l.play_button.y);
        assert!(l.play_button.bottom() < l.skilltree_button.y);
        assert!(l.skilltree_button.bottom() < l.settings_button.y);
        assert!(l.settings_button.bottom() < l.quit_button.y);
        assert!(l.title_scale <= UiConfig::default().title_scale);
    }

    #[test]
    fn clicks_map_to_actions() {
        let mut menu = MainMenu::new(&UiConfig::default());
        let l = menu.layout();
        let expected = [
            (l.play_button, MainMenuAction::Play),
            (l.skilltree_button, MainMenuAction::SkillTree),
            (l.settings_button, MainMenuAction::Settings),
            (l.quit_button, MainMenuAction::Quit),
        ];
        for (rect, action) in expected {
            let (x, y) = rect.center();
            assert_eq!(menu.handle_click(x, y), Some(action));
        }
        assert_eq!(menu.handle_click(0, 0), None);
    }

    #[test]
    fn activate_restarts_the_animation_timer() {
        let mut menu = MainMenu::new(&UiConfig::default());
        menu.update(None, Duration::from_secs(3));
        assert_eq!(menu.elapsed(), Duration::from_secs(3));
        menu.activate();
        assert_eq!(menu.elapsed(), Duration::ZERO);
    }
}
