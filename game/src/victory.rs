//! Victory screen: run summary revealed line by line, star rating, follow-up actions.

use std::time::Duration;

use engine::controls::{Control, ControlId, ControlSet};
use engine::graphics::{Renderer2d, line_advance_y, text_height, text_width};
use engine::ui::{Anchor, Insets, Rect, Size};

use crate::config::UiConfig;
use crate::palette::Palette;
use crate::widgets::{ButtonVisual, dim_screen, draw_button, draw_panel, draw_text_centered};
use crate::world::RunSummary;

const MARGIN: u32 = 32;
const PAD: u32 = 18;
const GAP: u32 = 12;
const BUTTON_H: u32 = 44;
const STAT_LINES: usize = 5;
const STAR_CELL: u32 = 4;
const STAR_GAP: u32 = 16;
const MAX_STARS: u8 = 3;

const STAR: [u8; 7] = [
    0b0001000, 0b0011100, 0b1111111, 0b0111110, 0b0011100, 0b0110110, 0b1100011,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VictoryAction {
    SkillTree,
    PlayAgain,
    MainMenu,
}

/// Three stars for a flawless run, two when at least half the lives were kept.
pub fn star_rating(summary: &RunSummary) -> u8 {
    if summary.max_lives == 0 || summary.lives_left >= summary.max_lives {
        3
    } else if summary.lives_left.saturating_mul(2) >= summary.max_lives {
        2
    } else {
        1
    }
}

pub fn summary_lines(summary: &RunSummary) -> [(&'static str, String); STAT_LINES] {
    [
        (
            "WAVES CLEARED",
            format!("{}/{}", summary.waves_cleared, summary.total_waves),
        ),
        (
            "LIVES LEFT",
            format!("{}/{}", summary.lives_left, summary.max_lives),
        ),
        ("GOLD EARNED", summary.gold_earned.to_string()),
        ("ENEMIES DEFEATED", summary.enemies_defeated.to_string()),
        ("SKILL POINTS", format!("+{}", summary.reward)),
    ]
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VictoryLayout {
    pub panel: Rect,
    pub title: Rect,
    pub lines: Vec<Rect>,
    pub stars: Rect,
    pub skilltree_button: Rect,
    pub play_again_button: Rect,
    pub main_menu_button: Rect,
}

#[derive(Debug, Clone)]
pub struct VictoryScreen {
    summary: RunSummary,
    elapsed: f32,
    interval: f32,
    skipped: bool,
    layout: VictoryLayout,
    controls: ControlSet<VictoryAction>,
    scale: u32,
}

impl VictoryScreen {
    pub fn new(config: &UiConfig) -> Self {
        let mut screen = Self {
            summary: RunSummary::default(),
            elapsed: 0.0,
            skipped: false,
            interval: config.victory_reveal_interval_s.max(0.0),
            layout: VictoryLayout::default(),
            controls: ControlSet::new(),
            scale: config.text_scale,
        };
        screen.resize(config.screen_width, config.screen_height);
        screen
    }

    /// Starts the reveal for a freshly won run.
    pub fn show(&mut self, summary: RunSummary) {
        self.summary = summary;
        self.elapsed = 0.0;
        self.skipped = false;
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub fn layout(&self) -> &VictoryLayout {
        &self.layout
    }

    /// Number of revealed rows; the star row counts as the last one.
    pub fn revealed(&self) -> usize {
        let total = STAT_LINES + 1;
        if self.skipped || self.interval <= 0.0 {
            return total;
        }
        ((self.elapsed / self.interval).floor() as usize).min(total)
    }

    pub fn is_fully_revealed(&self) -> bool {
        self.revealed() > STAT_LINES
    }

    pub fn skip_reveal(&mut self) {
        self.skipped = true;
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.controls.clear();
        let safe = Rect::from_size(width, height).inset(Insets::all(MARGIN));
        if safe.is_empty() {
            self.layout = VictoryLayout::default();
            return;
        }

        let line_h = line_advance_y(self.scale) + 4;
        let title_h = text_height(self.scale * 3) + PAD;
        let stars_h = STAR.len() as u32 * STAR_CELL + PAD;
        let panel_h = PAD * 2
            + title_h
            + line_h * STAT_LINES as u32
            + stars_h
            + GAP
            + BUTTON_H * 3
            + GAP * 2;
        let panel = safe.place(Size::new(440, panel_h).clamp_max(safe.size()), Anchor::Center);
        let content = panel.inset(Insets::all(PAD));

        let title = Rect::new(content.x, content.y, content.w, title_h.min(content.h));
        let lines = Rect::new(content.x, title.bottom(), content.w, line_h * STAT_LINES as u32)
            .split_rows(STAT_LINES, line_h, 0);
        let stars_y = lines.last().map(|r| r.bottom()).unwrap_or(title.bottom());
        let stars = Rect::new(content.x, stars_y, content.w, stars_h);

        let button_size = Size::new(240, BUTTON_H).clamp_max(content.size());
        let main_menu_button = content.place(button_size, Anchor::BottomCenter);
        let step = button_size.h.saturating_add(GAP) as i32;
        let play_again_button = main_menu_button.translate(0, -step);
        let skilltree_button = play_again_button.translate(0, -step);

        for (id, rect, action) in [
            (1, skilltree_button, VictoryAction::SkillTree),
            (2, play_again_button, VictoryAction::PlayAgain),
            (3, main_menu_button, VictoryAction::MainMenu),
        ] {
            self.controls.push(Control::new(ControlId(id), rect, action));
        }

        self.layout = VictoryLayout {
            panel,
            title,
            lines,
            stars,
            skilltree_button,
            play_again_button,
            main_menu_button,
        };
    }

    pub fn update(&mut self, pointer: Option<(u32, u32)>, dt: Duration) {
        self.elapsed += dt.as_secs_f32();
        self.controls.update_hover(pointer);
    }

    /// Whether an enabled control is under the pointer.
    pub fn is_hovering(&self) -> bool {
        self.controls.hovered().is_some()
    }

    /// While the summary is still revealing, any click completes it instead of acting.
    pub fn handle_click(&mut self, x: u32, y: u32) -> Option<VictoryAction> {
        if !self.is_fully_revealed() {
            self.skip_reveal();
            return None;
        }
        let action = self.controls.click(x, y)?;
        log::debug!("victory action {action:?}");
        Some(action)
    }

    pub fn draw(&self, r: &mut dyn Renderer2d, palette: &Palette) {
        dim_screen(r, palette);
        let l = &self.layout;
        if l.panel.is_empty() {
            return;
        }
        let scale = self.scale;
        draw_panel(r, l.panel, palette);
        draw_text_centered(r, l.title, "VICTORY", palette.gold, scale * 3);

        let revealed = self.revealed();
        for (i, ((label, value), row)) in summary_lines(&self.summary)
            .iter()
            .zip(&l.lines)
            .enumerate()
        {
            if i >= revealed {
                break;
            }
            let ty = row.y + row.h.saturating_sub(text_height(scale)) / 2;
            r.draw_text_scaled(row.x, ty, label, palette.muted, scale);
            let vx = row.right().saturating_sub(text_width(value, scale));
            r.draw_text_scaled(vx, ty, value, palette.text, scale);
        }

        if self.is_fully_revealed() {
            self.draw_stars(r, palette);
        }

        for control in self.controls.iter() {
            let visual = ButtonVisual {
                enabled: control.enabled && self.is_fully_revealed(),
                ..ButtonVisual::of(&self.controls, control)
            };
            let label = match control.action {
                VictoryAction::SkillTree => "SKILL TREE",
                VictoryAction::PlayAgain => "PLAY AGAIN",
                VictoryAction::MainMenu => "MAIN MENU",
            };
            draw_button(r, control.rect(), label, palette, visual, scale);
        }
    }

    fn draw_stars(&self, r: &mut dyn Renderer2d, palette: &Palette) {
        let earned = star_rating(&self.summary);
        let star_w = STAR.len() as u32 * STAR_CELL;
        let row_w = star_w * MAX_STARS as u32 + STAR_GAP * (MAX_STARS as u32 - 1);
        let area = self.layout.stars.place(
            Size::new(row_w, star_w),
            Anchor::Center,
        );
        for s in 0..MAX_STARS {
            let color = if s < earned { palette.gold } else { palette.border };
            let x0 = area.x + s as u32 * (star_w + STAR_GAP);
            for (row, bits) in STAR.iter().enumerate() {
                for col in 0..STAR.len() as u32 {
                    if bits & (0x40 >> col) != 0 {
                        r.fill_rect(
                            Rect::new(
                                x0 + col * STAR_CELL,
                                area.y + row as u32 * STAR_CELL,
                                STAR_CELL,
                                STAR_CELL,
                            ),
                            color,
                        );
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(lives_left: u32) -> RunSummary {
        RunSummary {
            waves_cleared: 10,
            total_waves: 10,
            lives_left,
            max_lives: 20,
            gold_earned: 1500,
            enemies_defeated: 240,
            reward: 3,
        }
    }

    #[test]
    fn star_rating_scales_with_lives_kept() {
        assert_eq!(star_rating(&summary(20)), 3);
        assert_eq!(star_rating(&summary(10)), 2);
        assert_eq!(star_rating(&summary(9)), 1);
    }

    #[test]
    fn lines_reveal_one_interval_at_a_time() {
        let mut screen = VictoryScreen::new(&UiConfig {
            victory_reveal_interval_s: 0.25,
            ..UiConfig::default()
        });
        screen.show(summary(20));
        assert_eq!(screen.revealed(), 0);
        screen.update(None, Duration::from_millis(600));
        assert_eq!(screen.revealed(), 2);
        screen.update(None, Duration::from_secs(5));
        assert!(screen.is_fully_revealed());
    }

    #[test]
    fn first_click_skips_the_reveal_then_buttons_work() {
        let mut screen = VictoryScreen::new(&UiConfig::default());
        screen.show(summary(5));
        let (x, y) = screen.layout().play_again_button.center();
        assert_eq!(screen.handle_click(x, y), None);
        assert!(screen.is_fully_revealed());
        assert_eq!(screen.handle_click(x, y), Some(VictoryAction::PlayAgain));
    }

    #[test]
    fn summary_lines_format_totals() {
        let lines = summary_lines(&summary(7));
        assert_eq!(lines[0].1, "10/10");
        assert_eq!(lines[1].1, "7/20");
        assert_eq!(lines[4].1, "+3");
    }
}
