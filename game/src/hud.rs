//! Top bar: gold, lives, wave counter and the run controls.

use std::time::Duration;

use engine::controls::{Control, ControlId, ControlSet};
use engine::graphics::{Color, Renderer2d, text_height, text_width};
use engine::ui::{Anchor, Rect, Size};

use crate::config::UiConfig;
use crate::events::{EventKind, EventListener, GameEvent};
use crate::palette::Palette;
use crate::widgets::{ButtonVisual, draw_button, draw_text_centered, mix_color};
use crate::world::GameSnapshot;

const FLASH_S: f32 = 0.6;
const BANNER_S: f32 = 2.2;
const BANNER_FADE_S: f32 = 0.6;
const MARGIN: u32 = 8;
const GAP: u32 = 8;

const ID_NEXT_WAVE: ControlId = ControlId(1);
const ID_SPEED: ControlId = ControlId(2);
const ID_PAUSE: ControlId = ControlId(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudAction {
    StartWave,
    SetSpeed(u32),
    TogglePause,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HudLayout {
    pub bar: Rect,
    pub gold: Rect,
    pub lives: Rect,
    pub wave: Rect,
    pub next_wave_button: Rect,
    pub speed_button: Rect,
    pub pause_button: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Flash {
    remaining: f32,
    gain: bool,
}

#[derive(Debug, Clone)]
pub struct Hud {
    layout: HudLayout,
    controls: ControlSet<HudAction>,
    height: u32,
    scale: u32,
    speed_steps: Vec<u32>,
    next_wave_enabled: bool,
    /// Speed shown on the speed button; the click advances from it.
    speed: u32,
    gold_flash: Option<Flash>,
    lives_flash: Option<Flash>,
    banner: Option<(u32, f32)>,
}

impl Hud {
    pub fn new(config: &UiConfig) -> Self {
        let mut hud = Self {
            layout: HudLayout::default(),
            controls: ControlSet::new(),
            height: config.hud_height,
            scale: config.text_scale,
            speed_steps: config.speed_steps.clone(),
            next_wave_enabled: true,
            speed: config.speed_steps.first().copied().unwrap_or(1),
            gold_flash: None,
            lives_flash: None,
            banner: None,
        };
        hud.resize(config.screen_width, config.screen_height);
        hud
    }

    pub fn layout(&self) -> HudLayout {
        self.layout
    }

    pub fn resize(&mut self, width: u32, _height: u32) {
        let bar = Rect::new(0, 0, width, self.height);
        let button_h = self.height.saturating_sub(12);
        let row = Rect::new(
            bar.x.saturating_add(MARGIN),
            bar.y,
            bar.w.saturating_sub(MARGIN * 2),
            bar.h,
        );

        let pause = row.place(Size::new(48, button_h), Anchor::CenterRight);
        let speed_row = Rect::new(row.x, row.y, pause.x.saturating_sub(row.x + GAP), row.h);
        let speed = speed_row.place(Size::new(56, button_h), Anchor::CenterRight);
        let next_row = Rect::new(row.x, row.y, speed.x.saturating_sub(row.x + GAP), row.h);
        let next = next_row.place(Size::new(150, button_h), Anchor::CenterRight);

        let label_w = 140u32;
        let gold = Rect::new(row.x, row.y, label_w, row.h);
        let lives = Rect::new(gold.right().saturating_add(GAP), row.y, label_w, row.h);
        let wave = Rect::new(lives.right().saturating_add(GAP), row.y, label_w, row.h);

        self.layout = HudLayout {
            bar,
            gold,
            lives,
            wave,
            next_wave_button: next,
            speed_button: speed,
            pause_button: pause,
        };
        self.rebuild_controls();
    }

    fn rebuild_controls(&mut self) {
        let l = self.layout;
        self.controls.clear();
        self.controls.push(
            Control::new(ID_NEXT_WAVE, l.next_wave_button, HudAction::StartWave)
                .enabled(self.next_wave_enabled),
        );
        self.controls.push(Control::new(
            ID_SPEED,
            l.speed_button,
            HudAction::SetSpeed(self.next_speed()),
        ));
        self.controls
            .push(Control::new(ID_PAUSE, l.pause_button, HudAction::TogglePause));
    }

    fn next_speed(&self) -> u32 {
        let steps = &self.speed_steps;
        match steps.iter().position(|s| *s == self.speed) {
            Some(i) => steps[(i + 1) % steps.len()],
            None => steps.first().copied().unwrap_or(1),
        }
    }

    pub fn update(&mut self, pointer: Option<(u32, u32)>, dt: Duration, snapshot: &GameSnapshot<'_>) {
        let enabled = !snapshot.waves.wave_active()
            && snapshot.waves.wave() < snapshot.waves.total_waves();
        if enabled != self.next_wave_enabled || snapshot.speed != self.speed {
            self.next_wave_enabled = enabled;
            self.speed = snapshot.speed;
            self.rebuild_controls();
        }
        self.controls.update_hover(pointer);

        let dt_s = dt.as_secs_f32();
        for flash in [&mut self.gold_flash, &mut self.lives_flash] {
            if let Some(f) = flash {
                f.remaining -= dt_s;
                if f.remaining <= 0.0 {
                    *flash = None;
                }
            }
        }
        if let Some((_, t)) = &mut self.banner {
            *t -= dt_s;
            if *t <= 0.0 {
                self.banner = None;
            }
        }
    }

    /// Whether an enabled control is under the pointer.
    pub fn is_hovering(&self) -> bool {
        self.controls.hovered().is_some()
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        self.layout.bar.contains(x, y)
    }

    pub fn handle_click(&mut self, x: u32, y: u32) -> Option<HudAction> {
        let action = self.controls.click(x, y)?;
        log::debug!("hud action {action:?}");
        Some(action)
    }

    pub fn banner_wave(&self) -> Option<u32> {
        self.banner.map(|(wave, _)| wave)
    }

    pub fn is_gold_flashing(&self) -> bool {
        self.gold_flash.is_some()
    }

    pub fn is_lives_flashing(&self) -> bool {
        self.lives_flash.is_some()
    }

    pub fn draw(&self, r: &mut dyn Renderer2d, snapshot: &GameSnapshot<'_>, palette: &Palette) {
        let l = self.layout;
        let scale = self.scale;
        r.fill_rect(l.bar, palette.panel);
        r.fill_rect(
            Rect::new(l.bar.x, l.bar.bottom().saturating_sub(1), l.bar.w, 1),
            palette.border,
        );

        let ty = l.bar.y + l.bar.h.saturating_sub(text_height(scale)) / 2;
        let icon = text_height(scale);

        let gold_color = flash_color(self.gold_flash, palette.gold, palette);
        r.fill_circle(
            (l.gold.x + icon / 2) as i32,
            (ty + icon / 2) as i32,
            icon / 2,
            palette.gold,
        );
        r.draw_text_scaled(
            l.gold.x + icon + 6,
            ty,
            &format!("{}", snapshot.economy.gold()),
            gold_color,
            scale,
        );

        let lives_color = flash_color(self.lives_flash, palette.lives, palette);
        r.fill_rect(Rect::new(l.lives.x, ty, icon, icon), palette.lives);
        r.draw_text_scaled(
            l.lives.x + icon + 6,
            ty,
            &format!("{}", snapshot.economy.lives()),
            lives_color,
            scale,
        );

        let wave_text = format!(
            "WAVE {}/{}",
            snapshot.waves.wave(),
            snapshot.waves.total_waves()
        );
        r.draw_text_scaled(l.wave.x, ty, &wave_text, palette.text, scale);

        for control in self.controls.iter() {
            let visual = ButtonVisual::of(&self.controls, control);
            let label = match control.id {
                ID_NEXT_WAVE => next_wave_label(snapshot),
                ID_SPEED => format!("{}X", snapshot.speed),
                _ => {
                    if snapshot.paused {
                        ">".to_string()
                    } else {
                        "II".to_string()
                    }
                }
            };
            let visual = ButtonVisual {
                selected: control.id == ID_PAUSE && snapshot.paused,
                ..visual
            };
            draw_button(r, control.rect(), &label, palette, visual, scale);
        }

        self.draw_banner(r, palette);
    }

    fn draw_banner(&self, r: &mut dyn Renderer2d, palette: &Palette) {
        let Some((wave, remaining)) = self.banner else {
            return;
        };
        let alpha = (remaining / BANNER_FADE_S).clamp(0.0, 1.0);
        let s = r.size();
        let scale = self.scale.saturating_mul(2);
        let text = format!("WAVE {wave}");
        let band_h = text_height(scale) + 24;
        let top = self.layout.bar.bottom();
        let area = Rect::new(0, top, s.width, s.height.saturating_sub(top));
        let band = area
            .place(Size::new(text_width(&text, scale) + 64, band_h), Anchor::TopCenter)
            .translate(0, 40);
        r.blend_rect(band, palette.panel, (alpha * 220.0) as u8);
        let color = mix_color(palette.panel, palette.highlight, alpha);
        draw_text_centered(r, band, &text, color, scale);
    }
}

fn next_wave_label(snapshot: &GameSnapshot<'_>) -> String {
    if snapshot.waves.wave_active() {
        return "IN PROGRESS".to_string();
    }
    match snapshot.waves.next_wave_in() {
        Some(s) => format!("NEXT {}S", s.ceil().max(0.0) as u32),
        None => "NEXT WAVE".to_string(),
    }
}

fn flash_color(flash: Option<Flash>, base: Color, palette: &Palette) -> Color {
    match flash {
        Some(f) => {
            let target = if f.gain { palette.ok } else { palette.danger };
            mix_color(base, target, (f.remaining / FLASH_S).clamp(0.0, 1.0))
        }
        None => base,
    }
}

impl EventListener for Hud {
    fn interests(&self) -> &'static [EventKind] {
        &[EventKind::GoldChanged, EventKind::LivesChanged, EventKind::WaveStarted]
    }

    fn on_event(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::GoldChanged { delta, .. } if delta != 0 => {
                self.gold_flash = Some(Flash {
                    remaining: FLASH_S,
                    gain: delta > 0,
                });
            }
            GameEvent::LivesChanged { delta, .. } if delta != 0 => {
                self.lives_flash = Some(Flash {
                    remaining: FLASH_S,
                    gain: delta > 0,
                });
            }
            GameEvent::WaveStarted { wave, .. } => {
                self.banner = Some((wave, BANNER_S));
            }
            _ => {}
        }
    }
}
