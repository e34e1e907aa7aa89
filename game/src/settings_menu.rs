//! Settings screen: volume sliders, on/off toggles, style cycling, reset and back.
//!
//! The menu edits its own copy of `PlayerSettings`; the owner reads it back through `settings()`
//! after any action and decides when to persist.

use engine::controls::{Control, ControlId, ControlSet};
use engine::graphics::{Renderer2d, text_height};
use engine::slider::Slider;
use engine::ui::{Anchor, Insets, Rect, Size};

use crate::config::UiConfig;
use crate::palette::{PALETTES, Palette};
use crate::settings::PlayerSettings;
use crate::widgets::{ButtonVisual, draw_button, draw_panel, draw_text_centered};

const MARGIN: u32 = 32;
const PAD: u32 = 18;
const ROW_H: u32 = 28;
const ROW_GAP: u32 = 6;
const LABEL_W: u32 = 170;
const VALUE_W: u32 = 56;
const TOGGLE_W: u32 = 80;
const FOOTER_H: u32 = 40;
const THUMB_W: u32 = 10;
const THUMB_H: u32 = 20;
const TRACK_H: u32 = 6;
const VOLUME_STEP: f32 = 0.05;

const ID_STYLE: ControlId = ControlId(1);
const ID_RESET: ControlId = ControlId(2);
const ID_BACK: ControlId = ControlId(3);
const ID_TOGGLE_BASE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeChannel {
    Master,
    Music,
    Sfx,
}

impl VolumeChannel {
    pub const ALL: [VolumeChannel; 3] = [VolumeChannel::Master, VolumeChannel::Music, VolumeChannel::Sfx];

    pub fn label(self) -> &'static str {
        match self {
            VolumeChannel::Master => "MASTER VOLUME",
            VolumeChannel::Music => "MUSIC",
            VolumeChannel::Sfx => "EFFECTS",
        }
    }

    fn get(self, settings: &PlayerSettings) -> f32 {
        match self {
            VolumeChannel::Master => settings.audio.master_volume,
            VolumeChannel::Music => settings.audio.music_volume,
            VolumeChannel::Sfx => settings.audio.sfx_volume,
        }
    }

    fn set(self, settings: &mut PlayerSettings, value: f32) {
        let slot = match self {
            VolumeChannel::Master => &mut settings.audio.master_volume,
            VolumeChannel::Music => &mut settings.audio.music_volume,
            VolumeChannel::Sfx => &mut settings.audio.sfx_volume,
        };
        *slot = value.clamp(0.0, 1.0);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingToggle {
    Mute,
    Fullscreen,
    ShowFps,
    DamageNumbers,
    ScreenShake,
    PixelCursor,
    AutoStartWaves,
}

impl SettingToggle {
    pub const ALL: [SettingToggle; 7] = [
        SettingToggle::Mute,
        SettingToggle::Fullscreen,
        SettingToggle::ShowFps,
        SettingToggle::DamageNumbers,
        SettingToggle::ScreenShake,
        SettingToggle::PixelCursor,
        SettingToggle::AutoStartWaves,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SettingToggle::Mute => "MUTE ALL",
            SettingToggle::Fullscreen => "FULLSCREEN",
            SettingToggle::ShowFps => "SHOW FPS",
            SettingToggle::DamageNumbers => "DAMAGE NUMBERS",
            SettingToggle::ScreenShake => "SCREEN SHAKE",
            SettingToggle::PixelCursor => "PIXEL CURSOR",
            SettingToggle::AutoStartWaves => "AUTO WAVES",
        }
    }

    pub fn get(self, settings: &PlayerSettings) -> bool {
        match self {
            SettingToggle::Mute => settings.audio.mute_all,
            SettingToggle::Fullscreen => settings.video.fullscreen,
            SettingToggle::ShowFps => settings.video.show_fps,
            SettingToggle::DamageNumbers => settings.gameplay.damage_numbers,
            SettingToggle::ScreenShake => settings.video.screen_shake,
            SettingToggle::PixelCursor => settings.interface.pixel_cursor,
            SettingToggle::AutoStartWaves => settings.gameplay.auto_start_waves,
        }
    }

    fn flip(self, settings: &mut PlayerSettings) {
        let slot = match self {
            SettingToggle::Mute => &mut settings.audio.mute_all,
            SettingToggle::Fullscreen => &mut settings.video.fullscreen,
            SettingToggle::ShowFps => &mut settings.video.show_fps,
            SettingToggle::DamageNumbers => &mut settings.gameplay.damage_numbers,
            SettingToggle::ScreenShake => &mut settings.video.screen_shake,
            SettingToggle::PixelCursor => &mut settings.interface.pixel_cursor,
            SettingToggle::AutoStartWaves => &mut settings.gameplay.auto_start_waves,
        };
        *slot = !*slot;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuButton {
    Toggle(SettingToggle),
    CycleStyle,
    Reset,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettingsAction {
    Volume(VolumeChannel, f32),
    Toggle(SettingToggle, bool),
    CycleStyle(usize),
    Reset,
    Back,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsLayout {
    pub panel: Rect,
    pub title: Rect,
    pub slider_rows: Vec<Rect>,
    pub toggle_rows: Vec<Rect>,
    pub style_row: Rect,
    pub reset_button: Rect,
    pub back_button: Rect,
}

#[derive(Debug, Clone)]
pub struct SettingsMenu {
    settings: PlayerSettings,
    layout: SettingsLayout,
    controls: ControlSet<MenuButton>,
    sliders: Vec<(VolumeChannel, Slider)>,
    dragging: Option<VolumeChannel>,
    scale: u32,
}

impl SettingsMenu {
    pub fn new(config: &UiConfig, settings: PlayerSettings) -> Self {
        let mut menu = Self {
            settings,
            layout: SettingsLayout::default(),
            controls: ControlSet::new(),
            sliders: Vec::new(),
            dragging: None,
            scale: config.text_scale,
        };
        menu.resize(config.screen_width, config.screen_height);
        menu
    }

    pub fn settings(&self) -> &PlayerSettings {
        &self.settings
    }

    /// Replaces the edited copy, e.g. when the screen is reopened.
    pub fn set_settings(&mut self, settings: PlayerSettings) {
        self.settings = settings;
        self.dragging = None;
        self.sync_sliders();
        self.rebuild_controls();
    }

    pub fn layout(&self) -> &SettingsLayout {
        &self.layout
    }

    pub fn slider(&self, channel: VolumeChannel) -> Option<&Slider> {
        self.sliders.iter().find(|(c, _)| *c == channel).map(|(_, s)| s)
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        let screen = Rect::from_size(width, height);
        let safe = screen.inset(Insets::all(MARGIN));
        self.sliders.clear();
        if safe.is_empty() {
            self.layout = SettingsLayout::default();
            self.controls.clear();
            return;
        }

        let rows = VolumeChannel::ALL.len() + SettingToggle::ALL.len() + 1;
        let title_h = text_height(self.scale * 2) + PAD;
        let body_h = rows as u32 * (ROW_H + ROW_GAP);
        let panel_size = Size::new(560, PAD * 2 + title_h + body_h + FOOTER_H).clamp_max(safe.size());
        let panel = safe.place(panel_size, Anchor::Center);
        let content = panel.inset(Insets::all(PAD));
        let title = Rect::new(content.x, content.y, content.w, title_h.min(content.h));

        let body = Rect::new(
            content.x,
            title.bottom(),
            content.w,
            content.h.saturating_sub(title.h + FOOTER_H),
        );
        let mut all_rows = body.split_rows(rows, ROW_H, ROW_GAP).into_iter();
        let slider_rows: Vec<Rect> = all_rows.by_ref().take(VolumeChannel::ALL.len()).collect();
        let toggle_rows: Vec<Rect> = all_rows.by_ref().take(SettingToggle::ALL.len()).collect();
        let style_row = all_rows.next().unwrap_or_default();

        let footer = Rect::new(
            content.x,
            content.bottom().saturating_sub(FOOTER_H),
            content.w,
            FOOTER_H,
        );
        let half = footer.w.saturating_sub(PAD) / 2;
        let reset_button = Rect::new(footer.x, footer.y, half, footer.h);
        let back_button = Rect::new(footer.right().saturating_sub(half), footer.y, half, footer.h);

        for (channel, row) in VolumeChannel::ALL.iter().zip(&slider_rows) {
            let track_w = row.w.saturating_sub(LABEL_W + VALUE_W);
            let track = Rect::new(
                row.x.saturating_add(LABEL_W),
                row.y + row.h.saturating_sub(TRACK_H) / 2,
                track_w,
                TRACK_H,
            );
            let slider = Slider::new(track, 0.0, 1.0, channel.get(&self.settings)).with_step(VOLUME_STEP);
            self.sliders.push((*channel, slider));
        }

        self.layout = SettingsLayout {
            panel,
            title,
            slider_rows,
            toggle_rows,
            style_row,
            reset_button,
            back_button,
        };
        self.rebuild_controls();
    }

    fn sync_sliders(&mut self) {
        for (channel, slider) in &mut self.sliders {
            slider.set_value(channel.get(&self.settings));
        }
    }

    fn rebuild_controls(&mut self) {
        self.controls.clear();
        for (i, (toggle, row)) in SettingToggle::ALL.iter().zip(&self.layout.toggle_rows).enumerate() {
            self.controls.push(
                Control::new(
                    ControlId(ID_TOGGLE_BASE + i as u32),
                    value_cell(*row, TOGGLE_W),
                    MenuButton::Toggle(*toggle),
                )
                .selected(toggle.get(&self.settings)),
            );
        }
        if !self.layout.style_row.is_empty() {
            self.controls.push(Control::new(
                ID_STYLE,
                value_cell(self.layout.style_row, TOGGLE_W * 2),
                MenuButton::CycleStyle,
            ));
        }
        self.controls
            .push(Control::new(ID_RESET, self.layout.reset_button, MenuButton::Reset));
        self.controls
            .push(Control::new(ID_BACK, self.layout.back_button, MenuButton::Back));
    }

    /// Starts a slider drag when the press lands on a track. Returns whether it did.
    pub fn press(&mut self, x: u32, y: u32) -> bool {
        self.controls.press(x, y);
        for (channel, slider) in &mut self.sliders {
            if slider.begin_drag(x, y, THUMB_H) {
                channel.set(&mut self.settings, slider.value());
                self.dragging = Some(*channel);
                return true;
            }
        }
        false
    }

    pub fn update(&mut self, pointer: Option<(u32, u32)>) {
        self.controls.update_hover(pointer);
        let (Some(channel), Some((x, _))) = (self.dragging, pointer) else {
            return;
        };
        if let Some((_, slider)) = self.sliders.iter_mut().find(|(c, _)| *c == channel) {
            if slider.drag_to(x) {
                channel.set(&mut self.settings, slider.value());
            }
        }
    }

    /// Whether an enabled control is under the pointer.
    pub fn is_hovering(&self) -> bool {
        self.controls.hovered().is_some()
    }

    /// Completes a press. A finished slider drag reports the final volume; otherwise the button
    /// under the pointer is activated.
    pub fn handle_click(&mut self, x: u32, y: u32) -> Option<SettingsAction> {
        self.controls.cancel_press();
        if let Some(channel) = self.dragging.take() {
            let (_, slider) = self.sliders.iter_mut().find(|(c, _)| *c == channel)?;
            slider.drag_to(x);
            slider.end_drag();
            let value = slider.value();
            channel.set(&mut self.settings, value);
            return Some(SettingsAction::Volume(channel, value));
        }

        let button = self.controls.click(x, y)?;
        let action = match button {
            MenuButton::Toggle(toggle) => {
                toggle.flip(&mut self.settings);
                SettingsAction::Toggle(toggle, toggle.get(&self.settings))
            }
            MenuButton::CycleStyle => {
                let next = (self.settings.interface.style_index + 1) % PALETTES.len();
                self.settings.interface.style_index = next;
                SettingsAction::CycleStyle(next)
            }
            MenuButton::Reset => {
                self.settings = PlayerSettings::default();
                self.sync_sliders();
                SettingsAction::Reset
            }
            MenuButton::Back => SettingsAction::Back,
        };
        self.rebuild_controls();
        log::debug!("settings action {action:?}");
        Some(action)
    }

    pub fn draw(&self, r: &mut dyn Renderer2d, palette: &Palette) {
        let l = &self.layout;
        if l.panel.is_empty() {
            return;
        }
        let scale = self.scale;
        draw_panel(r, l.panel, palette);
        draw_text_centered(r, l.title, "SETTINGS", palette.highlight, scale * 2);

        for ((channel, slider), row) in self.sliders.iter().zip(&l.slider_rows) {
            draw_row_label(r, *row, channel.label(), palette, scale);
            r.fill_rect(slider.track, palette.panel_alt);
            let filled = slider.thumb_center_x().saturating_sub(slider.track.x);
            r.fill_rect(
                Rect::new(slider.track.x, slider.track.y, filled, slider.track.h),
                palette.accent,
            );
            r.rect_outline(slider.track, palette.border);
            let thumb_color = if slider.is_dragging() {
                palette.highlight
            } else {
                palette.text
            };
            r.fill_rect(slider.thumb_rect(THUMB_W, THUMB_H), thumb_color);

            let pct = format!("{}%", (slider.value() * 100.0).round() as u32);
            let value_rect = Rect::new(row.right().saturating_sub(VALUE_W), row.y, VALUE_W, row.h);
            draw_text_centered(r, value_rect, &pct, palette.muted, scale);
        }

        for (toggle, row) in SettingToggle::ALL.iter().zip(&l.toggle_rows) {
            draw_row_label(r, *row, toggle.label(), palette, scale);
        }
        if !l.style_row.is_empty() {
            draw_row_label(r, l.style_row, "STYLE", palette, scale);
        }

        for control in self.controls.iter() {
            let visual = ButtonVisual::of(&self.controls, control);
            let label = match control.action {
                MenuButton::Toggle(toggle) => {
                    if toggle.get(&self.settings) { "ON" } else { "OFF" }
                }
                MenuButton::CycleStyle => PALETTES[self.settings.interface.style_index % PALETTES.len()].name,
                MenuButton::Reset => "RESET",
                MenuButton::Back => "BACK",
            };
            draw_button(r, control.rect(), label, palette, visual, scale);
        }
    }
}

fn value_cell(row: Rect, w: u32) -> Rect {
    row.place(Size::new(w, row.h), Anchor::CenterRight)
}

fn draw_row_label(r: &mut dyn Renderer2d, row: Rect, label: &str, palette: &Palette, scale: u32) {
    let ty = row.y + row.h.saturating_sub(text_height(scale)) / 2;
    r.draw_text_scaled(row.x, ty, label, palette.text, scale);
}
