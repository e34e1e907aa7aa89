//! Host-facing owner of every UI module.
//!
//! The host feeds input, a `GameSnapshot` and the skill-tree store in; `UiLayer` routes them to
//! whichever screen is active and hands `UiCommand`s back. Nothing in here mutates the game
//! systems except skill-node allocation, which goes through `SkillTreeData::try_allocate`.

use std::time::Duration;

use engine::graphics::{Renderer2d, line_advance_y, text_width};

use crate::config::UiConfig;
use crate::cursor::{CursorKind, PixelCursor};
use crate::events::{EventBus, GameEvent, forward};
use crate::hud::{Hud, HudAction};
use crate::main_menu::{MainMenu, MainMenuAction};
use crate::palette::{Palette, StyleSelection};
use crate::panel::{PanelAction, SidePanel};
use crate::pause_menu::{PauseAction, PauseMenu};
use crate::screen::{Screen, ScreenEffect, ScreenEvent, SettingsOrigin};
use crate::settings::PlayerSettings;
use crate::settings_menu::{SettingsAction, SettingsMenu};
use crate::skilltree_view::{SkillTreeAction, SkillTreeView};
use crate::tooltip::Tooltip;
use crate::victory::{VictoryAction, VictoryScreen};
use crate::widgets::dim_screen;
use crate::world::{GameSnapshot, SkillTreeData};

const FPS_SMOOTHING: f32 = 0.1;

/// Requests for the host game, in the order they should be applied.
#[derive(Debug, Clone, PartialEq)]
pub enum UiCommand {
    /// Begin a fresh, unpaused run.
    StartRun,
    EndRun,
    StartWave,
    SetSpeed(u32),
    SetPaused(bool),
    /// A tower type was armed for placement.
    SelectBuild(String),
    ClearBuild,
    PlaceBuild { tower: String, x: u32, y: u32 },
    /// Click on the playfield with nothing armed: select whatever is there, or deselect.
    WorldClick { x: u32, y: u32 },
    Upgrade(usize),
    Sell,
    /// Skill-tree currency earned by a won run.
    GrantReward(u32),
    Quit,
    SaveSettings(PlayerSettings),
}

pub struct UiLayer {
    screen: Screen,
    hud: Hud,
    panel: SidePanel,
    tooltip: Tooltip,
    settings_menu: SettingsMenu,
    skilltree: SkillTreeView,
    main_menu: MainMenu,
    pause_menu: PauseMenu,
    victory: VictoryScreen,
    cursor: PixelCursor,
    bus: EventBus,
    style: StyleSelection,
    settings: PlayerSettings,
    scale: u32,
    pointer: Option<(u32, u32)>,
    frame_time_s: f32,
    skilltree_needs_activation: bool,
}

impl UiLayer {
    pub fn new(config: &UiConfig, settings: PlayerSettings) -> Self {
        let settings = settings.sanitized();
        let mut cursor = PixelCursor::new(config.cursor_scale);
        cursor.set_system_preferred(!settings.interface.pixel_cursor);
        Self {
            screen: Screen::default(),
            hud: Hud::new(config),
            panel: SidePanel::new(config),
            tooltip: Tooltip::new(config),
            settings_menu: SettingsMenu::new(config, settings.clone()),
            skilltree: SkillTreeView::new(config),
            main_menu: MainMenu::new(config),
            pause_menu: PauseMenu::new(config),
            victory: VictoryScreen::new(config),
            cursor,
            bus: EventBus::new(),
            style: StyleSelection::new(settings.interface.style_index),
            settings,
            scale: config.text_scale,
            pointer: None,
            frame_time_s: 0.0,
            skilltree_needs_activation: false,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn settings(&self) -> &PlayerSettings {
        &self.settings
    }

    pub fn palette(&self) -> &'static Palette {
        self.style.palette()
    }

    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    pub fn panel(&self) -> &SidePanel {
        &self.panel
    }

    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    pub fn main_menu(&self) -> &MainMenu {
        &self.main_menu
    }

    pub fn pause_menu(&self) -> &PauseMenu {
        &self.pause_menu
    }

    pub fn settings_menu(&self) -> &SettingsMenu {
        &self.settings_menu
    }

    pub fn skilltree(&self) -> &SkillTreeView {
        &self.skilltree
    }

    pub fn victory(&self) -> &VictoryScreen {
        &self.victory
    }

    pub fn cursor(&self) -> &PixelCursor {
        &self.cursor
    }

    /// The bus game systems publish into. Events are delivered by `dispatch_events`.
    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub fn publish(&mut self, event: GameEvent) {
        self.bus.publish(event);
    }

    /// Smoothed frames per second, 0 before the first timed frame.
    pub fn fps(&self) -> u32 {
        if self.frame_time_s <= 0.0 {
            0
        } else {
            (1.0 / self.frame_time_s).round() as u32
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        log::debug!("ui resize {width}x{height}");
        self.hud.resize(width, height);
        self.panel.resize(width, height);
        self.settings_menu.resize(width, height);
        self.skilltree.resize(width, height);
        self.main_menu.resize(width, height);
        self.pause_menu.resize(width, height);
        self.victory.resize(width, height);
        self.tooltip.hide();
    }

    /// Left button went down. Only sliders and the skill-tree camera care about presses; every
    /// other control acts on release through `handle_click`.
    pub fn press(&mut self, x: u32, y: u32) {
        match self.screen {
            Screen::Settings { .. } => {
                self.settings_menu.press(x, y);
            }
            Screen::SkillTree => self.skilltree.press(x, y),
            _ => {}
        }
    }

    pub fn scroll(&mut self, x: u32, y: u32, amount: f32) {
        if self.screen == Screen::SkillTree {
            self.skilltree.scroll(x, y, amount);
        }
    }

    pub fn update(
        &mut self,
        pointer: Option<(u32, u32)>,
        dt: Duration,
        snapshot: &GameSnapshot<'_>,
        skills: &dyn SkillTreeData,
    ) {
        self.pointer = pointer;
        let dt_s = dt.as_secs_f32();
        if dt_s > 0.0 {
            self.frame_time_s = if self.frame_time_s <= 0.0 {
                dt_s
            } else {
                self.frame_time_s + (dt_s - self.frame_time_s) * FPS_SMOOTHING
            };
        }

        if self.skilltree_needs_activation && self.screen == Screen::SkillTree {
            self.skilltree.activate(skills);
            self.skilltree_needs_activation = false;
        }

        // HUD and panel keep animating under overlays but only track the pointer while live.
        if self.screen.shows_run() {
            let run_pointer = if self.screen.is_playing() { pointer } else { None };
            self.hud.update(run_pointer, dt, snapshot);
            self.panel.update(run_pointer, dt, snapshot);
        }

        match self.screen {
            Screen::MainMenu => self.main_menu.update(pointer, dt),
            Screen::Playing { paused: true } => self.pause_menu.update(pointer),
            Screen::Settings { .. } => self.settings_menu.update(pointer),
            Screen::SkillTree => self.skilltree.update(pointer, dt, skills),
            Screen::Victory => self.victory.update(pointer, dt),
            Screen::Playing { paused: false } => {}
        }

        let hover = match self.screen {
            Screen::Playing { paused: false } => self.panel.hover_tooltip(),
            Screen::SkillTree => self.skilltree.hover_tooltip(skills),
            _ => None,
        };
        match hover {
            Some((content, at)) => self.tooltip.show(content, at),
            None => self.tooltip.hide(),
        }
        self.tooltip.update(pointer, dt);

        self.cursor.update(pointer);
        let kind = self.cursor_kind();
        self.cursor.set_kind(kind);
    }

    fn cursor_kind(&self) -> CursorKind {
        let hovering = match self.screen {
            Screen::MainMenu => self.main_menu.is_hovering(),
            Screen::Playing { paused: false } => {
                if self.hud.is_hovering() || self.panel.is_hovering() {
                    true
                } else if self.panel.selected_build().is_some() && self.pointer_over_world() {
                    return CursorKind::Crosshair;
                } else {
                    false
                }
            }
            Screen::Playing { paused: true } => self.pause_menu.is_hovering(),
            Screen::Settings { .. } => {
                if self.settings_menu.is_dragging() {
                    return CursorKind::Grab;
                }
                self.settings_menu.is_hovering()
            }
            Screen::SkillTree => {
                if self.skilltree.camera().is_dragging() {
                    return CursorKind::Grab;
                }
                self.skilltree.is_hovering()
            }
            Screen::Victory => self.victory.is_hovering(),
        };
        if hovering {
            CursorKind::Pointer
        } else {
            CursorKind::Arrow
        }
    }

    fn pointer_over_world(&self) -> bool {
        self.pointer
            .is_some_and(|(x, y)| !self.hud.contains(x, y) && !self.panel.contains(x, y))
    }

    /// Left button released at `(x, y)`.
    pub fn handle_click(&mut self, x: u32, y: u32, skills: &mut dyn SkillTreeData) -> Vec<UiCommand> {
        let mut commands = Vec::new();
        match self.screen {
            Screen::MainMenu => {
                let event = match self.main_menu.handle_click(x, y) {
                    Some(MainMenuAction::Play) => ScreenEvent::StartRun,
                    Some(MainMenuAction::SkillTree) => ScreenEvent::OpenSkillTree,
                    Some(MainMenuAction::Settings) => ScreenEvent::OpenSettings,
                    Some(MainMenuAction::Quit) => ScreenEvent::Quit,
                    None => return commands,
                };
                self.transition(event, &mut commands);
            }
            Screen::Playing { paused: false } => self.click_run(x, y, &mut commands),
            Screen::Playing { paused: true } => {
                let event = match self.pause_menu.handle_click(x, y) {
                    Some(PauseAction::Resume) => ScreenEvent::TogglePause,
                    Some(PauseAction::Settings) => ScreenEvent::OpenSettings,
                    Some(PauseAction::Restart) => ScreenEvent::Restart,
                    Some(PauseAction::MainMenu) => ScreenEvent::ExitToMenu,
                    None => return commands,
                };
                self.transition(event, &mut commands);
            }
            Screen::Settings { .. } => {
                if let Some(action) = self.settings_menu.handle_click(x, y) {
                    self.apply_settings_action(action, &mut commands);
                }
            }
            Screen::SkillTree => {
                if let Some(SkillTreeAction::Back) =
                    self.skilltree.handle_click(x, y, skills, &mut self.bus)
                {
                    self.transition(ScreenEvent::Back, &mut commands);
                }
            }
            Screen::Victory => {
                let event = match self.victory.handle_click(x, y) {
                    Some(VictoryAction::SkillTree) => ScreenEvent::OpenSkillTree,
                    Some(VictoryAction::PlayAgain) => ScreenEvent::StartRun,
                    Some(VictoryAction::MainMenu) => ScreenEvent::ExitToMenu,
                    None => return commands,
                };
                self.transition(event, &mut commands);
            }
        }
        commands
    }

    fn click_run(&mut self, x: u32, y: u32, commands: &mut Vec<UiCommand>) {
        if self.hud.contains(x, y) {
            match self.hud.handle_click(x, y) {
                Some(HudAction::StartWave) => commands.push(UiCommand::StartWave),
                Some(HudAction::SetSpeed(speed)) => commands.push(UiCommand::SetSpeed(speed)),
                Some(HudAction::TogglePause) => self.transition(ScreenEvent::TogglePause, commands),
                None => {}
            }
            return;
        }
        if self.panel.contains(x, y) {
            match self.panel.handle_click(x, y) {
                Some(PanelAction::SelectBuild(id)) => commands.push(UiCommand::SelectBuild(id)),
                Some(PanelAction::ClearBuild) => commands.push(UiCommand::ClearBuild),
                Some(PanelAction::Upgrade(path)) => commands.push(UiCommand::Upgrade(path)),
                Some(PanelAction::Sell) => commands.push(UiCommand::Sell),
                Some(PanelAction::ToggleExpand) | None => {}
            }
            return;
        }
        match self.panel.selected_build() {
            Some(tower) => commands.push(UiCommand::PlaceBuild {
                tower: tower.to_string(),
                x,
                y,
            }),
            None => commands.push(UiCommand::WorldClick { x, y }),
        }
    }

    fn apply_settings_action(&mut self, action: SettingsAction, commands: &mut Vec<UiCommand>) {
        match action {
            SettingsAction::Back => {
                commands.push(UiCommand::SaveSettings(self.settings.clone()));
                self.transition(ScreenEvent::Back, commands);
            }
            SettingsAction::Volume(..)
            | SettingsAction::Toggle(..)
            | SettingsAction::CycleStyle(_)
            | SettingsAction::Reset => self.adopt_menu_settings(),
        }
    }

    fn adopt_menu_settings(&mut self) {
        let next = self.settings_menu.settings().clone();
        if next == self.settings {
            return;
        }
        if next.interface.style_index != self.style.index() {
            self.style.set(next.interface.style_index);
            self.bus.publish(GameEvent::StyleChanged {
                index: self.style.index(),
            });
        }
        self.cursor.set_system_preferred(!next.interface.pixel_cursor);
        self.settings = next;
        self.bus.publish(GameEvent::SettingsChanged);
    }

    /// Escape key: cancels a pending build first, otherwise steps back one screen.
    pub fn handle_escape(&mut self) -> Vec<UiCommand> {
        let mut commands = Vec::new();
        if self.screen.is_playing() && self.panel.selected_build().is_some() {
            self.panel.clear_build_selection();
            commands.push(UiCommand::ClearBuild);
            return commands;
        }
        if let Screen::Settings { .. } = self.screen {
            self.apply_settings_action(SettingsAction::Back, &mut commands);
            return commands;
        }
        self.transition(ScreenEvent::Back, &mut commands);
        commands
    }

    pub fn toggle_panel(&mut self) {
        if self.screen.is_playing() {
            self.panel.toggle_expanded();
        }
    }

    /// Delivers queued events to the modules subscribed to them.
    pub fn dispatch_events(&mut self) -> Vec<UiCommand> {
        let mut commands = Vec::new();
        let events = self.bus.dispatch();
        forward(&events, &mut self.hud);
        forward(&events, &mut self.panel);
        for event in events {
            match event {
                GameEvent::Victory(summary) => {
                    self.victory.show(summary);
                    if summary.reward > 0 {
                        commands.push(UiCommand::GrantReward(summary.reward));
                    }
                    self.transition(ScreenEvent::Victory, &mut commands);
                }
                GameEvent::Defeat => self.transition(ScreenEvent::Defeat, &mut commands),
                _ => {}
            }
        }
        commands
    }

    fn transition(&mut self, event: ScreenEvent, commands: &mut Vec<UiCommand>) {
        let (next, effect) = self.screen.handle(event);
        if next != self.screen {
            log::debug!("screen {} -> {} on {event:?}", self.screen.name(), next.name());
            self.enter(next);
        }
        let command = match effect {
            ScreenEffect::None => return,
            ScreenEffect::StartRun => {
                self.panel.clear_build_selection();
                UiCommand::StartRun
            }
            ScreenEffect::EndRun => UiCommand::EndRun,
            ScreenEffect::SetPaused(paused) => UiCommand::SetPaused(paused),
            ScreenEffect::Quit => UiCommand::Quit,
        };
        log::debug!("ui command {command:?}");
        commands.push(command);
    }

    fn enter(&mut self, next: Screen) {
        match next {
            Screen::MainMenu => self.main_menu.activate(),
            Screen::SkillTree => self.skilltree_needs_activation = true,
            Screen::Settings { .. } => self.settings_menu.set_settings(self.settings.clone()),
            Screen::Playing { .. } | Screen::Victory => {}
        }
        self.tooltip.hide();
        self.screen = next;
    }

    /// Draws the active screen. Run screens draw over whatever the host rendered for the
    /// playfield; menus and the skill tree fill the frame themselves.
    pub fn draw(&self, r: &mut dyn Renderer2d, snapshot: &GameSnapshot<'_>, skills: &dyn SkillTreeData) {
        let palette = self.style.palette();
        match self.screen {
            Screen::MainMenu => self.main_menu.draw(r, palette),
            Screen::SkillTree => self.skilltree.draw(r, skills, palette),
            Screen::Settings {
                origin: SettingsOrigin::MainMenu,
            } => {
                r.clear(palette.background);
                self.settings_menu.draw(r, palette);
            }
            Screen::Playing { .. }
            | Screen::Victory
            | Screen::Settings {
                origin: SettingsOrigin::Pause,
            } => {
                self.hud.draw(r, snapshot, palette);
                self.panel.draw(r, palette);
                match self.screen {
                    Screen::Playing { paused: true } => self.pause_menu.draw(r, palette),
                    Screen::Victory => self.victory.draw(r, palette),
                    Screen::Settings { .. } => {
                        dim_screen(r, palette);
                        self.settings_menu.draw(r, palette);
                    }
                    _ => {}
                }
            }
        }

        self.tooltip.draw(r, palette);
        if self.settings.video.show_fps {
            self.draw_fps(r, palette);
        }
        self.cursor.draw(r, palette);
    }

    fn draw_fps(&self, r: &mut dyn Renderer2d, palette: &Palette) {
        let label = format!("FPS {}", self.fps());
        let size = r.size();
        let x = size
            .width
            .saturating_sub(text_width(&label, self.scale) + self.scale * 4);
        let y = size.height.saturating_sub(line_advance_y(self.scale) + self.scale * 2);
        r.draw_text_scaled(x, y, &label, palette.muted, self.scale);
    }
}
