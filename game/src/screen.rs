#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsOrigin {
    #[default]
    MainMenu,
    Pause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    MainMenu,
    Playing {
        paused: bool,
    },
    Settings {
        origin: SettingsOrigin,
    },
    SkillTree,
    Victory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenEvent {
    StartRun,
    OpenSkillTree,
    OpenSettings,
    /// Escape key or a BACK button.
    Back,
    TogglePause,
    Restart,
    ExitToMenu,
    Victory,
    Defeat,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenEffect {
    None,
    StartRun,
    EndRun,
    SetPaused(bool),
    Quit,
}

impl Screen {
    /// Pure transition function for the scene state machine.
    ///
    /// Host-side consequences (starting a run, pausing the simulation) are reported as
    /// `ScreenEffect` so callers stay deterministic and easy to test.
    pub fn handle(self, event: ScreenEvent) -> (Screen, ScreenEffect) {
        use ScreenEvent as E;
        match (self, event) {
            (Screen::MainMenu, E::StartRun) => (Screen::Playing { paused: false }, ScreenEffect::StartRun),
            (Screen::MainMenu, E::OpenSkillTree) => (Screen::SkillTree, ScreenEffect::None),
            (Screen::MainMenu, E::OpenSettings) => (
                Screen::Settings {
                    origin: SettingsOrigin::MainMenu,
                },
                ScreenEffect::None,
            ),
            (Screen::MainMenu, E::Quit) => (Screen::MainMenu, ScreenEffect::Quit),

            (Screen::Playing { paused }, E::TogglePause | E::Back) => (
                Screen::Playing { paused: !paused },
                ScreenEffect::SetPaused(!paused),
            ),
            (Screen::Playing { paused: true }, E::OpenSettings) => (
                Screen::Settings {
                    origin: SettingsOrigin::Pause,
                },
                ScreenEffect::None,
            ),
            (Screen::Playing { paused: true }, E::Restart) => {
                (Screen::Playing { paused: false }, ScreenEffect::StartRun)
            }
            (Screen::Playing { paused: true }, E::ExitToMenu) => (Screen::MainMenu, ScreenEffect::EndRun),
            (Screen::Playing { .. }, E::Victory) => (Screen::Victory, ScreenEffect::None),
            (Screen::Playing { .. }, E::Defeat) => (Screen::MainMenu, ScreenEffect::EndRun),

            (Screen::Settings { origin: SettingsOrigin::MainMenu }, E::Back) => {
                (Screen::MainMenu, ScreenEffect::None)
            }
            (Screen::Settings { origin: SettingsOrigin::Pause }, E::Back) => {
                (Screen::Playing { paused: true }, ScreenEffect::None)
            }

            (Screen::SkillTree, E::Back) => (Screen::MainMenu, ScreenEffect::None),
            (Screen::SkillTree, E::StartRun) => (Screen::Playing { paused: false }, ScreenEffect::StartRun),

            (Screen::Victory, E::StartRun | E::Restart) => {
                (Screen::Playing { paused: false }, ScreenEffect::StartRun)
            }
            (Screen::Victory, E::OpenSkillTree) => (Screen::SkillTree, ScreenEffect::EndRun),
            (Screen::Victory, E::ExitToMenu | E::Back) => (Screen::MainMenu, ScreenEffect::EndRun),

            // Ignore irrelevant events in the current state.
            (state, _) => (state, ScreenEffect::None),
        }
    }

    pub fn is_playing(self) -> bool {
        matches!(self, Screen::Playing { paused: false })
    }

    pub fn is_paused(self) -> bool {
        matches!(self, Screen::Playing { paused: true })
    }

    /// Whether the in-run HUD and side panel are visible, possibly underneath an overlay.
    pub fn shows_run(self) -> bool {
        matches!(
            self,
            Screen::Playing { .. }
                | Screen::Victory
                | Screen::Settings {
                    origin: SettingsOrigin::Pause
                }
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Screen::MainMenu => "main menu",
            Screen::Playing { paused: false } => "playing",
            Screen::Playing { paused: true } => "paused",
            Screen::Settings { .. } => "settings",
            Screen::SkillTree => "skill tree",
            Screen::Victory => "victory",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_screen_is_main_menu() {
        assert_eq!(Screen::default(), Screen::MainMenu);
    }

    #[test]
    fn play_from_main_menu_starts_a_run() {
        assert_eq!(
            Screen::MainMenu.handle(ScreenEvent::StartRun),
            (Screen::Playing { paused: false }, ScreenEffect::StartRun)
        );
    }

    #[test]
    fn escape_and_pause_button_toggle_pause() {
        for event in [ScreenEvent::Back, ScreenEvent::TogglePause] {
            assert_eq!(
                Screen::Playing { paused: false }.handle(event),
                (Screen::Playing { paused: true }, ScreenEffect::SetPaused(true))
            );
            assert_eq!(
                Screen::Playing { paused: true }.handle(event),
                (Screen::Playing { paused: false }, ScreenEffect::SetPaused(false))
            );
        }
    }

    #[test]
    fn settings_return_to_where_they_were_opened() {
        let (from_menu, _) = Screen::MainMenu.handle(ScreenEvent::OpenSettings);
        assert_eq!(
            from_menu.handle(ScreenEvent::Back),
            (Screen::MainMenu, ScreenEffect::None)
        );

        let (from_pause, _) = Screen::Playing { paused: true }.handle(ScreenEvent::OpenSettings);
        assert!(from_pause.shows_run());
        assert_eq!(
            from_pause.handle(ScreenEvent::Back),
            (Screen::Playing { paused: true }, ScreenEffect::None)
        );
    }

    #[test]
    fn settings_cannot_open_while_the_run_is_live() {
        assert_eq!(
            Screen::Playing { paused: false }.handle(ScreenEvent::OpenSettings),
            (Screen::Playing { paused: false }, ScreenEffect::None)
        );
    }

    #[test]
    fn pause_menu_can_restart_or_leave_the_run() {
        assert_eq!(
            Screen::Playing { paused: true }.handle(ScreenEvent::Restart),
            (Screen::Playing { paused: false }, ScreenEffect::StartRun)
        );
        assert_eq!(
            Screen::Playing { paused: true }.handle(ScreenEvent::ExitToMenu),
            (Screen::MainMenu, ScreenEffect::EndRun)
        );
    }

    #[test]
    fn victory_offers_skill_tree_replay_and_menu() {
        let (victory, _) = Screen::Playing { paused: false }.handle(ScreenEvent::Victory);
        assert_eq!(victory, Screen::Victory);
        assert_eq!(
            victory.handle(ScreenEvent::OpenSkillTree),
            (Screen::SkillTree, ScreenEffect::EndRun)
        );
        assert_eq!(
            victory.handle(ScreenEvent::StartRun),
            (Screen::Playing { paused: false }, ScreenEffect::StartRun)
        );
        assert_eq!(
            victory.handle(ScreenEvent::ExitToMenu),
            (Screen::MainMenu, ScreenEffect::EndRun)
        );
    }

    #[test]
    fn defeat_ends_the_run() {
        assert_eq!(
            Screen::Playing { paused: false }.handle(ScreenEvent::Defeat),
            (Screen::MainMenu, ScreenEffect::EndRun)
        );
    }

    #[test]
    fn quit_is_only_honored_from_the_main_menu() {
        assert_eq!(
            Screen::MainMenu.handle(ScreenEvent::Quit),
            (Screen::MainMenu, ScreenEffect::Quit)
        );
        assert_eq!(
            Screen::SkillTree.handle(ScreenEvent::Quit),
            (Screen::SkillTree, ScreenEffect::None)
        );
    }

    #[test]
    fn back_from_skill_tree_returns_to_main_menu() {
        assert_eq!(
            Screen::SkillTree.handle(ScreenEvent::Back),
            (Screen::MainMenu, ScreenEffect::None)
        );
    }
}
