use std::time::Duration;

use bastion::config::UiConfig;
use bastion::events::GameEvent;
use bastion::sandbox::SandboxWorld;
use bastion::screen::{Screen, SettingsOrigin};
use bastion::settings::PlayerSettings;
use bastion::skilltree::{NodeState, SkillTreeStore};
use bastion::world::{SkillTreeData, WaveSource};
use bastion::{UiCommand, UiLayer};

const FRAME: Duration = Duration::from_millis(16);

struct Harness {
    ui: UiLayer,
    world: SandboxWorld,
    skills: SkillTreeStore,
}

impl Harness {
    fn new() -> Self {
        let config = UiConfig::default();
        let skills = SkillTreeStore::from_defaults();
        Self {
            ui: UiLayer::new(&config, PlayerSettings::default()),
            world: SandboxWorld::new(&config, skills.run_mods()),
            skills,
        }
    }

    fn frame(&mut self, pointer: Option<(u32, u32)>, dt: Duration) {
        self.ui.update(pointer, dt, &self.world.snapshot(), &self.skills);
    }

    fn click(&mut self, at: (u32, u32)) -> Vec<UiCommand> {
        self.frame(Some(at), FRAME);
        self.ui.press(at.0, at.1);
        let commands = self.ui.handle_click(at.0, at.1, &mut self.skills);
        self.apply(&commands);
        commands
    }

    /// The subset of host wiring these tests rely on.
    fn apply(&mut self, commands: &[UiCommand]) {
        for command in commands {
            match command {
                UiCommand::StartRun => self.world.restart(self.skills.run_mods()),
                UiCommand::StartWave => {
                    self.world.start_wave(self.ui.bus_mut());
                }
                UiCommand::SetSpeed(speed) => self.world.set_speed(*speed),
                UiCommand::SetPaused(paused) => self.world.set_paused(*paused),
                UiCommand::PlaceBuild { tower, x, y } => {
                    self.world.build(tower, (*x, *y), self.ui.bus_mut());
                }
                UiCommand::Upgrade(path) => {
                    self.world.upgrade(*path, self.ui.bus_mut());
                }
                UiCommand::Sell => {
                    self.world.sell(self.ui.bus_mut());
                }
                UiCommand::GrantReward(amount) => self.skills.add_currency(*amount),
                _ => {}
            }
        }
    }

    fn dispatch(&mut self) -> Vec<UiCommand> {
        let commands = self.ui.dispatch_events();
        self.apply(&commands);
        commands
    }

    fn start(&mut self) {
        let play = self.ui.main_menu().layout().play_button.center();
        assert_eq!(self.click(play), vec![UiCommand::StartRun]);
        self.frame(None, FRAME);
    }
}

#[test]
fn hud_buttons_drive_waves_speed_and_pause() {
    let mut h = Harness::new();
    h.start();

    let layout = h.ui.hud().layout();
    assert_eq!(h.click(layout.next_wave_button.center()), vec![UiCommand::StartWave]);
    assert!(h.world.snapshot().waves.wave_active());
    h.dispatch();
    assert_eq!(h.ui.hud().banner_wave(), Some(1));

    assert_eq!(h.click(layout.speed_button.center()), vec![UiCommand::SetSpeed(2)]);
    h.frame(None, FRAME);
    assert_eq!(h.click(layout.speed_button.center()), vec![UiCommand::SetSpeed(3)]);

    assert_eq!(h.click(layout.pause_button.center()), vec![UiCommand::SetPaused(true)]);
    assert!(h.ui.screen().is_paused());
    assert!(h.world.is_paused());
}

#[test]
fn building_then_upgrading_and_selling_through_the_panel() {
    let mut h = Harness::new();
    h.start();

    let arrow_row = h.ui.panel().layout().build_rows[0].center();
    assert_eq!(h.click(arrow_row), vec![UiCommand::SelectBuild("arrow".to_string())]);
    assert_eq!(h.ui.panel().selected_build(), Some("arrow"));

    let placed = h.click((300, 300));
    assert!(matches!(placed.as_slice(), [UiCommand::PlaceBuild { .. }]));
    assert_eq!(h.world.tower_count(), 1);

    // The build's selection event clears the armed build and shows upgrades.
    h.dispatch();
    h.frame(None, FRAME);
    assert!(h.ui.panel().selected_build().is_none());
    let upgrade = h.ui.panel().layout().upgrade_rows[0].center();
    assert_eq!(h.click(upgrade), vec![UiCommand::Upgrade(0)]);
    h.dispatch();
    h.frame(None, FRAME);

    let sell = h.ui.panel().layout().sell_button.expect("sell button").center();
    assert_eq!(h.click(sell), vec![UiCommand::Sell]);
    assert_eq!(h.world.tower_count(), 0);
}

#[test]
fn build_discounts_from_the_skill_tree_reach_the_panel() {
    let mut h = Harness::new();
    h.skills.add_currency(4);
    assert!(h.skills.try_allocate("masons"));
    h.start();

    // TESLA 120 -> 108 and ARROW 50 -> 45 leave 47 gold: enough for a discounted ARROW only.
    assert!(h.world.build("tesla", (200, 450), h.ui.bus_mut()));
    assert!(h.world.build("arrow", (260, 450), h.ui.bus_mut()));
    assert_eq!(h.world.snapshot().economy.gold(), 47);
    h.dispatch();
    h.frame(None, FRAME);
    assert_eq!(h.ui.panel().build_cost(0), Some(45));

    let arrow_row = h.ui.panel().layout().build_rows[0].center();
    h.frame(Some(arrow_row), Duration::from_millis(100));
    h.frame(Some(arrow_row), Duration::from_millis(300));
    let cost = h.ui.tooltip().content().and_then(|c| c.cost).expect("tooltip cost line");
    assert_eq!(cost.amount, 45);
    assert!(cost.affordable);

    assert_eq!(h.click(arrow_row), vec![UiCommand::SelectBuild("arrow".to_string())]);
    let placed = h.click((320, 450));
    assert!(matches!(placed.as_slice(), [UiCommand::PlaceBuild { .. }]));
    assert_eq!(h.world.tower_count(), 3);
    assert_eq!(h.world.snapshot().economy.gold(), 47 - cost.amount);
}

#[test]
fn panel_tooltip_appears_after_the_hover_delay() {
    let mut h = Harness::new();
    h.start();
    let row = h.ui.panel().layout().build_rows[1].center();

    h.frame(Some(row), Duration::from_millis(100));
    assert!(!h.ui.tooltip().is_visible());
    h.frame(Some(row), Duration::from_millis(300));
    assert!(h.ui.tooltip().is_visible());
    assert_eq!(h.ui.tooltip().content().map(|c| c.title.as_str()), Some("CANNON"));

    h.frame(Some((300, 300)), FRAME);
    assert!(!h.ui.tooltip().is_visible());
}

#[test]
fn a_won_run_rewards_currency_that_buys_a_skill() {
    let mut h = Harness::new();
    h.start();
    for _ in 0..10 {
        h.world.start_wave(h.ui.bus_mut());
        h.world.update(Duration::from_secs(13), h.ui.bus_mut());
    }
    let commands = h.dispatch();
    let reward = h.world.summary().reward;
    assert!(reward > 0);
    assert!(commands.contains(&UiCommand::GrantReward(reward)));
    assert_eq!(h.ui.screen(), Screen::Victory);
    assert_eq!(h.skills.currency(), reward);

    // First click only finishes the reveal.
    let to_tree = h.ui.victory().layout().skilltree_button.center();
    assert!(h.click(to_tree).is_empty());
    assert_eq!(h.click(to_tree), vec![UiCommand::EndRun]);
    assert_eq!(h.ui.screen(), Screen::SkillTree);
    h.frame(None, FRAME);

    let target = h
        .skills
        .nodes()
        .iter()
        .find(|n| h.skills.node_state(&n.id) == NodeState::Available && n.cost <= reward)
        .map(|n| (n.id.clone(), n.pos))
        .expect("an affordable node");
    let (sx, sy) = h.ui.skilltree().camera().world_to_screen(target.1);
    let at = (sx.round() as u32, sy.round() as u32);
    assert!(h.click(at).is_empty());
    assert_eq!(h.skills.node_state(&target.0), NodeState::Allocated);
    h.dispatch();

    assert!(h.ui.handle_escape().is_empty());
    assert_eq!(h.ui.screen(), Screen::MainMenu);
}

#[test]
fn defeat_returns_to_the_main_menu() {
    let mut h = Harness::new();
    h.start();
    h.ui.publish(GameEvent::Defeat);
    assert_eq!(h.dispatch(), vec![UiCommand::EndRun]);
    assert_eq!(h.ui.screen(), Screen::MainMenu);
}

#[test]
fn settings_from_pause_return_to_pause_and_save() {
    let mut h = Harness::new();
    h.start();
    assert_eq!(h.ui.handle_escape(), vec![UiCommand::SetPaused(true)]);
    h.frame(None, FRAME);

    let open = h.ui.pause_menu().layout().settings_button.center();
    assert!(h.click(open).is_empty());
    assert_eq!(
        h.ui.screen(),
        Screen::Settings {
            origin: SettingsOrigin::Pause
        }
    );

    // SHOW FPS is the third toggle row.
    let row = h.ui.settings_menu().layout().toggle_rows[2];
    assert!(h.click((row.right() - 10, row.center().1)).is_empty());
    assert!(h.ui.settings().video.show_fps);

    let back = h.ui.settings_menu().layout().back_button.center();
    let commands = h.click(back);
    assert_eq!(h.ui.screen(), Screen::Playing { paused: true });
    match commands.as_slice() {
        [UiCommand::SaveSettings(saved)] => assert!(saved.video.show_fps),
        other => panic!("unexpected commands {other:?}"),
    }
}

#[test]
fn tab_collapses_the_panel_only_while_playing() {
    let mut h = Harness::new();
    h.ui.toggle_panel();
    assert!(h.ui.panel().is_expanded());
    h.start();
    h.ui.toggle_panel();
    assert!(!h.ui.panel().is_expanded());
    assert!(h.ui.panel().layout().build_rows.is_empty());
}
