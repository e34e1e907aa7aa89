//! Minimal in-memory run used by the windowed demo and the tests.
//!
//! There is no pathing: towers sit wherever they were placed, waves are timers, and enemy kills
//! and leaks follow a fixed schedule so runs are reproducible.

use std::time::Duration;

use crate::config::{TowerDef, UiConfig};
use crate::events::{EventBus, GameEvent};
use crate::skilltree::SkillTreeRunMods;
use crate::world::{Economy, GameSnapshot, RunSummary, TowerSelection, UpgradePath, UpgradeSource, WaveSource};

const BASE_GOLD: u32 = 200;
const BASE_LIVES: u32 = 20;
const TOTAL_WAVES: u32 = 10;
const WAVE_SECONDS: f32 = 12.0;
const AUTO_START_SECONDS: f32 = 15.0;
const KILLS_PER_WAVE: u32 = 12;
const BOUNTY: u32 = 6;
const MAX_UPGRADE_LEVEL: u32 = 3;
const SELL_REFUND_PERCENT: u32 = 70;
const UPGRADE_PERCENT_PER_LEVEL: u32 = 25;
const UPGRADE_PATHS: [(&str, &str); 2] = [
    ("DAMAGE", "More damage per hit."),
    ("RANGE", "Reach enemies further away."),
];

#[derive(Debug, Clone, PartialEq, Eq)]
struct PlacedTower {
    tower_id: String,
    pos: (u32, u32),
    name: String,
    base_cost: u32,
    levels: [u32; 2],
    spent: u32,
}

impl PlacedTower {
    fn upgrade_cost(&self, path: usize) -> Option<u32> {
        let level = *self.levels.get(path)?;
        (level < MAX_UPGRADE_LEVEL).then(|| self.base_cost * (level + 1) / 2)
    }
}

#[derive(Debug, Clone)]
pub struct SandboxWorld {
    catalog: Vec<TowerDef>,
    start_speed: u32,
    auto_start: bool,
    mods: SkillTreeRunMods,
    gold: u32,
    lives: u32,
    max_lives: u32,
    wave: u32,
    wave_active: bool,
    wave_elapsed: f32,
    kills_this_wave: u32,
    countdown: Option<f32>,
    speed: u32,
    paused: bool,
    towers: Vec<PlacedTower>,
    selected: Option<usize>,
    gold_earned: u32,
    enemies_defeated: u32,
    finished: bool,
}

impl SandboxWorld {
    pub fn new(config: &UiConfig, mods: SkillTreeRunMods) -> Self {
        let start_speed = config.speed_steps.first().copied().unwrap_or(1);
        Self::fresh(config.towers.clone(), start_speed, false, mods)
    }

    fn fresh(
        catalog: Vec<TowerDef>,
        start_speed: u32,
        auto_start: bool,
        mods: SkillTreeRunMods,
    ) -> Self {
        let max_lives = BASE_LIVES + mods.extra_lives;
        Self {
            catalog,
            start_speed,
            auto_start,
            mods,
            gold: BASE_GOLD + mods.starting_gold,
            lives: max_lives,
            max_lives,
            wave: 0,
            wave_active: false,
            wave_elapsed: 0.0,
            kills_this_wave: 0,
            countdown: None,
            speed: start_speed,
            paused: false,
            towers: Vec::new(),
            selected: None,
            gold_earned: 0,
            enemies_defeated: 0,
            finished: false,
        }
    }

    /// Fresh run with the catalog, starting speed and auto-start choice this world was made with.
    pub fn restart(&mut self, mods: SkillTreeRunMods) {
        let catalog = std::mem::take(&mut self.catalog);
        *self = Self::fresh(catalog, self.start_speed, self.auto_start, mods);
    }

    pub fn auto_start(&self) -> bool {
        self.auto_start
    }

    /// Whether a finished wave counts down into the next one. Turning it off mid-countdown
    /// cancels the countdown; turning it on between waves starts one.
    pub fn set_auto_start(&mut self, auto_start: bool) {
        if auto_start == self.auto_start {
            return;
        }
        self.auto_start = auto_start;
        if !auto_start {
            self.countdown = None;
        } else if self.wave > 0 && !self.wave_active && !self.finished && self.wave < TOTAL_WAVES {
            self.countdown = Some(AUTO_START_SECONDS);
        }
    }

    pub fn snapshot(&self) -> GameSnapshot<'_> {
        GameSnapshot {
            economy: self,
            waves: self,
            upgrades: self,
            speed: self.speed,
            paused: self.paused,
        }
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: u32) {
        self.speed = speed.max(1);
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn tower_count(&self) -> usize {
        self.towers.len()
    }

    fn change_gold(&mut self, delta: i64, bus: &mut EventBus) {
        let next = (self.gold as i64 + delta).max(0) as u32;
        if next == self.gold {
            return;
        }
        let delta = next as i64 - self.gold as i64;
        self.gold = next;
        bus.publish(GameEvent::GoldChanged { gold: next, delta });
    }

    pub fn start_wave(&mut self, bus: &mut EventBus) -> bool {
        if self.finished || self.wave_active || self.wave >= TOTAL_WAVES {
            return false;
        }
        self.wave += 1;
        self.wave_active = true;
        self.wave_elapsed = 0.0;
        self.kills_this_wave = 0;
        self.countdown = None;
        bus.publish(GameEvent::WaveStarted {
            wave: self.wave,
            total: TOTAL_WAVES,
        });
        true
    }

    /// Advances the simulation by `dt` scaled by the speed multiplier.
    pub fn update(&mut self, dt: Duration, bus: &mut EventBus) {
        if self.paused || self.finished {
            return;
        }
        let dt = dt.as_secs_f32() * self.speed as f32;

        if let Some(remaining) = self.countdown {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                self.start_wave(bus);
            } else {
                self.countdown = Some(remaining);
            }
            return;
        }
        if !self.wave_active {
            return;
        }

        self.wave_elapsed += dt;
        let progress = (self.wave_elapsed / WAVE_SECONDS).clamp(0.0, 1.0);
        let due = (progress * KILLS_PER_WAVE as f32).floor() as u32;
        while self.kills_this_wave < due {
            self.kills_this_wave += 1;
            self.enemies_defeated += 1;
            let bounty = BOUNTY + self.wave;
            self.gold_earned += bounty;
            self.change_gold(bounty as i64, bus);
            // Every third wave lets one enemy through halfway.
            if self.wave % 3 == 0 && self.kills_this_wave == KILLS_PER_WAVE / 2 {
                self.lose_life(bus);
            }
        }

        if progress >= 1.0 {
            self.finish_wave(bus);
        }
    }

    fn lose_life(&mut self, bus: &mut EventBus) {
        if self.lives == 0 {
            return;
        }
        self.lives -= 1;
        bus.publish(GameEvent::LivesChanged {
            lives: self.lives,
            delta: -1,
        });
        if self.lives == 0 {
            self.finished = true;
            self.wave_active = false;
            bus.publish(GameEvent::Defeat);
        }
    }

    fn finish_wave(&mut self, bus: &mut EventBus) {
        self.wave_active = false;
        bus.publish(GameEvent::WaveCompleted { wave: self.wave });

        let interest = self.gold * self.mods.interest_percent / 100;
        if interest > 0 {
            self.gold_earned += interest;
            self.change_gold(interest as i64, bus);
        }

        if self.wave >= TOTAL_WAVES {
            self.finished = true;
            bus.publish(GameEvent::Victory(self.summary()));
        } else if self.auto_start {
            self.countdown = Some(AUTO_START_SECONDS);
        }
    }

    pub fn summary(&self) -> RunSummary {
        let cleared = if self.wave_active {
            self.wave.saturating_sub(1)
        } else {
            self.wave
        };
        let base = cleared + self.lives * 3 / self.max_lives.max(1);
        RunSummary {
            waves_cleared: cleared,
            total_waves: TOTAL_WAVES,
            lives_left: self.lives,
            max_lives: self.max_lives,
            gold_earned: self.gold_earned,
            enemies_defeated: self.enemies_defeated,
            reward: base + base * self.mods.reward_percent / 100,
        }
    }

    /// Stat multiplier in percent for an upgrade path at `level`, skill bonuses included.
    fn path_percent(&self, path: usize, level: u32) -> u32 {
        let bonus = match path {
            0 => self.mods.tower_damage_percent,
            _ => self.mods.tower_range_percent,
        };
        100 + bonus + level * UPGRADE_PERCENT_PER_LEVEL
    }

    /// Placed towers as `(tower id, position)` in build order.
    pub fn towers(&self) -> impl Iterator<Item = (&str, (u32, u32))> {
        self.towers.iter().map(|t| (t.tower_id.as_str(), t.pos))
    }

    /// Most recently built tower within `radius` pixels of the point.
    pub fn tower_at(&self, x: u32, y: u32, radius: u32) -> Option<usize> {
        let r = radius as i64;
        self.towers.iter().rposition(|t| {
            let dx = t.pos.0 as i64 - x as i64;
            let dy = t.pos.1 as i64 - y as i64;
            dx * dx + dy * dy <= r * r
        })
    }

    /// Places a tower of `tower_id` at `pos` and selects it.
    pub fn build(&mut self, tower_id: &str, pos: (u32, u32), bus: &mut EventBus) -> bool {
        let Some(def) = self.catalog.iter().find(|t| t.id == tower_id).cloned() else {
            return false;
        };
        let cost = self.build_cost(&def);
        if self.gold < cost {
            return false;
        }
        self.change_gold(-(cost as i64), bus);
        self.towers.push(PlacedTower {
            tower_id: def.id.clone(),
            pos,
            name: def.name.clone(),
            base_cost: def.cost,
            levels: [0; 2],
            spent: cost,
        });
        self.select(self.towers.len() - 1, bus);
        true
    }

    pub fn select(&mut self, index: usize, bus: &mut EventBus) {
        let Some(tower) = self.towers.get(index) else {
            return;
        };
        self.selected = Some(index);
        bus.publish(GameEvent::TowerSelected {
            tower: tower.tower_id.clone(),
        });
    }

    pub fn deselect(&mut self, bus: &mut EventBus) {
        if self.selected.take().is_some() {
            bus.publish(GameEvent::TowerDeselected);
        }
    }

    pub fn upgrade(&mut self, path: usize, bus: &mut EventBus) -> bool {
        let Some(index) = self.selected else {
            return false;
        };
        let Some(cost) = self.towers.get(index).and_then(|t| t.upgrade_cost(path)) else {
            return false;
        };
        if self.gold < cost {
            return false;
        }
        self.change_gold(-(cost as i64), bus);
        let tower = &mut self.towers[index];
        tower.levels[path] += 1;
        tower.spent += cost;
        bus.publish(GameEvent::UpgradePurchased {
            path,
            level: tower.levels[path],
        });
        true
    }

    pub fn sell(&mut self, bus: &mut EventBus) -> bool {
        let Some(index) = self.selected.take() else {
            return false;
        };
        let tower = self.towers.remove(index);
        self.change_gold((tower.spent * SELL_REFUND_PERCENT / 100) as i64, bus);
        bus.publish(GameEvent::TowerDeselected);
        true
    }
}

impl Economy for SandboxWorld {
    fn gold(&self) -> u32 {
        self.gold
    }

    fn lives(&self) -> u32 {
        self.lives
    }

    fn max_lives(&self) -> u32 {
        self.max_lives
    }

    fn build_cost(&self, tower: &TowerDef) -> u32 {
        tower.cost - tower.cost * self.mods.build_discount_percent.min(100) / 100
    }
}

impl WaveSource for SandboxWorld {
    fn wave(&self) -> u32 {
        self.wave
    }

    fn total_waves(&self) -> u32 {
        TOTAL_WAVES
    }

    fn wave_active(&self) -> bool {
        self.wave_active
    }

    fn next_wave_in(&self) -> Option<f32> {
        self.countdown
    }
}

impl UpgradeSource for SandboxWorld {
    fn selected_tower(&self) -> Option<TowerSelection> {
        let tower = self.towers.get(self.selected?)?;
        let paths = UPGRADE_PATHS
            .iter()
            .enumerate()
            .map(|(i, (name, description))| {
                let level = tower.levels[i];
                let now = self.path_percent(i, level);
                let description = if level < MAX_UPGRADE_LEVEL {
                    let next = self.path_percent(i, level + 1);
                    format!("{description} {now}% now, {next}% next.")
                } else {
                    format!("{description} {now}% at max.")
                };
                UpgradePath {
                    name: name.to_string(),
                    description,
                    level,
                    max_level: MAX_UPGRADE_LEVEL,
                    next_cost: tower.upgrade_cost(i),
                }
            })
            .collect();
        Some(TowerSelection {
            tower_id: tower.tower_id.clone(),
            name: tower.name.clone(),
            paths,
            sell_value: tower.spent * SELL_REFUND_PERCENT / 100,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> (SandboxWorld, EventBus) {
        (
            SandboxWorld::new(&UiConfig::default(), SkillTreeRunMods::default()),
            EventBus::new(),
        )
    }

    #[test]
    fn building_spends_gold_and_selects_the_tower() {
        let (mut world, mut bus) = world();
        assert!(world.build("arrow", (300, 300), &mut bus));
        assert_eq!(world.gold(), BASE_GOLD - 50);
        let selection = world.selected_tower().expect("selected");
        assert_eq!(selection.tower_id, "arrow");
        assert_eq!(selection.sell_value, 35);
        assert_eq!(
            bus.dispatch(),
            vec![
                GameEvent::GoldChanged {
                    gold: BASE_GOLD - 50,
                    delta: -50
                },
                GameEvent::TowerSelected {
                    tower: "arrow".to_string()
                },
            ]
        );
    }

    #[test]
    fn towers_are_picked_by_distance_newest_first() {
        let (mut world, mut bus) = world();
        world.build("arrow", (300, 300), &mut bus);
        world.build("arrow", (310, 300), &mut bus);
        assert_eq!(world.tower_at(305, 300, 12), Some(1));
        assert_eq!(world.tower_at(290, 300, 12), Some(0));
        assert_eq!(world.tower_at(600, 600, 12), None);
        assert_eq!(world.towers().count(), 2);
    }

    #[test]
    fn upgrades_stop_at_the_max_level() {
        let (mut world, mut bus) = world();
        world.build("arrow", (300, 300), &mut bus);
        world.gold = 10_000;
        for _ in 0..MAX_UPGRADE_LEVEL {
            assert!(world.upgrade(0, &mut bus));
        }
        assert!(!world.upgrade(0, &mut bus));
        let path = &world.selected_tower().expect("selected").paths[0];
        assert!(path.is_maxed());
    }

    #[test]
    fn selling_refunds_and_deselects() {
        let (mut world, mut bus) = world();
        world.build("cannon", (400, 300), &mut bus);
        bus.clear();
        assert!(world.sell(&mut bus));
        assert_eq!(world.gold(), BASE_GOLD - 90 + 63);
        assert!(world.selected_tower().is_none());
        assert_eq!(world.tower_count(), 0);
    }

    #[test]
    fn a_wave_runs_to_completion_then_counts_down() {
        let (mut world, mut bus) = world();
        world.set_auto_start(true);
        assert!(world.start_wave(&mut bus));
        assert!(!world.start_wave(&mut bus));
        world.update(Duration::from_secs_f32(WAVE_SECONDS + 0.1), &mut bus);
        assert!(!world.wave_active());
        assert_eq!(world.next_wave_in(), Some(AUTO_START_SECONDS));
        assert_eq!(world.summary().enemies_defeated, KILLS_PER_WAVE);
        let events = bus.dispatch();
        assert!(events.contains(&GameEvent::WaveCompleted { wave: 1 }));
    }

    #[test]
    fn without_auto_start_the_next_wave_waits_for_the_player() {
        let (mut world, mut bus) = world();
        world.start_wave(&mut bus);
        world.update(Duration::from_secs_f32(WAVE_SECONDS + 0.1), &mut bus);
        assert_eq!(world.next_wave_in(), None);
        world.update(Duration::from_secs_f32(AUTO_START_SECONDS * 2.0), &mut bus);
        assert_eq!(world.wave(), 1);

        // Switching it on between waves starts the countdown right away.
        world.set_auto_start(true);
        assert_eq!(world.next_wave_in(), Some(AUTO_START_SECONDS));
        world.update(Duration::from_secs_f32(AUTO_START_SECONDS + 0.1), &mut bus);
        assert_eq!(world.wave(), 2);
        assert!(world.wave_active());

        world.update(Duration::from_secs_f32(WAVE_SECONDS + 0.1), &mut bus);
        world.set_auto_start(false);
        assert_eq!(world.next_wave_in(), None);
    }

    #[test]
    fn build_discounts_lower_the_charged_and_reported_cost() {
        let mods = SkillTreeRunMods {
            build_discount_percent: 10,
            ..SkillTreeRunMods::default()
        };
        let config = UiConfig::default();
        let mut world = SandboxWorld::new(&config, mods);
        let mut bus = EventBus::new();
        let arrow = config.tower("arrow").expect("arrow tower");
        assert_eq!(world.build_cost(arrow), 45);
        assert!(world.build("arrow", (300, 300), &mut bus));
        assert_eq!(world.gold(), BASE_GOLD - 45);
    }

    #[test]
    fn skill_bonuses_show_in_upgrade_stats() {
        let mods = SkillTreeRunMods {
            tower_damage_percent: 30,
            tower_range_percent: 10,
            ..SkillTreeRunMods::default()
        };
        let mut world = SandboxWorld::new(&UiConfig::default(), mods);
        let mut bus = EventBus::new();
        world.build("arrow", (300, 300), &mut bus);
        let paths = world.selected_tower().expect("selected").paths;
        assert!(paths[0].description.ends_with("130% now, 155% next."));
        assert!(paths[1].description.ends_with("110% now, 135% next."));

        world.gold = 10_000;
        for _ in 0..MAX_UPGRADE_LEVEL {
            world.upgrade(0, &mut bus);
        }
        let paths = world.selected_tower().expect("selected").paths;
        assert!(paths[0].description.ends_with("205% at max."));
    }

    #[test]
    fn restart_keeps_the_configured_catalog_and_speed() {
        let mut config = UiConfig::default();
        config.towers.truncate(1);
        config.speed_steps = vec![2, 4];
        let mut world = SandboxWorld::new(&config, SkillTreeRunMods::default());
        let mut bus = EventBus::new();
        world.set_speed(4);
        world.set_auto_start(true);
        world.build("arrow", (300, 300), &mut bus);

        world.restart(SkillTreeRunMods::default());
        assert_eq!(world.speed(), 2);
        assert!(world.auto_start());
        assert_eq!(world.tower_count(), 0);
        assert!(!world.build("cannon", (300, 300), &mut bus));
        assert!(world.build("arrow", (300, 300), &mut bus));
    }

    #[test]
    fn paused_worlds_do_not_advance_and_speed_scales_time() {
        let (mut world, mut bus) = world();
        world.start_wave(&mut bus);
        world.set_paused(true);
        world.update(Duration::from_secs(100), &mut bus);
        assert!(world.wave_active());

        world.set_paused(false);
        world.set_speed(3);
        world.update(Duration::from_secs_f32(WAVE_SECONDS / 3.0 + 0.1), &mut bus);
        assert!(!world.wave_active());
    }

    #[test]
    fn clearing_every_wave_publishes_victory() {
        let (mut world, mut bus) = world();
        for _ in 0..TOTAL_WAVES {
            world.start_wave(&mut bus);
            world.update(Duration::from_secs_f32(WAVE_SECONDS + 0.1), &mut bus);
        }
        assert!(world.is_finished());
        let events = bus.dispatch();
        let victory = events.iter().find_map(|e| match e {
            GameEvent::Victory(summary) => Some(*summary),
            _ => None,
        });
        let summary = victory.expect("victory published");
        assert_eq!(summary.waves_cleared, TOTAL_WAVES);
        // Waves 3, 6 and 9 each leak one enemy.
        assert_eq!(summary.lives_left, BASE_LIVES - 3);
    }
}
