//! Read-only seams onto the game systems the UI presents.
//!
//! The UI never mutates these collaborators directly: it reads accessors and predicates each
//! frame and hands `UiCommand`s back to the host. The skill-tree allocation request is the one
//! write the UI performs itself.

use serde::{Deserialize, Serialize};

use crate::config::TowerDef;
use crate::skilltree::{NodeState, SkillNodeDef};

pub trait Economy {
    fn gold(&self) -> u32;
    fn lives(&self) -> u32;
    fn max_lives(&self) -> u32;

    fn can_afford(&self, cost: u32) -> bool {
        self.gold() >= cost
    }

    /// Gold charged to build `tower` in this run, after any discounts.
    fn build_cost(&self, tower: &TowerDef) -> u32 {
        tower.cost
    }
}

pub trait WaveSource {
    /// 1-based number of the current (or last started) wave; 0 before the first.
    fn wave(&self) -> u32;
    fn total_waves(&self) -> u32;
    fn wave_active(&self) -> bool;
    /// Seconds until the next wave starts on its own, if a countdown is running.
    fn next_wave_in(&self) -> Option<f32>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradePath {
    pub name: String,
    pub description: String,
    pub level: u32,
    pub max_level: u32,
    /// `None` once the path is maxed.
    pub next_cost: Option<u32>,
}

impl UpgradePath {
    pub fn is_maxed(&self) -> bool {
        self.level >= self.max_level || self.next_cost.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TowerSelection {
    pub tower_id: String,
    pub name: String,
    pub paths: Vec<UpgradePath>,
    pub sell_value: u32,
}

pub trait UpgradeSource {
    fn selected_tower(&self) -> Option<TowerSelection>;
}

pub trait SkillTreeData {
    fn nodes(&self) -> &[SkillNodeDef];
    fn node_state(&self, id: &str) -> NodeState;
    fn currency(&self) -> u32;
    /// Spends currency on an available node. Returns whether it was allocated.
    fn try_allocate(&mut self, id: &str) -> bool;

    fn node(&self, id: &str) -> Option<&SkillNodeDef> {
        self.nodes().iter().find(|n| n.id == id)
    }

    fn can_allocate(&self, id: &str) -> bool {
        match self.node(id) {
            Some(node) => {
                self.node_state(id) == NodeState::Available && self.currency() >= node.cost
            }
            None => false,
        }
    }
}

/// Final numbers of a won run, shown on the victory screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub waves_cleared: u32,
    pub total_waves: u32,
    pub lives_left: u32,
    pub max_lives: u32,
    pub gold_earned: u32,
    pub enemies_defeated: u32,
    /// Skill-tree currency granted for the run.
    pub reward: u32,
}

/// The collaborators the UI reads during one frame, plus host-owned run controls.
#[derive(Clone, Copy)]
pub struct GameSnapshot<'a> {
    pub economy: &'a dyn Economy,
    pub waves: &'a dyn WaveSource,
    pub upgrades: &'a dyn UpgradeSource,
    /// Current simulation speed multiplier.
    pub speed: u32,
    pub paused: bool,
}
