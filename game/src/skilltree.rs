use std::{
    collections::{HashMap, HashSet},
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::world::SkillTreeData;

pub const ROOT_NODE_ID: &str = "root";

#[derive(Debug, Error)]
pub enum SkillTreeError {
    #[error("failed to access skill tree file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse skill tree file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode skill tree data: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2f {
    pub x: f32,
    pub y: f32,
}

impl Vec2f {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Root,
    Offense,
    Defense,
    Economy,
    Utility,
    Keystone,
}

/// Static, designer-authored skill tree definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkillTreeDef {
    pub version: u32,
    pub nodes: Vec<SkillNodeDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkillNodeDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,

    /// Node center in world units (one unit is one screen pixel at zoom 1; y grows downward).
    pub pos: Vec2f,

    pub kind: NodeKind,

    /// Price in skill currency.
    pub cost: u32,

    /// Node ids that must be allocated before this node becomes available.
    #[serde(default)]
    pub requires: Vec<String>,

    #[serde(default = "no_effect")]
    pub effect: SkillEffect,
}

fn no_effect() -> SkillEffect {
    SkillEffect::None
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SkillEffect {
    None,
    StartingGold { amount: u32 },
    ExtraLives { lives: u32 },
    TowerDamagePercent { percent: u32 },
    TowerRangePercent { percent: u32 },
    BuildDiscountPercent { percent: u32 },
    InterestPercent { percent: u32 },
    RewardPercent { percent: u32 },
}

impl SkillEffect {
    /// One-line description for tooltips.
    pub fn summary(&self) -> String {
        match *self {
            SkillEffect::None => String::new(),
            SkillEffect::StartingGold { amount } => format!("+{amount} STARTING GOLD"),
            SkillEffect::ExtraLives { lives } => format!("+{lives} LIVES"),
            SkillEffect::TowerDamagePercent { percent } => format!("+{percent}% TOWER DAMAGE"),
            SkillEffect::TowerRangePercent { percent } => format!("+{percent}% TOWER RANGE"),
            SkillEffect::BuildDiscountPercent { percent } => format!("-{percent}% BUILD COST"),
            SkillEffect::InterestPercent { percent } => format!("+{percent}% WAVE INTEREST"),
            SkillEffect::RewardPercent { percent } => format!("+{percent}% RUN REWARD"),
        }
    }
}

/// Aggregated effects of every allocated node, applied by the host at run start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillTreeRunMods {
    pub starting_gold: u32,
    pub extra_lives: u32,
    pub tower_damage_percent: u32,
    pub tower_range_percent: u32,
    pub build_discount_percent: u32,
    pub interest_percent: u32,
    pub reward_percent: u32,
}

impl Default for SkillTreeDef {
    fn default() -> Self {
        // Compile-time fallback so the tree still exists when no asset path is configured.
        let mut def = serde_json::from_str(include_str!("../assets/skilltree.json")).unwrap_or_else(
            |_| SkillTreeDef {
                version: 1,
                nodes: vec![SkillNodeDef {
                    id: ROOT_NODE_ID.to_string(),
                    name: "BASTION".to_string(),
                    description: String::new(),
                    pos: Vec2f::new(0.0, 0.0),
                    kind: NodeKind::Root,
                    cost: 0,
                    requires: vec![],
                    effect: SkillEffect::None,
                }],
            },
        );
        normalize_and_validate(&mut def);
        def
    }
}

/// Persistent player progress.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkillTreeProgress {
    pub version: u32,
    pub currency: u32,
    pub allocated: Vec<String>,
}

impl Default for SkillTreeProgress {
    fn default() -> Self {
        Self {
            version: 1,
            currency: 0,
            allocated: vec![ROOT_NODE_ID.to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeState {
    Allocated,
    Available,
    Locked,
}

/// Inclusive range of node centers in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkillTreeWorldBounds {
    pub min: Vec2f,
    pub max: Vec2f,
}

pub fn skilltree_world_bounds(nodes: &[SkillNodeDef]) -> Option<SkillTreeWorldBounds> {
    let (first, rest) = nodes.split_first()?;
    let mut min = first.pos;
    let mut max = first.pos;
    for node in rest {
        min.x = min.x.min(node.pos.x);
        min.y = min.y.min(node.pos.y);
        max.x = max.x.max(node.pos.x);
        max.y = max.y.max(node.pos.y);
    }
    Some(SkillTreeWorldBounds { min, max })
}

/// Definition + progress + lookup caches.
#[derive(Debug, Clone)]
pub struct SkillTreeStore {
    pub def: SkillTreeDef,
    pub progress: SkillTreeProgress,

    /// Where progress is written after every change; `None` keeps progress in memory only.
    pub progress_path: Option<PathBuf>,

    id_to_index: HashMap<String, usize>,
    allocated_set: HashSet<String>,
}

impl SkillTreeStore {
    pub fn new(def: SkillTreeDef, progress: SkillTreeProgress) -> Self {
        let mut store = Self {
            def,
            progress,
            progress_path: None,
            id_to_index: HashMap::new(),
            allocated_set: HashSet::new(),
        };
        store.rebuild_caches();
        store
    }

    pub fn from_defaults() -> Self {
        Self::new(SkillTreeDef::default(), SkillTreeProgress::default())
    }

    /// Loads from explicit paths. A missing progress file starts fresh progress.
    pub fn load(def_path: Option<&Path>, progress_path: &Path) -> Result<Self, SkillTreeError> {
        let def = match def_path {
            Some(path) => load_def(path)?,
            None => SkillTreeDef::default(),
        };
        let progress = match read_json::<SkillTreeProgress>(progress_path) {
            Ok(progress) => progress,
            Err(SkillTreeError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                SkillTreeProgress::default()
            }
            Err(err) => return Err(err),
        };
        let mut store = Self::new(def, progress);
        store.progress_path = Some(progress_path.to_path_buf());
        Ok(store)
    }

    /// Loads using `BASTION_SKILLTREE_PATH` / `BASTION_SKILLTREE_PROGRESS_PATH`, falling back to
    /// the built-in tree and fresh progress when the files are unusable.
    pub fn load_default() -> Self {
        let def_path = std::env::var_os("BASTION_SKILLTREE_PATH").map(PathBuf::from);
        let progress_path = default_progress_path();
        match Self::load(def_path.as_deref(), &progress_path) {
            Ok(store) => store,
            Err(err) => {
                log::warn!("skill tree load failed, using defaults: {err}");
                let mut store = Self::from_defaults();
                store.progress_path = Some(progress_path);
                store
            }
        }
    }

    pub fn rebuild_caches(&mut self) {
        normalize_and_validate(&mut self.def);
        if self.progress.version == 0 {
            self.progress.version = 1;
        }

        // Prune stale allocations (e.g. nodes removed from the definition).
        let ids: HashSet<String> = self.def.nodes.iter().map(|n| n.id.clone()).collect();
        self.progress.allocated.retain(|id| ids.contains(id));
        let mut seen = HashSet::new();
        self.progress.allocated.retain(|id| seen.insert(id.clone()));
        if ids.contains(ROOT_NODE_ID) && !self.progress.allocated.iter().any(|id| id == ROOT_NODE_ID)
        {
            self.progress.allocated.insert(0, ROOT_NODE_ID.to_string());
        }

        self.allocated_set = self.progress.allocated.iter().cloned().collect();
        self.id_to_index = self
            .def
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
    }

    pub fn is_allocated(&self, id: &str) -> bool {
        self.allocated_set.contains(id)
    }

    pub fn node_by_id(&self, id: &str) -> Option<&SkillNodeDef> {
        self.id_to_index.get(id).and_then(|&i| self.def.nodes.get(i))
    }

    fn state_of(&self, node: &SkillNodeDef) -> NodeState {
        if self.is_allocated(&node.id) {
            return NodeState::Allocated;
        }
        if node.requires.iter().all(|r| self.is_allocated(r)) {
            NodeState::Available
        } else {
            NodeState::Locked
        }
    }

    pub fn run_mods(&self) -> SkillTreeRunMods {
        let mut mods = SkillTreeRunMods::default();
        for node in &self.def.nodes {
            if !self.is_allocated(&node.id) {
                continue;
            }
            match node.effect {
                SkillEffect::None => {}
                SkillEffect::StartingGold { amount } => {
                    mods.starting_gold = mods.starting_gold.saturating_add(amount);
                }
                SkillEffect::ExtraLives { lives } => {
                    mods.extra_lives = mods.extra_lives.saturating_add(lives);
                }
                SkillEffect::TowerDamagePercent { percent } => {
                    mods.tower_damage_percent = mods.tower_damage_percent.saturating_add(percent);
                }
                SkillEffect::TowerRangePercent { percent } => {
                    mods.tower_range_percent = mods.tower_range_percent.saturating_add(percent);
                }
                SkillEffect::BuildDiscountPercent { percent } => {
                    mods.build_discount_percent =
                        mods.build_discount_percent.saturating_add(percent).min(90);
                }
                SkillEffect::InterestPercent { percent } => {
                    mods.interest_percent = mods.interest_percent.saturating_add(percent);
                }
                SkillEffect::RewardPercent { percent } => {
                    mods.reward_percent = mods.reward_percent.saturating_add(percent);
                }
            }
        }
        mods
    }

    pub fn add_currency(&mut self, amount: u32) {
        self.progress.currency = self.progress.currency.saturating_add(amount);
        self.persist();
    }

    pub fn save_progress(&self) -> Result<(), SkillTreeError> {
        let Some(path) = self.progress_path.as_ref() else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| SkillTreeError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        let json = serde_json::to_string_pretty(&self.progress)?;
        atomic_write(path, json.as_bytes()).map_err(|source| SkillTreeError::Io {
            path: path.clone(),
            source,
        })
    }

    fn persist(&self) {
        if let Err(err) = self.save_progress() {
            log::warn!("skill tree progress not saved: {err}");
        }
    }
}

impl SkillTreeData for SkillTreeStore {
    fn nodes(&self) -> &[SkillNodeDef] {
        &self.def.nodes
    }

    fn node_state(&self, id: &str) -> NodeState {
        match self.node_by_id(id) {
            Some(node) => self.state_of(node),
            None => NodeState::Locked,
        }
    }

    fn currency(&self) -> u32 {
        self.progress.currency
    }

    fn try_allocate(&mut self, id: &str) -> bool {
        let Some(node) = self.node_by_id(id) else {
            return false;
        };
        if self.state_of(node) != NodeState::Available || self.progress.currency < node.cost {
            return false;
        }
        let cost = node.cost;

        self.progress.currency -= cost;
        self.allocated_set.insert(id.to_string());
        self.progress.allocated.push(id.to_string());
        log::debug!("allocated skill node {id} for {cost}");
        self.persist();
        true
    }
}

fn default_progress_path() -> PathBuf {
    if let Some(p) = std::env::var_os("BASTION_SKILLTREE_PROGRESS_PATH") {
        return PathBuf::from(p);
    }

    // `CARGO_MANIFEST_DIR` is `.../game`; the workspace `target/` lives at `..`.
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("target")
        .join("skilltree_progress.json")
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, SkillTreeError> {
    let bytes = fs::read(path).map_err(|source| SkillTreeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| SkillTreeError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn load_def(path: &Path) -> Result<SkillTreeDef, SkillTreeError> {
    let mut def: SkillTreeDef = read_json(path)?;
    normalize_and_validate(&mut def);
    Ok(def)
}

fn atomic_write(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    match fs::rename(&tmp, path) {
        Ok(()) => Ok(()),
        Err(_) => {
            // Rename over an existing file can fail on Windows.
            fs::copy(&tmp, path)?;
            let _ = fs::remove_file(&tmp);
            Ok(())
        }
    }
}

fn normalize_and_validate(def: &mut SkillTreeDef) {
    if def.version == 0 {
        def.version = 1;
    }

    for node in &mut def.nodes {
        if node.id.trim().is_empty() {
            node.id = "unnamed".to_string();
        }
        if node.name.trim().is_empty() {
            node.name = node.id.to_uppercase();
        }
        if !node.pos.x.is_finite() {
            node.pos.x = 0.0;
        }
        if !node.pos.y.is_finite() {
            node.pos.y = 0.0;
        }
    }

    // Unique ids: later duplicates get a numeric suffix.
    let mut used = HashSet::<String>::new();
    for node in &mut def.nodes {
        if used.insert(node.id.clone()) {
            continue;
        }
        let base = node.id.clone();
        for i in 2.. {
            let cand = format!("{base}_{i}");
            if used.insert(cand.clone()) {
                node.id = cand;
                break;
            }
        }
    }

    let ids: HashSet<String> = def.nodes.iter().map(|n| n.id.clone()).collect();
    for node in &mut def.nodes {
        let own = node.id.clone();
        node.requires.retain(|r| ids.contains(r) && *r != own);
        node.requires.sort();
        node.requires.dedup();
    }
}
