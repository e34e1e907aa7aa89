//! Shared configuration table read by every UI module.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read UI config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse UI config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerDef {
    pub id: String,
    pub name: String,
    pub cost: u32,
    pub color: [u8; 4],
    #[serde(default)]
    pub description: String,
}

impl TowerDef {
    fn new(id: &str, name: &str, cost: u32, color: [u8; 4], description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            cost,
            color,
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub screen_width: u32,
    pub screen_height: u32,

    pub text_scale: u32,
    pub title_scale: u32,

    pub hud_height: u32,
    pub panel_width: u32,
    pub panel_collapsed_width: u32,
    pub panel_starts_expanded: bool,

    /// Seconds the pointer must rest on an element before its tooltip shows.
    pub tooltip_delay_s: f32,
    pub tooltip_max_width: u32,

    pub cursor_scale: u32,

    pub skilltree_min_zoom: f32,
    pub skilltree_max_zoom: f32,
    pub skilltree_node_size: u32,

    /// Seconds between victory-screen summary lines appearing.
    pub victory_reveal_interval_s: f32,

    pub speed_steps: Vec<u32>,
    pub default_style: usize,

    pub towers: Vec<TowerDef>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            screen_width: 1280,
            screen_height: 720,
            text_scale: 2,
            title_scale: 8,
            hud_height: 44,
            panel_width: 240,
            panel_collapsed_width: 28,
            panel_starts_expanded: true,
            tooltip_delay_s: 0.35,
            tooltip_max_width: 260,
            cursor_scale: 2,
            skilltree_min_zoom: 0.5,
            skilltree_max_zoom: 3.0,
            skilltree_node_size: 40,
            victory_reveal_interval_s: 0.3,
            speed_steps: vec![1, 2, 3],
            default_style: 0,
            towers: default_towers(),
        }
    }
}

fn default_towers() -> Vec<TowerDef> {
    vec![
        TowerDef::new("arrow", "ARROW", 50, [200, 170, 110, 255], "Fast single target shots."),
        TowerDef::new("cannon", "CANNON", 90, [150, 150, 160, 255], "Slow splash damage to groups."),
        TowerDef::new("frost", "FROST", 70, [120, 200, 255, 255], "Slows enemies in range."),
        TowerDef::new("tesla", "TESLA", 120, [190, 130, 255, 255], "Chains lightning between enemies."),
        TowerDef::new("mortar", "MORTAR", 150, [170, 110, 80, 255], "Long range shells. Cannot hit close."),
        TowerDef::new("beacon", "BEACON", 100, [255, 220, 120, 255], "Boosts nearby towers."),
    ]
}

impl UiConfig {
    /// Loads from `BASTION_UI_CONFIG` when set; otherwise returns defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os("BASTION_UI_CONFIG") {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    /// Loads a config file. A missing file yields defaults; a malformed one is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("no UI config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let config: UiConfig = serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config.sanitized())
    }

    pub fn sanitized(mut self) -> Self {
        self.text_scale = self.text_scale.clamp(1, 6);
        self.title_scale = self.title_scale.clamp(1, 16);
        self.cursor_scale = self.cursor_scale.clamp(1, 6);
        self.panel_collapsed_width = self.panel_collapsed_width.max(12);
        self.panel_width = self.panel_width.max(self.panel_collapsed_width);
        self.tooltip_delay_s = self.tooltip_delay_s.max(0.0);
        self.tooltip_max_width = self.tooltip_max_width.max(64);
        if self.skilltree_min_zoom <= 0.0 {
            self.skilltree_min_zoom = 0.1;
        }
        if self.skilltree_max_zoom < self.skilltree_min_zoom {
            self.skilltree_max_zoom = self.skilltree_min_zoom;
        }
        self.skilltree_node_size = self.skilltree_node_size.max(8);
        self.speed_steps.retain(|s| *s > 0);
        if self.speed_steps.is_empty() {
            self.speed_steps.push(1);
        }
        self
    }

    pub fn tower(&self, id: &str) -> Option<&TowerDef> {
        self.towers.iter().find(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let parsed: UiConfig =
            serde_json::from_str(r#"{"hud_height": 60}"#).expect("partial config should parse");
        assert_eq!(parsed.hud_height, 60);
        assert_eq!(parsed.panel_width, UiConfig::default().panel_width);
        assert_eq!(parsed.towers.len(), UiConfig::default().towers.len());
    }

    #[test]
    fn sanitized_repairs_inconsistent_values() {
        let config = UiConfig {
            skilltree_min_zoom: -1.0,
            skilltree_max_zoom: -2.0,
            speed_steps: vec![0],
            panel_width: 4,
            ..UiConfig::default()
        }
        .sanitized();
        assert!(config.skilltree_min_zoom > 0.0);
        assert!(config.skilltree_max_zoom >= config.skilltree_min_zoom);
        assert_eq!(config.speed_steps, vec![1]);
        assert!(config.panel_width >= config.panel_collapsed_width);
    }

    #[test]
    fn load_of_missing_file_is_default() {
        let path = std::env::temp_dir().join("bastion_ui_config_does_not_exist.json");
        let config = UiConfig::load(&path).expect("missing file is not an error");
        assert_eq!(config, UiConfig::default());
    }

    #[test]
    fn load_of_malformed_file_reports_parse_error() {
        let path = std::env::temp_dir().join(format!("bastion_ui_config_bad_{}.json", std::process::id()));
        fs::write(&path, b"{ not json").expect("write temp file");
        let err = UiConfig::load(&path).expect_err("malformed config must fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
        let _ = fs::remove_file(&path);
    }
}
