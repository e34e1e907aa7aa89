use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioSettings {
    pub master_volume: f32,
    pub music_volume: f32,
    pub sfx_volume: f32,
    pub mute_all: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            music_volume: 0.6,
            sfx_volume: 0.8,
            mute_all: false,
        }
    }
}

impl AudioSettings {
    pub fn clamp(mut self) -> Self {
        self.master_volume = clamp_unit(self.master_volume);
        self.music_volume = clamp_unit(self.music_volume);
        self.sfx_volume = clamp_unit(self.sfx_volume);
        self
    }

    pub fn effective_music_gain(self) -> f32 {
        if self.mute_all {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    pub fn effective_sfx_gain(self) -> f32 {
        if self.mute_all {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VideoSettings {
    pub fullscreen: bool,
    pub vsync: bool,
    pub screen_shake: bool,
    pub show_fps: bool,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            fullscreen: false,
            vsync: true,
            screen_shake: true,
            show_fps: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GameplaySettings {
    pub damage_numbers: bool,
    pub auto_start_waves: bool,
}

impl Default for GameplaySettings {
    fn default() -> Self {
        Self {
            damage_numbers: true,
            auto_start_waves: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InterfaceSettings {
    pub style_index: usize,
    pub pixel_cursor: bool,
}

impl Default for InterfaceSettings {
    fn default() -> Self {
        Self {
            style_index: 0,
            pixel_cursor: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerSettings {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub audio: AudioSettings,
    #[serde(default)]
    pub video: VideoSettings,
    #[serde(default)]
    pub gameplay: GameplaySettings,
    #[serde(default)]
    pub interface: InterfaceSettings,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            audio: AudioSettings::default(),
            video: VideoSettings::default(),
            gameplay: GameplaySettings::default(),
            interface: InterfaceSettings::default(),
        }
    }
}

impl PlayerSettings {
    pub fn sanitized(mut self) -> Self {
        self.version = default_version();
        self.audio = self.audio.clamp();
        self.interface.style_index %= crate::palette::PALETTES.len();
        self
    }
}

fn default_version() -> u32 {
    1
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("BASTION_SETTINGS_PATH") {
            return Self::at(explicit);
        }

        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|home| {
                    let mut p = PathBuf::from(home);
                    p.push(".config");
                    p
                })
            })
            .unwrap_or_else(|| PathBuf::from("."));

        let mut path = base;
        path.push("bastion");
        path.push("settings.json");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file. A missing file is not an error and yields defaults.
    pub fn try_load(&self) -> Result<PlayerSettings, SettingsError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(PlayerSettings::default());
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_slice::<PlayerSettings>(&bytes)
            .map(PlayerSettings::sanitized)
            .map_err(|source| SettingsError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    pub fn load(&self) -> PlayerSettings {
        self.try_load().unwrap_or_else(|err| {
            log::warn!("{err}; using default settings");
            PlayerSettings::default()
        })
    }

    pub fn save(&self, settings: &PlayerSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        let text = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, text).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("bastion_settings_{}_{name}", std::process::id()))
            .join("settings.json")
    }

    #[test]
    fn audio_effective_gains_respect_mute() {
        let mut audio = AudioSettings {
            master_volume: 0.5,
            music_volume: 0.5,
            sfx_volume: 1.0,
            mute_all: false,
        };
        assert!((audio.effective_music_gain() - 0.25).abs() < 1e-6);
        assert!((audio.effective_sfx_gain() - 0.5).abs() < 1e-6);

        audio.mute_all = true;
        assert_eq!(audio.effective_music_gain(), 0.0);
        assert_eq!(audio.effective_sfx_gain(), 0.0);
    }

    #[test]
    fn sanitized_clamps_volumes_and_wraps_style() {
        let settings = PlayerSettings {
            version: 99,
            audio: AudioSettings {
                master_volume: 3.0,
                music_volume: -2.0,
                sfx_volume: f32::NAN,
                mute_all: false,
            },
            interface: InterfaceSettings {
                style_index: crate::palette::PALETTES.len() + 1,
                pixel_cursor: true,
            },
            ..PlayerSettings::default()
        }
        .sanitized();

        assert_eq!(settings.version, 1);
        assert_eq!(settings.audio.master_volume, 1.0);
        assert_eq!(settings.audio.music_volume, 0.0);
        assert_eq!(settings.audio.sfx_volume, 0.0);
        assert_eq!(settings.interface.style_index, 1);
    }

    #[test]
    fn serde_defaults_fill_missing_fields() {
        let parsed: PlayerSettings =
            serde_json::from_str(r#"{"audio":{"master_volume":0.5}}"#).expect("settings JSON should parse");
        assert_eq!(parsed.audio.master_volume, 0.5);
        assert_eq!(parsed.audio.music_volume, AudioSettings::default().music_volume);
        assert_eq!(parsed.video, VideoSettings::default());
        assert_eq!(parsed.interface, InterfaceSettings::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let path = temp_path("roundtrip");
        let store = SettingsStore::at(&path);
        let mut settings = PlayerSettings::default();
        settings.video.show_fps = true;
        settings.interface.style_index = 2;
        store.save(&settings).expect("save settings");
        assert_eq!(store.load(), settings);
        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let path = temp_path("malformed");
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).expect("create dir");
        }
        fs::write(&path, "{ nope").expect("write file");
        let store = SettingsStore::at(&path);
        assert!(matches!(store.try_load(), Err(SettingsError::Parse { .. })));
        assert_eq!(store.load(), PlayerSettings::default());
        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn missing_file_loads_defaults_without_error() {
        let store = SettingsStore::at(temp_path("missing"));
        assert_eq!(store.try_load().expect("missing is fine"), PlayerSettings::default());
    }
}
