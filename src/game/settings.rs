use crate::model::{normalize_player_name, Difficulty, DEFAULT_DIGITS, MAX_DIGITS};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_DISPLAY_DURATION: Duration = Duration::from_millis(5000);

#[serde_as]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub(crate) version: u32,

    #[serde(default)]
    pub difficulty: Difficulty,

    #[serde(default)]
    pub player_name: Option<String>,

    /// How long the sequence stays on screen before it is hidden.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(default = "default_display_duration")]
    pub display_duration: Duration,

    #[serde(default = "default_digits")]
    pub digits: u32,
}

// Helper functions for default values
fn default_version() -> u32 {
    1
}
fn default_display_duration() -> Duration {
    DEFAULT_DISPLAY_DURATION
}
fn default_digits() -> u32 {
    DEFAULT_DIGITS
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: 1,
            difficulty: Difficulty::default(),
            player_name: None,
            display_duration: DEFAULT_DISPLAY_DURATION,
            digits: DEFAULT_DIGITS,
        }
    }
}

impl Settings {
    pub fn load() -> Self {
        let path = Self::settings_path();
        match Self::load_from(&path) {
            Some(settings) => settings,
            None => {
                log::info!(target: "settings", "No usable settings at {:?}; using defaults", path);
                let default = Settings::default();
                if let Err(e) = default.save() {
                    log::error!(target: "settings", "Failed to write default settings: {}", e);
                }
                default
            }
        }
    }

    pub fn load_from(path: &Path) -> Option<Self> {
        let contents = fs::read_to_string(path).ok()?;
        let mut settings = serde_json::from_str::<Settings>(&contents).ok()?;
        settings.migrate();
        Some(settings)
    }

    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&Self::settings_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        // Ensure the directory exists
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)
    }

    fn settings_path() -> PathBuf {
        let data_dir = glib::user_data_dir();
        let mut path = data_dir.join("recall");
        path.push("settings.json");
        path
    }

    fn migrate(&mut self) {
        if self.version == 0 {
            self.version = 1;
        }
        self.digits = self.digits.clamp(1, MAX_DIGITS);
        if self.display_duration.is_zero() {
            self.display_duration = DEFAULT_DISPLAY_DURATION;
        }
    }

    pub fn effective_player_name(&self) -> String {
        normalize_player_name(self.player_name.as_deref().unwrap_or_default())
    }

    pub fn is_debug_mode() -> bool {
        std::env::var("DEBUG").map(|v| v == "1").unwrap_or(false)
    }

    /// `SEED=<u64>` makes every generated sequence reproducible.
    pub fn seed_from_env() -> Option<u64> {
        let raw = std::env::var("SEED").ok()?;
        match raw.trim().parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(e) => {
                log::warn!(target: "settings", "Ignoring SEED={:?}: {}", raw, e);
                None
            }
        }
    }
}
