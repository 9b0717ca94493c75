use std::path::Path;

use serde::{Deserialize, Serialize};

/// Tuning knobs for the generation core.
///
/// Defaults carry the shipped tuning; a table can override individual values
/// from a TOML file without restating the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    /// Maximum campaign pressure (prevents runaway escalation).
    pub pressure_cap: i64,
    /// Maximum heat / external attention.
    pub heat_cap: i64,
    /// Pressure removed by one decay step.
    pub pressure_decay: i64,
    /// Heat removed by one decay step.
    pub heat_decay: i64,
    /// Ticks a tag stays on cooldown after an entry using it is drawn.
    pub base_cooldown: i64,
    /// Newest recent event ids that are hard-excluded from selection.
    pub recency_exclude_window: usize,
    /// Weight multiplier for entries still in the older recency window.
    pub recency_penalty: f64,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            pressure_cap: 30,
            heat_cap: 20,
            pressure_decay: 1,
            heat_decay: 1,
            base_cooldown: 2,
            recency_exclude_window: 3,
            recency_penalty: 0.35,
        }
    }
}

impl TuningConfig {
    /// Load tuning from a TOML file.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load_from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded tuning from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse tuning at {}: {e}; using defaults",
                        path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                tracing::debug!("No tuning file at {}; using defaults", path.display());
                Self::default()
            }
        }
    }
}
