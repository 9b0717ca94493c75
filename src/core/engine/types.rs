//! Scene, selection, and result types shared across the generation core.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Scene Context
// ============================================================================

/// Where in the scene arc the draw happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenePhase {
    Approach,
    Engage,
    Aftermath,
}

impl fmt::Display for ScenePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Approach => "approach",
            Self::Engage => "engage",
            Self::Aftermath => "aftermath",
        };
        f.write_str(s)
    }
}

/// Rough party capability band used by the severity cap table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyBand {
    Low,
    Mid,
    High,
    Unknown,
}

/// Tuning preset controlling severity-tail fatness and cutoff aggressiveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RarityMode {
    Calm,
    Normal,
    Spiky,
}

impl fmt::Display for RarityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Calm => "calm",
            Self::Normal => "normal",
            Self::Spiky => "spiky",
        };
        f.write_str(s)
    }
}

/// Physical scene morphology, each axis in `[0, 1]`.
///
/// Confinement and visibility push severity toward the fat tail; connectivity
/// (escape routes, reinforcement paths for the party) pulls it back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    pub confinement: f64,
    pub connectivity: f64,
    pub visibility: f64,
}

impl Constraints {
    pub fn new(confinement: f64, connectivity: f64, visibility: f64) -> Self {
        Self {
            confinement,
            connectivity,
            visibility,
        }
    }

    /// Each axis clamped to `[0, 1]`.
    pub fn clamped(&self) -> Self {
        Self {
            confinement: self.confinement.clamp(0.0, 1.0),
            connectivity: self.connectivity.clamp(0.0, 1.0),
            visibility: self.visibility.clamp(0.0, 1.0),
        }
    }

    /// Morphology score `confinement + visibility - connectivity`, naturally
    /// in `[-1, 2]` once the axes are clamped.
    pub fn morphology(&self) -> f64 {
        let c = self.clamped();
        c.confinement + c.visibility - c.connectivity
    }

    // Preset tables matching the scene presets shipped with the harness.

    pub fn dungeon() -> Self {
        Self::new(0.8, 0.3, 0.6)
    }

    pub fn city() -> Self {
        Self::new(0.4, 0.8, 0.7)
    }

    pub fn wilderness() -> Self {
        Self::new(0.3, 0.5, 0.4)
    }

    pub fn ruins() -> Self {
        Self::new(0.6, 0.4, 0.5)
    }
}

/// Everything the generator needs to know about the scene being played.
/// Constructed fresh per call; the engine never caches it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneContext {
    pub scene_id: String,
    pub phase: ScenePhase,
    pub environment: Vec<String>,
    pub tone: Vec<String>,
    pub constraints: Constraints,
    pub party_band: PartyBand,
    pub spotlight: Vec<String>,
}

/// Caller-side selection preferences for one draw.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionContext {
    pub enabled_packs: Vec<String>,
    pub include_tags: Vec<String>,
    pub exclude_tags: Vec<String>,
    pub factions_present: Vec<String>,
    pub rarity_mode: RarityMode,
}

impl Default for RarityMode {
    fn default() -> Self {
        Self::Normal
    }
}

// ============================================================================
// Effects & Fiction
// ============================================================================

/// Inclusive range for one effect axis in a content template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisRange {
    pub min: i64,
    pub max: i64,
}

/// Per-axis draw ranges carried by a content entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectTemplate {
    pub harm: AxisRange,
    pub cost: AxisRange,
    pub heat: AxisRange,
    pub opportunity: AxisRange,
    pub position: AxisRange,
}

/// Realized mechanical effects, scaled by applied severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectVector {
    pub harm: i64,
    pub cost: i64,
    pub heat: i64,
    pub opportunity: i64,
    pub position: i64,
}

/// Narrative payload: a prompt plus exactly two immediate table choices.
///
/// Used both as the entry template (with `{placeholder}` slots) and as the
/// rendered output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fiction {
    pub prompt: String,
    pub immediate_choice: [String; 2],
}

// ============================================================================
// Cutoff
// ============================================================================

/// Narrative conversion applied when a raw severity draw overflows the cap.
///
/// The closed set keeps cutoff handling table-driven: each resolution owns a
/// fiction overlay, a followup hook, and a cooldown/clock behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutoffResolution {
    None,
    Omen,
    ClockTick,
    Downshift,
}

impl fmt::Display for CutoffResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::Omen => "omen",
            Self::ClockTick => "clock_tick",
            Self::Downshift => "downshift",
        };
        f.write_str(s)
    }
}

/// Which table a draw comes from; complications and loot share one pipeline
/// but carry different cutoff overlays and hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorKind {
    Complication,
    Loot,
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Complication => "complication",
            Self::Loot => "loot",
        };
        f.write_str(s)
    }
}

// ============================================================================
// Results & Deltas
// ============================================================================

/// Changes a draw wants applied to engine state.
///
/// Clock values are additive; cooldowns are overwrites (set, not added);
/// recent ids are appended to the bounded recency window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateDelta {
    pub clocks_add: BTreeMap<String, i64>,
    pub tag_cooldowns_set: BTreeMap<String, i64>,
    pub recent_event_ids_add: Vec<String>,
}

/// One generated complication or loot situation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventResult {
    pub event_id: String,
    pub title: String,
    pub tags: Vec<String>,
    /// Mechanical severity actually applied (1..=10, never above the cap).
    pub severity: u8,
    pub cutoff_applied: bool,
    pub cutoff_resolution: CutoffResolution,
    pub effect_vector: EffectVector,
    pub fiction: Fiction,
    pub followups: Vec<String>,
    pub state_delta: StateDelta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn morphology_clamps_axes_first() {
        let c = Constraints::new(5.0, -3.0, 0.5);
        // 1.0 + 0.5 - 0.0
        assert!((c.morphology() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn phase_serde_is_snake_case() {
        let json = serde_json::to_string(&ScenePhase::Aftermath).unwrap();
        assert_eq!(json, "\"aftermath\"");
        let back: ScenePhase = serde_json::from_str("\"engage\"").unwrap();
        assert_eq!(back, ScenePhase::Engage);
    }

    #[test]
    fn cutoff_resolution_display_matches_wire_names() {
        assert_eq!(CutoffResolution::ClockTick.to_string(), "clock_tick");
        let json = serde_json::to_string(&CutoffResolution::ClockTick).unwrap();
        assert_eq!(json, "\"clock_tick\"");
    }
}
