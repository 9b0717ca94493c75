//! Campaign-scale state: pressure, heat, permanent scars, and faction
//! attention. This layer sits above `EngineState` and persists across scenes;
//! scene mechanics create pressure, campaign mechanics remember it.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::engine::types::EffectVector;

/// Snapshot schema version written by this crate.
pub const CAMPAIGN_SCHEMA_VERSION: &str = "1";

// ============================================================================
// Scars
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScarCategory {
    Physical,
    Social,
    Political,
    Resource,
    Reputation,
    Environment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScarSeverity {
    Low,
    Medium,
    High,
}

/// Permanent campaign consequence, unique by `scar_id` and never removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scar {
    pub scar_id: String,
    pub category: ScarCategory,
    pub severity: ScarSeverity,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub created_scene_index: Option<u64>,
    #[serde(default)]
    pub notes: Option<String>,
}

// ============================================================================
// Factions
// ============================================================================

/// One external actor's awareness of and attitude toward the party.
///
/// Attention is neutral salience in `[0, 20]` (how much they are watching,
/// not whether they approve); disposition is valence in `[-2, 2]`.
/// `is_active = false` archives the faction without losing its history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionState {
    pub faction_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub attention: i64,
    #[serde(default)]
    pub disposition: i64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl FactionState {
    pub fn new(faction_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            faction_id: faction_id.into(),
            name: name.into(),
            description: String::new(),
            attention: 0,
            disposition: 0,
            notes: None,
            is_active: true,
        }
    }

    /// Human-readable attention band for influence notes.
    pub fn attention_band(&self) -> &'static str {
        match self.attention {
            i64::MIN..=0 => "Unaware",
            1..=5 => "Noticed",
            6..=10 => "Interested",
            11..=15 => "Focused",
            _ => "Obsessed",
        }
    }

    /// Human-readable disposition label.
    pub fn disposition_label(&self) -> &'static str {
        match self.disposition {
            i64::MIN..=-2 => "Hostile",
            -1 => "Unfriendly",
            0 => "Neutral",
            1 => "Friendly",
            _ => "Allied",
        }
    }
}

// ============================================================================
// Bands
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressureBand {
    Stable,
    Strained,
    Volatile,
    Critical,
}

impl fmt::Display for PressureBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Stable => "stable",
            Self::Strained => "strained",
            Self::Volatile => "volatile",
            Self::Critical => "critical",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatBand {
    Quiet,
    Noticed,
    Hunted,
    Exposed,
}

impl fmt::Display for HeatBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Quiet => "quiet",
            Self::Noticed => "noticed",
            Self::Hunted => "hunted",
            Self::Exposed => "exposed",
        };
        f.write_str(s)
    }
}

// ============================================================================
// Campaign state
// ============================================================================

/// Long-arc campaign state.
///
/// Factions live in an `IndexMap` so snapshot order and influence scoring
/// stay deterministic across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignState {
    pub version: String,
    pub campaign_pressure: i64,
    pub heat: i64,
    pub scars: Vec<Scar>,
    pub factions: IndexMap<String, FactionState>,
    pub total_scenes_run: u64,
    pub total_cutoffs_seen: u64,
    /// Monotonic high-water mark of applied severity.
    pub highest_severity_seen: u8,
}

impl Default for CampaignState {
    fn default() -> Self {
        Self {
            version: CAMPAIGN_SCHEMA_VERSION.to_string(),
            campaign_pressure: 0,
            heat: 0,
            scars: Vec::new(),
            factions: IndexMap::new(),
            total_scenes_run: 0,
            total_cutoffs_seen: 0,
            highest_severity_seen: 0,
        }
    }
}

impl CampaignState {
    pub fn pressure_band(&self) -> PressureBand {
        match self.campaign_pressure {
            i64::MIN..=4 => PressureBand::Stable,
            5..=9 => PressureBand::Strained,
            10..=19 => PressureBand::Volatile,
            _ => PressureBand::Critical,
        }
    }

    pub fn heat_band(&self) -> HeatBand {
        match self.heat {
            i64::MIN..=3 => HeatBand::Quiet,
            4..=7 => HeatBand::Noticed,
            8..=14 => HeatBand::Hunted,
            _ => HeatBand::Exposed,
        }
    }
}

// ============================================================================
// Campaign delta
// ============================================================================

/// Attention/disposition nudge for one faction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactionAdjustment {
    pub attention_add: i64,
    pub disposition_add: i64,
}

/// Changes to fold into `CampaignState` after one scene resolves.
///
/// Pressure and heat adds are additive (caps applied downstream); scars are
/// explicit; `cutoffs_increment` is set by the scene outcome itself rather
/// than inferred from the size of the pressure delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignDelta {
    pub campaign_pressure_add: i64,
    pub heat_add: i64,
    pub scars_add: Vec<Scar>,
    pub faction_updates: IndexMap<String, FactionAdjustment>,
    pub scenes_increment: u64,
    pub cutoffs_increment: u64,
}

impl Default for CampaignDelta {
    fn default() -> Self {
        Self {
            campaign_pressure_add: 0,
            heat_add: 0,
            scars_add: Vec::new(),
            faction_updates: IndexMap::new(),
            scenes_increment: 1,
            cutoffs_increment: 0,
        }
    }
}

/// Tags that spread attention beyond the scene itself.
const ATTENTION_TAGS: [&str; 3] = ["visibility", "social_friction", "reinforcements"];

impl CampaignDelta {
    /// Derive the delta from one scene's outcome.
    ///
    /// Pressure: +1 per severity point above 5, +2 on a cutoff. Heat: +1 per
    /// attention-spreading tag plus the realized heat axis. Scars are never
    /// auto-generated. Present factions gain attention from visibility-style
    /// tags and from a realized heat axis of 2+.
    pub fn from_scene_outcome(
        severity: u8,
        cutoff_applied: bool,
        tags: &[String],
        effects: &EffectVector,
        factions_present: &[String],
        explicit_scars: Vec<Scar>,
    ) -> Self {
        let mut pressure = i64::from(severity.saturating_sub(5));
        if cutoff_applied {
            pressure += 2;
        }

        let mut heat = tags
            .iter()
            .filter(|t| ATTENTION_TAGS.contains(&t.as_str()))
            .count() as i64;
        heat += effects.heat;

        let mut attention_add = 0;
        if tags.iter().any(|t| t == "visibility" || t == "social_friction") {
            attention_add += 1;
        }
        if tags.iter().any(|t| t == "reinforcements") {
            attention_add += 1;
        }
        if effects.heat >= 2 {
            attention_add += 1;
        }

        let mut faction_updates = IndexMap::new();
        if attention_add > 0 {
            for faction_id in factions_present {
                faction_updates.insert(
                    faction_id.clone(),
                    FactionAdjustment {
                        attention_add,
                        disposition_add: 0,
                    },
                );
            }
        }

        Self {
            campaign_pressure_add: pressure,
            heat_add: heat,
            scars_add: explicit_scars,
            faction_updates,
            scenes_increment: 1,
            cutoffs_increment: u64::from(cutoff_applied),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn bands_cover_the_documented_thresholds() {
        let mut s = CampaignState::default();
        assert_eq!(s.pressure_band(), PressureBand::Stable);
        s.campaign_pressure = 5;
        assert_eq!(s.pressure_band(), PressureBand::Strained);
        s.campaign_pressure = 10;
        assert_eq!(s.pressure_band(), PressureBand::Volatile);
        s.campaign_pressure = 20;
        assert_eq!(s.pressure_band(), PressureBand::Critical);

        s.heat = 3;
        assert_eq!(s.heat_band(), HeatBand::Quiet);
        s.heat = 4;
        assert_eq!(s.heat_band(), HeatBand::Noticed);
        s.heat = 8;
        assert_eq!(s.heat_band(), HeatBand::Hunted);
        s.heat = 15;
        assert_eq!(s.heat_band(), HeatBand::Exposed);
    }

    #[test]
    fn faction_presentation_helpers() {
        let mut f = FactionState::new("iron_syndicate", "Iron Syndicate");
        assert_eq!(f.attention_band(), "Unaware");
        f.attention = 12;
        assert_eq!(f.attention_band(), "Focused");
        f.attention = 16;
        assert_eq!(f.attention_band(), "Obsessed");
        f.disposition = -2;
        assert_eq!(f.disposition_label(), "Hostile");
        f.disposition = 2;
        assert_eq!(f.disposition_label(), "Allied");
    }

    #[test]
    fn from_scene_outcome_accumulates_pressure_and_heat() {
        let effects = EffectVector {
            heat: 2,
            ..Default::default()
        };
        let delta = CampaignDelta::from_scene_outcome(
            8,
            true,
            &tags(&["visibility", "hazard"]),
            &effects,
            &["watch".to_string()],
            vec![],
        );
        // severity 8 -> +3, cutoff -> +2
        assert_eq!(delta.campaign_pressure_add, 5);
        // one attention tag + heat axis 2
        assert_eq!(delta.heat_add, 3);
        assert_eq!(delta.cutoffs_increment, 1);
        // visibility (+1) and heat>=2 (+1)
        assert_eq!(delta.faction_updates["watch"].attention_add, 2);
    }

    #[test]
    fn from_scene_outcome_quiet_scene_touches_nothing() {
        let delta = CampaignDelta::from_scene_outcome(
            3,
            false,
            &tags(&["terrain"]),
            &EffectVector::default(),
            &["watch".to_string()],
            vec![],
        );
        assert_eq!(delta.campaign_pressure_add, 0);
        assert_eq!(delta.heat_add, 0);
        assert_eq!(delta.cutoffs_increment, 0);
        assert!(delta.faction_updates.is_empty());
    }

    #[test]
    fn campaign_state_snapshot_round_trip() {
        let mut s = CampaignState::default();
        s.campaign_pressure = 12;
        s.scars.push(Scar {
            scar_id: "bridge_burned".to_string(),
            category: ScarCategory::Political,
            severity: ScarSeverity::High,
            source: Some("ev_betrayal".to_string()),
            created_scene_index: Some(7),
            notes: None,
        });
        s.factions.insert(
            "watch".to_string(),
            FactionState::new("watch", "City Watch"),
        );
        let json = serde_json::to_string(&s).unwrap();
        let back: CampaignState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
