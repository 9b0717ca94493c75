//! Content pack loading, eligibility filtering, and recency-aware selection.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TuningConfig;

use super::errors::{EngineError, Result};
use super::rng::TraceRng;
use super::state::EngineState;
use super::types::{EffectTemplate, Fiction, SceneContext, SelectionContext, ScenePhase};

/// One immutable pack-loaded entry.
///
/// Empty `environments` or `phases` means the entry is agnostic on that axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub environments: Vec<String>,
    #[serde(default)]
    pub phases: Vec<ScenePhase>,
    #[serde(default)]
    pub pack: Option<String>,
    #[serde(default)]
    pub effects: EffectTemplate,
    pub fiction: Fiction,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

/// Load an ordered content pack (a JSON array of entries) from disk.
pub fn load_pack(path: impl AsRef<Path>) -> Result<Vec<ContentEntry>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| EngineError::PackIo {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = parse_pack(&contents)?;
    debug!(pack = %path.display(), entries = entries.len(), "loaded content pack");
    Ok(entries)
}

/// Parse a content pack from a JSON string.
pub fn parse_pack(json: &str) -> Result<Vec<ContentEntry>> {
    let entries: Vec<ContentEntry> =
        serde_json::from_str(json).map_err(|e| EngineError::MalformedPack {
            reason: e.to_string(),
        })?;
    for entry in &entries {
        if entry.id.is_empty() {
            return Err(EngineError::MalformedPack {
                reason: "entry with empty id".to_string(),
            });
        }
        if entry.weight < 0.0 || !entry.weight.is_finite() {
            return Err(EngineError::MalformedPack {
                reason: format!("entry '{}' has invalid weight {}", entry.id, entry.weight),
            });
        }
    }
    Ok(entries)
}

/// Event ids inside the hard-exclusion window (the newest portion of the
/// recency list).
fn excluded_recent<'a>(state: &'a EngineState, tuning: &TuningConfig) -> &'a [String] {
    let n = state.recent_event_ids.len();
    let start = n.saturating_sub(tuning.recency_exclude_window);
    &state.recent_event_ids[start..]
}

/// Filter `entries` down to those eligible for this scene and selection.
///
/// Returns the survivors in pack order; an empty result is the caller's
/// signal to raise [`EngineError::ContentExhausted`], never to substitute a
/// default entry.
pub fn filter_entries<'a>(
    scene: &SceneContext,
    state: &EngineState,
    selection: &SelectionContext,
    entries: &'a [ContentEntry],
    tuning: &TuningConfig,
) -> Vec<&'a ContentEntry> {
    let excluded = excluded_recent(state, tuning);
    entries
        .iter()
        .filter(|e| {
            if let Some(pack) = &e.pack {
                if !selection.enabled_packs.is_empty() && !selection.enabled_packs.contains(pack) {
                    return false;
                }
            }
            if !e.environments.is_empty()
                && !e.environments.iter().any(|env| scene.environment.contains(env))
            {
                return false;
            }
            if !e.phases.is_empty() && !e.phases.contains(&scene.phase) {
                return false;
            }
            if !selection.include_tags.is_empty()
                && !e.tags.iter().any(|t| selection.include_tags.contains(t))
            {
                return false;
            }
            if e.tags.iter().any(|t| selection.exclude_tags.contains(t)) {
                return false;
            }
            if excluded.contains(&e.id) {
                return false;
            }
            if e.tags.iter().any(|t| state.cooldown(t) > 0) {
                return false;
            }
            true
        })
        .collect()
}

/// Weighted pick among eligible entries.
///
/// Entries still in the older portion of the recency window keep a reduced
/// weight rather than being excluded, so batches show variety without
/// permanently locking out reuse once enough ticks elapse.
pub fn select_entry<'a>(
    rng: &mut TraceRng,
    eligible: &[&'a ContentEntry],
    state: &EngineState,
    tuning: &TuningConfig,
) -> Result<&'a ContentEntry> {
    let ids: Vec<String> = eligible.iter().map(|e| e.id.clone()).collect();
    let weights: Vec<f64> = eligible
        .iter()
        .map(|e| {
            if state.recent_event_ids.contains(&e.id) {
                e.weight * tuning.recency_penalty
            } else {
                e.weight
            }
        })
        .collect();
    let chosen_id = rng.weighted_choice(&ids, &weights, "content_entry")?;
    // The id came out of `eligible`, so the lookup always succeeds.
    eligible
        .iter()
        .find(|e| e.id == chosen_id)
        .copied()
        .ok_or_else(|| EngineError::InvalidSamplingInput {
            label: "content_entry".to_string(),
            reason: "chosen id missing from eligible set".to_string(),
        })
}
