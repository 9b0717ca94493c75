//! Engine state value type and its two transforms.
//!
//! State is never mutated in place: `tick_state` and `apply_state_delta`
//! return new values and leave their inputs untouched, so callers can thread
//! state through a loop (or fork it) without surprises.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::StateDelta;

/// Maximum number of event ids kept in the recency window; the oldest age out.
pub const RECENT_EVENT_LIMIT: usize = 8;

/// Scene-scale mutable state: named clocks, per-tag cooldowns, and a bounded
/// ordered window of recently drawn event ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineState {
    pub clocks: BTreeMap<String, i64>,
    pub tag_cooldowns: BTreeMap<String, i64>,
    pub recent_event_ids: Vec<String>,
}

impl EngineState {
    pub fn clock(&self, name: &str) -> i64 {
        self.clocks.get(name).copied().unwrap_or(0)
    }

    pub fn cooldown(&self, tag: &str) -> i64 {
        self.tag_cooldowns.get(tag).copied().unwrap_or(0)
    }
}

/// Advance time by `ticks`: every cooldown is decremented (floor 0, expired
/// entries dropped). Clocks advance only through deltas (the generator's
/// schedule), so ticking alone never raises tension.
///
/// `ticks = 0` is a no-op, and `tick(tick(s, a), b) == tick(s, a + b)`.
pub fn tick_state(state: &EngineState, ticks: i64) -> EngineState {
    let ticks = ticks.max(0);
    let tag_cooldowns = state
        .tag_cooldowns
        .iter()
        .filter_map(|(tag, cd)| {
            let left = cd - ticks;
            (left > 0).then(|| (tag.clone(), left))
        })
        .collect();
    EngineState {
        clocks: state.clocks.clone(),
        tag_cooldowns,
        recent_event_ids: state.recent_event_ids.clone(),
    }
}

/// Fold a draw's delta into state: clocks are added, cooldowns are
/// overwritten (set, not accumulated), and new recent ids are appended with
/// the oldest aging out past [`RECENT_EVENT_LIMIT`].
pub fn apply_state_delta(state: &EngineState, delta: &StateDelta) -> EngineState {
    let mut clocks = state.clocks.clone();
    for (name, add) in &delta.clocks_add {
        *clocks.entry(name.clone()).or_insert(0) += add;
    }

    let mut tag_cooldowns = state.tag_cooldowns.clone();
    for (tag, cd) in &delta.tag_cooldowns_set {
        if *cd > 0 {
            tag_cooldowns.insert(tag.clone(), *cd);
        } else {
            tag_cooldowns.remove(tag);
        }
    }

    let mut recent_event_ids = state.recent_event_ids.clone();
    for id in &delta.recent_event_ids_add {
        recent_event_ids.retain(|existing| existing != id);
        recent_event_ids.push(id.clone());
    }
    if recent_event_ids.len() > RECENT_EVENT_LIMIT {
        let excess = recent_event_ids.len() - RECENT_EVENT_LIMIT;
        recent_event_ids.drain(..excess);
    }

    EngineState {
        clocks,
        tag_cooldowns,
        recent_event_ids,
    }
}
