//! Event and loot orchestration.
//!
//! One pipeline serves both generators: filter, pick, sample severity against
//! the cap, realize effects, render fiction, and emit a `StateDelta` for the
//! caller to fold back in. The whole pipeline is total and deterministic for
//! fixed (scene, state, selection, entries, rng state).

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::TuningConfig;

use super::content::{filter_entries, select_entry, ContentEntry};
use super::errors::{EngineError, Result};
use super::rng::TraceRng;
use super::severity::{
    applied_severity, compute_alpha, compute_severity_cap, resolve_cutoff, sample_severity,
    CutoffHandler,
};
use super::state::EngineState;
use super::types::{
    AxisRange, CutoffResolution, EffectTemplate, EffectVector, EventResult, Fiction,
    GeneratorKind, SceneContext, SelectionContext, StateDelta,
};

/// Generate one scene complication with the default tuning.
pub fn generate_event(
    scene: &SceneContext,
    state: &EngineState,
    selection: &SelectionContext,
    entries: &[ContentEntry],
    rng: &mut TraceRng,
) -> Result<EventResult> {
    generate_event_with(&TuningConfig::default(), scene, state, selection, entries, rng)
}

/// Generate one scene complication.
pub fn generate_event_with(
    tuning: &TuningConfig,
    scene: &SceneContext,
    state: &EngineState,
    selection: &SelectionContext,
    entries: &[ContentEntry],
    rng: &mut TraceRng,
) -> Result<EventResult> {
    generate(GeneratorKind::Complication, tuning, scene, state, selection, entries, rng)
}

/// Generate one loot situation with the default tuning.
pub fn generate_loot(
    scene: &SceneContext,
    state: &EngineState,
    selection: &SelectionContext,
    entries: &[ContentEntry],
    rng: &mut TraceRng,
) -> Result<EventResult> {
    generate_loot_with(&TuningConfig::default(), scene, state, selection, entries, rng)
}

/// Generate one loot situation.
pub fn generate_loot_with(
    tuning: &TuningConfig,
    scene: &SceneContext,
    state: &EngineState,
    selection: &SelectionContext,
    entries: &[ContentEntry],
    rng: &mut TraceRng,
) -> Result<EventResult> {
    generate(GeneratorKind::Loot, tuning, scene, state, selection, entries, rng)
}

fn generate(
    kind: GeneratorKind,
    tuning: &TuningConfig,
    scene: &SceneContext,
    state: &EngineState,
    selection: &SelectionContext,
    entries: &[ContentEntry],
    rng: &mut TraceRng,
) -> Result<EventResult> {
    let eligible = filter_entries(scene, state, selection, entries, tuning);
    if eligible.is_empty() {
        return Err(EngineError::ContentExhausted {
            kind: kind.to_string(),
            considered: entries.len(),
        });
    }

    let entry = select_entry(rng, &eligible, state, tuning)?;

    let alpha = compute_alpha(selection.rarity_mode, &scene.constraints);
    let cap = compute_severity_cap(
        scene.party_band,
        scene.phase,
        &scene.constraints,
        state,
        selection.rarity_mode,
    );
    let raw = sample_severity(rng, alpha, 1, 10)?;

    let (severity, cutoff) = if raw > cap {
        let handler = resolve_cutoff(rng, kind)?;
        (applied_severity(cap, &handler), Some(handler))
    } else {
        (raw, None)
    };

    let effect_vector = realize_effects(rng, &entry.effects, severity);
    let fiction = render_fiction(&entry.fiction, &entry.title, scene, severity, &cutoff);
    let followups = derive_followups(entry, severity, &cutoff);
    let state_delta = build_state_delta(tuning, entry, severity, &effect_vector, &cutoff);

    let cutoff_resolution = cutoff
        .map(|h| h.resolution)
        .unwrap_or(CutoffResolution::None);
    debug!(
        event_id = %entry.id,
        %kind,
        severity,
        raw,
        cap,
        resolution = %cutoff_resolution,
        "generated result"
    );

    Ok(EventResult {
        event_id: entry.id.clone(),
        title: entry.title.clone(),
        tags: entry.tags.clone(),
        severity,
        cutoff_applied: cutoff.is_some(),
        cutoff_resolution,
        effect_vector,
        fiction,
        followups,
        state_delta,
    })
}

// ============================================================================
// Pipeline stages
// ============================================================================

fn realize_axis(rng: &mut TraceRng, range: &AxisRange, scale: f64, label: &str) -> i64 {
    if range.min == 0 && range.max == 0 {
        return 0;
    }
    let raw = rng.roll_range(range.min, range.max, label);
    (raw as f64 * scale).round() as i64
}

/// Draw each effect axis from its template range and scale by severity
/// (severity 5 is the 1.0x baseline). Signs are preserved, so relief-style
/// negative costs stay negative.
fn realize_effects(rng: &mut TraceRng, template: &EffectTemplate, severity: u8) -> EffectVector {
    let scale = 0.5 + 0.1 * f64::from(severity);
    EffectVector {
        harm: realize_axis(rng, &template.harm, scale, "effect.harm"),
        cost: realize_axis(rng, &template.cost, scale, "effect.cost"),
        heat: realize_axis(rng, &template.heat, scale, "effect.heat"),
        opportunity: realize_axis(rng, &template.opportunity, scale, "effect.opportunity"),
        position: realize_axis(rng, &template.position, scale, "effect.position"),
    }
}

fn substitute(template: &str, scene: &SceneContext, severity: u8, title: &str) -> String {
    let environment = scene
        .environment
        .first()
        .map(String::as_str)
        .unwrap_or("the area");
    template
        .replace("{environment}", environment)
        .replace("{phase}", &scene.phase.to_string())
        .replace("{scene}", &scene.scene_id)
        .replace("{severity}", &severity.to_string())
        .replace("{title}", title)
}

fn render_fiction(
    template: &Fiction,
    title: &str,
    scene: &SceneContext,
    severity: u8,
    cutoff: &Option<CutoffHandler>,
) -> Fiction {
    let mut prompt = substitute(&template.prompt, scene, severity, title);
    if let Some(handler) = cutoff {
        prompt = format!("{}: {}", handler.overlay, prompt);
    }
    Fiction {
        prompt,
        immediate_choice: [
            substitute(&template.immediate_choice[0], scene, severity, title),
            substitute(&template.immediate_choice[1], scene, severity, title),
        ],
    }
}

fn derive_followups(
    entry: &ContentEntry,
    severity: u8,
    cutoff: &Option<CutoffHandler>,
) -> Vec<String> {
    let mut followups = Vec::new();
    if severity >= 7 {
        followups.push(format!("escalation:{}", entry.id));
    }
    if let Some(handler) = cutoff {
        if let Some(hook) = handler.followup_hook {
            followups.push(format!("{hook}:{}", entry.id));
        }
    }
    followups
}

fn build_state_delta(
    tuning: &TuningConfig,
    entry: &ContentEntry,
    severity: u8,
    effects: &EffectVector,
    cutoff: &Option<CutoffHandler>,
) -> StateDelta {
    let mut clocks_add: BTreeMap<String, i64> = BTreeMap::new();
    let tension = i64::from(severity) / 4;
    if tension > 0 {
        clocks_add.insert("tension".to_string(), tension);
    }
    if effects.heat > 0 {
        *clocks_add.entry("heat".to_string()).or_insert(0) += effects.heat;
    }

    let mut tag_cooldowns_set: BTreeMap<String, i64> = BTreeMap::new();
    let cooldown = tuning.base_cooldown + cutoff.map(|h| h.cooldown_bonus).unwrap_or(0);
    for tag in &entry.tags {
        tag_cooldowns_set.insert(tag.clone(), cooldown);
    }
    if let Some(handler) = cutoff {
        if let Some((clock, amount)) = handler.clock_tick {
            *clocks_add.entry(clock.to_string()).or_insert(0) += amount;
        }
        if let Some(tag) = handler.implicated_tag {
            let existing = tag_cooldowns_set.get(tag).copied().unwrap_or(0);
            tag_cooldowns_set.insert(tag.to_string(), existing.max(tuning.base_cooldown));
        }
    }

    StateDelta {
        clocks_add,
        tag_cooldowns_set,
        recent_event_ids_add: vec![entry.id.clone()],
    }
}

// ============================================================================
// Batch diagnostics
// ============================================================================

/// Severity histogram buckets used by the table-facing diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityBuckets {
    /// Severity 1-3.
    pub low: usize,
    /// Severity 4-6.
    pub mid: usize,
    /// Severity 7-10.
    pub high: usize,
}

/// Aggregate view over a batch of results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub n: usize,
    pub cutoff_rate: f64,
    pub severity_buckets: SeverityBuckets,
    pub severity_min: Option<u8>,
    pub severity_max: Option<u8>,
    pub severity_avg: Option<f64>,
    pub resolution_counts: BTreeMap<String, usize>,
    /// Tag frequencies, most common first (ties alphabetical).
    pub top_tags: Vec<(String, usize)>,
    /// Event id frequencies, most common first (ties alphabetical).
    pub top_event_ids: Vec<(String, usize)>,
}

/// Summarize a batch of generated results for diagnostics.
pub fn summarize_batch(results: &[EventResult]) -> BatchSummary {
    let n = results.len();
    if n == 0 {
        return BatchSummary::default();
    }

    let mut buckets = SeverityBuckets::default();
    let mut cutoffs = 0usize;
    let mut resolution_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut tag_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut id_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut min = u8::MAX;
    let mut max = u8::MIN;
    let mut sum = 0u64;

    for r in results {
        match r.severity {
            1..=3 => buckets.low += 1,
            4..=6 => buckets.mid += 1,
            _ => buckets.high += 1,
        }
        if r.cutoff_applied {
            cutoffs += 1;
        }
        *resolution_counts
            .entry(r.cutoff_resolution.to_string())
            .or_insert(0) += 1;
        for tag in &r.tags {
            *tag_counts.entry(tag.clone()).or_insert(0) += 1;
        }
        *id_counts.entry(r.event_id.clone()).or_insert(0) += 1;
        min = min.min(r.severity);
        max = max.max(r.severity);
        sum += u64::from(r.severity);
    }

    let rank = |counts: BTreeMap<String, usize>| {
        let mut v: Vec<(String, usize)> = counts.into_iter().collect();
        v.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        v
    };

    BatchSummary {
        n,
        cutoff_rate: cutoffs as f64 / n as f64,
        severity_buckets: buckets,
        severity_min: Some(min),
        severity_max: Some(max),
        severity_avg: Some(sum as f64 / n as f64),
        resolution_counts,
        top_tags: rank(tag_counts),
        top_event_ids: rank(id_counts),
    }
}
