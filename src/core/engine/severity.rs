//! Severity model: heavy-tailed sampling, the scene-sensitive hard cap, and
//! the cutoff-conversion policy.
//!
//! The cap is a finite-size safety rail: raw draws above it are never
//! resampled. Instead the mechanical effect is bounded and the excess is
//! converted into one narrative resolution, so an extreme roll still leaves a
//! visible mark on the fiction.

use super::errors::Result;
use super::rng::TraceRng;
use super::state::EngineState;
use super::types::{Constraints, CutoffResolution, GeneratorKind, PartyBand, RarityMode, ScenePhase};

/// Zipf-like exponent for the severity distribution.
///
/// Lower alpha means a fatter tail (more big severities); higher alpha means
/// a steeper drop. Derived from the rarity preset and scene morphology.
pub fn compute_alpha(rarity_mode: RarityMode, constraints: &Constraints) -> f64 {
    let base = match rarity_mode {
        RarityMode::Calm => 2.2,
        RarityMode::Normal => 1.6,
        RarityMode::Spiky => 1.2,
    };
    let alpha = base - 0.35 * constraints.morphology();
    alpha.clamp(0.8, 3.0)
}

fn base_cap(party_band: PartyBand, phase: ScenePhase) -> i64 {
    let row: [i64; 3] = match party_band {
        PartyBand::Low => [6, 7, 6],
        PartyBand::Mid => [7, 8, 7],
        PartyBand::High => [8, 9, 8],
        PartyBand::Unknown => [7, 8, 7],
    };
    match phase {
        ScenePhase::Approach => row[0],
        ScenePhase::Engage => row[1],
        ScenePhase::Aftermath => row[2],
    }
}

/// Hard severity cap for the current scene, clamped to `[3, 10]`.
///
/// Spiky lowers the cap in high-morphology scenes (more conversions); calm
/// raises it (fewer). Tension and heat clocks at 9+ each buy one extra point
/// of headroom.
pub fn compute_severity_cap(
    party_band: PartyBand,
    phase: ScenePhase,
    constraints: &Constraints,
    state: &EngineState,
    rarity_mode: RarityMode,
) -> u8 {
    let morph = constraints.morphology();
    let mut cap = base_cap(party_band, phase) + (morph.clamp(-1.0, 2.0) * 0.75).round() as i64;

    if state.clock("tension") >= 9 {
        cap += 1;
    }
    if state.clock("heat") >= 9 {
        cap += 1;
    }

    match rarity_mode {
        RarityMode::Spiky => {
            if morph >= 0.9 {
                cap -= 1;
            }
            if morph >= 1.4 {
                cap -= 1;
            }
        }
        RarityMode::Calm => cap += 1,
        RarityMode::Normal => {}
    }

    cap.clamp(3, 10) as u8
}

/// Discrete power-law severity draw over `lo..=hi` with weight `1 / s^alpha`.
pub fn sample_severity(rng: &mut TraceRng, alpha: f64, lo: u8, hi: u8) -> Result<u8> {
    let severities: Vec<u8> = (lo..=hi).collect();
    let weights: Vec<f64> = severities
        .iter()
        .map(|s| 1.0 / f64::from(*s).powf(alpha))
        .collect();
    rng.weighted_choice(
        &severities,
        &weights,
        &format!("severity(zipf,alpha={alpha:.2})"),
    )
}

// ============================================================================
// Cutoff handler table
// ============================================================================

/// Table entry describing how one resolution converts a capped draw.
#[derive(Debug, Clone, Copy)]
pub struct CutoffHandler {
    pub resolution: CutoffResolution,
    pub weight: f64,
    /// Fiction overlay prefixed to the rendered prompt.
    pub overlay: &'static str,
    /// Followup hook id, rendered as `{hook}:{entry_id}`.
    pub followup_hook: Option<&'static str>,
    /// Extra ticks added on top of the base cooldown for the entry's tags.
    pub cooldown_bonus: i64,
    /// Clock bumped by the resolution itself.
    pub clock_tick: Option<(&'static str, i64)>,
    /// Tag put on cooldown by the resolution, beyond the entry's own tags.
    pub implicated_tag: Option<&'static str>,
    /// Shift applied to the capped severity (downshift lands below the cap).
    pub severity_shift: i64,
}

/// Closed handler set for one generator kind. Complications and loot share
/// the same mechanics but read differently at the table.
pub fn cutoff_handlers(kind: GeneratorKind) -> [CutoffHandler; 3] {
    let (omen_overlay, clock_overlay, downshift_overlay) = match kind {
        GeneratorKind::Complication => ("Dark Omen", "Pressure Mounts", "Glancing Blow"),
        GeneratorKind::Loot => ("Omen of Wealth", "Contested Resource", "Modest Gain"),
    };
    let (omen_hook, clock_hook) = match kind {
        GeneratorKind::Complication => ("omen_echo", "tension_clock"),
        GeneratorKind::Loot => ("wealth_omen", "contested_resource"),
    };
    [
        CutoffHandler {
            resolution: CutoffResolution::Omen,
            weight: 0.4,
            overlay: omen_overlay,
            followup_hook: Some(omen_hook),
            cooldown_bonus: 1,
            clock_tick: None,
            implicated_tag: Some("mystic"),
            severity_shift: 0,
        },
        CutoffHandler {
            resolution: CutoffResolution::ClockTick,
            weight: 0.35,
            overlay: clock_overlay,
            followup_hook: Some(clock_hook),
            cooldown_bonus: 0,
            clock_tick: Some(("tension", 1)),
            implicated_tag: Some("time_pressure"),
            severity_shift: 0,
        },
        CutoffHandler {
            resolution: CutoffResolution::Downshift,
            weight: 0.25,
            overlay: downshift_overlay,
            followup_hook: None,
            cooldown_bonus: 0,
            clock_tick: None,
            implicated_tag: None,
            severity_shift: -2,
        },
    ]
}

/// Pick one cutoff resolution for an over-cap draw and return its handler.
pub fn resolve_cutoff(rng: &mut TraceRng, kind: GeneratorKind) -> Result<CutoffHandler> {
    let handlers = cutoff_handlers(kind);
    let resolutions: Vec<CutoffResolution> = handlers.iter().map(|h| h.resolution).collect();
    let weights: Vec<f64> = handlers.iter().map(|h| h.weight).collect();
    let chosen = rng.weighted_choice(&resolutions, &weights, "cutoff_resolution")?;
    // The resolution came out of the table, so the lookup always succeeds.
    Ok(handlers
        .into_iter()
        .find(|h| h.resolution == chosen)
        .unwrap_or(handlers[2]))
}

/// Mechanical severity actually applied after a cutoff.
pub fn applied_severity(cap: u8, handler: &CutoffHandler) -> u8 {
    (i64::from(cap) + handler.severity_shift).clamp(1, i64::from(cap)) as u8
}
