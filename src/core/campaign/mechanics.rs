//! Pure campaign-state transforms: apply a scene's delta, decay between
//! scenes, and track the severity high-water mark.

use indexmap::IndexMap;

use crate::config::TuningConfig;

use super::types::{CampaignState, CampaignDelta, FactionState};

/// Derive a Title Case display name from a `snake_case` faction id.
fn display_name_from_id(faction_id: &str) -> String {
    faction_id
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Fold one scene's delta into campaign state.
///
/// Pressure and heat land clamped to `[0, cap]` whatever the delta's sign or
/// magnitude. Scars append only when the id is unseen, so re-applying the
/// same delta is idempotent on scars. Unknown faction ids are created on the
/// spot with a display name derived from the id.
pub fn apply_campaign_delta(
    state: &CampaignState,
    delta: &CampaignDelta,
    tuning: &TuningConfig,
) -> CampaignState {
    let campaign_pressure =
        (state.campaign_pressure + delta.campaign_pressure_add).clamp(0, tuning.pressure_cap);
    let heat = (state.heat + delta.heat_add).clamp(0, tuning.heat_cap);

    let mut scars = state.scars.clone();
    for scar in &delta.scars_add {
        if !scars.iter().any(|s| s.scar_id == scar.scar_id) {
            scars.push(scar.clone());
        }
    }

    let mut factions: IndexMap<String, FactionState> = state.factions.clone();
    for (faction_id, adjustment) in &delta.faction_updates {
        match factions.get_mut(faction_id) {
            Some(faction) => {
                faction.attention = (faction.attention + adjustment.attention_add).clamp(0, 20);
                faction.disposition =
                    (faction.disposition + adjustment.disposition_add).clamp(-2, 2);
            }
            None => {
                let mut faction =
                    FactionState::new(faction_id.clone(), display_name_from_id(faction_id));
                faction.attention = adjustment.attention_add.clamp(0, 20);
                faction.disposition = adjustment.disposition_add.clamp(-2, 2);
                factions.insert(faction_id.clone(), faction);
            }
        }
    }

    CampaignState {
        version: state.version.clone(),
        campaign_pressure,
        heat,
        scars,
        factions,
        total_scenes_run: state.total_scenes_run + delta.scenes_increment,
        total_cutoffs_seen: state.total_cutoffs_seen + delta.cutoffs_increment,
        highest_severity_seen: state.highest_severity_seen,
    }
}

/// Between-scenes decay: pressure and heat drop by the configured amounts
/// with floor 0. Scars are permanent and factions decay only through
/// explicit updates, so both pass through untouched.
pub fn decay_campaign_state(state: &CampaignState, tuning: &TuningConfig) -> CampaignState {
    CampaignState {
        campaign_pressure: (state.campaign_pressure - tuning.pressure_decay).max(0),
        heat: (state.heat - tuning.heat_decay).max(0),
        ..state.clone()
    }
}

/// Monotonic update of the highest applied severity the campaign has seen.
pub fn record_severity_high_water_mark(state: &CampaignState, severity: u8) -> CampaignState {
    if severity <= state.highest_severity_seen {
        return state.clone();
    }
    CampaignState {
        highest_severity_seen: severity,
        ..state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::campaign::types::{FactionAdjustment, Scar, ScarCategory, ScarSeverity};

    fn scar(id: &str) -> Scar {
        Scar {
            scar_id: id.to_string(),
            category: ScarCategory::Resource,
            severity: ScarSeverity::Medium,
            source: None,
            created_scene_index: None,
            notes: None,
        }
    }

    #[test]
    fn pressure_and_heat_are_clamped_to_caps() {
        let tuning = TuningConfig::default();
        let state = CampaignState::default();

        let delta = CampaignDelta {
            campaign_pressure_add: 25,
            heat_add: 50,
            ..Default::default()
        };
        let s1 = apply_campaign_delta(&state, &delta, &tuning);
        assert_eq!(s1.campaign_pressure, 25);
        assert_eq!(s1.heat, tuning.heat_cap);

        let delta2 = CampaignDelta {
            campaign_pressure_add: 10,
            ..Default::default()
        };
        let s2 = apply_campaign_delta(&s1, &delta2, &tuning);
        assert_eq!(s2.campaign_pressure, tuning.pressure_cap);
    }

    #[test]
    fn negative_delta_never_goes_below_zero() {
        let tuning = TuningConfig::default();
        let state = CampaignState {
            campaign_pressure: 3,
            heat: 1,
            ..Default::default()
        };
        let delta = CampaignDelta {
            campaign_pressure_add: -10,
            heat_add: -10,
            ..Default::default()
        };
        let next = apply_campaign_delta(&state, &delta, &tuning);
        assert_eq!(next.campaign_pressure, 0);
        assert_eq!(next.heat, 0);
    }

    #[test]
    fn scar_application_is_idempotent() {
        let tuning = TuningConfig::default();
        let state = CampaignState::default();
        let delta = CampaignDelta {
            scars_add: vec![scar("supplies_lost")],
            ..Default::default()
        };
        let once = apply_campaign_delta(&state, &delta, &tuning);
        let twice = apply_campaign_delta(&once, &delta, &tuning);
        assert_eq!(once.scars.len(), 1);
        assert_eq!(twice.scars.len(), 1);
    }

    #[test]
    fn unknown_faction_is_created_with_derived_name() {
        let tuning = TuningConfig::default();
        let mut delta = CampaignDelta::default();
        delta.faction_updates.insert(
            "iron_syndicate".to_string(),
            FactionAdjustment {
                attention_add: 2,
                disposition_add: -1,
            },
        );
        let next = apply_campaign_delta(&CampaignState::default(), &delta, &tuning);
        let faction = &next.factions["iron_syndicate"];
        assert_eq!(faction.name, "Iron Syndicate");
        assert_eq!(faction.attention, 2);
        assert_eq!(faction.disposition, -1);
        assert!(faction.is_active);
    }

    #[test]
    fn existing_faction_updates_are_clamped() {
        let tuning = TuningConfig::default();
        let mut state = CampaignState::default();
        let mut watch = FactionState::new("watch", "City Watch");
        watch.attention = 19;
        watch.disposition = -2;
        state.factions.insert("watch".to_string(), watch);

        let mut delta = CampaignDelta::default();
        delta.faction_updates.insert(
            "watch".to_string(),
            FactionAdjustment {
                attention_add: 5,
                disposition_add: -3,
            },
        );
        let next = apply_campaign_delta(&state, &delta, &tuning);
        assert_eq!(next.factions["watch"].attention, 20);
        assert_eq!(next.factions["watch"].disposition, -2);
    }

    #[test]
    fn counters_track_scenes_and_explicit_cutoffs() {
        let tuning = TuningConfig::default();
        let state = CampaignState::default();
        let delta = CampaignDelta {
            campaign_pressure_add: 4,
            cutoffs_increment: 0,
            ..Default::default()
        };
        // Large pressure add without a cutoff must not bump the counter.
        let next = apply_campaign_delta(&state, &delta, &tuning);
        assert_eq!(next.total_scenes_run, 1);
        assert_eq!(next.total_cutoffs_seen, 0);

        let delta2 = CampaignDelta {
            cutoffs_increment: 1,
            ..Default::default()
        };
        let after = apply_campaign_delta(&next, &delta2, &tuning);
        assert_eq!(after.total_cutoffs_seen, 1);
    }

    #[test]
    fn decay_floors_at_zero_and_preserves_scars() {
        let tuning = TuningConfig::default();
        let mut state = CampaignState::default();
        state.campaign_pressure = 1;
        state.heat = 0;
        state.scars.push(scar("old_wound"));
        let once = decay_campaign_state(&state, &tuning);
        let twice = decay_campaign_state(&once, &tuning);
        assert_eq!(twice.campaign_pressure, 0);
        assert_eq!(twice.heat, 0);
        assert_eq!(twice.scars, state.scars);
    }

    #[test]
    fn high_water_mark_is_monotonic() {
        let state = CampaignState::default();
        let up = record_severity_high_water_mark(&state, 7);
        assert_eq!(up.highest_severity_seen, 7);
        let same = record_severity_high_water_mark(&up, 4);
        assert_eq!(same.highest_severity_seen, 7);
    }

    #[test]
    fn display_name_handles_multiword_ids() {
        assert_eq!(display_name_from_id("the_gilded_hand"), "The Gilded Hand");
        assert_eq!(display_name_from_id("watch"), "Watch");
    }
}
