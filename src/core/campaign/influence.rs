//! Influence scoring: turn accumulated campaign state into scene-setup hints.
//!
//! Campaign state suggests, scene setup decides. The output is advisory tag
//! and faction hints plus human-readable notes; nothing here mutates engine
//! behavior directly.

use crate::core::engine::types::RarityMode;

use super::types::{CampaignState, HeatBand, PressureBand, ScarCategory};

/// Scene-setup hints derived from campaign state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignInfluence {
    pub include_tags: Vec<String>,
    pub exclude_tags: Vec<String>,
    pub rarity_bias: Option<RarityMode>,
    pub notes: Vec<String>,
    /// Spotlight factions, highest score first, at most three.
    pub suggested_factions_involved: Vec<String>,
    pub faction_influence_notes: Vec<String>,
    pub faction_tag_bias: Vec<String>,
    pub pressure_band: Option<PressureBand>,
    pub heat_band: Option<HeatBand>,
}

const SPOTLIGHT_THRESHOLD: i64 = 3;
const SPOTLIGHT_LIMIT: usize = 3;

fn push_unique(tags: &mut Vec<String>, tag: &str) {
    if !tags.iter().any(|t| t == tag) {
        tags.push(tag.to_string());
    }
}

/// Deterministic translation of campaign state into scene-setup hints.
pub fn get_campaign_influence(state: &CampaignState) -> CampaignInfluence {
    let mut influence = CampaignInfluence::default();
    let pressure_band = state.pressure_band();
    let heat_band = state.heat_band();

    if state.campaign_pressure >= 20 {
        push_unique(&mut influence.include_tags, "time_pressure");
        push_unique(&mut influence.include_tags, "reinforcements");
        influence.rarity_bias = Some(RarityMode::Spiky);
        influence
            .notes
            .push("Very high campaign pressure: volatile conditions likely".to_string());
    } else if state.campaign_pressure >= 10 {
        push_unique(&mut influence.include_tags, "time_pressure");
        influence
            .notes
            .push("Elevated campaign pressure: situation remains tense".to_string());
    }

    if state.heat >= 15 {
        push_unique(&mut influence.include_tags, "social_friction");
        push_unique(&mut influence.include_tags, "visibility");
        influence
            .notes
            .push("High heat: authorities and factions are aware".to_string());
    } else if state.heat >= 8 {
        push_unique(&mut influence.include_tags, "visibility");
        influence
            .notes
            .push("Moderate heat: attention is building".to_string());
    }

    if state.campaign_pressure < 5 && state.heat < 5 {
        push_unique(&mut influence.exclude_tags, "time_pressure");
        influence
            .notes
            .push("Low pressure: opportunity for recovery".to_string());
    }

    for scar in &state.scars {
        match scar.category {
            ScarCategory::Resource => {
                push_unique(&mut influence.include_tags, "attrition");
                influence
                    .notes
                    .push(format!("Scar: {} - supply pressure continues", scar.scar_id));
            }
            ScarCategory::Social | ScarCategory::Political | ScarCategory::Reputation => {
                push_unique(&mut influence.include_tags, "social_friction");
                influence
                    .notes
                    .push(format!("Scar: {} - social complications likely", scar.scar_id));
            }
            ScarCategory::Physical | ScarCategory::Environment => {}
        }
    }

    if pressure_band != PressureBand::Stable || heat_band != HeatBand::Quiet {
        influence.notes.push(format!(
            "Campaign state: {pressure_band} pressure, {heat_band} heat"
        ));
    }

    // Faction spotlight scoring. Archived factions never score.
    let high_heat = matches!(heat_band, HeatBand::Hunted | HeatBand::Exposed);
    let mut scored: Vec<(&String, i64, Vec<String>)> = Vec::new();
    for (fid, faction) in &state.factions {
        if !faction.is_active {
            continue;
        }
        let mut score = faction.attention;
        let mut reasons = vec![format!("Attention: {}", faction.attention)];
        if faction.disposition != 0 {
            score += 1;
            reasons.push(format!("Non-neutral ({})", faction.disposition_label()));
        }
        if high_heat {
            score += 1;
            reasons.push(format!("High heat ({heat_band})"));
        }
        if score > 0 {
            scored.push((fid, score, reasons));
        }
    }

    // All-zero-attention fallback: surface every active faction anyway.
    if scored.is_empty() {
        scored = state
            .factions
            .iter()
            .filter(|(_, f)| f.is_active)
            .map(|(fid, _)| (fid, 0, vec!["No attention yet".to_string()]))
            .collect();
    }

    // Stable sort keeps insertion order among equal scores.
    scored.sort_by(|a, b| b.1.cmp(&a.1));

    let above: Vec<&(&String, i64, Vec<String>)> = scored
        .iter()
        .filter(|(_, score, _)| *score >= SPOTLIGHT_THRESHOLD)
        .collect();
    let top: Vec<(&String, i64, Vec<String>)> = if !above.is_empty() {
        above
            .into_iter()
            .take(SPOTLIGHT_LIMIT)
            .cloned()
            .collect()
    } else {
        scored.iter().take(SPOTLIGHT_LIMIT).cloned().collect()
    };

    for (fid, score, reasons) in &top {
        influence.suggested_factions_involved.push((*fid).clone());
        if let Some(faction) = state.factions.get(*fid) {
            influence.faction_influence_notes.push(format!(
                "{} (score: {score}): {}",
                faction.name,
                reasons.join(", ")
            ));
            if faction.attention >= 10 {
                push_unique(&mut influence.faction_tag_bias, "reinforcements");
                push_unique(&mut influence.faction_tag_bias, "visibility");
            }
            if faction.disposition <= -1 {
                push_unique(&mut influence.faction_tag_bias, "social_friction");
                if faction.disposition == -2 {
                    push_unique(&mut influence.faction_tag_bias, "threat");
                }
            } else if faction.disposition >= 1 {
                push_unique(&mut influence.faction_tag_bias, "opportunity");
                if faction.disposition == 2 {
                    push_unique(&mut influence.faction_tag_bias, "information");
                }
            }
        }
    }

    for tag in influence.faction_tag_bias.clone() {
        push_unique(&mut influence.include_tags, &tag);
    }

    influence.pressure_band = Some(pressure_band);
    influence.heat_band = Some(heat_band);
    influence
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::campaign::types::{FactionState, Scar, ScarSeverity};

    fn faction(id: &str, attention: i64, disposition: i64) -> FactionState {
        FactionState {
            attention,
            disposition,
            ..FactionState::new(id, id.to_uppercase())
        }
    }

    #[test]
    fn quiet_campaign_suppresses_time_pressure() {
        let influence = get_campaign_influence(&CampaignState::default());
        assert!(influence.include_tags.is_empty());
        assert_eq!(influence.exclude_tags, vec!["time_pressure".to_string()]);
        assert_eq!(influence.rarity_bias, None);
        assert_eq!(influence.pressure_band, Some(PressureBand::Stable));
    }

    #[test]
    fn critical_pressure_biases_spiky() {
        let state = CampaignState {
            campaign_pressure: 20,
            ..Default::default()
        };
        let influence = get_campaign_influence(&state);
        assert!(influence.include_tags.contains(&"time_pressure".to_string()));
        assert!(influence.include_tags.contains(&"reinforcements".to_string()));
        assert_eq!(influence.rarity_bias, Some(RarityMode::Spiky));
    }

    #[test]
    fn heat_bands_add_visibility_then_social_friction() {
        let mut state = CampaignState {
            heat: 8,
            ..Default::default()
        };
        let mid = get_campaign_influence(&state);
        assert!(mid.include_tags.contains(&"visibility".to_string()));
        assert!(!mid.include_tags.contains(&"social_friction".to_string()));

        state.heat = 15;
        let high = get_campaign_influence(&state);
        assert!(high.include_tags.contains(&"social_friction".to_string()));
        assert!(high.include_tags.contains(&"visibility".to_string()));
    }

    #[test]
    fn scar_categories_nudge_tags() {
        let mut state = CampaignState::default();
        state.scars.push(Scar {
            scar_id: "supplies_lost".to_string(),
            category: ScarCategory::Resource,
            severity: ScarSeverity::Medium,
            source: None,
            created_scene_index: None,
            notes: None,
        });
        state.scars.push(Scar {
            scar_id: "bridge_burned".to_string(),
            category: ScarCategory::Political,
            severity: ScarSeverity::High,
            source: None,
            created_scene_index: None,
            notes: None,
        });
        let influence = get_campaign_influence(&state);
        assert!(influence.include_tags.contains(&"attrition".to_string()));
        assert!(influence.include_tags.contains(&"social_friction".to_string()));
    }

    #[test]
    fn hostile_watched_faction_scores_and_biases() {
        let mut state = CampaignState {
            heat: 10, // hunted
            ..Default::default()
        };
        state
            .factions
            .insert("watch".to_string(), faction("watch", 15, -2));
        let influence = get_campaign_influence(&state);
        // 15 attention + 1 non-neutral + 1 high heat
        assert!(influence.faction_influence_notes[0].contains("score: 17"));
        assert_eq!(
            influence.suggested_factions_involved,
            vec!["watch".to_string()]
        );
        for tag in ["reinforcements", "visibility", "social_friction", "threat"] {
            assert!(influence.faction_tag_bias.contains(&tag.to_string()));
            assert!(influence.include_tags.contains(&tag.to_string()));
        }
    }

    #[test]
    fn allied_faction_contributes_opportunity_and_information() {
        let mut state = CampaignState::default();
        state
            .factions
            .insert("guild".to_string(), faction("guild", 4, 2));
        let influence = get_campaign_influence(&state);
        assert!(influence.faction_tag_bias.contains(&"opportunity".to_string()));
        assert!(influence.faction_tag_bias.contains(&"information".to_string()));
        assert!(!influence.faction_tag_bias.contains(&"reinforcements".to_string()));
    }

    #[test]
    fn below_threshold_factions_fall_back_to_top_three() {
        let mut state = CampaignState::default();
        for (i, id) in ["a", "b", "c", "d"].iter().enumerate() {
            state
                .factions
                .insert(id.to_string(), faction(id, (i % 2) as i64 + 1, 0));
        }
        let influence = get_campaign_influence(&state);
        assert_eq!(influence.suggested_factions_involved.len(), 3);
        // Highest scores first.
        assert_eq!(influence.suggested_factions_involved[0], "b");
    }

    #[test]
    fn zero_attention_fallback_surfaces_all_active_factions() {
        let mut state = CampaignState::default();
        state
            .factions
            .insert("a".to_string(), faction("a", 0, 0));
        state
            .factions
            .insert("b".to_string(), faction("b", 0, 0));
        let mut archived = faction("c", 0, 0);
        archived.is_active = false;
        state.factions.insert("c".to_string(), archived);
        let influence = get_campaign_influence(&state);
        assert_eq!(
            influence.suggested_factions_involved,
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn archived_factions_never_score() {
        let mut state = CampaignState::default();
        let mut gone = faction("gone", 18, -2);
        gone.is_active = false;
        state.factions.insert("gone".to_string(), gone);
        state
            .factions
            .insert("here".to_string(), faction("here", 5, 0));
        let influence = get_campaign_influence(&state);
        assert_eq!(
            influence.suggested_factions_involved,
            vec!["here".to_string()]
        );
    }
}
