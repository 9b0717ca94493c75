//! Campaign layer: long-arc pressure, heat, scars, and faction attention,
//! plus the influence scoring that feeds accumulated state back into scene
//! setup.

pub mod influence;
pub mod mechanics;
pub mod types;

pub use influence::{get_campaign_influence, CampaignInfluence};
pub use mechanics::{apply_campaign_delta, decay_campaign_state, record_severity_high_water_mark};
pub use types::{
    CampaignDelta, CampaignState, FactionAdjustment, FactionState, HeatBand, PressureBand, Scar,
    ScarCategory, ScarSeverity,
};
