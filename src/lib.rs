//! scenespark - procedural scene complication and loot engine.
//!
//! Core library providing deterministic event/loot generation, engine state
//! transforms, and campaign-level pressure tracking for tabletop RPG game
//! masters. The library is pure and synchronous: callers thread `EngineState`
//! and `CampaignState` values through the generation loop explicitly, and
//! every random decision flows through a single seeded `TraceRng` so identical
//! inputs reproduce identical sessions.
pub mod config;
pub mod core;

pub use config::TuningConfig;
pub use crate::core::campaign::{
    apply_campaign_delta, decay_campaign_state, get_campaign_influence,
    record_severity_high_water_mark, CampaignDelta, CampaignInfluence, CampaignState,
    FactionAdjustment, FactionState, HeatBand, PressureBand, Scar, ScarCategory, ScarSeverity,
};
pub use crate::core::engine::content::{load_pack, parse_pack, ContentEntry};
pub use crate::core::engine::errors::{EngineError, Result};
pub use crate::core::engine::generator::{
    generate_event, generate_event_with, generate_loot, generate_loot_with, summarize_batch,
    BatchSummary,
};
pub use crate::core::engine::rng::TraceRng;
pub use crate::core::engine::state::{apply_state_delta, tick_state, EngineState};
pub use crate::core::engine::types::{
    Constraints, CutoffResolution, EffectVector, EventResult, Fiction, GeneratorKind, PartyBand,
    RarityMode, SceneContext, ScenePhase, SelectionContext, StateDelta,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
