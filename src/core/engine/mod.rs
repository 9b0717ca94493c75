//! Deterministic generation core: seeded RNG, content selection, severity
//! model, and the event/loot orchestration that ties them together.

pub mod content;
pub mod errors;
pub mod generator;
pub mod rng;
pub mod severity;
pub mod state;
pub mod types;

pub use content::{load_pack, parse_pack, ContentEntry};
pub use errors::{EngineError, Result};
pub use generator::{generate_event, generate_loot, summarize_batch, BatchSummary};
pub use rng::{TraceEntry, TraceRng};
pub use state::{apply_state_delta, tick_state, EngineState};
pub use types::{
    Constraints, CutoffResolution, EffectVector, EventResult, Fiction, GeneratorKind, PartyBand,
    RarityMode, SceneContext, ScenePhase, SelectionContext, StateDelta,
};
