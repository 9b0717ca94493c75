use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the generation core.
///
/// All failures here are deterministic given identical inputs; callers should
/// never retry, only relax filters or stop.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No entry survived eligibility filtering. Fatal for the draw; never
    /// substituted with a fallback entry.
    #[error("no eligible {kind} entries after filtering ({considered} considered)")]
    ContentExhausted { kind: String, considered: usize },

    /// Contract violation in a weighted-choice call (empty candidates,
    /// mismatched lengths, or a non-positive total weight).
    #[error("invalid sampling input for '{label}': {reason}")]
    InvalidSamplingInput { label: String, reason: String },

    #[error("failed to read content pack {path}: {source}")]
    PackIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed content pack: {reason}")]
    MalformedPack { reason: String },
}

pub type Result<T> = std::result::Result<T, EngineError>;
