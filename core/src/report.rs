//! Alignment results and diff errors.

use thiserror::Error;

use crate::block::{BlockPair, MatchKind};
use crate::error_codes;

/// Summary metadata emitted alongside the pairs.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct DiffSummary {
    /// Whether every phase ran to completion (move detection can hit its
    /// iteration bound and stop early).
    pub complete: bool,
    /// Human-readable notes explaining incomplete results.
    pub warnings: Vec<String>,
    pub pair_count: usize,
}

/// The finished line-level alignment of two files: an ordered (by `a_start`)
/// list of pairs that tiles both files (see [`crate::BlockPair`]).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Alignment {
    pub pairs: Vec<BlockPair>,
    pub summary: DiffSummary,
}

impl Alignment {
    /// True when the two files differ in any way: a mismatch, a move, a copy,
    /// or a whitespace-only (normalized) match.
    pub fn has_differences(&self) -> bool {
        self.pairs.iter().any(BlockPair::is_difference)
            || self
                .pairs
                .iter()
                .any(|p| p.kind == MatchKind::NormalizedMatch)
    }
}

/// Errors produced by the diffing APIs.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DiffError {
    /// An algorithm invariant was violated. Always a bug in the engine, never
    /// an input problem; the payload carries the pair state that failed so a
    /// report can be logged before terminating.
    #[error("[TXDIFF_DIFF_001] internal error: {message}. Suggestion: report a bug, attaching the inputs and the state dump below.\n{pairs_dump}")]
    Internal { message: String, pairs_dump: String },

    /// Three-file (base/yours/theirs) merge is future work.
    #[error("[TXDIFF_DIFF_002] three-file merge is not implemented")]
    MergeUnsupported,

    /// The configuration failed validation before any phase ran.
    #[error("[TXDIFF_DIFF_003] configuration rejected: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl DiffError {
    pub fn code(&self) -> &'static str {
        match self {
            DiffError::Internal { .. } => error_codes::DIFF_INTERNAL_ERROR,
            DiffError::MergeUnsupported => error_codes::DIFF_MERGE_UNSUPPORTED,
            DiffError::Config(_) => error_codes::DIFF_CONFIG_REJECTED,
        }
    }
}
