//! Configuration for the alignment engine.
//!
//! `DifferencerConfig` centralizes every algorithm threshold and behavioral
//! knob so no phase carries hardcoded constants. All fields have serde
//! defaults; `validate()` rejects values the algorithms cannot operate under.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error_codes;

/// How block matches are extracted from an accepted move gap pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveStrategy {
    /// Patience-style unique-line LCS with block growth.
    Patience,
    /// Tichy maximal block matching.
    Tichy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifferencerConfig {
    /// Match the common prefix/suffix of the two files on exact hashes.
    pub match_ends: bool,
    /// After exact end matching, extend with normalized-hash end matching.
    pub match_normalized_ends: bool,
    /// Align on normalized hashes (full hashes otherwise); normalized-only
    /// equalities produce `NormalizedMatch` pairs.
    pub align_normalized_lines: bool,
    /// Restrict LCS alignment to rare lines instead of every line in range.
    pub align_rare_lines: bool,
    /// Maximum in-range occurrences for a hash to still count as rare.
    pub max_rare_occurrences: u32,
    /// Require equal occurrence counts on both sides for rarity.
    pub require_same_rarity: bool,
    /// Detect block moves (and copies) across unmatched gaps.
    pub detect_moves: bool,
    /// Similarity credit in (0, 1] for a normalized-only match inside the
    /// weighted LCS.
    pub lcs_normalized_similarity: f64,
    /// How matches are extracted from an accepted move gap pair.
    pub move_strategy: MoveStrategy,
    /// Minimum rare lines a gap needs to participate in move detection.
    pub min_move_rare_lines: u32,
    /// A copy is rejected when its matched extent in A exceeds this multiple
    /// of the matched extent in B.
    pub max_copy_extent_ratio: u32,
    /// End-match backoff sheds boundary lines whose normalized hash occurs
    /// more often than this in the file.
    pub common_ends_backoff_occurrences: u32,
    /// Lines whose file-wide occurrence count exceeds this are never rare.
    pub max_file_occurrences: u32,
    /// Starting rarity cap for patience anchor selection.
    pub patience_initial_rarity: u32,
    /// The patience rarity cap widens up to this bound when too few anchors
    /// exist.
    pub patience_max_rarity: u32,
    /// Upper bound on move-detection rounds before giving up with a warning.
    pub max_move_iterations: u32,
}

impl Default for DifferencerConfig {
    fn default() -> Self {
        Self {
            match_ends: true,
            match_normalized_ends: true,
            align_normalized_lines: true,
            align_rare_lines: true,
            max_rare_occurrences: 1,
            require_same_rarity: true,
            detect_moves: true,
            lcs_normalized_similarity: 0.5,
            move_strategy: MoveStrategy::Patience,
            min_move_rare_lines: 2,
            max_copy_extent_ratio: 3,
            common_ends_backoff_occurrences: 4,
            max_file_occurrences: 64,
            patience_initial_rarity: 1,
            patience_max_rarity: 5,
            max_move_iterations: 20,
        }
    }
}

impl DifferencerConfig {
    /// Cheapest preset: exact-only alignment, no move detection.
    pub fn fastest() -> Self {
        Self {
            match_normalized_ends: false,
            align_normalized_lines: false,
            detect_moves: false,
            max_move_iterations: 5,
            ..Default::default()
        }
    }

    pub fn balanced() -> Self {
        Self::default()
    }

    /// Widest search: looser rarity, more move rounds.
    pub fn most_precise() -> Self {
        Self {
            max_rare_occurrences: 3,
            require_same_rarity: false,
            max_move_iterations: 40,
            patience_max_rarity: 5,
            ..Default::default()
        }
    }

    pub fn builder() -> DifferencerConfigBuilder {
        DifferencerConfigBuilder {
            inner: DifferencerConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.lcs_normalized_similarity.is_finite()
            || self.lcs_normalized_similarity <= 0.0
            || self.lcs_normalized_similarity > 1.0
        {
            return Err(ConfigError::InvalidSimilarity {
                value: self.lcs_normalized_similarity,
            });
        }

        ensure_non_zero(self.max_rare_occurrences, "max_rare_occurrences")?;
        ensure_non_zero(self.min_move_rare_lines, "min_move_rare_lines")?;
        ensure_non_zero(self.max_copy_extent_ratio, "max_copy_extent_ratio")?;
        ensure_non_zero(
            self.common_ends_backoff_occurrences,
            "common_ends_backoff_occurrences",
        )?;
        ensure_non_zero(self.max_file_occurrences, "max_file_occurrences")?;
        ensure_non_zero(self.max_move_iterations, "max_move_iterations")?;
        ensure_non_zero(self.patience_initial_rarity, "patience_initial_rarity")?;

        if self.patience_max_rarity < self.patience_initial_rarity {
            return Err(ConfigError::BadRarityBounds {
                initial: self.patience_initial_rarity,
                max: self.patience_max_rarity,
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("[TXDIFF_CONFIG_001] lcs_normalized_similarity must be in (0.0, 1.0] and finite (got {value})")]
    InvalidSimilarity { value: f64 },
    #[error("[TXDIFF_CONFIG_002] {field} must be greater than zero")]
    NonPositiveLimit { field: &'static str },
    #[error("[TXDIFF_CONFIG_003] patience rarity bounds are inverted (initial {initial} > max {max})")]
    BadRarityBounds { initial: u32, max: u32 },
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::InvalidSimilarity { .. } => error_codes::CONFIG_INVALID_SIMILARITY,
            ConfigError::NonPositiveLimit { .. } => error_codes::CONFIG_NON_POSITIVE_LIMIT,
            ConfigError::BadRarityBounds { .. } => error_codes::CONFIG_BAD_RARITY_BOUNDS,
        }
    }
}

fn ensure_non_zero(value: u32, field: &'static str) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::NonPositiveLimit { field });
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct DifferencerConfigBuilder {
    inner: DifferencerConfig,
}

impl Default for DifferencerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DifferencerConfigBuilder {
    pub fn new() -> Self {
        DifferencerConfig::builder()
    }

    pub fn match_ends(mut self, value: bool) -> Self {
        self.inner.match_ends = value;
        self
    }

    pub fn match_normalized_ends(mut self, value: bool) -> Self {
        self.inner.match_normalized_ends = value;
        self
    }

    pub fn align_normalized_lines(mut self, value: bool) -> Self {
        self.inner.align_normalized_lines = value;
        self
    }

    pub fn align_rare_lines(mut self, value: bool) -> Self {
        self.inner.align_rare_lines = value;
        self
    }

    pub fn max_rare_occurrences(mut self, value: u32) -> Self {
        self.inner.max_rare_occurrences = value;
        self
    }

    pub fn require_same_rarity(mut self, value: bool) -> Self {
        self.inner.require_same_rarity = value;
        self
    }

    pub fn detect_moves(mut self, value: bool) -> Self {
        self.inner.detect_moves = value;
        self
    }

    pub fn lcs_normalized_similarity(mut self, value: f64) -> Self {
        self.inner.lcs_normalized_similarity = value;
        self
    }

    pub fn move_strategy(mut self, value: MoveStrategy) -> Self {
        self.inner.move_strategy = value;
        self
    }

    pub fn min_move_rare_lines(mut self, value: u32) -> Self {
        self.inner.min_move_rare_lines = value;
        self
    }

    pub fn max_copy_extent_ratio(mut self, value: u32) -> Self {
        self.inner.max_copy_extent_ratio = value;
        self
    }

    pub fn common_ends_backoff_occurrences(mut self, value: u32) -> Self {
        self.inner.common_ends_backoff_occurrences = value;
        self
    }

    pub fn max_file_occurrences(mut self, value: u32) -> Self {
        self.inner.max_file_occurrences = value;
        self
    }

    pub fn patience_initial_rarity(mut self, value: u32) -> Self {
        self.inner.patience_initial_rarity = value;
        self
    }

    pub fn patience_max_rarity(mut self, value: u32) -> Self {
        self.inner.patience_max_rarity = value;
        self
    }

    pub fn max_move_iterations(mut self, value: u32) -> Self {
        self.inner.max_move_iterations = value;
        self
    }

    /// Validates and returns the finished configuration.
    pub fn build(self) -> Result<DifferencerConfig, ConfigError> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}
