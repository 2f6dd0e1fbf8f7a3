//! Stable error codes surfaced in error messages and machine output.
//!
//! Codes are part of the public contract: scripts may match on them, so they
//! are never renumbered or reused.

pub const CONFIG_INVALID_SIMILARITY: &str = "TXDIFF_CONFIG_001";
pub const CONFIG_NON_POSITIVE_LIMIT: &str = "TXDIFF_CONFIG_002";
pub const CONFIG_BAD_RARITY_BOUNDS: &str = "TXDIFF_CONFIG_003";

pub const LOAD_IO: &str = "TXDIFF_LOAD_001";
pub const LOAD_TOO_LARGE: &str = "TXDIFF_LOAD_002";

pub const DIFF_INTERNAL_ERROR: &str = "TXDIFF_DIFF_001";
pub const DIFF_MERGE_UNSUPPORTED: &str = "TXDIFF_DIFF_002";
pub const DIFF_CONFIG_REJECTED: &str = "TXDIFF_DIFF_003";
