//! The alignment algorithms.
//!
//! The engine composes these passes into the phased pipeline described in
//! [`crate::engine`]:
//!
//! 1. **Common-Ends Matching** (`common_ends.rs`)
//!    - Greedy exact/normalized prefix and suffix matching, with backoff that
//!      sheds too-common boundary lines next to a gap
//!
//! 2. **Rare-Line Selection** (`rare_lines.rs`)
//!    - Extract the lines rare enough in a region to be trustworthy anchors
//!
//! 3. **Weighted LCS** (`weighted_lcs.rs`)
//!    - Maximum-weight common subsequence with fractional credit for
//!      normalized-only matches
//!
//! 4. **Block-Match Extraction** (`block_moves.rs`)
//!    - Tichy maximal block matching and patience-style unique-line LCS
//!      with growth
//!
//! 5. **Move/Copy Acceptance** (`move_policy.rs`)
//!    - Gap-against-gap move scoring with fixpoint re-runs; copy matching
//!      against the whole of A behind an extent-ratio guard
//!
//! 6. **Gap Finding and Filling** (`gaps.rs`)
//!    - Uncovered-span computation and the final mismatch fill that makes
//!      coverage total
//!
//! 7. **Split and Combine** (`combine.rs`)
//!    - Homogenize mixed normalized matches; merge adjacent same-class pairs

pub(crate) mod block_moves;
pub(crate) mod combine;
pub(crate) mod common_ends;
pub(crate) mod gaps;
pub(crate) mod move_policy;
pub(crate) mod rare_lines;
pub(crate) mod weighted_lcs;
