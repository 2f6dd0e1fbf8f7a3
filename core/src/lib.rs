//! Text Diff: a line-level alignment engine for source files.
//!
//! This crate computes a structured correspondence between two text files
//! that classifies every line as matched (exactly or after whitespace
//! normalization), moved, copied, inserted, or deleted. It targets source
//! code, where near-duplicate lines (braces, blanks, keywords) make naive
//! line diffing produce misleading alignments and where block moves should
//! be recognized as such instead of rendered as paired deletes and inserts.
//!
//! # Quick Start
//!
//! ```
//! use text_diff::{DiffSession, DifferencerConfig};
//!
//! let mut session = DiffSession::new();
//! let old = session.add_file("old", b"shared\nremoved\n".to_vec())?;
//! let new = session.add_file("new", b"shared\nadded\n".to_vec())?;
//!
//! let alignment = session.diff(old, new, &DifferencerConfig::default())?;
//! assert!(alignment.has_differences());
//! for pair in &alignment.pairs {
//!     println!("{pair:?}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The returned pairs, sorted by their A position, exactly tile both files:
//! no line is dropped and none is reported twice (copies excepted on the A
//! side, by definition). The engine validates this before returning and
//! reports a violation as a fatal [`DiffError::Internal`] rather than
//! producing partial output.

pub(crate) mod alignment;
mod block;
mod config;
mod engine;
pub mod error_codes;
pub(crate) mod hashing;
mod output;
mod range;
mod report;
mod session;
mod source;

pub use block::{BlockPair, MatchKind};
pub use config::{ConfigError, DifferencerConfig, DifferencerConfigBuilder, MoveStrategy};
pub use hashing::HashSeed;
pub use output::{JsonReport, serialize_alignment, write_json_report};
pub use range::{FileRange, FileRangePair};
pub use report::{Alignment, DiffError, DiffSummary};
pub use session::DiffSession;
pub use source::{FileArena, FileId, Line, LoadError, SourceFile};
