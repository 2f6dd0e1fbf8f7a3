//! Run-scoped diffing state.
//!
//! A [`DiffSession`] owns the file arena and the per-run hash seed. The seed
//! is drawn once and reused for every file loaded into the session, so both
//! sides of a comparison hash identically; it exists to decorrelate collision
//! patterns across independent runs, not for any security property.

use std::path::Path;

use crate::config::DifferencerConfig;
use crate::engine;
use crate::hashing::HashSeed;
use crate::report::{Alignment, DiffError};
use crate::source::{FileArena, FileId, LoadError, SourceFile};

pub struct DiffSession {
    arena: FileArena,
    seed: HashSeed,
}

impl Default for DiffSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffSession {
    pub fn new() -> DiffSession {
        DiffSession::with_seed(HashSeed::from_entropy())
    }

    /// Session with a caller-chosen seed; used by determinism tests.
    pub fn with_seed(seed: HashSeed) -> DiffSession {
        DiffSession {
            arena: FileArena::new(),
            seed,
        }
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<FileId, LoadError> {
        self.arena.load_from_path(path.as_ref(), self.seed)
    }

    /// Adds an in-memory file, computing the full line model eagerly.
    pub fn add_file(
        &mut self,
        name: impl Into<String>,
        body: Vec<u8>,
    ) -> Result<FileId, LoadError> {
        Ok(self.arena.add(SourceFile::from_bytes(name, body, self.seed)?))
    }

    pub fn file(&self, id: FileId) -> &SourceFile {
        self.arena.file(id)
    }

    pub(crate) fn arena(&self) -> &FileArena {
        &self.arena
    }

    /// Aligns two loaded files.
    pub fn diff(
        &self,
        a: FileId,
        b: FileId,
        config: &DifferencerConfig,
    ) -> Result<Alignment, DiffError> {
        engine::diff_files(&self.arena, a, b, config)
    }

    /// Three-file merge entry point, kept so callers hit a typed error
    /// instead of a missing API.
    pub fn merge(
        &self,
        _base: FileId,
        _ours: FileId,
        _theirs: FileId,
        _config: &DifferencerConfig,
    ) -> Result<Alignment, DiffError> {
        Err(DiffError::MergeUnsupported)
    }
}
