//! Contiguous line ranges and paired ranges.
//!
//! A [`FileRange`] is a cheap immutable value describing `[start, start+len)`
//! over one file's real lines; shrinking produces a new value. A
//! [`FileRangePair`] scopes one matching operation to the remaining unmatched
//! region of each file. Hash→position indices over a range are computed on
//! demand.

use rustc_hash::FxHashMap;

use crate::source::{FileArena, FileId, Line};

/// Which of a line's two hashes an operation keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HashKind {
    Full,
    Normalized,
}

pub(crate) fn align_hash(line: &Line, kind: HashKind) -> u32 {
    match kind {
        HashKind::Full => line.full_hash,
        HashKind::Normalized => line.normalized_hash,
    }
}

/// `[start, start+len)` over one file's real lines, 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileRange {
    pub file: FileId,
    pub start: u32,
    pub len: u32,
}

impl FileRange {
    pub fn new(file: FileId, start: u32, len: u32) -> FileRange {
        FileRange { file, start, len }
    }

    /// The whole-file range.
    pub fn whole(arena: &FileArena, file: FileId) -> FileRange {
        FileRange {
            file,
            start: 0,
            len: arena.file(file).line_count(),
        }
    }

    pub fn end(&self) -> u32 {
        self.start + self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, idx: u32) -> bool {
        idx >= self.start && idx < self.end()
    }

    /// Drops `n` lines from the front. `n` must not exceed `len`.
    pub fn shrink_front(&self, n: u32) -> FileRange {
        debug_assert!(n <= self.len, "cannot shrink past the range end");
        FileRange {
            file: self.file,
            start: self.start + n,
            len: self.len - n,
        }
    }

    /// Drops `n` lines from the back. `n` must not exceed `len`.
    pub fn shrink_back(&self, n: u32) -> FileRange {
        debug_assert!(n <= self.len, "cannot shrink past the range start");
        FileRange {
            file: self.file,
            start: self.start,
            len: self.len - n,
        }
    }
}

/// A pair of ranges, one per file, being aligned together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileRangePair {
    pub a: FileRange,
    pub b: FileRange,
}

impl FileRangePair {
    pub fn new(a: FileRange, b: FileRange) -> FileRangePair {
        FileRangePair { a, b }
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty() && self.b.is_empty()
    }

    /// Upper bound on how many corresponding lines the two ranges can share.
    pub fn common_limit(&self) -> u32 {
        self.a.len.min(self.b.len)
    }
}

/// Hash → sorted absolute line indices for one range, built on demand by the
/// rare-line selector and the move detectors.
#[derive(Debug)]
pub(crate) struct HashIndex {
    positions: FxHashMap<u32, Vec<u32>>,
}

impl HashIndex {
    pub(crate) fn build(arena: &FileArena, range: FileRange, kind: HashKind) -> HashIndex {
        let mut positions: FxHashMap<u32, Vec<u32>> = FxHashMap::default();
        for (offset, line) in arena.range_lines(range).iter().enumerate() {
            positions
                .entry(align_hash(line, kind))
                .or_default()
                .push(range.start + offset as u32);
        }
        // Insertion order is ascending already.
        debug_assert!(
            positions
                .values()
                .all(|list| list.windows(2).all(|w| w[0] < w[1]))
        );
        HashIndex { positions }
    }

    pub(crate) fn positions(&self, hash: u32) -> &[u32] {
        self.positions.get(&hash).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn occurrences(&self, hash: u32) -> u32 {
        self.positions(hash).len() as u32
    }
}
