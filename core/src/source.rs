//! Line and file model.
//!
//! A [`SourceFile`] owns its raw byte body and an index-stable sequence of
//! [`Line`] values computed eagerly at load time: byte offsets, the two
//! hashes, indentation counts, the in-file occurrence count of the normalized
//! hash, and the probably-common flag. Lines are never mutated after
//! construction.
//!
//! Files live in a run-scoped [`FileArena`] and are referred to by [`FileId`];
//! lines and ranges are `(file, index)` values with no back-pointers.
//!
//! Line numbering reserves 0 and N+1 for zero-length start/end sentinels, so
//! `lines[number]` holds the line with that absolute number. All range and
//! pair index spaces elsewhere in the crate are 0-based over the N real lines;
//! accessors here do the conversion.

use std::fmt;
use std::path::Path;

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::error_codes;
use crate::hashing::{
    self, HashSeed, full_line_hash, is_probably_common, leading_indentation, normalized_line_hash,
};
use crate::range::FileRange;

/// Index of a [`SourceFile`] within its [`FileArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(pub(crate) u32);

/// Per-line metadata, derived once from the raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    /// Absolute line number; 0 and N+1 are the zero-length sentinels.
    pub number: u32,
    /// Byte offset of the line within the file body, terminator included.
    pub byte_start: u32,
    pub byte_len: u32,
    /// Byte offset of the normalized content within the file body.
    pub content_start: u32,
    pub content_len: u32,
    /// Seeded hash over the raw line bytes, terminator included.
    pub full_hash: u32,
    /// Seeded hash over the normalized content; 0 for empty content.
    pub normalized_hash: u32,
    /// Leading tabs/spaces, capped at 255; (255, 255) when a tab follows a
    /// space.
    pub leading_tabs: u8,
    pub leading_spaces: u8,
    /// Occurrences of `normalized_hash` in the whole file, capped at 255.
    pub normalized_occurrences: u8,
    /// Empty content or one of the fixed ubiquitous tokens.
    pub probably_common: bool,
}

impl Line {
    /// Real lines always cover at least one byte; only sentinels are empty.
    pub fn is_sentinel(&self) -> bool {
        self.byte_len == 0
    }

    fn sentinel(number: u32) -> Line {
        Line {
            number,
            byte_start: 0,
            byte_len: 0,
            content_start: 0,
            content_len: 0,
            full_hash: 0,
            normalized_hash: 0,
            leading_tabs: 0,
            leading_spaces: 0,
            normalized_occurrences: 0,
            probably_common: true,
        }
    }
}

/// Errors surfaced while reading and modelling an input file. These are the
/// recoverable input errors of the system; nothing inside the alignment
/// algorithms produces them.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("[TXDIFF_LOAD_001] failed to read '{path}': {source}. Suggestion: check that the file exists and is readable.")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("[TXDIFF_LOAD_002] file '{path}' is too large to diff ({size} bytes). Suggestion: split the input or diff a smaller region.")]
    TooLarge { path: String, size: u64 },
}

impl LoadError {
    pub fn code(&self) -> &'static str {
        match self {
            LoadError::Io { .. } => error_codes::LOAD_IO,
            LoadError::TooLarge { .. } => error_codes::LOAD_TOO_LARGE,
        }
    }
}

/// An immutable text file: raw body plus the derived line sequence.
pub struct SourceFile {
    name: String,
    body: Vec<u8>,
    /// `line_count + 2` entries; index equals absolute line number.
    lines: Vec<Line>,
}

impl SourceFile {
    /// Builds the full line model from raw bytes. The body is split on `\n`
    /// with the terminator kept as part of each line; a trailing fragment
    /// without a terminator is still a line.
    pub(crate) fn from_bytes(
        name: impl Into<String>,
        body: Vec<u8>,
        seed: HashSeed,
    ) -> Result<SourceFile, LoadError> {
        let name = name.into();
        if body.len() as u64 > u32::MAX as u64 {
            return Err(LoadError::TooLarge {
                path: name,
                size: body.len() as u64,
            });
        }

        let mut lines = vec![Line::sentinel(0)];

        let mut byte_start = 0usize;
        while byte_start < body.len() {
            let rest = &body[byte_start..];
            let byte_len = match rest.iter().position(|&b| b == b'\n') {
                Some(pos) => pos + 1,
                None => rest.len(),
            };
            let line_bytes = &body[byte_start..byte_start + byte_len];

            let (content_offset, content_len) = hashing::normalized_bounds(line_bytes);
            let content = &line_bytes[content_offset..content_offset + content_len];
            let (leading_tabs, leading_spaces) = leading_indentation(line_bytes);

            lines.push(Line {
                number: lines.len() as u32,
                byte_start: byte_start as u32,
                byte_len: byte_len as u32,
                content_start: (byte_start + content_offset) as u32,
                content_len: content_len as u32,
                full_hash: full_line_hash(seed, line_bytes),
                normalized_hash: normalized_line_hash(seed, content),
                leading_tabs,
                leading_spaces,
                normalized_occurrences: 0,
                probably_common: is_probably_common(content),
            });

            byte_start += byte_len;
        }

        let end_number = lines.len() as u32;
        lines.push(Line::sentinel(end_number));

        count_normalized_occurrences(&mut lines);

        Ok(SourceFile { name, body, lines })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Number of real lines, sentinels excluded.
    pub fn line_count(&self) -> u32 {
        (self.lines.len() - 2) as u32
    }

    /// Real line by 0-based index.
    pub fn line(&self, idx: u32) -> &Line {
        &self.lines[idx as usize + 1]
    }

    /// Real lines `[start, start + len)` by 0-based index.
    pub fn lines(&self, start: u32, len: u32) -> &[Line] {
        let lo = start as usize + 1;
        &self.lines[lo..lo + len as usize]
    }

    pub fn start_sentinel(&self) -> &Line {
        &self.lines[0]
    }

    pub fn end_sentinel(&self) -> &Line {
        &self.lines[self.lines.len() - 1]
    }

    /// Raw bytes of a real line, terminator included.
    pub fn line_bytes(&self, idx: u32) -> &[u8] {
        let line = self.line(idx);
        &self.body[line.byte_start as usize..(line.byte_start + line.byte_len) as usize]
    }

    /// Normalized content bytes of a real line.
    pub fn content_bytes(&self, idx: u32) -> &[u8] {
        let line = self.line(idx);
        &self.body[line.content_start as usize..(line.content_start + line.content_len) as usize]
    }
}

impl fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFile")
            .field("name", &self.name)
            .field("bytes", &self.body.len())
            .field("lines", &self.line_count())
            .finish()
    }
}

fn count_normalized_occurrences(lines: &mut [Line]) {
    let mut counts: FxHashMap<u32, u32> = FxHashMap::default();
    for line in lines.iter() {
        if !line.is_sentinel() {
            *counts.entry(line.normalized_hash).or_insert(0) += 1;
        }
    }
    for line in lines.iter_mut() {
        if !line.is_sentinel() {
            let count = counts.get(&line.normalized_hash).copied().unwrap_or(0);
            line.normalized_occurrences = count.min(u8::MAX as u32) as u8;
        }
    }
}

/// Run-scoped arena owning every file of one diff run.
#[derive(Debug, Default)]
pub struct FileArena {
    files: Vec<SourceFile>,
}

impl FileArena {
    pub fn new() -> FileArena {
        FileArena { files: Vec::new() }
    }

    pub fn add(&mut self, file: SourceFile) -> FileId {
        let id = FileId(self.files.len() as u32);
        self.files.push(file);
        id
    }

    pub fn file(&self, id: FileId) -> &SourceFile {
        &self.files[id.0 as usize]
    }

    /// Real-line slice addressed by a range.
    pub(crate) fn range_lines(&self, range: FileRange) -> &[Line] {
        self.file(range.file).lines(range.start, range.len)
    }

    pub(crate) fn load_from_path(
        &mut self,
        path: &Path,
        seed: HashSeed,
    ) -> Result<FileId, LoadError> {
        let body = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let file = SourceFile::from_bytes(path.display().to_string(), body, seed)?;
        Ok(self.add(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_from(text: &str) -> SourceFile {
        SourceFile::from_bytes("test", text.as_bytes().to_vec(), HashSeed::from_u64(42))
            .expect("load should succeed")
    }

    #[test]
    fn splits_lines_keeping_terminators() {
        let file = file_from("alpha\nbeta\ngamma");
        assert_eq!(file.line_count(), 3);
        assert_eq!(file.line_bytes(0), b"alpha\n");
        assert_eq!(file.line_bytes(2), b"gamma");
    }

    #[test]
    fn sentinels_bracket_real_lines() {
        let file = file_from("one\ntwo\n");
        assert_eq!(file.start_sentinel().number, 0);
        assert_eq!(file.end_sentinel().number, 3);
        assert!(file.start_sentinel().is_sentinel());
        assert_eq!(file.line(0).number, 1);
        assert_eq!(file.line(1).number, 2);
    }

    #[test]
    fn empty_file_has_only_sentinels() {
        let file = file_from("");
        assert_eq!(file.line_count(), 0);
        assert_eq!(file.end_sentinel().number, 1);
    }

    #[test]
    fn content_offsets_strip_whitespace() {
        let file = file_from("\t  body();  \n");
        assert_eq!(file.content_bytes(0), b"body();");
        let line = file.line(0);
        assert_eq!(line.leading_tabs, 1);
        assert_eq!(line.leading_spaces, 2);
    }

    #[test]
    fn occurrence_counts_are_per_normalized_hash() {
        let file = file_from("x\nx\n  x\ny\n");
        // Three lines normalize to "x", one to "y".
        assert_eq!(file.line(0).normalized_occurrences, 3);
        assert_eq!(file.line(2).normalized_occurrences, 3);
        assert_eq!(file.line(3).normalized_occurrences, 1);
    }

    #[test]
    fn blank_lines_are_probably_common() {
        let file = file_from("\n}\nreal_content(a, b);\n");
        assert!(file.line(0).probably_common);
        assert!(file.line(1).probably_common);
        assert!(!file.line(2).probably_common);
    }

    #[test]
    fn normalized_hash_equal_across_indentation() {
        let file = file_from("  foo\n\tfoo\n");
        assert_eq!(file.line(0).normalized_hash, file.line(1).normalized_hash);
        assert_ne!(file.line(0).full_hash, file.line(1).full_hash);
    }

    #[test]
    fn arena_hands_out_stable_ids() {
        let mut arena = FileArena::new();
        let seed = HashSeed::from_u64(1);
        let a = arena.add(SourceFile::from_bytes("a", b"1\n".to_vec(), seed).unwrap());
        let b = arena.add(SourceFile::from_bytes("b", b"2\n".to_vec(), seed).unwrap());
        assert_ne!(a, b);
        assert_eq!(arena.file(a).name(), "a");
        assert_eq!(arena.file(b).name(), "b");
    }
}
