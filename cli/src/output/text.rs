//! Interleaved unified-style rendering.
//!
//! Exact in-place matches are elided; every other pair prints as a hunk with
//! a `@@` header carrying 1-based line numbers. Moved blocks render with `>`
//! markers, copies with `*`, whitespace-only matches with `~`.

use std::io::Write;

use anyhow::Result;
use text_diff::{Alignment, BlockPair, DiffSession, FileId, MatchKind};

pub fn write_interleaved<W: Write>(
    w: &mut W,
    session: &DiffSession,
    old: FileId,
    new: FileId,
    alignment: &Alignment,
    quiet: bool,
) -> Result<()> {
    if !alignment.has_differences() {
        writeln!(w, "No differences found.")?;
        return Ok(());
    }
    if quiet {
        writeln!(w, "Files differ.")?;
        return Ok(());
    }

    writeln!(w, "--- {}", session.file(old).name())?;
    writeln!(w, "+++ {}", session.file(new).name())?;

    for pair in &alignment.pairs {
        if pair.kind == MatchKind::ExactMatch && !pair.is_move {
            continue;
        }
        write_hunk(w, session, old, new, pair)?;
    }

    Ok(())
}

fn write_hunk<W: Write>(
    w: &mut W,
    session: &DiffSession,
    old: FileId,
    new: FileId,
    pair: &BlockPair,
) -> Result<()> {
    writeln!(
        w,
        "@@ -{},{} +{},{} @@{}",
        pair.a_start + 1,
        pair.a_len,
        pair.b_start + 1,
        pair.b_len,
        hunk_note(pair),
    )?;

    match pair.kind {
        MatchKind::Mismatch => {
            for k in 0..pair.a_len {
                writeln!(w, "-{}", super::display_line(session, old, pair.a_start + k))?;
            }
            for k in 0..pair.b_len {
                writeln!(w, "+{}", super::display_line(session, new, pair.b_start + k))?;
            }
        }
        MatchKind::NormalizedMatch => {
            for k in 0..pair.b_len {
                writeln!(w, "~{}", super::display_line(session, new, pair.b_start + k))?;
            }
        }
        MatchKind::ExactMatch => {
            let marker = if pair.is_copy { '*' } else { '>' };
            for k in 0..pair.b_len {
                writeln!(
                    w,
                    "{marker}{}",
                    super::display_line(session, new, pair.b_start + k)
                )?;
            }
        }
    }

    Ok(())
}

fn hunk_note(pair: &BlockPair) -> &'static str {
    match (pair.is_copy, pair.is_move, pair.kind) {
        (true, _, _) => " (copied)",
        (false, true, _) => " (moved)",
        (false, false, MatchKind::NormalizedMatch) => " (whitespace)",
        _ => "",
    }
}
