//! Two-column rendering: old lines on the left, new on the right, one marker
//! column between them.

use std::io::Write;

use anyhow::Result;
use text_diff::{Alignment, DiffSession, FileId, MatchKind};

const COLUMN_WIDTH: usize = 46;

pub fn write_side_by_side<W: Write>(
    w: &mut W,
    session: &DiffSession,
    old: FileId,
    new: FileId,
    alignment: &Alignment,
) -> Result<()> {
    for pair in &alignment.pairs {
        let marker = marker_for(pair.kind, pair.is_move, pair.is_copy);
        let rows = pair.a_len.max(pair.b_len);
        for k in 0..rows {
            let left = (k < pair.a_len)
                .then(|| super::display_line(session, old, pair.a_start + k))
                .unwrap_or_default();
            let right = (k < pair.b_len)
                .then(|| super::display_line(session, new, pair.b_start + k))
                .unwrap_or_default();
            writeln!(w, "{} {} {}", pad(&left), marker, right)?;
        }
    }
    Ok(())
}

fn marker_for(kind: MatchKind, is_move: bool, is_copy: bool) -> char {
    if is_copy {
        return '*';
    }
    if is_move {
        return '>';
    }
    match kind {
        MatchKind::ExactMatch => ' ',
        MatchKind::NormalizedMatch => '~',
        MatchKind::Mismatch => '|',
    }
}

fn pad(text: &str) -> String {
    let mut cell: String = text.chars().take(COLUMN_WIDTH).collect();
    while cell.chars().count() < COLUMN_WIDTH {
        cell.push(' ');
    }
    cell
}
