pub mod side_by_side;
pub mod text;

use text_diff::{DiffSession, FileId};

/// A line's display text: raw bytes minus the terminator, lossily decoded.
pub(crate) fn display_line(session: &DiffSession, file: FileId, idx: u32) -> String {
    let bytes = session.file(file).line_bytes(idx);
    let trimmed = bytes
        .strip_suffix(b"\r\n")
        .or_else(|| bytes.strip_suffix(b"\n"))
        .unwrap_or(bytes);
    String::from_utf8_lossy(trimmed).into_owned()
}
