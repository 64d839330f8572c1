//! Soft-wrapping for the input box.
//!
//! Text is split into visual rows as byte ranges into the original string, so
//! a cursor offset maps to (row, column) without re-deriving anything from
//! wrapped copies. Rows break after the last space that fits, or mid-word when
//! a single word is wider than the box.

use std::ops::Range;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::buffer::prev_boundary;

/// Border (2) + one column of padding each side
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Offset from area edge to first content cell
pub(super) const CONTENT_INSET_X: u16 = 2;
pub(super) const CONTENT_INSET_Y: u16 = 1;

pub(super) fn inner_width(area_width: u16) -> usize {
    area_width.saturating_sub(HORIZONTAL_OVERHEAD) as usize
}

/// Visual rows for `text` at `width` columns. Always at least one row.
pub(super) fn visual_rows(text: &str, width: usize) -> Vec<Range<usize>> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut line_start = 0;
    for line in text.split('\n') {
        wrap_line(line, line_start, width, &mut rows);
        line_start += line.len() + 1;
    }
    rows
}

fn wrap_line(line: &str, base: usize, width: usize, rows: &mut Vec<Range<usize>>) {
    let mut row_start = 0;
    let mut row_width = 0;
    let mut last_break: Option<usize> = None;

    for (i, c) in line.char_indices() {
        let w = c.width().unwrap_or(0);
        if row_width + w > width && i > row_start {
            let cut = last_break.filter(|&b| b > row_start).unwrap_or(i);
            rows.push(base + row_start..base + cut);
            row_start = cut;
            row_width = line[cut..i].width();
            last_break = None;
        }
        row_width += w;
        if c == ' ' {
            last_break = Some(i + c.len_utf8());
        }
    }
    rows.push(base + row_start..base + line.len());
}

/// Row index and display column of byte offset `pos`.
pub(super) fn locate(text: &str, rows: &[Range<usize>], pos: usize) -> (usize, usize) {
    let row = rows.partition_point(|r| r.start <= pos).saturating_sub(1);
    let start = rows.get(row).map(|r| r.start).unwrap_or(0);
    (row, text[start..pos.max(start)].width())
}

/// Byte offset in `rows[row]` closest to display column `col`.
pub(super) fn offset_at(text: &str, rows: &[Range<usize>], row: usize, col: usize) -> usize {
    let Some(range) = rows.get(row) else {
        return text.len();
    };
    // A soft-wrapped row's end is the next row's start; stop one char short
    // so the cursor stays on this row.
    let soft_wrapped = rows
        .get(row + 1)
        .is_some_and(|next| next.start == range.end && range.end > range.start);
    let limit = if soft_wrapped {
        prev_boundary(text, range.end)
    } else {
        range.end
    };

    let mut acc = 0;
    for (i, c) in text[range.start..limit].char_indices() {
        let w = c.width().unwrap_or(0);
        if acc + w > col {
            return range.start + i;
        }
        acc += w;
    }
    limit
}

/// Cursor offset one row up (`delta < 0`) or down, keeping the column.
/// `None` at the first/last row.
pub(super) fn vertical_target(
    text: &str,
    rows: &[Range<usize>],
    pos: usize,
    delta: isize,
) -> Option<usize> {
    let (row, col) = locate(text, rows, pos);
    let target = row.checked_add_signed(delta)?;
    if target >= rows.len() {
        return None;
    }
    Some(offset_at(text, rows, target, col))
}
