//! Request Batch Builder: turns pending cell writes into an ordered request batch.
//!
//! Every insertion shifts all higher indices, so writes are applied highest target
//! index first. Each styled range is computed from the text just inserted at the same
//! index (`[index, index + utf16_len)`), never from a later fetch.

use crate::docs_client::types::{utf16_len, ParagraphStyle, Range, TextStyle};
use crate::docs_client::Request;

/// One run of inserted text plus the range-addressed styles that apply to it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Segment {
    pub text: String,
    pub style: Option<TextStyle>,
    pub checkbox: bool,
    pub paragraph: Option<ParagraphStyle>,
}

impl Segment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn styled(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style: Some(style),
            ..Self::default()
        }
    }

    pub fn with_checkbox(mut self) -> Self {
        self.checkbox = true;
        self
    }

    pub fn with_paragraph(mut self, paragraph: ParagraphStyle) -> Self {
        self.paragraph = Some(paragraph);
        self
    }
}

/// Pending write against a resolved cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellWrite {
    pub row: usize,
    pub col: usize,
    /// Resolved cell start + 1.
    pub index: i64,
    pub segments: Vec<Segment>,
}

/// Emits `segments` back to back starting at `index`.
///
/// Returns the requests and the index just past the last inserted character.
pub fn emit_segments(index: i64, segments: &[Segment]) -> (Vec<Request>, i64) {
    let mut requests = Vec::new();
    let mut cursor = index;

    for segment in segments.iter().filter(|s| !s.text.is_empty()) {
        let len = utf16_len(&segment.text);
        requests.push(Request::insert_text(cursor, &segment.text));

        let range = Range::new(cursor, cursor + len);
        if let Some(style) = &segment.style {
            requests.push(Request::text_style(range.clone(), style.clone()));
        }
        if segment.checkbox {
            requests.push(Request::checkbox_bullets(range.clone()));
        }
        if let Some(paragraph) = &segment.paragraph {
            requests.push(Request::paragraph_style(range, paragraph.clone()));
        }
        cursor += len;
    }

    (requests, cursor)
}

/// Sorts `writes` by target index, highest first, and emits one request group per
/// write. A group is an insert followed by the styles of its own text.
pub fn emit_cell_groups(mut writes: Vec<CellWrite>) -> Vec<Vec<Request>> {
    writes.sort_by(|a, b| b.index.cmp(&a.index));
    writes
        .iter()
        .map(|write| emit_segments(write.index, &write.segments).0)
        .filter(|group| !group.is_empty())
        .collect()
}

/// All cell writes as a single batch.
pub fn emit_cell_writes(writes: Vec<CellWrite>) -> Vec<Request> {
    emit_cell_groups(writes).into_iter().flatten().collect()
}

/// Packs whole groups, in order, into batches of at most `max_requests` requests.
///
/// A group is never split across calls; one larger than the cap is sent on its own.
pub fn pack_batches(groups: Vec<Vec<Request>>, max_requests: usize) -> Vec<Vec<Request>> {
    let max_requests = max_requests.max(1);
    let mut batches: Vec<Vec<Request>> = Vec::new();
    let mut current: Vec<Request> = Vec::new();

    for group in groups {
        if !current.is_empty() && current.len() + group.len() > max_requests {
            batches.push(std::mem::take(&mut current));
        }
        current.extend(group);
    }
    if !current.is_empty() {
        batches.push(current);
    }
    batches
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
