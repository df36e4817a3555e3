//! In-memory `DocumentService` for pipeline tests.
//!
//! Keeps a real index model of the body: paragraphs and tables occupy UTF-16 index
//! ranges exactly as the remote service lays them out, tables only get positions
//! once committed, and an insert at a stale index lands in the wrong place (or is
//! rejected) just like it would remotely. Each batch is applied to a copy and only
//! committed if every request in it is valid.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::docs_client::types::{
    utf16_len, Body, CreateFooterReply, Document, InsertText, Range, Reply, StructuralElement,
    Table, TableCell, TableRange, TableRow,
};
use crate::docs_client::{BatchUpdateResponse, DocsError, DocumentService, Request};

const FOOTER_ID: &str = "kix.footer-1";

#[derive(Debug, Clone, PartialEq)]
enum Element {
    /// Text including its trailing newline.
    Paragraph(String),
    Table(FakeTable),
}

#[derive(Debug, Clone, PartialEq)]
struct FakeTable {
    columns: usize,
    /// Cell text, excluding each cell's implicit newline.
    cells: Vec<Vec<String>>,
}

impl FakeTable {
    fn new(rows: usize, columns: usize) -> Self {
        Self {
            columns,
            cells: vec![vec![String::new(); columns]; rows],
        }
    }

    /// Table marker, then per row a row marker and per cell a cell marker, its text
    /// and its newline.
    fn len(&self) -> i64 {
        1 + self
            .cells
            .iter()
            .map(|row| 1 + row.iter().map(|text| 2 + utf16_len(text)).sum::<i64>())
            .sum::<i64>()
    }

    /// (row start, cell starts) for every row.
    fn layout(&self, start: i64) -> Vec<(i64, Vec<i64>)> {
        let mut pos = start + 1;
        self.cells
            .iter()
            .map(|row| {
                let row_start = pos;
                pos += 1;
                let cells = row
                    .iter()
                    .map(|text| {
                        let cell_start = pos;
                        pos += 2 + utf16_len(text);
                        cell_start
                    })
                    .collect();
                (row_start, cells)
            })
            .collect()
    }

    fn insert(&mut self, start: i64, index: i64, text: &str) -> Result<(), String> {
        let layout = self.layout(start);
        for (r, (_, cell_starts)) in layout.iter().enumerate() {
            for (c, cell_start) in cell_starts.iter().enumerate() {
                let content = cell_start + 1;
                let cell = &mut self.cells[r][c];
                if index >= content && index <= content + utf16_len(cell) {
                    return insert_at_utf16(cell, (index - content) as usize, text);
                }
            }
        }
        Err(format!("index {index} is not inside a table cell"))
    }
}

fn insert_at_utf16(target: &mut String, offset: usize, text: &str) -> Result<(), String> {
    let mut units = 0;
    for (byte, ch) in target.char_indices() {
        if units == offset {
            target.insert_str(byte, text);
            return Ok(());
        }
        units += ch.len_utf16();
        if units > offset {
            return Err(format!("offset {offset} splits a surrogate pair"));
        }
    }
    if units == offset {
        target.push_str(text);
        return Ok(());
    }
    Err(format!("offset {offset} is past the end of the text"))
}

fn check_range(body: &FakeBody, footer_id: Option<&str>, range: &Range) -> Result<(), String> {
    match range.segment_id.as_deref() {
        Some(id) if Some(id) == footer_id => Ok(()),
        Some(id) => Err(format!("unknown segment {id}")),
        None if range.start_index >= 1
            && range.start_index < range.end_index
            && range.end_index <= body.end_index() =>
        {
            Ok(())
        }
        None => Err(format!(
            "range {}..{} outside body ending at {}",
            range.start_index,
            range.end_index,
            body.end_index()
        )),
    }
}

#[derive(Debug, Clone)]
struct FakeBody {
    elements: Vec<Element>,
}

impl FakeBody {
    fn new() -> Self {
        Self {
            elements: vec![Element::Paragraph("\n".to_string())],
        }
    }

    fn element_len(element: &Element) -> i64 {
        match element {
            Element::Paragraph(text) => utf16_len(text),
            Element::Table(table) => table.len(),
        }
    }

    fn end_index(&self) -> i64 {
        1 + self.elements.iter().map(Self::element_len).sum::<i64>()
    }

    fn table_starts(&self) -> Vec<(i64, &FakeTable)> {
        let mut pos = 1;
        let mut tables = Vec::new();
        for element in &self.elements {
            if let Element::Table(table) = element {
                tables.push((pos, table));
            }
            pos += Self::element_len(element);
        }
        tables
    }

    fn insert_text(&mut self, index: i64, text: &str) -> Result<(), String> {
        let mut pos = 1;
        for element in &mut self.elements {
            let len = Self::element_len(element);
            if index >= pos && index < pos + len {
                return match element {
                    Element::Paragraph(p) => insert_at_utf16(p, (index - pos) as usize, text),
                    Element::Table(table) => table.insert(pos, index, text),
                };
            }
            pos += len;
        }
        Err(format!("index {index} is past the end of the body"))
    }

    /// Inserts before the final newline of the body.
    fn append_text(&mut self, text: &str) -> Result<(), String> {
        match self.elements.last_mut() {
            Some(Element::Paragraph(p)) => {
                let at = p.len() - 1;
                p.insert_str(at, text);
                Ok(())
            }
            _ => Err("body does not end in a paragraph".to_string()),
        }
    }

    fn check_table(&self, range: &TableRange) -> Result<(), String> {
        let location = &range.table_cell_location;
        self.check_cells(
            location.table_start_location.index,
            location.row_index + range.row_span,
            location.column_index + range.column_span,
        )
    }

    /// `rows`/`columns` are exclusive upper bounds that must fit in the table.
    fn check_cells(&self, table_start: i64, rows: usize, columns: usize) -> Result<(), String> {
        let (_, table) = self
            .table_starts()
            .into_iter()
            .find(|(start, _)| *start == table_start)
            .ok_or_else(|| format!("no table starts at {table_start}"))?;
        if rows > table.cells.len() || columns > table.columns {
            return Err(format!("cell range {rows}x{columns} outside table at {table_start}"));
        }
        Ok(())
    }

    fn to_document(&self, document_id: &str) -> Document {
        let mut pos = 1;
        let content = self
            .elements
            .iter()
            .map(|element| {
                let start = pos;
                pos += Self::element_len(element);
                let table = match element {
                    Element::Paragraph(_) => None,
                    Element::Table(table) => Some(Table {
                        rows: table.cells.len(),
                        columns: table.columns,
                        table_rows: table
                            .layout(start)
                            .into_iter()
                            .zip(&table.cells)
                            .map(|((row_start, cell_starts), texts)| TableRow {
                                start_index: Some(row_start),
                                table_cells: cell_starts
                                    .into_iter()
                                    .zip(texts)
                                    .map(|(cell_start, text)| TableCell {
                                        start_index: Some(cell_start),
                                        end_index: Some(cell_start + 2 + utf16_len(text)),
                                    })
                                    .collect(),
                            })
                            .collect(),
                    }),
                };
                StructuralElement {
                    start_index: Some(start),
                    end_index: Some(pos),
                    table,
                }
            })
            .collect();
        Document {
            document_id: document_id.to_string(),
            body: Body { content },
        }
    }
}

/// Snapshot of everything the fake observed.
#[derive(Debug, Clone)]
pub struct FakeLog {
    pub created: Vec<String>,
    /// Successfully applied batches, in order.
    pub batches: Vec<Vec<Request>>,
    /// Every `batch_update` call, including a failed one.
    pub batch_calls: usize,
    pub fetches: usize,
    pub table_shapes: Vec<(usize, usize)>,
    pub footer_image: Option<String>,
    body: Vec<Element>,
}

impl FakeLog {
    fn tables(&self) -> Vec<&FakeTable> {
        self.body
            .iter()
            .filter_map(|e| match e {
                Element::Table(t) => Some(t),
                Element::Paragraph(_) => None,
            })
            .collect()
    }

    pub fn cell_text(&self, table: usize, row: usize, col: usize) -> String {
        self.tables()[table].cells[row][col].clone()
    }

    pub fn body_text(&self) -> String {
        self.body
            .iter()
            .map(|e| match e {
                Element::Paragraph(p) => p.clone(),
                Element::Table(t) => t.cells.iter().flatten().cloned().collect::<Vec<_>>().join("|"),
            })
            .collect()
    }
}

struct FakeState {
    log: FakeLog,
    body: FakeBody,
    footer_id: Option<String>,
}

pub struct FakeDocs {
    state: Mutex<FakeState>,
    fail_on_batch: Option<usize>,
    footer_reply: bool,
}

impl FakeDocs {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                log: FakeLog {
                    created: Vec::new(),
                    batches: Vec::new(),
                    batch_calls: 0,
                    fetches: 0,
                    table_shapes: Vec::new(),
                    footer_image: None,
                    body: Vec::new(),
                },
                body: FakeBody::new(),
                footer_id: None,
            }),
            fail_on_batch: None,
            footer_reply: true,
        }
    }

    /// The `n`th `batch_update` call (1-based) returns a 500.
    pub fn failing_on_batch(n: usize) -> Self {
        Self {
            fail_on_batch: Some(n),
            ..Self::new()
        }
    }

    /// `createFooter` succeeds but its reply carries no footer id.
    pub fn without_footer_reply() -> Self {
        Self {
            footer_reply: false,
            ..Self::new()
        }
    }

    pub fn log(&self) -> FakeLog {
        let state = self.state.lock().unwrap();
        FakeLog {
            body: state.body.elements.clone(),
            ..state.log.clone()
        }
    }

    fn apply(
        &self,
        body: &mut FakeBody,
        footer_id: &mut Option<String>,
        log: &mut FakeLog,
        request: &Request,
    ) -> Result<Reply, String> {
        match request {
            Request::InsertText(InsertText {
                text,
                location: Some(location),
                ..
            }) => body.insert_text(location.index, text)?,
            Request::InsertText(InsertText { text, .. }) => body.append_text(text)?,
            Request::UpdateTextStyle(r) => check_range(body, footer_id.as_deref(), &r.range)?,
            Request::UpdateParagraphStyle(r) => check_range(body, footer_id.as_deref(), &r.range)?,
            Request::CreateParagraphBullets(r) => check_range(body, footer_id.as_deref(), &r.range)?,
            Request::InsertTable(t) => {
                body.elements.push(Element::Table(FakeTable::new(t.rows, t.columns)));
                body.elements.push(Element::Paragraph("\n".to_string()));
                log.table_shapes.push((t.rows, t.columns));
            }
            Request::MergeTableCells(m) => body.check_table(&m.table_range)?,
            Request::UpdateTableCellStyle(s) => body.check_table(&s.table_range)?,
            Request::UpdateTableColumnProperties(p) => {
                let widest = p.column_indices.iter().max().map_or(0, |c| c + 1);
                body.check_cells(p.table_start_location.index, 0, widest)?;
            }
            Request::UpdateTableRowStyle(s) => {
                let tallest = s.row_indices.iter().max().map_or(0, |r| r + 1);
                body.check_cells(s.table_start_location.index, tallest, 0)?;
            }
            Request::InsertPageBreak(_) => body.append_text("\u{c}")?,
            Request::CreateFooter(_) => {
                *footer_id = Some(FOOTER_ID.to_string());
                if self.footer_reply {
                    return Ok(Reply {
                        create_footer: Some(CreateFooterReply {
                            footer_id: FOOTER_ID.to_string(),
                        }),
                    });
                }
            }
            Request::InsertInlineImage(image) => {
                if Some(&image.end_of_segment_location.segment_id) != footer_id.as_ref() {
                    return Err("image outside the footer".to_string());
                }
                log.footer_image = Some(image.uri.clone());
            }
            Request::UpdateDocumentStyle(_) => {}
        }
        Ok(Reply::default())
    }
}

#[async_trait]
impl DocumentService for FakeDocs {
    async fn create_document(&self, name: &str) -> Result<String, DocsError> {
        let mut state = self.state.lock().unwrap();
        state.log.created.push(name.to_string());
        Ok(format!("doc-{}", state.log.created.len()))
    }

    async fn batch_update(
        &self,
        _document_id: &str,
        requests: &[Request],
    ) -> Result<BatchUpdateResponse, DocsError> {
        let mut guard = self.state.lock().unwrap();
        let state = &mut *guard;
        state.log.batch_calls += 1;
        if self.fail_on_batch == Some(state.log.batch_calls) {
            return Err(DocsError::Api {
                status: 500,
                message: "Internal error encountered.".to_string(),
            });
        }

        let mut body = state.body.clone();
        let mut footer_id = state.footer_id.clone();
        let mut log = state.log.clone();
        let mut replies = Vec::with_capacity(requests.len());
        for (i, request) in requests.iter().enumerate() {
            let reply = self
                .apply(&mut body, &mut footer_id, &mut log, request)
                .map_err(|message| DocsError::Api {
                    status: 400,
                    message: format!("Invalid requests[{i}]: {message}"),
                })?;
            replies.push(reply);
        }

        log.batches.push(requests.to_vec());
        state.body = body;
        state.footer_id = footer_id;
        state.log = log;
        Ok(BatchUpdateResponse { replies })
    }

    async fn get_document(&self, document_id: &str) -> Result<Document, DocsError> {
        let mut state = self.state.lock().unwrap();
        state.log.fetches += 1;
        Ok(state.body.to_document(document_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs_client::types::TextStyle;
    use crate::export::batch::{emit_cell_writes, emit_segments, CellWrite, Segment};
    use crate::export::tracker::{locate_table, TableLocator};

    fn writes(first: i64, second: i64) -> Vec<CellWrite> {
        vec![
            CellWrite {
                row: 0,
                col: 0,
                index: first,
                segments: vec![Segment::styled("abc", TextStyle::sized(10.0))],
            },
            CellWrite {
                row: 0,
                col: 1,
                index: second,
                segments: vec![Segment::plain("xy")],
            },
        ]
    }

    async fn one_by_two() -> (FakeDocs, i64, i64) {
        let docs = FakeDocs::new();
        docs.batch_update("doc", &[Request::insert_table(1, 2)]).await.unwrap();
        let doc = docs.get_document("doc").await.unwrap();
        let table = locate_table(&doc, TableLocator::LastInBody).unwrap();
        let first = table.content_index(0, 0).unwrap();
        let second = table.content_index(0, 1).unwrap();
        (docs, first, second)
    }

    #[tokio::test]
    async fn test_descending_writes_land_in_their_cells() {
        let (docs, first, second) = one_by_two().await;
        let batch = emit_cell_writes(writes(first, second));
        docs.batch_update("doc", &batch).await.unwrap();
        let log = docs.log();
        assert_eq!(log.cell_text(0, 0, 0), "abc");
        assert_eq!(log.cell_text(0, 0, 1), "xy");
    }

    #[tokio::test]
    async fn test_ascending_writes_hit_stale_indices() {
        let (docs, first, second) = one_by_two().await;
        let mut batch = emit_segments(first, &writes(first, second)[0].segments).0;
        batch.extend(emit_segments(second, &[Segment::plain("xy")]).0);
        docs.batch_update("doc", &batch).await.unwrap();
        let log = docs.log();
        assert_ne!(log.cell_text(0, 0, 0), "abc");
        assert_eq!(log.cell_text(0, 0, 1), "");
    }

    #[tokio::test]
    async fn test_invalid_batch_is_not_applied() {
        let docs = FakeDocs::new();
        let err = docs
            .batch_update("doc", &[Request::append_text("kept?"), Request::insert_text(999, "x")])
            .await
            .unwrap_err();
        assert!(matches!(err, DocsError::Api { status: 400, .. }));
        assert_eq!(docs.log().body_text(), "\n");
    }

    #[tokio::test]
    async fn test_table_indices_shift_with_header_text() {
        let docs = FakeDocs::new();
        docs.batch_update("doc", &[Request::insert_text(1, "Title\n"), Request::insert_table(2, 3)])
            .await
            .unwrap();
        let doc = docs.get_document("doc").await.unwrap();
        let table = locate_table(&doc, TableLocator::MostRecent).unwrap();
        // Paragraph "Title\n\n" spans 1..8, so the table starts at 8.
        assert_eq!(table.start_index, 8);
        assert_eq!(table.content_index(0, 0).unwrap(), 11);
        assert_eq!(table.content_index(1, 0).unwrap(), 18);
    }
}
