//! Document State Tracker: index discovery after structural commits.
//!
//! A freshly inserted table has no known position: the insert request does not
//! return one. After the commit the live document is re-fetched and the new table is
//! located in the body, which yields the true start offset of every row and cell.

use tracing::debug;

use crate::docs_client::types::{Document, StructuralElement};
use crate::docs_client::DocumentService;
use crate::export::ExportError;

/// How to pick the just-committed table out of the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableLocator {
    /// Last table element, scanning from the end of the body.
    LastInBody,
    /// Table with the greatest start index.
    MostRecent,
}

/// Server-assigned positions of one table.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTable {
    pub start_index: i64,
    /// Cell start offsets, row-major. `None` where the service omitted one.
    cell_starts: Vec<Vec<Option<i64>>>,
}

impl ResolvedTable {
    fn from_element(element: &StructuralElement) -> Option<Self> {
        let table = element.table.as_ref()?;
        let start_index = element.start_index?;
        let cell_starts = table
            .table_rows
            .iter()
            .map(|row| row.table_cells.iter().map(|cell| cell.start_index).collect())
            .collect();
        Some(Self {
            start_index,
            cell_starts,
        })
    }

    pub fn rows(&self) -> usize {
        self.cell_starts.len()
    }

    /// Index at which text for cell (`row`, `col`) is inserted: just past the cell's
    /// start marker, inside its implicit empty paragraph.
    pub fn content_index(&self, row: usize, col: usize) -> Result<i64, ExportError> {
        self.cell_starts
            .get(row)
            .and_then(|cells| cells.get(col))
            .copied()
            .flatten()
            .map(|start| start + 1)
            .ok_or(ExportError::UnresolvedCell { row, col })
    }

    /// Fails unless the resolved table has the committed shape in every row.
    /// `found_columns` reports the first ragged row, if any.
    pub fn ensure_shape(&self, rows: usize, columns: usize) -> Result<(), ExportError> {
        let found_columns = self
            .cell_starts
            .iter()
            .map(Vec::len)
            .find(|&len| len != columns)
            .unwrap_or(if self.cell_starts.is_empty() { 0 } else { columns });
        if self.rows() != rows || found_columns != columns {
            return Err(ExportError::Geometry {
                expected_rows: rows,
                expected_columns: columns,
                found_rows: self.rows(),
                found_columns,
            });
        }
        Ok(())
    }
}

/// Finds the table `locator` designates in an already-fetched document.
pub fn locate_table(document: &Document, locator: TableLocator) -> Option<ResolvedTable> {
    let mut tables = document
        .body
        .content
        .iter()
        .filter(|element| element.table.is_some());

    let element = match locator {
        TableLocator::LastInBody => tables.next_back(),
        TableLocator::MostRecent => tables.max_by_key(|element| element.start_index),
    }?;
    ResolvedTable::from_element(element)
}

/// Resolves table positions for one document, one fetch per call.
pub struct DocumentTracker<'a> {
    service: &'a dyn DocumentService,
    document_id: &'a str,
}

impl<'a> DocumentTracker<'a> {
    pub fn new(service: &'a dyn DocumentService, document_id: &'a str) -> Self {
        Self {
            service,
            document_id,
        }
    }

    pub async fn resolve(&self, locator: TableLocator) -> Result<ResolvedTable, ExportError> {
        let document = self.service.get_document(self.document_id).await?;
        let table = locate_table(&document, locator)
            .ok_or_else(|| ExportError::TableNotFound(self.document_id.to_string()))?;
        debug!(
            "Resolved table at {} ({} rows) in {}",
            table.start_index,
            table.rows(),
            self.document_id
        );
        Ok(table)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
