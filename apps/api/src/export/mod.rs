// Export pipeline: curriculum → ordered Docs request batches → remote document.
// Every table is committed empty, re-fetched for its server-assigned indices, then
// filled. All remote calls go through docs_client::DocumentService.

pub mod batch;
pub mod checklist;
pub mod game_board;
pub mod handlers;
pub mod header;
pub mod options;
pub mod orchestrator;
pub mod tracker;

#[cfg(test)]
pub(crate) mod fake_docs;

use thiserror::Error;

use crate::docs_client::DocsError;

/// The single terminal failure of an export. Whatever was already committed to the
/// remote document stays there.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Document service call failed: {0}")]
    Remote(#[from] DocsError),

    #[error("Committed table not found in document {0}")]
    TableNotFound(String),

    #[error(
        "Table geometry mismatch: expected {expected_rows}x{expected_columns}, \
         found {found_rows}x{found_columns}"
    )]
    Geometry {
        expected_rows: usize,
        expected_columns: usize,
        found_rows: usize,
        found_columns: usize,
    },

    #[error("Cell ({row}, {col}) has no resolved start index")]
    UnresolvedCell { row: usize, col: usize },
}
