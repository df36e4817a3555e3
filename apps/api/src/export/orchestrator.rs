//! Export Orchestrator: sequences one export end to end.
//!
//! Flow: create document → page style + header → per unit
//! (commit empty table → resolve → structure → resolve → content) → footer.
//!
//! Every phase needs positions the service assigned in the previous one, so the
//! pipeline is strictly sequential. The first failure ends the export; nothing is
//! retried or rolled back.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::curriculum::{filter_lessons, Lesson};
use crate::docs_client::{document_url, DocsError, DocumentService, Request};
use crate::export::batch::{emit_cell_groups, emit_cell_writes, pack_batches};
use crate::export::header::{
    footer_requests, header_requests, HeaderContent, CHECKLIST_HEADER, GAME_BOARD_HEADER,
};
use crate::export::options::{BorderVariant, ChecklistOptions, ColorTheme, GameBoardOptions};
use crate::export::tracker::{DocumentTracker, TableLocator};
use crate::export::{checklist, game_board, ExportError};
use crate::layout::snake_grid::{DEFAULT_ITEMS_PER_PAGE, SQUARES_PER_ROW};
use crate::layout::{paginate, place_items, plan_separators, prepare_items, Separator};

/// Default cap on requests per board content call.
pub const DEFAULT_CONTENT_BATCH_SIZE: usize = 40;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistExportRequest {
    #[serde(default)]
    pub course_name: String,
    #[serde(default)]
    pub unit_name: String,
    pub section_name: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
    /// Restricts the export to these lesson ids; absent means all lessons.
    #[serde(default)]
    pub selected_lesson_ids: Option<Vec<String>>,
    #[serde(default)]
    pub options: ChecklistOptions,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameBoardExportRequest {
    #[serde(default)]
    pub course_name: String,
    #[serde(default)]
    pub unit_name: String,
    pub section_name: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
    #[serde(default)]
    pub selected_lesson_ids: Option<Vec<String>>,
    #[serde(default)]
    pub options: GameBoardOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOutcome {
    pub document_id: String,
    pub document_url: String,
}

/// Per-process tuning for board exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportLimits {
    pub content_batch_size: usize,
    pub items_per_page: usize,
}

impl Default for ExportLimits {
    fn default() -> Self {
        Self {
            content_batch_size: DEFAULT_CONTENT_BATCH_SIZE,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

fn class_name(include: bool, name: &str) -> Option<&str> {
    include.then_some(name)
}

// ────────────────────────────────────────────────────────────────────────────
// Pipelines
// ────────────────────────────────────────────────────────────────────────────

/// Exports the checklist: one table per lesson, separated by a paragraph or a page
/// break as the height estimate dictates.
#[instrument(name = "export.checklist", skip_all, fields(section = %request.section_name))]
pub async fn export_checklist(
    service: &dyn DocumentService,
    request: &ChecklistExportRequest,
) -> Result<ExportOutcome, ExportError> {
    let options = &request.options;
    let metrics = options.preset.metrics();
    let lessons = filter_lessons(&request.lessons, request.selected_lesson_ids.as_deref());

    let document_id = service
        .create_document(&format!("Checklist - {}", request.section_name))
        .await?;
    info!("Created checklist document {document_id} ({} lessons)", lessons.len());

    let header = HeaderContent {
        section_name: &request.section_name,
        course_name: &request.course_name,
        unit_name: &request.unit_name,
        class_name: class_name(options.include_class_name, &options.course_class_name),
        theme: options.color,
    };
    let mut setup = vec![checklist::document_style_request()];
    setup.extend(header_requests(&header, CHECKLIST_HEADER));
    service.batch_update(&document_id, &setup).await?;

    let tracker = DocumentTracker::new(service, &document_id);
    let separators = plan_separators(&lessons, options.teacher_sign_off);

    for (position, (lesson, separator)) in lessons.iter().zip(separators).enumerate() {
        let rows = checklist::row_count(lesson, options);

        let mut commit = Vec::with_capacity(2);
        match separator {
            Separator::None => {}
            Separator::Paragraph => commit.push(Request::append_text("\n")),
            Separator::PageBreak => commit.push(Request::page_break()),
        }
        commit.push(Request::insert_table(rows, checklist::COLUMNS));
        service.batch_update(&document_id, &commit).await?;

        let table = tracker.resolve(TableLocator::LastInBody).await?;
        table.ensure_shape(rows, checklist::COLUMNS)?;
        let structure = checklist::structure_requests(table.start_index, rows, options, &metrics);
        service.batch_update(&document_id, &structure).await?;

        let table = tracker.resolve(TableLocator::LastInBody).await?;
        let content = emit_cell_writes(checklist::cell_writes(lesson, &table, options)?);
        debug!("Lesson {} content: {} requests", lesson.id, content.len());
        service.batch_update(&document_id, &content).await?;

        info!(
            "Committed lesson {}/{} ({:?} separator)",
            position + 1,
            lessons.len(),
            separator
        );
    }

    add_footer(service, &document_id, options.border, options.color, metrics.footer_image_width)
        .await?;
    Ok(outcome(document_id))
}

/// Exports the game board: the item path is paginated and each page becomes one
/// snake-grid table.
#[instrument(name = "export.game_board", skip_all, fields(section = %request.section_name))]
pub async fn export_game_board(
    service: &dyn DocumentService,
    request: &GameBoardExportRequest,
    limits: ExportLimits,
) -> Result<ExportOutcome, ExportError> {
    let options = &request.options;
    let metrics = options.preset.metrics();
    let lessons = filter_lessons(&request.lessons, request.selected_lesson_ids.as_deref());
    let items = prepare_items(&lessons);
    let pages = paginate(&items, limits.items_per_page);

    let document_id = service
        .create_document(&format!("Game Board - {}", request.section_name))
        .await?;
    info!(
        "Created game board document {document_id} ({} items, {} pages)",
        items.len(),
        pages.len()
    );

    let header = HeaderContent {
        section_name: &request.section_name,
        course_name: &request.course_name,
        unit_name: &request.unit_name,
        class_name: class_name(options.include_class_name, &options.course_class_name),
        theme: options.color,
    };
    let mut setup = vec![game_board::document_style_request()];
    setup.extend(header_requests(&header, GAME_BOARD_HEADER));
    service.batch_update(&document_id, &setup).await?;

    let tracker = DocumentTracker::new(service, &document_id);
    let batch_size = limits.content_batch_size.max(1);

    for page in &pages {
        let plan = place_items(page.items.len());

        let mut commit = Vec::with_capacity(2);
        if page.number > 1 {
            commit.push(Request::page_break());
        }
        commit.push(Request::insert_table(plan.rows, SQUARES_PER_ROW));
        service.batch_update(&document_id, &commit).await?;

        let table = tracker.resolve(TableLocator::MostRecent).await?;
        table.ensure_shape(plan.rows, SQUARES_PER_ROW)?;
        let mut structure =
            game_board::sizing_requests(table.start_index, plan.rows, metrics.board_square_size);
        structure.extend(game_board::cell_style_requests(
            table.start_index,
            page,
            &plan,
            options,
        ));
        service.batch_update(&document_id, &structure).await?;

        let table = tracker.resolve(TableLocator::MostRecent).await?;
        table.ensure_shape(plan.rows, SQUARES_PER_ROW)?;
        let groups = emit_cell_groups(game_board::cell_writes(page, &plan, &table, options)?);
        let content: usize = groups.iter().map(Vec::len).sum();
        for batch in pack_batches(groups, batch_size) {
            service.batch_update(&document_id, &batch).await?;
        }

        info!(
            "Committed board page {}/{} ({} rows, {} content requests)",
            page.number,
            pages.len(),
            plan.rows,
            content
        );
    }

    add_footer(service, &document_id, options.border, options.color, metrics.footer_image_width)
        .await?;
    Ok(outcome(document_id))
}

fn outcome(document_id: String) -> ExportOutcome {
    ExportOutcome {
        document_url: document_url(&document_id),
        document_id,
    }
}

/// Creates the default footer and centers the themed border image in it.
async fn add_footer(
    service: &dyn DocumentService,
    document_id: &str,
    border: BorderVariant,
    theme: ColorTheme,
    width: f64,
) -> Result<(), ExportError> {
    let response = service
        .batch_update(document_id, &[Request::create_footer()])
        .await?;
    let footer_id = response
        .replies
        .into_iter()
        .next()
        .and_then(|reply| reply.create_footer)
        .map(|footer| footer.footer_id)
        .ok_or(DocsError::MissingReply("createFooter.footerId"))?;

    service
        .batch_update(
            document_id,
            &footer_requests(&footer_id, &border.image_url(theme), width),
        )
        .await?;
    info!("Footer {footer_id} added to {document_id}");
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
