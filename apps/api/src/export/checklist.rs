//! Checklist document: one three-column table per lesson.
//!
//! Table layout (`n` activities, optional sign-off):
//! ```text
//! row 0        | lesson name (merged across all columns, grey)  |
//! row 1        | Due Date  | learning goal (optionally merged)   |
//! rows 2..2+n  | date      | ☐ activity              | status    |
//! last (opt.)  | ☐ Teacher Sign Off (merged across all columns)  |
//! ```

use crate::curriculum::{Activity, ActivityType, Classification, Lesson};
use crate::docs_client::types::{
    Alignment, DocumentStyle, ParagraphStyle, RgbColor, TableCellStyle, TableRange, TextStyle,
};
use crate::docs_client::Request;
use crate::export::batch::{CellWrite, Segment};
use crate::export::options::{ChecklistOptions, ColorTheme, PresetMetrics};
use crate::export::tracker::ResolvedTable;
use crate::export::ExportError;
use crate::layout::pagination::{table_row_count, PAGE_MARGIN_TOP};

pub const COLUMNS: usize = 3;

const HEADER_BACKGROUND: RgbColor = RgbColor::new(0.9, 0.9, 0.9);
const LINK_COLOR: RgbColor = RgbColor::new(0.1, 0.3, 0.8);
const SIGN_OFF_GREEN: RgbColor = RgbColor::new(0.13, 0.69, 0.3);
const FALLBACK_LINK: &str = "https://modernclassrooms.org";

fn status_color(classification: Classification) -> RgbColor {
    match classification {
        Classification::MustDo => RgbColor::new(0.04, 0.32, 0.58),
        Classification::ShouldDo => RgbColor::new(0.96, 0.62, 0.04),
        Classification::AspireToDo => RgbColor::new(0.84, 0.69, 0.0),
    }
}

pub fn document_style_request() -> Request {
    Request::document_style(DocumentStyle::uniform_margins(PAGE_MARGIN_TOP))
}

pub fn row_count(lesson: &Lesson, options: &ChecklistOptions) -> usize {
    table_row_count(lesson, options.teacher_sign_off)
}

/// Merges, column widths and the header background. None of these depend on cell
/// content, so they are applied before the table is re-fetched for content indices.
pub fn structure_requests(
    table_start: i64,
    rows: usize,
    options: &ChecklistOptions,
    metrics: &PresetMetrics,
) -> Vec<Request> {
    let mut requests = vec![Request::merge_cells(table_start, 0, 0, 1, COLUMNS)];
    if metrics.merge_learning_goal {
        requests.push(Request::merge_cells(table_start, 1, 1, 1, COLUMNS - 1));
    }
    if options.teacher_sign_off {
        requests.push(Request::merge_cells(table_start, rows - 1, 0, 1, COLUMNS));
    }
    requests.extend(
        metrics
            .checklist_column_widths
            .iter()
            .enumerate()
            .map(|(col, width)| Request::column_width(table_start, col, *width)),
    );
    requests.push(Request::cell_style(
        TableRange::new(table_start, 0, 0, 1, COLUMNS),
        TableCellStyle::background(HEADER_BACKGROUND),
    ));
    requests
}

fn activity_segment(activity: &Activity, options: &ChecklistOptions) -> Segment {
    let classification = activity.classification();
    let mut name = activity.name.clone();
    if classification == Classification::AspireToDo {
        name.push_str(if options.color.is_monochrome() { " ★" } else { " ⭐" });
    }

    let linkable = activity.activity_type == ActivityType::VideoAndNotes
        || activity.first_resource_url().is_some();
    let segment = if options.include_video_hyperlinks && linkable {
        let url = activity.first_resource_url().unwrap_or(FALLBACK_LINK);
        Segment::styled(
            name,
            TextStyle::default().linked(url, options.color.ink(LINK_COLOR)),
        )
    } else {
        Segment::plain(name)
    };
    segment.with_checkbox()
}

fn status_segment(classification: Classification, theme: ColorTheme) -> Segment {
    Segment::styled(
        classification.display_name(),
        TextStyle::sized(10.0)
            .bold()
            .colored(theme.ink(status_color(classification))),
    )
    .with_paragraph(ParagraphStyle::aligned(Alignment::Center))
}

/// Content for every cell of one lesson's resolved table.
pub fn cell_writes(
    lesson: &Lesson,
    table: &ResolvedTable,
    options: &ChecklistOptions,
) -> Result<Vec<CellWrite>, ExportError> {
    let cell = |row: usize, col: usize, segments: Vec<Segment>| -> Result<CellWrite, ExportError> {
        Ok(CellWrite {
            row,
            col,
            index: table.content_index(row, col)?,
            segments,
        })
    };

    let learning_goal = if lesson.learning_target.trim().is_empty() {
        "Learning Goal".to_string()
    } else {
        format!("Learning Goal: {}", lesson.learning_target)
    };

    let mut writes = vec![
        cell(0, 0, vec![Segment::styled(&lesson.name, TextStyle::sized(11.0).bold())])?,
        cell(1, 0, vec![Segment::styled("Due Date", TextStyle::sized(11.0))])?,
        cell(1, 1, vec![Segment::styled(learning_goal, TextStyle::sized(9.0).italic())])?,
    ];

    for (i, activity) in lesson.activities.iter().enumerate() {
        let row = i + 2;
        if let Some(date) = activity.due_date_label() {
            writes.push(cell(
                row,
                0,
                vec![Segment::styled(format!("🗓️ {date}"), TextStyle::sized(10.0))],
            )?);
        }
        writes.push(cell(row, 1, vec![activity_segment(activity, options)])?);
        writes.push(cell(
            row,
            2,
            vec![status_segment(activity.classification(), options.color)],
        )?);
    }

    if options.teacher_sign_off {
        let row = lesson.activities.len() + 2;
        writes.push(cell(
            row,
            0,
            vec![Segment::styled(
                "Teacher Sign Off",
                TextStyle::sized(10.0)
                    .bold()
                    .colored(options.color.ink(SIGN_OFF_GREEN)),
            )
            .with_checkbox()],
        )?);
    }

    Ok(writes)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
