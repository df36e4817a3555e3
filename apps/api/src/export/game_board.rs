//! Game board document: one snake-grid table per board page.
//!
//! Every grid cell is a fixed square. Path cells get a 1pt black border and a
//! background keyed on their item; cells off the path lose their borders and
//! background so they read as blank paper.

use crate::curriculum::{Activity, Lesson, Workstyle};
use crate::docs_client::types::{
    Alignment, ContentAlignment, Dimension, DocumentStyle, ParagraphStyle, RgbColor, Size,
    TableCellBorder, TableCellStyle, TableRange, TextStyle,
};
use crate::docs_client::Request;
use crate::export::batch::{CellWrite, Segment};
use crate::export::options::{ColorTheme, GameBoardOptions, LessonDivider};
use crate::export::tracker::ResolvedTable;
use crate::export::ExportError;
use crate::layout::snake_grid::SQUARES_PER_ROW;
use crate::layout::{BoardPage, GameBoardItem, GridPlan};

pub const PAGE_WIDTH: f64 = 792.0;
pub const PAGE_HEIGHT: f64 = 612.0;
pub const PAGE_MARGIN: f64 = 40.0;

const GOLD: RgbColor = RgbColor::new(0.98, 0.75, 0.14);
const LIGHT_GREY: RgbColor = RgbColor::new(0.9, 0.9, 0.9);
const GREY_TEXT: RgbColor = RgbColor::new(0.39, 0.45, 0.55);

/// (background, text) pairs cycled by lesson number.
const LESSON_COLORS: [(RgbColor, RgbColor); 4] = [
    (RgbColor::new(0.96, 1.0, 0.85), RgbColor::new(0.55, 0.74, 0.05)),
    (RgbColor::new(1.0, 0.93, 0.9), RgbColor::new(0.93, 0.35, 0.22)),
    (RgbColor::new(0.93, 1.0, 1.0), RgbColor::new(0.12, 0.59, 0.63)),
    (RgbColor::new(1.0, 0.95, 0.89), RgbColor::new(0.98, 0.65, 0.22)),
];

/// Landscape letter with uniform margins.
pub fn document_style_request() -> Request {
    Request::document_style(DocumentStyle {
        page_size: Some(Size {
            width: Dimension::pt(PAGE_WIDTH),
            height: Dimension::pt(PAGE_HEIGHT),
        }),
        ..DocumentStyle::uniform_margins(PAGE_MARGIN)
    })
}

/// Fixed square columns and rows.
pub fn sizing_requests(table_start: i64, rows: usize, square_size: f64) -> Vec<Request> {
    (0..SQUARES_PER_ROW)
        .map(|col| Request::column_width(table_start, col, square_size))
        .chain((0..rows).map(|row| Request::row_height(table_start, row, square_size)))
        .collect()
}

fn hidden_cell_style() -> TableCellStyle {
    TableCellStyle::background(RgbColor::WHITE).with_borders(TableCellBorder::solid(0.0, RgbColor::WHITE))
}

fn path_cell_style(background: RgbColor) -> TableCellStyle {
    TableCellStyle {
        content_alignment: Some(ContentAlignment::Middle),
        ..TableCellStyle::background(background)
            .with_borders(TableCellBorder::solid(1.0, RgbColor::BLACK))
            .with_padding(4.0, 4.0)
    }
}

/// Lesson numbers are free text; anything without a positive leading integer counts
/// as lesson 1.
fn lesson_ordinal(lesson: &Lesson) -> usize {
    let digits: String = lesson
        .lesson_number
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse::<usize>().unwrap_or(1).max(1)
}

fn lesson_number_text(lesson: &Lesson) -> &str {
    match lesson.lesson_number.trim() {
        "" => "1",
        number => number,
    }
}

/// (background, text) for a lesson divider cell.
fn lesson_colors(lesson: &Lesson, options: &GameBoardOptions) -> (RgbColor, RgbColor) {
    if options.lesson_divider.has_graphic() {
        return (RgbColor::WHITE, RgbColor::BLACK);
    }
    if options.color.is_monochrome() {
        return (LIGHT_GREY, RgbColor::BLACK);
    }
    LESSON_COLORS[(lesson_ordinal(lesson) - 1) % LESSON_COLORS.len()]
}

fn lesson_segment(lesson: &Lesson, options: &GameBoardOptions) -> Segment {
    let number = lesson_number_text(lesson);
    let emoji = options.graphic_theme.emoji();
    let emoji = emoji[(lesson_ordinal(lesson) - 1) % emoji.len()];

    let (text, size) = match options.lesson_divider {
        LessonDivider::LessonName => (lesson.name.clone(), 10.0),
        LessonDivider::LessonNumber => (number.to_string(), 70.0),
        LessonDivider::LessonNameAndGraphic => (format!("Lesson {number}\n\n{emoji}"), 16.0),
        LessonDivider::LessonNumberAndGraphic => (format!("{emoji} {number}"), 32.0),
    };

    let mut style = TextStyle::sized(size).colored(lesson_colors(lesson, options).1);
    style.bold = Some(options.lesson_divider.has_graphic());
    Segment::styled(text, style).with_paragraph(ParagraphStyle::aligned(Alignment::Center))
}

fn workstyle_icon(workstyle: Workstyle) -> &'static str {
    match workstyle {
        Workstyle::Collaborative => "👥+",
        Workstyle::Independent => "👤",
    }
}

fn activity_segments(activity: &Activity, options: &GameBoardOptions) -> Vec<Segment> {
    let date = activity
        .due_date_label()
        .map(|label| format!("{label}\n\n"))
        .unwrap_or_else(|| "\n\n".to_string());
    let label = options.classification_labels.get(activity.classification());
    let badge_color = if options.color.is_monochrome() {
        RgbColor::BLACK
    } else {
        label.rgb()
    };

    vec![
        Segment::styled(date, TextStyle::sized(10.0).colored(GREY_TEXT)),
        Segment::styled(format!("{}\n\n", activity.name), TextStyle::sized(10.0).bold())
            .with_checkbox()
            .with_paragraph(ParagraphStyle {
                indent_start: Some(Dimension::pt(15.0)),
                indent_first_line: Some(Dimension::pt(-3.0)),
                ..ParagraphStyle::default()
            }),
        Segment::styled(&label.label, TextStyle::sized(10.0).bold().colored(badge_color)),
        Segment::plain(" "),
        Segment::styled(workstyle_icon(activity.workstyle), TextStyle::sized(11.0)),
    ]
}

fn end_segment(is_last_page: bool, page_number: Option<usize>) -> Segment {
    let (text, size) = match (is_last_page, page_number) {
        (true, _) | (false, None) => ("Finish!".to_string(), 24.0),
        (false, Some(next)) => (format!("Continue to Page {next}\n\n↪️"), 18.0),
    };
    Segment::styled(text, TextStyle::sized(size).bold())
        .with_paragraph(ParagraphStyle::aligned(Alignment::Center))
}

fn start_or_end_background(theme: ColorTheme) -> RgbColor {
    if theme.is_monochrome() {
        LIGHT_GREY
    } else {
        GOLD
    }
}

fn item_cell_style(item: &GameBoardItem<'_>, options: &GameBoardOptions) -> TableCellStyle {
    match item {
        GameBoardItem::Start | GameBoardItem::End { .. } => {
            path_cell_style(start_or_end_background(options.color))
        }
        GameBoardItem::Lesson { lesson } => path_cell_style(lesson_colors(lesson, options).0),
        GameBoardItem::Activity { .. } => {
            let mut style = path_cell_style(RgbColor::WHITE);
            style.padding_left = Some(Dimension::pt(8.0));
            style.padding_right = Some(Dimension::pt(8.0));
            style
        }
    }
}

fn item_segments(item: &GameBoardItem<'_>, options: &GameBoardOptions) -> Vec<Segment> {
    match item {
        GameBoardItem::Start => vec![Segment::styled("Start!\n\n⮕", TextStyle::sized(24.0).bold())
            .with_paragraph(ParagraphStyle::aligned(Alignment::Center))],
        GameBoardItem::End {
            is_last_page,
            page_number,
        } => vec![end_segment(*is_last_page, *page_number)],
        GameBoardItem::Lesson { lesson } => vec![lesson_segment(lesson, options)],
        GameBoardItem::Activity { activity, .. } => activity_segments(activity, options),
    }
}

/// Cell styles for the whole page: item backgrounds on the path, hidden cells
/// elsewhere. Independent of cell content, so applied with the sizing batch.
pub fn cell_style_requests(
    table_start: i64,
    page: &BoardPage<'_>,
    plan: &GridPlan,
    options: &GameBoardOptions,
) -> Vec<Request> {
    let path = plan.placements.iter().filter_map(|p| {
        page.items.get(p.item_index).map(|item| {
            Request::cell_style(
                TableRange::new(table_start, p.row, p.col, 1, 1),
                item_cell_style(item, options),
            )
        })
    });
    let blanks = plan.empty_cells.iter().map(|&(row, col)| {
        Request::cell_style(TableRange::new(table_start, row, col, 1, 1), hidden_cell_style())
    });
    path.chain(blanks).collect()
}

/// Content writes for every placed item of `page`.
pub fn cell_writes(
    page: &BoardPage<'_>,
    plan: &GridPlan,
    table: &ResolvedTable,
    options: &GameBoardOptions,
) -> Result<Vec<CellWrite>, ExportError> {
    plan.placements
        .iter()
        .filter_map(|p| page.items.get(p.item_index).map(|item| (p, item)))
        .map(|(p, item)| {
            Ok(CellWrite {
                row: p.row,
                col: p.col,
                index: table.content_index(p.row, p.col)?,
                segments: item_segments(item, options),
            })
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
