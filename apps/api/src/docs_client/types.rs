//! Wire types for the Docs v1 API.
//!
//! Requests serialize to the service's externally tagged camelCase vocabulary, e.g.
//! `{"insertText": {"text": "..", "location": {"index": 5}}}`. Only the subset the
//! exporters emit is modelled. Document reads keep just the structure needed for
//! index discovery: body elements, tables, rows, and cells with their start offsets.
//!
//! All indices are UTF-16 code unit offsets.

use serde::{Deserialize, Serialize};

/// Length of `text` in document index units.
pub fn utf16_len(text: &str) -> i64 {
    text.encode_utf16().count() as i64
}

// ────────────────────────────────────────────────────────────────────────────
// Primitives
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RgbColor {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl RgbColor {
    pub const BLACK: RgbColor = RgbColor::new(0.0, 0.0, 0.0);
    pub const WHITE: RgbColor = RgbColor::new(1.0, 1.0, 1.0);

    pub const fn new(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }

    /// Parses `#RRGGBB` or `#RGB` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let clean = hex.strip_prefix('#').unwrap_or(hex);
        let expanded: String = match clean.len() {
            3 => clean.chars().flat_map(|c| [c, c]).collect(),
            6 => clean.to_string(),
            _ => return None,
        };
        let channel = |i: usize| {
            expanded
                .get(i..i + 2)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .map(|v| v as f32 / 255.0)
        };
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorValue {
    pub rgb_color: RgbColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptionalColor {
    pub color: ColorValue,
}

impl From<RgbColor> for OptionalColor {
    fn from(rgb_color: RgbColor) -> Self {
        Self {
            color: ColorValue { rgb_color },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dimension {
    pub magnitude: f64,
    pub unit: &'static str,
}

impl Dimension {
    pub const fn pt(magnitude: f64) -> Self {
        Self {
            magnitude,
            unit: "PT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_id: Option<String>,
    pub index: i64,
}

impl Location {
    pub fn at(index: i64) -> Self {
        Self {
            segment_id: None,
            index,
        }
    }
}

/// End of the body (`""`) or of a header/footer segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndOfSegmentLocation {
    pub segment_id: String,
}

impl EndOfSegmentLocation {
    pub fn body() -> Self {
        Self {
            segment_id: String::new(),
        }
    }

    pub fn segment(id: &str) -> Self {
        Self {
            segment_id: id.to_string(),
        }
    }
}

/// Half-open `[start_index, end_index)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_id: Option<String>,
    pub start_index: i64,
    pub end_index: i64,
}

impl Range {
    pub fn new(start_index: i64, end_index: i64) -> Self {
        Self {
            segment_id: None,
            start_index,
            end_index,
        }
    }

    pub fn in_segment(segment_id: &str, start_index: i64, end_index: i64) -> Self {
        Self {
            segment_id: Some(segment_id.to_string()),
            start_index,
            end_index,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Alignment {
    Start,
    Center,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentAlignment {
    Top,
    Middle,
    Bottom,
}

// ────────────────────────────────────────────────────────────────────────────
// Style payloads
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground_color: Option<OptionalColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
}

impl TextStyle {
    pub fn sized(points: f64) -> Self {
        Self {
            font_size: Some(Dimension::pt(points)),
            ..Self::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = Some(true);
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = Some(true);
        self
    }

    pub fn colored(mut self, color: RgbColor) -> Self {
        self.foreground_color = Some(color.into());
        self
    }

    /// Hyperlink rendered underlined in `color`.
    pub fn linked(mut self, url: &str, color: RgbColor) -> Self {
        self.link = Some(Link {
            url: url.to_string(),
        });
        self.underline = Some(true);
        self.foreground_color = Some(color.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent_start: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent_first_line: Option<Dimension>,
}

impl ParagraphStyle {
    pub fn aligned(alignment: Alignment) -> Self {
        Self {
            alignment: Some(alignment),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCellBorder {
    pub color: OptionalColor,
    pub width: Dimension,
    pub dash_style: &'static str,
}

impl TableCellBorder {
    pub fn solid(width: f64, color: RgbColor) -> Self {
        Self {
            color: color.into(),
            width: Dimension::pt(width),
            dash_style: "SOLID",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCellStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<OptionalColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_top: Option<TableCellBorder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_bottom: Option<TableCellBorder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_left: Option<TableCellBorder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_right: Option<TableCellBorder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_top: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_bottom: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_left: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_right: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_alignment: Option<ContentAlignment>,
}

impl TableCellStyle {
    pub fn background(color: RgbColor) -> Self {
        Self {
            background_color: Some(color.into()),
            ..Self::default()
        }
    }

    pub fn with_borders(mut self, border: TableCellBorder) -> Self {
        self.border_top = Some(border);
        self.border_bottom = Some(border);
        self.border_left = Some(border);
        self.border_right = Some(border);
        self
    }

    pub fn with_padding(mut self, vertical: f64, horizontal: f64) -> Self {
        self.padding_top = Some(Dimension::pt(vertical));
        self.padding_bottom = Some(Dimension::pt(vertical));
        self.padding_left = Some(Dimension::pt(horizontal));
        self.padding_right = Some(Dimension::pt(horizontal));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Size {
    pub width: Dimension,
    pub height: Dimension,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObjectSize {
    pub width: Dimension,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_top: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_bottom: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_left: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_right: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<Size>,
}

impl DocumentStyle {
    pub fn uniform_margins(points: f64) -> Self {
        Self {
            margin_top: Some(Dimension::pt(points)),
            margin_bottom: Some(Dimension::pt(points)),
            margin_left: Some(Dimension::pt(points)),
            margin_right: Some(Dimension::pt(points)),
            page_size: None,
        }
    }
}

/// Field mask listing every key present in a serialized style payload.
pub fn field_mask<T: Serialize>(style: &T) -> String {
    match serde_json::to_value(style) {
        Ok(serde_json::Value::Object(map)) => map.keys().cloned().collect::<Vec<_>>().join(","),
        _ => String::new(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Requests
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertText {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_of_segment_location: Option<EndOfSegmentLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTextStyle {
    pub range: Range,
    pub text_style: TextStyle,
    pub fields: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertTable {
    pub rows: usize,
    pub columns: usize,
    pub end_of_segment_location: EndOfSegmentLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCellLocation {
    pub table_start_location: Location,
    pub row_index: usize,
    pub column_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRange {
    pub table_cell_location: TableCellLocation,
    pub row_span: usize,
    pub column_span: usize,
}

impl TableRange {
    pub fn new(table_start: i64, row: usize, col: usize, row_span: usize, column_span: usize) -> Self {
        Self {
            table_cell_location: TableCellLocation {
                table_start_location: Location::at(table_start),
                row_index: row,
                column_index: col,
            },
            row_span,
            column_span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeTableCells {
    pub table_range: TableRange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableColumnProperties {
    pub width_type: &'static str,
    pub width: Dimension,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTableColumnProperties {
    pub table_start_location: Location,
    pub column_indices: Vec<usize>,
    pub table_column_properties: TableColumnProperties,
    pub fields: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRowStyle {
    pub min_row_height: Dimension,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTableRowStyle {
    pub table_start_location: Location,
    pub row_indices: Vec<usize>,
    pub table_row_style: TableRowStyle,
    pub fields: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTableCellStyle {
    pub table_range: TableRange,
    pub table_cell_style: TableCellStyle,
    pub fields: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateParagraphStyle {
    pub range: Range,
    pub paragraph_style: ParagraphStyle,
    pub fields: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateParagraphBullets {
    pub range: Range,
    pub bullet_preset: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertPageBreak {
    pub end_of_segment_location: EndOfSegmentLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateFooter {
    #[serde(rename = "type")]
    pub footer_type: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertInlineImage {
    pub uri: String,
    pub end_of_segment_location: EndOfSegmentLocation,
    pub object_size: ObjectSize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentStyle {
    pub document_style: DocumentStyle,
    pub fields: String,
}

/// One batch operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Request {
    InsertText(InsertText),
    UpdateTextStyle(UpdateTextStyle),
    InsertTable(InsertTable),
    MergeTableCells(MergeTableCells),
    UpdateTableColumnProperties(UpdateTableColumnProperties),
    UpdateTableRowStyle(UpdateTableRowStyle),
    UpdateTableCellStyle(UpdateTableCellStyle),
    UpdateParagraphStyle(UpdateParagraphStyle),
    CreateParagraphBullets(CreateParagraphBullets),
    InsertPageBreak(InsertPageBreak),
    CreateFooter(CreateFooter),
    InsertInlineImage(InsertInlineImage),
    UpdateDocumentStyle(UpdateDocumentStyle),
}

impl Request {
    pub fn insert_text(index: i64, text: &str) -> Self {
        Request::InsertText(InsertText {
            text: text.to_string(),
            location: Some(Location::at(index)),
            end_of_segment_location: None,
        })
    }

    pub fn append_text(text: &str) -> Self {
        Request::InsertText(InsertText {
            text: text.to_string(),
            location: None,
            end_of_segment_location: Some(EndOfSegmentLocation::body()),
        })
    }

    pub fn text_style(range: Range, style: TextStyle) -> Self {
        let fields = field_mask(&style);
        Request::UpdateTextStyle(UpdateTextStyle {
            range,
            text_style: style,
            fields,
        })
    }

    pub fn insert_table(rows: usize, columns: usize) -> Self {
        Request::InsertTable(InsertTable {
            rows,
            columns,
            end_of_segment_location: EndOfSegmentLocation::body(),
        })
    }

    pub fn merge_cells(
        table_start: i64,
        row: usize,
        col: usize,
        row_span: usize,
        column_span: usize,
    ) -> Self {
        Request::MergeTableCells(MergeTableCells {
            table_range: TableRange::new(table_start, row, col, row_span, column_span),
        })
    }

    pub fn column_width(table_start: i64, col: usize, width: f64) -> Self {
        Request::UpdateTableColumnProperties(UpdateTableColumnProperties {
            table_start_location: Location::at(table_start),
            column_indices: vec![col],
            table_column_properties: TableColumnProperties {
                width_type: "FIXED_WIDTH",
                width: Dimension::pt(width),
            },
            fields: "width,widthType".to_string(),
        })
    }

    pub fn row_height(table_start: i64, row: usize, height: f64) -> Self {
        Request::UpdateTableRowStyle(UpdateTableRowStyle {
            table_start_location: Location::at(table_start),
            row_indices: vec![row],
            table_row_style: TableRowStyle {
                min_row_height: Dimension::pt(height),
            },
            fields: "minRowHeight".to_string(),
        })
    }

    pub fn cell_style(table_range: TableRange, style: TableCellStyle) -> Self {
        let fields = field_mask(&style);
        Request::UpdateTableCellStyle(UpdateTableCellStyle {
            table_range,
            table_cell_style: style,
            fields,
        })
    }

    pub fn paragraph_style(range: Range, style: ParagraphStyle) -> Self {
        let fields = field_mask(&style);
        Request::UpdateParagraphStyle(UpdateParagraphStyle {
            range,
            paragraph_style: style,
            fields,
        })
    }

    pub fn checkbox_bullets(range: Range) -> Self {
        Request::CreateParagraphBullets(CreateParagraphBullets {
            range,
            bullet_preset: "BULLET_CHECKBOX",
        })
    }

    pub fn page_break() -> Self {
        Request::InsertPageBreak(InsertPageBreak {
            end_of_segment_location: EndOfSegmentLocation::body(),
        })
    }

    pub fn create_footer() -> Self {
        Request::CreateFooter(CreateFooter {
            footer_type: "DEFAULT",
        })
    }

    pub fn inline_image(segment_id: &str, uri: &str, width: f64) -> Self {
        Request::InsertInlineImage(InsertInlineImage {
            uri: uri.to_string(),
            end_of_segment_location: EndOfSegmentLocation::segment(segment_id),
            object_size: ObjectSize {
                width: Dimension::pt(width),
            },
        })
    }

    pub fn document_style(style: DocumentStyle) -> Self {
        let fields = field_mask(&style);
        Request::UpdateDocumentStyle(UpdateDocumentStyle {
            document_style: style,
            fields,
        })
    }

    /// Text range this request styles, if it is a range-addressed style request.
    pub fn styled_range(&self) -> Option<&Range> {
        match self {
            Request::UpdateTextStyle(r) => Some(&r.range),
            Request::UpdateParagraphStyle(r) => Some(&r.range),
            Request::CreateParagraphBullets(r) => Some(&r.range),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchUpdateRequest<'a> {
    pub requests: &'a [Request],
}

// ────────────────────────────────────────────────────────────────────────────
// Responses
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFooterReply {
    pub footer_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    #[serde(default)]
    pub create_footer: Option<CreateFooterReply>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateResponse {
    #[serde(default)]
    pub replies: Vec<Reply>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    pub start_index: Option<i64>,
    pub end_index: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub start_index: Option<i64>,
    #[serde(default)]
    pub table_cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(default)]
    pub rows: usize,
    #[serde(default)]
    pub columns: usize,
    #[serde(default)]
    pub table_rows: Vec<TableRow>,
}

/// Body element. Paragraphs and section breaks carry no table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralElement {
    pub start_index: Option<i64>,
    pub end_index: Option<i64>,
    pub table: Option<Table>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Body {
    #[serde(default)]
    pub content: Vec<StructuralElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub document_id: String,
    #[serde(default)]
    pub body: Body,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedFile {
    pub id: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
