//! Header and footer content shared by both artifacts.
//!
//! The header is written ascending from body index 1 in the setup batch, before any
//! table exists, so its indices are known without a fetch. The footer is written last:
//! create the footer segment, read its id from the reply, then place the border image.

use crate::docs_client::types::{Alignment, ParagraphStyle, Range, RgbColor, TextStyle};
use crate::docs_client::Request;
use crate::export::batch::{emit_segments, Segment};
use crate::export::options::ColorTheme;

/// Index of the first character in a new document body.
pub const BODY_START_INDEX: i64 = 1;

pub const BRAND_BLUE: RgbColor = RgbColor::new(0.06, 0.33, 0.56);

const BLANK_LINE: &str = "______________";

/// Per-artifact header typography.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderTypography {
    pub title_size: f64,
    pub subtitle_size: f64,
    pub subtitle_italic: bool,
}

pub const CHECKLIST_HEADER: HeaderTypography = HeaderTypography {
    title_size: 16.0,
    subtitle_size: 10.0,
    subtitle_italic: true,
};

pub const GAME_BOARD_HEADER: HeaderTypography = HeaderTypography {
    title_size: 18.0,
    subtitle_size: 14.0,
    subtitle_italic: false,
};

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderContent<'a> {
    pub section_name: &'a str,
    pub course_name: &'a str,
    pub unit_name: &'a str,
    /// Printed in the class blank when set and non-empty.
    pub class_name: Option<&'a str>,
    pub theme: ColorTheme,
}

/// Title, course/unit line and the student form line.
pub fn header_requests(content: &HeaderContent<'_>, typography: HeaderTypography) -> Vec<Request> {
    let title_style = TextStyle::sized(typography.title_size)
        .bold()
        .colored(content.theme.ink(BRAND_BLUE));
    let mut subtitle_style = TextStyle::sized(typography.subtitle_size);
    if typography.subtitle_italic {
        subtitle_style = subtitle_style.italic();
    }

    let mut segments = vec![
        Segment::styled(format!("{}\n", content.section_name), title_style),
        Segment::styled(
            format!("{} / {}\n\n", content.course_name, content.unit_name),
            subtitle_style,
        ),
        Segment::plain(format!(
            "Name: _______________________________   Date: {BLANK_LINE}   Class: "
        )),
    ];

    match content.class_name.filter(|name| !name.trim().is_empty()) {
        Some(name) if !content.theme.is_monochrome() => segments.push(Segment::styled(
            name,
            TextStyle::default().colored(BRAND_BLUE),
        )),
        Some(name) => segments.push(Segment::plain(name)),
        None => segments.push(Segment::plain(BLANK_LINE)),
    }
    segments.push(Segment::plain("\n\n"));

    emit_segments(BODY_START_INDEX, &segments).0
}

/// Border image plus centering for an already-created footer segment.
pub fn footer_requests(footer_id: &str, image_url: &str, width: f64) -> Vec<Request> {
    vec![
        Request::inline_image(footer_id, image_url, width),
        Request::paragraph_style(
            Range::in_segment(footer_id, 0, 1),
            ParagraphStyle::aligned(Alignment::Center),
        ),
    ]
}
