//! Export options and style presets.
//!
//! Generator variants differ only cosmetically (column widths, icons, footer art,
//! header-row merges). Those knobs live here as data; the request builders never
//! branch on a variant name. Every option has a default, so a sparse request body is
//! always exportable.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::curriculum::Classification;
use crate::docs_client::types::RgbColor;

// ────────────────────────────────────────────────────────────────────────────
// Themes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColorTheme {
    #[default]
    Color,
    BlackAndWhite,
}

impl ColorTheme {
    pub fn is_monochrome(self) -> bool {
        self == ColorTheme::BlackAndWhite
    }

    /// `color` in the color theme, black otherwise.
    pub fn ink(self, color: RgbColor) -> RgbColor {
        if self.is_monochrome() {
            RgbColor::BLACK
        } else {
            color
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BorderVariant {
    #[default]
    #[serde(rename = "BORDER_1")]
    Border1,
    #[serde(rename = "BORDER_2")]
    Border2,
    #[serde(rename = "BORDER_3")]
    Border3,
    #[serde(rename = "BORDER_4")]
    Border4,
}

impl BorderVariant {
    fn base_url(self) -> &'static str {
        match self {
            BorderVariant::Border1 => {
                "https://res.cloudinary.com/dgixwid5g/image/upload/v1763829060/border-1_tpjndr.png"
            }
            BorderVariant::Border2 => {
                "https://res.cloudinary.com/dgixwid5g/image/upload/v1763829100/border-2_ojxjr3.png"
            }
            BorderVariant::Border3 => {
                "https://res.cloudinary.com/dgixwid5g/image/upload/v1763829122/border-3_l6jm4h.png"
            }
            BorderVariant::Border4 => {
                "https://res.cloudinary.com/dgixwid5g/image/upload/v1763829149/border-4_shvqha.png"
            }
        }
    }

    /// Footer image URL; monochrome themes get the CDN grayscale transform.
    pub fn image_url(self, theme: ColorTheme) -> String {
        let url = self.base_url();
        if theme.is_monochrome() {
            url.replacen("/upload/", "/upload/e_grayscale/", 1)
        } else {
            url.to_string()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LessonDivider {
    LessonName,
    #[default]
    LessonNumber,
    LessonNameAndGraphic,
    LessonNumberAndGraphic,
}

impl LessonDivider {
    pub fn has_graphic(self) -> bool {
        matches!(
            self,
            LessonDivider::LessonNameAndGraphic | LessonDivider::LessonNumberAndGraphic
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GraphicTheme {
    #[default]
    Nature,
    School,
    Sports,
}

impl GraphicTheme {
    pub fn emoji(self) -> [&'static str; 8] {
        match self {
            GraphicTheme::Nature => ["🌿", "🌸", "🍃", "🌻", "🌺", "🌼", "🌷", "🌴"],
            GraphicTheme::School => ["📚", "✏️", "📝", "🎓", "📖", "🖊️", "📐", "🔬"],
            GraphicTheme::Sports => ["⚽", "🏀", "⚾", "🎾", "🏈", "🏐", "🏓", "⛳"],
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Presets
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StylePreset {
    #[default]
    Classic,
    Compact,
}

/// Cosmetic geometry selected by a preset. All sizes in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetMetrics {
    /// Due date, activity, status.
    pub checklist_column_widths: [f64; 3],
    /// Merge the learning-goal cell across the activity and status columns.
    pub merge_learning_goal: bool,
    pub board_square_size: f64,
    pub footer_image_width: f64,
}

impl StylePreset {
    pub fn metrics(self) -> PresetMetrics {
        match self {
            StylePreset::Classic => PresetMetrics {
                checklist_column_widths: [72.0, 360.0, 108.0],
                merge_learning_goal: true,
                board_square_size: 96.0,
                footer_image_width: 450.0,
            },
            StylePreset::Compact => PresetMetrics {
                checklist_column_widths: [64.0, 384.0, 92.0],
                merge_learning_goal: false,
                board_square_size: 88.0,
                footer_image_width: 400.0,
            },
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Classification labels
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationLabel {
    pub label: String,
    /// `#RRGGBB`.
    pub color: String,
}

impl ClassificationLabel {
    fn new(label: &str, color: &str) -> Self {
        Self {
            label: label.to_string(),
            color: color.to_string(),
        }
    }

    /// Label color as RGB; invalid hex falls back to black.
    pub fn rgb(&self) -> RgbColor {
        RgbColor::from_hex(&self.color).unwrap_or_else(|| {
            warn!("Invalid label color {:?}, using black", self.color);
            RgbColor::BLACK
        })
    }
}

/// Per-classification badge text and color, as configured in user settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct ClassificationLabels {
    pub must_do: ClassificationLabel,
    pub should_do: ClassificationLabel,
    pub aspire_to_do: ClassificationLabel,
}

impl Default for ClassificationLabels {
    fn default() -> Self {
        Self {
            must_do: ClassificationLabel::new("Must Do", "#0A5294"),
            should_do: ClassificationLabel::new("Should Do", "#F59E0A"),
            aspire_to_do: ClassificationLabel::new("Aspire To Do", "#D6B000"),
        }
    }
}

impl ClassificationLabels {
    pub fn get(&self, classification: Classification) -> &ClassificationLabel {
        match classification {
            Classification::MustDo => &self.must_do,
            Classification::ShouldDo => &self.should_do,
            Classification::AspireToDo => &self.aspire_to_do,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Per-artifact option sets
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChecklistOptions {
    pub border: BorderVariant,
    pub color: ColorTheme,
    pub include_class_name: bool,
    pub course_class_name: String,
    pub teacher_sign_off: bool,
    pub include_video_hyperlinks: bool,
    pub preset: StylePreset,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameBoardOptions {
    pub lesson_divider: LessonDivider,
    pub graphic_theme: GraphicTheme,
    pub color: ColorTheme,
    pub include_class_name: bool,
    pub course_class_name: String,
    pub classification_labels: ClassificationLabels,
    pub border: BorderVariant,
    pub preset: StylePreset,
}
