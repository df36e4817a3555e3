//! Curriculum entities consumed by the exporters.
//!
//! Only the fields the printables read are modelled; everything else in the
//! upstream course payload is ignored during deserialization.

use chrono::{DateTime, NaiveDate};
use serde::de::value::{Error as ValueError, StrDeserializer};
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

// ────────────────────────────────────────────────────────────────────────────
// Enumerations
// ────────────────────────────────────────────────────────────────────────────

/// Priority tag on an activity. Drives badge label and color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    #[default]
    MustDo,
    ShouldDo,
    AspireToDo,
}

impl Classification {
    /// Title-cased display text, e.g. `MUST_DO` → `Must Do`.
    pub fn display_name(self) -> &'static str {
        match self {
            Classification::MustDo => "Must Do",
            Classification::ShouldDo => "Should Do",
            Classification::AspireToDo => "Aspire To Do",
        }
    }
}

/// Only `VIDEO_AND_NOTES` changes rendering; unrecognised types read as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    InquiryActivity,
    VideoAndNotes,
    PracticeProblems,
    AdditionalPractice,
    MasteryCheck,
    Extension,
    WarmUp,
    ProblemSet,
    #[default]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Workstyle {
    Collaborative,
    #[default]
    Independent,
}

// ────────────────────────────────────────────────────────────────────────────
// Entities
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassActivity {
    #[serde(default)]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// Missing, null or unrecognised classification is treated as `MUST_DO`.
    #[serde(default, deserialize_with = "lenient_enum")]
    pub classification: Option<Classification>,
    #[serde(rename = "type", default, deserialize_with = "lenient_enum_or_default")]
    pub activity_type: ActivityType,
    #[serde(default, deserialize_with = "lenient_enum_or_default")]
    pub workstyle: Workstyle,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub class_activities: Vec<ClassActivity>,
}

impl Activity {
    pub fn classification(&self) -> Classification {
        self.classification.unwrap_or_default()
    }

    /// URL of the first resource, if it has one.
    pub fn first_resource_url(&self) -> Option<&str> {
        self.resources.first().and_then(|r| r.url.as_deref())
    }

    /// Due date of the first class assignment, parsed leniently.
    pub fn due_date(&self) -> Option<NaiveDate> {
        let raw = self.class_activities.first()?.due_date.as_deref()?;
        parse_due_date(raw)
    }

    /// Due date formatted as `Mon D` (e.g. `Mar 5`), or `None` when absent.
    pub fn due_date_label(&self) -> Option<String> {
        self.due_date().map(|d| d.format("%b %-d").to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    #[serde(default)]
    pub lesson_number: String,
    pub name: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub learning_target: String,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

/// Reads an enum by name. Null and unrecognised names become `None`; the latter
/// is logged so upstream drift is visible.
fn lenient_enum<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Some(name) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let by_name: StrDeserializer<'_, ValueError> = name.as_str().into_deserializer();
    match T::deserialize(by_name) {
        Ok(value) => Ok(Some(value)),
        Err(_) => {
            warn!("Unrecognised curriculum value {name:?}, using the default");
            Ok(None)
        }
    }
}

fn lenient_enum_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(lenient_enum(deserializer)?.unwrap_or_default())
}

/// Restricts `lessons` to the selected ids, keeping source order.
/// `None` selects everything.
pub fn filter_lessons<'a>(lessons: &'a [Lesson], selected: Option<&[String]>) -> Vec<&'a Lesson> {
    match selected {
        None => lessons.iter().collect(),
        Some(ids) => lessons
            .iter()
            .filter(|l| ids.iter().any(|id| *id == l.id))
            .collect(),
    }
}

/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates.
fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    warn!("Ignoring unparsable due date {raw:?}");
    None
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
