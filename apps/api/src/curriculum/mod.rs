// Curriculum input model: course → unit → section → lesson → activity.
// Read-only; the exporters never mutate it.

pub mod models;

pub use models::{filter_lessons, Activity, ActivityType, Classification, Lesson, Workstyle};
