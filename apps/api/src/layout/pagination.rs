//! Checklist Pagination: decides where forced page breaks go without a layout engine.
//!
//! The remote document never reports rendered heights, so every checklist table is
//! estimated from its row count alone. All measurements are in points on a US letter
//! portrait page with 0.5" top and bottom margins.
//!
//! # Break rule
//! - The first table never breaks.
//! - Any later table breaks iff `current + candidate > AVAILABLE_PAGE_HEIGHT`.
//!   Landing exactly on the limit still fits.

use crate::curriculum::Lesson;

pub const PAGE_HEIGHT: f64 = 792.0;
pub const PAGE_MARGIN_TOP: f64 = 36.0;
pub const PAGE_MARGIN_BOTTOM: f64 = 36.0;
pub const AVAILABLE_PAGE_HEIGHT: f64 = PAGE_HEIGHT - PAGE_MARGIN_TOP - PAGE_MARGIN_BOTTOM;

/// Height consumed by the title, subtitle, and form-field block on page one.
pub const HEADER_HEIGHT: f64 = 100.0;
pub const ROW_HEIGHT: f64 = 30.0;
pub const TABLE_PADDING: f64 = 20.0;
pub const SPACING_BETWEEN_TABLES: f64 = 15.0;

/// Title row + learning goal row.
const FIXED_ROWS: usize = 2;

// ────────────────────────────────────────────────────────────────────────────
// Pure height math
// ────────────────────────────────────────────────────────────────────────────

/// Number of rows in a lesson's checklist table.
pub fn table_row_count(lesson: &Lesson, teacher_sign_off: bool) -> usize {
    FIXED_ROWS + lesson.activities.len() + usize::from(teacher_sign_off)
}

/// Estimated rendered height of a lesson's checklist table.
pub fn estimate_table_height(lesson: &Lesson, teacher_sign_off: bool) -> f64 {
    table_row_count(lesson, teacher_sign_off) as f64 * ROW_HEIGHT + TABLE_PADDING
}

/// Whether a table of `table_height` must start on a fresh letter page.
pub fn should_insert_page_break(current_height: f64, table_height: f64, is_first: bool) -> bool {
    should_insert_page_break_within(AVAILABLE_PAGE_HEIGHT, current_height, table_height, is_first)
}

/// Break rule against an arbitrary usable page height.
pub fn should_insert_page_break_within(
    available: f64,
    current_height: f64,
    table_height: f64,
    is_first: bool,
) -> bool {
    !is_first && current_height + table_height > available
}

// ────────────────────────────────────────────────────────────────────────────
// Accumulator
// ────────────────────────────────────────────────────────────────────────────

/// Running height of the current page. Owned by a single export call.
#[derive(Debug, Clone, PartialEq)]
pub struct PageTracker {
    current_height: f64,
}

impl Default for PageTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PageTracker {
    /// Starts below the document header.
    pub fn new() -> Self {
        Self {
            current_height: HEADER_HEIGHT,
        }
    }

    pub fn add_table(&mut self, table_height: f64) {
        self.current_height += table_height + SPACING_BETWEEN_TABLES;
    }

    /// Called after a forced break; the next table starts at the page top.
    pub fn reset_page(&mut self) {
        self.current_height = 0.0;
    }

    pub fn current_height(&self) -> f64 {
        self.current_height
    }
}

/// How a checklist table is separated from the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// First table: sits directly under the header.
    None,
    /// Same page: an empty paragraph between tables.
    Paragraph,
    PageBreak,
}

/// Plans the separator before each table and advances the tracker.
///
/// Returns one entry per lesson, in order.
pub fn plan_separators(lessons: &[&Lesson], teacher_sign_off: bool) -> Vec<Separator> {
    plan_separators_within(AVAILABLE_PAGE_HEIGHT, lessons, teacher_sign_off)
}

/// `plan_separators` for a page with `available` points of usable height.
pub fn plan_separators_within(
    available: f64,
    lessons: &[&Lesson],
    teacher_sign_off: bool,
) -> Vec<Separator> {
    let mut tracker = PageTracker::new();
    lessons
        .iter()
        .enumerate()
        .map(|(i, lesson)| {
            let height = estimate_table_height(lesson, teacher_sign_off);
            let is_first = i == 0;
            let separator = if should_insert_page_break_within(
                available,
                tracker.current_height(),
                height,
                is_first,
            ) {
                tracker.reset_page();
                Separator::PageBreak
            } else if is_first {
                Separator::None
            } else {
                Separator::Paragraph
            };
            tracker.add_table(height);
            separator
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curriculum::{Activity, ActivityType, Workstyle};

    fn make_lesson(activity_count: usize) -> Lesson {
        Lesson {
            id: format!("lesson-{activity_count}"),
            lesson_number: "1".to_string(),
            name: "Fractions".to_string(),
            order: 0,
            learning_target: String::new(),
            activities: (0..activity_count)
                .map(|i| Activity {
                    id: format!("a{i}"),
                    name: format!("Activity {i}"),
                    classification: None,
                    activity_type: ActivityType::PracticeProblems,
                    workstyle: Workstyle::Independent,
                    resources: vec![],
                    class_activities: vec![],
                })
                .collect(),
        }
    }

    #[test]
    fn test_estimate_height_counts_rows_exactly() {
        for activities in [0usize, 1, 4, 12] {
            for sign_off in [false, true] {
                let lesson = make_lesson(activities);
                let expected =
                    (2 + activities + usize::from(sign_off)) as f64 * ROW_HEIGHT + TABLE_PADDING;
                assert_eq!(estimate_table_height(&lesson, sign_off), expected);
            }
        }
    }

    #[test]
    fn test_first_table_never_breaks() {
        assert!(!should_insert_page_break(10_000.0, 10_000.0, true));
        assert!(!should_insert_page_break(0.0, 0.0, true));
    }

    #[test]
    fn test_break_only_when_strictly_over() {
        assert!(!should_insert_page_break(AVAILABLE_PAGE_HEIGHT - 100.0, 100.0, false));
        assert!(should_insert_page_break(AVAILABLE_PAGE_HEIGHT - 100.0, 100.5, false));
        assert!(!should_insert_page_break(0.0, 50.0, false));
    }

    #[test]
    fn test_break_rule_against_custom_height() {
        assert!(!should_insert_page_break_within(500.0, 400.0, 100.0, false));
        assert!(should_insert_page_break_within(500.0, 400.0, 100.5, false));
        assert!(!should_insert_page_break_within(500.0, 10_000.0, 1.0, true));
    }

    #[test]
    fn test_break_decision_is_pure() {
        let a = should_insert_page_break(600.0, 150.0, false);
        let _ = should_insert_page_break(0.0, 10.0, true);
        let b = should_insert_page_break(600.0, 150.0, false);
        assert_eq!(a, b);
        let lesson = make_lesson(3);
        assert_eq!(
            estimate_table_height(&lesson, true),
            estimate_table_height(&lesson, true)
        );
    }

    #[test]
    fn test_tracker_accumulates_and_resets() {
        let mut tracker = PageTracker::new();
        assert_eq!(tracker.current_height(), HEADER_HEIGHT);
        tracker.add_table(170.0);
        assert_eq!(tracker.current_height(), HEADER_HEIGHT + 170.0 + SPACING_BETWEEN_TABLES);
        tracker.reset_page();
        assert_eq!(tracker.current_height(), 0.0);
    }

    #[test]
    fn test_three_lessons_break_before_third() {
        // 5, 3, 7 rows → 170, 110, 230 pt. Before the third table the page holds
        // 100 + 185 + 125 = 410 pt, so a 500 pt page fits two tables but not three.
        let lessons = [make_lesson(2), make_lesson(0), make_lesson(4)];
        let refs: Vec<&Lesson> = lessons.iter().collect();
        let plan = plan_separators_within(500.0, &refs, true);
        assert_eq!(
            plan,
            vec![Separator::None, Separator::Paragraph, Separator::PageBreak]
        );
    }

    #[test]
    fn test_tall_lesson_breaks_on_letter_page() {
        // 2, 0, 14 activities with sign-off → 5, 3, 17 rows → 170, 110, 530 pt.
        // Before the third table the page holds 100 + 185 + 125 = 410 pt; 410 + 530 > 720.
        let lessons = [make_lesson(2), make_lesson(0), make_lesson(14)];
        let refs: Vec<&Lesson> = lessons.iter().collect();
        assert_eq!(
            plan_separators(&refs, true),
            vec![Separator::None, Separator::Paragraph, Separator::PageBreak]
        );
    }

    #[test]
    fn test_small_lessons_share_page() {
        let lessons = [make_lesson(2), make_lesson(0), make_lesson(4)];
        let rows: Vec<usize> = lessons.iter().map(|l| table_row_count(l, true)).collect();
        assert_eq!(rows, vec![5, 3, 7]);
        let refs: Vec<&Lesson> = lessons.iter().collect();
        let plan = plan_separators(&refs, true);
        assert_eq!(
            plan,
            vec![Separator::None, Separator::Paragraph, Separator::Paragraph]
        );
    }
}
