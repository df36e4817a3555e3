//! Snake Grid Layout: lays a linear game-board path out as a zig-zag table.
//!
//! # Item sequence
//! `[start] + for each lesson: [lesson divider, activities...] + [finish]`
//!
//! # Pagination
//! Pages hold at most `items_per_page` items. At every interior cut the last slot of
//! the page becomes a synthetic continuation marker pointing at the next page's
//! display number, and the item it displaced opens the next page. Nothing is dropped
//! and every page ends with exactly one `End` item.
//!
//! # Grid
//! Seven columns. Even rows are main rows (up to seven items), odd rows are single-cell
//! connector rows. Row-group `g = row / 2` flows right-to-left iff `g` is odd; its
//! connector sits at column 0 in that case and at column 6 otherwise. The result is one
//! continuous path per page.

use crate::curriculum::{Activity, Lesson};

pub const SQUARES_PER_ROW: usize = 7;
pub const DEFAULT_ITEMS_PER_PAGE: usize = 15;

/// Smallest page that still has room for one real item plus its end marker.
const MIN_ITEMS_PER_PAGE: usize = 2;

// ────────────────────────────────────────────────────────────────────────────
// Items & pages
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameBoardItem<'a> {
    Start,
    Lesson {
        lesson: &'a Lesson,
    },
    Activity {
        lesson: &'a Lesson,
        activity: &'a Activity,
    },
    /// `page_number` is the display number of the page to continue on; it is only
    /// set on continuation markers.
    End {
        is_last_page: bool,
        page_number: Option<usize>,
    },
}

impl<'a> GameBoardItem<'a> {
    pub fn finish() -> Self {
        GameBoardItem::End {
            is_last_page: true,
            page_number: None,
        }
    }

    pub fn continuation(page_number: usize) -> Self {
        GameBoardItem::End {
            is_last_page: false,
            page_number: Some(page_number),
        }
    }

    pub fn is_continuation(&self) -> bool {
        matches!(
            self,
            GameBoardItem::End {
                is_last_page: false,
                ..
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardPage<'a> {
    /// 1-based display number.
    pub number: usize,
    pub items: Vec<GameBoardItem<'a>>,
}

/// Flattens lessons into the board's item path.
pub fn prepare_items<'a>(lessons: &[&'a Lesson]) -> Vec<GameBoardItem<'a>> {
    let mut items = vec![GameBoardItem::Start];
    for &lesson in lessons {
        items.push(GameBoardItem::Lesson { lesson });
        items.extend(
            lesson
                .activities
                .iter()
                .map(|activity| GameBoardItem::Activity { lesson, activity }),
        );
    }
    items.push(GameBoardItem::finish());
    items
}

/// Cuts the item path into pages of at most `items_per_page` items.
///
/// `items_per_page` below 2 is raised to 2.
pub fn paginate<'a>(items: &[GameBoardItem<'a>], items_per_page: usize) -> Vec<BoardPage<'a>> {
    let per_page = items_per_page.max(MIN_ITEMS_PER_PAGE);
    let mut pages = Vec::new();
    let mut remaining = items;

    while remaining.len() > per_page {
        let number = pages.len() + 1;
        let (head, tail) = remaining.split_at(per_page - 1);
        let mut page_items = head.to_vec();
        page_items.push(GameBoardItem::continuation(number + 1));
        pages.push(BoardPage {
            number,
            items: page_items,
        });
        remaining = tail;
    }

    if !remaining.is_empty() {
        pages.push(BoardPage {
            number: pages.len() + 1,
            items: remaining.to_vec(),
        });
    }
    pages
}

// ────────────────────────────────────────────────────────────────────────────
// Grid placement
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Main,
    Connector,
}

pub fn row_kind(row: usize) -> RowKind {
    if row % 2 == 0 {
        RowKind::Main
    } else {
        RowKind::Connector
    }
}

/// Row-group `row / 2` runs right-to-left when odd.
pub fn is_reverse_flow(row: usize) -> bool {
    (row / 2) % 2 == 1
}

/// Column holding the single item of a connector row.
pub fn connector_column(row: usize) -> usize {
    if is_reverse_flow(row) {
        0
    } else {
        SQUARES_PER_ROW - 1
    }
}

/// One item's cell in the page table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub item_index: usize,
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridPlan {
    pub rows: usize,
    pub columns: usize,
    /// In path order.
    pub placements: Vec<Placement>,
    /// Cells with no item, row-major; rendered as blank space.
    pub empty_cells: Vec<(usize, usize)>,
}

/// Places `item_count` path items on the snake grid.
pub fn place_items(item_count: usize) -> GridPlan {
    let mut placements = Vec::with_capacity(item_count);
    let mut row = 0;

    while placements.len() < item_count {
        match row_kind(row) {
            RowKind::Main => {
                let take = (item_count - placements.len()).min(SQUARES_PER_ROW);
                for i in 0..take {
                    let col = if is_reverse_flow(row) {
                        SQUARES_PER_ROW - 1 - i
                    } else {
                        i
                    };
                    placements.push(Placement {
                        item_index: placements.len(),
                        row,
                        col,
                    });
                }
            }
            RowKind::Connector => placements.push(Placement {
                item_index: placements.len(),
                row,
                col: connector_column(row),
            }),
        }
        row += 1;
    }

    let mut occupied = vec![[false; SQUARES_PER_ROW]; row];
    for p in &placements {
        occupied[p.row][p.col] = true;
    }
    let empty_cells = occupied
        .iter()
        .enumerate()
        .flat_map(|(r, cols)| {
            cols.iter()
                .enumerate()
                .filter(|(_, taken)| !**taken)
                .map(move |(c, _)| (r, c))
        })
        .collect();

    GridPlan {
        rows: row,
        columns: SQUARES_PER_ROW,
        placements,
        empty_cells,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
