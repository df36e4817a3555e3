// Layout without a layout engine: everything here is pure math over the curriculum.
// Checklist page breaks are estimated from row counts; the game board is a snake grid.

pub mod pagination;
pub mod snake_grid;

pub use pagination::{plan_separators, Separator};
pub use snake_grid::{paginate, place_items, prepare_items, BoardPage, GameBoardItem, GridPlan};
