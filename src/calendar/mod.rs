pub mod grid;

pub use grid::{build_month_grid, CalendarCell, MonthRef};
