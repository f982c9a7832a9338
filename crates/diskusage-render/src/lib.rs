//! Presentation of diskusage results.
//!
//! Turns a selected [`StatTree`](diskusage_core::StatTree) into an aligned,
//! size-annotated tree for the terminal or into a JSON document.

mod report;
mod rows;
mod theme;

pub use report::Presenter;
pub use rows::{Row, collect_rows};
pub use theme::{ColorMode, Theme};
