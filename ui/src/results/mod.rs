//! Result presentation and export surfaces.

mod list;
pub use list::StyledResultsPanel;

pub mod export;
