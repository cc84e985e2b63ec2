//! Paginated PDF inventory reports.
//!
//! [`ReportGenerator::generate`] validates a [`ReportData`] snapshot, lays
//! it out on A4 pages with a vertical cursor (header, items table, summary,
//! signatures, then a footer pass once the page count is known), and
//! renders the result with `lopdf`.
//!
//! [`ReportData`]: haulage_core::report::ReportData

pub mod error;
pub mod generator;
pub mod layout;
pub mod render;
pub mod sections;
pub mod settings;
pub mod signature;
pub mod text;

pub use error::GenerationError;
pub use generator::{GeneratedReport, ReportGenerator};
pub use settings::ReportSettings;
