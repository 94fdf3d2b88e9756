// Sample programs
pub mod catalog;
pub use catalog::{add_two_fp, area_fp, data_fp, power_fp, Catalog, Flavor, Topic};
pub mod export;

// Page smoke test
pub mod smoke;

pub mod env;
pub mod error;
pub mod output;

/// Amount of lines to show as context around diagnostics.
pub const DIAGNOSTIC_CONTEXT_LINES: usize = 4;
