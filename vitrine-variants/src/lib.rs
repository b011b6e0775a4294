pub mod filter;
pub mod report;

pub use filter::{CombinationFilter, FilterConfig, DEFAULT_DISCONTINUED_MARKER};
pub use report::FilterReport;
