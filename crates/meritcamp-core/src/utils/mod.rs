//! Utility functions for string formatting and manipulation.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{
    format_date, format_optional, format_periods, format_phone, render_table, truncate_string,
};
