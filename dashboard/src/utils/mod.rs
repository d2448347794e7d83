pub mod format;

pub use format::{capitalize_first, format_date};
