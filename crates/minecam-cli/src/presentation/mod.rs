//! Terminal output formatting.

pub mod tables;

pub use tables::{format_optional, print_separator, truncate_string};
