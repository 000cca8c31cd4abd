//! Letter Text - formatting helpers for experience letters
//!
//! This crate provides:
//! - Long-form English dates with ordinal suffixes ("31st August 2025")
//! - Parsing of `YYYY-MM-DD` date-picker values
//! - Honorific stripping and first-name extraction
//!
//! # Example
//!
//! ```ignore
//! use letter_text::{first_name, format_date_input};
//!
//! let date = format_date_input("2025-08-31")?; // "31st August 2025"
//! let name = first_name("Mr Manvendra Singh"); // "Manvendra"
//! ```

mod formatter;
mod names;

pub use formatter::{
    format_date_input, format_long_date, month_name, ordinal_suffix, parse_date_input,
    to_date_input,
};
pub use names::{first_name, strip_honorific, DEFAULT_FIRST_NAME};

use thiserror::Error;

/// Errors that can occur during letter text processing
#[derive(Debug, Error)]
pub enum LetterTextError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

/// Result type for letter text operations
pub type Result<T> = std::result::Result<T, LetterTextError>;
