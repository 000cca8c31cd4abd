//! Experience Letter - form controller, letter content and PDF export
//!
//! This crate provides:
//! - The letter data model (`LetterForm` raw inputs, derived `LetterData`)
//! - A form controller with edit/preview modes and required-field validation
//! - Letter content composition for the preview template
//! - An export adapter that rasterizes the preview and writes an A4 PDF
//!
//! # Example
//!
//! ```ignore
//! use letter::{parse_config, ExportAdapter, FormController, LetterForm};
//!
//! let config = parse_config(config_json)?;
//! let mut controller = FormController::from_config(&config);
//! controller.submit(form)?;
//!
//! let mut adapter = ExportAdapter::new(config.export, rasterizer, sink, notifier);
//! let outcome = adapter
//!     .export(Some(&mut surface), &controller.first_name(), timestamp_millis)
//!     .await;
//! ```

mod config;
mod content;
mod controller;
pub mod export;
mod schema;

pub use config::{parse_config, CompanyProfile, ExportSettings, LetterConfig};
pub use content::LetterContent;
pub use controller::{DisplayMode, FormController};
pub use export::{
    build_letter_pdf, export_file_name, CaptureOptions, DirectorySink, DocumentSink,
    ExportAdapter, ExportOutcome, LogNotifier, Notifier, PageLayout, Placement, PreviewSurface,
    Rasterizer,
};
pub use schema::*;

use letter_text::LetterTextError;
use thiserror::Error;

/// Errors that can occur while editing, deriving or exporting a letter
#[derive(Debug, Error)]
pub enum LetterError {
    #[error("Missing required fields: {}", join_fields(.missing))]
    Validation { missing: Vec<FormField> },

    #[error("Invalid {field}: {source}")]
    InvalidDate {
        field: FormField,
        source: LetterTextError,
    },

    #[error("Unknown title: {0}")]
    InvalidTitle(String),

    #[error("Unknown form field: {0}")]
    UnknownField(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Rasterization failed: {0}")]
    RasterizeError(String),

    #[error("Captured bitmap is empty")]
    EmptyBitmap,

    #[error("Failed to save document: {0}")]
    SaveError(String),

    #[error("PDF error: {0}")]
    PdfError(#[from] pdf_core::PdfError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl LetterError {
    /// Missing required input; the user corrects the form and resubmits
    pub fn is_validation_failure(&self) -> bool {
        matches!(self, LetterError::Validation { .. })
    }

    /// Failure while capturing, assembling or saving the PDF
    pub fn is_export_failure(&self) -> bool {
        matches!(
            self,
            LetterError::RasterizeError(_)
                | LetterError::EmptyBitmap
                | LetterError::SaveError(_)
                | LetterError::PdfError(_)
        )
    }
}

fn join_fields(fields: &[FormField]) -> String {
    fields
        .iter()
        .map(FormField::label)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for letter operations
pub type Result<T> = std::result::Result<T, LetterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_fields() {
        let err = LetterError::Validation {
            missing: vec![FormField::EmployeeCode, FormField::Designation],
        };
        assert_eq!(
            err.to_string(),
            "Missing required fields: employee code, designation"
        );
        assert!(err.is_validation_failure());
        assert!(!err.is_export_failure());
    }

    #[test]
    fn test_export_failure_kinds() {
        assert!(LetterError::EmptyBitmap.is_export_failure());
        assert!(LetterError::RasterizeError("boom".into()).is_export_failure());
        assert!(!LetterError::InvalidTitle("Dr".into()).is_export_failure());
    }
}
