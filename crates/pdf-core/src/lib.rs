//! PDF Core - Low-level PDF assembly
//!
//! This crate provides functionality for:
//! - Creating blank PDF documents and adding pages of a given size
//! - Inserting raw RGBA bitmaps as image XObjects
//! - Setting document information (title, author, creator)
//! - Saving to bytes
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{ImageXObject, PageSize, PdfDocument};
//!
//! let mut doc = PdfDocument::new();
//! let page = doc.add_page(PageSize::A4)?;
//! let image = ImageXObject::from_rgba(&bitmap, [255, 255, 255])?;
//! doc.insert_xobject(image, page, 28.35, 28.35, 538.58, 717.44)?;
//! let bytes = doc.to_bytes()?;
//! ```

mod document;
mod image;

pub use document::{DocumentInfo, PageSize, PdfDocument};
pub use image::ImageXObject;

use thiserror::Error;

/// Points per millimetre (1 pt = 1/72 inch)
pub const POINTS_PER_MM: f64 = 72.0 / 25.4;

/// Convert millimetres to PDF points
pub fn mm_to_pt(mm: f64) -> f64 {
    mm * POINTS_PER_MM
}

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Invalid page number: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("Invalid page size: {0} x {1} pt")]
    InvalidPageSize(f64, f64),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("PDF parsing error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;
