//! PDF Render - Draws composed letters onto A4 pages
//!
//! This crate provides:
//! - `PdfRenderer`, a `letter_core::DocumentRenderer` backed by lopdf
//! - Page geometry (`PageSetup`) in millimetres
//! - Helvetica metrics, word wrapping and justified lines
//! - Letterhead images (JPEG, PNG) embedded as image XObjects
//!
//! # Example
//!
//! ```ignore
//! use letter_core::{render_and_deliver, LetterComposer, MemorySink, PrefillTable};
//! use pdf_render::PdfRenderer;
//!
//! let table = PrefillTable::embedded()?;
//! let document = LetterComposer::new(&table).compose(&request)?;
//! let mut sink = MemorySink::new();
//! render_and_deliver(&document, &PdfRenderer::new(), &mut sink)?;
//! ```

mod document;
mod image;
pub mod metrics;
mod renderer;
pub mod text;

pub use document::{LetterDocument, PageSetup, MM_TO_PT};
pub use image::{detect_format, ImageFormat, ImageXObject};
pub use renderer::PdfRenderer;

use thiserror::Error;

/// Errors that can occur while producing a PDF
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Image error: {0}")]
    ImageError(String),

    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PdfError::ImageError("Unsupported image format".to_string());
        assert_eq!(err.to_string(), "Image error: Unsupported image format");

        let io: PdfError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(io, PdfError::IoError(_)));
    }
}
