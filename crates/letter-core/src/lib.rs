//! Letter Core - Pre-Shipment Sample letter composition
//!
//! This crate provides:
//! - Letter request types (recipient fields, labeled line items, container numbers)
//! - A read-only prefill table keyed by lookup code
//! - Composition of a request into ordered layout instructions
//! - Output filename derivation
//! - The renderer and file sink seams the composed document is handed to
//!
//! # Example
//!
//! ```ignore
//! use letter_core::{LetterComposer, LetterRequest, PrefillTable};
//!
//! let table = PrefillTable::embedded()?;
//! let composer = LetterComposer::new(&table);
//! let request: LetterRequest = serde_json::from_str(request_json)?;
//! let document = composer.compose(&request)?;
//! println!("{}", document.output_filename());
//! ```

mod composer;
pub mod filename;
pub mod format;
mod prefill;
mod schema;
mod sink;

pub use composer::{
    LetterComposer, ResolvedFields, ACKNOWLEDGEMENT, ATTENTION_LABEL, SENDER_LEGAL_NAME,
};
pub use filename::{derive_filename, sanitize_component, UNKNOWN_MATERIAL};
pub use prefill::{PrefillEntry, PrefillTable, PREFILL_TABLE_JSON};
pub use schema::*;
pub use sink::{render_and_deliver, DeliveryError, DocumentRenderer, FileSink, MemorySink};

use thiserror::Error;

/// Structural problems with a letter request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("at least one item is required")]
    NoItems,

    #[error("too many items: {0} (at most {max})", max = MAX_ITEMS)]
    TooManyItems(usize),

    #[error("weight of item {label} must be a finite, non-negative number")]
    InvalidWeight { label: char },

    #[error("container numbers must be positive (got {index} of {total})")]
    ZeroContainer { index: u32, total: u32 },

    #[error("container index {index} exceeds container total {total}")]
    ContainerOutOfRange { index: u32, total: u32 },
}

/// Errors that can occur while preparing a letter
#[derive(Debug, Error)]
pub enum LetterError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Prefill table error: {0}")]
    Prefill(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid date format pattern: {0}")]
    DateFormat(String),
}

/// Result type for letter operations
pub type Result<T> = std::result::Result<T, LetterError>;
