//! Renderer and file sink seams

use crate::schema::{ComposedDocument, LayoutInstruction};
use std::convert::Infallible;
use thiserror::Error;

/// Turns layout instructions into document bytes
///
/// Instructions must be consumed strictly in order, top to bottom.
pub trait DocumentRenderer {
    type Error: std::error::Error + Send + Sync + 'static;

    fn render(&self, instructions: &[LayoutInstruction]) -> Result<Vec<u8>, Self::Error>;
}

/// Hands finished document bytes to the user (download, disk, ...)
pub trait FileSink {
    type Error: std::error::Error + Send + Sync + 'static;

    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> Result<(), Self::Error>;
}

/// Failure in the render/deliver step after composition
#[derive(Debug, Error)]
pub enum DeliveryError<R, S>
where
    R: std::error::Error + 'static,
    S: std::error::Error + 'static,
{
    #[error("Render error: {0}")]
    Render(R),

    #[error("Delivery error: {0}")]
    Sink(S),
}

/// Render a composed document and deliver it under its derived filename
///
/// Returns the number of bytes delivered.
pub fn render_and_deliver<R, S>(
    document: &ComposedDocument,
    renderer: &R,
    sink: &mut S,
) -> Result<usize, DeliveryError<R::Error, S::Error>>
where
    R: DocumentRenderer,
    S: FileSink,
{
    let bytes = renderer
        .render(document.instructions())
        .map_err(DeliveryError::Render)?;
    sink.deliver(document.output_filename(), &bytes)
        .map_err(DeliveryError::Sink)?;
    Ok(bytes.len())
}

/// Sink that keeps the most recently delivered document in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    last: Option<(String, Vec<u8>)>,
    delivered: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filename and bytes of the last delivery
    pub fn last(&self) -> Option<(&str, &[u8])> {
        self.last
            .as_ref()
            .map(|(name, bytes)| (name.as_str(), bytes.as_slice()))
    }

    /// Number of deliveries so far
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    pub fn take(&mut self) -> Option<(String, Vec<u8>)> {
        self.last.take()
    }
}

impl FileSink for MemorySink {
    type Error = Infallible;

    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> Result<(), Self::Error> {
        self.last = Some((filename.to_string(), bytes.to_vec()));
        self.delivered += 1;
        Ok(())
    }
}
