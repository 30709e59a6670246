//! `DocumentRenderer` implementation producing PDF bytes

use crate::document::{LetterDocument, PageSetup};
use crate::{PdfError, Result};
use letter_core::{DocumentRenderer, LayoutInstruction};
use std::path::Path;

/// Renders layout instructions onto A4 pages in Helvetica
#[derive(Debug, Clone, Default)]
pub struct PdfRenderer {
    setup: PageSetup,
}

impl PdfRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_setup(mut self, setup: PageSetup) -> Self {
        self.setup = setup;
        self
    }

    pub fn setup(&self) -> &PageSetup {
        &self.setup
    }

    /// Draw every instruction in order and return the finished page writer
    pub fn layout(&self, instructions: &[LayoutInstruction]) -> Result<LetterDocument> {
        let mut doc = LetterDocument::new(self.setup.clone());

        for instruction in instructions {
            match instruction {
                LayoutInstruction::TextLine {
                    text,
                    bold,
                    align,
                    height,
                } => doc.text_line(text, *bold, *align, *height),
                LayoutInstruction::SplitLine {
                    left,
                    right,
                    bold,
                    height,
                } => doc.split_line(left, right, *bold, *height),
                LayoutInstruction::VerticalGap { amount } => doc.advance(*amount),
                LayoutInstruction::Image { path, x, y, width } => {
                    place_image(&mut doc, path, *x, *y, *width)?
                }
            }
        }

        Ok(doc)
    }
}

/// A missing image file is skipped; an unreadable or malformed one is an error
fn place_image(doc: &mut LetterDocument, path: &Path, x: f64, y: f64, width: f64) -> Result<()> {
    if !path.exists() {
        log::warn!("letterhead image not found, skipping: {}", path.display());
        return Ok(());
    }

    let data = std::fs::read(path)?;
    doc.image(&data, x, y, width)
}

impl DocumentRenderer for PdfRenderer {
    type Error = PdfError;

    fn render(&self, instructions: &[LayoutInstruction]) -> Result<Vec<u8>> {
        let doc = self.layout(instructions)?;
        log::debug!(
            "rendered {} instructions onto {} page(s)",
            instructions.len(),
            doc.page_count()
        );
        doc.to_bytes()
    }
}
