//! Page writer: a top-down cursor over A4 pages

use crate::image::ImageXObject;
use crate::metrics::text_width;
use crate::text::{
    encode_win_ansi, justify_spacing, real, text_operations, wrap_to_width, TextPlacement,
};
use crate::{PdfError, Result};
use letter_core::Align;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// Points per millimetre
pub const MM_TO_PT: f64 = 72.0 / 25.4;

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

/// Page geometry in millimetres; font size in points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageSetup {
    pub width: f64,
    pub height: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub margin_top: f64,
    /// Distance from the bottom edge that triggers a page break
    pub margin_bottom: f64,
    /// Horizontal padding inside each text cell
    pub cell_padding: f64,
    pub font_size: f64,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            width: 210.0,
            height: 297.0,
            margin_left: 10.0,
            margin_right: 10.0,
            margin_top: 10.0,
            margin_bottom: 20.0,
            cell_padding: 1.0,
            font_size: 10.0,
        }
    }
}

impl PageSetup {
    /// Width between the left and right margins
    pub fn content_width(&self) -> f64 {
        self.width - self.margin_left - self.margin_right
    }

    /// Width available to text inside a full-width cell
    fn text_width(&self) -> f64 {
        self.content_width() - 2.0 * self.cell_padding
    }

    fn font_size_mm(&self) -> f64 {
        self.font_size / MM_TO_PT
    }
}

/// A letter being drawn page by page
///
/// The cursor starts at the top margin and only moves down. Text that would
/// cross the bottom margin starts a new page.
pub struct LetterDocument {
    setup: PageSetup,
    /// Finished pages' content operators
    pages: Vec<Vec<Operation>>,
    /// Operators of the page being drawn
    current: Vec<Operation>,
    /// Distance of the cursor from the top edge, in mm
    cursor_y: f64,
    /// Embedded images, resource name "Im{index + 1}"
    images: Vec<ImageXObject>,
    /// Image data hash -> index into `images`
    image_index: HashMap<u64, usize>,
}

impl LetterDocument {
    pub fn new(setup: PageSetup) -> Self {
        let cursor_y = setup.margin_top;
        Self {
            setup,
            pages: Vec::new(),
            current: Vec::new(),
            cursor_y,
            images: Vec::new(),
            image_index: HashMap::new(),
        }
    }

    pub fn setup(&self) -> &PageSetup {
        &self.setup
    }

    /// Number of pages, counting the one being drawn
    pub fn page_count(&self) -> usize {
        self.pages.len() + 1
    }

    pub fn cursor_y(&self) -> f64 {
        self.cursor_y
    }

    /// Move the cursor down without drawing
    pub fn advance(&mut self, amount: f64) {
        self.cursor_y += amount;
    }

    /// Start a new page if a line of `height` would cross the bottom margin
    fn ensure_room(&mut self, height: f64) {
        let limit = self.setup.height - self.setup.margin_bottom;
        if self.cursor_y + height > limit && self.cursor_y > self.setup.margin_top {
            log::debug!("page break at y={:.1}mm", self.cursor_y);
            self.pages.push(std::mem::take(&mut self.current));
            self.cursor_y = self.setup.margin_top;
        }
    }

    /// Draw one line of text in a cell of `height` at the cursor
    pub fn text_line(&mut self, text: &str, bold: bool, align: Align, height: f64) {
        if align == Align::Justify {
            self.justified(text, bold, height);
            return;
        }

        self.ensure_room(height);
        self.cell_text(text, bold, align, height, 0.0);
        self.cursor_y += height;
    }

    /// Draw `left` at the left margin and `right` at the right margin on one line
    pub fn split_line(&mut self, left: &str, right: &str, bold: bool, height: f64) {
        self.ensure_room(height);
        self.cell_text(left, bold, Align::Left, height, 0.0);
        self.cell_text(right, bold, Align::Right, height, 0.0);
        self.cursor_y += height;
    }

    /// Wrap text to the content width, stretching every line but the last
    fn justified(&mut self, text: &str, bold: bool, height: f64) {
        let max_width = self.setup.text_width() * MM_TO_PT;
        let lines = wrap_to_width(text, bold, self.setup.font_size, max_width);
        let last = lines.len() - 1;

        for (i, line) in lines.iter().enumerate() {
            let spacing = if i < last {
                justify_spacing(line, bold, self.setup.font_size, max_width)
            } else {
                0.0
            };

            self.ensure_room(height);
            self.cell_text(line, bold, Align::Left, height, spacing);
            self.cursor_y += height;
        }
    }

    /// Emit text operators for a cell at the cursor; the cursor does not move
    fn cell_text(
        &mut self,
        text: &str,
        bold: bool,
        align: Align,
        height: f64,
        word_spacing: f64,
    ) {
        if text.is_empty() {
            return;
        }

        let setup = &self.setup;
        let x = match align {
            Align::Right => {
                let width_mm = text_width(text, bold, setup.font_size) / MM_TO_PT;
                setup.width - setup.margin_right - setup.cell_padding - width_mm
            }
            Align::Left | Align::Justify => setup.margin_left + setup.cell_padding,
        };
        let baseline = self.cursor_y + height / 2.0 + 0.3 * setup.font_size_mm();

        let placement = TextPlacement {
            font: if bold { BOLD_FONT } else { REGULAR_FONT },
            font_size: setup.font_size,
            x: x * MM_TO_PT,
            y: (setup.height - baseline) * MM_TO_PT,
            word_spacing,
        };
        let ops = text_operations(encode_win_ansi(text), &placement);
        self.current.extend(ops);
    }

    /// Place an image at an absolute position on the current page
    ///
    /// The height follows the image's aspect ratio. Identical image data is
    /// embedded once.
    pub fn image(&mut self, data: &[u8], x: f64, y: f64, width: f64) -> Result<()> {
        let mut hasher = DefaultHasher::new();
        data.hash(&mut hasher);
        let key = hasher.finish();

        let index = match self.image_index.get(&key) {
            Some(index) => *index,
            None => {
                let xobject = ImageXObject::from_bytes(data)?;
                self.images.push(xobject);
                let index = self.images.len() - 1;
                self.image_index.insert(key, index);
                index
            }
        };

        let height = self.images[index].height_for_width(width);
        let bottom = self.setup.height - y - height;

        self.current.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    real(width * MM_TO_PT),
                    real(0.0),
                    real(0.0),
                    real(height * MM_TO_PT),
                    real(x * MM_TO_PT),
                    real(bottom * MM_TO_PT),
                ],
            ),
            Operation::new("Do", vec![Object::Name(image_name(index).into_bytes())]),
            Operation::new("Q", vec![]),
        ]);

        Ok(())
    }

    /// Assemble the page tree and serialize the document
    pub fn to_bytes(mut self) -> Result<Vec<u8>> {
        self.pages.push(std::mem::take(&mut self.current));

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(standard_font("Helvetica"));
        let bold_id = doc.add_object(standard_font("Helvetica-Bold"));

        let mut xobjects = Dictionary::new();
        for (index, image) in self.images.iter().enumerate() {
            let image_id = doc.add_object(image.to_pdf_stream());
            xobjects.set(image_name(index), image_id);
        }

        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                REGULAR_FONT => regular_id,
                BOLD_FONT => bold_id,
            },
            "XObject" => xobjects,
        });

        let mut kids = Vec::with_capacity(self.pages.len());
        for operations in self.pages {
            let page_id = add_page(&mut doc, pages_id, operations)?;
            kids.push(Object::Reference(page_id));
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
            "Resources" => resources_id,
            "MediaBox" => vec![
                real(0.0),
                real(0.0),
                real(self.setup.width * MM_TO_PT),
                real(self.setup.height * MM_TO_PT),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;

        Ok(buffer)
    }
}

fn image_name(index: usize) -> String {
    format!("Im{}", index + 1)
}

fn standard_font(base_font: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn add_page(doc: &mut Document, parent: ObjectId, operations: Vec<Operation>) -> Result<ObjectId> {
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => parent,
        "Contents" => content_id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shown_text(doc: &LetterDocument) -> Vec<Vec<u8>> {
        doc.current
            .iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| op.operands[0].as_str().ok().map(|s| s.to_vec()))
            .collect()
    }

    fn td_positions(doc: &LetterDocument) -> Vec<(f64, f64)> {
        doc.current
            .iter()
            .filter(|op| op.operator == "Td")
            .map(|op| {
                (
                    op.operands[0].as_float().unwrap() as f64,
                    op.operands[1].as_float().unwrap() as f64,
                )
            })
            .collect()
    }

    #[test]
    fn test_page_setup_defaults() {
        let setup = PageSetup::default();
        assert_eq!(setup.content_width(), 190.0);
        assert_eq!(setup.font_size, 10.0);

        let custom: PageSetup = serde_json::from_str(r#"{ "marginLeft": 20.0 }"#).unwrap();
        assert_eq!(custom.margin_left, 20.0);
        assert_eq!(custom.height, 297.0);
    }

    #[test]
    fn test_text_line_advances_cursor() {
        let mut doc = LetterDocument::new(PageSetup::default());
        doc.text_line("Dear Sir,", false, Align::Left, 10.0);
        assert_eq!(doc.cursor_y(), 20.0);
        assert_eq!(shown_text(&doc), vec![b"Dear Sir,".to_vec()]);

        // baseline = 10 + 5 + 0.3 * 10pt in mm
        let (x, y) = td_positions(&doc)[0];
        let expected_y = (297.0 - (15.0 + 0.3 * 10.0 / MM_TO_PT)) * MM_TO_PT;
        assert!((x - 11.0 * MM_TO_PT).abs() < 0.01);
        assert!((y - expected_y).abs() < 0.01);
    }

    #[test]
    fn test_empty_text_only_advances() {
        let mut doc = LetterDocument::new(PageSetup::default());
        doc.text_line("", true, Align::Left, 5.0);
        assert!(doc.current.is_empty());
        assert_eq!(doc.cursor_y(), 15.0);
    }

    #[test]
    fn test_split_line_right_aligned() {
        let mut doc = LetterDocument::new(PageSetup::default());
        doc.split_line("Kindly Att.", "Date: 14/08/2024", false, 10.0);

        let positions = td_positions(&doc);
        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0].1, positions[1].1);

        let right_width = text_width("Date: 14/08/2024", false, 10.0);
        let right_edge = positions[1].0 + right_width;
        assert!((right_edge - 199.0 * MM_TO_PT).abs() < 0.01);
    }

    #[test]
    fn test_justified_stretches_all_but_last_line() {
        let mut doc = LetterDocument::new(PageSetup::default());
        let text = "word ".repeat(80);
        doc.text_line(text.trim(), false, Align::Justify, 10.0);

        let spacings: Vec<f64> = doc
            .current
            .iter()
            .filter(|op| op.operator == "Tw")
            .map(|op| op.operands[0].as_float().unwrap() as f64)
            .collect();
        let lines = shown_text(&doc).len();
        assert!(lines > 1);
        // one Tw per line plus a reset after each stretched line
        assert_eq!(spacings.len(), lines + (lines - 1));
        assert!(spacings[0] > 0.0);
        assert_eq!(*spacings.last().unwrap(), 0.0);
        assert_eq!(doc.cursor_y(), 10.0 + 10.0 * lines as f64);
    }

    #[test]
    fn test_page_break_at_bottom_margin() {
        let mut doc = LetterDocument::new(PageSetup::default());
        // 10mm top margin, break trigger at 277mm: 26 lines fit
        for i in 0..27 {
            doc.text_line(&format!("line {i}"), false, Align::Left, 10.0);
        }
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.pages[0].iter().filter(|op| op.operator == "Tj").count(), 26);
        assert_eq!(doc.cursor_y(), 20.0);
    }

    #[test]
    fn test_advance_never_breaks() {
        let mut doc = LetterDocument::new(PageSetup::default());
        doc.advance(400.0);
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn test_to_bytes_is_pdf() {
        let mut doc = LetterDocument::new(PageSetup::default());
        doc.text_line("Hello", true, Align::Left, 10.0);
        let bytes = doc.to_bytes().unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let loaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(loaded.get_pages().len(), 1);
    }

    #[test]
    fn test_invalid_image_is_error() {
        let mut doc = LetterDocument::new(PageSetup::default());
        let err = doc.image(b"not an image at all", 0.0, 0.0, 210.0).unwrap_err();
        assert!(matches!(err, PdfError::ImageError(_)));
    }
}
