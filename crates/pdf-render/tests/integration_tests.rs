//! Integration tests for rendering composed letters

use chrono::NaiveDate;
use letter_core::{
    render_and_deliver, ComposedDocument, DocumentRenderer, Greeting, ItemEntry, Items,
    LayoutConfig, LetterComposer, LetterRequest, Letterhead, MemorySink, PrefillTable, Salutation,
};
use lopdf::{Document, Object};
use pdf_render::PdfRenderer;
use pretty_assertions::assert_eq;

fn request(message: Option<&str>) -> LetterRequest {
    let items = Items::new([ItemEntry::new("RMX10", 4.5), ItemEntry::new("RMX11", 4.0)]).unwrap();
    let request = LetterRequest::new(NaiveDate::from_ymd_opt(2024, 8, 14).unwrap(), items)
        .with_lookup_code("001")
        .with_salutations(Salutation::Mr, Greeting::Sir)
        .with_container(1, 2);
    match message {
        Some(message) => request.with_message_line(message),
        None => request,
    }
}

fn render(document: &ComposedDocument) -> Vec<u8> {
    PdfRenderer::new().render(document.instructions()).unwrap()
}

/// Strings shown with Tj on each page, in order
fn page_texts(bytes: &[u8]) -> Vec<Vec<String>> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .values()
        .map(|page_id| {
            doc.get_and_decode_page_content(*page_id)
                .unwrap()
                .operations
                .iter()
                .filter(|op| op.operator == "Tj")
                .map(|op| String::from_utf8_lossy(op.operands[0].as_str().unwrap()).into_owned())
                .collect()
        })
        .collect()
}

#[test]
fn test_render_letter_to_single_page() {
    let table = PrefillTable::embedded().unwrap();
    let document = LetterComposer::new(&table)
        .compose(&request(None))
        .unwrap();

    let mut sink = MemorySink::new();
    let written = render_and_deliver(&document, &PdfRenderer::new(), &mut sink).unwrap();

    let (filename, bytes) = sink.last().unwrap();
    assert_eq!(filename, "PSS LIPL MOD 169 1 of 2.pdf");
    assert_eq!(written, bytes.len());

    let pages = page_texts(bytes);
    assert_eq!(pages.len(), 1);
    assert_eq!(
        pages[0],
        vec![
            "Kindly Att.",
            "Date: 2024-08-14",
            "Mr. Rakesh Mehta,",
            "(Purchase Manager)",
            "Modern Dairy Foods Ltd,",
            "Karnal, Haryana",
            "Dear Sir,",
            "Sending you Pre-Shipment sample of the following:",
            "P.O. ID: LIPL2024250169",
            "A) RMX10 - 4.50 MT",
            "B) RMX11 - 4.00 MT",
            "Kindly acknowledge receipt of the same.",
            "Yours Faithfully,",
            "Authorised Signatory",
            "Aravally Processed Agrotech Pvt Ltd",
        ]
    );
}

#[test]
fn test_long_message_wraps_and_breaks_page() {
    let table = PrefillTable::embedded().unwrap();
    let message = "Please find enclosed the pre-shipment samples drawn from the lot. ".repeat(60);
    let document = LetterComposer::new(&table)
        .compose(&request(Some(message.trim())))
        .unwrap();

    let bytes = render(&document);
    let pages = page_texts(&bytes);
    assert!(pages.len() >= 2);

    // the closing block lands on the last page
    let last = pages.last().unwrap();
    assert_eq!(last.last().unwrap(), "Aravally Processed Agrotech Pvt Ltd");

    // every word of the message survives wrapping
    let shown: String = pages.concat().join(" ");
    assert_eq!(
        shown.matches("pre-shipment").count(),
        message.matches("pre-shipment").count()
    );
}

#[test]
fn test_missing_letterhead_still_renders() {
    let table = PrefillTable::embedded().unwrap();
    let layout = LayoutConfig::default()
        .with_letterhead(Letterhead::full_width("/nonexistent/letterhead.jpg"));
    let document = LetterComposer::new(&table)
        .with_layout(layout)
        .compose(&request(None))
        .unwrap();

    let bytes = render(&document);
    assert_eq!(page_texts(&bytes)[0].len(), 15);
}

#[test]
fn test_png_letterhead_embedded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("letterhead.png");
    image::RgbImage::from_pixel(42, 6, image::Rgb([0, 90, 160]))
        .save(&path)
        .unwrap();

    let table = PrefillTable::embedded().unwrap();
    let layout = LayoutConfig::default().with_letterhead(Letterhead::full_width(&path));
    let document = LetterComposer::new(&table)
        .with_layout(layout)
        .compose(&request(None))
        .unwrap();
    let bytes = render(&document);

    let doc = Document::load_mem(&bytes).unwrap();
    let images: Vec<_> = doc
        .objects
        .values()
        .filter_map(|object| match object {
            Object::Stream(stream) => Some(stream),
            _ => None,
        })
        .filter(|stream| {
            stream
                .dict
                .get(b"Subtype")
                .and_then(Object::as_name)
                .map(|name| name == b"Image")
                .unwrap_or(false)
        })
        .collect();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].dict.get(b"Width").unwrap().as_i64().unwrap(), 42);

    let page_id = *doc.get_pages().values().next().unwrap();
    let content = doc.get_and_decode_page_content(page_id).unwrap();
    let operators: Vec<&str> = content
        .operations
        .iter()
        .map(|op| op.operator.as_str())
        .collect();
    // the image is drawn before any text
    assert_eq!(&operators[..4], &["q", "cm", "Do", "Q"]);
}
