//! Letter composition

use crate::filename::{derive_filename, UNKNOWN_MATERIAL};
use crate::format::{format_date, format_weight};
use crate::prefill::{PrefillEntry, PrefillTable};
use crate::schema::*;
use crate::Result;

/// Left half of the header line
pub const ATTENTION_LABEL: &str = "Kindly Att.";

/// Line printed after the item list
pub const ACKNOWLEDGEMENT: &str = "Kindly acknowledge receipt of the same.";

/// Company name under the signatory line
pub const SENDER_LEGAL_NAME: &str = "Aravally Processed Agrotech Pvt Ltd";

const VALEDICTION: &str = "Yours Faithfully,";
const SIGNATORY: &str = "Authorised Signatory";

/// Request fields after prefill resolution
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedFields {
    pub full_name: String,
    pub designation: String,
    pub company_name: String,
    pub city_state: String,
    pub purchase_order_id: String,
    pub message_line: String,
    pub material_suffix: String,
}

/// Turns letter requests into layout instructions and filenames
///
/// The prefill table is borrowed, so many composers (and threads) can share one.
pub struct LetterComposer<'a> {
    /// Prefill defaults keyed by lookup code
    table: &'a PrefillTable,
    /// Spacing and formatting options
    layout: LayoutConfig,
}

impl<'a> LetterComposer<'a> {
    /// Create a composer with the default layout
    pub fn new(table: &'a PrefillTable) -> Self {
        Self {
            table,
            layout: LayoutConfig::default(),
        }
    }

    /// Replace the layout configuration
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn table(&self) -> &PrefillTable {
        self.table
    }

    fn entry_for(&self, lookup_code: Option<&str>) -> Option<&'a PrefillEntry> {
        lookup_code.and_then(|code| self.table.lookup(code))
    }

    /// Fill unset request fields from the prefill entry for its lookup code
    ///
    /// Explicit caller values win; fields unset on both sides become empty.
    pub fn resolve(&self, request: &LetterRequest) -> ResolvedFields {
        let entry = self.entry_for(request.lookup_code.as_deref());

        match (&request.lookup_code, entry) {
            (Some(code), Some(_)) => log::debug!("Prefilling letter fields from code {code}"),
            (Some(code), None) => log::debug!("Unknown lookup code {code}, no prefill"),
            (None, _) => {}
        }

        ResolvedFields {
            full_name: pick(&request.full_name, entry.map(|e| e.full_name.as_str())),
            designation: pick(&request.designation, entry.map(|e| e.designation.as_str())),
            company_name: pick(&request.company_name, entry.map(|e| e.company_name.as_str())),
            city_state: pick(&request.city_state, entry.map(|e| e.city_state.as_str())),
            purchase_order_id: pick(
                &request.purchase_order_id,
                entry.map(|e| e.purchase_order_id.as_str()),
            ),
            message_line: pick(&request.message_line, entry.map(|e| e.message_line.as_str())),
            material_suffix: entry
                .map(|e| e.material_suffix.clone())
                .unwrap_or_else(|| UNKNOWN_MATERIAL.to_string()),
        }
    }

    /// Derive the output filename, resolving the material suffix from the table
    pub fn derive_filename(
        &self,
        lookup_code: Option<&str>,
        purchase_order_id: &str,
        container_index: u32,
        container_total: u32,
    ) -> String {
        let material = self
            .entry_for(lookup_code)
            .map(|e| e.material_suffix.as_str())
            .unwrap_or(UNKNOWN_MATERIAL);
        derive_filename(material, purchase_order_id, container_index, container_total)
    }

    /// Compose a request into layout instructions and an output filename
    ///
    /// Fails when the container numbers are zero or the index exceeds the
    /// total. Performs no I/O.
    pub fn compose(&self, request: &LetterRequest) -> Result<ComposedDocument> {
        request.validate()?;

        let fields = self.resolve(request);
        let layout = &self.layout;
        let date = format_date(request.date, &layout.date_format)?;

        let mut body = LayoutBuilder::default();

        if let Some(letterhead) = &layout.letterhead {
            body.push(LayoutInstruction::Image {
                path: letterhead.path.clone(),
                x: letterhead.x,
                y: letterhead.y,
                width: letterhead.width,
            });
        }

        // Header
        body.gap(layout.top_gap);
        body.push(LayoutInstruction::SplitLine {
            left: ATTENTION_LABEL.to_string(),
            right: format!("Date: {date}"),
            bold: false,
            height: layout.header_height,
        });
        body.gap(layout.after_header);

        // Recipient block
        let h = layout.address_line_height;
        body.bold(format!("{} {},", request.salutation1, fields.full_name), h);
        body.bold(format!("({})", fields.designation), h);
        body.bold(format!("{},", fields.company_name), h);
        body.bold(fields.city_state.clone(), h);
        body.gap(layout.after_address);

        // Body
        let h = layout.body_line_height;
        body.line(format!("Dear {},", request.salutation2), Align::Left, h);
        body.gap(layout.after_greeting);
        body.line(fields.message_line.clone(), Align::Justify, h);
        body.gap(layout.after_message);
        body.line(
            format!("P.O. ID: {}", fields.purchase_order_id),
            Align::Left,
            h,
        );
        body.gap(layout.after_purchase_order);

        for item in &request.items {
            body.line(
                format!(
                    "{}) {} - {} MT",
                    item.label(),
                    item.code(),
                    format_weight(item.weight_mt())
                ),
                Align::Left,
                layout.item_line_height,
            );
        }
        body.gap(layout.after_items);

        body.line(ACKNOWLEDGEMENT.to_string(), Align::Left, h);
        body.gap(layout.after_acknowledgement);

        // Closing
        let h = layout.closing_line_height;
        body.bold(VALEDICTION.to_string(), h);
        body.gap(layout.after_valediction);
        body.bold(SIGNATORY.to_string(), h);
        body.bold(SENDER_LEGAL_NAME.to_string(), h);

        let filename = derive_filename(
            &fields.material_suffix,
            &fields.purchase_order_id,
            request.container_index,
            request.container_total,
        );

        log::debug!(
            "Composed letter with {} instructions -> {}",
            body.instructions.len(),
            filename
        );

        Ok(ComposedDocument::new(body.instructions, filename))
    }
}

/// Caller value if set, else the table default, else empty
fn pick(explicit: &Option<String>, default: Option<&str>) -> String {
    explicit
        .clone()
        .or_else(|| default.map(str::to_string))
        .unwrap_or_default()
}

/// Accumulates instructions in emission order
#[derive(Default)]
struct LayoutBuilder {
    instructions: Vec<LayoutInstruction>,
}

impl LayoutBuilder {
    fn push(&mut self, instruction: LayoutInstruction) {
        self.instructions.push(instruction);
    }

    fn gap(&mut self, amount: f64) {
        self.push(LayoutInstruction::VerticalGap { amount });
    }

    fn line(&mut self, text: String, align: Align, height: f64) {
        self.push(LayoutInstruction::TextLine {
            text,
            bold: false,
            align,
            height,
        });
    }

    fn bold(&mut self, text: String, height: f64) {
        self.push(LayoutInstruction::TextLine {
            text,
            bold: true,
            align: Align::Left,
            height,
        });
    }
}
