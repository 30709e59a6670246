//! Letter request, layout instruction and layout configuration types

use crate::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Maximum number of item rows a letter can carry (labels `A` to `F`)
pub const MAX_ITEMS: usize = 6;

/// Salutation written before the recipient's name
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Salutation {
    #[default]
    Sir,
    #[serde(rename = "Ma'am", alias = "Ma’am", alias = "Maam")]
    Madam,
    #[serde(rename = "Mr.", alias = "Mr")]
    Mr,
    #[serde(rename = "Mrs.", alias = "Mrs")]
    Mrs,
}

impl Salutation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Salutation::Sir => "Sir",
            Salutation::Madam => "Ma'am",
            Salutation::Mr => "Mr.",
            Salutation::Mrs => "Mrs.",
        }
    }
}

impl fmt::Display for Salutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Salutation used in the "Dear ..." greeting line
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Greeting {
    #[default]
    Sir,
    #[serde(rename = "Ma'am", alias = "Ma’am", alias = "Maam")]
    Madam,
}

impl Greeting {
    pub fn as_str(&self) -> &'static str {
        match self {
            Greeting::Sir => "Sir",
            Greeting::Madam => "Ma'am",
        }
    }
}

impl fmt::Display for Greeting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An item row as entered by the caller, before labeling
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemEntry {
    /// Alphanumeric item code
    pub code: String,

    /// Weight in metric tons
    #[serde(rename = "weight", alias = "weightMT")]
    pub weight_mt: f64,
}

impl ItemEntry {
    pub fn new(code: impl Into<String>, weight_mt: f64) -> Self {
        Self {
            code: code.into(),
            weight_mt,
        }
    }
}

/// A labeled item row
///
/// Only [`Items`] creates these, so a label always matches the row's position.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    label: char,
    code: String,
    weight_mt: f64,
}

impl LineItem {
    /// Position letter (`A` for the first row)
    pub fn label(&self) -> char {
        self.label
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Weight in metric tons
    pub fn weight_mt(&self) -> f64 {
        self.weight_mt
    }
}

/// Ordered, labeled item rows (1 to [`MAX_ITEMS`] entries)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ItemEntry>", into = "Vec<ItemEntry>")]
pub struct Items(Vec<LineItem>);

impl Items {
    /// Label the entries `A`, `B`, `C`, ... in order
    ///
    /// Fails when there are no entries, more than [`MAX_ITEMS`], or a weight
    /// that is negative, NaN or infinite.
    pub fn new<I>(entries: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = ItemEntry>,
    {
        let entries: Vec<ItemEntry> = entries.into_iter().collect();
        if entries.is_empty() {
            return Err(ValidationError::NoItems);
        }
        if entries.len() > MAX_ITEMS {
            return Err(ValidationError::TooManyItems(entries.len()));
        }
        if let Some((_, label)) = entries
            .iter()
            .zip('A'..)
            .find(|(entry, _)| !(entry.weight_mt.is_finite() && entry.weight_mt >= 0.0))
        {
            return Err(ValidationError::InvalidWeight { label });
        }

        let items = entries
            .into_iter()
            .zip('A'..)
            .map(|(entry, label)| LineItem {
                label,
                code: entry.code,
                weight_mt: entry.weight_mt,
            })
            .collect();

        Ok(Self(items))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no rows (never true for a constructed list)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[LineItem] {
        &self.0
    }
}

impl TryFrom<Vec<ItemEntry>> for Items {
    type Error = ValidationError;

    fn try_from(entries: Vec<ItemEntry>) -> Result<Self, Self::Error> {
        Items::new(entries)
    }
}

impl From<Items> for Vec<ItemEntry> {
    fn from(items: Items) -> Self {
        items
            .0
            .into_iter()
            .map(|item| ItemEntry {
                code: item.code,
                weight_mt: item.weight_mt,
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a Items {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn default_container() -> u32 {
    1
}

/// Input to one letter composition
///
/// The six recipient/body fields are optional: `None` means "not set by the
/// caller" and is filled from the prefill table, while `Some` (even an empty
/// string) is an explicit value that always wins over the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LetterRequest {
    /// Letter date
    pub date: NaiveDate,

    /// Salutation before the recipient's name
    #[serde(default)]
    pub salutation1: Salutation,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_state: Option<String>,

    /// Salutation for the greeting line
    #[serde(default)]
    pub salutation2: Greeting,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_order_id: Option<String>,

    /// Free-text body line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_line: Option<String>,

    /// Item rows
    pub items: Items,

    /// Prefill table key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookup_code: Option<String>,

    /// 1-based number of this container
    #[serde(default = "default_container")]
    pub container_index: u32,

    /// Number of containers in the shipment
    #[serde(default = "default_container")]
    pub container_total: u32,
}

impl LetterRequest {
    /// Create a request for container 1 of 1 with every prefillable field unset
    pub fn new(date: NaiveDate, items: Items) -> Self {
        Self {
            date,
            salutation1: Salutation::default(),
            full_name: None,
            designation: None,
            company_name: None,
            city_state: None,
            salutation2: Greeting::default(),
            purchase_order_id: None,
            message_line: None,
            items,
            lookup_code: None,
            container_index: 1,
            container_total: 1,
        }
    }

    pub fn with_lookup_code(mut self, code: impl Into<String>) -> Self {
        self.lookup_code = Some(code.into());
        self
    }

    pub fn with_salutations(mut self, salutation1: Salutation, salutation2: Greeting) -> Self {
        self.salutation1 = salutation1;
        self.salutation2 = salutation2;
        self
    }

    pub fn with_full_name(mut self, value: impl Into<String>) -> Self {
        self.full_name = Some(value.into());
        self
    }

    pub fn with_designation(mut self, value: impl Into<String>) -> Self {
        self.designation = Some(value.into());
        self
    }

    pub fn with_company_name(mut self, value: impl Into<String>) -> Self {
        self.company_name = Some(value.into());
        self
    }

    pub fn with_city_state(mut self, value: impl Into<String>) -> Self {
        self.city_state = Some(value.into());
        self
    }

    pub fn with_purchase_order_id(mut self, value: impl Into<String>) -> Self {
        self.purchase_order_id = Some(value.into());
        self
    }

    pub fn with_message_line(mut self, value: impl Into<String>) -> Self {
        self.message_line = Some(value.into());
        self
    }

    pub fn with_container(mut self, index: u32, total: u32) -> Self {
        self.container_index = index;
        self.container_total = total;
        self
    }

    /// Check the container numbers (items are checked when `Items` is built)
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_containers(self.container_index, self.container_total)
    }
}

/// Check that `index` of `total` names a real container
pub fn validate_containers(index: u32, total: u32) -> Result<(), ValidationError> {
    if index == 0 || total == 0 {
        return Err(ValidationError::ZeroContainer { index, total });
    }
    if index > total {
        return Err(ValidationError::ContainerOutOfRange { index, total });
    }
    Ok(())
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Right,
    /// Wrapped to the content width, word spacing stretched on all but the last line
    Justify,
}

/// Abstract drawing directive, consumed in order from the top of the page
///
/// All magnitudes are millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LayoutInstruction {
    /// A line of text occupying `height`
    #[serde(rename_all = "camelCase")]
    TextLine {
        text: String,
        bold: bool,
        align: Align,
        height: f64,
    },

    /// Left- and right-aligned text sharing one line
    #[serde(rename_all = "camelCase")]
    SplitLine {
        left: String,
        right: String,
        bold: bool,
        height: f64,
    },

    /// Empty vertical space
    VerticalGap { amount: f64 },

    /// Image placed at an absolute position, height following its aspect ratio
    Image {
        path: PathBuf,
        x: f64,
        y: f64,
        width: f64,
    },
}

impl LayoutInstruction {
    /// Text drawn by this instruction (both halves joined for split lines)
    pub fn text(&self) -> Option<String> {
        match self {
            LayoutInstruction::TextLine { text, .. } => Some(text.clone()),
            LayoutInstruction::SplitLine { left, right, .. } => Some(format!("{left} {right}")),
            LayoutInstruction::VerticalGap { .. } | LayoutInstruction::Image { .. } => None,
        }
    }

    pub fn is_bold(&self) -> bool {
        match self {
            LayoutInstruction::TextLine { bold, .. } | LayoutInstruction::SplitLine { bold, .. } => {
                *bold
            }
            _ => false,
        }
    }

    /// Vertical space consumed, in millimetres (images float and take none)
    pub fn advance(&self) -> f64 {
        match self {
            LayoutInstruction::TextLine { height, .. }
            | LayoutInstruction::SplitLine { height, .. } => *height,
            LayoutInstruction::VerticalGap { amount } => *amount,
            LayoutInstruction::Image { .. } => 0.0,
        }
    }
}

/// Output of one composition
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedDocument {
    instructions: Vec<LayoutInstruction>,
    output_filename: String,
}

impl ComposedDocument {
    pub(crate) fn new(instructions: Vec<LayoutInstruction>, output_filename: String) -> Self {
        Self {
            instructions,
            output_filename,
        }
    }

    pub fn instructions(&self) -> &[LayoutInstruction] {
        &self.instructions
    }

    pub fn output_filename(&self) -> &str {
        &self.output_filename
    }

    /// Text of every text-bearing instruction, in order
    pub fn text_lines(&self) -> Vec<String> {
        self.instructions
            .iter()
            .filter_map(LayoutInstruction::text)
            .collect()
    }

    pub fn into_parts(self) -> (Vec<LayoutInstruction>, String) {
        (self.instructions, self.output_filename)
    }
}

/// Background letterhead image placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Letterhead {
    /// Image file (JPEG or PNG)
    pub path: PathBuf,

    #[serde(default)]
    pub x: f64,

    #[serde(default)]
    pub y: f64,

    /// Display width; defaults to the full A4 width
    #[serde(default = "default_letterhead_width")]
    pub width: f64,
}

fn default_letterhead_width() -> f64 {
    210.0
}

impl Letterhead {
    /// Letterhead at the top-left corner spanning the full page width
    pub fn full_width(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            x: 0.0,
            y: 0.0,
            width: default_letterhead_width(),
        }
    }
}

/// Spacing constants and formatting options for the letter layout
///
/// Line heights and gaps are millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Space above the header line
    pub top_gap: f64,
    pub header_height: f64,
    pub after_header: f64,

    /// Line height of the bold recipient block
    pub address_line_height: f64,
    pub after_address: f64,

    /// Line height of greeting, message, P.O. and acknowledgement lines
    pub body_line_height: f64,
    pub after_greeting: f64,
    pub after_message: f64,
    pub after_purchase_order: f64,

    pub item_line_height: f64,
    pub after_items: f64,
    pub after_acknowledgement: f64,

    /// Line height of the bold closing block
    pub closing_line_height: f64,
    /// Signature space between "Yours Faithfully," and the signatory line
    pub after_valediction: f64,

    /// strftime pattern for the header date
    pub date_format: String,

    /// Optional background image drawn before any text
    pub letterhead: Option<Letterhead>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            top_gap: 50.0,
            header_height: 10.0,
            after_header: 10.0,
            address_line_height: 5.0,
            after_address: 4.0,
            body_line_height: 10.0,
            after_greeting: 5.0,
            after_message: 5.0,
            after_purchase_order: 5.0,
            item_line_height: 5.0,
            after_items: 10.0,
            after_acknowledgement: 10.0,
            closing_line_height: 10.0,
            after_valediction: 15.0,
            date_format: "%Y-%m-%d".to_string(),
            letterhead: None,
        }
    }
}

impl LayoutConfig {
    /// Parse a layout configuration, filling omitted fields with defaults
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_letterhead(mut self, letterhead: Letterhead) -> Self {
        self.letterhead = Some(letterhead);
        self
    }
}
