//! Output filename derivation

/// Material suffix used when the lookup code is not in the prefill table
pub const UNKNOWN_MATERIAL: &str = "UNK";

/// Suffix used when the purchase-order id is too short
pub const SHORT_PO_SUFFIX: &str = "000";

/// Number of trailing purchase-order characters kept in the filename
pub const PO_SUFFIX_LEN: usize = 3;

/// Characters that cannot appear in a file name on common filesystems
const ILLEGAL_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Remove path-illegal characters (and control characters) from a filename part
pub fn sanitize_component(value: &str) -> String {
    value
        .chars()
        .filter(|c| !ILLEGAL_CHARS.contains(c) && !c.is_control())
        .collect()
}

/// Last three characters of the sanitized purchase-order id, or `"000"`
fn po_suffix(purchase_order_id: &str) -> String {
    let chars: Vec<char> = sanitize_component(purchase_order_id).chars().collect();
    if chars.len() < PO_SUFFIX_LEN {
        return SHORT_PO_SUFFIX.to_string();
    }
    chars[chars.len() - PO_SUFFIX_LEN..].iter().collect()
}

/// Build the download filename for one container's letter
///
/// `"PSS LIPL {material} {last 3 of P.O.} {index} of {total}.pdf"`
///
/// # Examples
/// ```
/// use letter_core::derive_filename;
/// assert_eq!(
///     derive_filename("MOD", "LIPL2024250169", 2, 5),
///     "PSS LIPL MOD 169 2 of 5.pdf"
/// );
/// ```
pub fn derive_filename(
    material_suffix: &str,
    purchase_order_id: &str,
    container_index: u32,
    container_total: u32,
) -> String {
    let material = sanitize_component(material_suffix);
    let material = if material.trim().is_empty() {
        UNKNOWN_MATERIAL.to_string()
    } else {
        material
    };

    format!(
        "PSS LIPL {} {} {} of {}.pdf",
        material,
        po_suffix(purchase_order_id),
        container_index,
        container_total
    )
}
