//! Text value helpers: backslash multiplicity, trailing padding rules.
//!
//! DICOM text values carry multiple components separated by a backslash,
//! and every value is padded to an even byte length: text values with a
//! trailing space, UIDs and binary values with a NUL.

/// The component separator of multi-valued text values.
pub const COMPONENT_SEPARATOR: u8 = b'\\';

/// Strip trailing space padding from a text component.
pub fn trim_trailing_spaces(component: &[u8]) -> &[u8] {
    let mut end = component.len();
    while end > 0 && component[end - 1] == b' ' {
        end -= 1;
    }
    &component[..end]
}

/// Strip trailing NUL padding from a UID component.
pub fn trim_trailing_nulls(component: &[u8]) -> &[u8] {
    let mut end = component.len();
    while end > 0 && component[end - 1] == 0x00 {
        end -= 1;
    }
    &component[..end]
}

/// Split a raw text value into its backslash-separated components.
pub fn split_components(value: &[u8]) -> impl Iterator<Item = &[u8]> {
    value.split(|b| *b == COMPONENT_SEPARATOR)
}

/// Join string components with the backslash separator
/// into a raw byte value, without padding.
pub fn join_components<S: AsRef<str>>(components: &[S]) -> Vec<u8> {
    let mut out = Vec::new();
    for (i, component) in components.iter().enumerate() {
        if i > 0 {
            out.push(COMPONENT_SEPARATOR);
        }
        out.extend_from_slice(component.as_ref().as_bytes());
    }
    out
}

/// Pad a raw value to an even byte length with the given padding byte.
pub fn pad_to_even(value: &mut Vec<u8>, padding: u8) {
    if value.len() % 2 == 1 {
        value.push(padding);
    }
}
