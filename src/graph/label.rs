//! Display labels for identifiers.

/// Short display label of an identifier.
///
/// Returns the substring after the last `#` if present, else after the last
/// `/`, else the input unchanged.
pub fn resolve(value: &str) -> &str {
    if let Some(idx) = value.rfind('#') {
        &value[idx + 1..]
    } else if let Some(idx) = value.rfind('/') {
        &value[idx + 1..]
    } else {
        value
    }
}

/// Whether a value should be treated as an IRI rather than a plain literal.
pub fn looks_like_uri(value: &str) -> bool {
    value.starts_with("http")
}
