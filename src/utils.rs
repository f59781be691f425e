use url::Url;

/// Prefix shared by every chapter identifier in the archive
pub const IDENTIFIER_PREFIX: &str = "chp-";

/// Build a chapter identifier such as `chp-007`
pub fn chapter_identifier(prefix: &str, number: u32, width: usize) -> String {
    format!("{prefix}{number:0width$}")
}

/// Join a chapter identifier onto the base directory URL
pub fn chapter_url(base: &Url, identifier: &str) -> Result<Url, url::ParseError> {
    base.join(identifier)
}

/// Human-readable chapter number: `chp-007` -> `7`
pub fn chapter_label(identifier: &str, prefix: &str) -> String {
    let digits = identifier.strip_prefix(prefix).unwrap_or(identifier);
    let label = digits.trim_start_matches('0');

    if label.is_empty() && !digits.is_empty() {
        // all zeros
        return "0".to_string();
    }
    label.to_string()
}
