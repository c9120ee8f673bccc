//! Phone number sanitization
//!
//! The dialer wants bare digits with no international prefix marker, the CRM
//! wants the number as entered.

/// Strip a single leading `+` for the dialer API.
///
/// # Examples
///
/// ```
/// use leadrelay_server::phone::sanitize_for_dialer;
///
/// assert_eq!(sanitize_for_dialer("+15551234567"), "15551234567");
/// assert_eq!(sanitize_for_dialer("5551234567"), "5551234567");
/// ```
pub fn sanitize_for_dialer(raw: &str) -> &str {
    raw.strip_prefix('+').unwrap_or(raw)
}

/// Trim surrounding whitespace for the CRM API, keeping any `+`.
pub fn sanitize_for_crm(raw: &str) -> &str {
    raw.trim()
}

/// Whether a field counts as missing for required-field checks.
pub fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(str::is_empty)
}
