//! # Zone Resolution
//!
//! Classifies a delivery postal code into a [`Zone`].
//!
//! Classification is total: every syntactically valid code resolves to
//! exactly one zone. Indian PINs are six digits; the Kerala circle owns the
//! 670-695 prefix band. Anything that is well-formed but not a PIN is
//! treated as international. Malformed input is rejected up front so a
//! caller never charges against an undeliverable address.

use crate::error::{CoreError, CoreResult};
use crate::types::Zone;

/// Digits of an Indian PIN code.
const PIN_LENGTH: usize = 6;

/// Inclusive prefix band (first three digits) of Kerala PIN codes.
const KERALA_PREFIX_RANGE: std::ops::RangeInclusive<u32> = 670..=695;

/// Resolves a postal code to its delivery zone.
///
/// ## Rules
/// - Six ASCII digits: domestic. Prefix 670-695 is Kerala; everything else
///   (including the unused 0xxxxx band) defaults to rest-of-India.
/// - 3-10 characters, alphanumeric with optional spaces/hyphens, containing
///   at least one letter: international (UK, Canada, NL style codes).
/// - All-digit runs of 4, 5, or 7-9 digits: international (US ZIP and
///   friends).
/// - Anything else: [`CoreError::InvalidPostalCode`].
///
/// ## Example
/// ```rust
/// use monsoon_core::types::Zone;
/// use monsoon_core::zone::classify_postal_code;
///
/// assert_eq!(classify_postal_code("682001").unwrap(), Zone::Kerala);
/// assert_eq!(classify_postal_code("560034").unwrap(), Zone::RestOfIndia);
/// assert_eq!(classify_postal_code("SW1A 1AA").unwrap(), Zone::International);
/// assert!(classify_postal_code("12").is_err());
/// ```
pub fn classify_postal_code(code: &str) -> CoreResult<Zone> {
    let trimmed = code.trim();

    if trimmed.is_empty() {
        return Err(invalid(code, "postal code is empty"));
    }

    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '-')
    {
        return Err(invalid(code, "contains characters that are not letters, digits, spaces, or hyphens"));
    }

    // Separators are presentation only; classify on the compact form.
    let compact: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();

    if compact.len() == PIN_LENGTH && compact.chars().all(|c| c.is_ascii_digit()) {
        return Ok(classify_pin(&compact));
    }

    if looks_international(&compact) {
        return Ok(Zone::International);
    }

    Err(invalid(
        code,
        "not a six-digit PIN code or a recognizable international postal code",
    ))
}

/// Classifies a compact six-digit PIN string.
fn classify_pin(pin: &str) -> Zone {
    // The slice is six ASCII digits, so the prefix always parses.
    let prefix: u32 = pin[..3].parse().unwrap_or(0);
    if KERALA_PREFIX_RANGE.contains(&prefix) {
        Zone::Kerala
    } else {
        Zone::RestOfIndia
    }
}

/// Whether a compact alphanumeric string reads as a foreign postal code.
fn looks_international(compact: &str) -> bool {
    if !(3..=10).contains(&compact.len()) {
        return false;
    }

    if compact.chars().any(|c| c.is_ascii_alphabetic()) {
        return true;
    }

    // All digits at this point; a six-digit run was already handled as a PIN.
    matches!(compact.len(), 4 | 5 | 7..=9)
}

fn invalid(code: &str, reason: &str) -> CoreError {
    CoreError::InvalidPostalCode {
        code: code.to_string(),
        reason: reason.to_string(),
    }
}
