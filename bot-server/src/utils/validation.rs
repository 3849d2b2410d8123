//! Input validation helpers
//!
//! Centralized normalization rules for the intake form: phone numbers,
//! optional-field "none" synonyms, and minimum text lengths.

use crate::utils::AppError;

/// Local country code (Uzbekistan). Phones are canonicalized to
/// `+<COUNTRY_CODE><9 digits>`.
pub const COUNTRY_CODE: &str = "998";

/// Minimum trimmed length for complaint descriptions and resolution texts.
pub const MIN_TEXT_LEN: usize = 3;

/// Synonyms a submitter may type to leave an optional field empty.
const NONE_SYNONYMS: [&str; 3] = ["-", "не указывать", "нет"];

/// Normalize an optional text field: trim, map "none" synonyms to empty.
pub fn normalize_optional(input: &str) -> String {
    let trimmed = input.trim();
    if NONE_SYNONYMS.contains(&trimmed.to_lowercase().as_str()) {
        return String::new();
    }
    trimmed.to_string()
}

/// Normalize a phone number to the canonical `+998XXXXXXXXX` form.
///
/// Accepted inputs:
/// - 9-digit local number (`91 123 4567`)
/// - 12-digit number already carrying the country code (`998911234567`)
/// - already well-formed `+998...`
///
/// Anything else is a validation failure; the intake step re-prompts
/// without advancing.
pub fn normalize_phone(raw: &str) -> Result<String, AppError> {
    let raw = raw.trim();
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    let normalized = if digits.len() == 9 {
        format!("+{COUNTRY_CODE}{digits}")
    } else if digits.len() == 12 && digits.starts_with(COUNTRY_CODE) {
        format!("+{digits}")
    } else {
        return Err(AppError::validation(format!("invalid phone: {raw}")));
    };

    // canonical form check: +998 followed by exactly 9 digits
    debug_assert_eq!(normalized.len(), 13);
    Ok(normalized)
}

/// Validate a free-text field against the minimum trimmed length.
pub fn validate_min_text(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.chars().count() < MIN_TEXT_LEN {
        return Err(AppError::validation(format!(
            "{field} is too short (min {MIN_TEXT_LEN} chars)"
        )));
    }
    Ok(trimmed.to_string())
}
