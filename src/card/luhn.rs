//! Luhn mod-10 checksum
//!
//! The validator and the check digit calculator share [`weighted_sum`], so the
//! doubling parity is defined in exactly one place.

use crate::utils::errors::CardError;

/// Shortest digit string accepted as a card number by [`is_luhn_valid`]
pub const MIN_CARD_DIGITS: usize = 13;

/// Sum of the Luhn-weighted digits, walking from the least significant digit.
///
/// With `double_even` set, digits at even indices (0, 2, ...) are doubled; this
/// is the layout of a prefix whose check digit has not been appended yet.
fn weighted_sum<I>(digits_from_right: I, double_even: bool) -> u32
where
    I: Iterator<Item = u8>,
{
    digits_from_right
        .enumerate()
        .map(|(index, digit)| {
            let digit = u32::from(digit);
            if (index % 2 == 0) == double_even {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                digit
            }
        })
        .sum()
}

/// Check a complete digit sequence (check digit included)
pub fn digits_valid(digits: &[u8]) -> bool {
    !digits.is_empty() && weighted_sum(digits.iter().rev().copied(), false) % 10 == 0
}

/// Check digit for a digit sequence that excludes it
pub fn check_digit(prefix: &[u8]) -> u8 {
    let sum = weighted_sum(prefix.iter().rev().copied(), true);
    ((10 - sum % 10) % 10) as u8
}

/// Parse a card number into digits.
///
/// Spaces and hyphens are accepted as group separators; any other non-digit
/// character makes the input unparseable.
pub fn parse_digits(number: &str) -> Option<Vec<u8>> {
    let mut digits = Vec::with_capacity(number.len());
    for c in number.trim().chars() {
        match c {
            ' ' | '-' => continue,
            _ => digits.push(c.to_digit(10)? as u8),
        }
    }
    Some(digits)
}

/// Validate a card number against the Luhn checksum.
///
/// Numbers with fewer than [`MIN_CARD_DIGITS`] digits are rejected.
pub fn is_luhn_valid(number: &str) -> bool {
    match parse_digits(number) {
        Some(digits) if digits.len() >= MIN_CARD_DIGITS => digits_valid(&digits),
        _ => false,
    }
}

/// Compute the digit that makes `prefix` pass the Luhn check once appended
pub fn compute_check_digit(prefix: &str) -> Result<u8, CardError> {
    let digits = parse_digits(prefix)
        .ok_or_else(|| CardError::InvalidNumber(format!("'{}' is not a digit string", prefix.trim())))?;

    if digits.is_empty() {
        return Err(CardError::InvalidNumber("empty prefix".to_string()));
    }

    Ok(check_digit(&digits))
}

/// Render digits back into a string
pub fn digits_to_string(digits: &[u8]) -> String {
    digits.iter().map(|d| char::from(b'0' + d)).collect()
}
