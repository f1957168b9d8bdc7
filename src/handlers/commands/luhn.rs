//! /luhn command handler

use teloxide::prelude::*;

use super::send_html;
use crate::card::{luhn, CardNetwork};
use crate::utils::errors::{CardError, Result};
use crate::utils::helpers::format_luhn_result;

pub const USAGE: &str = "<b>Usage:</b> <code>/luhn CARD_NUMBER</code>\n\
    <b>Example:</b> <code>/luhn 4539148803436467</code>";

/// Check a number and build the reply text
pub fn check_number(number: &str) -> std::result::Result<String, CardError> {
    let number = number.split(['|', '/', ':']).next().unwrap_or_default().trim();
    let digits = luhn::parse_digits(number)
        .ok_or_else(|| CardError::InvalidNumber("only digits, spaces and hyphens are allowed".to_string()))?;

    if digits.len() < luhn::MIN_CARD_DIGITS {
        return Err(CardError::InvalidNumber(format!(
            "expected at least {} digits, got {}",
            luhn::MIN_CARD_DIGITS,
            digits.len()
        )));
    }

    let valid = luhn::digits_valid(&digits);
    let expected = (!valid).then(|| luhn::check_digit(&digits[..digits.len() - 1]));
    let network = CardNetwork::from_bin(&luhn::digits_to_string(&digits));

    Ok(format_luhn_result(&luhn::digits_to_string(&digits), valid, network, expected))
}

/// Handle /luhn command
pub async fn handle_luhn(bot: Bot, chat_id: ChatId, args: String) -> Result<()> {
    if args.trim().is_empty() {
        return send_html(&bot, chat_id, USAGE).await;
    }

    let text = check_number(&args)?;
    send_html(&bot, chat_id, text).await
}
