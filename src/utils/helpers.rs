//! Helper functions and utilities
//!
//! Reply formatting shared by the card command handlers. All text is HTML for
//! `ParseMode::Html`; anything the user typed is escaped.

use html_escape::encode_text;

use crate::card::{CardNetwork, GeneratedCard};

/// Message listing generated cards for one BIN
pub fn format_generation_message(bin: &str, network: CardNetwork, cards: &[GeneratedCard]) -> String {
    let mut text = format!(
        "<b>BIN ⇾</b> <code>{}</code>\n<b>Network ⇾</b> {}\n<b>Amount ⇾</b> {}\n\n",
        encode_text(bin),
        network.label(),
        cards.len()
    );
    for card in cards {
        text.push_str(&format!("<code>{}</code>\n", card));
    }
    text
}

/// Caption for results delivered as a file
pub fn format_file_caption(bin: &str, network: Option<CardNetwork>, count: usize) -> String {
    let mut text = format!("<b>BIN ⇾</b> <code>{}</code>\n", encode_text(bin));
    if let Some(network) = network {
        text.push_str(&format!("<b>Network ⇾</b> {}\n", network.label()));
    }
    text.push_str(&format!("<b>Amount ⇾</b> {}", count));
    text
}

/// One section per BIN for `/mgen`
pub fn format_multi_generation_message(groups: &[(String, Vec<GeneratedCard>)]) -> String {
    groups
        .iter()
        .map(|(bin, cards)| {
            let mut section = format!("<b>BIN ⇾</b> <code>{}</code>\n", encode_text(bin));
            for card in cards {
                section.push_str(&format!("<code>{}</code>\n", card));
            }
            section
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cards as a plain text file, one per line
pub fn render_cards_file(cards: &[GeneratedCard]) -> Vec<u8> {
    let mut body = String::with_capacity(cards.len() * 32);
    for card in cards {
        body.push_str(&card.to_string());
        body.push('\n');
    }
    body.into_bytes()
}

/// Grouped cards as a plain text file
pub fn render_multi_cards_file(groups: &[(String, Vec<GeneratedCard>)]) -> Vec<u8> {
    let mut body = String::new();
    for (bin, cards) in groups {
        body.push_str(&format!("# {}\n", bin));
        for card in cards {
            body.push_str(&card.to_string());
            body.push('\n');
        }
        body.push('\n');
    }
    body.into_bytes()
}

/// File name for delivered results, e.g. `400000_x25.txt`
pub fn cards_file_name(bin: &str, count: usize) -> String {
    format!("{}_x{}.txt", sanitize_filename(bin), count)
}

/// Result of a `/luhn` check
pub fn format_luhn_result(number: &str, valid: bool, network: CardNetwork, expected_check_digit: Option<u8>) -> String {
    let mut text = format!(
        "<b>Number ⇾</b> <code>{}</code>\n<b>Network ⇾</b> {}\n<b>Luhn ⇾</b> {}",
        encode_text(number),
        network.label(),
        if valid { "✅ Valid" } else { "❌ Invalid" }
    );
    if let Some(digit) = expected_check_digit {
        text.push_str(&format!("\n<b>Expected check digit ⇾</b> <code>{}</code>", digit));
    }
    text
}

/// Sanitize filename for safe storage
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
