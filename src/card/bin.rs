//! BIN classification and patterns

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::utils::errors::CardError;

/// Card network class derived from the leading BIN digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardNetwork {
    /// BINs starting with `34` or `37`
    AmericanExpress,
    Standard,
}

impl CardNetwork {
    /// Classify a BIN; wildcards are ignored and malformed input is `Standard`
    pub fn from_bin(bin: &str) -> Self {
        let mut digits = bin.trim().chars().filter(|c| !is_wildcard(*c));
        match (digits.next(), digits.next()) {
            (Some('3'), Some('4' | '7')) => CardNetwork::AmericanExpress,
            _ => CardNetwork::Standard,
        }
    }

    /// Total card number length, check digit included
    pub fn total_length(self) -> usize {
        match self {
            CardNetwork::AmericanExpress => 15,
            CardNetwork::Standard => 16,
        }
    }

    pub fn cvv_length(self) -> usize {
        match self {
            CardNetwork::AmericanExpress => 4,
            CardNetwork::Standard => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CardNetwork::AmericanExpress => "American Express",
            CardNetwork::Standard => "Standard (16 digits)",
        }
    }
}

/// Classify a BIN into `(total_length, cvv_length)`
pub fn classify_bin(bin: &str) -> (usize, usize) {
    let network = CardNetwork::from_bin(bin);
    (network.total_length(), network.cvv_length())
}

/// Leading digits that decide the network
const NETWORK_DIGITS: usize = 2;

pub fn is_wildcard(c: char) -> bool {
    matches!(c, 'x' | 'X')
}

/// A validated BIN: fixed digits and wildcard slots, left-aligned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinPattern {
    raw: String,
    slots: Vec<Option<u8>>,
    network: CardNetwork,
}

impl BinPattern {
    pub const MIN_LENGTH: usize = 6;
    pub const MAX_LENGTH: usize = 16;

    /// Parse and validate a BIN against its network's card length.
    ///
    /// The first two digits decide the network and must be fixed. The pattern
    /// may reach the full card length only if its last slot is a wildcard,
    /// since that position is taken by the check digit.
    pub fn parse(bin: &str) -> Result<Self, CardError> {
        let raw = bin.trim();
        let length = raw.chars().count();

        if !(Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&length) {
            return Err(CardError::InvalidBin(format!(
                "a BIN must be {} to {} characters long, got {}",
                Self::MIN_LENGTH,
                Self::MAX_LENGTH,
                length
            )));
        }

        let slots = raw
            .chars()
            .map(|c| {
                if is_wildcard(c) {
                    Ok(None)
                } else {
                    c.to_digit(10)
                        .map(|d| Some(d as u8))
                        .ok_or_else(|| CardError::InvalidBin(format!("unexpected character '{}'", c)))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        if slots.iter().take(NETWORK_DIGITS).any(Option::is_none) {
            return Err(CardError::InvalidBin(format!(
                "the first {} digits select the card network and cannot be wildcards",
                NETWORK_DIGITS
            )));
        }

        let network = CardNetwork::from_bin(raw);
        let total = network.total_length();

        if slots.len() > total {
            return Err(CardError::BinTooLong {
                length: slots.len(),
                max: total,
            });
        }

        if slots.len() == total && matches!(slots.last(), Some(Some(_))) {
            return Err(CardError::NoRoomForCheckDigit { length: total });
        }

        Ok(Self {
            raw: raw.to_string(),
            slots,
            network,
        })
    }

    /// The BIN as the user typed it
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn network(&self) -> CardNetwork {
        self.network
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of digits chosen at random when filling the pattern
    pub fn free_digits(&self) -> usize {
        let body_length = self.network.total_length() - 1;
        let covered = self.slots.len().min(body_length);
        let wildcards = self.slots[..covered].iter().filter(|s| s.is_none()).count();
        wildcards + (body_length - covered)
    }

    /// How many distinct card numbers the pattern can produce
    pub fn combinations(&self) -> u64 {
        10u64.checked_pow(self.free_digits() as u32).unwrap_or(u64::MAX)
    }

    /// Fill every position except the check digit
    pub fn fill<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<u8> {
        let body_length = self.network.total_length() - 1;
        (0..body_length)
            .map(|index| match self.slots.get(index) {
                Some(Some(digit)) => *digit,
                _ => rng.gen_range(0..10),
            })
            .collect()
    }
}

impl std::fmt::Display for BinPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
