//! Card extrapolation
//!
//! Derives a wildcard BIN pattern from one or more sample cards of the same
//! issuer and generates unique numbers from it.

use std::collections::HashSet;

use chrono::{Datelike, Utc};
use rand::Rng;
use tracing::debug;

use super::bin::{BinPattern, CardNetwork};
use super::generator::{CardGenerator, CardSpec, GeneratedCard};
use super::luhn;
use crate::utils::errors::CardError;

/// Digits kept from a single sample when no other sample narrows the pattern
pub const DEFAULT_KEEP_DIGITS: usize = 12;

/// Build the wildcard pattern shared by `samples`.
///
/// A single sample keeps its first `keep_digits` digits. Several samples keep
/// the positions on which they all agree and wildcard the rest; they must
/// share the leading digits that select the network.
pub fn build_pattern(samples: &[&str], keep_digits: usize) -> Result<BinPattern, CardError> {
    let parsed = samples
        .iter()
        .map(|sample| {
            luhn::parse_digits(sample)
                .filter(|digits| digits.len() >= luhn::MIN_CARD_DIGITS)
                .ok_or_else(|| CardError::InvalidNumber(format!("'{}' is not a card number", sample.trim())))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let first = parsed
        .first()
        .ok_or_else(|| CardError::InvalidNumber("no sample cards provided".to_string()))?;

    let network = CardNetwork::from_bin(&luhn::digits_to_string(first));
    let body_length = network.total_length() - 1;

    let pattern: String = if parsed.len() == 1 {
        let keep = keep_digits.clamp(BinPattern::MIN_LENGTH, body_length).min(first.len());
        luhn::digits_to_string(&first[..keep])
    } else {
        if parsed
            .iter()
            .any(|digits| CardNetwork::from_bin(&luhn::digits_to_string(digits)) != network)
        {
            return Err(CardError::InvalidNumber(
                "sample cards belong to different networks".to_string(),
            ));
        }

        if parsed.iter().any(|digits| digits[..2] != first[..2]) {
            return Err(CardError::InvalidNumber(
                "sample cards must share their first two digits".to_string(),
            ));
        }

        let shortest = parsed.iter().map(Vec::len).min().unwrap_or(0);
        (0..shortest.min(body_length))
            .map(|index| {
                let digit = first[index];
                if parsed.iter().all(|digits| digits[index] == digit) {
                    char::from(b'0' + digit)
                } else {
                    'x'
                }
            })
            .collect()
    };

    let pattern = BinPattern::parse(&pattern)?;
    if pattern.network() != network {
        return Err(CardError::GenerationFailed(format!(
            "pattern {} does not match the {} samples",
            pattern,
            network.label()
        )));
    }
    Ok(pattern)
}

/// Extrapolated cards together with the pattern they were drawn from
#[derive(Debug, Clone)]
pub struct Extrapolation {
    pub pattern: BinPattern,
    pub cards: Vec<GeneratedCard>,
}

/// Generates unique cards from sample numbers
#[derive(Debug, Clone)]
pub struct Extrapolator {
    generator: CardGenerator,
    keep_digits: usize,
}

impl Extrapolator {
    pub fn new(generator: CardGenerator, keep_digits: usize) -> Self {
        Self {
            generator,
            keep_digits,
        }
    }

    pub fn extrapolate(&self, samples: &[&str], count: usize) -> Result<Extrapolation, CardError> {
        self.extrapolate_with(&mut rand::thread_rng(), samples, count, Utc::now().year())
    }

    pub fn extrapolate_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        samples: &[&str],
        count: usize,
        current_year: i32,
    ) -> Result<Extrapolation, CardError> {
        self.generator.check_count(count)?;

        let pattern = build_pattern(samples, self.keep_digits)?;
        let available = pattern.combinations();
        if count as u64 > available {
            return Err(CardError::ExhaustedPattern {
                requested: count,
                available,
            });
        }

        debug!(pattern = %pattern, free_digits = pattern.free_digits(), count = count, "Extrapolating cards");

        let spec = CardSpec::from_pattern(pattern.clone(), current_year);
        let max_attempts = count.saturating_mul(50).saturating_add(100);
        let mut seen = HashSet::with_capacity(count);
        let mut cards = Vec::with_capacity(count);

        for _ in 0..max_attempts {
            if cards.len() == count {
                break;
            }
            let card = self.generator.generate_one(rng, &spec)?;
            if seen.insert(card.number.clone()) {
                cards.push(card);
            }
        }

        if cards.len() < count {
            return Err(CardError::ExhaustedPattern {
                requested: count,
                available: cards.len() as u64,
            });
        }

        Ok(Extrapolation { pattern, cards })
    }
}

impl Default for Extrapolator {
    fn default() -> Self {
        Self::new(CardGenerator::default(), DEFAULT_KEEP_DIGITS)
    }
}

/// Extrapolate `count` unique cards from `samples` with default settings
pub fn extrapolate(samples: &[&str], count: usize) -> Result<Vec<GeneratedCard>, CardError> {
    Ok(Extrapolator::default().extrapolate(samples, count)?.cards)
}
