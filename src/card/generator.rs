//! Card number generation
//!
//! A [`CardSpec`] is validated once per request and then fed to a
//! [`CardGenerator`], which fills the BIN pattern, appends the Luhn check digit
//! and re-validates the result before emitting it.

use chrono::{Datelike, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::bin::{BinPattern, CardNetwork};
use super::luhn;
use crate::utils::errors::CardError;

/// Attempts per card before generation is considered broken
const MAX_ATTEMPTS: usize = 16;

/// A generated card, rendered as `number|MM|YYYY|CVV`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedCard {
    pub number: String,
    pub month: String,
    pub year: String,
    pub cvv: String,
}

impl std::fmt::Display for GeneratedCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}|{}|{}", self.number, self.month, self.year, self.cvv)
    }
}

/// Validated generation parameters for one BIN
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSpec {
    pub pattern: BinPattern,
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub cvv: Option<String>,
    /// Lower bound for generated and fixed expiry years
    pub current_year: i32,
}

impl CardSpec {
    /// Build a spec, validating the optional fixed month, year and CVV
    pub fn new(
        bin: &str,
        month: Option<&str>,
        year: Option<&str>,
        cvv: Option<&str>,
    ) -> Result<Self, CardError> {
        Self::with_current_year(bin, month, year, cvv, Utc::now().year())
    }

    pub fn with_current_year(
        bin: &str,
        month: Option<&str>,
        year: Option<&str>,
        cvv: Option<&str>,
        current_year: i32,
    ) -> Result<Self, CardError> {
        let pattern = BinPattern::parse(bin)?;
        let network = pattern.network();

        Ok(Self {
            month: month.map(parse_month).transpose()?,
            year: year.map(|y| parse_year(y, current_year)).transpose()?,
            cvv: cvv.map(|c| parse_cvv(c, network)).transpose()?,
            pattern,
            current_year,
        })
    }

    /// Spec with every field random
    pub fn from_pattern(pattern: BinPattern, current_year: i32) -> Self {
        Self {
            pattern,
            month: None,
            year: None,
            cvv: None,
            current_year,
        }
    }

    pub fn network(&self) -> CardNetwork {
        self.pattern.network()
    }

    pub fn total_length(&self) -> usize {
        self.network().total_length()
    }

    pub fn cvv_length(&self) -> usize {
        self.network().cvv_length()
    }
}

fn parse_month(value: &str) -> Result<u32, CardError> {
    let value = value.trim();
    if value.is_empty() || value.len() > 2 || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(CardError::InvalidMonth(value.to_string()));
    }

    match value.parse::<u32>() {
        Ok(month) if (1..=12).contains(&month) => Ok(month),
        _ => Err(CardError::InvalidMonth(value.to_string())),
    }
}

/// Two-digit years are read as `20YY`
fn parse_year(value: &str, current_year: i32) -> Result<i32, CardError> {
    let value = value.trim();
    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(CardError::InvalidYear(value.to_string()));
    }

    let year = match value.len() {
        2 => 2000 + value.parse::<i32>().map_err(|_| CardError::InvalidYear(value.to_string()))?,
        4 => value.parse::<i32>().map_err(|_| CardError::InvalidYear(value.to_string()))?,
        _ => return Err(CardError::InvalidYear(value.to_string())),
    };

    if year < current_year {
        return Err(CardError::ExpiredYear {
            year,
            current: current_year,
        });
    }

    Ok(year)
}

fn parse_cvv(value: &str, network: CardNetwork) -> Result<String, CardError> {
    let value = value.trim();
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(CardError::InvalidCvv(value.to_string()));
    }

    if value.len() != network.cvv_length() {
        return Err(CardError::CvvLengthMismatch {
            expected: network.cvv_length(),
            actual: value.len(),
        });
    }

    Ok(value.to_string())
}

/// Policy bounds supplied by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationLimits {
    /// Largest number of cards per request
    pub max_count: usize,
    /// Random expiry years fall within `current..=current + year_span`
    pub year_span: i32,
}

impl Default for GenerationLimits {
    fn default() -> Self {
        Self {
            max_count: 1000,
            year_span: 5,
        }
    }
}

/// Card generator bound to a set of limits
#[derive(Debug, Clone, Default)]
pub struct CardGenerator {
    limits: GenerationLimits,
}

impl CardGenerator {
    pub fn new(limits: GenerationLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> GenerationLimits {
        self.limits
    }

    /// Reject counts outside `1..=max_count`
    pub fn check_count(&self, count: usize) -> Result<(), CardError> {
        if count == 0 || count > self.limits.max_count {
            return Err(CardError::InvalidCount {
                requested: count,
                max: self.limits.max_count,
            });
        }
        Ok(())
    }

    /// Generate `count` cards using the thread-local RNG
    pub fn generate(&self, spec: &CardSpec, count: usize) -> Result<Vec<GeneratedCard>, CardError> {
        self.generate_with(&mut rand::thread_rng(), spec, count)
    }

    pub fn generate_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        spec: &CardSpec,
        count: usize,
    ) -> Result<Vec<GeneratedCard>, CardError> {
        self.check_count(count)?;
        (0..count).map(|_| self.generate_one(rng, spec)).collect()
    }

    /// Generate a single card without applying the count limit
    pub fn generate_one<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        spec: &CardSpec,
    ) -> Result<GeneratedCard, CardError> {
        let number = generate_number(rng, &spec.pattern)?;

        let month = spec.month.unwrap_or_else(|| rng.gen_range(1..=12));
        let year = spec.year.unwrap_or_else(|| {
            rng.gen_range(spec.current_year..=spec.current_year + self.limits.year_span.max(0))
        });
        let cvv = match &spec.cvv {
            Some(cvv) => cvv.clone(),
            None => (0..spec.cvv_length())
                .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
                .collect(),
        };

        Ok(GeneratedCard {
            number,
            month: format!("{:02}", month),
            year: year.to_string(),
            cvv,
        })
    }
}

/// Fill a pattern, append the check digit and verify the result
pub fn generate_number<R: Rng + ?Sized>(rng: &mut R, pattern: &BinPattern) -> Result<String, CardError> {
    for attempt in 1..=MAX_ATTEMPTS {
        let mut digits = pattern.fill(rng);
        digits.push(luhn::check_digit(&digits));

        if digits.len() == pattern.network().total_length() && luhn::digits_valid(&digits) {
            return Ok(luhn::digits_to_string(&digits));
        }

        warn!(bin = %pattern, attempt = attempt, "Generated number failed Luhn re-check");
    }

    Err(CardError::GenerationFailed(format!(
        "no valid number for BIN {} after {} attempts",
        pattern, MAX_ATTEMPTS
    )))
}

/// Generate cards for a BIN with optional fixed month, year and CVV
pub fn generate_cards(
    bin: &str,
    count: usize,
    month: Option<&str>,
    year: Option<&str>,
    cvv: Option<&str>,
) -> Result<Vec<GeneratedCard>, CardError> {
    let spec = CardSpec::new(bin, month, year, cvv)?;
    CardGenerator::default().generate(&spec, count)
}
