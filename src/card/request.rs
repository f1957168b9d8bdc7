//! Command argument parsing for the card commands
//!
//! `/gen` takes `BIN[|MM[|YY[|CVV]]] [AMOUNT]`; `|`, `/` and `:` all separate
//! the template fields, and `x`, `xx`, `xxx`, `rnd` or an empty field mean
//! "random".

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::generator::CardSpec;
use crate::utils::errors::CardError;

/// Amount tokens are at most this many digits; anything longer is a BIN
const MAX_AMOUNT_DIGITS: usize = 5;

fn field_separator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[|/:]").expect("field separator regex is valid"))
}

fn amount_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{1,5}$").expect("amount regex is valid"))
}

fn is_random_marker(field: &str) -> bool {
    let field = field.trim();
    field.is_empty()
        || field.eq_ignore_ascii_case("rnd")
        || field.chars().all(|c| matches!(c, 'x' | 'X'))
}

fn parse_amount(token: &str) -> Result<usize, CardError> {
    token
        .parse::<usize>()
        .map_err(|_| CardError::InvalidAmount(token.to_string()))
}

/// Split trailing amount off a token list if present
fn split_amount<'a>(tokens: &'a [&'a str]) -> Result<(&'a [&'a str], Option<usize>), CardError> {
    match tokens.split_last() {
        Some((last, rest)) if !rest.is_empty() && amount_token().is_match(last) => {
            Ok((rest, Some(parse_amount(last)?)))
        }
        _ => Ok((tokens, None)),
    }
}

/// A single `/gen` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenRequest {
    pub bin: String,
    pub month: Option<String>,
    pub year: Option<String>,
    pub cvv: Option<String>,
    pub amount: usize,
}

impl GenRequest {
    pub fn parse(args: &str, default_amount: usize) -> Result<Self, CardError> {
        let tokens: Vec<&str> = args.split_whitespace().collect();
        match tokens.as_slice() {
            [] => Err(CardError::InvalidBin("no BIN provided".to_string())),
            [template] => Self::from_template(template, default_amount),
            [template, amount] => {
                if amount.len() > MAX_AMOUNT_DIGITS {
                    return Err(CardError::InvalidAmount(amount.to_string()));
                }
                Self::from_template(template, parse_amount(amount)?)
            }
            [_, _, extra, ..] => Err(CardError::UnexpectedArgument(extra.to_string())),
        }
    }

    /// Parse `BIN[|MM[|YY[|CVV]]]`
    pub fn from_template(template: &str, amount: usize) -> Result<Self, CardError> {
        let fields: Vec<&str> = field_separator().split(template.trim()).collect();
        if fields.len() > 4 {
            return Err(CardError::UnexpectedArgument(fields[4..].join("|")));
        }

        let field = |index: usize| {
            fields
                .get(index)
                .filter(|value| !is_random_marker(value))
                .map(|value| value.trim().to_string())
        };

        Ok(Self {
            bin: fields[0].trim().to_string(),
            month: field(1),
            year: field(2),
            cvv: field(3),
            amount,
        })
    }

    pub fn to_spec(&self) -> Result<CardSpec, CardError> {
        CardSpec::new(
            &self.bin,
            self.month.as_deref(),
            self.year.as_deref(),
            self.cvv.as_deref(),
        )
    }
}

/// A `/mgen` request: several templates sharing one amount
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiGenRequest {
    pub requests: Vec<GenRequest>,
    pub amount: usize,
}

impl MultiGenRequest {
    pub fn parse(args: &str, default_amount: usize) -> Result<Self, CardError> {
        let tokens: Vec<&str> = args
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .collect();

        let (templates, amount) = split_amount(&tokens)?;
        let amount = amount.unwrap_or(default_amount);

        if templates.is_empty() {
            return Err(CardError::InvalidBin("no BIN provided".to_string()));
        }

        let requests = templates
            .iter()
            .map(|template| GenRequest::from_template(template, amount))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { requests, amount })
    }

    pub fn total(&self) -> usize {
        self.requests.len().saturating_mul(self.amount)
    }
}

/// An `/extp` request: sample cards and the number of results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtrapolateRequest {
    pub samples: Vec<String>,
    pub amount: usize,
}

impl ExtrapolateRequest {
    /// Samples may carry expiry and CVV fields; only the number is used
    pub fn parse(args: &str, default_amount: usize) -> Result<Self, CardError> {
        let tokens: Vec<&str> = args.split_whitespace().collect();
        let (samples, amount) = split_amount(&tokens)?;

        if samples.is_empty() {
            return Err(CardError::InvalidNumber("no sample cards provided".to_string()));
        }

        let samples = samples
            .iter()
            .filter_map(|token| field_separator().split(token).next())
            .map(|number| number.trim().to_string())
            .collect();

        Ok(Self {
            samples,
            amount: amount.unwrap_or(default_amount),
        })
    }

    pub fn sample_refs(&self) -> Vec<&str> {
        self.samples.iter().map(String::as_str).collect()
    }
}
