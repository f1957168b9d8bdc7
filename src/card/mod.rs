//! Card number tools
//!
//! This module contains the Luhn checksum, BIN classification, card generation
//! and extrapolation used by the `/gen`, `/mgen`, `/extp` and `/luhn` commands.
//! Everything here is pure and synchronous; randomness is always injected.

pub mod bin;
pub mod extrapolate;
pub mod generator;
pub mod luhn;
pub mod request;

pub use bin::{classify_bin, BinPattern, CardNetwork};
pub use extrapolate::{extrapolate, Extrapolation, Extrapolator};
pub use generator::{generate_cards, CardGenerator, CardSpec, GeneratedCard, GenerationLimits};
pub use luhn::{compute_check_digit, is_luhn_valid};
pub use request::{ExtrapolateRequest, GenRequest, MultiGenRequest};
