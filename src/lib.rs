//! Smart Util Telegram Bot
//!
//! Card number utilities for Telegram: Luhn validation, check digit
//! calculation, card generation from BIN patterns and extrapolation from
//! sample numbers. The [`card`] module holds the algorithms; everything else
//! wires them to the bot.

pub mod card;
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{CardError, Result, SmartUtilError};

// Re-export main components for easy access
pub use card::{
    classify_bin, compute_check_digit, extrapolate, generate_cards, is_luhn_valid, CardNetwork,
    GeneratedCard,
};
pub use state::{AppContext, StateStorage};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
