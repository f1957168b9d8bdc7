//! Utility modules
//!
//! This module contains common utilities used throughout the application,
//! including error handling, logging setup, and reply formatting helpers.

pub mod errors;
pub mod helpers;
pub mod logging;

pub use errors::{CardError, Result, SmartUtilError};
