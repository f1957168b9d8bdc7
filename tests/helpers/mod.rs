//! Test helpers module
//!
//! Mock Telegram API server and a ready-to-use application context.

#![allow(dead_code)]

pub mod telegram_mock;
pub mod test_context;

pub use telegram_mock::*;
pub use test_context::*;
