//! State management module
//!
//! This module handles the application context and per-chat user sessions

pub mod context;
pub mod session;
pub mod storage;

// Re-export commonly used state components
pub use context::AppContext;
pub use session::{Session, SessionKey};
pub use storage::{StateStorage, StorageStats};
