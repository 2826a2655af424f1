//! Bot module for handling chat interactions
//!
//! This module is split into several submodules:
//! - `message_handler`: Telegram glue, loads and stores per-chat session state
//! - `dispatcher`: Routes parsed commands and resolves card lookups
//! - `ui_builder`: Formats card, list and booster replies

pub mod dispatcher;
pub mod message_handler;
pub mod ui_builder;

// Re-export main handler functions for use in main.rs
pub use message_handler::{message_handler, set_presence};

pub use dispatcher::{CommandDispatcher, LookupOutcome, Reply};
pub use ui_builder::{format_booster, format_card, format_result_page, BoosterEntry};
