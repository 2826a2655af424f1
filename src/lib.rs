//! # Card Bot
//!
//! A Telegram bot that answers Magic: The Gathering card lookups, advanced
//! searches and booster openings, with per-chat result lists that can be
//! paged through and picked from by number.

pub mod bot;
pub mod catalog;
pub mod circuit_breaker;
pub mod command;
pub mod config;
pub mod errors;
pub mod http;
pub mod localization;
pub mod pricing;
pub mod scrape;
pub mod search_query;
pub mod session;
