//! # Command Parser Module
//!
//! Classifies a chat message into exactly one [`Command`]. Rules are tried in a
//! fixed priority order and the first match wins:
//!
//! 1. `!test`
//! 2. `!help`
//! 3. `!superhelp`
//! 4. `!play <label>`
//! 5. `[[Card Name]]` anywhere in the message, optionally followed by a set code
//! 6. `!flip`
//! 7. `!search <query>`
//! 8. `!booster <set code>`
//! 9. `!<n>` with one to three digits
//! 10. `!cont`
//!
//! Anything else, including a recognised command with missing arguments, is
//! [`Command::Unrecognized`] and gets no reply.

use lazy_static::lazy_static;
use log::trace;
use regex::Regex;

lazy_static! {
    static ref INDEX_REGEX: Regex =
        Regex::new(r"^!([0-9]{1,3})$").expect("Index pattern should be valid");
}

const CARD_OPEN: &str = "[[";
const CARD_CLOSE: &str = "]]";

/// A parsed chat command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Test,
    Help,
    SuperHelp,
    SetPresence(String),
    CardLookup {
        name: String,
        set_code: Option<String>,
    },
    Flip,
    Search(String),
    Booster(String),
    IndexSelect(usize),
    Continue,
    Unrecognized,
}

impl Command {
    /// Short label used in logs
    pub fn intent(&self) -> &'static str {
        match self {
            Command::Test => "test",
            Command::Help => "help",
            Command::SuperHelp => "superhelp",
            Command::SetPresence(_) => "play",
            Command::CardLookup { .. } => "lookup",
            Command::Flip => "flip",
            Command::Search(_) => "search",
            Command::Booster(_) => "booster",
            Command::IndexSelect(_) => "index",
            Command::Continue => "cont",
            Command::Unrecognized => "unrecognized",
        }
    }
}

/// Parse raw message text into a command
///
/// # Examples
///
/// ```rust
/// use cardbot::command::{parse_command, Command};
///
/// assert_eq!(
///     parse_command("[[Doom Blade]]M10"),
///     Command::CardLookup { name: "Doom Blade".to_string(), set_code: Some("M10".to_string()) }
/// );
/// assert_eq!(parse_command("!17"), Command::IndexSelect(17));
/// assert_eq!(parse_command("hello"), Command::Unrecognized);
/// ```
pub fn parse_command(text: &str) -> Command {
    let command = classify(text);
    trace!("Classified {:?} as {}", text, command.intent());
    command
}

fn classify(text: &str) -> Command {
    if text.starts_with("!test") {
        return Command::Test;
    }
    if text.starts_with("!help") {
        return Command::Help;
    }
    if text.starts_with("!superhelp") {
        return Command::SuperHelp;
    }
    if let Some(label) = text.strip_prefix("!play ") {
        return non_empty(label).map_or(Command::Unrecognized, Command::SetPresence);
    }
    if text.contains(CARD_OPEN) {
        return parse_card_reference(text).unwrap_or(Command::Unrecognized);
    }
    if text.starts_with("!flip") {
        return Command::Flip;
    }
    if let Some(query) = text.strip_prefix("!search ") {
        return non_empty(query).map_or(Command::Unrecognized, Command::Search);
    }
    if let Some(set_code) = text.strip_prefix("!booster ") {
        return non_empty(set_code).map_or(Command::Unrecognized, Command::Booster);
    }
    if let Some(index) = parse_index(text) {
        return Command::IndexSelect(index);
    }
    if text.starts_with("!cont") {
        return Command::Continue;
    }
    Command::Unrecognized
}

fn non_empty(argument: &str) -> Option<String> {
    let trimmed = argument.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_index(text: &str) -> Option<usize> {
    INDEX_REGEX
        .captures(text.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}

/// Extract `name` and optional set code from `... [[name]]SET ...`
///
/// Returns `None` when the brackets are never closed or enclose nothing.
fn parse_card_reference(text: &str) -> Option<Command> {
    let open = text.find(CARD_OPEN)?;
    let after_open = &text[open + CARD_OPEN.len()..];
    let close = after_open.find(CARD_CLOSE)?;

    let name = after_open[..close].trim();
    if name.is_empty() {
        return None;
    }

    let after_close = &after_open[close + CARD_CLOSE.len()..];
    Some(Command::CardLookup {
        name: name.to_string(),
        set_code: parse_set_code(after_close),
    })
}

/// The set code is the token glued to the closing brackets: `[[Doom Blade]]M10`
fn parse_set_code(rest: &str) -> Option<String> {
    let end = [
        rest.find(char::is_whitespace),
        rest.find(CARD_OPEN),
        rest.find(CARD_CLOSE),
    ]
    .into_iter()
    .flatten()
    .min()
    .unwrap_or(rest.len());

    let code = &rest[..end];
    (!code.is_empty()).then(|| code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_code_stops_at_whitespace() {
        assert_eq!(parse_set_code("M10 please"), Some("M10".to_string()));
        assert_eq!(parse_set_code(" M10"), None);
        assert_eq!(parse_set_code(""), None);
        assert_eq!(parse_set_code("ISD]]"), Some("ISD".to_string()));
    }

    #[test]
    fn test_parse_index_bounds() {
        assert_eq!(parse_index("!0"), Some(0));
        assert_eq!(parse_index("!999"), Some(999));
        assert_eq!(parse_index("!1000"), None);
        assert_eq!(parse_index("!1a"), None);
    }
}
