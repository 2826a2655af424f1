//! Per-chat session state: the last result list, its pagination cursor and
//! the other face of the last flip card shown.

use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

use crate::errors::BotError;

/// Cross-message state for one chat
///
/// Invariant: `shown_count <= last_results.len()`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    last_results: Vec<String>,
    shown_count: usize,
    flip_side: Option<String>,
}

/// One page of the current result list
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultPage {
    /// Zero-based position of the first entry in the full list
    pub offset: usize,
    pub names: Vec<String>,
    /// Length of the full list
    pub total: usize,
}

impl ResultPage {
    /// Whether entries remain after this page
    pub fn has_more(&self) -> bool {
        self.offset + self.names.len() < self.total
    }
}

/// Session storage keyed by chat, provided by teloxide
pub type CardSession = Dialogue<SessionState, InMemStorage<SessionState>>;

impl SessionState {
    pub fn last_results(&self) -> &[String] {
        &self.last_results
    }

    pub fn shown_count(&self) -> usize {
        self.shown_count
    }

    pub fn flip_side(&self) -> Option<&str> {
        self.flip_side.as_deref()
    }

    /// Entries not yet emitted
    pub fn remaining(&self) -> usize {
        self.last_results.len().saturating_sub(self.shown_count)
    }

    /// Replace the result list and rewind the cursor
    pub fn replace_results(&mut self, names: Vec<String>) {
        self.last_results = names;
        self.shown_count = 0;
    }

    /// Replace the result list with one that is shown in full at once
    pub fn replace_results_shown(&mut self, names: Vec<String>) {
        self.shown_count = names.len();
        self.last_results = names;
    }

    /// Take the next page of at most `page_size` entries and advance the cursor
    ///
    /// Returns `None` once every entry has been shown.
    pub fn next_page(&mut self, page_size: usize) -> Option<ResultPage> {
        if self.remaining() == 0 || page_size == 0 {
            return None;
        }

        let offset = self.shown_count;
        let end = (offset + page_size).min(self.last_results.len());
        self.shown_count = end;

        Some(ResultPage {
            offset,
            names: self.last_results[offset..end].to_vec(),
            total: self.last_results.len(),
        })
    }

    /// Name at 1-based `index` in the result list
    pub fn result_at(&self, index: usize) -> Result<&str, BotError> {
        index
            .checked_sub(1)
            .and_then(|i| self.last_results.get(i))
            .map(String::as_str)
            .ok_or(BotError::OutOfRange {
                index,
                len: self.last_results.len(),
            })
    }

    pub fn set_flip_side(&mut self, name: Option<String>) {
        self.flip_side = name;
    }

    pub fn clear_flip_side(&mut self) {
        self.flip_side = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_empty() {
        let state = SessionState::default();
        assert!(state.last_results().is_empty());
        assert_eq!(state.shown_count(), 0);
        assert_eq!(state.flip_side(), None);
    }

    #[test]
    fn test_state_serializes_for_storage() {
        let mut state = SessionState::default();
        state.replace_results(vec!["Doom Blade".to_string()]);
        state.set_flip_side(Some("Insectile Aberration".to_string()));

        let json = serde_json::to_string(&state).unwrap();
        let restored: SessionState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }
}
