//! Dispatcher module: routes parsed commands to card lookups, searches,
//! boosters and pagination, reading and writing the chat's session state.

use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::catalog::{CardCatalog, NameSearch, Printing};
use crate::command::{parse_command, Command};
use crate::config::{BotConfig, DEFAULT_FOIL_PROBABILITY};
use crate::errors::BotError;
use crate::localization::{t, t_args};
use crate::pricing::{goldfish_price_url, PriceSource};
use crate::search_query::parse_search_query;
use crate::session::SessionState;

use super::ui_builder::{format_booster, format_card, format_result_page, BoosterEntry};

/// What the transport should do in response to a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Send text to the chat
    Text(String),
    /// Change the bot's presence label
    Presence(String),
    /// Say nothing
    Silent,
}

/// Outcome of resolving one card name against the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// A printing was chosen among all printings of the exact name
    Resolved {
        card: Printing,
        printings: Vec<Printing>,
    },
    /// Several cards match the name
    Matches(Vec<String>),
    /// A partial name resolved to exactly one card that still needs a lookup
    Ambiguous {
        name: String,
        set_code: Option<String>,
    },
    NotFound,
}

/// Pick the printing for `set_code`, falling back to the most recent one
pub fn select_printing<'a>(printings: &'a [Printing], set_code: Option<&str>) -> Option<&'a Printing> {
    set_code
        .and_then(|code| {
            printings
                .iter()
                .find(|p| p.set_code.eq_ignore_ascii_case(code))
        })
        .or_else(|| printings.last())
}

pub struct CommandDispatcher {
    catalog: Arc<dyn CardCatalog>,
    prices: Arc<dyn PriceSource>,
    config: BotConfig,
}

impl CommandDispatcher {
    pub fn new(catalog: Arc<dyn CardCatalog>, prices: Arc<dyn PriceSource>, config: BotConfig) -> Self {
        Self {
            catalog,
            prices,
            config,
        }
    }

    /// Handle one inbound message. Failures become replies, never errors.
    pub async fn dispatch(&self, text: &str, session: &mut SessionState) -> Reply {
        let command = parse_command(text);
        if command == Command::Unrecognized {
            return Reply::Silent;
        }
        debug!(intent = command.intent(), "Dispatching command");

        match self.handle(command, session).await {
            Ok(reply) => reply,
            Err(e) => {
                if e.is_service_failure() || matches!(e, BotError::ServiceUnavailable { .. }) {
                    warn!(error = %e, "External service failed while handling command");
                } else {
                    debug!(error = %e, "Command produced no result");
                }
                error_reply(&e)
            }
        }
    }

    async fn handle(&self, command: Command, session: &mut SessionState) -> Result<Reply, BotError> {
        match command {
            Command::Test => Ok(Reply::Text(t("alive"))),
            Command::Help => Ok(Reply::Text(t("help"))),
            Command::SuperHelp => Ok(Reply::Text(t("superhelp"))),
            Command::SetPresence(label) => Ok(Reply::Presence(label)),
            Command::CardLookup { name, set_code } => {
                self.lookup(session, &name, set_code.as_deref()).await
            }
            Command::Flip => {
                let other_face = session.flip_side().map(str::to_string);
                match other_face {
                    Some(other_face) => self.lookup(session, &other_face, None).await,
                    None => Ok(Reply::Text(t("no-flippable-card"))),
                }
            }
            Command::Search(query) => self.search(session, &query).await,
            Command::Booster(set_code) => self.booster(session, &set_code).await,
            Command::IndexSelect(index) => {
                if session.last_results().is_empty() {
                    return Ok(Reply::Text(t("no-list")));
                }
                let name = session.result_at(index)?.to_string();
                self.lookup(session, &name, None).await
            }
            Command::Continue => Ok(session
                .next_page(self.config.page_size)
                .map(|page| Reply::Text(format_result_page(&page, self.config.page_size)))
                .unwrap_or(Reply::Silent)),
            Command::Unrecognized => Ok(Reply::Silent),
        }
    }

    /// Resolve a name against the catalog without touching session state
    pub async fn resolve(&self, name: &str, set_code: Option<&str>) -> Result<LookupOutcome, BotError> {
        let printings = self.catalog.printings(name).await?;
        if let Some(card) = select_printing(&printings, set_code).cloned() {
            return Ok(LookupOutcome::Resolved { card, printings });
        }

        Ok(match self.catalog.search_names(name).await? {
            NameSearch::Titles(names) if !names.is_empty() => LookupOutcome::Matches(names),
            NameSearch::Redirected(resolved) => LookupOutcome::Ambiguous {
                name: resolved,
                set_code: set_code.map(str::to_string),
            },
            _ => LookupOutcome::NotFound,
        })
    }

    async fn lookup(
        &self,
        session: &mut SessionState,
        name: &str,
        set_code: Option<&str>,
    ) -> Result<Reply, BotError> {
        session.clear_flip_side();

        let outcome = match self.resolve(name, set_code).await? {
            LookupOutcome::Ambiguous { name: resolved, set_code } => {
                debug!(card_name = name, resolved = %resolved, "Partial name resolved to a single card");
                match self.resolve(&resolved, set_code.as_deref()).await? {
                    // A second pass that still cannot settle on a card is a miss
                    LookupOutcome::Ambiguous { .. } => LookupOutcome::NotFound,
                    second => second,
                }
            }
            first => first,
        };

        match outcome {
            LookupOutcome::Resolved { card, printings } => {
                let prices = self.prices.prices(&card.set_name, &card.name).await?;
                let other_face = card.other_face().map(str::to_string);
                let price_page = goldfish_price_url(
                    &self.config.services.goldfish_url,
                    &card.set_name,
                    &card.name,
                );
                let reply = format_card(&card, &printings, &prices, &price_page, other_face.is_some());

                info!(card_name = %card.name, set_code = %card.set_code, printings = printings.len(), "Card resolved");
                session.set_flip_side(other_face);
                Ok(Reply::Text(reply))
            }
            LookupOutcome::Matches(names) => {
                info!(card_name = name, matches = names.len(), "Name matched several cards");
                Ok(self.show_new_list(session, names))
            }
            LookupOutcome::Ambiguous { .. } | LookupOutcome::NotFound => {
                Err(BotError::NotFound(name.to_string()))
            }
        }
    }

    async fn search(&self, session: &mut SessionState, query: &str) -> Result<Reply, BotError> {
        let filter = parse_search_query(query);
        let cards = self.catalog.search(&filter).await?;
        let names: Vec<String> = cards.into_iter().map(|card| card.name).collect();

        info!(filters = filter.len(), results = names.len(), "Advanced search finished");
        if names.is_empty() {
            session.replace_results(names);
            return Err(BotError::NotFound(query.to_string()));
        }
        Ok(self.show_new_list(session, names))
    }

    async fn booster(&self, session: &mut SessionState, set_code: &str) -> Result<Reply, BotError> {
        let cards = self.catalog.booster(set_code).await?;
        if cards.is_empty() {
            return Ok(Reply::Text(t("booster-bad-set")));
        }

        let entries = self.roll_foils(cards);
        info!(set_code, cards = entries.len(), "Booster opened");

        // The whole pack is shown at once, so there is nothing to continue
        session.replace_results_shown(entries.iter().map(|e| e.name.clone()).collect());
        Ok(Reply::Text(format_booster(&entries)))
    }

    fn roll_foils(&self, cards: Vec<Printing>) -> Vec<BoosterEntry> {
        let probability = if (0.0..=1.0).contains(&self.config.foil_probability) {
            self.config.foil_probability
        } else {
            DEFAULT_FOIL_PROBABILITY
        };
        let mut rng = rand::thread_rng();

        cards
            .into_iter()
            .map(|card| BoosterEntry {
                foil: rng.gen_bool(probability),
                name: card.name,
                rarity: card.rarity,
            })
            .collect()
    }

    fn show_new_list(&self, session: &mut SessionState, names: Vec<String>) -> Reply {
        session.replace_results(names);
        session
            .next_page(self.config.page_size)
            .map(|page| Reply::Text(format_result_page(&page, self.config.page_size)))
            .unwrap_or(Reply::Silent)
    }
}

/// Map an error to the message shown in chat
pub fn error_reply(error: &BotError) -> Reply {
    let text = match error {
        BotError::NotFound(_) => t("no-results"),
        BotError::OutOfRange { index, len } => t_args(
            "index-out-of-range",
            &[("index", &index.to_string()), ("count", &len.to_string())],
        ),
        BotError::ExternalService { service, .. } => {
            t_args("error-external", &[("service", service)])
        }
        BotError::Timeout { service } => t_args("error-timeout", &[("service", service)]),
        BotError::ServiceUnavailable { service } => {
            t_args("error-unavailable", &[("service", service)])
        }
    };
    Reply::Text(text)
}
