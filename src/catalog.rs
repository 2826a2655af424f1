//! # Card Catalog Module
//!
//! The card database collaborator: printing data, exact-name lookup,
//! partial-name search, structured filter search and booster generation.
//!
//! `CardCatalog` is the seam the dispatcher talks to. `MtgApiClient` is the
//! production implementation backed by the magicthegathering.io REST API and
//! the Gatherer search page.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::ServiceConfig;
use crate::errors::BotError;
use crate::http::HttpFetcher;
use crate::scrape::{gatherer_card_titles, gatherer_single_card};
use crate::search_query::SearchFilter;

/// One set's version of a card
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Printing {
    pub name: String,
    #[serde(rename = "set")]
    pub set_code: String,
    #[serde(default)]
    pub set_name: String,
    #[serde(default)]
    pub rarity: String,
    #[serde(rename = "multiverseid", default, deserialize_with = "lenient_id")]
    pub multiverse_id: Option<u64>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Names of every face for flip, split and meld cards; empty otherwise
    #[serde(default)]
    pub names: Vec<String>,
}

impl Printing {
    /// Name of the other face, if this printing has one
    pub fn other_face(&self) -> Option<&str> {
        if self.names.len() < 2 {
            return None;
        }
        self.names
            .iter()
            .map(String::as_str)
            .find(|face| *face != self.name)
    }
}

/// Result of a partial-name search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameSearch {
    /// Several cards matched; names in result order
    Titles(Vec<String>),
    /// Exactly one card matched and the search resolved straight to it
    Redirected(String),
    Empty,
}

/// Card database collaborator
#[async_trait]
pub trait CardCatalog: Send + Sync {
    /// All printings whose name is exactly `name`, oldest first
    async fn printings(&self, name: &str) -> Result<Vec<Printing>, BotError>;

    /// Cards whose name contains `term`
    async fn search_names(&self, term: &str) -> Result<NameSearch, BotError>;

    /// Cards matching a structured filter set
    async fn search(&self, filter: &SearchFilter) -> Result<Vec<Printing>, BotError>;

    /// A randomly generated booster for `set_code`; empty for an unknown set
    async fn booster(&self, set_code: &str) -> Result<Vec<Printing>, BotError>;
}

#[derive(Debug, Deserialize)]
struct CardsPage {
    #[serde(default)]
    cards: Vec<Printing>,
}

// The API sends multiverse ids as numbers, older dumps as strings
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Number(id)) => Some(id),
        Some(RawId::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}

/// magicthegathering.io + Gatherer backed catalog
pub struct MtgApiClient {
    api: HttpFetcher,
    gatherer: HttpFetcher,
    api_url: String,
    gatherer_url: String,
    max_search_pages: u32,
}

impl MtgApiClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, BotError> {
        Ok(Self {
            api: HttpFetcher::new("card database", config)?,
            gatherer: HttpFetcher::new("Gatherer", config)?,
            api_url: config.card_api_url.clone(),
            gatherer_url: config.gatherer_url.clone(),
            max_search_pages: config.max_search_pages.max(1),
        })
    }

    async fn fetch_all_pages(&self, params: Vec<(&str, String)>) -> Result<Vec<Printing>, BotError> {
        let url = format!("{}/cards", self.api_url);
        let mut cards = Vec::new();

        for page in 1..=self.max_search_pages {
            let mut query = params.clone();
            query.push(("page", page.to_string()));

            let batch = self
                .api
                .get_json::<CardsPage>(&url, &query)
                .await?
                .map(|p| p.cards)
                .unwrap_or_default();
            if batch.is_empty() {
                break;
            }
            debug!(page, batch_len = batch.len(), "Fetched card page");
            cards.extend(batch);
        }

        Ok(cards)
    }
}

#[async_trait]
impl CardCatalog for MtgApiClient {
    async fn printings(&self, name: &str) -> Result<Vec<Printing>, BotError> {
        // Quoting the name asks the API for an exact match
        let cards = self
            .fetch_all_pages(vec![("name", format!("\"{name}\""))])
            .await?;
        info!(card_name = name, printings = cards.len(), "Exact name lookup finished");
        Ok(cards)
    }

    async fn search_names(&self, term: &str) -> Result<NameSearch, BotError> {
        let url = format!("{}/Pages/Search/Default.aspx", self.gatherer_url);
        let html = self
            .gatherer
            .get_text(&url, &[("name", format!(" [{term}]"))])
            .await?;

        let titles = gatherer_card_titles(&html);
        if !titles.is_empty() {
            return Ok(NameSearch::Titles(titles));
        }
        Ok(gatherer_single_card(&html)
            .map(NameSearch::Redirected)
            .unwrap_or(NameSearch::Empty))
    }

    async fn search(&self, filter: &SearchFilter) -> Result<Vec<Printing>, BotError> {
        let params = filter
            .query_pairs()
            .into_iter()
            .map(|(key, value)| (key, value.to_string()))
            .collect();
        self.fetch_all_pages(params).await
    }

    async fn booster(&self, set_code: &str) -> Result<Vec<Printing>, BotError> {
        let url = format!("{}/sets/{}/booster", self.api_url, set_code.trim());
        Ok(self
            .api
            .get_json::<CardsPage>(&url, &[])
            .await?
            .map(|p| p.cards)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printing_deserializes_api_shape() {
        let json = r#"{
            "name": "Delver of Secrets",
            "names": ["Delver of Secrets", "Insectile Aberration"],
            "set": "ISD",
            "setName": "Innistrad",
            "rarity": "Common",
            "multiverseid": "226749",
            "imageUrl": "http://example.test/226749.jpg"
        }"#;

        let printing: Printing = serde_json::from_str(json).unwrap();
        assert_eq!(printing.set_code, "ISD");
        assert_eq!(printing.multiverse_id, Some(226749));
        assert_eq!(printing.other_face(), Some("Insectile Aberration"));
    }

    #[test]
    fn test_single_faced_printing_has_no_other_face() {
        let json = r#"{"name": "Doom Blade", "set": "M10"}"#;
        let printing: Printing = serde_json::from_str(json).unwrap();
        assert_eq!(printing.multiverse_id, None);
        assert_eq!(printing.other_face(), None);
    }
}
