//! # Pricing Module
//!
//! The pricing collaborator. Prices are scraped from MTGGoldfish: one page for
//! the regular printing and one for the foil printing, each carrying an online
//! (MTGO) and a paper price.

use async_trait::async_trait;
use tracing::debug;

use crate::config::ServiceConfig;
use crate::errors::BotError;
use crate::http::HttpFetcher;
use crate::scrape::{goldfish_online_price, goldfish_paper_price};

/// Up to four price points for a printing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceQuote {
    pub online: Option<String>,
    pub paper: Option<String>,
    pub foil_online: Option<String>,
    pub foil_paper: Option<String>,
}

/// Pricing collaborator
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn prices(&self, set_name: &str, card_name: &str) -> Result<PriceQuote, BotError>;
}

/// Normalize a set or card name into an MTGGoldfish URL path segment
///
/// # Examples
///
/// ```rust
/// use cardbot::pricing::goldfish_slug;
///
/// assert_eq!(goldfish_slug("Jace, the Mind Sculptor"), "Jace+the+Mind+Sculptor");
/// assert_eq!(goldfish_slug("Magic 2010"), "Magic+2010");
/// ```
pub fn goldfish_slug(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '\'' | ',' | ':' | '.'))
        .map(|c| if c == ' ' { '+' } else { c })
        .collect()
}

/// Link to the MTGGoldfish page for a printing
pub fn goldfish_price_url(base_url: &str, set_name: &str, card_name: &str) -> String {
    format!(
        "{}/price/{}/{}#online",
        base_url,
        goldfish_slug(set_name),
        goldfish_slug(card_name)
    )
}

/// MTGGoldfish scraper
pub struct GoldfishPrices {
    fetcher: HttpFetcher,
    base_url: String,
}

impl GoldfishPrices {
    pub fn new(config: &ServiceConfig) -> Result<Self, BotError> {
        Ok(Self {
            fetcher: HttpFetcher::new("MTGGoldfish", config)?,
            base_url: config.goldfish_url.clone(),
        })
    }

    // Missing pages (no foil printing, unknown set) simply carry no prices
    async fn page(&self, set_slug: &str, card_slug: &str) -> Result<String, BotError> {
        let url = format!("{}/price/{}/{}", self.base_url, set_slug, card_slug);
        Ok(self
            .fetcher
            .get_optional_text(&url, &[])
            .await?
            .unwrap_or_default())
    }
}

#[async_trait]
impl PriceSource for GoldfishPrices {
    async fn prices(&self, set_name: &str, card_name: &str) -> Result<PriceQuote, BotError> {
        let set_slug = goldfish_slug(set_name);
        let card_slug = goldfish_slug(card_name);

        let regular = self.page(&set_slug, &card_slug).await?;
        let foil = self.page(&format!("{set_slug}:Foil"), &card_slug).await?;

        let quote = PriceQuote {
            online: goldfish_online_price(&regular),
            paper: goldfish_paper_price(&regular),
            foil_online: goldfish_online_price(&foil),
            foil_paper: goldfish_paper_price(&foil),
        };
        debug!(card_name, set_name, quote = ?quote, "Scraped prices");
        Ok(quote)
    }
}
