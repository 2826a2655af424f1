//! UI Builder module for formatting chat replies

use crate::catalog::Printing;
use crate::localization::{t, t_args};
use crate::pricing::PriceQuote;
use crate::session::ResultPage;

const GATHERER_DETAILS_URL: &str = "http://gatherer.wizards.com/Pages/Card/Details.aspx";
const ENTRY_SEPARATOR: &str = ", ";

/// A generated booster card and whether it was rolled as foil
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoosterEntry {
    pub name: String,
    pub rarity: String,
    pub foil: bool,
}

/// Format one page of a result list
///
/// Entries show their 1-based position in the whole list, so a second page
/// starts at 26. A continuation notice is appended while entries remain.
pub fn format_result_page(page: &ResultPage, page_size: usize) -> String {
    let entries = page
        .names
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{}({})", name, page.offset + i + 1))
        .collect::<Vec<_>>()
        .join(ENTRY_SEPARATOR);

    let mut message = format!(
        "{} {}",
        t_args("search-found", &[("count", &page.total.to_string())]),
        entries
    );

    if page.has_more() {
        message.push_str("\n\n");
        message.push_str(&t_args(
            "search-continue",
            &[("page_size", &page_size.to_string())],
        ));
    }

    message
}

/// Format an opened booster, every card on one line
pub fn format_booster(cards: &[BoosterEntry]) -> String {
    let foil_label = t("booster-foil");
    let entries = cards
        .iter()
        .enumerate()
        .map(|(i, card)| {
            if card.foil {
                format!("{}({} {})({})", card.name, foil_label, card.rarity, i + 1)
            } else {
                format!("{}({})({})", card.name, card.rarity, i + 1)
            }
        })
        .collect::<Vec<_>>()
        .join(ENTRY_SEPARATOR);

    format!("{} {}", t("booster-opened"), entries)
}

fn price_or_none(price: Option<&str>) -> String {
    price.map_or_else(|| t("price-none"), str::to_string)
}

/// Format a resolved card: links, image, prices, other printings and flip notice
pub fn format_card(
    card: &Printing,
    printings: &[Printing],
    prices: &PriceQuote,
    price_page_url: &str,
    has_other_face: bool,
) -> String {
    let mut lines = Vec::new();

    if let Some(id) = card.multiverse_id {
        lines.push(format!("{GATHERER_DETAILS_URL}?multiverseid={id}"));
    }
    lines.push(price_page_url.to_string());
    if let Some(image_url) = &card.image_url {
        lines.push(image_url.clone());
    }

    lines.push(t_args(
        "price-regular",
        &[
            ("online", &price_or_none(prices.online.as_deref())),
            ("paper", &price_or_none(prices.paper.as_deref())),
        ],
    ));
    lines.push(t_args(
        "price-foil",
        &[
            ("online", &price_or_none(prices.foil_online.as_deref())),
            ("paper", &price_or_none(prices.foil_paper.as_deref())),
        ],
    ));

    // Basic lands are printed in nearly every set
    if printings.len() > 1 && card.rarity != "Basic Land" {
        let sets = printings
            .iter()
            .map(|p| format!("{}({})", p.set_name, p.set_code))
            .collect::<Vec<_>>()
            .join(ENTRY_SEPARATOR);
        lines.push(format!("{} {}", t("card-sets"), sets));
    }

    if has_other_face {
        lines.push(t("card-flip"));
    }

    lines.join("\n")
}
