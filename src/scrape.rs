//! # HTML Scraping Helpers
//!
//! Tolerant extraction for the two third-party pages the bot reads: the
//! Gatherer search page and the MTGGoldfish price page. Extraction scans for
//! known class/id markers and pulls the text that follows them instead of
//! building a DOM.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TAG_REGEX: Regex = Regex::new(r"(?s)<[^>]*>").expect("Tag pattern should be valid");
    static ref WHITESPACE_REGEX: Regex =
        Regex::new(r"\s+").expect("Whitespace pattern should be valid");
    static ref CARD_TITLE_REGEX: Regex = Regex::new(
        r#"(?is)<span[^>]*class\s*=\s*["']cardTitle["'][^>]*>\s*<a[^>]*>(.*?)</a>"#
    )
    .expect("Card title pattern should be valid");
    static ref SUBTITLE_REGEX: Regex = Regex::new(
        r#"(?is)<span[^>]*id\s*=\s*["'][^"']*SubContentHeader_subtitleDisplay["'][^>]*>(.*?)</span>"#
    )
    .expect("Subtitle pattern should be valid");
    /// Opening tag of any price box; `price-box-price` and `price-box-type` do not match
    static ref PRICE_BOX_START_REGEX: Regex = Regex::new(
        r#"(?is)<div[^>]*class\s*=\s*["']price-box\s+[^"']*["'][^>]*>"#
    )
    .expect("Price box pattern should be valid");
    static ref ONLINE_BOX_REGEX: Regex = price_box_regex("online");
    static ref PAPER_BOX_REGEX: Regex = price_box_regex("paper");
    static ref BOX_PRICE_REGEX: Regex = Regex::new(
        r#"(?is)<div[^>]*class\s*=\s*["']price-box-price["'][^>]*>(.*?)</div>"#
    )
    .expect("Price pattern should be valid");
}

fn price_box_regex(kind: &str) -> Regex {
    let pattern = format!(
        r#"(?is)<div[^>]*class\s*=\s*["']price-box\s+(?:[^"']*\s)?{kind}(?:\s[^"']*)?["'][^>]*>"#
    );
    Regex::new(&pattern).expect("Price box pattern should be valid")
}

/// Decode the handful of entities that show up in card names and prices
pub fn decode_entities(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#039;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Strip tags, decode entities and collapse whitespace
pub fn clean_text(fragment: &str) -> String {
    let without_tags = TAG_REGEX.replace_all(fragment, " ");
    let decoded = decode_entities(&without_tags);
    WHITESPACE_REGEX.replace_all(decoded.trim(), " ").into_owned()
}

/// Card names listed on a Gatherer search results page, in page order
pub fn gatherer_card_titles(html: &str) -> Vec<String> {
    CARD_TITLE_REGEX
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| clean_text(m.as_str()))
        .filter(|name| !name.is_empty())
        .collect()
}

/// Card name shown on a Gatherer card details page
///
/// Gatherer skips the results list and redirects straight to the card when a
/// partial search has exactly one hit.
pub fn gatherer_single_card(html: &str) -> Option<String> {
    SUBTITLE_REGEX
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| clean_text(m.as_str()))
        .filter(|name| !name.is_empty())
}

/// Online (MTGO) price from an MTGGoldfish price page
pub fn goldfish_online_price(html: &str) -> Option<String> {
    box_price(&ONLINE_BOX_REGEX, html)
}

/// Paper price from an MTGGoldfish price page
pub fn goldfish_paper_price(html: &str) -> Option<String> {
    box_price(&PAPER_BOX_REGEX, html)
}

/// Price inside the first box opened by `box_start`, bounded by the next box
fn box_price(box_start: &Regex, html: &str) -> Option<String> {
    let start = box_start.find(html)?.end();
    let rest = &html[start..];
    let contents = match PRICE_BOX_START_REGEX.find(rest) {
        Some(next_box) => &rest[..next_box.start()],
        None => rest,
    };

    BOX_PRICE_REGEX
        .captures(contents)
        .and_then(|caps| caps.get(1))
        .map(|m| clean_text(m.as_str()))
        .filter(|price| !price.is_empty())
}
