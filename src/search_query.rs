//! # Advanced Search Query Module
//!
//! Parses the argument of `!search` into a structured filter set. A query is a
//! list of `key=value` clauses separated by `;`:
//!
//! ```text
//! set=KLD;rarity=uncommon;colors=blue,white;cmc=gte3
//! ```
//!
//! Values are passed to the card database untouched. List values (`,` for AND,
//! `|` for OR) and comparator prefixes (`gt`, `lt`, `gte`, `lte`) are part of
//! the card database's value grammar, not interpreted here.

use std::collections::BTreeMap;

use log::{debug, trace};

/// Every property the card database can filter on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SearchField {
    Layout,
    Cmc,
    Colors,
    ColorIdentity,
    Type,
    Supertypes,
    Types,
    Subtypes,
    Rarity,
    Set,
    SetName,
    Text,
    Flavor,
    Artist,
    Power,
    Toughness,
    Loyalty,
    GameFormat,
    Legality,
    OrderBy,
}

impl SearchField {
    pub const ALL: [SearchField; 20] = [
        SearchField::Layout,
        SearchField::Cmc,
        SearchField::Colors,
        SearchField::ColorIdentity,
        SearchField::Type,
        SearchField::Supertypes,
        SearchField::Types,
        SearchField::Subtypes,
        SearchField::Rarity,
        SearchField::Set,
        SearchField::SetName,
        SearchField::Text,
        SearchField::Flavor,
        SearchField::Artist,
        SearchField::Power,
        SearchField::Toughness,
        SearchField::Loyalty,
        SearchField::GameFormat,
        SearchField::Legality,
        SearchField::OrderBy,
    ];

    /// Key as typed by users in a query
    pub fn key(self) -> &'static str {
        match self {
            SearchField::Layout => "layout",
            SearchField::Cmc => "cmc",
            SearchField::Colors => "colors",
            SearchField::ColorIdentity => "colorIdentity",
            SearchField::Type => "type",
            SearchField::Supertypes => "supertypes",
            SearchField::Types => "types",
            SearchField::Subtypes => "subtypes",
            SearchField::Rarity => "rarity",
            SearchField::Set => "set",
            SearchField::SetName => "setName",
            SearchField::Text => "text",
            SearchField::Flavor => "flavor",
            SearchField::Artist => "artist",
            SearchField::Power => "power",
            SearchField::Toughness => "toughness",
            SearchField::Loyalty => "loyalty",
            SearchField::GameFormat => "gameFormat",
            SearchField::Legality => "legality",
            SearchField::OrderBy => "orderby",
        }
    }

    /// Query parameter name understood by the card database
    pub fn api_param(self) -> &'static str {
        match self {
            SearchField::OrderBy => "orderBy",
            other => other.key(),
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        if key == "orderBy" {
            return Some(SearchField::OrderBy);
        }
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

/// Default for `cmc` when the query leaves it out; matches every card
pub const DEFAULT_CMC: &str = "gte0";

/// Structured filter set produced from a search query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    values: BTreeMap<SearchField, String>,
}

impl SearchFilter {
    pub fn get(&self, field: SearchField) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    /// Value sent for `field`, including the `cmc` default
    pub fn effective(&self, field: SearchField) -> Option<&str> {
        match (field, self.get(field)) {
            (SearchField::Cmc, None) => Some(DEFAULT_CMC),
            (_, value) => value,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Query parameters for the card database, in field order
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        SearchField::ALL
            .into_iter()
            .filter_map(|field| self.effective(field).map(|v| (field.api_param(), v)))
            .collect()
    }
}

/// Parse a `;`-separated list of `key=value` clauses
///
/// Unknown keys and clauses without `=` are ignored. When a key repeats, the
/// last clause wins.
///
/// # Examples
///
/// ```rust
/// use cardbot::search_query::{parse_search_query, SearchField};
///
/// let filter = parse_search_query("set=KLD;rarity=uncommon;cmc=gte3");
/// assert_eq!(filter.get(SearchField::Set), Some("KLD"));
/// assert_eq!(filter.get(SearchField::Cmc), Some("gte3"));
/// ```
pub fn parse_search_query(query: &str) -> SearchFilter {
    let mut filter = SearchFilter::default();

    for clause in query.split(';') {
        let Some((key, value)) = clause.split_once('=') else {
            trace!("Skipping clause without '=': {clause:?}");
            continue;
        };

        let key = key.trim();
        match SearchField::from_key(key) {
            Some(field) => {
                filter.values.insert(field, value.trim().to_string());
            }
            None => debug!("Ignoring unknown search key: {key}"),
        }
    }

    debug!("Parsed search query into {} filters", filter.len());
    filter
}
