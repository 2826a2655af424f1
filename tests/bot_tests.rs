use cardbot::bot::{format_booster, format_card, format_result_page, BoosterEntry};
use cardbot::catalog::Printing;
use cardbot::circuit_breaker::CircuitBreaker;
use cardbot::config::{BotConfig, ServiceConfig, DEFAULT_FOIL_PROBABILITY, PAGE_SIZE};
use cardbot::errors::BotError;
use cardbot::pricing::{goldfish_price_url, goldfish_slug, PriceQuote};
use cardbot::session::ResultPage;
use std::collections::HashMap;

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    /// Test configuration defaults
    #[test]
    fn test_bot_config_defaults() {
        let config = BotConfig::default();

        assert_eq!(config.page_size, PAGE_SIZE);
        assert_eq!(config.page_size, 25);
        assert!((config.foil_probability - 1.0 / 91.0).abs() < f64::EPSILON);
        assert_eq!(config.presence, "Hearthstone");
        assert_eq!(config.services.request_timeout_secs, 10);
        assert!(config.services.max_search_pages > 0);
    }

    /// Test configuration overrides from the environment
    #[test]
    fn test_bot_config_overrides() {
        let config = BotConfig::from_lookup(lookup_from(&[
            ("FOIL_PROBABILITY", "0.5"),
            ("BOT_PRESENCE", "Magic Arena"),
            ("HTTP_TIMEOUT_SECS", "15"),
            ("MAX_SEARCH_PAGES", "3"),
            ("CARD_API_URL", "http://localhost:8080/v1/"),
        ]))
        .unwrap();

        assert_eq!(config.foil_probability, 0.5);
        assert_eq!(config.presence, "Magic Arena");
        assert_eq!(config.services.request_timeout_secs, 15);
        assert_eq!(config.services.max_search_pages, 3);
        assert_eq!(config.services.card_api_url, "http://localhost:8080/v1");
    }

    /// Test that an empty environment gives the defaults
    #[test]
    fn test_bot_config_empty_lookup() {
        let config = BotConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.foil_probability, DEFAULT_FOIL_PROBABILITY);
        assert_eq!(config.services.gatherer_url, "http://gatherer.wizards.com");
    }

    /// Test configuration validation
    #[test]
    fn test_bot_config_rejects_bad_values() {
        assert!(BotConfig::from_lookup(lookup_from(&[("FOIL_PROBABILITY", "1.5")])).is_err());
        assert!(BotConfig::from_lookup(lookup_from(&[("FOIL_PROBABILITY", "often")])).is_err());
        assert!(BotConfig::from_lookup(lookup_from(&[("HTTP_TIMEOUT_SECS", "-1")])).is_err());
    }

    /// Test circuit breaker failure recording
    #[test]
    fn test_circuit_breaker_failure_recording() {
        let config = ServiceConfig {
            circuit_breaker_threshold: 2,
            ..Default::default()
        };
        let circuit_breaker = CircuitBreaker::new(&config);

        // Initially closed
        assert!(!circuit_breaker.is_open());

        // Record one failure - still closed
        circuit_breaker.record_failure();
        assert!(!circuit_breaker.is_open());

        // Record second failure - now open
        circuit_breaker.record_failure();
        assert!(circuit_breaker.is_open());
        assert_eq!(circuit_breaker.failure_count(), 2);
    }

    /// Test circuit breaker success recording
    #[test]
    fn test_circuit_breaker_success_recording() {
        let config = ServiceConfig {
            circuit_breaker_threshold: 1,
            ..Default::default()
        };
        let circuit_breaker = CircuitBreaker::new(&config);

        circuit_breaker.record_failure();
        assert!(circuit_breaker.is_open());

        circuit_breaker.record_success();
        assert!(!circuit_breaker.is_open());
        assert_eq!(circuit_breaker.failure_count(), 0);
    }

    /// Test circuit breaker reset after the timeout
    #[test]
    fn test_circuit_breaker_resets_after_timeout() {
        let config = ServiceConfig {
            circuit_breaker_threshold: 1,
            circuit_breaker_reset_secs: 0,
            ..Default::default()
        };
        let circuit_breaker = CircuitBreaker::new(&config);

        circuit_breaker.record_failure();
        // Zero reset time: the circuit half-opens immediately
        assert!(!circuit_breaker.is_open());
        assert_eq!(circuit_breaker.failure_count(), 0);
    }

    /// Test error message formatting
    #[test]
    fn test_error_message_formatting() {
        let error = BotError::OutOfRange { index: 17, len: 10 };
        assert_eq!(format!("{}", error), "Index 17 out of range for list of 10");

        let error = BotError::Timeout {
            service: "MTGGoldfish".to_string(),
        };
        assert_eq!(format!("{}", error), "Timeout error: MTGGoldfish");
    }

    /// Test MTGGoldfish slugs
    #[test]
    fn test_goldfish_slug_strips_punctuation() {
        assert_eq!(goldfish_slug("Jace, the Mind Sculptor"), "Jace+the+Mind+Sculptor");
        assert_eq!(goldfish_slug("Urza's Saga"), "Urzas+Saga");
        assert_eq!(goldfish_slug("Kaladesh Inventions: Masterpiece."), "Kaladesh+Inventions+Masterpiece");
        assert_eq!(
            goldfish_price_url("https://www.mtggoldfish.com", "Magic 2010", "Doom Blade"),
            "https://www.mtggoldfish.com/price/Magic+2010/Doom+Blade#online"
        );
    }

    /// Test list formatting keeps commas inside names intact
    #[test]
    fn test_result_page_with_commas_in_names() {
        let page = ResultPage {
            offset: 0,
            names: vec![
                "Jace, the Mind Sculptor".to_string(),
                "Jace, Vryn's Prodigy".to_string(),
            ],
            total: 2,
        };

        assert_eq!(
            format_result_page(&page, 25),
            "Your search found 2 cards: Jace, the Mind Sculptor(1), Jace, Vryn's Prodigy(2)"
        );
    }

    /// Test list formatting on a later page
    #[test]
    fn test_result_page_indices_continue() {
        let page = ResultPage {
            offset: 25,
            names: vec!["Card 26".to_string(), "Card 27".to_string()],
            total: 60,
        };

        let message = format_result_page(&page, 25);
        assert!(message.starts_with("Your search found 60 cards: Card 26(26), Card 27(27)"));
        assert!(message.ends_with("\n\nType !cont to receive the next 25."));
    }

    /// Test booster formatting
    #[test]
    fn test_booster_format() {
        let cards = vec![
            BoosterEntry {
                name: "Aether Hub".to_string(),
                rarity: "Uncommon".to_string(),
                foil: false,
            },
            BoosterEntry {
                name: "Glint-Nest Crane".to_string(),
                rarity: "Uncommon".to_string(),
                foil: true,
            },
        ];

        assert_eq!(
            format_booster(&cards),
            "You opened: Aether Hub(Uncommon)(1), Glint-Nest Crane(Foil Uncommon)(2)"
        );
    }

    /// Test card formatting without optional parts
    #[test]
    fn test_card_format_minimal() {
        let card = Printing {
            name: "Black Lotus".to_string(),
            set_code: "LEA".to_string(),
            set_name: "Limited Edition Alpha".to_string(),
            rarity: "Rare".to_string(),
            multiverse_id: None,
            image_url: None,
            names: Vec::new(),
        };

        let message = format_card(
            &card,
            std::slice::from_ref(&card),
            &PriceQuote::default(),
            "https://www.mtggoldfish.com/price/Limited+Edition+Alpha/Black+Lotus#online",
            false,
        );

        assert_eq!(
            message,
            "https://www.mtggoldfish.com/price/Limited+Edition+Alpha/Black+Lotus#online\n\
             Reg: MTGO: None || Paper: None\n\
             Foil: MTGO: None || Paper: None"
        );
    }

    /// Test that known prices are shown and missing ones fall back to None
    #[test]
    fn test_card_format_partial_prices() {
        let card = Printing {
            name: "Doom Blade".to_string(),
            set_code: "M10".to_string(),
            set_name: "Magic 2010".to_string(),
            rarity: "Common".to_string(),
            multiverse_id: None,
            image_url: None,
            names: Vec::new(),
        };
        let prices = PriceQuote {
            online: None,
            paper: Some("$ 0.25".to_string()),
            foil_online: Some("0.10".to_string()),
            foil_paper: None,
        };

        let message = format_card(&card, std::slice::from_ref(&card), &prices, "page", false);

        assert_eq!(
            message,
            "page\n\
             Reg: MTGO: None || Paper: $ 0.25\n\
             Foil: MTGO: 0.10 || Paper: None"
        );
    }
}
