use cardbot::command::{parse_command, Command};

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str, set_code: Option<&str>) -> Command {
        Command::CardLookup {
            name: name.to_string(),
            set_code: set_code.map(str::to_string),
        }
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse_command("!test"), Command::Test);
        assert_eq!(parse_command("!help"), Command::Help);
        assert_eq!(parse_command("!superhelp"), Command::SuperHelp);
        assert_eq!(parse_command("!flip"), Command::Flip);
        assert_eq!(parse_command("!cont"), Command::Continue);
    }

    #[test]
    fn test_prefix_matching() {
        // Commands match on prefix, as typed in chat
        assert_eq!(parse_command("!testing 123"), Command::Test);
        assert_eq!(parse_command("!continue"), Command::Continue);
        assert_eq!(parse_command("!flip it"), Command::Flip);
    }

    #[test]
    fn test_play_requires_label() {
        assert_eq!(
            parse_command("!play Hearthstone"),
            Command::SetPresence("Hearthstone".to_string())
        );
        assert_eq!(parse_command("!play "), Command::Unrecognized);
        assert_eq!(parse_command("!play"), Command::Unrecognized);
    }

    #[test]
    fn test_card_lookup_without_set_code() {
        assert_eq!(parse_command("[[Doom Blade]]"), lookup("Doom Blade", None));
        assert_eq!(
            parse_command("have you seen [[Doom Blade]] lately?"),
            lookup("Doom Blade", None)
        );
    }

    #[test]
    fn test_card_lookup_with_set_code() {
        assert_eq!(parse_command("[[Doom Blade]]M10"), lookup("Doom Blade", Some("M10")));
        assert_eq!(
            parse_command("[[Doom Blade]]M10 is the best"),
            lookup("Doom Blade", Some("M10"))
        );
        assert_eq!(
            parse_command("[[Doom Blade]]M10]]"),
            lookup("Doom Blade", Some("M10"))
        );
    }

    #[test]
    fn test_card_lookup_uses_first_reference() {
        assert_eq!(
            parse_command("[[Doom Blade]] or [[Go for the Throat]]"),
            lookup("Doom Blade", None)
        );
    }

    #[test]
    fn test_malformed_card_lookup() {
        assert_eq!(parse_command("[[Doom Blade"), Command::Unrecognized);
        assert_eq!(parse_command("[[]]"), Command::Unrecognized);
        assert_eq!(parse_command("[[   ]]M10"), Command::Unrecognized);
    }

    #[test]
    fn test_card_lookup_takes_priority_over_later_rules() {
        assert_eq!(parse_command("!flip [[Delver of Secrets]]"), lookup("Delver of Secrets", None));
        assert_eq!(parse_command("!cont [[Island]]"), lookup("Island", None));
        // ...but not over earlier ones
        assert_eq!(parse_command("!help [[Island]]"), Command::Help);
    }

    #[test]
    fn test_search_and_booster_arguments() {
        assert_eq!(
            parse_command("!search set=KLD;rarity=uncommon"),
            Command::Search("set=KLD;rarity=uncommon".to_string())
        );
        assert_eq!(parse_command("!booster KLD"), Command::Booster("KLD".to_string()));
        assert_eq!(parse_command("!booster  "), Command::Unrecognized);
        assert_eq!(parse_command("!search"), Command::Unrecognized);
    }

    #[test]
    fn test_index_select() {
        assert_eq!(parse_command("!1"), Command::IndexSelect(1));
        assert_eq!(parse_command("!17"), Command::IndexSelect(17));
        assert_eq!(parse_command("!999"), Command::IndexSelect(999));
        assert_eq!(parse_command(" !42 "), Command::IndexSelect(42));
    }

    #[test]
    fn test_index_select_rejects_other_shapes() {
        assert_eq!(parse_command("!1000"), Command::Unrecognized);
        assert_eq!(parse_command("!17 please"), Command::Unrecognized);
        assert_eq!(parse_command("card !17"), Command::Unrecognized);
    }

    #[test]
    fn test_unrecognized_text() {
        assert_eq!(parse_command(""), Command::Unrecognized);
        assert_eq!(parse_command("good game"), Command::Unrecognized);
        assert_eq!(parse_command("!unknown"), Command::Unrecognized);
    }

    #[test]
    fn test_intent_labels() {
        assert_eq!(parse_command("!17").intent(), "index");
        assert_eq!(parse_command("[[Island]]").intent(), "lookup");
        assert_eq!(parse_command("hi").intent(), "unrecognized");
    }
}
