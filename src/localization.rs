use anyhow::{anyhow, Result};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use std::collections::HashMap;
use std::sync::LazyLock;
use unic_langid::LanguageIdentifier;

const EN_RESOURCE: &str = include_str!("../locales/en/main.ftl");

/// Localization manager for the card bot
pub struct LocalizationManager {
    bundle: FluentBundle<FluentResource>,
}

impl LocalizationManager {
    /// Create a new localization manager with the bundled English messages
    pub fn new() -> Result<Self> {
        let en_locale: LanguageIdentifier = "en".parse()?;
        let bundle = Self::create_bundle(&en_locale, EN_RESOURCE)?;
        Ok(Self { bundle })
    }

    /// Create a fluent bundle for a specific locale
    fn create_bundle(
        locale: &LanguageIdentifier,
        source: &str,
    ) -> Result<FluentBundle<FluentResource>> {
        let mut bundle = FluentBundle::new_concurrent(vec![locale.clone()]);
        // Chat clients render the Unicode isolation marks literally
        bundle.set_use_isolating(false);

        let resource = FluentResource::try_new(source.to_string())
            .map_err(|(_, errors)| anyhow!("Invalid {locale} messages: {errors:?}"))?;
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow!("Duplicate {locale} messages: {errors:?}"))?;

        Ok(bundle)
    }

    /// Get a localized message
    pub fn get_message(&self, key: &str, args: Option<&HashMap<&str, &str>>) -> String {
        let msg = match self.bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {}", key),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {}", key),
        };

        let fluent_args = args.map(|args| {
            let mut fluent_args = FluentArgs::new();
            for (k, v) in args {
                fluent_args.set(*k, FluentValue::from(*v));
            }
            fluent_args
        });

        let mut errors = vec![];
        self.bundle
            .format_pattern(pattern, fluent_args.as_ref(), &mut errors)
            .into_owned()
    }

    /// Get a localized message with simple string arguments
    pub fn get_message_with_args(&self, key: &str, args: &[(&str, &str)]) -> String {
        let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
        self.get_message(key, Some(&args_map))
    }
}

/// Global localization instance
static LOCALIZATION_MANAGER: LazyLock<Result<LocalizationManager>> =
    LazyLock::new(LocalizationManager::new);

/// Initialize the global localization manager, surfacing resource errors early
pub fn init_localization() -> Result<()> {
    LOCALIZATION_MANAGER
        .as_ref()
        .map(|_| ())
        .map_err(|e| anyhow!("Localization failed to load: {e}"))
}

/// Convenience function to get a localized message
pub fn t(key: &str) -> String {
    match LOCALIZATION_MANAGER.as_ref() {
        Ok(manager) => manager.get_message(key, None),
        Err(_) => format!("Missing translation: {}", key),
    }
}

/// Convenience function to get a localized message with arguments
pub fn t_args(key: &str, args: &[(&str, &str)]) -> String {
    match LOCALIZATION_MANAGER.as_ref() {
        Ok(manager) => manager.get_message_with_args(key, args),
        Err(_) => format!("Missing translation: {}", key),
    }
}
