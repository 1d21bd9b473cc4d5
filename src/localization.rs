use anyhow::{anyhow, Result};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use std::collections::HashMap;
use unic_langid::LanguageIdentifier;

/// Language used when none (or an unsupported one) is configured
pub const DEFAULT_LANGUAGE: &str = "zh-TW";

const RESOURCES: &[(&str, &str)] = &[
    ("zh-TW", include_str!("../locales/zh-TW/main.ftl")),
    ("en", include_str!("../locales/en/main.ftl")),
];

/// Localized bot texts
///
/// Owned by the bot context rather than stored globally, so tests can build
/// one per language.
pub struct Localization {
    bundles: HashMap<&'static str, FluentBundle<FluentResource>>,
    language: &'static str,
}

impl std::fmt::Debug for Localization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Localization")
            .field("language", &self.language)
            .finish()
    }
}

impl Localization {
    /// Create a localization for `language`, falling back to [`DEFAULT_LANGUAGE`]
    pub fn new(language: Option<&str>) -> Result<Self> {
        let mut bundles = HashMap::new();
        for (code, source) in RESOURCES {
            bundles.insert(*code, Self::create_bundle(code, source)?);
        }

        Ok(Self {
            bundles,
            language: detect_language(language),
        })
    }

    fn create_bundle(code: &str, source: &str) -> Result<FluentBundle<FluentResource>> {
        let locale: LanguageIdentifier = code.parse()?;
        let mut bundle = FluentBundle::new_concurrent(vec![locale]);
        // Keep URIs and names free of bidi isolation marks
        bundle.set_use_isolating(false);

        let resource = FluentResource::try_new(source.to_string())
            .map_err(|(_, errors)| anyhow!("invalid {code} resource: {errors:?}"))?;
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow!("duplicate messages in {code} resource: {errors:?}"))?;

        Ok(bundle)
    }

    pub fn language(&self) -> &str {
        self.language
    }

    /// Get a localized message
    pub fn t(&self, key: &str) -> String {
        self.get_message(key, None)
    }

    /// Get a localized message with simple string arguments
    pub fn t_args(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut fluent_args = FluentArgs::new();
        for (name, value) in args {
            fluent_args.set(*name, FluentValue::from(*value));
        }
        self.get_message(key, Some(&fluent_args))
    }

    fn get_message(&self, key: &str, args: Option<&FluentArgs>) -> String {
        let Some(bundle) = self
            .bundles
            .get(self.language)
            .or_else(|| self.bundles.get(DEFAULT_LANGUAGE))
        else {
            return format!("Missing translation: {key}");
        };

        let Some(pattern) = bundle.get_message(key).and_then(|msg| msg.value()) else {
            return format!("Missing translation: {key}");
        };

        let mut errors = vec![];
        bundle.format_pattern(pattern, args, &mut errors).into_owned()
    }
}

/// Map a language tag to a supported language
pub fn detect_language(language: Option<&str>) -> &'static str {
    match language.map(|l| l.trim().to_lowercase()) {
        Some(l) if l == "en" || l.starts_with("en-") => "en",
        _ => DEFAULT_LANGUAGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_detection() {
        assert_eq!(detect_language(Some("en")), "en");
        assert_eq!(detect_language(Some("en-US")), "en");
        assert_eq!(detect_language(Some("zh-TW")), "zh-TW");
        assert_eq!(detect_language(None), "zh-TW");
        assert_eq!(detect_language(Some("fr")), "zh-TW");
    }

    #[test]
    fn test_missing_key() {
        let texts = Localization::new(None).unwrap();
        assert_eq!(texts.t("nope"), "Missing translation: nope");
    }
}
