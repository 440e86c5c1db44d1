//! Query text normalization
//!
//! Reduces a query to a canonical stemmed form so that inflected words match
//! stored keywords: tokens split on whitespace, lowercased, Snowball-stemmed,
//! rejoined with single spaces.

use std::fmt;
use std::str::FromStr;

use rust_stemmers::{Algorithm, Stemmer};

use crate::config::ConfigError;

/// Upper bound on repeated stemming of one token
const MAX_STEM_PASSES: usize = 8;

/// Languages with a Snowball stemmer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StemLanguage {
    #[default]
    Russian,
    English,
    German,
    French,
    Spanish,
    Italian,
    Portuguese,
    Dutch,
    Swedish,
    Norwegian,
    Danish,
    Finnish,
    Hungarian,
    Romanian,
    Turkish,
}

impl StemLanguage {
    fn algorithm(self) -> Algorithm {
        match self {
            StemLanguage::Russian => Algorithm::Russian,
            StemLanguage::English => Algorithm::English,
            StemLanguage::German => Algorithm::German,
            StemLanguage::French => Algorithm::French,
            StemLanguage::Spanish => Algorithm::Spanish,
            StemLanguage::Italian => Algorithm::Italian,
            StemLanguage::Portuguese => Algorithm::Portuguese,
            StemLanguage::Dutch => Algorithm::Dutch,
            StemLanguage::Swedish => Algorithm::Swedish,
            StemLanguage::Norwegian => Algorithm::Norwegian,
            StemLanguage::Danish => Algorithm::Danish,
            StemLanguage::Finnish => Algorithm::Finnish,
            StemLanguage::Hungarian => Algorithm::Hungarian,
            StemLanguage::Romanian => Algorithm::Romanian,
            StemLanguage::Turkish => Algorithm::Turkish,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StemLanguage::Russian => "russian",
            StemLanguage::English => "english",
            StemLanguage::German => "german",
            StemLanguage::French => "french",
            StemLanguage::Spanish => "spanish",
            StemLanguage::Italian => "italian",
            StemLanguage::Portuguese => "portuguese",
            StemLanguage::Dutch => "dutch",
            StemLanguage::Swedish => "swedish",
            StemLanguage::Norwegian => "norwegian",
            StemLanguage::Danish => "danish",
            StemLanguage::Finnish => "finnish",
            StemLanguage::Hungarian => "hungarian",
            StemLanguage::Romanian => "romanian",
            StemLanguage::Turkish => "turkish",
        }
    }
}

impl FromStr for StemLanguage {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let language = match s.trim().to_lowercase().as_str() {
            "russian" | "ru" => StemLanguage::Russian,
            "english" | "en" => StemLanguage::English,
            "german" | "de" => StemLanguage::German,
            "french" | "fr" => StemLanguage::French,
            "spanish" | "es" => StemLanguage::Spanish,
            "italian" | "it" => StemLanguage::Italian,
            "portuguese" | "pt" => StemLanguage::Portuguese,
            "dutch" | "nl" => StemLanguage::Dutch,
            "swedish" | "sv" => StemLanguage::Swedish,
            "norwegian" | "no" => StemLanguage::Norwegian,
            "danish" | "da" => StemLanguage::Danish,
            "finnish" | "fi" => StemLanguage::Finnish,
            "hungarian" | "hu" => StemLanguage::Hungarian,
            "romanian" | "ro" => StemLanguage::Romanian,
            "turkish" | "tr" => StemLanguage::Turkish,
            _ => {
                return Err(ConfigError::Invalid {
                    key: "STEM_LANGUAGE",
                    value: s.to_string(),
                    reason: "no Snowball stemmer for this language".to_string(),
                })
            }
        };
        Ok(language)
    }
}

impl fmt::Display for StemLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deterministic, idempotent query normalizer
pub struct TextNormalizer {
    language: StemLanguage,
    stemmer: Stemmer,
}

impl TextNormalizer {
    pub fn new(language: StemLanguage) -> Self {
        Self {
            language,
            stemmer: Stemmer::create(language.algorithm()),
        }
    }

    pub fn language(&self) -> StemLanguage {
        self.language
    }

    /// Normalize a query: `normalize(normalize(x)) == normalize(x)`
    pub fn normalize(&self, text: &str) -> String {
        text.split_whitespace()
            .map(|token| self.stem_token(token))
            .filter(|token| !token.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Stem until the token stops changing
    fn stem_token(&self, token: &str) -> String {
        let mut current = token.to_lowercase();
        for _ in 0..MAX_STEM_PASSES {
            let stemmed = self.stemmer.stem(&current);
            if stemmed.as_ref() == current.as_str() {
                break;
            }
            let next = stemmed.into_owned();
            current = next;
        }
        current
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(StemLanguage::default())
    }
}

impl fmt::Debug for TextNormalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextNormalizer")
            .field("language", &self.language)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_input() {
        let normalizer = TextNormalizer::default();
        assert_eq!(normalizer.normalize(""), "");
        assert_eq!(normalizer.normalize("   \t\n "), "");
    }

    #[test]
    fn test_collapses_whitespace_and_lowercases() {
        let normalizer = TextNormalizer::default();
        assert_eq!(normalizer.normalize("  Привет \t\n мир "), "привет мир");
    }

    #[test]
    fn test_inflections_share_a_stem() {
        let normalizer = TextNormalizer::default();
        assert_eq!(
            normalizer.normalize("книгами"),
            normalizer.normalize("книги")
        );
    }

    #[test]
    fn test_unstemmable_tokens_pass_through() {
        let normalizer = TextNormalizer::default();
        assert_eq!(normalizer.normalize("42 ?!"), "42 ?!");
    }

    #[test]
    fn test_english_stemmer() {
        let normalizer = TextNormalizer::new(StemLanguage::English);
        assert_eq!(normalizer.normalize("Running dogs"), "run dog");
    }

    #[test]
    fn test_parse_language() {
        assert_eq!("russian".parse::<StemLanguage>().unwrap(), StemLanguage::Russian);
        assert_eq!(" EN ".parse::<StemLanguage>().unwrap(), StemLanguage::English);
        assert!("klingon".parse::<StemLanguage>().is_err());
        assert_eq!(StemLanguage::German.to_string(), "german");
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(text in "[а-яА-ЯёЁa-zA-Z0-9 \t]{0,60}") {
            let normalizer = TextNormalizer::default();
            let once = normalizer.normalize(&text);
            prop_assert_eq!(normalizer.normalize(&once), once.clone());
        }

        #[test]
        fn prop_output_has_single_spaces(text in "[а-яa-z \t\n]{0,60}") {
            let normalizer = TextNormalizer::default();
            let out = normalizer.normalize(&text);
            prop_assert!(!out.contains("  "));
            prop_assert_eq!(out.trim(), out.as_str());
        }
    }
}
