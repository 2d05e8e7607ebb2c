//! Text pre-/post-processor plumbing used by [`crate::translator::Translator`]
//! to build alternate surface forms of a lookup string before/after running
//! it through the [`crate::language_transformer::transformer::LanguageTransformer`].

use fancy_regex::Regex;

/// A single toggle value a [`TextProcessor`] can be invoked with. Most
/// processors in this crate are boolean on/off switches.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TextProcessorSetting {
    Bool(bool),
    Str(String),
}

pub type TextProcessorFn = fn(&str, &TextProcessorSetting) -> String;

#[derive(Clone)]
pub struct TextProcessor {
    pub name: &'static str,
    pub description: &'static str,
    pub options: Vec<TextProcessorSetting>,
    pub process: TextProcessorFn,
}

pub type AnyTextProcessor = TextProcessor;

#[derive(Clone)]
pub struct TextProcessorWithId {
    pub id: &'static str,
    pub processor: TextProcessor,
}

pub struct LanguageAndProcessors {
    pub iso: &'static str,
    pub pre: Vec<TextProcessorWithId>,
    pub post: Vec<TextProcessorWithId>,
}

pub type ReadingNormalizer = fn(&str) -> String;

pub struct LanguageAndReadingNormalizer {
    pub iso: &'static str,
    pub reading_normalizer: ReadingNormalizer,
}

/// One compiled entry of a profile's text-replacement configuration
/// (see `settings::TranslationTextReplacementGroup`).
#[derive(Clone, Debug)]
pub struct FindTermsTextReplacement {
    pub pattern: Regex,
    pub replacement: String,
    pub is_global: bool,
}

/// Outer vec is "replacement groups"; `None` slots are disabled groups that
/// are still positionally tracked so replacement ids line up with the profile.
pub type FindTermsTextReplacements = Vec<Option<Vec<FindTermsTextReplacement>>>;
