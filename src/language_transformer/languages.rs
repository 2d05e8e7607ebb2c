//! Per-language registration: which text processors run before/after
//! deinflection, and which reading normalizer a language uses. Only Japanese
//! is wired up; other languages fall through [`crate::translator::Translator`]'s
//! `UnsupportedLanguage` error.

use super::ja::japanese::{convert_hiragana_to_katakana, convert_katakana_to_hiragana};
use super::ja::transforms::JAPANESE_TRANSFORM_DESCRIPTOR;
use super::language_d::{
    LanguageAndProcessors, LanguageAndReadingNormalizer, TextProcessor, TextProcessorFn, TextProcessorSetting,
    TextProcessorWithId,
};
use super::transformer::LanguageTransformDescriptor;

fn alphabetic_to_wide_noop(text: &str, _setting: &TextProcessorSetting) -> String {
    text.to_string()
}

fn collapse_emphatic_sequences_on(text: &str, setting: &TextProcessorSetting) -> String {
    let full_collapse = matches!(setting, TextProcessorSetting::Bool(true));
    super::ja::japanese::collapse_emphatic_sequences(text, full_collapse)
}

fn standardize_kana(text: &str, setting: &TextProcessorSetting) -> String {
    match setting {
        TextProcessorSetting::Bool(true) => convert_katakana_to_hiragana(text),
        _ => text.to_string(),
    }
}

const ALPHABETIC_TO_HIRAGANA_NOOP: TextProcessorFn = alphabetic_to_wide_noop;
const COLLAPSE_EMPHATIC: TextProcessorFn = collapse_emphatic_sequences_on;
const STANDARDIZE_KANA: TextProcessorFn = standardize_kana;

fn japanese_text_processors() -> (Vec<TextProcessorWithId>, Vec<TextProcessorWithId>) {
    let pre = vec![
        TextProcessorWithId {
            id: "collapse-emphatic-sequences",
            processor: TextProcessor {
                name: "Collapse emphatic character sequences",
                description: "Collapses ーーー and っっっ style emphasis down to one or two characters",
                options: vec![TextProcessorSetting::Bool(false), TextProcessorSetting::Bool(true)],
                process: COLLAPSE_EMPHATIC,
            },
        },
        TextProcessorWithId {
            id: "standardize-kana",
            processor: TextProcessor {
                name: "Standardize kana",
                description: "Converts katakana to hiragana before deinflection so both scripts hit the same rules",
                options: vec![TextProcessorSetting::Bool(false), TextProcessorSetting::Bool(true)],
                process: STANDARDIZE_KANA,
            },
        },
    ];
    let post = vec![TextProcessorWithId {
        id: "alphabetic-to-hiragana",
        processor: TextProcessor {
            name: "Alphabetic to hiragana",
            description: "Reserved for romaji input; currently a passthrough",
            options: vec![TextProcessorSetting::Bool(false)],
            process: ALPHABETIC_TO_HIRAGANA_NOOP,
        },
    }];
    (pre, post)
}

pub fn get_all_language_text_processors() -> Vec<LanguageAndProcessors> {
    let (pre, post) = japanese_text_processors();
    vec![LanguageAndProcessors { iso: "ja", pre, post }]
}

fn normalize_japanese_reading(reading: &str) -> String {
    convert_hiragana_to_katakana(reading)
}

pub fn get_all_language_reading_normalizers() -> Vec<LanguageAndReadingNormalizer> {
    vec![LanguageAndReadingNormalizer { iso: "ja", reading_normalizer: normalize_japanese_reading }]
}

pub fn get_all_language_transform_descriptors() -> Vec<(&'static str, &'static LanguageTransformDescriptor)> {
    vec![("ja", &JAPANESE_TRANSFORM_DESCRIPTOR)]
}
