//! Runtime (post-search) dictionary entry types.
//!
//! These are distinct from the raw on-disk schema types in
//! `database::dictionary_database` (which mirror the imported dictionary
//! file format byte-for-byte): everything here is what `Translator` hands
//! back to callers after search, merge, and tag aggregation.

use crate::dictionary_data::TermGlossaryContent;
use crate::language_transformer::transformer::InflectionRuleChainCandidate;
use serde::{Deserialize, Serialize};

#[allow(dead_code)]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumOrStr {
    Num(u64),
    Str(String),
}

/// A `number | number[]`-shaped field, as seen in pitch accent positions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VecNumOrNum {
    Num(u8),
    Vec(Vec<u8>),
}

/// Distinguishes term entries from kanji entries where both flow through
/// shared code paths (tag aggregation, frequency lookup).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DictionaryEntryType {
    Term,
    Kanji,
}

/// Key used to deduplicate inflection rule chain candidates when merging
/// dictionary entries for the same headword.
pub type EntryInflectionRuleChainCandidatesKey = (String, Vec<String>);

/// How a source's text relates to the original search text: a direct match
/// on the term itself, or on its reading/sequence number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TermSourceMatchSource {
    Term,
    Reading,
    Sequence,
}

/// The deinflection strategy that produced a source, mirroring the
/// dictionary's on-disk match type but scoped to the runtime entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TermSourceMatchType {
    Exact,
    Prefix,
    Suffix,
}

/// A tag attached to a term, kanji, headword, or definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DictionaryTag {
    pub name: String,
    pub category: String,
    pub order: usize,
    pub score: usize,
    pub content: Vec<String>,
    pub dictionaries: Vec<String>,
    /// Set once a tag has been folded into another with the same base name;
    /// redundant tags are filtered out before being shown to the caller.
    pub redundant: bool,
}

impl DictionaryTag {
    /// A tag with no corresponding entry in the dictionary's tag bank.
    pub fn new_default(name: String, dictionary: String) -> Self {
        Self {
            name,
            category: String::from("default"),
            order: 0,
            score: 0,
            content: vec![],
            dictionaries: vec![dictionary],
            redundant: false,
        }
    }
}

/// One way a looked-up string can map onto a headword: the original text,
/// what it was deinflected from, and what it deinflected to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TermSource {
    pub original_text: String,
    pub transformed_text: String,
    pub deinflected_text: String,
    pub match_type: TermSourceMatchType,
    pub match_source: TermSourceMatchSource,
    pub is_primary: bool,
}

/// A single term/reading pair within a dictionary entry, with every source
/// string that mapped onto it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TermHeadword {
    pub index: usize,
    pub term: String,
    pub reading: String,
    pub sources: Vec<TermSource>,
    pub tags: Vec<DictionaryTag>,
    pub word_classes: Vec<String>,
}

/// One dictionary's definition for a headword (or group of headwords, when
/// multiple headwords share an identical glossary).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TermDefinition {
    pub index: usize,
    pub headword_indices: Vec<usize>,
    pub dictionary: String,
    pub dictionary_index: usize,
    pub dictionary_alias: String,
    pub sequences: Vec<i128>,
    pub id: usize,
    pub score: i128,
    pub is_primary: bool,
    pub tags: Vec<DictionaryTag>,
    pub entries: Vec<TermGlossaryContent>,
    pub frequency_order: i128,
}

/// A frequency dictionary's ranking for one headword.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TermFrequency {
    pub index: usize,
    pub headword_index: usize,
    pub dictionary: String,
    pub dictionary_index: usize,
    pub dictionary_alias: String,
    pub has_reading: bool,
    pub frequency: i128,
    pub display_value: Option<String>,
    pub display_value_parsed: bool,
}

/// A pronunciation dictionary's pitch accent / phonetic transcription data
/// for one headword.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TermPronunciation {
    pub index: usize,
    pub headword_index: usize,
    pub dictionary: String,
    pub dictionary_index: usize,
    pub dictionary_alias: String,
    pub pronunciations: Vec<crate::database::dictionary_database::Pronunciation>,
}

/// A fully merged, sorted, tag-aggregated dictionary entry for a term,
/// ready to hand to the note builder or a UI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TermDictionaryEntry {
    /// Always [`TermSourceMatchSource::Term`]; kept for symmetry with
    /// [`crate::translation_internal::InternalTermDictionaryEntry`].
    pub entry_type: TermSourceMatchSource,
    pub is_primary: bool,
    pub text_processor_rule_chain_candidates:
        Vec<crate::translation_internal::TextProcessorRuleChainCandidate>,
    pub inflection_rule_chain_candidates: Vec<InflectionRuleChainCandidate>,
    pub score: i128,
    pub frequency_order: i128,
    pub dictionary_alias: String,
    pub dictionary_index: usize,
    pub source_term_exact_match_count: usize,
    pub match_primary_reading: bool,
    pub max_original_text_length: usize,
    pub headwords: Vec<TermHeadword>,
    pub definitions: Vec<TermDefinition>,
    pub pronunciations: Vec<TermPronunciation>,
    pub frequencies: Vec<TermFrequency>,
}

/// One dictionary's definition for a kanji character.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KanjiDefinition {
    pub index: usize,
    pub dictionary: String,
    pub dictionary_index: usize,
    pub dictionary_alias: String,
    pub glossary: Vec<TermGlossaryContent>,
    pub tags: Vec<DictionaryTag>,
    pub stats: std::collections::HashMap<String, String>,
}

/// A kanji character's merged dictionary entry: readings, definitions,
/// stats, and frequency/tag data pulled in the same manner as
/// [`TermDictionaryEntry`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KanjiDictionaryEntry {
    pub character: String,
    pub dictionary: String,
    pub dictionary_index: usize,
    pub dictionary_alias: String,
    pub onyomi: Vec<String>,
    pub kunyomi: Vec<String>,
    pub tags: Vec<DictionaryTag>,
    pub stats: std::collections::HashMap<String, String>,
    pub definitions: Vec<KanjiDefinition>,
    pub frequencies: Vec<TermFrequency>,
}
