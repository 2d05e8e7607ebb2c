//! Query generation: turns a piece of input text into an ordered list of
//! [`SearchQuery`] candidates for the dictionary store to search.
//!
//! Three independent generators exist, grounded one-to-one on
//! `original_source/src/dict/{exact,mecab,deconjugation}querygenerator.cpp`:
//! [`ExactQueryGenerator`] (naive prefix slicing, always valid, used as a
//! fallback), [`MeCabQueryGenerator`] (lattice segmentation via
//! [`crate::mecab_adapter`]), and [`DeconjugationQueryGenerator`] (rule-based
//! conjugation reversal via [`crate::deconjugator`]). All three share the
//! [`QueryGenerator`] trait so a caller can run them uniformly and
//! concatenate their results.

use std::collections::HashSet;

use crate::deconjugator::{self, WordForm};
use crate::mecab_adapter::MeCabAdapter;

/// Which generator produced a [`SearchQuery`]. Carried through to the
/// dictionary store so match-type scoring can weigh sources differently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QuerySource {
    Exact,
    MeCab,
    Deconj,
}

/// One candidate to look up in the dictionary store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchQuery {
    pub source: QuerySource,
    /// The string used as the actual dictionary lookup key.
    pub deconj: String,
    /// The original substring this query was derived from, preserved for
    /// cloze/sentence-span generation.
    pub surface: String,
    /// Part-of-speech tags (`v5`, `v1`, `vk`, `vs`, `adj-i`) this query is
    /// restricted to matching against. Empty means unrestricted.
    pub rule_filter: HashSet<String>,
    /// Human-readable derivation chain, populated by the deconjugation
    /// generator for display in the UI.
    pub explanation: String,
}

impl SearchQuery {
    fn new(source: QuerySource, deconj: impl Into<String>, surface: impl Into<String>) -> Self {
        Self {
            source,
            deconj: deconj.into(),
            surface: surface.into(),
            rule_filter: HashSet::new(),
            explanation: String::new(),
        }
    }
}

/// Common interface implemented by every query generator.
pub trait QueryGenerator {
    /// Whether the generator is usable; an invalid generator always returns
    /// an empty list from [`QueryGenerator::generate_queries`].
    fn valid(&self) -> bool;
    fn generate_queries(&self, text: &str) -> Vec<SearchQuery>;
}

/// Fallback generator: slices `text` into successively shorter code-point
/// prefixes and searches each one verbatim.
#[derive(Default, Clone, Copy, Debug)]
pub struct ExactQueryGenerator;

impl QueryGenerator for ExactQueryGenerator {
    fn valid(&self) -> bool {
        true
    }

    fn generate_queries(&self, text: &str) -> Vec<SearchQuery> {
        let chars: Vec<char> = text.chars().collect();
        let mut queries = Vec::with_capacity(chars.len());
        for end in (1..=chars.len()).rev() {
            let slice: String = chars[..end].iter().collect();
            queries.push(SearchQuery::new(QuerySource::Exact, slice.clone(), slice));
        }
        queries
    }
}

/// Wraps [`MeCabAdapter`] as a [`QueryGenerator`].
pub struct MeCabQueryGenerator {
    adapter: MeCabAdapter,
}

impl MeCabQueryGenerator {
    pub fn new() -> Self {
        Self {
            adapter: MeCabAdapter::new(),
        }
    }
}

impl Default for MeCabQueryGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryGenerator for MeCabQueryGenerator {
    fn valid(&self) -> bool {
        self.adapter.valid()
    }

    fn generate_queries(&self, text: &str) -> Vec<SearchQuery> {
        if !self.valid() || text.is_empty() {
            return Vec::new();
        }
        self.adapter.generate_queries(text)
    }
}

/// Maps a deconjugation's innermost (terminal) word form to the rule-filter
/// tag dictionaries use for part-of-speech restriction.
fn wordform_to_rule(form: WordForm) -> &'static str {
    match form {
        WordForm::GodanVerb => "v5",
        WordForm::IchidanVerb => "v1",
        WordForm::KuruVerb => "vk",
        WordForm::SuruVerb => "vs",
        WordForm::Adjective => "adj-i",
        _ => "",
    }
}

/// Wraps [`crate::deconjugator::deconjugate`] as a [`QueryGenerator`].
#[derive(Default, Clone, Copy, Debug)]
pub struct DeconjugationQueryGenerator;

impl QueryGenerator for DeconjugationQueryGenerator {
    fn valid(&self) -> bool {
        true
    }

    fn generate_queries(&self, text: &str) -> Vec<SearchQuery> {
        if text.is_empty() {
            return Vec::new();
        }

        let infos = deconjugator::deconjugate(text, true);
        let mut result: Vec<SearchQuery> = Vec::new();
        for info in infos {
            let first_derivation = match info.derivations.first() {
                Some(f) => *f,
                None => continue,
            };
            let rule = wordform_to_rule(first_derivation);

            let existing = result.iter_mut().find(|q| {
                q.deconj == info.base && q.explanation == info.derivation_display
            });
            if let Some(existing) = existing {
                if !rule.is_empty() {
                    existing.rule_filter.insert(rule.to_string());
                }
            } else {
                let mut query = SearchQuery::new(QuerySource::Deconj, info.base, info.conjugated);
                if !rule.is_empty() {
                    query.rule_filter.insert(rule.to_string());
                }
                query.explanation = info.derivation_display;
                result.push(query);
            }
        }
        result
    }
}

/// Runs all three generators over `text` and concatenates their results, in
/// the order exact, MeCab, deconjugation — the order the dictionary store
/// uses when scoring ties between otherwise-equal matches.
pub fn generate_all_queries(
    text: &str,
    mecab: &MeCabQueryGenerator,
) -> Vec<SearchQuery> {
    let mut queries = ExactQueryGenerator.generate_queries(text);
    queries.extend(mecab.generate_queries(text));
    queries.extend(DeconjugationQueryGenerator.generate_queries(text));
    queries
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn exact_generator_emits_every_prefix() {
        let queries = ExactQueryGenerator.generate_queries("abc");
        let slices: Vec<&str> = queries.iter().map(|q| q.deconj.as_str()).collect();
        assert_eq!(slices, vec!["abc", "ab", "a"]);
    }

    #[test]
    fn exact_generator_respects_codepoint_boundaries() {
        let queries = ExactQueryGenerator.generate_queries("食べる");
        let slices: Vec<&str> = queries.iter().map(|q| q.deconj.as_str()).collect();
        assert_eq!(slices, vec!["食べる", "食べ", "食"]);
    }

    #[test]
    fn exact_generator_empty_input() {
        assert!(ExactQueryGenerator.generate_queries("").is_empty());
    }

    #[test]
    fn deconjugation_generator_merges_duplicate_base_explanation_pairs() {
        let queries = DeconjugationQueryGenerator.generate_queries("食べない");
        let matches: Vec<&SearchQuery> =
            queries.iter().filter(|q| q.deconj == "食べる").collect();
        // every (base, explanation) pair collapses to exactly one query
        let mut seen = HashSet::new();
        for q in &matches {
            assert!(seen.insert(q.explanation.clone()), "duplicate explanation not merged");
        }
    }

    #[test]
    fn deconjugation_generator_tags_rule_filter() {
        let queries = DeconjugationQueryGenerator.generate_queries("食べない");
        let hit = queries.iter().find(|q| q.deconj == "食べる");
        assert!(hit.is_some());
        assert!(hit.unwrap().rule_filter.contains("v1"));
    }
}
