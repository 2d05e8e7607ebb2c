//! Thin wrapper over the `mecab` crate that turns a lattice's best-path
//! segmentation into [`SearchQuery`] candidates, grounded on
//! `original_source/src/dict/mecabquerygenerator.cpp`.
//!
//! The original only recurses forward through `node->next`, prepending each
//! node's surface as it goes, and also fans out over `node->bnext`
//! (alternative segmentations at the same position). The `mecab` crate's
//! safe `Node` API (see `aecsocket-wordbase`'s usage of
//! `bos_node().iter_next()`) only exposes the tagger's single best path, not
//! lattice alternatives, so this adapter generates one entry per
//! best-path token-prefix — anchored at the first token, never mid-sentence
//! — without the alternate-segmentation branches the original could
//! explore.

use mecab::{Model, MECAB_BOS_NODE, MECAB_EOS_NODE};

use crate::query::{QuerySource, SearchQuery};

/// Index into a MeCab/IPADIC comma-separated feature string of the
/// deconjugated (base) form. Matches the original's `WORD_INDEX` constant;
/// this is the IPADIC layout, not UniDic's (which puts the lemma at index 7).
const WORD_INDEX: usize = 6;

struct MecabNode {
    /// Clean (whitespace-trimmed) surface text of this token.
    surface: String,
    /// This token's own deconjugated form, or `None` if its feature's word
    /// field was `*`.
    deconjugated: Option<String>,
}

fn extract_deconjugation(feature: &str) -> Option<String> {
    let field = feature.split(',').nth(WORD_INDEX)?;
    if field == "*" {
        None
    } else {
        Some(field.to_string())
    }
}

/// Long-lived MeCab tagger, backed by the default (or `-r`/`-d`-configured)
/// IPADIC model.
pub struct MeCabAdapter {
    model: Option<Model>,
}

impl MeCabAdapter {
    /// Initializes a tagger against the system's default MeCab dictionary
    /// configuration. If MeCab fails to load (missing dictionary, bad
    /// path), the adapter is left invalid and every `generate_queries` call
    /// returns an empty list rather than panicking.
    pub fn new() -> Self {
        let model = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| Model::new(""))).ok();
        Self { model }
    }

    pub fn valid(&self) -> bool {
        self.model.is_some()
    }

    pub fn generate_queries(&self, text: &str) -> Vec<SearchQuery> {
        let Some(model) = &self.model else {
            return Vec::new();
        };
        if text.is_empty() {
            return Vec::new();
        }

        let tagger = model.create_tagger();
        let mut lattice = model.create_lattice();
        lattice.set_sentence(text.to_string());
        if !tagger.parse(&lattice) {
            return Vec::new();
        }

        let nodes: Vec<MecabNode> = lattice
            .bos_node()
            .iter_next()
            .filter(|node| {
                let stat = i32::from(node.stat);
                stat != MECAB_BOS_NODE && stat != MECAB_EOS_NODE
            })
            .map(|node| {
                let feature = node.feature.to_string();
                MecabNode {
                    surface: node.surface.to_string(),
                    deconjugated: extract_deconjugation(&feature),
                }
            })
            .collect();

        generate_queries_from_nodes(&nodes)
    }
}

impl Default for MeCabAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// For every end position `j` whose own token has a deconjugated form,
/// emits a single query anchored at the first token: the surface is the
/// concatenation of tokens `0..=j`, and the lookup key is that same
/// concatenation with the final token's surface replaced by its
/// deconjugated form. Mirrors the original's `generateQueriesHelper`,
/// which only ever recurses forward through `node->next` and prepends the
/// current surface — every result starts at offset 0, never mid-sentence.
fn generate_queries_from_nodes(nodes: &[MecabNode]) -> Vec<SearchQuery> {
    let mut queries = Vec::new();
    for j in 0..nodes.len() {
        let Some(deconj_j) = &nodes[j].deconjugated else {
            continue;
        };
        let mut surface = String::new();
        let mut deconj = String::new();
        for node in &nodes[..j] {
            surface.push_str(&node.surface);
            deconj.push_str(&node.surface);
        }
        surface.push_str(&nodes[j].surface);
        deconj.push_str(deconj_j);

        queries.push(SearchQuery {
            source: QuerySource::MeCab,
            deconj,
            surface,
            rule_filter: Default::default(),
            explanation: String::new(),
        });
    }
    queries
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn node(surface: &str, deconj: Option<&str>) -> MecabNode {
        MecabNode {
            surface: surface.to_string(),
            deconjugated: deconj.map(str::to_string),
        }
    }

    #[test]
    fn single_span_per_token_when_no_forward_extension() {
        let nodes = vec![node("猫", Some("猫")), node("が", None)];
        let queries = generate_queries_from_nodes(&nodes);
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].surface, "猫");
        assert_eq!(queries[0].deconj, "猫");
    }

    #[test]
    fn multi_token_span_concatenates_surfaces() {
        let nodes = vec![node("食べ", None), node("た", Some("食べた"))];
        let queries = generate_queries_from_nodes(&nodes);
        // only j=1 (た) has a deconjugated form, anchored back to node 0
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].surface, "食べた");
        assert_eq!(queries[0].deconj, "食べ食べた");
    }

    #[test]
    fn extract_deconjugation_skips_star_field() {
        assert_eq!(extract_deconjugation("名詞,一般,*,*,*,*,*"), None);
        assert_eq!(
            extract_deconjugation("動詞,自立,*,*,五段・カ行イ音便,基本形,行く,イク,イク"),
            Some("行く".to_string())
        );
    }
}
