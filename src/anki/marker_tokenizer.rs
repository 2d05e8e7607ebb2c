//! Parses Anki field template strings into marker tokens.
//!
//! A field template is free text interspersed with `{marker}` tokens. A
//! token may list several `|`-separated alternatives (`{sentence|expression}`),
//! each carrying its own `key=value` arguments
//! (`{glossary:compact-tags=true,mode=short}`). The note builder evaluates
//! alternatives left to right and keeps the first one that produces
//! non-empty content.

use fancy_regex::Regex;
use indexmap::IndexMap;
use std::sync::LazyLock;

static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{.*?\}").unwrap());

/// One `name:k=v,...` alternative inside a token.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Marker {
    pub name: String,
    pub args: IndexMap<String, String>,
}

/// A `{...}` span from a field template: its raw text and the list of
/// `|`-separated alternatives found inside it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Token {
    pub raw: String,
    pub markers: Vec<Marker>,
}

/// Splits `text` into the literal spans between markers and the markers
/// themselves, in order, so a caller can rebuild the filled-in field by
/// walking the list once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Marker(Token),
}

/// Finds every `{...}` token in `text` and parses its marker alternatives.
///
/// A malformed alternative (more than one `:`, or an arg that isn't a single
/// `k=v` pair) drops that one alternative; a token that ends up with zero
/// valid alternatives is dropped entirely, matching the original parser's
/// `break`-out-of-the-alternative behavior.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    for m in TOKEN_PATTERN.find_iter(text) {
        let Ok(m) = m else { continue };
        let raw = m.as_str().to_string();
        let inner = &raw[1..raw.len() - 1];

        let mut markers = Vec::new();
        for alt in inner.split('|') {
            let parts: Vec<&str> = alt.splitn(3, ':').collect();
            if parts.is_empty() {
                break;
            }
            let name = parts[0].trim().to_string();
            if parts.len() == 1 {
                markers.push(Marker {
                    name,
                    args: IndexMap::new(),
                });
                continue;
            }
            if parts.len() != 2 {
                break;
            }
            let mut args = IndexMap::new();
            for arg in parts[1].split(',') {
                let kv: Vec<&str> = arg.splitn(3, '=').collect();
                if kv.len() != 2 {
                    continue;
                }
                args.insert(kv[0].trim().to_string(), kv[1].trim().to_string());
            }
            markers.push(Marker { name, args });
        }
        if !markers.is_empty() {
            tokens.push(Token { raw, markers });
        }
    }
    tokens
}

/// Same scan as [`tokenize`], but also yields the literal text between and
/// around tokens, so a renderer can reassemble the full field string.
pub fn segment(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last_end = 0;

    for m in TOKEN_PATTERN.find_iter(text) {
        let Ok(m) = m else { continue };
        if m.start() > last_end {
            segments.push(Segment::Literal(text[last_end..m.start()].to_string()));
        }
        let tokens = tokenize(m.as_str());
        if let Some(token) = tokens.into_iter().next() {
            segments.push(Segment::Marker(token));
        } else {
            segments.push(Segment::Literal(m.as_str().to_string()));
        }
        last_end = m.end();
    }
    if last_end < text.len() {
        segments.push(Segment::Literal(text[last_end..].to_string()));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tokenizes_simple_marker() {
        let tokens = tokenize("{expression}");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].markers[0].name, "expression");
        assert!(tokens[0].markers[0].args.is_empty());
    }

    #[test]
    fn tokenizes_marker_with_args() {
        let tokens = tokenize("{glossary:compact-tags=true,mode=short}");
        let m = &tokens[0].markers[0];
        assert_eq!(m.name, "glossary");
        assert_eq!(m.args.get("compact-tags").map(String::as_str), Some("true"));
        assert_eq!(m.args.get("mode").map(String::as_str), Some("short"));
    }

    #[test]
    fn tokenizes_fallback_alternatives() {
        let tokens = tokenize("{furigana-plain|expression}");
        assert_eq!(tokens[0].markers.len(), 2);
        assert_eq!(tokens[0].markers[0].name, "furigana-plain");
        assert_eq!(tokens[0].markers[1].name, "expression");
    }

    #[test]
    fn drops_malformed_alternative_but_keeps_others() {
        let tokens = tokenize("{good|bad:extra:colons|also-good}");
        let names: Vec<&str> = tokens[0].markers.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["good"]);
    }

    #[test]
    fn segments_literal_and_marker_text() {
        let segs = segment("front: {expression} back");
        assert_eq!(
            segs,
            vec![
                Segment::Literal("front: ".to_string()),
                Segment::Marker(Token {
                    raw: "{expression}".to_string(),
                    markers: vec![Marker {
                        name: "expression".to_string(),
                        args: IndexMap::new()
                    }],
                }),
                Segment::Literal(" back".to_string()),
            ]
        );
    }

    #[test]
    fn ignores_plain_text_with_no_markers() {
        assert!(tokenize("no markers here").is_empty());
    }
}
