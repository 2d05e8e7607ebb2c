use std::collections::HashMap;

use fancy_regex::Regex;
use indexmap::IndexMap;

/// Where an inflection rule chain candidate came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum InflectionSource {
    /// Derived purely by running the text through the [`LanguageTransformer`].
    Algorithm,
    /// Taken from a dictionary's own deinflection metadata.
    Dictionary,
    /// Both the algorithm and a dictionary agree on this chain.
    Both,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InternalInflectionRuleChainCandidate {
    pub source: InflectionSource,
    pub inflection_rules: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InflectionRuleChainCandidate {
    pub source: InflectionSource,
    pub inflection_rules: Vec<InflectionRule>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InflectionRule {
    pub name: String,
    pub description: Option<String>,
}

/// A single step taken while reverse-conjugating a piece of text.
#[derive(Clone, Debug, PartialEq)]
pub struct TraceFrame {
    pub text: String,
    pub transform: String,
    pub rule_index: usize,
}

pub type Trace = Vec<TraceFrame>;

/// One candidate produced while transforming a surface string.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformedText {
    pub text: String,
    pub conditions: u32,
    pub trace: Trace,
}

/// `(base_ending, conjugated_ending, base_form, conjugated_form)` from the spec,
/// expressed as a suffix-replacement rule with bitflag condition names.
#[derive(Clone, Debug)]
pub struct SuffixRule {
    pub is_inflected: Regex,
    pub deinflected: &'static str,
    pub conditions_in: &'static [&'static str],
    pub conditions_out: &'static [&'static str],
}

impl PartialEq for SuffixRule {
    fn eq(&self, other: &Self) -> bool {
        self.is_inflected.as_str() == other.is_inflected.as_str()
            && self.deinflected == other.deinflected
            && self.conditions_in == other.conditions_in
            && self.conditions_out == other.conditions_out
    }
}

/// Builds a suffix rule matching `inflected_suffix` at the end of a word and
/// replacing it with `deinflected_suffix`.
pub fn suffix_inflection(
    inflected_suffix: &'static str,
    deinflected_suffix: &'static str,
    conditions_in: &'static [&'static str],
    conditions_out: &'static [&'static str],
) -> SuffixRule {
    let pattern = format!("{inflected_suffix}$");
    SuffixRule {
        is_inflected: Regex::new(&pattern).expect("static suffix pattern must compile"),
        deinflected: deinflected_suffix,
        conditions_in,
        conditions_out,
    }
}

impl SuffixRule {
    pub fn deinflect(&self, text: &str) -> String {
        let Ok(Some(m)) = self.is_inflected.find(text) else {
            return text.to_string();
        };
        let base_len = text.len() - m.as_str().len();
        format!("{}{}", &text[..base_len], self.deinflected)
    }
}

#[derive(Clone, Debug)]
pub struct Transform {
    pub name: &'static str,
    pub description: Option<&'static str>,
    pub rules: Vec<SuffixRule>,
}

pub type TransformMap = IndexMap<&'static str, Transform>;

/// A named grammatical condition a [`TransformedText`] can be in, e.g. `v1` (ichidan
/// dictionary form) or `-masu` (polite stem). `is_terminal` marks conditions that are
/// valid stopping points for a deconjugation chain (spec invariant 2).
#[derive(Clone, Copy, Debug)]
pub struct Condition {
    pub name: &'static str,
    pub is_terminal: bool,
}

pub type ConditionMap = IndexMap<&'static str, Condition>;

pub struct LanguageTransformDescriptor {
    pub conditions: &'static ConditionMap,
    pub transforms: &'static TransformMap,
}

/// Maximum number of chained suffix strips applied to a single input. Bounds
/// the search per spec 4.1's "pathological inputs are bounded" failure semantics.
const MAX_CHAIN_DEPTH: usize = 8;

/// Rule-driven backward conjugation engine for a single language.
pub struct LanguageTransformer {
    transforms: Vec<(&'static str, SuffixRule)>,
    condition_flags: HashMap<&'static str, u32>,
    terminal_flags: u32,
}

impl LanguageTransformer {
    pub fn from_descriptor(descriptor: &LanguageTransformDescriptor) -> Self {
        let mut condition_flags = HashMap::new();
        let mut terminal_flags = 0u32;
        for (i, (name, condition)) in descriptor.conditions.iter().enumerate() {
            let flag = 1u32 << i.min(30);
            condition_flags.insert(*name, flag);
            if condition.is_terminal {
                terminal_flags |= flag;
            }
        }
        let mut transforms = Vec::new();
        for (name, transform) in descriptor.transforms.iter() {
            for rule in &transform.rules {
                transforms.push((*name, rule.clone()));
            }
        }
        Self {
            transforms,
            condition_flags,
            terminal_flags,
        }
    }

    fn flags_of(&self, names: &[&'static str]) -> u32 {
        names
            .iter()
            .fold(0u32, |acc, n| acc | self.condition_flags.get(n).copied().unwrap_or(0))
    }

    pub fn is_terminal(&self, conditions: u32) -> bool {
        conditions != 0 && (conditions & self.terminal_flags) != 0
    }

    /// `currentConditions == 0` means "no constraint yet"; otherwise at least one
    /// bit must be shared, per spec 4.1 step 2.
    fn conditions_match(current: u32, required: u32) -> bool {
        current == 0 || required == 0 || (current & required) != 0
    }

    /// Depth-first reverse-conjugation search (spec 4.1 algorithm). Returns every
    /// intermediate and terminal state reached; callers filter for terminals
    /// when only dictionary-form candidates are wanted.
    pub fn transform(&self, text: &str) -> Vec<TransformedText> {
        let mut results = Vec::new();
        let mut seen = std::collections::HashSet::new();
        let start = TransformedText {
            text: text.to_string(),
            conditions: 0,
            trace: Vec::new(),
        };
        let mut stack = vec![start.clone()];
        results.push(start);
        seen.insert((text.to_string(), 0u32));

        while let Some(current) = stack.pop() {
            if current.trace.len() >= MAX_CHAIN_DEPTH {
                continue;
            }
            for (rule_index, (transform_name, rule)) in self.transforms.iter().enumerate() {
                let conditions_in = self.flags_of(rule.conditions_in);
                if !Self::conditions_match(current.conditions, conditions_in) {
                    continue;
                }
                let Ok(is_match) = rule.is_inflected.is_match(&current.text) else {
                    continue;
                };
                if !is_match {
                    continue;
                }
                let deinflected = rule.deinflect(&current.text);
                if deinflected == current.text {
                    continue;
                }
                let conditions_out = self.flags_of(rule.conditions_out);
                let key = (deinflected.clone(), conditions_out);
                if !seen.insert(key) {
                    continue;
                }
                let mut trace = current.trace.clone();
                trace.push(TraceFrame {
                    text: current.text.clone(),
                    transform: (*transform_name).to_string(),
                    rule_index,
                });
                let next = TransformedText {
                    text: deinflected,
                    conditions: conditions_out,
                    trace,
                };
                results.push(next.clone());
                stack.push(next);
            }
        }

        results
    }

    /// User-facing inflection rule descriptions for a chain of rule ids.
    pub fn get_user_facing_inflection_rules(&self, rule_names: &[&str]) -> Vec<InflectionRule> {
        rule_names
            .iter()
            .map(|name| InflectionRule {
                name: (*name).to_string(),
                description: None,
            })
            .collect()
    }
}
