//! Japanese script utilities: codepoint classification, kana conversion, and
//! furigana/pitch-accent helpers shared by the translator and note builder.

use std::{collections::HashMap, sync::LazyLock};

pub const HIRAGANA_SMALL_TSU_CODE_POINT: u32 = 0x3063;
pub const KATAKANA_SMALL_TSU_CODE_POINT: u32 = 0x30c3;
pub const KANA_PROLONGED_SOUND_MARK_CODE_POINT: u32 = 0x30fc;

const HIRAGANA_RANGE: (u32, u32) = (0x3040, 0x309f);
const KATAKANA_RANGE: (u32, u32) = (0x30a0, 0x30ff);
const CJK_UNIFIED_RANGE: (u32, u32) = (0x4e00, 0x9fff);
const CJK_EXT_A_RANGE: (u32, u32) = (0x3400, 0x4dbf);
const CJK_COMPAT_RANGE: (u32, u32) = (0xf900, 0xfaff);
const HALFWIDTH_KATAKANA_RANGE: (u32, u32) = (0xff65, 0xff9f);

const JAPANESE_RANGES: &[(u32, u32)] = &[
    HIRAGANA_RANGE,
    KATAKANA_RANGE,
    CJK_UNIFIED_RANGE,
    CJK_EXT_A_RANGE,
    CJK_COMPAT_RANGE,
    HALFWIDTH_KATAKANA_RANGE,
];

const KANA_RANGES: &[(u32, u32)] = &[HIRAGANA_RANGE, KATAKANA_RANGE, HALFWIDTH_KATAKANA_RANGE];

fn is_code_point_in_range(code_point: u32, range: (u32, u32)) -> bool {
    code_point >= range.0 && code_point <= range.1
}

fn is_code_point_in_ranges(code_point: u32, ranges: &[(u32, u32)]) -> bool {
    ranges.iter().any(|r| is_code_point_in_range(code_point, *r))
}

pub fn is_code_point_kana(code_point: u32) -> bool {
    is_code_point_in_ranges(code_point, KANA_RANGES)
}

pub fn is_code_point_japanese(code_point: u32) -> bool {
    is_code_point_in_ranges(code_point, JAPANESE_RANGES)
}

pub fn is_char_kana(c: char) -> bool {
    is_code_point_kana(c as u32)
}

pub fn is_string_entirely_kana<T: AsRef<str>>(text: T) -> bool {
    let text = text.as_ref();
    !text.is_empty() && text.chars().all(is_char_kana)
}

pub fn is_string_partially_japanese<T: AsRef<str>>(text: T) -> bool {
    text.as_ref()
        .chars()
        .any(|c| is_code_point_japanese(c as u32))
}

static KATAKANA_TO_HIRAGANA: LazyLock<HashMap<char, char>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for c in '\u{30a1}'..='\u{30f6}' {
        if let Some(hira) = char::from_u32(c as u32 - 0x60) {
            map.insert(c, hira);
        }
    }
    map
});

static HIRAGANA_TO_KATAKANA: LazyLock<HashMap<char, char>> = LazyLock::new(|| {
    KATAKANA_TO_HIRAGANA
        .iter()
        .map(|(k, v)| (*v, *k))
        .collect()
});

pub fn convert_katakana_to_hiragana<T: AsRef<str>>(text: T) -> String {
    text.as_ref()
        .chars()
        .map(|c| *KATAKANA_TO_HIRAGANA.get(&c).unwrap_or(&c))
        .collect()
}

pub fn convert_hiragana_to_katakana<T: AsRef<str>>(text: T) -> String {
    text.as_ref()
        .chars()
        .map(|c| *HIRAGANA_TO_KATAKANA.get(&c).unwrap_or(&c))
        .collect()
}

/// Rough mora count for a kana string: each character counts as one mora
/// except small kana (ゃゅょぁぃぅぇぉ, prolongation marks) which attach to the
/// preceding mora.
pub fn get_kana_mora_count<T: AsRef<str>>(text: T) -> u16 {
    const SMALL_KANA: &str = "ゃゅょぁぃぅぇぉャュョァィゥェォ";
    let mut count = 0u16;
    for c in text.as_ref().chars() {
        if SMALL_KANA.contains(c) {
            continue;
        }
        count += 1;
    }
    count
}

pub fn is_mora_pitch_high(mora_index: usize, pitch_accent_downstep_position: usize) -> bool {
    match pitch_accent_downstep_position {
        0 => mora_index > 0,
        p => mora_index > 0 && mora_index < p,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PitchCategory {
    Heiban,
    Atamadaka,
    Kifuku,
    Odaka,
    Nakadaka,
}

/// Classifies a pitch-accent downstep position against a word's mora count,
/// per spec 4.8's `pitch-categories` marker. `has_verb_or_adj_rule` / `has_suru_rule`
/// disambiguate position-1 words between atamadaka and kifuku.
pub fn get_pitch_category(
    mora_count: u16,
    downstep_position: usize,
    has_verb_or_adj_rule: bool,
    has_suru_rule: bool,
) -> PitchCategory {
    if downstep_position == 0 {
        return PitchCategory::Heiban;
    }
    if downstep_position == 1 {
        return if has_verb_or_adj_rule && !has_suru_rule {
            PitchCategory::Kifuku
        } else {
            PitchCategory::Atamadaka
        };
    }
    if downstep_position as u16 == mora_count {
        return PitchCategory::Odaka;
    }
    PitchCategory::Nakadaka
}

#[derive(Clone, Debug, PartialEq)]
pub struct FuriganaSegment {
    pub text: String,
    pub reading: Option<String>,
}

impl FuriganaSegment {
    pub fn new(text: String, reading: Option<String>) -> Self {
        Self { text, reading }
    }
}

/// Splits `term`/`reading` into segments suitable for `<ruby>` rendering,
/// peeling off kana that match literally at the start/end of the reading and
/// attributing the remaining (kanji-containing) middle to the leftover reading.
pub fn distribute_furigana(term: &str, reading: &str) -> Vec<FuriganaSegment> {
    if reading.is_empty() || reading == term {
        return vec![FuriganaSegment::new(term.to_string(), None)];
    }
    if is_string_entirely_kana(term) {
        return vec![FuriganaSegment::new(term.to_string(), Some(reading.to_string()))];
    }

    let term_chars: Vec<char> = term.chars().collect();
    let reading_chars: Vec<char> = reading.chars().collect();

    let mut prefix_len = 0;
    while prefix_len < term_chars.len()
        && prefix_len < reading_chars.len()
        && is_char_kana(term_chars[prefix_len])
        && term_chars[prefix_len] == reading_chars[prefix_len]
    {
        prefix_len += 1;
    }

    let mut suffix_len = 0;
    while suffix_len < term_chars.len() - prefix_len
        && suffix_len < reading_chars.len() - prefix_len
        && is_char_kana(term_chars[term_chars.len() - 1 - suffix_len])
        && term_chars[term_chars.len() - 1 - suffix_len]
            == reading_chars[reading_chars.len() - 1 - suffix_len]
    {
        suffix_len += 1;
    }

    let mut segments = Vec::new();
    if prefix_len > 0 {
        let text: String = term_chars[..prefix_len].iter().collect();
        segments.push(FuriganaSegment::new(text, None));
    }
    let mid_term: String = term_chars[prefix_len..term_chars.len() - suffix_len]
        .iter()
        .collect();
    if !mid_term.is_empty() {
        let mid_reading: String = reading_chars[prefix_len..reading_chars.len() - suffix_len]
            .iter()
            .collect();
        segments.push(FuriganaSegment::new(mid_term, Some(mid_reading)));
    }
    if suffix_len > 0 {
        let text: String = term_chars[term_chars.len() - suffix_len..].iter().collect();
        segments.push(FuriganaSegment::new(text, None));
    }
    segments
}

/// Same as [`distribute_furigana`], but `source` is the original (possibly
/// conjugated) surface text the dictionary form `term` was deinflected from;
/// any trailing inflected ending is appended as a plain, reading-less segment.
pub fn distribute_furigana_inflected(term: &str, reading: &str, source: &str) -> Vec<FuriganaSegment> {
    let stem_len = get_stem_length(term, source);
    let term_stem: String = term.chars().take(stem_len).collect();
    let source_suffix: String = source.chars().skip(stem_len).collect();

    if source_suffix.is_empty() {
        return distribute_furigana(term, reading);
    }

    let mut segments = distribute_furigana(&term_stem, reading);
    segments.push(FuriganaSegment::new(source_suffix, None));
    segments
}

pub fn get_stem_length<T: AsRef<str>>(text1: T, text2: T) -> usize {
    let a: Vec<char> = text1.as_ref().chars().collect();
    let b: Vec<char> = text2.as_ref().chars().collect();
    let mut i = 0;
    while i < a.len() && i < b.len() && a[i] == b[i] {
        i += 1;
    }
    i
}

pub fn is_emphatic_code_point(code_point: u32) -> bool {
    code_point == HIRAGANA_SMALL_TSU_CODE_POINT
        || code_point == KATAKANA_SMALL_TSU_CODE_POINT
        || code_point == KANA_PROLONGED_SOUND_MARK_CODE_POINT
}

/// Collapses runs of 3+ repeated emphatic characters (small tsu, long vowel
/// mark) down to a single occurrence (`full_collapse`) or two (otherwise), the
/// way casual/slangy subtitle text often elongates words for emphasis.
pub fn collapse_emphatic_sequences(text: &str, full_collapse: bool) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let mut run_len = 1;
        while i + run_len < chars.len() && chars[i + run_len] == c {
            run_len += 1;
        }
        if run_len >= 3 && is_emphatic_code_point(c as u32) {
            let keep = if full_collapse { 1 } else { 2 };
            for _ in 0..keep {
                out.push(c);
            }
        } else {
            for _ in 0..run_len {
                out.push(c);
            }
        }
        i += run_len;
    }
    out
}
