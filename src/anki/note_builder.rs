//! Note Builder (§4.8): evaluates a profile's field templates against a
//! resolved [`TermDictionaryEntry`]/[`KanjiDictionaryEntry`] plus player
//! state, producing a [`NoteContext`] ready to hand to [`super::DisplayAnki`].
//!
//! Grounded on `original_source/src/anki/notebuilder.cpp`: the marker
//! dispatch there is a long if/else-if chain tried in a fixed order (common
//! markers first, then entity-specific ones); this is modeled as one closed
//! `match` over the marker name, common markers first, falling through to
//! entity-specific ones, rather than the original's duck-typed dispatch.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use thiserror::Error;

use crate::{
    anki::glossary_builder::{self, FileMap},
    anki::marker_tokenizer::{segment, Marker, Segment},
    audio::AudioSourceResolver,
    dictionary::{DictionaryTag, KanjiDictionaryEntry, TermDictionaryEntry, TermFrequency},
    dictionary_data::TermGlossaryContent,
    freq,
    language_transformer::ja::japanese::distribute_furigana_inflected,
    player::{AudioExt, ImageExt, PlayerAdapter, PlayerState},
    settings::{
        AnkiDuplicateBehavior, AnkiDuplicateScope, AnkiNoteOptions, AnkiOptions, AudioSourceOptions,
    },
    text_scanner::BuildNoteError as NoteBuildError,
};

/// Duplicate-policy → AnkiConnect `options` mapping. The three branches are
/// intentionally distinct shapes, not a normalized tri-state: `Prevent`
/// sends an explicit `allowDuplicate: false`, a deck-scoped behavior omits
/// `allowDuplicate` entirely in favor of `duplicateScope`, and any other
/// behavior sends an explicit `allowDuplicate: true`. See DESIGN.md for why
/// this isn't collapsed into one representation (§9 Open Question).
#[derive(Clone, Debug, PartialEq)]
pub enum AnkiNoteAddOptions {
    AllowDuplicateFalse,
    DuplicateScope(&'static str),
    AllowDuplicateTrue,
}

pub fn note_add_options(
    behavior: AnkiDuplicateBehavior,
    scope: AnkiDuplicateScope,
) -> AnkiNoteAddOptions {
    match behavior {
        AnkiDuplicateBehavior::Prevent => AnkiNoteAddOptions::AllowDuplicateFalse,
        AnkiDuplicateBehavior::Overwrite | AnkiDuplicateBehavior::New => match scope {
            AnkiDuplicateScope::Deck | AnkiDuplicateScope::DeckRoot => {
                AnkiNoteAddOptions::DuplicateScope("deck")
            }
            AnkiDuplicateScope::Collection => AnkiNoteAddOptions::AllowDuplicateTrue,
        },
    }
}

/// Where a synthesized audio/picture attachment's bytes ultimately come
/// from: a URL the SRS client fetches itself, or a local temp file this
/// crate produced (screenshot, audio clip).
#[derive(Clone, Debug, PartialEq)]
pub enum MediaSource {
    Url(String),
    File(PathBuf),
}

/// One pending (or resolved) audio/picture attachment, mirroring the
/// AnkiConnect wire shape's `fields` list: which note fields get the
/// `[sound:...]`/`<img>` tag appended once the attachment is uploaded.
#[derive(Clone, Debug, PartialEq)]
pub struct AnkiMediaAttachment {
    pub source: MediaSource,
    pub filename: String,
    pub fields: Vec<String>,
    pub skip_hash: Option<String>,
}

/// The concrete Rust shape of the Note Builder's output record: a
/// `anki_direct`-ready note description plus the accumulated dictionary
/// file-upload map, kept separate from `audio`/`picture` because those are
/// dictionary-embedded glossary images, not synthesized media (§3 "added").
#[derive(Clone, Debug, PartialEq)]
pub struct NoteContext {
    pub note: AnkiNote,
    pub file_map: FileMap,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnkiNote {
    pub deck_name: String,
    pub model_name: String,
    pub fields: IndexMap<String, String>,
    pub tags: Vec<String>,
    pub options: AnkiNoteAddOptions,
    pub audio: Vec<AnkiMediaAttachment>,
    pub picture: Vec<AnkiMediaAttachment>,
}

/// A media-producing marker's request, keyed so identical parameter tuples
/// used by multiple fields synthesize exactly once (§4.8 step 3).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum MediaRequestKey {
    Screenshot {
        max_width: Option<u32>,
        max_height: Option<u32>,
        keep_ratio: bool,
        with_subs: bool,
    },
    AudioClip {
        pad_start_micros: i64,
        pad_end_micros: i64,
        normalize: bool,
        db_micros: i64,
        context: bool,
    },
    TermAudio,
}

/// Accumulates media requests discovered while evaluating field templates,
/// plus which fields asked for each one.
#[derive(Default)]
pub struct MediaPlan {
    requests: IndexMap<MediaRequestKey, Vec<String>>,
}

impl MediaPlan {
    fn register(&mut self, key: MediaRequestKey, field: &str) {
        self.requests.entry(key).or_default().push(field.to_string());
    }
}

/// The subject a field template is evaluated against: either a term
/// headword (with reading/expression orientation) or a kanji character.
pub enum NoteSubject<'a> {
    Term {
        entry: &'a TermDictionaryEntry,
        headword_index: usize,
        reading_as_expression: bool,
    },
    Kanji {
        entry: &'a KanjiDictionaryEntry,
    },
}

/// Everything a single marker evaluation needs: the subject, sentence
/// context, cloze span, player snapshot, and the side-channels it can write
/// into (media plan, dictionary file map).
pub struct FieldContext<'a> {
    pub subject: &'a NoteSubject<'a>,
    pub sentence: &'a str,
    pub sentence2: &'a str,
    pub cloze_prefix: &'a str,
    pub cloze_body: &'a str,
    pub cloze_suffix: &'a str,
    pub context: &'a str,
    pub context2: &'a str,
    pub player: &'a PlayerState,
    pub anki_options: &'a AnkiOptions,
    pub dictionary_basepath: &'a Path,
}

enum MarkerResult {
    /// The marker matched and produced (possibly empty) text.
    Handled(String),
    /// No marker with this name exists in either the common or
    /// entity-specific table.
    Unhandled,
}

/// Evaluates every field template in `note_options.fields` against
/// `subject`, filling `media_plan` with any media requests discovered.
/// Returns the filled fields in template order and the dictionary glossary
/// file map accumulated while rendering `glossary` markers.
fn evaluate_fields(
    note_options: &AnkiNoteOptions,
    ctx: &FieldContext,
    media_plan: &mut MediaPlan,
) -> (IndexMap<String, String>, FileMap) {
    let mut fields = IndexMap::new();
    let mut file_map = FileMap::new();

    for (field_name, template) in &note_options.fields {
        let segments = segment(template);
        let mut rendered = String::new();

        for seg in segments {
            match seg {
                Segment::Literal(text) => rendered.push_str(&text),
                Segment::Marker(token) => {
                    let mut chosen: Option<String> = None;
                    let mut any_handled = false;
                    for marker in &token.markers {
                        match evaluate_marker(marker, ctx, field_name, media_plan, &mut file_map) {
                            MarkerResult::Handled(value) => {
                                any_handled = true;
                                if !value.is_empty() {
                                    chosen = Some(value);
                                    break;
                                }
                                if chosen.is_none() {
                                    chosen = Some(value);
                                }
                            }
                            MarkerResult::Unhandled => continue,
                        }
                    }
                    match chosen {
                        Some(value) => rendered.push_str(&value),
                        None if any_handled => {}
                        None => rendered.push_str(&token.raw),
                    }
                }
            }
        }

        fields.insert(field_name.clone(), rendered);
    }

    (fields, file_map)
}

/// Builds a complete [`NoteContext`] for `subject`: evaluates every field
/// template configured for its entity type (terms use `anki_options.terms`,
/// kanji use `anki_options.kanji`), resolves the duplicate-policy mapping,
/// and returns the accumulated media plan alongside it so the caller can
/// synthesize screenshots/clips before sending the note onward.
pub fn build_note<'a>(
    subject: &'a NoteSubject<'a>,
    sentence: &str,
    sentence2: &str,
    cloze_prefix: &str,
    cloze_body: &str,
    cloze_suffix: &str,
    context: &str,
    context2: &str,
    player: &PlayerState,
    anki_options: &AnkiOptions,
    dictionary_basepath: &Path,
) -> Result<(NoteContext, MediaPlan), NoteBuildError> {
    let note_options = match subject {
        NoteSubject::Term { .. } => &anki_options.terms,
        NoteSubject::Kanji { .. } => &anki_options.kanji,
    };
    if note_options.deck.is_empty() {
        return Err(NoteBuildError::NoDeckSelected);
    }
    if note_options.fields.is_empty() {
        return Err(NoteBuildError::NoFieldTemplates);
    }

    let ctx = FieldContext {
        subject,
        sentence,
        sentence2,
        cloze_prefix,
        cloze_body,
        cloze_suffix,
        context,
        context2,
        player,
        anki_options,
        dictionary_basepath,
    };
    let mut media_plan = MediaPlan::default();
    let (fields, file_map) = evaluate_fields(note_options, &ctx, &mut media_plan);

    let note = AnkiNote {
        deck_name: note_options.deck.clone(),
        model_name: note_options.model.clone(),
        fields,
        tags: anki_options.tags.clone(),
        options: note_add_options(
            anki_options.duplicate_behavior.clone(),
            anki_options.duplicate_scope.clone(),
        ),
        audio: Vec::new(),
        picture: Vec::new(),
    };

    Ok((NoteContext { note, file_map }, media_plan))
}

fn unique_media_filename(ext: &str) -> String {
    format!("yomichan_rs_{}.{ext}", uuid::Uuid::now_v7())
}

/// Synthesizes every media request [`build_note`] discovered and attaches
/// the results to `note`'s `audio`/`picture` lists (§4.8 step 3, "resolve
/// media"). Each distinct parameter tuple was already deduplicated by
/// [`MediaPlan`], so this synthesizes it exactly once regardless of how many
/// fields asked for it.
///
/// A failed screenshot/clip/term-audio request is logged-and-skipped (§7
/// "Transient I/O" — the affected field stays without an attachment) rather
/// than failing the whole call. Every `MediaSource::File` path pushed here
/// is owned by the caller until the note reaches the SRS client (§3 "Media
/// lifecycle"): on a later add-note failure, the caller must delete them.
pub async fn resolve_media(
    plan: MediaPlan,
    note: &mut NoteContext,
    player: &dyn PlayerAdapter,
    audio_resolver: &AudioSourceResolver,
    audio_sources: &[AudioSourceOptions],
    expression: &str,
    reading: &str,
    screenshot_ext: ImageExt,
    audio_ext: AudioExt,
) {
    for (key, fields) in plan.requests {
        match key {
            MediaRequestKey::Screenshot { with_subs, .. } => {
                if let Ok(path) = player.temp_screenshot(with_subs, screenshot_ext) {
                    note.note.picture.push(AnkiMediaAttachment {
                        source: MediaSource::File(path),
                        filename: unique_media_filename(screenshot_ext.as_str()),
                        fields,
                        skip_hash: None,
                    });
                }
                // transient failure (§7): this field's attachment stays empty
            }
            MediaRequestKey::AudioClip {
                pad_start_micros,
                pad_end_micros,
                normalize,
                db_micros,
                context,
            } => {
                let (start, end) = if context {
                    let primary = player.current_subtitle();
                    let secondary = player.current_subtitle2();
                    (
                        primary
                            .as_ref()
                            .map(|s| s.start_time)
                            .or_else(|| player.sub_start()),
                        secondary
                            .as_ref()
                            .map(|s| s.end_time)
                            .or_else(|| primary.as_ref().map(|s| s.end_time))
                            .or_else(|| player.sub_end()),
                    )
                } else {
                    (player.sub_start(), player.sub_end())
                };
                let (Some(start), Some(end)) = (start, end) else {
                    continue;
                };
                let pad_start = pad_start_micros as f64 / 1_000_000.0;
                let pad_end = pad_end_micros as f64 / 1_000_000.0;
                let db = db_micros as f64 / 1_000_000.0;
                match player.temp_audio_clip(
                    (start - pad_start).max(0.0),
                    end + pad_end,
                    normalize,
                    db,
                    audio_ext,
                ) {
                    Ok(path) => note.note.audio.push(AnkiMediaAttachment {
                        source: MediaSource::File(path),
                        filename: unique_media_filename(audio_ext.as_str()),
                        fields,
                        skip_hash: None,
                    }),
                    Err(_) => {}
                }
            }
            MediaRequestKey::TermAudio => {
                let resolved = audio_resolver
                    .resolve(audio_sources, expression, reading)
                    .await;
                if let Some(first) = resolved.into_iter().next() {
                    note.note.audio.push(AnkiMediaAttachment {
                        source: MediaSource::Url(first.url),
                        filename: unique_media_filename("mp3"),
                        fields,
                        skip_hash: first.md5_skip_hash,
                    });
                }
            }
        }
    }
}

/// Substitutes literal newlines in user/player-supplied prose per the
/// profile's configured replacer (§4.8 "Newline substitution").
fn replace_newlines(text: &str, replacer: &str) -> String {
    if replacer.is_empty() {
        return text.replace('\n', " ");
    }
    text.replace('\n', replacer)
}

fn evaluate_marker(
    marker: &Marker,
    ctx: &FieldContext,
    field_name: &str,
    media_plan: &mut MediaPlan,
    file_map: &mut FileMap,
) -> MarkerResult {
    let replacer = &ctx.anki_options.newline_replacer;
    match marker.name.as_str() {
        "title" => MarkerResult::Handled(replace_newlines(&ctx.player.title, replacer)),
        "clipboard" => MarkerResult::Handled(replace_newlines(&ctx.player.clipboard, replacer)),
        "sentence" => MarkerResult::Handled(replace_newlines(ctx.sentence, replacer)),
        "sentence2" => MarkerResult::Handled(replace_newlines(ctx.sentence2, replacer)),
        "context" => MarkerResult::Handled(replace_newlines(ctx.context, replacer)),
        "context2" => MarkerResult::Handled(replace_newlines(ctx.context2, replacer)),
        "cloze-prefix" => MarkerResult::Handled(replace_newlines(ctx.cloze_prefix, replacer)),
        "cloze-body" => MarkerResult::Handled(replace_newlines(ctx.cloze_body, replacer)),
        "cloze-suffix" => MarkerResult::Handled(replace_newlines(ctx.cloze_suffix, replacer)),
        "selection" => {
            MarkerResult::Handled(replace_newlines(&ctx.player.selection.join(", "), replacer))
        }
        "screenshot" | "screenshot-video" => {
            let max_width = marker.args.get("max-width").and_then(|v| v.parse().ok());
            let max_height = marker.args.get("max-height").and_then(|v| v.parse().ok());
            let keep_ratio = marker
                .args
                .get("keep-ratio")
                .map(|v| v == "true")
                .unwrap_or(true);
            media_plan.register(
                MediaRequestKey::Screenshot {
                    max_width,
                    max_height,
                    keep_ratio,
                    with_subs: marker.name == "screenshot",
                },
                field_name,
            );
            MarkerResult::Handled(String::new())
        }
        "audio" => {
            media_plan.register(MediaRequestKey::TermAudio, field_name);
            MarkerResult::Handled(String::new())
        }
        "audio-media" | "audio-context" => {
            let pad_start = ctx.anki_options.note_audio.pad_start;
            let pad_end = ctx.anki_options.note_audio.pad_end;
            media_plan.register(
                MediaRequestKey::AudioClip {
                    pad_start_micros: (pad_start * 1_000_000.0) as i64,
                    pad_end_micros: (pad_end * 1_000_000.0) as i64,
                    normalize: ctx.anki_options.note_audio.normalize,
                    db_micros: (ctx.anki_options.note_audio.normalize_db * 1_000_000.0) as i64,
                    context: marker.name == "audio-context",
                },
                field_name,
            );
            MarkerResult::Handled(String::new())
        }
        _ => match ctx.subject {
            NoteSubject::Term {
                entry,
                headword_index,
                reading_as_expression,
            } => evaluate_term_marker(
                marker,
                entry,
                *headword_index,
                *reading_as_expression,
                ctx,
                file_map,
            ),
            NoteSubject::Kanji { entry } => evaluate_kanji_marker(marker, entry, ctx, file_map),
        },
    }
}

/* Term-specific markers */

fn evaluate_term_marker(
    marker: &Marker,
    entry: &TermDictionaryEntry,
    headword_index: usize,
    reading_as_expression: bool,
    ctx: &FieldContext,
    file_map: &mut FileMap,
) -> MarkerResult {
    let Some(headword) = entry.headwords.get(headword_index) else {
        return MarkerResult::Handled(String::new());
    };
    let (expression_role, reading_role) = if reading_as_expression && !headword.reading.is_empty()
    {
        (headword.reading.as_str(), headword.term.as_str())
    } else {
        (headword.term.as_str(), headword.reading.as_str())
    };

    match marker.name.as_str() {
        "expression" => MarkerResult::Handled(expression_role.to_string()),
        "reading" => {
            if reading_role.is_empty() {
                MarkerResult::Handled(expression_role.to_string())
            } else {
                MarkerResult::Handled(reading_role.to_string())
            }
        }
        "furigana" => MarkerResult::Handled(render_furigana_ruby(expression_role, reading_role)),
        "furigana-plain" => MarkerResult::Handled(render_furigana_plain(expression_role, reading_role)),
        "glossary" | "glossary-brief" | "glossary-compact" => {
            let dict_filter: Option<i128> = match marker.args.get("dict") {
                Some(raw) => match raw.parse::<i128>() {
                    Ok(id) => Some(id),
                    Err(_) => return MarkerResult::Handled("ERROR: Invalid dic-id value".to_string()),
                },
                None => None,
            };
            let glossary: Vec<&TermGlossaryContent> = entry
                .definitions
                .iter()
                .filter(|d| dict_filter.map_or(true, |id| d.dictionary_index as i128 == id))
                .flat_map(|d| d.entries.iter())
                .collect();
            let owned: Vec<TermGlossaryContent> = glossary.into_iter().cloned().collect();
            let rendered = glossary_builder::build_glossary(&owned, ctx.dictionary_basepath, file_map);
            MarkerResult::Handled(render_glossary_list(&rendered, marker.name.as_str()))
        }
        "pitch" | "pitch-graph" | "pitch-position" | "pitch-categories" => {
            MarkerResult::Handled(render_pitch(marker.name.as_str(), entry, headword_index))
        }
        "frequencies" => {
            let value_only = marker.args.get("value-only").map(|v| v == "true").unwrap_or(false);
            let min_value = marker.args.get("min-value").map(|v| v == "true").unwrap_or(false);
            MarkerResult::Handled(render_frequencies(&entry.frequencies, value_only, min_value))
        }
        "frequency-harmonic-rank" => {
            MarkerResult::Handled(format!("{:.0}", freq::harmonic_rank(&entry.frequencies)))
        }
        "frequency-harmonic-occurrence" => MarkerResult::Handled(format!(
            "{:.0}",
            freq::harmonic_occurrence(&entry.frequencies)
        )),
        "frequency-average-rank" => {
            MarkerResult::Handled(format!("{:.0}", freq::average_rank(&entry.frequencies)))
        }
        "frequency-average-occurrence" => MarkerResult::Handled(format!(
            "{:.0}",
            freq::average_occurrence(&entry.frequencies)
        )),
        "tags" => MarkerResult::Handled(render_tags(&all_term_tags(entry), false)),
        "tags-brief" => MarkerResult::Handled(render_tags(&all_term_tags(entry), true)),
        "dictionary" => MarkerResult::Handled(
            entry
                .definitions
                .first()
                .map(|d| d.dictionary.clone())
                .unwrap_or_default(),
        ),
        "exact-search" => {
            MarkerResult::Handled(format!("{}\u{3000}{}", expression_role, reading_role).trim().to_string())
        }
        _ => MarkerResult::Unhandled,
    }
}

fn all_term_tags(entry: &TermDictionaryEntry) -> Vec<DictionaryTag> {
    let mut tags: Vec<DictionaryTag> = entry.headwords.iter().flat_map(|h| h.tags.clone()).collect();
    tags.extend(entry.definitions.iter().flat_map(|d| d.tags.clone()));
    tags
}

/* Kanji-specific markers */

fn evaluate_kanji_marker(
    marker: &Marker,
    entry: &KanjiDictionaryEntry,
    ctx: &FieldContext,
    file_map: &mut FileMap,
) -> MarkerResult {
    match marker.name.as_str() {
        "character" => MarkerResult::Handled(entry.character.clone()),
        "onyomi" => MarkerResult::Handled(entry.onyomi.join(", ")),
        "kunyomi" => MarkerResult::Handled(entry.kunyomi.join(", ")),
        "stroke-count" => MarkerResult::Handled(
            entry
                .stats
                .get("strokeCount")
                .or_else(|| entry.stats.get("画数"))
                .cloned()
                .unwrap_or_default(),
        ),
        "glossary" | "glossary-brief" | "glossary-compact" => {
            let glossary: Vec<TermGlossaryContent> = entry
                .definitions
                .iter()
                .flat_map(|d| d.glossary.clone())
                .collect();
            let rendered = glossary_builder::build_glossary(&glossary, ctx.dictionary_basepath, file_map);
            MarkerResult::Handled(render_glossary_list(&rendered, marker.name.as_str()))
        }
        "frequencies" => {
            let value_only = marker.args.get("value-only").map(|v| v == "true").unwrap_or(false);
            let min_value = marker.args.get("min-value").map(|v| v == "true").unwrap_or(false);
            MarkerResult::Handled(render_frequencies(&entry.frequencies, value_only, min_value))
        }
        "tags" => MarkerResult::Handled(render_tags(&all_kanji_tags(entry), false)),
        "tags-brief" => MarkerResult::Handled(render_tags(&all_kanji_tags(entry), true)),
        "dictionary" => MarkerResult::Handled(entry.dictionary.clone()),
        _ => MarkerResult::Unhandled,
    }
}

fn all_kanji_tags(entry: &KanjiDictionaryEntry) -> Vec<DictionaryTag> {
    let mut tags = entry.tags.clone();
    tags.extend(entry.definitions.iter().flat_map(|d| d.tags.clone()));
    tags
}

/* Shared rendering helpers */

fn render_furigana_ruby(expression: &str, reading: &str) -> String {
    if reading.is_empty() {
        return expression.to_string();
    }
    let segments = distribute_furigana_inflected(expression, reading, expression);
    let mut out = String::new();
    for seg in segments {
        match seg.reading {
            Some(r) => {
                out.push_str("<ruby>");
                out.push_str(&seg.text);
                out.push_str("<rt>");
                out.push_str(&r);
                out.push_str("</rt></ruby>");
            }
            None => out.push_str(&seg.text),
        }
    }
    out
}

fn render_furigana_plain(expression: &str, reading: &str) -> String {
    if reading.is_empty() {
        expression.to_string()
    } else {
        format!("{expression}[{reading}]")
    }
}

fn render_glossary_list(entries: &[String], mode: &str) -> String {
    match mode {
        "glossary-compact" => entries.join("; "),
        "glossary-brief" => entries.first().cloned().unwrap_or_default(),
        _ => {
            if entries.is_empty() {
                return String::new();
            }
            let items: String = entries
                .iter()
                .map(|e| format!("<li>{e}</li>"))
                .collect::<Vec<_>>()
                .join("");
            format!("<ol>{items}</ol>")
        }
    }
}

fn render_tags(tags: &[DictionaryTag], brief: bool) -> String {
    if tags.is_empty() {
        return String::new();
    }
    if brief {
        return tags.iter().map(|t| t.name.as_str()).collect::<Vec<_>>().join(", ");
    }
    tags.iter()
        .map(|t| {
            format!(
                "<span style=\"color: {}\">{}</span>",
                tag_category_color(&t.category),
                t.name
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Tag category → display color, a finite, closed lookup (§9 redesign flag:
/// "global tag-category color table → const lookup function").
pub const fn tag_category_color(category: &str) -> &'static str {
    match category.as_bytes() {
        b"name" => "#d32f2f",
        b"expression" => "#1976d2",
        b"popular" => "#d32f2f",
        b"frequent" => "#f57f17",
        b"archaism" => "#795548",
        b"dictionary" => "#607d8b",
        b"frequency" => "#f57f17",
        b"partOfSpeech" => "#2e7d32",
        b"search" => "#607d8b",
        b"pitch-accent-dictionary" => "#9c27b0",
        _ => "#555555",
    }
}

fn render_frequencies(frequencies: &[TermFrequency], value_only: bool, min_value: bool) -> String {
    if frequencies.is_empty() {
        return String::new();
    }
    if min_value {
        return freq::min_value(frequencies)
            .map(|v| format!("{v:.0}"))
            .unwrap_or_default();
    }
    if value_only {
        return frequencies
            .iter()
            .map(display_frequency)
            .collect::<Vec<_>>()
            .join("<br>");
    }
    let items: String = frequencies
        .iter()
        .map(|f| format!("<li>{}: {}</li>", f.dictionary, display_frequency(f)))
        .collect::<Vec<_>>()
        .join("");
    format!("<ul>{items}</ul>")
}

fn display_frequency(f: &TermFrequency) -> String {
    f.display_value.clone().unwrap_or_else(|| f.frequency.to_string())
}

/* Pitch rendering */

/// Splits a kana reading into morae: each character combines with a
/// following small kana (ゃゅょぁぃぅぇぉ etc., excluding っ/ン which are
/// morae in their own right) to form one unit.
fn kana_morae(reading: &str) -> Vec<String> {
    const SMALL: &[char] = &[
        'ゃ', 'ゅ', 'ょ', 'ぁ', 'ぃ', 'ぅ', 'ぇ', 'ぉ', 'ャ', 'ュ', 'ョ', 'ァ', 'ィ', 'ゥ', 'ェ', 'ォ',
    ];
    let chars: Vec<char> = reading.chars().collect();
    let mut morae = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let mut mora = String::from(chars[i]);
        if i + 1 < chars.len() && SMALL.contains(&chars[i + 1]) {
            mora.push(chars[i + 1]);
            i += 2;
        } else {
            i += 1;
        }
        morae.push(mora);
    }
    morae
}

fn pitch_positions(entry: &TermDictionaryEntry, headword_index: usize) -> Vec<u8> {
    use crate::database::dictionary_database::Pronunciation;
    entry
        .pronunciations
        .iter()
        .filter(|p| p.headword_index == headword_index)
        .flat_map(|p| p.pronunciations.iter())
        .filter_map(|p| match p {
            Pronunciation::PitchAccent(pa) => Some(pa.position),
            Pronunciation::PhoneticTranscription(_) => None,
        })
        .collect()
}

fn render_pitch(mode: &str, entry: &TermDictionaryEntry, headword_index: usize) -> String {
    let Some(headword) = entry.headwords.get(headword_index) else {
        return String::new();
    };
    let positions = pitch_positions(entry, headword_index);
    if positions.is_empty() {
        return String::new();
    }
    let morae = kana_morae(&headword.reading);

    match mode {
        "pitch-position" => positions
            .iter()
            .map(|p| format!("[{p}]"))
            .collect::<Vec<_>>()
            .join(", "),
        "pitch-graph" => positions
            .iter()
            .map(|p| render_pitch_graph(&morae, *p))
            .collect::<Vec<_>>()
            .join(""),
        "pitch-categories" => {
            let has_verb_or_adj = entry
                .definitions
                .iter()
                .any(|d| d.tags.iter().any(|t| t.name == "v1" || t.name == "v5" || t.name == "adj-i"));
            let has_suru = entry.definitions.iter().any(|d| d.tags.iter().any(|t| t.name == "vs"));
            let mut categories: Vec<&str> = Vec::new();
            for position in &positions {
                let category = pitch_category(*position, morae.len(), has_verb_or_adj, has_suru);
                if !categories.contains(&category) {
                    categories.push(category);
                }
            }
            categories.join(", ")
        }
        _ => positions
            .iter()
            .map(|p| render_pitch_text(&morae, *p))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// `heiban` (position 0), `atamadaka` (position 1, no suru rule on a verb/
/// adjective sense) or `kifuku` (position 1, otherwise), `odaka` (position
/// equals mora length), `nakadaka`/`kifuku` otherwise.
fn pitch_category(position: u8, mora_len: usize, has_verb_or_adj: bool, has_suru: bool) -> &'static str {
    if position == 0 {
        return "heiban";
    }
    if position as usize == mora_len {
        return "odaka";
    }
    if position == 1 {
        return if has_verb_or_adj && !has_suru {
            "atamadaka"
        } else {
            "kifuku"
        };
    }
    if has_verb_or_adj && !has_suru {
        "nakadaka"
    } else {
        "kifuku"
    }
}

/// Text-variant pitch rendering: an HL/LH border under each mora using
/// inline styling, matching Yomitan's "pitch accent" text display.
fn render_pitch_text(morae: &[String], position: u8) -> String {
    let mut out = String::from("<span style=\"display:inline-flex;\">");
    for (i, mora) in morae.iter().enumerate() {
        let high = is_high(i as u8, position, morae.len());
        out.push_str(&format!(
            "<span style=\"border-top: {};\">{}</span>",
            if high { "2px solid currentColor" } else { "none" },
            mora
        ));
    }
    out.push_str("</span>");
    out
}

/// Whether the mora at `index` is pronounced at a high pitch for a word
/// with downstep at `position` (0 = heiban/no downstep).
fn is_high(index: u8, position: u8, mora_len: usize) -> bool {
    if position == 0 {
        return index > 0;
    }
    if index == 0 {
        return false;
    }
    (index as usize) < position as usize || (position as usize == mora_len && index > 0)
}

/// Inline-SVG pitch graph: a polyline across mora positions, dots at each
/// mora, matching Yomitan's pitch accent graph.
fn render_pitch_graph(morae: &[String], position: u8) -> String {
    let n = morae.len();
    if n == 0 {
        return String::new();
    }
    let width = 50 * (n + 1);
    let mut points = Vec::new();
    for i in 0..=n {
        let x = 25 + i * 50;
        let y = if is_high(i as u8, position, n) { 10 } else { 30 };
        points.push(format!("{x},{y}"));
    }
    format!(
        "<svg width=\"{width}\" height=\"40\" xmlns=\"http://www.w3.org/2000/svg\"><polyline points=\"{}\" fill=\"none\" stroke=\"currentColor\"/></svg>",
        points.join(" ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dictionary::{TermDefinition, TermHeadword, TermSource, TermSourceMatchSource, TermSourceMatchType},
        player::PlayerState,
    };
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn sample_entry() -> TermDictionaryEntry {
        TermDictionaryEntry {
            entry_type: TermSourceMatchSource::Term,
            is_primary: true,
            text_processor_rule_chain_candidates: vec![],
            inflection_rule_chain_candidates: vec![],
            score: 0,
            frequency_order: 0,
            dictionary_alias: "jmdict".into(),
            dictionary_index: 0,
            source_term_exact_match_count: 1,
            match_primary_reading: false,
            max_original_text_length: 2,
            headwords: vec![TermHeadword {
                index: 0,
                term: "食べる".into(),
                reading: "たべる".into(),
                sources: vec![TermSource {
                    original_text: "食べる".into(),
                    transformed_text: "食べる".into(),
                    deinflected_text: "食べる".into(),
                    match_type: TermSourceMatchType::Exact,
                    match_source: TermSourceMatchSource::Term,
                    is_primary: true,
                }],
                tags: vec![],
                word_classes: vec!["v1".into()],
            }],
            definitions: vec![TermDefinition {
                index: 0,
                headword_indices: vec![0],
                dictionary: "jmdict".into(),
                dictionary_index: 0,
                dictionary_alias: "jmdict".into(),
                sequences: vec![7],
                id: 1,
                score: 0,
                is_primary: true,
                tags: vec![],
                entries: vec![TermGlossaryContent {
                    term_glossary_string: "to eat".into(),
                    ..Default::default()
                }],
                frequency_order: 0,
            }],
            pronunciations: vec![],
            frequencies: vec![],
        }
    }

    fn empty_ctx<'a>(subject: &'a NoteSubject<'a>, player: &'a PlayerState, opts: &'a AnkiOptions) -> FieldContext<'a> {
        FieldContext {
            subject,
            sentence: "昨日食べるものがなかった",
            sentence2: "",
            cloze_prefix: "昨日",
            cloze_body: "食べる",
            cloze_suffix: "ものがなかった",
            context: "",
            context2: "",
            player,
            anki_options: opts,
            dictionary_basepath: Path::new("/tmp"),
        }
    }

    #[test]
    fn expression_and_reading_markers() {
        let entry = sample_entry();
        let subject = NoteSubject::Term {
            entry: &entry,
            headword_index: 0,
            reading_as_expression: false,
        };
        let player = PlayerState::default();
        let opts = AnkiOptions::default();
        let ctx = empty_ctx(&subject, &player, &opts);
        let mut plan = MediaPlan::default();
        let mut fm = FileMap::new();

        let expr = evaluate_marker(
            &Marker { name: "expression".into(), args: Default::default() },
            &ctx,
            "Expression",
            &mut plan,
            &mut fm,
        );
        let MarkerResult::Handled(v) = expr else { panic!() };
        assert_eq!(v, "食べる");

        let reading = evaluate_marker(
            &Marker { name: "reading".into(), args: Default::default() },
            &ctx,
            "Reading",
            &mut plan,
            &mut fm,
        );
        let MarkerResult::Handled(v) = reading else { panic!() };
        assert_eq!(v, "たべる");
    }

    #[test]
    fn reading_as_expression_swaps_roles() {
        let entry = sample_entry();
        let subject = NoteSubject::Term {
            entry: &entry,
            headword_index: 0,
            reading_as_expression: true,
        };
        let player = PlayerState::default();
        let opts = AnkiOptions::default();
        let ctx = empty_ctx(&subject, &player, &opts);
        let mut plan = MediaPlan::default();
        let mut fm = FileMap::new();

        let expr = evaluate_marker(
            &Marker { name: "expression".into(), args: Default::default() },
            &ctx,
            "Expression",
            &mut plan,
            &mut fm,
        );
        let MarkerResult::Handled(v) = expr else { panic!() };
        assert_eq!(v, "たべる");
    }

    #[test]
    fn fallback_template_uses_first_non_empty_alternative() {
        // S4: {reading|expression} against a term with empty reading.
        let mut entry = sample_entry();
        entry.headwords[0].reading.clear();
        let subject = NoteSubject::Term {
            entry: &entry,
            headword_index: 0,
            reading_as_expression: false,
        };
        let player = PlayerState::default();
        let opts = AnkiOptions::default();
        let ctx = empty_ctx(&subject, &player, &opts);
        let mut note_options = AnkiNoteOptions::default();
        note_options
            .fields
            .insert("Test".into(), "{reading|expression}".into());
        let mut plan = MediaPlan::default();
        let (fields, _) = evaluate_fields(&note_options, &ctx, &mut plan);
        assert_eq!(fields.get("Test").unwrap(), "食べる");
    }

    #[test]
    fn glossary_filters_by_dict_id() {
        // S5: {glossary:dict=7} against definitions from dicts {3,7,7,11}.
        let mut entry = sample_entry();
        entry.definitions = vec![
            mk_def(3, "def3"),
            mk_def(7, "def7a"),
            mk_def(7, "def7b"),
            mk_def(11, "def11"),
        ];
        let subject = NoteSubject::Term {
            entry: &entry,
            headword_index: 0,
            reading_as_expression: false,
        };
        let player = PlayerState::default();
        let opts = AnkiOptions::default();
        let ctx = empty_ctx(&subject, &player, &opts);
        let mut note_options = AnkiNoteOptions::default();
        note_options
            .fields
            .insert("Glossary".into(), "{glossary:dict=7}".into());
        let mut plan = MediaPlan::default();
        let (fields, _) = evaluate_fields(&note_options, &ctx, &mut plan);
        let rendered = fields.get("Glossary").unwrap();
        assert!(rendered.contains("def7a"));
        assert!(rendered.contains("def7b"));
        assert!(!rendered.contains("def3"));
        assert!(!rendered.contains("def11"));
    }

    fn mk_def(dict_id: i128, text: &str) -> TermDefinition {
        TermDefinition {
            index: 0,
            headword_indices: vec![0],
            dictionary: "d".into(),
            dictionary_index: dict_id as usize,
            dictionary_alias: "d".into(),
            sequences: vec![],
            id: 1,
            score: 0,
            is_primary: true,
            tags: vec![],
            entries: vec![TermGlossaryContent {
                term_glossary_string: text.to_string(),
                ..Default::default()
            }],
            frequency_order: 0,
        }
    }

    #[test]
    fn invalid_dict_id_reports_error() {
        let entry = sample_entry();
        let subject = NoteSubject::Term {
            entry: &entry,
            headword_index: 0,
            reading_as_expression: false,
        };
        let player = PlayerState::default();
        let opts = AnkiOptions::default();
        let ctx = empty_ctx(&subject, &player, &opts);
        let result = evaluate_marker(
            &Marker {
                name: "glossary".into(),
                args: [("dict".to_string(), "not-a-number".to_string())].into_iter().collect(),
            },
            &ctx,
            "Glossary",
            &mut MediaPlan::default(),
            &mut FileMap::new(),
        );
        let MarkerResult::Handled(v) = result else { panic!() };
        assert_eq!(v, "ERROR: Invalid dic-id value");
    }

    #[test]
    fn unknown_marker_is_unhandled() {
        let entry = sample_entry();
        let subject = NoteSubject::Term {
            entry: &entry,
            headword_index: 0,
            reading_as_expression: false,
        };
        let player = PlayerState::default();
        let opts = AnkiOptions::default();
        let ctx = empty_ctx(&subject, &player, &opts);
        let result = evaluate_marker(
            &Marker { name: "not-a-real-marker".into(), args: Default::default() },
            &ctx,
            "Field",
            &mut MediaPlan::default(),
            &mut FileMap::new(),
        );
        assert!(matches!(result, MarkerResult::Unhandled));
    }

    #[test]
    fn unresolvable_token_left_raw_in_template() {
        let entry = sample_entry();
        let subject = NoteSubject::Term {
            entry: &entry,
            headword_index: 0,
            reading_as_expression: false,
        };
        let player = PlayerState::default();
        let opts = AnkiOptions::default();
        let ctx = empty_ctx(&subject, &player, &opts);
        let mut note_options = AnkiNoteOptions::default();
        note_options
            .fields
            .insert("Field".into(), "prefix {totally-unknown} suffix".into());
        let mut plan = MediaPlan::default();
        let (fields, _) = evaluate_fields(&note_options, &ctx, &mut plan);
        assert_eq!(fields.get("Field").unwrap(), "prefix {totally-unknown} suffix");
    }

    #[test]
    fn screenshot_marker_registers_media_request_and_empties_field() {
        let entry = sample_entry();
        let subject = NoteSubject::Term {
            entry: &entry,
            headword_index: 0,
            reading_as_expression: false,
        };
        let player = PlayerState::default();
        let opts = AnkiOptions::default();
        let ctx = empty_ctx(&subject, &player, &opts);
        let mut note_options = AnkiNoteOptions::default();
        note_options
            .fields
            .insert("Picture".into(), "{screenshot:max-width=640}".into());
        let mut plan = MediaPlan::default();
        let (fields, _) = evaluate_fields(&note_options, &ctx, &mut plan);
        assert_eq!(fields.get("Picture").unwrap(), "");
        assert_eq!(plan.requests.len(), 1);
    }

    #[test]
    fn duplicate_policy_mapping_preserved_per_branch() {
        assert_eq!(
            note_add_options(AnkiDuplicateBehavior::Prevent, AnkiDuplicateScope::Collection),
            AnkiNoteAddOptions::AllowDuplicateFalse
        );
        assert_eq!(
            note_add_options(AnkiDuplicateBehavior::New, AnkiDuplicateScope::Deck),
            AnkiNoteAddOptions::DuplicateScope("deck")
        );
        assert_eq!(
            note_add_options(AnkiDuplicateBehavior::Overwrite, AnkiDuplicateScope::Collection),
            AnkiNoteAddOptions::AllowDuplicateTrue
        );
    }

    #[test]
    fn pitch_category_heiban_and_odaka() {
        assert_eq!(pitch_category(0, 3, false, false), "heiban");
        assert_eq!(pitch_category(3, 3, false, false), "odaka");
        assert_eq!(pitch_category(1, 3, true, false), "atamadaka");
        assert_eq!(pitch_category(2, 3, false, false), "kifuku");
    }

    #[test]
    fn kana_morae_groups_small_kana() {
        assert_eq!(
            kana_morae("きょう"),
            vec!["きょ".to_string(), "う".to_string()]
        );
        assert_eq!(
            kana_morae("たべる"),
            vec!["た".to_string(), "べ".to_string(), "る".to_string()]
        );
    }

    #[test]
    fn build_note_rejects_missing_deck() {
        let entry = sample_entry();
        let subject = NoteSubject::Term {
            entry: &entry,
            headword_index: 0,
            reading_as_expression: false,
        };
        let player = PlayerState::default();
        let opts = AnkiOptions::default();
        let result = build_note(
            &subject, "", "", "", "", "", "", "", &player, &opts, Path::new("/tmp"),
        );
        assert!(matches!(result, Err(NoteBuildError::NoDeckSelected)));
    }

    #[test]
    fn build_note_end_to_end_fills_fields() {
        let entry = sample_entry();
        let subject = NoteSubject::Term {
            entry: &entry,
            headword_index: 0,
            reading_as_expression: false,
        };
        let player = PlayerState::default();
        let mut opts = AnkiOptions::default();
        opts.terms.deck = "Japanese".into();
        opts.terms.model = "Yomichan".into();
        opts.terms
            .fields
            .insert("Expression".into(), "{expression}".into());
        opts.terms
            .fields
            .insert("Reading".into(), "{reading}".into());
        opts.tags = vec!["yomichan".into()];

        let (ctx, plan) = build_note(
            &subject, "昨日食べるものがなかった", "", "昨日", "食べる", "ものがなかった", "", "",
            &player, &opts, Path::new("/tmp"),
        )
        .unwrap();

        assert_eq!(ctx.note.deck_name, "Japanese");
        assert_eq!(ctx.note.model_name, "Yomichan");
        assert_eq!(ctx.note.fields.get("Expression").unwrap(), "食べる");
        assert_eq!(ctx.note.fields.get("Reading").unwrap(), "たべる");
        assert_eq!(ctx.note.tags, vec!["yomichan".to_string()]);
        assert!(plan.requests.is_empty());
    }
}

#[cfg(test)]
mod media_resolution {
    use super::*;
    use crate::player::test_utils::FakePlayer;
    use crate::settings::AudioSourceType;

    #[tokio::test]
    async fn screenshot_request_attaches_picture_from_player() {
        let player = FakePlayer::new(PlayerState::default());
        let mut plan = MediaPlan::default();
        plan.register(
            MediaRequestKey::Screenshot {
                max_width: None,
                max_height: None,
                keep_ratio: true,
                with_subs: true,
            },
            "Screenshot",
        );
        let mut note = NoteContext {
            note: AnkiNote {
                deck_name: "d".into(),
                model_name: "m".into(),
                fields: IndexMap::new(),
                tags: Vec::new(),
                options: AnkiNoteAddOptions::AllowDuplicateTrue,
                audio: Vec::new(),
                picture: Vec::new(),
            },
            file_map: FileMap::new(),
        };

        resolve_media(
            plan,
            &mut note,
            &player,
            &AudioSourceResolver::new(),
            &[],
            "",
            "",
            ImageExt::Png,
            AudioExt::Mp3,
        )
        .await;

        assert_eq!(note.note.picture.len(), 1);
        assert_eq!(note.note.picture[0].fields, vec!["Screenshot".to_string()]);
        assert_eq!(player.screenshot_calls.lock().len(), 1);
    }

    #[tokio::test]
    async fn audio_clip_request_uses_subtitle_bounds_with_padding() {
        let mut state = PlayerState::default();
        state.subtitle = Some(crate::player::SubtitleEvent {
            text: "test".into(),
            start_time: 10.0,
            end_time: 12.0,
            delay: 0.0,
        });
        let player = FakePlayer::new(state);
        let mut plan = MediaPlan::default();
        plan.register(
            MediaRequestKey::AudioClip {
                pad_start_micros: 500_000,
                pad_end_micros: 250_000,
                normalize: true,
                db_micros: -14_000_000,
                context: false,
            },
            "Audio",
        );
        let mut note = NoteContext {
            note: AnkiNote {
                deck_name: "d".into(),
                model_name: "m".into(),
                fields: IndexMap::new(),
                tags: Vec::new(),
                options: AnkiNoteAddOptions::AllowDuplicateTrue,
                audio: Vec::new(),
                picture: Vec::new(),
            },
            file_map: FileMap::new(),
        };

        resolve_media(
            plan,
            &mut note,
            &player,
            &AudioSourceResolver::new(),
            &[],
            "",
            "",
            ImageExt::Png,
            AudioExt::Mp3,
        )
        .await;

        assert_eq!(note.note.audio.len(), 1);
        let calls = player.clip_calls.lock();
        assert_eq!(calls.len(), 1);
        let (start, end, normalize, db, _ext) = calls[0];
        assert_eq!(start, 9.5);
        assert_eq!(end, 12.25);
        assert!(normalize);
        assert_eq!(db, -14.0);
    }

    #[tokio::test]
    async fn term_audio_request_attaches_first_resolved_source() {
        let player = FakePlayer::new(PlayerState::default());
        let mut plan = MediaPlan::default();
        plan.register(MediaRequestKey::TermAudio, "Audio");
        let mut note = NoteContext {
            note: AnkiNote {
                deck_name: "d".into(),
                model_name: "m".into(),
                fields: IndexMap::new(),
                tags: Vec::new(),
                options: AnkiNoteAddOptions::AllowDuplicateTrue,
                audio: Vec::new(),
                picture: Vec::new(),
            },
            file_map: FileMap::new(),
        };
        let sources = vec![AudioSourceOptions {
            audio_source_type: AudioSourceType::Custom,
            url: "https://example.com/{expression}.mp3".into(),
            voice: String::new(),
            md5_skip_hash: Some("deadbeef".into()),
        }];

        resolve_media(
            plan,
            &mut note,
            &player,
            &AudioSourceResolver::new(),
            &sources,
            "犬",
            "いぬ",
            ImageExt::Png,
            AudioExt::Mp3,
        )
        .await;

        assert_eq!(note.note.audio.len(), 1);
        assert_eq!(
            note.note.audio[0].source,
            MediaSource::Url("https://example.com/犬.mp3".into())
        );
        assert_eq!(note.note.audio[0].skip_hash.as_deref(), Some("deadbeef"));
    }
}
