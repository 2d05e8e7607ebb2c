//! Audio source resolution (§4.9): flattens a profile's configured audio
//! sources into concrete `(name, url, md5_skip_hash)` entries for a term,
//! expanding JSON catalog sources lazily over HTTP.
//!
//! Grounded on the `reqwest` JSON-fetch pattern used throughout the
//! retrieval pack (`ricardobm-kotoba-old`, `aecsocket-wordbase`,
//! `Ertingel-Anki-deck-generator`): a short-timeout `Client::get` followed
//! by `.json::<T>()`, with non-conforming bodies treated as "no data"
//! rather than a hard error.

use std::{
    collections::HashMap,
    sync::Arc,
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::settings::{AudioSourceOptions, AudioSourceType};

const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum AudioSourceError {
    #[error("request to {0} timed out")]
    Timeout(String),
    #[error("http error: {0}")]
    Http(String),
    #[error("audio source catalog at {0} was not a recognized audioSourceList")]
    MalformedCatalog(String),
}

/// One concrete, playable audio entry offered to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedAudioSource {
    pub name: String,
    pub url: String,
    pub md5_skip_hash: Option<String>,
}

/// The `{ "type": "audioSourceList", "audioSources": [...] }` shape a JSON
/// audio source is expected to return. Anything else is "no children"
/// per §6.
#[derive(Deserialize, Debug)]
struct AudioSourceListResponse {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, rename = "audioSources")]
    audio_sources: Vec<AudioSourceListEntry>,
}

#[derive(Deserialize, Debug)]
struct AudioSourceListEntry {
    name: String,
    url: String,
}

/// Substitutes `{expression}`/`{reading}` placeholders in a URL template.
fn substitute(template: &str, expression: &str, reading: &str) -> String {
    template
        .replace("{expression}", expression)
        .replace("{reading}", reading)
}

/// Key identifying one in-flight or cached resolution: a source (by its
/// position in the profile's source list) and the term it was resolved
/// for.
type CacheKey = (usize, String, String);

/// Resolves a profile's configured [`AudioSourceOptions`] list into
/// concrete [`ResolvedAudioSource`] entries for a given term, caching per
/// `(source, term)` pair for the lifetime of the resolver and de-duplicating
/// concurrent fetches for the same pair.
pub struct AudioSourceResolver {
    client: reqwest::Client,
    cache: Mutex<HashMap<CacheKey, Arc<Vec<ResolvedAudioSource>>>>,
    /// Tracks pairs currently being fetched so a second caller awaits the
    /// first fetch's result instead of issuing a duplicate HTTP request.
    in_flight: Mutex<HashMap<CacheKey, Arc<tokio::sync::Notify>>>,
}

impl Default for AudioSourceResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSourceResolver {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(FETCH_TIMEOUT)
                .build()
                .unwrap_or_default(),
            cache: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Resolves every configured source for `(expression, reading)`,
    /// preserving source order; `File` sources substitute and emit directly,
    /// `Json`/`CustomJson` sources are fetched and flattened into their
    /// children.
    pub async fn resolve(
        &self,
        sources: &[AudioSourceOptions],
        expression: &str,
        reading: &str,
    ) -> Vec<ResolvedAudioSource> {
        let mut out = Vec::new();
        for (index, source) in sources.iter().enumerate() {
            match source.audio_source_type {
                AudioSourceType::CustomJson => {
                    out.extend(
                        self.resolve_json(index, source, expression, reading)
                            .await,
                    );
                }
                _ => {
                    let url = substitute(&source.url, expression, reading);
                    out.push(ResolvedAudioSource {
                        name: source_name(source.audio_source_type),
                        url,
                        md5_skip_hash: source.md5_skip_hash.clone(),
                    });
                }
            }
        }
        out
    }

    async fn resolve_json(
        &self,
        index: usize,
        source: &AudioSourceOptions,
        expression: &str,
        reading: &str,
    ) -> Vec<ResolvedAudioSource> {
        let key: CacheKey = (index, expression.to_string(), reading.to_string());

        if let Some(cached) = self.cache.lock().await.get(&key) {
            return (**cached).clone();
        }

        // Only one fetch per (source, term) pair runs concurrently; later
        // callers wait on the first one's `Notify` instead of re-fetching.
        // `notified_owned` registers the waiter while `in_flight` is still
        // locked, so a `notify_waiters()` from the leader can't land in the
        // gap between cloning the `Notify` and awaiting it.
        let notified = {
            let mut in_flight = self.in_flight.lock().await;
            if let Some(existing) = in_flight.get(&key) {
                Some(existing.clone().notified_owned())
            } else {
                in_flight.insert(key.clone(), Arc::new(tokio::sync::Notify::new()));
                None
            }
        };

        if let Some(notified) = notified {
            notified.await;
            return self
                .cache
                .lock()
                .await
                .get(&key)
                .map(|v| (**v).clone())
                .unwrap_or_default();
        }

        let url = substitute(&source.url, expression, reading);
        let result = self.fetch_catalog(&url).await.unwrap_or_default();
        let resolved: Vec<ResolvedAudioSource> = result
            .into_iter()
            .map(|entry| ResolvedAudioSource {
                name: entry.name,
                url: entry.url,
                // JSON children inherit their parent's skip-hash (§8 S6).
                md5_skip_hash: source.md5_skip_hash.clone(),
            })
            .collect();

        self.cache
            .lock()
            .await
            .insert(key.clone(), Arc::new(resolved.clone()));
        if let Some(notify) = self.in_flight.lock().await.remove(&key) {
            notify.notify_waiters();
        }

        resolved
    }

    async fn fetch_catalog(
        &self,
        url: &str,
    ) -> Result<Vec<AudioSourceListEntry>, AudioSourceError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| map_reqwest_err(url, e))?;
        let parsed: Result<AudioSourceListResponse, _> = response.json().await;
        match parsed {
            Ok(catalog) if catalog.kind == "audioSourceList" => Ok(catalog.audio_sources),
            _ => Err(AudioSourceError::MalformedCatalog(url.to_string())),
        }
    }
}

fn map_reqwest_err(url: &str, e: reqwest::Error) -> AudioSourceError {
    if e.is_timeout() {
        AudioSourceError::Timeout(url.to_string())
    } else {
        AudioSourceError::Http(e.to_string())
    }
}

fn source_name(kind: AudioSourceType) -> String {
    match kind {
        AudioSourceType::Jpod101 => "JapanesePod101",
        AudioSourceType::Jpod101Alternate => "JapanesePod101 (alternate)",
        AudioSourceType::Jisho => "Jisho.org",
        AudioSourceType::LinguaLibre => "Lingua Libre",
        AudioSourceType::Wiktionary => "Wiktionary",
        AudioSourceType::TextToSpeech => "Text-to-speech",
        AudioSourceType::TextToSpeechReading => "Text-to-speech (reading)",
        AudioSourceType::Custom => "Custom",
        AudioSourceType::CustomJson => "Custom (JSON)",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn file_source(url: &str) -> AudioSourceOptions {
        AudioSourceOptions {
            audio_source_type: AudioSourceType::Custom,
            url: url.to_string(),
            voice: String::new(),
            md5_skip_hash: None,
        }
    }

    #[tokio::test]
    async fn file_source_substitutes_placeholders() {
        let resolver = AudioSourceResolver::new();
        let sources = vec![file_source("https://example.com/{expression}/{reading}.mp3")];
        let resolved = resolver.resolve(&sources, "犬", "いぬ").await;
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].url, "https://example.com/犬/いぬ.mp3");
    }

    #[test]
    fn substitute_replaces_both_placeholders() {
        assert_eq!(
            substitute("{expression}-{reading}", "猫", "ねこ"),
            "猫-ねこ"
        );
    }

    #[tokio::test]
    async fn malformed_json_source_yields_no_children() {
        // Unreachable host resolves to an Http/Timeout error either way,
        // which resolve_json treats the same as a malformed catalog: empty.
        let resolver = AudioSourceResolver::new();
        let sources = vec![AudioSourceOptions {
            audio_source_type: AudioSourceType::CustomJson,
            url: "https://127.0.0.1.invalid/{expression}.json".to_string(),
            voice: String::new(),
            md5_skip_hash: None,
        }];
        let resolved = resolver.resolve(&sources, "犬", "いぬ").await;
        assert!(resolved.is_empty());
    }
}
