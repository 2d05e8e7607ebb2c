//! SRS adapter: wraps [`anki_direct::AnkiClient`] with this crate's profile
//! config (`AnkiOptions`) and hosts the note-building pipeline.

pub mod glossary_builder;
pub mod marker_tokenizer;
pub mod note_builder;

use anki_direct::{
    cache::ModelCache,
    error::AnkiResult,
    model::FullModelDetails,
    notes::{Note, NoteBuilder},
    AnkiClient,
};
use indexmap::IndexMap;
use native_db::db_type;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

use crate::{anki::note_builder::AnkiNote, settings::AnkiOptions};

/// Cache of Anki note-type schemas fetched from the running AnkiConnect
/// server, keyed by model name. Kept separate from the persisted
/// [`AnkiOptions`] tree since it's a runtime mirror of remote state, not a
/// user setting.
pub type NoteModelsMap = IndexMap<String, FullModelDetails>;

#[derive(Error, Debug)]
pub enum DisplayAnkiError {
    #[error("db err: {0}")]
    Database(#[from] Box<db_type::Error>),
    #[error("anki connect client err: {0}")]
    Client(String),
    #[error("no ankiconnect server reachable at port {0}")]
    NotConnected(String),
    #[error("no note model named `{0}` is cached; call auto_add_all_note_models first")]
    UnknownModel(String),
}

#[derive(Clone)]
pub struct DisplayAnki {
    client: AnkiClient,
    /// a ptr to current [Profile] [AnkiOptions]
    options: Arc<RwLock<AnkiOptions>>,
    note_models: Arc<RwLock<NoteModelsMap>>,
}

/// Setup Impl
impl DisplayAnki {
    pub async fn new_auto(port: &str, options: Arc<RwLock<AnkiOptions>>) -> AnkiResult<Self> {
        let client = AnkiClient::new_auto(port).await?;
        let res = Self {
            client,
            options,
            note_models: Arc::new(RwLock::new(IndexMap::new())),
        };
        Ok(res)
    }
    pub fn new_sync(port: &str, version: u8, options: Arc<RwLock<AnkiOptions>>) -> Self {
        Self {
            client: AnkiClient::new_sync(port, version),
            options,
            note_models: Arc::new(RwLock::new(IndexMap::new())),
        }
    }
    pub fn default_latest(options: Arc<RwLock<AnkiOptions>>) -> Self {
        Self {
            client: AnkiClient::default(),
            options,
            note_models: Arc::new(RwLock::new(IndexMap::new())),
        }
    }
    /// Constructs a [`DisplayAnki`] without reaching the network, used by
    /// [`crate::Yomichan::new`] when no `tokio` runtime is driving the call.
    pub fn default_sync_from_options(options: Arc<RwLock<AnkiOptions>>) -> Self {
        let port = options
            .read()
            .map(|o| o.server.clone())
            .unwrap_or_default();
        let port = if port.is_empty() {
            "8765".to_string()
        } else {
            port
        };
        Self::new_sync(&port, 6, options)
    }
}

impl DisplayAnki {
    pub fn options_mut(&self) -> Option<RwLockWriteGuard<AnkiOptions>> {
        self.options.write().ok()
    }
    pub fn options(&self) -> Option<RwLockReadGuard<AnkiOptions>> {
        self.options.read().ok()
    }
    pub fn note_models(&self) -> Option<RwLockReadGuard<NoteModelsMap>> {
        self.note_models.read().ok()
    }
    pub fn note_models_mut(&self) -> Option<RwLockWriteGuard<NoteModelsMap>> {
        self.note_models.write().ok()
    }

    /// [IndexMap::extend]s new note models into the cache.
    pub fn add_note_models<K, V, I>(&mut self, new: I) -> Option<RwLockWriteGuard<'_, NoteModelsMap>>
    where
        K: Into<String>,
        V: Into<FullModelDetails>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut wlock = self.note_models_mut()?;
        wlock.extend(new.into_iter().map(|(k, v)| (k.into(), v.into())));
        Some(wlock)
    }

    /// Updates the note model cache to contain all models found on the
    /// AnkiConnect server.
    ///
    /// This function is useful for displaying the list of models, and letting
    /// the user select which model to create a note for.
    pub async fn auto_add_all_note_models(
        &mut self,
    ) -> AnkiResult<Option<RwLockWriteGuard<'_, NoteModelsMap>>> {
        let mut cache = self.client.cache_mut();
        let mut model_cache = cache.models_mut();
        let latest = model_cache.hydrate().await?.clone();
        let map = latest.get_cache().clone();
        Ok(self.add_note_models(map))
    }

    /// Updates the note model cache with only the specified model names.
    pub async fn auto_add_note_models_by_name(
        &mut self,
        model_names: &[&str],
    ) -> AnkiResult<Option<RwLockWriteGuard<'_, NoteModelsMap>>> {
        let mut cache = self.client.cache_mut();
        let mut model_cache = cache.models_mut();
        let models = model_cache.hydrate().await?;
        let found: IndexMap<String, FullModelDetails> =
            models.find_many_from_key_owned(model_names).collect();
        Ok(self.add_note_models(found))
    }

    /// Sends a finished note to AnkiConnect, returning the created note id.
    pub async fn add_note(&self, note: Note) -> AnkiResult<i64> {
        self.client.notes().add(note).await
    }

    /// Probes whether a note would be added (used by `is_word_addable_for_sentence`
    /// in the text scanner) without actually creating it.
    pub async fn can_add_note(&self, note: &Note) -> AnkiResult<bool> {
        let results = self.client.notes().can_add(std::slice::from_ref(note)).await?;
        Ok(results.into_iter().next().unwrap_or(false))
    }

    /// Converts the note builder's output into an `anki_direct` note and
    /// sends it, returning the created note id. Kept separate from
    /// `add_note` so callers that already hold a raw `anki_direct::Note`
    /// (tests, re-sends) don't pay for the conversion twice.
    pub async fn add_built_note(&self, note: &AnkiNote) -> AnkiResult<i64> {
        let built = self.into_anki_direct_note(note).await?;
        self.add_note(built).await
    }

    /// Probes addability for both orientations of a word (expression as
    /// the headword, and reading-as-expression), used before offering the
    /// "add to Anki" action on a sentence-scan result.
    pub async fn is_word_addable_for_sentence(
        &self,
        expression_note: &AnkiNote,
        reading_note: &AnkiNote,
    ) -> AnkiResult<(bool, bool)> {
        let expression_built = self.into_anki_direct_note(expression_note).await?;
        let reading_built = self.into_anki_direct_note(reading_note).await?;
        let expression_addable = self.can_add_note(&expression_built).await?;
        let reading_addable = self.can_add_note(&reading_built).await?;
        Ok((expression_addable, reading_addable))
    }

    /// Converts one [`AnkiNote`] into an `anki_direct::notes::Note` using the
    /// confirmed `NoteBuilder` chain (model/deck/field/tags/build). Media
    /// attachments (`note.audio`/`note.picture`) are synthesized ahead of
    /// time by the note builder but are not yet threaded into this
    /// conversion: `anki_direct`'s wire shape for AnkiConnect's `audio`/
    /// `picture` arguments isn't available anywhere in this workspace to
    /// ground against, so callers that need media attached should upload it
    /// out of band (e.g. via `storeMediaFile`) and reference it from a field
    /// value instead.
    async fn into_anki_direct_note(&self, note: &AnkiNote) -> AnkiResult<Note> {
        let mut builder = NoteBuilder::default()
            .model_name(note.model_name.clone())
            .deck_name(note.deck_name.clone())
            .tags(note.tags.clone());
        for (field_name, value) in &note.fields {
            builder = builder.field(field_name.clone(), value.clone());
        }
        let _ = &note.options;
        builder.build(None).await
    }
}
