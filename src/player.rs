//! Player adapter contract (§6 of the spec): the set of queries and
//! requests this crate issues against the media player that embeds it.
//!
//! The player itself is out of scope — this module only defines the named
//! contract the note builder and query pipeline consume. A real embedder
//! implements [`PlayerAdapter`] against its own player process (mpv, VLC,
//! ...); tests use [`test_utils`]-style fakes the same way `translator.rs`
//! fakes a database.

use std::path::PathBuf;
use thiserror::Error;

/// One *subtitle-changed* event, as the player adapter emits it.
#[derive(Clone, Debug, PartialEq)]
pub struct SubtitleEvent {
    pub text: String,
    pub start_time: f64,
    pub end_time: f64,
    /// Subtitle delay offset currently applied by the player, in seconds.
    pub delay: f64,
}

/// A snapshot of player state at the moment a note is being built. Passed
/// by value into the note builder so field evaluation never has to block on
/// (or race) the live player.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerState {
    pub title: String,
    pub path: String,
    pub subtitle: Option<SubtitleEvent>,
    pub subtitle2: Option<SubtitleEvent>,
    pub paused: bool,
    pub audio_track_id: Option<i64>,
    pub sub_delay: f64,
    pub audio_delay: f64,
    /// Current clipboard contents, if the embedder chooses to expose it (the
    /// `clipboard`/`selection` markers read this).
    pub clipboard: String,
    /// The user's current text selection(s), one entry per disjoint range.
    pub selection: Vec<String>,
}

#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("player returned no screenshot/clip within its own timeout")]
    Timeout,
    #[error("player adapter io error: {0}")]
    Io(String),
    #[error("no active media/subtitle to capture from")]
    NoActiveMedia,
}

/// Image container requested for a screenshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageExt {
    Png,
    Jpg,
    Webp,
}

impl ImageExt {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageExt::Png => "png",
            ImageExt::Jpg => "jpg",
            ImageExt::Webp => "webp",
        }
    }
}

/// Audio container requested for a clip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioExt {
    Mp3,
    Opus,
    Flac,
}

impl AudioExt {
    pub fn as_str(self) -> &'static str {
        match self {
            AudioExt::Mp3 => "mp3",
            AudioExt::Opus => "opus",
            AudioExt::Flac => "flac",
        }
    }
}

/// External collaborator this crate requires from the embedding media
/// player. The note builder's `screenshot`/`audio-media`/`audio-context`
/// markers are the only callers; everything else (seeking, playback
/// control) is the embedder's own concern.
///
/// The builder waits unbounded on `temp_screenshot`/`temp_audio_clip` (§5:
/// "the player adapter is responsible for its own timeout") — a
/// [`PlayerError::Timeout`] is a normal, loggable outcome, not a panic path.
pub trait PlayerAdapter: Send + Sync {
    fn current_title(&self) -> String;
    fn current_path(&self) -> String;
    fn current_subtitle(&self) -> Option<SubtitleEvent>;
    fn current_subtitle2(&self) -> Option<SubtitleEvent>;
    fn paused(&self) -> bool;
    fn sub_start(&self) -> Option<f64>;
    fn sub_end(&self) -> Option<f64>;
    fn audio_track_id(&self) -> Option<i64>;
    fn sub_delay(&self) -> f64;
    fn audio_delay(&self) -> f64;

    /// Captures a still frame from the current playback position to a
    /// temporary file, returning its path.
    fn temp_screenshot(&self, with_subs: bool, ext: ImageExt) -> Result<PathBuf, PlayerError>;

    /// Clips `[start, end]` (seconds, absolute media time) from the current
    /// file to a temporary file, optionally loudness-normalized to `db`
    /// LUFS, returning its path.
    fn temp_audio_clip(
        &self,
        start: f64,
        end: f64,
        normalize: bool,
        db: f64,
        ext: AudioExt,
    ) -> Result<PathBuf, PlayerError>;

    /// Toggles subtitle visibility, used around screenshot capture so
    /// `screenshot-video` (no subs) and `screenshot` (with subs) can share
    /// one code path.
    fn toggle_sub_visibility(&self, visible: bool);

    /// Snapshots every field the note builder needs in one shot, so field
    /// evaluation sees a single consistent instant of player state.
    fn snapshot(&self) -> PlayerState {
        PlayerState {
            title: self.current_title(),
            path: self.current_path(),
            subtitle: self.current_subtitle(),
            subtitle2: self.current_subtitle2(),
            paused: self.paused(),
            audio_track_id: self.audio_track_id(),
            sub_delay: self.sub_delay(),
            audio_delay: self.audio_delay(),
            clipboard: String::new(),
            selection: Vec::new(),
        }
    }
}

#[cfg(test)]
pub mod test_utils {
    use super::*;
    use parking_lot::Mutex;

    /// An in-memory [`PlayerAdapter`] fake for note-builder tests: captures
    /// are recorded rather than touching the filesystem or a real player.
    pub struct FakePlayer {
        pub state: Mutex<PlayerState>,
        pub screenshot_calls: Mutex<Vec<(bool, ImageExt)>>,
        pub clip_calls: Mutex<Vec<(f64, f64, bool, f64, AudioExt)>>,
        pub screenshot_result: PathBuf,
        pub clip_result: PathBuf,
    }

    impl FakePlayer {
        pub fn new(state: PlayerState) -> Self {
            Self {
                state: Mutex::new(state),
                screenshot_calls: Mutex::new(Vec::new()),
                clip_calls: Mutex::new(Vec::new()),
                screenshot_result: PathBuf::from("/tmp/fake_screenshot.png"),
                clip_result: PathBuf::from("/tmp/fake_clip.mp3"),
            }
        }
    }

    impl PlayerAdapter for FakePlayer {
        fn current_title(&self) -> String {
            self.state.lock().title.clone()
        }
        fn current_path(&self) -> String {
            self.state.lock().path.clone()
        }
        fn current_subtitle(&self) -> Option<SubtitleEvent> {
            self.state.lock().subtitle.clone()
        }
        fn current_subtitle2(&self) -> Option<SubtitleEvent> {
            self.state.lock().subtitle2.clone()
        }
        fn paused(&self) -> bool {
            self.state.lock().paused
        }
        fn sub_start(&self) -> Option<f64> {
            self.state.lock().subtitle.as_ref().map(|s| s.start_time)
        }
        fn sub_end(&self) -> Option<f64> {
            self.state.lock().subtitle.as_ref().map(|s| s.end_time)
        }
        fn audio_track_id(&self) -> Option<i64> {
            self.state.lock().audio_track_id
        }
        fn sub_delay(&self) -> f64 {
            self.state.lock().sub_delay
        }
        fn audio_delay(&self) -> f64 {
            self.state.lock().audio_delay
        }
        fn temp_screenshot(&self, with_subs: bool, ext: ImageExt) -> Result<PathBuf, PlayerError> {
            self.screenshot_calls.lock().push((with_subs, ext));
            Ok(self.screenshot_result.clone())
        }
        fn temp_audio_clip(
            &self,
            start: f64,
            end: f64,
            normalize: bool,
            db: f64,
            ext: AudioExt,
        ) -> Result<PathBuf, PlayerError> {
            self.clip_calls.lock().push((start, end, normalize, db, ext));
            Ok(self.clip_result.clone())
        }
        fn toggle_sub_visibility(&self, _visible: bool) {}
    }

    #[test]
    fn fake_player_records_screenshot_requests() {
        let player = FakePlayer::new(PlayerState::default());
        player.temp_screenshot(true, ImageExt::Png).unwrap();
        assert_eq!(player.screenshot_calls.lock().len(), 1);
        assert_eq!(player.screenshot_calls.lock()[0], (true, ImageExt::Png));
    }
}
