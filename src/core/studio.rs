//! The writing studio: owns the editable state and orchestrates
//! selection, reveal, copy and save.
//!
//! ```text
//! Idle --submit(blank)--> Idle          PromptRequired
//! Idle --submit--> Revealing            state reset, reveal started
//! Revealing --last word--> Idle         ContentReady
//! Revealing --submit--> Revealing       previous run superseded
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::Rng;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::core::clipboard::{ClipboardError, ClipboardSink};
use crate::core::config::{ConfigError, StudioConfig};
use crate::core::notify::{Notification, Notifier, TracingNotifier};
use crate::core::reveal::{RevealError, RevealHandle, RevealOutcome, RevealScheduler};
use crate::core::selector;
use crate::schema::genre::GenreTag;
use crate::schema::prompt::{self, INSPIRATION_PROMPTS};
use crate::schema::reveal::{GenerationId, RevealFrame, RevealState};

pub const PLACEHOLDER: &str = "Your generated content will appear here...";
pub const PLACEHOLDER_HINT: &str = "Choose a genre and provide a prompt to get started";

#[derive(Debug, Error)]
pub enum StudioError {
    #[error("a prompt is required")]
    PromptRequired,
    #[error("nothing has been revealed yet")]
    NothingRevealed,
    #[error("no inspiration prompt at index {0}")]
    UnknownInspiration(usize),
    #[error("generation failed: {0}")]
    Generation(#[from] RevealError),
    #[error("clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// The top-level studio. Built via `WritingStudio::builder()`.
pub struct WritingStudio {
    config: StudioConfig,
    genre: Option<GenreTag>,
    prompt: String,
    scheduler: RevealScheduler,
    state: Arc<watch::Sender<RevealState>>,
    clipboard: Box<dyn ClipboardSink>,
    notifier: Arc<dyn Notifier>,
}

/// Builder for constructing a `WritingStudio`.
pub struct WritingStudioBuilder {
    config: Option<StudioConfig>,
    config_path: Option<PathBuf>,
    genre: Option<GenreTag>,
    prompt: String,
    /// Defaults to the system clipboard, or an in-memory one without the
    /// `system-clipboard` feature.
    clipboard: Option<Box<dyn ClipboardSink>>,
    /// Defaults to logging through tracing.
    notifier: Option<Arc<dyn Notifier>>,
}

impl WritingStudio {
    pub fn builder() -> WritingStudioBuilder {
        WritingStudioBuilder {
            config: None,
            config_path: None,
            genre: None,
            prompt: String::new(),
            clipboard: None,
            notifier: None,
        }
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn genre(&self) -> Option<GenreTag> {
        self.genre
    }

    /// Select a genre, or clear the selection with `None`.
    pub fn select_genre(&mut self, genre: Option<GenreTag>) {
        debug!(genre = ?genre.map(|g| g.id()), "genre selected");
        self.genre = genre;
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// Replace the prompt with one of the inspiration prompts.
    pub fn use_inspiration(&mut self, index: usize) -> Result<&str, StudioError> {
        let picked = INSPIRATION_PROMPTS
            .get(index)
            .ok_or(StudioError::UnknownInspiration(index))?;
        self.prompt = picked.to_string();
        Ok(&self.prompt)
    }

    /// Replace the prompt with a random inspiration prompt.
    pub fn inspire<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &str {
        self.prompt = prompt::random_inspiration(rng).to_string();
        &self.prompt
    }

    /// A snapshot of the reveal state.
    pub fn state(&self) -> RevealState {
        self.state.borrow().clone()
    }

    /// Watch the reveal state. Receivers see the latest value, not every
    /// intermediate frame.
    pub fn subscribe(&self) -> watch::Receiver<RevealState> {
        self.state.subscribe()
    }

    pub fn revealed_text(&self) -> String {
        self.state.borrow().revealed_text.clone()
    }

    pub fn is_generating(&self) -> bool {
        self.state.borrow().in_progress
    }

    /// Label for the generate action.
    pub fn action_label(&self) -> &'static str {
        if self.is_generating() {
            "Crafting Your Story..."
        } else {
            "Generate Story"
        }
    }

    /// Validate the prompt, select the text and start revealing it.
    ///
    /// Returns without waiting for the reveal. A blank prompt is rejected
    /// and leaves the state untouched. Must be called from within a tokio
    /// runtime.
    pub fn submit(&mut self) -> Result<RevealHandle, StudioError> {
        if prompt::is_blank(&self.prompt) {
            warn!("generation requested without a prompt");
            self.notifier.notify(Notification::PromptRequired);
            return Err(StudioError::PromptRequired);
        }

        let text = selector::select(self.genre, &self.prompt);
        let generation = self.scheduler.advance();
        info!(
            %generation,
            genre = ?self.genre.map(|g| g.id()),
            "generating"
        );

        self.state.send_modify(|state| state.begin(generation, text.clone()));
        Ok(self
            .scheduler
            .spawn(generation, text, self.frame_observer()))
    }

    /// Wait for a reveal started by [`submit`](Self::submit). A failed run
    /// is reported to the user and stops the generating state.
    pub async fn await_reveal(&self, handle: RevealHandle) -> Result<RevealOutcome, StudioError> {
        let generation = handle.generation();
        match handle.finished().await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                self.report_failure(generation, &e);
                Err(e.into())
            }
        }
    }

    /// Submit and wait for the reveal to end.
    pub async fn generate(&mut self) -> Result<RevealOutcome, StudioError> {
        let handle = self.submit()?;
        self.await_reveal(handle).await
    }

    /// Copy whatever has been revealed so far.
    pub fn copy_to_clipboard(&mut self) -> Result<(), StudioError> {
        let text = self.require_revealed()?;
        if let Err(e) = self.clipboard.set_text(&text) {
            warn!(error = %e, "copy failed");
            self.notifier.notify(Notification::Failed);
            return Err(e.into());
        }
        self.notifier.notify(Notification::Copied);
        Ok(())
    }

    /// Write whatever has been revealed so far to the configured filename
    /// inside `dir`. Returns the written path.
    pub fn save_to_dir(&self, dir: &Path) -> Result<PathBuf, StudioError> {
        let text = self.require_revealed()?;
        let path = dir.join(&self.config.download_filename);
        if let Err(e) = std::fs::write(&path, text.as_bytes()) {
            warn!(path = %path.display(), error = %e, "save failed");
            self.notifier.notify(Notification::Failed);
            return Err(e.into());
        }
        info!(path = %path.display(), bytes = text.len(), "saved");
        self.notifier.notify(Notification::Downloaded);
        Ok(path)
    }

    fn require_revealed(&self) -> Result<String, StudioError> {
        let text = self.revealed_text();
        if text.is_empty() {
            return Err(StudioError::NothingRevealed);
        }
        Ok(text)
    }

    fn report_failure(&self, generation: GenerationId, error: &RevealError) {
        warn!(%generation, %error, "reveal failed");
        self.state
            .send_if_modified(|state| state.abandon(generation));
        self.notifier.notify(Notification::Failed);
    }

    /// Applies frames to the shared state. Frames from a superseded run
    /// fail the generation check inside `apply` and are dropped.
    fn frame_observer(&self) -> impl FnMut(RevealFrame) + Send + 'static {
        let state = Arc::clone(&self.state);
        let notifier = Arc::clone(&self.notifier);
        move |frame: RevealFrame| {
            let mut completed = false;
            let applied = state.send_if_modified(|state| {
                let applied = state.apply(&frame);
                completed = applied && !state.in_progress;
                applied
            });
            if !applied {
                debug!(generation = %frame.generation, index = frame.index, "stale frame dropped");
            }
            if completed {
                info!(generation = %frame.generation, words = frame.total, "content ready");
                notifier.notify(Notification::ContentReady);
            }
        }
    }
}

impl WritingStudioBuilder {
    pub fn config(mut self, config: StudioConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Load the config from a RON file at build time. Takes precedence
    /// over [`config`](Self::config).
    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn genre(mut self, genre: GenreTag) -> Self {
        self.genre = Some(genre);
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_clipboard(mut self, clipboard: impl ClipboardSink + 'static) -> Self {
        self.clipboard = Some(Box::new(clipboard));
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn build(self) -> Result<WritingStudio, StudioError> {
        let config = match self.config_path {
            Some(ref path) => StudioConfig::load_from_ron(path)?,
            None => {
                let config = self.config.unwrap_or_default();
                config.validate()?;
                config
            }
        };

        let (state, _) = watch::channel(RevealState::default());

        Ok(WritingStudio {
            scheduler: RevealScheduler::new(config.word_delay()),
            config,
            genre: self.genre,
            prompt: self.prompt,
            state: Arc::new(state),
            clipboard: self.clipboard.unwrap_or_else(default_clipboard),
            notifier: self.notifier.unwrap_or_else(|| Arc::new(TracingNotifier)),
        })
    }
}

#[cfg(feature = "system-clipboard")]
fn default_clipboard() -> Box<dyn ClipboardSink> {
    Box::new(crate::core::clipboard::SystemClipboard)
}

#[cfg(not(feature = "system-clipboard"))]
fn default_clipboard() -> Box<dyn ClipboardSink> {
    Box::new(crate::core::clipboard::MemoryClipboard::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clipboard::MemoryClipboard;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<Notification>>);

    impl Notifier for Recorder {
        fn notify(&self, notification: Notification) {
            self.0.lock().unwrap().push(notification);
        }
    }

    fn build_test_studio() -> (WritingStudio, Arc<Recorder>, MemoryClipboard) {
        let recorder = Arc::new(Recorder::default());
        let clipboard = MemoryClipboard::default();
        let studio = WritingStudio::builder()
            .config(StudioConfig {
                word_delay_ms: 10,
                ..StudioConfig::default()
            })
            .with_clipboard(clipboard.clone())
            .with_notifier(recorder.clone())
            .build()
            .unwrap();
        (studio, recorder, clipboard)
    }

    #[test]
    fn builder_defaults() {
        let studio = WritingStudio::builder().build().unwrap();
        assert_eq!(studio.config(), &StudioConfig::default());
        assert_eq!(studio.genre(), None);
        assert_eq!(studio.prompt(), "");
        assert_eq!(studio.action_label(), "Generate Story");
        assert_eq!(studio.state(), RevealState::default());
    }

    #[test]
    fn builder_rejects_bad_config() {
        let result = WritingStudio::builder()
            .config(StudioConfig {
                download_filename: "a/b.txt".to_string(),
                ..StudioConfig::default()
            })
            .build();
        assert!(matches!(result, Err(StudioError::Config(_))));
    }

    #[test]
    fn builder_missing_config_file_is_an_error() {
        let result = WritingStudio::builder()
            .config_path("does/not/exist.ron")
            .build();
        assert!(matches!(result, Err(StudioError::Config(ConfigError::Io(_)))));
    }

    #[test]
    fn inspiration_by_index() {
        let (mut studio, _, _) = build_test_studio();
        assert_eq!(
            studio.use_inspiration(0).unwrap(),
            "A mysterious letter arrives at midnight..."
        );
        assert!(matches!(
            studio.use_inspiration(6),
            Err(StudioError::UnknownInspiration(6))
        ));
        assert_eq!(studio.prompt(), "A mysterious letter arrives at midnight...");
    }

    #[test]
    fn inspiration_at_random() {
        let (mut studio, _, _) = build_test_studio();
        let mut rng = StdRng::seed_from_u64(3);
        let picked = studio.inspire(&mut rng).to_string();
        assert!(INSPIRATION_PROMPTS.contains(&picked.as_str()));
    }

    #[test]
    fn copy_and_save_need_content() {
        let (mut studio, recorder, clipboard) = build_test_studio();
        assert!(matches!(
            studio.copy_to_clipboard(),
            Err(StudioError::NothingRevealed)
        ));
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            studio.save_to_dir(dir.path()),
            Err(StudioError::NothingRevealed)
        ));
        assert!(clipboard.contents().is_none());
        assert!(recorder.0.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn generating_label_while_revealing() {
        let (mut studio, _, _) = build_test_studio();
        studio.select_genre(Some(GenreTag::Mystery));
        studio.set_prompt("case");

        let handle = studio.submit().unwrap();
        assert!(studio.is_generating());
        assert_eq!(studio.action_label(), "Crafting Your Story...");

        studio.await_reveal(handle).await.unwrap();
        assert!(!studio.is_generating());
        assert_eq!(studio.action_label(), "Generate Story");
    }

    #[tokio::test(start_paused = true)]
    async fn failed_reveal_is_reported() {
        let (studio, recorder, _) = build_test_studio();
        let generation = studio.scheduler.advance();
        studio
            .state
            .send_modify(|state| state.begin(generation, "a b".to_string()));
        let handle = studio.scheduler.spawn(generation, "a b".to_string(), |_| {
            panic!("observer blew up")
        });

        let result = studio.await_reveal(handle).await;
        assert!(matches!(result, Err(StudioError::Generation(_))));
        assert!(!studio.is_generating());
        assert_eq!(*recorder.0.lock().unwrap(), vec![Notification::Failed]);
    }
}
