//! Word-by-word reveal scheduling.
//!
//! A reveal run is a tokio task that waits a fixed delay, then emits the
//! next word-aligned prefix of the text, until every word is out. Runs are
//! tagged with a [`GenerationId`]; starting a new run makes every older
//! run stale, and a stale run stops at its next tick without emitting.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::schema::reveal::{GenerationId, RevealFrame};

/// Delay before each word, including the first.
pub const DEFAULT_WORD_DELAY: Duration = Duration::from_millis(80);

#[derive(Debug, Error)]
pub enum RevealError {
    #[error("reveal run {0} failed: {1}")]
    TaskFailed(GenerationId, String),
}

/// How a reveal run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Every word was emitted.
    Completed,
    /// A newer run started first; the remaining words were dropped.
    Superseded,
}

/// Split on any whitespace. Runs of whitespace collapse and leading or
/// trailing whitespace yields no empty tokens.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// The text as the final reveal frame shows it: tokens joined by single
/// spaces. Line breaks do not survive this.
pub fn normalize(text: &str) -> String {
    tokenize(text).join(" ")
}

/// Every frame a run over `text` would emit, computed up front. For hosts
/// that drive their own timers.
pub fn reveal_frames(generation: GenerationId, text: &str) -> Vec<RevealFrame> {
    let tokens = tokenize(text);
    let total = tokens.len();
    let mut revealed = String::with_capacity(text.len());
    tokens
        .into_iter()
        .enumerate()
        .map(|(index, token)| {
            push_word(&mut revealed, token);
            RevealFrame {
                generation,
                index,
                total,
                text: revealed.clone(),
            }
        })
        .collect()
}

fn push_word(revealed: &mut String, word: &str) {
    if !revealed.is_empty() {
        revealed.push(' ');
    }
    revealed.push_str(word);
}

/// Starts reveal runs and tracks which one is current.
///
/// Clones share the generation counter, so a run started from any clone
/// supersedes runs started from the others.
#[derive(Debug, Clone)]
pub struct RevealScheduler {
    delay: Duration,
    current: Arc<AtomicU64>,
}

impl Default for RevealScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_WORD_DELAY)
    }
}

impl RevealScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            current: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// The id of the most recently started run (0 before any run).
    pub fn current(&self) -> GenerationId {
        GenerationId(self.current.load(Ordering::Acquire))
    }

    pub fn is_current(&self, generation: GenerationId) -> bool {
        self.current() == generation
    }

    /// Claim the next generation id. From this point on, every earlier run
    /// is stale.
    pub fn advance(&self) -> GenerationId {
        GenerationId(self.current.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Start a run for an id obtained from [`advance`](Self::advance).
    ///
    /// Splitting the two steps lets a caller record the new id in its own
    /// state before the first frame can arrive. Must be called from within
    /// a tokio runtime.
    pub fn spawn<F>(&self, generation: GenerationId, text: String, on_frame: F) -> RevealHandle
    where
        F: FnMut(RevealFrame) + Send + 'static,
    {
        let task = tokio::spawn(run(
            generation,
            text,
            self.delay,
            Arc::clone(&self.current),
            on_frame,
        ));
        RevealHandle { generation, task }
    }

    /// Advance and spawn in one step.
    pub fn reveal<F>(&self, text: String, on_frame: F) -> RevealHandle
    where
        F: FnMut(RevealFrame) + Send + 'static,
    {
        let generation = self.advance();
        self.spawn(generation, text, on_frame)
    }
}

async fn run<F>(
    generation: GenerationId,
    text: String,
    delay: Duration,
    current: Arc<AtomicU64>,
    mut on_frame: F,
) -> RevealOutcome
where
    F: FnMut(RevealFrame),
{
    let tokens = tokenize(&text);
    let total = tokens.len();
    debug!(%generation, words = total, "reveal started");

    let mut revealed = String::with_capacity(text.len());
    for (index, token) in tokens.into_iter().enumerate() {
        tokio::time::sleep(delay).await;

        if current.load(Ordering::Acquire) != generation.0 {
            debug!(%generation, emitted = index, "reveal superseded");
            return RevealOutcome::Superseded;
        }

        push_word(&mut revealed, token);
        trace!(%generation, index, "reveal frame");
        on_frame(RevealFrame {
            generation,
            index,
            total,
            text: revealed.clone(),
        });
    }

    debug!(%generation, "reveal completed");
    RevealOutcome::Completed
}

/// A started reveal run.
#[derive(Debug)]
pub struct RevealHandle {
    generation: GenerationId,
    task: JoinHandle<RevealOutcome>,
}

impl RevealHandle {
    pub fn generation(&self) -> GenerationId {
        self.generation
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the run to end. Resolves once, after the final emission.
    pub async fn finished(self) -> Result<RevealOutcome, RevealError> {
        let generation = self.generation;
        match self.task.await {
            Ok(outcome) => Ok(outcome),
            Err(e) if e.is_cancelled() => Ok(RevealOutcome::Superseded),
            Err(e) => Err(RevealError::TaskFailed(generation, e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::time::Instant;

    type Recorded = Arc<Mutex<Vec<(Instant, RevealFrame)>>>;

    fn recorder(frames: &Recorded) -> impl FnMut(RevealFrame) + Send + 'static {
        let sink = Arc::clone(frames);
        move |frame: RevealFrame| sink.lock().unwrap().push((Instant::now(), frame))
    }

    #[test]
    fn tokenize_collapses_whitespace() {
        assert_eq!(tokenize("  a \n\n b\tc  "), vec!["a", "b", "c"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn normalize_round_trips_single_spaced_text() {
        assert_eq!(normalize("one two three"), "one two three");
        assert_eq!(normalize("one\ntwo  three"), "one two three");
    }

    #[test]
    fn frames_grow_one_word_at_a_time() {
        let frames = reveal_frames(GenerationId(1), "a  b\nc");
        let texts: Vec<&str> = frames.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "a b", "a b c"]);
        assert!(frames[2].is_last());
        assert!(!frames[1].is_last());
    }

    #[test]
    fn advance_is_monotonic() {
        let scheduler = RevealScheduler::default();
        assert_eq!(scheduler.current(), GenerationId(0));
        let first = scheduler.advance();
        let second = scheduler.clone().advance();
        assert!(second > first);
        assert!(scheduler.is_current(second));
    }

    #[tokio::test(start_paused = true)]
    async fn emits_each_word_after_delay() {
        let scheduler = RevealScheduler::default();
        let frames = Recorded::default();
        let start = Instant::now();

        let handle = scheduler.reveal("one two  three".to_string(), recorder(&frames));
        assert_eq!(handle.finished().await.unwrap(), RevealOutcome::Completed);

        let frames = frames.lock().unwrap();
        assert_eq!(frames.len(), 3);
        let mut previous = start;
        for (i, (at, frame)) in frames.iter().enumerate() {
            let gap = *at - previous;
            assert!(gap >= DEFAULT_WORD_DELAY && gap < DEFAULT_WORD_DELAY + Duration::from_millis(2));
            assert_eq!(frame.index, i);
            assert_eq!(frame.total, 3);
            previous = *at;
        }
        assert_eq!(frames[2].1.text, "one two three");
    }

    #[tokio::test(start_paused = true)]
    async fn empty_text_completes_without_frames() {
        let scheduler = RevealScheduler::default();
        let frames = Recorded::default();
        let handle = scheduler.reveal(" \n ".to_string(), recorder(&frames));
        assert_eq!(handle.finished().await.unwrap(), RevealOutcome::Completed);
        assert!(frames.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn newer_run_supersedes_older() {
        let scheduler = RevealScheduler::default();
        let frames = Recorded::default();

        let first = scheduler.reveal("a b c d e f".to_string(), recorder(&frames));
        tokio::time::sleep(Duration::from_millis(250)).await;
        let second = scheduler.reveal("x y".to_string(), recorder(&frames));

        assert_eq!(first.finished().await.unwrap(), RevealOutcome::Superseded);
        assert_eq!(second.finished().await.unwrap(), RevealOutcome::Completed);

        let frames = frames.lock().unwrap();
        let generations: Vec<u64> = frames.iter().map(|(_, f)| f.generation.0).collect();
        assert_eq!(generations, vec![1, 1, 1, 2, 2]);
        assert_eq!(frames.last().unwrap().1.text, "x y");
    }
}
