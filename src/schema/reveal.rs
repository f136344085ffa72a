use serde::{Deserialize, Serialize};

/// Monotonic id distinguishing reveal runs. Frames carrying an id other
/// than the current one are stale and must be ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct GenerationId(pub u64);

impl std::fmt::Display for GenerationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One emission of a reveal run: the first `index + 1` words of the text,
/// joined by single spaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealFrame {
    pub generation: GenerationId,
    pub index: usize,
    pub total: usize,
    pub text: String,
}

impl RevealFrame {
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.total
    }
}

/// The revealed-text state owned by the studio.
///
/// `revealed_text` is always a word-aligned prefix of the normalized
/// `full_text`; `in_progress` is true until the final word lands.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RevealState {
    pub generation: GenerationId,
    pub full_text: String,
    pub revealed_text: String,
    pub revealed_words: usize,
    pub total_words: usize,
    pub in_progress: bool,
}

impl RevealState {
    /// Reset for a new run. Any previous content is discarded.
    pub fn begin(&mut self, generation: GenerationId, full_text: String) {
        let total_words = full_text.split_whitespace().count();
        *self = RevealState {
            generation,
            full_text,
            revealed_text: String::new(),
            revealed_words: 0,
            total_words,
            in_progress: total_words > 0,
        };
    }

    /// Apply a frame. Returns false, leaving the state untouched, if the
    /// frame belongs to another run or arrives out of order.
    pub fn apply(&mut self, frame: &RevealFrame) -> bool {
        if frame.generation != self.generation
            || frame.index != self.revealed_words
            || frame.total != self.total_words
        {
            return false;
        }
        self.revealed_text.clone_from(&frame.text);
        self.revealed_words = frame.index + 1;
        if frame.is_last() {
            self.in_progress = false;
        }
        true
    }

    /// Stop the current run without completing it (used on failure).
    pub fn abandon(&mut self, generation: GenerationId) -> bool {
        if generation != self.generation || !self.in_progress {
            return false;
        }
        self.in_progress = false;
        true
    }

    pub fn is_complete(&self) -> bool {
        !self.in_progress && self.total_words > 0 && self.revealed_words == self.total_words
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(generation: u64, index: usize, total: usize, text: &str) -> RevealFrame {
        RevealFrame {
            generation: GenerationId(generation),
            index,
            total,
            text: text.to_string(),
        }
    }

    #[test]
    fn begin_resets_previous_content() {
        let mut state = RevealState::default();
        state.begin(GenerationId(1), "one two".to_string());
        assert!(state.apply(&frame(1, 0, 2, "one")));

        state.begin(GenerationId(2), "three four five".to_string());
        assert_eq!(state.revealed_text, "");
        assert_eq!(state.total_words, 3);
        assert!(state.in_progress);
    }

    #[test]
    fn stale_frames_are_ignored() {
        let mut state = RevealState::default();
        state.begin(GenerationId(2), "alpha beta".to_string());
        assert!(!state.apply(&frame(1, 0, 2, "alpha")));
        assert_eq!(state.revealed_text, "");
    }

    #[test]
    fn out_of_order_frames_are_ignored() {
        let mut state = RevealState::default();
        state.begin(GenerationId(1), "alpha beta".to_string());
        assert!(!state.apply(&frame(1, 1, 2, "alpha beta")));
        assert!(state.apply(&frame(1, 0, 2, "alpha")));
        assert!(state.in_progress);
    }

    #[test]
    fn final_frame_completes() {
        let mut state = RevealState::default();
        state.begin(GenerationId(1), "alpha\n\nbeta".to_string());
        assert!(state.apply(&frame(1, 0, 2, "alpha")));
        assert!(state.apply(&frame(1, 1, 2, "alpha beta")));
        assert!(!state.in_progress);
        assert!(state.is_complete());
        assert_eq!(state.revealed_text, "alpha beta");
    }

    #[test]
    fn empty_text_is_never_in_progress() {
        let mut state = RevealState::default();
        state.begin(GenerationId(1), "   ".to_string());
        assert!(!state.in_progress);
        assert!(!state.is_complete());
    }

    #[test]
    fn abandon_only_affects_current_run() {
        let mut state = RevealState::default();
        state.begin(GenerationId(3), "a b c".to_string());
        assert!(!state.abandon(GenerationId(2)));
        assert!(state.in_progress);
        assert!(state.abandon(GenerationId(3)));
        assert!(!state.in_progress);
    }
}
