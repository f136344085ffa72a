//! WASM bindings for creative-writer — powers the browser page.
//!
//! The page owns its own timers, so instead of running the tokio reveal
//! scheduler this exposes the precomputed frames plus the cadence, and a
//! generation id the page uses to ignore frames from a superseded request.

use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;

use creative_writer::core::config::StudioConfig;
use creative_writer::core::notify::Notification;
use creative_writer::core::reveal::reveal_frames;
use creative_writer::core::selector;
use creative_writer::schema::genre::GenreTag;
use creative_writer::schema::prompt::{self, INSPIRATION_PROMPTS};
use creative_writer::schema::reveal::GenerationId;

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
struct GenreInfo {
    id: &'static str,
    name: &'static str,
}

#[derive(serde::Serialize)]
struct Composition {
    generation: u64,
    genre: Option<&'static str>,
    text: String,
    frames: Vec<String>,
    word_delay_ms: u64,
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&format!("JSON error: {e}")))
}

// ---------------------------------------------------------------------------
// WritingDemo — the main exported struct
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct WritingDemo {
    genre: Option<GenreTag>,
    prompt: String,
    generation: u64,
    config: StudioConfig,
    rng: StdRng,
}

#[wasm_bindgen]
impl WritingDemo {
    /// Create a demo instance. `seed` drives random inspiration picks.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> WritingDemo {
        WritingDemo {
            genre: None,
            prompt: String::new(),
            generation: 0,
            config: StudioConfig::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Select a genre by id. An empty id clears the selection; an unknown
    /// id also clears it and returns false.
    pub fn select_genre(&mut self, id: &str) -> bool {
        self.genre = GenreTag::from_id(id);
        self.genre.is_some() || id.is_empty()
    }

    pub fn genre(&self) -> Option<String> {
        self.genre.map(|g| g.id().to_string())
    }

    pub fn set_prompt(&mut self, prompt: &str) {
        self.prompt = prompt.to_string();
    }

    pub fn prompt(&self) -> String {
        self.prompt.clone()
    }

    /// Use inspiration prompt `index`; returns it.
    pub fn use_inspiration(&mut self, index: usize) -> Result<String, JsError> {
        let picked = INSPIRATION_PROMPTS
            .get(index)
            .ok_or_else(|| JsError::new(&format!("No inspiration prompt at index {index}")))?;
        self.prompt = picked.to_string();
        Ok(self.prompt.clone())
    }

    /// Use a random inspiration prompt; returns it.
    pub fn inspire(&mut self) -> String {
        self.prompt = prompt::random_inspiration(&mut self.rng).to_string();
        self.prompt.clone()
    }

    /// Select the text for the current genre and prompt and return it as
    /// JSON with every reveal frame:
    ///
    /// ```json
    /// { "generation": 3, "genre": "fantasy", "text": "...",
    ///   "frames": ["The", "The ancient", ...], "word_delay_ms": 80 }
    /// ```
    ///
    /// A blank prompt is rejected with the "prompt required" message and
    /// does not start a new generation.
    pub fn compose(&mut self) -> Result<String, JsError> {
        if prompt::is_blank(&self.prompt) {
            return Err(JsError::new(Notification::PromptRequired.message()));
        }
        self.generation += 1;
        let text = selector::select(self.genre, &self.prompt);
        let frames = reveal_frames(GenerationId(self.generation), &text)
            .into_iter()
            .map(|frame| frame.text)
            .collect();
        to_json(&Composition {
            generation: self.generation,
            genre: self.genre.map(|g| g.id()),
            text,
            frames,
            word_delay_ms: self.config.word_delay_ms,
        })
    }

    /// Whether frames tagged `generation` should still be shown.
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// The genre catalog as a JSON array of `{ id, name }`.
    pub fn genres() -> Result<String, JsError> {
        let genres: Vec<GenreInfo> = GenreTag::ALL
            .iter()
            .map(|g| GenreInfo {
                id: g.id(),
                name: g.display_name(),
            })
            .collect();
        to_json(&genres)
    }

    /// The inspiration prompts as a JSON array of strings.
    pub fn inspiration_prompts() -> Result<String, JsError> {
        to_json(&INSPIRATION_PROMPTS)
    }

    pub fn download_filename(&self) -> String {
        self.config.download_filename.clone()
    }
}
