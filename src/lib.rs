//! Creative Writer — a writing studio that reveals genre pieces word by word.
//!
//! Pick a genre, give a prompt, and the studio selects a fixed piece for
//! that genre (or a prompt-bearing fallback) and reveals it one word at a
//! time on a tokio timer. A newer request always supersedes an older one.

pub mod core;
pub mod schema;

pub use crate::core::studio::{StudioError, WritingStudio};
pub use crate::schema::genre::GenreTag;
