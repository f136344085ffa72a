pub mod genre;
pub mod prompt;
pub mod reveal;
