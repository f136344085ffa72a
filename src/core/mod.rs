pub mod clipboard;
pub mod config;
pub mod notify;
pub mod reveal;
pub mod selector;
pub mod studio;
