//! Story generation through an OpenAI-compatible chat-completion API.
//!
//! [`StoryGenerator`] sends the fixed comic template plus the user's idea
//! and parses the JSON reply into a [`comicgen_core::story::Story`].

pub mod config;
pub mod generator;
pub mod template;

pub use config::StoryConfig;
pub use generator::{StoryError, StoryGenerator};
