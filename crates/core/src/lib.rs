//! Domain types shared by every comicgen crate.
//!
//! Stories come from the text model, jobs come from the image-generation
//! provider, and [`comic::Comic`] pairs the two panel by panel.

pub mod comic;
pub mod error;
pub mod job;
pub mod story;
pub mod types;
