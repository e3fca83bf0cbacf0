//! Serialized story engine with an AI narrator.
//!
//! This crate provides:
//! - Story parameters, episodes, and outlines as plain data types
//! - An AI narrator that writes episode outlines and episodes via Claude,
//!   and folds each episode into a running summary with a cheaper model
//! - Character roster tracking across episodes
//! - A story library persisted as per-story directories of JSON files
//!
//! # Quick Start
//!
//! ```ignore
//! use storyteller_core::{StoryConfig, StorySession, Tone, Style};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StoryConfig::new("The House on the Hill")
//!         .with_episodes(3)
//!         .with_tone(Tone::Suspenseful)
//!         .with_style(Style::ThirdPerson);
//!
//!     let mut session = StorySession::create(config).await?;
//!     session.outline().await?;
//!     session.finalize().await?;
//!
//!     for episode in session.episodes() {
//!         println!("{}: {}", episode.number, episode.title);
//!     }
//!     Ok(())
//! }
//! ```

pub mod author;
pub mod continuity;
pub mod headless;
pub mod persist;
pub mod session;
pub mod story;
pub mod testing;

// Primary public API
pub use author::{Narrator, NarratorConfig, NarratorError};
pub use continuity::{Continuity, Roster, RosterDelta};
pub use headless::{HeadlessConfig, HeadlessStory};
pub use persist::{PersistError, StoryLibrary, StorySummary};
pub use session::{SessionError, StoryConfig, StorySession};
pub use story::{
    CharacterSheet, Episode, EpisodeDraft, Gender, Outline, StoryInfo, Style, Tone,
    MAX_EPISODES, MIN_EPISODES,
};
pub use testing::{MockNarrator, TestHarness};
