//! Headless story generation for programmatic use.
//!
//! This module provides a simplified interface for generating stories
//! without a TUI. It's designed for:
//! - Automated testing with real model responses
//! - Scripted batch generation
//!
//! # Example
//!
//! ```ignore
//! use storyteller_core::headless::{HeadlessConfig, HeadlessStory};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = HeadlessConfig::quick_start("The House on the Hill");
//!     let mut story = HeadlessStory::new(config).await?;
//!
//!     let episodes = story.run().await?;
//!     for episode in episodes {
//!         println!("== {} ==\n{}", episode.title, episode.display_body());
//!     }
//!     Ok(())
//! }
//! ```

use crate::session::{SessionError, StoryConfig, StorySession};
use crate::story::{CharacterSheet, Episode, Outline, Style, Tone};
use std::path::PathBuf;

/// Configuration for a headless story run.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Story title.
    pub title: String,
    /// Number of episodes.
    pub total_episodes: u32,
    /// Initial characters.
    pub characters: Vec<CharacterSheet>,
    /// Central trope.
    pub trope: Option<String>,
    /// Overall tone.
    pub tone: Tone,
    /// Narration style.
    pub style: Style,
    /// Regional setting.
    pub setting: Option<String>,
    /// Library root override.
    pub library_root: Option<PathBuf>,
}

impl HeadlessConfig {
    /// Create a quick-start configuration with sensible defaults:
    /// two comedic third-person episodes.
    pub fn quick_start(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            total_episodes: 2,
            characters: Vec::new(),
            trope: None,
            tone: Tone::Comedic,
            style: Style::ThirdPerson,
            setting: None,
            library_root: None,
        }
    }

    pub fn with_episodes(mut self, total: u32) -> Self {
        self.total_episodes = total;
        self
    }

    pub fn with_character(mut self, character: CharacterSheet) -> Self {
        self.characters.push(character);
        self
    }

    pub fn with_trope(mut self, trope: impl Into<String>) -> Self {
        self.trope = Some(trope.into());
        self
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_setting(mut self, setting: impl Into<String>) -> Self {
        self.setting = Some(setting.into());
        self
    }

    pub fn with_library_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.library_root = Some(root.into());
        self
    }

    fn into_story_config(self) -> StoryConfig {
        let mut config = StoryConfig::new(self.title)
            .with_episodes(self.total_episodes)
            .with_tone(self.tone)
            .with_style(self.style);
        for character in self.characters {
            config = config.with_character(character);
        }
        if let Some(trope) = self.trope {
            config = config.with_trope(trope);
        }
        if let Some(setting) = self.setting {
            config = config.with_setting(setting);
        }
        if let Some(root) = self.library_root {
            config = config.with_library_root(root);
        }
        config
    }
}

/// A story generated programmatically, without a UI.
///
/// This wraps `StorySession` with a simpler interface for automated use.
pub struct HeadlessStory {
    session: StorySession,
}

impl HeadlessStory {
    /// Create a new story from the configuration.
    ///
    /// Requires `ANTHROPIC_API_KEY` to be set.
    pub async fn new(config: HeadlessConfig) -> Result<Self, SessionError> {
        let session = StorySession::create(config.into_story_config()).await?;
        Ok(Self { session })
    }

    /// Generate the episode outlines.
    pub async fn outline(&mut self) -> Result<&Outline, SessionError> {
        self.session.outline().await
    }

    /// Write every remaining episode.
    pub async fn finalize(&mut self) -> Result<&[Episode], SessionError> {
        self.session.finalize().await
    }

    /// Outline then finalize in one call.
    pub async fn run(&mut self) -> Result<&[Episode], SessionError> {
        self.session.outline().await?;
        self.session.finalize().await
    }

    /// The story title.
    pub fn title(&self) -> &str {
        &self.session.info().title
    }

    /// Written episodes so far.
    pub fn episodes(&self) -> &[Episode] {
        self.session.episodes()
    }

    /// Living characters at the current point in the story.
    pub fn living_characters(&self) -> &[String] {
        self.session.continuity().roster.living()
    }

    /// Characters killed so far.
    pub fn fallen_characters(&self) -> &[String] {
        self.session.continuity().roster.fallen()
    }

    /// The running summary, once at least one episode is written.
    pub fn summary(&self) -> Option<&str> {
        self.session.continuity().summary.as_deref()
    }

    /// Get the underlying session for advanced use.
    pub fn session(&self) -> &StorySession {
        &self.session
    }

    /// Get mutable access to the underlying session.
    pub fn session_mut(&mut self) -> &mut StorySession {
        &mut self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::story::Gender;

    #[test]
    fn test_quick_start_config() {
        let config = HeadlessConfig::quick_start("The House");
        assert_eq!(config.title, "The House");
        assert_eq!(config.total_episodes, 2);
        assert_eq!(config.tone, Tone::Comedic);
        assert_eq!(config.style, Style::ThirdPerson);
    }

    #[test]
    fn test_config_builders() {
        let config = HeadlessConfig::quick_start("The House")
            .with_episodes(4)
            .with_character(CharacterSheet::new("Tom", Gender::Male, "loyal"))
            .with_trope("cat and mouse")
            .with_tone(Tone::Dark)
            .with_style(Style::DiaryEntry)
            .with_setting("a lighthouse");

        let story_config = config.into_story_config();
        assert_eq!(story_config.total_episodes, 4);
        assert_eq!(story_config.characters.len(), 1);
        assert_eq!(story_config.tone, Tone::Dark);
        assert_eq!(story_config.style, Style::DiaryEntry);
        assert_eq!(story_config.setting.as_deref(), Some("a lighthouse"));
    }
}
