//! StorySession - the primary public API for story generation.
//!
//! This module wraps the narrator, continuity tracking, and the story
//! library into a single interface: configure a story, outline it,
//! revise outlines, then finalize it episode by episode.

use crate::author::{Narrator, NarratorConfig, NarratorError};
use crate::continuity::Continuity;
use crate::persist::{PersistError, StoryLibrary};
use crate::story::{
    CharacterSheet, Episode, Outline, StoryInfo, Style, Tone, MAX_EPISODES, MIN_EPISODES,
};
use std::path::PathBuf;
use thiserror::Error;

/// Errors from StorySession operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Narrator error: {0}")]
    Narrator(#[from] NarratorError),

    #[error("Library error: {0}")]
    Persist(#[from] PersistError),

    #[error("No API key configured - set ANTHROPIC_API_KEY environment variable")]
    NoApiKey,

    #[error("Outlines have not been generated yet")]
    MissingOutlines,

    #[error("Story has no episode {0}")]
    UnknownEpisode(u32),
}

/// Configuration for creating a new story.
#[derive(Debug, Clone)]
pub struct StoryConfig {
    /// Story title; also names the story's directory in the library.
    pub title: String,

    /// Number of episodes, clamped to 1..=20.
    pub total_episodes: u32,

    /// Initial characters the story must feature.
    pub characters: Vec<CharacterSheet>,

    /// Central trope, e.g. "a cat protects the house master".
    pub trope: Option<String>,

    /// Overall tone.
    pub tone: Tone,

    /// Narration style.
    pub style: Style,

    /// Regional setting.
    pub setting: Option<String>,

    /// Library root override; defaults to the environment.
    pub library_root: Option<PathBuf>,

    /// Generation model override.
    pub model: Option<String>,

    /// Summary model override.
    pub summary_model: Option<String>,
}

impl StoryConfig {
    /// Create a new config with the given title and defaults.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            total_episodes: 2,
            characters: Vec::new(),
            trope: None,
            tone: Tone::Comedic,
            style: Style::ThirdPerson,
            setting: None,
            library_root: None,
            model: None,
            summary_model: None,
        }
    }

    /// Set the episode count (clamped to the supported range).
    pub fn with_episodes(mut self, total: u32) -> Self {
        self.total_episodes = total.clamp(MIN_EPISODES, MAX_EPISODES);
        self
    }

    /// Add an initial character.
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

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_summary_model(mut self, model: impl Into<String>) -> Self {
        self.summary_model = Some(model.into());
        self
    }

    fn into_info(self) -> (StoryInfo, Option<PathBuf>, Option<String>, Option<String>) {
        let info = StoryInfo {
            title: self.title,
            total_episodes: self.total_episodes.clamp(MIN_EPISODES, MAX_EPISODES),
            initial_characters: self.characters,
            trope: self.trope,
            tone: self.tone,
            style: self.style,
            setting: self.setting,
        };
        (info, self.library_root, self.model, self.summary_model)
    }
}

/// A story being written.
///
/// Manages the narrator, the continuity threaded between episodes, and
/// persistence to the story library.
pub struct StorySession {
    narrator: Narrator,
    library: StoryLibrary,
    info: StoryInfo,
    outlines: Option<Outline>,
    episodes: Vec<Episode>,
    continuity: Continuity,
}

impl StorySession {
    /// Create a new story and its library directory.
    ///
    /// Requires `ANTHROPIC_API_KEY` to be set.
    pub async fn create(config: StoryConfig) -> Result<Self, SessionError> {
        let (info, library_root, model, summary_model) = config.into_info();

        let mut narrator_config = NarratorConfig::from_env();
        if model.is_some() {
            narrator_config.model = model;
        }
        if summary_model.is_some() {
            narrator_config.summary_model = summary_model;
        }

        let narrator = Narrator::from_env()
            .map_err(|_| SessionError::NoApiKey)?
            .with_config(narrator_config);

        let library = match library_root {
            Some(root) => StoryLibrary::new(root),
            None => StoryLibrary::from_env(),
        };

        library.create_story(&info).await?;

        let continuity = Continuity::new(info.named_characters().map(|c| c.name.clone()));

        Ok(Self {
            narrator,
            library,
            info,
            outlines: None,
            episodes: Vec::new(),
            continuity,
        })
    }

    /// Open an existing story from the library, rebuilding continuity
    /// from the episodes already on disk.
    pub async fn open(library: StoryLibrary, title: &str) -> Result<Self, SessionError> {
        let narrator = Narrator::from_env()
            .map_err(|_| SessionError::NoApiKey)?
            .with_config(NarratorConfig::from_env());

        let info = library.load_info(title).await?;
        let outlines = library.load_outlines(title).await?;
        let episodes = library.load_episodes(title).await?;

        let mut continuity = Continuity::new(info.named_characters().map(|c| c.name.clone()));
        for episode in &episodes {
            let draft = crate::story::EpisodeDraft {
                title: episode.title.clone(),
                body: episode.body.clone(),
                killed_characters: episode.killed_characters.clone(),
                current_characters: episode.current_characters.clone(),
                ended_at: episode.ended_at.clone(),
            };
            continuity.absorb(&draft, episode.summary_till_now.clone());
        }

        Ok(Self {
            narrator,
            library,
            info,
            outlines,
            episodes,
            continuity,
        })
    }

    /// Generate outlines for every episode and persist them.
    pub async fn outline(&mut self) -> Result<&Outline, SessionError> {
        let outlines = self.narrator.outline_story(&self.info).await?;
        self.library.save_outlines(&self.info.title, &outlines).await?;
        Ok(&*self.outlines.insert(outlines))
    }

    /// Revise one episode's outline from feedback, then reconcile every
    /// outline after it so the arc still flows. Persists the result and
    /// returns the replacement outline text.
    pub async fn improve_outline(
        &mut self,
        episode: u32,
        feedback: &str,
    ) -> Result<String, SessionError> {
        let outlines = self.outlines.as_mut().ok_or(SessionError::MissingOutlines)?;
        if outlines.get(episode).is_none() {
            return Err(SessionError::UnknownEpisode(episode));
        }

        let improved = self
            .narrator
            .improve_outline(&self.info, outlines, episode, feedback)
            .await?;
        outlines.set(episode, improved.clone());

        self.narrator
            .reconcile_outlines(&self.info, outlines, episode)
            .await?;

        self.library.save_outlines(&self.info.title, outlines).await?;
        Ok(improved)
    }

    /// Write every remaining episode, in order.
    ///
    /// Each episode is generated, summarized with the cheaper model,
    /// folded into continuity, and persisted before the next begins. An
    /// error aborts the loop; episodes already written stay on disk.
    pub async fn finalize(&mut self) -> Result<&[Episode], SessionError> {
        let outlines = self.outlines.clone().ok_or(SessionError::MissingOutlines)?;

        let start = self.episodes.len() as u32 + 1;
        for number in start..=self.info.total_episodes {
            let draft = self
                .narrator
                .write_episode(&self.info, number, outlines.get(number), &self.continuity)
                .await?;

            let summary = self
                .narrator
                .summarize(&draft.body, self.continuity.summary.as_deref())
                .await?;

            let delta = self.continuity.absorb(&draft, summary.clone());
            tracing::info!(
                episode = number,
                introduced = delta.introduced.len(),
                killed = delta.killed.len(),
                "episode accepted"
            );

            let episode = Episode::from_draft(number, draft, summary);
            self.library.save_episode(&self.info.title, &episode).await?;
            self.episodes.push(episode);
        }

        Ok(&self.episodes)
    }

    /// Get the story parameters.
    pub fn info(&self) -> &StoryInfo {
        &self.info
    }

    /// Get the outlines, if generated.
    pub fn outlines(&self) -> Option<&Outline> {
        self.outlines.as_ref()
    }

    /// Get all written episodes.
    pub fn episodes(&self) -> &[Episode] {
        &self.episodes
    }

    /// Get one episode by number.
    pub fn episode(&self, number: u32) -> Option<&Episode> {
        self.episodes.iter().find(|e| e.number == number)
    }

    /// Get the continuity state (summary, roster, last ending).
    pub fn continuity(&self) -> &Continuity {
        &self.continuity
    }

    /// True once every episode has been written.
    pub fn is_complete(&self) -> bool {
        self.episodes.len() as u32 >= self.info.total_episodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::story::Gender;

    #[test]
    fn test_story_config_builder() {
        let config = StoryConfig::new("The House")
            .with_episodes(5)
            .with_character(CharacterSheet::new("Tom", Gender::Male, "loyal"))
            .with_trope("cat and mouse")
            .with_tone(Tone::Suspenseful)
            .with_style(Style::FirstPerson)
            .with_setting("a hill station");

        assert_eq!(config.title, "The House");
        assert_eq!(config.total_episodes, 5);
        assert_eq!(config.characters.len(), 1);
        assert_eq!(config.tone, Tone::Suspenseful);
    }

    #[test]
    fn test_episode_count_clamped() {
        let config = StoryConfig::new("Long").with_episodes(99);
        assert_eq!(config.total_episodes, MAX_EPISODES);

        let config = StoryConfig::new("Short").with_episodes(0);
        assert_eq!(config.total_episodes, MIN_EPISODES);
    }
}
