//! The story library on disk.
//!
//! Each story lives in its own directory under the library root:
//!
//! ```text
//! stories/
//!   The_House_on_the_Hill/
//!     info.json       story parameters (versioned)
//!     outlines.json   per-episode outlines
//!     1.json          episode 1
//!     2.json          episode 2
//! ```
//!
//! Directory names are sanitized; the display title lives in info.json.

use crate::story::{Episode, Outline, StoryInfo};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Current story format version.
const STORY_FORMAT_VERSION: u32 = 1;

/// Default library root when `STORYTELLER_HOME` is not set.
const DEFAULT_ROOT: &str = "stories";

/// Errors from library operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Story not found: {0}")]
    NotFound(String),

    #[error("A story named '{0}' already exists")]
    AlreadyExists(String),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// On-disk wrapper around [`StoryInfo`] with a format version.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SavedInfo {
    version: u32,
    info: StoryInfo,
}

/// Listing metadata for one story, read without loading episode bodies.
#[derive(Debug, Clone)]
pub struct StorySummary {
    /// Display title from info.json.
    pub title: String,
    /// Directory name under the library root.
    pub slug: String,
    /// How many episodes the story will have.
    pub total_episodes: u32,
    /// How many episodes have been written so far.
    pub episodes_written: u32,
    /// Whether outlines have been generated.
    pub has_outlines: bool,
}

/// A directory of stories.
#[derive(Debug, Clone)]
pub struct StoryLibrary {
    root: PathBuf,
}

impl StoryLibrary {
    /// Open a library rooted at the given directory. The directory is
    /// created lazily on the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Open the library at `STORYTELLER_HOME`, or `stories/` if unset.
    pub fn from_env() -> Self {
        let root = std::env::var("STORYTELLER_HOME").unwrap_or_else(|_| DEFAULT_ROOT.to_string());
        Self::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for a story title.
    pub fn story_dir(&self, title: &str) -> PathBuf {
        self.root.join(sanitize_title(title))
    }

    /// Create a story directory and write its info file.
    pub async fn create_story(&self, info: &StoryInfo) -> Result<(), PersistError> {
        let dir = self.story_dir(&info.title);
        if dir.join("info.json").exists() {
            return Err(PersistError::AlreadyExists(info.title.clone()));
        }
        fs::create_dir_all(&dir).await?;
        self.save_info(info).await
    }

    /// Write the info file for a story.
    pub async fn save_info(&self, info: &StoryInfo) -> Result<(), PersistError> {
        let saved = SavedInfo {
            version: STORY_FORMAT_VERSION,
            info: info.clone(),
        };
        let content = serde_json::to_string_pretty(&saved)?;
        fs::write(self.story_dir(&info.title).join("info.json"), content).await?;
        Ok(())
    }

    /// Load the info file for a story by title or slug.
    pub async fn load_info(&self, title: &str) -> Result<StoryInfo, PersistError> {
        let path = self.story_dir(title).join("info.json");
        let content = fs::read_to_string(&path)
            .await
            .map_err(|_| PersistError::NotFound(title.to_string()))?;
        let saved: SavedInfo = serde_json::from_str(&content)?;

        if saved.version != STORY_FORMAT_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: STORY_FORMAT_VERSION,
                found: saved.version,
            });
        }

        Ok(saved.info)
    }

    /// Write the outlines for a story.
    pub async fn save_outlines(&self, title: &str, outlines: &Outline) -> Result<(), PersistError> {
        let content = serde_json::to_string_pretty(outlines)?;
        fs::write(self.story_dir(title).join("outlines.json"), content).await?;
        Ok(())
    }

    /// Load the outlines for a story, if they have been generated.
    pub async fn load_outlines(&self, title: &str) -> Result<Option<Outline>, PersistError> {
        let path = self.story_dir(title).join("outlines.json");
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write one episode file.
    pub async fn save_episode(&self, title: &str, episode: &Episode) -> Result<(), PersistError> {
        let content = serde_json::to_string_pretty(episode)?;
        fs::write(
            self.story_dir(title).join(format!("{}.json", episode.number)),
            content,
        )
        .await?;
        Ok(())
    }

    /// Load one episode by number.
    pub async fn load_episode(&self, title: &str, number: u32) -> Result<Episode, PersistError> {
        let path = self.story_dir(title).join(format!("{number}.json"));
        let content = fs::read_to_string(&path)
            .await
            .map_err(|_| PersistError::NotFound(format!("{title} episode {number}")))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load all written episodes of a story, in order, stopping at the
    /// first gap.
    pub async fn load_episodes(&self, title: &str) -> Result<Vec<Episode>, PersistError> {
        let info = self.load_info(title).await?;
        let mut episodes = Vec::new();
        for number in 1..=info.total_episodes {
            match self.load_episode(title, number).await {
                Ok(episode) => episodes.push(episode),
                Err(PersistError::NotFound(_)) => break,
                Err(e) => return Err(e),
            }
        }
        Ok(episodes)
    }

    /// How many consecutive episodes have been written, starting from 1.
    pub async fn episodes_written(&self, title: &str) -> Result<u32, PersistError> {
        let dir = self.story_dir(title);
        let mut count = 0;
        while dir.join(format!("{}.json", count + 1)).exists() {
            count += 1;
        }
        Ok(count)
    }

    /// List every story in the library, sorted by title.
    pub async fn list_stories(&self) -> Result<Vec<StorySummary>, PersistError> {
        let mut summaries = Vec::new();

        if !self.root.exists() {
            return Ok(summaries);
        }

        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let Some(slug) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
                continue;
            };
            // Directories without a readable info file are not stories.
            let Ok(info) = self.load_info(&slug).await else {
                continue;
            };

            summaries.push(StorySummary {
                episodes_written: self.episodes_written(&slug).await?,
                has_outlines: path.join("outlines.json").exists(),
                title: info.title,
                slug,
                total_episodes: info.total_episodes,
            });
        }

        summaries.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(summaries)
    }

    /// Delete a story directory and everything in it.
    pub async fn delete_story(&self, title: &str) -> Result<(), PersistError> {
        let dir = self.story_dir(title);
        if !dir.exists() {
            return Err(PersistError::NotFound(title.to_string()));
        }
        fs::remove_dir_all(dir).await?;
        Ok(())
    }
}

/// Sanitize a story title into a directory name.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::story::{CharacterSheet, EpisodeDraft, Gender, Style, Tone};
    use tempfile::TempDir;

    fn sample_info(title: &str) -> StoryInfo {
        StoryInfo {
            title: title.to_string(),
            total_episodes: 2,
            initial_characters: vec![CharacterSheet::new("Tom", Gender::Male, "loyal")],
            trope: Some("guarding the house".to_string()),
            tone: Tone::Comedic,
            style: Style::ThirdPerson,
            setting: None,
        }
    }

    fn sample_episode(number: u32) -> Episode {
        Episode::from_draft(
            number,
            EpisodeDraft {
                title: format!("Part {number}"),
                body: "Something happened.".to_string(),
                killed_characters: vec![],
                current_characters: vec!["Tom".to_string()],
                ended_at: Some("It happened.".to_string()),
            },
            format!("Summary through part {number}."),
        )
    }

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("The House on the Hill!"), "The_House_on_the_Hill_");
        assert_eq!(sanitize_title("plain"), "plain");
    }

    #[tokio::test]
    async fn test_create_and_load_story() {
        let temp = TempDir::new().expect("temp dir");
        let library = StoryLibrary::new(temp.path());

        let info = sample_info("A Quiet Feud");
        library.create_story(&info).await.expect("create");

        let loaded = library.load_info("A Quiet Feud").await.expect("load");
        assert_eq!(loaded.title, "A Quiet Feud");
        assert_eq!(loaded.total_episodes, 2);
        assert_eq!(loaded.initial_characters.len(), 1);
    }

    #[tokio::test]
    async fn test_create_twice_fails() {
        let temp = TempDir::new().expect("temp dir");
        let library = StoryLibrary::new(temp.path());

        let info = sample_info("Duplicate");
        library.create_story(&info).await.expect("create");
        let err = library.create_story(&info).await.unwrap_err();
        assert!(matches!(err, PersistError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_outlines_roundtrip_and_absence() {
        let temp = TempDir::new().expect("temp dir");
        let library = StoryLibrary::new(temp.path());
        library.create_story(&sample_info("Outlined")).await.expect("create");

        assert!(library.load_outlines("Outlined").await.expect("load").is_none());

        let mut outlines = Outline::new();
        outlines.set(1, "The feud begins.");
        outlines.set(2, "The feud ends.");
        library.save_outlines("Outlined", &outlines).await.expect("save");

        let loaded = library.load_outlines("Outlined").await.expect("load");
        assert_eq!(loaded, Some(outlines));
    }

    #[tokio::test]
    async fn test_episode_roundtrip() {
        let temp = TempDir::new().expect("temp dir");
        let library = StoryLibrary::new(temp.path());
        library.create_story(&sample_info("Episodic")).await.expect("create");

        library
            .save_episode("Episodic", &sample_episode(1))
            .await
            .expect("save");

        let loaded = library.load_episode("Episodic", 1).await.expect("load");
        assert_eq!(loaded.title, "Part 1");
        assert_eq!(loaded.summary_till_now, "Summary through part 1.");

        let err = library.load_episode("Episodic", 2).await.unwrap_err();
        assert!(matches!(err, PersistError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_stories() {
        let temp = TempDir::new().expect("temp dir");
        let library = StoryLibrary::new(temp.path());

        library.create_story(&sample_info("Beta")).await.expect("create");
        library.create_story(&sample_info("Alpha")).await.expect("create");
        library
            .save_episode("Alpha", &sample_episode(1))
            .await
            .expect("save");

        let mut outlines = Outline::new();
        outlines.set(1, "o");
        library.save_outlines("Alpha", &outlines).await.expect("save");

        let stories = library.list_stories().await.expect("list");
        assert_eq!(stories.len(), 2);
        assert_eq!(stories[0].title, "Alpha");
        assert_eq!(stories[0].episodes_written, 1);
        assert!(stories[0].has_outlines);
        assert_eq!(stories[1].title, "Beta");
        assert_eq!(stories[1].episodes_written, 0);
        assert!(!stories[1].has_outlines);
    }

    #[tokio::test]
    async fn test_list_stories_empty_root() {
        let temp = TempDir::new().expect("temp dir");
        let library = StoryLibrary::new(temp.path().join("missing"));
        let stories = library.list_stories().await.expect("list");
        assert!(stories.is_empty());
    }

    #[tokio::test]
    async fn test_delete_story() {
        let temp = TempDir::new().expect("temp dir");
        let library = StoryLibrary::new(temp.path());

        library.create_story(&sample_info("Doomed")).await.expect("create");
        library.delete_story("Doomed").await.expect("delete");

        let err = library.load_info("Doomed").await.unwrap_err();
        assert!(matches!(err, PersistError::NotFound(_)));

        let err = library.delete_story("Doomed").await.unwrap_err();
        assert!(matches!(err, PersistError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_load_episodes_stops_at_gap() {
        let temp = TempDir::new().expect("temp dir");
        let library = StoryLibrary::new(temp.path());

        let mut info = sample_info("Gappy");
        info.total_episodes = 3;
        library.create_story(&info).await.expect("create");

        library.save_episode("Gappy", &sample_episode(1)).await.expect("save");
        library.save_episode("Gappy", &sample_episode(3)).await.expect("save");

        let episodes = library.load_episodes("Gappy").await.expect("load");
        assert_eq!(episodes.len(), 1);
        assert_eq!(library.episodes_written("Gappy").await.expect("count"), 1);
    }
}
