//! Story parameters, outlines, and episodes.
//!
//! These are the values that flow between the UI, the narrator, and the
//! story library: everything here is plain serializable data.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Minimum number of episodes in a story.
pub const MIN_EPISODES: u32 = 1;

/// Maximum number of episodes in a story.
pub const MAX_EPISODES: u32 = 20;

/// The overall tone of a story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tone {
    Comedic,
    Dramatic,
    Suspenseful,
    Fantasy,
    Romantic,
    Dark,
    Inspirational,
    SciFi,
    Mystery,
}

impl Tone {
    /// All tones, in UI display order.
    pub fn all() -> &'static [Tone] {
        &[
            Tone::Comedic,
            Tone::Dramatic,
            Tone::Suspenseful,
            Tone::Fantasy,
            Tone::Romantic,
            Tone::Dark,
            Tone::Inspirational,
            Tone::SciFi,
            Tone::Mystery,
        ]
    }

    /// Display name, as it appears in prompts and the UI.
    pub fn name(&self) -> &'static str {
        match self {
            Tone::Comedic => "Comedic",
            Tone::Dramatic => "Dramatic",
            Tone::Suspenseful => "Suspenseful",
            Tone::Fantasy => "Fantasy",
            Tone::Romantic => "Romantic",
            Tone::Dark => "Dark",
            Tone::Inspirational => "Inspirational",
            Tone::SciFi => "Sci-Fi",
            Tone::Mystery => "Mystery",
        }
    }

    /// Parse a tone from its display name (case-insensitive).
    pub fn parse(s: &str) -> Option<Tone> {
        Tone::all()
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The narration style of a story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Style {
    ThirdPerson,
    FirstPerson,
    SecondPerson,
    Omniscient,
    ScriptFormat,
    DiaryEntry,
}

impl Style {
    /// All styles, in UI display order.
    pub fn all() -> &'static [Style] {
        &[
            Style::ThirdPerson,
            Style::FirstPerson,
            Style::SecondPerson,
            Style::Omniscient,
            Style::ScriptFormat,
            Style::DiaryEntry,
        ]
    }

    /// Display name, as it appears in prompts and the UI.
    pub fn name(&self) -> &'static str {
        match self {
            Style::ThirdPerson => "Third Person",
            Style::FirstPerson => "First Person",
            Style::SecondPerson => "Second Person",
            Style::Omniscient => "Omniscient",
            Style::ScriptFormat => "Script Format",
            Style::DiaryEntry => "Diary Entry",
        }
    }

    /// One-line description injected into prompts so the model writes in
    /// the requested voice.
    pub fn description(&self) -> &'static str {
        match self {
            Style::ThirdPerson => {
                "Narrated by an outside observer, using 'he', 'she', or 'they'."
            }
            Style::FirstPerson => "Told from a character's perspective, using 'I' and 'me'.",
            Style::SecondPerson => {
                "Puts the reader into the story using 'you', creating an immersive experience."
            }
            Style::Omniscient => {
                "An all-knowing narrator reveals thoughts and actions of all characters."
            }
            Style::ScriptFormat => {
                "Structured like a screenplay, with character names followed by their dialogues."
            }
            Style::DiaryEntry => {
                "Presented as a personal journal or log, expressing the inner thoughts of a character."
            }
        }
    }

    /// Parse a style from its display name (case-insensitive, hyphen or
    /// space separated).
    pub fn parse(s: &str) -> Option<Style> {
        let normalized = s.trim().replace(['-', '_'], " ");
        Style::all()
            .iter()
            .copied()
            .find(|st| st.name().eq_ignore_ascii_case(&normalized))
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Gender of an initial character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    #[default]
    Other,
}

impl Gender {
    pub fn all() -> &'static [Gender] {
        &[Gender::Male, Gender::Female, Gender::Other]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Gender> {
        Gender::all()
            .iter()
            .copied()
            .find(|g| g.name().eq_ignore_ascii_case(s.trim()))
    }
}

/// An initial character supplied by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSheet {
    pub name: String,
    #[serde(default)]
    pub gender: Gender,
    /// Free-text characteristics, e.g. "sly, protective of the master".
    #[serde(default)]
    pub traits: String,
}

impl CharacterSheet {
    pub fn new(name: impl Into<String>, gender: Gender, traits: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            gender,
            traits: traits.into(),
        }
    }

    /// One-line description used in prompts.
    pub fn describe(&self) -> String {
        if self.traits.trim().is_empty() {
            format!("- {} ({})", self.name, self.gender.name())
        } else {
            format!("- {} ({}): {}", self.name, self.gender.name(), self.traits)
        }
    }
}

/// The parameters a story was created with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryInfo {
    pub title: String,
    pub total_episodes: u32,
    #[serde(default)]
    pub initial_characters: Vec<CharacterSheet>,
    #[serde(default)]
    pub trope: Option<String>,
    pub tone: Tone,
    pub style: Style,
    /// Regional setting, e.g. "a small village in Uttar Pradesh".
    #[serde(default)]
    pub setting: Option<String>,
}

impl StoryInfo {
    /// Initial characters with non-empty names, in declaration order.
    pub fn named_characters(&self) -> impl Iterator<Item = &CharacterSheet> {
        self.initial_characters
            .iter()
            .filter(|c| !c.name.trim().is_empty())
    }
}

/// Per-episode outlines, keyed by 1-based episode number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Outline(BTreeMap<u32, String>);

impl Outline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, episode: u32) -> Option<&str> {
        self.0.get(&episode).map(String::as_str)
    }

    pub fn set(&mut self, episode: u32, text: impl Into<String>) {
        self.0.insert(episode, text.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate outlines in episode order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.0.iter().map(|(n, text)| (*n, text.as_str()))
    }

    /// True if every episode 1..=total has an outline.
    pub fn covers(&self, total_episodes: u32) -> bool {
        (1..=total_episodes).all(|n| self.0.contains_key(&n))
    }
}

impl FromIterator<(u32, String)> for Outline {
    fn from_iter<I: IntoIterator<Item = (u32, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Exactly what the generation model returns for one episode, before any
/// roster reconciliation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EpisodeDraft {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub killed_characters: Vec<String>,
    #[serde(default)]
    pub current_characters: Vec<String>,
    /// The last one or two lines of the body, verbatim; threaded into the
    /// next episode's prompt so it picks up exactly where this one ended.
    #[serde(default)]
    pub ended_at: Option<String>,
}

/// An accepted episode with its number and running summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    pub number: u32,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub killed_characters: Vec<String>,
    #[serde(default)]
    pub current_characters: Vec<String>,
    #[serde(default)]
    pub ended_at: Option<String>,
    /// Summary of the story through this episode, from the summary model.
    pub summary_till_now: String,
}

impl Episode {
    /// Promote a draft to an episode.
    pub fn from_draft(number: u32, draft: EpisodeDraft, summary_till_now: String) -> Self {
        Self {
            number,
            title: draft.title,
            body: draft.body,
            killed_characters: draft.killed_characters,
            current_characters: draft.current_characters,
            ended_at: draft.ended_at,
            summary_till_now,
        }
    }

    /// Body text with literal `\n` sequences rendered as newlines.
    ///
    /// The model is instructed to escape newlines inside JSON strings;
    /// doubly-escaped sequences survive parsing and show up literally.
    pub fn display_body(&self) -> String {
        self.body.replace("\\n", "\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_parse() {
        assert_eq!(Tone::parse("comedic"), Some(Tone::Comedic));
        assert_eq!(Tone::parse("Sci-Fi"), Some(Tone::SciFi));
        assert_eq!(Tone::parse("noir"), None);
    }

    #[test]
    fn test_style_parse() {
        assert_eq!(Style::parse("third person"), Some(Style::ThirdPerson));
        assert_eq!(Style::parse("diary-entry"), Some(Style::DiaryEntry));
        assert_eq!(Style::parse("haiku"), None);
    }

    #[test]
    fn test_character_describe() {
        let c = CharacterSheet::new("Tom", Gender::Male, "loyal, fierce");
        assert_eq!(c.describe(), "- Tom (Male): loyal, fierce");

        let untraited = CharacterSheet::new("Jerry", Gender::Other, "");
        assert_eq!(untraited.describe(), "- Jerry (Other)");
    }

    #[test]
    fn test_outline_order_and_coverage() {
        let mut outline = Outline::new();
        outline.set(2, "middle");
        outline.set(1, "start");
        outline.set(10, "end");

        let numbers: Vec<u32> = outline.iter().map(|(n, _)| n).collect();
        assert_eq!(numbers, vec![1, 2, 10]);
        assert!(!outline.covers(10));

        for n in 3..=9 {
            outline.set(n, format!("episode {n}"));
        }
        assert!(outline.covers(10));
    }

    #[test]
    fn test_outline_serialization_uses_string_keys() {
        let mut outline = Outline::new();
        outline.set(1, "start");
        outline.set(2, "end");

        let json = serde_json::to_string(&outline).unwrap();
        assert_eq!(json, r#"{"1":"start","2":"end"}"#);

        let back: Outline = serde_json::from_str(&json).unwrap();
        assert_eq!(back, outline);
    }

    #[test]
    fn test_episode_display_body() {
        let draft = EpisodeDraft {
            title: "The Storm".to_string(),
            body: "Rain fell.\\nThe door creaked open.".to_string(),
            ..Default::default()
        };
        let episode = Episode::from_draft(1, draft, "summary".to_string());
        assert_eq!(episode.display_body(), "Rain fell.\nThe door creaked open.");
    }

    #[test]
    fn test_draft_defaults_for_missing_fields() {
        let draft: EpisodeDraft =
            serde_json::from_str(r#"{"title": "T", "body": "B"}"#).unwrap();
        assert!(draft.killed_characters.is_empty());
        assert!(draft.current_characters.is_empty());
        assert!(draft.ended_at.is_none());
    }
}
