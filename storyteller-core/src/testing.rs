//! Testing utilities for story generation.
//!
//! This module provides tools for integration testing:
//! - `MockNarrator` for deterministic testing without API calls
//! - `TestHarness` for running scripted drafts through the real
//!   continuity logic

use crate::continuity::Continuity;
use crate::story::{Episode, EpisodeDraft, StoryInfo, Style, Tone};

/// A mock narrator that returns scripted episode drafts and summaries.
///
/// Use this for deterministic integration tests without API calls.
pub struct MockNarrator {
    /// Scripted drafts to return in order.
    drafts: Vec<EpisodeDraft>,
    /// Scripted summaries to return in order.
    summaries: Vec<String>,
    draft_index: usize,
    summary_index: usize,
}

impl MockNarrator {
    /// Create a mock narrator with scripted drafts.
    pub fn new(drafts: Vec<EpisodeDraft>) -> Self {
        Self {
            drafts,
            summaries: Vec::new(),
            draft_index: 0,
            summary_index: 0,
        }
    }

    /// Add scripted summaries; without them, summaries are derived from
    /// the episode body.
    pub fn with_summaries(mut self, summaries: Vec<String>) -> Self {
        self.summaries = summaries;
        self
    }

    /// Queue another draft.
    pub fn queue_draft(&mut self, draft: EpisodeDraft) {
        self.drafts.push(draft);
    }

    /// Return the next scripted draft, or a placeholder when the script
    /// runs out.
    pub fn next_draft(&mut self) -> EpisodeDraft {
        if self.draft_index < self.drafts.len() {
            let draft = self.drafts[self.draft_index].clone();
            self.draft_index += 1;
            draft
        } else {
            EpisodeDraft {
                title: "Unscripted".to_string(),
                body: "The narrator has no more scripted episodes.".to_string(),
                ..Default::default()
            }
        }
    }

    /// Return the next scripted summary, or derive one from the body.
    pub fn next_summary(&mut self, body: &str, previous: Option<&str>) -> String {
        if self.summary_index < self.summaries.len() {
            let summary = self.summaries[self.summary_index].clone();
            self.summary_index += 1;
            return summary;
        }

        let clipped: String = body.chars().take(60).collect();
        match previous {
            Some(previous) => format!("{previous} {clipped}"),
            None => clipped,
        }
    }

    /// Replay the script from the beginning.
    pub fn reset(&mut self) {
        self.draft_index = 0;
        self.summary_index = 0;
    }
}

/// Builds a draft with the common fields filled in.
pub fn draft(
    title: &str,
    body: &str,
    current: &[&str],
    killed: &[&str],
    ended_at: &str,
) -> EpisodeDraft {
    EpisodeDraft {
        title: title.to_string(),
        body: body.to_string(),
        killed_characters: killed.iter().map(|s| s.to_string()).collect(),
        current_characters: current.iter().map(|s| s.to_string()).collect(),
        ended_at: Some(ended_at.to_string()),
    }
}

/// Test harness that runs scripted drafts through the real continuity
/// logic, exactly as the episode loop does.
pub struct TestHarness {
    /// The mock narrator.
    pub narrator: MockNarrator,
    /// Story parameters.
    pub info: StoryInfo,
    /// Continuity state, updated as episodes run.
    pub continuity: Continuity,
    /// Accepted episodes.
    pub episodes: Vec<Episode>,
}

impl TestHarness {
    /// Create a harness for a story with the given parameters.
    pub fn new(info: StoryInfo) -> Self {
        let continuity = Continuity::new(info.named_characters().map(|c| c.name.clone()));
        Self {
            narrator: MockNarrator::new(Vec::new()),
            info,
            continuity,
            episodes: Vec::new(),
        }
    }

    /// Create a harness with a minimal two-episode story.
    pub fn sample() -> Self {
        Self::new(StoryInfo {
            title: "Test Story".to_string(),
            total_episodes: 2,
            initial_characters: Vec::new(),
            trope: None,
            tone: Tone::Comedic,
            style: Style::ThirdPerson,
            setting: None,
        })
    }

    /// Queue a draft on the narrator.
    pub fn expect_draft(&mut self, draft: EpisodeDraft) -> &mut Self {
        self.narrator.queue_draft(draft);
        self
    }

    /// Run the next episode: draw a draft, summarize, fold into
    /// continuity, and accept.
    pub fn run_episode(&mut self) -> &Episode {
        let number = self.episodes.len() as u32 + 1;
        let draft = self.narrator.next_draft();
        let summary = self
            .narrator
            .next_summary(&draft.body, self.continuity.summary.as_deref());

        self.continuity.absorb(&draft, summary.clone());
        self.episodes.push(Episode::from_draft(number, draft, summary));
        self.episodes.last().expect("just pushed")
    }

    /// Run every remaining episode.
    pub fn run_all(&mut self) -> &[Episode] {
        while (self.episodes.len() as u32) < self.info.total_episodes {
            self.run_episode();
        }
        &self.episodes
    }

    /// Living characters right now.
    pub fn living(&self) -> &[String] {
        self.continuity.roster.living()
    }

    /// Fallen characters right now.
    pub fn fallen(&self) -> &[String] {
        self.continuity.roster.fallen()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_narrator_scripted_then_placeholder() {
        let mut narrator = MockNarrator::new(vec![draft("One", "body", &[], &[], "end")]);

        assert_eq!(narrator.next_draft().title, "One");
        assert_eq!(narrator.next_draft().title, "Unscripted");

        narrator.reset();
        assert_eq!(narrator.next_draft().title, "One");
    }

    #[test]
    fn test_mock_narrator_derived_summary_accumulates() {
        let mut narrator = MockNarrator::new(Vec::new());
        let first = narrator.next_summary("It began.", None);
        let second = narrator.next_summary("It ended.", Some(&first));
        assert_eq!(second, "It began. It ended.");
    }

    #[test]
    fn test_mock_narrator_scripted_summaries_win() {
        let mut narrator =
            MockNarrator::new(Vec::new()).with_summaries(vec!["Scripted.".to_string()]);
        assert_eq!(narrator.next_summary("ignored", None), "Scripted.");
        // Script exhausted, falls back to the derived form.
        assert_eq!(narrator.next_summary("derived", None), "derived");
    }

    #[test]
    fn test_harness_runs_episodes_through_continuity() {
        let mut harness = TestHarness::sample();
        harness
            .expect_draft(draft("One", "body one", &["Tom", "Jerry"], &[], "end one"))
            .expect_draft(draft("Two", "body two", &["Tom"], &["Jerry"], "end two"));

        harness.run_all();

        assert_eq!(harness.episodes.len(), 2);
        assert_eq!(harness.living(), &["Tom"]);
        assert_eq!(harness.fallen(), &["Jerry"]);
        assert_eq!(
            harness.continuity.ended_at.as_deref(),
            Some("end two")
        );
    }
}
