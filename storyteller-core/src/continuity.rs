//! Continuity state threaded between episodes.
//!
//! Nothing here calls the model. The roster is the one piece of state the
//! code enforces rather than delegating to the narrator: after any number
//! of episodes the living set equals the initial characters plus everyone
//! introduced minus everyone killed. The model's `current_characters`
//! field only ever *introduces* names; it cannot resurrect or silently
//! drop anyone.

use crate::story::EpisodeDraft;
use serde::{Deserialize, Serialize};

/// The living and fallen characters of a story in progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    living: Vec<String>,
    fallen: Vec<String>,
}

/// What one episode changed about the roster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterDelta {
    /// Names first seen in this episode.
    pub introduced: Vec<String>,
    /// Names that died in this episode.
    pub killed: Vec<String>,
}

impl Roster {
    /// Create a roster from the initial character names. Blank names are
    /// skipped, duplicates collapse to the first spelling.
    pub fn new<I, S>(initial: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut roster = Self::default();
        for name in initial {
            let name = name.into();
            if !name.trim().is_empty() && !roster.knows(&name) {
                roster.living.push(name.trim().to_string());
            }
        }
        roster
    }

    /// Currently living character names, in order of first appearance.
    pub fn living(&self) -> &[String] {
        &self.living
    }

    /// Characters killed so far, in order of death.
    pub fn fallen(&self) -> &[String] {
        &self.fallen
    }

    /// True if the name is living (case-insensitive).
    pub fn is_living(&self, name: &str) -> bool {
        Self::position(&self.living, name).is_some()
    }

    /// True if the roster has ever seen this name, living or fallen.
    pub fn knows(&self, name: &str) -> bool {
        Self::position(&self.living, name).is_some()
            || Self::position(&self.fallen, name).is_some()
    }

    /// Apply one episode's character deltas.
    ///
    /// Names in `current_characters` the roster has never seen are
    /// introduced. Names in `killed_characters` move from living to
    /// fallen; a killed name the roster has never seen counts as
    /// introduced-and-killed within the same episode.
    pub fn apply(&mut self, draft: &EpisodeDraft) -> RosterDelta {
        let mut delta = RosterDelta::default();

        for name in &draft.current_characters {
            let name = name.trim();
            if name.is_empty() || self.knows(name) {
                continue;
            }
            self.living.push(name.to_string());
            delta.introduced.push(name.to_string());
        }

        for name in &draft.killed_characters {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            if let Some(idx) = Self::position(&self.living, name) {
                let canonical = self.living.remove(idx);
                delta.killed.push(canonical.clone());
                self.fallen.push(canonical);
            } else if !self.knows(name) {
                delta.introduced.push(name.to_string());
                delta.killed.push(name.to_string());
                self.fallen.push(name.to_string());
            }
            // A name already on the fallen list stays there.
        }

        delta
    }

    fn position(names: &[String], name: &str) -> Option<usize> {
        let name = name.trim();
        names.iter().position(|n| n.eq_ignore_ascii_case(name))
    }
}

/// Everything re-injected into the next episode's prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Continuity {
    /// Running summary of all episodes so far.
    pub summary: Option<String>,
    /// Living and fallen characters.
    pub roster: Roster,
    /// The closing lines of the previous episode, verbatim.
    pub ended_at: Option<String>,
}

impl Continuity {
    /// Fresh continuity for a story with the given initial characters.
    pub fn new<I, S>(initial_characters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            summary: None,
            roster: Roster::new(initial_characters),
            ended_at: None,
        }
    }

    /// Fold one accepted episode into the continuity state.
    pub fn absorb(&mut self, draft: &EpisodeDraft, summary: String) -> RosterDelta {
        let delta = self.roster.apply(draft);
        self.summary = Some(summary);
        self.ended_at = draft.ended_at.clone();
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(current: &[&str], killed: &[&str]) -> EpisodeDraft {
        EpisodeDraft {
            title: "t".to_string(),
            body: "b".to_string(),
            current_characters: current.iter().map(|s| s.to_string()).collect(),
            killed_characters: killed.iter().map(|s| s.to_string()).collect(),
            ended_at: Some("The end of the scene.".to_string()),
        }
    }

    #[test]
    fn test_initial_roster_skips_blanks_and_duplicates() {
        let roster = Roster::new(["Tom", "", "  ", "tom", "Jerry"]);
        assert_eq!(roster.living(), &["Tom", "Jerry"]);
    }

    #[test]
    fn test_introductions_and_kills() {
        let mut roster = Roster::new(["Tom", "Jerry"]);
        let delta = roster.apply(&draft(&["Tom", "Jerry", "Master"], &["Jerry"]));

        assert_eq!(delta.introduced, vec!["Master"]);
        assert_eq!(delta.killed, vec!["Jerry"]);
        assert_eq!(roster.living(), &["Tom", "Master"]);
        assert_eq!(roster.fallen(), &["Jerry"]);
    }

    #[test]
    fn test_kill_is_case_insensitive_and_keeps_canonical_name() {
        let mut roster = Roster::new(["Tom"]);
        let delta = roster.apply(&draft(&["Tom"], &["TOM"]));

        assert_eq!(delta.killed, vec!["Tom"]);
        assert!(roster.living().is_empty());
        assert_eq!(roster.fallen(), &["Tom"]);
    }

    #[test]
    fn test_dead_characters_stay_dead() {
        let mut roster = Roster::new(["Tom", "Jerry"]);
        roster.apply(&draft(&["Tom"], &["Jerry"]));

        // A later episode listing Jerry as current must not revive him.
        let delta = roster.apply(&draft(&["Tom", "Jerry"], &[]));
        assert!(delta.introduced.is_empty());
        assert_eq!(roster.living(), &["Tom"]);
        assert_eq!(roster.fallen(), &["Jerry"]);
    }

    #[test]
    fn test_introduced_and_killed_same_episode() {
        let mut roster = Roster::new(["Tom"]);
        let delta = roster.apply(&draft(&["Tom"], &["Stranger"]));

        assert_eq!(delta.introduced, vec!["Stranger"]);
        assert_eq!(delta.killed, vec!["Stranger"]);
        assert_eq!(roster.living(), &["Tom"]);
        assert_eq!(roster.fallen(), &["Stranger"]);
    }

    #[test]
    fn test_roster_arithmetic_over_many_episodes() {
        // living = initial + introduced - killed, regardless of what the
        // model claims in current_characters.
        let mut roster = Roster::new(["A", "B"]);
        roster.apply(&draft(&["A", "B", "C"], &[]));
        roster.apply(&draft(&["A", "C"], &["B"]));
        roster.apply(&draft(&["A", "C", "D", "E"], &["C"]));

        assert_eq!(roster.living(), &["A", "D", "E"]);
        assert_eq!(roster.fallen(), &["B", "C"]);
    }

    #[test]
    fn test_continuity_absorb() {
        let mut continuity = Continuity::new(["Tom", "Jerry"]);
        assert!(continuity.summary.is_none());

        let delta = continuity.absorb(
            &draft(&["Tom", "Jerry", "Master"], &[]),
            "Tom and Jerry arrive at the house.".to_string(),
        );

        assert_eq!(delta.introduced, vec!["Master"]);
        assert_eq!(
            continuity.summary.as_deref(),
            Some("Tom and Jerry arrive at the house.")
        );
        assert_eq!(
            continuity.ended_at.as_deref(),
            Some("The end of the scene.")
        );
    }
}
