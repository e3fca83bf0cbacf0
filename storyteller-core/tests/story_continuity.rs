//! Integration tests for episode continuity using the mock narrator.
//!
//! These run the scripted drafts through the same continuity logic the
//! real episode loop uses, with no network access.

use storyteller_core::testing::{draft, TestHarness};
use storyteller_core::{
    CharacterSheet, Gender, Outline, StoryInfo, StoryLibrary, Style, Tone,
};

fn info(title: &str, total_episodes: u32, characters: &[&str]) -> StoryInfo {
    StoryInfo {
        title: title.to_string(),
        total_episodes,
        initial_characters: characters
            .iter()
            .map(|name| CharacterSheet::new(*name, Gender::Other, ""))
            .collect(),
        trope: Some("a quiet house hides a feud".to_string()),
        tone: Tone::Suspenseful,
        style: Style::ThirdPerson,
        setting: Some("a hillside village".to_string()),
    }
}

#[test]
fn episode_fields_match_the_scripted_response() {
    let mut harness = TestHarness::new(info("Fidelity", 1, &["Tom"]));
    harness.expect_draft(draft(
        "The Cellar Door",
        "Tom crept down the stairs.\\nThe lantern guttered.",
        &["Tom", "The Master"],
        &[],
        "The lantern guttered.",
    ));

    let episode = harness.run_episode();

    assert_eq!(episode.number, 1);
    assert_eq!(episode.title, "The Cellar Door");
    assert!(episode.body.starts_with("Tom crept"));
    assert_eq!(episode.current_characters, vec!["Tom", "The Master"]);
    assert!(episode.killed_characters.is_empty());
    assert_eq!(episode.ended_at.as_deref(), Some("The lantern guttered."));
}

#[test]
fn roster_is_initial_plus_introduced_minus_killed() {
    let mut harness = TestHarness::new(info("Arithmetic", 5, &["A", "B"]));
    harness
        .expect_draft(draft("One", "b1", &["A", "B", "C"], &[], "e1"))
        .expect_draft(draft("Two", "b2", &["A", "B", "C"], &["B"], "e2"))
        .expect_draft(draft("Three", "b3", &["A", "C", "D"], &[], "e3"))
        // The model wrongly re-lists B as current; the roster must not
        // resurrect him.
        .expect_draft(draft("Four", "b4", &["A", "B", "C", "D"], &["C"], "e4"))
        .expect_draft(draft("Five", "b5", &["A", "D"], &[], "e5"));

    harness.run_all();

    // initial {A, B} + introduced {C, D} - killed {B, C}
    assert_eq!(harness.living(), &["A", "D"]);
    assert_eq!(harness.fallen(), &["B", "C"]);
}

#[test]
fn roster_property_holds_after_every_episode() {
    let mut harness = TestHarness::new(info("Stepwise", 3, &["Tom", "Jerry"]));
    harness
        .expect_draft(draft("One", "b1", &["Tom", "Jerry", "Master"], &[], "e1"))
        .expect_draft(draft("Two", "b2", &["Tom", "Master"], &["Jerry"], "e2"))
        .expect_draft(draft("Three", "b3", &["Tom", "Master"], &["Master"], "e3"));

    harness.run_episode();
    assert_eq!(harness.living(), &["Tom", "Jerry", "Master"]);

    harness.run_episode();
    assert_eq!(harness.living(), &["Tom", "Master"]);
    assert_eq!(harness.fallen(), &["Jerry"]);

    harness.run_episode();
    assert_eq!(harness.living(), &["Tom"]);
    assert_eq!(harness.fallen(), &["Jerry", "Master"]);
}

#[test]
fn summaries_thread_forward_between_episodes() {
    let mut harness = TestHarness::new(info("Threaded", 2, &[]));
    harness
        .expect_draft(draft("One", "The feud begins.", &["Tom"], &[], "It begins."))
        .expect_draft(draft("Two", "The feud ends.", &["Tom"], &[], "It ends."));

    let first = harness.run_episode().summary_till_now.clone();
    assert!(first.contains("The feud begins."));

    let second = harness.run_episode().summary_till_now.clone();
    assert!(second.contains("The feud begins."));
    assert!(second.contains("The feud ends."));
}

#[test]
fn ending_lines_thread_into_continuity() {
    let mut harness = TestHarness::new(info("Endings", 2, &[]));
    harness
        .expect_draft(draft("One", "b1", &["Tom"], &[], "The door slammed."))
        .expect_draft(draft("Two", "b2", &["Tom"], &[], "Silence fell."));

    harness.run_episode();
    assert_eq!(
        harness.continuity.ended_at.as_deref(),
        Some("The door slammed.")
    );

    harness.run_episode();
    assert_eq!(harness.continuity.ended_at.as_deref(), Some("Silence fell."));
}

#[tokio::test]
async fn generated_story_round_trips_through_the_library() {
    let temp = tempfile::TempDir::new().expect("temp dir");
    let library = StoryLibrary::new(temp.path());

    let story_info = info("Round Trip", 2, &["Tom", "Jerry"]);
    library.create_story(&story_info).await.expect("create");

    let mut outlines = Outline::new();
    outlines.set(1, "The feud begins.");
    outlines.set(2, "The feud ends.");
    library
        .save_outlines(&story_info.title, &outlines)
        .await
        .expect("save outlines");

    let mut harness = TestHarness::new(story_info.clone());
    harness
        .expect_draft(draft("One", "b1", &["Tom", "Jerry"], &[], "e1"))
        .expect_draft(draft("Two", "b2", &["Tom"], &["Jerry"], "e2"));
    harness.run_all();

    for episode in &harness.episodes {
        library
            .save_episode(&story_info.title, episode)
            .await
            .expect("save episode");
    }

    let stories = library.list_stories().await.expect("list");
    assert_eq!(stories.len(), 1);
    assert_eq!(stories[0].title, "Round Trip");
    assert_eq!(stories[0].episodes_written, 2);
    assert!(stories[0].has_outlines);

    let reloaded = library
        .load_episodes(&story_info.title)
        .await
        .expect("load episodes");
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded[1].title, "Two");
    assert_eq!(reloaded[1].killed_characters, vec!["Jerry"]);

    let outlines_back = library
        .load_outlines(&story_info.title)
        .await
        .expect("load outlines");
    assert_eq!(outlines_back, Some(outlines));
}
