//! Prompt builders for the narrator.
//!
//! Pure functions from story state to prompt text. Keeping these out of
//! the agent makes the exact wording testable without touching the API.

use crate::continuity::Continuity;
use crate::story::{Outline, StoryInfo};

/// System prompt for generating the full set of episode outlines.
pub fn outline_system_prompt() -> String {
    r#"You are a master storyteller and screenwriter, skilled in narrative arcs and episodic storytelling. Your task is to craft detailed outlines for episodes of a story. These outlines will serve as blueprints for writing full episodes later.

### Guidelines:
- The story must span a clear and engaging arc across all episodes.
- Each episode's outline should:
    - Be ~200 words max
    - Begin with a natural continuation from the previous episode
    - Include conflicts, stakes, and key turning points
    - Show character evolution and emotional development
    - End with a compelling cliffhanger, emotional shift, or resolution to keep momentum
- Plot progression must be logical and cause-effect driven
- Gradually build intensity, with a major climax in the penultimate or final episode
- Ensure a satisfying conclusion in the last episode that ties up major arcs
- Maintain consistent tone, voice, and setting

### Output Format:
Return ONLY a JSON object where each key is the episode number (as a string) and each value is that episode's outline (max 200 words). No markdown, no commentary, no triple backticks.

### Example:
{
"1": "Episode 1 outline text...",
"2": "Episode 2 outline text...",
"3": "Episode 3 outline text..."
}"#
        .to_string()
}

/// User prompt for generating the full set of episode outlines.
pub fn outline_user_prompt(info: &StoryInfo) -> String {
    format!(
        r#"Generate structured outlines for a {total}-episode story.

### Story Information:
- Genre: {tone}
- Style: {style}
- Trope: {trope}

{character_note}{setting_note}
Please:
- Maintain narrative continuity from episode to episode
- Provide sufficient plot and emotional development per episode
- Introduce and escalate conflict
- Guide characters through internal and external growth
- Build toward a climax and satisfying resolution
- Keep outlines focused, imaginative, and clear"#,
        total = info.total_episodes,
        tone = info.tone.name(),
        style = info.style.name(),
        trope = info.trope.as_deref().unwrap_or("Choose an appropriate one"),
        character_note = character_note(info, "These characters should appear in the storyline."),
        setting_note = setting_note(info),
    )
}

/// System prompt for revising one outline from user feedback.
pub fn improve_system_prompt() -> String {
    r#"You are a professional narrative editor and script consultant.

Your task is to revise one episode's outline of a serialized story based on user feedback. The story has a defined genre, style, and trope, and you must preserve coherence with the previous episodes and overall story arc.

### Your Responsibilities:
- Revise the episode outline to incorporate the user feedback meaningfully and creatively
- Ensure consistency with previous episode outlines (character arcs, events, tone) and with the story's genre, style, and central trope
- Maintain or enhance narrative flow, character development, and dramatic tension
- Keep the outline to approximately 100 words
- Ensure the episode transitions logically from the previous one

Only return the improved outline as a single paragraph of text. Do not include any explanation or metadata."#
        .to_string()
}

/// User prompt for revising one outline from user feedback.
pub fn improve_user_prompt(
    info: &StoryInfo,
    outlines: &Outline,
    episode: u32,
    feedback: &str,
) -> String {
    format!(
        r#"You are revising Episode {episode} in a story with the following details:

### Story Overview:
- Total Episodes: {total}
- Genre: {tone}
- Style: {style}
- Central Trope: {trope}

### Previous Episode Outlines:
{previous}

### Original Outline for Episode {episode}:
"{original}"

### User Feedback:
"{feedback}"

Please return an improved version of the episode outline that addresses the feedback while staying faithful to the story so far."#,
        episode = episode,
        total = info.total_episodes,
        tone = info.tone.name(),
        style = info.style.name(),
        trope = info.trope.as_deref().unwrap_or("None"),
        previous = outlines_before(outlines, episode),
        original = outlines.get(episode).unwrap_or(""),
        feedback = feedback,
    )
}

/// System prompt for reconciling one later outline after an edit.
pub fn reconcile_system_prompt(info: &StoryInfo, episode: u32, modified: u32) -> String {
    format!(
        r#"You are a narrative continuity specialist tasked with maintaining consistent story flow across episodes in a multi-part series.

The story follows the genre: {tone}, in {style} style.
The central story trope is: {trope}.

Your job is to revise (only if necessary) the outline for Episode {episode} so that it flows logically from all previous episodes, especially Episode {modified}, which has been recently updated based on user feedback.

Guidelines:
- Do NOT rewrite unless continuity, character development, or logic has been broken.
- If changes are needed, preserve the soul, theme, tone, and purpose of the original outline.
- Keep the new outline to approximately 100 words.
- Ensure consistent character motivations, plot logic, and relationship dynamics.
- Reflect any major events or consequences from the modified episode in the current one.
- Return only the updated outline text with no explanation or commentary."#,
        tone = info.tone.name(),
        style = info.style.name(),
        trope = info.trope.as_deref().unwrap_or("None"),
        episode = episode,
        modified = modified,
    )
}

/// User prompt for reconciling one later outline after an edit.
pub fn reconcile_user_prompt(info: &StoryInfo, outlines: &Outline, episode: u32) -> String {
    format!(
        r#"The total number of episodes in the story is {total}.

Below are all the previous outlines up to Episode {episode}, including the user's modifications:
{previous}

Current outline for Episode {episode}:
"{original}"

Please revise this outline only if necessary to ensure smooth narrative flow, consistency in character arcs and events, and logical progression from previous episodes.

If the current outline already aligns well with prior content, you may return it unchanged."#,
        total = info.total_episodes,
        episode = episode,
        previous = outlines_before(outlines, episode),
        original = outlines.get(episode).unwrap_or(""),
    )
}

/// System prompt for writing one episode.
pub fn episode_system_prompt(info: &StoryInfo, episode_number: u32, outline: Option<&str>) -> String {
    let character_note = if episode_number == 1 {
        character_note(info, "These characters must appear in this episode.")
    } else {
        String::new()
    };

    let ending_note = if episode_number == info.total_episodes {
        "This is the final episode. Provide a satisfying and conclusive ending that resolves all major plotlines, character arcs, and conflicts.\n"
    } else {
        "End the episode with a suspenseful or emotional cliffhanger to encourage continued interest.\n"
    };

    let outline_note = match outline {
        Some(text) => format!("Follow this outline for the episode:\n{text}\n"),
        None => String::new(),
    };

    format!(
        r#"You are a master storyteller creating episode {episode_number} of a {total}-episode long-form narrative.
The story (the "body" value in the JSON) must strictly follow these:
- the genre is {tone}
- the style is {style}: {style_description}

The central story trope is: {trope}.
Your task is to ensure deep narrative consistency, emotional weight, and evolving character dynamics.

Rules:
- The episode must pick up exactly where the previous episode left off, continuing the scene or event if applicable.
- Do NOT resurrect dead characters from earlier episodes unless there's a well-written and justified twist.
- Ensure previously killed characters remain absent unless their return is critical and logically explained.
- Respect and evolve existing character relationships, behaviors, and the tone established so far.
- Use vivid descriptions, rich dialogues, and evolving conflict.
- Use only characters that were active previously or new ones introduced meaningfully.
{character_note}{setting_note}{outline_note}{ending_note}
Additional Requirements:
- At the end of the episode, extract the final one or two lines of the story and include them in the "ended_at" field.
- These lines must be exactly as written in the story; they will be used to help the next episode start from the same point.
- "ended_at" must not contain any commentary or summarization, just raw story lines from the episode's ending.

Return ONLY a JSON object in the following STRICT format. No markdown, no text, no commentary, no triple backticks.
Escape newlines using \n inside the "body" and "ended_at" fields.

JSON format:
{{
"title": "A short, catchy episode title WITHOUT the word 'Episode'",
"body": "The actual episode content here. Use \n for newlines.",
"killed_characters": ["Characters who died in this episode, if any"],
"current_characters": ["All currently alive characters at the end of this episode"],
"ended_at": "Last 1-2 lines of the story content. Use \n for newlines."
}}"#,
        episode_number = episode_number,
        total = info.total_episodes,
        tone = info.tone.name(),
        style = info.style.name(),
        style_description = info.style.description(),
        trope = info.trope.as_deref().unwrap_or("your choice"),
        character_note = character_note,
        setting_note = setting_note(info),
        outline_note = outline_note,
        ending_note = ending_note,
    )
}

/// User prompt for writing one episode.
pub fn episode_user_prompt(episode_number: u32, continuity: &Continuity) -> String {
    let alive = if continuity.roster.living().is_empty() {
        "N/A".to_string()
    } else {
        continuity.roster.living().join(", ")
    };

    let fallen_note = if continuity.roster.fallen().is_empty() {
        String::new()
    } else {
        format!(
            "Characters Already Dead (must stay dead): {}\n",
            continuity.roster.fallen().join(", ")
        )
    };

    format!(
        r#"Episode Number: {episode_number}
Previous Episode Summary: {summary}
Characters Alive So Far: {alive}
{fallen_note}Story Ended Previously At: {ended_at}

Write a connected, coherent episode of around 600-800 words, directly continuing the previous one."#,
        episode_number = episode_number,
        summary = continuity.summary.as_deref().unwrap_or("No context available"),
        alive = alive,
        fallen_note = fallen_note,
        ended_at = continuity.ended_at.as_deref().unwrap_or("N/A"),
    )
}

/// System prompt for the summary model.
pub fn summary_system_prompt() -> &'static str {
    "You are a highly skilled narrative summarizer."
}

/// User prompt for folding an episode into the running summary.
pub fn summary_user_prompt(body: &str, previous: Option<&str>) -> String {
    match previous {
        Some(previous) => format!(
            r#"You are an expert story summarizer. Continue building on the previous episode's summary in a natural and seamless way.
Merge the important events and emotional highlights from the current story text with the previous summary to form one continuous narrative.

Previous Summary:
{previous}

Current Episode Text:
{body}

Return a single, flowing summary that reads like one continuous abstract. The summary shouldn't be long."#
        ),
        None => format!(
            r#"You are an expert story summarizer. Provide a well-written abstract summary of the following story text.
Do not just extract sentences; summarize like a human would, preserving key events and emotions.

Current Episode Text:
{body}

Return a rich summary that captures the essence of this episode. The summary should not be long."#
        ),
    }
}

/// Bullet list of the user's initial characters, or empty if none named.
fn character_note(info: &StoryInfo, instruction: &str) -> String {
    let descriptions: Vec<String> = info.named_characters().map(|c| c.describe()).collect();
    if descriptions.is_empty() {
        String::new()
    } else {
        format!(
            "Characters in this story:\n{}\n{}\n",
            descriptions.join("\n"),
            instruction
        )
    }
}

fn setting_note(info: &StoryInfo) -> String {
    match info.setting.as_deref() {
        Some(setting) if !setting.trim().is_empty() => {
            format!("The story is set in: {setting}.\n")
        }
        _ => String::new(),
    }
}

/// Outlines strictly before the given episode, one per line.
fn outlines_before(outlines: &Outline, episode: u32) -> String {
    let lines: Vec<String> = outlines
        .iter()
        .filter(|(n, _)| *n < episode)
        .map(|(n, text)| format!("Episode {n}: {text}"))
        .collect();
    if lines.is_empty() {
        "(none)".to_string()
    } else {
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::story::{CharacterSheet, Gender, Style, Tone};

    fn sample_info() -> StoryInfo {
        StoryInfo {
            title: "The House".to_string(),
            total_episodes: 3,
            initial_characters: vec![
                CharacterSheet::new("Tom", Gender::Male, "loyal"),
                CharacterSheet::new("Jerry", Gender::Male, "sly"),
            ],
            trope: Some("a cat protects the house master from a scheming mouse".to_string()),
            tone: Tone::Suspenseful,
            style: Style::ThirdPerson,
            setting: Some("a small village in Uttar Pradesh".to_string()),
        }
    }

    #[test]
    fn test_episode_one_requires_initial_characters() {
        let prompt = episode_system_prompt(&sample_info(), 1, None);
        assert!(prompt.contains("Tom (Male): loyal"));
        assert!(prompt.contains("must appear in this episode"));
    }

    #[test]
    fn test_later_episodes_omit_character_requirement() {
        let prompt = episode_system_prompt(&sample_info(), 2, None);
        assert!(!prompt.contains("must appear in this episode"));
    }

    #[test]
    fn test_final_episode_gets_conclusive_ending() {
        let info = sample_info();
        let last = episode_system_prompt(&info, 3, None);
        assert!(last.contains("final episode"));
        assert!(last.contains("conclusive ending"));

        let middle = episode_system_prompt(&info, 2, None);
        assert!(middle.contains("cliffhanger"));
        assert!(!middle.contains("This is the final episode"));
    }

    #[test]
    fn test_episode_prompt_carries_outline_and_setting() {
        let prompt = episode_system_prompt(&sample_info(), 2, Some("Jerry finds the cellar key."));
        assert!(prompt.contains("Jerry finds the cellar key."));
        assert!(prompt.contains("a small village in Uttar Pradesh"));
        assert!(prompt.contains(Style::ThirdPerson.description()));
    }

    #[test]
    fn test_episode_user_prompt_threads_continuity() {
        let mut continuity = Continuity::new(["Tom", "Jerry"]);
        continuity.absorb(
            &crate::story::EpisodeDraft {
                title: "t".to_string(),
                body: "b".to_string(),
                killed_characters: vec!["Jerry".to_string()],
                current_characters: vec!["Tom".to_string(), "Master".to_string()],
                ended_at: Some("The door slammed shut.".to_string()),
            },
            "Jerry is dead; Tom guards the Master.".to_string(),
        );

        let prompt = episode_user_prompt(2, &continuity);
        assert!(prompt.contains("Episode Number: 2"));
        assert!(prompt.contains("Jerry is dead; Tom guards the Master."));
        assert!(prompt.contains("Tom, Master"));
        assert!(prompt.contains("must stay dead): Jerry"));
        assert!(prompt.contains("The door slammed shut."));
    }

    #[test]
    fn test_first_episode_user_prompt_has_no_context() {
        let continuity = Continuity::new(["Tom"]);
        let prompt = episode_user_prompt(1, &continuity);
        assert!(prompt.contains("No context available"));
        assert!(prompt.contains("Story Ended Previously At: N/A"));
        assert!(!prompt.contains("must stay dead"));
    }

    #[test]
    fn test_summary_prompt_merges_previous() {
        let fresh = summary_user_prompt("body text", None);
        assert!(!fresh.contains("Previous Summary"));

        let merged = summary_user_prompt("body text", Some("old summary"));
        assert!(merged.contains("Previous Summary:\nold summary"));
    }

    #[test]
    fn test_improve_prompt_includes_feedback_and_history() {
        let mut outlines = Outline::new();
        outlines.set(1, "Arrival.");
        outlines.set(2, "Betrayal.");
        outlines.set(3, "Reckoning.");

        let prompt = improve_user_prompt(&sample_info(), &outlines, 2, "more tension");
        assert!(prompt.contains("Episode 1: Arrival."));
        assert!(!prompt.contains("Episode 3: Reckoning."));
        assert!(prompt.contains("\"Betrayal.\""));
        assert!(prompt.contains("more tension"));
    }

    #[test]
    fn test_outline_user_prompt_names_parameters() {
        let prompt = outline_user_prompt(&sample_info());
        assert!(prompt.contains("3-episode story"));
        assert!(prompt.contains("Suspenseful"));
        assert!(prompt.contains("Third Person"));
        assert!(prompt.contains("scheming mouse"));
    }
}
