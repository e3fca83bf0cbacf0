//! Headless mode for the storyteller.
//!
//! Generates a complete story from command line flags and prints it to
//! stdout. Designed for scripted runs and automated testing.

use storyteller_core::headless::{HeadlessConfig, HeadlessStory};
use storyteller_core::{CharacterSheet, Gender, SessionError, Style, Tone};

/// Run story generation in headless mode.
pub async fn run_headless(config: HeadlessConfig) -> Result<(), SessionError> {
    // The subscriber writes to stderr, which is safe without the TUI.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    println!("=== AI Storyteller ===");
    println!("Title: {}", config.title);
    println!("Episodes: {}", config.total_episodes);
    println!("Tone: {} | Style: {}", config.tone.name(), config.style.name());
    if !config.characters.is_empty() {
        let names: Vec<&str> = config.characters.iter().map(|c| c.name.as_str()).collect();
        println!("Characters: {}", names.join(", "));
    }
    println!();

    let mut story = HeadlessStory::new(config).await?;

    println!("Generating outlines...");
    let outline = story.outline().await?;
    for (number, text) in outline.iter() {
        println!();
        println!("--- Outline {number} ---");
        println!("{text}");
    }
    println!();

    println!("Writing episodes...");
    story.finalize().await?;

    for episode in story.episodes() {
        println!();
        println!("=== Episode {}: {} ===", episode.number, episode.title);
        println!();
        println!("{}", episode.display_body());
        if !episode.killed_characters.is_empty() {
            println!();
            println!("[Killed this episode: {}]", episode.killed_characters.join(", "));
        }
    }

    println!();
    println!("Living characters: {}", join_or_none(story.living_characters()));
    println!("Fallen characters: {}", join_or_none(story.fallen_characters()));
    if let Some(summary) = story.summary() {
        println!();
        println!("Story summary:");
        println!("{summary}");
    }

    Ok(())
}

fn join_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

/// Parse story configuration from command line arguments.
pub fn parse_config_from_args(args: &[String]) -> HeadlessConfig {
    let mut config = HeadlessConfig::quick_start("Untitled Story");

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--title" => {
                if let Some(title) = args.get(i + 1) {
                    config.title = title.clone();
                    i += 1;
                }
            }
            "--episodes" => {
                if let Some(n) = args.get(i + 1) {
                    if let Ok(n) = n.parse::<u32>() {
                        config.total_episodes = n;
                    }
                    i += 1;
                }
            }
            "--trope" => {
                if let Some(trope) = args.get(i + 1) {
                    config.trope = Some(trope.clone());
                    i += 1;
                }
            }
            "--setting" => {
                if let Some(setting) = args.get(i + 1) {
                    config.setting = Some(setting.clone());
                    i += 1;
                }
            }
            "--tone" => {
                if let Some(tone) = args.get(i + 1) {
                    config.tone = Tone::parse(tone).unwrap_or(Tone::Comedic);
                    i += 1;
                }
            }
            "--style" => {
                if let Some(style) = args.get(i + 1) {
                    config.style = Style::parse(style).unwrap_or(Style::ThirdPerson);
                    i += 1;
                }
            }
            "--character" => {
                if let Some(spec) = args.get(i + 1) {
                    config.characters.push(parse_character(spec));
                    i += 1;
                }
            }
            "--library" => {
                if let Some(dir) = args.get(i + 1) {
                    config.library_root = Some(dir.into());
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }

    config
}

/// Parse a character spec of the form `name:gender:traits`. Gender and
/// traits are optional.
fn parse_character(spec: &str) -> CharacterSheet {
    let mut parts = spec.splitn(3, ':');
    let name = parts.next().unwrap_or("").trim().to_string();
    let gender = parts
        .next()
        .and_then(Gender::parse)
        .unwrap_or(Gender::Other);
    let traits = parts.next().unwrap_or("").trim().to_string();
    CharacterSheet::new(name, gender, traits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse_config_from_args(&args(&[
            "storyteller",
            "--headless",
            "--title",
            "The Quiet House",
            "--episodes",
            "3",
            "--tone",
            "suspenseful",
            "--style",
            "diary-entry",
            "--setting",
            "a hillside village",
            "--character",
            "Tom:Male:a loyal cat",
            "--character",
            "Jerry",
        ]));

        assert_eq!(config.title, "The Quiet House");
        assert_eq!(config.total_episodes, 3);
        assert_eq!(config.tone, Tone::Suspenseful);
        assert_eq!(config.style, Style::DiaryEntry);
        assert_eq!(config.setting.as_deref(), Some("a hillside village"));
        assert_eq!(config.characters.len(), 2);
        assert_eq!(config.characters[0].name, "Tom");
        assert_eq!(config.characters[0].gender, Gender::Male);
        assert_eq!(config.characters[0].traits, "a loyal cat");
        assert_eq!(config.characters[1].name, "Jerry");
        assert_eq!(config.characters[1].gender, Gender::Other);
    }

    #[test]
    fn test_parse_defaults() {
        let config = parse_config_from_args(&args(&["storyteller", "--headless"]));
        assert_eq!(config.title, "Untitled Story");
        assert_eq!(config.total_episodes, 2);
        assert_eq!(config.tone, Tone::Comedic);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = parse_config_from_args(&args(&[
            "--episodes", "lots", "--tone", "gloomy", "--style", "sonnet",
        ]));
        assert_eq!(config.total_episodes, 2);
        assert_eq!(config.tone, Tone::Comedic);
        assert_eq!(config.style, Style::ThirdPerson);
    }
}
