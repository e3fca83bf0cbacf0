//! AI Storyteller TUI application.
//!
//! A terminal interface for generating serialized stories with an AI
//! narrator: outline a story from user parameters, revise outlines with
//! feedback, then write it episode by episode.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a text-based interface suitable for
//! scripted generation:
//!
//! ```bash
//! cargo run -p storyteller -- --headless --title "The Quiet House" --episodes 3 --tone Suspenseful
//! ```

mod app;
mod events;
mod headless;
mod ui;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::stdout;
use std::time::Duration;
use storyteller_core::StoryLibrary;

use app::{App, PendingAction};
use events::{handle_event, EventResult};
use ui::render::render;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Check for API key
    if std::env::var("ANTHROPIC_API_KEY").is_err() {
        eprintln!("Error: ANTHROPIC_API_KEY environment variable not set.");
        eprintln!("Please set it in .env file or with: export ANTHROPIC_API_KEY=your_key_here");
        std::process::exit(1);
    }

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    // Check for --headless mode
    if args.iter().any(|a| a == "--headless") {
        let config = headless::parse_config_from_args(&args);
        return headless::run_headless(config).await.map_err(|e| e.into());
    }

    // Check for --help
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    // Load the story library before touching the terminal
    let library = StoryLibrary::from_env();
    let stories = library.list_stories().await?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, App::new(library, stories)).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> std::io::Result<()> {
    loop {
        // Render
        terminal.draw(|f| render(f, &app))?;

        // Process any pending action. Model calls block here, so show a
        // busy status first and redraw before starting.
        if let Some(action) = app.pending.take() {
            if let Some(message) = busy_message(&action) {
                app.set_status(message);
                terminal.draw(|f| render(f, &app))?;
            }
            app.run_action(action).await;
        }

        // Poll for events
        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            match handle_event(&mut app, ev) {
                EventResult::Quit => return Ok(()),
                EventResult::NeedsRedraw | EventResult::Continue => {}
            }
        }
    }
}

/// Status line text shown while a slow action runs.
fn busy_message(action: &PendingAction) -> Option<&'static str> {
    match action {
        PendingAction::CreateStory => Some("Generating outlines... please wait"),
        PendingAction::GenerateOutlines => Some("Generating outlines... please wait"),
        PendingAction::ImproveOutline { .. } => {
            Some("Improving outline and maintaining story flow...")
        }
        PendingAction::Finalize => {
            Some("Generating full story from outlines... this might take a few minutes")
        }
        PendingAction::Refresh | PendingAction::OpenStory(_) | PendingAction::DeleteStory(_) => {
            None
        }
    }
}

fn print_help() {
    println!("AI Storyteller - serialized story generation with an AI narrator");
    println!();
    println!("USAGE:");
    println!("  storyteller [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help       Show this help message");
    println!("  --headless       Run without the TUI (generate and print a story)");
    println!();
    println!("HEADLESS OPTIONS (only with --headless):");
    println!("  --title <TITLE>        Story title (default: Untitled Story)");
    println!("  --episodes <N>         Number of episodes, 1-20 (default: 2)");
    println!("  --trope <TEXT>         Central trope");
    println!("  --setting <TEXT>       Regional setting");
    println!("  --tone <TONE>          Story tone (default: Comedic)");
    println!("  --style <STYLE>        Narration style (default: Third Person)");
    println!("  --character <SPEC>     Initial character as name:gender:traits (repeatable)");
    println!("  --library <DIR>        Story library directory (default: $STORYTELLER_HOME or stories/)");
    println!();
    println!("TONES:");
    println!("  comedic, dramatic, suspenseful, fantasy, romantic, dark,");
    println!("  inspirational, sci-fi, mystery");
    println!();
    println!("STYLES:");
    println!("  third-person, first-person, second-person, omniscient,");
    println!("  script-format, diary-entry");
    println!();
    println!("EXAMPLES:");
    println!("  storyteller                                 # Interactive TUI mode");
    println!("  storyteller --headless --title \"The Quiet House\" --episodes 3 \\");
    println!("      --tone suspenseful --character \"Tom:Male:a loyal cat\"");
}
