//! Event handling for the storyteller TUI

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::{App, InputMode, PendingAction, View};

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
    NeedsRedraw,
}

/// Handle a terminal event
pub fn handle_event(app: &mut App, event: Event) -> EventResult {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        Event::Resize(_, _) => EventResult::NeedsRedraw,
        _ => EventResult::Continue,
    }
}

fn handle_mouse_event(app: &mut App, mouse: MouseEvent) -> EventResult {
    if app.view != View::Episodes {
        return EventResult::Continue;
    }
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            app.scroll_episode(-3);
            EventResult::NeedsRedraw
        }
        MouseEventKind::ScrollDown => {
            app.scroll_episode(3);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    // Global shortcut (always works)
    if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
        return EventResult::Quit;
    }

    if app.input_mode == InputMode::Feedback {
        return handle_feedback_mode(app, key);
    }

    match app.view {
        View::Library => handle_library_keys(app, key),
        View::Create => handle_create_keys(app, key),
        View::Outline => handle_outline_keys(app, key),
        View::Episodes => handle_episode_keys(app, key),
    }
}

/// Library sidebar navigation
fn handle_library_keys(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char('q') => EventResult::Quit,
        KeyCode::Char('j') | KeyCode::Down => {
            app.select_next_story();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.select_prev_story();
            EventResult::NeedsRedraw
        }
        KeyCode::Enter => {
            if let Some(summary) = app.selected_summary() {
                app.pending = Some(PendingAction::OpenStory(summary.slug.clone()));
            }
            EventResult::NeedsRedraw
        }
        KeyCode::Char('n') => {
            app.start_create();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('d') => {
            if let Some(summary) = app.selected_summary() {
                app.pending = Some(PendingAction::DeleteStory(summary.slug.clone()));
            }
            EventResult::NeedsRedraw
        }
        KeyCode::Char('r') => {
            app.pending = Some(PendingAction::Refresh);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Creation form editing. Letters type into the focused field, so the
/// only hotkeys here use control or dedicated keys.
fn handle_create_keys(app: &mut App, key: KeyEvent) -> EventResult {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            app.view = View::Library;
            app.clear_status();
            EventResult::NeedsRedraw
        }
        (KeyCode::Tab, _) | (KeyCode::Down, _) => {
            app.form.focus_next();
            EventResult::NeedsRedraw
        }
        (KeyCode::BackTab, _) | (KeyCode::Up, _) => {
            app.form.focus_prev();
            EventResult::NeedsRedraw
        }
        (KeyCode::Left, _) => {
            app.form.adjust(-1);
            EventResult::NeedsRedraw
        }
        (KeyCode::Right, _) => {
            app.form.adjust(1);
            EventResult::NeedsRedraw
        }
        (KeyCode::Char('a'), m) if m == KeyModifiers::CONTROL => {
            app.form.add_character();
            EventResult::NeedsRedraw
        }
        (KeyCode::Char('x'), m) if m == KeyModifiers::CONTROL => {
            app.form.remove_character();
            EventResult::NeedsRedraw
        }
        (KeyCode::Enter, _) => {
            app.pending = Some(PendingAction::CreateStory);
            EventResult::NeedsRedraw
        }
        (KeyCode::Backspace, _) => {
            app.form.backspace();
            EventResult::NeedsRedraw
        }
        (KeyCode::Char(c), m) if m == KeyModifiers::NONE || m == KeyModifiers::SHIFT => {
            app.form.input_char(c);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Outline review navigation
fn handle_outline_keys(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc => {
            app.view = View::Library;
            app.clear_status();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('q') => EventResult::Quit,
        KeyCode::Left | KeyCode::Char('h') => {
            app.outline_step(-1);
            EventResult::NeedsRedraw
        }
        KeyCode::Right | KeyCode::Char('l') => {
            app.outline_step(1);
            EventResult::NeedsRedraw
        }
        KeyCode::Char('i') => {
            app.input_mode = InputMode::Feedback;
            EventResult::NeedsRedraw
        }
        KeyCode::Char('g') => {
            let missing = app
                .session
                .as_ref()
                .map(|s| s.outlines().is_none())
                .unwrap_or(false);
            if missing {
                app.pending = Some(PendingAction::GenerateOutlines);
            }
            EventResult::NeedsRedraw
        }
        KeyCode::Char('F') => {
            app.pending = Some(PendingAction::Finalize);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Typing into the feedback box
fn handle_feedback_mode(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            EventResult::NeedsRedraw
        }
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
            let feedback = app.feedback.trim().to_string();
            if !feedback.is_empty() {
                app.pending = Some(PendingAction::ImproveOutline {
                    episode: app.outline_episode,
                    feedback,
                });
                app.feedback.clear();
            }
            EventResult::NeedsRedraw
        }
        KeyCode::Backspace => {
            app.feedback.pop();
            EventResult::NeedsRedraw
        }
        KeyCode::Char(c) => {
            app.feedback.push(c);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Episode reader navigation
fn handle_episode_keys(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc => {
            app.view = View::Library;
            app.clear_status();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('q') => EventResult::Quit,
        KeyCode::Left | KeyCode::Char('h') => {
            app.episode_step(-1);
            EventResult::NeedsRedraw
        }
        KeyCode::Right | KeyCode::Char('l') => {
            app.episode_step(1);
            EventResult::NeedsRedraw
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.scroll_episode(1);
            EventResult::NeedsRedraw
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.scroll_episode(-1);
            EventResult::NeedsRedraw
        }
        KeyCode::PageDown => {
            app.scroll_episode(10);
            EventResult::NeedsRedraw
        }
        KeyCode::PageUp => {
            app.scroll_episode(-10);
            EventResult::NeedsRedraw
        }
        KeyCode::Char('g') => {
            app.episode_scroll = 0;
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyteller_core::StoryLibrary;

    fn test_app() -> App {
        App::new(StoryLibrary::new("test_stories"), Vec::new())
    }

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_quit_from_library() {
        let mut app = test_app();
        assert_eq!(handle_event(&mut app, press(KeyCode::Char('q'))), EventResult::Quit);
    }

    #[test]
    fn test_create_flow_keys() {
        let mut app = test_app();
        handle_event(&mut app, press(KeyCode::Char('n')));
        assert_eq!(app.view, View::Create);

        handle_event(&mut app, press(KeyCode::Char('T')));
        assert_eq!(app.form.title, "T");

        // 'q' types into the form instead of quitting.
        assert_eq!(
            handle_event(&mut app, press(KeyCode::Char('q'))),
            EventResult::NeedsRedraw
        );
        assert_eq!(app.form.title, "Tq");

        handle_event(&mut app, press(KeyCode::Enter));
        assert!(matches!(app.pending, Some(PendingAction::CreateStory)));
    }

    #[test]
    fn test_feedback_mode_collects_text_then_submits() {
        let mut app = test_app();
        app.view = View::Outline;
        app.outline_episode = 2;

        handle_event(&mut app, press(KeyCode::Char('i')));
        assert_eq!(app.input_mode, InputMode::Feedback);

        for c in "more".chars() {
            handle_event(&mut app, press(KeyCode::Char(c)));
        }
        handle_event(&mut app, press(KeyCode::Enter));

        assert_eq!(app.input_mode, InputMode::Normal);
        match app.pending {
            Some(PendingAction::ImproveOutline { episode, ref feedback }) => {
                assert_eq!(episode, 2);
                assert_eq!(feedback, "more");
            }
            ref other => panic!("unexpected pending action: {other:?}"),
        }
    }

    #[test]
    fn test_feedback_escape_cancels() {
        let mut app = test_app();
        app.view = View::Outline;
        handle_event(&mut app, press(KeyCode::Char('i')));
        handle_event(&mut app, press(KeyCode::Char('x')));
        handle_event(&mut app, press(KeyCode::Esc));

        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.pending.is_none());
    }
}
