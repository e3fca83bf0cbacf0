//! Render orchestration for the storyteller TUI

use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, InputMode, View};
use crate::ui::widgets::{
    CreateFormWidget, EpisodeViewWidget, OutlinePanelWidget, StatusBarWidget, StoryListWidget,
};

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let [main_area, status_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());
    let [sidebar_area, content_area] =
        Layout::horizontal([Constraint::Length(32), Constraint::Min(0)]).areas(main_area);

    // Sidebar is always visible; it has focus only in the library view.
    let sidebar = StoryListWidget::new(&app.stories, &app.theme)
        .selected(app.selected_story)
        .focused(app.view == View::Library);
    frame.render_widget(sidebar, sidebar_area);

    match app.view {
        View::Library => render_welcome(frame, app, content_area),
        View::Create => {
            frame.render_widget(CreateFormWidget::new(&app.form, &app.theme), content_area)
        }
        View::Outline => render_outline(frame, app, content_area),
        View::Episodes => render_episodes(frame, app, content_area),
    }

    let hints = match app.view {
        View::Library => "j/k select · Enter open · n new story · d delete · r refresh · q quit",
        View::Create => "Tab next field · Enter create · Esc cancel",
        View::Outline => "h/l episode · i feedback · F finalize · Esc library",
        View::Episodes => "h/l episode · j/k scroll · Esc library · q quit",
    };
    frame.render_widget(
        StatusBarWidget::new(app.status(), hints, &app.theme),
        status_area,
    );
}

/// Landing panel when no story is open.
fn render_welcome(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" AI Storyteller ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(false));

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Serialized stories, written episode by episode.",
            app.theme.text_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "  Pick a story from the sidebar, or press 'n' to create one.",
            app.theme.system_style(),
        )),
    ];

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn render_outline(frame: &mut Frame, app: &App, area: Rect) {
    let Some(session) = app.session.as_ref() else {
        render_welcome(frame, app, area);
        return;
    };

    let outline_text = session
        .outlines()
        .and_then(|o| o.get(app.outline_episode));

    let widget = OutlinePanelWidget::new(
        &session.info().title,
        app.outline_episode,
        session.info().total_episodes,
        &app.theme,
    )
    .outline(outline_text)
    .feedback(&app.feedback, app.input_mode == InputMode::Feedback);

    frame.render_widget(widget, area);
}

fn render_episodes(frame: &mut Frame, app: &App, area: Rect) {
    let Some(session) = app.session.as_ref() else {
        render_welcome(frame, app, area);
        return;
    };

    let episodes = session.episodes();
    let widget = EpisodeViewWidget::new(&session.info().title, &app.theme)
        .episode(
            episodes.get(app.episode_index),
            app.episode_index,
            episodes.len(),
        )
        .scroll(app.episode_scroll);

    frame.render_widget(widget, area);
}
