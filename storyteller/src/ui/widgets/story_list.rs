//! Story library sidebar widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use storyteller_core::StorySummary;

use crate::ui::theme::StoryTheme;

/// Sidebar listing every story in the library.
pub struct StoryListWidget<'a> {
    stories: &'a [StorySummary],
    selected: usize,
    theme: &'a StoryTheme,
    focused: bool,
}

impl<'a> StoryListWidget<'a> {
    pub fn new(stories: &'a [StorySummary], theme: &'a StoryTheme) -> Self {
        Self {
            stories,
            selected: 0,
            theme,
            focused: false,
        }
    }

    pub fn selected(mut self, selected: usize) -> Self {
        self.selected = selected;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for StoryListWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.focused {
            " Stories [j/k, Enter open, n new, d delete] "
        } else {
            " Stories "
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.focused));

        let inner = block.inner(area);
        block.render(area, buf);

        if self.stories.is_empty() {
            let empty = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    " No stories yet.",
                    self.theme.system_style(),
                )),
                Line::from(Span::styled(
                    " Press 'n' to create one.",
                    self.theme.system_style(),
                )),
            ]);
            empty.render(inner, buf);
            return;
        }

        let mut lines: Vec<Line> = Vec::new();
        for (i, story) in self.stories.iter().enumerate() {
            let marker = if i == self.selected { "▸ " } else { "  " };
            let style = if i == self.selected {
                self.theme.selected_style()
            } else {
                self.theme.text_style()
            };

            // Progress: written/planned episodes, or outline-only.
            let progress = if story.episodes_written > 0 {
                format!(" {}/{}", story.episodes_written, story.total_episodes)
            } else if story.has_outlines {
                " outlined".to_string()
            } else {
                String::new()
            };

            lines.push(Line::from(vec![
                Span::styled(format!("{marker}{}", story.title), style),
                Span::styled(progress, self.theme.system_style()),
            ]));
        }

        // Keep the selection visible when the list is long.
        let visible = inner.height as usize;
        let scroll = self.selected.saturating_sub(visible.saturating_sub(1));

        Paragraph::new(lines)
            .scroll((scroll as u16, 0))
            .render(inner, buf);
    }
}
