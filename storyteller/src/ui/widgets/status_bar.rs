//! Status line widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::ui::theme::StoryTheme;

/// One-line status bar: the latest status message, or key hints.
pub struct StatusBarWidget<'a> {
    status: Option<&'a str>,
    hints: &'a str,
    theme: &'a StoryTheme,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(status: Option<&'a str>, hints: &'a str, theme: &'a StoryTheme) -> Self {
        Self {
            status,
            hints,
            theme,
        }
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = match self.status {
            Some(status) => {
                let style = if status.starts_with("Error") {
                    self.theme.error_style()
                } else {
                    self.theme.text_style()
                };
                Line::from(Span::styled(format!(" {status}"), style))
            }
            None => Line::from(Span::styled(
                format!(" {}", self.hints),
                self.theme.system_style(),
            )),
        };

        Paragraph::new(line).render(area, buf);
    }
}
