//! Outline review widget

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::ui::theme::StoryTheme;

/// Outline review for one episode, with the feedback box underneath.
pub struct OutlinePanelWidget<'a> {
    story_title: &'a str,
    episode: u32,
    total_episodes: u32,
    outline: Option<&'a str>,
    feedback: &'a str,
    feedback_active: bool,
    theme: &'a StoryTheme,
}

impl<'a> OutlinePanelWidget<'a> {
    pub fn new(story_title: &'a str, episode: u32, total_episodes: u32, theme: &'a StoryTheme) -> Self {
        Self {
            story_title,
            episode,
            total_episodes,
            outline: None,
            feedback: "",
            feedback_active: false,
            theme,
        }
    }

    pub fn outline(mut self, outline: Option<&'a str>) -> Self {
        self.outline = outline;
        self
    }

    pub fn feedback(mut self, feedback: &'a str, active: bool) -> Self {
        self.feedback = feedback;
        self.feedback_active = active;
        self
    }
}

impl Widget for OutlinePanelWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [outline_area, feedback_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(5)]).areas(area);

        // Outline panel
        let title = format!(
            " {} - Outline for Episode {}/{} [h/l switch] ",
            self.story_title, self.episode, self.total_episodes
        );
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(!self.feedback_active));
        let inner = block.inner(outline_area);
        block.render(outline_area, buf);

        let mut lines: Vec<Line> = Vec::new();
        match self.outline {
            Some(text) => {
                for line in text.lines() {
                    lines.push(Line::from(Span::styled(
                        line.to_string(),
                        self.theme.text_style(),
                    )));
                }
            }
            None => {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "No outline for this episode yet. Press 'g' to generate outlines.",
                    self.theme.system_style(),
                )));
            }
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press 'F' to finalize the story once the outlines look right.",
            self.theme.system_style(),
        )));

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);

        // Feedback box
        let feedback_title = if self.feedback_active {
            " Feedback [Enter improve, Esc cancel] "
        } else {
            " Feedback [press 'i' to write] "
        };
        let feedback_block = Block::default()
            .title(feedback_title)
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.feedback_active));
        let feedback_inner = feedback_block.inner(feedback_area);
        feedback_block.render(feedback_area, buf);

        let feedback_text = if self.feedback.is_empty() && !self.feedback_active {
            Line::from(Span::styled(
                "I'd like more focus on the conflict...",
                self.theme.system_style(),
            ))
        } else {
            let cursor = if self.feedback_active { "▌" } else { "" };
            Line::from(Span::styled(
                format!("{}{cursor}", self.feedback),
                self.theme.text_style(),
            ))
        };

        Paragraph::new(feedback_text)
            .wrap(Wrap { trim: false })
            .render(feedback_inner, buf);
    }
}
