//! Episode reader widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use storyteller_core::Episode;

use crate::ui::theme::StoryTheme;

/// Reader for one finished episode: body, character lists, summary.
pub struct EpisodeViewWidget<'a> {
    story_title: &'a str,
    episode: Option<&'a Episode>,
    index: usize,
    count: usize,
    scroll: usize,
    theme: &'a StoryTheme,
}

impl<'a> EpisodeViewWidget<'a> {
    pub fn new(story_title: &'a str, theme: &'a StoryTheme) -> Self {
        Self {
            story_title,
            episode: None,
            index: 0,
            count: 0,
            scroll: 0,
            theme,
        }
    }

    pub fn episode(mut self, episode: Option<&'a Episode>, index: usize, count: usize) -> Self {
        self.episode = episode;
        self.index = index;
        self.count = count;
        self
    }

    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }
}

impl Widget for EpisodeViewWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match self.episode {
            Some(episode) => format!(
                " {} - Episode {}: {} ({}/{}) [h/l switch, j/k scroll] ",
                self.story_title,
                episode.number,
                episode.title,
                self.index + 1,
                self.count
            ),
            None => format!(" {} ", self.story_title),
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(true));
        let inner = block.inner(area);
        block.render(area, buf);

        let Some(episode) = self.episode else {
            Paragraph::new(Line::from(Span::styled(
                "No episodes written yet.",
                self.theme.system_style(),
            )))
            .render(inner, buf);
            return;
        };

        let mut lines: Vec<Line> = Vec::new();

        for line in episode.display_body().lines() {
            lines.push(Line::from(Span::styled(
                line.to_string(),
                self.theme.text_style(),
            )));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Killed Characters",
            self.theme.title_style(),
        )));
        lines.push(Line::from(Span::styled(
            join_or_none(&episode.killed_characters),
            self.theme.text_style(),
        )));

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Current Characters",
            self.theme.title_style(),
        )));
        lines.push(Line::from(Span::styled(
            join_or_none(&episode.current_characters),
            self.theme.text_style(),
        )));

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Summary Till Now",
            self.theme.title_style(),
        )));
        for line in episode.summary_till_now.lines() {
            lines.push(Line::from(Span::styled(
                line.to_string(),
                self.theme.text_style(),
            )));
        }

        // Clamp scroll to the content height.
        let visible = inner.height as usize;
        let max_scroll = lines.len().saturating_sub(visible);
        let scroll = self.scroll.min(max_scroll);

        Paragraph::new(lines)
            .scroll((scroll as u16, 0))
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

fn join_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "None".to_string()
    } else {
        names.join(", ")
    }
}
