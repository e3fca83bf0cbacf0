//! Color theme and styling for the storyteller TUI

use ratatui::style::{Color, Modifier, Style};

/// UI color theme
#[derive(Debug, Clone)]
pub struct StoryTheme {
    // Base colors
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,

    // Text colors
    pub title_text: Color,
    pub body_text: Color,
    pub label_text: Color,
    pub system_text: Color,
    pub error_text: Color,

    // Selection
    pub selected: Color,
}

impl Default for StoryTheme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Cyan,

            title_text: Color::Yellow,
            body_text: Color::White,
            label_text: Color::Cyan,
            system_text: Color::DarkGray,
            error_text: Color::Red,

            selected: Color::LightGreen,
        }
    }
}

impl StoryTheme {
    /// Get style for normal text
    pub fn text_style(&self) -> Style {
        Style::default().fg(self.body_text)
    }

    /// Get style for story and episode titles
    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.title_text)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for field labels
    pub fn label_style(&self) -> Style {
        Style::default().fg(self.label_text)
    }

    /// Get style for system messages and hints
    pub fn system_style(&self) -> Style {
        Style::default()
            .fg(self.system_text)
            .add_modifier(Modifier::DIM)
    }

    /// Get style for error messages
    pub fn error_style(&self) -> Style {
        Style::default()
            .fg(self.error_text)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for the selected row or focused field
    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.selected)
            .add_modifier(Modifier::BOLD)
    }

    /// Get border style
    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }
}
