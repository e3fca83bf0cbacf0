//! New-story form widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::app::{
    CreateForm, FIELD_EPISODES, FIELD_SETTING, FIELD_STYLE, FIELD_TITLE, FIELD_TONE, FIELD_TROPE,
    FIXED_FIELDS,
};
use crate::ui::theme::StoryTheme;

/// The create-a-story form.
pub struct CreateFormWidget<'a> {
    form: &'a CreateForm,
    theme: &'a StoryTheme,
}

impl<'a> CreateFormWidget<'a> {
    pub fn new(form: &'a CreateForm, theme: &'a StoryTheme) -> Self {
        Self { form, theme }
    }

    fn text_row(&self, focus: usize, label: &str, value: &str) -> Line<'static> {
        let focused = self.form.focus == focus;
        let cursor = if focused { "▌" } else { "" };
        Line::from(vec![
            Span::styled(format!("{label:<10}"), self.label_style(focused)),
            Span::styled(format!("{value}{cursor}"), self.value_style(focused)),
        ])
    }

    fn selector_row(&self, focus: usize, label: &str, value: &str) -> Line<'static> {
        let focused = self.form.focus == focus;
        let display = if focused {
            format!("< {value} >")
        } else {
            value.to_string()
        };
        Line::from(vec![
            Span::styled(format!("{label:<10}"), self.label_style(focused)),
            Span::styled(display, self.value_style(focused)),
        ])
    }

    fn label_style(&self, focused: bool) -> ratatui::style::Style {
        if focused {
            self.theme.selected_style()
        } else {
            self.theme.label_style()
        }
    }

    fn value_style(&self, focused: bool) -> ratatui::style::Style {
        if focused {
            self.theme.selected_style()
        } else {
            self.theme.text_style()
        }
    }
}

impl Widget for CreateFormWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Create a New Story ")
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(true));

        let inner = block.inner(area);
        block.render(area, buf);

        let form = self.form;
        let mut lines: Vec<Line> = vec![
            self.text_row(FIELD_TITLE, "Title", &form.title),
            self.selector_row(FIELD_EPISODES, "Episodes", &form.episodes.to_string()),
            self.text_row(FIELD_TROPE, "Trope", &form.trope),
            self.text_row(FIELD_SETTING, "Setting", &form.setting),
            self.selector_row(FIELD_TONE, "Tone", form.tone().name()),
            self.selector_row(FIELD_STYLE, "Style", form.style().name()),
            Line::from(""),
            Line::from(Span::styled(
                "Initial Characters",
                self.theme.title_style(),
            )),
        ];

        for (row, character) in form.characters.iter().enumerate() {
            let base = FIXED_FIELDS + row * 3;
            lines.push(Line::from(Span::styled(
                format!("  Character {}", row + 1),
                self.theme.system_style(),
            )));
            lines.push(self.text_row(base, "  Name", &character.name));
            lines.push(self.selector_row(base + 1, "  Gender", character.gender.name()));
            lines.push(self.text_row(base + 2, "  Traits", &character.traits));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Tab next field · ←/→ adjust · Ctrl+A add character · Ctrl+X remove · Enter create · Esc cancel",
            self.theme.system_style(),
        )));

        // Keep the focused field visible on small terminals.
        let visible = inner.height as usize;
        let focus_line = if form.focus < FIXED_FIELDS {
            form.focus
        } else {
            // Account for the header lines and the per-row label line.
            let row = (form.focus - FIXED_FIELDS) / 3;
            let col = (form.focus - FIXED_FIELDS) % 3;
            FIXED_FIELDS + 2 + row * 4 + 1 + col
        };
        let scroll = focus_line.saturating_sub(visible.saturating_sub(1));

        Paragraph::new(lines)
            .scroll((scroll as u16, 0))
            .render(inner, buf);
    }
}
