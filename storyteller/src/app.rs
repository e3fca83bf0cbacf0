//! Main application state and logic

use storyteller_core::{
    CharacterSheet, Gender, SessionError, StoryConfig, StoryLibrary, StorySession, StorySummary,
    Style, Tone, MAX_EPISODES, MIN_EPISODES,
};

use crate::ui::theme::StoryTheme;

/// Which screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// The story library sidebar with nothing opened.
    #[default]
    Library,
    /// The new-story form.
    Create,
    /// Outline review with the feedback box.
    Outline,
    /// Reading finished episodes.
    Episodes,
}

/// Whether keys navigate or type into the feedback box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Feedback,
}

/// Deferred work to run between frames; model calls block the loop, so
/// the status line is drawn before the action starts.
#[derive(Debug, Clone)]
pub enum PendingAction {
    Refresh,
    CreateStory,
    OpenStory(String),
    DeleteStory(String),
    GenerateOutlines,
    ImproveOutline { episode: u32, feedback: String },
    Finalize,
}

/// One character row on the creation form.
#[derive(Debug, Clone, Default)]
pub struct CharacterField {
    pub name: String,
    pub gender: Gender,
    pub traits: String,
}

/// The new-story form. Fields are focused by a flat index: the six
/// story fields first, then name/gender/traits per character row.
#[derive(Debug, Clone)]
pub struct CreateForm {
    pub title: String,
    pub episodes: u32,
    pub trope: String,
    pub setting: String,
    pub tone_index: usize,
    pub style_index: usize,
    pub characters: Vec<CharacterField>,
    pub focus: usize,
}

/// Flat focus indices for the fixed form fields.
pub const FIELD_TITLE: usize = 0;
pub const FIELD_EPISODES: usize = 1;
pub const FIELD_TROPE: usize = 2;
pub const FIELD_SETTING: usize = 3;
pub const FIELD_TONE: usize = 4;
pub const FIELD_STYLE: usize = 5;
pub const FIXED_FIELDS: usize = 6;

impl Default for CreateForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            episodes: 2,
            trope: String::new(),
            setting: String::new(),
            tone_index: 0,
            style_index: 0,
            characters: vec![CharacterField::default()],
            focus: FIELD_TITLE,
        }
    }
}

impl CreateForm {
    pub fn field_count(&self) -> usize {
        FIXED_FIELDS + self.characters.len() * 3
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.field_count();
    }

    pub fn focus_prev(&mut self) {
        let count = self.field_count();
        self.focus = (self.focus + count - 1) % count;
    }

    pub fn tone(&self) -> Tone {
        Tone::all()[self.tone_index % Tone::all().len()]
    }

    pub fn style(&self) -> Style {
        Style::all()[self.style_index % Style::all().len()]
    }

    /// Which character row and column the focus is on, if any.
    pub fn character_focus(&self) -> Option<(usize, usize)> {
        if self.focus < FIXED_FIELDS {
            return None;
        }
        let offset = self.focus - FIXED_FIELDS;
        Some((offset / 3, offset % 3))
    }

    /// The text buffer under focus, if the focused field is free text.
    fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            FIELD_TITLE => Some(&mut self.title),
            FIELD_TROPE => Some(&mut self.trope),
            FIELD_SETTING => Some(&mut self.setting),
            FIELD_EPISODES | FIELD_TONE | FIELD_STYLE => None,
            _ => {
                let (row, col) = self.character_focus()?;
                let character = self.characters.get_mut(row)?;
                match col {
                    0 => Some(&mut character.name),
                    2 => Some(&mut character.traits),
                    _ => None,
                }
            }
        }
    }

    /// Type a character into the focused text field.
    pub fn input_char(&mut self, c: char) {
        if let Some(text) = self.focused_text() {
            text.push(c);
        }
    }

    /// Delete the last character of the focused text field.
    pub fn backspace(&mut self) {
        if let Some(text) = self.focused_text() {
            text.pop();
        }
    }

    /// Adjust the focused selector or counter.
    pub fn adjust(&mut self, delta: i32) {
        match self.focus {
            FIELD_EPISODES => {
                let next = self.episodes as i64 + delta as i64;
                self.episodes = next.clamp(MIN_EPISODES as i64, MAX_EPISODES as i64) as u32;
            }
            FIELD_TONE => {
                self.tone_index = cycle(self.tone_index, Tone::all().len(), delta);
            }
            FIELD_STYLE => {
                self.style_index = cycle(self.style_index, Style::all().len(), delta);
            }
            _ => {
                if let Some((row, 1)) = self.character_focus() {
                    if let Some(character) = self.characters.get_mut(row) {
                        let genders = Gender::all();
                        let current = genders
                            .iter()
                            .position(|g| *g == character.gender)
                            .unwrap_or(0);
                        character.gender = genders[cycle(current, genders.len(), delta)];
                    }
                }
            }
        }
    }

    pub fn add_character(&mut self) {
        self.characters.push(CharacterField::default());
        // Jump focus to the new row's name field.
        self.focus = FIXED_FIELDS + (self.characters.len() - 1) * 3;
    }

    pub fn remove_character(&mut self) {
        if self.characters.len() > 1 {
            self.characters.pop();
            self.focus = self.focus.min(self.field_count() - 1);
        }
    }

    /// Build a story config, or explain what's missing.
    pub fn to_config(&self) -> Result<StoryConfig, String> {
        if self.title.trim().is_empty() {
            return Err("Story title is required".to_string());
        }

        let mut config = StoryConfig::new(self.title.trim())
            .with_episodes(self.episodes)
            .with_tone(self.tone())
            .with_style(self.style());

        if !self.trope.trim().is_empty() {
            config = config.with_trope(self.trope.trim());
        }
        if !self.setting.trim().is_empty() {
            config = config.with_setting(self.setting.trim());
        }
        for character in &self.characters {
            if character.name.trim().is_empty() {
                continue;
            }
            config = config.with_character(CharacterSheet::new(
                character.name.trim(),
                character.gender,
                character.traits.trim(),
            ));
        }

        Ok(config)
    }
}

fn cycle(current: usize, len: usize, delta: i32) -> usize {
    let len = len as i32;
    ((current as i32 + delta).rem_euclid(len)) as usize
}

/// Main application state
pub struct App {
    pub library: StoryLibrary,
    pub stories: Vec<StorySummary>,
    pub selected_story: usize,

    pub theme: StoryTheme,
    pub view: View,
    pub input_mode: InputMode,
    pub form: CreateForm,

    pub session: Option<StorySession>,
    pub outline_episode: u32,
    pub feedback: String,
    pub episode_index: usize,
    pub episode_scroll: usize,

    status_message: Option<String>,
    pub pending: Option<PendingAction>,
}

impl App {
    pub fn new(library: StoryLibrary, stories: Vec<StorySummary>) -> Self {
        Self {
            library,
            stories,
            selected_story: 0,
            theme: StoryTheme::default(),
            view: View::Library,
            input_mode: InputMode::Normal,
            form: CreateForm::default(),
            session: None,
            outline_episode: 1,
            feedback: String::new(),
            episode_index: 0,
            episode_scroll: 0,
            status_message: None,
            pending: None,
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn status(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// The story highlighted in the sidebar.
    pub fn selected_summary(&self) -> Option<&StorySummary> {
        self.stories.get(self.selected_story)
    }

    pub fn select_next_story(&mut self) {
        if !self.stories.is_empty() {
            self.selected_story = (self.selected_story + 1) % self.stories.len();
        }
    }

    pub fn select_prev_story(&mut self) {
        if !self.stories.is_empty() {
            self.selected_story =
                (self.selected_story + self.stories.len() - 1) % self.stories.len();
        }
    }

    /// Begin a new story: reset the form and switch views.
    pub fn start_create(&mut self) {
        self.form = CreateForm::default();
        self.session = None;
        self.view = View::Create;
    }

    /// Move outline review to another episode.
    pub fn outline_step(&mut self, delta: i32) {
        let total = self
            .session
            .as_ref()
            .map(|s| s.info().total_episodes)
            .unwrap_or(1);
        let next = self.outline_episode as i64 + delta as i64;
        self.outline_episode = next.clamp(1, total as i64) as u32;
    }

    /// Move the episode viewer to another episode.
    pub fn episode_step(&mut self, delta: i32) {
        let count = self.session.as_ref().map(|s| s.episodes().len()).unwrap_or(0);
        if count == 0 {
            return;
        }
        let next = (self.episode_index as i64 + delta as i64).clamp(0, count as i64 - 1);
        self.episode_index = next as usize;
        self.episode_scroll = 0;
    }

    pub fn scroll_episode(&mut self, delta: i32) {
        if delta < 0 {
            self.episode_scroll = self.episode_scroll.saturating_sub(delta.unsigned_abs() as usize);
        } else {
            self.episode_scroll = self.episode_scroll.saturating_add(delta as usize);
        }
    }

    // ========================================================================
    // Pending actions (run between frames by the main loop)
    // ========================================================================

    pub async fn run_action(&mut self, action: PendingAction) {
        let result = match action {
            PendingAction::Refresh => self.refresh().await,
            PendingAction::CreateStory => self.create_story().await,
            PendingAction::OpenStory(slug) => self.open_story(&slug).await,
            PendingAction::DeleteStory(slug) => self.delete_story(&slug).await,
            PendingAction::GenerateOutlines => self.generate_outlines().await,
            PendingAction::ImproveOutline { episode, feedback } => {
                self.improve_outline(episode, &feedback).await
            }
            PendingAction::Finalize => self.finalize().await,
        };

        if let Err(e) = result {
            self.set_status(format!("Error: {e}"));
        }
    }

    async fn refresh(&mut self) -> Result<(), SessionError> {
        self.stories = self.library.list_stories().await.map_err(SessionError::from)?;
        if self.selected_story >= self.stories.len() {
            self.selected_story = self.stories.len().saturating_sub(1);
        }
        Ok(())
    }

    async fn create_story(&mut self) -> Result<(), SessionError> {
        let config = match self.form.to_config() {
            Ok(config) => config,
            Err(message) => {
                self.set_status(message);
                return Ok(());
            }
        };

        let title = config.title.clone();
        let mut session = StorySession::create(config).await?;
        session.outline().await?;

        self.session = Some(session);
        self.outline_episode = 1;
        self.feedback.clear();
        self.view = View::Outline;
        self.refresh().await?;
        self.set_status(format!("Outlines for '{title}' created"));
        Ok(())
    }

    async fn open_story(&mut self, slug: &str) -> Result<(), SessionError> {
        let session = StorySession::open(self.library.clone(), slug).await?;

        // Episodes trump outlines: once any episode exists, open the
        // reader; otherwise fall back to outline review.
        if !session.episodes().is_empty() {
            self.episode_index = 0;
            self.episode_scroll = 0;
            self.view = View::Episodes;
        } else {
            self.outline_episode = 1;
            self.feedback.clear();
            self.view = View::Outline;
            if session.outlines().is_none() {
                self.set_status("No outlines yet - press 'g' to generate them");
            }
        }
        self.session = Some(session);
        Ok(())
    }

    async fn delete_story(&mut self, slug: &str) -> Result<(), SessionError> {
        self.library
            .delete_story(slug)
            .await
            .map_err(SessionError::from)?;
        self.session = None;
        self.view = View::Library;
        self.refresh().await?;
        self.set_status("Story deleted");
        Ok(())
    }

    async fn generate_outlines(&mut self) -> Result<(), SessionError> {
        if let Some(session) = self.session.as_mut() {
            session.outline().await?;
            self.set_status("Outlines generated");
        }
        Ok(())
    }

    async fn improve_outline(&mut self, episode: u32, feedback: &str) -> Result<(), SessionError> {
        if let Some(session) = self.session.as_mut() {
            session.improve_outline(episode, feedback).await?;
            self.set_status(format!(
                "Outline for episode {episode} improved and story flow maintained"
            ));
        }
        Ok(())
    }

    async fn finalize(&mut self) -> Result<(), SessionError> {
        if let Some(session) = self.session.as_mut() {
            session.finalize().await?;
            let title = session.info().title.clone();
            self.episode_index = 0;
            self.episode_scroll = 0;
            self.view = View::Episodes;
            self.refresh().await?;
            self.set_status(format!("Story '{title}' has been finalized"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_focus_wraps() {
        let mut form = CreateForm::default();
        assert_eq!(form.field_count(), FIXED_FIELDS + 3);

        for _ in 0..form.field_count() {
            form.focus_next();
        }
        assert_eq!(form.focus, FIELD_TITLE);

        form.focus_prev();
        assert_eq!(form.focus, form.field_count() - 1);
    }

    #[test]
    fn test_form_text_input_goes_to_focused_field() {
        let mut form = CreateForm::default();
        form.input_char('A');
        assert_eq!(form.title, "A");

        form.focus = FIELD_TROPE;
        form.input_char('b');
        assert_eq!(form.trope, "b");

        form.focus = FIXED_FIELDS; // first character's name
        form.input_char('T');
        form.input_char('x');
        form.backspace();
        assert_eq!(form.characters[0].name, "T");
    }

    #[test]
    fn test_form_episode_adjust_clamps() {
        let mut form = CreateForm::default();
        form.focus = FIELD_EPISODES;
        for _ in 0..30 {
            form.adjust(1);
        }
        assert_eq!(form.episodes, MAX_EPISODES);
        for _ in 0..30 {
            form.adjust(-1);
        }
        assert_eq!(form.episodes, MIN_EPISODES);
    }

    #[test]
    fn test_form_selectors_cycle() {
        let mut form = CreateForm::default();
        form.focus = FIELD_TONE;
        form.adjust(-1);
        assert_eq!(form.tone(), *Tone::all().last().unwrap());

        form.focus = FIELD_STYLE;
        form.adjust(1);
        assert_eq!(form.style(), Style::all()[1]);
    }

    #[test]
    fn test_form_character_rows() {
        let mut form = CreateForm::default();
        form.add_character();
        assert_eq!(form.characters.len(), 2);
        assert_eq!(form.focus, FIXED_FIELDS + 3);
        assert_eq!(form.character_focus(), Some((1, 0)));

        form.remove_character();
        form.remove_character();
        // The last row never goes away.
        assert_eq!(form.characters.len(), 1);
    }

    #[test]
    fn test_form_requires_title() {
        let form = CreateForm::default();
        assert!(form.to_config().is_err());

        let mut form = CreateForm::default();
        form.title = "The House".to_string();
        form.characters[0].name = "Tom".to_string();
        let config = form.to_config().expect("config");
        assert_eq!(config.title, "The House");
        assert_eq!(config.characters.len(), 1);
    }

    #[test]
    fn test_form_skips_unnamed_characters() {
        let mut form = CreateForm::default();
        form.title = "The House".to_string();
        form.characters[0].traits = "never named".to_string();
        let config = form.to_config().expect("config");
        assert!(config.characters.is_empty());
    }
}
