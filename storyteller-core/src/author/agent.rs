//! The narrator agent.
//!
//! `Narrator` wraps the Claude client and exposes the story operations:
//! outlining, outline revision, episode writing, and summarization.
//! Episodes come from the generation model; summaries from a cheaper
//! model so the per-episode cost of continuity stays low.

use super::json::{self, RecoverError};
use super::prompts;
use crate::continuity::Continuity;
use crate::story::{EpisodeDraft, Outline, StoryInfo};
use claude::{Claude, Message, Request};
use std::collections::BTreeMap;
use thiserror::Error;

/// Model used for summaries unless overridden.
const SUMMARY_MODEL: &str = "claude-3-5-haiku-20241022";

/// Sampling temperatures per operation. Episode prose wants the most
/// variety; reconciliation wants the least.
const EPISODE_TEMPERATURE: f32 = 0.9;
const OUTLINE_TEMPERATURE: f32 = 0.8;
const IMPROVE_TEMPERATURE: f32 = 0.7;
const SUMMARY_TEMPERATURE: f32 = 0.7;
const RECONCILE_TEMPERATURE: f32 = 0.6;

/// Errors from the narrator.
#[derive(Debug, Error)]
pub enum NarratorError {
    #[error("Claude API error: {0:?}")]
    Api(#[from] claude::Error),

    #[error("No API key configured")]
    NoApiKey,

    #[error("Malformed model output: {0}")]
    Malformed(#[from] RecoverError),

    #[error("Model returned an empty {0}")]
    Empty(&'static str),
}

/// Configuration for the narrator.
#[derive(Debug, Clone)]
pub struct NarratorConfig {
    /// Generation model (defaults to the client's default model).
    pub model: Option<String>,

    /// Summary model (defaults to a cheaper model).
    pub summary_model: Option<String>,

    /// Maximum tokens for generation responses.
    pub max_tokens: usize,
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            model: None,
            summary_model: None,
            max_tokens: 4096,
        }
    }
}

impl NarratorConfig {
    /// Read model overrides from `STORYTELLER_MODEL` and
    /// `STORYTELLER_SUMMARY_MODEL`.
    pub fn from_env() -> Self {
        Self {
            model: std::env::var("STORYTELLER_MODEL").ok(),
            summary_model: std::env::var("STORYTELLER_SUMMARY_MODEL").ok(),
            max_tokens: 4096,
        }
    }
}

/// The AI narrator.
pub struct Narrator {
    client: Claude,
    config: NarratorConfig,
}

impl Narrator {
    /// Create a new narrator with an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Claude::new(api_key),
            config: NarratorConfig::default(),
        }
    }

    /// Create a narrator from the ANTHROPIC_API_KEY environment variable,
    /// with model overrides from the environment.
    pub fn from_env() -> Result<Self, NarratorError> {
        let client = Claude::from_env().map_err(|_| NarratorError::NoApiKey)?;
        Ok(Self {
            client,
            config: NarratorConfig::from_env(),
        })
    }

    /// Configure the narrator.
    pub fn with_config(mut self, config: NarratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Generate outlines for every episode of the story.
    pub async fn outline_story(&self, info: &StoryInfo) -> Result<Outline, NarratorError> {
        tracing::info!(title = %info.title, episodes = info.total_episodes, "generating outlines");

        let text = self
            .generate(
                prompts::outline_system_prompt(),
                prompts::outline_user_prompt(info),
                OUTLINE_TEMPERATURE,
            )
            .await?;

        let map: BTreeMap<u32, String> = json::recover(&text)?;
        if map.is_empty() {
            return Err(NarratorError::Empty("outline"));
        }
        Ok(map.into_iter().collect())
    }

    /// Revise one episode's outline from user feedback. Returns the
    /// replacement outline text.
    pub async fn improve_outline(
        &self,
        info: &StoryInfo,
        outlines: &Outline,
        episode: u32,
        feedback: &str,
    ) -> Result<String, NarratorError> {
        tracing::info!(title = %info.title, episode, "improving outline from feedback");

        let text = self
            .generate(
                prompts::improve_system_prompt(),
                prompts::improve_user_prompt(info, outlines, episode, feedback),
                IMPROVE_TEMPERATURE,
            )
            .await?;

        let improved = text.trim().to_string();
        if improved.is_empty() {
            return Err(NarratorError::Empty("outline"));
        }
        Ok(improved)
    }

    /// Reconcile every outline after the modified episode so the arc
    /// still flows. Revises in order, each call seeing the revisions
    /// before it. Returns the episode numbers that were reprocessed.
    pub async fn reconcile_outlines(
        &self,
        info: &StoryInfo,
        outlines: &mut Outline,
        modified: u32,
    ) -> Result<Vec<u32>, NarratorError> {
        let mut reprocessed = Vec::new();

        for episode in (modified + 1)..=info.total_episodes {
            if outlines.get(episode).is_none() {
                continue;
            }
            tracing::debug!(episode, modified, "reconciling outline");

            let text = self
                .generate(
                    prompts::reconcile_system_prompt(info, episode, modified),
                    prompts::reconcile_user_prompt(info, outlines, episode),
                    RECONCILE_TEMPERATURE,
                )
                .await?;

            let revised = text.trim().to_string();
            if !revised.is_empty() {
                outlines.set(episode, revised);
            }
            reprocessed.push(episode);
        }

        Ok(reprocessed)
    }

    /// Write one episode, continuing from the given continuity state.
    pub async fn write_episode(
        &self,
        info: &StoryInfo,
        episode_number: u32,
        outline: Option<&str>,
        continuity: &Continuity,
    ) -> Result<EpisodeDraft, NarratorError> {
        tracing::info!(title = %info.title, episode = episode_number, "writing episode");

        let text = self
            .generate(
                prompts::episode_system_prompt(info, episode_number, outline),
                prompts::episode_user_prompt(episode_number, continuity),
                EPISODE_TEMPERATURE,
            )
            .await?;

        let draft: EpisodeDraft = json::recover(&text)?;
        if draft.body.trim().is_empty() {
            return Err(NarratorError::Empty("episode body"));
        }
        Ok(draft)
    }

    /// Fold an episode body into the running summary using the cheaper
    /// summary model.
    pub async fn summarize(
        &self,
        body: &str,
        previous: Option<&str>,
    ) -> Result<String, NarratorError> {
        let model = self
            .config
            .summary_model
            .clone()
            .unwrap_or_else(|| SUMMARY_MODEL.to_string());

        let request = Request::new(vec![Message::user(prompts::summary_user_prompt(
            body, previous,
        ))])
        .with_system(prompts::summary_system_prompt())
        .with_model(model)
        .with_max_tokens(self.config.max_tokens)
        .with_temperature(SUMMARY_TEMPERATURE);

        let response = self.client.complete(request).await?;
        let summary = response.text.trim().to_string();
        if summary.is_empty() {
            return Err(NarratorError::Empty("summary"));
        }
        Ok(summary)
    }

    async fn generate(
        &self,
        system: String,
        user: String,
        temperature: f32,
    ) -> Result<String, NarratorError> {
        let mut request = Request::new(vec![Message::user(user)])
            .with_system(system)
            .with_max_tokens(self.config.max_tokens)
            .with_temperature(temperature);

        if let Some(ref model) = self.config.model {
            request = request.with_model(model);
        }

        let response = self.client.complete(request).await?;
        tracing::debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "model call complete"
        );
        Ok(response.text)
    }
}
