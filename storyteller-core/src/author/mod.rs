//! The AI narrator: outline and episode generation via Claude.

pub mod agent;
pub mod json;
pub mod prompts;

pub use agent::{Narrator, NarratorConfig, NarratorError};
