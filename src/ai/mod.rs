//! Generation gateway.
//!
//! The boundary between the wizard and the external generative service.
//! Everything the rest of the crate needs from the service goes through the
//! [`GenerationGateway`] trait, so the wizard and its tests can run against a
//! substitute without any network access.

mod gemini;
mod prompt;

pub use gemini::GeminiGateway;
pub use prompt::{image_prompt, plan_prompt, plan_schema, SYSTEM_INSTRUCTION};

use async_trait::async_trait;

use crate::core::{CompletePreferences, ImageRef, WorkoutPlan};

/// Trait for generative backends.
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    /// Generate a structured workout plan for the given preferences.
    ///
    /// Repeated calls with identical preferences may return different plans.
    async fn generate_plan(
        &self,
        preferences: &CompletePreferences,
    ) -> Result<WorkoutPlan, GenerationFailed>;

    /// Generate an illustration of someone performing `exercise_name`.
    ///
    /// Never fails: any problem is logged and reported as `None`.
    async fn generate_exercise_image(&self, exercise_name: &str) -> Option<ImageRef>;

    /// Get the provider name.
    fn name(&self) -> &str;
}

/// Plan generation failed; no partial plan is ever returned.
#[derive(Debug, thiserror::Error)]
#[error("workout generation failed: {cause}")]
pub struct GenerationFailed {
    #[source]
    pub cause: FailureCause,
}

impl GenerationFailed {
    pub fn new(cause: FailureCause) -> Self {
        Self { cause }
    }
}

impl From<FailureCause> for GenerationFailed {
    fn from(cause: FailureCause) -> Self {
        Self::new(cause)
    }
}

/// Why a plan could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum FailureCause {
    #[error("API key not set (looked for {0})")]
    MissingApiKey(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("no response text received")]
    EmptyResponse,

    #[error("response violates the plan contract: {0}")]
    ContractViolation(String),
}

/// An exercise illustration could not be produced.
///
/// Only ever logged; callers of [`GenerationGateway::generate_exercise_image`]
/// see `None`.
#[derive(Debug, thiserror::Error)]
pub enum ImageUnavailable {
    #[error("API key not set")]
    MissingApiKey,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("no inline image in response")]
    NoInlineImage,

    #[error("malformed image payload: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_failed_display_includes_cause() {
        let err = GenerationFailed::from(FailureCause::EmptyResponse);
        assert_eq!(err.to_string(), "workout generation failed: no response text received");
    }

    #[test]
    fn test_generation_failed_exposes_source() {
        use std::error::Error as _;

        let err = GenerationFailed::new(FailureCause::Api { status: 503, message: "busy".into() });
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("API error (503): busy"));
    }
}
