//! Google Gemini integration.
//!
//! Implements the GenerationGateway trait on top of the Gemini
//! `generateContent` REST endpoint: one structured-output call for the plan,
//! one image-output call per exercise.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::prompt::{image_prompt, plan_prompt, plan_schema, SYSTEM_INSTRUCTION};
use super::{FailureCause, GenerationFailed, GenerationGateway, ImageUnavailable};
use crate::core::{CompletePreferences, Config, ImageRef, Locale, WorkoutPlan};

/// Aspect ratio requested for every illustration.
const IMAGE_ASPECT_RATIO: &str = "1:1";

/// Gemini-backed generation gateway.
pub struct GeminiGateway {
    client: Client,
    api_key: Option<String>,
    api_key_env: String,
    base_url: String,
    plan_model: String,
    image_model: String,
    locale: Locale,
}

impl GeminiGateway {
    /// Create a gateway with the default endpoint and models.
    pub fn new(api_key: Option<String>, locale: Locale) -> Self {
        let defaults = Config::default().ai;
        Self {
            client: Client::new(),
            api_key,
            api_key_env: defaults.api_key_env,
            base_url: defaults.base_url,
            plan_model: defaults.plan_model,
            image_model: defaults.image_model,
            locale,
        }
    }

    /// Create a gateway from configuration, resolving the API key from the
    /// environment.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client =
            Client::builder().timeout(Duration::from_secs(config.ai.timeout_secs)).build()?;

        Ok(Self {
            client,
            api_key: config.ai.api_key(),
            api_key_env: config.ai.api_key_env.clone(),
            base_url: config.ai.base_url.clone(),
            plan_model: config.ai.plan_model.clone(),
            image_model: config.ai.image_model.clone(),
            locale: config.general.locale,
        })
    }

    /// Use a different API base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Whether an API key was found.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn build_url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url.trim_end_matches('/'), model)
    }

    fn plan_request(&self, preferences: &CompletePreferences) -> GeminiRequest {
        GeminiRequest {
            contents: vec![Content::user_text(plan_prompt(preferences, self.locale))],
            system_instruction: Some(Content::text(SYSTEM_INSTRUCTION)),
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json"),
                response_schema: Some(plan_schema()),
                image_config: None,
            }),
        }
    }

    fn image_request(exercise_name: &str) -> GeminiRequest {
        GeminiRequest {
            contents: vec![Content::user_text(image_prompt(exercise_name))],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_mime_type: None,
                response_schema: None,
                image_config: Some(ImageConfig { aspect_ratio: IMAGE_ASPECT_RATIO }),
            }),
        }
    }

    /// POST a request and return the raw body of a successful response.
    async fn post(
        &self,
        model: &str,
        api_key: &str,
        request: &GeminiRequest,
    ) -> Result<String, PostError> {
        let url = self.build_url(model);
        debug!(url = %url, "Sending request to Gemini API");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| PostError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| PostError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(PostError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        Ok(body)
    }

    async fn try_generate_image(&self, exercise_name: &str) -> Result<ImageRef, ImageUnavailable> {
        let api_key = self.api_key.as_deref().ok_or(ImageUnavailable::MissingApiKey)?;
        let request = Self::image_request(exercise_name);

        let body = self.post(&self.image_model, api_key, &request).await.map_err(|e| match e {
            PostError::Transport(msg) => ImageUnavailable::Transport(msg),
            PostError::Api { status, message } => ImageUnavailable::Api { status, message },
        })?;

        extract_inline_image(&body)
    }
}

#[async_trait]
impl GenerationGateway for GeminiGateway {
    #[instrument(skip_all, fields(level = %preferences.level, goal = %preferences.goal, muscle = %preferences.muscle_group))]
    async fn generate_plan(
        &self,
        preferences: &CompletePreferences,
    ) -> Result<WorkoutPlan, GenerationFailed> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| FailureCause::MissingApiKey(self.api_key_env.clone()))?;

        let request = self.plan_request(preferences);
        let body = self.post(&self.plan_model, api_key, &request).await.map_err(|e| match e {
            PostError::Transport(msg) => FailureCause::Transport(msg),
            PostError::Api { status, message } => FailureCause::Api { status, message },
        })?;

        let plan = parse_plan_response(&body)?;
        debug!(exercises = plan.exercises.len(), "Received workout plan");
        Ok(plan)
    }

    #[instrument(skip(self))]
    async fn generate_exercise_image(&self, exercise_name: &str) -> Option<ImageRef> {
        match self.try_generate_image(exercise_name).await {
            Ok(image) => Some(image),
            Err(e) => {
                warn!(exercise = exercise_name, error = %e, "Failed to generate image");
                None
            }
        }
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// Failure of a single HTTP exchange, before it is classified as a plan or
/// image failure.
enum PostError {
    Transport(String),
    Api { status: u16, message: String },
}

/// Turn a successful plan response body into a validated plan.
fn parse_plan_response(body: &str) -> Result<WorkoutPlan, FailureCause> {
    let response: GeminiResponse = serde_json::from_str(body)
        .map_err(|e| FailureCause::ContractViolation(format!("unreadable response envelope: {e}")))?;

    if let Some(error) = &response.error {
        return Err(FailureCause::Api {
            status: error.code.unwrap_or(0),
            message: error.message.clone(),
        });
    }

    let text = response.first_text();
    if text.trim().is_empty() {
        return Err(FailureCause::EmptyResponse);
    }

    let plan =
        WorkoutPlan::from_json(&text).map_err(|e| FailureCause::ContractViolation(e.to_string()))?;
    plan.validate().map_err(|e| FailureCause::ContractViolation(e.to_string()))?;
    Ok(plan)
}

/// Pick the first inline image out of an image response body.
fn extract_inline_image(body: &str) -> Result<ImageRef, ImageUnavailable> {
    let response: GeminiResponse =
        serde_json::from_str(body).map_err(|e| ImageUnavailable::Malformed(e.to_string()))?;

    let inline = response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .and_then(|c| c.parts.iter().find_map(|p| p.inline_data.as_ref()))
        .ok_or(ImageUnavailable::NoInlineImage)?;
    debug!(mime_type = %inline.mime_type, bytes = inline.data.len(), "Received inline image");

    ImageRef::from_base64_png(&inline.data).map_err(|e| ImageUnavailable::Malformed(e.to_string()))
}

/// Pull the service's error message out of an error body, if it has one.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<GeminiResponse>(body)
        .ok()
        .and_then(|r| r.error)
        .map_or_else(|| body.to_string(), |e| e.message)
}

// ============================================================================
// API Request/Response Types
// ============================================================================

/// Gemini API request structure.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

/// Content block (request or response).
#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn text(text: impl Into<String>) -> Self {
        Self { role: None, parts: vec![Part { text: Some(text.into()), inline_data: None }] }
    }

    fn user_text(text: impl Into<String>) -> Self {
        Self { role: Some("user".to_string()), ..Self::text(text) }
    }
}

/// A text or inline-binary part.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

/// Base64 payload returned by image models.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: String,
    data: String,
}

/// Generation configuration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_config: Option<ImageConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: &'static str,
}

/// Gemini API response structure.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<GeminiError>,
}

impl GeminiResponse {
    /// Concatenated text parts of the first candidate.
    fn first_text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.iter().filter_map(|p| p.text.as_deref()).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// API error response from Gemini.
#[derive(Debug, Deserialize)]
struct GeminiError {
    code: Option<u16>,
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ExperienceLevel, FitnessGoal, MuscleGroup};
    use serde_json::json;

    const PLAN_TEXT: &str = r#"{"title":"Push Day","description":"Chest focus","estimatedDuration":"45 min","frequencyRecommendation":"2x/week","warmup":["Jumping jacks"],"exercises":[{"name":"Bench Press","sets":"4","reps":"6-8","rest":"120s","notes":"Keep shoulder blades retracted"}],"cooldown":["Chest stretch"]}"#;

    fn prefs() -> CompletePreferences {
        CompletePreferences {
            level: ExperienceLevel::Intermediate,
            goal: FitnessGoal::Strength,
            muscle_group: MuscleGroup::Chest,
        }
    }

    fn text_body(text: &str) -> String {
        json!({ "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }] })
            .to_string()
    }

    #[test]
    fn test_plan_request_shape() {
        let gateway = GeminiGateway::new(Some("key".into()), Locale::En);
        let request = serde_json::to_value(gateway.plan_request(&prefs())).unwrap();

        assert_eq!(request["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(request["generationConfig"]["responseSchema"]["type"], "OBJECT");
        assert!(request["generationConfig"].get("imageConfig").is_none());
        assert_eq!(request["systemInstruction"]["parts"][0]["text"], SYSTEM_INSTRUCTION);
        assert_eq!(request["contents"][0]["role"], "user");
        let prompt = request["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("Strength Gain"));
    }

    #[test]
    fn test_image_request_shape() {
        let request = serde_json::to_value(GeminiGateway::image_request("Squat")).unwrap();
        assert_eq!(request["generationConfig"]["imageConfig"]["aspectRatio"], "1:1");
        assert!(request.get("systemInstruction").is_none());
        assert!(request["contents"][0]["parts"][0]["text"].as_str().unwrap().contains("Squat"));
    }

    #[test]
    fn test_build_url() {
        let gateway = GeminiGateway::new(None, Locale::En).with_base_url("http://localhost:8080/");
        assert_eq!(
            gateway.build_url("gemini-x"),
            "http://localhost:8080/models/gemini-x:generateContent"
        );
    }

    #[test]
    fn test_parse_valid_plan() {
        let plan = parse_plan_response(&text_body(PLAN_TEXT)).unwrap();
        assert_eq!(plan.title, "Push Day");
        assert_eq!(plan.exercises[0].sets, "4");
    }

    #[test]
    fn test_parse_plan_split_across_parts() {
        let (head, tail) = PLAN_TEXT.split_at(40);
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "text": head }, { "text": tail }] } }]
        })
        .to_string();
        assert!(parse_plan_response(&body).is_ok());
    }

    #[test]
    fn test_parse_non_json_text_is_contract_violation() {
        let err = parse_plan_response(&text_body("Here is your workout!")).unwrap_err();
        assert!(matches!(err, FailureCause::ContractViolation(_)));
    }

    #[test]
    fn test_parse_missing_field_is_contract_violation() {
        let text = PLAN_TEXT.replace(r#""cooldown":["Chest stretch"]"#, r#""extra":1"#);
        let err = parse_plan_response(&text_body(&text)).unwrap_err();
        assert!(matches!(err, FailureCause::ContractViolation(_)));
    }

    #[test]
    fn test_parse_empty_exercises_is_contract_violation() {
        let text = PLAN_TEXT.replace(
            r#"[{"name":"Bench Press","sets":"4","reps":"6-8","rest":"120s","notes":"Keep shoulder blades retracted"}]"#,
            "[]",
        );
        let err = parse_plan_response(&text_body(&text)).unwrap_err();
        assert!(matches!(err, FailureCause::ContractViolation(_)));
    }

    #[test]
    fn test_parse_no_candidates_is_empty_response() {
        let err = parse_plan_response(r#"{"candidates": []}"#).unwrap_err();
        assert!(matches!(err, FailureCause::EmptyResponse));

        let err = parse_plan_response(&text_body("   ")).unwrap_err();
        assert!(matches!(err, FailureCause::EmptyResponse));
    }

    #[test]
    fn test_parse_error_body() {
        let body = r#"{"error": {"code": 429, "message": "quota exceeded"}}"#;
        let err = parse_plan_response(body).unwrap_err();
        assert!(matches!(err, FailureCause::Api { status: 429, .. }));
        assert_eq!(api_error_message(body), "quota exceeded");
        assert_eq!(api_error_message("gateway timeout"), "gateway timeout");
    }

    #[test]
    fn test_extract_first_inline_image() {
        let body = json!({
            "candidates": [{ "content": { "parts": [
                { "text": "Here is the illustration" },
                { "inlineData": { "mimeType": "image/png", "data": "iVBORw0KGgo=" } },
                { "inlineData": { "mimeType": "image/png", "data": "AAAA" } }
            ] } }]
        })
        .to_string();

        let image = extract_inline_image(&body).unwrap();
        assert_eq!(image.as_str(), "data:image/png;base64,iVBORw0KGgo=");
    }

    #[test]
    fn test_extract_without_inline_image() {
        let err = extract_inline_image(&text_body("no picture today")).unwrap_err();
        assert!(matches!(err, ImageUnavailable::NoInlineImage));

        let err = extract_inline_image(r#"{"candidates": []}"#).unwrap_err();
        assert!(matches!(err, ImageUnavailable::NoInlineImage));
    }

    #[test]
    fn test_extract_malformed_payload() {
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "inlineData": { "data": "%%%" } }] } }]
        })
        .to_string();
        assert!(matches!(extract_inline_image(&body), Err(ImageUnavailable::Malformed(_))));
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let gateway = GeminiGateway::new(None, Locale::PtBr);
        assert!(!gateway.has_api_key());

        let err = gateway.generate_plan(&prefs()).await.unwrap_err();
        assert!(matches!(err.cause, FailureCause::MissingApiKey(_)));
        assert!(gateway.generate_exercise_image("Squat").await.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        let gateway =
            GeminiGateway::new(Some("key".into()), Locale::PtBr).with_base_url("http://127.0.0.1:9");

        let err = gateway.generate_plan(&prefs()).await.unwrap_err();
        assert!(matches!(err.cause, FailureCause::Transport(_)));
        assert!(gateway.generate_exercise_image("Squat").await.is_none());
    }
}
