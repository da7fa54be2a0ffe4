use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;
use crate::generator::content::ImageData;
use crate::generator::error::GenerationError;
use crate::generator::{ContentProvider, ContentRequest};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeminiSettings {
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub timeout_secs: u64,
}

impl GeminiSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            text_model: config.text_model.clone(),
            image_model: config.image_model.clone(),
            timeout_secs: config.request_timeout_secs,
        }
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!(
            "{}/models/{model}:{method}",
            self.base_url.trim_end_matches('/')
        )
    }
}

/// Google Generative Language REST API.
pub struct GeminiProvider {
    settings: GeminiSettings,
    #[cfg(feature = "network")]
    client: reqwest::blocking::Client,
}

impl GeminiProvider {
    #[cfg(feature = "network")]
    pub fn new(settings: GeminiSettings) -> Result<Self, GenerationError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self { settings, client })
    }

    #[cfg(not(feature = "network"))]
    pub fn new(settings: GeminiSettings) -> Result<Self, GenerationError> {
        Ok(Self { settings })
    }

    #[cfg(feature = "network")]
    fn post(&self, url: &str, api_key: &str, body: &impl Serialize) -> Result<String, GenerationError> {
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(body)
            .send()?;
        let status = response.status();
        let text = response.text()?;
        if status.is_success() {
            Ok(text)
        } else {
            Err(crate::generator::error::classify_failure(status.as_u16(), &text))
        }
    }

    #[cfg(not(feature = "network"))]
    fn post(&self, _url: &str, _api_key: &str, _body: &impl Serialize) -> Result<String, GenerationError> {
        Err(GenerationError::Provider(
            "built without network support".to_string(),
        ))
    }
}

impl ContentProvider for GeminiProvider {
    fn generate_json(
        &self,
        api_key: &str,
        request: &ContentRequest,
    ) -> Result<String, GenerationError> {
        let url = self
            .settings
            .endpoint(&self.settings.text_model, "generateContent");
        let body = self.post(&url, api_key, &GenerateContentRequest::from_request(request))?;
        parse_generate_response(&body)
    }

    fn generate_image(&self, api_key: &str, prompt: &str) -> Result<ImageData, GenerationError> {
        let url = self.settings.endpoint(&self.settings.image_model, "predict");
        let body = self.post(&url, api_key, &PredictRequest::single(prompt))?;
        parse_predict_response(&body)
    }
}

// --- Wire types ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TextPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

impl GenerateContentRequest {
    fn from_request(request: &ContentRequest) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![TextPart {
                    text: request.instruction.clone(),
                }],
            }],
            generation_config: request.schema.as_ref().map(|schema| GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema.clone(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictRequest {
    instances: Vec<PredictInstance>,
    parameters: PredictParameters,
}

#[derive(Debug, Serialize)]
struct PredictInstance {
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    sample_count: u32,
    aspect_ratio: &'static str,
    output_options: OutputOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutputOptions {
    mime_type: &'static str,
}

impl PredictRequest {
    fn single(prompt: &str) -> Self {
        Self {
            instances: vec![PredictInstance {
                prompt: prompt.to_string(),
            }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: "16:9",
                output_options: OutputOptions {
                    mime_type: "image/png",
                },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    #[serde(default)]
    bytes_base64_encoded: String,
    mime_type: Option<String>,
}

// --- Response parsing ---

fn parse_generate_response(body: &str) -> Result<String, GenerationError> {
    let response: GenerateContentResponse = serde_json::from_str(body)?;

    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(GenerationError::Provider(format!("prompt blocked: {reason}")));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| GenerationError::Provider("no candidates returned".to_string()))?;
    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "UNKNOWN".to_string());
        return Err(GenerationError::Provider(format!(
            "empty response (finish reason {reason})"
        )));
    }
    Ok(text.trim().to_string())
}

fn parse_predict_response(body: &str) -> Result<ImageData, GenerationError> {
    let response: PredictResponse = serde_json::from_str(body)?;
    let prediction = response
        .predictions
        .into_iter()
        .find(|p| !p.bytes_base64_encoded.is_empty())
        .ok_or_else(|| GenerationError::Provider("no image data returned".to_string()))?;
    Ok(ImageData {
        mime_type: prediction
            .mime_type
            .unwrap_or_else(|| "image/png".to_string()),
        base64: prediction.bytes_base64_encoded,
    })
}
