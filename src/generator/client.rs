use tracing::{debug, warn};

use crate::generator::content::{ImageData, LessonContent, QuizContent, RawQuiz};
use crate::generator::error::GenerationError;
use crate::generator::prompt;
use crate::generator::{ContentProvider, ContentRequest};
use crate::store::credential::CredentialStore;

/// Turns catalog topics into validated lesson, quiz and image content.
///
/// No caching and no retries: each call is one provider request, and the
/// API key is read fresh from the credential store every time.
pub struct GenerationClient {
    provider: Box<dyn ContentProvider>,
    credentials: CredentialStore,
    language: String,
}

impl GenerationClient {
    pub fn new(
        provider: Box<dyn ContentProvider>,
        credentials: CredentialStore,
        language: &str,
    ) -> Self {
        Self {
            provider,
            credentials,
            language: language.to_string(),
        }
    }

    fn api_key(&self) -> Result<String, GenerationError> {
        self.credentials.api_key().ok_or_else(|| {
            GenerationError::InvalidCredential("no API key has been entered".to_string())
        })
    }

    pub fn generate_lesson_content(&self, topic: &str) -> Result<LessonContent, GenerationError> {
        let api_key = self.api_key()?;
        let request = ContentRequest {
            instruction: prompt::lesson_instruction(topic, &self.language),
            schema: Some(prompt::lesson_schema()),
        };
        debug!(topic, "requesting lesson");
        let json = self
            .provider
            .generate_json(&api_key, &request)
            .inspect_err(|e| warn!(topic, error = %e, "lesson generation failed"))?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn generate_quiz(
        &self,
        topic: &str,
        question_count: usize,
    ) -> Result<QuizContent, GenerationError> {
        let api_key = self.api_key()?;
        let request = ContentRequest {
            instruction: prompt::quiz_instruction(topic, question_count, &self.language),
            schema: Some(prompt::quiz_schema()),
        };
        debug!(topic, question_count, "requesting quiz");
        let json = self
            .provider
            .generate_json(&api_key, &request)
            .inspect_err(|e| warn!(topic, error = %e, "quiz generation failed"))?;
        let raw: RawQuiz = serde_json::from_str(&json)?;
        raw.normalize()
    }

    pub fn generate_image_from_prompt(&self, image_prompt: &str) -> Result<ImageData, GenerationError> {
        let api_key = self.api_key()?;
        let full_prompt = prompt::image_prompt(image_prompt);
        debug!(prompt = %full_prompt, "requesting image");
        let image = self
            .provider
            .generate_image(&api_key, &full_prompt)
            .inspect_err(|e| warn!(error = %e, "image generation failed"))?;
        if image.base64.is_empty() {
            return Err(GenerationError::Provider(
                "no image data returned".to_string(),
            ));
        }
        Ok(image)
    }
}
