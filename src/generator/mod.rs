pub mod client;
pub mod content;
pub mod error;
pub mod gemini;
pub mod prompt;

use serde_json::Value;

use crate::generator::content::ImageData;
use crate::generator::error::GenerationError;

/// One structured-content request to the provider.
#[derive(Clone, Debug)]
pub struct ContentRequest {
    pub instruction: String,
    /// Shape the response JSON must follow.
    pub schema: Option<Value>,
}

/// The external generative capability. Implementations make exactly one
/// attempt per call.
pub trait ContentProvider: Send + Sync {
    /// Returns the response body text, expected to be JSON.
    fn generate_json(
        &self,
        api_key: &str,
        request: &ContentRequest,
    ) -> Result<String, GenerationError>;

    fn generate_image(&self, api_key: &str, prompt: &str) -> Result<ImageData, GenerationError>;
}
