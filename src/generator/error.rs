use thiserror::Error;

/// Failures from the generation client.
///
/// Only `InvalidCredential` asks the user for a new API key; every other
/// variant is a transient failure the user may retry by hand.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("API key missing or rejected: {0}")]
    InvalidCredential(String),
    #[error("generation request failed: {0}")]
    Provider(String),
    #[error("provider returned malformed content: {0}")]
    Malformed(String),
    #[cfg(feature = "network")]
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl GenerationError {
    pub fn is_invalid_credential(&self) -> bool {
        matches!(self, GenerationError::InvalidCredential(_))
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(err: serde_json::Error) -> Self {
        GenerationError::Malformed(err.to_string())
    }
}

const CREDENTIAL_MARKERS: &[&str] = &["API key not valid", "API_KEY_INVALID", "API_KEY_MISSING"];

/// Map a failed provider response to the two-way error classification.
pub fn classify_failure(status: u16, body: &str) -> GenerationError {
    let rejected_key = status == 401
        || status == 403
        || CREDENTIAL_MARKERS.iter().any(|m| body.contains(m));
    let detail = provider_message(body).unwrap_or_else(|| format!("HTTP {status}"));
    if rejected_key {
        GenerationError::InvalidCredential(detail)
    } else {
        GenerationError::Provider(detail)
    }
}

/// `error.message` from a Google-style error body.
fn provider_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_key_body_is_credential_error() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid. Please pass a valid API key.",
            "status": "INVALID_ARGUMENT", "details": [{"reason": "API_KEY_INVALID"}]}}"#;
        let err = classify_failure(400, body);
        assert!(err.is_invalid_credential());
        assert!(err.to_string().contains("API key not valid"));
    }

    #[test]
    fn test_auth_status_is_credential_error() {
        assert!(classify_failure(401, "").is_invalid_credential());
        assert!(classify_failure(403, "forbidden").is_invalid_credential());
    }

    #[test]
    fn test_other_failures_are_generic() {
        let body = r#"{"error": {"code": 503, "message": "The model is overloaded."}}"#;
        let err = classify_failure(503, body);
        assert!(!err.is_invalid_credential());
        assert_eq!(err.to_string(), "generation request failed: The model is overloaded.");

        let err = classify_failure(500, "<html>oops</html>");
        assert_eq!(err.to_string(), "generation request failed: HTTP 500");
    }

    #[test]
    fn test_json_errors_are_malformed() {
        let err: GenerationError = serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into();
        assert!(matches!(err, GenerationError::Malformed(_)));
    }
}
