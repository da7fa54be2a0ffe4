use crate::generator::content::{ImageData, LessonContent, QuizContent};
use crate::generator::error::GenerationError;

/// Identifies one screen entry's generation requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Hands out tokens and remembers which one the visible screen owns.
#[derive(Debug, Default)]
pub struct RequestTracker {
    issued: u64,
    active: Option<RequestToken>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// New token for a screen entry; any earlier token goes stale.
    pub fn issue(&mut self) -> RequestToken {
        self.issued += 1;
        let token = RequestToken(self.issued);
        self.active = Some(token);
        token
    }

    /// The screen was left; nothing in flight is wanted anymore.
    pub fn invalidate(&mut self) {
        self.active = None;
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.active == Some(token)
    }
}

pub enum GenerationPayload {
    Lesson(Result<LessonContent, GenerationError>),
    Quiz(Result<QuizContent, GenerationError>),
    Image {
        section: usize,
        result: Result<ImageData, GenerationError>,
    },
}

impl GenerationPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationPayload::Lesson(_) => "lesson",
            GenerationPayload::Quiz(_) => "quiz",
            GenerationPayload::Image { .. } => "image",
        }
    }
}

/// A finished request, tagged with the token it was issued under.
pub struct GenerationOutcome {
    pub token: RequestToken,
    pub payload: GenerationPayload,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_monotonic() {
        let mut tracker = RequestTracker::new();
        let a = tracker.issue();
        let b = tracker.issue();
        assert!(b > a);
        assert!(tracker.is_current(b));
    }

    #[test]
    fn test_reissue_makes_old_token_stale() {
        let mut tracker = RequestTracker::new();
        let first = tracker.issue();
        assert!(tracker.is_current(first));
        let second = tracker.issue();
        assert!(!tracker.is_current(first));
        assert!(tracker.is_current(second));
    }

    #[test]
    fn test_invalidate_clears_active() {
        let mut tracker = RequestTracker::new();
        let token = tracker.issue();
        tracker.invalidate();
        assert!(!tracker.is_current(token));
        // Issuing again never reuses a value
        assert!(tracker.issue() > token);
    }
}
