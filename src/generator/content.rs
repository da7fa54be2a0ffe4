use serde::{Deserialize, Deserializer, Serialize};

use crate::generator::error::GenerationError;

/// Every question is shown with exactly this many options.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// Filler for questions that came back with too few options.
pub const PLACEHOLDER_OPTION: &str = "Invalid option";

// --- Lesson ---

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonSection {
    pub heading: String,
    pub content: String,
    #[serde(default, deserialize_with = "non_blank")]
    pub image_prompt: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonContent {
    pub title: String,
    pub introduction: String,
    pub sections: Vec<LessonSection>,
    pub conclusion: String,
}

impl LessonContent {
    /// (section index, prompt) for every section that asks for an illustration.
    pub fn image_prompts(&self) -> impl Iterator<Item = (usize, &str)> {
        self.sections
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.image_prompt.as_deref().map(|p| (i, p)))
    }
}

fn non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

// --- Quiz ---

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
    pub explanation: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuizContent {
    pub title: String,
    pub questions: Vec<QuizQuestion>,
}

/// Quiz as the provider sent it, before normalization.
#[derive(Debug, Deserialize)]
pub struct RawQuiz {
    pub title: String,
    pub questions: Vec<RawQuizQuestion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuizQuestion {
    pub question_text: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer_index: i64,
    #[serde(default)]
    pub explanation: String,
}

impl RawQuizQuestion {
    /// Coerce the option list to exactly four entries. A question whose
    /// answer index does not point at one of the provider's own options
    /// (after truncation) cannot be graded and yields None.
    pub fn normalize(self) -> Option<QuizQuestion> {
        let original_len = self.options.len();
        let mut options = self.options;
        options.truncate(OPTIONS_PER_QUESTION);
        while options.len() < OPTIONS_PER_QUESTION {
            options.push(PLACEHOLDER_OPTION.to_string());
        }

        let kept = original_len.min(OPTIONS_PER_QUESTION);
        let index = usize::try_from(self.correct_answer_index)
            .ok()
            .filter(|&i| i < kept)?;

        Some(QuizQuestion {
            question_text: self.question_text,
            options,
            correct_answer_index: index,
            explanation: self.explanation,
        })
    }
}

impl RawQuiz {
    pub fn normalize(self) -> Result<QuizContent, GenerationError> {
        let total = self.questions.len();
        let questions: Vec<QuizQuestion> = self
            .questions
            .into_iter()
            .filter_map(RawQuizQuestion::normalize)
            .collect();

        if questions.len() < total {
            tracing::warn!(
                dropped = total - questions.len(),
                total,
                "dropped quiz questions with an unusable answer index"
            );
        }
        if questions.is_empty() {
            return Err(GenerationError::Malformed(
                "quiz contained no usable questions".to_string(),
            ));
        }

        Ok(QuizContent {
            title: self.title,
            questions,
        })
    }
}

// --- Image ---

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageData {
    pub mime_type: String,
    /// Base64-encoded image bytes as returned by the provider.
    pub base64: String,
}

impl ImageData {
    /// Inline-displayable reference to the image.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }

    /// Decoded size in bytes, estimated from the base64 length.
    pub fn approx_bytes(&self) -> usize {
        let padding = self.base64.bytes().rev().take_while(|&b| b == b'=').count();
        (self.base64.len() / 4 * 3).saturating_sub(padding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(options: &[&str], correct: i64) -> RawQuizQuestion {
        RawQuizQuestion {
            question_text: "Which visual?".to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_answer_index: correct,
            explanation: "Because.".to_string(),
        }
    }

    #[test]
    fn test_exactly_four_options_unchanged() {
        let q = raw(&["a", "b", "c", "d"], 2).normalize().unwrap();
        assert_eq!(q.options, vec!["a", "b", "c", "d"]);
        assert_eq!(q.correct_answer_index, 2);
    }

    #[test]
    fn test_normalized_length_is_always_four() {
        let pool = ["a", "b", "c", "d", "e", "f", "g"];
        for n in 1..=pool.len() {
            let q = raw(&pool[..n], 0).normalize().unwrap();
            assert_eq!(q.options.len(), OPTIONS_PER_QUESTION, "n = {n}");
        }
    }

    #[test]
    fn test_extra_options_are_truncated() {
        let q = raw(&["a", "b", "c", "d", "e", "f"], 3).normalize().unwrap();
        assert_eq!(q.options, vec!["a", "b", "c", "d"]);
        assert_eq!(q.correct_answer_index, 3);
    }

    #[test]
    fn test_missing_options_are_padded() {
        let q = raw(&["a", "b"], 1).normalize().unwrap();
        assert_eq!(q.options, vec!["a", "b", PLACEHOLDER_OPTION, PLACEHOLDER_OPTION]);
    }

    #[test]
    fn test_answer_lost_to_truncation_is_dropped() {
        assert!(raw(&["a", "b", "c", "d", "e"], 4).normalize().is_none());
    }

    #[test]
    fn test_answer_pointing_at_placeholder_is_dropped() {
        assert!(raw(&["a", "b"], 2).normalize().is_none());
        assert!(raw(&["a", "b", "c", "d"], -1).normalize().is_none());
    }

    #[test]
    fn test_quiz_normalize_keeps_gradable_questions() {
        let quiz = RawQuiz {
            title: "DAX".to_string(),
            questions: vec![raw(&["a", "b", "c", "d"], 0), raw(&["a"], 3), raw(&["a", "b", "c"], 2)],
        };
        let content = quiz.normalize().unwrap();
        assert_eq!(content.questions.len(), 2);
        assert!(content.questions.iter().all(|q| q.options.len() == 4));
    }

    #[test]
    fn test_quiz_without_usable_questions_is_malformed() {
        let quiz = RawQuiz {
            title: "Empty".to_string(),
            questions: Vec::new(),
        };
        assert!(matches!(quiz.normalize(), Err(GenerationError::Malformed(_))));
    }

    #[test]
    fn test_blank_image_prompt_is_absent() {
        let json = r#"{
            "title": "T",
            "introduction": "I",
            "sections": [
                {"heading": "A", "content": "a", "imagePrompt": "  "},
                {"heading": "B", "content": "b", "imagePrompt": "ribbon bar"},
                {"heading": "C", "content": "c"}
            ],
            "conclusion": "C"
        }"#;
        let lesson: LessonContent = serde_json::from_str(json).unwrap();
        assert_eq!(lesson.sections[0].image_prompt, None);
        let prompts: Vec<(usize, &str)> = lesson.image_prompts().collect();
        assert_eq!(prompts, vec![(1, "ribbon bar")]);
    }

    #[test]
    fn test_image_data_uri() {
        let image = ImageData {
            mime_type: "image/png".to_string(),
            base64: "iVBORw0KGgo=".to_string(),
        };
        assert_eq!(image.data_uri(), "data:image/png;base64,iVBORw0KGgo=");
        assert_eq!(image.approx_bytes(), 8);
    }
}
