use serde_json::{Value, json};

/// Appended to every illustration prompt.
pub const IMAGE_STYLE_SUFFIX: &str =
    ", as a clear screenshot for a tutorial, user interface, high resolution, clear text";

pub fn lesson_instruction(topic: &str, language: &str) -> String {
    format!(
        "Write a detailed, easy to follow lesson in {language} on the following Power BI topic: \
         \"{topic}\". The lesson must be educational, clear and structured for a beginner. \
         Do not include the main title in the response, only the JSON object."
    )
}

pub fn quiz_instruction(topic: &str, question_count: usize, language: &str) -> String {
    format!(
        "Write a multiple choice quiz in {language} with {question_count} questions on the \
         following Power BI topic: \"{topic}\". Each question must have 4 options and exactly \
         one correct answer. The questions must test understanding of the topic. Do not include \
         the main title in the response, only the JSON object."
    )
}

pub fn image_prompt(prompt: &str) -> String {
    format!("{}{IMAGE_STYLE_SUFFIX}", prompt.trim())
}

pub fn lesson_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING", "description": "The lesson title." },
            "introduction": { "type": "STRING", "description": "An engaging introduction to the topic." },
            "sections": {
                "type": "ARRAY",
                "description": "The sections that make up the lesson.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "heading": { "type": "STRING", "description": "The section heading." },
                        "content": { "type": "STRING", "description": "The section body, in simple markdown." },
                        "imagePrompt": {
                            "type": "STRING",
                            "description": "Optional. An English prompt for an illustration of this section."
                        }
                    },
                    "required": ["heading", "content"]
                }
            },
            "conclusion": { "type": "STRING", "description": "A conclusion summarizing the key points." }
        },
        "required": ["title", "introduction", "sections", "conclusion"]
    })
}

pub fn quiz_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING", "description": "The quiz title." },
            "questions": {
                "type": "ARRAY",
                "description": "The quiz questions.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "questionText": { "type": "STRING", "description": "The question." },
                        "options": {
                            "type": "ARRAY",
                            "description": "Exactly 4 possible answers.",
                            "items": { "type": "STRING" }
                        },
                        "correctAnswerIndex": {
                            "type": "INTEGER",
                            "description": "Index (0-3) of the correct answer in options."
                        },
                        "explanation": { "type": "STRING", "description": "Why the answer is correct." }
                    },
                    "required": ["questionText", "options", "correctAnswerIndex", "explanation"]
                }
            }
        },
        "required": ["title", "questions"]
    })
}
