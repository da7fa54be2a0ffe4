use crate::catalog::Quiz;
use crate::engine::quiz_attempt::QuizAttempt;
use crate::generator::content::{OPTIONS_PER_QUESTION, QuizContent};
use crate::generator::error::GenerationError;
use crate::session::lesson_page::LoadState;
use crate::session::request::RequestToken;

pub struct QuizPage {
    pub quiz: &'static Quiz,
    pub token: RequestToken,
    pub attempt: LoadState<QuizAttempt>,
    /// Highlighted option while no answer is picked.
    pub cursor: usize,
}

impl QuizPage {
    pub fn new(quiz: &'static Quiz, token: RequestToken) -> Self {
        Self {
            quiz,
            token,
            attempt: LoadState::Loading,
            cursor: 0,
        }
    }

    pub fn restart(&mut self, token: RequestToken) {
        self.token = token;
        self.attempt = LoadState::Loading;
        self.cursor = 0;
    }

    pub fn receive_quiz(&mut self, result: Result<QuizContent, GenerationError>) {
        self.attempt = match result {
            Ok(quiz) => LoadState::Ready(QuizAttempt::new(quiz)),
            Err(e) => LoadState::Failed(e.to_string()),
        };
        self.cursor = 0;
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        self.cursor = (self.cursor + 1).min(OPTIONS_PER_QUESTION - 1);
    }

    /// Answer with the highlighted option.
    pub fn select_cursor(&mut self) -> bool {
        let cursor = self.cursor;
        self.select(cursor)
    }

    pub fn select(&mut self, option: usize) -> bool {
        match self.attempt.ready_mut() {
            Some(attempt) => attempt.select(option),
            None => false,
        }
    }

    pub fn advance(&mut self) {
        if let Some(attempt) = self.attempt.ready_mut() {
            attempt.advance();
            self.cursor = 0;
        }
    }

    /// Score and pass flag once the results page is reached.
    pub fn final_result(&self, threshold: u32) -> Option<(u32, bool)> {
        let attempt = self.attempt.ready()?;
        attempt
            .show_results
            .then(|| (attempt.score_percent(), attempt.passed(threshold)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::COURSE;
    use crate::generator::content::QuizQuestion;
    use crate::session::request::RequestTracker;

    fn content() -> QuizContent {
        QuizContent {
            title: "q".into(),
            questions: vec![
                QuizQuestion {
                    question_text: "one".into(),
                    options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                    correct_answer_index: 0,
                    explanation: String::new(),
                },
                QuizQuestion {
                    question_text: "two".into(),
                    options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                    correct_answer_index: 3,
                    explanation: String::new(),
                },
            ],
        }
    }

    fn page() -> QuizPage {
        QuizPage::new(&COURSE[0].quiz, RequestTracker::new().issue())
    }

    #[test]
    fn test_nothing_to_select_while_loading() {
        let mut page = page();
        assert!(!page.select(0));
        assert_eq!(page.final_result(70), None);
    }

    #[test]
    fn test_cursor_is_clamped() {
        let mut page = page();
        page.cursor_up();
        assert_eq!(page.cursor, 0);
        for _ in 0..10 {
            page.cursor_down();
        }
        assert_eq!(page.cursor, 3);
    }

    #[test]
    fn test_full_attempt_yields_result() {
        let mut page = page();
        page.receive_quiz(Ok(content()));

        assert!(page.select_cursor());
        page.advance();
        assert_eq!(page.final_result(70), None);

        page.cursor_down();
        assert!(page.select_cursor());
        page.advance();
        assert_eq!(page.final_result(70), Some((50, false)));
        assert_eq!(page.final_result(50), Some((50, true)));
    }

    #[test]
    fn test_failed_quiz_shows_message() {
        let mut page = page();
        page.receive_quiz(Err(GenerationError::Malformed("no questions".into())));
        assert!(matches!(page.attempt, LoadState::Failed(ref m) if m.contains("no questions")));
    }
}
