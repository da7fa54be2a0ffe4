use crate::generator::content::{QuizContent, QuizQuestion};

/// One pass through a generated quiz: answer, see feedback, move on.
pub struct QuizAttempt {
    pub quiz: QuizContent,
    pub current: usize,
    pub selected: Option<usize>,
    pub correct_count: usize,
    pub show_results: bool,
}

impl QuizAttempt {
    pub fn new(quiz: QuizContent) -> Self {
        Self {
            quiz,
            current: 0,
            selected: None,
            correct_count: 0,
            show_results: false,
        }
    }

    pub fn total(&self) -> usize {
        self.quiz.questions.len()
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        if self.show_results {
            return None;
        }
        self.quiz.questions.get(self.current)
    }

    /// Feedback is showing once an answer has been picked.
    pub fn feedback_shown(&self) -> bool {
        self.selected.is_some()
    }

    /// Pick an answer for the current question. Ignored after the first
    /// pick or when the index is not one of the options.
    pub fn select(&mut self, option: usize) -> bool {
        if self.feedback_shown() {
            return false;
        }
        let Some(question) = self.current_question() else {
            return false;
        };
        if option >= question.options.len() {
            return false;
        }
        let correct = option == question.correct_answer_index;
        self.selected = Some(option);
        if correct {
            self.correct_count += 1;
        }
        true
    }

    pub fn selected_is_correct(&self) -> Option<bool> {
        let question = self.current_question()?;
        self.selected.map(|s| s == question.correct_answer_index)
    }

    pub fn is_last_question(&self) -> bool {
        self.current + 1 >= self.total()
    }

    /// Next question, or the results page after the last one. Requires an
    /// answer to have been picked.
    pub fn advance(&mut self) {
        if !self.feedback_shown() || self.show_results {
            return;
        }
        self.selected = None;
        if self.is_last_question() {
            self.show_results = true;
        } else {
            self.current += 1;
        }
    }

    pub fn score_percent(&self) -> u32 {
        if self.total() == 0 {
            return 0;
        }
        ((self.correct_count as f64 / self.total() as f64) * 100.0).round() as u32
    }

    pub fn passed(&self, threshold: u32) -> bool {
        self.score_percent() >= threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiz(n: usize) -> QuizContent {
        QuizContent {
            title: "Quiz".to_string(),
            questions: (0..n)
                .map(|i| QuizQuestion {
                    question_text: format!("Q{i}"),
                    options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                    correct_answer_index: 1,
                    explanation: String::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_select_counts_correct_once() {
        let mut attempt = QuizAttempt::new(quiz(2));
        assert!(attempt.select(1));
        assert_eq!(attempt.correct_count, 1);
        assert_eq!(attempt.selected_is_correct(), Some(true));
        // Second pick is ignored
        assert!(!attempt.select(0));
        assert_eq!(attempt.selected, Some(1));
        assert_eq!(attempt.correct_count, 1);
    }

    #[test]
    fn test_out_of_range_selection_ignored() {
        let mut attempt = QuizAttempt::new(quiz(1));
        assert!(!attempt.select(4));
        assert!(!attempt.feedback_shown());
    }

    #[test]
    fn test_advance_requires_answer_and_ends_in_results() {
        let mut attempt = QuizAttempt::new(quiz(2));
        attempt.advance();
        assert_eq!(attempt.current, 0);

        attempt.select(0);
        attempt.advance();
        assert_eq!(attempt.current, 1);
        assert!(!attempt.show_results);

        attempt.select(1);
        attempt.advance();
        assert!(attempt.show_results);
        assert!(attempt.current_question().is_none());
        assert_eq!(attempt.score_percent(), 50);
    }

    #[test]
    fn test_score_rounding_and_threshold() {
        let mut attempt = QuizAttempt::new(quiz(3));
        for pick in [1, 1, 0] {
            attempt.select(pick);
            attempt.advance();
        }
        assert_eq!(attempt.score_percent(), 67);
        assert!(!attempt.passed(70));
        assert!(attempt.passed(60));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut attempt = QuizAttempt::new(quiz(10));
        for i in 0..10 {
            attempt.select(if i < 7 { 1 } else { 2 });
            attempt.advance();
        }
        assert_eq!(attempt.score_percent(), 70);
        assert!(attempt.passed(70));
    }
}
