use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::catalog::{self, COURSE, Level};

// --- Persisted Progress ---

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    /// Percentage of correct answers, 0-100.
    pub score: u32,
    pub passed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    #[serde(default)]
    pub completed_lessons: BTreeSet<String>,
    #[serde(default)]
    pub completed_quizzes: BTreeMap<String, QuizResult>,
    #[serde(default)]
    pub unlocked_levels: BTreeSet<String>,
}

/// Side effects the navigation machine asks the progress machine to apply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProgressEvent {
    LessonCompleted {
        lesson_id: &'static str,
    },
    QuizCompleted {
        quiz_id: &'static str,
        score: u32,
        passed: bool,
        level_id: &'static str,
    },
}

/// Dashboard view of one level's completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelSummary {
    pub unlocked: bool,
    pub lessons_done: usize,
    pub quiz: Option<QuizResult>,
    pub completed_items: usize,
    pub total_items: usize,
}

impl LevelSummary {
    pub fn percent(&self) -> u32 {
        if self.total_items == 0 {
            return 0;
        }
        ((self.completed_items as f64 / self.total_items as f64) * 100.0).round() as u32
    }

    pub fn is_complete(&self) -> bool {
        self.total_items > 0 && self.completed_items == self.total_items
    }
}

impl ProgressRecord {
    /// Fresh record: only the catalog's first level is open.
    pub fn new(catalog: &[Level]) -> Self {
        let mut unlocked_levels = BTreeSet::new();
        unlocked_levels.insert(catalog::first_level(catalog).id.to_string());
        Self {
            completed_lessons: BTreeSet::new(),
            completed_quizzes: BTreeMap::new(),
            unlocked_levels,
        }
    }

    /// Restore the first-level invariant on a record read from storage.
    /// Returns true if the record had to be changed.
    pub fn repair(&mut self, catalog: &[Level]) -> bool {
        self.unlocked_levels
            .insert(catalog::first_level(catalog).id.to_string())
    }

    pub fn complete_lesson(&self, lesson_id: &str) -> ProgressRecord {
        let mut next = self.clone();
        next.completed_lessons.insert(lesson_id.to_string());
        next
    }

    /// Record a quiz attempt. Passing unlocks the level after `level_id`.
    pub fn complete_quiz(
        &self,
        catalog: &[Level],
        quiz_id: &str,
        score: u32,
        passed: bool,
        level_id: &str,
    ) -> ProgressRecord {
        let mut next = self.clone();
        next.completed_quizzes.insert(
            quiz_id.to_string(),
            QuizResult {
                score: score.min(100),
                passed,
            },
        );

        if passed && let Some(level) = catalog::next_level(catalog, level_id) {
            next.unlocked_levels.insert(level.id.to_string());
        }
        next
    }

    pub fn apply(&self, catalog: &[Level], event: &ProgressEvent) -> ProgressRecord {
        match *event {
            ProgressEvent::LessonCompleted { lesson_id } => self.complete_lesson(lesson_id),
            ProgressEvent::QuizCompleted {
                quiz_id,
                score,
                passed,
                level_id,
            } => self.complete_quiz(catalog, quiz_id, score, passed, level_id),
        }
    }

    pub fn is_level_unlocked(&self, level_id: &str) -> bool {
        self.unlocked_levels.contains(level_id)
    }

    pub fn is_lesson_completed(&self, lesson_id: &str) -> bool {
        self.completed_lessons.contains(lesson_id)
    }

    pub fn quiz_result(&self, quiz_id: &str) -> Option<QuizResult> {
        self.completed_quizzes.get(quiz_id).copied()
    }

    pub fn level_summary(&self, level: &Level) -> LevelSummary {
        let lessons_done = level
            .lessons
            .iter()
            .filter(|l| self.is_lesson_completed(l.id))
            .count();
        let quiz = self.quiz_result(level.quiz.id);
        // An attempted quiz counts as an item even when failed.
        let completed_items = lessons_done + usize::from(quiz.is_some());
        LevelSummary {
            unlocked: self.is_level_unlocked(level.id),
            lessons_done,
            quiz,
            completed_items,
            total_items: level.lessons.len() + 1,
        }
    }

    /// Course-wide completion: finished lessons plus passed quizzes.
    pub fn overall_percent(&self, catalog: &[Level]) -> u32 {
        let total = catalog::total_lessons(catalog) + catalog.len();
        if total == 0 {
            return 0;
        }
        let lessons_done = catalog
            .iter()
            .flat_map(|l| l.lessons.iter())
            .filter(|l| self.is_lesson_completed(l.id))
            .count();
        let quizzes_passed = catalog
            .iter()
            .filter(|l| self.quiz_result(l.quiz.id).is_some_and(|r| r.passed))
            .count();
        (((lessons_done + quizzes_passed) as f64 / total as f64) * 100.0).round() as u32
    }
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self::new(COURSE)
    }
}

/// Back to a brand-new record. Callers must have the user's confirmation.
pub fn reset_progress(catalog: &[Level]) -> ProgressRecord {
    ProgressRecord::new(catalog)
}
