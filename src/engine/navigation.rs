use crate::catalog::{Lesson, Level, Quiz};
use crate::engine::progress::{ProgressEvent, ProgressRecord};

/// Which screen is active and which catalog entries it is focused on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Dashboard,
    LevelDetail {
        level: &'static Level,
    },
    Lesson {
        lesson: &'static Lesson,
        level: &'static Level,
    },
    Quiz {
        quiz: &'static Quiz,
        level: &'static Level,
    },
}

impl Screen {
    /// The level in focus, if any.
    pub fn level(&self) -> Option<&'static Level> {
        match *self {
            Screen::Dashboard => None,
            Screen::LevelDetail { level }
            | Screen::Lesson { level, .. }
            | Screen::Quiz { level, .. } => Some(level),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Screen::Dashboard => "dashboard",
            Screen::LevelDetail { .. } => "level",
            Screen::Lesson { .. } => "lesson",
            Screen::Quiz { .. } => "quiz",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavAction {
    SelectLevel(&'static Level),
    SelectLesson(&'static Lesson),
    SelectQuiz,
    CompleteLesson,
    CompleteQuiz { score: u32, passed: bool },
    Back,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub screen: Screen,
    pub event: Option<ProgressEvent>,
}

impl Transition {
    fn to(screen: Screen) -> Self {
        Self {
            screen,
            event: None,
        }
    }

    fn with_event(screen: Screen, event: ProgressEvent) -> Self {
        Self {
            screen,
            event: Some(event),
        }
    }
}

/// Pure screen transition. Pairs not listed leave the screen unchanged.
pub fn transition(screen: Screen, action: NavAction, progress: &ProgressRecord) -> Transition {
    match (screen, action) {
        (Screen::Dashboard, NavAction::SelectLevel(level)) => {
            if progress.is_level_unlocked(level.id) {
                Transition::to(Screen::LevelDetail { level })
            } else {
                Transition::to(screen)
            }
        }
        (Screen::Dashboard, NavAction::Back) => Transition::to(Screen::Dashboard),

        (Screen::LevelDetail { level }, NavAction::SelectLesson(lesson)) => {
            if level.contains_lesson(lesson.id) {
                Transition::to(Screen::Lesson { lesson, level })
            } else {
                Transition::to(screen)
            }
        }
        (Screen::LevelDetail { level }, NavAction::SelectQuiz) => Transition::to(Screen::Quiz {
            quiz: &level.quiz,
            level,
        }),
        (Screen::LevelDetail { .. }, NavAction::Back) => Transition::to(Screen::Dashboard),

        (Screen::Lesson { lesson, level }, NavAction::CompleteLesson) => Transition::with_event(
            Screen::LevelDetail { level },
            ProgressEvent::LessonCompleted {
                lesson_id: lesson.id,
            },
        ),
        (Screen::Lesson { level, .. }, NavAction::Back) => {
            Transition::to(Screen::LevelDetail { level })
        }

        (Screen::Quiz { quiz, level }, NavAction::CompleteQuiz { score, passed }) => {
            Transition::with_event(
                Screen::LevelDetail { level },
                ProgressEvent::QuizCompleted {
                    quiz_id: quiz.id,
                    score,
                    passed,
                    level_id: level.id,
                },
            )
        }
        (Screen::Quiz { level, .. }, NavAction::Back) => {
            Transition::to(Screen::LevelDetail { level })
        }

        _ => Transition::to(screen),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::COURSE;

    fn fresh() -> ProgressRecord {
        ProgressRecord::new(COURSE)
    }

    #[test]
    fn test_initial_screen_is_dashboard() {
        assert_eq!(Screen::default(), Screen::Dashboard);
    }

    #[test]
    fn test_select_unlocked_level() {
        let t = transition(Screen::Dashboard, NavAction::SelectLevel(&COURSE[0]), &fresh());
        assert_eq!(t.screen, Screen::LevelDetail { level: &COURSE[0] });
        assert!(t.event.is_none());
    }

    #[test]
    fn test_select_locked_level_is_noop() {
        let t = transition(Screen::Dashboard, NavAction::SelectLevel(&COURSE[2]), &fresh());
        assert_eq!(t.screen, Screen::Dashboard);
    }

    #[test]
    fn test_level_detail_to_lesson_and_quiz() {
        let level = &COURSE[0];
        let detail = Screen::LevelDetail { level };
        let t = transition(detail, NavAction::SelectLesson(&level.lessons[1]), &fresh());
        assert_eq!(
            t.screen,
            Screen::Lesson {
                lesson: &level.lessons[1],
                level
            }
        );

        let t = transition(detail, NavAction::SelectQuiz, &fresh());
        assert_eq!(
            t.screen,
            Screen::Quiz {
                quiz: &level.quiz,
                level
            }
        );
    }

    #[test]
    fn test_lesson_from_another_level_is_rejected() {
        let detail = Screen::LevelDetail { level: &COURSE[0] };
        let t = transition(detail, NavAction::SelectLesson(&COURSE[1].lessons[0]), &fresh());
        assert_eq!(t.screen, detail);
    }

    #[test]
    fn test_complete_lesson_returns_to_level_with_event() {
        let level = &COURSE[0];
        let lesson = &level.lessons[0];
        let t = transition(Screen::Lesson { lesson, level }, NavAction::CompleteLesson, &fresh());
        assert_eq!(t.screen, Screen::LevelDetail { level });
        assert_eq!(
            t.event,
            Some(ProgressEvent::LessonCompleted { lesson_id: "l1-1" })
        );
    }

    #[test]
    fn test_complete_quiz_returns_to_level_with_event() {
        let level = &COURSE[1];
        let t = transition(
            Screen::Quiz {
                quiz: &level.quiz,
                level,
            },
            NavAction::CompleteQuiz {
                score: 60,
                passed: false,
            },
            &fresh(),
        );
        assert_eq!(t.screen, Screen::LevelDetail { level });
        assert_eq!(
            t.event,
            Some(ProgressEvent::QuizCompleted {
                quiz_id: "q2",
                score: 60,
                passed: false,
                level_id: "level-2",
            })
        );
    }

    #[test]
    fn test_back_navigation() {
        let level = &COURSE[0];
        let p = fresh();
        let lesson = Screen::Lesson {
            lesson: &level.lessons[0],
            level,
        };
        let quiz = Screen::Quiz {
            quiz: &level.quiz,
            level,
        };
        assert_eq!(transition(lesson, NavAction::Back, &p).screen, Screen::LevelDetail { level });
        assert_eq!(transition(quiz, NavAction::Back, &p).screen, Screen::LevelDetail { level });
        assert_eq!(
            transition(Screen::LevelDetail { level }, NavAction::Back, &p).screen,
            Screen::Dashboard
        );
        // No level focused: back degrades to the dashboard
        assert_eq!(transition(Screen::Dashboard, NavAction::Back, &p).screen, Screen::Dashboard);
        assert!(transition(lesson, NavAction::Back, &p).event.is_none());
    }

    #[test]
    fn test_unlisted_pairs_are_noops() {
        let level = &COURSE[0];
        let p = fresh();
        let lesson = Screen::Lesson {
            lesson: &level.lessons[0],
            level,
        };
        assert_eq!(transition(Screen::Dashboard, NavAction::SelectQuiz, &p).screen, Screen::Dashboard);
        assert_eq!(transition(Screen::Dashboard, NavAction::CompleteLesson, &p).screen, Screen::Dashboard);
        let t = transition(
            lesson,
            NavAction::CompleteQuiz {
                score: 100,
                passed: true,
            },
            &p,
        );
        assert_eq!(t.screen, lesson);
        assert!(t.event.is_none());
        assert_eq!(
            transition(lesson, NavAction::SelectLevel(&COURSE[0]), &p).screen,
            lesson
        );
    }

    #[test]
    fn test_screen_level_accessor() {
        let level = &COURSE[3];
        assert!(Screen::Dashboard.level().is_none());
        assert_eq!(Screen::LevelDetail { level }.level().map(|l| l.id), Some("level-4"));
        assert_eq!(
            Screen::Quiz {
                quiz: &level.quiz,
                level
            }
            .level()
            .map(|l| l.id),
            Some("level-4")
        );
    }
}
