use std::sync::Arc;
use std::sync::mpsc::Sender;

use tracing::{debug, info, warn};

use crate::catalog::{COURSE, Level};
use crate::config::Config;
use crate::engine::navigation::{self, NavAction, Screen};
use crate::engine::progress::ProgressRecord;
use crate::event::AppEvent;
use crate::generator::ContentProvider;
use crate::generator::client::GenerationClient;
use crate::generator::error::GenerationError;
use crate::session::lesson_page::{LessonPage, LoadState};
use crate::session::quiz_page::QuizPage;
use crate::session::request::{GenerationOutcome, GenerationPayload, RequestTracker};
use crate::store::credential::CredentialStore;
use crate::store::kv::KeyValueStore;
use crate::store::progress_store::ProgressStore;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;
use crate::worker::GenerationWorker;

/// Overlay asking for a provider API key. The underlying screen is kept.
pub struct CredentialPrompt {
    pub input: LineInput,
    /// Why the prompt opened, e.g. the provider's rejection message.
    pub notice: Option<String>,
}

pub struct App {
    pub screen: Screen,
    pub progress: ProgressRecord,
    pub config: Config,
    pub theme: &'static Theme,
    pub catalog: &'static [Level],
    pub should_quit: bool,
    pub dashboard_selected: usize,
    /// Row in the level detail list; the quiz is the row after the lessons.
    pub level_selected: usize,
    pub lesson_page: Option<LessonPage>,
    pub quiz_page: Option<QuizPage>,
    pub credential_prompt: Option<CredentialPrompt>,
    pub confirm_reset: bool,
    /// One-line message shown in the footer until the next key press.
    pub status: Option<String>,
    store: ProgressStore,
    credentials: CredentialStore,
    worker: GenerationWorker,
    tracker: RequestTracker,
}

impl App {
    pub fn new(
        config: Config,
        theme: &'static Theme,
        kv: Arc<dyn KeyValueStore>,
        provider: Box<dyn ContentProvider>,
        tx: Sender<AppEvent>,
    ) -> Self {
        let catalog = COURSE;
        let store = ProgressStore::new(Arc::clone(&kv), catalog);
        let credentials = CredentialStore::new(kv);
        let client = GenerationClient::new(provider, credentials.clone(), &config.content_language);
        let worker = GenerationWorker::new(Arc::new(client), tx);
        let progress = store.load();
        info!(
            lessons = progress.completed_lessons.len(),
            quizzes = progress.completed_quizzes.len(),
            "progress loaded"
        );

        Self {
            screen: Screen::default(),
            progress,
            config,
            theme,
            catalog,
            should_quit: false,
            dashboard_selected: 0,
            level_selected: 0,
            lesson_page: None,
            quiz_page: None,
            credential_prompt: None,
            confirm_reset: false,
            status: None,
            store,
            credentials,
            worker,
            tracker: RequestTracker::new(),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.credentials.api_key().is_some()
    }

    // --- Navigation ---

    /// Run one navigation action: transition, apply and save any progress
    /// event, then set up the screen that was entered.
    pub fn navigate(&mut self, action: NavAction) {
        let t = navigation::transition(self.screen, action, &self.progress);

        if let Some(event) = &t.event {
            self.progress = self.progress.apply(self.catalog, event);
            self.store.commit(&self.progress);
            info!(?event, "progress updated");
        }

        if t.screen == self.screen {
            return;
        }
        debug!(from = self.screen.name(), to = t.screen.name(), "screen change");
        let from = self.screen;
        self.leave_screen();
        self.screen = t.screen;
        self.enter_screen(from);
    }

    fn leave_screen(&mut self) {
        if matches!(self.screen, Screen::Lesson { .. } | Screen::Quiz { .. }) {
            self.tracker.invalidate();
            self.lesson_page = None;
            self.quiz_page = None;
        }
    }

    fn enter_screen(&mut self, from: Screen) {
        match self.screen {
            Screen::Dashboard => {}
            Screen::LevelDetail { level } => {
                if from == Screen::Dashboard {
                    self.level_selected = 0;
                } else if let Screen::Lesson { lesson, .. } = from
                    && let Some(idx) = level.lessons.iter().position(|l| l.id == lesson.id)
                {
                    // Move on to the next row after finishing or leaving a lesson
                    self.level_selected = (idx + 1).min(level.lessons.len());
                }
            }
            Screen::Lesson { lesson, .. } => {
                let token = self.tracker.issue();
                self.lesson_page = Some(LessonPage::new(lesson, token));
                self.worker.request_lesson(token, lesson.topic);
            }
            Screen::Quiz { quiz, .. } => {
                let token = self.tracker.issue();
                self.quiz_page = Some(QuizPage::new(quiz, token));
                self.worker
                    .request_quiz(token, quiz.topic, quiz.question_count);
            }
        }
    }

    pub fn go_back(&mut self) {
        self.navigate(NavAction::Back);
    }

    pub fn dashboard_up(&mut self) {
        self.dashboard_selected = self.dashboard_selected.saturating_sub(1);
    }

    pub fn dashboard_down(&mut self) {
        if self.dashboard_selected + 1 < self.catalog.len() {
            self.dashboard_selected += 1;
        }
    }

    pub fn open_selected_level(&mut self) {
        let Some(level) = self.catalog.get(self.dashboard_selected) else {
            return;
        };
        self.navigate(NavAction::SelectLevel(level));
        if self.screen == Screen::Dashboard {
            self.status = Some(format!(
                "{} is locked. Pass the previous level's quiz first.",
                level.title
            ));
        }
    }

    pub fn level_up(&mut self) {
        self.level_selected = self.level_selected.saturating_sub(1);
    }

    pub fn level_down(&mut self) {
        if let Screen::LevelDetail { level } = self.screen
            && self.level_selected < level.lessons.len()
        {
            self.level_selected += 1;
        }
    }

    pub fn open_selected_item(&mut self) {
        let Screen::LevelDetail { level } = self.screen else {
            return;
        };
        match level.lessons.get(self.level_selected) {
            Some(lesson) => self.navigate(NavAction::SelectLesson(lesson)),
            None => self.navigate(NavAction::SelectQuiz),
        }
    }

    /// Mark the open lesson done. Only offered once its content has loaded.
    pub fn complete_lesson(&mut self) {
        let loaded = self
            .lesson_page
            .as_ref()
            .is_some_and(|p| p.content.ready().is_some());
        if loaded {
            self.navigate(NavAction::CompleteLesson);
        }
    }

    /// Record the finished quiz and return to the level.
    pub fn finish_quiz(&mut self) {
        let Some((score, passed)) = self
            .quiz_page
            .as_ref()
            .and_then(|p| p.final_result(self.config.passing_score))
        else {
            return;
        };
        self.navigate(NavAction::CompleteQuiz { score, passed });
        self.status = Some(if passed {
            format!("Quiz passed with {score}%.")
        } else {
            format!(
                "Scored {score}%. You need {}% to pass.",
                self.config.passing_score
            )
        });
    }

    /// Re-request the content of a lesson or quiz that failed to load.
    pub fn retry(&mut self) {
        match self.screen {
            Screen::Lesson { lesson, .. } => {
                let Some(page) = self.lesson_page.as_mut() else {
                    return;
                };
                if !matches!(page.content, LoadState::Failed(_)) {
                    return;
                }
                let token = self.tracker.issue();
                page.restart(token);
                self.worker.request_lesson(token, lesson.topic);
            }
            Screen::Quiz { quiz, .. } => {
                let Some(page) = self.quiz_page.as_mut() else {
                    return;
                };
                if !matches!(page.attempt, LoadState::Failed(_)) {
                    return;
                }
                let token = self.tracker.issue();
                page.restart(token);
                self.worker
                    .request_quiz(token, quiz.topic, quiz.question_count);
            }
            _ => {}
        }
    }

    // --- Generation results ---

    pub fn handle_generated(&mut self, outcome: GenerationOutcome) {
        if !self.tracker.is_current(outcome.token) {
            debug!(
                token = outcome.token.value(),
                kind = outcome.payload.kind(),
                "discarding stale generation result"
            );
            return;
        }

        match outcome.payload {
            GenerationPayload::Lesson(result) => {
                self.note_credential_failure(&result);
                let with_images = self.config.generate_images;
                let Some(page) = self.lesson_page.as_mut() else {
                    return;
                };
                let prompts = page.receive_lesson(result, with_images);
                for (section, prompt) in prompts {
                    self.worker.request_image(outcome.token, section, prompt);
                }
            }
            GenerationPayload::Quiz(result) => {
                self.note_credential_failure(&result);
                if let Some(page) = self.quiz_page.as_mut() {
                    page.receive_quiz(result);
                }
            }
            GenerationPayload::Image { section, result } => {
                if let Err(e) = &result {
                    warn!(section, error = %e, "illustration unavailable");
                }
                self.note_credential_failure(&result);
                if let Some(page) = self.lesson_page.as_mut() {
                    page.receive_image(section, result);
                }
            }
        }
    }

    fn note_credential_failure<T>(&mut self, result: &Result<T, GenerationError>) {
        if let Err(e) = result
            && e.is_invalid_credential()
        {
            warn!(error = %e, "API key missing or rejected");
            // Several illustrations can fail at once; keep what the user typed.
            match self.credential_prompt.as_mut() {
                Some(prompt) => prompt.notice = Some(e.to_string()),
                None => self.open_credential_prompt(Some(e.to_string())),
            }
        }
    }

    // --- Credential prompt ---

    pub fn open_credential_prompt(&mut self, notice: Option<String>) {
        self.credential_prompt = Some(CredentialPrompt {
            input: LineInput::masked(),
            notice,
        });
    }

    pub fn cancel_credential_prompt(&mut self) {
        self.credential_prompt = None;
    }

    /// Store the entered key. Blank input keeps the prompt open. Nothing is
    /// retried automatically; the user presses `r` on a failed screen.
    pub fn submit_credential(&mut self) {
        let Some(prompt) = self.credential_prompt.as_mut() else {
            return;
        };
        let key = prompt.input.value().trim().to_string();
        if key.is_empty() {
            prompt.notice = Some("The API key cannot be empty.".to_string());
            return;
        }
        self.credential_prompt = None;
        match self.credentials.set_api_key(&key) {
            Ok(()) => {
                info!("API key saved");
                self.status = Some(if self.has_failed_content() {
                    "API key saved. Press r to retry.".to_string()
                } else {
                    "API key saved.".to_string()
                });
            }
            Err(e) => {
                warn!(error = %e, "failed to save API key");
                self.status = Some(format!("Could not save the API key: {e}"));
            }
        }
    }

    fn has_failed_content(&self) -> bool {
        self.lesson_page
            .as_ref()
            .is_some_and(|p| matches!(p.content, LoadState::Failed(_)))
            || self
                .quiz_page
                .as_ref()
                .is_some_and(|p| matches!(p.attempt, LoadState::Failed(_)))
    }

    // --- Reset ---

    pub fn request_reset(&mut self) {
        if self.screen == Screen::Dashboard {
            self.confirm_reset = true;
        }
    }

    pub fn cancel_reset(&mut self) {
        self.confirm_reset = false;
    }

    pub fn confirm_reset(&mut self) {
        if !self.confirm_reset {
            return;
        }
        self.confirm_reset = false;
        self.progress = self.store.reset();
        self.dashboard_selected = 0;
        self.status = Some("Progress reset.".to_string());
    }

    pub fn progress_store(&self) -> &ProgressStore {
        &self.store
    }
}
