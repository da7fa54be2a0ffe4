use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use biquest::app::App;
use biquest::catalog::COURSE;
use biquest::config::Config;
use biquest::engine::navigation::{NavAction, Screen};
use biquest::engine::progress::ProgressRecord;
use biquest::event::AppEvent;
use biquest::generator::content::ImageData;
use biquest::generator::error::GenerationError;
use biquest::generator::{ContentProvider, ContentRequest};
use biquest::session::lesson_page::LoadState;
use biquest::store::credential::CredentialStore;
use biquest::store::kv::{FileStore, KeyValueStore, MemoryStore};
use biquest::store::progress_store::ProgressStore;
use biquest::ui::theme::Theme;
use tempfile::TempDir;

const QUIZ_ALL_FIRST: &str = r#"{
    "title": "Quiz",
    "questions": [
        {"questionText": "1", "options": ["a","b","c","d"], "correctAnswerIndex": 0, "explanation": ""},
        {"questionText": "2", "options": ["a","b","c","d"], "correctAnswerIndex": 0, "explanation": ""},
        {"questionText": "3", "options": ["a","b","c","d"], "correctAnswerIndex": 0, "explanation": ""},
        {"questionText": "4", "options": ["a","b","c","d"], "correctAnswerIndex": 0, "explanation": ""},
        {"questionText": "5", "options": ["a","b","c","d"], "correctAnswerIndex": 0, "explanation": ""}
    ]
}"#;

const LESSON: &str = r#"{
    "title": "Lesson",
    "introduction": "Intro",
    "sections": [{"heading": "One", "content": "Body", "imagePrompt": "   "}],
    "conclusion": "End"
}"#;

/// Answers every text request with one fixed body, or fails every request
/// with a rejected-key error.
struct ScriptedProvider {
    body: Mutex<String>,
    reject_key: bool,
    calls: Mutex<usize>,
}

impl ScriptedProvider {
    fn answering(body: &str) -> Arc<Self> {
        Arc::new(Self {
            body: Mutex::new(body.to_string()),
            reject_key: false,
            calls: Mutex::new(0),
        })
    }

    fn rejecting() -> Arc<Self> {
        Arc::new(Self {
            body: Mutex::new(String::new()),
            reject_key: true,
            calls: Mutex::new(0),
        })
    }
}

struct Shared(Arc<ScriptedProvider>);

impl ContentProvider for Shared {
    fn generate_json(&self, _api_key: &str, _request: &ContentRequest) -> Result<String, GenerationError> {
        *self.0.calls.lock().unwrap() += 1;
        if self.0.reject_key {
            return Err(GenerationError::InvalidCredential("API key not valid. Please pass a valid API key.".into()));
        }
        Ok(self.0.body.lock().unwrap().clone())
    }

    fn generate_image(&self, _api_key: &str, _prompt: &str) -> Result<ImageData, GenerationError> {
        Err(GenerationError::Provider("no images in tests".into()))
    }
}

fn make_app(kv: Arc<dyn KeyValueStore>, provider: Arc<ScriptedProvider>) -> (App, Receiver<AppEvent>) {
    let (tx, rx) = mpsc::channel();
    let theme: &'static Theme = Box::leak(Box::new(Theme::default()));
    let app = App::new(Config::default(), theme, kv, Box::new(Shared(provider)), tx);
    (app, rx)
}

fn pump(app: &mut App, rx: &Receiver<AppEvent>) {
    match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
        AppEvent::Generated(outcome) => app.handle_generated(outcome),
        _ => panic!("expected a generation outcome"),
    }
}

/// Open `level`'s quiz, answer `correct` of five questions right and save.
fn take_quiz(app: &mut App, rx: &Receiver<AppEvent>, level: usize, correct: usize) {
    app.navigate(NavAction::SelectLevel(&COURSE[level]));
    app.navigate(NavAction::SelectQuiz);
    pump(app, rx);
    let page = app.quiz_page.as_mut().unwrap();
    for i in 0..5 {
        page.select(if i < correct { 0 } else { 1 });
        page.advance();
    }
    app.finish_quiz();
    app.go_back();
}

#[test]
fn pass_unlocks_next_and_fail_keeps_it_locked() {
    let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    CredentialStore::new(Arc::clone(&kv)).set_api_key("key").unwrap();
    let (mut app, rx) = make_app(Arc::clone(&kv), ScriptedProvider::answering(QUIZ_ALL_FIRST));

    take_quiz(&mut app, &rx, 0, 5);
    assert!(app.progress.is_level_unlocked("level-2"));
    assert_eq!(app.progress.quiz_result("q1").unwrap().score, 100);

    // 3/5 = 60% is below the default 70% threshold
    take_quiz(&mut app, &rx, 1, 3);
    let q2 = app.progress.quiz_result("q2").unwrap();
    assert_eq!(q2.score, 60);
    assert!(!q2.passed);
    assert!(!app.progress.is_level_unlocked("level-3"));

    assert_eq!(app.screen, Screen::Dashboard);
    app.navigate(NavAction::SelectLevel(&COURSE[2]));
    assert_eq!(app.screen, Screen::Dashboard);

    // A later failing retake of q1 keeps level-2 open
    take_quiz(&mut app, &rx, 0, 0);
    assert!(!app.progress.quiz_result("q1").unwrap().passed);
    assert!(app.progress.is_level_unlocked("level-2"));

    let saved = ProgressStore::new(kv, COURSE).load();
    assert_eq!(saved, app.progress);
}

#[test]
fn rejected_key_opens_prompt_and_leaves_progress_alone() {
    let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    CredentialStore::new(Arc::clone(&kv)).set_api_key("stale-key").unwrap();
    let provider = ScriptedProvider::rejecting();
    let (mut app, rx) = make_app(Arc::clone(&kv), Arc::clone(&provider));
    let before = app.progress.clone();

    app.navigate(NavAction::SelectLevel(&COURSE[0]));
    app.navigate(NavAction::SelectLesson(&COURSE[0].lessons[0]));
    pump(&mut app, &rx);

    assert!(app.credential_prompt.is_some());
    let notice = app.credential_prompt.as_ref().unwrap().notice.clone().unwrap();
    assert!(notice.contains("API key not valid"));
    assert!(matches!(app.lesson_page.as_ref().unwrap().content, LoadState::Failed(_)));
    assert_eq!(app.progress, before);
    assert_eq!(*provider.calls.lock().unwrap(), 1);

    // Completing is not possible without content
    app.complete_lesson();
    assert!(!app.progress.is_lesson_completed("l1-1"));
}

#[test]
fn lesson_completion_survives_restart() {
    let dir = TempDir::new().unwrap();
    let kv: Arc<dyn KeyValueStore> =
        Arc::new(FileStore::with_base_dir(dir.path().to_path_buf()).unwrap());
    CredentialStore::new(Arc::clone(&kv)).set_api_key("key").unwrap();

    {
        let (mut app, rx) = make_app(Arc::clone(&kv), ScriptedProvider::answering(LESSON));
        app.navigate(NavAction::SelectLevel(&COURSE[0]));
        app.navigate(NavAction::SelectLesson(&COURSE[0].lessons[1]));
        pump(&mut app, &rx);
        // Blank image prompt means no illustration slot
        assert!(app.lesson_page.as_ref().unwrap().images.is_empty());
        app.complete_lesson();
        app.complete_lesson();
    }

    let (app, _rx) = make_app(kv, ScriptedProvider::answering(LESSON));
    assert!(app.progress.is_lesson_completed("l1-2"));
    assert_eq!(app.progress.completed_lessons.len(), 1);
    assert_eq!(app.progress.unlocked_levels.len(), 1);
}

#[test]
fn corrupt_progress_file_starts_fresh() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("progress.json"), "{{{").unwrap();
    let kv: Arc<dyn KeyValueStore> =
        Arc::new(FileStore::with_base_dir(dir.path().to_path_buf()).unwrap());
    let (app, _rx) = make_app(kv, ScriptedProvider::answering(LESSON));
    assert_eq!(app.progress, ProgressRecord::new(COURSE));
}
