mod app;
mod catalog;
mod config;
mod engine;
mod event;
mod generator;
mod session;
mod store;
mod ui;
mod worker;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Result, bail};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use app::App;
use catalog::COURSE;
use config::Config;
use engine::navigation::Screen;
use event::{AppEvent, EventHandler};
use generator::gemini::{GeminiProvider, GeminiSettings};
use store::credential::CredentialStore;
use store::kv::{FileStore, KeyValueStore};
use store::progress_store::ProgressStore;
use ui::components::course_dashboard::CourseDashboard;
use ui::components::lesson_view::LessonView;
use ui::components::level_detail::LevelDetail;
use ui::components::popup::{ConfirmPopup, CredentialPopup};
use ui::components::quiz_view::QuizView;
use ui::layout::{AppLayout, pack_hint_lines};
use ui::line_input::InputResult;
use ui::theme::Theme;

#[derive(Parser)]
#[command(name = "biquest", version, about = "Terminal Power BI course with AI-generated lessons and quizzes")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Directory for progress, credentials and logs")]
    data_dir: Option<PathBuf>,

    #[arg(long, help = "Store this Gemini API key and continue")]
    api_key: Option<String>,

    #[arg(long, conflicts_with = "api_key", help = "Delete the stored Gemini API key")]
    forget_api_key: bool,

    #[arg(long, help = "Erase all course progress (requires --yes)")]
    reset_progress: bool,

    #[arg(short, long, help = "Confirm destructive actions")]
    yes: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = cli.data_dir.clone().unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("biquest")
    });
    init_logging(&data_dir)?;

    let mut config = Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "config unreadable, using defaults");
        Config::default()
    });
    if let Some(theme_name) = &cli.theme {
        config.theme = theme_name.clone();
    }
    config.validate();

    let kv: Arc<dyn KeyValueStore> = Arc::new(FileStore::with_base_dir(data_dir.clone())?);

    if let Some(key) = &cli.api_key {
        CredentialStore::new(Arc::clone(&kv)).set_api_key(key)?;
        info!("API key stored from command line");
    }
    if cli.forget_api_key {
        CredentialStore::new(Arc::clone(&kv)).clear()?;
        info!("API key removed from command line");
    }
    if cli.reset_progress {
        if !cli.yes {
            bail!("--reset-progress erases all progress; pass --yes to confirm");
        }
        ProgressStore::new(Arc::clone(&kv), COURSE).reset();
        println!("Progress reset.");
        return Ok(());
    }

    let theme: &'static Theme =
        Box::leak(Box::new(Theme::load(&config.theme).unwrap_or_default()));
    let provider = GeminiProvider::new(GeminiSettings::from_config(&config))?;
    let events = EventHandler::new(Duration::from_millis(100));
    let mut app = App::new(config, theme, kv, Box::new(provider), events.sender());
    info!(data_dir = %data_dir.display(), "starting");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

/// The terminal belongs to the UI, so logs go to a file in the data dir.
fn init_logging(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("biquest.log"))?;
    let filter = EnvFilter::try_from_env("BIQUEST_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Generated(outcome) => app.handle_generated(outcome),
            AppEvent::Tick | AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.credential_prompt.is_some() {
        handle_credential_key(app, key);
        return;
    }
    if app.confirm_reset {
        handle_confirm_reset_key(app, key);
        return;
    }

    app.status = None;
    match app.screen {
        Screen::Dashboard => handle_dashboard_key(app, key),
        Screen::LevelDetail { .. } => handle_level_key(app, key),
        Screen::Lesson { .. } => handle_lesson_key(app, key),
        Screen::Quiz { .. } => handle_quiz_key(app, key),
    }
}

fn handle_credential_key(app: &mut App, key: KeyEvent) {
    let Some(prompt) = app.credential_prompt.as_mut() else {
        return;
    };
    match prompt.input.handle(key) {
        InputResult::Submit => app.submit_credential(),
        InputResult::Cancel => app.cancel_credential_prompt(),
        InputResult::Continue => {}
    }
}

fn handle_confirm_reset_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_reset(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_reset(),
        _ => {}
    }
}

fn handle_dashboard_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.dashboard_up(),
        KeyCode::Down | KeyCode::Char('j') => app.dashboard_down(),
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Right | KeyCode::Char('l') => {
            app.open_selected_level()
        }
        KeyCode::Char(ch @ '1'..='9') => {
            let idx = ch as usize - '1' as usize;
            if idx < app.catalog.len() {
                app.dashboard_selected = idx;
                app.open_selected_level();
            }
        }
        KeyCode::Char('a') => app.open_credential_prompt(None),
        KeyCode::Char('x') => app.request_reset(),
        _ => {}
    }
}

fn handle_level_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => app.go_back(),
        KeyCode::Up | KeyCode::Char('k') => app.level_up(),
        KeyCode::Down | KeyCode::Char('j') => app.level_down(),
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Right | KeyCode::Char('l') => {
            app.open_selected_item()
        }
        _ => {}
    }
}

fn handle_lesson_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace => app.go_back(),
        KeyCode::Char('c') | KeyCode::Enter => app.complete_lesson(),
        KeyCode::Char('r') => app.retry(),
        KeyCode::Char('a') => app.open_credential_prompt(None),
        KeyCode::Down | KeyCode::Char('j') => scroll_lesson(app, 1, true),
        KeyCode::Up | KeyCode::Char('k') => scroll_lesson(app, 1, false),
        KeyCode::PageDown | KeyCode::Char(' ') => scroll_lesson(app, 10, true),
        KeyCode::PageUp => scroll_lesson(app, 10, false),
        KeyCode::Home => scroll_lesson(app, u16::MAX, false),
        _ => {}
    }
}

fn scroll_lesson(app: &mut App, lines: u16, down: bool) {
    if let Some(page) = app.lesson_page.as_mut() {
        if down {
            page.scroll_down(lines);
        } else {
            page.scroll_up(lines);
        }
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        app.go_back();
        return;
    }

    let passing_score = app.config.passing_score;
    let Some(page) = app.quiz_page.as_mut() else {
        return;
    };
    if page.final_result(passing_score).is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
            app.finish_quiz();
        }
        return;
    }
    let answered = page
        .attempt
        .ready()
        .is_some_and(|attempt| attempt.feedback_shown());

    match key.code {
        KeyCode::Char('r') => app.retry(),
        KeyCode::Char('a') => app.open_credential_prompt(None),
        KeyCode::Enter | KeyCode::Char(' ') if answered => page.advance(),
        KeyCode::Enter | KeyCode::Char(' ') => {
            page.select_cursor();
        }
        KeyCode::Up | KeyCode::Char('k') => page.cursor_up(),
        KeyCode::Down | KeyCode::Char('j') => page.cursor_down(),
        KeyCode::Char(ch @ '1'..='4') => {
            page.select(ch as usize - '1' as usize);
        }
        _ => {}
    }
}

// --- Rendering ---

fn render(frame: &mut ratatui::Frame, app: &mut App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let mut footer_lines: Vec<Line> = Vec::new();
    if let Some(status) = &app.status {
        footer_lines.push(Line::from(Span::styled(
            format!("  {status}"),
            Style::default().fg(colors.warning()),
        )));
    }
    for hint in pack_hint_lines(&screen_hints(app), area.width as usize) {
        footer_lines.push(Line::from(Span::styled(
            hint,
            Style::default().fg(colors.text_muted()),
        )));
    }
    let layout = AppLayout::new(area, footer_lines.len() as u16);

    render_header(frame, app, layout.header);

    match app.screen {
        Screen::Dashboard => frame.render_widget(
            CourseDashboard {
                catalog: app.catalog,
                progress: &app.progress,
                selected: app.dashboard_selected,
                has_api_key: app.has_api_key(),
                theme: app.theme,
            },
            layout.main,
        ),
        Screen::LevelDetail { level } => frame.render_widget(
            LevelDetail {
                level,
                progress: &app.progress,
                selected: app.level_selected,
                passing_score: app.config.passing_score,
                theme: app.theme,
            },
            layout.main,
        ),
        Screen::Lesson { .. } => {
            if let Some(page) = app.lesson_page.as_mut() {
                let limit = LessonView {
                    page,
                    theme: app.theme,
                }
                .max_scroll(layout.main);
                page.set_scroll_limit(limit);
                frame.render_widget(
                    LessonView {
                        page,
                        theme: app.theme,
                    },
                    layout.main,
                );
            }
        }
        Screen::Quiz { .. } => {
            if let Some(page) = &app.quiz_page {
                frame.render_widget(
                    QuizView {
                        page,
                        passing_score: app.config.passing_score,
                        theme: app.theme,
                    },
                    layout.main,
                );
            }
        }
    }

    frame.render_widget(Paragraph::new(footer_lines), layout.footer);

    if app.confirm_reset {
        frame.render_widget(
            ConfirmPopup {
                title: "Reset progress",
                message: "Erase all completed lessons, quiz results and unlocked levels?",
                theme: app.theme,
            },
            area,
        );
    }
    if let Some(prompt) = &app.credential_prompt {
        frame.render_widget(
            CredentialPopup {
                input: &prompt.input,
                notice: prompt.notice.as_deref(),
                theme: app.theme,
            },
            area,
        );
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;

    let location = match app.screen {
        Screen::Dashboard => "Course".to_string(),
        Screen::LevelDetail { level } => level.title.to_string(),
        Screen::Lesson { lesson, level } => format!("{} / {}", level.title, lesson.title),
        Screen::Quiz { level, .. } => format!("{} / Quiz", level.title),
    };
    let header_info = format!(
        " {location} | {}% complete",
        app.progress.overall_percent(app.catalog)
    );
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " BIQuest ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            header_info,
            Style::default()
                .fg(colors.text_muted())
                .bg(colors.header_bg()),
        ),
    ]))
    .block(Block::bordered().border_style(Style::default().fg(colors.border())))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn screen_hints(app: &App) -> Vec<&'static str> {
    match app.screen {
        Screen::Dashboard => vec![
            "[\u{2191}\u{2193}] Select",
            "[Enter] Open level",
            "[a] API key",
            "[x] Reset progress",
            "[q] Quit",
        ],
        Screen::LevelDetail { .. } => vec!["[\u{2191}\u{2193}] Select", "[Enter] Start", "[Esc] Back", "[q] Quit"],
        Screen::Lesson { .. } => {
            let ready = app
                .lesson_page
                .as_ref()
                .is_some_and(|p| p.content.ready().is_some());
            if ready {
                vec!["[\u{2191}\u{2193}/PgUp/PgDn] Scroll", "[c] Mark complete", "[Esc] Back"]
            } else {
                vec!["[r] Retry on failure", "[a] API key", "[Esc] Back"]
            }
        }
        Screen::Quiz { .. } => vec![
            "[\u{2191}\u{2193}] Choose",
            "[1-4] Answer",
            "[Enter] Confirm / Next",
            "[Esc] Leave quiz",
        ],
    }
}
