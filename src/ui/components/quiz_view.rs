use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::engine::quiz_attempt::QuizAttempt;
use crate::session::lesson_page::LoadState;
use crate::session::quiz_page::QuizPage;
use crate::ui::theme::Theme;

pub struct QuizView<'a> {
    pub page: &'a QuizPage,
    pub passing_score: u32,
    pub theme: &'a Theme,
}

impl Widget for QuizView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let title = match self.page.attempt.ready() {
            Some(attempt) if !attempt.show_results => format!(
                " {} - question {}/{} ",
                attempt.quiz.title,
                attempt.current + 1,
                attempt.total()
            ),
            Some(attempt) => format!(" {} - results ", attempt.quiz.title),
            None => format!(" Quiz: {} ", self.page.quiz.topic),
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let lines = match &self.page.attempt {
            LoadState::Loading => vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  Generating quiz...",
                    Style::default().fg(colors.accent()),
                )),
            ],
            LoadState::Failed(message) => vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  The quiz could not be generated.",
                    Style::default()
                        .fg(colors.error())
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("  {message}"),
                    Style::default().fg(colors.error()),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "  [r] Retry  [Esc] Back",
                    Style::default().fg(colors.accent()),
                )),
            ],
            LoadState::Ready(attempt) if attempt.show_results => self.results_lines(attempt),
            LoadState::Ready(attempt) => self.question_lines(attempt),
        };

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

impl QuizView<'_> {
    fn question_lines(&self, attempt: &QuizAttempt) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let Some(question) = attempt.current_question() else {
            return Vec::new();
        };

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                question.question_text.clone(),
                Style::default()
                    .fg(colors.heading())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        for (idx, option) in question.options.iter().enumerate() {
            let label = format!("  {}. {option}", idx + 1);
            let style = match attempt.selected {
                // After answering: correct in green, a wrong pick in red
                Some(_) if idx == question.correct_answer_index => {
                    Style::default().fg(colors.success()).add_modifier(Modifier::BOLD)
                }
                Some(picked) if picked == idx => Style::default().fg(colors.error()),
                Some(_) => Style::default().fg(colors.text_muted()),
                None if idx == self.page.cursor => Style::default()
                    .fg(colors.accent())
                    .bg(colors.selection_bg())
                    .add_modifier(Modifier::BOLD),
                None => Style::default().fg(colors.fg()),
            };
            lines.push(Line::from(Span::styled(label, style)));
        }

        if let Some(correct) = attempt.selected_is_correct() {
            lines.push(Line::from(""));
            let (verdict, color) = if correct {
                ("Correct!", colors.success())
            } else {
                ("Not quite.", colors.error())
            };
            lines.push(Line::from(Span::styled(
                verdict,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                question.explanation.clone(),
                Style::default().fg(colors.fg()),
            )));
            lines.push(Line::from(""));
            let next = if attempt.is_last_question() {
                "[Enter] See results"
            } else {
                "[Enter] Next question"
            };
            lines.push(Line::from(Span::styled(
                next,
                Style::default().fg(colors.accent()),
            )));
        }
        lines
    }

    fn results_lines(&self, attempt: &QuizAttempt) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let score = attempt.score_percent();
        let passed = attempt.passed(self.passing_score);
        let (headline, color) = if passed {
            ("Congratulations, you passed!", colors.success())
        } else {
            ("Keep practicing.", colors.warning())
        };

        vec![
            Line::from(""),
            Line::from(Span::styled(
                headline,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Score: ", Style::default().fg(colors.fg())),
                Span::styled(
                    format!("{score}%"),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(
                        "  ({}/{} correct, {}% to pass)",
                        attempt.correct_count,
                        attempt.total(),
                        self.passing_score
                    ),
                    Style::default().fg(colors.text_muted()),
                ),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "[Enter] Save result and return to the level",
                Style::default().fg(colors.accent()),
            )),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::COURSE;
    use crate::generator::content::{QuizContent, QuizQuestion};
    use crate::session::request::RequestTracker;

    fn render(page: &QuizPage) -> String {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        QuizView {
            page,
            passing_score: 70,
            theme: &theme,
        }
        .render(area, &mut buf);
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn page() -> QuizPage {
        let mut page = QuizPage::new(&COURSE[0].quiz, RequestTracker::new().issue());
        page.receive_quiz(Ok(QuizContent {
            title: "Basics".into(),
            questions: vec![QuizQuestion {
                question_text: "What is DAX?".into(),
                options: vec!["A language".into(), "A chart".into(), "A file".into(), "A table".into()],
                correct_answer_index: 0,
                explanation: "DAX is a formula language.".into(),
            }],
        }));
        page
    }

    #[test]
    fn test_question_then_feedback_then_results() {
        let mut page = page();
        let text = render(&page);
        assert!(text.contains("question 1/1"));
        assert!(text.contains("1. A language"));

        page.select(1);
        let text = render(&page);
        assert!(text.contains("Not quite."));
        assert!(text.contains("formula language"));
        assert!(text.contains("See results"));

        page.advance();
        let text = render(&page);
        assert!(text.contains("Score: 0%"));
        assert!(text.contains("Keep practicing"));
    }
}
