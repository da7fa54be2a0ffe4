use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::catalog::Level;
use crate::engine::progress::ProgressRecord;
use crate::ui::theme::Theme;

/// The lessons of one level followed by its quiz.
pub struct LevelDetail<'a> {
    pub level: &'a Level,
    pub progress: &'a ProgressRecord,
    pub selected: usize,
    pub passing_score: u32,
    pub theme: &'a Theme,
}

impl Widget for LevelDetail<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.level.title))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = vec![
            Line::from(Span::styled(
                self.level.description,
                Style::default().fg(colors.text_muted()),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Lessons",
                Style::default()
                    .fg(colors.heading())
                    .add_modifier(Modifier::BOLD),
            )),
        ];

        for (idx, lesson) in self.level.lessons.iter().enumerate() {
            let done = self.progress.is_lesson_completed(lesson.id);
            let (mark, mark_color) = if done {
                ("\u{2713}", colors.success())
            } else {
                ("\u{00b7}", colors.text_muted())
            };
            lines.push(self.row(idx, mark, mark_color, lesson.title.to_string()));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Final quiz",
            Style::default()
                .fg(colors.heading())
                .add_modifier(Modifier::BOLD),
        )));

        let quiz_row = self.level.lessons.len();
        let (mark, mark_color, label) = match self.progress.quiz_result(self.level.quiz.id) {
            Some(r) if r.passed => (
                "\u{2713}",
                colors.success(),
                format!("Level quiz: passed with {}%", r.score),
            ),
            Some(r) => (
                "\u{2717}",
                colors.error(),
                format!(
                    "Level quiz: {}% (need {}%), try again",
                    r.score, self.passing_score
                ),
            ),
            None => (
                "\u{00b7}",
                colors.text_muted(),
                format!(
                    "Level quiz: {} questions, pass with {}%",
                    self.level.quiz.question_count, self.passing_score
                ),
            ),
        };
        lines.push(self.row(quiz_row, mark, mark_color, label));

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

impl LevelDetail<'_> {
    fn row(
        &self,
        idx: usize,
        mark: &'static str,
        mark_color: ratatui::style::Color,
        label: String,
    ) -> Line<'static> {
        let colors = &self.theme.colors;
        let selected = idx == self.selected;
        let pointer = if selected { " \u{25b6} " } else { "   " };
        let label_style = if selected {
            Style::default()
                .fg(colors.accent())
                .bg(colors.selection_bg())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.fg())
        };
        Line::from(vec![
            Span::styled(pointer, Style::default().fg(colors.accent())),
            Span::styled(format!("{mark} "), Style::default().fg(mark_color)),
            Span::styled(label, label_style),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::COURSE;

    fn render_text(progress: &ProgressRecord) -> String {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 90, 20);
        let mut buf = Buffer::empty(area);
        LevelDetail {
            level: &COURSE[0],
            progress,
            selected: 0,
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

    #[test]
    fn test_lists_lessons_and_quiz() {
        let text = render_text(&ProgressRecord::new(COURSE));
        for lesson in COURSE[0].lessons {
            assert!(text.contains(lesson.title));
        }
        assert!(text.contains("pass with 70%"));
    }

    #[test]
    fn test_failed_quiz_shows_score() {
        let progress = ProgressRecord::new(COURSE).complete_quiz(COURSE, "q1", 40, false, "level-1");
        let text = render_text(&progress);
        assert!(text.contains("40% (need 70%)"));
    }
}
