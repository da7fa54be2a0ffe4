use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::catalog::Level;
use crate::engine::progress::ProgressRecord;
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::theme::Theme;

/// Overall progress and one card per level.
pub struct CourseDashboard<'a> {
    pub catalog: &'a [Level],
    pub progress: &'a ProgressRecord,
    pub selected: usize,
    pub has_api_key: bool,
    pub theme: &'a Theme,
}

const CARD_HEIGHT: u16 = 4;

impl Widget for CourseDashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(area);

        ProgressBar::new(self.progress.overall_percent(self.catalog), self.theme)
            .titled("Course progress")
            .render(layout[0], buf);

        let key_line = if self.has_api_key {
            Line::from(Span::styled(
                "  API key configured  [a] change",
                Style::default().fg(colors.text_muted()),
            ))
        } else {
            Line::from(Span::styled(
                "  No API key yet: lessons will ask for one.  [a] enter key",
                Style::default().fg(colors.warning()),
            ))
        };
        Paragraph::new(key_line).render(layout[1], buf);

        // Keep the selected card visible
        let visible = (layout[2].height / CARD_HEIGHT).max(1) as usize;
        let first = self.selected.saturating_sub(visible - 1);

        let mut y = layout[2].y;
        for (idx, level) in self.catalog.iter().enumerate().skip(first).take(visible) {
            let card = Rect::new(layout[2].x, y, layout[2].width, CARD_HEIGHT);
            if card.bottom() > layout[2].bottom() {
                break;
            }
            LevelCard {
                level,
                progress: self.progress,
                selected: idx == self.selected,
                theme: self.theme,
            }
            .render(card, buf);
            y += CARD_HEIGHT;
        }
    }
}

struct LevelCard<'a> {
    level: &'a Level,
    progress: &'a ProgressRecord,
    selected: bool,
    theme: &'a Theme,
}

impl Widget for LevelCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let summary = self.progress.level_summary(self.level);

        let border = if self.selected {
            colors.border_focused()
        } else {
            colors.border()
        };
        let title_style = if !summary.unlocked {
            Style::default().fg(colors.locked())
        } else if self.selected {
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.fg())
        };

        let status = if !summary.unlocked {
            Span::styled(" locked ", Style::default().fg(colors.locked()))
        } else if summary.is_complete() {
            Span::styled(" complete ", Style::default().fg(colors.success()))
        } else {
            Span::styled(
                format!(" {}% ", summary.percent()),
                Style::default().fg(colors.accent()),
            )
        };

        let mut block = Block::bordered()
            .title(Span::styled(format!(" {} ", self.level.title), title_style))
            .title_bottom(Line::from(status).right_aligned())
            .border_style(Style::default().fg(border));
        if self.selected {
            block = block.style(Style::default().bg(colors.selection_bg()));
        }
        let inner = block.inner(area);
        block.render(area, buf);

        let text_color = if summary.unlocked {
            colors.fg()
        } else {
            colors.locked()
        };
        let mut detail = vec![Span::styled(
            self.level.description,
            Style::default().fg(text_color),
        )];
        if summary.unlocked {
            let quiz = match summary.quiz {
                Some(r) if r.passed => format!("quiz passed ({}%)", r.score),
                Some(r) => format!("quiz {}%", r.score),
                None => "quiz pending".to_string(),
            };
            detail.push(Span::styled(
                format!("  {}/{} lessons, {quiz}", summary.lessons_done, self.level.lessons.len()),
                Style::default().fg(colors.text_muted()),
            ));
        }
        Paragraph::new(Line::from(detail))
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
