use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use crate::ui::layout::centered_rect;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

/// Modal asking for the provider API key.
pub struct CredentialPopup<'a> {
    pub input: &'a LineInput,
    pub notice: Option<&'a str>,
    pub theme: &'a Theme,
}

impl Widget for CredentialPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let popup = centered_rect(60, 40, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(" Gemini API key ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(popup);
        block.render(popup, buf);

        let mut lines = vec![Line::from(Span::styled(
            "Lessons and quizzes are generated with Google Gemini. Paste your API key:",
            Style::default().fg(colors.fg()),
        ))];
        if let Some(notice) = self.notice {
            lines.push(Line::from(Span::styled(
                notice.to_string(),
                Style::default().fg(colors.error()),
            )));
        }
        lines.push(Line::from(""));

        let (before, at, after) = self.input.render_parts();
        let cursor_style = Style::default().fg(colors.bg()).bg(colors.fg());
        lines.push(Line::from(vec![
            Span::styled("> ", Style::default().fg(colors.accent())),
            Span::styled(before, Style::default().fg(colors.fg())),
            Span::styled(at.map(String::from).unwrap_or_else(|| " ".to_string()), cursor_style),
            Span::styled(after, Style::default().fg(colors.fg())),
        ]));
        lines.push(Line::from(""));
        let reveal = if self.input.is_masked() { "Show" } else { "Hide" };
        lines.push(Line::from(Span::styled(
            format!("[Enter] Save  [Esc] Cancel  [Ctrl+R] {reveal}  [Ctrl+U] Clear"),
            Style::default().fg(colors.text_muted()),
        )));

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

/// Yes/no confirmation for a destructive action.
pub struct ConfirmPopup<'a> {
    pub title: &'a str,
    pub message: &'a str,
    pub theme: &'a Theme,
}

impl Widget for ConfirmPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let popup = centered_rect(50, 30, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.warning()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(popup);
        block.render(popup, buf);

        let lines = vec![
            Line::from(Span::styled(self.message, Style::default().fg(colors.fg()))),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    "[y] Yes",
                    Style::default()
                        .fg(colors.error())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("   [n/Esc] No", Style::default().fg(colors.accent())),
            ]),
        ];
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
