use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::generator::content::LessonContent;
use crate::session::lesson_page::{ImageSlot, LessonPage, LoadState};
use crate::ui::layout::wrapped_line_count;
use crate::ui::theme::Theme;

pub struct LessonView<'a> {
    pub page: &'a LessonPage,
    pub theme: &'a Theme,
}

impl Widget for LessonView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.page.lesson.title))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.lines())
            .wrap(Wrap { trim: false })
            .scroll((self.page.scroll, 0))
            .render(inner, buf);
    }
}

impl LessonView<'_> {
    /// Furthest useful scroll offset when rendered into `area`.
    pub fn max_scroll(&self, area: Rect) -> u16 {
        let inner = Block::bordered().inner(area);
        let height: usize = self
            .lines()
            .iter()
            .map(|line| {
                let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
                wrapped_line_count(&text, inner.width as usize)
            })
            .sum();
        u16::try_from(height)
            .unwrap_or(u16::MAX)
            .saturating_sub(inner.height)
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        match &self.page.content {
            LoadState::Loading => vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  Generating lesson...",
                    Style::default().fg(colors.accent()),
                )),
                Line::from(Span::styled(
                    format!("  Topic: {}", self.page.lesson.topic),
                    Style::default().fg(colors.text_muted()),
                )),
            ],
            LoadState::Failed(message) => vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  The lesson could not be generated.",
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
            LoadState::Ready(content) => self.content_lines(content),
        }
    }

    fn content_lines(&self, content: &LessonContent) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let heading = Style::default()
            .fg(colors.heading())
            .add_modifier(Modifier::BOLD);
        let body = Style::default().fg(colors.fg());

        let mut lines = vec![
            Line::from(Span::styled(
                content.title.clone(),
                heading.add_modifier(Modifier::UNDERLINED),
            )),
            Line::from(""),
        ];
        push_text(&mut lines, &content.introduction, body);

        for (idx, section) in content.sections.iter().enumerate() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(section.heading.clone(), heading)));
            push_text(&mut lines, &section.content, body);

            if let Some(slot) = self.page.image(idx) {
                let (text, color) = match slot {
                    ImageSlot::Pending => ("[ generating illustration... ]".to_string(), colors.text_muted()),
                    ImageSlot::Ready(image) => (
                        format!(
                            "[ illustration ready: {}, {} KB ]",
                            image.mime_type,
                            image.approx_bytes().div_ceil(1024)
                        ),
                        colors.success(),
                    ),
                    ImageSlot::Failed => ("[ illustration unavailable ]".to_string(), colors.warning()),
                };
                lines.push(Line::from(Span::styled(text, Style::default().fg(color))));
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Summary", heading)));
        push_text(&mut lines, &content.conclusion, body);
        lines
    }
}

/// One styled line per source line; `#` heading markers and `**` emphasis
/// are stripped since the terminal shows plain text.
fn push_text(lines: &mut Vec<Line<'static>>, text: &str, style: Style) {
    for raw in text.lines() {
        let line = raw.trim_start_matches('#').trim_start().replace("**", "");
        lines.push(Line::from(Span::styled(line, style)));
    }
}
