use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

/// Horizontal completion bar with the percentage centered on it.
pub struct ProgressBar<'a> {
    pub label: Option<String>,
    pub percent: u32,
    pub theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(percent: u32, theme: &'a Theme) -> Self {
        Self {
            label: None,
            percent: percent.min(100),
            theme,
        }
    }

    /// Draw inside a bordered block titled `label`.
    pub fn titled(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let inner = match &self.label {
            Some(label) => {
                let block = Block::bordered()
                    .title(format!(" {label} "))
                    .border_style(Style::default().fg(colors.border()));
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let filled_width = (u32::from(inner.width) * self.percent / 100) as u16;
        let text = format!("{}%", self.percent);

        for x in inner.x..inner.x + inner.width {
            let style = if x < inner.x + filled_width {
                Style::default().fg(colors.bg()).bg(colors.bar_filled())
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, inner.y)].set_style(style);
        }

        let label_x = inner.x + (inner.width.saturating_sub(text.len() as u16)) / 2;
        buf.set_string(label_x, inner.y, &text, Style::default().fg(colors.fg()));
    }
}
