use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Submit,
    Cancel,
}

/// Single-line text field. When masked, rendering hides the characters.
pub struct LineInput {
    text: String,
    /// Cursor position as a char index (0 = before first char).
    cursor: usize,
    masked: bool,
}

const MASK: char = '•';

impl LineInput {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.chars().count(),
            masked: false,
        }
    }

    pub fn masked() -> Self {
        Self {
            masked: true,
            ..Self::new("")
        }
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn is_masked(&self) -> bool {
        self.masked
    }

    pub fn toggle_mask(&mut self) {
        self.masked = !self.masked;
    }

    /// Returns (before_cursor, cursor_char, after_cursor) for styled rendering,
    /// with mask characters substituted when masked.
    pub fn render_parts(&self) -> (String, Option<char>, String) {
        let shown: Vec<char> = if self.masked {
            self.text.chars().map(|_| MASK).collect()
        } else {
            self.text.chars().collect()
        };
        let before: String = shown[..self.cursor].iter().collect();
        let at = shown.get(self.cursor).copied();
        let after: String = shown
            .get(self.cursor + 1..)
            .map(|rest| rest.iter().collect())
            .unwrap_or_default();
        (before, at, after)
    }

    pub fn handle(&mut self, key: KeyEvent) -> InputResult {
        let len = self.text.chars().count();
        match key.code {
            KeyCode::Esc => return InputResult::Cancel,
            KeyCode::Enter => return InputResult::Submit,
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(len),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = len,
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.remove_char(self.cursor - 1);
                    self.cursor -= 1;
                }
            }
            KeyCode::Delete => {
                if self.cursor < len {
                    self.remove_char(self.cursor);
                }
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.text.clear();
                self.cursor = 0;
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.toggle_mask();
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let byte_offset = self.char_to_byte(self.cursor);
                self.text.insert(byte_offset, ch);
                self.cursor += 1;
            }
            _ => {}
        }
        InputResult::Continue
    }

    /// Insert a pasted string at the cursor. Newlines are dropped.
    pub fn paste(&mut self, text: &str) {
        for ch in text.chars().filter(|c| !c.is_control()) {
            let byte_offset = self.char_to_byte(self.cursor);
            self.text.insert(byte_offset, ch);
            self.cursor += 1;
        }
    }

    fn remove_char(&mut self, char_idx: usize) {
        let byte_offset = self.char_to_byte(char_idx);
        if let Some(ch) = self.text[byte_offset..].chars().next() {
            self.text
                .replace_range(byte_offset..byte_offset + ch.len_utf8(), "");
        }
    }

    /// Convert char index to byte offset.
    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }
}
