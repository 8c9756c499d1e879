//! Single-line message input.

use unicode_width::UnicodeWidthChar;

/// Input buffer with a cursor counted in characters.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Composer {
    buffer: String,
    cursor: usize,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_blank(&self) -> bool {
        self.buffer.trim().is_empty()
    }

    pub fn insert(&mut self, ch: char) {
        let at = self.byte_index();
        self.buffer.insert(at, ch);
        self.cursor += 1;
    }

    /// Inserts pasted text; line breaks become spaces.
    pub fn insert_str(&mut self, text: &str) {
        for ch in text.chars() {
            match ch {
                '\r' => {}
                '\n' | '\t' => self.insert(' '),
                ch => self.insert(ch),
            }
        }
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index();
        self.buffer.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.len() {
            let at = self.byte_index();
            self.buffer.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.len());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.len();
    }

    /// Empties the buffer, returning its content.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.buffer)
    }

    /// The part of the buffer that fits in `width` terminal columns, scrolled
    /// so the cursor stays visible, and the cursor column within it.
    pub fn visible(&self, width: usize) -> (String, usize) {
        if width == 0 {
            return (String::new(), 0);
        }
        let chars: Vec<char> = self.buffer.chars().collect();

        // One column stays free for the cursor itself.
        let mut start = self.cursor;
        let mut column = 0;
        while start > 0 && column + char_width(chars[start - 1]) < width {
            start -= 1;
            column += char_width(chars[start]);
        }

        let mut used = 0;
        let text = chars[start..]
            .iter()
            .take_while(|ch| {
                used += char_width(**ch);
                used <= width
            })
            .collect();
        (text, column)
    }

    fn len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_index(&self) -> usize {
        self.buffer
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len())
    }
}

fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(0)
}
