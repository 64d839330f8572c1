//! Editable text with a byte-offset cursor.
//!
//! Movement that depends on wrapping (Up/Down) lives in `layout`; everything
//! here works on logical text only.

pub(super) struct TextBuffer {
    text: String,
    /// Byte offset, always on a char boundary (0..=text.len())
    cursor: usize,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            cursor: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replaces the content and parks the cursor at the end.
    pub fn set(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.len();
    }

    pub fn set_cursor(&mut self, pos: usize) {
        debug_assert!(self.text.is_char_boundary(pos));
        self.cursor = pos.min(self.text.len());
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Inserts pasted text. Carriage returns from Windows clipboards are dropped.
    pub fn insert_str(&mut self, s: &str) {
        let cleaned = s.replace("\r\n", "\n").replace('\r', "\n");
        self.text.insert_str(self.cursor, &cleaned);
        self.cursor += cleaned.len();
    }

    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let prev = prev_boundary(&self.text, self.cursor);
        self.text.drain(prev..self.cursor);
        self.cursor = prev;
        true
    }

    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.text.len() {
            return false;
        }
        let next = next_boundary(&self.text, self.cursor);
        self.text.drain(self.cursor..next);
        true
    }

    pub fn left(&mut self) -> bool {
        self.move_to(prev_boundary(&self.text, self.cursor))
    }

    pub fn right(&mut self) -> bool {
        self.move_to(next_boundary(&self.text, self.cursor))
    }

    pub fn word_left(&mut self) -> bool {
        let before = &self.text[..self.cursor];
        let trimmed = before.trim_end_matches(|c: char| !is_word_char(c));
        let start = trimmed
            .char_indices()
            .rev()
            .find(|&(_, c)| !is_word_char(c))
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        self.move_to(start)
    }

    pub fn word_right(&mut self) -> bool {
        let after = &self.text[self.cursor..];
        let skipped = after.len() - after.trim_start_matches(|c: char| !is_word_char(c)).len();
        let word_len = after[skipped..]
            .char_indices()
            .find(|&(_, c)| !is_word_char(c))
            .map(|(i, _)| i)
            .unwrap_or(after.len() - skipped);
        self.move_to(self.cursor + skipped + word_len)
    }

    /// Start of the current logical line.
    pub fn home(&mut self) -> bool {
        let start = self.text[..self.cursor]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        self.move_to(start)
    }

    /// End of the current logical line.
    pub fn end(&mut self) -> bool {
        let end = self.text[self.cursor..]
            .find('\n')
            .map(|i| self.cursor + i)
            .unwrap_or(self.text.len());
        self.move_to(end)
    }

    fn move_to(&mut self, pos: usize) -> bool {
        let moved = pos != self.cursor;
        self.cursor = pos;
        moved
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '\''
}

pub(super) fn prev_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

pub(super) fn next_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(text.len())
}
