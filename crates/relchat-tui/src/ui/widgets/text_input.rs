//! Multi-line text input state.

use crate::text::wrap_chars;

/// State for a text input, managing content and cursor position.
///
/// The cursor is a character index, never a byte offset, so editing works
/// with non-ASCII text.
#[derive(Debug, Clone, Default)]
pub struct TextInputState {
    /// The text content.
    content: String,
    /// Cursor position (character index).
    pub cursor: usize,
    /// Previously submitted messages, oldest first.
    history: Vec<String>,
    /// Position in history while browsing (`None` = editing current input).
    history_index: Option<usize>,
    /// Saved current input when navigating history.
    saved_input: String,
}

impl TextInputState {
    /// Create a new empty text input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Check if the content is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Whether the content is empty once surrounding whitespace is ignored.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Rows the content occupies when soft-wrapped at `width` columns.
    ///
    /// A zero width only breaks on explicit newlines.
    pub fn wrapped_rows(&self, width: usize) -> Vec<String> {
        self.content
            .split('\n')
            .flat_map(|line| wrap_chars(line, width))
            .collect()
    }

    /// Number of rows the content spans at `width` columns (at least one).
    pub fn line_count(&self, width: usize) -> usize {
        self.wrapped_rows(width).len()
    }

    /// Row and column (in characters) of the cursor within
    /// [`Self::wrapped_rows`].
    ///
    /// A cursor sitting on a soft break belongs to the start of the next row.
    pub fn cursor_row_col(&self, width: usize) -> (usize, usize) {
        let mut remaining = self.cursor;
        let mut row = 0;
        let mut last = (0, 0);
        for line in self.content.split('\n') {
            let chunks = wrap_chars(line, width);
            let len = line.chars().count();
            if remaining <= len {
                for (i, chunk) in chunks.iter().enumerate() {
                    let n = chunk.chars().count();
                    if remaining < n || i + 1 == chunks.len() {
                        return (row + i, remaining);
                    }
                    remaining -= n;
                }
            }
            remaining = remaining.saturating_sub(len + 1);
            row += chunks.len();
            last = (row - 1, chunks.last().map_or(0, |c| c.chars().count()));
        }
        last
    }

    /// Clear the content.
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Byte offset of a character index.
    fn byte_at(&self, char_index: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_index)
            .map_or(self.content.len(), |(byte, _)| byte)
    }

    fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Insert a character at the cursor position.
    pub fn insert(&mut self, ch: char) {
        let at = self.byte_at(self.cursor);
        self.content.insert(at, ch);
        self.cursor += 1;
    }

    /// Insert a string at the cursor position.
    pub fn insert_str(&mut self, s: &str) {
        let at = self.byte_at(self.cursor);
        self.content.insert_str(at, s);
        self.cursor += s.chars().count();
    }

    /// Delete the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_at(self.cursor);
            self.content.remove(at);
        }
    }

    /// Delete the character at the cursor (delete).
    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_at(self.cursor);
            self.content.remove(at);
        }
    }

    /// Move cursor left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move cursor right.
    pub fn move_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    /// Move cursor to start.
    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// Move cursor to end.
    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Take the trimmed content, record it in history and clear the input.
    pub fn submit(&mut self) -> String {
        let content = std::mem::take(&mut self.content).trim().to_string();
        self.cursor = 0;
        if !content.is_empty() {
            self.history.push(content.clone());
        }
        self.history_index = None;
        self.saved_input.clear();
        content
    }

    /// Whether a history entry is currently recalled.
    pub fn is_browsing_history(&self) -> bool {
        self.history_index.is_some()
    }

    /// Navigate to previous history entry.
    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }

        let next = match self.history_index {
            None => {
                self.saved_input = self.content.clone();
                0
            }
            Some(i) if i + 1 < self.history.len() => i + 1,
            Some(_) => return,
        };
        self.history_index = Some(next);
        self.content = self.history[self.history.len() - 1 - next].clone();
        self.move_end();
    }

    /// Navigate to next history entry.
    pub fn history_next(&mut self) {
        match self.history_index {
            None => {}
            Some(0) => {
                self.content = std::mem::take(&mut self.saved_input);
                self.history_index = None;
                self.move_end();
            }
            Some(i) => {
                self.history_index = Some(i - 1);
                self.content = self.history[self.history.len() - i].clone();
                self.move_end();
            }
        }
    }
}
