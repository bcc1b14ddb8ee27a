//! Query input buffer
//!
//! The edit buffer shown while searching. The cursor is a byte offset that is
//! always on a grapheme boundary. "Select all" mirrors what a text field does
//! right after it is opened with its content selected: the next edit replaces
//! everything, a cursor move collapses the selection.

use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryInput {
    text: String,
    /// Byte offset of the cursor
    cursor: usize,
    /// Whole text selected
    select_all: bool,
    /// Whether the input has keyboard focus (granted after render)
    focused: bool,
}

impl QueryInput {
    /// Create an input holding `text` with the cursor at the end
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Self {
            text,
            cursor,
            select_all: false,
            focused: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_all_selected(&self) -> bool {
        self.select_all && !self.text.is_empty()
    }

    /// Give the input keyboard focus, optionally selecting its content
    pub fn focus(&mut self, select_all: bool) {
        self.focused = true;
        self.select_all = select_all;
        self.cursor = self.text.len();
    }

    /// Replace the whole text, cursor at the end
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.text.len();
        self.select_all = false;
    }

    pub fn insert(&mut self, c: char) {
        self.take_selection();
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Insert `s` at the cursor, replacing the selection
    ///
    /// Line breaks and other control characters are dropped. Returns whether
    /// the text changed.
    pub fn insert_str(&mut self, s: &str) -> bool {
        let clean: String = s.chars().filter(|c| !c.is_control()).collect();
        if clean.is_empty() {
            return false;
        }
        self.take_selection();
        self.text.insert_str(self.cursor, &clean);
        self.cursor += clean.len();
        true
    }

    /// Delete the grapheme before the cursor; returns whether text changed
    pub fn backspace(&mut self) -> bool {
        if self.take_selection() {
            return true;
        }
        match self.prev_boundary() {
            Some(start) => {
                self.text.replace_range(start..self.cursor, "");
                self.cursor = start;
                true
            }
            None => false,
        }
    }

    /// Delete the grapheme after the cursor; returns whether text changed
    pub fn delete(&mut self) -> bool {
        if self.take_selection() {
            return true;
        }
        match self.next_boundary() {
            Some(end) => {
                self.text.replace_range(self.cursor..end, "");
                true
            }
            None => false,
        }
    }

    pub fn move_left(&mut self) {
        if self.collapse_selection(0) {
            return;
        }
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if self.collapse_selection(self.text.len()) {
            return;
        }
        if let Some(next) = self.next_boundary() {
            self.cursor = next;
        }
    }

    pub fn move_home(&mut self) {
        self.select_all = false;
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.select_all = false;
        self.cursor = self.text.len();
    }

    /// Clear the text if it is all selected; returns whether anything was removed
    fn take_selection(&mut self) -> bool {
        if !self.select_all {
            return false;
        }
        self.select_all = false;
        if self.text.is_empty() {
            return false;
        }
        self.text.clear();
        self.cursor = 0;
        true
    }

    fn collapse_selection(&mut self, to: usize) -> bool {
        if self.is_all_selected() {
            self.select_all = false;
            self.cursor = to;
            true
        } else {
            self.select_all = false;
            false
        }
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.text[..self.cursor]
            .grapheme_indices(true)
            .next_back()
            .map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.text[self.cursor..]
            .graphemes(true)
            .next()
            .map(|g| self.cursor + g.len())
    }
}
