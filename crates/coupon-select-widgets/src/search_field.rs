//! Editing and rendering of the one-line search query.
//!
//! The query text itself belongs to [`CouponSelect`](crate::controller::CouponSelect);
//! `SearchField` only keeps the caret position and turns key presses into
//! the next query value.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::Style;
use ratatui::text::{Line, Span};

/// What a key press did to the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// The text changed; carries the new query.
    Changed(String),
    /// Only the caret moved.
    Moved,
    /// The key is not an editing key.
    Ignored,
}

/// Styles for the query line.
#[derive(Debug, Clone)]
pub struct SearchFieldStyle {
    pub prompt: Style,
    pub text: Style,
    pub cursor: Style,
    pub hint: Style,
}

/// Caret state for the query line. Positions are in chars, not bytes.
#[derive(Debug, Clone)]
pub struct SearchField {
    caret: usize,
    prompt: String,
    hint: String,
}

impl SearchField {
    pub fn new() -> Self {
        Self {
            caret: 0,
            prompt: "/ ".to_string(),
            hint: "Search by code or category".to_string(),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Put the caret after the last char of `text`, e.g. after the query
    /// was replaced from outside.
    pub fn move_to_end(&mut self, text: &str) {
        self.caret = text.chars().count();
    }

    /// Apply a key press to `text`.
    pub fn edit(&mut self, text: &str, key: &KeyEvent) -> Edit {
        let len = text.chars().count();
        self.caret = self.caret.min(len);

        match (key.code, key.modifiers) {
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                let mut next = text.to_string();
                next.insert(byte_offset(text, self.caret), c);
                self.caret += 1;
                Edit::Changed(next)
            }
            (KeyCode::Backspace, _) if self.caret > 0 => {
                self.caret -= 1;
                Edit::Changed(remove_char(text, self.caret))
            }
            (KeyCode::Delete, _) if self.caret < len => Edit::Changed(remove_char(text, self.caret)),
            (KeyCode::Left, _) if self.caret > 0 => {
                self.caret -= 1;
                Edit::Moved
            }
            (KeyCode::Right, _) if self.caret < len => {
                self.caret += 1;
                Edit::Moved
            }
            (KeyCode::Home, _) => {
                self.caret = 0;
                Edit::Moved
            }
            (KeyCode::End, _) => {
                self.caret = len;
                Edit::Moved
            }
            _ => Edit::Ignored,
        }
    }

    /// The prompt, the query with a block caret, or the hint when empty.
    pub fn line(&self, text: &str, style: &SearchFieldStyle) -> Line<'static> {
        let mut spans = vec![Span::styled(self.prompt.clone(), style.prompt)];
        if text.is_empty() {
            spans.push(Span::styled(" ", style.cursor));
            spans.push(Span::styled(self.hint.clone(), style.hint));
            return Line::from(spans);
        }

        let caret = self.caret.min(text.chars().count());
        let at = byte_offset(text, caret);
        let (before, rest) = text.split_at(at);
        if !before.is_empty() {
            spans.push(Span::styled(before.to_string(), style.text));
        }
        match rest.chars().next() {
            Some(c) => {
                spans.push(Span::styled(c.to_string(), style.cursor));
                let after = &rest[c.len_utf8()..];
                if !after.is_empty() {
                    spans.push(Span::styled(after.to_string(), style.text));
                }
            }
            None => spans.push(Span::styled(" ", style.cursor)),
        }
        Line::from(spans)
    }
}

impl Default for SearchField {
    fn default() -> Self {
        Self::new()
    }
}

fn byte_offset(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

fn remove_char(s: &str, char_idx: usize) -> String {
    s.chars()
        .enumerate()
        .filter(|(i, _)| *i != char_idx)
        .map(|(_, c)| c)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Modifier;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn style() -> SearchFieldStyle {
        SearchFieldStyle {
            prompt: Style::default(),
            text: Style::default(),
            cursor: Style::default().add_modifier(Modifier::REVERSED),
            hint: Style::default(),
        }
    }

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn typing_appends_at_caret() {
        let mut field = SearchField::new();
        assert_eq!(field.edit("", &key(KeyCode::Char('s'))), Edit::Changed("s".into()));
        assert_eq!(field.edit("s", &key(KeyCode::Char('a'))), Edit::Changed("sa".into()));
        assert_eq!(field.caret(), 2);
    }

    #[test]
    fn shifted_chars_are_text() {
        let mut field = SearchField::new();
        let upper = KeyEvent::new(KeyCode::Char('S'), KeyModifiers::SHIFT);
        assert_eq!(field.edit("", &upper), Edit::Changed("S".into()));
    }

    #[test]
    fn control_chords_are_ignored() {
        let mut field = SearchField::new();
        let chord = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert_eq!(field.edit("abc", &chord), Edit::Ignored);
    }

    #[test]
    fn insert_in_the_middle() {
        let mut field = SearchField::new();
        field.move_to_end("sve");
        field.edit("sve", &key(KeyCode::Left));
        field.edit("sve", &key(KeyCode::Left));
        assert_eq!(field.edit("sve", &key(KeyCode::Char('a'))), Edit::Changed("save".into()));
    }

    #[test]
    fn backspace_and_delete() {
        let mut field = SearchField::new();
        field.move_to_end("food");
        assert_eq!(field.edit("food", &key(KeyCode::Backspace)), Edit::Changed("foo".into()));
        field.edit("foo", &key(KeyCode::Home));
        assert_eq!(field.edit("foo", &key(KeyCode::Delete)), Edit::Changed("oo".into()));
        assert_eq!(field.edit("oo", &key(KeyCode::Backspace)), Edit::Ignored);
    }

    #[test]
    fn multibyte_text_is_edited_by_char() {
        let mut field = SearchField::new();
        field.move_to_end("café");
        assert_eq!(field.edit("café", &key(KeyCode::Backspace)), Edit::Changed("caf".into()));
    }

    #[test]
    fn caret_clamps_after_external_shrink() {
        let mut field = SearchField::new();
        field.move_to_end("electronics");
        assert_eq!(field.edit("", &key(KeyCode::Backspace)), Edit::Ignored);
        assert_eq!(field.caret(), 0);
    }

    #[test]
    fn empty_line_shows_hint() {
        let field = SearchField::new().with_hint("Find a coupon");
        assert_eq!(plain(&field.line("", &style())), "/  Find a coupon");
    }

    #[test]
    fn caret_at_end_adds_block() {
        let mut field = SearchField::new();
        field.move_to_end("save");
        assert_eq!(plain(&field.line("save", &style())), "/ save ");
    }

    #[test]
    fn caret_in_middle_highlights_char() {
        let mut field = SearchField::new();
        field.move_to_end("save");
        field.edit("save", &key(KeyCode::Left));
        let line = field.line("save", &style());
        assert_eq!(plain(&line), "/ save");
        assert_eq!(line.spans[2].content, "e");
    }
}
