use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputChange {
    None,
    Cursor,
    Value,
}

/// Raw text buffer behind the search box. The char cursor is kept in bounds.
///
/// While the whole value is selected, the next edit replaces it and the next
/// cursor move drops the selection.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    value: String,
    cursor: usize,
    selected: bool,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = char_count(&self.value);
        self.selected = false;
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
        self.selected = false;
    }

    /// Selects the whole value; a no-op on an empty buffer.
    pub fn select_all(&mut self) {
        self.cursor = char_count(&self.value);
        self.selected = !self.value.is_empty();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> InputChange {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if self.selected {
            return self.replace_selection(key, ctrl);
        }
        let changed = match key.code {
            KeyCode::Char('w') | KeyCode::Backspace if ctrl => {
                return value_change(self.delete_word_left());
            }
            KeyCode::Char('u') if ctrl => {
                let had_text = !self.value.is_empty();
                self.clear();
                return value_change(had_text);
            }
            KeyCode::Char(ch) if !ctrl && !ch.is_control() => {
                self.insert_char(ch);
                return InputChange::Value;
            }
            KeyCode::Backspace => return value_change(self.backspace()),
            KeyCode::Delete => return value_change(self.delete()),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.move_to(0),
            KeyCode::End => self.move_to(char_count(&self.value)),
            _ => false,
        };
        if changed {
            InputChange::Cursor
        } else {
            InputChange::None
        }
    }

    fn replace_selection(&mut self, key: KeyEvent, ctrl: bool) -> InputChange {
        match key.code {
            KeyCode::Char(ch) if !ctrl && !ch.is_control() => {
                self.clear();
                self.insert_char(ch);
                InputChange::Value
            }
            KeyCode::Backspace | KeyCode::Delete => {
                self.clear();
                InputChange::Value
            }
            KeyCode::Char('w' | 'u') if ctrl => {
                self.clear();
                InputChange::Value
            }
            KeyCode::Left | KeyCode::Home => {
                self.selected = false;
                self.cursor = 0;
                InputChange::Cursor
            }
            KeyCode::Right | KeyCode::End => {
                self.selected = false;
                InputChange::Cursor
            }
            _ => InputChange::None,
        }
    }

    fn insert_char(&mut self, ch: char) {
        let pos = self.cursor.min(char_count(&self.value));
        let byte_pos = byte_index_at_char(&self.value, pos);
        self.value.insert(byte_pos, ch);
        self.cursor = pos + 1;
    }

    fn backspace(&mut self) -> bool {
        let pos = self.cursor.min(char_count(&self.value));
        if pos == 0 {
            return false;
        }
        let byte_pos = byte_index_at_char(&self.value, pos - 1);
        self.value.remove(byte_pos);
        self.cursor = pos - 1;
        true
    }

    fn delete(&mut self) -> bool {
        let pos = self.cursor.min(char_count(&self.value));
        if pos >= char_count(&self.value) {
            return false;
        }
        let byte_pos = byte_index_at_char(&self.value, pos);
        self.value.remove(byte_pos);
        true
    }

    fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    fn move_right(&mut self) -> bool {
        if self.cursor >= char_count(&self.value) {
            return false;
        }
        self.cursor += 1;
        true
    }

    fn move_to(&mut self, pos: usize) -> bool {
        if self.cursor == pos {
            return false;
        }
        self.cursor = pos;
        true
    }

    fn delete_word_left(&mut self) -> bool {
        let mut chars: Vec<char> = self.value.chars().collect();
        let pos = self.cursor.min(chars.len());
        let mut start = pos;
        while start > 0 && chars[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !chars[start - 1].is_whitespace() {
            start -= 1;
        }
        if start == pos {
            return false;
        }
        chars.drain(start..pos);
        self.value = chars.into_iter().collect();
        self.cursor = start;
        true
    }
}

fn value_change(changed: bool) -> InputChange {
    if changed {
        InputChange::Value
    } else {
        InputChange::None
    }
}

fn char_count(value: &str) -> usize {
    value.chars().count()
}

fn byte_index_at_char(value: &str, char_idx: usize) -> usize {
    value
        .char_indices()
        .nth(char_idx)
        .map(|(idx, _)| idx)
        .unwrap_or(value.len())
}

#[cfg(test)]
mod tests {
    use super::{InputChange, TextInput};
    use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};

    fn press(input: &mut TextInput, code: KeyCode) -> InputChange {
        input.handle_key(KeyEvent::plain(code))
    }

    #[test]
    fn typing_inserts_at_cursor() {
        let mut input = TextInput::new();
        for ch in "Alce".chars() {
            press(&mut input, KeyCode::Char(ch));
        }
        press(&mut input, KeyCode::Left);
        press(&mut input, KeyCode::Left);
        assert_eq!(press(&mut input, KeyCode::Char('i')), InputChange::Value);
        assert_eq!(input.value(), "Alice");
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn backspace_and_delete_handle_multibyte_chars() {
        let mut input = TextInput::new();
        input.set_value("Zoë!");
        assert_eq!(press(&mut input, KeyCode::Backspace), InputChange::Value);
        assert_eq!(input.value(), "Zoë");
        press(&mut input, KeyCode::Home);
        assert_eq!(press(&mut input, KeyCode::Delete), InputChange::Value);
        assert_eq!(input.value(), "oë");
        assert_eq!(press(&mut input, KeyCode::Left), InputChange::None);
    }

    #[test]
    fn ctrl_w_deletes_previous_word() {
        let mut input = TextInput::new();
        input.set_value("mega destroyer ");
        let change = input.handle_key(KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL));
        assert_eq!(change, InputChange::Value);
        assert_eq!(input.value(), "mega ");
    }

    #[test]
    fn typing_over_a_selection_replaces_it() {
        let mut input = TextInput::new();
        input.set_value("Alice");
        input.select_all();
        assert!(input.is_selected());

        assert_eq!(press(&mut input, KeyCode::Char('B')), InputChange::Value);
        assert_eq!(input.value(), "B");
        assert_eq!(input.cursor(), 1);
        assert!(!input.is_selected());
    }

    #[test]
    fn moving_the_cursor_keeps_the_selected_text() {
        let mut input = TextInput::new();
        input.set_value("Alice");
        input.select_all();
        assert_eq!(press(&mut input, KeyCode::Home), InputChange::Cursor);
        assert!(!input.is_selected());
        assert_eq!(press(&mut input, KeyCode::Char('>')), InputChange::Value);
        assert_eq!(input.value(), ">Alice");

        input.select_all();
        assert_eq!(press(&mut input, KeyCode::Backspace), InputChange::Value);
        assert_eq!(input.value(), "");

        input.select_all();
        assert!(!input.is_selected());
    }

    #[test]
    fn control_chars_and_unknown_keys_are_ignored() {
        let mut input = TextInput::new();
        assert_eq!(press(&mut input, KeyCode::Backspace), InputChange::None);
        assert_eq!(press(&mut input, KeyCode::PageUp), InputChange::None);
        assert_eq!(
            input.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL)),
            InputChange::None
        );
        assert_eq!(input.value(), "");
    }
}
