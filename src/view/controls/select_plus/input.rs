//! Select-plus input handling

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use super::{FocusState, PostRenderAction, Resolution, SelectPlusLayout, SelectPlusState};

/// Events that can be returned from select-plus input handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectPlusEvent {
    /// Search mode was entered
    Opened,
    /// The query text changed
    QueryChanged(String),
    /// Search was committed and the query became the value
    Committed(String),
    /// Search was committed but the query failed the value pattern
    Rejected(String),
    /// An option was chosen; carries the new value
    Selected(String),
    /// The value was cleared
    Cleared,
    /// Search was abandoned with Escape
    Cancelled,
    /// The keyboard highlight moved to a filtered row
    Highlighted(usize),
    /// The control gained focus
    Focused,
    /// The control lost focus while closed
    Blurred,
    /// Mouse is hovering
    Hovered,
    /// Mouse left the area
    Left,
}

impl From<Resolution> for SelectPlusEvent {
    fn from(resolution: Resolution) -> Self {
        match resolution {
            Resolution::Adopted(value) => SelectPlusEvent::Committed(value),
            Resolution::Rejected(query) => SelectPlusEvent::Rejected(query),
        }
    }
}

impl SelectPlusState {
    /// Handle a keyboard event for this control
    ///
    /// # Returns
    /// * `Some(SelectPlusEvent)` if the event was consumed
    /// * `None` if the event was not relevant
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<SelectPlusEvent> {
        if !self.is_enabled() {
            return None;
        }
        if self.is_searching() {
            self.handle_query_key(key)
        } else {
            self.handle_summary_key(key)
        }
    }

    /// Keys on the closed summary view
    fn handle_summary_key(&mut self, key: KeyEvent) -> Option<SelectPlusEvent> {
        if self.focus != FocusState::Focused {
            return None;
        }
        match key.code {
            KeyCode::Char(' ') => {
                self.activate();
                Some(SelectPlusEvent::Opened)
            }
            KeyCode::Delete | KeyCode::Backspace => {
                self.clear();
                Some(SelectPlusEvent::Cleared)
            }
            _ => None,
        }
    }

    /// Keys on the query input while searching
    fn handle_query_key(&mut self, key: KeyEvent) -> Option<SelectPlusEvent> {
        if !self.query_input().is_some_and(|q| q.is_focused()) {
            return None;
        }
        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                // Consumed: Tab commits instead of moving focus
                let resolution = self.commit()?;
                self.pending.push(PostRenderAction::FocusWidget);
                Some(resolution.into())
            }
            KeyCode::Esc => {
                self.cancel();
                Some(SelectPlusEvent::Cancelled)
            }
            KeyCode::Enter => {
                if let Some(row) = self.highlighted() {
                    let value = self.select_filtered(row)?;
                    Some(SelectPlusEvent::Selected(value))
                } else {
                    let resolution = self.commit()?;
                    self.pending.push(PostRenderAction::FocusWidget);
                    Some(resolution.into())
                }
            }
            KeyCode::Down => self.highlight_next().map(SelectPlusEvent::Highlighted),
            KeyCode::Up => self.highlight_prev().map(SelectPlusEvent::Highlighted),
            KeyCode::Backspace => self
                .edit_query(|q| q.backspace())
                .map(SelectPlusEvent::QueryChanged),
            KeyCode::Delete => self
                .edit_query(|q| q.delete())
                .map(SelectPlusEvent::QueryChanged),
            KeyCode::Left => {
                self.edit_query(|q| {
                    q.move_left();
                    false
                });
                None
            }
            KeyCode::Right => {
                self.edit_query(|q| {
                    q.move_right();
                    false
                });
                None
            }
            KeyCode::Home => {
                self.edit_query(|q| {
                    q.move_home();
                    false
                });
                None
            }
            KeyCode::End => {
                self.edit_query(|q| {
                    q.move_end();
                    false
                });
                None
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.edit_query(|q| {
                    q.insert(c);
                    true
                })
                .map(SelectPlusEvent::QueryChanged)
            }
            _ => None,
        }
    }

    /// Handle a mouse event for this control
    ///
    /// # Arguments
    /// * `event` - The mouse event to handle
    /// * `layout` - The control's rendered layout for hit testing
    ///
    /// # Returns
    /// * `Some(SelectPlusEvent)` if the event was consumed
    /// * `None` if the event was not relevant
    pub fn handle_mouse(
        &mut self,
        event: MouseEvent,
        layout: &SelectPlusLayout,
    ) -> Option<SelectPlusEvent> {
        if !self.is_enabled() {
            return None;
        }
        let (x, y) = (event.column, event.row);

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.is_searching() {
                    if let Some(index) = layout.option_at(x, y) {
                        let value = self.select_option(index)?;
                        return Some(SelectPlusEvent::Selected(value));
                    }
                    if layout.contains(x, y) {
                        return None;
                    }
                    // Clicked outside: focus is lost
                    return self.handle_blur();
                }

                if layout.is_clear_button(x, y) {
                    // Handled here only: a clear click never also opens
                    self.clear();
                    self.pending.push(PostRenderAction::FocusWidget);
                    return Some(SelectPlusEvent::Cleared);
                }
                if layout.is_summary(x, y) {
                    self.focus = FocusState::Focused;
                    self.activate();
                    return Some(SelectPlusEvent::Opened);
                }
                if self.focus == FocusState::Focused {
                    return self.handle_blur();
                }
                None
            }
            MouseEventKind::Moved => {
                if self.is_searching() {
                    let row = layout.row_at(x, y);
                    if row != self.hover_index {
                        self.hover_index = row;
                        return Some(if row.is_some() {
                            SelectPlusEvent::Hovered
                        } else {
                            SelectPlusEvent::Left
                        });
                    }
                    return None;
                }
                if layout.is_summary(x, y) {
                    if self.focus != FocusState::Focused && self.focus != FocusState::Hovered {
                        self.focus = FocusState::Hovered;
                    }
                    Some(SelectPlusEvent::Hovered)
                } else if self.focus == FocusState::Hovered {
                    self.focus = FocusState::Normal;
                    Some(SelectPlusEvent::Left)
                } else {
                    None
                }
            }
            MouseEventKind::ScrollUp if self.is_searching() => {
                self.scroll_by(-3);
                None
            }
            MouseEventKind::ScrollDown if self.is_searching() => {
                self.scroll_by(3);
                None
            }
            _ => None,
        }
    }

    /// Handle pasted text
    ///
    /// Only the focused query input accepts a paste; the closed summary
    /// ignores it.
    pub fn handle_paste(&mut self, text: &str) -> Option<SelectPlusEvent> {
        if !self.is_enabled() || !self.query_input().is_some_and(|q| q.is_focused()) {
            return None;
        }
        self.edit_query(|q| q.insert_str(text))
            .map(SelectPlusEvent::QueryChanged)
    }

    /// The control gained keyboard focus
    pub fn handle_focus(&mut self) -> Option<SelectPlusEvent> {
        if !self.is_enabled() || self.focus == FocusState::Focused {
            return None;
        }
        self.focus = FocusState::Focused;
        Some(SelectPlusEvent::Focused)
    }

    /// The control lost keyboard focus
    ///
    /// While searching this commits the query.
    pub fn handle_blur(&mut self) -> Option<SelectPlusEvent> {
        if !self.is_enabled() {
            return None;
        }
        self.focus = FocusState::Normal;
        match self.commit() {
            Some(resolution) => Some(resolution.into()),
            None => Some(SelectPlusEvent::Blurred),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::SelectOption;
    use ratatui::layout::Rect;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn mouse(kind: MouseEventKind, x: u16, y: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column: x,
            row: y,
            modifiers: KeyModifiers::empty(),
        }
    }

    fn mouse_down(x: u16, y: u16) -> MouseEvent {
        mouse(MouseEventKind::Down(MouseButton::Left), x, y)
    }

    fn focused_fruit() -> SelectPlusState {
        let mut state = SelectPlusState::new()
            .with_options(vec![
                SelectOption::new("1", "Apple"),
                SelectOption::new("2", "Banana"),
            ])
            .with_focus(FocusState::Focused);
        state.attach();
        state
    }

    /// Open with Space and let the deferred focus land in the query input
    fn open(state: &mut SelectPlusState) {
        assert_eq!(state.handle_key(key(KeyCode::Char(' '))), Some(SelectPlusEvent::Opened));
        state.after_render();
    }

    fn type_text(state: &mut SelectPlusState, text: &str) {
        for c in text.chars() {
            state.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn closed_layout() -> SelectPlusLayout {
        SelectPlusLayout {
            summary_area: Rect::new(0, 0, 20, 1),
            clear_button: Some(Rect::new(18, 0, 1, 1)),
            full_area: Rect::new(0, 0, 20, 1),
            ..Default::default()
        }
    }

    fn open_layout() -> SelectPlusLayout {
        SelectPlusLayout {
            summary_area: Rect::new(0, 0, 20, 1),
            clear_button: None,
            option_areas: vec![Rect::new(0, 1, 20, 1), Rect::new(0, 2, 20, 1)],
            option_indices: vec![0, 1],
            visible_rows: 4,
            full_area: Rect::new(0, 0, 20, 5),
            ..Default::default()
        }
    }

    #[test]
    fn test_space_opens_and_typing_filters() {
        let mut state = focused_fruit();
        open(&mut state);
        type_text(&mut state, "ap");
        assert_eq!(state.query(), Some("ap"));
        assert_eq!(state.filtered_indices(), vec![0]);
    }

    #[test]
    fn test_typing_reports_query_changes() {
        let mut state = focused_fruit();
        open(&mut state);
        let result = state.handle_key(key(KeyCode::Char('b')));
        assert_eq!(result, Some(SelectPlusEvent::QueryChanged("b".to_string())));
    }

    #[test]
    fn test_keys_before_focus_lands_are_ignored() {
        let mut state = focused_fruit();
        state.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(state.handle_key(key(KeyCode::Char('a'))), None);
        assert_eq!(state.query(), Some(""));
    }

    #[test]
    fn test_unfocused_summary_ignores_keyboard() {
        let mut state = focused_fruit().with_focus(FocusState::Normal);
        assert_eq!(state.handle_key(key(KeyCode::Char(' '))), None);
        assert!(!state.is_searching());
    }

    #[test]
    fn test_delete_and_backspace_clear_summary() {
        for code in [KeyCode::Delete, KeyCode::Backspace] {
            let mut state = focused_fruit().with_value("2");
            assert_eq!(state.handle_key(key(code)), Some(SelectPlusEvent::Cleared));
            assert_eq!(state.value(), "");
            assert!(!state.is_searching());
        }
    }

    #[test]
    fn test_tab_commits_and_refocuses() {
        let mut state = focused_fruit();
        open(&mut state);
        type_text(&mut state, "42");
        let result = state.handle_key(key(KeyCode::Tab));
        assert_eq!(result, Some(SelectPlusEvent::Committed("42".to_string())));
        assert_eq!(state.value(), "42");
        assert_eq!(state.pending_actions(), &[PostRenderAction::FocusWidget]);
    }

    #[test]
    fn test_tab_with_invalid_query_is_rejected() {
        let mut state = focused_fruit().with_value("1");
        open(&mut state);
        // The prefilled "1" is selected; typing replaces it
        type_text(&mut state, "ap");
        let result = state.handle_key(key(KeyCode::Tab));
        assert_eq!(result, Some(SelectPlusEvent::Rejected("ap".to_string())));
        assert_eq!(state.value(), "1");
    }

    #[test]
    fn test_escape_cancels() {
        let mut state = focused_fruit().with_value("1");
        open(&mut state);
        type_text(&mut state, "99");
        assert_eq!(state.handle_key(key(KeyCode::Esc)), Some(SelectPlusEvent::Cancelled));
        assert_eq!(state.value(), "1");
        assert!(!state.is_searching());
    }

    #[test]
    fn test_arrow_then_enter_selects_highlighted() {
        let mut state = focused_fruit();
        open(&mut state);
        assert_eq!(state.handle_key(key(KeyCode::Down)), Some(SelectPlusEvent::Highlighted(0)));
        assert_eq!(state.handle_key(key(KeyCode::Down)), Some(SelectPlusEvent::Highlighted(1)));
        let result = state.handle_key(key(KeyCode::Enter));
        assert_eq!(result, Some(SelectPlusEvent::Selected("2".to_string())));
        assert_eq!(state.value(), "2");
    }

    #[test]
    fn test_enter_without_highlight_commits() {
        let mut state = focused_fruit();
        open(&mut state);
        type_text(&mut state, "7");
        let result = state.handle_key(key(KeyCode::Enter));
        assert_eq!(result, Some(SelectPlusEvent::Committed("7".to_string())));
    }

    #[test]
    fn test_ctrl_chars_are_not_typed() {
        let mut state = focused_fruit();
        open(&mut state);
        let ctrl_a = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);
        assert_eq!(state.handle_key(ctrl_a), None);
        assert_eq!(state.query(), Some(""));
    }

    #[test]
    fn test_paste_into_query() {
        let mut state = focused_fruit().with_value("9");
        assert_eq!(state.handle_paste("12"), None);
        open(&mut state);
        assert_eq!(
            state.handle_paste("123"),
            Some(SelectPlusEvent::QueryChanged("123".to_string()))
        );
        assert_eq!(state.query(), Some("123"));
        assert_eq!(state.handle_paste("\n"), None);
    }

    #[test]
    fn test_click_summary_opens() {
        let mut state = focused_fruit().with_focus(FocusState::Normal);
        let result = state.handle_mouse(mouse_down(5, 0), &closed_layout());
        assert_eq!(result, Some(SelectPlusEvent::Opened));
        assert!(state.is_searching());
        assert_eq!(state.focus, FocusState::Focused);
    }

    #[test]
    fn test_click_clear_button_does_not_open() {
        let mut state = focused_fruit().with_value("2");
        let result = state.handle_mouse(mouse_down(18, 0), &closed_layout());
        assert_eq!(result, Some(SelectPlusEvent::Cleared));
        assert_eq!(state.value(), "");
        assert!(!state.is_searching());
        assert_eq!(state.pending_actions(), &[PostRenderAction::FocusWidget]);
    }

    #[test]
    fn test_click_option_selects() {
        let mut state = focused_fruit();
        open(&mut state);
        let result = state.handle_mouse(mouse_down(3, 2), &open_layout());
        assert_eq!(result, Some(SelectPlusEvent::Selected("2".to_string())));
        assert_eq!(state.value(), "2");
        assert!(!state.is_searching());
    }

    #[test]
    fn test_click_outside_commits() {
        let mut state = focused_fruit();
        open(&mut state);
        type_text(&mut state, "ap");
        let result = state.handle_mouse(mouse_down(40, 10), &open_layout());
        assert_eq!(result, Some(SelectPlusEvent::Rejected("ap".to_string())));
        assert_eq!(state.value(), "");
        assert_eq!(state.focus, FocusState::Normal);
    }

    #[test]
    fn test_blur_commits_valid_query() {
        let mut state = focused_fruit();
        open(&mut state);
        type_text(&mut state, "123");
        assert_eq!(
            state.handle_blur(),
            Some(SelectPlusEvent::Committed("123".to_string()))
        );
        assert_eq!(state.value(), "123");
    }

    #[test]
    fn test_blur_while_closed() {
        let mut state = focused_fruit();
        assert_eq!(state.handle_blur(), Some(SelectPlusEvent::Blurred));
        assert_eq!(state.focus, FocusState::Normal);
        assert_eq!(state.handle_focus(), Some(SelectPlusEvent::Focused));
        assert_eq!(state.handle_focus(), None);
    }

    #[test]
    fn test_hover_rows() {
        let mut state = focused_fruit();
        open(&mut state);
        let layout = open_layout();
        let result = state.handle_mouse(mouse(MouseEventKind::Moved, 3, 1), &layout);
        assert_eq!(result, Some(SelectPlusEvent::Hovered));
        assert_eq!(state.hover_index, Some(0));
        let result = state.handle_mouse(mouse(MouseEventKind::Moved, 3, 4), &layout);
        assert_eq!(result, Some(SelectPlusEvent::Left));
        assert_eq!(state.hover_index, None);
    }

    #[test]
    fn test_disabled_ignores_everything() {
        let mut state = focused_fruit().with_focus(FocusState::Disabled);
        assert_eq!(state.handle_key(key(KeyCode::Char(' '))), None);
        assert_eq!(state.handle_mouse(mouse_down(5, 0), &closed_layout()), None);
        assert_eq!(state.handle_blur(), None);
    }
}
