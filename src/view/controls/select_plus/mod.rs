//! Searchable select control
//!
//! Renders as `[value  label  ×]` when closed, and as a query line above a
//! filtered option list while searching.
//!
//! This module provides a complete select component with:
//! - State management (`SelectPlusState`) built around an explicit
//!   `Closed | Searching` state machine
//! - Query matching (`matcher`) and free-text value validation (`pattern`)
//! - Rendering (`render_select_plus`)
//! - Input handling (`SelectPlusState::handle_key`, `handle_mouse`,
//!   `handle_blur`, `handle_focus`)
//! - Layout/hit testing (`SelectPlusLayout`)
//!
//! Focus changes that a browser would apply "after the next update" are
//! queued as [`PostRenderAction`]s. The host calls
//! [`SelectPlusState::after_render`] once a frame has been drawn.

mod input;
pub mod matcher;
pub mod pattern;
pub mod query;
mod render;

use ratatui::layout::Rect;
use ratatui::style::Color;

pub use input::SelectPlusEvent;
pub use pattern::{PatternError, ValuePattern, DEFAULT_VALUE_PATTERN};
pub use query::QueryInput;
pub use render::{render_select_plus, VALUE_COLUMN_WIDTH};

use super::FocusState;
use crate::markup::{ChildObserver, MutationRecord, Node, OptionStore, SelectOption};

/// Placeholder shown when no value is set and none is configured
pub const DEFAULT_PLACEHOLDER: &str = "Select...";

/// Which sub-view the control shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchState {
    /// Summary view: value and label
    #[default]
    Closed,
    /// Query input and filtered option list
    Searching {
        query: QueryInput,
        /// Keyboard-highlighted row in the filtered list
        highlighted: Option<usize>,
    },
}

/// Work to run once the next frame has been rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostRenderAction {
    /// Move keyboard focus into the query input
    FocusQuery { select_all: bool },
    /// Give keyboard focus back to the control itself
    FocusWidget,
}

/// Outcome of leaving search mode by committing the query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The query matched the value pattern and is the new value
    Adopted(String),
    /// The query did not match; the value is unchanged
    Rejected(String),
}

/// What the closed view shows as label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelProjection<'a> {
    /// No value: show the placeholder
    Placeholder(&'a str),
    /// A value with no matching option (yet)
    Loading,
    /// Label of the option matching the value
    Label(&'a str),
}

/// State for a select-plus control
#[derive(Debug, Clone)]
pub struct SelectPlusState {
    /// Current value (empty = nothing selected)
    value: String,
    /// Text shown when no value is set
    pub placeholder: String,
    /// Hide the raw value column and do not prefill the query with it
    pub hide_value: bool,
    /// Gate for free-typed values
    pattern: ValuePattern,
    /// Options derived from the child markup
    options: OptionStore,
    /// Closed or searching
    mode: SearchState,
    /// Focus state of the control itself
    pub focus: FocusState,
    /// Tab order; negative means skipped by Tab traversal
    pub tab_index: i32,
    /// Scroll offset of the option list, in filtered rows
    pub scroll_offset: usize,
    /// Maximum visible option rows (updated by the host from the last layout)
    pub max_visible: usize,
    /// Filtered row under the mouse (when searching)
    pub hover_index: Option<usize>,
    /// Whether the control is mounted in a host
    attached: bool,
    /// Continuations waiting for the next render
    pending: Vec<PostRenderAction>,
}

impl Default for SelectPlusState {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectPlusState {
    /// Create an empty, closed, detached control
    pub fn new() -> Self {
        Self {
            value: String::new(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            hide_value: false,
            pattern: ValuePattern::default(),
            options: OptionStore::new(),
            mode: SearchState::Closed,
            focus: FocusState::Normal,
            tab_index: 0,
            scroll_offset: 0,
            max_visible: 5, // Conservative default until the first render
            hover_index: None,
            attached: false,
            pending: Vec::new(),
        }
    }

    /// Set the options from child markup
    pub fn with_children(mut self, children: &[Node]) -> Self {
        self.options = OptionStore::from_children(children);
        self
    }

    /// Set the options directly
    pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = OptionStore::from_options(options);
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_hide_value(mut self, hide_value: bool) -> Self {
        self.hide_value = hide_value;
        self
    }

    pub fn with_pattern(mut self, pattern: ValuePattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn with_focus(mut self, focus: FocusState) -> Self {
        self.focus = focus;
        self
    }

    pub fn with_tab_index(mut self, tab_index: i32) -> Self {
        self.tab_index = tab_index;
        self
    }

    /// Check if the control is enabled
    pub fn is_enabled(&self) -> bool {
        self.focus != FocusState::Disabled
    }

    /// Whether Tab traversal in the host should stop on this control
    pub fn is_tabbable(&self) -> bool {
        self.is_enabled() && self.tab_index >= 0
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Set the value programmatically (no pattern validation)
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn pattern(&self) -> &ValuePattern {
        &self.pattern
    }

    pub fn set_pattern(&mut self, pattern: ValuePattern) {
        self.pattern = pattern;
    }

    pub fn options(&self) -> &OptionStore {
        &self.options
    }

    pub fn mode(&self) -> &SearchState {
        &self.mode
    }

    pub fn is_searching(&self) -> bool {
        matches!(self.mode, SearchState::Searching { .. })
    }

    /// The query being edited, if searching
    pub fn query(&self) -> Option<&str> {
        match &self.mode {
            SearchState::Searching { query, .. } => Some(query.text()),
            SearchState::Closed => None,
        }
    }

    pub fn query_input(&self) -> Option<&QueryInput> {
        match &self.mode {
            SearchState::Searching { query, .. } => Some(query),
            SearchState::Closed => None,
        }
    }

    /// Highlighted filtered row, if any and still in range
    pub fn highlighted(&self) -> Option<usize> {
        match &self.mode {
            SearchState::Searching { highlighted, .. } => {
                highlighted.filter(|row| *row < self.filtered_indices().len())
            }
            SearchState::Closed => None,
        }
    }

    /// Store indices of the options matching the current query
    ///
    /// Empty while closed.
    pub fn filtered_indices(&self) -> Vec<usize> {
        match self.query() {
            Some(q) => matcher::filtered_indices(self.options.options(), q),
            None => Vec::new(),
        }
    }

    /// Options matching the current query (empty while closed)
    pub fn filtered_options(&self) -> Vec<&SelectOption> {
        match self.query() {
            Some(q) => matcher::filter_options(self.options.options(), q),
            None => Vec::new(),
        }
    }

    /// Whether the "No results" row should be shown
    pub fn shows_no_results(&self) -> bool {
        match self.query() {
            Some(q) => !q.is_empty() && self.filtered_indices().is_empty(),
            None => false,
        }
    }

    /// Label to display for the current value
    pub fn label_projection(&self) -> LabelProjection<'_> {
        if self.value.is_empty() {
            return LabelProjection::Placeholder(&self.placeholder);
        }
        match self.options.find_by_value(&self.value) {
            Some(option) => LabelProjection::Label(&option.label),
            None => LabelProjection::Loading,
        }
    }

    /// Enter search mode
    ///
    /// The query starts out as the current value unless the value is empty or
    /// hidden. Returns false (and does nothing) when already searching or
    /// disabled.
    pub fn activate(&mut self) -> bool {
        if !self.is_enabled() || self.is_searching() {
            return false;
        }
        let initial = if !self.value.is_empty() && !self.hide_value {
            self.value.clone()
        } else {
            String::new()
        };
        tracing::debug!("select-plus: opening search with query {:?}", initial);
        self.mode = SearchState::Searching {
            query: QueryInput::new(initial),
            highlighted: None,
        };
        self.scroll_offset = 0;
        self.hover_index = None;
        self.pending
            .push(PostRenderAction::FocusQuery { select_all: true });
        true
    }

    /// Leave search mode, adopting the query if it matches the value pattern
    ///
    /// Returns `None` when not searching.
    pub fn commit(&mut self) -> Option<Resolution> {
        let query = self.close()?;
        let resolution = match self.pattern.resolve(&query) {
            Some(value) => {
                tracing::debug!("select-plus: query {:?} accepted as value", value);
                self.value = value.clone();
                Resolution::Adopted(value)
            }
            None => {
                tracing::debug!(
                    "select-plus: query {:?} rejected by pattern {:?}, keeping {:?}",
                    query,
                    self.pattern.source(),
                    self.value
                );
                Resolution::Rejected(query)
            }
        };
        Some(resolution)
    }

    /// Leave search mode without touching the value
    pub fn cancel(&mut self) -> bool {
        if self.close().is_none() {
            return false;
        }
        tracing::debug!("select-plus: search cancelled");
        self.pending.push(PostRenderAction::FocusWidget);
        true
    }

    /// Choose the option at `index` in the store
    ///
    /// Bypasses the value pattern. Returns the new value, or `None` when not
    /// searching or the index is out of range.
    pub fn select_option(&mut self, index: usize) -> Option<String> {
        if !self.is_searching() {
            return None;
        }
        let value = self.options.get(index)?.value.clone();
        self.close();
        tracing::debug!("select-plus: option {:?} selected", value);
        self.value = value.clone();
        self.pending.push(PostRenderAction::FocusWidget);
        Some(value)
    }

    /// Choose the `row`-th option of the filtered list
    pub fn select_filtered(&mut self, row: usize) -> Option<String> {
        let index = *self.filtered_indices().get(row)?;
        self.select_option(index)
    }

    /// Clear the value from the summary view
    ///
    /// Never opens search mode. Returns false when searching or disabled.
    pub fn clear(&mut self) -> bool {
        if !self.is_enabled() || self.is_searching() {
            return false;
        }
        tracing::debug!("select-plus: value cleared");
        self.value.clear();
        true
    }

    /// Edit the query through `edit`, resetting highlight and scroll
    ///
    /// Returns the new query text when `edit` reports a change.
    pub(crate) fn edit_query(&mut self, edit: impl FnOnce(&mut QueryInput) -> bool) -> Option<String> {
        let SearchState::Searching { query, highlighted } = &mut self.mode else {
            return None;
        };
        if !edit(query) {
            return None;
        }
        *highlighted = None;
        let text = query.text().to_string();
        self.scroll_offset = 0;
        self.hover_index = None;
        Some(text)
    }

    /// Replace the query text (searching only)
    pub fn set_query(&mut self, text: impl Into<String>) -> Option<String> {
        let text = text.into();
        self.edit_query(|q| {
            q.set_text(text);
            true
        })
    }

    /// Move the keyboard highlight down one filtered row
    pub fn highlight_next(&mut self) -> Option<usize> {
        let count = self.filtered_indices().len();
        let current = self.highlighted();
        let SearchState::Searching { highlighted, .. } = &mut self.mode else {
            return None;
        };
        if count == 0 {
            *highlighted = None;
            return None;
        }
        let next = match current {
            Some(row) => (row + 1) % count,
            None => 0,
        };
        *highlighted = Some(next);
        self.ensure_visible(next);
        Some(next)
    }

    /// Move the keyboard highlight up one filtered row
    pub fn highlight_prev(&mut self) -> Option<usize> {
        let count = self.filtered_indices().len();
        let current = self.highlighted();
        let SearchState::Searching { highlighted, .. } = &mut self.mode else {
            return None;
        };
        if count == 0 {
            *highlighted = None;
            return None;
        }
        let prev = match current {
            Some(0) | None => count - 1,
            Some(row) => row - 1,
        };
        *highlighted = Some(prev);
        self.ensure_visible(prev);
        Some(prev)
    }

    /// Ensure the given filtered row is visible within the scroll view
    pub fn ensure_visible(&mut self, row: usize) {
        let count = self.filtered_indices().len();
        if self.max_visible == 0 || count <= self.max_visible {
            self.scroll_offset = 0;
            return;
        }
        if row < self.scroll_offset {
            self.scroll_offset = row;
        } else if row >= self.scroll_offset + self.max_visible {
            self.scroll_offset = row.saturating_sub(self.max_visible - 1);
        }
    }

    /// Scroll the option list by a delta (positive = down, negative = up)
    pub fn scroll_by(&mut self, delta: i32) {
        let count = self.filtered_indices().len();
        if count <= self.max_visible {
            return;
        }
        let max_offset = count.saturating_sub(self.max_visible);
        if delta > 0 {
            self.scroll_offset = (self.scroll_offset + delta as usize).min(max_offset);
        } else {
            self.scroll_offset = self.scroll_offset.saturating_sub(delta.unsigned_abs() as usize);
        }
    }

    /// Mount the control: reset transient state
    pub fn attach(&mut self) {
        self.attached = true;
        self.mode = SearchState::Closed;
        self.pending.clear();
        self.scroll_offset = 0;
        self.hover_index = None;
    }

    /// Unmount the control; queued continuations will be dropped
    pub fn detach(&mut self) {
        self.attached = false;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Continuations waiting for the next render
    pub fn pending_actions(&self) -> &[PostRenderAction] {
        &self.pending
    }

    /// Run the continuations queued before the frame that was just drawn
    ///
    /// Nothing runs when the control has been detached in the meantime.
    /// Returns the number of actions applied.
    pub fn after_render(&mut self) -> usize {
        let actions = std::mem::take(&mut self.pending);
        if actions.is_empty() {
            return 0;
        }
        if !self.attached {
            tracing::trace!(
                "select-plus: dropping {} post-render actions on detached control",
                actions.len()
            );
            return 0;
        }
        for action in &actions {
            match action {
                PostRenderAction::FocusQuery { select_all } => {
                    if let SearchState::Searching { query, .. } = &mut self.mode {
                        query.focus(*select_all);
                        self.focus = FocusState::Focused;
                    }
                }
                PostRenderAction::FocusWidget => {
                    if self.is_enabled() {
                        self.focus = FocusState::Focused;
                    }
                }
            }
        }
        actions.len()
    }

    /// Close search mode, returning the abandoned query
    fn close(&mut self) -> Option<String> {
        match std::mem::take(&mut self.mode) {
            SearchState::Searching { query, .. } => {
                self.scroll_offset = 0;
                self.hover_index = None;
                Some(query.text().to_string())
            }
            SearchState::Closed => None,
        }
    }
}

impl ChildObserver for SelectPlusState {
    fn children_changed(&mut self, children: &[Node], records: &[MutationRecord]) {
        self.options.children_changed(children, records);
        // Rows may have disappeared under the highlight or the scroll view
        let count = self.filtered_indices().len();
        if let SearchState::Searching { highlighted, .. } = &mut self.mode {
            if highlighted.is_some_and(|row| row >= count) {
                *highlighted = None;
            }
        }
        self.scroll_offset = self
            .scroll_offset
            .min(count.saturating_sub(self.max_visible));
        self.hover_index = None;
    }
}

/// Colors for the select-plus control
#[derive(Debug, Clone, Copy)]
pub struct SelectPlusColors {
    /// Option labels and the selected label
    pub label: Color,
    /// Raw value column
    pub value: Color,
    /// Placeholder, "Loading..." and "No results"
    pub placeholder: Color,
    /// Brackets and scrollbar
    pub border: Color,
    /// Clear button
    pub clear: Color,
    /// Highlighted option background
    pub highlight_bg: Color,
    /// Hovered option background
    pub hover_bg: Color,
    /// Focused highlight color
    pub focused: Color,
    /// Cursor color in the query input
    pub cursor: Color,
    /// Disabled color
    pub disabled: Color,
}

impl Default for SelectPlusColors {
    fn default() -> Self {
        Self {
            label: Color::White,
            value: Color::Cyan,
            placeholder: Color::DarkGray,
            border: Color::Gray,
            clear: Color::Red,
            highlight_bg: Color::DarkGray,
            hover_bg: Color::DarkGray,
            focused: Color::Cyan,
            cursor: Color::White,
            disabled: Color::DarkGray,
        }
    }
}

/// Layout information returned after rendering for hit testing
#[derive(Debug, Clone, Default)]
pub struct SelectPlusLayout {
    /// The summary line (closed) or query line (searching)
    pub summary_area: Rect,
    /// The clear button, when a value is shown
    pub clear_button: Option<Rect>,
    /// Areas for each visible option row when searching
    pub option_areas: Vec<Rect>,
    /// Store index of the option shown in each row of `option_areas`
    pub option_indices: Vec<usize>,
    /// Number of option rows that fit below the query line
    pub visible_rows: usize,
    /// Scroll offset used during rendering
    pub scroll_offset: usize,
    /// Terminal cursor position inside the query input
    pub cursor_pos: Option<(u16, u16)>,
    /// The full control area
    pub full_area: Rect,
}

fn rect_contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}

impl SelectPlusLayout {
    /// Check if a point is on the summary/query line
    pub fn is_summary(&self, x: u16, y: u16) -> bool {
        rect_contains(self.summary_area, x, y)
    }

    /// Check if a point is on the clear button
    pub fn is_clear_button(&self, x: u16, y: u16) -> bool {
        self.clear_button
            .is_some_and(|area| rect_contains(area, x, y))
    }

    /// Get the filtered row at a point, if any
    pub fn row_at(&self, x: u16, y: u16) -> Option<usize> {
        self.option_areas
            .iter()
            .position(|area| rect_contains(*area, x, y))
            .map(|i| self.scroll_offset + i)
    }

    /// Get the store index of the option at a point, if any
    pub fn option_at(&self, x: u16, y: u16) -> Option<usize> {
        self.option_areas
            .iter()
            .position(|area| rect_contains(*area, x, y))
            .and_then(|i| self.option_indices.get(i).copied())
    }

    /// Check if a point is within the full control area
    pub fn contains(&self, x: u16, y: u16) -> bool {
        rect_contains(self.full_area, x, y)
    }
}
