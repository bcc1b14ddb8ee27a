//! Single-widget host
//!
//! Owns the child markup of one select-plus control and drives the control
//! the way a page would: terminal events are routed to it, pending child
//! mutations are flushed once per tick, and queued post-render actions run
//! after every frame.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::backend::Backend;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};

use crate::config::{ConfigError, SelectPlusConfig};
use crate::markup::ChildList;
use crate::view::controls::{
    render_select_plus, FocusState, SelectPlusColors, SelectPlusEvent, SelectPlusLayout,
    SelectPlusState,
};

/// Widest the control is drawn, in cells
const CONTROL_WIDTH: u16 = 40;

pub struct App {
    children: ChildList,
    select: SelectPlusState,
    colors: SelectPlusColors,
    layout: SelectPlusLayout,
    last_event: Option<SelectPlusEvent>,
    should_quit: bool,
}

impl App {
    /// Build a host and mount a control configured by `config`
    pub fn new(config: &SelectPlusConfig) -> Result<Self, ConfigError> {
        let select = config.build_state()?;
        Ok(Self::with_state(ChildList::new(config.children.clone()), select))
    }

    /// Mount `select`, whose options must already reflect `children`
    pub fn with_state(children: ChildList, mut select: SelectPlusState) -> Self {
        select.attach();
        Self {
            children,
            select,
            colors: SelectPlusColors::default(),
            layout: SelectPlusLayout::default(),
            last_event: None,
            should_quit: false,
        }
    }

    pub fn select(&self) -> &SelectPlusState {
        &self.select
    }

    pub fn select_mut(&mut self) -> &mut SelectPlusState {
        &mut self.select
    }

    /// The control's child markup
    ///
    /// Mutations made through this list reach the control on the next
    /// [`App::tick`], as one batch.
    pub fn children_mut(&mut self) -> &mut ChildList {
        &mut self.children
    }

    pub fn value(&self) -> &str {
        self.select.value()
    }

    pub fn layout(&self) -> &SelectPlusLayout {
        &self.layout
    }

    pub fn last_event(&self) -> Option<&SelectPlusEvent> {
        self.last_event.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Unmount the control; continuations still queued will not run
    pub fn unmount(&mut self) {
        self.select.detach();
    }

    /// Route a terminal event to the control
    pub fn handle_event(&mut self, event: &Event) -> Option<SelectPlusEvent> {
        let result = match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(*key),
            Event::Key(_) => None,
            Event::Mouse(mouse) => self.select.handle_mouse(*mouse, &self.layout),
            Event::Paste(text) => self.select.handle_paste(text),
            Event::FocusLost => self.select.handle_blur(),
            _ => None,
        };
        if let Some(ref produced) = result {
            tracing::debug!("select-plus event: {:?}", produced);
            self.last_event = Some(produced.clone());
        }
        result
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<SelectPlusEvent> {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            tracing::info!("quit requested");
            self.should_quit = true;
            return None;
        }

        if let Some(event) = self.select.handle_key(key) {
            return Some(event);
        }

        // Tab traversal between the control and the rest of the page
        if !self.select.is_searching() && matches!(key.code, KeyCode::Tab | KeyCode::BackTab) {
            if self.select.focus == FocusState::Focused {
                return self.select.handle_blur();
            }
            if self.select.is_tabbable() {
                return self.select.handle_focus();
            }
        }
        None
    }

    /// Deliver pending child mutations to the control as one batch
    ///
    /// Returns the number of mutation records delivered.
    pub fn tick(&mut self) -> usize {
        self.children.flush(&mut self.select)
    }

    /// Render the host screen
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        if area.height < 4 {
            return;
        }

        let title = Line::from(Span::styled(
            "select-plus  (Space: open, Tab: commit, Esc: cancel, Ctrl+Q: quit)",
            Style::default().add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(title), Rect::new(area.x, area.y, area.width, 1));

        let control_area = Rect::new(
            area.x + 2,
            area.y + 2,
            area.width.saturating_sub(4).min(CONTROL_WIDTH),
            area.height.saturating_sub(3),
        );
        self.layout = render_select_plus(frame, control_area, &self.select, &self.colors);
        if self.select.is_searching() && self.layout.visible_rows > 0 {
            self.select.max_visible = self.layout.visible_rows;
        }
        if let Some((x, y)) = self.layout.cursor_pos {
            frame.set_cursor_position((x, y));
        }

        let status = format!(
            "value: {:?}   last event: {}",
            self.select.value(),
            self.last_event
                .as_ref()
                .map(|e| format!("{e:?}"))
                .unwrap_or_else(|| "-".to_string())
        );
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                status,
                Style::default().fg(Color::DarkGray),
            ))),
            Rect::new(area.x, area.y + area.height - 1, area.width, 1),
        );
    }

    /// Run one host cycle: flush mutations, draw, then run continuations
    pub fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> std::io::Result<()> {
        self.tick();
        terminal.draw(|frame| self.render(frame))?;
        self.select.after_render();
        Ok(())
    }
}
