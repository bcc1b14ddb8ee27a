use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use select_plus::app::App;
use select_plus::config::SelectPlusConfig;
use select_plus::markup::Node;
use select_plus::view::controls::SelectPlusEvent;

/// Drives an [`App`] against an in-memory terminal, drawing after every input
/// the way the real event loop does.
pub struct Harness {
    pub app: App,
    pub terminal: Terminal<TestBackend>,
}

impl Harness {
    pub fn new(config: SelectPlusConfig) -> Self {
        super::tracing::init_tracing_from_env();
        let app = App::new(&config).unwrap();
        let terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        let mut harness = Self { app, terminal };
        harness.render();
        harness
    }

    /// Harness over `(value, label)` options with default settings
    pub fn with_options(options: &[(&str, &str)]) -> Self {
        Self::new(SelectPlusConfig {
            children: options
                .iter()
                .map(|(value, label)| Node::option(*value, *label))
                .collect(),
            ..Default::default()
        })
    }

    pub fn fruit() -> Self {
        Self::with_options(&[("1", "Apple"), ("2", "Banana")])
    }

    pub fn render(&mut self) {
        self.app.draw(&mut self.terminal).unwrap();
    }

    pub fn send(&mut self, event: Event) -> Option<SelectPlusEvent> {
        let result = self.app.handle_event(&event);
        self.render();
        result
    }

    pub fn press(&mut self, code: KeyCode) -> Option<SelectPlusEvent> {
        self.send(Event::Key(KeyEvent::new(code, KeyModifiers::empty())))
    }

    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.press(KeyCode::Char(c));
        }
    }

    pub fn click(&mut self, x: u16, y: u16) -> Option<SelectPlusEvent> {
        self.send(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: x,
            row: y,
            modifiers: KeyModifiers::empty(),
        }))
    }

    /// Click the summary line to open search
    pub fn open(&mut self) -> Option<SelectPlusEvent> {
        let area = self.app.layout().summary_area;
        self.click(area.x + 2, area.y)
    }

    /// Click outside the control
    pub fn click_away(&mut self) -> Option<SelectPlusEvent> {
        let area = self.terminal.backend().buffer().area;
        self.click(area.width - 1, area.height - 2)
    }

    /// Click the rendered option row showing `label`
    pub fn click_option(&mut self, label: &str) -> Option<SelectPlusEvent> {
        let layout = self.app.layout().clone();
        let options = self.app.select().options();
        let row = layout
            .option_indices
            .iter()
            .position(|&i| options.get(i).is_some_and(|o| o.label == label))
            .unwrap_or_else(|| panic!("no rendered row for {label:?}"));
        let area = layout.option_areas[row];
        self.click(area.x + 1, area.y)
    }

    /// Labels of the option rows currently rendered, top to bottom
    pub fn visible_labels(&self) -> Vec<String> {
        let options = self.app.select().options();
        self.app
            .layout()
            .option_indices
            .iter()
            .filter_map(|&i| options.get(i).map(|o| o.label.clone()))
            .collect()
    }

    pub fn screen(&self) -> String {
        let buffer = self.terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    /// The rendered control line
    pub fn control_line(&self) -> String {
        let buffer = self.terminal.backend().buffer();
        let y = self.app.layout().summary_area.y;
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol().to_string())
            .collect::<String>()
            .trim_end()
            .to_string()
    }
}
