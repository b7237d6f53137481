//! # Console Interface Module
//!
//! Terminal monitor for a conveyor station. Shows every pin coloured by its
//! tri-state value, the gates with their last evaluation, and lets the user
//! single-step ticks while feeding a product through the beam.

use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::io;
use std::time::Duration;
use tracing::{debug, warn};

use crate::components::gate::Evaluation;
use crate::systems::conveyor_station::{ConveyorStation, Product, TickOutcome};
use crate::types::TriState;

/// Most history rows the console will lay out.
const MAX_HISTORY_ROWS: usize = 50;

/// Console configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    pub refresh_rate_ms: u64,
    pub show_gates: bool,
    pub show_report: bool,
    /// Tick summaries kept in the history pane.
    pub history_len: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            refresh_rate_ms: 100,
            show_gates: true,
            show_report: true,
            history_len: 8,
        }
    }
}

/// Colour for a pin value: unknown grey, false white, true red.
pub fn tri_state_style(value: TriState) -> Style {
    match value {
        TriState::Unknown => Style::default().fg(Color::DarkGray),
        TriState::False => Style::default().fg(Color::White),
        TriState::True => Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD),
    }
}

/// `label=value` with the value coloured.
pub fn pin_spans(label: &str, value: TriState) -> Vec<Span<'static>> {
    vec![
        Span::raw(format!("{}=", label)),
        Span::styled(value.to_char().to_string(), tri_state_style(value)),
        Span::raw(" "),
    ]
}

fn evaluation_label(evaluation: Option<Evaluation>) -> Span<'static> {
    match evaluation {
        Some(Evaluation::Fired) => Span::styled("fired", Style::default().fg(Color::Green)),
        Some(Evaluation::Held) => Span::styled("held", Style::default().fg(Color::Yellow)),
        Some(Evaluation::NotReady) => Span::styled("not ready", Style::default().fg(Color::DarkGray)),
        None => Span::styled("pending", Style::default().fg(Color::DarkGray)),
    }
}

/// One-line summary of a tick, as used by the history pane and `simulate`.
pub fn summarize(outcome: &TickOutcome) -> String {
    format!(
        "tick {:>3}  beam {}  waves {}  sink {}{}",
        outcome.tick,
        TriState::from_bool(outcome.beam).to_char(),
        outcome.report.waves,
        outcome.sink.to_char(),
        if outcome.kicked { "  KICK" } else { "" }
    )
}

/// Console UI application state
pub struct ConsoleApp {
    station: ConveyorStation,
    config: ConsoleConfig,
    running: bool,
    show_help: bool,
    selected: Vec<bool>,
    product: Option<Product>,
    history: VecDeque<String>,
}

impl ConsoleApp {
    pub fn new(station: ConveyorStation, config: ConsoleConfig) -> Self {
        let channels = station.sensor().map_or(0, |s| s.channels().len());
        Self {
            station,
            config,
            running: false,
            show_help: false,
            selected: vec![false; channels],
            product: None,
            history: VecDeque::new(),
        }
    }

    pub fn station(&self) -> &ConveyorStation {
        &self.station
    }

    pub fn product(&self) -> Option<&Product> {
        self.product.as_ref()
    }

    pub fn selected_channels(&self) -> Vec<&str> {
        let Some(sensor) = self.station.sensor() else {
            return Vec::new();
        };
        sensor
            .channels()
            .iter()
            .zip(&self.selected)
            .filter(|(_, on)| **on)
            .map(|(c, _)| c.as_str())
            .collect()
    }

    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Run one station tick with the current beam product.
    pub fn step(&mut self) -> TickOutcome {
        let outcome = self.station.tick(self.product.as_mut());
        self.history.push_back(summarize(&outcome));
        while self.history.len() > self.config.history_len {
            self.history.pop_front();
        }
        outcome
    }

    fn refresh_product(&mut self) {
        let channels: Vec<String> = self.selected_channels().iter().map(|c| c.to_string()).collect();
        if let Some(product) = self.product.as_mut() {
            product.set_properties(&channels);
        }
    }

    pub fn handle_key_event(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                self.show_help = !self.show_help;
            }
            KeyCode::Char(' ') | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.step();
            }
            KeyCode::Char('b') | KeyCode::Char('B') => {
                self.product = match self.product.take() {
                    Some(_) => None,
                    None => Some(Product::default()),
                };
                self.refresh_product();
                debug!(beam = self.product.is_some(), "beam toggled");
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let index = c.to_digit(10).and_then(|d| (d as usize).checked_sub(1));
                if let Some(on) = index.and_then(|i| self.selected.get_mut(i)) {
                    *on = !*on;
                    self.refresh_product();
                }
            }
            _ => {}
        }
    }

    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let _guard = TerminalGuard::enter()?;
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        let timeout = Duration::from_millis(self.config.refresh_rate_ms);
        self.run_loop(&mut terminal, || read_key(timeout))?;
        Ok(())
    }

    /// Draw and dispatch keys until quit or the first I/O error, which is returned.
    pub fn run_loop<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        mut next_key: impl FnMut() -> io::Result<Option<KeyCode>>,
    ) -> io::Result<()> {
        self.running = true;
        let result = loop {
            if let Err(e) = terminal.draw(|f| self.draw_ui(f)) {
                break Err(e);
            }
            match next_key() {
                Ok(Some(key)) => self.handle_key_event(key),
                Ok(None) => {}
                Err(e) => break Err(e),
            }
            if !self.running {
                break Ok(());
            }
        };
        self.running = false;
        result
    }

    fn draw_ui(&self, f: &mut Frame) {
        let size = f.size();

        if self.show_help {
            self.draw_help_screen(f);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Title bar
                Constraint::Min(8),    // Main content
                Constraint::Length(self.config.history_len.min(MAX_HISTORY_ROWS) as u16 + 2),
            ])
            .split(size);

        let title_text = vec![
            Line::from(vec![Span::styled(
                format!("{}  {}", self.station.name(), self.station.description()),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(vec![
                Span::styled("space/n", Style::default().fg(Color::Yellow)),
                Span::raw("=step, "),
                Span::styled("b", Style::default().fg(Color::Yellow)),
                Span::raw("=beam, "),
                Span::styled("1-9", Style::default().fg(Color::Yellow)),
                Span::raw("=channels, "),
                Span::styled("h", Style::default().fg(Color::Yellow)),
                Span::raw("=help, "),
                Span::styled("q", Style::default().fg(Color::Yellow)),
                Span::raw("=quit"),
            ]),
        ];
        let title = Paragraph::new(title_text)
            .block(Block::default().borders(Borders::ALL).title("Station"))
            .wrap(Wrap { trim: true });
        f.render_widget(title, chunks[0]);

        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[1]);

        self.draw_sources(f, content_chunks[0]);
        if self.config.show_gates {
            self.draw_gates(f, content_chunks[1]);
        }
        self.draw_history(f, chunks[2]);
    }

    fn draw_sources(&self, f: &mut Frame, area: Rect) {
        let circuit = self.station.circuit();
        let mut lines = Vec::new();

        let product = match &self.product {
            Some(p) if p.properties().is_empty() => "(blank product)".to_string(),
            Some(p) => p.properties().join(", "),
            None => "(empty)".to_string(),
        };
        lines.push(Line::from(format!("In beam: {}", product)));
        lines.push(Line::from(pin_spans("beam", self.station.beam().value(circuit))));

        if let Some(sensor) = self.station.sensor() {
            let values = sensor.values(circuit);
            for (i, (channel, value)) in sensor.channels().iter().zip(values).enumerate() {
                let marker = if self.selected.get(i).copied().unwrap_or(false) { "*" } else { " " };
                let mut spans = vec![Span::raw(format!("{}{} ", i + 1, marker))];
                spans.extend(pin_spans(channel, value));
                lines.push(Line::from(spans));
            }
        }

        lines.push(Line::from(""));
        let kicker = self.station.kicker();
        let mut spans = pin_spans("kicker", self.station.sink_value());
        spans.push(Span::raw(format!("kicks {}", kicker.kicks())));
        if kicker.is_kicking() {
            spans.push(Span::styled(" KICK", Style::default().fg(Color::Red)));
        }
        lines.push(Line::from(spans));

        let widget = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Sources / Sink"))
            .wrap(Wrap { trim: true });
        f.render_widget(widget, area);
    }

    fn draw_gates(&self, f: &mut Frame, area: Rect) {
        let circuit = self.station.circuit();
        let report = self.station.last_report();
        let mut lines = Vec::new();

        for id in circuit.gate_ids() {
            let Some(gate) = circuit.gate(id) else {
                continue;
            };
            let mut spans = vec![Span::styled(
                format!("{:<8} {:<3} ", gate.name(), gate.kind().to_string()),
                Style::default().add_modifier(Modifier::BOLD),
            )];
            for (name, pin) in gate.kind().input_names().iter().zip(gate.inputs()) {
                spans.extend(pin_spans(name, circuit.input_value(*pin)));
            }
            spans.push(Span::raw("-> "));
            for (name, pin) in gate.kind().output_names().iter().zip(gate.outputs()) {
                spans.extend(pin_spans(name, circuit.output_value(*pin)));
            }
            if self.config.show_report {
                spans.push(evaluation_label(report.and_then(|r| r.evaluation_of(id))));
            }
            lines.push(Line::from(spans));
        }
        if lines.is_empty() {
            lines.push(Line::from("No gates placed"));
        }

        let widget = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Gates"))
            .wrap(Wrap { trim: true });
        f.render_widget(widget, area);
    }

    fn draw_history(&self, f: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self.history().map(|l| Line::from(l.to_string())).collect();
        let widget = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("History"));
        f.render_widget(widget, area);
    }

    fn draw_help_screen(&self, f: &mut Frame) {
        let size = f.size();
        let key = |k: &'static str, text: &'static str| {
            Line::from(vec![
                Span::styled(k, Style::default().fg(Color::Yellow)),
                Span::raw(text),
            ])
        };
        let mut help_text = vec![
            Line::from(vec![Span::styled(
                "Conveyor Logic Console Help",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            key("  space, n", " - Run one tick"),
            key("  b", " - Put a product in the beam or take it out"),
            key("  1-9", " - Toggle a sensor channel on the product"),
            key("  h", " - Show/hide this help"),
            key("  q, Esc", " - Quit"),
            Line::from(""),
            Line::from("Pin values:"),
        ];
        for value in [TriState::Unknown, TriState::False, TriState::True] {
            help_text.push(Line::from(pin_spans(value.to_str(), value)));
        }

        let help = Paragraph::new(help_text)
            .style(Style::default().fg(Color::White))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Help"));
        f.render_widget(help, size);
    }
}

/// Raw mode and the alternate screen, undone on drop however the console exits.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self, Box<dyn std::error::Error>> {
        enable_raw_mode().map_err(|e| format!("Failed to enable raw mode: {}", e))?;
        let guard = TerminalGuard;
        execute!(io::stdout(), EnterAlternateScreen)
            .map_err(|e| format!("Failed to enter alternate screen: {}", e))?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!("Failed to disable raw mode: {}", e);
        }
        if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen, Show) {
            warn!("Failed to leave alternate screen: {}", e);
        }
    }
}

fn read_key(timeout: Duration) -> io::Result<Option<KeyCode>> {
    if event::poll(timeout)? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(Some(key.code));
            }
        }
    }
    Ok(None)
}

/// Public interface for launching the console
pub fn run_console(
    station: ConveyorStation,
    config: ConsoleConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = ConsoleApp::new(station, config);
    app.run()
}
