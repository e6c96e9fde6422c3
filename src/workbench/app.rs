//! Purpose: Workbench state: the editable input, the swapped output, options, focus.
//! Exports: `App`, `Focus`, `convert`.
//! Role: Implements `ViewTree` so the page controller can drive the terminal view.
//! Invariants: Conversion runs off-thread; results re-enter through `WorkbenchEvent`.

use std::sync::mpsc::Sender;
use std::thread;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::color_rust::{self, TokenClass};
use structsmith::api::{ErrorKind, GenerateOptions, generate_source};

use super::WorkbenchEvent;
use super::controller::{
    ClipboardSink, Exchange, PageController, Region, RequestDecision, ViewTree,
};

/// Base type name for code generated in the workbench.
const BASE_NAME: &str = "Generated";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Focus {
    Input,
    Output,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Input => Focus::Output,
            Focus::Output => Focus::Input,
        }
    }
}

pub struct App {
    pub input: String,
    pub output: Option<String>,
    pub styled: Vec<Line<'static>>,
    pub options: GenerateOptions,
    pub focus: Focus,
    pub input_scroll: u16,
    pub output_scroll: u16,
    pub status: String,
    pub busy: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            output: None,
            styled: Vec::new(),
            options: GenerateOptions::default(),
            focus: Focus::Input,
            input_scroll: 0,
            output_scroll: 0,
            status: "paste JSON, then Ctrl-R to convert".to_string(),
            busy: false,
            should_quit: false,
        }
    }

    pub fn handle_key(
        &mut self,
        key: KeyEvent,
        controller: &PageController,
        clipboard: &dyn ClipboardSink,
        events: &Sender<WorkbenchEvent>,
    ) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.should_quit = true,
                KeyCode::Char('r') => self.submit(controller, events),
                KeyCode::Char('y') => controller.copy(&*self, clipboard),
                KeyCode::Char('l') => {
                    self.input.clear();
                    self.input_scroll = 0;
                }
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::F(2) => self.options.sort_fields = !self.options.sort_fields,
            KeyCode::F(3) => self.options.value_comments = !self.options.value_comments,
            KeyCode::F(4) => self.options.derive_default = !self.options.derive_default,
            KeyCode::Up => self.scroll_up(1),
            KeyCode::Down => self.scroll_down(1),
            KeyCode::PageUp => self.scroll_up(10),
            KeyCode::PageDown => self.scroll_down(10),
            KeyCode::Enter => self.input.push('\n'),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => {
                if !key.modifiers.contains(KeyModifiers::ALT) {
                    self.input.push(c);
                }
            }
            _ => {}
        }
    }

    pub fn handle_event(&mut self, event: WorkbenchEvent, controller: &PageController) {
        match event {
            WorkbenchEvent::Exchange(exchange) => self.apply_exchange(exchange, controller),
            WorkbenchEvent::CopyDone(Ok(())) => {
                self.status = "copied to clipboard".to_string();
            }
            WorkbenchEvent::CopyDone(Err(err)) => {
                self.status = format!("copy failed: {err}");
            }
        }
    }

    /// Validate and, if allowed, run the conversion on a worker thread.
    /// Cancelled submissions change nothing visible.
    pub fn submit(&mut self, controller: &PageController, events: &Sender<WorkbenchEvent>) {
        if self.busy {
            return;
        }
        if controller.before_request(&*self) == RequestDecision::Cancel {
            return;
        }
        self.busy = true;
        self.status = "converting...".to_string();
        let options = self.options.clone();
        let input = self.input.clone();
        let events = events.clone();
        thread::spawn(move || {
            let _ = events.send(WorkbenchEvent::Exchange(convert(&options, &input)));
        });
    }

    /// Run one response through the controller: gate, swap, restyle, in order.
    pub fn apply_exchange(&mut self, mut exchange: Exchange, controller: &PageController) {
        self.busy = false;
        controller.before_swap(&mut exchange);
        if exchange.should_swap {
            self.swap(exchange.body);
            controller.after_swap(self);
            self.status = "converted".to_string();
            self.output_scroll = 0;
        } else if exchange.is_error {
            self.status = exchange.body;
        }
    }

    fn scroll_up(&mut self, lines: u16) {
        let scroll = match self.focus {
            Focus::Input => &mut self.input_scroll,
            Focus::Output => &mut self.output_scroll,
        };
        *scroll = scroll.saturating_sub(lines);
    }

    fn scroll_down(&mut self, lines: u16) {
        let limit = match self.focus {
            Focus::Input => self.input.lines().count(),
            Focus::Output => self.styled.len(),
        };
        let limit = u16::try_from(limit).unwrap_or(u16::MAX);
        let scroll = match self.focus {
            Focus::Input => &mut self.input_scroll,
            Focus::Output => &mut self.output_scroll,
        };
        *scroll = scroll.saturating_add(lines).min(limit);
    }
}

impl ViewTree for App {
    fn text(&self, region: Region) -> Option<String> {
        match region {
            Region::Input => Some(self.input.clone()),
            Region::Output => self.output.clone(),
        }
    }

    fn swap(&mut self, content: String) {
        self.styled = plain_lines(&content);
        self.output = Some(content);
    }

    fn restyle(&mut self, region: Region) {
        if region != Region::Output {
            return;
        }
        if let Some(output) = &self.output {
            self.styled = highlighted_lines(output);
        }
    }
}

/// Run the converter and express the outcome as a response exchange,
/// mirroring the web endpoint's status mapping.
pub fn convert(options: &GenerateOptions, input: &str) -> Exchange {
    match generate_source(options, BASE_NAME, input) {
        Ok(code) => Exchange::new(200, code),
        Err(err) => {
            let status = match err.kind() {
                ErrorKind::Usage | ErrorKind::Parse => 400,
                ErrorKind::NotFound => 404,
                ErrorKind::Io | ErrorKind::Internal => 500,
            };
            let message = err.message().unwrap_or("generation failed").to_string();
            Exchange::new(status, format!("error: {message}"))
        }
    }
}

fn plain_lines(text: &str) -> Vec<Line<'static>> {
    text.lines().map(|line| Line::from(line.to_string())).collect()
}

fn highlighted_lines(text: &str) -> Vec<Line<'static>> {
    text.lines()
        .map(|line| {
            let spans = color_rust::scan_line(line)
                .into_iter()
                .map(|(class, span)| Span::styled(span.to_string(), token_style(class)))
                .collect::<Vec<_>>();
            Line::from(spans)
        })
        .collect()
}

// Terminal cousins of the ANSI palette in color_rust.
fn token_style(class: TokenClass) -> Style {
    match class {
        TokenClass::Keyword => Style::default().fg(Color::Magenta),
        TokenClass::TypeName => Style::default().fg(Color::Cyan),
        TokenClass::StringLit => Style::default().fg(Color::Green),
        TokenClass::Number => Style::default().fg(Color::Yellow),
        TokenClass::Attribute => Style::default().fg(Color::Yellow),
        TokenClass::Comment => Style::default().fg(Color::DarkGray),
        TokenClass::Plain => Style::default(),
    }
}
