//! Purpose: Interactive terminal workbench hosting the conversion page.
//! Exports: `run`, `WorkbenchEvent`.
//! Role: Terminal bootstrap/teardown and the event loop; conversion and clipboard
//! work run on worker threads and report back through one channel.
//! Invariants: Raw mode and the alternate screen are restored before returning.
//! Invariants: Controller handlers run on the UI thread, in order, per exchange.

mod app;
mod clipboard;
mod controller;
mod ui;

use std::io;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use structsmith::api::{Error, ErrorKind};

use app::App;
use clipboard::SystemClipboard;
use controller::{Exchange, PageController};

/// Events delivered to the UI thread from worker threads.
pub enum WorkbenchEvent {
    Exchange(Exchange),
    CopyDone(Result<(), String>),
}

pub fn run() -> Result<(), Error> {
    enable_raw_mode().map_err(|err| terminal_error("failed to enable raw mode", err))?;
    let mut stdout = io::stdout();
    if let Err(err) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(terminal_error("failed to enter the alternate screen", err));
    }
    let mut terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(terminal) => terminal,
        Err(err) => {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            let _ = disable_raw_mode();
            return Err(terminal_error("failed to initialize the terminal", err));
        }
    };

    let result = event_loop(&mut terminal);

    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();
    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<(), Error> {
    let (events_tx, events_rx) = mpsc::channel();
    let controller = PageController;
    let clipboard = SystemClipboard::new(events_tx.clone());
    let mut app = App::new();

    loop {
        terminal
            .draw(|frame| ui::draw(frame, &app))
            .map_err(|err| terminal_error("failed to draw the workbench", err))?;

        while let Ok(event) = events_rx.try_recv() {
            app.handle_event(event, &controller);
        }

        if event::poll(Duration::from_millis(50))
            .map_err(|err| terminal_error("failed to poll terminal events", err))?
        {
            let event = event::read()
                .map_err(|err| terminal_error("failed to read a terminal event", err))?;
            if let Event::Key(key) = event {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key, &controller, &clipboard, &events_tx);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn terminal_error(message: &str, err: io::Error) -> Error {
    Error::new(ErrorKind::Io)
        .with_message(message)
        .with_source(err)
}
