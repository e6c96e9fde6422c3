//! Terminal layout for the workbench: input and output panes, options row, status line.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::app::{App, Focus};

pub fn draw(frame: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    draw_input(frame, app, panes[0]);
    draw_output(frame, app, panes[1]);
    draw_options(frame, app, rows[1]);
    draw_status(frame, app, rows[2]);
}

fn draw_input(frame: &mut Frame, app: &App, area: Rect) {
    let mut text = app.input.clone();
    if app.focus == Focus::Input {
        text.push('\u{258c}');
    }
    let widget = Paragraph::new(text)
        .block(pane_block("JSON input", app.focus == Focus::Input))
        .scroll((app.input_scroll, 0));
    frame.render_widget(widget, area);
}

fn draw_output(frame: &mut Frame, app: &App, area: Rect) {
    let widget = Paragraph::new(app.styled.clone())
        .block(pane_block("Rust structs", app.focus == Focus::Output))
        .scroll((app.output_scroll, 0));
    frame.render_widget(widget, area);
}

fn draw_options(frame: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        toggle_span("F2 sort", app.options.sort_fields),
        Span::raw("  "),
        toggle_span("F3 comments", app.options.value_comments),
        Span::raw("  "),
        toggle_span("F4 default", app.options.derive_default),
        Span::styled(
            "   Ctrl-R convert  Ctrl-Y copy  Ctrl-L clear  Tab focus  Esc quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let style = if app.busy {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let line = Line::from(Span::styled(app.status.clone(), style));
    frame.render_widget(Paragraph::new(line), area);
}

fn pane_block(title: &str, focused: bool) -> Block<'_> {
    let block = Block::default().borders(Borders::ALL).title(title);
    if focused {
        block.border_style(Style::default().fg(Color::Cyan))
    } else {
        block
    }
}

fn toggle_span(label: &str, on: bool) -> Span<'static> {
    let marker = if on { "[x]" } else { "[ ]" };
    let style = if on {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Span::styled(format!("{marker} {label}"), style)
}
