//! Purpose: System clipboard dispatch for the workbench.
//! Exports: `SystemClipboard`.
//! Role: Non-blocking arboard writer; completion lands on the workbench event channel.

use std::sync::mpsc::Sender;
use std::thread;

use super::WorkbenchEvent;
use super::controller::ClipboardSink;

pub struct SystemClipboard {
    events: Sender<WorkbenchEvent>,
}

impl SystemClipboard {
    pub fn new(events: Sender<WorkbenchEvent>) -> Self {
        Self { events }
    }
}

impl ClipboardSink for SystemClipboard {
    fn write_text(&self, text: String) {
        let events = self.events.clone();
        thread::spawn(move || {
            let result = write_system_clipboard(&text).map_err(|err| err.to_string());
            let _ = events.send(WorkbenchEvent::CopyDone(result));
        });
    }
}

fn write_system_clipboard(text: &str) -> Result<(), arboard::Error> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(text)?;
    Ok(())
}
