//! Purpose: Page behaviors for the conversion view: copy, validation, swap gating, restyle.
//! Exports: `PageController`, `ViewTree`, `ClipboardSink`, `Exchange`, `Region`, `RequestDecision`.
//! Role: Host-neutral controller; the terminal workbench (and tests) provide the view tree.
//! Invariants: Handlers are stateless; per exchange they run before_request, before_swap,
//! after_swap in that order, on one thread.
//! Invariants: `before_request` never blocks; clipboard writes are dispatched, not awaited.

use serde_json::Value;
use tracing::debug;

/// Addressable regions of the conversion view.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Region {
    Input,
    Output,
}

/// The slice of the view a controller may touch. `text` answers `None` when
/// the region is not mounted; mutators are no-ops for absent regions.
pub trait ViewTree {
    fn text(&self, region: Region) -> Option<String>;
    fn swap(&mut self, content: String);
    fn restyle(&mut self, region: Region);
}

/// Fire-and-forget clipboard. Completion (or failure) is reported through the
/// host's event stream, never through a return value here.
pub trait ClipboardSink {
    fn write_text(&self, text: String);
}

/// Outcome of pre-submission validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RequestDecision {
    Proceed,
    Cancel,
}

/// One request/response cycle against the conversion endpoint.
#[derive(Clone, Debug)]
pub struct Exchange {
    pub status: u16,
    pub body: String,
    pub should_swap: bool,
    pub is_error: bool,
}

impl Exchange {
    pub fn new(status: u16, body: String) -> Self {
        Self {
            status,
            body,
            should_swap: true,
            is_error: false,
        }
    }
}

/// Stateless controller for the conversion page.
#[derive(Clone, Copy, Debug, Default)]
pub struct PageController;

impl PageController {
    /// Send the output region's text to the clipboard. Silent no-op when no
    /// output is mounted.
    pub fn copy(&self, view: &dyn ViewTree, clipboard: &dyn ClipboardSink) {
        let Some(text) = view.text(Region::Output) else {
            return;
        };
        clipboard.write_text(text);
    }

    /// Validate the input region before a submit. Unparseable non-empty input
    /// cancels silently; everything else proceeds, including the empty string
    /// (the endpoint answers an empty document with an empty result).
    pub fn before_request(&self, view: &dyn ViewTree) -> RequestDecision {
        let Some(input) = view.text(Region::Input) else {
            return RequestDecision::Proceed;
        };
        if serde_json::from_str::<Value>(&input).is_ok() {
            return RequestDecision::Proceed;
        }
        if input.is_empty() {
            return RequestDecision::Proceed;
        }
        debug!("submit cancelled: input is not valid JSON");
        RequestDecision::Cancel
    }

    /// Gate the swap on the response status: error statuses suppress the swap
    /// and flag the exchange for the host's error surface.
    pub fn before_swap(&self, exchange: &mut Exchange) {
        if exchange.status >= 400 {
            exchange.should_swap = false;
            exchange.is_error = true;
        }
    }

    /// Restyle the output region after new content has been swapped in.
    /// Silent no-op when no output is mounted.
    pub fn after_swap(&self, view: &mut dyn ViewTree) {
        if view.text(Region::Output).is_some() {
            view.restyle(Region::Output);
        }
    }
}
