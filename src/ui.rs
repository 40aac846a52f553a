pub mod components;
pub mod widgets;

mod error_dialog;
mod status_bar;
mod toast;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

pub use color_eyre::Result;

use crate::Theme;

pub use components::{Checkbox, TextInput, TextInputEvent};
pub use error_dialog::{ErrorDialog, ErrorDialogEvent};
pub use status_bar::StatusBar;
pub use toast::{Toast, ToastManager};
pub use widgets::Spinner;

/// Result of handling an input event.
///
/// - `Ignored` - The handler didn't recognize this input, the parent should try
/// - `Consumed` - The input was handled but produced no event
/// - `Event(E)` - The input was handled and produced an event for the parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventResult<E> {
    Ignored,
    Consumed,
    Event(E),
}

impl<E> EventResult<E> {
    pub const fn is_consumed(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

impl<E> From<E> for EventResult<E> {
    fn from(event: E) -> Self {
        Self::Event(event)
    }
}

/// A key and what it does, shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybinding {
    pub key: String,
    pub description: String,
}

impl Keybinding {
    pub fn new(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
        }
    }
}

/// Interactive UI building block.
///
/// Components handle key events and emit generic outputs to their parent.
/// Anything time-based happens in `handle_tick`, which the app calls a few
/// times per second.
pub trait Component {
    type Output;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        _ = key;
        Ok(EventResult::Ignored)
    }

    fn handle_tick(&mut self) {}

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);
}

/// Ephemeral overlay that blocks the page below while it is shown.
pub trait Modal {
    type Output;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>>;

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);

    fn is_open(&self) -> bool;
}

/// Full page that orchestrates components.
///
/// Pages translate component events into app-level messages. The app calls
/// `init` once when the page becomes active and `destroy` before it goes
/// away; timers and platform resources are acquired and released there.
pub trait Screen {
    type Output;

    fn init(&mut self) {}

    fn destroy(&mut self) {}

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>>;

    fn handle_tick(&mut self) {}

    /// The terminal was resized.
    fn handle_resize(&mut self) {}

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);

    fn title(&self) -> &str;

    fn keybindings(&self) -> Vec<Keybinding> {
        vec![]
    }
}
