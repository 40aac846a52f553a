use std::sync::Arc;
use std::time::Duration;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

use crate::Theme;
use crate::config::{KeyResolver, PopupAction, TimingConfig};
use crate::content::PopupContent;
use crate::platform::{DeviceClass, Platform, ScrollGuard};
use crate::timer::{self, Mailbox, Timer};
use crate::ui::{EventResult, Modal, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupState {
    Visible,
    Closing,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupEvent {
    Dismissed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PopupMsg {
    Timeout,
    FadeDone,
    ResizeSettled(u64),
}

/// Offer shown over the home page when it opens.
///
/// Closes on the close key or by itself after the configured timeout, then
/// fades out before it is hidden. While it is on screen the page scroll lock
/// is held; the guard is dropped when the popup becomes hidden or is torn
/// down, whichever comes first.
pub struct PopupModal {
    content: PopupContent,
    platform: Arc<dyn Platform>,
    resolver: Arc<KeyResolver>,
    state: PopupState,
    device: DeviceClass,
    guard: Option<ScrollGuard>,
    mailbox: Mailbox<PopupMsg>,
    timeout: Option<Timer>,
    fade: Option<Timer>,
    debounce: Option<Timer>,
    resize_generation: u64,
    timeout_after: Duration,
    fade_after: Duration,
    debounce_after: Duration,
}

impl PopupModal {
    pub fn new(
        content: PopupContent,
        platform: Arc<dyn Platform>,
        resolver: Arc<KeyResolver>,
        timing: &TimingConfig,
    ) -> Self {
        let device = platform.device_class();
        Self {
            content,
            platform,
            resolver,
            state: PopupState::Hidden,
            device,
            guard: None,
            mailbox: Mailbox::new(),
            timeout: None,
            fade: None,
            debounce: None,
            resize_generation: 0,
            timeout_after: timing.popup_timeout(),
            fade_after: timing.popup_fade(),
            debounce_after: timing.resize_debounce(),
        }
    }

    #[cfg(test)]
    pub const fn state(&self) -> PopupState {
        self.state
    }

    #[cfg(test)]
    pub const fn device_class(&self) -> DeviceClass {
        self.device
    }

    /// Image matching the current device class.
    pub fn image(&self) -> &str {
        match self.device {
            DeviceClass::Mobile => &self.content.mobile_image,
            DeviceClass::Desktop => &self.content.desktop_image,
        }
    }

    /// Show the popup and start the auto-close countdown. The automatic fade
    /// is scheduled from the same instant so it ends exactly timeout plus
    /// fade after opening, however late the timeout message is drained.
    pub fn open(&mut self) {
        if self.state != PopupState::Hidden {
            return;
        }
        self.device = self.platform.device_class();
        self.guard = Some(self.platform.scroll_lock().acquire());
        self.timeout = Some(timer::after(
            self.timeout_after,
            self.mailbox.sender(),
            PopupMsg::Timeout,
        ));
        self.fade = Some(timer::after(
            self.timeout_after + self.fade_after,
            self.mailbox.sender(),
            PopupMsg::FadeDone,
        ));
        self.state = PopupState::Visible;
        tracing::debug!(device = ?self.device, "Popup opened");
    }

    /// Start fading out now.
    pub fn close(&mut self) {
        if self.state != PopupState::Visible {
            return;
        }
        self.timeout = None;
        self.fade = Some(timer::after(
            self.fade_after,
            self.mailbox.sender(),
            PopupMsg::FadeDone,
        ));
        self.state = PopupState::Closing;
    }

    fn hide(&mut self) {
        self.timeout = None;
        self.fade = None;
        self.debounce = None;
        self.guard = None;
        self.state = PopupState::Hidden;
        tracing::debug!("Popup hidden");
    }

    /// Stop every timer and release the scroll lock if still held.
    pub fn teardown(&mut self) {
        self.hide();
        self.mailbox.drain();
    }

    /// The viewport changed size. Device class is recomputed once resizing
    /// has been quiet for the debounce period.
    pub fn handle_resize(&mut self) {
        if self.state == PopupState::Hidden {
            return;
        }
        self.resize_generation += 1;
        self.debounce = Some(timer::after(
            self.debounce_after,
            self.mailbox.sender(),
            PopupMsg::ResizeSettled(self.resize_generation),
        ));
    }

    pub fn handle_tick(&mut self) {
        for msg in self.mailbox.drain() {
            match msg {
                PopupMsg::Timeout if self.state == PopupState::Visible => {
                    self.timeout = None;
                    self.state = PopupState::Closing;
                }
                PopupMsg::FadeDone if self.state == PopupState::Closing => self.hide(),
                PopupMsg::ResizeSettled(generation)
                    if generation == self.resize_generation && self.state != PopupState::Hidden =>
                {
                    self.debounce = None;
                    self.device = self.platform.device_class();
                    tracing::debug!(device = ?self.device, "Popup device class updated");
                }
                _ => {}
            }
        }
    }
}

impl Modal for PopupModal {
    type Output = PopupEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        match self.state {
            PopupState::Hidden => Ok(EventResult::Ignored),
            PopupState::Visible if self.resolver.matches_popup(&key, PopupAction::Close) => {
                self.close();
                Ok(PopupEvent::Dismissed.into())
            }
            _ => Ok(EventResult::Consumed),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if self.state == PopupState::Hidden {
            return;
        }

        let (width, height) = match self.device {
            DeviceClass::Mobile => (Constraint::Percentage(90), Constraint::Percentage(60)),
            DeviceClass::Desktop => (Constraint::Percentage(55), Constraint::Percentage(45)),
        };
        let popup_area = area.centered(width, height);
        frame.render_widget(Clear, popup_area);

        let fading = self.state == PopupState::Closing;
        let (border, text, dim) = if fading {
            (theme.surface1(), theme.overlay0(), Modifier::DIM)
        } else {
            (theme.accent(), theme.text(), Modifier::empty())
        };

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.content.message.clone(),
                Style::default().fg(text).add_modifier(dim),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("🖼 {}", self.image()),
                Style::default().fg(theme.overlay1()).add_modifier(dim),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("{} to close", self.resolver.display_popup(PopupAction::Close)),
                Style::default().fg(theme.overlay0()),
            )),
        ];

        let block = Block::default()
            .title(format!(" {} ", self.content.title))
            .title_style(Style::default().fg(border).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(theme.base()));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }

    fn is_open(&self) -> bool {
        self.state != PopupState::Hidden
    }
}

impl Drop for PopupModal {
    fn drop(&mut self) {
        self.teardown();
    }
}
