use std::sync::Arc;
use std::time::Duration;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::Theme;
use crate::config::{KeyResolver, UpdateAction};
use crate::platform::{ControllerChange, UpdateRegistration};
use crate::timer::{self, Mailbox, Timer};
use crate::ui::{Component, EventResult, Keybinding, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateEvent {
    Reload,
}

#[derive(Debug, Clone, Copy)]
struct Poll;

/// Banner offering a reload once newer site content is available.
pub struct UpdateNotification {
    registration: Option<Arc<dyn UpdateRegistration>>,
    changes: Option<broadcast::Receiver<ControllerChange>>,
    visible: bool,
    mailbox: Mailbox<Poll>,
    poll: Option<Timer>,
    poll_every: Duration,
    resolver: Arc<KeyResolver>,
}

impl UpdateNotification {
    pub fn new(
        registration: Option<Arc<dyn UpdateRegistration>>,
        poll_every: Duration,
        resolver: Arc<KeyResolver>,
    ) -> Self {
        Self {
            registration,
            changes: None,
            visible: false,
            mailbox: Mailbox::new(),
            poll: None,
            poll_every,
            resolver,
        }
    }

    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Subscribe to controller changes and start polling for updates.
    pub fn start(&mut self) {
        let Some(registration) = &self.registration else {
            return;
        };
        if self.poll.is_some() {
            return;
        }
        self.changes = Some(registration.subscribe());
        self.poll = Some(timer::every(self.poll_every, self.mailbox.sender(), Poll));
    }

    pub fn stop(&mut self) {
        self.poll = None;
        self.changes = None;
        self.mailbox.drain();
    }

    fn poll_changes(&mut self) {
        let Some(changes) = self.changes.as_mut() else {
            return;
        };
        loop {
            match changes.try_recv() {
                Ok(ControllerChange) | Err(TryRecvError::Lagged(_)) => {
                    if !self.visible {
                        tracing::info!("Update available");
                    }
                    self.visible = true;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Closed) => {
                    self.changes = None;
                    break;
                }
            }
        }
    }

    pub fn keybindings(&self) -> Vec<Keybinding> {
        if !self.visible {
            return vec![];
        }
        vec![
            Keybinding::new(self.resolver.display_update(UpdateAction::Reload), "Reload"),
            Keybinding::new(self.resolver.display_update(UpdateAction::Dismiss), "Later"),
        ]
    }
}

impl Component for UpdateNotification {
    type Output = UpdateEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if !self.visible {
            return Ok(EventResult::Ignored);
        }
        if self.resolver.matches_update(&key, UpdateAction::Reload) {
            self.visible = false;
            return Ok(UpdateEvent::Reload.into());
        }
        if self.resolver.matches_update(&key, UpdateAction::Dismiss) {
            self.visible = false;
            return Ok(EventResult::Consumed);
        }
        Ok(EventResult::Ignored)
    }

    fn handle_tick(&mut self) {
        let polls = self.mailbox.drain().len();
        if polls > 0
            && self.poll.is_some()
            && let Some(registration) = &self.registration
            && let Err(err) = registration.check()
        {
            tracing::warn!("Update check failed: {err}");
        }
        self.poll_changes();
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if !self.visible {
            return;
        }
        let line = Line::from(vec![
            Span::styled(
                "✨ A new version of this page is available. ",
                Style::default().fg(theme.base()).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(
                    "{} reload · {} later",
                    self.resolver.display_update(UpdateAction::Reload),
                    self.resolver.display_update(UpdateAction::Dismiss),
                ),
                Style::default().fg(theme.mantle()),
            ),
        ]);
        frame.render_widget(
            Paragraph::new(line)
                .centered()
                .style(Style::default().bg(theme.blue())),
            area,
        );
    }
}
