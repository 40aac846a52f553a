use std::collections::VecDeque;
use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use tokio::time::Instant;

use super::Component;
use crate::Theme;

const TOAST_DURATION: Duration = Duration::from_secs(3);
const MAX_VISIBLE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastType {
    Success,
    Info,
}

/// Short-lived notice stacked in the bottom-right corner.
pub struct Toast {
    message: String,
    toast_type: ToastType,
    expires_at: Instant,
}

impl Toast {
    pub fn new(message: impl Into<String>, toast_type: ToastType) -> Self {
        Self {
            message: message.into(),
            toast_type,
            expires_at: Instant::now() + TOAST_DURATION,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, ToastType::Success)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, ToastType::Info)
    }
}

#[derive(Default)]
pub struct ToastManager {
    toasts: VecDeque<Toast>,
}

impl ToastManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, toast: Toast) {
        tracing::debug!(message = %toast.message, "Toast");
        self.toasts.push_back(toast);
        while self.toasts.len() > MAX_VISIBLE {
            self.toasts.pop_front();
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.toasts.len()
    }
}

impl Component for ToastManager {
    type Output = ();

    fn handle_tick(&mut self) {
        let now = Instant::now();
        self.toasts.retain(|t| t.expires_at > now);
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let height = 3u16;
        let width = 50u16.min(area.width.saturating_sub(4));

        for (i, toast) in self.toasts.iter().enumerate() {
            let offset = u16::try_from(i).unwrap_or(u16::MAX).saturating_mul(height + 1);
            let Some(y) = area
                .bottom()
                .checked_sub(height + offset + 1)
                .filter(|y| *y >= area.y)
            else {
                break;
            };
            let x = area.right().saturating_sub(width + 2);
            let toast_area = Rect::new(x, y, width, height);

            let (color, icon) = match toast.toast_type {
                ToastType::Success => (theme.green(), "✓"),
                ToastType::Info => (theme.blue(), "ℹ"),
            };

            frame.render_widget(Clear, toast_area);
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color))
                .style(Style::default().bg(theme.surface0()));
            let paragraph = Paragraph::new(format!("{icon} {}", toast.message))
                .style(Style::default().fg(theme.text()).add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(paragraph, toast_area);
        }
    }
}
