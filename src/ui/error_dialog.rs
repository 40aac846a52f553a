use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Clear, Padding, Paragraph, Wrap};

use crate::Theme;
use crate::config::{DialogAction, KeyResolver};
use crate::ui::{EventResult, Modal, Result};

pub enum ErrorDialogEvent {
    Dismissed,
}

/// Blocking notice for failures the page cannot recover from on its own,
/// such as a content reload that no longer parses.
pub struct ErrorDialog {
    title: String,
    message: String,
    resolver: Arc<KeyResolver>,
}

impl ErrorDialog {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        resolver: Arc<KeyResolver>,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            resolver,
        }
    }

    fn hint(&self) -> String {
        format!(
            "{} to dismiss",
            self.resolver.display_dialog(DialogAction::Dismiss)
        )
    }
}

impl Modal for ErrorDialog {
    type Output = ErrorDialogEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        Ok(if self.resolver.matches_dialog(&key, DialogAction::Dismiss) {
            ErrorDialogEvent::Dismissed.into()
        } else {
            EventResult::Consumed
        })
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let dialog = area.centered(Constraint::Percentage(60), Constraint::Percentage(40));
        frame.render_widget(Clear, dialog);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(theme.red()))
            .title(format!(" {} ", self.title))
            .title_style(Style::new().fg(theme.red()).add_modifier(Modifier::BOLD))
            .title_bottom(Line::styled(
                format!(" {} ", self.hint()),
                Style::new().fg(theme.overlay1()),
            ))
            .padding(Padding::uniform(1))
            .style(Style::new().bg(theme.base()));

        let body = Paragraph::new(Line::styled(
            self.message.as_str(),
            Style::new().fg(theme.text()),
        ))
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        frame.render_widget(body, dialog);
    }

    fn is_open(&self) -> bool {
        true
    }
}
