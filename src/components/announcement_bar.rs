use std::sync::Arc;
use std::time::Duration;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::Rotator;
use crate::Theme;
use crate::config::{KeyResolver, RotatorAction};
use crate::ui::{Component, EventResult, Keybinding, Result};

/// One-line strip at the top of the home page cycling through notices.
pub struct AnnouncementBar {
    announcements: Vec<String>,
    rotator: Rotator,
    resolver: Arc<KeyResolver>,
}

impl AnnouncementBar {
    pub fn new(announcements: Vec<String>, interval: Duration, resolver: Arc<KeyResolver>) -> Self {
        let rotator = Rotator::new(announcements.len(), interval);
        Self {
            announcements,
            rotator,
            resolver,
        }
    }

    pub fn start(&mut self) {
        self.rotator.start();
    }

    pub fn stop(&mut self) {
        self.rotator.stop();
    }

    pub fn current(&self) -> Option<&str> {
        self.announcements
            .get(self.rotator.index())
            .map(String::as_str)
    }

    pub const fn index(&self) -> usize {
        self.rotator.index()
    }

    pub fn keybindings(&self) -> Vec<Keybinding> {
        if self.announcements.len() < 2 {
            return vec![];
        }
        vec![Keybinding::new(
            format!(
                "{} {}",
                self.resolver.display_rotator(RotatorAction::Previous),
                self.resolver.display_rotator(RotatorAction::Next)
            ),
            "Notices",
        )]
    }
}

impl Component for AnnouncementBar {
    type Output = ();

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.announcements.is_empty() {
            return Ok(EventResult::Ignored);
        }
        if self.resolver.matches_rotator(&key, RotatorAction::Previous) {
            self.rotator.previous();
            return Ok(EventResult::Consumed);
        }
        if self.resolver.matches_rotator(&key, RotatorAction::Next) {
            self.rotator.next();
            return Ok(EventResult::Consumed);
        }
        Ok(EventResult::Ignored)
    }

    fn handle_tick(&mut self) {
        self.rotator.handle_tick();
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let Some(text) = self.current() else {
            return;
        };

        let line = Line::from(vec![
            Span::styled("📢 ", Style::default().fg(theme.base())),
            Span::styled(
                text.to_string(),
                Style::default().fg(theme.base()).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}/{}", self.rotator.index() + 1, self.rotator.len()),
                Style::default().fg(theme.surface0()),
            ),
        ]);
        let paragraph = Paragraph::new(line)
            .centered()
            .style(Style::default().bg(theme.accent()));
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use tokio::time::sleep;

    use super::*;

    fn bar(items: &[&str]) -> AnnouncementBar {
        AnnouncementBar::new(
            items.iter().map(ToString::to_string).collect(),
            Duration::from_secs(4),
            Arc::new(KeyResolver::default()),
        )
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test(start_paused = true)]
    async fn test_rotates_every_four_seconds() {
        let mut bar = bar(&["Diwali bookings open", "Free samagri", "Live stream"]);
        bar.start();
        assert_eq!(bar.current(), Some("Diwali bookings open"));

        sleep(Duration::from_millis(4_010)).await;
        bar.handle_tick();
        assert_eq!(bar.current(), Some("Free samagri"));

        sleep(Duration::from_secs(8)).await;
        bar.handle_tick();
        assert_eq!(bar.index(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_bar_stays_put() {
        let mut bar = bar(&["a", "b"]);
        bar.start();
        bar.stop();

        sleep(Duration::from_secs(20)).await;
        bar.handle_tick();
        assert_eq!(bar.index(), 0);
    }

    #[test]
    fn test_manual_keys() {
        let mut bar = bar(&["a", "b", "c"]);
        assert!(bar.handle_key(press(KeyCode::Char('h'))).unwrap().is_consumed());
        assert_eq!(bar.current(), Some("c"));
        assert!(bar.handle_key(press(KeyCode::Right)).unwrap().is_consumed());
        assert_eq!(bar.current(), Some("a"));
        assert!(!bar.handle_key(press(KeyCode::Char('z'))).unwrap().is_consumed());
        // Banner keys are not ours.
        assert!(!bar.handle_key(press(KeyCode::Char('>'))).unwrap().is_consumed());
        assert_eq!(bar.keybindings()[0].key, "h/Left l/Right");
    }

    #[test]
    fn test_empty_bar_renders_nothing() {
        let mut bar = bar(&[]);
        bar.start();
        assert!(bar.current().is_none());
        assert!(!bar.handle_key(press(KeyCode::Right)).unwrap().is_consumed());

        let mut terminal = Terminal::new(TestBackend::new(40, 1)).unwrap();
        terminal
            .draw(|frame| bar.render(frame, frame.area(), &Theme::default()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        assert!(buffer.content().iter().all(|cell| cell.symbol() == " "));
    }
}
