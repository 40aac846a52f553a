use std::sync::Arc;
use std::time::Duration;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use super::Rotator;
use crate::Theme;
use crate::config::{KeyResolver, RotatorAction};
use crate::content::Banner;
use crate::ui::{Component, EventResult, Keybinding, Result};

/// Promotional carousel. Slot keys jump to a slide, the banner
/// previous/next keys step through.
pub struct FlashingBanner {
    banners: Vec<Banner>,
    rotator: Rotator,
    resolver: Arc<KeyResolver>,
}

impl FlashingBanner {
    pub fn new(banners: Vec<Banner>, interval: Duration, resolver: Arc<KeyResolver>) -> Self {
        let rotator = Rotator::new(banners.len(), interval);
        Self {
            banners,
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

    pub fn current(&self) -> Option<&Banner> {
        self.banners.get(self.rotator.index())
    }

    pub const fn index(&self) -> usize {
        self.rotator.index()
    }

    pub fn keybindings(&self) -> Vec<Keybinding> {
        if self.banners.is_empty() {
            return vec![];
        }
        vec![Keybinding::new(
            format!(
                "{} {}",
                self.resolver.display_rotator(RotatorAction::BannerPrevious),
                self.resolver.display_rotator(RotatorAction::BannerNext)
            ),
            "Slides",
        )]
    }
}

impl Component for FlashingBanner {
    type Output = ();

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.banners.is_empty() {
            return Ok(EventResult::Ignored);
        }
        let moved = if self.resolver.matches_rotator(&key, RotatorAction::BannerPrevious) {
            self.rotator.previous();
            true
        } else if self.resolver.matches_rotator(&key, RotatorAction::BannerNext) {
            self.rotator.next();
            true
        } else {
            // Slots past the last slide are left for other handlers.
            self.resolver
                .banner_slot(&key)
                .is_some_and(|slot| self.rotator.goto(slot))
        };
        Ok(if moved {
            EventResult::Consumed
        } else {
            EventResult::Ignored
        })
    }

    fn handle_tick(&mut self) {
        self.rotator.handle_tick();
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let Some(banner) = self.current() else {
            return;
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.yellow()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [caption_area, image_area, dots_area] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        let caption = Paragraph::new(Line::from(Span::styled(
            banner.caption.clone(),
            Style::default().fg(theme.yellow()).add_modifier(Modifier::BOLD),
        )))
        .centered();
        frame.render_widget(caption, caption_area);

        let image = Paragraph::new(Line::from(Span::styled(
            format!("🖼 {}", banner.image),
            Style::default().fg(theme.overlay0()),
        )))
        .centered();
        frame.render_widget(image, image_area);

        let current = self.rotator.index();
        let dots: Vec<Span> = (0..self.banners.len())
            .map(|i| {
                if i == current {
                    Span::styled("● ", Style::default().fg(theme.accent()))
                } else {
                    Span::styled("○ ", Style::default().fg(theme.surface2()))
                }
            })
            .collect();
        frame.render_widget(Paragraph::new(Line::from(dots)).centered(), dots_area);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};
    use tokio::time::sleep;

    use super::*;
    use crate::config::key::Key;
    use crate::config::keybindings::KeybindingsConfig;

    fn banners(n: usize) -> Vec<Banner> {
        (0..n)
            .map(|i| Banner {
                image: format!("/images/banner-{i}.jpg"),
                caption: format!("Offer {i}"),
            })
            .collect()
    }

    fn banner(n: usize) -> FlashingBanner {
        FlashingBanner::new(
            banners(n),
            Duration::from_millis(2_500),
            Arc::new(KeyResolver::default()),
        )
    }

    fn press(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[tokio::test(start_paused = true)]
    async fn test_advances_every_two_and_a_half_seconds() {
        let mut banner = banner(3);
        banner.start();

        sleep(Duration::from_millis(2_400)).await;
        banner.handle_tick();
        assert_eq!(banner.index(), 0);

        sleep(Duration::from_millis(200)).await;
        banner.handle_tick();
        assert_eq!(banner.index(), 1);

        sleep(Duration::from_millis(5_000)).await;
        banner.handle_tick();
        assert_eq!(banner.index(), 0);
    }

    #[test]
    fn test_goto_ignores_out_of_range() {
        let mut banner = banner(3);

        assert!(banner.handle_key(press('3')).unwrap().is_consumed());
        assert_eq!(banner.index(), 2);

        assert!(!banner.handle_key(press('7')).unwrap().is_consumed());
        assert_eq!(banner.index(), 2);

        banner.handle_key(press('>')).unwrap();
        assert_eq!(banner.current().map(|b| b.caption.as_str()), Some("Offer 0"));
        banner.handle_key(press('<')).unwrap();
        assert_eq!(banner.index(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_banners_no_timer() {
        let mut banner = banner(0);
        banner.start();
        assert!(banner.current().is_none());
        assert!(banner.keybindings().is_empty());
        assert!(!banner.handle_key(press('1')).unwrap().is_consumed());
    }

    #[test]
    fn test_configured_keys_replace_defaults() {
        let mut keybindings = KeybindingsConfig::default();
        keybindings.rotator.banner_next = Key::new(KeyCode::Char('n')).into();
        keybindings.rotator.banner_slots = vec![Key::new(KeyCode::F(1)), Key::new(KeyCode::F(2))];
        let mut banner = FlashingBanner::new(
            banners(3),
            Duration::from_millis(2_500),
            Arc::new(KeyResolver::new(Arc::new(keybindings))),
        );

        assert!(!banner.handle_key(press('>')).unwrap().is_consumed());
        assert!(!banner.handle_key(press('2')).unwrap().is_consumed());
        assert_eq!(banner.index(), 0);

        banner.handle_key(press('n')).unwrap();
        assert_eq!(banner.index(), 1);
        banner
            .handle_key(KeyEvent::new(KeyCode::F(1), KeyModifiers::NONE))
            .unwrap();
        assert_eq!(banner.index(), 0);
        assert_eq!(banner.keybindings()[0].key, "< n");
    }

    #[test]
    fn test_announcement_keys_pass_through() {
        let mut banner = banner(3);
        assert!(!banner.handle_key(press('l')).unwrap().is_consumed());
        assert!(
            !banner
                .handle_key(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE))
                .unwrap()
                .is_consumed()
        );
        assert_eq!(banner.index(), 0);
    }
}
