use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};

use super::{PageMsg, Route};
use crate::Theme;
use crate::catalog::{Catalog, FeatureIcon, Selection, format_price};
use crate::components::{
    AnnouncementBar, FlashingBanner, PopupModal, TierEvent, TierSelector, UpdateEvent,
    UpdateNotification,
};
use crate::config::{GlobalAction, KeyResolver, NavAction, PopupAction, TimingConfig};
use crate::content::SiteContent;
use crate::platform::Platform;
use crate::ui::{Component, EventResult, Keybinding, Modal, Result, Screen};

const SCROLL_STEP: u16 = 5;

/// Booking page: notices on top, the tier accordion with a summary of the
/// current choice below, and the offer popup over everything on first load.
pub struct HomePage {
    catalog: Arc<Catalog>,
    selection: Selection,
    update: UpdateNotification,
    announcements: AnnouncementBar,
    banner: FlashingBanner,
    tiers: TierSelector,
    popup: Option<PopupModal>,
    platform: Arc<dyn Platform>,
    resolver: Arc<KeyResolver>,
    scroll: u16,
}

impl HomePage {
    pub fn new(
        content: SiteContent,
        platform: Arc<dyn Platform>,
        resolver: Arc<KeyResolver>,
        timing: &TimingConfig,
    ) -> Self {
        let catalog = Arc::new(content.tiers);
        let popup = content.popup.map(|popup| {
            PopupModal::new(popup, Arc::clone(&platform), Arc::clone(&resolver), timing)
        });

        Self {
            selection: Selection::default(),
            update: UpdateNotification::new(
                platform.update_registration(),
                timing.update_poll(),
                Arc::clone(&resolver),
            ),
            announcements: AnnouncementBar::new(
                content.announcements,
                timing.announcement_interval(),
                Arc::clone(&resolver),
            ),
            banner: FlashingBanner::new(
                content.banners,
                timing.banner_interval(),
                Arc::clone(&resolver),
            ),
            tiers: TierSelector::new(Arc::clone(&catalog), Arc::clone(&resolver)),
            catalog,
            popup,
            platform,
            resolver,
            scroll: 0,
        }
    }

    fn popup_open(&self) -> bool {
        self.popup.as_ref().is_some_and(|popup| popup.is_open())
    }

    /// Apply a pick from the tier selector: tier first, then option.
    fn apply_selection(&mut self, tier: &str, option: &str) -> Result<String> {
        self.selection.set_tier(&self.catalog, tier)?;
        self.selection.set_option(&self.catalog, option)?;
        self.tiers.set_selection(self.selection.clone());

        let label = match self.selection.resolve(&self.catalog) {
            Some((tier, Some(option))) => format!("{} · {}", tier.name, option.name),
            Some((tier, None)) => tier.name.clone(),
            None => String::new(),
        };
        tracing::info!(tier, option, "Selection changed");
        Ok(label)
    }

    fn scroll_by(&mut self, delta: i32) {
        if self.platform.scroll_lock().is_locked() {
            return;
        }
        self.scroll = u16::try_from((i32::from(self.scroll) + delta).max(0)).unwrap_or(u16::MAX);
    }

    fn render_summary(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let mut lines = Vec::new();
        match self.selection.resolve(&self.catalog) {
            Some((tier, option)) => {
                lines.push(Line::from(Span::styled(
                    tier.name.clone(),
                    Style::default().fg(theme.accent()).add_modifier(Modifier::BOLD),
                )));
                if let Some(option) = option {
                    lines.push(Line::from(Span::styled(
                        option.name.clone(),
                        Style::default().fg(theme.text()),
                    )));
                    lines.push(Line::from(Span::styled(
                        format!("{} · {}", option.duration, option.pandit_label()),
                        Style::default().fg(theme.subtext0()),
                    )));
                }
                lines.push(Line::from(""));
                let features = option.map_or(&tier.features, |o| &o.features);
                for feature in features {
                    lines.push(Line::from(vec![
                        Span::styled(
                            format!("{} ", FeatureIcon::classify(feature).glyph()),
                            Style::default().fg(theme.peach()),
                        ),
                        Span::styled(feature.clone(), Style::default().fg(theme.subtext0())),
                    ]));
                }
                lines.push(Line::from(""));
                if let Some(price) = self.catalog.displayed_price(&tier.key, &self.selection) {
                    lines.push(Line::from(vec![
                        Span::styled("Total  ", Style::default().fg(theme.overlay1())),
                        Span::styled(
                            format_price(price),
                            Style::default().fg(theme.green()).add_modifier(Modifier::BOLD),
                        ),
                    ]));
                }
            }
            None => lines.push(Line::from(Span::styled(
                "Pick a tier and an option to see your booking.",
                Style::default().fg(theme.overlay1()),
            ))),
        }

        let block = Block::default()
            .title(" Your booking ")
            .title_style(Style::default().fg(theme.lavender()).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.surface1()));
        let summary = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));
        frame.render_widget(summary, area);
    }
}

impl Screen for HomePage {
    type Output = PageMsg;

    fn init(&mut self) {
        self.update.start();
        self.announcements.start();
        self.banner.start();
        if let Some(popup) = self.popup.as_mut() {
            popup.open();
        }
    }

    fn destroy(&mut self) {
        self.update.stop();
        self.announcements.stop();
        self.banner.stop();
        if let Some(popup) = self.popup.as_mut() {
            popup.teardown();
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if let Some(popup) = self.popup.as_mut()
            && popup.is_open()
        {
            popup.handle_key(key)?;
            return Ok(EventResult::Consumed);
        }

        match self.update.handle_key(key)? {
            EventResult::Event(UpdateEvent::Reload) => return Ok(PageMsg::Reload.into()),
            EventResult::Consumed => return Ok(EventResult::Consumed),
            EventResult::Ignored => {}
        }

        if self.resolver.matches_nav(&key, NavAction::PageDown) {
            self.scroll_by(i32::from(SCROLL_STEP));
            return Ok(EventResult::Consumed);
        }
        if self.resolver.matches_nav(&key, NavAction::PageUp) {
            self.scroll_by(-i32::from(SCROLL_STEP));
            return Ok(EventResult::Consumed);
        }

        if self.announcements.handle_key(key)?.is_consumed()
            || self.banner.handle_key(key)?.is_consumed()
        {
            return Ok(EventResult::Consumed);
        }

        match self.tiers.handle_key(key)? {
            EventResult::Event(TierEvent::Selected { tier, option }) => {
                let label = self.apply_selection(&tier, &option)?;
                return Ok(PageMsg::Toast(format!("Selected {label}")).into());
            }
            EventResult::Consumed => return Ok(EventResult::Consumed),
            EventResult::Ignored => {}
        }

        if self.resolver.matches_global(&key, GlobalAction::DeleteAccount) {
            return Ok(PageMsg::Navigate(Route::DeleteAccount).into());
        }
        Ok(EventResult::Ignored)
    }

    fn handle_tick(&mut self) {
        self.update.handle_tick();
        self.announcements.handle_tick();
        self.banner.handle_tick();
        if let Some(popup) = self.popup.as_mut() {
            popup.handle_tick();
        }
    }

    fn handle_resize(&mut self) {
        if let Some(popup) = self.popup.as_mut() {
            popup.handle_resize();
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let update_height = u16::from(self.update.is_visible());
        let announcement_height = u16::from(self.announcements.current().is_some());
        let banner_height = if self.banner.current().is_some() { 5 } else { 0 };

        let [update_area, announcement_area, banner_area, body] = Layout::vertical([
            Constraint::Length(update_height),
            Constraint::Length(announcement_height),
            Constraint::Length(banner_height),
            Constraint::Min(0),
        ])
        .areas(area);

        self.update.render(frame, update_area, theme);
        self.announcements.render(frame, announcement_area, theme);
        self.banner.render(frame, banner_area, theme);

        let [tiers_area, summary_area] =
            Layout::horizontal([Constraint::Percentage(62), Constraint::Percentage(38)])
                .areas(body);
        self.tiers.render(frame, tiers_area, theme);
        self.render_summary(frame, summary_area, theme);

        if let Some(popup) = self.popup.as_mut() {
            popup.render(frame, area, theme);
        }
    }

    fn title(&self) -> &str {
        "Book a puja"
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        if self.popup_open() {
            return vec![Keybinding::new(
                self.resolver.display_popup(PopupAction::Close),
                "Close offer",
            )];
        }

        let mut keybindings = self.update.keybindings();
        keybindings.extend(self.tiers.keybindings());
        keybindings.extend(self.announcements.keybindings());
        keybindings.extend(self.banner.keybindings());
        keybindings.push(Keybinding::new(
            self.resolver.display_global(GlobalAction::DeleteAccount),
            "Delete account",
        ));
        keybindings
    }
}

impl Drop for HomePage {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use tokio::time::sleep;

    use super::*;
    use crate::catalog::fixtures::catalog;
    use crate::content::{Banner, PopupContent};
    use crate::platform::testing::FakePlatform;

    fn content() -> SiteContent {
        SiteContent {
            announcements: vec!["Diwali slots open".to_string(), "Free prasad".to_string()],
            banners: vec![Banner {
                image: "/images/havan.jpg".to_string(),
                caption: "Griha pravesh havan".to_string(),
            }],
            popup: Some(PopupContent {
                title: "Offer".to_string(),
                message: "10% off this week".to_string(),
                desktop_image: "/images/offer-wide.jpg".to_string(),
                mobile_image: "/images/offer-tall.jpg".to_string(),
            }),
            tiers: catalog(),
        }
    }

    fn page(platform: &Arc<FakePlatform>) -> HomePage {
        let platform: Arc<dyn Platform> = platform.clone();
        HomePage::new(
            content(),
            platform,
            Arc::new(KeyResolver::default()),
            &TimingConfig::default(),
        )
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test(start_paused = true)]
    async fn test_popup_blocks_page_until_closed() {
        let platform = Arc::new(FakePlatform::desktop());
        let mut page = page(&platform);
        page.init();

        assert_eq!(page.handle_key(press(KeyCode::Enter)).unwrap(), EventResult::Consumed);
        assert_eq!(page.tiers.expanded(), None);

        page.handle_key(press(KeyCode::PageDown)).unwrap();
        assert_eq!(page.scroll, 0);

        page.handle_key(press(KeyCode::Esc)).unwrap();
        sleep(Duration::from_millis(310)).await;
        page.handle_tick();
        assert!(!page.popup_open());
        assert!(!platform.scroll_lock().is_locked());

        page.handle_key(press(KeyCode::PageDown)).unwrap();
        assert_eq!(page.scroll, SCROLL_STEP);
    }

    #[tokio::test(start_paused = true)]
    async fn test_option_pick_updates_selection() {
        let platform = Arc::new(FakePlatform::desktop());
        let mut page = page(&platform);

        // Focus premium, expand it, then step onto p2 and pick it.
        page.handle_key(press(KeyCode::Down)).unwrap();
        page.handle_key(press(KeyCode::Enter)).unwrap();
        page.handle_key(press(KeyCode::Down)).unwrap();
        page.handle_key(press(KeyCode::Down)).unwrap();
        let result = page.handle_key(press(KeyCode::Enter)).unwrap();

        assert!(matches!(result, EventResult::Event(PageMsg::Toast(_))));
        assert_eq!(page.selection.tier_key(), Some("premium"));
        assert_eq!(page.selection.option_id(), Some("p2"));
        assert_eq!(
            page.catalog.displayed_price("premium", &page.selection),
            Some(7_500)
        );
        assert_eq!(
            page.catalog.displayed_price("basic", &page.selection),
            Some(1_100)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_switching_tier_reverts_price() {
        let platform = Arc::new(FakePlatform::desktop());
        let mut page = page(&platform);

        page.apply_selection("premium", "p2").unwrap();
        assert_eq!(
            page.catalog.displayed_price("premium", &page.selection),
            Some(7_500)
        );

        page.apply_selection("basic", "b2").unwrap();
        assert_eq!(
            page.catalog.displayed_price("premium", &page.selection),
            Some(5_100)
        );
        assert_eq!(
            page.catalog.displayed_price("basic", &page.selection),
            Some(2_100)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_destroy_releases_everything() {
        let platform = Arc::new(FakePlatform::desktop());
        let lock = platform.scroll_lock().clone();
        let mut page = page(&platform);
        page.init();
        assert!(lock.is_locked());

        page.destroy();
        assert!(!lock.is_locked());
        assert_eq!(lock.release_count(), 1);

        sleep(Duration::from_secs(30)).await;
        page.handle_tick();
        assert_eq!(page.announcements.index(), 0);

        drop(page);
        assert_eq!(lock.release_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_account_shortcut() {
        let platform = Arc::new(FakePlatform::desktop());
        let mut page = page(&platform);
        let result = page
            .handle_key(KeyEvent::new(KeyCode::Char('D'), KeyModifiers::SHIFT))
            .unwrap();
        assert_eq!(result, EventResult::Event(PageMsg::Navigate(Route::DeleteAccount)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_renders_with_popup() {
        let platform = Arc::new(FakePlatform::desktop());
        let mut page = page(&platform);
        page.init();

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal
            .draw(|frame| page.render(frame, frame.area(), &Theme::default()))
            .unwrap();
        let rendered: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(rendered.contains("Offer"));
        assert!(rendered.contains("Basic"));
    }
}
