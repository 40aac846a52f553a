use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState};

use crate::Theme;
use crate::catalog::{Catalog, FeatureIcon, Selection, ServiceTier, TierOption, format_price};
use crate::config::{KeyResolver, NavAction};
use crate::ui::{Component, EventResult, Keybinding, Result};

/// Reported when the visitor picks an option. The page applies it to its
/// selection as a tier change followed by an option change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TierEvent {
    Selected { tier: String, option: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row {
    Tier(usize),
    Option(usize, usize),
}

/// Accordion of service tiers. At most one tier is expanded, and only the
/// expanded tier's options can be focused.
pub struct TierSelector {
    catalog: Arc<Catalog>,
    selection: Selection,
    expanded: Option<usize>,
    state: ListState,
    resolver: Arc<KeyResolver>,
}

impl TierSelector {
    pub fn new(catalog: Arc<Catalog>, resolver: Arc<KeyResolver>) -> Self {
        let mut state = ListState::default();
        if !catalog.is_empty() {
            state.select(Some(0));
        }
        Self {
            catalog,
            selection: Selection::default(),
            expanded: None,
            state,
            resolver,
        }
    }

    /// Mirror the page's selection so the chosen option is highlighted.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    pub fn expanded(&self) -> Option<&str> {
        self.expanded
            .and_then(|i| self.catalog.tiers().get(i))
            .map(|t| t.key.as_str())
    }

    fn rows(&self) -> Vec<Row> {
        let mut rows = Vec::new();
        for (t, tier) in self.catalog.tiers().iter().enumerate() {
            rows.push(Row::Tier(t));
            if self.expanded == Some(t) {
                rows.extend((0..tier.options.len()).map(|o| Row::Option(t, o)));
            }
        }
        rows
    }

    fn focused(&self) -> Option<Row> {
        self.state
            .selected()
            .and_then(|i| self.rows().get(i).copied())
    }

    /// Expand the tier, or collapse it when it is already expanded.
    pub fn toggle(&mut self, key: &str) {
        let Some(position) = self.catalog.tiers().iter().position(|t| t.key == key) else {
            return;
        };
        self.expanded = if self.expanded == Some(position) {
            None
        } else {
            Some(position)
        };

        let row = self.rows().iter().position(|r| *r == Row::Tier(position));
        self.state.select(row);
    }

    /// The event for picking `option` of `tier`, if that option is reachable.
    pub fn pick_option(&self, tier: &str, option: &str) -> Option<TierEvent> {
        if self.expanded() != Some(tier) {
            return None;
        }
        self.catalog.tier(tier)?.option(option)?;
        Some(TierEvent::Selected {
            tier: tier.to_string(),
            option: option.to_string(),
        })
    }

    fn move_focus(&mut self, delta: isize) {
        let len = self.rows().len();
        if len == 0 {
            return;
        }
        let current = self.state.selected().unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(len - 1);
        self.state.select(Some(next));
    }

    pub fn keybindings(&self) -> Vec<Keybinding> {
        if self.catalog.is_empty() {
            return vec![];
        }
        vec![
            Keybinding::new(
                format!(
                    "{}/{}",
                    self.resolver.display_nav(NavAction::Up),
                    self.resolver.display_nav(NavAction::Down)
                ),
                "Move",
            ),
            Keybinding::new(self.resolver.display_nav(NavAction::Select), "Choose"),
        ]
    }

    fn tier_item(&self, tier: &ServiceTier, expanded: bool, theme: &Theme) -> ListItem<'static> {
        let marker = if expanded { "▾ " } else { "▸ " };
        let price = self
            .catalog
            .displayed_price(&tier.key, &self.selection)
            .unwrap_or(tier.price);
        let chosen = self.selection.tier_key() == Some(tier.key.as_str());

        let mut lines = vec![Line::from(vec![
            Span::styled(marker, Style::default().fg(theme.overlay1())),
            Span::styled(
                tier.name.clone(),
                Style::default()
                    .fg(if chosen { theme.accent() } else { theme.text() })
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", format_price(price)),
                Style::default().fg(theme.green()),
            ),
            Span::styled(
                format!("  {}", tier.description),
                Style::default().fg(theme.subtext0()),
            ),
        ])];
        if expanded {
            lines.extend(feature_lines(&tier.features, 4, theme));
        }
        ListItem::new(Text::from(lines))
    }

    fn option_item(&self, tier: &ServiceTier, option: &TierOption, theme: &Theme) -> ListItem<'static> {
        let chosen = self.selection.tier_key() == Some(tier.key.as_str())
            && self.selection.option_id() == Some(option.id.as_str());
        let radio = if chosen { "    ● " } else { "    ○ " };

        let mut lines = vec![Line::from(vec![
            Span::styled(radio, Style::default().fg(theme.accent())),
            Span::styled(option.name.clone(), Style::default().fg(theme.text())),
            Span::styled(
                format!(
                    "  {} · {} · {}",
                    option.duration,
                    option.pandit_label(),
                    format_price(option.price)
                ),
                Style::default().fg(theme.subtext0()),
            ),
        ])];
        if !option.description.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("      {}", option.description),
                Style::default().fg(theme.overlay1()),
            )));
        }
        lines.extend(feature_lines(&option.features, 6, theme));
        ListItem::new(Text::from(lines))
    }
}

fn feature_lines(features: &[String], indent: usize, theme: &Theme) -> Vec<Line<'static>> {
    features
        .iter()
        .map(|feature| {
            let icon = FeatureIcon::classify(feature);
            Line::from(vec![
                Span::raw(" ".repeat(indent)),
                Span::styled(format!("{} ", icon.glyph()), Style::default().fg(theme.peach())),
                Span::styled(feature.clone(), Style::default().fg(theme.subtext0())),
            ])
        })
        .collect()
}

impl Component for TierSelector {
    type Output = TierEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.catalog.is_empty() {
            return Ok(EventResult::Ignored);
        }
        if self.resolver.matches_nav(&key, NavAction::Up) {
            self.move_focus(-1);
            return Ok(EventResult::Consumed);
        }
        if self.resolver.matches_nav(&key, NavAction::Down) {
            self.move_focus(1);
            return Ok(EventResult::Consumed);
        }
        if self.resolver.matches_nav(&key, NavAction::Select) {
            let catalog = Arc::clone(&self.catalog);
            return Ok(match self.focused() {
                Some(Row::Tier(t)) => {
                    self.toggle(&catalog.tiers()[t].key);
                    EventResult::Consumed
                }
                Some(Row::Option(t, o)) => {
                    let tier = &catalog.tiers()[t];
                    self.pick_option(&tier.key, &tier.options[o].id)
                        .map_or(EventResult::Consumed, EventResult::Event)
                }
                None => EventResult::Ignored,
            });
        }
        Ok(EventResult::Ignored)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if self.catalog.is_empty() {
            return;
        }

        let catalog = Arc::clone(&self.catalog);
        let items: Vec<ListItem> = self
            .rows()
            .into_iter()
            .map(|row| match row {
                Row::Tier(t) => self.tier_item(&catalog.tiers()[t], self.expanded == Some(t), theme),
                Row::Option(t, o) => {
                    let tier = &catalog.tiers()[t];
                    self.option_item(tier, &tier.options[o], theme)
                }
            })
            .collect();

        let block = Block::default()
            .title(" Choose your puja ")
            .title_style(Style::default().fg(theme.lavender()).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.surface1()));

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(theme.selection_bg()));
        frame.render_stateful_widget(list, area, &mut self.state);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::catalog::fixtures::catalog;

    fn selector() -> TierSelector {
        TierSelector::new(Arc::new(catalog()), Arc::new(KeyResolver::default()))
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_only_one_tier_expanded() {
        let mut selector = selector();
        selector.toggle("basic");
        assert_eq!(selector.expanded(), Some("basic"));

        selector.toggle("premium");
        assert_eq!(selector.expanded(), Some("premium"));

        selector.toggle("premium");
        assert_eq!(selector.expanded(), None);

        selector.toggle("nonexistent");
        assert_eq!(selector.expanded(), None);
    }

    #[test]
    fn test_collapsed_options_unreachable() {
        let mut selector = selector();
        assert_eq!(selector.pick_option("basic", "b1"), None);

        selector.toggle("premium");
        assert_eq!(selector.pick_option("basic", "b1"), None);
        assert_eq!(selector.pick_option("premium", "b1"), None);
        assert_eq!(
            selector.pick_option("premium", "p2"),
            Some(TierEvent::Selected {
                tier: "premium".to_string(),
                option: "p2".to_string(),
            })
        );

        // Without an expanded tier, focus only visits tier headers.
        selector.toggle("premium");
        for _ in 0..5 {
            selector.handle_key(press(KeyCode::Down)).unwrap();
        }
        assert_eq!(selector.focused(), Some(Row::Tier(1)));
    }

    #[test]
    fn test_keyboard_selects_option() {
        let mut selector = selector();

        // Expand "basic", step onto its second option and choose it.
        assert_eq!(
            selector.handle_key(press(KeyCode::Enter)).unwrap(),
            EventResult::Consumed
        );
        selector.handle_key(press(KeyCode::Down)).unwrap();
        selector.handle_key(press(KeyCode::Char('j'))).unwrap();
        let result = selector.handle_key(press(KeyCode::Enter)).unwrap();
        assert_eq!(
            result,
            EventResult::Event(TierEvent::Selected {
                tier: "basic".to_string(),
                option: "b2".to_string(),
            })
        );
    }

    #[test]
    fn test_focus_follows_toggled_tier() {
        let mut selector = selector();
        selector.toggle("basic");
        // basic, b1, b2, premium
        selector.state.select(Some(3));
        selector.handle_key(press(KeyCode::Enter)).unwrap();
        assert_eq!(selector.expanded(), Some("premium"));
        assert_eq!(selector.focused(), Some(Row::Tier(1)));
    }

    #[test]
    fn test_empty_catalog_renders_nothing() {
        let mut selector =
            TierSelector::new(Arc::new(Catalog::default()), Arc::new(KeyResolver::default()));
        assert_eq!(
            selector.handle_key(press(KeyCode::Enter)).unwrap(),
            EventResult::Ignored
        );

        let mut terminal = Terminal::new(TestBackend::new(30, 8)).unwrap();
        terminal
            .draw(|frame| selector.render(frame, frame.area(), &Theme::default()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        assert!(buffer.content().iter().all(|cell| cell.symbol() == " "));
    }
}
