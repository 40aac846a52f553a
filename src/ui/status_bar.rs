use std::sync::Arc;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::Theme;
use crate::config::{GlobalAction, KeyResolver};
use crate::ui::Keybinding;

const BRAND: &str = "🪔 pujaseva";

/// Bottom bar: page title on the left, key hints on the right.
pub struct StatusBar {
    resolver: Arc<KeyResolver>,
}

impl StatusBar {
    pub const fn new(resolver: Arc<KeyResolver>) -> Self {
        Self { resolver }
    }

    pub fn global_keybindings(&self) -> Vec<Keybinding> {
        vec![
            Keybinding::new(self.resolver.display_global(GlobalAction::Back), "Back"),
            Keybinding::new(self.resolver.display_global(GlobalAction::Quit), "Quit"),
        ]
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        title: &str,
        page_keybindings: &[Keybinding],
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.surface1()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [left, right] =
            Layout::horizontal([Constraint::Length(32), Constraint::Min(10)]).areas(inner);

        let heading = Line::from(vec![
            Span::styled(
                BRAND,
                Style::default().fg(theme.accent()).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" › ", Style::default().fg(theme.surface2())),
            Span::styled(title.to_string(), Style::default().fg(theme.lavender())),
        ]);
        frame.render_widget(Paragraph::new(heading), left);

        let global = self.global_keybindings();
        let mut spans = Vec::new();
        for kb in page_keybindings.iter().chain(global.iter()) {
            if !spans.is_empty() {
                spans.push(Span::styled("  ", Style::default()));
            }
            spans.push(Span::styled(kb.key.clone(), Style::default().fg(theme.peach())));
            spans.push(Span::styled(
                format!(" {}", kb.description),
                Style::default().fg(theme.subtext0()),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)).right_aligned(), right);
    }
}
