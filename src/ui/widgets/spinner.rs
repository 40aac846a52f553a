use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::Style;
use throbber_widgets_tui::WhichUse::Spin;
use throbber_widgets_tui::{BRAILLE_SIX, Throbber, ThrobberState};

use crate::Theme;
use crate::ui::Component;

/// Braille spinner with an optional label, advanced on every tick.
#[derive(Default)]
pub struct Spinner {
    state: ThrobberState,
    label: Option<String>,
}

impl Spinner {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            state: ThrobberState::default(),
            label: Some(label.into()),
        }
    }
}

impl Component for Spinner {
    type Output = ();

    fn handle_tick(&mut self) {
        self.state.calc_next();
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let mut throbber = Throbber::default()
            .throbber_set(BRAILLE_SIX)
            .use_type(Spin)
            .throbber_style(Style::default().fg(theme.accent()))
            .style(Style::default().fg(theme.subtext0()));

        let mut width = 1u16;
        if let Some(label) = &self.label {
            throbber = throbber.label(label.clone());
            width += u16::try_from(label.chars().count() + 1).unwrap_or(u16::MAX);
        }

        let area = area.centered(Constraint::Length(width), Constraint::Length(1));
        frame.render_stateful_widget(throbber, area, &mut self.state);
    }
}
