use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::Theme;
use crate::ui::Component;

pub struct Checkbox {
    label: String,
    checked: bool,
    focused: bool,
}

impl Checkbox {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            checked: false,
            focused: false,
        }
    }

    pub const fn is_checked(&self) -> bool {
        self.checked
    }

    #[cfg(test)]
    pub const fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    pub const fn toggle(&mut self) {
        self.checked = !self.checked;
    }

    pub const fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

impl Component for Checkbox {
    type Output = ();

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let mark = if self.checked { "[x]" } else { "[ ]" };
        let mut label_style = Style::default().fg(theme.text());
        if self.focused {
            label_style = label_style.bg(theme.selection_bg()).add_modifier(Modifier::BOLD);
        }
        let line = Line::from(vec![
            Span::styled(mark, Style::default().fg(theme.red()).add_modifier(Modifier::BOLD)),
            Span::raw(" "),
            Span::styled(self.label.clone(), label_style),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}
