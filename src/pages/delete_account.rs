use std::sync::Arc;
use std::time::Duration;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use tokio::task::JoinHandle;

use super::{PageMsg, Route};
use crate::Theme;
use crate::account::{
    DeletionClient, DeletionError, DeletionRequest, DeletionResponse, DeletionStatus,
};
use crate::config::{FormAction, KeyResolver, NavAction, SupportConfig};
use crate::timer::Mailbox;
use crate::ui::{
    Checkbox, Component, EventResult, Keybinding, Result, Screen, Spinner, TextInput,
    TextInputEvent,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Email,
    Phone,
    Reason,
    Confirm,
    Submit,
}

impl Field {
    const ORDER: [Self; 5] = [
        Self::Email,
        Self::Phone,
        Self::Reason,
        Self::Confirm,
        Self::Submit,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    fn previous(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStatus {
    Idle,
    Submitting,
    Success,
    Error(String),
}

type Outcome = std::result::Result<DeletionResponse, DeletionError>;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Form asking for an account to be deleted.
///
/// The submit button is live only with an email, a phone number and the
/// confirmation box ticked. The request runs on a spawned task; its outcome
/// comes back through the page's mailbox on the next tick.
pub struct DeleteAccountPage {
    email: TextInput,
    phone: TextInput,
    reason: TextInput,
    confirm: Checkbox,
    focus: Field,
    status: SubmitStatus,
    client: Arc<dyn DeletionClient>,
    support: SupportConfig,
    mailbox: Mailbox<Outcome>,
    task: Option<JoinHandle<()>>,
    spinner: Spinner,
    resolver: Arc<KeyResolver>,
}

impl DeleteAccountPage {
    pub fn new(
        client: Arc<dyn DeletionClient>,
        support: SupportConfig,
        resolver: Arc<KeyResolver>,
    ) -> Self {
        let mut page = Self {
            email: TextInput::new("Email").with_placeholder("you@example.com"),
            phone: TextInput::new("Phone").with_placeholder("+91 98765 43210"),
            reason: TextInput::new("Reason (optional)"),
            confirm: Checkbox::new("I understand my account and bookings will be deleted"),
            focus: Field::Email,
            status: SubmitStatus::Idle,
            client,
            support,
            mailbox: Mailbox::new(),
            task: None,
            spinner: Spinner::new("Sending request..."),
            resolver,
        };
        page.sync_focus();
        page
    }

    fn request(&self) -> DeletionRequest {
        let reason = self.reason.value().trim();
        DeletionRequest {
            email: self.email.value().trim().to_string(),
            phone: self.phone.value().trim().to_string(),
            reason: (!reason.is_empty()).then(|| reason.to_string()),
            confirm_delete: self.confirm.is_checked(),
        }
    }

    /// Whether pressing submit would send a request.
    pub fn can_submit(&self) -> bool {
        !matches!(self.status, SubmitStatus::Submitting | SubmitStatus::Success)
            && self.request().is_complete()
    }

    /// Send the request. Returns `false` when submitting is not allowed.
    pub fn submit(&mut self) -> bool {
        if !self.can_submit() {
            return false;
        }
        let request = self.request();
        let client = Arc::clone(&self.client);
        let tx = self.mailbox.sender();
        self.status = SubmitStatus::Submitting;
        self.task = Some(tokio::spawn(async move {
            let outcome = tokio::time::timeout(REQUEST_TIMEOUT, client.request_deletion(request))
                .await
                .unwrap_or_else(|_| {
                    Err(DeletionError::Unavailable(format!(
                        "no answer after {}s",
                        REQUEST_TIMEOUT.as_secs()
                    )))
                });
            let _ = tx.send(outcome);
        }));
        true
    }

    fn finish(&mut self, outcome: Outcome) {
        self.task = None;
        self.status = match outcome {
            Ok(DeletionResponse {
                status: DeletionStatus::Success,
            }) => {
                tracing::info!("Account deletion requested");
                SubmitStatus::Success
            }
            Ok(DeletionResponse {
                status: DeletionStatus::Error,
            }) => {
                tracing::warn!("Deletion service answered with an error");
                SubmitStatus::Error("The request could not be processed.".to_string())
            }
            Err(err) => {
                tracing::warn!("Account deletion failed: {err}");
                SubmitStatus::Error(err.to_string())
            }
        };
    }

    fn set_focus(&mut self, field: Field) {
        self.focus = field;
        self.sync_focus();
    }

    fn sync_focus(&mut self) {
        self.email.set_focused(self.focus == Field::Email);
        self.phone.set_focused(self.focus == Field::Phone);
        self.reason.set_focused(self.focus == Field::Reason);
        self.confirm.set_focused(self.focus == Field::Confirm);
    }

    fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            Field::Email => Some(&mut self.email),
            Field::Phone => Some(&mut self.phone),
            Field::Reason => Some(&mut self.reason),
            Field::Confirm | Field::Submit => None,
        }
    }

    fn render_status(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let lines = match &self.status {
            SubmitStatus::Idle => return,
            SubmitStatus::Submitting => {
                self.spinner.render(frame, area, theme);
                return;
            }
            SubmitStatus::Success => vec![
                Line::from(Span::styled(
                    "✓ Your deletion request has been received.",
                    Style::default().fg(theme.green()).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "We will confirm by email within 7 working days. Press Enter to go home.",
                    Style::default().fg(theme.subtext0()),
                )),
            ],
            SubmitStatus::Error(message) => vec![
                Line::from(Span::styled(
                    format!("✗ {message}"),
                    Style::default().fg(theme.red()).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!(
                        "Please contact us at {} or {}.",
                        self.support.email, self.support.phone
                    ),
                    Style::default().fg(theme.subtext0()),
                )),
            ],
        };
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
    }
}

impl Screen for DeleteAccountPage {
    type Output = PageMsg;

    fn destroy(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.mailbox.drain();
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        match self.status {
            SubmitStatus::Submitting => {
                // Navigation and quitting stay with the app.
                return Ok(EventResult::Ignored);
            }
            SubmitStatus::Success => {
                if self.resolver.matches_nav(&key, NavAction::Select) {
                    return Ok(PageMsg::Navigate(Route::Home).into());
                }
                return Ok(EventResult::Ignored);
            }
            SubmitStatus::Idle | SubmitStatus::Error(_) => {}
        }

        if let Some(input) = self.focused_input() {
            match input.handle_key(key)? {
                EventResult::Event(TextInputEvent::Submitted(_)) => {
                    self.set_focus(self.focus.next());
                    return Ok(EventResult::Consumed);
                }
                EventResult::Consumed => return Ok(EventResult::Consumed),
                EventResult::Ignored => {}
            }
        }

        if self.resolver.matches_form(&key, FormAction::NextField) {
            self.set_focus(self.focus.next());
            return Ok(EventResult::Consumed);
        }
        if self.resolver.matches_form(&key, FormAction::PreviousField) {
            self.set_focus(self.focus.previous());
            return Ok(EventResult::Consumed);
        }

        match self.focus {
            Field::Confirm
                if self.resolver.matches_form(&key, FormAction::Toggle)
                    || self.resolver.matches_nav(&key, NavAction::Select) =>
            {
                self.confirm.toggle();
                Ok(EventResult::Consumed)
            }
            Field::Submit if self.resolver.matches_nav(&key, NavAction::Select) => {
                if self.submit() {
                    Ok(PageMsg::Toast("Sending deletion request".to_string()).into())
                } else {
                    Ok(EventResult::Consumed)
                }
            }
            _ => Ok(EventResult::Ignored),
        }
    }

    fn handle_tick(&mut self) {
        if self.status == SubmitStatus::Submitting {
            self.spinner.handle_tick();
        }
        for outcome in self.mailbox.drain() {
            self.finish(outcome);
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .title(" Delete your account ")
            .title_style(Style::default().fg(theme.red()).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.surface1()));
        let form_area = area.centered(Constraint::Max(72), Constraint::Max(24));
        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let [intro, email, phone, reason, confirm, submit, status] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(2),
        ])
        .areas(inner);

        frame.render_widget(
            Paragraph::new(
                "Tell us how to reach you and we will remove your account, saved \
                 addresses and booking history.",
            )
            .style(Style::default().fg(theme.subtext0()))
            .wrap(Wrap { trim: true }),
            intro,
        );
        self.email.render(frame, email, theme);
        self.phone.render(frame, phone, theme);
        self.reason.render(frame, reason, theme);
        self.confirm.render(frame, confirm, theme);

        let enabled = self.can_submit();
        let mut button = Style::default().fg(if enabled { theme.red() } else { theme.overlay0() });
        if self.focus == Field::Submit {
            button = button.bg(theme.selection_bg()).add_modifier(Modifier::BOLD);
        }
        if !enabled {
            button = button.add_modifier(Modifier::DIM);
        }
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled("[ Request deletion ]", button))).centered(),
            submit,
        );

        self.render_status(frame, status, theme);
    }

    fn title(&self) -> &str {
        "Delete account"
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        vec![
            Keybinding::new(self.resolver.display_form(FormAction::NextField), "Next field"),
            Keybinding::new(self.resolver.display_form(FormAction::Toggle), "Tick"),
            Keybinding::new(self.resolver.display_nav(NavAction::Select), "Submit"),
        ]
    }
}

impl Drop for DeleteAccountPage {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use crossterm::event::{KeyCode, KeyModifiers};
    use tokio::time::sleep;

    use super::*;
    use crate::account::SimulatedDeletion;

    struct FailingDeletion {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DeletionClient for FailingDeletion {
        async fn request_deletion(&self, _request: DeletionRequest) -> Outcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(DeletionError::Unavailable("connection reset".to_string()))
        }
    }

    fn page(client: Arc<dyn DeletionClient>) -> DeleteAccountPage {
        DeleteAccountPage::new(client, SupportConfig::default(), Arc::new(KeyResolver::default()))
    }

    fn simulated() -> DeleteAccountPage {
        page(Arc::new(SimulatedDeletion::new(Duration::from_secs(2))))
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn fill(page: &mut DeleteAccountPage, email: &str, phone: &str, confirm: bool) {
        page.email.set_value(email);
        page.phone.set_value(phone);
        page.confirm.set_checked(confirm);
    }

    #[test]
    fn test_submit_needs_email_phone_and_confirmation() {
        let mut page = simulated();
        assert!(!page.can_submit());

        fill(&mut page, "a@b.com", "", true);
        assert!(!page.can_submit());

        fill(&mut page, "a@b.com", "9876543210", false);
        assert!(!page.can_submit());

        fill(&mut page, "", "9876543210", true);
        assert!(!page.can_submit());

        fill(&mut page, "a@b.com", "9876543210", true);
        assert!(page.can_submit());
    }

    #[tokio::test(start_paused = true)]
    async fn test_keyboard_flow_succeeds() {
        let mut page = simulated();
        for c in "a@b.com".chars() {
            page.handle_key(press(KeyCode::Char(c))).unwrap();
        }
        page.handle_key(press(KeyCode::Tab)).unwrap();
        for c in "9876543210".chars() {
            page.handle_key(press(KeyCode::Char(c))).unwrap();
        }
        // Phone -> reason -> confirm
        page.handle_key(press(KeyCode::Enter)).unwrap();
        page.handle_key(press(KeyCode::Tab)).unwrap();
        page.handle_key(press(KeyCode::Char(' '))).unwrap();
        page.handle_key(press(KeyCode::Tab)).unwrap();

        let result = page.handle_key(press(KeyCode::Enter)).unwrap();
        assert!(matches!(result, EventResult::Event(PageMsg::Toast(_))));
        assert_eq!(page.status, SubmitStatus::Submitting);
        assert!(!page.can_submit());

        sleep(Duration::from_millis(1_900)).await;
        page.handle_tick();
        assert_eq!(page.status, SubmitStatus::Submitting);

        sleep(Duration::from_millis(200)).await;
        page.handle_tick();
        assert_eq!(page.status, SubmitStatus::Success);

        assert_eq!(
            page.handle_key(press(KeyCode::Enter)).unwrap(),
            EventResult::Event(PageMsg::Navigate(Route::Home))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_shows_error_and_allows_retry() {
        let client = Arc::new(FailingDeletion {
            calls: AtomicUsize::new(0),
        });
        let mut page = page(client.clone());
        fill(&mut page, "a@b.com", "9876543210", true);

        assert!(page.submit());
        assert!(!page.submit());

        sleep(Duration::from_millis(10)).await;
        page.handle_tick();
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
        let SubmitStatus::Error(message) = &page.status else {
            panic!("expected an error status, got {:?}", &page.status);
        };
        assert!(message.contains("connection reset"));

        assert!(page.can_submit());
    }

    struct SilentDeletion;

    #[async_trait]
    impl DeletionClient for SilentDeletion {
        async fn request_deletion(&self, _request: DeletionRequest) -> Outcome {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_unanswered_request_times_out() {
        let mut page = page(Arc::new(SilentDeletion));
        fill(&mut page, "a@b.com", "9876543210", true);
        assert!(page.submit());

        sleep(REQUEST_TIMEOUT - Duration::from_secs(1)).await;
        page.handle_tick();
        assert_eq!(page.status, SubmitStatus::Submitting);

        sleep(Duration::from_secs(2)).await;
        page.handle_tick();
        assert_eq!(
            page.status,
            SubmitStatus::Error("Deletion service unavailable: no answer after 30s".to_string())
        );
        assert!(page.can_submit());
    }

    #[tokio::test(start_paused = true)]
    async fn test_destroy_discards_pending_result() {
        let mut page = simulated();
        fill(&mut page, "a@b.com", "9876543210", true);
        assert!(page.submit());

        page.destroy();
        sleep(Duration::from_secs(5)).await;
        page.handle_tick();
        assert_eq!(page.status, SubmitStatus::Submitting);
    }

    #[test]
    fn test_focus_wraps() {
        assert_eq!(Field::Email.previous(), Field::Submit);
        assert_eq!(Field::Submit.next(), Field::Email);
        assert_eq!(Field::Phone.next(), Field::Reason);
    }
}
