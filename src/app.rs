use std::path::PathBuf;
use std::sync::Arc;

use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::Theme;
use crate::account::DeletionClient;
use crate::config::{AppConfig, GlobalAction, KeyResolver};
use crate::content::SiteContent;
use crate::pages::{DeleteAccountPage, HomePage, PageMsg, Route};
use crate::platform::Platform;
use crate::tui::{Event, Tui};
use crate::ui::{
    Component, ErrorDialog, ErrorDialogEvent, EventResult, Modal, Screen, StatusBar, Toast,
    ToastManager,
};

const FRAME_RATE: f64 = 30.0;
const TICK_RATE: f64 = 10.0;

type Page = Box<dyn Screen<Output = PageMsg>>;

/// Routes input to the active page and draws it with the status bar,
/// toasts and any error dialog on top.
pub struct App {
    page: Page,
    route: Route,
    content: SiteContent,
    content_path: Option<PathBuf>,
    config: Arc<AppConfig>,
    resolver: Arc<KeyResolver>,
    theme: Theme,
    platform: Arc<dyn Platform>,
    deletion: Arc<dyn DeletionClient>,
    status_bar: StatusBar,
    toasts: ToastManager,
    error: Option<ErrorDialog>,
    should_quit: bool,
    should_suspend: bool,
}

impl App {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        content: SiteContent,
        content_path: Option<PathBuf>,
        config: Arc<AppConfig>,
        resolver: Arc<KeyResolver>,
        theme: Theme,
        platform: Arc<dyn Platform>,
        deletion: Arc<dyn DeletionClient>,
        start: Route,
    ) -> Self {
        let page = page_for(start, &content, &config, &resolver, &platform, &deletion);
        Self {
            page,
            route: start,
            content,
            content_path,
            status_bar: StatusBar::new(Arc::clone(&resolver)),
            config,
            resolver,
            theme,
            platform,
            deletion,
            toasts: ToastManager::new(),
            error: None,
            should_quit: false,
            should_suspend: false,
        }
    }

    fn build_page(&self, route: Route) -> Page {
        page_for(
            route,
            &self.content,
            &self.config,
            &self.resolver,
            &self.platform,
            &self.deletion,
        )
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new(FRAME_RATE, TICK_RATE)?;
        tui.enter()?;
        self.page.init();

        while !self.should_quit {
            let Some(event) = tui.next_event().await else {
                break;
            };
            self.handle_event(&mut tui, event)?;

            if self.should_suspend {
                tui.suspend()?;
                tui.resume()?;
                self.should_suspend = false;
            }
        }

        self.page.destroy();
        tui.exit()?;
        Ok(())
    }

    fn handle_event(&mut self, tui: &mut Tui, event: Event) -> Result<()> {
        match event {
            Event::Quit => self.should_quit = true,
            Event::Suspend => self.should_suspend = true,
            Event::Error(err) => tracing::warn!("Terminal event error: {err}"),
            Event::Tick => self.handle_tick(),
            Event::Render => {
                tui.draw(|frame| self.render(frame))?;
            }
            Event::Resize(width, height) => {
                tracing::debug!(width, height, "Terminal resized");
                self.page.handle_resize();
                tui.draw(|frame| self.render(frame))?;
            }
            Event::Key(key) => self.handle_key(key),
        }
        Ok(())
    }

    fn handle_tick(&mut self) {
        self.page.handle_tick();
        self.toasts.handle_tick();
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if let Some(dialog) = self.error.as_mut() {
            if let Ok(EventResult::Event(ErrorDialogEvent::Dismissed)) = dialog.handle_key(key) {
                self.error = None;
            }
            return;
        }

        match self.page.handle_key(key) {
            Ok(EventResult::Event(msg)) => self.handle_page_msg(msg),
            Ok(EventResult::Consumed) => {}
            Ok(EventResult::Ignored) => self.handle_global_key(key),
            Err(err) => self.show_error("Something went wrong", &err.to_string()),
        }
    }

    fn handle_global_key(&mut self, key: KeyEvent) {
        if self.resolver.matches_global(&key, GlobalAction::Quit) {
            self.should_quit = true;
        } else if self.resolver.matches_global(&key, GlobalAction::Back) {
            self.navigate(Route::Home);
        } else if self.resolver.matches_global(&key, GlobalAction::DeleteAccount) {
            self.navigate(Route::DeleteAccount);
        }
    }

    fn handle_page_msg(&mut self, msg: PageMsg) {
        match msg {
            PageMsg::Navigate(route) => self.navigate(route),
            PageMsg::Reload => self.reload(),
            PageMsg::Toast(message) => self.toasts.show(Toast::info(message)),
        }
    }

    fn navigate(&mut self, route: Route) {
        if route == self.route {
            return;
        }
        tracing::info!(?route, "Navigating");
        self.page.destroy();
        self.page = self.build_page(route);
        self.page.init();
        self.route = route;
    }

    /// Re-read site content and rebuild the home page from it.
    fn reload(&mut self) {
        match SiteContent::resolve(self.content_path.as_deref()) {
            Ok(content) => {
                self.content = content;
                self.page.destroy();
                self.page = self.build_page(Route::Home);
                self.page.init();
                self.route = Route::Home;
                self.toasts.show(Toast::success("Page reloaded"));
            }
            Err(err) => {
                tracing::error!("Reload failed: {err}");
                self.show_error("Reload failed", &err.to_string());
            }
        }
    }

    fn show_error(&mut self, title: &str, message: &str) {
        self.error = Some(ErrorDialog::new(title, message, Arc::clone(&self.resolver)));
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let [page_area, bar_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).areas(area);

        self.page.render(frame, page_area, &self.theme);
        self.status_bar.render(
            frame,
            bar_area,
            &self.theme,
            self.page.title(),
            &self.page.keybindings(),
        );
        self.toasts.render(frame, page_area, &self.theme);

        if let Some(dialog) = self.error.as_mut() {
            dialog.render(frame, area, &self.theme);
        }
    }
}

fn page_for(
    route: Route,
    content: &SiteContent,
    config: &AppConfig,
    resolver: &Arc<KeyResolver>,
    platform: &Arc<dyn Platform>,
    deletion: &Arc<dyn DeletionClient>,
) -> Page {
    match route {
        Route::Home => Box::new(HomePage::new(
            content.clone(),
            Arc::clone(platform),
            Arc::clone(resolver),
            &config.timing,
        )),
        Route::DeleteAccount => Box::new(DeleteAccountPage::new(
            Arc::clone(deletion),
            config.support.clone(),
            Arc::clone(resolver),
        )),
    }
}
