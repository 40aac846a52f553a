//! Environment the page runs in.
//!
//! Everything a component would otherwise read from global state (viewport
//! size, the user agent, the page scroll lock, the update registration) is
//! reached through [`Platform`], so components can be exercised in tests
//! without a terminal.

mod update;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock};

use regex::Regex;

pub use update::{ContentWatcher, ControllerChange, UpdateRegistration};

/// Approximate width of one terminal cell in CSS pixels.
const CELL_WIDTH_PX: u32 = 8;

/// Widest viewport still treated as a phone.
pub const DEFAULT_MOBILE_MAX_WIDTH: u32 = 768;

static MOBILE_AGENT: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)Android|webOS|iPhone|iPad|iPod|BlackBerry|IEMobile|Opera Mini").ok()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
}

impl Viewport {
    pub const fn new(width: u32) -> Self {
        Self { width }
    }

    /// Viewport of a terminal `columns` cells wide.
    pub const fn from_columns(columns: u16) -> Self {
        Self::new(columns as u32 * CELL_WIDTH_PX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Mobile,
    Desktop,
}

impl DeviceClass {
    /// Classify a device from its user agent and viewport width.
    pub fn detect(user_agent: &str, width: u32, mobile_max_width: u32) -> Self {
        let mobile_agent = MOBILE_AGENT
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(user_agent));
        if mobile_agent || width <= mobile_max_width {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }
}

/// Suspends page scrolling while at least one guard is alive.
#[derive(Debug, Default)]
pub struct ScrollLock {
    holders: AtomicUsize,
    releases: AtomicUsize,
}

impl ScrollLock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn acquire(self: &Arc<Self>) -> ScrollGuard {
        self.holders.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("Page scroll locked");
        ScrollGuard {
            lock: Arc::clone(self),
        }
    }

    pub fn is_locked(&self) -> bool {
        self.holders.load(Ordering::SeqCst) > 0
    }

    /// Number of guards released since the lock was created.
    #[cfg(test)]
    pub fn release_count(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

/// Keeps the page scroll suspended until dropped.
#[derive(Debug)]
pub struct ScrollGuard {
    lock: Arc<ScrollLock>,
}

impl Drop for ScrollGuard {
    fn drop(&mut self) {
        self.lock.holders.fetch_sub(1, Ordering::SeqCst);
        let releases = self.lock.releases.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(releases, "Page scroll released");
    }
}

pub trait Platform: Send + Sync {
    fn viewport(&self) -> Viewport;

    fn user_agent(&self) -> &str;

    fn scroll_lock(&self) -> &Arc<ScrollLock>;

    /// Registration that announces new site content, if content can change.
    fn update_registration(&self) -> Option<Arc<dyn UpdateRegistration>> {
        None
    }

    fn mobile_max_width(&self) -> u32 {
        DEFAULT_MOBILE_MAX_WIDTH
    }

    fn device_class(&self) -> DeviceClass {
        DeviceClass::detect(
            self.user_agent(),
            self.viewport().width,
            self.mobile_max_width(),
        )
    }
}

/// Platform backed by the real terminal.
pub struct TerminalPlatform {
    user_agent: String,
    mobile_max_width: u32,
    scroll_lock: Arc<ScrollLock>,
    registration: Option<Arc<dyn UpdateRegistration>>,
}

impl TerminalPlatform {
    pub fn new(user_agent: Option<String>, mobile_max_width: u32) -> Self {
        let user_agent = user_agent.unwrap_or_else(default_user_agent);
        tracing::info!(%user_agent, "Terminal platform ready");
        Self {
            user_agent,
            mobile_max_width,
            scroll_lock: ScrollLock::new(),
            registration: None,
        }
    }

    #[must_use]
    pub fn with_registration(mut self, registration: Arc<dyn UpdateRegistration>) -> Self {
        self.registration = Some(registration);
        self
    }
}

impl Platform for TerminalPlatform {
    fn viewport(&self) -> Viewport {
        let (columns, _) = crossterm::terminal::size().unwrap_or((80, 24));
        Viewport::from_columns(columns)
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn scroll_lock(&self) -> &Arc<ScrollLock> {
        &self.scroll_lock
    }

    fn update_registration(&self) -> Option<Arc<dyn UpdateRegistration>> {
        self.registration.clone()
    }

    fn mobile_max_width(&self) -> u32 {
        self.mobile_max_width
    }
}

fn default_user_agent() -> String {
    let terminal = std::env::var("TERM_PROGRAM")
        .or_else(|_| std::env::var("TERM"))
        .unwrap_or_else(|_| "terminal".to_string());
    format!("{terminal} ({})", std::env::consts::OS)
}


#[cfg(test)]
mod tests {
    use super::*;

    const DESKTOP_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

    #[test]
    fn test_narrow_viewport_is_mobile() {
        assert_eq!(
            DeviceClass::detect(DESKTOP_AGENT, 500, DEFAULT_MOBILE_MAX_WIDTH),
            DeviceClass::Mobile
        );
        assert_eq!(
            DeviceClass::detect(DESKTOP_AGENT, 768, DEFAULT_MOBILE_MAX_WIDTH),
            DeviceClass::Mobile
        );
    }

    #[test]
    fn test_wide_desktop_agent_is_desktop() {
        assert_eq!(
            DeviceClass::detect(DESKTOP_AGENT, 1200, DEFAULT_MOBILE_MAX_WIDTH),
            DeviceClass::Desktop
        );
    }

    #[test]
    fn test_mobile_agent_wins_over_width() {
        let agent = "Mozilla/5.0 (iPad; CPU OS 17_0 like Mac OS X)";
        assert_eq!(
            DeviceClass::detect(agent, 1200, DEFAULT_MOBILE_MAX_WIDTH),
            DeviceClass::Mobile
        );
        assert_eq!(
            DeviceClass::detect("xterm (android)", 1600, DEFAULT_MOBILE_MAX_WIDTH),
            DeviceClass::Mobile
        );
    }

    #[test]
    fn test_terminal_cells_to_pixels() {
        assert_eq!(Viewport::from_columns(96).width, 768);
        assert_eq!(Viewport::from_columns(150).width, 1200);
    }

    #[test]
    fn test_scroll_lock_counts_releases() {
        let lock = ScrollLock::new();
        assert!(!lock.is_locked());

        let guard = lock.acquire();
        assert!(lock.is_locked());
        assert_eq!(lock.release_count(), 0);

        drop(guard);
        assert!(!lock.is_locked());
        assert_eq!(lock.release_count(), 1);
    }
}
