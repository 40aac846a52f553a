pub mod actions;
pub mod key;
pub mod keybindings;
pub mod loader;
pub mod resolver;

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use actions::*;
use keybindings::KeybindingsConfig;
pub use loader::load;
pub use resolver::KeyResolver;

use crate::platform::DEFAULT_MOBILE_MAX_WIDTH;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "Catppuccin Mocha".to_string(),
        }
    }
}

/// Intervals and delays used by the page components.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub announcement_interval_ms: u64,
    pub banner_interval_ms: u64,
    pub popup_timeout_secs: u64,
    pub popup_fade_ms: u64,
    pub resize_debounce_ms: u64,
    pub update_poll_secs: u64,
    pub deletion_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            announcement_interval_ms: 4_000,
            banner_interval_ms: 2_500,
            popup_timeout_secs: 60,
            popup_fade_ms: 300,
            resize_debounce_ms: 250,
            update_poll_secs: 120,
            deletion_delay_ms: 2_000,
        }
    }
}

impl TimingConfig {
    pub const fn announcement_interval(&self) -> Duration {
        Duration::from_millis(self.announcement_interval_ms)
    }

    pub const fn banner_interval(&self) -> Duration {
        Duration::from_millis(self.banner_interval_ms)
    }

    pub const fn popup_timeout(&self) -> Duration {
        Duration::from_secs(self.popup_timeout_secs)
    }

    pub const fn popup_fade(&self) -> Duration {
        Duration::from_millis(self.popup_fade_ms)
    }

    pub const fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    pub const fn update_poll(&self) -> Duration {
        Duration::from_secs(self.update_poll_secs)
    }

    pub const fn deletion_delay(&self) -> Duration {
        Duration::from_millis(self.deletion_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Overrides the user agent derived from the terminal.
    pub user_agent: Option<String>,
    pub mobile_max_width: u32,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            user_agent: None,
            mobile_max_width: DEFAULT_MOBILE_MAX_WIDTH,
        }
    }
}

/// Contact shown when a request cannot be completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportConfig {
    pub email: String,
    pub phone: String,
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            email: "support@pujaseva.in".to_string(),
            phone: "+91 80 4567 8900".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub platform: PlatformConfig,
    #[serde(default)]
    pub support: SupportConfig,
    #[serde(default)]
    pub content_path: Option<PathBuf>,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.theme.name, "Catppuccin Mocha");
        assert_eq!(config.timing.popup_timeout(), Duration::from_secs(60));
        assert_eq!(config.timing.banner_interval(), Duration::from_millis(2_500));
        assert_eq!(config.platform.mobile_max_width, 768);
        assert!(config.content_path.is_none());
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            content_path = "/srv/site.json"

            [timing]
            popup_timeout_secs = 30

            [support]
            email = "help@example.org"
            "#,
        )
        .unwrap();

        assert_eq!(config.timing.popup_timeout(), Duration::from_secs(30));
        assert_eq!(config.timing.popup_fade(), Duration::from_millis(300));
        assert_eq!(config.support.email, "help@example.org");
        assert_eq!(config.support.phone, SupportConfig::default().phone);
        assert_eq!(config.content_path, Some(PathBuf::from("/srv/site.json")));
    }
}
