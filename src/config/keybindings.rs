use crossterm::event::KeyCode;
use serde::{Deserialize, Serialize};

use crate::config::key::{Key, KeyBinding};

fn keys(codes: &[KeyCode]) -> KeyBinding {
    KeyBinding::Multiple(codes.iter().copied().map(Key::new).collect())
}

fn key(code: KeyCode) -> KeyBinding {
    Key::new(code).into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalKeybindings {
    pub quit: KeyBinding,
    pub back: KeyBinding,
    pub delete_account: KeyBinding,
}

impl Default for GlobalKeybindings {
    fn default() -> Self {
        Self {
            quit: key(KeyCode::Char('q')),
            back: key(KeyCode::Esc),
            delete_account: key(KeyCode::Char('D')),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationKeybindings {
    pub up: KeyBinding,
    pub down: KeyBinding,
    pub page_up: KeyBinding,
    pub page_down: KeyBinding,
    pub select: KeyBinding,
}

impl Default for NavigationKeybindings {
    fn default() -> Self {
        Self {
            up: keys(&[KeyCode::Char('k'), KeyCode::Up]),
            down: keys(&[KeyCode::Char('j'), KeyCode::Down]),
            page_up: key(KeyCode::PageUp),
            page_down: key(KeyCode::PageDown),
            select: keys(&[KeyCode::Enter, KeyCode::Char(' ')]),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RotatorKeybindings {
    pub previous: KeyBinding,
    pub next: KeyBinding,
    pub banner_previous: KeyBinding,
    pub banner_next: KeyBinding,
    /// The n-th key jumps to the n-th banner slide.
    pub banner_slots: Vec<Key>,
}

impl Default for RotatorKeybindings {
    fn default() -> Self {
        Self {
            previous: keys(&[KeyCode::Char('h'), KeyCode::Left]),
            next: keys(&[KeyCode::Char('l'), KeyCode::Right]),
            banner_previous: key(KeyCode::Char('<')),
            banner_next: key(KeyCode::Char('>')),
            banner_slots: ('1'..='9').map(|c| Key::new(KeyCode::Char(c))).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupKeybindings {
    pub close: KeyBinding,
}

impl Default for PopupKeybindings {
    fn default() -> Self {
        Self {
            close: keys(&[KeyCode::Esc, KeyCode::Char('x')]),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateKeybindings {
    pub reload: KeyBinding,
    pub dismiss: KeyBinding,
}

impl Default for UpdateKeybindings {
    fn default() -> Self {
        Self {
            reload: key(KeyCode::Char('R')),
            dismiss: key(KeyCode::Char('X')),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormKeybindings {
    pub next_field: KeyBinding,
    pub previous_field: KeyBinding,
    pub toggle: KeyBinding,
}

impl Default for FormKeybindings {
    fn default() -> Self {
        Self {
            next_field: keys(&[KeyCode::Tab, KeyCode::Down]),
            previous_field: keys(&[KeyCode::BackTab, KeyCode::Up]),
            toggle: key(KeyCode::Char(' ')),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogKeybindings {
    pub dismiss: KeyBinding,
}

impl Default for DialogKeybindings {
    fn default() -> Self {
        Self {
            dismiss: keys(&[KeyCode::Enter, KeyCode::Esc]),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KeybindingsConfig {
    pub global: GlobalKeybindings,
    pub navigation: NavigationKeybindings,
    pub rotator: RotatorKeybindings,
    pub popup: PopupKeybindings,
    pub update: UpdateKeybindings,
    pub form: FormKeybindings,
    pub dialog: DialogKeybindings,
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEvent, KeyModifiers};

    use super::*;

    #[test]
    fn test_banner_slots_from_toml() {
        let config: KeybindingsConfig = toml::from_str(
            r#"
            [rotator]
            banner_next = "n"
            banner_slots = ["F1", "F2"]
            "#,
        )
        .unwrap();

        assert_eq!(config.rotator.banner_slots.len(), 2);
        assert_eq!(config.rotator.banner_slots[1], Key::new(KeyCode::F(2)));
        assert!(
            config
                .rotator
                .banner_next
                .matches(&KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE))
        );
        // Untouched fields keep their defaults.
        assert_eq!(config.rotator.previous.display(), "h/Left");
    }

    #[test]
    fn test_override_single_action() {
        let config: KeybindingsConfig = toml::from_str(
            r#"
            [global]
            quit = "ctrl+q"
            "#,
        )
        .unwrap();

        let ctrl_q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(config.global.quit.matches(&ctrl_q));
        // Untouched actions keep their defaults.
        assert_eq!(config.global.back.display(), "Esc");
        assert_eq!(config.navigation.down.display(), "j/Down");
    }
}
