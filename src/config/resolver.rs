use std::sync::Arc;

use crossterm::event::KeyEvent;

use crate::config::actions::{
    DialogAction, FormAction, GlobalAction, NavAction, PopupAction, RotatorAction, UpdateAction,
};
use crate::config::key::KeyBinding;
use crate::config::keybindings::KeybindingsConfig;

/// Maps key events to the actions configured for them.
pub struct KeyResolver {
    pub keybindings: Arc<KeybindingsConfig>,
}

impl Default for KeyResolver {
    fn default() -> Self {
        Self::new(Arc::new(KeybindingsConfig::default()))
    }
}

impl KeyResolver {
    pub const fn new(keybindings: Arc<KeybindingsConfig>) -> Self {
        Self { keybindings }
    }

    fn global(&self, action: GlobalAction) -> &KeyBinding {
        let kb = &self.keybindings.global;
        match action {
            GlobalAction::Quit => &kb.quit,
            GlobalAction::Back => &kb.back,
            GlobalAction::DeleteAccount => &kb.delete_account,
        }
    }

    fn nav(&self, action: NavAction) -> &KeyBinding {
        let kb = &self.keybindings.navigation;
        match action {
            NavAction::Up => &kb.up,
            NavAction::Down => &kb.down,
            NavAction::PageUp => &kb.page_up,
            NavAction::PageDown => &kb.page_down,
            NavAction::Select => &kb.select,
        }
    }

    fn rotator(&self, action: RotatorAction) -> &KeyBinding {
        let kb = &self.keybindings.rotator;
        match action {
            RotatorAction::Previous => &kb.previous,
            RotatorAction::Next => &kb.next,
            RotatorAction::BannerPrevious => &kb.banner_previous,
            RotatorAction::BannerNext => &kb.banner_next,
        }
    }

    fn update(&self, action: UpdateAction) -> &KeyBinding {
        let kb = &self.keybindings.update;
        match action {
            UpdateAction::Reload => &kb.reload,
            UpdateAction::Dismiss => &kb.dismiss,
        }
    }

    fn form(&self, action: FormAction) -> &KeyBinding {
        let kb = &self.keybindings.form;
        match action {
            FormAction::NextField => &kb.next_field,
            FormAction::PreviousField => &kb.previous_field,
            FormAction::Toggle => &kb.toggle,
        }
    }

    pub fn matches_global(&self, event: &KeyEvent, action: GlobalAction) -> bool {
        self.global(action).matches(event)
    }

    pub fn display_global(&self, action: GlobalAction) -> String {
        self.global(action).display()
    }

    pub fn matches_nav(&self, event: &KeyEvent, action: NavAction) -> bool {
        self.nav(action).matches(event)
    }

    pub fn display_nav(&self, action: NavAction) -> String {
        self.nav(action).display()
    }

    pub fn matches_rotator(&self, event: &KeyEvent, action: RotatorAction) -> bool {
        self.rotator(action).matches(event)
    }

    pub fn display_rotator(&self, action: RotatorAction) -> String {
        self.rotator(action).display()
    }

    /// Banner slide bound to this key, if any.
    pub fn banner_slot(&self, event: &KeyEvent) -> Option<usize> {
        self.keybindings
            .rotator
            .banner_slots
            .iter()
            .position(|key| key.matches(event))
    }

    pub fn matches_popup(&self, event: &KeyEvent, action: PopupAction) -> bool {
        match action {
            PopupAction::Close => self.keybindings.popup.close.matches(event),
        }
    }

    pub fn display_popup(&self, action: PopupAction) -> String {
        match action {
            PopupAction::Close => self.keybindings.popup.close.display(),
        }
    }

    pub fn matches_update(&self, event: &KeyEvent, action: UpdateAction) -> bool {
        self.update(action).matches(event)
    }

    pub fn display_update(&self, action: UpdateAction) -> String {
        self.update(action).display()
    }

    pub fn matches_form(&self, event: &KeyEvent, action: FormAction) -> bool {
        self.form(action).matches(event)
    }

    pub fn display_form(&self, action: FormAction) -> String {
        self.form(action).display()
    }

    pub fn matches_dialog(&self, event: &KeyEvent, action: DialogAction) -> bool {
        match action {
            DialogAction::Dismiss => self.keybindings.dialog.dismiss.matches(event),
        }
    }

    pub fn display_dialog(&self, action: DialogAction) -> String {
        match action {
            DialogAction::Dismiss => self.keybindings.dialog.dismiss.display(),
        }
    }
}
