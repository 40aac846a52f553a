//! Page sections of the booking site.

pub mod announcement_bar;
pub mod flashing_banner;
pub mod popup_modal;
pub mod rotator;
pub mod tier_selector;
pub mod update_notification;

pub use announcement_bar::AnnouncementBar;
pub use flashing_banner::FlashingBanner;
pub use popup_modal::PopupModal;
pub use rotator::Rotator;
pub use tier_selector::{TierEvent, TierSelector};
pub use update_notification::{UpdateEvent, UpdateNotification};
