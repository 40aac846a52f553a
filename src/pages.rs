//! The two pages of the site and the messages they send to the app.

pub mod delete_account;
pub mod home;

use clap::ValueEnum;

pub use delete_account::DeleteAccountPage;
pub use home::HomePage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Route {
    #[default]
    Home,
    DeleteAccount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageMsg {
    Navigate(Route),
    /// Re-read site content and rebuild the home page.
    Reload,
    Toast(String),
}
