use std::path::PathBuf;

use clap::Parser;
use clap::builder::PossibleValuesParser;

use crate::pages::Route;
use crate::theme::available_themes;

#[derive(Parser, Debug)]
#[command(name = "pujaseva", version, about = "Book a puja from your terminal")]
pub struct Args {
    /// Site content JSON (announcements, banners, popup, tiers)
    #[arg(short, long)]
    pub content: Option<PathBuf>,

    /// Page to open first
    #[arg(short, long, value_enum, default_value_t = Route::Home)]
    pub page: Route,

    /// Theme name, e.g. "Catppuccin Latte"
    #[arg(short, long, value_parser = PossibleValuesParser::new(available_themes().iter().copied()))]
    pub theme: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["pujaseva"]);
        assert_eq!(args.page, Route::Home);
        assert!(args.content.is_none());
        assert!(args.theme.is_none());
    }

    #[test]
    fn test_page_and_content() {
        let args = Args::parse_from([
            "pujaseva",
            "--page",
            "delete-account",
            "--content",
            "/srv/site.json",
        ]);
        assert_eq!(args.page, Route::DeleteAccount);
        assert_eq!(args.content, Some(PathBuf::from("/srv/site.json")));
    }

    #[test]
    fn test_unknown_theme_rejected() {
        assert!(Args::try_parse_from(["pujaseva", "--theme", "Solarized"]).is_err());
        let args = Args::try_parse_from(["pujaseva", "--theme", "Catppuccin Latte"]).unwrap();
        assert_eq!(args.theme.as_deref(), Some("Catppuccin Latte"));
    }
}
