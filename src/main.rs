use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::account::SimulatedDeletion;
use crate::app::App;
use crate::config::KeyResolver;
use crate::content::SiteContent;
use crate::platform::{ContentWatcher, Platform, TerminalPlatform};

mod account;
mod app;
mod catalog;
mod cli;
mod components;
mod config;
mod content;
mod pages;
mod platform;
mod theme;
mod timer;
mod tui;
mod ui;

pub use theme::Theme;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = initialize_logging()?;
    info!("Starting pujaseva");

    let args = cli::Args::parse();

    let mut config = config::load()?;
    if let Some(path) = args.content {
        config.content_path = Some(path);
    }
    if let Some(name) = args.theme {
        config.theme.name = name;
    }
    let config = Arc::new(config);

    let content = SiteContent::resolve(config.content_path.as_deref())?;
    let resolver = Arc::new(KeyResolver::new(Arc::new(config.keybindings.clone())));
    let theme = theme::theme_from_name(&config.theme.name);

    let mut terminal = TerminalPlatform::new(
        config.platform.user_agent.clone(),
        config.platform.mobile_max_width,
    );
    if let Some(path) = &config.content_path {
        terminal = terminal.with_registration(Arc::new(ContentWatcher::new(path)));
    }
    let platform: Arc<dyn Platform> = Arc::new(terminal);
    let deletion = Arc::new(SimulatedDeletion::new(config.timing.deletion_delay()));

    let mut app = App::new(
        content,
        config.content_path.clone(),
        Arc::clone(&config),
        resolver,
        theme,
        platform,
        deletion,
        args.page,
    );
    app.run().await?;

    Ok(())
}

fn initialize_logging() -> Result<WorkerGuard> {
    let directory = dirs::data_local_dir().map_or_else(
        || std::path::PathBuf::from("logs"),
        |path| path.join("pujaseva").join("logs"),
    );
    std::fs::create_dir_all(&directory)?;

    let file_appender = tracing_appender::rolling::daily(&directory, "pujaseva.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .init();

    Ok(guard)
}
