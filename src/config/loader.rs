use std::fs;
use std::path::{Path, PathBuf};

use crate::config::AppConfig;

const CONFIG_DIR: &str = "pujaseva";
const CONFIG_FILE: &str = "config.toml";

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Load the user's config, falling back to defaults when there is none.
pub fn load() -> color_eyre::Result<AppConfig> {
    let Some(path) = config_path() else {
        tracing::debug!("No config directory found, using defaults");
        return Ok(AppConfig::default());
    };
    load_from(&path)
}

pub fn load_from(path: &Path) -> color_eyre::Result<AppConfig> {
    if !path.exists() {
        tracing::debug!("Config file not found at {:?}, using defaults", path);
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    tracing::debug!("Loaded config from {:?}", path);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = load_from(Path::new("/nonexistent/pujaseva.toml")).unwrap();
        assert_eq!(config.timing.update_poll_secs, 120);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[timing\npopup_timeout_secs = ").unwrap();
        assert!(load_from(file.path()).is_err());
    }

    #[test]
    fn test_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[theme]\nname = \"Catppuccin Latte\"\n").unwrap();
        let config = load_from(file.path()).unwrap();
        assert_eq!(config.theme.name, "Catppuccin Latte");
    }
}
