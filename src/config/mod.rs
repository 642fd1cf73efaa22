mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    apply_env(&mut config);
    check_structure(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./config.toml",
        "./reelbot.toml",
        "~/.config/reelbot/config.toml",
        "/etc/reelbot/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    // Return default config if no file found
    let mut config = Config::default();
    apply_env(&mut config);
    check_structure(&config)?;
    Ok(config)
}

/// Overlay credentials from the process environment.
///
/// Values set in the config file win; the environment fills the blanks.
fn apply_env(config: &mut Config) {
    if config.bot.token.is_empty() {
        if let Ok(token) = std::env::var("BOT_TOKEN") {
            config.bot.token = token;
        }
    }
    if config.catalog.access_token.is_empty() {
        if let Ok(token) = std::env::var("TMDB_ACCESS_TOKEN") {
            config.catalog.access_token = token;
        }
    }
    if config.catalog.account_id.is_none() {
        if let Ok(id) = std::env::var("TMDB_ACCOUNT_ID") {
            config.catalog.account_id = Some(id);
        }
    }
}

/// Structural validation applied on every load.
fn check_structure(config: &Config) -> Result<()> {
    if config.relay.port == 0 {
        anyhow::bail!("Relay port cannot be 0");
    }
    if config.catalog.cache_ttl_secs == 0 {
        anyhow::bail!("Catalog cache TTL cannot be 0");
    }
    if config.relay.allowed_prefix.is_empty() {
        anyhow::bail!("Relay allowed_prefix cannot be empty");
    }
    Ok(())
}

/// Validate that every credential the bot needs is present.
///
/// Called before the dispatcher starts so a missing token fails fast with a
/// clear diagnostic instead of surfacing deep inside a command handler.
pub fn validate_credentials(config: &Config) -> Result<()> {
    if config.bot.token.is_empty() {
        anyhow::bail!("Bot token is not set (config [bot].token or BOT_TOKEN)");
    }
    if config.catalog.access_token.is_empty() {
        anyhow::bail!(
            "Catalog access token is not set (config [catalog].access_token or TMDB_ACCESS_TOKEN)"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn write_config(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    #[serial]
    fn load_applies_defaults() {
        std::env::remove_var("BOT_TOKEN");
        std::env::remove_var("TMDB_ACCESS_TOKEN");
        std::env::remove_var("TMDB_ACCOUNT_ID");

        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[bot]\ntoken = \"abc\"\n");

        let config = load_config(&path).unwrap();
        assert_eq!(config.bot.token, "abc");
        assert_eq!(config.catalog.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.catalog.cache_ttl_secs, 86_400);
        assert_eq!(config.translator.language, "fa");
        assert_eq!(config.delivery.relay_base, "https://images.weserv.nl");
        assert_eq!(config.relay.allowed_prefix, "https://image.tmdb.org/");
    }

    #[test]
    #[serial]
    fn env_fills_missing_credentials() {
        std::env::set_var("BOT_TOKEN", "env-bot");
        std::env::set_var("TMDB_ACCESS_TOKEN", "env-tmdb");
        std::env::set_var("TMDB_ACCOUNT_ID", "42");

        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "");

        let config = load_config(&path).unwrap();
        assert_eq!(config.bot.token, "env-bot");
        assert_eq!(config.catalog.access_token, "env-tmdb");
        assert_eq!(config.catalog.account_id.as_deref(), Some("42"));

        std::env::remove_var("BOT_TOKEN");
        std::env::remove_var("TMDB_ACCESS_TOKEN");
        std::env::remove_var("TMDB_ACCOUNT_ID");
    }

    #[test]
    #[serial]
    fn config_file_wins_over_env() {
        std::env::set_var("BOT_TOKEN", "env-bot");

        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[bot]\ntoken = \"file-bot\"\n");

        let config = load_config(&path).unwrap();
        assert_eq!(config.bot.token, "file-bot");

        std::env::remove_var("BOT_TOKEN");
    }

    #[test]
    #[serial]
    fn missing_credentials_fail_fast() {
        std::env::remove_var("BOT_TOKEN");
        std::env::remove_var("TMDB_ACCESS_TOKEN");

        let config = Config::default();
        let err = validate_credentials(&config).unwrap_err();
        assert!(err.to_string().contains("BOT_TOKEN"));

        let mut config = Config::default();
        config.bot.token = "t".to_string();
        let err = validate_credentials(&config).unwrap_err();
        assert!(err.to_string().contains("TMDB_ACCESS_TOKEN"));
    }

    #[test]
    fn zero_ttl_rejected() {
        let mut config = Config::default();
        config.catalog.cache_ttl_secs = 0;
        assert!(check_structure(&config).is_err());
    }
}
