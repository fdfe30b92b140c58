//! Configuration structures for the launcher clients

use serde::{Deserialize, Serialize};

use crate::transport::HttpConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LauncherConfig {
    /// Boot version server base URL
    pub boot_version_url: String,

    /// Game version server base URL
    pub game_version_url: String,

    /// OAuth login server base URL
    pub oauth_url: String,

    /// Frontier (world status) server base URL
    pub frontier_url: String,

    /// Lobby host handed to the game, `None` for the official servers
    pub lobby_host: Option<String>,

    /// Frontier host handed to the game, `None` for the official servers
    pub frontier_host: Option<String>,

    /// Seed the computer id sent in the login user agent is derived from
    pub computer_id_seed: String,

    /// Maximum patch downloads in flight at once
    pub max_concurrent_downloads: usize,

    /// Boot patch rounds allowed before the boot server is considered looping
    pub max_boot_update_rounds: usize,

    /// HTTP client configuration
    pub http: HttpConfig,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            boot_version_url: "http://patch-bootver.ffxiv.com".to_string(),
            game_version_url: "https://patch-gamever.ffxiv.com".to_string(),
            oauth_url: "https://ffxiv-login.square-enix.com".to_string(),
            frontier_url: "https://frontier.ffxiv.com".to_string(),
            lobby_host: None,
            frontier_host: None,
            computer_id_seed: "xivlaunch".to_string(),
            max_concurrent_downloads: 4,
            max_boot_update_rounds: 16,
            http: HttpConfig::default(),
        }
    }
}

impl LauncherConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            boot_version_url: std::env::var("XIVLAUNCH_BOOT_VERSION_URL")
                .unwrap_or(defaults.boot_version_url),
            game_version_url: std::env::var("XIVLAUNCH_GAME_VERSION_URL")
                .unwrap_or(defaults.game_version_url),
            oauth_url: std::env::var("XIVLAUNCH_OAUTH_URL").unwrap_or(defaults.oauth_url),
            frontier_url: std::env::var("XIVLAUNCH_FRONTIER_URL")
                .unwrap_or(defaults.frontier_url),
            lobby_host: std::env::var("XIVLAUNCH_LOBBY_HOST").ok(),
            frontier_host: std::env::var("XIVLAUNCH_FRONTIER_HOST").ok(),
            computer_id_seed: std::env::var("XIVLAUNCH_COMPUTER_ID_SEED")
                .unwrap_or(defaults.computer_id_seed),
            max_concurrent_downloads: std::env::var("XIVLAUNCH_MAX_CONCURRENT_DOWNLOADS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_concurrent_downloads),
            max_boot_update_rounds: std::env::var("XIVLAUNCH_MAX_BOOT_UPDATE_ROUNDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_boot_update_rounds),
            http: defaults.http,
        }
    }

    /// Point every endpoint at one server, as used against mock servers
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        self.boot_version_url = base_url.to_string();
        self.game_version_url = base_url.to_string();
        self.oauth_url = base_url.to_string();
        self.frontier_url = base_url.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_base_url() {
        let config = LauncherConfig::default().with_base_url("http://127.0.0.1:8080/");
        assert_eq!(config.boot_version_url, "http://127.0.0.1:8080");
        assert_eq!(config.frontier_url, "http://127.0.0.1:8080");
        assert_eq!(config.max_boot_update_rounds, 16);
    }

    #[test]
    fn test_serde_round_trip() {
        let config = LauncherConfig::default();
        let json = serde_json::to_string(&config).unwrap_or_default();
        let parsed: Option<LauncherConfig> = serde_json::from_str(&json).ok();
        assert_eq!(parsed, Some(config));
    }
}
