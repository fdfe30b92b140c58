//! Caller supplied account and installation details

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// How the account's game license was bought
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum License {
    #[default]
    WindowsStandalone,
    WindowsSteam,
    MacOs,
}

impl License {
    pub fn is_steam(self) -> bool {
        self == Self::WindowsSteam
    }
}

/// One installation and the account it logs in with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Installation root containing `boot/` and `game/`
    pub game_dir: PathBuf,
    /// Directory patches are downloaded into
    pub patches_dir: PathBuf,
    /// Keep patch files after installing them
    pub keep_patches: bool,
    pub license: License,
    pub free_trial: bool,
    /// Login region, 3 for Europe
    pub region: u32,
    /// Game language, 0 Japanese, 1 English, 2 German, 3 French
    pub language: u32,
    /// Number of expansions installed
    pub installed_expansions: u32,
}

impl Profile {
    pub fn new(game_dir: impl Into<PathBuf>) -> Self {
        let game_dir = game_dir.into();
        Self {
            patches_dir: game_dir.join("patches"),
            game_dir,
            keep_patches: false,
            license: License::default(),
            free_trial: false,
            region: 3,
            language: 1,
            installed_expansions: 0,
        }
    }

    /// Root of the boot data
    pub fn boot_dir(&self) -> PathBuf {
        self.game_dir.join("boot")
    }

    /// Root of the game data
    pub fn data_dir(&self) -> PathBuf {
        self.game_dir.join("game")
    }
}

/// Session ticket issued by a storefront, used for Steam logins
#[derive(Clone, PartialEq, Eq)]
pub struct PlatformTicket {
    /// Raw ticket bytes
    pub data: Vec<u8>,
    /// Storefront server time the ticket was issued at, in seconds
    pub server_time: u32,
}

impl fmt::Debug for PlatformTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformTicket")
            .field("data", &format_args!("<{} bytes>", self.data.len()))
            .field("server_time", &self.server_time)
            .finish()
    }
}

/// Everything a login attempt needs from the caller
#[derive(Clone, PartialEq, Eq)]
pub struct LoginInformation {
    pub profile: Profile,
    pub username: String,
    pub password: String,
    pub one_time_password: String,
    pub platform_ticket: Option<PlatformTicket>,
}

impl fmt::Debug for LoginInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginInformation")
            .field("profile", &self.profile)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("one_time_password", &"<redacted>")
            .field("platform_ticket", &self.platform_ticket)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_dirs() {
        let profile = Profile::new("/opt/ffxiv");
        assert_eq!(profile.boot_dir(), PathBuf::from("/opt/ffxiv/boot"));
        assert_eq!(profile.data_dir(), PathBuf::from("/opt/ffxiv/game"));
        assert_eq!(profile.patches_dir, PathBuf::from("/opt/ffxiv/patches"));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let info = LoginInformation {
            profile: Profile::new("/opt/ffxiv"),
            username: "player".to_string(),
            password: "hunter2".to_string(),
            one_time_password: "123456".to_string(),
            platform_ticket: None,
        };
        let debug = format!("{info:?}");
        assert!(debug.contains("player"));
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("123456"));
    }
}
