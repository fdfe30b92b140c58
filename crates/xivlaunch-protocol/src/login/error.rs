use reqwest::StatusCode;
use thiserror::Error;
use xivlaunch_formats::{FormatError, PatchListError};

use crate::error::ProtocolError;
use crate::patch::PatchError;

/// Reasons a login attempt fails
#[derive(Debug, Error)]
pub enum LoginError {
    #[error("Boot data still needs updates after {0} rounds")]
    BootUpdateLoop(usize),

    #[error("Login servers are closed")]
    LoginClosed,

    #[error("Login page has no _STORED_ token")]
    StoredTokenMissing,

    #[error("No Square Enix account is linked to this Steam account")]
    NoSteamAccountLinked,

    #[error("Login page has no Steam account username")]
    SteamUsernameMissing,

    #[error("Unexpected login response")]
    MalformedLoginResponse,

    #[error("Login rejected: {0}")]
    Rejected(String),

    #[error("Terms of service have not been accepted")]
    TermsNotAccepted,

    #[error("Account has no active subscription")]
    NoActiveSubscription,

    #[error("Session registration returned no X-Patch-Unique-Id")]
    MissingPatchUniqueId,

    #[error("Game files failed the server side integrity check")]
    AntiTamperCheckFailed,

    #[error("Installed game version is no longer supported")]
    VersionNoLongerSupported,

    #[error("TLS handshake with the patch server failed: {0}")]
    SslHandshake(#[source] ProtocolError),

    #[error("Session registration failed with status {0}")]
    RegistrationFailed(StatusCode),

    #[error("Game servers are closed")]
    GateClosed,

    #[error("Invalid patch list: {0}")]
    PatchList(#[from] PatchListError),

    #[error(transparent)]
    Patch(#[from] PatchError),

    #[error("Failed to read local game files: {0}")]
    LocalFiles(#[from] FormatError),

    #[error("Network error: {0}")]
    Transport(#[from] ProtocolError),
}

impl From<reqwest::Error> for LoginError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(ProtocolError::Http(error))
    }
}

impl LoginError {
    /// Text to show the player
    pub fn user_message(&self) -> String {
        match self {
            Self::BootUpdateLoop(_) => {
                "The boot files keep requesting updates. Try again later.".to_string()
            }
            Self::LoginClosed => {
                "The login servers are currently closed for maintenance.".to_string()
            }
            Self::StoredTokenMissing => {
                "The login page could not be read. Try again later.".to_string()
            }
            Self::NoSteamAccountLinked => {
                "This Steam account is not linked to a Square Enix account. \
                 Link it through the official launcher first."
                    .to_string()
            }
            Self::SteamUsernameMissing => {
                "The Square Enix account linked to this Steam account could not be found."
                    .to_string()
            }
            Self::MalformedLoginResponse => {
                "The login server returned an unexpected response.".to_string()
            }
            Self::Rejected(message) => message.clone(),
            Self::TermsNotAccepted => {
                "Accept the terms of use in the official launcher before logging in.".to_string()
            }
            Self::NoActiveSubscription => {
                "This account has no active game subscription.".to_string()
            }
            Self::MissingPatchUniqueId => {
                "The patch server did not issue a session id.".to_string()
            }
            Self::AntiTamperCheckFailed => {
                "The game files failed the integrity check. Repair the installation.".to_string()
            }
            Self::VersionNoLongerSupported => {
                "This game version is no longer supported. Reinstall the game.".to_string()
            }
            Self::SslHandshake(_) => "The secure connection to the patch server failed. \
                 On some Linux distributions this is fixed by running \
                 \"update-crypto-policies --set LEGACY\"."
                .to_string(),
            Self::RegistrationFailed(status) => {
                format!("Session registration failed ({status}).")
            }
            Self::GateClosed => "The game servers are currently closed for maintenance.".to_string(),
            Self::PatchList(e) => format!("The patch list could not be read: {e}"),
            Self::Patch(e) if e.is_integrity() => {
                format!("{e}. The patch file was discarded, log in again to download it.")
            }
            Self::Patch(e) if e.is_fatal() => {
                format!("{e}. The installation may be damaged and need a reinstall.")
            }
            Self::Patch(e) => format!("Patching failed: {e}"),
            Self::LocalFiles(e) => format!("Local game files could not be read: {e}"),
            Self::Transport(e) => format!("Network error: {e}"),
        }
    }
}
