//! Game process arguments

use xivlaunch_crypto::{CryptoError, encrypt_arguments};

use crate::login::LoginAuth;

/// Port the lobby servers listen on
const LOBBY_PORT: &str = "54994";

/// Ordered `key=value` arguments for the game executable
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchArguments {
    arguments: Vec<(String, String)>,
}

impl LaunchArguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arguments for starting the game with a fresh login
    pub fn from_login(auth: &LoginAuth, game_version: &str, language: u32) -> Self {
        let mut arguments = Self::new()
            .with("DEV.DataPathType", "1")
            .with("DEV.MaxEntitledExpansionID", auth.max_expansion.to_string())
            .with("DEV.TestSID", &auth.session_id)
            .with("DEV.UseSqPack", "1")
            .with("SYS.Region", auth.region.to_string())
            .with("language", language.to_string())
            .with("resetConfig", "0")
            .with("ver", game_version);

        if let Some(lobby) = &auth.lobby_host {
            if let Some(frontier) = &auth.frontier_host {
                arguments.push("DEV.GMServerHost", frontier);
            }
            for index in 1..=8 {
                arguments.push(format!("DEV.LobbyHost0{index}"), lobby);
                arguments.push(format!("DEV.LobbyPort0{index}"), LOBBY_PORT);
            }
        }

        arguments
    }

    /// Append an argument
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.arguments.push((key.into(), value.into()));
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    /// Value of the first argument named `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.arguments
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// Space separated `key=value` pairs
    pub fn to_plain(&self) -> String {
        self.arguments
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Encrypted command line keyed on `ticks`
    ///
    /// Spaces inside keys and values are doubled so the game can tell them
    /// apart from the separators.
    pub fn to_encrypted(&self, ticks: u32) -> Result<String, CryptoError> {
        let joined: String = self
            .arguments
            .iter()
            .map(|(key, value)| format!(" /{} ={}", key.replace(' ', "  "), value.replace(' ', "  ")))
            .collect();
        encrypt_arguments(&joined, ticks)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn auth() -> LoginAuth {
        LoginAuth {
            session_id: "0123abcd".to_string(),
            region: 3,
            max_expansion: 5,
            lobby_host: None,
            frontier_host: None,
        }
    }

    #[test]
    fn test_from_login() {
        let arguments = LaunchArguments::from_login(&auth(), "2023.09.14.0000.0000", 1);
        assert_eq!(
            arguments.to_plain(),
            "DEV.DataPathType=1 DEV.MaxEntitledExpansionID=5 DEV.TestSID=0123abcd \
             DEV.UseSqPack=1 SYS.Region=3 language=1 resetConfig=0 ver=2023.09.14.0000.0000"
        );
    }

    #[test]
    fn test_lobby_override() {
        let mut auth = auth();
        auth.lobby_host = Some("127.0.0.1".to_string());
        auth.frontier_host = Some("127.0.0.1:5000".to_string());

        let arguments = LaunchArguments::from_login(&auth, "2023.09.14.0000.0000", 1);
        assert_eq!(arguments.len(), 8 + 1 + 16);
        assert_eq!(arguments.get("DEV.GMServerHost"), Some("127.0.0.1:5000"));
        assert_eq!(arguments.get("DEV.LobbyHost08"), Some("127.0.0.1"));
        assert_eq!(arguments.get("DEV.LobbyPort01"), Some("54994"));
    }

    #[test]
    fn test_encrypted_matches_cipher() {
        let arguments = LaunchArguments::new()
            .with("DEV.TestSID", "abc")
            .with("name", "two words");

        let encrypted = arguments.to_encrypted(0x0123_4567).expect("Test operation should succeed");
        let expected = encrypt_arguments(" /DEV.TestSID =abc /name =two  words", 0x0123_4567)
            .expect("Test operation should succeed");
        assert_eq!(encrypted, expected);
    }
}
