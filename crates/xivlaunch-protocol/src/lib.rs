//! # xivlaunch-protocol - FFXIV Launcher Network Protocol
//!
//! This crate implements the network side of launching the game: keeping
//! boot and game data patched and turning account credentials into a
//! session the game client accepts.
//!
//! ## Architecture Overview
//!
//! 1. **Patch Engine** ([`PatchEngine`]): concurrent patch downloads behind a
//!    barrier, then block hash verification and in-order installation into a
//!    [`DataStore`]
//! 2. **Login Session** ([`LoginSession`]): the boot update, login status,
//!    OAuth, session registration and gate status sequence
//! 3. **Launch Arguments** ([`LaunchArguments`]): the plain or encrypted
//!    command line for the game process
//!
//! Patch application itself and process spawning are left to the caller.
//!
//! ## Usage Examples
//!
//! ### Login
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use xivlaunch_protocol::{HttpClient, LauncherConfig, LoginSession, NoProgress};
//! use xivlaunch_protocol::login::{LoginInformation, Profile};
//! use xivlaunch_protocol::store::DataStore;
//!
//! # async fn example(boot: &mut dyn DataStore, game: &mut dyn DataStore) -> Result<(), Box<dyn std::error::Error>> {
//! let info = LoginInformation {
//!     profile: Profile::new("/opt/ffxiv"),
//!     username: "player".to_string(),
//!     password: "secret".to_string(),
//!     one_time_password: String::new(),
//!     platform_ticket: None,
//! };
//!
//! let mut session = LoginSession::new(HttpClient::new()?, LauncherConfig::from_env());
//! let auth = session.login(&info, boot, game, Arc::new(NoProgress)).await?;
//! println!("Session {}", auth.session_id);
//! # Ok(())
//! # }
//! ```
//!
//! ### Launch Arguments
//!
//! ```rust
//! use xivlaunch_protocol::LaunchArguments;
//!
//! let arguments = LaunchArguments::new()
//!     .with("DEV.TestSID", "0123abcd")
//!     .with("language", "1");
//! assert_eq!(arguments.to_plain(), "DEV.TestSID=0123abcd language=1");
//! ```

pub mod config;
pub mod error;
pub mod launch;
pub mod login;
pub mod patch;
pub mod progress;
pub mod store;
pub mod transport;

// Re-export commonly used types
pub use config::LauncherConfig;
pub use error::{ProtocolError, Result};
pub use launch::LaunchArguments;
pub use login::{LoginAuth, LoginError, LoginSession, LoginState};
pub use patch::{PatchEngine, PatchError, PatchOptions};
pub use progress::{NoProgress, PatchEvent, ProgressReporter};
pub use store::{DataStore, Target};
pub use transport::{HttpClient, HttpConfig};
