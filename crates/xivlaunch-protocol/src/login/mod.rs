//! Login session state machine
//!
//! A login walks through a fixed sequence of steps, any of which can end the
//! attempt:
//!
//! 1. Update boot data until the boot version server has nothing left
//! 2. Check that the login servers are open
//! 3. Log in through the OAuth pages and read the session id
//! 4. Register the session with the game version server, patching game data
//!    if it asks for it
//! 5. Check that the game servers are open
//!
//! A successful login yields a [`LoginAuth`] to launch the game with.

mod account;
mod error;
pub mod scrape;

pub use account::{License, LoginInformation, PlatformTicket, Profile};
pub use error::LoginError;
pub use scrape::LoginResponse;

use chrono::{DateTime, Timelike, Utc};
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, REFERER, USER_AGENT};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use url::form_urlencoded;
use xivlaunch_crypto::{computer_id, encrypt_ticket};
use xivlaunch_formats::version_file::BASE_REPOSITORY;
use xivlaunch_formats::{PatchList, VersionReport};

use crate::config::LauncherConfig;
use crate::error::ProtocolError;
use crate::patch::{PatchEngine, PatchOptions};
use crate::progress::{PatchEvent, ProgressReporter};
use crate::store::{DataStore, Target};
use crate::transport::{HttpClient, PATCH_USER_AGENT, oauth_user_agent};

/// Repository name boot data versions are looked up under
pub const BOOT_REPOSITORY: &str = "boot";

const PATCH_HEADER_SESSION_ID: &str = "X-Patch-Unique-Id";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Credentials of a successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginAuth {
    /// Session id issued by the game version server
    pub session_id: String,
    pub region: u32,
    /// Highest expansion the account is entitled to
    pub max_expansion: u32,
    /// Lobby host override, `None` for the official servers
    pub lobby_host: Option<String>,
    /// Frontier host override, `None` for the official servers
    pub frontier_host: Option<String>,
}

/// Step a login attempt is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    CheckingBootUpdates,
    CheckingLoginStatus,
    LoggingInViaOAuth,
    RegisteringSession,
    CheckingGate,
    Done,
}

impl fmt::Display for LoginState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CheckingBootUpdates => "Checking for launcher updates",
            Self::CheckingLoginStatus => "Checking the login server status",
            Self::LoggingInViaOAuth => "Logging in",
            Self::RegisteringSession => "Checking for game updates",
            Self::CheckingGate => "Checking the game server status",
            Self::Done => "Logged in",
        })
    }
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: i64,
}

/// One login attempt
pub struct LoginSession {
    http: HttpClient,
    config: LauncherConfig,
    state: LoginState,
}

impl LoginSession {
    pub fn new(http: HttpClient, config: LauncherConfig) -> Self {
        Self {
            http,
            config,
            state: LoginState::CheckingBootUpdates,
        }
    }

    /// Current step
    pub fn state(&self) -> LoginState {
        self.state
    }

    /// Run the whole login sequence
    ///
    /// `boot` and `game` receive any patches the servers require before the
    /// session can be used.
    pub async fn login(
        &mut self,
        info: &LoginInformation,
        boot: &mut dyn DataStore,
        game: &mut dyn DataStore,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Result<LoginAuth, LoginError> {
        self.enter(LoginState::CheckingBootUpdates, reporter.as_ref());
        self.update_boot(info, boot, &reporter).await?;

        self.enter(LoginState::CheckingLoginStatus, reporter.as_ref());
        if !self.login_servers_open().await? {
            return Err(LoginError::LoginClosed);
        }

        self.enter(LoginState::LoggingInViaOAuth, reporter.as_ref());
        let response = self.oauth_login(info).await?;
        if !response.terms_accepted {
            return Err(LoginError::TermsNotAccepted);
        }
        if !response.playable {
            return Err(LoginError::NoActiveSubscription);
        }

        self.enter(LoginState::RegisteringSession, reporter.as_ref());
        let boot_version = current_version(&*boot, BOOT_REPOSITORY);
        let session_id = self
            .register_session(info, &response, &boot_version, game, &reporter)
            .await?;

        self.enter(LoginState::CheckingGate, reporter.as_ref());
        if !self.game_servers_open().await? {
            return Err(LoginError::GateClosed);
        }

        self.enter(LoginState::Done, reporter.as_ref());
        Ok(LoginAuth {
            session_id,
            region: response.region,
            max_expansion: response.max_expansion,
            lobby_host: self.config.lobby_host.clone(),
            frontier_host: self.config.frontier_host.clone(),
        })
    }

    /// Whether the login servers accept logins
    pub async fn login_servers_open(&self) -> Result<bool, LoginError> {
        self.world_status("login_status.json", "").await
    }

    /// Whether the game servers are open
    pub async fn game_servers_open(&self) -> Result<bool, LoginError> {
        self.world_status("gate_status.json", "lang=en-US&").await
    }

    fn enter(&mut self, state: LoginState, reporter: &dyn ProgressReporter) {
        tracing::info!("{}", state);
        self.state = state;
        reporter.report(&PatchEvent::Stage(state.to_string()));
    }

    fn patch_options(&self, info: &LoginInformation, install_dir: std::path::PathBuf) -> PatchOptions {
        PatchOptions::new(install_dir, &info.profile.patches_dir)
            .keep_patches(info.profile.keep_patches)
            .max_concurrent_downloads(self.config.max_concurrent_downloads)
    }

    async fn update_boot(
        &self,
        info: &LoginInformation,
        boot: &mut dyn DataStore,
        reporter: &Arc<dyn ProgressReporter>,
    ) -> Result<(), LoginError> {
        let max_rounds = self.config.max_boot_update_rounds;
        let mut rounds = 0;

        loop {
            let boot_version = current_version(&*boot, BOOT_REPOSITORY);
            let patches = self.check_boot_version(&boot_version).await?;
            if patches.is_empty() {
                tracing::debug!("Boot data is up to date at {}", boot_version);
                return Ok(());
            }
            if rounds == max_rounds {
                return Err(LoginError::BootUpdateLoop(max_rounds));
            }
            rounds += 1;

            let options = self.patch_options(info, info.profile.boot_dir());
            PatchEngine::new(self.http.clone(), Target::Boot(&mut *boot), options)
                .with_reporter(Arc::clone(reporter))
                .run(patches.patches())
                .await?;
        }
    }

    async fn check_boot_version(&self, boot_version: &str) -> Result<PatchList, LoginError> {
        let url = format!(
            "{}/http/win32/ffxivneo_release_boot/{}/?time={}",
            self.config.boot_version_url,
            boot_version,
            patch_time(Utc::now())
        );
        tracing::debug!("Boot version request: {}", url);

        let response = self
            .http
            .inner()
            .get(&url)
            .header(USER_AGENT, PATCH_USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProtocolError::HttpStatus(status).into());
        }

        Ok(PatchList::parse(&response.text().await?)?)
    }

    /// `true` when the frontier status document reports open servers
    async fn world_status(&self, document: &str, query: &str) -> Result<bool, LoginError> {
        let url = format!(
            "{}/worldStatus/{}?{}_={}",
            self.config.frontier_url,
            document,
            query,
            Utc::now().timestamp_millis()
        );
        tracing::debug!("World status request: {}", url);

        let response = self.http.inner().get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProtocolError::HttpStatus(status).into());
        }

        let body = response.text().await?;
        let parsed: StatusResponse = serde_json::from_str(&body).map_err(ProtocolError::from)?;
        Ok(parsed.status != 0)
    }

    async fn oauth_login(&self, info: &LoginInformation) -> Result<LoginResponse, LoginError> {
        let profile = &info.profile;
        let user_agent = oauth_user_agent(&computer_id(&self.config.computer_id_seed));

        let mut top_url = format!(
            "{}/oauth/ffxivarr/login/top?lng=en&rgn={}&isft={}&cssmode=1&isnew=1&launchver=3",
            self.config.oauth_url,
            profile.region,
            u8::from(profile.free_trial)
        );

        let steam = profile.license.is_steam();
        if steam && let Some(ticket) = &info.platform_ticket {
            let encrypted = encrypt_ticket(&ticket.data, ticket.server_time)
                .map_err(|e| ProtocolError::Parse(format!("Invalid Steam ticket: {e}")))?;
            top_url.push_str(&format!(
                "&issteam=1&session_ticket={}&ticket_size={}",
                encrypted.text, encrypted.length
            ));
        }

        tracing::debug!("OAuth top request: {}", top_url);
        let page = self
            .http
            .inner()
            .get(&top_url)
            .header(USER_AGENT, &user_agent)
            .send()
            .await?
            .text()
            .await?;

        if steam && scrape::requests_restart(&page) {
            return Err(LoginError::NoSteamAccountLinked);
        }

        let stored = scrape::stored_token(&page).ok_or(LoginError::StoredTokenMissing)?;

        let username = if steam {
            scrape::steam_username(&page).ok_or(LoginError::SteamUsernameMissing)?
        } else {
            info.username.clone()
        };

        let form = form_urlencoded::Serializer::new(String::new())
            .append_pair("_STORED_", &stored)
            .append_pair("sqexid", &username)
            .append_pair("password", &info.password)
            .append_pair("otppw", &info.one_time_password)
            .finish();

        let send_url = format!("{}/oauth/ffxivarr/login/login.send", self.config.oauth_url);
        tracing::debug!("OAuth login request: {}", send_url);
        let page = self
            .http
            .inner()
            .post(&send_url)
            .header(USER_AGENT, &user_agent)
            .header(REFERER, &top_url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(form)
            .send()
            .await?
            .text()
            .await?;

        scrape::parse_login_response(&page)
    }

    async fn register_session(
        &self,
        info: &LoginInformation,
        response: &LoginResponse,
        boot_version: &str,
        game: &mut dyn DataStore,
        reporter: &Arc<dyn ProgressReporter>,
    ) -> Result<String, LoginError> {
        let game_version = current_version(&*game, BASE_REPOSITORY);

        let installed: Vec<String> = (1..=info.profile.installed_expansions.min(response.max_expansion))
            .map(|index| game.version(&format!("ex{index}")).unwrap_or_default())
            .collect();

        let report = VersionReport::new(boot_version)
            .with_boot_files(&info.profile.boot_dir())?
            .with_expansions(response.max_expansion, &installed)
            .build();

        let url = format!(
            "{}/http/win32/ffxivneo_release_game/{}/{}",
            self.config.game_version_url, game_version, response.session_id
        );
        tracing::debug!("Session registration request: {}", url);

        let result = self
            .http
            .inner()
            .post(&url)
            .header(USER_AGENT, PATCH_USER_AGENT)
            .header("X-Hash-Check", "enabled")
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(report)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                let error = ProtocolError::from(e);
                if error.is_tls_handshake() {
                    return Err(LoginError::SslHandshake(error));
                }
                return Err(LoginError::Transport(error));
            }
        };

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => {}
            StatusCode::CONFLICT => return Err(LoginError::AntiTamperCheckFailed),
            StatusCode::GONE => return Err(LoginError::VersionNoLongerSupported),
            status => return Err(LoginError::RegistrationFailed(status)),
        }

        let session_id = response
            .headers()
            .get(PATCH_HEADER_SESSION_ID)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or(LoginError::MissingPatchUniqueId)?;

        let patches = PatchList::parse(&response.text().await?)?;
        if !patches.is_empty() {
            tracing::info!("Game data needs {} patches", patches.len());
            let options = self.patch_options(info, info.profile.data_dir());
            PatchEngine::new(self.http.clone(), Target::Game(game), options)
                .with_reporter(Arc::clone(reporter))
                .run(patches.patches())
                .await?;
        }

        Ok(session_id)
    }
}

fn current_version(store: &dyn DataStore, repository: &str) -> String {
    store
        .version(repository)
        .filter(|version| !version.is_empty())
        .unwrap_or_else(|| xivlaunch_formats::version_file::DEFAULT_VERSION.to_string())
}

/// Timestamp the boot version server expects, minutes rounded down to ten
fn patch_time(now: DateTime<Utc>) -> String {
    format!("{}{}0", now.format("%Y-%m-%d-%H-"), now.minute() / 10)
}
