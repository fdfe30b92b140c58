//! HTTP transport shared by the patch and login clients
//!
//! All requests go through one pooled `reqwest` client. User agents are set
//! per request because the patch servers and the login servers expect
//! different ones.

use crate::error::Result;
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// User agent expected by the boot and game version servers
pub const PATCH_USER_AGENT: &str = "FFXIV PATCH CLIENT";

/// User agent of the official launcher's embedded browser
pub fn oauth_user_agent(computer_id: &str) -> String {
    format!("SQEXAuthor/2.0.0(Windows 6.2; ja-jp; {computer_id})")
}

/// Global shared HTTP client
static GLOBAL_HTTP_CLIENT: OnceLock<Arc<Client>> = OnceLock::new();

/// Install the ring crypto provider for rustls if none is installed yet
pub(crate) fn ensure_crypto_provider() {
    // Fails only when a provider is already installed
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// HTTP transport client with connection pooling
#[derive(Clone)]
pub struct HttpClient {
    client: Arc<Client>,
}

impl HttpClient {
    /// Create a client backed by the process wide shared client
    pub fn new() -> Result<Self> {
        if let Some(client) = GLOBAL_HTTP_CLIENT.get() {
            return Ok(Self {
                client: Arc::clone(client),
            });
        }

        let client = Arc::new(Self::builder(&HttpConfig::default()).build()?);
        let client = GLOBAL_HTTP_CLIENT.get_or_init(|| client);
        Ok(Self {
            client: Arc::clone(client),
        })
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: &HttpConfig) -> Result<Self> {
        let client = Self::builder(config).build()?;
        Ok(Self {
            client: Arc::new(client),
        })
    }

    fn builder(config: &HttpConfig) -> ClientBuilder {
        ensure_crypto_provider();

        let mut builder = ClientBuilder::new()
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .connect_timeout(config.connect_timeout)
            .tcp_nodelay(true)
            .tcp_keepalive(config.tcp_keepalive)
            // Patch downloads are served over plain HTTP
            .https_only(false)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects));

        // Patch files run to gigabytes, so only bound the request when asked
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        if config.enable_compression {
            builder = builder.gzip(true).brotli(true).deflate(true);
        }

        builder
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Whole request timeout, `None` for no limit
    pub timeout: Option<Duration>,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// TCP keep-alive duration
    pub tcp_keepalive: Option<Duration>,

    /// Maximum redirects followed per request
    pub max_redirects: usize,

    /// Enable compression (gzip, brotli, deflate)
    pub enable_compression: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            pool_idle_timeout: Duration::from_secs(30),
            pool_max_idle_per_host: 10,
            timeout: None,
            connect_timeout: Duration::from_secs(10),
            tcp_keepalive: Some(Duration::from_secs(60)),
            max_redirects: 5,
            enable_compression: true,
        }
    }
}

impl HttpConfig {
    /// Short timeouts for status queries where a hung server should fail fast
    pub fn interactive() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: Duration::from_secs(5),
            ..Self::default()
        }
    }
}
