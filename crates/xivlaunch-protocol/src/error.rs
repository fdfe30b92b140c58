//! Error types for protocol operations

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status: {0}")]
    HttpStatus(StatusCode),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl ProtocolError {
    /// Whether the error came from a failed TLS handshake
    ///
    /// Some distributions ship crypto policies that refuse the ciphers the
    /// patch servers offer, which only shows up as a handshake failure deep
    /// inside the error chain.
    pub fn is_tls_handshake(&self) -> bool {
        let Self::Http(error) = self else {
            return false;
        };

        let mut source: Option<&dyn std::error::Error> = Some(error);
        while let Some(current) = source {
            let message = current.to_string().to_ascii_lowercase();
            if message.contains("handshake") {
                return true;
            }
            source = current.source();
        }
        false
    }
}

pub type Result<T> = std::result::Result<T, ProtocolError>;

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::transport::HttpClient;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Fatal `handshake_failure` alert record
    const HANDSHAKE_FAILURE_ALERT: [u8; 7] = [0x15, 0x03, 0x03, 0x00, 0x02, 0x02, 0x28];

    async fn request_error(url: &str) -> ProtocolError {
        let http = HttpClient::new().expect("Test operation should succeed");
        let error = http
            .inner()
            .get(url)
            .send()
            .await
            .expect_err("Request should fail");
        ProtocolError::from(error)
    }

    #[tokio::test]
    async fn test_rejected_handshake_is_detected() {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Test operation should succeed");
        let address = listener.local_addr().expect("Test operation should succeed");
        tokio::spawn(async move {
            if let Ok((mut stream, _)) = listener.accept().await {
                let mut client_hello = [0u8; 1024];
                let _ = stream.read(&mut client_hello).await;
                let _ = stream.write_all(&HANDSHAKE_FAILURE_ALERT).await;
            }
        });

        let error = request_error(&format!("https://{address}/")).await;
        assert!(error.is_tls_handshake(), "not a handshake failure: {error:?}");
    }

    #[tokio::test]
    async fn test_refused_connection_is_not_a_handshake() {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Test operation should succeed");
        let address = listener.local_addr().expect("Test operation should succeed");
        drop(listener);

        let error = request_error(&format!("http://{address}/")).await;
        assert!(matches!(error, ProtocolError::Http(_)));
        assert!(!error.is_tls_handshake());
    }

    #[test]
    fn test_non_http_errors_are_not_handshakes() {
        assert!(!ProtocolError::HttpStatus(StatusCode::CONFLICT).is_tls_handshake());
        assert!(!ProtocolError::Parse("handshake".to_string()).is_tls_handshake());
    }
}
