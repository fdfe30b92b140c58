//! Command implementations, each returning the text to print

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;
use xivlaunch_crypto::{current_ticks, encrypt_arguments, encrypt_ticket};
use xivlaunch_formats::PatchList;
use xivlaunch_protocol::{HttpClient, LauncherConfig, LoginSession};

pub fn patch_list(file: &Path) -> Result<String> {
    let body = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let list = PatchList::parse(&body)
        .with_context(|| format!("Failed to parse {}", file.display()))?;

    if list.is_empty() {
        return Ok("No patches".to_string());
    }

    let mut output = String::new();
    for (index, patch) in list.patches().iter().enumerate() {
        let hashes = if patch.is_hashed() {
            format!("{} blocks of {}", patch.hashes.len(), patch.hash_block_size)
        } else {
            "unhashed".to_string()
        };
        let _ = writeln!(
            output,
            "{index:>3}  {:<6} {}  {:>12}  {hashes}",
            patch.repository, patch.version, patch.length
        );
    }
    let _ = write!(
        output,
        "{} patches, {} bytes",
        list.len(),
        list.total_length()
    );
    Ok(output)
}

pub fn encode_args(arguments: &str, ticks: Option<u32>) -> Result<String> {
    let ticks = ticks.unwrap_or_else(current_ticks);
    tracing::debug!("Encrypting arguments with tick count {}", ticks);
    Ok(encrypt_arguments(arguments, ticks)?)
}

pub fn encode_ticket(ticket: &str, time: u32) -> Result<String> {
    let data = hex::decode(ticket.trim()).context("Ticket is not valid hex")?;
    let encrypted = encrypt_ticket(&data, time)?;
    Ok(format!(
        "ticket_size={}\nsession_ticket={}",
        encrypted.length, encrypted.text
    ))
}

pub async fn status(config: LauncherConfig) -> Result<String> {
    let http = HttpClient::with_config(&config.http)?;
    let session = LoginSession::new(http, config);

    let login = session.login_servers_open().await?;
    let gate = session.game_servers_open().await?;

    Ok(format!(
        "Login servers: {}\nGame servers: {}",
        open_or_closed(login),
        open_or_closed(gate)
    ))
}

const fn open_or_closed(open: bool) -> &'static str {
    if open { "open" } else { "closed" }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use xivlaunch_protocol::HttpConfig;

    const BOOT_LIST: &str = "--477D80B1_38BC_41d4_8B48_5273ADB89CAC\r\n\
        Content-Type: application/octet-stream\r\n\
        Content-Location: ffxivpatch/2b5cbc63/metainfo/D2023.09.14.0000.0001.http\r\n\
        X-Patch-Length: 22\r\n\
        \r\n\
        22\t44\t1\t1\t2023.09.14.0000.0001\thttp://patch-dl.ffxiv.com/boot/2b5cbc63/D2023.09.14.0000.0001.patch\r\n\
        --477D80B1_38BC_41d4_8B48_5273ADB89CAC--\r\n";

    #[test]
    fn test_patch_list_output() {
        let dir = tempfile::TempDir::new().expect("Test operation should succeed");
        let file = dir.path().join("boot.txt");
        std::fs::write(&file, BOOT_LIST).expect("Test operation should succeed");

        let output = patch_list(&file).expect("Test operation should succeed");
        assert_eq!(
            output,
            "  0  boot   2023.09.14.0000.0001            22  unhashed\n1 patches, 22 bytes"
        );
    }

    #[test]
    fn test_patch_list_empty() {
        let dir = tempfile::TempDir::new().expect("Test operation should succeed");
        let file = dir.path().join("empty.txt");
        std::fs::write(&file, "").expect("Test operation should succeed");

        assert_eq!(patch_list(&file).unwrap(), "No patches");
    }

    #[test]
    fn test_patch_list_missing_file() {
        let error = patch_list(Path::new("/nonexistent/patchlist.txt"))
            .expect_err("Missing file should fail");
        assert!(error.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_encode_args_is_deterministic() {
        let first = encode_args(" /DEV.TestSID =abc", Some(0x0123_4567)).unwrap();
        let second = encode_args(" /DEV.TestSID =abc", Some(0x0123_4567)).unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with("//**sqex0003"));
    }

    #[test]
    fn test_encode_ticket() {
        let output = encode_ticket("14000000deadbeef", 1_700_000_000).unwrap();
        let expected = encrypt_ticket(&[0x14, 0, 0, 0, 0xde, 0xad, 0xbe, 0xef], 1_700_000_000)
            .unwrap();
        assert_eq!(
            output,
            format!("ticket_size={}\nsession_ticket={}", expected.length, expected.text)
        );
        assert!(encode_ticket("not hex", 0).is_err());
    }

    #[tokio::test]
    async fn test_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/worldStatus/login_status.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":1}"#))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/worldStatus/gate_status.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":0}"#))
            .mount(&server)
            .await;

        let config = LauncherConfig::default().with_base_url(&server.uri());
        let output = status(config).await.unwrap();
        assert_eq!(output, "Login servers: open\nGame servers: closed");
    }

    #[tokio::test]
    async fn test_status_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/worldStatus/login_status.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"status":1}"#)
                    .set_delay(Duration::from_secs(30)),
            )
            .mount(&server)
            .await;

        let mut config = LauncherConfig::default().with_base_url(&server.uri());
        config.http = HttpConfig {
            timeout: Some(Duration::from_millis(500)),
            ..HttpConfig::interactive()
        };

        let error = tokio::time::timeout(Duration::from_secs(10), status(config))
            .await
            .expect("Status should give up before the server answers")
            .expect_err("A hung server should fail the query");
        assert!(format!("{error:#}").to_lowercase().contains("timed out"));
    }
}
