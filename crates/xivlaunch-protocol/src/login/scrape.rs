//! Values embedded in the OAuth login pages
//!
//! The login server answers with HTML meant for the official launcher's
//! embedded browser. The values the launcher needs are scraped out of it.

use regex::Regex;
use std::sync::LazyLock;

use super::LoginError;

#[allow(clippy::expect_used)]
// expect_used: the patterns are constants covered by the tests below
static STORED_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\t<\s*input .* name="_STORED_" value="(?<stored>.*)">"#)
        .expect("valid _STORED_ pattern")
});

#[allow(clippy::expect_used)]
// expect_used: the patterns are constants covered by the tests below
static STEAM_USERNAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<input name="sqexid" type="hidden" value="(?<sqexid>.*)"/>"#)
        .expect("valid sqexid pattern")
});

#[allow(clippy::expect_used)]
// expect_used: the patterns are constants covered by the tests below
static LOGIN_OK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"window\.external\.user\("login=auth,ok,(?<params>.*)"\);"#)
        .expect("valid login ok pattern")
});

#[allow(clippy::expect_used)]
// expect_used: the patterns are constants covered by the tests below
static LOGIN_ERROR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"window\.external\.user\("login=auth,ng,err,(?<params>.*)"\);"#)
        .expect("valid login error pattern")
});

const RESTARTUP_MARKER: &str = r#"window.external.user("restartup");"#;

/// Fields of a successful `login.send` response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub session_id: String,
    pub terms_accepted: bool,
    pub region: u32,
    pub playable: bool,
    pub max_expansion: u32,
}

/// `_STORED_` form token of the login top page
pub fn stored_token(page: &str) -> Option<String> {
    STORED_TOKEN
        .captures(page)
        .map(|captures| captures["stored"].to_string())
}

/// Square Enix id linked to the Steam account, from the login top page
pub fn steam_username(page: &str) -> Option<String> {
    STEAM_USERNAME
        .captures(page)
        .map(|captures| captures["sqexid"].to_string())
}

/// Whether the login page asks the launcher to restart, meaning no account is linked
pub fn requests_restart(page: &str) -> bool {
    page.contains(RESTARTUP_MARKER)
}

/// Parse the `login.send` response
///
/// The success payload is a comma separated list; the fields used are the
/// session id (1), terms accepted (3), region (5), playable (9) and the
/// highest entitled expansion (13).
pub fn parse_login_response(page: &str) -> Result<LoginResponse, LoginError> {
    if let Some(captures) = LOGIN_OK.captures(page) {
        let fields: Vec<&str> = captures["params"].split(',').collect();
        if fields.len() < 14 {
            return Err(LoginError::MalformedLoginResponse);
        }

        let number = |index: usize| -> Result<u32, LoginError> {
            fields[index]
                .trim()
                .parse()
                .map_err(|_| LoginError::MalformedLoginResponse)
        };

        return Ok(LoginResponse {
            session_id: fields[1].to_string(),
            terms_accepted: number(3)? != 0,
            region: number(5)?,
            playable: number(9)? != 0,
            max_expansion: number(13)?,
        });
    }

    if let Some(captures) = LOGIN_ERROR.captures(page) {
        return Err(LoginError::Rejected(captures["params"].to_string()));
    }

    Err(LoginError::MalformedLoginResponse)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TOP_PAGE: &str = "<html>\n<form action=\"login.send\" method=\"post\">\n\t<input type=\"hidden\" name=\"_STORED_\" value=\"42ab9f1c0e\">\n</form>\n</html>";

    const STEAM_PAGE: &str = "<form>\n<input name=\"sqexid\" type=\"hidden\" value=\"steamplayer\"/>\n\t<input type=\"hidden\" name=\"_STORED_\" value=\"77\">\n</form>";

    #[test]
    fn test_stored_token() {
        assert_eq!(stored_token(TOP_PAGE), Some("42ab9f1c0e".to_string()));
        assert_eq!(stored_token("<html></html>"), None);
    }

    #[test]
    fn test_steam_username() {
        assert_eq!(steam_username(STEAM_PAGE), Some("steamplayer".to_string()));
        assert_eq!(steam_username(TOP_PAGE), None);
    }

    #[test]
    fn test_restartup_marker() {
        assert!(requests_restart(
            "<script>window.external.user(\"restartup\");</script>"
        ));
        assert!(!requests_restart(TOP_PAGE));
    }

    #[test]
    fn test_login_ok() {
        let page = "<script>window.external.user(\"login=auth,ok,sid,0123abcd,terms,1,region,3,etmadd,0,playable,1,ps3pkg,0,maxex,5,product,1\");</script>";
        assert_eq!(
            parse_login_response(page).expect("Test operation should succeed"),
            LoginResponse {
                session_id: "0123abcd".to_string(),
                terms_accepted: true,
                region: 3,
                playable: true,
                max_expansion: 5,
            }
        );
    }

    #[test]
    fn test_login_not_playable() {
        let page = "window.external.user(\"login=auth,ok,sid,0123abcd,terms,1,region,3,etmadd,0,playable,0,ps3pkg,0,maxex,5,product,1\");";
        let response = parse_login_response(page).expect("Test operation should succeed");
        assert!(!response.playable);
    }

    #[test]
    fn test_login_short_payload() {
        let page = "window.external.user(\"login=auth,ok,sid,0123abcd,terms,1\");";
        assert!(matches!(
            parse_login_response(page),
            Err(LoginError::MalformedLoginResponse)
        ));
    }

    #[test]
    fn test_login_rejected() {
        let page = "window.external.user(\"login=auth,ng,err,ID or password is incorrect.\");";
        match parse_login_response(page) {
            Err(LoginError::Rejected(message)) => {
                assert_eq!(message, "ID or password is incorrect.");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_login_unrecognized() {
        assert!(matches!(
            parse_login_response("<html>maintenance</html>"),
            Err(LoginError::MalformedLoginResponse)
        ));
    }
}
