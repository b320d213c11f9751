use axum::http::{header, HeaderMap};

use crate::config::CookieConfig;

/// Builds the Set-Cookie value carrying the session token.
/// HttpOnly + SameSite=Lax: the client script can never read the token.
pub fn session_cookie(config: &CookieConfig, token: &str, max_age_secs: u64) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        config.name, token, max_age_secs
    );
    if config.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Set-Cookie value that expires the session cookie immediately, with the
/// same attributes as the cookie it replaces.
pub fn expired_cookie(config: &CookieConfig) -> String {
    let mut cookie = format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", config.name);
    if config.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Pulls a named cookie value out of the request headers.
pub fn extract(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then(|| value.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn config(secure: bool) -> CookieConfig {
        CookieConfig {
            name: "token".into(),
            secure,
        }
    }

    #[test]
    fn session_cookie_has_expected_attributes() {
        let cookie = session_cookie(&config(true), "abc.def.ghi", 172800);
        assert!(cookie.starts_with("token=abc.def.ghi"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=172800"));
        assert!(cookie.contains("Secure"));
    }

    #[test]
    fn insecure_cookie_omits_secure_flag() {
        let cookie = session_cookie(&config(false), "t", 60);
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn expired_cookie_zeroes_max_age() {
        let cookie = expired_cookie(&config(false));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.starts_with("token=;"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn expired_cookie_keeps_secure_flag() {
        let cookie = expired_cookie(&config(true));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("Secure"));
    }

    #[test]
    fn extract_finds_cookie_among_several() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("foo=bar; token=abc123; other=xyz"),
        );
        assert_eq!(extract(&headers, "token"), Some("abc123".to_string()));
        assert_eq!(extract(&headers, "foo"), Some("bar".to_string()));
        assert_eq!(extract(&headers, "missing"), None);
    }

    #[test]
    fn extract_handles_missing_header() {
        let headers = HeaderMap::new();
        assert_eq!(extract(&headers, "token"), None);
    }
}
