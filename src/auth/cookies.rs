use axum::http::{header, HeaderMap, HeaderValue};

pub const SESSION_COOKIE: &str = "access_token";
pub const ADMIN_COOKIE: &str = "admin_token";

/// Value of cookie `name` from the request's `Cookie` headers.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim_matches('"').to_string())
        .filter(|v| !v.is_empty())
}

/// `Set-Cookie` value for an HttpOnly, SameSite=Lax session cookie.
pub fn session_cookie(
    name: &str,
    value: &str,
    path: &str,
    max_age_secs: i64,
    secure: bool,
) -> HeaderValue {
    let mut cookie =
        format!("{name}={value}; Path={path}; Max-Age={max_age_secs}; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    // JWTs and our cookie names are plain ASCII.
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
}

/// `Set-Cookie` value that expires cookie `name` immediately.
pub fn clear_cookie(name: &str, path: &str) -> HeaderValue {
    HeaderValue::from_str(&format!(
        "{name}=; Path={path}; Max-Age=0; HttpOnly; SameSite=Lax"
    ))
    .unwrap_or_else(|_| HeaderValue::from_static(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(cookie: &'static str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::COOKIE, HeaderValue::from_static(cookie));
        h
    }

    #[test]
    fn reads_named_cookie() {
        let h = headers_with("theme=dark; access_token=abc.def.ghi; other=1");
        assert_eq!(read_cookie(&h, SESSION_COOKIE).as_deref(), Some("abc.def.ghi"));
        assert_eq!(read_cookie(&h, "theme").as_deref(), Some("dark"));
        assert_eq!(read_cookie(&h, ADMIN_COOKIE), None);
    }

    #[test]
    fn strips_quotes_and_ignores_empty() {
        let h = headers_with("access_token=\"Bearer xyz\"; admin_token=");
        assert_eq!(read_cookie(&h, SESSION_COOKIE).as_deref(), Some("Bearer xyz"));
        assert_eq!(read_cookie(&h, ADMIN_COOKIE), None);
    }

    #[test]
    fn session_cookie_attributes() {
        let v = session_cookie(SESSION_COOKIE, "tok", "/", 1800, false);
        let s = v.to_str().unwrap();
        assert!(s.starts_with("access_token=tok;"));
        assert!(s.contains("Max-Age=1800"));
        assert!(s.contains("HttpOnly"));
        assert!(s.contains("SameSite=Lax"));
        assert!(!s.contains("Secure"));

        let v = session_cookie(ADMIN_COOKIE, "tok", "/admin", 60, true);
        assert!(v.to_str().unwrap().ends_with("; Secure"));
    }

    #[test]
    fn clear_cookie_expires() {
        let v = clear_cookie(SESSION_COOKIE, "/");
        assert!(v.to_str().unwrap().contains("Max-Age=0"));
    }
}
