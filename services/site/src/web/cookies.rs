//! services/site/src/web/cookies.rs
//!
//! Reading and writing the `nd_admin` session cookie.

use axum::http::{header, HeaderMap};
use nextdoor_core::token::TOKEN_TTL_SECS;

pub const ADMIN_COOKIE: &str = "nd_admin";

/// `Set-Cookie` value carrying a freshly issued token.
pub fn admin_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        ADMIN_COOKIE, token, TOKEN_TTL_SECS
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that expires the session immediately.
pub fn cleared_admin_cookie() -> String {
    format!("{}=; Path=/; Max-Age=0", ADMIN_COOKIE)
}

/// Finds the admin token among the request's `Cookie` headers.
pub fn admin_token(headers: &HeaderMap) -> Option<&str> {
    let prefix = format!("{}=", ADMIN_COOKIE);
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|c| c.trim().strip_prefix(prefix.as_str()))
}
