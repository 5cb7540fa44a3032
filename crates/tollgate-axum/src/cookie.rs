//! `Cookie` / `Set-Cookie` header handling.

use http::{header, HeaderMap, HeaderValue};
use tollgate_core::SetCookie;

/// Render a [`SetCookie`] as a `Set-Cookie` header value.
///
/// ```text
/// tkn=<token>; Path=/; Expires=Sat, 05 Jul 2025 09:00:00 GMT; HttpOnly; Secure
/// ```
pub fn build_set_cookie(cookie: &SetCookie) -> String {
    let mut out = format!(
        "{}={}; Path={}; Expires={}",
        cookie.name,
        cookie.value,
        cookie.path,
        cookie.expires_at.format("%a, %d %b %Y %H:%M:%S GMT"),
    );
    if cookie.is_removal() {
        out.push_str("; Max-Age=0");
    }
    if cookie.http_only {
        out.push_str("; HttpOnly");
    }
    if cookie.secure {
        out.push_str("; Secure");
    }
    out
}

const SEPARATORS: &[u8] = b"()<>@,;:\\\"/[]?={}";

/// Whether `name` is an RFC 6265 cookie name (an RFC 2616 token).
pub fn is_cookie_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_graphic() && !SEPARATORS.contains(&b))
}

/// Find a cookie by name across every `Cookie` header on the request.
pub fn find_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// Append one `Set-Cookie` header per cookie. Cookies that cannot be encoded
/// as a header value are dropped with a warning.
pub fn append_set_cookies(headers: &mut HeaderMap, cookies: &[SetCookie]) {
    for cookie in cookies {
        match HeaderValue::from_str(&build_set_cookie(cookie)) {
            Ok(value) => {
                headers.append(header::SET_COOKIE, value);
            }
            Err(_) => {
                tracing::warn!(name = %cookie.name, "Dropping unencodable Set-Cookie header");
            }
        }
    }
}
