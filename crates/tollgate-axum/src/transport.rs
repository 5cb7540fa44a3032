//! [`TokenTransport`] over `http` request parts.

use axum::extract::Query;
use axum::http::{HeaderMap, Request, Uri};
use serde::Deserialize;
use tollgate_core::{SetCookie, TokenTransport};

use crate::cookie::{find_cookie, is_cookie_name};

/// Header carrying the cookie-name override (`tknAppName`, matched
/// case-insensitively)
pub const TOKEN_NAME_HEADER: &str = "tknappname";

#[derive(Debug, Deserialize)]
struct TokenNameQuery {
    #[serde(rename = "tknAppName")]
    tkn_app_name: Option<String>,
}

/// One HTTP exchange: borrowed request data plus the cookies to emit.
///
/// The query parameter wins over the header when both name a cookie. A value
/// that is not a valid cookie name is ignored.
#[derive(Debug)]
pub struct HttpExchange<'a> {
    uri: &'a Uri,
    headers: &'a HeaderMap,
    token_name: Option<String>,
    set_cookies: Vec<SetCookie>,
}

impl<'a> HttpExchange<'a> {
    pub fn new(uri: &'a Uri, headers: &'a HeaderMap) -> Self {
        let from_query = Query::<TokenNameQuery>::try_from_uri(uri)
            .ok()
            .and_then(|Query(q)| q.tkn_app_name);
        let from_header = || {
            headers
                .get(TOKEN_NAME_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        };

        Self {
            uri,
            headers,
            token_name: from_query
                .filter(|n| is_cookie_name(n))
                .or_else(|| from_header().filter(|n| is_cookie_name(n))),
            set_cookies: Vec::new(),
        }
    }

    pub fn from_request<B>(req: &'a Request<B>) -> Self {
        Self::new(req.uri(), req.headers())
    }

    /// Cookies written during this exchange, in order.
    pub fn into_set_cookies(self) -> Vec<SetCookie> {
        self.set_cookies
    }
}

impl TokenTransport for HttpExchange<'_> {
    fn path(&self) -> &str {
        self.uri.path()
    }

    fn token_name_override(&self) -> Option<&str> {
        self.token_name.as_deref()
    }

    fn read_cookie(&self, name: &str) -> Option<&str> {
        find_cookie(self.headers, name)
    }

    fn write_set_cookie(&mut self, cookie: SetCookie) {
        self.set_cookies.push(cookie);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderName, HeaderValue};

    #[test]
    fn test_path_and_cookie() {
        let uri: Uri = "/api/profile?x=1".parse().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("tkn=abc"));

        let exchange = HttpExchange::new(&uri, &headers);
        assert_eq!(exchange.path(), "/api/profile");
        assert_eq!(exchange.read_cookie("tkn"), Some("abc"));
        assert_eq!(exchange.token_name_override(), None);
    }

    #[test]
    fn test_token_name_from_query_then_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_bytes(b"tknAppName").unwrap(),
            HeaderValue::from_static("from_header"),
        );

        let uri: Uri = "/api?tknAppName=from_query".parse().unwrap();
        assert_eq!(
            HttpExchange::new(&uri, &headers).token_name_override(),
            Some("from_query")
        );

        let uri: Uri = "/api".parse().unwrap();
        assert_eq!(
            HttpExchange::new(&uri, &headers).token_name_override(),
            Some("from_header")
        );

        // An empty parameter falls through to the header.
        let uri: Uri = "/api?tknAppName=".parse().unwrap();
        assert_eq!(
            HttpExchange::new(&uri, &headers).token_name_override(),
            Some("from_header")
        );
        assert_eq!(
            HttpExchange::new(&uri, &HeaderMap::new()).token_name_override(),
            None
        );
    }

    #[test]
    fn test_token_name_must_be_cookie_token() {
        let uri: Uri = "/api?tknAppName=x%3BDomain%3Devil.example".parse().unwrap();
        assert_eq!(
            HttpExchange::new(&uri, &HeaderMap::new()).token_name_override(),
            None
        );

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(TOKEN_NAME_HEADER),
            HeaderValue::from_static("x; Max-Age=999999"),
        );
        let uri: Uri = "/api".parse().unwrap();
        assert_eq!(HttpExchange::new(&uri, &headers).token_name_override(), None);

        // A bad query value still lets a valid header through.
        headers.insert(
            HeaderName::from_static(TOKEN_NAME_HEADER),
            HeaderValue::from_static("mobile"),
        );
        let uri: Uri = "/api?tknAppName=a%3Db".parse().unwrap();
        assert_eq!(
            HttpExchange::new(&uri, &headers).token_name_override(),
            Some("mobile")
        );
    }
}
