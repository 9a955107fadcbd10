//! `RequestContext` over an HTTP request.
//!
//! # Responsibilities
//! - Decode query parameters
//! - Extract the host (Host header, else URI authority) without port
//! - Rebuild the URL the client used (`X-Forwarded-Proto` aware)
//! - Read the preference cookie, queue a `Set-Cookie` on write (`cookie` crate,
//!   percent-encoded both ways)
//!
//! # Design Decisions
//! - Built from `Parts` before the handler runs; the queued cookie is
//!   attached to the response by the middleware
//! - Host is lowercased; ports never count as labels

use std::time::Duration;

use axum::http::{
    header::{COOKIE, HOST},
    request::Parts,
    uri::Authority,
    HeaderValue,
};
use cookie::{Cookie, SameSite};
use url::Url;

use crate::config::CookieConfig;
use crate::versions::{PreferenceStore, RequestContext};

const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Per-request view of an HTTP exchange.
#[derive(Debug)]
pub struct HttpRequestContext {
    query: Vec<(String, String)>,
    host: Option<String>,
    url: String,
    stored: Option<String>,
    cookie: CookieConfig,
    set_cookie: Option<HeaderValue>,
}

impl HttpRequestContext {
    pub fn from_parts(parts: &Parts, cookie: &CookieConfig) -> Self {
        let query: Vec<(String, String)> = parts
            .uri
            .query()
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();

        let authority = parts
            .headers
            .get(HOST)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string)
            .or_else(|| parts.uri.authority().map(|a| a.to_string()));

        let host = authority
            .as_deref()
            .and_then(|a| a.parse::<Authority>().ok())
            .map(|a| a.host().to_ascii_lowercase());

        let scheme = parts
            .headers
            .get(X_FORWARDED_PROTO)
            .and_then(|h| h.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_ascii_lowercase())
            .filter(|v| !v.is_empty())
            .or_else(|| parts.uri.scheme_str().map(str::to_string))
            .unwrap_or_else(|| "http".to_string());

        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");

        let raw = format!(
            "{}://{}{}",
            scheme,
            authority.as_deref().unwrap_or("localhost"),
            path_and_query
        );
        let url = Url::parse(&raw).map(|u| u.to_string()).unwrap_or(raw);

        Self {
            query,
            host,
            url,
            stored: read_cookie(parts, &cookie.name),
            cookie: cookie.clone(),
            set_cookie: None,
        }
    }

    /// The `Set-Cookie` value queued by the last preference write.
    pub fn take_set_cookie(&mut self) -> Option<HeaderValue> {
        self.set_cookie.take()
    }
}

impl PreferenceStore for HttpRequestContext {
    fn load(&self) -> Option<String> {
        self.stored.clone()
    }

    fn store(&mut self, value: &str, max_age: Duration) {
        let max_age = i64::try_from(max_age.as_secs()).unwrap_or(i64::MAX);
        let mut builder = Cookie::build((self.cookie.name.clone(), value.to_string()))
            .max_age(cookie::time::Duration::seconds(max_age))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.cookie.secure);
        if let Some(domain) = &self.cookie.domain {
            builder = builder.domain(domain.clone());
        }

        let encoded = builder.build().encoded().to_string();
        match HeaderValue::from_str(&encoded) {
            Ok(header) => self.set_cookie = Some(header),
            Err(e) => {
                tracing::warn!(error = %e, cookie = %encoded, "Failed to build preference cookie");
                return;
            }
        }
        self.stored = Some(value.to_string());
    }
}

impl RequestContext for HttpRequestContext {
    fn query_param(&self, name: &str) -> Option<String> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }

    fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    fn url(&self) -> &str {
        &self.url
    }
}

fn read_cookie(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(Cookie::split_parse_encoded)
        .filter_map(Result::ok)
        .find(|c| c.name() == name)
        .map(|c| c.value_trimmed().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(req: Request<()>) -> Parts {
        req.into_parts().0
    }

    #[test]
    fn test_host_and_url() {
        let p = parts(
            Request::builder()
                .uri("/docs/intro?version=v2&x=%20y")
                .header("Host", "V2.Example.com:8080")
                .body(())
                .unwrap(),
        );
        let ctx = HttpRequestContext::from_parts(&p, &CookieConfig::default());

        assert_eq!(ctx.host(), Some("v2.example.com"));
        assert_eq!(ctx.url(), "http://v2.example.com:8080/docs/intro?version=v2&x=%20y");
        assert_eq!(ctx.query_param("version").as_deref(), Some("v2"));
        assert_eq!(ctx.query_param("x").as_deref(), Some(" y"));
    }

    #[test]
    fn test_forwarded_proto() {
        let p = parts(
            Request::builder()
                .uri("/")
                .header("Host", "example.com")
                .header("X-Forwarded-Proto", "HTTPS, http")
                .body(())
                .unwrap(),
        );
        let ctx = HttpRequestContext::from_parts(&p, &CookieConfig::default());
        assert_eq!(ctx.url(), "https://example.com/");
    }

    #[test]
    fn test_authority_fallback() {
        let p = parts(Request::builder().uri("https://beta.example.org/a").body(()).unwrap());
        let ctx = HttpRequestContext::from_parts(&p, &CookieConfig::default());
        assert_eq!(ctx.host(), Some("beta.example.org"));
        assert_eq!(ctx.url(), "https://beta.example.org/a");
    }

    #[test]
    fn test_reads_preference_cookie() {
        let p = parts(
            Request::builder()
                .uri("/")
                .header("Host", "example.com")
                .header("Cookie", "session=abc; version=\"Version2\"")
                .body(())
                .unwrap(),
        );
        let ctx = HttpRequestContext::from_parts(&p, &CookieConfig::default());
        assert_eq!(ctx.load().as_deref(), Some("Version2"));

        let config = CookieConfig {
            name: "site_version".into(),
            ..CookieConfig::default()
        };
        let ctx = HttpRequestContext::from_parts(&p, &config);
        assert_eq!(ctx.load(), None);
    }

    #[test]
    fn test_store_queues_set_cookie() {
        let p = parts(Request::builder().uri("/").header("Host", "example.com").body(()).unwrap());
        let config = CookieConfig {
            name: "version".into(),
            domain: Some(".example.com".into()),
            secure: true,
        };
        let mut ctx = HttpRequestContext::from_parts(&p, &config);

        ctx.store("Version2", Duration::from_secs(86_400));

        assert_eq!(ctx.load().as_deref(), Some("Version2"));
        let header = ctx.take_set_cookie().unwrap();
        let set = Cookie::parse_encoded(header.to_str().unwrap()).unwrap();
        assert_eq!(set.name(), "version");
        assert_eq!(set.value(), "Version2");
        assert_eq!(set.max_age(), Some(cookie::time::Duration::seconds(86_400)));
        assert_eq!(set.path(), Some("/"));
        assert_eq!(set.domain(), Some("example.com"));
        assert_eq!(set.http_only(), Some(true));
        assert_eq!(set.secure(), Some(true));
        assert_eq!(set.same_site(), Some(SameSite::Lax));
        assert!(ctx.take_set_cookie().is_none());
    }

    #[test]
    fn test_store_encodes_value() {
        let p = parts(Request::builder().uri("/").header("Host", "example.com").body(()).unwrap());
        let mut ctx = HttpRequestContext::from_parts(&p, &CookieConfig::default());

        ctx.store("Beta; Domain=evil.test", Duration::from_secs(60));

        let header = ctx.take_set_cookie().unwrap();
        let raw = header.to_str().unwrap();
        assert!(!raw.contains("Domain=evil.test"));
        let set = Cookie::parse_encoded(raw).unwrap();
        assert_eq!(set.value(), "Beta; Domain=evil.test");
        assert_eq!(set.domain(), None);
    }

    #[test]
    fn test_reads_percent_encoded_cookie() {
        let p = parts(
            Request::builder()
                .uri("/")
                .header("Host", "example.com")
                .header("Cookie", "a=1")
                .header("Cookie", "version=Release%202")
                .body(())
                .unwrap(),
        );
        let ctx = HttpRequestContext::from_parts(&p, &CookieConfig::default());
        assert_eq!(ctx.load().as_deref(), Some("Release 2"));
    }
}
