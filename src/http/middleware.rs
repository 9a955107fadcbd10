//! Version resolution middleware.
//!
//! Resolves the version before the handler runs and attaches it to the
//! request. A preference written during resolution leaves as `Set-Cookie`
//! on the response.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::SET_COOKIE, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::CookieConfig;
use crate::http::context::HttpRequestContext;
use crate::versions::{resolve, CatalogHandle, RequestContext, VersionCatalog};

/// State required by [`version_middleware`].
#[derive(Clone)]
pub struct VersionState {
    pub catalogs: Arc<CatalogHandle>,
    pub cookie: Arc<CookieConfig>,
}

/// URL of the request as the client sent it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUrl(pub String);

/// Catalog snapshot the request was resolved against.
#[derive(Clone, Debug)]
pub struct ActiveCatalog(pub Arc<VersionCatalog>);

pub async fn version_middleware(
    State(state): State<VersionState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let catalog = match state.catalogs.catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!(error = %e, "Request received before versions were configured");
            return (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response();
        }
    };

    let (mut parts, body) = req.into_parts();
    let mut ctx = HttpRequestContext::from_parts(&parts, &state.cookie);
    let resolved = resolve(&catalog, &mut ctx);

    parts.extensions.insert(CurrentUrl(ctx.url().to_string()));
    parts.extensions.insert(ActiveCatalog(catalog));
    parts.extensions.insert(resolved);

    let set_cookie = ctx.take_set_cookie();
    let mut response = next.run(Request::from_parts(parts, body)).await;
    if let Some(cookie) = set_cookie {
        response.headers_mut().append(SET_COOKIE, cookie);
    }
    response
}
