//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID, version resolution)
//! - Publish reloaded catalogs while serving
//! - Bind server to listener with graceful shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::http::middleware::{version_middleware, ActiveCatalog, CurrentUrl, VersionState};
use crate::versions::{
    switcher, AddressingMode, CatalogHandle, ResolutionSource, ResolvedVersion, SwitcherEntry,
    VersionCatalog, VersionDescriptor,
};

/// Body of every page response.
#[derive(Debug, Serialize)]
pub struct PageView {
    pub version: String,
    pub source: ResolutionSource,
    pub url: String,
    pub switcher: Vec<SwitcherEntry>,
}

/// Body of `GET /_versions`.
#[derive(Debug, Serialize)]
pub struct CatalogView {
    pub addressing_mode: AddressingMode,
    pub persist_preference: bool,
    pub default: String,
    pub versions: Vec<VersionDescriptor>,
}

/// HTTP server exposing the resolved version and switch links.
pub struct HttpServer {
    router: Router,
    catalogs: Arc<CatalogHandle>,
}

impl HttpServer {
    /// Create a new HTTP server. `catalogs` may still be empty; requests
    /// are answered with 503 until a catalog is published.
    pub fn new(config: AppConfig, catalogs: Arc<CatalogHandle>) -> Self {
        let state = VersionState {
            catalogs: catalogs.clone(),
            cookie: Arc::new(config.cookie.clone()),
        };

        let router = Self::build_router(&config, state);
        Self { router, catalogs }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: VersionState) -> Router {
        Router::new()
            .route("/_versions", get(catalog_handler))
            .route("/", get(page_handler))
            .route("/{*path}", get(page_handler))
            .layer(middleware::from_fn_with_state(state, version_middleware))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` fires.
    ///
    /// Catalogs received on `catalog_updates` replace the published one.
    pub async fn run(
        self,
        listener: TcpListener,
        mut catalog_updates: mpsc::UnboundedReceiver<VersionCatalog>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let catalogs = self.catalogs.clone();
        tokio::spawn(async move {
            while let Some(catalog) = catalog_updates.recv().await {
                catalogs.publish(catalog);
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn page_handler(
    Extension(resolved): Extension<ResolvedVersion>,
    Extension(CurrentUrl(url)): Extension<CurrentUrl>,
    Extension(ActiveCatalog(catalog)): Extension<ActiveCatalog>,
) -> Response {
    match switcher::entries(&catalog, &resolved, &url) {
        Ok(entries) => Json(PageView {
            version: resolved.name,
            source: resolved.source,
            url,
            switcher: entries,
        })
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, url = %url, "Failed to build version switcher");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn catalog_handler(Extension(ActiveCatalog(catalog)): Extension<ActiveCatalog>) -> Json<CatalogView> {
    Json(CatalogView {
        addressing_mode: catalog.addressing_mode(),
        persist_preference: catalog.persist_preference(),
        default: catalog.default_descriptor().name.clone(),
        versions: catalog.descriptors().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn server(mode: AddressingMode) -> HttpServer {
        server_with(mode, false)
    }

    fn server_with(mode: AddressingMode, persist: bool) -> HttpServer {
        let catalog = VersionCatalog::build(
            vec![
                VersionDescriptor::new("v1", "Version1", "Version 1", true),
                VersionDescriptor::new("v2", "Version2", "Version 2", false),
            ],
            persist,
            mode,
        )
        .unwrap();
        HttpServer::new(AppConfig::default(), Arc::new(CatalogHandle::with_catalog(catalog)))
    }

    async fn get_json(server: &HttpServer, uri: &str, host: &str) -> Value {
        get_json_with_cookie(server, uri, host, None).await.0
    }

    async fn get_json_with_cookie(
        server: &HttpServer,
        uri: &str,
        host: &str,
        cookie: Option<&str>,
    ) -> (Value, Option<String>) {
        let mut request = Request::builder().uri(uri).header("Host", host);
        if let Some(cookie) = cookie {
            request = request.header("Cookie", cookie);
        }
        let response = server
            .router()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        let set_cookie = response
            .headers()
            .get("set-cookie")
            .map(|h| h.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (serde_json::from_slice(&bytes).unwrap(), set_cookie)
    }

    #[tokio::test]
    async fn test_page_in_subdomain_mode() {
        let server = server(AddressingMode::SubDomain);
        let page = get_json(&server, "/guide", "v2.example.com").await;

        assert_eq!(page["version"], "Version2");
        assert_eq!(page["source"], "explicit");
        assert_eq!(page["switcher"][0]["is_current"], false);
        assert_eq!(page["switcher"][0]["switch_url"], "http://example.com/guide");
        assert_eq!(page["switcher"][1]["is_current"], true);
        assert_eq!(page["switcher"][1]["switch_url"], "http://v2.example.com/guide");
    }

    #[tokio::test]
    async fn test_page_in_query_mode() {
        let server = server(AddressingMode::QueryParam);
        let page = get_json(&server, "/?version=nope", "example.com").await;

        assert_eq!(page["version"], "Version1");
        assert_eq!(page["source"], "default");
        assert_eq!(page["switcher"][1]["switch_url"], "?version=v2");
    }

    #[tokio::test]
    async fn test_catalog_endpoint() {
        let server = server(AddressingMode::QueryParam);
        let view = get_json(&server, "/_versions", "example.com").await;

        assert_eq!(view["addressing_mode"], "query_param");
        assert_eq!(view["default"], "Version1");
        assert_eq!(view["versions"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_subdomain_preference_is_host_only() {
        let server = server_with(AddressingMode::SubDomain, true);

        let (page, set_cookie) = get_json_with_cookie(&server, "/guide", "v2.example.com", None).await;
        assert_eq!(page["version"], "Version2");
        let set = cookie::Cookie::parse_encoded(set_cookie.unwrap()).unwrap();
        assert_eq!(set.domain(), None);

        // A browser never sends that host-only cookie to the bare host.
        let (page, _) = get_json_with_cookie(&server, "/guide", "example.com", None).await;
        assert_eq!(page["version"], "Version1");
        assert_eq!(page["source"], "default");
    }

    #[tokio::test]
    async fn test_shared_subdomain_preference_pins_bare_host() {
        let server = server_with(AddressingMode::SubDomain, true);

        // What a cookie with `Domain=example.com` would deliver to the bare host:
        // the default version's own switch link lands back on the stored choice.
        let (page, set_cookie) =
            get_json_with_cookie(&server, "/guide", "example.com", Some("version=Version2")).await;
        assert_eq!(page["version"], "Version2");
        assert_eq!(page["source"], "preference");
        assert_eq!(page["switcher"][0]["switch_url"], "http://example.com/guide");
        assert_eq!(page["switcher"][0]["switch_url"], page["url"]);
        assert!(set_cookie.is_none());
    }
}
