//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with one route per logical page
//! - Wire up middleware (request ID, tracing, timeout, cache headers)
//! - Own the shared state: page controller, caches, collaborator client
//! - Bind server to listener and drain on shutdown

use axum::{
    extract::State,
    http::{header::CACHE_CONTROL, HeaderMap, HeaderValue},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{KitConfig, ResolvedPaths};
use crate::http::request::MakeRequestUuidV4;
use crate::lifecycle::reload::ReloadWatcher;
use crate::maps::{handlers::map_cards, MapsClient, MapsError};
use crate::pages::{handlers::{health, serve_page}, Page, PageController};
use crate::render::{HeadScriptCache, TemplateComposer};
use crate::secret::SecretConfigReader;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub pages: Arc<PageController>,
    pub maps: Option<Arc<MapsClient>>,
}

impl AppState {
    /// Build every component from the configuration and the resolved layout.
    pub fn new(config: &KitConfig, paths: &ResolvedPaths) -> Result<Self, MapsError> {
        let composer = TemplateComposer::new(&paths.views_dir);
        let head_scripts = Arc::new(HeadScriptCache::new(paths.head_scripts_dir()));
        let secrets = Arc::new(SecretConfigReader::new(&paths.secret_file, config.secret.memoize));

        let maps = match &config.maps.api_base_url {
            Some(url) => Some(Arc::new(MapsClient::new(
                url,
                Duration::from_secs(config.maps.timeout_secs),
            )?)),
            None => None,
        };

        Ok(Self {
            pages: Arc::new(PageController::new(composer, head_scripts, secrets)),
            maps,
        })
    }
}

/// HTTP server for the starter kit pages.
pub struct HttpServer {
    router: Router,
    config: KitConfig,
    paths: ResolvedPaths,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: KitConfig, paths: ResolvedPaths) -> Result<Self, MapsError> {
        let state = AppState::new(&config, &paths)?;
        let router = Self::build_router(&config, state.clone());
        Ok(Self {
            router,
            config,
            paths,
            state,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &KitConfig, state: AppState) -> Router {
        let mut router = Router::new();
        for page in Page::ALL {
            router = router.route(
                page.route(),
                get(move |State(state): State<AppState>, headers: HeaderMap| {
                    serve_page(state, page, headers)
                }),
            );
        }

        router
            .route("/maps/cards", get(map_cards))
            .route("/health", get(health))
            .with_state(state)
            .layer(SetResponseHeaderLayer::if_not_present(
                CACHE_CONTROL,
                HeaderValue::from_static("no-cache, no-store, must-revalidate"),
            ))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &KitConfig {
        &self.config
    }

    /// Run the server until a shutdown signal is broadcast.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            views_dir = %self.paths.views_dir.display(),
            "HTTP server starting"
        );

        // Held for the lifetime of the server; dropping it stops watching.
        let _watcher = if self.config.views.watch {
            let watcher = ReloadWatcher::new(
                &self.paths,
                self.state.pages.head_scripts().clone(),
                self.state.pages.secrets().clone(),
            );
            match watcher.run() {
                Ok(w) => Some(w),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to start views watcher; caches will not reload");
                    None
                }
            }
        } else {
            None
        };

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
