//! API Handlers
//!
//! HTTP request handlers. Every catalog request goes through the memoized
//! accessors held in [`AppState`].

use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::config::Config;
use crate::error::{PortalError, Result};
use crate::memo::{MemoRegistry, Memoized};
use crate::models::{HealthResponse, StatsResponse};
use crate::portal::{build_catalog, load_settings, CatalogView, PortalSettings, SectionView};

type SettingsFn = Memoized<FsPath, Arc<PortalSettings>, PortalError>;
type CatalogFn = Memoized<FsPath, Arc<CatalogView>, PortalError>;

/// Application state shared across all handlers.
///
/// Each accessor owns its own memo store; all of them are registered with
/// `registry` so the sweeper can reclaim their expired entries.
#[derive(Clone)]
pub struct AppState {
    /// Stores visited by the sweeper
    pub registry: MemoRegistry,
    /// Portal YAML document
    pub config_path: Arc<PathBuf>,
    /// Memoized configuration loader
    pub settings: Arc<SettingsFn>,
    /// Memoized full catalog view; department pages read from it too
    pub catalog: Arc<CatalogFn>,
}

impl AppState {
    /// Builds the memoized accessors for the document at `config_path`.
    pub fn new(config_path: impl Into<PathBuf>, settings_ttl: Duration, catalog_ttl: Duration) -> Self {
        let registry = MemoRegistry::new();
        let config_path = Arc::new(config_path.into());

        let settings: Arc<SettingsFn> = Arc::new(Memoized::new(
            &registry,
            "load_settings",
            settings_ttl,
            |path: &FsPath| load_settings(path).map(Arc::new),
        ));

        let catalog: Arc<CatalogFn> = {
            let settings = settings.clone();
            Arc::new(Memoized::new(
                &registry,
                "build_catalog",
                catalog_ttl,
                move |path: &FsPath| {
                    let settings = settings.call(path)?;
                    Ok(Arc::new(build_catalog(&settings)))
                },
            ))
        };

        Self {
            registry,
            config_path,
            settings,
            catalog,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.config_path.clone(),
            config.settings_ttl(),
            config.catalog_ttl(),
        )
    }
}

/// Runs a memoized accessor off the async workers; a miss reads the
/// configuration file from disk.
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| PortalError::Internal(format!("catalog task failed: {}", e)))?
}

/// Handler for GET /api/catalog
///
/// Returns every department section plus navigation and header data.
pub async fn catalog_handler(State(state): State<AppState>) -> Result<Json<Arc<CatalogView>>> {
    let catalog = run_blocking(move || state.catalog.call(state.config_path.as_path())).await?;
    Ok(Json(catalog))
}

/// Handler for GET /api/departments/:slug
///
/// Returns the cards of a single section, 404 when the slug is unknown.
/// Sections are cut from the memoized catalog so both endpoints refresh
/// together.
pub async fn department_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<SectionView>> {
    let catalog = run_blocking(move || state.catalog.call(state.config_path.as_path())).await?;
    catalog
        .section(&slug)
        .cloned()
        .map(Json)
        .ok_or_else(|| PortalError::NotFound(format!("department '{}'", slug)))
}

/// Handler for GET /stats
///
/// Returns per-function memo statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(state.registry.snapshot()))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
