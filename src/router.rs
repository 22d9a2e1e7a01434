use axum::{
    Router,
    http::{HeaderValue, StatusCode, header},
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;

use crate::config::AppEnv;
use crate::db::SqlitePool;
use crate::handlers::{assets, clients, dev, home, properties};
use crate::middleware::log_request;
use crate::service::{ClientStore, PropertyStore};
use crate::templates::TemplateRegistry;
use crate::templates::views::PageBase;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const STATIC_CACHE_CONTROL: &str = "public, max-age=3600";

/// Everything a handler needs, passed explicitly instead of living in globals.
#[derive(Clone)]
pub struct AppState {
    pub env: AppEnv,
    pub pool: SqlitePool,
    pub templates: Arc<TemplateRegistry>,
    pub clients: ClientStore,
    pub properties: PropertyStore,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(
        env: AppEnv,
        pool: SqlitePool,
        templates: Arc<TemplateRegistry>,
        static_dir: PathBuf,
    ) -> Self {
        Self {
            env,
            clients: ClientStore::new(pool.clone()),
            properties: PropertyStore::new(pool.clone()),
            pool,
            templates,
            static_dir,
        }
    }

    pub fn page_base(&self, current_path: &str) -> PageBase {
        PageBase::new(self.env, current_path)
    }
}

/// `/static`: the configured directory in development, the bundled copy otherwise.
fn static_routes(state: &AppState) -> Router<AppState> {
    let routes = if state.env.is_development() {
        Router::new().nest_service("/static", ServeDir::new(&state.static_dir))
    } else {
        Router::new().route("/static/{*path}", get(assets::bundled_asset))
    };
    routes.layer(SetResponseHeaderLayer::if_not_present(
        header::CACHE_CONTROL,
        HeaderValue::from_static(STATIC_CACHE_CONTROL),
    ))
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::dashboard))
        .route("/health", get(home::health))
        // Clients
        .route("/clientes", get(clients::list_clients))
        .route("/clientes/novo", get(clients::new_client))
        .route("/clientes/editar", get(clients::edit_client))
        .route("/clientes/salvar", post(clients::save_client))
        .route("/clientes/detalhes", get(clients::client_details))
        .route("/clientes/excluir", post(clients::delete_client))
        // Properties
        .route("/propriedades", get(properties::list_properties))
        .route("/propriedades/novo", get(properties::new_property))
        .route("/propriedades/editar", get(properties::edit_property))
        .route("/propriedades/salvar", post(properties::save_property))
        .route("/propriedades/excluir", post(properties::delete_property))
        // Development
        .route("/reload-templates", get(dev::reload_templates))
        .merge(static_routes(&state))
        .layer(from_fn_with_state(state.clone(), log_request))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        .with_state(state)
}
