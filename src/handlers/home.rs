use axum::{extract::State, response::Html};

use super::render_view;
use crate::db::sqlite::table_counts;
use crate::error::AppError;
use crate::middleware::RenderMode;
use crate::router::AppState;
use crate::templates::views::DashboardView;

const RECENT_CLIENTS: i64 = 5;

/// GET /
pub async fn dashboard(
    State(state): State<AppState>,
    mode: RenderMode,
) -> Result<Html<String>, AppError> {
    let counts = table_counts(&state.pool).await?;
    let recent_clients = state.clients.recent(RECENT_CLIENTS).await?;
    let view = DashboardView {
        base: state.page_base("/"),
        counts: counts.into(),
        recent_clients,
    };
    render_view(&state, mode, &view)
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}
