use axum::extract::State;

use crate::error::AppError;
use crate::router::AppState;

/// GET /reload-templates: rebuild the template set from disk (development only).
pub async fn reload_templates(State(state): State<AppState>) -> Result<String, AppError> {
    if !state.env.is_development() {
        return Err(AppError::Forbidden(
            "Recarregamento de templates disponível apenas em desenvolvimento".into(),
        ));
    }
    let count = state.templates.reload()?;
    Ok(format!("{count} templates recarregados"))
}
