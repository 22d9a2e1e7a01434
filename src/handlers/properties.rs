use axum::{
    Form,
    extract::{Query, State},
    response::{Html, Response},
};
use serde::Deserialize;

use super::{IdQuery, notify, render_view, save_response};
use crate::db::PropertyRow;
use crate::db::models::PropertyForm;
use crate::error::AppError;
use crate::middleware::RenderMode;
use crate::router::AppState;
use crate::service::validation::validate_property;
use crate::service::{ListParams, ListQuery, SaveTarget};
use crate::templates::views::{ClientOption, PropertyFormView, PropertyListView};

pub const PROPERTIES_PATH: &str = "/propriedades";

#[derive(Debug, Default, Deserialize)]
pub struct NewPropertyQuery {
    pub cliente_id: Option<String>,
}

async fn client_options(state: &AppState) -> Result<Vec<ClientOption>, AppError> {
    Ok(state
        .clients
        .all_names()
        .await?
        .into_iter()
        .map(|(id, name)| ClientOption { id, name })
        .collect())
}

/// GET /propriedades?pagina=&busca=&ordenar_por=&direcao=
pub async fn list_properties(
    State(state): State<AppState>,
    mode: RenderMode,
    Query(params): Query<ListParams>,
) -> Result<Html<String>, AppError> {
    let query = ListQuery::resolve::<PropertyRow>(&params);
    let page = state.properties.list(query).await?;
    let view = PropertyListView {
        base: state.page_base(PROPERTIES_PATH),
        page,
    };
    render_view(&state, mode, &view)
}

/// GET /propriedades/novo?cliente_id=
pub async fn new_property(
    State(state): State<AppState>,
    mode: RenderMode,
    Query(q): Query<NewPropertyQuery>,
) -> Result<Html<String>, AppError> {
    let selected_client = q
        .cliente_id
        .as_deref()
        .and_then(|s| s.trim().parse::<i64>().ok());
    let view = PropertyFormView {
        base: state.page_base("/propriedades/novo"),
        property: None,
        clients: client_options(&state).await?,
        selected_client,
        editing: false,
    };
    render_view(&state, mode, &view)
}

/// GET /propriedades/editar?id=
pub async fn edit_property(
    State(state): State<AppState>,
    mode: RenderMode,
    Query(q): Query<IdQuery>,
) -> Result<Html<String>, AppError> {
    let property = state.properties.get(q.require()?).await?;
    let view = PropertyFormView {
        base: state.page_base("/propriedades/editar"),
        selected_client: Some(property.client_id),
        property: Some(property),
        clients: client_options(&state).await?,
        editing: true,
    };
    render_view(&state, mode, &view)
}

/// POST /propriedades/salvar
pub async fn save_property(
    State(state): State<AppState>,
    Form(form): Form<PropertyForm>,
) -> Result<Response, AppError> {
    let target = SaveTarget::from_form_id(form.id.as_deref())
        .ok_or_else(|| AppError::BadRequest("Identificador de propriedade inválido".into()))?;
    let input = match validate_property(form) {
        Ok(input) => input,
        Err(refusal) => return Ok(notify(&refusal)),
    };
    let outcome = match target {
        SaveTarget::Create => state.properties.create(input).await?,
        SaveTarget::Update(id) => state.properties.update(id, input).await?,
    };
    Ok(save_response(outcome, PROPERTIES_PATH))
}

/// POST /propriedades/excluir?id=
pub async fn delete_property(
    State(state): State<AppState>,
    Query(q): Query<IdQuery>,
) -> Result<Response, AppError> {
    let outcome = state.properties.delete(q.require()?).await?;
    Ok(notify(&outcome))
}
