use axum::{
    Form,
    extract::{Query, State},
    response::{Html, Response},
};

use super::{IdQuery, notify, render_view, save_response};
use crate::db::Client;
use crate::db::models::ClientForm;
use crate::error::AppError;
use crate::middleware::RenderMode;
use crate::router::AppState;
use crate::service::validation::validate_client;
use crate::service::{ListParams, ListQuery, SaveTarget};
use crate::templates::views::{ClientDetailsView, ClientFormView, ClientListView};

pub const CLIENTS_PATH: &str = "/clientes";

/// GET /clientes?pagina=&busca=&ordenar_por=&direcao=
pub async fn list_clients(
    State(state): State<AppState>,
    mode: RenderMode,
    Query(params): Query<ListParams>,
) -> Result<Html<String>, AppError> {
    let query = ListQuery::resolve::<Client>(&params);
    let page = state.clients.list(query).await?;
    let view = ClientListView {
        base: state.page_base(CLIENTS_PATH),
        page,
    };
    render_view(&state, mode, &view)
}

/// GET /clientes/novo
pub async fn new_client(
    State(state): State<AppState>,
    mode: RenderMode,
) -> Result<Html<String>, AppError> {
    let view = ClientFormView {
        base: state.page_base("/clientes/novo"),
        client: None,
        editing: false,
    };
    render_view(&state, mode, &view)
}

/// GET /clientes/editar?id=
pub async fn edit_client(
    State(state): State<AppState>,
    mode: RenderMode,
    Query(q): Query<IdQuery>,
) -> Result<Html<String>, AppError> {
    let client = state.clients.get(q.require()?).await?;
    let view = ClientFormView {
        base: state.page_base("/clientes/editar"),
        client: Some(client),
        editing: true,
    };
    render_view(&state, mode, &view)
}

/// POST /clientes/salvar: creates without an `id`, overwrites with one.
pub async fn save_client(
    State(state): State<AppState>,
    Form(form): Form<ClientForm>,
) -> Result<Response, AppError> {
    let target = SaveTarget::from_form_id(form.id.as_deref())
        .ok_or_else(|| AppError::BadRequest("Identificador de cliente inválido".into()))?;
    let input = match validate_client(form) {
        Ok(input) => input,
        Err(refusal) => return Ok(notify(&refusal)),
    };
    let outcome = match target {
        SaveTarget::Create => state.clients.create(input).await?,
        SaveTarget::Update(id) => state.clients.update(id, input).await?,
    };
    Ok(save_response(outcome, CLIENTS_PATH))
}

/// GET /clientes/detalhes?id=
pub async fn client_details(
    State(state): State<AppState>,
    mode: RenderMode,
    Query(q): Query<IdQuery>,
) -> Result<Html<String>, AppError> {
    let details = state.clients.details(q.require()?).await?;
    let view = ClientDetailsView::new(state.page_base("/clientes/detalhes"), details);
    render_view(&state, mode, &view)
}

/// POST /clientes/excluir?id=
pub async fn delete_client(
    State(state): State<AppState>,
    Query(q): Query<IdQuery>,
) -> Result<Response, AppError> {
    let outcome = state.clients.delete(q.require()?).await?;
    Ok(notify(&outcome))
}
