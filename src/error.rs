use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum TemplateError {
    #[error("template root not found: {0}")]
    MissingRoot(String),

    #[error("failed to read template {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse template {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: minijinja::Error,
    },

    #[error("template render error: {0}")]
    Render(#[from] minijinja::Error),
}

#[derive(Debug, ThisError)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Forbidden(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Database(SqlxError::RowNotFound) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Generic body for server errors when the real cause must not leak.
pub const INTERNAL_ERROR_MESSAGE: &str = "Erro interno do servidor";

/// Underlying error text attached to 5xx responses.
/// The request-log middleware logs it and, in development, swaps it into the body.
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            let mut resp = (status, INTERNAL_ERROR_MESSAGE).into_response();
            resp.extensions_mut().insert(ErrorDetail(self.to_string()));
            resp
        } else {
            (status, self.to_string()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_keep_their_message() {
        let resp = AppError::NotFound("Cliente não encontrado".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(resp.extensions().get::<ErrorDetail>().is_none());
    }

    #[test]
    fn server_errors_carry_detail_out_of_band() {
        let err = AppError::Template(TemplateError::MissingRoot("/nowhere".into()));
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = resp
            .extensions()
            .get::<ErrorDetail>()
            .expect("detail attached");
        assert!(detail.0.contains("/nowhere"));
    }

    #[test]
    fn missing_rows_map_to_not_found() {
        assert_eq!(
            AppError::Database(SqlxError::RowNotFound).status(),
            StatusCode::NOT_FOUND
        );
    }
}
