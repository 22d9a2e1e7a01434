//! HTTP handlers. Views render through [`render_view`]; mutations answer with
//! htmx response headers instead of a body.

pub mod assets;
pub mod clients;
pub mod dev;
pub mod home;
pub mod properties;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::error::AppError;
use crate::middleware::RenderMode;
use crate::router::AppState;
use crate::service::{Notification, SaveOutcome};
use crate::templates::views::View;

pub const HX_REDIRECT: HeaderName = HeaderName::from_static("hx-redirect");
pub const HX_TRIGGER: HeaderName = HeaderName::from_static("hx-trigger");

/// Client-side event fired by the notification header.
pub const TOAST_EVENT: &str = "showToast";

pub fn render_view<V: View>(
    state: &AppState,
    mode: RenderMode,
    view: &V,
) -> Result<Html<String>, AppError> {
    let name = match mode {
        RenderMode::Page => V::PAGE,
        RenderMode::Fragment => V::FRAGMENT,
    };
    Ok(Html(state.templates.render(name, view)?))
}

/// `200` with `HX-Redirect`, no body.
pub fn hx_redirect(location: &'static str) -> Response {
    (
        StatusCode::OK,
        [(HX_REDIRECT, HeaderValue::from_static(location))],
    )
        .into_response()
}

/// Toast via `HX-Trigger`: `200` for success, `400` for a refusal.
pub fn notify(notification: &Notification) -> Response {
    let status = if notification.is_success() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    let payload = ascii_json(&json!({ TOAST_EVENT: notification }));
    match HeaderValue::from_str(&payload) {
        Ok(value) => (status, [(HX_TRIGGER, value)]).into_response(),
        Err(e) => {
            warn!(error = %e, "notification not representable as a header");
            status.into_response()
        }
    }
}

pub fn save_response(outcome: SaveOutcome, list_path: &'static str) -> Response {
    match outcome {
        SaveOutcome::Created(_) | SaveOutcome::Updated => hx_redirect(list_path),
        SaveOutcome::Rejected(notification) => notify(&notification),
    }
}

/// JSON with every non-ASCII character escaped, so it is a valid header value.
pub fn ascii_json(value: &serde_json::Value) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len());
    let mut units = [0u16; 2];
    for c in raw.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    out
}

#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

impl IdQuery {
    pub fn require(&self) -> Result<i64, AppError> {
        let raw = self
            .id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::BadRequest("Parâmetro id obrigatório".into()))?;
        raw.parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| AppError::BadRequest(format!("Identificador inválido: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_json_is_pure_ascii() {
        let out = ascii_json(&json!({"m": "Cliente excluído 🌱"}));
        assert!(out.is_ascii());
        assert_eq!(out, r#"{"m":"Cliente exclu\u00eddo \ud83c\udf31"}"#);
        let back: serde_json::Value = serde_json::from_str(&out).expect("valid json");
        assert_eq!(back["m"], "Cliente excluído 🌱");
    }

    #[test]
    fn refusals_are_bad_requests_with_a_trigger() {
        let resp = notify(&Notification::error("Não é possível excluir"));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let header = resp.headers().get(HX_TRIGGER).expect("trigger header");
        let parsed: serde_json::Value =
            serde_json::from_str(header.to_str().expect("ascii")).expect("json");
        assert_eq!(parsed[TOAST_EVENT]["type"], "error");
        assert_eq!(parsed[TOAST_EVENT]["message"], "Não é possível excluir");
    }

    #[test]
    fn id_query_requires_a_positive_integer() {
        let q = |v: Option<&str>| IdQuery { id: v.map(String::from) };
        assert_eq!(q(Some("12")).require().expect("valid"), 12);
        assert!(q(None).require().is_err());
        assert!(q(Some("")).require().is_err());
        assert!(q(Some("0")).require().is_err());
        assert!(q(Some("1; DROP")).require().is_err());
    }
}
