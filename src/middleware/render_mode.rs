use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use std::convert::Infallible;

/// Header htmx sets on every request it issues.
pub const HX_REQUEST: &str = "hx-request";

/// Whether to render the whole page or only the inner fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Page,
    Fragment,
}

impl RenderMode {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let is_async = headers
            .get(HX_REQUEST)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"));
        if is_async {
            RenderMode::Fragment
        } else {
            RenderMode::Page
        }
    }
}

impl<S> FromRequestParts<S> for RenderMode
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}
