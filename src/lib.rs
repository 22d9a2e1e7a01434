pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod service;
pub mod templates;

pub use error::{AppError, TemplateError};
pub use router::{AppState, app_router};
pub use templates::TemplateRegistry;
