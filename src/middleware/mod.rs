pub mod render_mode;
pub mod request_log;

pub use render_mode::RenderMode;
pub use request_log::log_request;
