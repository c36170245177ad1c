pub mod auth;
pub mod cors;
pub mod request_logger;

pub use auth::{
    authenticate, require_admin, require_authenticated, require_employee_or_admin, AuthError,
};
pub use cors::cors_layer;
pub use request_logger::{request_logger_middleware, RequestLogSettings};
