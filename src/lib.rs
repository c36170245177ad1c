pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod services;
pub mod utils;
pub mod validation;

use std::sync::Arc;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Router,
};

use crate::config::Config;
use crate::db::{JobStore, UserStore};
use crate::handlers::{jobs, users};
use crate::middleware::{
    authenticate, cors_layer, request_logger_middleware, require_admin, require_authenticated,
    require_employee_or_admin, RequestLogSettings,
};
use crate::services::TokenService;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub jobs: Arc<dyn JobStore>,
    pub tokens: TokenService,
}

impl AppState {
    /// Uses one store for both users and jobs.
    pub fn new<S>(store: S, tokens: TokenService) -> Self
    where
        S: UserStore + JobStore + 'static,
    {
        let store = Arc::new(store);
        Self {
            users: store.clone(),
            jobs: store,
            tokens,
        }
    }
}

/// Routes with their guard chains. Inside each guarded group the stages run
/// outermost first: `authenticate`, then the role check, then the handler.
pub fn create_app(state: AppState) -> Router {
    let authenticated = from_fn_with_state(state.clone(), authenticate);

    let admin_users = Router::new()
        .route("/getAll", get(users::get_all_users))
        .route_layer(from_fn(require_admin));

    let member_users = Router::new()
        .route("/edit", put(users::edit_user))
        .route("/delete", delete(users::delete_user))
        .route_layer(from_fn(require_authenticated))
        .merge(admin_users)
        .route_layer(authenticated.clone());

    let user_routes = Router::new()
        .route("/create", post(users::create_user))
        .route("/login", post(users::login_user))
        .merge(member_users);

    let admin_jobs = Router::new()
        .route("/create", post(jobs::create_job))
        .route_layer(from_fn(require_admin));

    let staff_jobs = Router::new()
        .route("/jobs", get(jobs::list_jobs))
        .route_layer(from_fn(require_employee_or_admin));

    let member_jobs = Router::new()
        .route("/test-jobs", get(jobs::list_jobs_paged))
        .route_layer(from_fn(require_authenticated));

    let job_routes = Router::new()
        .merge(member_jobs)
        .merge(admin_jobs)
        .merge(staff_jobs)
        .route_layer(authenticated);

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/user", user_routes)
        .nest("/job", job_routes)
        .merge(openapi::swagger_ui())
        .with_state(state)
}

/// [`create_app`] plus the outer layers configured from the environment.
pub fn create_app_with_config(state: AppState, config: &Config) -> Router {
    create_app(state)
        .layer(from_fn_with_state(
            RequestLogSettings {
                log_body: config.log_request_body,
            },
            request_logger_middleware,
        ))
        .layer(cors_layer(&config.allowed_origins))
}
