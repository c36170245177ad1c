//! OpenAPI document for the job board API, served through Swagger UI.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::domain::{Job, Role, UserProfile};
use crate::handlers::jobs::{CreateJobRequest, JobPage, JobsResponse};
use crate::handlers::users::{
    CreateUserRequest, DeleteUserRequest, EditUserRequest, LoggedInUser, LoginRequest,
    LoginResponse, UsersResponse,
};
use crate::handlers::{ErrorBody, HealthStatus, MessageResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Job Board API",
        description = "API for job postings and user management"
    ),
    paths(
        crate::handlers::health,
        crate::handlers::users::create_user,
        crate::handlers::users::login_user,
        crate::handlers::users::edit_user,
        crate::handlers::users::delete_user,
        crate::handlers::users::get_all_users,
        crate::handlers::jobs::create_job,
        crate::handlers::jobs::list_jobs,
        crate::handlers::jobs::list_jobs_paged,
    ),
    components(
        schemas(
            HealthStatus,
            MessageResponse,
            ErrorBody,
            Role,
            UserProfile,
            CreateUserRequest,
            LoginRequest,
            LoginResponse,
            LoggedInUser,
            EditUserRequest,
            DeleteUserRequest,
            UsersResponse,
            Job,
            CreateJobRequest,
            JobsResponse,
            JobPage,
        )
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Users", description = "Accounts and login"),
        (name = "Jobs", description = "Job postings"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
