use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Identity, Role, UserProfile};
use crate::error::AppError;
use crate::extract::Json;
use crate::handlers::MessageResponse;
use crate::services::accounts::{self, Registration};
use crate::AppState;

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[schema(example = "Jane Doe")]
    pub full_name: String,
    #[schema(example = "jane.doe@gmail.com")]
    pub email: String,
    #[schema(example = "P@ssw0rd123!")]
    pub password: String,
    /// `admin` or `employee`
    #[serde(rename = "type")]
    #[schema(example = "employee")]
    pub user_type: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub user: LoggedInUser,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoggedInUser {
    pub full_name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub role: Role,
    pub token: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct EditUserRequest {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct DeleteUserRequest {
    pub email: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UsersResponse {
    pub users: Vec<UserProfile>,
}

fn required_email(email: Option<String>, message: &str) -> Result<String, AppError> {
    email
        .filter(|email| !email.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest(message.to_string()))
}

#[utoipa::path(
    post,
    path = "/user/create",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = MessageResponse),
        (status = 400, description = "Validation failed", body = crate::handlers::ErrorBody)
    ),
    tag = "Users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    accounts::register(
        state.users.as_ref(),
        Registration {
            full_name: payload.full_name,
            email: payload.email,
            password: payload.password,
            user_type: payload.user_type,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User created successfully.")),
    ))
}

#[utoipa::path(
    post,
    path = "/user/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid email or password", body = crate::handlers::ErrorBody)
    ),
    tag = "Users"
)]
pub async fn login_user(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user =
        accounts::check_credentials(state.users.as_ref(), &payload.email, &payload.password)
            .await?;
    let token = state.tokens.issue(&user.id, user.role)?;

    tracing::info!(user_id = %user.id, role = %user.role, "Login successful");
    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        user: LoggedInUser {
            full_name: user.full_name,
            email: user.email,
            role: user.role,
            token,
        },
    }))
}

#[utoipa::path(
    put,
    path = "/user/edit",
    request_body = EditUserRequest,
    responses(
        (status = 200, description = "User updated", body = MessageResponse),
        (status = 400, description = "Validation failed", body = crate::handlers::ErrorBody),
        (status = 401, description = "Not authenticated", body = crate::handlers::ErrorBody),
        (status = 404, description = "User not found", body = crate::handlers::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn edit_user(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    Json(payload): Json<EditUserRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let email = required_email(payload.email, "Email is required to update user.")?;

    if state.users.find_user_by_email(&email).await?.is_none() {
        return Err(AppError::NotFound("User not found.".to_string()));
    }

    let update = accounts::prepare_update(payload.full_name, payload.password).await?;
    if !update.is_empty() {
        state
            .users
            .update_user(&email, update)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;
    }

    tracing::info!(caller = %caller.email, target = %email, "User updated");
    Ok(Json(MessageResponse::new("User updated successfully.")))
}

#[utoipa::path(
    delete,
    path = "/user/delete",
    request_body = DeleteUserRequest,
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Email missing", body = crate::handlers::ErrorBody),
        (status = 401, description = "Not authenticated", body = crate::handlers::ErrorBody),
        (status = 404, description = "User not found", body = crate::handlers::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    Json(payload): Json<DeleteUserRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let email = required_email(payload.email, "Email is required to delete user.")?;

    if !state.users.delete_user(&email).await? {
        return Err(AppError::NotFound("User not found.".to_string()));
    }

    tracing::info!(caller = %caller.email, target = %email, "User deleted");
    Ok(Json(MessageResponse::new("User deleted successfully.")))
}

#[utoipa::path(
    get,
    path = "/user/getAll",
    responses(
        (status = 200, description = "All users, without password hashes", body = UsersResponse),
        (status = 401, description = "Not authenticated", body = crate::handlers::ErrorBody),
        (status = 403, description = "Caller is not an admin", body = crate::handlers::ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn get_all_users(
    State(state): State<AppState>,
) -> Result<Json<UsersResponse>, AppError> {
    let users = state
        .users
        .list_users()
        .await?
        .into_iter()
        .map(UserProfile::from)
        .collect();

    Ok(Json(UsersResponse { users }))
}
