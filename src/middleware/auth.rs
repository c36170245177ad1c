//! Authentication and authorization stages applied in front of guarded routes.
//!
//! A guarded route is wrapped as `authenticate -> require_* -> handler`. Each
//! stage either forwards the request or answers it, so the first rejection
//! ends the request:
//!
//! * [`authenticate`] verifies the bearer token, loads the subject from the
//!   user store and inserts the resolved [`Identity`] into the request
//!   extensions.
//! * [`require_authenticated`] / [`require_admin`] / [`require_employee_or_admin`]
//!   check that identity against a [`RolePolicy`]. They must be layered inside
//!   `authenticate`.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::db::UserStore;
use crate::domain::{Identity, RolePolicy};
use crate::error::AppError;
use crate::services::{TokenError, TokenService};
use crate::AppState;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Please authenticate")]
    MissingCredential,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired, please login again")]
    Expired,

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("{}", .0.denial_message())]
    InsufficientRole(RolePolicy),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InsufficientRole(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::MissingCredential => AuthError::MissingCredential,
            TokenError::InvalidToken => AuthError::InvalidToken,
            TokenError::Expired => AuthError::Expired,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

/// Resolves the caller named by the `Authorization` header.
///
/// Token problems are rejected before the store is touched. A verified token
/// whose subject no longer exists yields `AuthenticationFailed`; a store
/// failure propagates as [`AppError::Store`].
pub async fn resolve_identity(
    tokens: &TokenService,
    users: &dyn UserStore,
    headers: &HeaderMap,
) -> Result<Identity, AppError> {
    let raw = match headers.get(AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| AuthError::InvalidToken)?),
        None => None,
    };

    let claims = tokens.verify(raw).map_err(|e| {
        match &e {
            TokenError::MissingCredential => tracing::debug!("No Authorization header found"),
            other => tracing::warn!(reason = %other, "Rejected bearer token"),
        }
        AuthError::from(e)
    })?;

    let user = users.find_user_by_id(&claims.id).await?.ok_or_else(|| {
        tracing::warn!(user_id = %claims.id, "Token subject not found");
        AuthError::AuthenticationFailed
    })?;

    tracing::debug!(email = %user.email, role = %user.role, "User authenticated");
    Ok(Identity::from(&user))
}

/// Checks an authenticated identity against a route policy.
pub fn authorize(identity: &Identity, policy: RolePolicy) -> Result<(), AuthError> {
    if policy.permits(identity.role) {
        return Ok(());
    }

    tracing::info!(
        email = %identity.email,
        role = %identity.role,
        required = ?policy,
        "Access denied"
    );
    Err(AuthError::InsufficientRole(policy))
}

pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = resolve_identity(&state.tokens, state.users.as_ref(), req.headers()).await?;
    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

pub async fn require_authenticated(req: Request, next: Next) -> Result<Response, AppError> {
    require_policy(RolePolicy::Authenticated, req, next).await
}

pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    require_policy(RolePolicy::AdminOnly, req, next).await
}

pub async fn require_employee_or_admin(req: Request, next: Next) -> Result<Response, AppError> {
    require_policy(RolePolicy::EmployeeOrAdmin, req, next).await
}

async fn require_policy(
    policy: RolePolicy,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(identity) = req.extensions().get::<Identity>() else {
        tracing::error!(required = ?policy, "Authorization stage reached without an identity");
        return Err(AppError::Internal(
            "authorization layered outside authentication".to_string(),
        ));
    };

    authorize(identity, policy)?;
    Ok(next.run(req).await)
}
