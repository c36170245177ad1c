use axum::{
    extract::FromRequest,
    response::{IntoResponse, Response},
};

use crate::error::AppError;

/// `axum::Json` whose rejections are answered as [`AppError`], so a missing or
/// malformed body still gets an `{"error": ...}` body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

impl<T> IntoResponse for Json<T>
where
    axum::Json<T>: IntoResponse,
{
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}
