use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use monta_core::MontaError;

// ---------------------------------------------------------------------------
// Sentinels for explicit HTTP statuses
// ---------------------------------------------------------------------------

/// Private sentinel carrying an explicit 403 through the `anyhow::Error`
/// chain without touching the `MontaError` enum.
#[derive(Debug)]
struct ForbiddenError(String);

impl std::fmt::Display for ForbiddenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ForbiddenError {}

/// Private sentinel carrying an explicit 404.
#[derive(Debug)]
struct NotFoundError(String);

impl std::fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for NotFoundError {}

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self(ForbiddenError(msg.into()).into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self(NotFoundError(msg.into()).into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(f) = self.0.downcast_ref::<ForbiddenError>() {
            let body = serde_json::json!({ "error": f.0.clone() });
            return (StatusCode::FORBIDDEN, axum::Json(body)).into_response();
        }
        if let Some(n) = self.0.downcast_ref::<NotFoundError>() {
            let body = serde_json::json!({ "error": n.0.clone() });
            return (StatusCode::NOT_FOUND, axum::Json(body)).into_response();
        }

        let status = if let Some(e) = self.0.downcast_ref::<MontaError>() {
            match e {
                MontaError::OrderNotFound(_) => StatusCode::NOT_FOUND,
                MontaError::MissingSetting(_)
                | MontaError::InvalidSetting { .. }
                | MontaError::Mapping(_) => StatusCode::BAD_REQUEST,
                MontaError::Store(_)
                | MontaError::Io(_)
                | MontaError::Yaml(_)
                | MontaError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_not_found_maps_to_404() {
        let err = AppError(MontaError::OrderNotFound("BC1".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn mapping_error_maps_to_400() {
        let err = AppError(MontaError::Mapping("no reference".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_error_maps_to_500() {
        let err = AppError(MontaError::Store("disk full".into()).into());
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn forbidden_constructor_maps_to_403() {
        let err = AppError::forbidden("invalid webhook secret");
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn not_found_constructor_maps_to_404() {
        let err = AppError::not_found("order 'BC1' not found");
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
