use crate::models::CounterError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ApiError {
    InvalidOperation(CounterError),
    BadRequest(anyhow::Error),
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::InvalidOperation(error) => write!(f, "{error}"),
            ApiError::BadRequest(error) => write!(f, "{error}"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        tracing::warn!("{}", message);
        let status = match &self {
            ApiError::InvalidOperation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        (status, message).into_response()
    }
}

impl From<CounterError> for ApiError {
    fn from(value: CounterError) -> Self {
        Self::InvalidOperation(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status() {
        let response = ApiError::from(CounterError::Negative).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let response = ApiError::BadRequest(anyhow::anyhow!("missing value")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_message() {
        assert_eq!(
            ApiError::from(CounterError::Negative).to_string(),
            "counter cannot be negative"
        );
        assert_eq!(
            ApiError::BadRequest(anyhow::anyhow!("missing field `value`")).to_string(),
            "missing field `value`"
        );
    }
}
