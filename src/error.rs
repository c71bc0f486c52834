use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use rinja::Template as _;

use crate::view;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("400 Bad Request")]
    BadRequest,

    #[error("404 Not Found")]
    NotFound,

    #[error(transparent)]
    Pool(#[from] deadpool::managed::PoolError<diesel_async::pooled_connection::PoolError>),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<diesel::result::Error> for Error {
    fn from(error: diesel::result::Error) -> Self {
        match error {
            diesel::result::Error::NotFound => Self::NotFound,
            error => Self::Internal(error.into()),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        use Error::*;

        let code = match self {
            BadRequest => StatusCode::BAD_REQUEST,
            NotFound => StatusCode::NOT_FOUND,
            Pool(ref inner) => {
                tracing::error!("database pool error: {inner}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Internal(ref inner) => {
                tracing::error!("internal server error: {inner}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = match code {
            StatusCode::NOT_FOUND => view::NotFound::default().render(),
            _ => view::ServerError {}.render(),
        }
        .unwrap_or_else(|_| self.to_string());

        (code, Html(body)).into_response()
    }
}
