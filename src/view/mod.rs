mod auth;
mod error;
mod follow;
mod post;

pub use auth::*;
pub use error::*;
pub use follow::*;
pub use post::*;

use axum::response::{Html, IntoResponse, Response};
use rinja::Template;

use crate::error::Error;

pub fn render<T: Template>(template: T) -> Result<Response, Error> {
    let html = template
        .render()
        .map_err(|error| Error::Internal(error.into()))?;

    Ok(Html(html).into_response())
}
