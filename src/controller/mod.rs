pub mod auth;
pub mod follow;
pub mod post;

use serde::Deserialize;

/// The `?page=` query parameter, parsed leniently by the handlers.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}
