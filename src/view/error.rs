use axum_messages::Message;
use rinja::Template;

use crate::model::UserRecord;

#[derive(Default, Template)]
#[template(path = "404.html")]
pub struct NotFound {
    pub user: Option<UserRecord>,
    pub messages: Vec<Message>,
}

#[derive(Template)]
#[template(path = "500.html")]
pub struct ServerError {}
