use axum_messages::Message;
use rinja::Template;

use crate::model::{Post, UserRecord};
use crate::pagination::Page;

#[derive(Template)]
#[template(path = "pages/follow_index.html")]
pub struct FollowIndex {
    pub user: Option<UserRecord>,
    pub messages: Vec<Message>,
    pub page: Page<Post>,
}
