use axum_messages::Message;
use rinja::Template;

use crate::form::PostForm;
use crate::model::{Comment, GroupRecord, Post, UserRecord};
use crate::pagination::Page;

#[derive(Template)]
#[template(path = "pages/index.html")]
pub struct Index {
    pub user: Option<UserRecord>,
    pub messages: Vec<Message>,
    pub page: Page<Post>,
}

#[derive(Template)]
#[template(path = "pages/group_list.html")]
pub struct GroupList {
    pub user: Option<UserRecord>,
    pub messages: Vec<Message>,
    pub group: GroupRecord,
    pub page: Page<Post>,
}

#[derive(Template)]
#[template(path = "pages/profile.html")]
pub struct Profile {
    pub user: Option<UserRecord>,
    pub messages: Vec<Message>,
    pub author: UserRecord,
    pub following: bool,
    pub page: Page<Post>,
}

#[derive(Template)]
#[template(path = "pages/post_detail.html")]
pub struct PostDetail {
    pub user: Option<UserRecord>,
    pub messages: Vec<Message>,
    pub post: Post,
    pub comments: Vec<Comment>,
}

#[derive(Template)]
#[template(path = "pages/post_form.html")]
pub struct PostEditor {
    pub user: Option<UserRecord>,
    pub messages: Vec<Message>,
    pub form: PostForm,
    pub groups: Vec<GroupRecord>,
    pub errors: Vec<String>,
    /// `Some` when editing an existing post, `None` on create.
    pub post_id: Option<i32>,
}
