use axum_messages::Message;
use rinja::Template;

use crate::auth::{LoginForm, RegisterForm};
use crate::model::UserRecord;

#[derive(Template)]
#[template(path = "auth/login.html")]
pub struct Login {
    pub user: Option<UserRecord>,
    pub messages: Vec<Message>,
    pub form: LoginForm,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "auth/register.html")]
pub struct Register {
    pub user: Option<UserRecord>,
    pub messages: Vec<Message>,
    pub form: RegisterForm,
    pub errors: Vec<String>,
}
