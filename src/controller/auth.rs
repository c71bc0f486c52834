use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use axum_messages::Messages;
use diesel::result::{DatabaseErrorKind, Error::DatabaseError};
use serde::Deserialize;
use validator::Validate as _;

use crate::auth::{AuthSession, Credentials, LoginForm, RegisterForm};
use crate::context::AppContext;
use crate::error::Error;
use crate::form::error_messages;
use crate::model::UserRecord;
use crate::view;

#[derive(Debug, Deserialize)]
pub struct NextUrl {
    next: Option<String>,
}

pub async fn login_form(
    AuthSession { user, .. }: AuthSession,
    messages: Messages,
    Query(NextUrl { next }): Query<NextUrl>,
) -> Result<Response, Error> {
    view::render(view::Login {
        user,
        messages: messages.into_iter().collect(),
        form: LoginForm {
            next,
            ..Default::default()
        },
        errors: vec![],
    })
}

pub async fn login(
    mut auth_session: AuthSession,
    messages: Messages,
    Form(input): Form<LoginForm>,
) -> Result<Response, Error> {
    if let Err(validation) = input.validate() {
        return view::render(view::Login {
            user: auth_session.user,
            messages: messages.into_iter().collect(),
            form: input,
            errors: error_messages(validation),
        });
    }

    let credentials = Credentials {
        username: input.username.clone(),
        password: input.password.clone(),
        next: input.next.clone(),
    };

    let user = match auth_session.authenticate(credentials).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            let _ = messages.error("Invalid credentials");

            let login_url = match input.next {
                Some(next) => format!("/login?next={next}"),
                None => "/login".to_string(),
            };

            return Ok(Redirect::to(&login_url).into_response());
        }
        Err(error) => return Err(Error::Internal(error.into())),
    };

    auth_session
        .login(&user)
        .await
        .map_err(|error| Error::Internal(error.into()))?;

    let _ = messages.success(format!("Successfully logged in as {}", user.username));

    Ok(match input.next {
        Some(ref next) => Redirect::to(next),
        None => Redirect::to("/"),
    }
    .into_response())
}

pub async fn register_form(
    AuthSession { user, .. }: AuthSession,
    messages: Messages,
) -> Result<Response, Error> {
    if user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    view::render(view::Register {
        user,
        messages: messages.into_iter().collect(),
        form: RegisterForm::default(),
        errors: vec![],
    })
}

pub async fn register(
    State(context): State<AppContext>,
    AuthSession { user, .. }: AuthSession,
    messages: Messages,
    Form(input): Form<RegisterForm>,
) -> Result<Response, Error> {
    if user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    if let Err(validation) = input.validate() {
        return view::render(view::Register {
            user,
            messages: messages.into_iter().collect(),
            form: input,
            errors: error_messages(validation),
        });
    }

    let mut conn = context.database.get().await?;
    let password = password_auth::generate_hash(&input.password);
    let res = UserRecord::create(&input.username, &password, &input.name)
        .save(&mut conn)
        .await;

    match res {
        Ok(_) => {
            let _ = messages.success("Registration successful! You can now log in.");
            Ok(Redirect::to("/login").into_response())
        }
        Err(DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => view::render(view::Register {
            user,
            messages: messages.into_iter().collect(),
            form: input,
            errors: vec!["A user with the same username already exists".to_string()],
        }),
        Err(error) => Err(error.into()),
    }
}

pub async fn logout(mut auth_session: AuthSession) -> Result<Response, Error> {
    auth_session
        .logout()
        .await
        .map_err(|error| Error::Internal(error.into()))?;

    Ok(Redirect::to("/").into_response())
}
