use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum_messages::Messages;

use crate::auth::AuthSession;
use crate::context::AppContext;
use crate::controller::PageQuery;
use crate::error::Error;
use crate::model::{FollowRecord, Post, UserRecord};
use crate::pagination::{parse_page_param, Pager};
use crate::view;

pub async fn feed(
    State(context): State<AppContext>,
    AuthSession { user, .. }: AuthSession,
    messages: Messages,
    Query(query): Query<PageQuery>,
) -> Result<Response, Error> {
    let Some(user) = user else {
        return Ok(Redirect::to("/login?next=/follow").into_response());
    };

    let mut conn = context.database.get().await?;
    let total = Post::count_for_feed(user.id, &mut conn).await?;
    let pager = Pager::new(
        parse_page_param(query.page.as_deref()),
        total,
        context.config.page_size,
    );
    let posts = Post::page_for_feed(user.id, &pager, &mut conn).await?;

    view::render(view::FollowIndex {
        user: Some(user),
        messages: messages.into_iter().collect(),
        page: pager.into_page(posts),
    })
}

pub async fn follow(
    State(context): State<AppContext>,
    AuthSession { user, .. }: AuthSession,
    Path(username): Path<String>,
) -> Result<Response, Error> {
    let Some(user) = user else {
        return Ok(Redirect::to(&format!("/login?next=/profile/{username}/follow")).into_response());
    };

    let mut conn = context.database.get().await?;
    let author = UserRecord::find_by_username(&username, &mut conn)
        .await?
        .ok_or(Error::NotFound)?;

    // Following yourself is a silent no-op, like re-following.
    if author.id != user.id {
        FollowRecord::follow(user.id, author.id, &mut conn).await?;
    }

    Ok(Redirect::to(&format!("/profile/{}", author.username)).into_response())
}

pub async fn unfollow(
    State(context): State<AppContext>,
    AuthSession { user, .. }: AuthSession,
    Path(username): Path<String>,
) -> Result<Response, Error> {
    let Some(user) = user else {
        return Ok(
            Redirect::to(&format!("/login?next=/profile/{username}/unfollow")).into_response(),
        );
    };

    let mut conn = context.database.get().await?;
    let author = UserRecord::find_by_username(&username, &mut conn)
        .await?
        .ok_or(Error::NotFound)?;

    FollowRecord::unfollow(user.id, author.id, &mut conn).await?;

    Ok(Redirect::to(&format!("/profile/{}", author.username)).into_response())
}
