use std::path::Path as FsPath;

use axum::extract::{Multipart, Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use axum_messages::Messages;
use validator::Validate as _;

use crate::auth::AuthSession;
use crate::context::AppContext;
use crate::controller::PageQuery;
use crate::error::Error;
use crate::form::{error_messages, CommentForm, PostForm, PostSubmission};
use crate::model::{Comment, CommentRecord, FollowRecord, GroupRecord, Post, PostRecord, UserRecord};
use crate::pagination::{parse_page_param, Pager};
use crate::view;

pub async fn index(
    State(context): State<AppContext>,
    AuthSession { user, .. }: AuthSession,
    messages: Messages,
    Query(query): Query<PageQuery>,
) -> Result<Response, Error> {
    let mut conn = context.database.get().await?;
    let total = Post::count_all(&mut conn).await?;
    let pager = Pager::new(
        parse_page_param(query.page.as_deref()),
        total,
        context.config.page_size,
    );
    let posts = Post::page_all(&pager, &mut conn).await?;

    view::render(view::Index {
        user,
        messages: messages.into_iter().collect(),
        page: pager.into_page(posts),
    })
}

pub async fn group_posts(
    State(context): State<AppContext>,
    AuthSession { user, .. }: AuthSession,
    messages: Messages,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Response, Error> {
    let mut conn = context.database.get().await?;
    let group = GroupRecord::find_by_slug(&slug, &mut conn)
        .await?
        .ok_or(Error::NotFound)?;

    let total = Post::count_for_group(group.id, &mut conn).await?;
    let pager = Pager::new(
        parse_page_param(query.page.as_deref()),
        total,
        context.config.page_size,
    );
    let posts = Post::page_for_group(group.id, &pager, &mut conn).await?;

    view::render(view::GroupList {
        user,
        messages: messages.into_iter().collect(),
        group,
        page: pager.into_page(posts),
    })
}

pub async fn profile(
    State(context): State<AppContext>,
    AuthSession { user, .. }: AuthSession,
    messages: Messages,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Response, Error> {
    let mut conn = context.database.get().await?;
    let author = UserRecord::find_by_username(&username, &mut conn)
        .await?
        .ok_or(Error::NotFound)?;

    let following = match &user {
        Some(user) => FollowRecord::exists(user.id, author.id, &mut conn).await?,
        None => false,
    };

    let total = Post::count_for_author(author.id, &mut conn).await?;
    let pager = Pager::new(
        parse_page_param(query.page.as_deref()),
        total,
        context.config.page_size,
    );
    let posts = Post::page_for_author(author.id, &pager, &mut conn).await?;

    view::render(view::Profile {
        user,
        messages: messages.into_iter().collect(),
        author,
        following,
        page: pager.into_page(posts),
    })
}

pub async fn detail(
    State(context): State<AppContext>,
    AuthSession { user, .. }: AuthSession,
    messages: Messages,
    Path(id): Path<i32>,
) -> Result<Response, Error> {
    let mut conn = context.database.get().await?;
    let post = Post::find(id, &mut conn).await?;
    let comments = Comment::list_for_post(post.id, &mut conn).await?;

    view::render(view::PostDetail {
        user,
        messages: messages.into_iter().collect(),
        post,
        comments,
    })
}

pub async fn create_form(
    State(context): State<AppContext>,
    AuthSession { user, .. }: AuthSession,
    messages: Messages,
) -> Result<Response, Error> {
    let mut conn = context.database.get().await?;
    let groups = GroupRecord::list(&mut conn).await?;

    view::render(view::PostEditor {
        user,
        messages: messages.into_iter().collect(),
        form: PostForm::default(),
        groups,
        errors: vec![],
        post_id: None,
    })
}

pub async fn create(
    State(context): State<AppContext>,
    AuthSession { user, .. }: AuthSession,
    messages: Messages,
    multipart: Multipart,
) -> Result<Response, Error> {
    let Some(user) = user else {
        return Ok(Redirect::to("/login?next=/create").into_response());
    };

    let submission = PostSubmission::from_multipart(multipart).await?;
    let mut conn = context.database.get().await?;

    if let Err(validation) = submission.form.validate() {
        let groups = GroupRecord::list(&mut conn).await?;
        return view::render(view::PostEditor {
            user: Some(user),
            messages: messages.into_iter().collect(),
            form: submission.form,
            groups,
            errors: error_messages(validation),
            post_id: None,
        });
    }

    let image = match &submission.image {
        Some(upload) => Some(
            upload
                .persist(FsPath::new(&context.config.media_dir))
                .await?,
        ),
        None => None,
    };

    PostRecord::create(user.id, &submission.form.text)
        .with_group(submission.form.group)
        .with_image(image.as_deref())
        .save(&mut conn)
        .await?;

    Ok(Redirect::to(&format!("/profile/{}", user.username)).into_response())
}

pub async fn edit_form(
    State(context): State<AppContext>,
    AuthSession { user, .. }: AuthSession,
    messages: Messages,
    Path(id): Path<i32>,
) -> Result<Response, Error> {
    let Some(user) = user else {
        return Ok(Redirect::to(&format!("/login?next=/posts/{id}/edit")).into_response());
    };

    let mut conn = context.database.get().await?;
    let post = Post::find(id, &mut conn).await?;
    if post.author.id != user.id {
        return Ok(Redirect::to(&format!("/posts/{id}")).into_response());
    }

    let groups = GroupRecord::list(&mut conn).await?;

    view::render(view::PostEditor {
        user: Some(user),
        messages: messages.into_iter().collect(),
        form: PostForm {
            text: post.text,
            group: post.group.map(|group| group.id),
        },
        groups,
        errors: vec![],
        post_id: Some(id),
    })
}

pub async fn edit(
    State(context): State<AppContext>,
    AuthSession { user, .. }: AuthSession,
    messages: Messages,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Response, Error> {
    let Some(user) = user else {
        return Ok(Redirect::to(&format!("/login?next=/posts/{id}/edit")).into_response());
    };

    let mut conn = context.database.get().await?;
    let record = PostRecord::read(id, &mut conn).await?;
    if record.author_id != user.id {
        return Ok(Redirect::to(&format!("/posts/{id}")).into_response());
    }

    let submission = PostSubmission::from_multipart(multipart).await?;

    if let Err(validation) = submission.form.validate() {
        let groups = GroupRecord::list(&mut conn).await?;
        return view::render(view::PostEditor {
            user: Some(user),
            messages: messages.into_iter().collect(),
            form: submission.form,
            groups,
            errors: error_messages(validation),
            post_id: Some(id),
        });
    }

    let image = match &submission.image {
        Some(upload) => Some(
            upload
                .persist(FsPath::new(&context.config.media_dir))
                .await?,
        ),
        None => None,
    };

    let mut update = record
        .update()
        .with_text(&submission.form.text)
        .with_group(submission.form.group);
    if let Some(image) = image.as_deref() {
        update = update.with_image(image);
    }
    update.save(&mut conn).await?;

    let _ = messages.success("Post updated");

    Ok(Redirect::to(&format!("/posts/{id}")).into_response())
}

pub async fn add_comment(
    State(context): State<AppContext>,
    AuthSession { user, .. }: AuthSession,
    mut messages: Messages,
    Path(id): Path<i32>,
    Form(input): Form<CommentForm>,
) -> Result<Response, Error> {
    let Some(user) = user else {
        return Ok(Redirect::to(&format!("/login?next=/posts/{id}/comment")).into_response());
    };

    let mut conn = context.database.get().await?;
    let post = PostRecord::read(id, &mut conn).await?;

    if let Err(validation) = input.validate() {
        for error in error_messages(validation) {
            messages = messages.error(error);
        }
        return Ok(Redirect::to(&format!("/posts/{}", post.id)).into_response());
    }

    CommentRecord::create(post.id, user.id, &input.text)
        .save(&mut conn)
        .await?;

    Ok(Redirect::to(&format!("/posts/{}", post.id)).into_response())
}
