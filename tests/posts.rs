mod common;

use axum::http::StatusCode;
use common::{body_text, latest_post_id, location, multipart_body, multipart_content_type};
use yatube::model::{Comment, GroupRecord, Post, PostRecord, UserRecord};

#[tokio::test]
async fn creating_a_post_stores_it_and_redirects_to_the_profile() {
    let app = common::spawn().await;
    let cookie = app.login_user("author").await;

    let body = multipart_body(&[("text", "My first post"), ("group", "")], None);
    let response = app
        .post("/create", &multipart_content_type(), body, Some(&cookie))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/profile/author");

    let mut conn = app.context.database.get().await.unwrap();
    assert_eq!(Post::count_all(&mut conn).await.unwrap(), 1);
    drop(conn);

    let profile = body_text(app.get("/profile/author", None).await).await;
    assert!(profile.contains("My first post"));
}

#[tokio::test]
async fn creating_a_post_in_a_group_lists_it_on_the_group_page() {
    let app = common::spawn().await;
    let cookie = app.login_user("author").await;

    let group = {
        let mut conn = app.context.database.get().await.unwrap();
        GroupRecord::create("Rustaceans", "rustaceans", "All things Rust")
            .save(&mut conn)
            .await
            .unwrap()
    };

    let body = multipart_body(
        &[("text", "Grouped post"), ("group", &group.id.to_string())],
        None,
    );
    let response = app
        .post("/create", &multipart_content_type(), body, Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let listing = body_text(app.get("/group/rustaceans", None).await).await;
    assert!(listing.contains("Grouped post"));

    // A second group stays empty.
    let other = {
        let mut conn = app.context.database.get().await.unwrap();
        GroupRecord::create("Other", "other", "Unrelated")
            .save(&mut conn)
            .await
            .unwrap()
    };
    let listing = body_text(app.get(&format!("/group/{}", other.slug), None).await).await;
    assert!(!listing.contains("Grouped post"));
}

#[tokio::test]
async fn anonymous_post_creation_redirects_to_login_and_writes_nothing() {
    let app = common::spawn().await;

    let body = multipart_body(&[("text", "sneaky")], None);
    let response = app
        .post("/create", &multipart_content_type(), body, None)
        .await;

    assert!(response.status().is_redirection());
    assert!(location(&response).starts_with("/login"));
    assert!(location(&response).contains("next="));

    let mut conn = app.context.database.get().await.unwrap();
    assert_eq!(Post::count_all(&mut conn).await.unwrap(), 0);
}

#[tokio::test]
async fn blank_post_text_fails_validation_and_writes_nothing() {
    let app = common::spawn().await;
    let cookie = app.login_user("author").await;

    let body = multipart_body(&[("text", "   \n\t ")], None);
    let response = app
        .post("/create", &multipart_content_type(), body, Some(&cookie))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("must not be blank"));

    let mut conn = app.context.database.get().await.unwrap();
    assert_eq!(Post::count_all(&mut conn).await.unwrap(), 0);
}

#[tokio::test]
async fn an_uploaded_image_is_persisted_and_rendered() {
    let app = common::spawn().await;
    let cookie = app.login_user("author").await;

    let gif: &[u8] = &[
        0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x02, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
        0x00, 0xFF, 0xFF, 0xFF, 0x21, 0xF9, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2C, 0x00, 0x00,
        0x00, 0x00, 0x02, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x0C, 0x0A, 0x00, 0x3B,
    ];
    let body = multipart_body(&[("text", "With image")], Some(("small.gif", gif)));
    let response = app
        .post("/create", &multipart_content_type(), body, Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let post_id = latest_post_id(&app, "author").await;
    let image = {
        let mut conn = app.context.database.get().await.unwrap();
        PostRecord::read(post_id, &mut conn)
            .await
            .unwrap()
            .image
            .expect("post should have an image")
    };
    assert!(image.ends_with(".gif"));

    let stored = std::path::Path::new(&app.context.config.media_dir).join(&image);
    assert_eq!(std::fs::read(stored).unwrap(), gif);

    let detail = body_text(app.get(&format!("/posts/{post_id}"), None).await).await;
    assert!(detail.contains(&format!("/media/{image}")));
}

#[tokio::test]
async fn only_the_author_can_edit_a_post() {
    let app = common::spawn().await;
    let author_cookie = app.login_user("author").await;

    let body = multipart_body(&[("text", "Original text")], None);
    app.post(
        "/create",
        &multipart_content_type(),
        body,
        Some(&author_cookie),
    )
    .await;
    let post_id = latest_post_id(&app, "author").await;

    // A different authenticated user is bounced to the detail page.
    let other_cookie = app.login_user("intruder").await;
    let response = app
        .get(&format!("/posts/{post_id}/edit"), Some(&other_cookie))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/posts/{post_id}"));

    let body = multipart_body(&[("text", "Hijacked")], None);
    let response = app
        .post(
            &format!("/posts/{post_id}/edit"),
            &multipart_content_type(),
            body,
            Some(&other_cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // An anonymous user is sent to login.
    let response = app.get(&format!("/posts/{post_id}/edit"), None).await;
    assert!(response.status().is_redirection());
    assert!(location(&response).starts_with("/login"));

    {
        let mut conn = app.context.database.get().await.unwrap();
        let record = PostRecord::read(post_id, &mut conn).await.unwrap();
        assert_eq!(record.text, "Original text");
    }

    // The author goes through.
    let body = multipart_body(&[("text", "Edited text")], None);
    let response = app
        .post(
            &format!("/posts/{post_id}/edit"),
            &multipart_content_type(),
            body,
            Some(&author_cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/posts/{post_id}"));

    let mut conn = app.context.database.get().await.unwrap();
    let record = PostRecord::read(post_id, &mut conn).await.unwrap();
    assert_eq!(record.text, "Edited text");
}

#[tokio::test]
async fn unknown_resources_render_the_not_found_page() {
    let app = common::spawn().await;

    let response = app.get("/posts/9999", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let page = body_text(response).await;
    assert!(page.contains("does not exist"));

    let response = app.get("/group/no-such-group", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get("/profile/no-such-user", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn authenticated_users_can_comment_on_any_post() {
    let app = common::spawn().await;
    let author_cookie = app.login_user("author").await;

    let body = multipart_body(&[("text", "Commentable")], None);
    app.post(
        "/create",
        &multipart_content_type(),
        body,
        Some(&author_cookie),
    )
    .await;
    let post_id = latest_post_id(&app, "author").await;

    let commenter_cookie = app.login_user("commenter").await;
    let response = app
        .post(
            &format!("/posts/{post_id}/comment"),
            "application/x-www-form-urlencoded",
            "text=Well+said".to_string(),
            Some(&commenter_cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/posts/{post_id}"));

    {
        let mut conn = app.context.database.get().await.unwrap();
        let comments = Comment::list_for_post(post_id, &mut conn).await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].text, "Well said");
        assert_eq!(comments[0].author.username, "commenter");
    }

    let detail = body_text(app.get(&format!("/posts/{post_id}"), None).await).await;
    assert!(detail.contains("Well said"));
}

#[tokio::test]
async fn anonymous_comments_redirect_to_login_and_write_nothing() {
    let app = common::spawn().await;
    let author_cookie = app.login_user("author").await;

    let body = multipart_body(&[("text", "Commentable")], None);
    app.post(
        "/create",
        &multipart_content_type(),
        body,
        Some(&author_cookie),
    )
    .await;
    let post_id = latest_post_id(&app, "author").await;

    let response = app
        .post(
            &format!("/posts/{post_id}/comment"),
            "application/x-www-form-urlencoded",
            "text=anonymous+comment".to_string(),
            None,
        )
        .await;
    assert!(response.status().is_redirection());
    assert!(location(&response).starts_with("/login"));
    assert!(location(&response).contains("next="));

    let mut conn = app.context.database.get().await.unwrap();
    assert!(Comment::list_for_post(post_id, &mut conn)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn blank_comments_are_dropped_with_an_error() {
    let app = common::spawn().await;
    let cookie = app.login_user("author").await;

    let body = multipart_body(&[("text", "Commentable")], None);
    app.post("/create", &multipart_content_type(), body, Some(&cookie))
        .await;
    let post_id = latest_post_id(&app, "author").await;

    let response = app
        .post(
            &format!("/posts/{post_id}/comment"),
            "application/x-www-form-urlencoded",
            "text=+++".to_string(),
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let mut conn = app.context.database.get().await.unwrap();
    assert!(Comment::list_for_post(post_id, &mut conn)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn editing_can_move_a_post_between_groups() {
    let app = common::spawn().await;
    let cookie = app.login_user("author").await;

    let (first, second) = {
        let mut conn = app.context.database.get().await.unwrap();
        let first = GroupRecord::create("First", "first", "One")
            .save(&mut conn)
            .await
            .unwrap();
        let second = GroupRecord::create("Second", "second", "Two")
            .save(&mut conn)
            .await
            .unwrap();
        (first, second)
    };

    let body = multipart_body(
        &[("text", "Moving post"), ("group", &first.id.to_string())],
        None,
    );
    app.post("/create", &multipart_content_type(), body, Some(&cookie))
        .await;
    let post_id = latest_post_id(&app, "author").await;

    let body = multipart_body(
        &[("text", "Moving post"), ("group", &second.id.to_string())],
        None,
    );
    let response = app
        .post(
            &format!("/posts/{post_id}/edit"),
            &multipart_content_type(),
            body,
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // The old group no longer lists it, the new one does.
    let old_listing = body_text(app.get("/group/first", None).await).await;
    assert!(!old_listing.contains("Moving post"));
    let new_listing = body_text(app.get("/group/second", None).await).await;
    assert!(new_listing.contains("Moving post"));

    let mut conn = app.context.database.get().await.unwrap();
    let record = PostRecord::read(post_id, &mut conn).await.unwrap();
    assert_eq!(record.group_id, Some(second.id));
}

#[tokio::test]
async fn registration_rejects_duplicate_usernames() {
    let app = common::spawn().await;
    let _ = app.login_user("author").await;

    let response = app
        .post(
            "/register",
            "application/x-www-form-urlencoded",
            "name=Other&username=author&password=password123".to_string(),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("same username already exists"));

    let mut conn = app.context.database.get().await.unwrap();
    let user = UserRecord::find_by_username("author", &mut conn)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.name, "Test author");
}
