// Not every test binary uses every helper.
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use tower::ServiceExt as _;
use yatube::config::Config;
use yatube::context::{create_context, AppContext};

pub const PAGE_SIZE: i64 = 10;

pub struct TestApp {
    pub context: AppContext,
    pub router: Router,
    _dir: tempfile::TempDir,
}

pub async fn spawn() -> TestApp {
    spawn_with_cache_ttl(20).await
}

pub async fn spawn_with_cache_ttl(index_cache_ttl_secs: u64) -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let database_url = dir
        .path()
        .join("test.sqlite3")
        .to_string_lossy()
        .into_owned();
    let media_dir = dir.path().join("media").to_string_lossy().into_owned();

    let config = Config {
        database_url: Some(database_url.clone()),
        database_pool_size: 4,
        session_key: None,
        listen: "127.0.0.1:0".to_string(),
        media_dir,
        page_size: PAGE_SIZE,
        index_cache_ttl_secs,
    };

    yatube::run_migrations(&database_url)
        .await
        .expect("migrations should apply");
    let context = create_context(config).await.expect("context should build");
    let router = yatube::router(context.clone())
        .await
        .expect("router should build");

    TestApp {
        context,
        router,
        _dir: dir,
    }
}

impl TestApp {
    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = builder.body(Body::empty()).expect("request should build");

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("request should not fail")
    }

    pub async fn post(
        &self,
        path: &str,
        content_type: &str,
        body: impl Into<Body>,
        cookie: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, content_type);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = builder.body(body.into()).expect("request should build");

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("request should not fail")
    }

    /// Register a user and log in, returning the session cookie to send
    /// with subsequent requests.
    pub async fn login_user(&self, username: &str) -> String {
        let body = format!("name=Test+{username}&username={username}&password=password123");
        let response = self
            .post(
                "/register",
                "application/x-www-form-urlencoded",
                body,
                None,
            )
            .await;
        assert!(
            response.status().is_redirection(),
            "registration should redirect, got {}",
            response.status()
        );

        let body = format!("username={username}&password=password123");
        let response = self
            .post("/login", "application/x-www-form-urlencoded", body, None)
            .await;
        assert!(
            response.status().is_redirection(),
            "login should redirect, got {}",
            response.status()
        );

        session_cookie(&response).expect("login should set a session cookie")
    }
}

/// Id of the most recent post by the given user.
pub async fn latest_post_id(app: &TestApp, username: &str) -> i32 {
    let mut conn = app.context.database.get().await.unwrap();
    let author = yatube::model::UserRecord::find_by_username(username, &mut conn)
        .await
        .unwrap()
        .expect("user should exist");
    let pager = yatube::pagination::Pager::new(None, 1, PAGE_SIZE);
    yatube::model::Post::page_for_author(author.id, &pager, &mut conn)
        .await
        .unwrap()
        .first()
        .expect("user should have a post")
        .id
}

pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    let value = response.headers().get(header::SET_COOKIE)?;
    let value = value.to_str().ok()?;
    Some(value.split(';').next()?.to_string())
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("response should have a location header")
        .to_str()
        .expect("location should be valid utf-8")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    String::from_utf8(bytes.to_vec()).expect("body should be valid utf-8")
}

pub const BOUNDARY: &str = "yatube-test-boundary";

/// Encode a multipart/form-data body for the post form.
pub fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, data)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}
