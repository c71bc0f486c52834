mod common;

use axum::http::StatusCode;
use common::{body_text, location};

#[tokio::test]
async fn registering_and_logging_in_establishes_a_session() {
    let app = common::spawn().await;
    let cookie = app.login_user("newcomer").await;

    let page = body_text(app.get("/", Some(&cookie)).await).await;
    assert!(page.contains("Log out"));
    assert!(page.contains("Test newcomer"));
}

#[tokio::test]
async fn anonymous_visitors_see_the_login_link() {
    let app = common::spawn().await;

    let page = body_text(app.get("/", None).await).await;
    assert!(page.contains("Log in"));
    assert!(!page.contains("Log out"));
}

#[tokio::test]
async fn logging_out_clears_the_session() {
    let app = common::spawn().await;
    let cookie = app.login_user("leaver").await;

    let response = app.get("/logout", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let response = app.get("/create", Some(&cookie)).await;
    assert!(response.status().is_redirection());
    assert!(location(&response).starts_with("/login"));
}

#[tokio::test]
async fn wrong_credentials_bounce_back_to_the_login_form() {
    let app = common::spawn().await;
    let _ = app.login_user("someone").await;

    let response = app
        .post(
            "/login",
            "application/x-www-form-urlencoded",
            "username=someone&password=wrong-password".to_string(),
            None,
        )
        .await;
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn login_honors_the_next_parameter() {
    let app = common::spawn().await;
    let _ = app.login_user("someone").await;

    let form = body_text(app.get("/login?next=/create", None).await).await;
    assert!(form.contains("name=\"next\""));
    assert!(form.contains("value=\"/create\""));

    let response = app
        .post(
            "/login",
            "application/x-www-form-urlencoded",
            "username=someone&password=password123&next=%2Fcreate".to_string(),
            None,
        )
        .await;
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/create");
}

#[tokio::test]
async fn short_passwords_fail_registration_validation() {
    let app = common::spawn().await;

    let response = app
        .post(
            "/register",
            "application/x-www-form-urlencoded",
            "name=Shorty&username=shorty&password=short".to_string(),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("at least 8 characters"));
}
