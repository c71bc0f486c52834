use anyhow::Result;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use axum_login::{
    login_required,
    tower_sessions::{ExpiredDeletion, Expiry, SessionManagerLayer},
    AuthManagerLayerBuilder,
};
use axum_messages::MessagesManagerLayer;
use base64::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_async::sync_connection_wrapper::SyncConnectionWrapper;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::time::Duration;
use tokio::{signal, task::AbortHandle};
use tower_http::services::ServeDir;
use tower_sessions::cookie::{self, Key};
use tracing::{info, warn};

pub mod auth;
pub mod cache;
pub mod cli;
pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod form;
pub mod model;
pub mod pagination;
mod schema;
pub mod seed;
pub mod session_store;
pub mod view;

pub use {
    auth::{Auth, AuthSession},
    context::{create_context, AppContext},
};

use session_store::SqliteSessionStore;

pub type Connection = SyncConnectionWrapper<SqliteConnection>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Apply pending schema migrations over a plain synchronous connection.
pub async fn run_migrations(database_url: &str) -> Result<()> {
    let database_url = database_url.to_owned();
    tokio::task::spawn_blocking(move || -> Result<()> {
        use diesel::Connection as _;

        let mut conn = SqliteConnection::establish(&database_url)?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|error| anyhow::anyhow!("running migrations: {error}"))?;

        Ok(())
    })
    .await??;

    Ok(())
}

/// Assemble the full application router, including the session, auth, and
/// flash-message layers. The index route alone sits behind the page cache.
pub async fn router(context: AppContext) -> Result<Router> {
    let session_store = SqliteSessionStore::new(context.database.clone());
    session_store.migrate().await?;

    let session_key = match &context.config.session_key {
        Some(encoded) => {
            let session_key = BASE64_STANDARD.decode(encoded)?;
            Key::from(session_key.as_slice())
        }
        None => {
            warn!("No session_key configured. Falling back to a generated key. This will invalidate any sessions when the server is stopped.");
            Key::generate()
        }
    };

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(cookie::time::Duration::days(1)))
        .with_signed(session_key);

    let auth = Auth::new(context.database.clone());
    let auth_layer = AuthManagerLayerBuilder::new(auth, session_layer).build();

    let cached_index = Router::new()
        .route("/", get(controller::post::index))
        .route_layer(middleware::from_fn_with_state(
            context.clone(),
            cache::page_cache,
        ));

    let router = Router::new()
        .route(
            "/create",
            get(controller::post::create_form).post(controller::post::create),
        )
        .route(
            "/posts/:id/edit",
            get(controller::post::edit_form).post(controller::post::edit),
        )
        .route("/posts/:id/comment", post(controller::post::add_comment))
        .route("/follow", get(controller::follow::feed))
        .route(
            "/profile/:username/follow",
            get(controller::follow::follow),
        )
        .route(
            "/profile/:username/unfollow",
            get(controller::follow::unfollow),
        )
        // Previous routes require authentication.
        .route_layer(login_required!(Auth, login_url = "/login"))
        .merge(cached_index)
        .route("/group/:slug", get(controller::post::group_posts))
        .route("/profile/:username", get(controller::post::profile))
        .route("/posts/:id", get(controller::post::detail))
        .route(
            "/login",
            get(controller::auth::login_form).post(controller::auth::login),
        )
        .route(
            "/register",
            get(controller::auth::register_form).post(controller::auth::register),
        )
        .route("/logout", get(controller::auth::logout))
        .nest_service("/static", ServeDir::new("static"))
        .nest_service("/media", ServeDir::new(&context.config.media_dir))
        .layer(MessagesManagerLayer)
        .layer(auth_layer)
        .with_state(context);

    Ok(router)
}

pub async fn serve(context: AppContext) -> Result<()> {
    let session_store = SqliteSessionStore::new(context.database.clone());
    let deletion_task = tokio::task::spawn(
        session_store
            .clone()
            .continuously_delete_expired(Duration::from_secs(60)),
    );

    let listen = context.config.listen.clone();
    let router = router(context).await?;

    let listener = tokio::net::TcpListener::bind(&listen).await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal(Some(deletion_task.abort_handle())))
        .await?;

    match deletion_task.await {
        Ok(result) => result?,
        Err(error) if error.is_cancelled() => (),
        Err(error) => return Err(error.into()),
    }

    Ok(())
}

pub async fn shutdown_signal(abort_handle: Option<AbortHandle>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => { if let Some(abort_handle) = abort_handle { abort_handle.abort() } },
        _ = terminate => { if let Some(abort_handle) = abort_handle { abort_handle.abort() } },
    }
}
