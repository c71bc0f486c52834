use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use diesel::sqlite::SqliteConnection;
use diesel::ConnectionError;
use diesel_async::pooled_connection::deadpool::Pool;
use diesel_async::pooled_connection::{AsyncDieselConnectionManager, ManagerConfig};
use diesel_async::sync_connection_wrapper::SyncConnectionWrapper;
use diesel_async::{AsyncConnection, SimpleAsyncConnection};
use futures::FutureExt;

use crate::cache::PageCache;
use crate::config::Config;
use crate::Connection;

#[derive(Clone)]
pub struct AppContext {
    pub database: Pool<Connection>,
    pub cache: PageCache,
    pub config: Arc<Config>,
}

pub async fn create_context(config: Config) -> Result<AppContext> {
    let database_url = config.database_url()?;

    let mut manager_config = ManagerConfig::default();
    manager_config.custom_setup = Box::new(|url| {
        async {
            let mut conn = SyncConnectionWrapper::<SqliteConnection>::establish(url).await?;

            let query = "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA busy_timeout = 30000;
            ";
            conn.batch_execute(query)
                .await
                .map_err(ConnectionError::CouldntSetupConfiguration)?;

            Ok(conn)
        }
        .boxed()
    });

    let manager = AsyncDieselConnectionManager::<SyncConnectionWrapper<SqliteConnection>>::new_with_config(
        database_url,
        manager_config,
    );

    let database = Pool::builder(manager)
        .max_size(config.database_pool_size)
        .build()?;

    let cache = PageCache::new(Duration::from_secs(config.index_cache_ttl_secs));

    Ok(AppContext {
        database,
        cache,
        config: Arc::new(config),
    })
}
