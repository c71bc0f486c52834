//! Sessions persisted in the application's own SQLite database.

use async_trait::async_trait;
use chrono::Utc;
use diesel::deserialize::QueryableByName;
use diesel::result::DatabaseErrorKind;
use diesel::sql_types::{BigInt, Binary, Text};
use diesel::{sql_query, Selectable};
use diesel_async::pooled_connection::deadpool::Pool;
use diesel_async::RunQueryDsl;
use tower_sessions::{
    session::{Id, Record},
    session_store, ExpiredDeletion, SessionStore,
};

use crate::Connection;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Diesel(#[from] diesel::result::Error),

    #[error(transparent)]
    Pool(#[from] deadpool::managed::PoolError<diesel_async::pooled_connection::PoolError>),

    #[error(transparent)]
    Encode(#[from] rmp_serde::encode::Error),

    #[error(transparent)]
    Decode(#[from] rmp_serde::decode::Error),
}

impl From<StoreError> for session_store::Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Diesel(inner) => session_store::Error::Backend(inner.to_string()),
            StoreError::Pool(inner) => session_store::Error::Backend(inner.to_string()),
            StoreError::Decode(inner) => session_store::Error::Decode(inner.to_string()),
            StoreError::Encode(inner) => session_store::Error::Encode(inner.to_string()),
        }
    }
}

diesel::table! {
    _session (id) {
        id -> Text,
        data -> Binary,
        expiry_date -> BigInt,
    }
}

#[derive(QueryableByName, Selectable, PartialEq, Debug)]
#[diesel(table_name = _session)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct SessionRow {
    id: String,
    data: Vec<u8>,
    expiry_date: i64,
}

#[derive(Clone)]
pub struct SqliteSessionStore {
    database: Pool<Connection>,
}

// SessionStore requires Debug; deadpool's Pool does not implement it.
impl std::fmt::Debug for SqliteSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteSessionStore").finish_non_exhaustive()
    }
}

impl SqliteSessionStore {
    pub fn new(database: Pool<Connection>) -> Self {
        Self { database }
    }

    /// Create the session table if it is missing.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        let query = r#"
            create table if not exists _session
            (
                id text primary key not null,
                data blob not null,
                expiry_date integer not null
            )
            "#;
        let mut conn = self.database.get().await?;
        sql_query(query).execute(&mut conn).await?;

        Ok(())
    }

    async fn try_create(&self, record: &Record) -> Result<bool, StoreError> {
        let query = r#"
            insert or abort into _session
            (id, data, expiry_date) values (?, ?, ?)
            "#;
        let mut conn = self.database.get().await?;
        let res = sql_query(query)
            .bind::<Text, _>(record.id.to_string())
            .bind::<Binary, _>(rmp_serde::to_vec(record)?)
            .bind::<BigInt, _>(record.expiry_date.unix_timestamp())
            .execute(&mut conn)
            .await;

        match res {
            Ok(_) => Ok(true),
            Err(diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ExpiredDeletion for SqliteSessionStore {
    async fn delete_expired(&self) -> session_store::Result<()> {
        let query = r#"
            delete from _session where expiry_date < ?
            "#;
        let mut conn = self.database.get().await.map_err(StoreError::Pool)?;
        sql_query(query)
            .bind::<BigInt, _>(Utc::now().timestamp())
            .execute(&mut conn)
            .await
            .map_err(StoreError::Diesel)?;

        Ok(())
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        // Retry with a fresh id on the (unlikely) collision.
        while !self.try_create(record).await? {
            record.id = Id::default();
        }

        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        let query = r#"
            insert into _session
            (id, data, expiry_date) values (?, ?, ?)
            on conflict(id) do update set
            data = excluded.data,
            expiry_date = excluded.expiry_date
            "#;
        let mut conn = self.database.get().await.map_err(StoreError::Pool)?;
        sql_query(query)
            .bind::<Text, _>(record.id.to_string())
            .bind::<Binary, _>(rmp_serde::to_vec(record).map_err(StoreError::Encode)?)
            .bind::<BigInt, _>(record.expiry_date.unix_timestamp())
            .execute(&mut conn)
            .await
            .map_err(StoreError::Diesel)?;

        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let query = r#"
            select * from _session
            where id = ? and expiry_date > ?
            limit 1
            "#;
        let mut conn = self.database.get().await.map_err(StoreError::Pool)?;
        let rows: Vec<SessionRow> = sql_query(query)
            .bind::<Text, _>(session_id.to_string())
            .bind::<BigInt, _>(Utc::now().timestamp())
            .load(&mut conn)
            .await
            .map_err(StoreError::Diesel)?;

        match rows.as_slice().first() {
            Some(row) => Ok(Some(
                rmp_serde::from_slice(&row.data).map_err(StoreError::Decode)?,
            )),
            None => Ok(None),
        }
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        let query = r#"
            delete from _session where id = ?
            "#;
        let mut conn = self.database.get().await.map_err(StoreError::Pool)?;
        sql_query(query)
            .bind::<Text, _>(session_id.to_string())
            .execute(&mut conn)
            .await
            .map_err(StoreError::Diesel)?;

        Ok(())
    }
}
