use axum_login::AuthUser;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::schema::user;
use crate::Connection;

#[derive(Clone, Debug, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::user)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserRecord {
    pub id: i32,
    pub username: String,
    pub password: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn create<'a>(username: &'a str, password: &'a str, name: &'a str) -> CreateUserRecord<'a> {
        CreateUserRecord::new(username, password, name)
    }

    pub async fn read(id: i32, conn: &mut Connection) -> QueryResult<UserRecord> {
        user::table.find(id).get_result(conn).await
    }

    pub async fn find_by_username(
        username: &str,
        conn: &mut Connection,
    ) -> QueryResult<Option<UserRecord>> {
        user::table
            .filter(user::username.eq(username))
            .first(conn)
            .await
            .optional()
    }
}

impl AuthUser for UserRecord {
    type Id = i32;

    fn id(&self) -> Self::Id {
        self.id
    }

    // The hash doubles as the session auth value so a password change
    // invalidates existing sessions.
    fn session_auth_hash(&self) -> &[u8] {
        self.password.as_bytes()
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::user)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CreateUserRecord<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub name: &'a str,
    pub created_at: DateTime<Utc>,
}

impl<'a> CreateUserRecord<'a> {
    pub fn new(username: &'a str, password: &'a str, name: &'a str) -> CreateUserRecord<'a> {
        Self {
            username,
            password,
            name,
            created_at: Utc::now(),
        }
    }

    pub async fn save(&self, conn: &mut Connection) -> QueryResult<UserRecord> {
        diesel::insert_into(crate::schema::user::table)
            .values(self)
            .returning(crate::schema::user::table::all_columns())
            .get_result(conn)
            .await
    }
}
