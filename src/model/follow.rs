use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::schema::follow;
use crate::Connection;

#[derive(Clone, Debug, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::follow)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FollowRecord {
    pub id: i32,
    pub user_id: i32,
    pub author_id: i32,
    pub created_at: DateTime<Utc>,
}

impl FollowRecord {
    /// Subscribe `user_id` to `author_id`. The unique index on the pair plus
    /// the conflict clause make repeated calls a no-op.
    pub async fn follow(user_id: i32, author_id: i32, conn: &mut Connection) -> QueryResult<usize> {
        diesel::insert_into(follow::table)
            .values(&CreateFollowRecord {
                user_id,
                author_id,
                created_at: Utc::now(),
            })
            .on_conflict((follow::user_id, follow::author_id))
            .do_nothing()
            .execute(conn)
            .await
    }

    /// Remove the subscription if it exists. Absence is not an error.
    pub async fn unfollow(
        user_id: i32,
        author_id: i32,
        conn: &mut Connection,
    ) -> QueryResult<usize> {
        diesel::delete(
            follow::table
                .filter(follow::user_id.eq(user_id))
                .filter(follow::author_id.eq(author_id)),
        )
        .execute(conn)
        .await
    }

    pub async fn exists(user_id: i32, author_id: i32, conn: &mut Connection) -> QueryResult<bool> {
        diesel::select(diesel::dsl::exists(
            follow::table
                .filter(follow::user_id.eq(user_id))
                .filter(follow::author_id.eq(author_id)),
        ))
        .get_result(conn)
        .await
    }

    pub async fn count_for_pair(
        user_id: i32,
        author_id: i32,
        conn: &mut Connection,
    ) -> QueryResult<i64> {
        follow::table
            .filter(follow::user_id.eq(user_id))
            .filter(follow::author_id.eq(author_id))
            .count()
            .get_result(conn)
            .await
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::follow)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CreateFollowRecord {
    pub user_id: i32,
    pub author_id: i32,
    pub created_at: DateTime<Utc>,
}
