use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::model::UserRecord;
use crate::schema::{comment, user};
use crate::Connection;

#[derive(Clone, Debug)]
pub struct Comment {
    pub id: i32,
    pub author: UserRecord,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    fn from_row((record, author): (CommentRecord, UserRecord)) -> Self {
        Self {
            id: record.id,
            author,
            text: record.text,
            created_at: record.created_at,
        }
    }

    /// Comments on a post, oldest first.
    pub async fn list_for_post(post_id: i32, conn: &mut Connection) -> QueryResult<Vec<Self>> {
        let rows: Vec<(CommentRecord, UserRecord)> = comment::table
            .inner_join(user::table)
            .filter(comment::post_id.eq(post_id))
            .order((comment::created_at.asc(), comment::id.asc()))
            .select((CommentRecord::as_select(), UserRecord::as_select()))
            .load(conn)
            .await?;

        Ok(rows.into_iter().map(Self::from_row).collect())
    }
}

#[derive(Clone, Debug, Queryable, Identifiable, Selectable, Associations)]
#[diesel(table_name = crate::schema::comment)]
#[diesel(belongs_to(UserRecord, foreign_key = author_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CommentRecord {
    pub id: i32,
    pub post_id: i32,
    pub author_id: i32,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl CommentRecord {
    pub fn create(post_id: i32, author_id: i32, text: &str) -> CreateCommentRecord<'_> {
        CreateCommentRecord {
            post_id,
            author_id,
            text,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::comment)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CreateCommentRecord<'a> {
    pub post_id: i32,
    pub author_id: i32,
    pub text: &'a str,
    pub created_at: DateTime<Utc>,
}

impl CreateCommentRecord<'_> {
    pub async fn save(&self, conn: &mut Connection) -> QueryResult<CommentRecord> {
        diesel::insert_into(crate::schema::comment::table)
            .values(self)
            .returning(crate::schema::comment::table::all_columns())
            .get_result(conn)
            .await
    }
}
