use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::model::{GroupRecord, UserRecord};
use crate::pagination::Pager;
use crate::schema::{follow, groups, post, user};
use crate::Connection;

/// A post joined with its author and (optional) group, the shape every
/// listing and detail template consumes.
#[derive(Clone, Debug)]
pub struct Post {
    pub id: i32,
    pub author: UserRecord,
    pub group: Option<GroupRecord>,
    pub text: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

type Row = (PostRecord, UserRecord, Option<GroupRecord>);

impl Post {
    fn from_row((record, author, group): Row) -> Self {
        Self {
            id: record.id,
            author,
            group,
            text: record.text,
            image: record.image,
            created_at: record.created_at,
        }
    }

    pub async fn find(id: i32, conn: &mut Connection) -> QueryResult<Self> {
        let row: Row = post::table
            .inner_join(user::table)
            .left_join(groups::table)
            .filter(post::id.eq(id))
            .select((
                PostRecord::as_select(),
                UserRecord::as_select(),
                Option::<GroupRecord>::as_select(),
            ))
            .first(conn)
            .await?;

        Ok(Self::from_row(row))
    }

    pub async fn page_all(pager: &Pager, conn: &mut Connection) -> QueryResult<Vec<Self>> {
        let rows: Vec<Row> = post::table
            .inner_join(user::table)
            .left_join(groups::table)
            .order((post::created_at.desc(), post::id.desc()))
            .limit(pager.limit())
            .offset(pager.offset())
            .select((
                PostRecord::as_select(),
                UserRecord::as_select(),
                Option::<GroupRecord>::as_select(),
            ))
            .load(conn)
            .await?;

        Ok(rows.into_iter().map(Self::from_row).collect())
    }

    pub async fn page_for_group(
        group_id: i32,
        pager: &Pager,
        conn: &mut Connection,
    ) -> QueryResult<Vec<Self>> {
        let rows: Vec<Row> = post::table
            .inner_join(user::table)
            .left_join(groups::table)
            .filter(post::group_id.eq(group_id))
            .order((post::created_at.desc(), post::id.desc()))
            .limit(pager.limit())
            .offset(pager.offset())
            .select((
                PostRecord::as_select(),
                UserRecord::as_select(),
                Option::<GroupRecord>::as_select(),
            ))
            .load(conn)
            .await?;

        Ok(rows.into_iter().map(Self::from_row).collect())
    }

    pub async fn page_for_author(
        author_id: i32,
        pager: &Pager,
        conn: &mut Connection,
    ) -> QueryResult<Vec<Self>> {
        let rows: Vec<Row> = post::table
            .inner_join(user::table)
            .left_join(groups::table)
            .filter(post::author_id.eq(author_id))
            .order((post::created_at.desc(), post::id.desc()))
            .limit(pager.limit())
            .offset(pager.offset())
            .select((
                PostRecord::as_select(),
                UserRecord::as_select(),
                Option::<GroupRecord>::as_select(),
            ))
            .load(conn)
            .await?;

        Ok(rows.into_iter().map(Self::from_row).collect())
    }

    /// Posts by every author the given user follows.
    pub async fn page_for_feed(
        user_id: i32,
        pager: &Pager,
        conn: &mut Connection,
    ) -> QueryResult<Vec<Self>> {
        let followed = follow::table
            .filter(follow::user_id.eq(user_id))
            .select(follow::author_id);

        let rows: Vec<Row> = post::table
            .inner_join(user::table)
            .left_join(groups::table)
            .filter(post::author_id.eq_any(followed))
            .order((post::created_at.desc(), post::id.desc()))
            .limit(pager.limit())
            .offset(pager.offset())
            .select((
                PostRecord::as_select(),
                UserRecord::as_select(),
                Option::<GroupRecord>::as_select(),
            ))
            .load(conn)
            .await?;

        Ok(rows.into_iter().map(Self::from_row).collect())
    }

    pub async fn count_all(conn: &mut Connection) -> QueryResult<i64> {
        post::table.count().get_result(conn).await
    }

    pub async fn count_for_group(group_id: i32, conn: &mut Connection) -> QueryResult<i64> {
        post::table
            .filter(post::group_id.eq(group_id))
            .count()
            .get_result(conn)
            .await
    }

    pub async fn count_for_author(author_id: i32, conn: &mut Connection) -> QueryResult<i64> {
        post::table
            .filter(post::author_id.eq(author_id))
            .count()
            .get_result(conn)
            .await
    }

    pub async fn count_for_feed(user_id: i32, conn: &mut Connection) -> QueryResult<i64> {
        let followed = follow::table
            .filter(follow::user_id.eq(user_id))
            .select(follow::author_id);

        post::table
            .filter(post::author_id.eq_any(followed))
            .count()
            .get_result(conn)
            .await
    }
}

#[derive(Clone, Debug, Queryable, Identifiable, Selectable, Associations)]
#[diesel(table_name = crate::schema::post)]
#[diesel(belongs_to(UserRecord, foreign_key = author_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PostRecord {
    pub id: i32,
    pub author_id: i32,
    pub group_id: Option<i32>,
    pub text: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PostRecord {
    pub fn create(author_id: i32, text: &str) -> CreatePostRecord<'_> {
        CreatePostRecord::new(author_id, text)
    }

    pub async fn read(id: i32, conn: &mut Connection) -> QueryResult<PostRecord> {
        post::table.find(id).get_result(conn).await
    }

    pub fn update(&self) -> UpdatePostRecord<'_> {
        UpdatePostRecord::new(self.id)
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::post)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CreatePostRecord<'a> {
    pub author_id: i32,
    pub group_id: Option<i32>,
    pub text: &'a str,
    pub image: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

impl<'a> CreatePostRecord<'a> {
    pub fn new(author_id: i32, text: &'a str) -> CreatePostRecord<'a> {
        Self {
            author_id,
            group_id: None,
            text,
            image: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_group(self, group_id: Option<i32>) -> Self {
        Self { group_id, ..self }
    }

    pub fn with_image(self, image: Option<&'a str>) -> Self {
        Self { image, ..self }
    }

    pub async fn save(&self, conn: &mut Connection) -> QueryResult<PostRecord> {
        diesel::insert_into(crate::schema::post::table)
            .values(self)
            .returning(crate::schema::post::table::all_columns())
            .get_result(conn)
            .await
    }
}

#[derive(Debug, Default, Identifiable, AsChangeset)]
#[diesel(table_name = crate::schema::post)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UpdatePostRecord<'a> {
    pub id: i32,
    pub text: Option<&'a str>,
    // Outer None leaves the column alone, Some(None) clears it.
    pub group_id: Option<Option<i32>>,
    pub image: Option<&'a str>,
}

impl<'a> UpdatePostRecord<'a> {
    pub fn new(id: i32) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn with_text(self, text: &'a str) -> Self {
        Self {
            text: Some(text),
            ..self
        }
    }

    pub fn with_group(self, group_id: Option<i32>) -> Self {
        Self {
            group_id: Some(group_id),
            ..self
        }
    }

    pub fn with_image(self, image: &'a str) -> Self {
        Self {
            image: Some(image),
            ..self
        }
    }

    pub async fn save(&self, conn: &mut Connection) -> QueryResult<PostRecord> {
        diesel::update(self)
            .set(self)
            .returning(crate::schema::post::all_columns)
            .get_result(conn)
            .await
    }
}
