use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::schema::groups;
use crate::Connection;

#[derive(Clone, Debug, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::groups)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GroupRecord {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl GroupRecord {
    pub fn create<'a>(title: &'a str, slug: &'a str, description: &'a str) -> CreateGroupRecord<'a> {
        CreateGroupRecord {
            title,
            slug,
            description,
        }
    }

    pub async fn find_by_slug(slug: &str, conn: &mut Connection) -> QueryResult<Option<GroupRecord>> {
        groups::table
            .filter(groups::slug.eq(slug))
            .first(conn)
            .await
            .optional()
    }

    /// All groups, for the post form's select box.
    pub async fn list(conn: &mut Connection) -> QueryResult<Vec<GroupRecord>> {
        groups::table.order(groups::title.asc()).load(conn).await
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::groups)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CreateGroupRecord<'a> {
    pub title: &'a str,
    pub slug: &'a str,
    pub description: &'a str,
}

impl CreateGroupRecord<'_> {
    pub async fn save(&self, conn: &mut Connection) -> QueryResult<GroupRecord> {
        diesel::insert_into(crate::schema::groups::table)
            .values(self)
            .returning(crate::schema::groups::table::all_columns())
            .get_result(conn)
            .await
    }
}
