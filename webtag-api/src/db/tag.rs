use diesel::prelude::*;
use diesel_async::{AsyncPgConnection as Connection, RunQueryDsl};
use itertools::Itertools;
use uuid::Uuid;

use super::bookmark::Bookmark;
use crate::utils::DatabaseResult;
use webtag_types::schema::{bookmark_tags, bookmarks, tags};
use webtag_types::Summary;

#[derive(Queryable, Selectable, Identifiable, PartialEq, Eq, Debug, Clone)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

#[derive(
    Insertable,
    Identifiable,
    Selectable,
    Queryable,
    Associations,
    PartialEq,
    Eq,
    Hash,
    Debug,
    Clone,
)]
#[diesel(belongs_to(Bookmark))]
#[diesel(belongs_to(Tag))]
#[diesel(table_name = bookmark_tags)]
#[diesel(primary_key(bookmark_id, tag_id))]
pub struct BookmarkTag {
    pub bookmark_id: i32,
    pub tag_id: i32,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = tags)]
pub struct NewTag<'a> {
    pub name: &'a str,
}

impl Tag {
    pub fn summary(self) -> Summary {
        Summary {
            id: self.id,
            name: self.name,
        }
    }

    pub fn into_response(self) -> webtag_types::Tag {
        webtag_types::Tag {
            id: self.id,
            name: self.name,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Tags are shared by every owner, so a known name resolves to the existing
/// row (touching its `updated_at`) instead of conflicting.
///
/// Names are inserted sorted and deduplicated, so concurrent callers lock the
/// shared rows in the same order.
pub async fn get_or_create_tags(
    conn: &mut Connection,
    names: &[&str],
) -> DatabaseResult<Vec<Tag>> {
    use diesel::dsl::now;

    if names.is_empty() {
        return Ok(vec![]);
    }
    let new_tags = names
        .iter()
        .sorted()
        .dedup()
        .map(|&name| NewTag { name })
        .collect_vec();

    Ok(diesel::insert_into(tags::table)
        .values(&new_tags)
        .on_conflict(tags::name)
        .do_update()
        .set(tags::updated_at.eq(now))
        .returning(Tag::as_returning())
        .get_results(conn)
        .await?)
}

pub async fn get_tags_by_name(conn: &mut Connection, names: &[&str]) -> DatabaseResult<Vec<Tag>> {
    Ok(tags::table
        .filter(tags::name.eq_any(names.to_vec()))
        .select(Tag::as_select())
        .load(conn)
        .await?)
}

pub async fn list_tags(conn: &mut Connection) -> DatabaseResult<Vec<Tag>> {
    Ok(tags::table
        .select(Tag::as_select())
        .order_by(tags::name.asc())
        .load(conn)
        .await?)
}

/// Distinct tags on the owner's bookmarks, most recently attached first.
pub async fn tags_in_use(conn: &mut Connection, owner: Uuid) -> DatabaseResult<Vec<Tag>> {
    let rows: Vec<Tag> = bookmark_tags::table
        .inner_join(bookmarks::table)
        .inner_join(tags::table)
        .filter(bookmarks::created_by.eq(owner))
        .order_by(bookmark_tags::created_at.desc())
        .select(Tag::as_select())
        .load(conn)
        .await?;

    Ok(rows.into_iter().unique_by(|t| t.id).collect())
}

pub async fn tags_of_bookmark(
    conn: &mut Connection,
    owner: Uuid,
    bookmark_id: i32,
) -> DatabaseResult<Vec<Tag>> {
    Ok(bookmark_tags::table
        .inner_join(bookmarks::table)
        .inner_join(tags::table)
        .filter(bookmarks::created_by.eq(owner))
        .filter(bookmark_tags::bookmark_id.eq(bookmark_id))
        .order_by(tags::name.asc())
        .select(Tag::as_select())
        .load(conn)
        .await?)
}

pub async fn get_tags_per_bookmark(
    conn: &mut Connection,
    bookmarks: &[Bookmark],
) -> DatabaseResult<Vec<Vec<Tag>>> {
    let tags = BookmarkTag::belonging_to(bookmarks)
        .inner_join(tags::table)
        .order_by(tags::name.asc())
        .select((BookmarkTag::as_select(), Tag::as_select()))
        .load(conn)
        .await?;

    Ok(tags
        .grouped_by(bookmarks)
        .into_iter()
        .map(|tags| tags.into_iter().map(|(_, tag)| tag).collect())
        .collect())
}
