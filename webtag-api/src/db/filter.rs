use diesel::prelude::*;
use diesel_async::{AsyncPgConnection as Connection, RunQueryDsl};
use rocket::FromFormField;
use tracing::debug;
use uuid::Uuid;

use super::bookmark::Bookmark;
use super::folder::Folder;
use super::tag::Tag;
use crate::utils::DatabaseResult;
use webtag_types::schema::{bookmark_folders, bookmark_tags, bookmarks};

#[derive(FromFormField, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    #[default]
    All,
    Public,
    Private,
}

#[derive(Debug, Default, Clone)]
pub struct BookmarkFilter {
    pub folder_id: Option<i32>,
    pub access: Access,
    /// Keeps bookmarks carrying any of these tag ids. Empty means no tag filter.
    pub tags: Vec<i32>,
}

/// The owner's bookmarks matching `filter`, newest first, with their tags and folders.
pub async fn filter_bookmarks(
    conn: &mut Connection,
    owner: Uuid,
    filter: &BookmarkFilter,
) -> DatabaseResult<Vec<(Bookmark, Vec<Tag>, Vec<Folder>)>> {
    debug!(?owner, ?filter, "filtering bookmarks");

    let mut query = bookmarks::table
        .filter(bookmarks::created_by.eq(owner))
        .select(Bookmark::as_select())
        .into_boxed();

    match filter.access {
        Access::All => {}
        Access::Public => query = query.filter(bookmarks::is_public.eq(true)),
        Access::Private => query = query.filter(bookmarks::is_public.eq(false)),
    }

    if let Some(folder_id) = filter.folder_id {
        query = query.filter(
            bookmarks::id.eq_any(
                bookmark_folders::table
                    .filter(bookmark_folders::folder_id.eq(folder_id))
                    .select(bookmark_folders::bookmark_id),
            ),
        );
    }

    if !filter.tags.is_empty() {
        query = query.filter(
            bookmarks::id.eq_any(
                bookmark_tags::table
                    .filter(bookmark_tags::tag_id.eq_any(filter.tags.clone()))
                    .select(bookmark_tags::bookmark_id),
            ),
        );
    }

    let rv = query
        .order_by((bookmarks::created_at.desc(), bookmarks::id.desc()))
        .load::<Bookmark>(conn)
        .await?;

    super::load_details(conn, rv).await
}
