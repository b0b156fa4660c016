// ORM Models
pub mod bookmark;
pub mod folder;
pub mod tag;

// Bookmark save path
pub mod reconcile;

// Dashboard queries
pub mod filter;

// Driver
pub mod connection;

use diesel_async::AsyncPgConnection as Connection;
use itertools::izip;

use crate::utils::DatabaseResult;
use bookmark::Bookmark;
use folder::Folder;
use tag::Tag;

/// Attaches tags and folders to each bookmark, keeping the input order.
pub async fn load_details(
    conn: &mut Connection,
    bookmarks: Vec<Bookmark>,
) -> DatabaseResult<Vec<(Bookmark, Vec<Tag>, Vec<Folder>)>> {
    let tags = tag::get_tags_per_bookmark(conn, &bookmarks).await?;
    let folders = folder::get_folders_per_bookmark(conn, &bookmarks).await?;

    Ok(izip!(bookmarks, tags, folders).collect())
}
