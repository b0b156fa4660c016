//! Saving a bookmark together with its folders and tags.
//!
//! Both create and update run in a single transaction and leave the junction
//! tables holding exactly the requested associations. Folders and tags that a
//! caller names instead of referencing by id are created on the way. Update
//! replaces the whole association set: whatever the payload omits is detached.

use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection as Connection, RunQueryDsl};
use itertools::Itertools;
use tracing::{debug, info};
use uuid::Uuid;

use super::bookmark::{self, Bookmark, ModifyBookmark, NewBookmark};
use super::folder::{self, BookmarkFolder};
use super::tag::{self, BookmarkTag};
use crate::utils::{DatabaseError, DatabaseResult};
use webtag_types::schema::{bookmark_folders, bookmark_tags};
use webtag_types::{BookmarkFields, BookmarkPayload, Reference};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolved<'a> {
    Existing(i32),
    New(&'a str),
}

fn resolve<'a>(kind: &str, references: &'a [Reference]) -> DatabaseResult<Vec<Resolved<'a>>> {
    references
        .iter()
        .map(|r| match (r.id, r.name.as_deref().map(str::trim)) {
            (Some(id), _) => Ok(Resolved::Existing(id)),
            (None, Some(name)) if !name.is_empty() => Ok(Resolved::New(name)),
            _ => Err(DatabaseError::ValidationError(format!(
                "{} reference needs an id or a name",
                kind
            ))),
        })
        .collect()
}

fn existing_ids(resolved: &[Resolved]) -> Vec<i32> {
    resolved
        .iter()
        .filter_map(|r| match r {
            Resolved::Existing(id) => Some(*id),
            Resolved::New(_) => None,
        })
        .unique()
        .collect()
}

fn new_names<'a>(resolved: &[Resolved<'a>]) -> Vec<&'a str> {
    resolved
        .iter()
        .filter_map(|r| match r {
            Resolved::Existing(_) => None,
            Resolved::New(name) => Some(*name),
        })
        .collect()
}

/// A validated payload. Building one touches no storage, so every
/// validation error is reported before a transaction begins.
#[derive(Debug)]
struct Plan<'a> {
    fields: &'a BookmarkFields,
    folders: Vec<Resolved<'a>>,
    tags: Vec<Resolved<'a>>,
}

impl<'a> Plan<'a> {
    fn new(payload: &'a BookmarkPayload) -> DatabaseResult<Self> {
        let fields = &payload.bookmark;
        if fields.name.trim().is_empty() {
            return Err(DatabaseError::ValidationError(
                "bookmark name must not be empty".to_string(),
            ));
        }
        if fields.url.trim().is_empty() {
            return Err(DatabaseError::ValidationError(
                "bookmark url must not be empty".to_string(),
            ));
        }

        let folders = resolve("folder", &payload.folders)?;
        let tags = resolve("tag", &payload.tags)?;

        // one upsert statement cannot create the same tag twice
        if !new_names(&tags).into_iter().all_unique() {
            return Err(DatabaseError::conflict("tags"));
        }

        Ok(Self {
            fields,
            folders,
            tags,
        })
    }

    fn changes(&self) -> ModifyBookmark<'a> {
        let fields = self.fields;
        ModifyBookmark {
            name: &fields.name,
            url: &fields.url,
            description: &fields.description,
            is_public: fields.is_public,
        }
    }
}

async fn resolve_folders(
    conn: &mut Connection,
    owner: Uuid,
    resolved: &[Resolved<'_>],
) -> DatabaseResult<Vec<i32>> {
    let existing = existing_ids(resolved);
    if !existing.is_empty() {
        let owned = folder::owned_folder_ids(conn, owner, &existing).await?;
        if owned.len() != existing.len() {
            debug!(?existing, ?owned, "folder reference outside owner scope");
            return Err(DatabaseError::ReferenceError {
                table: "folders".to_string(),
            });
        }
    }

    let created = folder::create_folders(conn, owner, &new_names(resolved)).await?;
    if !created.is_empty() {
        info!(folders = ?created.iter().map(|f| f.id).collect_vec(), "folders created");
    }

    Ok(existing
        .into_iter()
        .chain(created.into_iter().map(|f| f.id))
        .collect())
}

async fn resolve_tags(
    conn: &mut Connection,
    resolved: &[Resolved<'_>],
) -> DatabaseResult<Vec<i32>> {
    let named = tag::get_or_create_tags(conn, &new_names(resolved)).await?;

    Ok(existing_ids(resolved)
        .into_iter()
        .chain(named.into_iter().map(|t| t.id))
        .unique()
        .collect())
}

async fn associate(
    conn: &mut Connection,
    owner: Uuid,
    bookmark_id: i32,
    plan: &Plan<'_>,
) -> DatabaseResult<()> {
    let folder_ids = resolve_folders(conn, owner, &plan.folders).await?;
    let tag_ids = resolve_tags(conn, &plan.tags).await?;
    debug!(bookmark_id, ?folder_ids, ?tag_ids, "associating");

    let bookmark_folders = folder_ids
        .into_iter()
        .map(|folder_id| BookmarkFolder {
            bookmark_id,
            folder_id,
        })
        .collect_vec();
    if !bookmark_folders.is_empty() {
        diesel::insert_into(bookmark_folders::table)
            .values(&bookmark_folders)
            .execute(conn)
            .await?;
    }

    let bookmark_tags = tag_ids
        .into_iter()
        .map(|tag_id| BookmarkTag {
            bookmark_id,
            tag_id,
        })
        .collect_vec();
    if !bookmark_tags.is_empty() {
        diesel::insert_into(bookmark_tags::table)
            .values(&bookmark_tags)
            .execute(conn)
            .await?;
    }

    Ok(())
}

async fn detach_all(conn: &mut Connection, bookmark_id: i32) -> DatabaseResult<()> {
    let folders = diesel::delete(
        bookmark_folders::table.filter(bookmark_folders::bookmark_id.eq(bookmark_id)),
    )
    .execute(conn)
    .await?;
    let tags = diesel::delete(
        bookmark_tags::table.filter(bookmark_tags::bookmark_id.eq(bookmark_id)),
    )
    .execute(conn)
    .await?;
    debug!(bookmark_id, folders, tags, "associations detached");
    Ok(())
}

/// Creates a bookmark owned by `owner` with the given folders and tags,
/// returning its id.
pub async fn create_bookmark(
    conn: &mut Connection,
    owner: Uuid,
    payload: &BookmarkPayload,
) -> DatabaseResult<i32> {
    let plan = Plan::new(payload)?;

    let id = conn
        .transaction::<_, DatabaseError, _>(|conn| {
            async move {
                let fields = plan.fields;
                let m = bookmark::create_bookmark(
                    conn,
                    &NewBookmark {
                        name: &fields.name,
                        url: &fields.url,
                        description: &fields.description,
                        is_public: fields.is_public,
                        created_by: owner,
                    },
                )
                .await?;

                associate(conn, owner, m.id, &plan).await?;
                Ok(m.id)
            }
            .scope_boxed()
        })
        .await?;

    info!(id, ?owner, "bookmark created");
    Ok(id)
}

/// Overwrites the fields of bookmark `id` and replaces its folder and tag
/// sets with the ones in `payload`.
pub async fn update_bookmark(
    conn: &mut Connection,
    owner: Uuid,
    id: i32,
    payload: &BookmarkPayload,
) -> DatabaseResult<()> {
    let plan = Plan::new(payload)?;

    conn.transaction::<_, DatabaseError, _>(|conn| {
        async move {
            Bookmark::get(conn, owner, id)
                .await?
                .ok_or_else(|| DatabaseError::not_found("bookmark", id))?;

            bookmark::update_bookmark(conn, owner, id, &plan.changes())
                .await?
                .ok_or_else(|| DatabaseError::not_found("bookmark", id))?;

            detach_all(conn, id).await?;
            associate(conn, owner, id, &plan).await
        }
        .scope_boxed()
    })
    .await?;

    info!(id, ?owner, "bookmark updated");
    Ok(())
}
