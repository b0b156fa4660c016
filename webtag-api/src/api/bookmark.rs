use super::errors::Error;
use super::fairings::db::Db;
use super::guards::Owner;
use crate::db::filter::{self, Access, BookmarkFilter};
use crate::db::{bookmark, folder, reconcile, tag};

use rocket::serde::json::{self, Json};
use rocket_db_pools::Connection;
use tracing::debug;
use webtag_types::{Bookmark, BookmarkPayload, Created, Summary};

/// A body that does not deserialize is a bad request, like any other invalid payload.
fn parse_payload(
    payload: Result<Json<BookmarkPayload>, json::Error<'_>>,
) -> Result<BookmarkPayload, Error> {
    match payload {
        Ok(payload) => Ok(payload.into_inner()),
        Err(e) => {
            debug!(error = %e, "malformed bookmark payload");
            Err(Error::BadRequest(format!("invalid payload: {}", e)))
        }
    }
}

/// Create a new bookmark
#[utoipa::path(
    post,
    path = "/api/bookmarks/",
    request_body = BookmarkPayload,
    responses(
        (status = 200, description = "Bookmark created success", body = Created),
        (status = 400, description = "Invalid payload or unknown folder/tag reference"),
        (status = 409, description = "Duplicate bookmark url or folder name")
    )
)]
#[post("/", format = "application/json", data = "<payload>")]
pub async fn create_bookmark(
    mut db: Connection<Db>,
    owner: Owner,
    payload: Result<Json<BookmarkPayload>, json::Error<'_>>,
) -> Result<Json<Created>, Error> {
    let payload = parse_payload(payload)?;
    let id = reconcile::create_bookmark(&mut db, owner.0, &payload).await?;
    Ok(Json(Created { id }))
}

/// Update a bookmark, replacing its folders and tags
#[utoipa::path(
    put,
    path = "/api/bookmarks/{id}",
    params(
        ("id" = inline(i32), Path, description = "The bookmark id to be updated")
    ),
    request_body = BookmarkPayload,
    responses(
        (status = 200, description = "Bookmark updated success"),
        (status = 400, description = "Invalid payload or unknown folder/tag reference"),
        (status = 404, description = "Bookmark not found"),
        (status = 409, description = "Duplicate bookmark url or folder name")
    )
)]
#[put("/<id>", format = "application/json", data = "<payload>")]
pub async fn update_bookmark(
    mut db: Connection<Db>,
    owner: Owner,
    id: i32,
    payload: Result<Json<BookmarkPayload>, json::Error<'_>>,
) -> Result<(), Error> {
    let payload = parse_payload(payload)?;
    reconcile::update_bookmark(&mut db, owner.0, id, &payload).await?;
    Ok(())
}

/// Delete a bookmark
#[utoipa::path(
    delete,
    path = "/api/bookmarks/{id}",
    params(
        ("id" = inline(i32), Path, description = "The bookmark id to be deleted")
    ),
    responses(
        (status = 200, description = "Bookmark deleted success"),
        (status = 404, description = "Bookmark not found")
    )
)]
#[delete("/<id>")]
pub async fn delete_bookmark(
    mut db: Connection<Db>,
    owner: Owner,
    id: i32,
) -> Result<&'static str, Error> {
    bookmark::delete_bookmark(&mut db, owner.0, id).await?;
    Ok("Deleted")
}

/// List bookmarks, newest first
#[utoipa::path(
    get,
    path = "/api/bookmarks/",
    params(
        ("folder_id" = inline(Option<i32>), Query,
            description = "Only bookmarks in this folder"),
        ("access" = inline(Option<String>), Query,
            description = "all (default), public or private"),
        ("tags" = inline(Option<Vec<i32>>), Query,
            description = "Only bookmarks carrying any of these tag ids")
    ),
    responses(
        (status = 200, description = "Bookmarks listed success", body = Vec<Bookmark>)
    )
)]
#[get("/?<folder_id>&<access>&<tags>")]
pub async fn list_bookmarks(
    mut db: Connection<Db>,
    owner: Owner,
    folder_id: Option<i32>,
    access: Option<Access>,
    tags: Vec<i32>,
) -> Result<Json<Vec<Bookmark>>, Error> {
    let filter = BookmarkFilter {
        folder_id,
        access: access.unwrap_or_default(),
        tags,
    };
    let rv = filter::filter_bookmarks(&mut db, owner.0, &filter).await?;
    debug!(count = rv.len(), "filter results");

    Ok(Json(
        rv.into_iter()
            .map(|(m, tags, folders)| m.into_response(tags, folders))
            .collect(),
    ))
}

/// Tags of one bookmark
#[utoipa::path(
    get,
    path = "/api/bookmarks/{id}/tags",
    params(
        ("id" = inline(i32), Path, description = "The bookmark id")
    ),
    responses(
        (status = 200, description = "Tags listed success", body = Vec<Summary>)
    )
)]
#[get("/<id>/tags")]
pub async fn bookmark_tags(
    mut db: Connection<Db>,
    owner: Owner,
    id: i32,
) -> Result<Json<Vec<Summary>>, Error> {
    let tags = tag::tags_of_bookmark(&mut db, owner.0, id).await?;
    Ok(Json(tags.into_iter().map(tag::Tag::summary).collect()))
}

/// Folders of one bookmark
#[utoipa::path(
    get,
    path = "/api/bookmarks/{id}/folders",
    params(
        ("id" = inline(i32), Path, description = "The bookmark id")
    ),
    responses(
        (status = 200, description = "Folders listed success", body = Vec<Summary>)
    )
)]
#[get("/<id>/folders")]
pub async fn bookmark_folders(
    mut db: Connection<Db>,
    owner: Owner,
    id: i32,
) -> Result<Json<Vec<Summary>>, Error> {
    let folders = folder::folders_of_bookmark(&mut db, owner.0, id).await?;
    Ok(Json(
        folders.into_iter().map(folder::Folder::summary).collect(),
    ))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        create_bookmark,
        update_bookmark,
        delete_bookmark,
        list_bookmarks,
        bookmark_tags,
        bookmark_folders
    ]
}

pub(crate) mod misc {
    use super::*;

    use utoipa::OpenApi;

    #[derive(OpenApi)]
    #[openapi(
        info(title = "Bookmarks API", description = "Bookmarks API", version = "1.0"),
        paths(
            create_bookmark,
            update_bookmark,
            delete_bookmark,
            list_bookmarks,
            bookmark_tags,
            bookmark_folders
        ),
        components(schemas(
            BookmarkPayload,
            webtag_types::BookmarkFields,
            webtag_types::Reference,
            Created,
            Bookmark,
            Summary
        ))
    )]
    pub struct ApiDoc;
}
