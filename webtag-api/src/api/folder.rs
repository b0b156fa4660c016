use super::errors::Error;
use super::fairings::db::Db;
use super::guards::Owner;
use crate::db::folder::{self, Folder};

use rocket::serde::json::Json;
use rocket_db_pools::Connection;
use tracing::info;
use webtag_types::{CreateFolder, FolderCount, ModifyFolder};

/// Create a new folder
#[utoipa::path(
    post,
    path = "/api/folders/",
    request_body = CreateFolder,
    responses(
        (status = 200, description = "Folder created success", body = webtag_types::Folder),
        (status = 400, description = "Folder name is blank"),
        (status = 409, description = "Folder name already in use")
    )
)]
#[post("/", format = "application/json", data = "<payload>")]
pub async fn create_folder(
    mut db: Connection<Db>,
    owner: Owner,
    payload: Json<CreateFolder>,
) -> Result<Json<webtag_types::Folder>, Error> {
    let payload = payload.into_inner();
    let folder =
        folder::create_folder(&mut db, owner.0, &payload.name, payload.description.as_deref())
            .await?;
    info!(id = folder.id, name = folder.name, "folder created");
    Ok(Json(folder.into_response()))
}

/// List folders
#[utoipa::path(
    get,
    path = "/api/folders/",
    responses(
        (status = 200, description = "Folders listed success", body = Vec<webtag_types::Folder>)
    )
)]
#[get("/")]
pub async fn list_folders(
    mut db: Connection<Db>,
    owner: Owner,
) -> Result<Json<Vec<webtag_types::Folder>>, Error> {
    let folders = folder::list_folders(&mut db, owner.0).await?;
    Ok(Json(folders.into_iter().map(Folder::into_response).collect()))
}

/// List folders with the number of bookmarks in each
#[utoipa::path(
    get,
    path = "/api/folders/counts",
    responses(
        (status = 200, description = "Folders counted success", body = Vec<FolderCount>)
    )
)]
#[get("/counts")]
pub async fn count_folders(
    mut db: Connection<Db>,
    owner: Owner,
) -> Result<Json<Vec<FolderCount>>, Error> {
    Ok(Json(folder::list_folders_with_count(&mut db, owner.0).await?))
}

/// Get a folder
#[utoipa::path(
    get,
    path = "/api/folders/{id}",
    params(
        ("id" = inline(i32), Path, description = "The folder id"),
    ),
    responses(
        (status = 200, description = "Folder found", body = webtag_types::Folder),
        (status = 404, description = "Folder not found")
    )
)]
#[get("/<id>")]
pub async fn get_folder(
    mut db: Connection<Db>,
    owner: Owner,
    id: i32,
) -> Result<Json<webtag_types::Folder>, Error> {
    Folder::get(&mut db, owner.0, id)
        .await?
        .map(|f| Json(f.into_response()))
        .ok_or(Error::NotFound("Folder not found".to_string()))
}

/// Rename a folder
#[utoipa::path(
    put,
    path = "/api/folders/{id}",
    params(
        ("id" = inline(i32), Path, description = "The folder id to be updated"),
    ),
    request_body = ModifyFolder,
    responses(
        (status = 200, description = "Folder updated success", body = webtag_types::Folder),
        (status = 400, description = "Folder name is blank"),
        (status = 404, description = "Folder not found"),
        (status = 409, description = "Folder name already in use")
    )
)]
#[put("/<id>", format = "application/json", data = "<payload>")]
pub async fn update_folder(
    mut db: Connection<Db>,
    owner: Owner,
    id: i32,
    payload: Json<ModifyFolder>,
) -> Result<Json<webtag_types::Folder>, Error> {
    let payload = payload.into_inner();
    let folder = folder::update_folder(
        &mut db,
        owner.0,
        id,
        &payload.name,
        payload.description.as_deref(),
    )
    .await?;
    Ok(Json(folder.into_response()))
}

/// Delete a folder, keeping its bookmarks
#[utoipa::path(
    delete,
    path = "/api/folders/{id}",
    params(
        ("id" = inline(i32), Path, description = "The folder id to be deleted"),
    ),
    responses(
        (status = 200, description = "Folder deleted success"),
        (status = 404, description = "Folder not found")
    )
)]
#[delete("/<id>")]
pub async fn delete_folder(
    mut db: Connection<Db>,
    owner: Owner,
    id: i32,
) -> Result<&'static str, Error> {
    folder::delete_folder(&mut db, owner.0, id).await?;
    info!(id, "folder deleted");
    Ok("Deleted")
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        create_folder,
        list_folders,
        count_folders,
        get_folder,
        update_folder,
        delete_folder
    ]
}

pub(crate) mod misc {
    use super::*;

    use utoipa::OpenApi;

    #[derive(OpenApi)]
    #[openapi(
        info(title = "Folders API", description = "Folders API", version = "1.0"),
        paths(
            create_folder,
            list_folders,
            count_folders,
            get_folder,
            update_folder,
            delete_folder
        ),
        components(schemas(CreateFolder, ModifyFolder, webtag_types::Folder, FolderCount))
    )]
    pub struct ApiDoc;
}
