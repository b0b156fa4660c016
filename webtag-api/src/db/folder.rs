use diesel::prelude::*;
use diesel_async::{AsyncPgConnection as Connection, RunQueryDsl};
use uuid::Uuid;

use super::bookmark::Bookmark;
use crate::utils::{DatabaseError, DatabaseResult};
use webtag_types::schema::{bookmark_folders, bookmarks, folders};
use webtag_types::{FolderCount, Summary};

#[derive(Queryable, Selectable, Identifiable, PartialEq, Eq, Debug, Clone)]
#[diesel(table_name = folders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Folder {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub created_by: Uuid,
    pub is_public: bool,
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
#[diesel(belongs_to(Folder))]
#[diesel(table_name = bookmark_folders)]
#[diesel(primary_key(bookmark_id, folder_id))]
pub struct BookmarkFolder {
    pub bookmark_id: i32,
    pub folder_id: i32,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = folders)]
pub struct NewFolder<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub created_by: Uuid,
}

impl Folder {
    pub async fn get(conn: &mut Connection, owner: Uuid, id: i32) -> DatabaseResult<Option<Self>> {
        Ok(folders::table
            .find(id)
            .filter(folders::created_by.eq(owner))
            .select(Self::as_select())
            .first(conn)
            .await
            .optional()?)
    }

    pub fn summary(self) -> Summary {
        Summary {
            id: self.id,
            name: self.name,
        }
    }

    pub fn into_response(self) -> webtag_types::Folder {
        webtag_types::Folder {
            id: self.id,
            name: self.name,
            description: self.description,
            is_public: self.is_public,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

fn normalize_name(name: &str) -> DatabaseResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DatabaseError::ValidationError(
            "folder name must not be empty".to_string(),
        ));
    }
    Ok(name)
}

pub async fn create_folder(
    conn: &mut Connection,
    owner: Uuid,
    name: &str,
    description: Option<&str>,
) -> DatabaseResult<Folder> {
    let name = normalize_name(name)?;
    Ok(diesel::insert_into(folders::table)
        .values(&NewFolder {
            name,
            description: description.unwrap_or_default(),
            created_by: owner,
        })
        .returning(Folder::as_returning())
        .get_result(conn)
        .await?)
}

/// Inserts one folder per name, in one statement. A name the owner already
/// uses fails the whole batch with a conflict.
pub async fn create_folders(
    conn: &mut Connection,
    owner: Uuid,
    names: &[&str],
) -> DatabaseResult<Vec<Folder>> {
    if names.is_empty() {
        return Ok(vec![]);
    }
    let new_folders = names
        .iter()
        .map(|&name| NewFolder {
            name,
            description: "",
            created_by: owner,
        })
        .collect::<Vec<_>>();

    Ok(diesel::insert_into(folders::table)
        .values(&new_folders)
        .returning(Folder::as_returning())
        .get_results(conn)
        .await?)
}

pub async fn update_folder(
    conn: &mut Connection,
    owner: Uuid,
    id: i32,
    name: &str,
    description: Option<&str>,
) -> DatabaseResult<Folder> {
    use diesel::dsl::now;

    let name = normalize_name(name)?;
    let target = folders::table
        .find(id)
        .filter(folders::created_by.eq(owner));

    let rv = match description {
        Some(description) => {
            diesel::update(target)
                .set((
                    folders::name.eq(name),
                    folders::description.eq(description),
                    folders::updated_at.eq(now),
                ))
                .returning(Folder::as_returning())
                .get_result(conn)
                .await
        }
        None => {
            diesel::update(target)
                .set((folders::name.eq(name), folders::updated_at.eq(now)))
                .returning(Folder::as_returning())
                .get_result(conn)
                .await
        }
    };

    rv.optional()?
        .ok_or_else(|| DatabaseError::not_found("folder", id))
}

/// Deletes an owner's folder; bookmarks in it lose only the association.
pub async fn delete_folder(conn: &mut Connection, owner: Uuid, id: i32) -> DatabaseResult<()> {
    let deleted = diesel::delete(
        folders::table
            .find(id)
            .filter(folders::created_by.eq(owner)),
    )
    .execute(conn)
    .await?;

    if deleted == 0 {
        return Err(DatabaseError::not_found("folder", id));
    }
    Ok(())
}

pub async fn list_folders(conn: &mut Connection, owner: Uuid) -> DatabaseResult<Vec<Folder>> {
    Ok(folders::table
        .filter(folders::created_by.eq(owner))
        .order_by(folders::name.asc())
        .select(Folder::as_select())
        .load(conn)
        .await?)
}

/// Returns the subset of `ids` naming folders that belong to `owner`.
pub async fn owned_folder_ids(
    conn: &mut Connection,
    owner: Uuid,
    ids: &[i32],
) -> DatabaseResult<Vec<i32>> {
    Ok(folders::table
        .filter(folders::id.eq_any(ids.to_vec()))
        .filter(folders::created_by.eq(owner))
        .select(folders::id)
        .load(conn)
        .await?)
}

pub async fn list_folders_with_count(
    conn: &mut Connection,
    owner: Uuid,
) -> DatabaseResult<Vec<FolderCount>> {
    use diesel::dsl::count;

    let rows: Vec<(i32, String, i64)> = folders::table
        .left_join(bookmark_folders::table)
        .filter(folders::created_by.eq(owner))
        .group_by((folders::id, folders::name))
        .select((
            folders::id,
            folders::name,
            count(bookmark_folders::bookmark_id.nullable()),
        ))
        .order_by(folders::name.asc())
        .load(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(id, name, bookmark_count)| FolderCount {
            id,
            name,
            bookmark_count,
        })
        .collect())
}

pub async fn folders_of_bookmark(
    conn: &mut Connection,
    owner: Uuid,
    bookmark_id: i32,
) -> DatabaseResult<Vec<Folder>> {
    Ok(bookmark_folders::table
        .inner_join(bookmarks::table)
        .inner_join(folders::table)
        .filter(bookmarks::created_by.eq(owner))
        .filter(folders::created_by.eq(owner))
        .filter(bookmark_folders::bookmark_id.eq(bookmark_id))
        .order_by(folders::name.asc())
        .select(Folder::as_select())
        .load(conn)
        .await?)
}

pub async fn get_folders_per_bookmark(
    conn: &mut Connection,
    bookmarks: &[Bookmark],
) -> DatabaseResult<Vec<Vec<Folder>>> {
    let folders = BookmarkFolder::belonging_to(bookmarks)
        .inner_join(folders::table)
        .order_by(folders::name.asc())
        .select((BookmarkFolder::as_select(), Folder::as_select()))
        .load(conn)
        .await?;

    Ok(folders
        .grouped_by(bookmarks)
        .into_iter()
        .map(|folders| folders.into_iter().map(|(_, folder)| folder).collect())
        .collect())
}

#[cfg(test)]
pub(crate) mod test {
    use super::super::bookmark::test::create_rand_bookmark;
    use super::super::connection::test as connection;
    use super::*;
    use crate::utils::rand::rand_str;

    use tracing::info;

    pub async fn attach(conn: &mut Connection, bookmark_id: i32, folders: &[&Folder]) {
        let rows = folders
            .iter()
            .map(|f| BookmarkFolder {
                bookmark_id,
                folder_id: f.id,
            })
            .collect::<Vec<_>>();
        diesel::insert_into(bookmark_folders::table)
            .values(&rows)
            .execute(conn)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn create_new_folder() {
        let mut conn = connection::establish().await;
        let owner = Uuid::new_v4();

        let name = rand_str(10);
        let rv = create_folder(&mut conn, owner, &format!("  {}  ", name), None).await;
        info!(?rv, "create_folder returns");
        let folder = rv.unwrap();
        assert_eq!(folder.name, name);
        assert_eq!(folder.description, "");

        let rv = create_folder(&mut conn, owner, &name, Some("again")).await;
        info!(?rv, "create_folder returns");
        assert!(matches!(
            rv.unwrap_err(),
            DatabaseError::ConflictError { .. }
        ));

        // names are unique per owner only
        let rv = create_folder(&mut conn, Uuid::new_v4(), &name, None).await;
        assert!(rv.is_ok());

        let rv = create_folder(&mut conn, owner, "   ", None).await;
        assert!(matches!(
            rv.unwrap_err(),
            DatabaseError::ValidationError(_)
        ));
    }

    #[tokio::test]
    async fn update_and_delete_folder() {
        let mut conn = connection::establish().await;
        let owner = Uuid::new_v4();
        let folder = create_folder(&mut conn, owner, &rand_str(10), Some("before"))
            .await
            .unwrap();

        let renamed = rand_str(10);
        let updated = update_folder(&mut conn, owner, folder.id, &renamed, None)
            .await
            .unwrap();
        assert_eq!(updated.name, renamed);
        assert_eq!(updated.description, "before");

        let updated = update_folder(&mut conn, owner, folder.id, &renamed, Some("after"))
            .await
            .unwrap();
        assert_eq!(updated.description, "after");

        let rv = update_folder(&mut conn, Uuid::new_v4(), folder.id, "stolen", None).await;
        assert!(matches!(rv, Err(DatabaseError::NotFoundError { .. })));

        let rv = delete_folder(&mut conn, Uuid::new_v4(), folder.id).await;
        assert!(matches!(rv, Err(DatabaseError::NotFoundError { .. })));

        delete_folder(&mut conn, owner, folder.id).await.unwrap();
        assert!(Folder::get(&mut conn, owner, folder.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn folder_counts_and_membership() {
        let mut conn = connection::establish().await;
        let owner = Uuid::new_v4();

        let (a, b) = (rand_str(8), rand_str(8));
        let folders = create_folders(&mut conn, owner, &[a.as_str(), b.as_str()])
            .await
            .unwrap();
        assert_eq!(folders.len(), 2);
        let (full, empty) = (&folders[0], &folders[1]);

        let first = create_rand_bookmark(&mut conn, owner).await;
        let second = create_rand_bookmark(&mut conn, owner).await;
        attach(&mut conn, first.id, &[full]).await;
        attach(&mut conn, second.id, &[full]).await;

        let counts = list_folders_with_count(&mut conn, owner).await.unwrap();
        assert_eq!(counts.len(), 2);
        let count_of = |id: i32| {
            counts
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.bookmark_count)
        };
        assert_eq!(count_of(full.id), Some(2));
        assert_eq!(count_of(empty.id), Some(0));

        let of_first = folders_of_bookmark(&mut conn, owner, first.id).await.unwrap();
        assert_eq!(of_first, vec![full.clone()]);

        // deleting the folder cascades to the association only
        delete_folder(&mut conn, owner, full.id).await.unwrap();
        let of_first = folders_of_bookmark(&mut conn, owner, first.id).await.unwrap();
        assert!(of_first.is_empty());
        let still_there = super::super::bookmark::Bookmark::get(&mut conn, owner, first.id)
            .await
            .unwrap();
        assert!(still_there.is_some());
    }

    #[tokio::test]
    async fn owned_ids_filter_foreign_folders() {
        let mut conn = connection::establish().await;
        let owner = Uuid::new_v4();
        let mine = create_folder(&mut conn, owner, &rand_str(8), None)
            .await
            .unwrap();
        let theirs = create_folder(&mut conn, Uuid::new_v4(), &rand_str(8), None)
            .await
            .unwrap();

        let owned = owned_folder_ids(&mut conn, owner, &[mine.id, theirs.id])
            .await
            .unwrap();
        assert_eq!(owned, vec![mine.id]);
    }
}
