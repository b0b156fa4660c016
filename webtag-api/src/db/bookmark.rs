use diesel::prelude::*;
use diesel_async::{AsyncPgConnection as Connection, RunQueryDsl};
use uuid::Uuid;

use super::folder::Folder;
use super::tag::Tag;
use crate::utils::{DatabaseError, DatabaseResult};
use webtag_types::schema::bookmarks;

#[derive(Queryable, Selectable, Identifiable, Hash, PartialEq, Eq, Debug, Clone)]
#[diesel(table_name = bookmarks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Bookmark {
    pub id: i32,
    pub name: String,
    pub url: String,
    pub description: String,
    pub is_public: bool,
    pub created_by: Uuid,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = bookmarks)]
pub struct NewBookmark<'a> {
    pub name: &'a str,
    pub url: &'a str,
    pub description: &'a str,
    pub is_public: bool,
    pub created_by: Uuid,
}

/// The mutable part of a bookmark. Id and owner never change.
#[derive(AsChangeset, Debug)]
#[diesel(table_name = bookmarks)]
pub struct ModifyBookmark<'a> {
    pub name: &'a str,
    pub url: &'a str,
    pub description: &'a str,
    pub is_public: bool,
}

impl Bookmark {
    pub async fn get(conn: &mut Connection, owner: Uuid, id: i32) -> DatabaseResult<Option<Self>> {
        Ok(bookmarks::table
            .find(id)
            .filter(bookmarks::created_by.eq(owner))
            .select(Self::as_select())
            .first(conn)
            .await
            .optional()?)
    }

    pub fn into_response(self, tags: Vec<Tag>, folders: Vec<Folder>) -> webtag_types::Bookmark {
        webtag_types::Bookmark {
            id: self.id,
            name: self.name,
            url: self.url,
            description: self.description,
            is_public: self.is_public,
            tags: tags.into_iter().map(Tag::summary).collect(),
            folders: folders.into_iter().map(Folder::summary).collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

pub async fn create_bookmark(
    conn: &mut Connection,
    new_bookmark: &NewBookmark<'_>,
) -> DatabaseResult<Bookmark> {
    Ok(diesel::insert_into(bookmarks::table)
        .values(new_bookmark)
        .returning(Bookmark::as_returning())
        .get_result(conn)
        .await?)
}

pub async fn update_bookmark(
    conn: &mut Connection,
    owner: Uuid,
    id: i32,
    modified: &ModifyBookmark<'_>,
) -> DatabaseResult<Option<Bookmark>> {
    use diesel::dsl::now;

    Ok(diesel::update(
        bookmarks::table
            .find(id)
            .filter(bookmarks::created_by.eq(owner)),
    )
    .set((modified, bookmarks::updated_at.eq(now)))
    .returning(Bookmark::as_returning())
    .get_result(conn)
    .await
    .optional()?)
}

/// Deletes a bookmark. Its tag and folder associations go with it.
pub async fn delete_bookmark(conn: &mut Connection, owner: Uuid, id: i32) -> DatabaseResult<()> {
    let deleted = diesel::delete(
        bookmarks::table
            .find(id)
            .filter(bookmarks::created_by.eq(owner)),
    )
    .execute(conn)
    .await?;

    if deleted == 0 {
        return Err(DatabaseError::not_found("bookmark", id));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test {
    use super::super::connection::test as connection;
    use super::*;
    use crate::utils::rand::{rand_str, rand_url};
    use tracing::info;

    pub struct RandBookmark {
        pub name: String,
        pub url: String,
    }

    pub fn rand_bookmark() -> RandBookmark {
        RandBookmark {
            name: rand_str(10),
            url: rand_url(),
        }
    }

    pub async fn create_rand_bookmark(conn: &mut Connection, owner: Uuid) -> Bookmark {
        let m = rand_bookmark();
        create_bookmark(
            conn,
            &NewBookmark {
                name: &m.name,
                url: &m.url,
                description: "",
                is_public: false,
                created_by: owner,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn create_new_bookmark() {
        let mut conn = connection::establish().await;
        let owner = Uuid::new_v4();

        let m = create_rand_bookmark(&mut conn, owner).await;

        info!("{:?}", m);
        assert!(m.id > 0);
        assert_eq!(m.created_by, owner);
        assert!(!m.is_public);
        assert_eq!(m.description, "");
    }

    #[tokio::test]
    async fn get_is_owner_scoped() {
        let mut conn = connection::establish().await;
        let owner = Uuid::new_v4();
        let m = create_rand_bookmark(&mut conn, owner).await;

        let got = Bookmark::get(&mut conn, owner, m.id).await.unwrap();
        assert_eq!(got, Some(m.clone()));

        let got = Bookmark::get(&mut conn, Uuid::new_v4(), m.id).await.unwrap();
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn update_exists_bookmark() {
        let mut conn = connection::establish().await;
        let owner = Uuid::new_v4();
        let bm = create_rand_bookmark(&mut conn, owner).await;

        let modified = rand_bookmark();
        let rv = update_bookmark(
            &mut conn,
            owner,
            bm.id,
            &ModifyBookmark {
                name: &modified.name,
                url: &modified.url,
                description: "updated",
                is_public: true,
            },
        )
        .await
        .unwrap();

        let modified_bm = rv.unwrap();
        assert_eq!(modified_bm.id, bm.id);
        assert_eq!(modified_bm.created_by, owner);
        assert_eq!(modified_bm.name, modified.name);
        assert_eq!(modified_bm.url, modified.url);
        assert_eq!(modified_bm.description, "updated");
        assert!(modified_bm.is_public);
        assert!(modified_bm.updated_at >= bm.updated_at);
    }

    #[tokio::test]
    async fn delete_a_bookmark() {
        let mut conn = connection::establish().await;
        let owner = Uuid::new_v4();
        let m = create_rand_bookmark(&mut conn, owner).await;

        let rv = delete_bookmark(&mut conn, Uuid::new_v4(), m.id).await;
        assert!(matches!(rv, Err(DatabaseError::NotFoundError { .. })));

        delete_bookmark(&mut conn, owner, m.id).await.unwrap();
        assert!(Bookmark::get(&mut conn, owner, m.id).await.unwrap().is_none());

        let rv = delete_bookmark(&mut conn, owner, m.id).await;
        assert!(matches!(rv, Err(DatabaseError::NotFoundError { .. })));
    }
}
