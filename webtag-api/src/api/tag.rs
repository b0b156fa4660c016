use super::errors::Error;
use super::fairings::db::Db;
use super::guards::Owner;
use crate::db::tag::{self, Tag};

use itertools::Itertools;
use rocket::serde::json::Json;
use rocket_db_pools::Connection;

/// List every known tag
#[utoipa::path(
    get,
    path = "/api/tags/",
    responses(
        (status = 200, description = "Tags listed success", body = Vec<webtag_types::Tag>)
    )
)]
#[get("/")]
pub async fn list_tags(
    mut db: Connection<Db>,
    _owner: Owner,
) -> Result<Json<Vec<webtag_types::Tag>>, Error> {
    Ok(Json(
        tag::list_tags(&mut db)
            .await?
            .into_iter()
            .map(Tag::into_response)
            .collect_vec(),
    ))
}

/// Tags on the caller's bookmarks, most recently attached first
#[utoipa::path(
    get,
    path = "/api/tags/in-use",
    responses(
        (status = 200, description = "Tags listed success", body = Vec<webtag_types::Tag>)
    )
)]
#[get("/in-use")]
pub async fn tags_in_use(
    mut db: Connection<Db>,
    owner: Owner,
) -> Result<Json<Vec<webtag_types::Tag>>, Error> {
    Ok(Json(
        tag::tags_in_use(&mut db, owner.0)
            .await?
            .into_iter()
            .map(Tag::into_response)
            .collect_vec(),
    ))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![list_tags, tags_in_use]
}

pub(crate) mod misc {
    use super::*;

    use utoipa::OpenApi;

    #[derive(OpenApi)]
    #[openapi(
        info(title = "Tags API", description = "Tags API", version = "1.0"),
        paths(list_tags, tags_in_use),
        components(schemas(webtag_types::Tag))
    )]
    pub struct ApiDoc;
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::api::configs::{self, Config, DEFAULT_USER_HEADER};
    use crate::db::bookmark::test::create_rand_bookmark;
    use crate::db::connection::test as connection;
    use crate::db::tag::test::{attach, create_rand_tags};

    use rocket::fairing::AdHoc;
    use rocket::http::{Header, Status};
    use rocket::local::asynchronous::Client;
    use rocket_db_pools::Database;
    use uuid::Uuid;

    async fn test_client() -> Client {
        connection::establish().await;

        let app = rocket::custom(configs::config_provider())
            .attach(Db::init())
            .mount("/", routes())
            .attach(AdHoc::config::<Config>());
        Client::tracked(app).await.expect("valid rocket instance")
    }

    #[rocket::async_test]
    async fn list_tags_in_use() {
        let mut conn = connection::establish().await;
        let client = test_client().await;
        let owner = Uuid::new_v4();

        let tags = create_rand_tags(&mut conn, 3).await;
        let bm = create_rand_bookmark(&mut conn, owner).await;
        attach(&mut conn, bm.id, &tags[..2]).await;

        let res = client
            .get(uri!(super::tags_in_use))
            .header(Header::new(DEFAULT_USER_HEADER, owner.to_string()))
            .dispatch()
            .await;
        assert_eq!(res.status(), Status::Ok);
        let in_use: Vec<webtag_types::Tag> = res.into_json().await.unwrap();
        assert_eq!(
            in_use.iter().map(|t| t.id).sorted().collect_vec(),
            tags[..2].iter().map(|t| t.id).sorted().collect_vec()
        );

        let res = client
            .get(uri!(super::list_tags))
            .header(Header::new(DEFAULT_USER_HEADER, owner.to_string()))
            .dispatch()
            .await;
        assert_eq!(res.status(), Status::Ok);
        let all: Vec<webtag_types::Tag> = res.into_json().await.unwrap();
        assert!(tags.iter().all(|t| all.iter().any(|a| a.id == t.id)));

        let res = client.get(uri!(super::list_tags)).dispatch().await;
        assert_eq!(res.status(), Status::Unauthorized);
    }
}
