#[macro_use]
extern crate rocket;

pub mod api;
pub mod db;
pub mod utils;

#[cfg(test)]
#[cfg(not(tarpaulin_include))]
#[ctor::ctor]
fn init() {
    crate::utils::logging::setup_console_log();
}

pub(crate) mod misc {
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;
    use utoipa_swagger_ui::Url;

    #[derive(OpenApi)]
    #[openapi(info(
        title = "Webtag API",
        description = r"## Main API documentation

Every request carries the owner id in the configured user header (`X-Webtag-User` by default).

- [Bookmarks API](/swagger-ui/?urls.primaryName=bookmarks)
- [Folders API](/swagger-ui/?urls.primaryName=folders)
- [Tags API](/swagger-ui/?urls.primaryName=tags)
    ",
        version = "1.0"
    ))]
    pub struct ApiDoc;

    pub fn docs() -> Vec<rocket::Route> {
        use crate::api::{bookmark, folder, tag};
        SwaggerUi::new("/swagger-ui/<_..>")
            .urls(vec![
                (
                    Url::with_primary("main", "/api-docs/openapi.json", true),
                    ApiDoc::openapi(),
                ),
                (
                    Url::new("bookmarks", "/api-docs/openapi-bookmarks.json"),
                    bookmark::misc::ApiDoc::openapi(),
                ),
                (
                    Url::new("folders", "/api-docs/openapi-folders.json"),
                    folder::misc::ApiDoc::openapi(),
                ),
                (
                    Url::new("tags", "/api-docs/openapi-tags.json"),
                    tag::misc::ApiDoc::openapi(),
                ),
            ])
            .into()
    }
}

pub async fn rocket() -> anyhow::Result<rocket::Rocket<rocket::Build>> {
    use rocket::fairing::AdHoc;
    use rocket_db_pools::Database;

    use crate::api::configs::{self, Config};
    use crate::api::fairings::db::Db;
    use crate::api::{bookmark, folder, tag};
    use crate::misc;

    let cfg_provider = configs::config_provider();
    let config = cfg_provider.extract::<Config>()?;

    crate::utils::logging::setup_log(config.log_dir.as_deref());
    crate::db::connection::run_migrations().await?;

    Ok(rocket::custom(cfg_provider)
        .attach(Db::init())
        .mount("/api/bookmarks", bookmark::routes())
        .mount("/api/tags", tag::routes())
        .mount("/api/folders", folder::routes())
        .mount("/", misc::docs())
        .attach(AdHoc::config::<Config>()))
}
