use rocket::{
    figment::Figment,
    serde::{Deserialize, Serialize},
};

pub const DEFAULT_USER_HEADER: &str = "X-Webtag-User";

#[derive(Debug, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct Config {
    /// Shared secret expected in the `Authorization` header. Disabled when unset.
    pub api_key: Option<String>,
    /// Header carrying the owner id, set by the identity provider in front of us.
    pub user_header: String,
    pub log_dir: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            user_header: DEFAULT_USER_HEADER.to_string(),
            log_dir: None,
        }
    }
}

pub fn config_provider() -> Figment {
    use rocket::figment::providers::{Env, Serialized};

    rocket::figment::Figment::from(rocket::Config::default())
        .merge(Serialized::defaults(Config::default()))
        .merge(("databases.main", rocket_db_pools::Config::default()))
        .merge(Env::prefixed("WEBTAG_").global())
}

pub fn get_database_url() -> Result<String, rocket::figment::Error> {
    config_provider().extract_inner("databases.main.url")
}
