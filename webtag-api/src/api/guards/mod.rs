use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use uuid::Uuid;

use crate::api::configs::Config;
use crate::api::errors::Error;

/// The acting user, as asserted by the identity provider in front of the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner(pub Uuid);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Owner {
    type Error = Error;

    async fn from_request(request: &'r rocket::Request<'_>) -> Outcome<Self, Self::Error> {
        let Some(config) = request.rocket().state::<Config>() else {
            return Outcome::Error((
                Status::InternalServerError,
                Error::InternalServer("Missing Config".to_string()),
            ));
        };

        if let Some(key) = config.api_key.as_ref() {
            match request.headers().get_one("Authorization") {
                Some(token) if token == key => {}
                Some(_) => {
                    return Outcome::Error((
                        Status::Forbidden,
                        Error::Forbidden("Invalid API Key".to_string()),
                    ));
                }
                None => {
                    return Outcome::Error((
                        Status::Unauthorized,
                        Error::Unauthorized("Missing API Key".to_string()),
                    ));
                }
            }
        }

        match request
            .headers()
            .get_one(&config.user_header)
            .map(|raw| Uuid::parse_str(raw.trim()))
        {
            Some(Ok(owner)) => Outcome::Success(Owner(owner)),
            _ => Outcome::Error((
                Status::Unauthorized,
                Error::Unauthorized("Unauthorized request".to_string()),
            )),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::api::configs::DEFAULT_USER_HEADER;
    use crate::utils::rand::rand_str;

    use super::*;

    use rocket::fairing::AdHoc;
    use rocket::http::Header;
    use rocket::local::blocking;

    #[get("/")]
    fn whoami(owner: Owner) -> String {
        owner.0.to_string()
    }

    #[test]
    fn test_without_config() {
        let app = rocket::build().mount("/", routes![whoami]);
        let client = blocking::Client::tracked(app).expect("valid rocket instance");
        let response = client.get(uri!(whoami)).dispatch();
        assert_eq!(response.status(), Status::InternalServerError);
    }

    fn test_client(config: Config) -> blocking::Client {
        use rocket::figment::{providers::Serialized, Figment};
        let figment = Figment::from(rocket::Config::default()).merge(Serialized::defaults(config));
        let app = rocket::custom(figment)
            .mount("/", routes![whoami])
            .attach(AdHoc::config::<Config>());
        blocking::Client::tracked(app).expect("valid rocket instance")
    }

    #[test]
    fn test_owner_header() {
        let client = test_client(Config::default());

        let response = client.get(uri!(whoami)).dispatch();
        assert_eq!(response.status(), Status::Unauthorized);

        let response = client
            .get(uri!(whoami))
            .header(Header::new(DEFAULT_USER_HEADER, "not-a-uuid"))
            .dispatch();
        assert_eq!(response.status(), Status::Unauthorized);

        let owner = Uuid::new_v4();
        let response = client
            .get(uri!(whoami))
            .header(Header::new(DEFAULT_USER_HEADER, owner.to_string()))
            .dispatch();
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(response.into_string().unwrap(), owner.to_string());
    }

    #[test]
    fn test_custom_owner_header() {
        let client = test_client(Config {
            user_header: "X-Forwarded-User".to_string(),
            ..Default::default()
        });

        let owner = Uuid::new_v4();
        let response = client
            .get(uri!(whoami))
            .header(Header::new(DEFAULT_USER_HEADER, owner.to_string()))
            .dispatch();
        assert_eq!(response.status(), Status::Unauthorized);

        let response = client
            .get(uri!(whoami))
            .header(Header::new("X-Forwarded-User", owner.to_string()))
            .dispatch();
        assert_eq!(response.status(), Status::Ok);
    }

    #[test]
    fn test_enable_auth() {
        let key = rand_str(32);
        let client = test_client(Config {
            api_key: Some(key.clone()),
            ..Default::default()
        });
        let owner = Header::new(DEFAULT_USER_HEADER, Uuid::new_v4().to_string());

        let response = client.get(uri!(whoami)).header(owner.clone()).dispatch();
        assert_eq!(response.status(), Status::Unauthorized);

        let response = client
            .get(uri!(whoami))
            .header(owner.clone())
            .header(Header::new("Authorization", key))
            .dispatch();
        assert_eq!(response.status(), Status::Ok);

        let response = client
            .get(uri!(whoami))
            .header(owner)
            .header(Header::new("Authorization", rand_str(32)))
            .dispatch();
        assert_eq!(response.status(), Status::Forbidden);
    }
}
