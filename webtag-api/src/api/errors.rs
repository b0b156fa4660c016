use tracing::error;

use crate::utils::DatabaseError;

#[derive(Responder, Debug)]
pub enum Error {
    #[response(status = 404)]
    NotFound(String),
    #[response(status = 400)]
    BadRequest(String),
    #[response(status = 409)]
    Conflict(String),
    #[response(status = 401)]
    Unauthorized(String),
    #[response(status = 403)]
    Forbidden(String),
    #[response(status = 500)]
    InternalServer(String),
}

impl From<DatabaseError> for Error {
    fn from(e: DatabaseError) -> Self {
        match e {
            DatabaseError::ValidationError(_) => Error::BadRequest(e.to_string()),
            DatabaseError::NotFoundError { .. } => Error::NotFound(e.to_string()),
            DatabaseError::ConflictError { .. } => Error::Conflict(e.to_string()),
            DatabaseError::ReferenceError { .. } => Error::BadRequest(e.to_string()),
            DatabaseError::TransactionError(ref source) => {
                error!(?source, "storage failure");
                Error::InternalServer("Internal server error".to_string())
            }
        }
    }
}
