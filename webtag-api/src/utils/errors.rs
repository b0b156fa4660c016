use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("invalid payload: {0}")]
    ValidationError(String),

    #[error("{entity} {id} not found")]
    NotFoundError { entity: &'static str, id: i32 },

    #[error("duplicate key value violates unique constraint of {table:?}")]
    ConflictError { table: String },

    #[error("referenced row does not exist or is not accessible ({table:?})")]
    ReferenceError { table: String },

    #[error("transaction failed: {0}")]
    TransactionError(#[source] DieselError),
}

impl DatabaseError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFoundError { entity, id }
    }

    pub fn conflict(table: &str) -> Self {
        Self::ConflictError {
            table: table.to_string(),
        }
    }
}

impl From<DieselError> for DatabaseError {
    fn from(e: DieselError) -> Self {
        match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info) => {
                Self::ConflictError {
                    table: info.table_name().unwrap_or_default().to_string(),
                }
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, ref info) => {
                Self::ReferenceError {
                    table: info.table_name().unwrap_or_default().to_string(),
                }
            }
            _ => Self::TransactionError(e),
        }
    }
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
