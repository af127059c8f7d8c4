/**
 * Responsibility
 * - The meaning a repo reports upward (not raw sqlx errors)
 */
use thiserror::Error;

// SQLSTATE codes we give meaning to.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    #[error("conflict")]
    Conflict,
    #[error("missing reference")]
    MissingReference,
}

impl RepoError {
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(dbe) = &e {
            match dbe.code().as_deref() {
                Some(UNIQUE_VIOLATION) => return RepoError::Conflict,
                Some(FOREIGN_KEY_VIOLATION) => return RepoError::MissingReference,
                _ => {}
            }
        }
        RepoError::Db(e)
    }
}

pub type RepoResult<T> = Result<T, RepoError>;
