use thiserror::Error;

use crate::repos::error::RepoError;

/// Outcomes of credential and session operations.
///
/// `NoSuchUser`, `BadCredentials` and `InvalidToken` must all render as the same 401.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no such user")]
    NoSuchUser,
    #[error("bad credentials")]
    BadCredentials,
    #[error("password and confirmation do not match")]
    PasswordMismatch,
    #[error("username taken")]
    UsernameTaken,
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("invalid refresh token")]
    InvalidToken,
    #[error("user store unavailable")]
    Unavailable(#[source] RepoError),
    #[error("internal auth failure")]
    Internal,
}
