pub mod authenticator;
pub mod error;
pub mod factory;
pub mod password;
pub mod principal;
pub mod session;
pub mod token_codec;
pub mod user_store;

pub use error::AuthError;
pub use factory::{AuthService, build_auth_service};
