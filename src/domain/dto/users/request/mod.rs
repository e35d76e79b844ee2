pub mod auth_request;
pub mod update_user_request;

pub use auth_request::*;
pub use update_user_request::*;
