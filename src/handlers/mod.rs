pub mod admin;
pub mod auth;
pub mod favorite;
pub mod listing;
pub mod message;
pub mod notification;
pub mod validation;

pub use auth::{get_current_user, login, register};
