pub mod auth;
pub mod cache;
pub mod email;
pub mod favorite;
pub mod listing;
pub mod message;
pub mod notification;
pub mod validation;
