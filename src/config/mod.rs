pub mod database;
pub mod email;
pub mod jwt;
pub mod rate_limit;
pub mod redis;
pub mod validation;
