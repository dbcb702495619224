pub mod currency;
pub mod jwt;
pub mod password;
pub mod price;
pub mod slug;
pub mod token;

pub use currency::convert;
pub use password::{hash_password, verify_password};
pub use price::format_price;
pub use slug::slugify;
pub use token::generate_validation_token;
