pub mod favorite;
pub mod listing;
pub mod message;
pub mod notification;
pub mod user;
pub mod validation_token;

pub use favorite::Entity as Favorite;
pub use listing::{Currency, Entity as Listing, ListingStatus, Model as ListingModel};
pub use message::{Entity as Message, Model as MessageModel};
pub use notification::{Entity as Notification, Model as NotificationModel, NotificationKind};
pub use user::{Entity as User, Model as UserModel};
pub use validation_token::{Entity as ValidationToken, Model as ValidationTokenModel};
