use crate::{
    error::{AppError, AppResult},
    models::{user, User, UserModel},
    utils::{hash_password, verify_password, jwt::encode_access_token},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

pub struct AuthService {
    db: DatabaseConnection,
}

impl AuthService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Register a new user. Returns (user_model, access_token).
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        phone: Option<String>,
    ) -> AppResult<(UserModel, String)> {
        if self.user_exists(username, email).await? {
            return Err(AppError::Conflict(
                "Username or email already exists".to_string(),
            ));
        }

        let password_hash = hash_password(password)?;
        let now = chrono::Utc::now().naive_utc();

        let new_user = user::ActiveModel {
            username: sea_orm::ActiveValue::Set(username.to_string()),
            email: sea_orm::ActiveValue::Set(email.to_string()),
            password_hash: sea_orm::ActiveValue::Set(password_hash),
            phone: sea_orm::ActiveValue::Set(phone),
            role: sea_orm::ActiveValue::Set("user".to_string()),
            created_at: sea_orm::ActiveValue::Set(now),
            updated_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };

        let saved = new_user.insert(&self.db).await?;
        let token = encode_access_token(&saved.id.to_string())?;
        Ok((saved, token))
    }

    /// Login with username (or email) and password.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<(UserModel, String)> {
        let found = User::find()
            .filter(
                sea_orm::Condition::any()
                    .add(user::Column::Username.eq(username))
                    .add(user::Column::Email.eq(username)),
            )
            .one(&self.db)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let is_valid = verify_password(password, &found.password_hash)?;
        if !is_valid {
            return Err(AppError::Unauthorized);
        }

        let token = encode_access_token(&found.id.to_string())?;
        Ok((found, token))
    }

    pub async fn get_user_by_id(&self, id: i32) -> AppResult<UserModel> {
        User::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn count_users(&self) -> AppResult<u64> {
        Ok(User::find().count(&self.db).await?)
    }

    async fn user_exists(&self, username: &str, email: &str) -> AppResult<bool> {
        let count = User::find()
            .filter(
                sea_orm::Condition::any()
                    .add(user::Column::Username.eq(username))
                    .add(user::Column::Email.eq(email)),
            )
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}
