use std::sync::Arc;

use tracing::{error, warn};
use uuid::Uuid;

use crate::{
    auth::{jwt::JwtKeys, password::PasswordHashing, repo::UserStore, repo_types::User},
    error::{AppError, StoreError, ValidationError},
};

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 20;
const PASSWORD_MIN: usize = 6;

/// Registration, login and token validation over a [`UserStore`].
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    keys: JwtKeys,
    passwords: PasswordHashing,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, keys: JwtKeys, passwords: PasswordHashing) -> Self {
        Self {
            users,
            keys,
            passwords,
        }
    }

    /// Creates a user. The name-taken check runs before the length checks, so
    /// a taken name reports `DuplicateUser` whatever the password looks like.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, AppError> {
        if self.users.exists(username).await? {
            warn!(%username, "username already registered");
            return Err(AppError::DuplicateUser);
        }

        let name_len = username.chars().count();
        if !(USERNAME_MIN..=USERNAME_MAX).contains(&name_len) {
            return Err(ValidationError::InvalidUsername.into());
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(ValidationError::InvalidPassword.into());
        }

        let hash = self.passwords.hash_blocking(password.to_owned()).await?;

        match self.users.create(username, &hash).await {
            Ok(user) => Ok(user),
            // lost the race against a concurrent registration of the same name
            Err(StoreError::UniqueViolation { constraint }) => {
                warn!(%username, %constraint, "username taken at insert");
                Err(AppError::DuplicateUser)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Returns a signed token. Unknown users and wrong passwords both yield
    /// `InvalidCredentials`.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AppError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            warn!(%username, "login unknown username");
            return Err(AppError::InvalidCredentials);
        };

        let ok = match self
            .passwords
            .verify_blocking(password.to_owned(), user.password_hash.clone())
            .await
        {
            Ok(ok) => ok,
            Err(e) => {
                error!(error = %e, user_id = %user.id, "stored password hash unreadable");
                false
            }
        };

        if !ok {
            warn!(%username, user_id = %user.id, "login invalid password");
            return Err(AppError::InvalidCredentials);
        }

        Ok(self.keys.sign(user.id)?)
    }

    pub fn validate_token(&self, token: &str) -> Result<Uuid, AppError> {
        self.keys.verify(token)
    }

    pub async fn current_user(&self, user_id: Uuid) -> Result<User, AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::InvalidToken)
    }
}
