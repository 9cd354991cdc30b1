//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use rust_decimal::Decimal;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        enums::UserRole,
        user::{CreateUser, RegisterRequest, User, UserClaims, UserQuery, UserStatus},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(&user.password)
            .map_err(|e| AppError::Internal(format!("Stored password hash is invalid: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Self-service registration; always creates a student account
    pub async fn register(&self, request: RegisterRequest) -> AppResult<User> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let hash = self.hash_password(&request.password)?;
        self.repository
            .users
            .create(
                &request.login,
                &hash,
                request.firstname.as_deref(),
                request.lastname.as_deref(),
                request.email.as_deref(),
                UserRole::Student,
            )
            .await
    }

    /// Create an account with an explicit role (admin operation)
    pub async fn create_user(&self, request: CreateUser) -> AppResult<User> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let hash = self.hash_password(&request.password)?;
        self.repository
            .users
            .create(
                &request.login,
                &hash,
                request.firstname.as_deref(),
                request.lastname.as_deref(),
                request.email.as_deref(),
                request.role.unwrap_or(UserRole::Student),
            )
            .await
    }

    /// Authenticate by login and return a JWT token with the user
    pub async fn authenticate(&self, login: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_login(login)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid login or password".to_string()))?;

        match user.status_enum() {
            UserStatus::Blocked => {
                return Err(AppError::Authentication("Account is blocked".to_string()))
            }
            UserStatus::Deleted => {
                return Err(AppError::Authentication("Invalid login or password".to_string()))
            }
            UserStatus::Active => {}
        }

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication("Invalid login or password".to_string()));
        }

        let now = Utc::now().timestamp();
        let claims = UserClaims {
            sub: user.login.clone(),
            user_id: user.id,
            role: user.role,
            exp: now + (self.config.jwt_expiration_hours as i64 * 3600),
            iat: now,
        };

        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        Ok((token, user))
    }

    /// Get a user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// List users (staff view)
    pub async fn list(&self, query: &UserQuery) -> AppResult<(Vec<User>, i64)> {
        self.repository.users.list(query).await
    }

    /// Credit campus cash at the desk
    pub async fn top_up(&self, user_id: i32, amount: Decimal) -> AppResult<User> {
        if amount <= Decimal::ZERO {
            return Err(AppError::BadRequest("Top-up amount must be positive".to_string()));
        }
        self.repository.users.top_up(user_id, amount).await
    }
}
