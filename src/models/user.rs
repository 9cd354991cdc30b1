//! User model and related types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::UserRole;
use crate::error::AppError;

/// User account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[repr(i16)]
pub enum UserStatus {
    Active = 0,
    Blocked = 1,
    Deleted = 2,
}

impl From<i16> for UserStatus {
    fn from(v: i16) -> Self {
        match v {
            1 => UserStatus::Blocked,
            2 => UserStatus::Deleted,
            _ => UserStatus::Active,
        }
    }
}

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub login: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub role: UserRole,
    /// Prepaid balance usable for fine payments
    pub campus_cash_balance: Decimal,
    pub status: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn status_enum(&self) -> UserStatus {
        UserStatus::from(self.status)
    }
}

/// Self-service registration request (always creates a student account)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 3, message = "Login must be at least 3 characters"))]
    pub login: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

/// Create user request (admin only; may assign any role)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 3, message = "Login must be at least 3 characters"))]
    pub login: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub role: Option<UserRole>,
}

/// User query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct UserQuery {
    pub name: Option<String>,
    pub role: Option<UserRole>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Campus cash top-up request (staff desk operation)
#[derive(Debug, Deserialize, ToSchema)]
pub struct TopUpRequest {
    /// Amount to credit; must be positive
    pub amount: Decimal,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub role: UserRole,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Require facility-staff privileges (staff or admin)
    pub fn require_staff(&self) -> Result<(), AppError> {
        if self.is_staff() {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Facility staff privileges required".to_string(),
            ))
        }
    }

    /// Require administrator privileges
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Administrator privileges required".to_string(),
            ))
        }
    }

    /// Require the caller to own the resource or hold staff privileges
    pub fn require_self_or_staff(&self, owner_id: i32) -> Result<(), AppError> {
        if self.user_id == owner_id || self.is_staff() {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Not allowed to access another user's records".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn claims(role: UserRole) -> UserClaims {
        let now = Utc::now().timestamp();
        UserClaims {
            sub: "jdoe".to_string(),
            user_id: 7,
            role,
            exp: now + 3600,
            iat: now,
        }
    }

    #[test]
    fn token_round_trip_preserves_claims() {
        let original = claims(UserRole::Staff);
        let token = original.create_token("test-secret").unwrap();
        let parsed = UserClaims::from_token(&token, "test-secret").unwrap();
        assert_eq!(parsed.user_id, 7);
        assert_eq!(parsed.role, UserRole::Staff);
        assert_eq!(parsed.sub, "jdoe");
    }

    #[test]
    fn token_rejects_wrong_secret() {
        let token = claims(UserRole::Student).create_token("secret-a").unwrap();
        assert!(UserClaims::from_token(&token, "secret-b").is_err());
    }

    #[test]
    fn ownership_checks() {
        let student = claims(UserRole::Student);
        assert!(student.require_self_or_staff(7).is_ok());
        assert!(student.require_self_or_staff(8).is_err());
        assert!(student.require_staff().is_err());

        let staff = claims(UserRole::Staff);
        assert!(staff.require_self_or_staff(8).is_ok());
        assert!(staff.require_staff().is_ok());
        assert!(staff.require_admin().is_err());

        assert!(claims(UserRole::Admin).require_admin().is_ok());
    }
}
