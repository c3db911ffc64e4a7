//! Authenticated user claims
//!
//! Tokens are issued by the consortium portal; this server only verifies them.

use serde::{Deserialize, Serialize};

use crate::{error::AppError, models::Ownership};

/// Role carried in the token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Staff member submitting data for one library
    Contributor,
    /// Consortium administrator
    Admin,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub role: Role,
    /// Library the user submits for (contributors only)
    pub library_id: Option<i32>,
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

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization("Administrator rights required".to_string()))
        }
    }

    /// Admins may act for any library, contributors only for their own
    pub fn require_library(&self, library_id: i32) -> Result<(), AppError> {
        if self.is_admin() || self.library_id == Some(library_id) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "Not allowed to submit data for library {}",
                library_id
            )))
        }
    }

    /// Global items are visible to everyone; a private item only to its owning library
    pub fn require_visible(&self, ownership: &Ownership) -> Result<(), AppError> {
        match ownership {
            Ownership::Private(owner)
                if !self.is_admin() && self.library_id != Some(owner.library_id()) =>
            {
                Err(AppError::Authorization(format!(
                    "Item belongs to library {}",
                    owner.library_id()
                )))
            }
            _ => Ok(()),
        }
    }
}
