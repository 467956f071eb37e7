//! Authentication service - signup, login, and token verification
//! against the users collection.

use std::sync::Arc;

use async_trait::async_trait;
use bson::doc;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{user, NewUser, Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id as an ObjectId hex string
    pub sub: String,
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user
    async fn register(&self, new_user: NewUser) -> AppResult<User>;

    /// Login and return JWT token
    async fn login(&self, username: String, password: String) -> AppResult<TokenResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Generate JWT token for a user
fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id.to_hex(),
        username: user.username.clone(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

/// Concrete implementation of AuthService backed by MongoDB.
pub struct Authenticator {
    database: Arc<Database>,
    config: Config,
}

impl Authenticator {
    pub fn new(database: Arc<Database>, config: Config) -> Self {
        Self { database, config }
    }

    fn users(&self) -> mongodb::Collection<User> {
        self.database.collection(user::COLLECTION)
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, new_user: NewUser) -> AppResult<User> {
        let existing = self
            .users()
            .find_one(doc! {
                "$or": [
                    { "username": &new_user.username },
                    { "email": &new_user.email },
                ]
            })
            .await?;
        if existing.is_some() {
            return Err(AppError::conflict("User"));
        }

        let user = User::create(new_user)?;
        self.users().insert_one(&user).await?;
        Ok(user)
    }

    async fn login(&self, username: String, password: String) -> AppResult<TokenResponse> {
        let user = self.users().find_one(doc! { "username": &username }).await?;

        // Verify against a dummy hash when the user is unknown so response
        // timing does not reveal which usernames exist.
        let dummy_hash =
            "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";
        let hash = user
            .as_ref()
            .map(|u| u.password_hash.clone())
            .unwrap_or_else(|| dummy_hash.to_string());

        let password_valid = Password::from_hash(hash).verify(&password);

        match user {
            Some(ref u) if password_valid && u.is_active => generate_token(u, &self.config),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}
