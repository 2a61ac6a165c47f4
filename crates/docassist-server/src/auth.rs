//! Accounts, password hashing and bearer sessions

use std::sync::atomic::{AtomicU64, Ordering};

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{DateTime, Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

pub const DEFAULT_ROLE: &str = "user";

#[derive(Debug, Clone)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub name: Option<String>,
    pub role: String,
    password_hash: String,
}

/// Public view of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponse {
    pub id: u64,
    pub email: String,
    pub name: Option<String>,
    pub role: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role.clone(),
        }
    }
}

pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::encode_b64(&rand::random::<[u8; 16]>())
        .map_err(|e| ApiError::Internal(format!("salt generation failed: {}", e)))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {}", e)))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Registered users keyed by email
#[derive(Debug, Default)]
pub struct UserStore {
    users: DashMap<String, User>,
    next_id: AtomicU64,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &self,
        email: &str,
        name: Option<String>,
        password: &str,
    ) -> Result<UserResponse, ApiError> {
        let email = email.trim().to_lowercase();
        if !is_plausible_email(&email) {
            return Err(ApiError::BadRequest("Invalid email address".to_string()));
        }
        if password.is_empty() {
            return Err(ApiError::BadRequest("Password must not be empty".to_string()));
        }

        let password_hash = hash_password(password)?;
        match self.users.entry(email) {
            Entry::Occupied(_) => Err(ApiError::BadRequest("Email already registered".to_string())),
            Entry::Vacant(slot) => {
                let user = User {
                    id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
                    email: slot.key().clone(),
                    name,
                    role: DEFAULT_ROLE.to_string(),
                    password_hash,
                };
                info!(user_id = user.id, "Registered user");
                let response = UserResponse::from(&user);
                slot.insert(user);
                Ok(response)
            }
        }
    }

    /// The user owning `email`, if `password` matches
    pub fn authenticate(&self, email: &str, password: &str) -> Option<User> {
        let user = self.users.get(&email.trim().to_lowercase())?;
        verify_password(password, &user.password_hash).then(|| user.clone())
    }

    pub fn get(&self, email: &str) -> Option<User> {
        self.users.get(email).map(|user| user.clone())
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.contains('@'),
        None => false,
    }
}

#[derive(Debug, Clone)]
struct Session {
    email: String,
    expires_at: DateTime<Utc>,
}

/// Opaque bearer tokens with a fixed lifetime
#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    /// Issue a new token for `email`
    pub fn create(&self, email: &str) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string();
        self.sessions.insert(
            token.clone(),
            Session {
                email: email.to_string(),
                expires_at: Utc::now() + self.ttl,
            },
        );
        token
    }

    /// Email behind a live token; expired tokens are dropped
    pub fn resolve(&self, token: &str) -> Option<String> {
        let expired = match self.sessions.get(token) {
            Some(session) if session.expires_at > Utc::now() => return Some(session.email.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            debug!("Dropping expired session");
            self.sessions.remove(token);
        }
        None
    }
}

/// The authenticated caller, taken from `Authorization: Bearer <token>`
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(ApiError::Unauthorized)?;

        let email = state.sessions.resolve(token).ok_or(ApiError::Unauthorized)?;
        let user = state.users.get(&email).ok_or(ApiError::Unauthorized)?;
        Ok(CurrentUser(user))
    }
}
