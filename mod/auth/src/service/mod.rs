mod token;
mod user;

use std::sync::Arc;

use jsonwebtoken::EncodingKey;
use thiserror::Error;

use carehub_store::{Collection, CollectionSpec, ColumnDef, Store, StoreError};

pub use token::TokenVerifier;

/// Auth service error type.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password — callers can't tell which.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Stored record has no role.
    #[error("User account is not configured correctly. Please contact an administrator.")]
    MisconfiguredAccount,

    #[error("{0}")]
    DuplicateEmail(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation: {0}")]
    Validation(String),

    #[error("storage: {0}")]
    Storage(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl From<AuthError> for carehub_core::ServiceError {
    fn from(e: AuthError) -> Self {
        use carehub_core::ServiceError;
        match e {
            AuthError::InvalidCredentials | AuthError::MisconfiguredAccount => {
                ServiceError::InvalidCredentials(e.to_string())
            }
            AuthError::DuplicateEmail(m) => ServiceError::Duplicate(m),
            AuthError::Unauthorized(m) => ServiceError::Unauthorized(m),
            AuthError::Forbidden(m) => ServiceError::Forbidden(m),
            AuthError::NotFound(m) => ServiceError::NotFound(m),
            AuthError::Validation(m) => ServiceError::Validation(m),
            AuthError::Storage(m) => ServiceError::Storage(m),
            AuthError::Internal(m) => ServiceError::Internal(m),
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(_) => {
                AuthError::DuplicateEmail("A user with this email already exists.".to_string())
            }
            StoreError::Corrupt(m) => AuthError::Internal(m),
            other => AuthError::Storage(other.to_string()),
        }
    }
}

/// Configuration for the auth service.
///
/// Passed in explicitly by the binary — no ambient globals.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Token lifetime in days (default: 30).
    pub token_ttl_days: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "carehub-dev-secret-change-me".to_string(),
            token_ttl_days: 30,
        }
    }
}

/// The users collection: email unique, role/activity filterable.
static USERS: CollectionSpec = CollectionSpec {
    table: "users",
    columns: &[
        ColumnDef { name: "email", sql_type: "TEXT", indexed: true, unique: true },
        ColumnDef { name: "role", sql_type: "TEXT", indexed: true, unique: false },
        ColumnDef { name: "is_active", sql_type: "INTEGER", indexed: false, unique: false },
        ColumnDef { name: "created_at", sql_type: "TEXT", indexed: false, unique: false },
        ColumnDef { name: "updated_at", sql_type: "TEXT", indexed: false, unique: false },
    ],
    unique_together: &[],
};

/// The Auth service. Holds the users collection and token keys.
pub struct AuthService {
    pub(crate) users: Collection,
    pub(crate) encoding_key: EncodingKey,
    pub(crate) verifier: TokenVerifier,
    pub(crate) token_ttl: chrono::Duration,
}

impl AuthService {
    /// Create a new AuthService, initializing the users table.
    pub fn new(store: Store, config: AuthConfig) -> Result<Arc<Self>, AuthError> {
        let users = Collection::open(store, &USERS)?;
        Ok(Arc::new(Self {
            users,
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            verifier: TokenVerifier::new(&config.jwt_secret),
            token_ttl: chrono::Duration::days(config.token_ttl_days),
        }))
    }

    /// A cheap, cloneable token verifier for middleware in other modules.
    pub fn verifier(&self) -> TokenVerifier {
        self.verifier.clone()
    }
}
