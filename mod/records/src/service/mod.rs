mod patient;
mod student;

use std::sync::Arc;

use thiserror::Error;

use carehub_auth::{AuthError, AuthService};
use carehub_store::{Collection, CollectionSpec, ColumnDef, Store, StoreError};

pub use patient::Period;

/// Records service error type.
#[derive(Debug, Error)]
pub enum RecordsError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    Validation(String),

    #[error("storage: {0}")]
    Storage(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl From<RecordsError> for carehub_core::ServiceError {
    fn from(e: RecordsError) -> Self {
        use carehub_core::ServiceError;
        match e {
            RecordsError::NotFound(m) => ServiceError::NotFound(m),
            RecordsError::Duplicate(m) => ServiceError::Duplicate(m),
            RecordsError::Validation(m) => ServiceError::Validation(m),
            RecordsError::Storage(m) => ServiceError::Storage(m),
            RecordsError::Internal(m) => ServiceError::Internal(m),
        }
    }
}

impl From<StoreError> for RecordsError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(_) => {
                RecordsError::Duplicate("A profile for this user already exists.".to_string())
            }
            StoreError::Corrupt(m) => RecordsError::Internal(m),
            other => RecordsError::Storage(other.to_string()),
        }
    }
}

impl From<AuthError> for RecordsError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::DuplicateEmail(m) => RecordsError::Duplicate(m),
            AuthError::Validation(m) => RecordsError::Validation(m),
            AuthError::NotFound(m) => RecordsError::NotFound(m),
            AuthError::Storage(m) => RecordsError::Storage(m),
            other => RecordsError::Internal(other.to_string()),
        }
    }
}

static PATIENTS: CollectionSpec = CollectionSpec {
    table: "patients",
    columns: &[
        ColumnDef { name: "user_id", sql_type: "TEXT", indexed: true, unique: true },
        ColumnDef { name: "status", sql_type: "TEXT", indexed: true, unique: false },
        ColumnDef { name: "created_at", sql_type: "TEXT", indexed: true, unique: false },
        ColumnDef { name: "updated_at", sql_type: "TEXT", indexed: false, unique: false },
    ],
    unique_together: &[],
};

static STUDENTS: CollectionSpec = CollectionSpec {
    table: "students",
    columns: &[
        ColumnDef { name: "user_id", sql_type: "TEXT", indexed: true, unique: true },
        ColumnDef { name: "enrollment_status", sql_type: "TEXT", indexed: true, unique: false },
        ColumnDef { name: "created_at", sql_type: "TEXT", indexed: true, unique: false },
        ColumnDef { name: "updated_at", sql_type: "TEXT", indexed: false, unique: false },
    ],
    unique_together: &[],
};

/// Patient and student profiles. Profile creates and deletes are two-step
/// operations paired with the backing user account in [`AuthService`].
pub struct RecordsService {
    pub(crate) patients: Collection,
    pub(crate) students: Collection,
    pub(crate) auth: Arc<AuthService>,
}

impl RecordsService {
    pub fn new(store: Store, auth: Arc<AuthService>) -> Result<Arc<Self>, RecordsError> {
        Ok(Arc::new(Self {
            patients: Collection::open(store.clone(), &PATIENTS)?,
            students: Collection::open(store, &STUDENTS)?,
            auth,
        }))
    }
}

/// Finish the second step of a two-step create. When it fails, undo the
/// first step; a failed undo leaves an orphan, which is logged and the
/// original error still surfaces.
pub(crate) fn finish_or_undo<T>(
    step: Result<T, RecordsError>,
    undo: impl FnOnce() -> Result<(), RecordsError>,
    orphan: &str,
) -> Result<T, RecordsError> {
    match step {
        Ok(v) => Ok(v),
        Err(e) => {
            if let Err(undo_err) = undo() {
                tracing::error!(orphan, error = %undo_err, "rollback failed, record orphaned");
            }
            Err(e)
        }
    }
}
