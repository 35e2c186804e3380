mod patient;
mod student;

use serde::Serialize;

pub use patient::*;
pub use student::*;

/// The slice of the backing user account embedded in profile responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub is_active: bool,
}
