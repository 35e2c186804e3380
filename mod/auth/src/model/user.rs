use serde::{Deserialize, Serialize};

use crate::credential::Credential;
use crate::model::Role;

/// Embedded profile for staff-like roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffInfo {
    pub full_name: String,
    pub gender: Gender,
    pub position: String,
    pub employment_status: EmploymentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentStatus {
    #[serde(rename = "full-time")]
    FullTime,
    #[serde(rename = "part-time")]
    PartTime,
}

/// A user identity record.
///
/// The credential pair is part of the stored document but never part of
/// an API response — handlers go through [`User::public`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier (UUIDv4, no dashes).
    pub id: String,

    /// Unique, lowercased, trimmed email address.
    pub email: String,

    /// Platform role. Absent only on corrupt records — creation always
    /// sets one; login refuses accounts without one.
    #[serde(default)]
    pub role: Option<Role>,

    /// Salted password hash.
    #[serde(default)]
    pub credential: Credential,

    /// Staff profile, present exactly when the role is staff-like.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_info: Option<StaffInfo>,

    /// Course reference, meaningful only for students.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,

    /// Soft-disable flag; most flows deactivate rather than delete.
    #[serde(default = "default_true")]
    pub is_active: bool,

    /// RFC 3339 creation timestamp.
    pub created_at: String,

    /// RFC 3339 last update timestamp.
    pub updated_at: String,
}

fn default_true() -> bool {
    true
}

impl User {
    /// Non-secret projection for API responses.
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            email: self.email.clone(),
            role: self.role,
            staff_info: self.staff_info.clone(),
            course_id: self.course_id.clone(),
            is_active: self.is_active,
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }
}

/// What the API exposes about a user — everything but the credential.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: String,
    pub email: String,
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_info: Option<StaffInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Input for creating a user (admin flow and internal profile flows).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub staff_info: Option<StaffInfo>,
    #[serde(default)]
    pub course_id: Option<String>,
}

/// Input for updating a user. Password changes are deliberately excluded
/// from this path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub staff_info: Option<StaffInfo>,
    #[serde(default)]
    pub course_id: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_projection_has_no_credential() {
        let user = User {
            id: "u1".to_string(),
            email: "a@x.com".to_string(),
            role: Some(Role::Admin),
            credential: Credential::derive("secret"),
            staff_info: None,
            course_id: None,
            is_active: true,
            created_at: "2026-01-01T00:00:00+00:00".to_string(),
            updated_at: "2026-01-01T00:00:00+00:00".to_string(),
        };
        let json = serde_json::to_value(user.public()).unwrap();
        assert!(json.get("credential").is_none());
        assert!(json.get("salt").is_none());
        assert!(json.get("hash").is_none());
        assert_eq!(json["role"], "admin");
    }

    #[test]
    fn stored_record_without_role_deserializes() {
        let user: User = serde_json::from_str(
            r#"{"id":"u1","email":"a@x.com","created_at":"t","updated_at":"t"}"#,
        )
        .unwrap();
        assert!(user.role.is_none());
        assert!(user.credential.is_unset());
        assert!(user.is_active);
    }
}
