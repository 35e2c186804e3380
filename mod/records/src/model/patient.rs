use serde::{Deserialize, Serialize};

use crate::model::UserSummary;

/// Enrollment status of a patient profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatientStatus {
    Active,
    Inactive,
    Completed,
    #[serde(rename = "Dropped Out")]
    DroppedOut,
}

impl Default for PatientStatus {
    fn default() -> Self {
        PatientStatus::Active
    }
}

impl PatientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatientStatus::Active => "Active",
            PatientStatus::Inactive => "Inactive",
            PatientStatus::Completed => "Completed",
            PatientStatus::DroppedOut => "Dropped Out",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientPersonalInformation {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuardianContact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientGuardianInformation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guardian1: Option<GuardianContact>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AcutePhase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_conditions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medications: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RehabilitativePhase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_for_enrollment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A patient profile. Always backed 1:1 by a user account holding the
/// login credential; `user_id` points at it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub user_id: String,

    /// Base64-encoded image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,

    #[serde(default)]
    pub status: PatientStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_personal_information: Option<ClientPersonalInformation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_guardian_information: Option<PatientGuardianInformation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acute_phase: Option<AcutePhase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rehabilitative_phase: Option<RehabilitativePhase>,

    pub created_at: String,
    pub updated_at: String,
}

/// Input for the two-step patient create. The backing user account is
/// created from `email` with a generated password.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePatient {
    pub email: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub client_personal_information: Option<ClientPersonalInformation>,
    #[serde(default)]
    pub parent_guardian_information: Option<PatientGuardianInformation>,
    #[serde(default)]
    pub acute_phase: Option<AcutePhase>,
    #[serde(default)]
    pub rehabilitative_phase: Option<RehabilitativePhase>,
}

/// A patient joined with its backing user account.
#[derive(Debug, Clone, Serialize)]
pub struct PatientView {
    #[serde(flatten)]
    pub patient: Patient,
    /// None when the backing account is gone.
    pub user: Option<UserSummary>,
}

/// Response for a successful patient create. The generated password is
/// shown exactly once, here.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedPatient {
    pub patient: PatientView,
    pub generated_password: String,
}
