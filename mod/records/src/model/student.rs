use serde::{Deserialize, Serialize};

use crate::model::UserSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EducationalStatus {
    #[serde(rename = "literate")]
    Literate,
    #[serde(rename = "not literate")]
    NotLiterate,
    #[serde(rename = "elementary")]
    Elementary,
    #[serde(rename = "jnr high")]
    JuniorHigh,
    #[serde(rename = "snr high")]
    SeniorHigh,
    #[serde(rename = "high sch graduate")]
    HighSchoolGraduate,
    #[serde(rename = "college graduate")]
    CollegeGraduate,
    #[serde(rename = "other")]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseOfStudy {
    Tailoring,
    #[serde(rename = "Bible Study")]
    BibleStudy,
    #[serde(rename = "Computer Science")]
    ComputerScience,
    Carpentry,
    Masonry,
    Plumbing,
    Cosmetology,
    Baking,
    Pastry,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnrollmentStatus {
    Active,
    Completed,
    #[serde(rename = "Dropped Out")]
    DroppedOut,
}

impl Default for EnrollmentStatus {
    fn default() -> Self {
        EnrollmentStatus::Active
    }
}

impl EnrollmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::Active => "Active",
            EnrollmentStatus::Completed => "Completed",
            EnrollmentStatus::DroppedOut => "Dropped Out",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentPersonalInformation {
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub educational_status: Option<EducationalStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocational_skill: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentGuardian {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

/// A student profile, backed 1:1 by a user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub user_id: String,

    pub personal_information: StudentPersonalInformation,
    #[serde(default)]
    pub parent_guardian_information: Vec<StudentGuardian>,

    pub course_of_study: CourseOfStudy,
    #[serde(default)]
    pub enrollment_status: EnrollmentStatus,

    pub created_at: String,
    pub updated_at: String,
}

/// Input for the two-step student create. Unlike patients, the caller
/// supplies the initial password.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStudent {
    pub email: String,
    pub password: String,
    pub personal_information: StudentPersonalInformation,
    #[serde(default)]
    pub parent_guardian_information: Vec<StudentGuardian>,
    pub course_of_study: CourseOfStudy,
}

/// A student joined with its backing user account.
#[derive(Debug, Clone, Serialize)]
pub struct StudentView {
    #[serde(flatten)]
    pub student: Student,
    pub user: Option<UserSummary>,
}
