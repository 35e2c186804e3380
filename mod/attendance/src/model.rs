use serde::{Deserialize, Serialize};

/// Attendance standing for one staff member on one day.
///
/// Late wins over Early-Out: a late arrival stays Late even when the
/// check-out is also early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    #[serde(rename = "On-Time")]
    OnTime,
    Late,
    #[serde(rename = "Early-Out")]
    EarlyOut,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::OnTime => "On-Time",
            AttendanceStatus::Late => "Late",
            AttendanceStatus::EarlyOut => "Early-Out",
        }
    }
}

/// One check-in/check-out record. At most one per staff member per day,
/// enforced by a unique (staff_id, day) index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffAttendance {
    pub id: String,
    pub staff_id: String,

    /// UTC calendar day, "YYYY-MM-DD".
    pub day: String,

    pub check_in_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_out_at: Option<String>,

    pub status: AttendanceStatus,

    pub created_at: String,
    pub updated_at: String,
}

/// An attendance record joined with the staff member's display name.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceView {
    #[serde(flatten)]
    pub record: StaffAttendance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_name: Option<String>,
}
