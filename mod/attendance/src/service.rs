use std::sync::Arc;

use chrono::{DateTime, NaiveTime, Utc};
use thiserror::Error;

use carehub_auth::{AuthError, AuthService};
use carehub_core::{new_id, now_rfc3339};
use carehub_store::{Collection, CollectionSpec, ColumnDef, Filter, Store, StoreError, Value};

use crate::model::{AttendanceStatus, AttendanceView, StaffAttendance};

/// Check-ins after this time count as Late.
const LATE_AFTER: NaiveTime = match NaiveTime::from_hms_opt(9, 0, 0) {
    Some(t) => t,
    None => unreachable!(),
};

/// Check-outs before this time count as Early-Out.
const EARLY_BEFORE: NaiveTime = match NaiveTime::from_hms_opt(15, 0, 0) {
    Some(t) => t,
    None => unreachable!(),
};

#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("storage: {0}")]
    Storage(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl From<AttendanceError> for carehub_core::ServiceError {
    fn from(e: AttendanceError) -> Self {
        use carehub_core::ServiceError;
        match e {
            AttendanceError::NotFound(m) => ServiceError::NotFound(m),
            AttendanceError::Validation(m) => ServiceError::Validation(m),
            AttendanceError::Storage(m) => ServiceError::Storage(m),
            AttendanceError::Internal(m) => ServiceError::Internal(m),
        }
    }
}

impl From<StoreError> for AttendanceError {
    fn from(e: StoreError) -> Self {
        match e {
            // The unique (staff_id, day) index and the pre-check race here.
            StoreError::Duplicate(_) => {
                AttendanceError::Validation("You have already checked in today.".to_string())
            }
            StoreError::Corrupt(m) => AttendanceError::Internal(m),
            other => AttendanceError::Storage(other.to_string()),
        }
    }
}

static ATTENDANCE: CollectionSpec = CollectionSpec {
    table: "staff_attendance",
    columns: &[
        ColumnDef { name: "staff_id", sql_type: "TEXT", indexed: true, unique: false },
        ColumnDef { name: "day", sql_type: "TEXT", indexed: true, unique: false },
        ColumnDef { name: "status", sql_type: "TEXT", indexed: false, unique: false },
        ColumnDef { name: "created_at", sql_type: "TEXT", indexed: false, unique: false },
    ],
    unique_together: &[&["staff_id", "day"]],
};

/// Daily staff check-in/check-out ledger. Day boundaries and the 9AM/3PM
/// cutoffs are evaluated in UTC.
pub struct AttendanceService {
    records: Collection,
    auth: Arc<AuthService>,
}

impl AttendanceService {
    pub fn new(store: Store, auth: Arc<AuthService>) -> Result<Arc<Self>, AttendanceError> {
        Ok(Arc::new(Self { records: Collection::open(store, &ATTENDANCE)?, auth }))
    }

    /// Record a check-in for `now`. At most one per staff member per day.
    pub fn check_in(
        &self,
        staff_id: &str,
        now: DateTime<Utc>,
    ) -> Result<StaffAttendance, AttendanceError> {
        let day = day_of(now);
        if self.today(staff_id, &day)?.is_some() {
            return Err(AttendanceError::Validation(
                "You have already checked in today.".to_string(),
            ));
        }

        let status = if now.time() > LATE_AFTER {
            AttendanceStatus::Late
        } else {
            AttendanceStatus::OnTime
        };

        let ts = now_rfc3339();
        let record = StaffAttendance {
            id: new_id(),
            staff_id: staff_id.to_string(),
            day,
            check_in_at: now.to_rfc3339(),
            check_out_at: None,
            status,
            created_at: ts.clone(),
            updated_at: ts,
        };
        self.records.insert(&record.id, &record, &indexes(&record))?;
        Ok(record)
    }

    /// Record a check-out against today's check-in.
    pub fn check_out(
        &self,
        staff_id: &str,
        now: DateTime<Utc>,
    ) -> Result<StaffAttendance, AttendanceError> {
        let day = day_of(now);
        let mut record = self.today(staff_id, &day)?.ok_or_else(|| {
            AttendanceError::NotFound("No check-in record found for today.".to_string())
        })?;

        if record.check_out_at.is_some() {
            return Err(AttendanceError::Validation(
                "You have already checked out today.".to_string(),
            ));
        }

        record.check_out_at = Some(now.to_rfc3339());
        if now.time() < EARLY_BEFORE && record.status != AttendanceStatus::Late {
            record.status = AttendanceStatus::EarlyOut;
        }
        record.updated_at = now_rfc3339();

        self.records.update(&record.id, &record, &indexes(&record))?;
        Ok(record)
    }

    /// All records for one staff member, newest first.
    pub fn my_attendance(&self, staff_id: &str) -> Result<Vec<StaffAttendance>, AttendanceError> {
        let (items, _) = self.records.list(
            &[Filter::Eq("staff_id", Value::from(staff_id))],
            i64::MAX as usize,
            0,
        )?;
        Ok(items)
    }

    /// All records, optionally restricted to one day, joined with staff names.
    pub fn all_attendance(
        &self,
        day: Option<&str>,
    ) -> Result<Vec<AttendanceView>, AttendanceError> {
        let filters = match day {
            Some(d) => vec![Filter::Eq("day", Value::from(d))],
            None => Vec::new(),
        };
        let (items, _): (Vec<StaffAttendance>, usize) =
            self.records.list(&filters, i64::MAX as usize, 0)?;

        let mut views = Vec::with_capacity(items.len());
        for record in items {
            let staff_name = match self.auth.get_user(&record.staff_id) {
                Ok(u) => Some(
                    u.staff_info.map(|s| s.full_name).unwrap_or(u.email),
                ),
                Err(AuthError::NotFound(_)) => None,
                Err(e) => return Err(AttendanceError::Internal(e.to_string())),
            };
            views.push(AttendanceView { record, staff_name });
        }
        Ok(views)
    }

    fn today(&self, staff_id: &str, day: &str) -> Result<Option<StaffAttendance>, AttendanceError> {
        Ok(self.records.find_one(&[
            Filter::Eq("staff_id", Value::from(staff_id)),
            Filter::Eq("day", Value::from(day)),
        ])?)
    }
}

fn day_of(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d").to_string()
}

fn indexes(r: &StaffAttendance) -> Vec<(&'static str, Value)> {
    vec![
        ("staff_id", Value::from(r.staff_id.clone())),
        ("day", Value::from(r.day.clone())),
        ("status", Value::from(r.status.as_str())),
        ("created_at", Value::from(r.created_at.clone())),
    ]
}
