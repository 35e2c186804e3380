use chrono::{DateTime, Months, Utc};
use rand::Rng;

use carehub_auth::model::{CreateUser, Role};
use carehub_core::{merge_patch, new_id, now_rfc3339, ListParams, ListResult};
use carehub_store::{Filter, Value};

use crate::model::{CreatePatient, CreatedPatient, Patient, PatientView, UserSummary};
use crate::service::{finish_or_undo, RecordsError, RecordsService};

/// Fields the merge-patch update may never touch.
const PROTECTED_FIELDS: &[&str] = &["id", "user_id", "created_at", "updated_at"];

/// Reporting window for enrollment stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Week,
    Month,
    All,
}

impl Period {
    /// Anything other than "week" or "month" means all time.
    pub fn parse(s: Option<&str>) -> Period {
        match s {
            Some("week") => Period::Week,
            Some("month") => Period::Month,
            _ => Period::All,
        }
    }

    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Period::Week => now - chrono::Duration::days(7),
            Period::Month => now.checked_sub_months(Months::new(1)).unwrap_or(now),
            Period::All => DateTime::UNIX_EPOCH,
        }
    }
}

impl RecordsService {
    /// Create a patient profile and its backing user account.
    ///
    /// The account gets a generated 8-digit numeric password, returned
    /// once in the response. If the profile insert fails the account is
    /// rolled back.
    pub fn create_patient(&self, input: CreatePatient) -> Result<CreatedPatient, RecordsError> {
        if input.email.trim().is_empty() {
            return Err(RecordsError::Validation(
                "Email is required to create a user account for the patient.".to_string(),
            ));
        }

        let generated_password =
            rand::thread_rng().gen_range(10_000_000u32..100_000_000).to_string();
        let user = self.auth.create_user(CreateUser {
            email: input.email,
            password: generated_password.clone(),
            role: Role::Patient,
            staff_info: None,
            course_id: None,
        })?;

        let now = now_rfc3339();
        let patient = Patient {
            id: new_id(),
            user_id: user.id.clone(),
            profile_picture: input.profile_picture,
            status: Default::default(),
            client_personal_information: input.client_personal_information,
            parent_guardian_information: input.parent_guardian_information,
            acute_phase: input.acute_phase,
            rehabilitative_phase: input.rehabilitative_phase,
            created_at: now.clone(),
            updated_at: now,
        };

        finish_or_undo(
            self.patients
                .insert(&patient.id, &patient, &patient_indexes(&patient))
                .map_err(RecordsError::from),
            || self.auth.delete_user(&user.id).map_err(RecordsError::from),
            &user.id,
        )?;

        Ok(CreatedPatient {
            patient: PatientView {
                user: Some(UserSummary {
                    id: user.id,
                    email: user.email,
                    is_active: user.is_active,
                }),
                patient,
            },
            generated_password,
        })
    }

    pub fn get_patient(&self, id: &str) -> Result<PatientView, RecordsError> {
        let patient: Patient = self
            .patients
            .get(id)?
            .ok_or_else(|| RecordsError::NotFound("Patient not found".to_string()))?;
        self.patient_view(patient)
    }

    pub fn list_patients(&self, params: &ListParams) -> Result<ListResult<PatientView>, RecordsError> {
        let (patients, total): (Vec<Patient>, usize) =
            self.patients.list(&[], params.limit, params.offset)?;
        let mut items = Vec::with_capacity(patients.len());
        for p in patients {
            items.push(self.patient_view(p)?);
        }
        Ok(ListResult { items, total })
    }

    /// Merge-patch update. Identity and timestamp fields are ignored in
    /// the patch; `updated_at` is bumped by the service.
    pub fn update_patient(
        &self,
        id: &str,
        patch: serde_json::Value,
    ) -> Result<PatientView, RecordsError> {
        let patient: Patient = self
            .patients
            .get(id)?
            .ok_or_else(|| RecordsError::NotFound("Patient not found".to_string()))?;

        let mut doc = serde_json::to_value(&patient)
            .map_err(|e| RecordsError::Internal(e.to_string()))?;
        let mut patch = patch;
        if let Some(obj) = patch.as_object_mut() {
            for field in PROTECTED_FIELDS {
                obj.remove(*field);
            }
        }
        merge_patch(&mut doc, &patch);

        let mut updated: Patient = serde_json::from_value(doc)
            .map_err(|e| RecordsError::Validation(e.to_string()))?;
        updated.updated_at = now_rfc3339();

        self.patients.update(id, &updated, &patient_indexes(&updated))?;
        self.patient_view(updated)
    }

    /// Delete a patient profile and its backing user account.
    ///
    /// The profile goes first; if the account delete then fails the
    /// orphaned account is logged and the request still succeeds.
    pub fn delete_patient(&self, id: &str) -> Result<(), RecordsError> {
        let patient: Patient = self
            .patients
            .get(id)?
            .ok_or_else(|| RecordsError::NotFound("Patient not found".to_string()))?;

        self.patients.delete(id)?;
        if let Err(e) = self.auth.delete_user(&patient.user_id) {
            tracing::error!(user_id = %patient.user_id, error = %e,
                "patient deleted but backing account removal failed");
        }
        Ok(())
    }

    /// Number of patients currently in Active status.
    pub fn active_patient_count(&self) -> Result<usize, RecordsError> {
        Ok(self.patients.count(&[Filter::Eq("status", Value::from("Active"))])?)
    }

    /// Number of patient profiles created since the start of the period.
    pub fn new_enrollments(&self, period: Period, now: DateTime<Utc>) -> Result<usize, RecordsError> {
        let since = period.start(now).to_rfc3339();
        Ok(self.patients.count(&[Filter::Gte("created_at", Value::from(since))])?)
    }

    fn patient_view(&self, patient: Patient) -> Result<PatientView, RecordsError> {
        let user = match self.auth.get_user(&patient.user_id) {
            Ok(u) => Some(UserSummary { id: u.id, email: u.email, is_active: u.is_active }),
            Err(carehub_auth::AuthError::NotFound(_)) => None,
            Err(e) => return Err(e.into()),
        };
        Ok(PatientView { patient, user })
    }
}

pub(crate) fn patient_indexes(p: &Patient) -> Vec<(&'static str, Value)> {
    vec![
        ("user_id", Value::from(p.user_id.clone())),
        ("status", Value::from(p.status.as_str())),
        ("created_at", Value::from(p.created_at.clone())),
        ("updated_at", Value::from(p.updated_at.clone())),
    ]
}
