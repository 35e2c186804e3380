use carehub_auth::model::{CreateUser, Role};
use carehub_core::{merge_patch, new_id, now_rfc3339, ListParams, ListResult};
use carehub_store::Value;

use crate::model::{CreateStudent, Student, StudentView, UserSummary};
use crate::service::{finish_or_undo, RecordsError, RecordsService};

const PROTECTED_FIELDS: &[&str] = &["id", "user_id", "created_at", "updated_at"];

impl RecordsService {
    /// Create a student profile and its backing user account. The caller
    /// supplies the initial password; the profile insert rolls the
    /// account back on failure.
    pub fn create_student(&self, input: CreateStudent) -> Result<StudentView, RecordsError> {
        if input.personal_information.full_name.trim().is_empty() {
            return Err(RecordsError::Validation("Full name is required.".to_string()));
        }

        let user = self.auth.create_user(CreateUser {
            email: input.email,
            password: input.password,
            role: Role::Student,
            staff_info: None,
            course_id: None,
        })?;

        let now = now_rfc3339();
        let student = Student {
            id: new_id(),
            user_id: user.id.clone(),
            personal_information: input.personal_information,
            parent_guardian_information: input.parent_guardian_information,
            course_of_study: input.course_of_study,
            enrollment_status: Default::default(),
            created_at: now.clone(),
            updated_at: now,
        };

        finish_or_undo(
            self.students
                .insert(&student.id, &student, &student_indexes(&student))
                .map_err(RecordsError::from),
            || self.auth.delete_user(&user.id).map_err(RecordsError::from),
            &user.id,
        )?;

        Ok(StudentView {
            user: Some(UserSummary { id: user.id, email: user.email, is_active: user.is_active }),
            student,
        })
    }

    pub fn get_student(&self, id: &str) -> Result<StudentView, RecordsError> {
        let student: Student = self
            .students
            .get(id)?
            .ok_or_else(|| RecordsError::NotFound("Student not found".to_string()))?;
        self.student_view(student)
    }

    pub fn list_students(&self, params: &ListParams) -> Result<ListResult<StudentView>, RecordsError> {
        let (students, total): (Vec<Student>, usize) =
            self.students.list(&[], params.limit, params.offset)?;
        let mut items = Vec::with_capacity(students.len());
        for s in students {
            items.push(self.student_view(s)?);
        }
        Ok(ListResult { items, total })
    }

    /// Merge-patch update, same contract as patients.
    pub fn update_student(
        &self,
        id: &str,
        patch: serde_json::Value,
    ) -> Result<StudentView, RecordsError> {
        let student: Student = self
            .students
            .get(id)?
            .ok_or_else(|| RecordsError::NotFound("Student not found".to_string()))?;

        let mut doc = serde_json::to_value(&student)
            .map_err(|e| RecordsError::Internal(e.to_string()))?;
        let mut patch = patch;
        if let Some(obj) = patch.as_object_mut() {
            for field in PROTECTED_FIELDS {
                obj.remove(*field);
            }
        }
        merge_patch(&mut doc, &patch);

        let mut updated: Student = serde_json::from_value(doc)
            .map_err(|e| RecordsError::Validation(e.to_string()))?;
        updated.updated_at = now_rfc3339();

        self.students.update(id, &updated, &student_indexes(&updated))?;
        self.student_view(updated)
    }

    /// Delete a student profile and its backing user account.
    pub fn delete_student(&self, id: &str) -> Result<(), RecordsError> {
        let student: Student = self
            .students
            .get(id)?
            .ok_or_else(|| RecordsError::NotFound("Student not found".to_string()))?;

        self.students.delete(id)?;
        if let Err(e) = self.auth.delete_user(&student.user_id) {
            tracing::error!(user_id = %student.user_id, error = %e,
                "student deleted but backing account removal failed");
        }
        Ok(())
    }

    fn student_view(&self, student: Student) -> Result<StudentView, RecordsError> {
        let user = match self.auth.get_user(&student.user_id) {
            Ok(u) => Some(UserSummary { id: u.id, email: u.email, is_active: u.is_active }),
            Err(carehub_auth::AuthError::NotFound(_)) => None,
            Err(e) => return Err(e.into()),
        };
        Ok(StudentView { student, user })
    }
}

fn student_indexes(s: &Student) -> Vec<(&'static str, Value)> {
    vec![
        ("user_id", Value::from(s.user_id.clone())),
        ("enrollment_status", Value::from(s.enrollment_status.as_str())),
        ("created_at", Value::from(s.created_at.clone())),
        ("updated_at", Value::from(s.updated_at.clone())),
    ]
}
