use carehub_core::{new_id, now_rfc3339, ListParams, ListResult};
use carehub_store::{Filter, Value};

use crate::credential::Credential;
use crate::model::{CreateUser, Role, StaffInfo, UpdateUser, User};
use crate::service::{AuthError, AuthService};

/// Roles offered as course instructors.
const INSTRUCTOR_ROLES: &[Role] =
    &[Role::Staff, Role::MentalHealthCounselor, Role::ExecutiveDirector];

/// Lowercase and trim an email for lookup and storage.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Staff-like roles must carry a staff profile; no one else may.
fn check_role_fields(role: Role, staff_info: &Option<StaffInfo>) -> Result<(), AuthError> {
    if role.is_staff_like() && staff_info.is_none() {
        return Err(AuthError::Validation(
            "Staff information is required for this role.".to_string(),
        ));
    }
    if !role.is_staff_like() && staff_info.is_some() {
        return Err(AuthError::Validation(format!(
            "Staff information is not valid for role '{}'.",
            role
        )));
    }
    Ok(())
}

impl AuthService {
    /// Create a new user with a freshly derived credential.
    pub fn create_user(&self, input: CreateUser) -> Result<User, AuthError> {
        let email = normalize_email(&input.email);
        if email.is_empty() {
            return Err(AuthError::Validation("Email is required.".to_string()));
        }
        check_role_fields(input.role, &input.staff_info)?;

        if self.find_by_email(&email)?.is_some() {
            return Err(AuthError::DuplicateEmail(
                "A user with this email already exists.".to_string(),
            ));
        }

        let now = now_rfc3339();
        let user = User {
            id: new_id(),
            email,
            role: Some(input.role),
            credential: Credential::derive(&input.password),
            staff_info: input.staff_info,
            course_id: input.course_id,
            is_active: true,
            created_at: now.clone(),
            updated_at: now,
        };

        self.users.insert(&user.id, &user, &user_indexes(&user))?;
        Ok(user)
    }

    /// Get a user by id.
    pub fn get_user(&self, id: &str) -> Result<User, AuthError> {
        self.users
            .get(id)?
            .ok_or_else(|| AuthError::NotFound(format!("user {}", id)))
    }

    /// Find a user by (raw) email, normalized before lookup.
    pub fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let user = self
            .users
            .find_one(&[Filter::Eq("email", Value::from(normalize_email(email)))])?;
        Ok(user)
    }

    /// List users, optionally filtered by a comma-separated role list.
    pub fn list_users(&self, params: &ListParams) -> Result<ListResult<User>, AuthError> {
        let mut filters = Vec::new();
        if let Some(roles) = &params.role {
            let mut values = Vec::new();
            for part in roles.split(',') {
                let role: Role = part
                    .parse()
                    .map_err(AuthError::Validation)?;
                values.push(Value::from(role.as_str()));
            }
            filters.push(Filter::In("role", values));
        }
        let (items, total) = self.users.list(&filters, params.limit, params.offset)?;
        Ok(ListResult { items, total })
    }

    /// List users who can serve as course instructors.
    pub fn list_instructors(&self) -> Result<Vec<User>, AuthError> {
        let values = INSTRUCTOR_ROLES.iter().map(|r| Value::from(r.as_str())).collect();
        let (items, _) = self.users.list(&[Filter::In("role", values)], i64::MAX as usize, 0)?;
        Ok(items)
    }

    /// Update a user's email, role, staff profile, course, or activity.
    /// Password changes go through a separate path.
    pub fn update_user(&self, id: &str, input: UpdateUser) -> Result<User, AuthError> {
        let mut user = self.get_user(id)?;

        if let Some(email) = input.email {
            user.email = normalize_email(&email);
        }
        if let Some(role) = input.role {
            user.role = Some(role);
        }
        if let Some(staff_info) = input.staff_info {
            user.staff_info = Some(staff_info);
        }
        if let Some(course_id) = input.course_id {
            user.course_id = Some(course_id);
        }
        if let Some(is_active) = input.is_active {
            user.is_active = is_active;
        }

        if let Some(role) = user.role {
            check_role_fields(role, &user.staff_info)?;
        }

        user.updated_at = now_rfc3339();
        self.users.update(id, &user, &user_indexes(&user))?;
        Ok(user)
    }

    /// Hard-delete a user by id.
    pub fn delete_user(&self, id: &str) -> Result<(), AuthError> {
        if !self.users.delete(id)? {
            return Err(AuthError::NotFound(format!("user {}", id)));
        }
        Ok(())
    }
}

fn user_indexes(user: &User) -> Vec<(&'static str, Value)> {
    vec![
        ("email", Value::from(user.email.clone())),
        (
            "role",
            user.role.map(|r| Value::from(r.as_str())).unwrap_or(Value::Null),
        ),
        ("is_active", Value::from(user.is_active)),
        ("created_at", Value::from(user.created_at.clone())),
        ("updated_at", Value::from(user.updated_at.clone())),
    ]
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use carehub_store::SqliteStore;

    use super::*;
    use crate::model::{EmploymentStatus, Gender};
    use crate::service::AuthConfig;

    pub(crate) fn test_service() -> Arc<AuthService> {
        let store: carehub_store::Store = Arc::new(SqliteStore::open_in_memory().unwrap());
        AuthService::new(store, AuthConfig::default()).unwrap()
    }

    pub(crate) fn staff_info() -> StaffInfo {
        StaffInfo {
            full_name: "Grace Mensah".to_string(),
            gender: Gender::Female,
            position: "Program Officer".to_string(),
            employment_status: EmploymentStatus::FullTime,
        }
    }

    fn create(svc: &AuthService, email: &str, role: Role) -> User {
        let staff_info = role.is_staff_like().then(staff_info);
        svc.create_user(CreateUser {
            email: email.to_string(),
            password: "pw123456".to_string(),
            role,
            staff_info,
            course_id: None,
        })
        .unwrap()
    }

    #[test]
    fn user_crud() {
        let svc = test_service();

        let user = create(&svc, "Alice@X.com", Role::Admin);
        assert_eq!(user.email, "alice@x.com");
        assert!(user.is_active);

        let fetched = svc.get_user(&user.id).unwrap();
        assert_eq!(fetched.email, "alice@x.com");
        assert!(fetched.credential.verify("pw123456"));

        let updated = svc
            .update_user(
                &user.id,
                UpdateUser { is_active: Some(false), ..Default::default() },
            )
            .unwrap();
        assert!(!updated.is_active);

        svc.delete_user(&user.id).unwrap();
        assert!(matches!(svc.get_user(&user.id), Err(AuthError::NotFound(_))));
        assert!(matches!(svc.delete_user(&user.id), Err(AuthError::NotFound(_))));
    }

    #[test]
    fn duplicate_email_rejected() {
        let svc = test_service();
        create(&svc, "a@x.com", Role::Student);
        let err = svc
            .create_user(CreateUser {
                email: "A@X.COM ".to_string(),
                password: "other".to_string(),
                role: Role::Patient,
                staff_info: None,
                course_id: None,
            })
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail(_)));
    }

    #[test]
    fn staff_info_required_for_staff_roles() {
        let svc = test_service();
        let err = svc
            .create_user(CreateUser {
                email: "n@x.com".to_string(),
                password: "pw".to_string(),
                role: Role::Nurse,
                staff_info: None,
                course_id: None,
            })
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        let err = svc
            .create_user(CreateUser {
                email: "s@x.com".to_string(),
                password: "pw".to_string(),
                role: Role::Student,
                staff_info: Some(staff_info()),
                course_id: None,
            })
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[test]
    fn role_filter_and_instructors() {
        let svc = test_service();
        create(&svc, "a@x.com", Role::Student);
        create(&svc, "b@x.com", Role::Staff);
        create(&svc, "c@x.com", Role::MentalHealthCounselor);
        create(&svc, "d@x.com", Role::Admin);

        let list = svc
            .list_users(&ListParams {
                role: Some("staff,Mental Health Counselor".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(list.total, 2);

        let instructors = svc.list_instructors().unwrap();
        assert_eq!(instructors.len(), 2);
        assert!(instructors.iter().all(|u| u.role != Some(Role::Admin)));
    }
}
