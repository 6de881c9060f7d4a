use serde::{Deserialize, Serialize};

use super::auth::Role;
use super::format::{display_date, display_datetime};
use super::institute::accepts_active;
use super::Badge;
use crate::auth::validate::{non_empty, validate_email, validate_password_strength};
use crate::paging::{Choice, RecordFilter, SearchTerm};

pub const ROLE_OPTIONS: &[(&str, &str)] = &[
    ("SUPER_ADMIN", "Super Admin"),
    ("ADMIN", "Admin"),
    ("FACULTY", "Faculty"),
    ("STUDENT", "Student"),
];

/// Account row of `GET /api/super-admin/users`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlatformUser {
    pub id: i64,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub institute_id: Option<String>,
    #[serde(default)]
    pub institute_name: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_login: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub search: SearchTerm,
    pub role: Choice,
    pub active: Choice,
}

impl UserFilter {
    pub fn new(search: &str, role: &str, active: &str) -> Self {
        UserFilter {
            search: SearchTerm::new(search),
            role: Choice::from_param(role),
            active: Choice::from_param(active),
        }
    }
}

impl RecordFilter<PlatformUser> for UserFilter {
    fn matches(&self, u: &PlatformUser) -> bool {
        let fields = [Some(u.email.as_str()), u.institute_name.as_deref(), u.institute_id.as_deref()];
        self.search.matches_any(fields.into_iter().flatten())
            && self.role.accepts(&u.role)
            && accepts_active(&self.active, u.is_active)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserCounts {
    pub total: usize,
    pub admins: usize,
    pub faculty: usize,
    pub students: usize,
}

impl UserCounts {
    pub fn from_list(list: &[PlatformUser]) -> Self {
        let count = |role: &str| list.iter().filter(|u| u.role == role).count();
        UserCounts { total: list.len(), admins: count("ADMIN"), faculty: count("FACULTY"), students: count("STUDENT") }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub role: Badge,
    pub institute: String,
    pub status: Badge,
    pub created: String,
    pub last_login: String,
    pub toggle_label: &'static str,
    /// Super-admin accounts cannot be toggled or reset from the table.
    pub protected: bool,
}

impl From<&PlatformUser> for UserRow {
    fn from(u: &PlatformUser) -> Self {
        let role = Role::parse(&u.role);
        let role_badge = match role {
            Some(Role::SuperAdmin) => Badge::new("Super Admin", "badge-purple"),
            Some(Role::Admin) => Badge::new("Admin", "badge-info"),
            Some(Role::Faculty) => Badge::new("Faculty", "badge-success"),
            Some(Role::Student) => Badge::new("Student", "badge-warning"),
            None => Badge::new(u.role.clone(), "badge-muted"),
        };
        UserRow {
            id: u.id,
            email: u.email.clone(),
            role: role_badge,
            institute: u
                .institute_name
                .clone()
                .or_else(|| u.institute_id.clone())
                .unwrap_or_else(|| "-".to_string()),
            status: if u.is_active {
                Badge::new("Active", "badge-success")
            } else {
                Badge::new("Inactive", "badge-danger")
            },
            created: u.created_at.as_deref().map(display_date).unwrap_or_else(|| "-".to_string()),
            last_login: u.last_login.as_deref().map(display_datetime).unwrap_or_else(|| "Never".to_string()),
            toggle_label: if u.is_active { "Deactivate" } else { "Activate" },
            protected: role == Some(Role::SuperAdmin),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToggleUserResponse {
    pub message: String,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResetPasswordResponse {
    pub message: String,
    #[serde(default)]
    pub temp_password: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Account creation form on the users page.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UserForm {
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(default, skip_serializing)]
    pub confirm_password: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub institute_id: String,
    /// Checkbox: present (any value) when ticked.
    #[serde(default)]
    pub is_active: Option<String>,
    #[serde(default)]
    pub csrf_token: String,
}

/// Body of `POST /users/register`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub role: String,
    /// Always sent; `null` for super admins.
    pub institute_id: Option<String>,
    pub is_active: bool,
}

impl UserForm {
    pub fn validate(&self) -> Result<NewUser, Vec<String>> {
        let mut errors: Vec<String> = validate_email(&self.email).into_iter().collect();
        let role = Role::parse(self.role.trim());
        if role.is_none() {
            errors.push("Please select a role".to_string());
        }
        if self.password != self.confirm_password {
            errors.push("Passwords do not match".to_string());
        }
        errors.extend(validate_password_strength(&self.password));
        let institute_id = match role {
            Some(Role::SuperAdmin) => None,
            _ => non_empty(&self.institute_id),
        };
        if role.is_some_and(|r| r != Role::SuperAdmin) && institute_id.is_none() {
            errors.push("Institute ID is required for this role".to_string());
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(NewUser {
            email: self.email.trim().to_lowercase(),
            password: self.password.clone(),
            role: role.map(Role::as_str).unwrap_or_default().to_string(),
            institute_id,
            is_active: self.is_active.is_some(),
        })
    }
}

/// Response of `POST /users/register`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRegistered {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str, role: &str, is_active: bool) -> PlatformUser {
        PlatformUser {
            id: 1,
            email: email.into(),
            role: role.into(),
            institute_id: Some("INST-001".into()),
            institute_name: Some("Green Valley".into()),
            is_active,
            created_at: None,
            last_login: None,
        }
    }

    #[test]
    fn filter_by_role_and_state() {
        let filter = UserFilter::new("valley", "FACULTY", "inactive");
        assert!(filter.matches(&user("a@x.io", "FACULTY", false)));
        assert!(!filter.matches(&user("a@x.io", "FACULTY", true)));
        assert!(!filter.matches(&user("a@x.io", "ADMIN", false)));
    }

    #[test]
    fn super_admin_rows_are_protected() {
        assert!(UserRow::from(&user("root@x.io", "SUPER_ADMIN", true)).protected);
        let row = UserRow::from(&user("t@x.io", "FACULTY", true));
        assert!(!row.protected);
        assert_eq!(row.institute, "Green Valley");
        assert_eq!(row.last_login, "Never");
    }

    #[test]
    fn counts_by_role() {
        let list = vec![user("a", "ADMIN", true), user("b", "FACULTY", true), user("c", "FACULTY", false)];
        assert_eq!(UserCounts::from_list(&list), UserCounts { total: 3, admins: 1, faculty: 2, students: 0 });
    }

    fn user_form(role: &str, institute_id: &str) -> UserForm {
        UserForm {
            email: " New.Admin@Valley.edu ".into(),
            password: "Str0ng!pass".into(),
            confirm_password: "Str0ng!pass".into(),
            role: role.into(),
            institute_id: institute_id.into(),
            is_active: Some("on".into()),
            csrf_token: String::new(),
        }
    }

    #[test]
    fn super_admin_is_sent_without_institute() {
        let body = user_form("SUPER_ADMIN", "INST-001").validate().unwrap();
        assert_eq!(body.institute_id, None);
        let json = serde_json::to_value(&body).unwrap();
        assert!(json["institute_id"].is_null());
        assert_eq!(json["email"], "new.admin@valley.edu");
        assert_eq!(json["is_active"], true);
    }

    #[test]
    fn other_roles_need_an_institute() {
        let errors = user_form("FACULTY", "  ").validate().unwrap_err();
        assert_eq!(errors, vec!["Institute ID is required for this role"]);
        let body = user_form("FACULTY", "INST-001").validate().unwrap();
        assert_eq!(body.institute_id.as_deref(), Some("INST-001"));
    }

    #[test]
    fn passwords_must_match_and_be_strong() {
        let mismatch = UserForm { confirm_password: "Str0ng!pasS".into(), ..user_form("ADMIN", "INST-001") };
        assert_eq!(mismatch.validate().unwrap_err(), vec!["Passwords do not match"]);
        let weak = UserForm {
            password: "password".into(),
            confirm_password: "password".into(),
            is_active: None,
            ..user_form("ADMIN", "INST-001")
        };
        assert_eq!(weak.validate().unwrap_err().len(), 1);
    }
}
