use serde::{Deserialize, Serialize};

use crate::auth::validate::{is_email, MIN_PASSWORD_LEN};

/// `data` of `GET /users/profile`. Student accounts carry their enrolment
/// details as well.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UserProfile {
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub institute_id: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub roll_no: Option<String>,
    #[serde(default, rename = "class")]
    pub class_name: Option<String>,
    #[serde(default)]
    pub stream: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmailForm {
    pub email: String,
    #[serde(default)]
    pub csrf_token: String,
}

/// Body of `PUT /users/profile/email`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailUpdate {
    pub email: String,
}

impl EmailForm {
    pub fn validate(&self) -> Result<EmailUpdate, String> {
        let email = self.email.trim().to_lowercase();
        if !is_email(&email) {
            return Err("Please enter a valid email address".to_string());
        }
        Ok(EmailUpdate { email })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub csrf_token: String,
}

/// Body of `POST /users/profile/change-password`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

impl PasswordForm {
    pub fn validate(&self) -> Result<PasswordChange, String> {
        if self.current_password.is_empty() || self.new_password.is_empty() {
            return Err("Please fill in all password fields".to_string());
        }
        if self.new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(format!("New password must be at least {MIN_PASSWORD_LEN} characters"));
        }
        if self.new_password != self.confirm_password {
            return Err("New passwords do not match".to_string());
        }
        if self.new_password == self.current_password {
            return Err("New password must be different from the current password".to_string());
        }
        Ok(PasswordChange {
            current_password: self.current_password.clone(),
            new_password: self.new_password.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(current: &str, new: &str, confirm: &str) -> PasswordForm {
        PasswordForm {
            current_password: current.into(),
            new_password: new.into(),
            confirm_password: confirm.into(),
            csrf_token: String::new(),
        }
    }

    #[test]
    fn password_rules() {
        assert!(form("old-secret", "short", "short").validate().is_err());
        assert_eq!(form("old-secret", "long-enough", "long-enougj").validate().unwrap_err(), "New passwords do not match");
        assert!(form("same-pass1", "same-pass1", "same-pass1").validate().is_err());
        assert!(form("old-secret", "long-enough", "long-enough").validate().is_ok());
    }

    #[test]
    fn email_is_normalised() {
        let ok = EmailForm { email: "  Priya@School.EDU ".into(), csrf_token: String::new() };
        assert_eq!(ok.validate().unwrap().email, "priya@school.edu");
        for bad in ["", "nobody", "@x.io", "a@b", "a@.io"] {
            assert!(EmailForm { email: bad.into(), csrf_token: String::new() }.validate().is_err(), "{bad}");
        }
    }

    #[test]
    fn student_profile_reads_class_key() {
        let p: UserProfile =
            serde_json::from_str(r#"{"email": "s@x.io", "role": "STUDENT", "class": "10-A", "roll_no": "7"}"#).unwrap();
        assert_eq!(p.class_name.as_deref(), Some("10-A"));
    }
}
