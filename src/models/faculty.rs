use serde::{Deserialize, Serialize};

use super::classes::{deserialize_class_names, parse_class_list};
use super::format::{display_datetime, initials};
use super::Badge;
use crate::auth::validate::{is_email, non_empty};
use crate::paging::{Choice, RecordFilter, SearchTerm};

pub const STATUSES: &[(&str, &str)] = &[
    ("ACTIVE", "Active"),
    ("ON_LEAVE", "On Leave"),
    ("INACTIVE", "Inactive"),
];

pub const STREAMS: &[&str] = &["Science", "Commerce", "Arts", "Technology", "General"];

/// Faculty member as returned by `GET /api/admin/faculty`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Faculty {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub institute_id: Option<String>,
    #[serde(default)]
    pub stream: Option<String>,
    pub status: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub last_login: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "deserialize_class_names")]
    pub assigned_classes: Vec<String>,
}

impl Faculty {
    pub fn badge(&self) -> Badge {
        if self.status == "ACTIVE" && self.is_active {
            Badge::new("Active", "badge-success")
        } else if self.status == "ON_LEAVE" {
            Badge::new("On Leave", "badge-warning")
        } else {
            Badge::new("Inactive", "badge-danger")
        }
    }
}

/// Search on name, email and employee id; exact status match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacultyFilter {
    pub search: SearchTerm,
    pub status: Choice,
}

impl FacultyFilter {
    pub fn new(search: &str, status: &str) -> Self {
        FacultyFilter { search: SearchTerm::new(search), status: Choice::from_param(status) }
    }
}

impl RecordFilter<Faculty> for FacultyFilter {
    fn matches(&self, f: &Faculty) -> bool {
        let fields = [Some(f.full_name.as_str()), Some(f.email.as_str()), f.employee_id.as_deref()];
        self.search.matches_any(fields.into_iter().flatten()) && self.status.accepts(&f.status)
    }
}

/// Stat cards above the faculty table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacultyStats {
    pub total: usize,
    pub active: usize,
    pub on_leave: usize,
    pub inactive: usize,
}

impl FacultyStats {
    pub fn from_list(list: &[Faculty]) -> Self {
        FacultyStats {
            total: list.len(),
            active: list.iter().filter(|f| f.status == "ACTIVE" && f.is_active).count(),
            on_leave: list.iter().filter(|f| f.status == "ON_LEAVE").count(),
            inactive: list.iter().filter(|f| f.status == "INACTIVE" || !f.is_active).count(),
        }
    }
}

/// Display projection of one faculty table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacultyRow {
    pub id: i64,
    pub initials: String,
    pub full_name: String,
    pub email: String,
    pub stream: String,
    pub badge: Badge,
    pub classes: String,
    pub last_active: String,
}

impl From<&Faculty> for FacultyRow {
    fn from(f: &Faculty) -> Self {
        FacultyRow {
            id: f.id,
            initials: initials(&f.full_name),
            full_name: f.full_name.clone(),
            email: f.email.clone(),
            stream: f.stream.clone().unwrap_or_else(|| "N/A".to_string()),
            badge: f.badge(),
            classes: if f.assigned_classes.is_empty() {
                "No classes assigned".to_string()
            } else {
                f.assigned_classes.join(", ")
            },
            last_active: f.last_login.as_deref().map(display_datetime).unwrap_or_else(|| "Never".to_string()),
        }
    }
}

/// Create/edit form as posted by the browser.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FacultyForm {
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub stream: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub assigned_classes: String,
    #[serde(default)]
    pub csrf_token: String,
}

impl FacultyForm {
    pub fn from_faculty(f: &Faculty) -> Self {
        FacultyForm {
            full_name: f.full_name.clone(),
            email: f.email.clone(),
            phone: f.phone.clone().unwrap_or_default(),
            stream: f.stream.clone().unwrap_or_default(),
            status: f.status.clone(),
            assigned_classes: f.assigned_classes.join(", "),
            csrf_token: String::new(),
        }
    }

    fn common_errors(&self, classes: &[String]) -> Vec<String> {
        let mut errors = Vec::new();
        if self.full_name.trim().is_empty() {
            errors.push("Full name is required".to_string());
        }
        if !self.stream.is_empty() && !STREAMS.contains(&self.stream.as_str()) {
            errors.push(format!("Stream must be one of: {}", STREAMS.join(", ")));
        }
        if classes.is_empty() {
            errors.push("At least one class must be assigned".to_string());
        }
        if let Some(long) = classes.iter().find(|c| c.chars().count() > 50) {
            errors.push(format!("Class name '{long}' is too long (max 50 characters)"));
        }
        errors
    }

    pub fn validate_create(&self) -> Result<NewFaculty, Vec<String>> {
        let classes = parse_class_list(&self.assigned_classes);
        let mut errors = self.common_errors(&classes);
        let email = self.email.trim();
        if !is_email(email) {
            errors.push("A valid email address is required".to_string());
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(NewFaculty {
            full_name: self.full_name.trim().to_string(),
            email: email.to_string(),
            phone: non_empty(&self.phone),
            stream: non_empty(&self.stream),
            assigned_classes: classes,
        })
    }

    pub fn validate_update(&self) -> Result<FacultyUpdate, Vec<String>> {
        let classes = parse_class_list(&self.assigned_classes);
        let mut errors = self.common_errors(&classes);
        let status = self.status.trim().to_ascii_uppercase();
        if !status.is_empty() && !STATUSES.iter().any(|(value, _)| *value == status) {
            errors.push("Status must be one of: ACTIVE, ON_LEAVE, INACTIVE".to_string());
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(FacultyUpdate {
            full_name: Some(self.full_name.trim().to_string()),
            phone: non_empty(&self.phone),
            stream: non_empty(&self.stream),
            status: (!status.is_empty()).then_some(status),
            assigned_classes: Some(classes),
        })
    }
}

/// Body of `POST /api/admin/faculty`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewFaculty {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub stream: Option<String>,
    pub assigned_classes: Vec<String>,
}

/// Body of `PUT /api/admin/faculty/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacultyUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_classes: Option<Vec<String>>,
}
