use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::format::{display_date, initials};
use super::Badge;
use crate::auth::validate::{non_empty, validate_email, validate_phone, validate_required};
use crate::paging::{Choice, RecordFilter, SearchTerm};

pub const STATUSES: &[(&str, &str)] = &[
    ("ACTIVE", "Active"),
    ("INACTIVE", "Inactive"),
    ("GRADUATED", "Graduated"),
    ("SUSPENDED", "Suspended"),
];

/// Student record. The admin endpoints call the class `class_name`, the
/// faculty endpoints call it `standard`; both land in `class_name`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Student {
    pub student_id: i64,
    pub roll_no: String,
    pub full_name: String,
    #[serde(default, alias = "standard")]
    pub class_name: Option<String>,
    #[serde(default)]
    pub stream: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub attendance_percentage: Option<f64>,
    #[serde(default)]
    pub registered_by: Option<String>,
    #[serde(default)]
    pub registration_date: Option<String>,
}

impl Student {
    pub fn badge(&self) -> Badge {
        match self.status.as_str() {
            "ACTIVE" if self.is_active => Badge::new("Active", "badge-success"),
            "GRADUATED" => Badge::new("Graduated", "badge-info"),
            "SUSPENDED" => Badge::new("Suspended", "badge-warning"),
            _ => Badge::new("Inactive", "badge-danger"),
        }
    }
}

/// Search on name, roll number and email; exact class and status match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    pub search: SearchTerm,
    pub class_name: Choice,
    pub status: Choice,
}

impl StudentFilter {
    pub fn new(search: &str, class_name: &str, status: &str) -> Self {
        StudentFilter {
            search: SearchTerm::new(search),
            class_name: Choice::from_param(class_name),
            status: Choice::from_param(status),
        }
    }
}

impl RecordFilter<Student> for StudentFilter {
    fn matches(&self, s: &Student) -> bool {
        let fields = [Some(s.full_name.as_str()), Some(s.roll_no.as_str()), s.email.as_deref()];
        self.search.matches_any(fields.into_iter().flatten())
            && self.class_name.accepts_opt(s.class_name.as_deref())
            && self.status.accepts(&s.status)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StudentStats {
    pub total: usize,
    pub active: usize,
    pub classes: usize,
    pub streams: usize,
}

impl StudentStats {
    pub fn from_list(list: &[Student]) -> Self {
        let streams: BTreeSet<&str> = list
            .iter()
            .filter_map(|s| s.stream.as_deref())
            .filter(|s| !s.is_empty())
            .collect();
        StudentStats {
            total: list.len(),
            active: list.iter().filter(|s| s.status == "ACTIVE" && s.is_active).count(),
            classes: distinct_classes(list).len(),
            streams: streams.len(),
        }
    }
}

/// Sorted distinct class names, used for the class filter drop-down.
pub fn distinct_classes(list: &[Student]) -> Vec<String> {
    let set: BTreeSet<&str> = list
        .iter()
        .filter_map(|s| s.class_name.as_deref())
        .filter(|c| !c.is_empty())
        .collect();
    set.into_iter().map(str::to_string).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentRow {
    pub student_id: i64,
    pub initials: String,
    pub full_name: String,
    pub roll_no: String,
    pub email: String,
    pub class_name: String,
    pub stream: String,
    pub badge: Badge,
    pub attendance: String,
    pub registered: String,
}

impl From<&Student> for StudentRow {
    fn from(s: &Student) -> Self {
        StudentRow {
            student_id: s.student_id,
            initials: initials(&s.full_name),
            full_name: s.full_name.clone(),
            roll_no: s.roll_no.clone(),
            email: s.email.clone().unwrap_or_else(|| "-".to_string()),
            class_name: s.class_name.clone().unwrap_or_else(|| "N/A".to_string()),
            stream: s.stream.clone().unwrap_or_else(|| "N/A".to_string()),
            badge: s.badge(),
            attendance: s
                .attendance_percentage
                .map(|p| format!("{p:.1}%"))
                .unwrap_or_else(|| "-".to_string()),
            registered: s.registration_date.as_deref().map(display_date).unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Register/edit form posted from the faculty dashboard.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StudentForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub roll_no: String,
    #[serde(default)]
    pub standard: String,
    #[serde(default)]
    pub stream: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub csrf_token: String,
}

/// Body of `POST /api/faculty/students/register` (form-encoded) and
/// `PUT /api/faculty/students/{id}` (JSON).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentDraft {
    pub full_name: String,
    pub roll_no: String,
    pub standard: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl StudentForm {
    pub fn from_student(s: &Student) -> Self {
        StudentForm {
            full_name: s.full_name.clone(),
            roll_no: s.roll_no.clone(),
            standard: s.class_name.clone().unwrap_or_default(),
            stream: s.stream.clone().unwrap_or_default(),
            email: s.email.clone().unwrap_or_default(),
            phone: s.phone.clone().unwrap_or_default(),
            csrf_token: String::new(),
        }
    }

    /// Registration needs email and phone; an edit may leave them blank.
    /// `existing` is the faculty's current list, checked for a roll number
    /// already taken in the same class. `editing` is skipped in that check.
    pub fn validate(&self, existing: &[Student], editing: Option<i64>) -> Result<StudentDraft, Vec<String>> {
        let mut errors: Vec<String> = [
            validate_required(&self.full_name, "Full name", 100),
            validate_required(&self.roll_no, "Roll number", 20),
            validate_required(&self.standard, "Class", 50),
        ]
        .into_iter()
        .flatten()
        .collect();

        let registering = editing.is_none();
        if registering || !self.email.trim().is_empty() {
            errors.extend(validate_email(&self.email));
        }
        if registering || !self.phone.trim().is_empty() {
            errors.extend(validate_phone(&self.phone));
        }

        let roll_no = self.roll_no.trim();
        let standard = self.standard.trim();
        let taken = existing.iter().any(|s| {
            Some(s.student_id) != editing
                && s.roll_no.trim().eq_ignore_ascii_case(roll_no)
                && s.class_name.as_deref().map(str::trim) == Some(standard)
        });
        if !roll_no.is_empty() && taken {
            errors.push(format!("Roll number {roll_no} already exists in class {standard}"));
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(StudentDraft {
            full_name: self.full_name.trim().to_string(),
            roll_no: roll_no.to_string(),
            standard: standard.to_string(),
            stream: non_empty(&self.stream),
            email: non_empty(&self.email).map(|e| e.to_lowercase()),
            phone: non_empty(&self.phone),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(name: &str, class_name: Option<&str>, stream: Option<&str>) -> Student {
        Student {
            student_id: 1,
            roll_no: "R-1".into(),
            full_name: name.into(),
            class_name: class_name.map(String::from),
            stream: stream.map(String::from),
            email: None,
            phone: None,
            status: "ACTIVE".into(),
            is_active: true,
            attendance_percentage: None,
            registered_by: None,
            registration_date: None,
        }
    }

    #[test]
    fn standard_alias_maps_to_class_name() {
        let s: Student = serde_json::from_str(
            r#"{"student_id": 9, "roll_no": "F-9", "full_name": "Kiran", "standard": "12-B", "status": "ACTIVE", "is_active": true}"#,
        )
        .unwrap();
        assert_eq!(s.class_name.as_deref(), Some("12-B"));
    }

    #[test]
    fn class_filter_excludes_missing_class() {
        let filter = StudentFilter::new("", "10-A", "");
        assert!(filter.matches(&student("A", Some("10-A"), None)));
        assert!(!filter.matches(&student("B", None, None)));
    }

    #[test]
    fn distinct_classes_sorted() {
        let list = vec![
            student("A", Some("10-B"), Some("Arts")),
            student("B", Some("10-A"), Some("Arts")),
            student("C", Some("10-B"), Some("Science")),
            student("D", None, None),
        ];
        assert_eq!(distinct_classes(&list), vec!["10-A", "10-B"]);
        let stats = StudentStats::from_list(&list);
        assert_eq!(stats, StudentStats { total: 4, active: 4, classes: 2, streams: 2 });
    }

    fn form(roll_no: &str, standard: &str) -> StudentForm {
        StudentForm {
            full_name: "Meera Das".into(),
            roll_no: roll_no.into(),
            standard: standard.into(),
            stream: "Science".into(),
            email: "Meera@School.edu".into(),
            phone: "9876543210".into(),
            csrf_token: String::new(),
        }
    }

    #[test]
    fn register_requires_contact_details() {
        let blank = StudentForm { email: String::new(), phone: "12345".into(), ..form("R-1", "10-A") };
        let errors = blank.validate(&[], None).unwrap_err();
        assert_eq!(errors, vec!["Email is required", "Phone number must be 10 digits starting with 6-9"]);

        let edit = StudentForm { email: String::new(), phone: String::new(), ..form("R-1", "10-A") };
        let draft = edit.validate(&[], Some(1)).unwrap();
        assert_eq!((draft.email, draft.phone), (None, None));
    }

    #[test]
    fn duplicate_roll_number_in_same_class() {
        let existing = vec![student("Asha", Some("10-A"), None)];
        let errors = form("r-1", "10-A").validate(&existing, None).unwrap_err();
        assert_eq!(errors, vec!["Roll number r-1 already exists in class 10-A"]);
        assert!(form("R-1", "10-B").validate(&existing, None).is_ok());
        // Editing the same student keeps its own roll number.
        assert!(form("R-1", "10-A").validate(&existing, Some(1)).is_ok());
    }

    #[test]
    fn draft_is_trimmed_and_serialises_without_blanks() {
        let draft = StudentForm { stream: " ".into(), ..form(" R-9 ", "12-C") }.validate(&[], None).unwrap();
        assert_eq!(draft.roll_no, "R-9");
        assert_eq!(draft.email.as_deref(), Some("meera@school.edu"));
        let encoded = serde_urlencoded::to_string(&draft).unwrap();
        assert_eq!(encoded, "full_name=Meera+Das&roll_no=R-9&standard=12-C&email=meera%40school.edu&phone=9876543210");
    }
}
