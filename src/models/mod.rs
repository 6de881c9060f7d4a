pub mod attendance;
pub mod auth;
pub mod calendar;
pub mod charts;
pub mod classes;
pub mod dashboard;
pub mod faculty;
pub mod format;
pub mod institute;
pub mod leave;
pub mod platform_user;
pub mod profile;
pub mod student;

use serde::{Deserialize, Serialize};

/// `{"success": bool, "data": ..., "message": ...}` wrapper used by the
/// student and profile endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Coloured pill shown in a status column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: String,
    pub class: &'static str,
}

impl Badge {
    pub fn new(label: impl Into<String>, class: &'static str) -> Self {
        Badge { label: label.into(), class }
    }
}

/// `<option>` entry for a filter drop-down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    /// Build options from `(value, label)` pairs, preceded by an "all"
    /// entry with an empty value.
    pub fn with_all(all_label: &str, pairs: &[(&str, &str)], selected: &str) -> Vec<SelectOption> {
        let mut options = vec![SelectOption {
            value: String::new(),
            label: all_label.to_string(),
            selected: selected.is_empty(),
        }];
        options.extend(pairs.iter().map(|(value, label)| SelectOption {
            value: value.to_string(),
            label: label.to_string(),
            selected: *value == selected,
        }));
        options
    }

    /// Options from `(value, label)` pairs with no "all" entry.
    pub fn choices(pairs: &[(&str, &str)], selected: &str) -> Vec<SelectOption> {
        pairs
            .iter()
            .map(|(value, label)| SelectOption {
                value: value.to_string(),
                label: label.to_string(),
                selected: *value == selected,
            })
            .collect()
    }

    /// Options whose value and label are the same string.
    pub fn from_values(all_label: &str, values: &[String], selected: &str) -> Vec<SelectOption> {
        let pairs: Vec<(&str, &str)> = values.iter().map(|v| (v.as_str(), v.as_str())).collect();
        Self::with_all(all_label, &pairs, selected)
    }
}

/// Percentage of `part` in `whole`, rounded to the nearest integer.
pub fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_and_handles_zero() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(12, 12), 100);
    }

    #[test]
    fn select_options_mark_selection() {
        let options = SelectOption::with_all("All", &[("ACTIVE", "Active"), ("INACTIVE", "Inactive")], "ACTIVE");
        assert_eq!(options.len(), 3);
        assert!(!options[0].selected);
        assert!(options[1].selected);
    }

    #[test]
    fn envelope_tolerates_missing_data() {
        let env: ApiEnvelope<Vec<i32>> = serde_json::from_str(r#"{"success": false, "message": "nope"}"#).unwrap();
        assert!(!env.success);
        assert!(env.data.is_none());
        assert_eq!(env.message.as_deref(), Some("nope"));
    }
}
