use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::format::{display_date, short_date};
use super::Badge;
use crate::paging::{Choice, RecordFilter};

/// Leave days granted per academic year.
pub const ANNUAL_ALLOWANCE: usize = 12;

pub const TYPES: &[(&str, &str)] = &[
    ("SICK", "Sick Leave"),
    ("CASUAL", "Casual Leave"),
    ("EMERGENCY", "Emergency"),
    ("OTHER", "Other"),
];

pub const STATUSES: &[(&str, &str)] = &[
    ("PENDING", "Pending"),
    ("APPROVED", "Approved"),
    ("REJECTED", "Rejected"),
    ("CANCELLED", "Cancelled"),
];

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LeaveRequest {
    pub id: i64,
    #[serde(rename = "type", alias = "leave_type")]
    pub leave_type: String,
    pub status: String,
    #[serde(default)]
    pub leave_date: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub half_day_type: Option<String>,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub applied_at: Option<String>,
}

impl LeaveRequest {
    pub fn badge(&self) -> Badge {
        match self.status.as_str() {
            "PENDING" => Badge::new("Pending", "badge-warning"),
            "APPROVED" => Badge::new("Approved", "badge-success"),
            "REJECTED" => Badge::new("Rejected", "badge-danger"),
            other => Badge::new(other, "badge-info"),
        }
    }

    /// "Mar 04 - Mar 07" for a range, "Mar 04 (MORNING)" for a half day.
    pub fn dates(&self) -> String {
        match (&self.start_date, &self.end_date, &self.leave_date) {
            (Some(start), Some(end), _) => format!("{} - {}", short_date(start), short_date(end)),
            (_, _, Some(day)) => match self.half_day_type.as_deref() {
                Some(half) => format!("{} ({half})", short_date(day)),
                None => short_date(day),
            },
            _ => String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeaveStats {
    pub allocated: usize,
    pub used: usize,
    pub left: usize,
    pub pending: usize,
}

impl LeaveStats {
    pub fn from_requests(requests: &[LeaveRequest]) -> Self {
        let used = requests.iter().filter(|r| r.status == "APPROVED").count();
        LeaveStats {
            allocated: ANNUAL_ALLOWANCE,
            used,
            left: ANNUAL_ALLOWANCE.saturating_sub(used),
            pending: requests.iter().filter(|r| r.status == "PENDING").count(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaveFilter {
    pub status: Choice,
}

impl RecordFilter<LeaveRequest> for LeaveFilter {
    fn matches(&self, r: &LeaveRequest) -> bool {
        self.status.accepts(&r.status)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaveRow {
    pub id: i64,
    pub leave_type: String,
    pub dates: String,
    pub reason: String,
    pub applied: String,
    pub badge: Badge,
    pub cancellable: bool,
}

impl From<&LeaveRequest> for LeaveRow {
    fn from(r: &LeaveRequest) -> Self {
        let leave_type = TYPES
            .iter()
            .find(|(value, _)| *value == r.leave_type)
            .map(|(_, label)| label.to_string())
            .unwrap_or_else(|| r.leave_type.clone());
        LeaveRow {
            id: r.id,
            leave_type,
            dates: r.dates(),
            reason: r.reason.clone(),
            applied: r.applied_at.as_deref().map(display_date).unwrap_or_else(|| "-".to_string()),
            badge: r.badge(),
            cancellable: r.status == "PENDING",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Duration {
    Single,
    Multiple,
    Half,
}

impl Duration {
    fn parse(raw: &str) -> Option<Duration> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "SINGLE" => Some(Duration::Single),
            "MULTIPLE" => Some(Duration::Multiple),
            "HALF" => Some(Duration::Half),
            _ => None,
        }
    }
}

/// New-request form. Which date fields are required depends on `duration`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaveForm {
    #[serde(default)]
    pub leave_type: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub leave_date: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub half_day_type: String,
    #[serde(default)]
    pub csrf_token: String,
}

/// Body of `POST /api/student/leave-requests`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewLeaveRequest {
    #[serde(rename = "type")]
    pub leave_type: String,
    pub duration: Duration,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leave_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub half_day_type: Option<String>,
}

fn date_field(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

impl LeaveForm {
    pub fn validate(&self) -> Result<NewLeaveRequest, String> {
        let leave_type = self.leave_type.trim();
        let reason = self.reason.trim();
        if leave_type.is_empty() || reason.is_empty() {
            return Err("Please fill in all required fields".to_string());
        }
        let duration = Duration::parse(&self.duration).ok_or_else(|| "Please choose a leave duration".to_string())?;
        let mut request = NewLeaveRequest {
            leave_type: leave_type.to_string(),
            duration,
            reason: reason.to_string(),
            leave_date: None,
            start_date: None,
            end_date: None,
            half_day_type: None,
        };
        match duration {
            Duration::Single => {
                request.leave_date = Some(date_field(&self.leave_date).ok_or("Please select a leave date")?);
            }
            Duration::Multiple => {
                let (Some(start), Some(end)) = (date_field(&self.start_date), date_field(&self.end_date)) else {
                    return Err("Please select start and end dates".to_string());
                };
                if end < start {
                    return Err("End date cannot be before start date".to_string());
                }
                request.start_date = Some(start);
                request.end_date = Some(end);
            }
            Duration::Half => {
                let half = self.half_day_type.trim();
                let Some(day) = date_field(&self.leave_date).filter(|_| !half.is_empty()) else {
                    return Err("Please select date and half day type".to_string());
                };
                request.leave_date = Some(day);
                request.half_day_type = Some(half.to_string());
            }
        }
        Ok(request)
    }
}
