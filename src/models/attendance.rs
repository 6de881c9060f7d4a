use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::format::{display_date, parse_date};
use super::{percent, Badge, SelectOption};
use crate::paging::{Choice, RecordFilter, SearchTerm};

pub const STATUSES: &[(&str, &str)] = &[
    ("PRESENT", "Present"),
    ("ABSENT", "Absent"),
    ("LATE", "Late"),
    ("HALF_DAY", "Half Day"),
    ("LEAVE", "Leave"),
];

/// Statuses an existing record can be changed to.
pub const EDIT_STATUSES: &[(&str, &str)] = &[
    ("PRESENT", "Present"),
    ("ABSENT", "Absent"),
    ("LATE", "Late"),
    ("HALF_DAY", "Half Day"),
];

pub fn status_badge(status: &str) -> Badge {
    match status {
        "PRESENT" => Badge::new("Present", "badge-success"),
        "ABSENT" => Badge::new("Absent", "badge-danger"),
        "LATE" => Badge::new("Late", "badge-warning"),
        "HALF_DAY" => Badge::new("Half Day", "badge-info"),
        "LEAVE" => Badge::new("Leave", "badge-purple"),
        other => Badge::new(other, "badge-info"),
    }
}

// ---------- Institute-wide daily attendance (admin) ----------

/// Row of `GET /api/admin/attendance/daily`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DailyAttendance {
    pub id: i64,
    pub student_id: i64,
    pub student_name: String,
    pub roll_no: String,
    #[serde(default)]
    pub class_name: Option<String>,
    pub attendance_date: String,
    pub status: String,
    #[serde(default)]
    pub recorded_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Response of `GET /api/admin/attendance/stats`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AttendanceStats {
    #[serde(default)]
    pub date: String,
    pub total_students: i64,
    pub present_count: i64,
    pub absent_count: i64,
    #[serde(default)]
    pub late_count: i64,
    #[serde(default)]
    pub half_day_count: i64,
    pub attendance_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyAttendanceFilter {
    pub search: SearchTerm,
    pub status: Choice,
    pub class_name: Choice,
}

impl DailyAttendanceFilter {
    pub fn new(search: &str, status: &str, class_name: &str) -> Self {
        DailyAttendanceFilter {
            search: SearchTerm::new(search),
            status: Choice::from_param(status),
            class_name: Choice::from_param(class_name),
        }
    }
}

impl RecordFilter<DailyAttendance> for DailyAttendanceFilter {
    fn matches(&self, r: &DailyAttendance) -> bool {
        self.search.matches_any([r.student_name.as_str(), r.roll_no.as_str()])
            && self.status.accepts(&r.status)
            && self.class_name.accepts_opt(r.class_name.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyAttendanceRow {
    pub id: i64,
    pub student_id: i64,
    pub student_name: String,
    pub roll_no: String,
    pub class_name: String,
    pub badge: Badge,
    pub recorded_by: String,
    /// Status drop-down for the edit control, current status selected.
    pub edit_options: Vec<SelectOption>,
}

impl From<&DailyAttendance> for DailyAttendanceRow {
    fn from(r: &DailyAttendance) -> Self {
        DailyAttendanceRow {
            id: r.id,
            student_id: r.student_id,
            student_name: r.student_name.clone(),
            roll_no: r.roll_no.clone(),
            class_name: r.class_name.clone().unwrap_or_else(|| "N/A".to_string()),
            badge: status_badge(&r.status),
            recorded_by: r.recorded_by.clone().unwrap_or_else(|| "System".to_string()),
            edit_options: SelectOption::choices(EDIT_STATUSES, &r.status),
        }
    }
}

/// Status change for one existing record.
#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceEditForm {
    pub status: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub csrf_token: String,
}

/// Body of `PUT /api/admin/attendance/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceUpdate {
    pub status: String,
    pub recorded_by: String,
}

impl AttendanceEditForm {
    pub fn validate(&self, recorded_by: &str) -> Result<AttendanceUpdate, String> {
        let status = self.status.trim().to_ascii_uppercase();
        if !EDIT_STATUSES.iter().any(|(value, _)| *value == status) {
            return Err(format!("Invalid status '{}'", self.status.trim()));
        }
        Ok(AttendanceUpdate { status, recorded_by: recorded_by.to_string() })
    }
}

/// Single mark submitted from the daily attendance page.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkAttendanceForm {
    pub student_id: i64,
    pub status: String,
    pub date: String,
    #[serde(default)]
    pub csrf_token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceMark {
    pub student_id: i64,
    pub status: String,
}

/// Body of `POST /api/admin/attendance/mark`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkAttendance {
    pub date: NaiveDate,
    pub attendance_records: Vec<AttendanceMark>,
}

impl MarkAttendanceForm {
    pub fn validate(&self) -> Result<BulkAttendance, String> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|_| "Invalid attendance date".to_string())?;
        let status = self.status.trim().to_ascii_uppercase();
        if !STATUSES.iter().any(|(value, _)| *value == status) {
            return Err(format!("Unknown attendance status '{}'", self.status));
        }
        Ok(BulkAttendance {
            date,
            attendance_records: vec![AttendanceMark { student_id: self.student_id, status }],
        })
    }
}

// ---------- Personal attendance history (student) ----------

/// Row of `GET /api/student/attendance/records`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StudentAttendanceRecord {
    #[serde(default)]
    pub id: Option<i64>,
    pub date: String,
    #[serde(default)]
    pub formatted_date: String,
    #[serde(default)]
    pub day_name: String,
    pub status: String,
    #[serde(default)]
    pub time_in: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub recorded_by: Option<String>,
}

impl StudentAttendanceRecord {
    fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

/// `data` payload of the records endpoint; only the records are used, the
/// server-side statistics are recomputed from the full list.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StudentRecordsPayload {
    #[serde(default)]
    pub records: Vec<StudentAttendanceRecord>,
}

/// Month, year and status drop-downs plus free text over date, day name and
/// remarks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordsFilter {
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub status: Choice,
    pub search: SearchTerm,
}

impl RecordsFilter {
    pub fn new(month: &str, year: &str, status: &str, search: &str) -> Self {
        RecordsFilter {
            month: month.trim().parse().ok().filter(|m| (1..=12).contains(m)),
            year: year.trim().parse().ok(),
            status: Choice::from_param(status),
            search: SearchTerm::new(search),
        }
    }
}

impl RecordFilter<StudentAttendanceRecord> for RecordsFilter {
    fn matches(&self, r: &StudentAttendanceRecord) -> bool {
        let date = r.parsed_date();
        if let Some(month) = self.month {
            if date.map(|d| d.month()) != Some(month) {
                return false;
            }
        }
        if let Some(year) = self.year {
            if date.map(|d| d.year()) != Some(year) {
                return false;
            }
        }
        let remarks = r.remarks.as_deref().unwrap_or("");
        self.status.accepts(&r.status)
            && self.search.matches_any([r.formatted_date.as_str(), r.day_name.as_str(), remarks])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordStats {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    pub percent: u32,
}

impl RecordStats {
    pub fn from_records(records: &[StudentAttendanceRecord]) -> Self {
        let total = records.len();
        let present = records.iter().filter(|r| r.status == "PRESENT").count();
        RecordStats { total, present, absent: total - present, percent: percent(present, total) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentRecordRow {
    pub date: String,
    pub day_name: String,
    pub badge: Badge,
    pub time_in: String,
    pub remarks: String,
    pub recorded_by: String,
}

impl From<&StudentAttendanceRecord> for StudentRecordRow {
    fn from(r: &StudentAttendanceRecord) -> Self {
        StudentRecordRow {
            date: if r.formatted_date.is_empty() { display_date(&r.date) } else { r.formatted_date.clone() },
            day_name: r.day_name.clone(),
            badge: status_badge(&r.status),
            time_in: r.time_in.clone().unwrap_or_else(|| "--".to_string()),
            remarks: r.remarks.clone().filter(|s| !s.is_empty()).unwrap_or_else(|| "-".to_string()),
            recorded_by: r.recorded_by.clone().unwrap_or_else(|| "System".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, status: &str, remarks: &str) -> StudentAttendanceRecord {
        StudentAttendanceRecord {
            id: None,
            date: date.into(),
            formatted_date: display_date(date),
            day_name: "Monday".into(),
            status: status.into(),
            time_in: None,
            remarks: Some(remarks.into()),
            recorded_by: None,
        }
    }

    #[test]
    fn records_filter_by_month_and_year() {
        let filter = RecordsFilter::new("3", "2025", "all", "");
        assert!(filter.matches(&record("2025-03-10", "PRESENT", "")));
        assert!(!filter.matches(&record("2025-04-10", "PRESENT", "")));
        assert!(!filter.matches(&record("2024-03-10", "PRESENT", "")));
        assert!(!filter.matches(&record("garbage", "PRESENT", "")));
    }

    #[test]
    fn records_filter_all_is_no_filter() {
        let filter = RecordsFilter::new("all", "all", "all", "");
        assert_eq!(filter, RecordsFilter::default());
    }

    #[test]
    fn records_search_covers_remarks() {
        let filter = RecordsFilter::new("", "", "", "face");
        assert!(filter.matches(&record("2025-03-10", "PRESENT", "Face recognition verified")));
        assert!(!filter.matches(&record("2025-03-10", "ABSENT", "No attendance recorded")));
    }

    #[test]
    fn record_stats_round_percent() {
        let records = vec![
            record("2025-03-10", "PRESENT", ""),
            record("2025-03-11", "ABSENT", ""),
            record("2025-03-12", "PRESENT", ""),
        ];
        assert_eq!(RecordStats::from_records(&records), RecordStats { total: 3, present: 2, absent: 1, percent: 67 });
    }

    #[test]
    fn mark_form_validates_status_and_date() {
        let form = MarkAttendanceForm { student_id: 4, status: "late".into(), date: "2025-03-10".into(), csrf_token: String::new() };
        let bulk = form.validate().unwrap();
        assert_eq!(bulk.attendance_records[0].status, "LATE");
        let json = serde_json::to_value(&bulk).unwrap();
        assert_eq!(json["date"], "2025-03-10");

        let bad = MarkAttendanceForm { student_id: 4, status: "EXCUSED".into(), date: "2025-03-10".into(), csrf_token: String::new() };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn edit_form_rejects_leave_status() {
        let form = AttendanceEditForm { status: " half_day ".into(), date: "2025-03-10".into(), csrf_token: String::new() };
        assert_eq!(
            form.validate("42").unwrap(),
            AttendanceUpdate { status: "HALF_DAY".into(), recorded_by: "42".into() }
        );
        let leave = AttendanceEditForm { status: "LEAVE".into(), ..form };
        assert_eq!(leave.validate("42").unwrap_err(), "Invalid status 'LEAVE'");
    }

    #[test]
    fn row_preselects_current_status() {
        let record: DailyAttendance = serde_json::from_value(serde_json::json!({
            "id": 31, "student_id": 4, "student_name": "Ravi", "roll_no": "R-4",
            "attendance_date": "2025-03-10", "status": "LATE"
        }))
        .unwrap();
        let row = DailyAttendanceRow::from(&record);
        assert_eq!(row.id, 31);
        let selected: Vec<&str> = row.edit_options.iter().filter(|o| o.selected).map(|o| o.value.as_str()).collect();
        assert_eq!(selected, vec!["LATE"]);
        assert_eq!(row.edit_options.len(), EDIT_STATUSES.len());
    }
}
