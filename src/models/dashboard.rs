use serde::{Deserialize, Serialize};

use super::attendance::StudentAttendanceRecord;
use super::classes::deserialize_class_names;

// ---------- Shared ----------

/// One point of a weekly trend. Admin and faculty trends label points with
/// `day_name` and `attendance_rate`; the student trend uses `week` and
/// `attendance_percent`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TrendPoint {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(alias = "day_name", alias = "week")]
    pub label: String,
    #[serde(alias = "attendance_rate", alias = "attendance_percent")]
    pub rate: f64,
    #[serde(default, alias = "present_days")]
    pub present: Option<i64>,
    #[serde(default, alias = "working_days")]
    pub total: Option<i64>,
}

/// Standing label for an attendance percentage.
pub fn standing(percent: f64) -> (&'static str, &'static str) {
    if percent >= 90.0 {
        ("Excellent", "text-success")
    } else if percent >= 75.0 {
        ("Good", "text-warning")
    } else if percent >= 60.0 {
        ("Fair", "text-warning")
    } else {
        ("Needs Improvement", "text-danger")
    }
}

// ---------- Admin ----------

/// Response of `GET /api/admin/dashboard-stats`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AdminDashboardStats {
    pub total_students: i64,
    pub today_attendance_rate: f64,
    pub active_faculty: i64,
    #[serde(default)]
    pub weekly_trend: Vec<TrendPoint>,
    #[serde(default)]
    pub today_present: i64,
    #[serde(default)]
    pub today_absent: i64,
    #[serde(default)]
    pub today_total: i64,
}

// ---------- Faculty ----------

/// Response of `GET /api/faculty/stats`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FacultyDashboardStats {
    pub my_students: i64,
    pub my_classes: i64,
    pub today_attendance_rate: f64,
    #[serde(default)]
    pub today_present: i64,
    #[serde(default)]
    pub today_absent: i64,
    #[serde(default)]
    pub today_total: i64,
    #[serde(default)]
    pub weekly_average_attendance: f64,
    #[serde(default, deserialize_with = "deserialize_class_names")]
    pub assigned_classes: Vec<String>,
    #[serde(default)]
    pub weekly_trend: Vec<TrendPoint>,
}

// ---------- Student ----------

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StudentInfo {
    #[serde(default)]
    pub student_id: Option<i64>,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub roll_no: String,
    #[serde(default)]
    pub standard: Option<String>,
    #[serde(default)]
    pub stream: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub institute_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AcademicStats {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub attendance_percent: f64,
    #[serde(default)]
    pub present_days: i64,
    #[serde(default)]
    pub working_days: i64,
    #[serde(default)]
    pub current_streak: i64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MonthlyStats {
    #[serde(default)]
    pub current_month: String,
    #[serde(default)]
    pub present_days: i64,
    #[serde(default)]
    pub absent_days: i64,
    #[serde(default)]
    pub working_days: i64,
    #[serde(default)]
    pub attendance_percent: f64,
    #[serde(default)]
    pub total_month_working_days: i64,
}

/// `data` of `GET /api/student/dashboard/stats`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StudentDashboard {
    #[serde(default)]
    pub student_info: StudentInfo,
    #[serde(default)]
    pub academic_stats: AcademicStats,
    #[serde(default)]
    pub monthly_stats: MonthlyStats,
    #[serde(default)]
    pub weekly_trend: Vec<TrendPoint>,
    #[serde(default)]
    pub recent_attendance: Vec<StudentAttendanceRecord>,
    #[serde(default)]
    pub current_time: Option<String>,
    #[serde(default)]
    pub attendance_cutoff_time: Option<String>,
}

// ---------- Super admin ----------

/// Response of `GET /api/super-admin/dashboard-stats`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SuperAdminStats {
    #[serde(default)]
    pub total_institutes: i64,
    #[serde(default)]
    pub active_institutes: i64,
    #[serde(default)]
    pub inactive_institutes: i64,
    #[serde(default)]
    pub total_users: i64,
    #[serde(default)]
    pub admin_count: i64,
    #[serde(default)]
    pub faculty_count: i64,
    #[serde(default)]
    pub student_count: i64,
    #[serde(default)]
    pub monthly_revenue: f64,
    #[serde(default)]
    pub revenue_growth: f64,
    #[serde(default, alias = "basic_plan")]
    pub monthly_plan: i64,
    #[serde(default, alias = "premium_plan")]
    pub annual_plan: i64,
    #[serde(default)]
    pub active_subscriptions: i64,
    #[serde(default)]
    pub pending_payments: i64,
    #[serde(default)]
    pub pending_amount: f64,
    #[serde(default)]
    pub institute_growth: f64,
}

/// `{"labels": [...], "values": [...]}` as returned by the registration and
/// subscription chart endpoints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LabelledCounts {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub values: Vec<f64>,
}
