//! Student dashboard reshaping: record filters, statistics, the month grid
//! and leave bookkeeping.

mod common;

use chrono::NaiveDate;

use attendance_dashboards::models::attendance::{RecordStats, RecordsFilter};
use attendance_dashboards::models::calendar::{MonthCursor, MonthGrid};
use attendance_dashboards::models::leave::{LeaveRequest, LeaveStats};
use attendance_dashboards::paging::{paginate, PageSize, RecordFilter};
use common::*;

fn march_records() -> Vec<attendance_dashboards::models::attendance::StudentAttendanceRecord> {
    vec![
        record("2025-02-28", "PRESENT", None),
        record("2025-03-03", "PRESENT", Some("On time")),
        record("2025-03-04", "ABSENT", Some("Fever")),
        record("2025-03-05", "PRESENT", None),
        record("not-a-date", "PRESENT", None),
    ]
}

#[test]
fn test_month_and_year_filters() {
    let records = march_records();
    let filter = RecordsFilter::new("3", "2025", "all", "");
    let hits: Vec<_> = records.iter().filter(|r| filter.matches(r)).map(|r| r.date.as_str()).collect();
    assert_eq!(hits, vec!["2025-03-03", "2025-03-04", "2025-03-05"]);
}

#[test]
fn test_unparseable_date_only_passes_without_date_filters() {
    let records = march_records();
    let open = RecordsFilter::new("", "", "", "");
    assert_eq!(records.iter().filter(|r| open.matches(r)).count(), 5);
    let by_year = RecordsFilter::new("", "2025", "", "");
    assert_eq!(records.iter().filter(|r| by_year.matches(r)).count(), 4);
}

#[test]
fn test_status_and_remark_search() {
    let records = march_records();
    let absent = RecordsFilter::new("", "", "ABSENT", "");
    assert_eq!(records.iter().filter(|r| absent.matches(r)).count(), 1);
    let fever = RecordsFilter::new("", "", "all", "FEVER");
    let paged = paginate(&records, |r| fever.matches(r), 1, PageSize::new(10));
    assert_eq!(paged.total_filtered, 1);
    assert_eq!(paged.label("records"), "Showing 1-1 of 1 records");
}

#[test]
fn test_record_stats_round_percentage() {
    let records = vec![
        record("2025-03-03", "PRESENT", None),
        record("2025-03-04", "PRESENT", None),
        record("2025-03-05", "ABSENT", None),
    ];
    let stats = RecordStats::from_records(&records);
    assert_eq!((stats.total, stats.present, stats.absent, stats.percent), (3, 2, 1, 67));
    assert_eq!(RecordStats::from_records(&[]).percent, 0);
}

#[test]
fn test_fallback_grid_is_sunday_first() {
    // 1 March 2025 is a Saturday: six leading blanks.
    let cursor = MonthCursor::new(2025, 3).unwrap();
    let today = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
    let grid = MonthGrid::fallback(cursor, today);

    assert!(grid.fallback);
    assert_eq!(grid.title, "March 2025");
    assert_eq!(grid.cells.iter().take_while(|c| c.is_blank()).count(), 6);
    assert_eq!(grid.cells.len(), 6 + 31);
    let first = &grid.cells[6];
    assert_eq!(first.label, "1");
    assert!(first.class.contains("weekend"));
    let twelfth = &grid.cells[6 + 11];
    assert!(twelfth.class.contains("today"));
    assert!(!twelfth.class.contains("weekend"));
}

#[test]
fn test_future_months_are_clamped() {
    let today = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
    let (cursor, clamped) = MonthCursor::new(2025, 4).unwrap().clamp_to(today);
    assert!(clamped);
    assert_eq!((cursor.year, cursor.month), (2025, 3));
    let (cursor, clamped) = MonthCursor::new(2024, 12).unwrap().clamp_to(today);
    assert!(!clamped);
    assert_eq!(cursor.next().next().next(), MonthCursor::new(2025, 3).unwrap());
}

#[test]
fn test_leave_balance() {
    let requests: Vec<LeaveRequest> = serde_json::from_value(serde_json::json!([
        {"id": 1, "type": "SICK", "status": "APPROVED", "leave_date": "2025-02-10", "reason": "Flu"},
        {"id": 2, "type": "CASUAL", "status": "APPROVED", "start_date": "2025-02-20", "end_date": "2025-02-21", "reason": "Trip"},
        {"id": 3, "type": "OTHER", "status": "PENDING", "leave_date": "2025-03-20", "reason": "Function"},
        {"id": 4, "type": "SICK", "status": "REJECTED", "leave_date": "2025-01-02", "reason": "Cold"}
    ]))
    .unwrap();
    let stats = LeaveStats::from_requests(&requests);
    assert_eq!((stats.allocated, stats.used, stats.left, stats.pending), (12, 2, 10, 1));
}
