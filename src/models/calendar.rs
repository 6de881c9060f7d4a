//! Month calendar of a student's attendance.

use chrono::{Datelike, Month, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Payload of `GET /api/student/attendance/calendar/{year}/{month}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    #[serde(default)]
    pub month_name: String,
    #[serde(default)]
    pub calendar_data: Vec<CalendarDay>,
    #[serde(default)]
    pub statistics: Option<CalendarStatistics>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CalendarDay {
    pub date: String,
    pub day: u32,
    #[serde(default)]
    pub day_name: String,
    #[serde(default)]
    pub is_weekend: bool,
    #[serde(default)]
    pub is_today: bool,
    #[serde(default)]
    pub is_future: bool,
    #[serde(default)]
    pub is_working_day: bool,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub time_in: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CalendarStatistics {
    #[serde(default)]
    pub total_days: u32,
    #[serde(default)]
    pub days_so_far: u32,
    #[serde(default)]
    pub working_days: u32,
    #[serde(default)]
    pub present_days: u32,
    #[serde(default)]
    pub absent_days: u32,
    #[serde(default)]
    pub attendance_percent: f64,
}

/// Year and 1-based month being viewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonthCursor {
    pub year: i32,
    pub month: u32,
}

impl MonthCursor {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| MonthCursor { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        MonthCursor { year: date.year(), month: date.month() }
    }

    pub fn prev(self) -> Self {
        if self.month == 1 {
            MonthCursor { year: self.year - 1, month: 12 }
        } else {
            MonthCursor { year: self.year, month: self.month - 1 }
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            MonthCursor { year: self.year + 1, month: 1 }
        } else {
            MonthCursor { year: self.year, month: self.month + 1 }
        }
    }

    /// Months after the one containing `today` are not viewable. Returns the
    /// cursor to show and whether it had to be pulled back.
    pub fn clamp_to(self, today: NaiveDate) -> (Self, bool) {
        let current = MonthCursor::containing(today);
        if self > current { (current, true) } else { (self, false) }
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn name(self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("")
    }

    /// "March 2025"
    pub fn title(self) -> String {
        format!("{} {}", self.name(), self.year)
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let cursor = MonthCursor { year, month }.next();
    match (cursor.first_day(), NaiveDate::from_ymd_opt(year, month, 1)) {
        (Some(next), Some(first)) => (next - first).num_days() as u32,
        _ => 0,
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// One square of the rendered grid. Blank squares pad the first week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarCell {
    pub label: String,
    pub class: String,
    pub title: String,
}

impl CalendarCell {
    fn blank() -> Self {
        CalendarCell { label: String::new(), class: "calendar-day blank".into(), title: String::new() }
    }

    pub fn is_blank(&self) -> bool {
        self.label.is_empty()
    }
}

/// Sunday-first month grid ready for the template.
#[derive(Debug, Clone, Serialize)]
pub struct MonthGrid {
    pub cursor_year: i32,
    pub cursor_month: u32,
    pub title: String,
    pub cells: Vec<CalendarCell>,
    pub statistics: Option<CalendarStatistics>,
    /// True when the grid was computed locally because the backend failed.
    pub fallback: bool,
}

impl MonthGrid {
    fn leading_blanks(cursor: MonthCursor) -> Vec<CalendarCell> {
        let offset = cursor.first_day().map(|d| d.weekday().num_days_from_sunday()).unwrap_or(0);
        (0..offset).map(|_| CalendarCell::blank()).collect()
    }

    pub fn from_backend(data: &CalendarMonth) -> Self {
        let cursor = MonthCursor { year: data.year, month: data.month };
        let mut cells = Self::leading_blanks(cursor);
        cells.extend(data.calendar_data.iter().map(|day| {
            let status = day.status.as_deref().unwrap_or("");
            let mut class = String::from("calendar-day");
            let mut title = String::new();
            if day.is_today {
                class.push_str(" today");
            }
            if status == "PRESENT" && !day.is_weekend {
                class.push_str(" present");
            } else if status == "ABSENT" && !day.is_weekend && day.is_working_day {
                class.push_str(" absent");
            }
            if status == "PRESENT" {
                if let Some(time_in) = day.time_in.as_deref().filter(|t| !t.is_empty()) {
                    title = format!("Present - Checked in at {time_in}");
                }
            } else if day.is_weekend {
                title = "Weekend".into();
                class.push_str(" weekend");
            }
            CalendarCell { label: day.day.to_string(), class, title }
        }));
        let title = if data.month_name.is_empty() {
            cursor.title()
        } else {
            format!("{} {}", data.month_name, data.year)
        };
        MonthGrid {
            cursor_year: data.year,
            cursor_month: data.month,
            title,
            cells,
            statistics: data.statistics.clone(),
            fallback: false,
        }
    }

    /// Plain grid with weekends and today marked, used when the backend
    /// cannot supply the month.
    pub fn fallback(cursor: MonthCursor, today: NaiveDate) -> Self {
        let mut cells = Self::leading_blanks(cursor);
        for day in 1..=days_in_month(cursor.year, cursor.month) {
            let Some(date) = NaiveDate::from_ymd_opt(cursor.year, cursor.month, day) else {
                continue;
            };
            let mut class = String::from("calendar-day");
            let mut title = String::new();
            if date == today {
                class.push_str(" today");
            }
            if is_weekend(date) {
                class.push_str(" weekend");
                title = "Weekend".into();
            }
            cells.push(CalendarCell { label: day.to_string(), class, title });
        }
        MonthGrid {
            cursor_year: cursor.year,
            cursor_month: cursor.month,
            title: cursor.title(),
            cells,
            statistics: None,
            fallback: true,
        }
    }
}
