// Template context structures for Askama templates, organized by dashboard.

pub mod admin;
pub mod common;
pub mod faculty;
pub mod student;
pub mod super_admin;

pub use admin::*;
pub use common::*;
pub use faculty::*;
pub use student::*;
pub use super_admin::*;

use actix_session::Session;
use serde::Serialize;

use crate::auth::csrf;
use crate::auth::session::{self, Flash, Identity};
use crate::models::auth::Role;
use crate::models::format::initials;
use crate::paging::Paged;

/// Sidebar entry.
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
    pub icon: &'static str,
    pub active: bool,
}

fn nav_for(role: Role) -> &'static [(&'static str, &'static str, &'static str)] {
    match role {
        Role::Admin => &[
            ("Overview", "/admin", "fa-chart-line"),
            ("Faculty", "/admin/faculty", "fa-chalkboard-teacher"),
            ("Students", "/admin/students", "fa-user-graduate"),
            ("Attendance", "/admin/attendance", "fa-clipboard-check"),
        ],
        Role::Faculty => &[
            ("Overview", "/faculty", "fa-chart-line"),
            ("My Students", "/faculty/students", "fa-user-graduate"),
            ("Attendance", "/faculty/attendance", "fa-clipboard-check"),
        ],
        Role::Student => &[
            ("Overview", "/student", "fa-chart-line"),
            ("Attendance Records", "/student/records", "fa-list"),
            ("Calendar", "/student/calendar", "fa-calendar-alt"),
            ("Leave Requests", "/student/leave", "fa-plane-departure"),
        ],
        Role::SuperAdmin => &[
            ("Overview", "/super-admin", "fa-chart-line"),
            ("Institutes", "/super-admin/institutes", "fa-university"),
            ("Users", "/super-admin/users", "fa-users"),
        ],
    }
}

/// Common context shared by all authenticated pages.
/// Templates access these as `ctx.email`, `ctx.nav`, etc.
pub struct PageContext {
    pub email: String,
    pub display_name: String,
    pub avatar_initials: String,
    pub role_label: &'static str,
    pub home: &'static str,
    pub flash: Option<Flash>,
    pub nav: Vec<NavLink>,
    pub csrf_token: String,
    pub theme: String,
    pub current_path: String,
}

impl PageContext {
    pub fn build(session: &Session, who: &Identity, current_path: &str) -> Self {
        let display_name = session::display_name(session).unwrap_or_else(|| {
            who.email.split('@').next().unwrap_or_default().to_string()
        });
        let mut nav: Vec<NavLink> = nav_for(who.role)
            .iter()
            .map(|&(label, href, icon)| NavLink { label, href, icon, active: href == current_path })
            .collect();
        nav.push(NavLink { label: "Profile", href: "/profile", icon: "fa-user-cog", active: current_path == "/profile" });
        PageContext {
            email: who.email.clone(),
            avatar_initials: initials(&display_name),
            display_name,
            role_label: who.role.label(),
            home: who.role.dashboard_path(),
            flash: session::take_flash(session),
            nav,
            csrf_token: csrf::get_or_create_token(session),
            theme: session::theme(session),
            current_path: current_path.to_string(),
        }
    }
}

/// Page link in the table footer.
pub struct PageLink {
    pub number: usize,
    pub href: String,
    pub current: bool,
}

/// Footer of a paged table: the "Showing a-b of n" label and links that
/// carry the active filters along with the page number.
pub struct PaginationView {
    pub label: String,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
    pub links: Vec<PageLink>,
    pub total_pages: usize,
}

impl PaginationView {
    pub fn new<R, Q: Serialize>(paged: &Paged<R>, entity: &str, base_path: &str, filters: &Q) -> Self {
        let query = serde_urlencoded::to_string(filters).unwrap_or_else(|e| {
            log::warn!("Could not encode filter query for {base_path}: {e}");
            String::new()
        });
        let href = |page: usize| {
            if query.is_empty() {
                format!("{base_path}?page={page}")
            } else {
                format!("{base_path}?{query}&page={page}")
            }
        };
        PaginationView {
            label: if paged.total_filtered == 0 { String::new() } else { paged.label(entity) },
            prev_href: paged.controls.previous.map(&href),
            next_href: paged.controls.next.map(&href),
            links: paged
                .controls
                .buttons
                .iter()
                .map(|b| PageLink { number: b.number, href: href(b.number), current: b.current })
                .collect(),
            total_pages: paged.total_pages,
        }
    }

    pub fn has_controls(&self) -> bool {
        !self.links.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paging::{paginate, PageSize};

    #[derive(Serialize)]
    struct Filters {
        search: String,
        status: String,
    }

    #[test]
    fn links_carry_filters() {
        let items: Vec<usize> = (1..=30).collect();
        let paged = paginate(&items, |_| true, 2, PageSize::new(10));
        let filters = Filters { search: "ravi kumar".into(), status: "ACTIVE".into() };
        let view = PaginationView::new(&paged, "students", "/admin/students", &filters);
        assert_eq!(view.label, "Showing 11-20 of 30 students");
        assert_eq!(view.prev_href.as_deref(), Some("/admin/students?search=ravi+kumar&status=ACTIVE&page=1"));
        assert_eq!(view.next_href.as_deref(), Some("/admin/students?search=ravi+kumar&status=ACTIVE&page=3"));
        assert_eq!(view.links.len(), 3);
        assert!(view.links[1].current);
    }

    #[test]
    fn single_page_has_no_controls() {
        let items: Vec<usize> = (1..=4).collect();
        let paged = paginate(&items, |_| true, 1, PageSize::new(10));
        let view = PaginationView::new(&paged, "records", "/student/records", &Vec::<(String, String)>::new());
        assert!(!view.has_controls());
        assert_eq!(view.label, "Showing 1-4 of 4 records");
    }
}
