pub mod auth;
pub mod backend;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod paging;
pub mod templates_structs;

use actix_web::web;

use handlers::{
    admin_handlers, auth_handlers, faculty_handlers, profile_handlers, student_handlers, super_admin_handlers,
};

/// Every route of the dashboards. Shared state (`BackendClient`,
/// `ViewCache`, `LoginThrottle`, `PageSize`) is registered by the caller.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Public routes
        .route("/login", web::get().to(auth_handlers::login_page))
        .route("/login", web::post().to(auth_handlers::login_submit))
        .route("/", web::get().to(auth_handlers::root))
        // Protected routes
        .service(
            web::scope("")
                .wrap(actix_web::middleware::from_fn(auth::middleware::require_auth))
                .route("/logout", web::post().to(auth_handlers::logout))
                .route("/theme", web::post().to(auth_handlers::toggle_theme))
                // Profile
                .route("/profile", web::get().to(profile_handlers::show))
                .route("/profile/email", web::post().to(profile_handlers::update_email))
                .route("/profile/password", web::post().to(profile_handlers::change_password))
                // Admin: /admin/faculty/new BEFORE /admin/faculty/{id}
                .route("/admin", web::get().to(admin_handlers::overview))
                .route("/admin/faculty", web::get().to(admin_handlers::faculty_list))
                .route("/admin/faculty/new", web::get().to(admin_handlers::faculty_new))
                .route("/admin/faculty", web::post().to(admin_handlers::faculty_create))
                .route("/admin/faculty/{id}/edit", web::get().to(admin_handlers::faculty_edit))
                .route("/admin/faculty/{id}", web::post().to(admin_handlers::faculty_update))
                .route("/admin/faculty/{id}/delete", web::post().to(admin_handlers::faculty_delete))
                .route("/admin/students", web::get().to(admin_handlers::students))
                .route("/admin/attendance", web::get().to(admin_handlers::attendance))
                .route("/admin/attendance/mark", web::post().to(admin_handlers::mark_attendance))
                .route("/admin/attendance/{id}/edit", web::post().to(admin_handlers::edit_attendance))
                // Faculty
                .route("/faculty", web::get().to(faculty_handlers::overview))
                .route("/faculty/students", web::get().to(faculty_handlers::students))
                .route("/faculty/students/new", web::get().to(faculty_handlers::student_new))
                .route("/faculty/students", web::post().to(faculty_handlers::student_create))
                .route("/faculty/students/{id}/edit", web::get().to(faculty_handlers::student_edit))
                .route("/faculty/students/{id}", web::post().to(faculty_handlers::student_update))
                .route("/faculty/students/{id}/delete", web::post().to(faculty_handlers::delete_student))
                .route("/faculty/attendance", web::get().to(faculty_handlers::attendance))
                .route("/faculty/attendance/{id}/edit", web::post().to(faculty_handlers::edit_attendance))
                // Student
                .route("/student", web::get().to(student_handlers::overview))
                .route("/student/records", web::get().to(student_handlers::records))
                .route("/student/calendar", web::get().to(student_handlers::calendar))
                .route("/student/leave", web::get().to(student_handlers::leave))
                .route("/student/leave", web::post().to(student_handlers::submit_leave))
                .route("/student/leave/{id}/cancel", web::post().to(student_handlers::cancel_leave))
                // Super admin
                .route("/super-admin", web::get().to(super_admin_handlers::overview))
                .route("/super-admin/institutes", web::get().to(super_admin_handlers::institutes))
                .route("/super-admin/institutes/new", web::get().to(super_admin_handlers::institute_new))
                .route("/super-admin/institutes", web::post().to(super_admin_handlers::institute_create))
                .route("/super-admin/institutes/{id}/edit", web::get().to(super_admin_handlers::institute_edit))
                .route("/super-admin/institutes/{id}", web::post().to(super_admin_handlers::institute_update))
                .route("/super-admin/institutes/{id}/delete", web::post().to(super_admin_handlers::institute_delete))
                .route("/super-admin/institutes/{id}/toggle", web::post().to(super_admin_handlers::toggle_institute))
                .route("/super-admin/users", web::get().to(super_admin_handlers::users))
                .route("/super-admin/users/new", web::get().to(super_admin_handlers::user_new))
                .route("/super-admin/users", web::post().to(super_admin_handlers::user_create))
                .route("/super-admin/users/{id}/toggle", web::post().to(super_admin_handlers::toggle_user))
                .route("/super-admin/users/{id}/reset-password", web::post().to(super_admin_handlers::reset_password)),
        );
}
