pub mod admin_handlers;
pub mod auth_handlers;
pub mod faculty_handlers;
pub mod fetch;
pub mod profile_handlers;
pub mod student_handlers;
pub mod super_admin_handlers;
