//! Request handlers for both portals.

pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod health;

pub use admin::{admin_home, create_facility, create_user, manage_users};
pub use auth::{login, login_form, logout};
pub use dashboard::{select_region, view_list, view_page};
pub use health::health_check;
