pub mod analyze;
pub mod auth;
pub mod billing;
pub mod document;
pub mod models;
pub mod user;
