pub mod analysis;
pub mod auth_service;
pub mod billing_service;
pub mod document_service;
pub mod text_extractor;
pub mod user_service;

pub use auth_service::AuthService;
pub use billing_service::BillingService;
pub use document_service::DocumentService;
pub use user_service::UserService;
