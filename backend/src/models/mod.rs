pub mod document;
pub mod subscription;
pub mod user;

pub use document::{AnalyzeResponse, Document, DocumentListItem, DocumentStatus};
pub use subscription::{BillingEvent, Subscription, SubscriptionObject};
pub use user::{AuthResponse, LoginRequest, RegisterRequest, User, UserResponse};
