pub mod common;

mod auth_service_test;
mod document_service_test;
