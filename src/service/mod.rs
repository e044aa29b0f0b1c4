//! Resource controllers, validation, and the credential gate.

mod auth;
mod crud;
pub mod password;
mod validation;

pub use auth::{CredentialGate, Session};
pub use crud::Resource;
pub use validation::Validate;
