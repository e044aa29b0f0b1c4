//! Storefront: account and catalog CRUD REST service.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use entity::{Account, AccountPatch, CatalogItem, Entity, ItemPatch, NewAccount, NewItem};
pub use error::AppError;
pub use response::{success_many, success_one, success_one_ok};
pub use routes::{api_routes, common_routes, common_routes_with_ready};
pub use service::{CredentialGate, Resource, Session, Validate};
pub use state::AppState;
pub use store::{MemStore, PgStore, Store};
