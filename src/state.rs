//! Shared application state: one controller per entity kind plus the
//! credential gate, all over injected storage engines.

use crate::entity::{Account, CatalogItem};
use crate::service::{CredentialGate, Resource};
use crate::store::Store;
use axum::extract::FromRef;
use chrono::Duration;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub accounts: Resource<Account>,
    pub items: Resource<CatalogItem>,
    pub auth: CredentialGate,
}

impl AppState {
    /// The credential gate shares the account store with the account
    /// controller, so logins see the same records.
    pub fn new(
        accounts: Arc<dyn Store<Account>>,
        items: Arc<dyn Store<CatalogItem>>,
        session_ttl: Duration,
    ) -> Self {
        AppState {
            accounts: Resource::new(accounts.clone()),
            items: Resource::new(items),
            auth: CredentialGate::new(accounts, session_ttl),
        }
    }
}

impl FromRef<AppState> for Resource<Account> {
    fn from_ref(state: &AppState) -> Self {
        state.accounts.clone()
    }
}

impl FromRef<AppState> for Resource<CatalogItem> {
    fn from_ref(state: &AppState) -> Self {
        state.items.clone()
    }
}

impl FromRef<AppState> for CredentialGate {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
