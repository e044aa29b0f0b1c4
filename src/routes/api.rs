//! Entity CRUD and login routes. Handlers are generic; each route pins the
//! entity kind.

use crate::entity::{Account, CatalogItem};
use crate::handlers::auth::login;
use crate::handlers::entity::{create, delete as delete_handler, list, read, update};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/accounts", get(list::<Account>).post(create::<Account>))
        .route(
            "/accounts/:id",
            get(read::<Account>)
                .patch(update::<Account>)
                .delete(delete_handler::<Account>),
        )
        .route("/items", get(list::<CatalogItem>).post(create::<CatalogItem>))
        .route(
            "/items/:id",
            get(read::<CatalogItem>)
                .patch(update::<CatalogItem>)
                .delete(delete_handler::<CatalogItem>),
        )
        .route("/login", post(login))
        .with_state(state)
}
