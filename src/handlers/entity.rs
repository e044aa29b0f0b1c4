//! Entity CRUD handlers, generic over entity kind. Routes pick the concrete
//! kind by instantiating these against the matching `Resource<T>` state.

use crate::entity::Entity;
use crate::error::AppError;
use crate::response::{success_many, success_one, success_one_ok};
use crate::service::Resource;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

pub async fn list<T: Entity>(
    State(resource): State<Resource<T>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(success_many(resource.list().await?))
}

pub async fn create<T: Entity>(
    State(resource): State<Resource<T>>,
    Json(body): Json<T::New>,
) -> Result<impl IntoResponse, AppError> {
    Ok(success_one(resource.create(body).await?))
}

pub async fn read<T: Entity>(
    State(resource): State<Resource<T>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(success_one_ok(resource.get(id).await?))
}

pub async fn update<T: Entity>(
    State(resource): State<Resource<T>>,
    Path(id): Path<i64>,
    Json(body): Json<T::Patch>,
) -> Result<impl IntoResponse, AppError> {
    Ok(success_one_ok(resource.update(id, body).await?))
}

pub async fn delete<T: Entity>(
    State(resource): State<Resource<T>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    resource.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
