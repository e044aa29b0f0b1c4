//! Login handler.

use crate::error::AppError;
use crate::response::success_one_ok;
use crate::service::CredentialGate;
use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(gate): State<CredentialGate>,
    Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse, AppError> {
    let session = gate.authenticate(&body.email, &body.password).await?;
    Ok(success_one_ok(session))
}
