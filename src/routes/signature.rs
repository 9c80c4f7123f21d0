//! Signature generation route

use axum::{extract::State, routing::post, Json, Router};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::signature::SignatureMetadata;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSignatureRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSignatureResponse {
    pub image_url: String,
    pub metadata: SignatureMetadata,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/generate-signature", post(generate_signature))
}

/// POST /api/generate-signature
async fn generate_signature(
    State(state): State<AppState>,
    Json(request): Json<GenerateSignatureRequest>,
) -> Result<Json<GenerateSignatureResponse>> {
    let (Some(first_name), Some(last_name)) = (request.first_name, request.last_name) else {
        return Err(AppError::BadRequest(
            "First name and last name are required".to_string(),
        ));
    };

    let first_name = first_name.trim();
    let last_name = last_name.trim();
    if first_name.is_empty() || last_name.is_empty() {
        return Err(AppError::BadRequest(
            "First name and last name cannot be empty".to_string(),
        ));
    }

    let mut rng = StdRng::from_entropy();
    let signature = state
        .generator()
        .generate(first_name, last_name, &mut rng)
        .await?;

    Ok(Json(GenerateSignatureResponse {
        image_url: signature.image_url,
        metadata: signature.metadata,
    }))
}
