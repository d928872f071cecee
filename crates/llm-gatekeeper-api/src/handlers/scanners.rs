//! Scanner inventory endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ScannersResponse {
    pub input_scanners: Vec<String>,
    pub output_scanners: Vec<String>,
}

/// GET /v1/scanners
pub async fn list_scanners(State(state): State<AppState>) -> Json<ScannersResponse> {
    let registry = state.gatekeeper.registry();
    Json(ScannersResponse {
        input_scanners: registry
            .input_scanner_names()
            .into_iter()
            .map(String::from)
            .collect(),
        output_scanners: registry
            .output_scanner_names()
            .into_iter()
            .map(String::from)
            .collect(),
    })
}
