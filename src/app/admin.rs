use super::state::AppState;
use crate::room_runtime::RoomStats;
use crate::visits::VisitRecord;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Shared admin password, kept only as a SHA-256 digest.
#[derive(Clone)]
pub struct AdminSecret {
    digest: Vec<u8>,
}

impl std::fmt::Debug for AdminSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AdminSecret(..)")
    }
}

impl AdminSecret {
    pub fn new(password: &str) -> Self {
        Self {
            digest: Sha256::digest(password.as_bytes()).to_vec(),
        }
    }

    /// Compares digests without short-circuiting on the first differing byte.
    pub fn matches(&self, supplied: &str) -> bool {
        let supplied = Sha256::digest(supplied.as_bytes());
        self.digest.len() == supplied.len()
            && self
                .digest
                .iter()
                .zip(supplied.iter())
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

#[derive(Debug, Deserialize)]
pub struct AdminStatsRequest {
    password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AdminStatsResponse {
    ok: bool,
    total_visitors: usize,
    total_visits: i64,
    visitors: Vec<VisitRecord>,
    rooms: Vec<RoomStats>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    ok: bool,
    error: String,
}

fn error_response(status: StatusCode, error: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            ok: false,
            error: error.to_string(),
        }),
    )
        .into_response()
}

pub async fn admin_stats(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AdminStatsRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(payload)) = payload else {
        return error_response(StatusCode::BAD_REQUEST, "Invalid JSON");
    };

    let authorized = match (&state.admin_secret, payload.password.as_deref()) {
        (Some(secret), Some(password)) => secret.matches(password),
        _ => false,
    };
    if !authorized {
        tracing::warn!("rejected admin stats request");
        return error_response(StatusCode::UNAUTHORIZED, "Unauthorized");
    }

    let visitors = match state.visits.list().await {
        Ok(visitors) => visitors,
        Err(error) => {
            tracing::warn!(?error, "failed to load visit stats");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load stats");
        }
    };
    let rooms = state.registry.stats().await;

    (
        StatusCode::OK,
        Json(AdminStatsResponse {
            ok: true,
            total_visitors: visitors.len(),
            total_visits: visitors.iter().map(|visit| visit.visit_count).sum(),
            visitors,
            rooms,
        }),
    )
        .into_response()
}
