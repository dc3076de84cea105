//! HTTP surface: request/response shapes and the axum router.

use std::time::Duration;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::color::ColorMap;
use crate::config::{OptimizeConfig, ValidationPolicy};
use crate::error::{Error, Result};
use crate::sheet::Sheet;
use crate::solver::{Solution, Solver};
use crate::types::{PieceSpec, deserialize_opt_u32_from_number, deserialize_u32_from_number};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub sheet_length: u32,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub sheet_width: u32,
    /// Absent or `null` means no cap.
    #[serde(default, deserialize_with = "deserialize_opt_u32_from_number")]
    pub sheet_quantity: Option<u32>,
    pub pieces: Vec<PieceSpec>,
    #[serde(default = "default_true")]
    pub allow_rotate: bool,
    #[serde(default)]
    pub validation: ValidationPolicy,
}

fn default_true() -> bool {
    true
}

impl OptimizeRequest {
    pub fn config(&self) -> Result<OptimizeConfig> {
        Ok(
            OptimizeConfig::from_raw(self.sheet_length, self.sheet_width, self.sheet_quantity)?
                .with_rotation(self.allow_rotate)
                .with_validation(self.validation),
        )
    }

    pub fn solve(&self) -> Result<Solution> {
        Solver::new(self.config()?, self.pieces.clone()).solve()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeResponse {
    pub waste: u64,
    /// One occupancy grid per sheet, in creation order.
    pub placements: Vec<Sheet>,
    pub sheet_count: usize,
    pub unplaced_count: usize,
    pub colors: ColorMap,
}

impl From<Solution> for OptimizeResponse {
    fn from(solution: Solution) -> Self {
        Self {
            waste: solution.waste(),
            sheet_count: solution.sheet_count(),
            unplaced_count: solution.unplaced.len(),
            placements: solution.sheets,
            colors: solution.colors,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Timeout(Duration),
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Timeout(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg) | ApiError::Internal(msg) => msg.clone(),
            ApiError::Timeout(limit) => {
                format!("optimization exceeded {}s deadline", limit.as_secs())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.message(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AppState {
    pub timeout: Duration,
}

pub async fn optimize(
    State(state): State<AppState>,
    payload: std::result::Result<Json<OptimizeRequest>, JsonRejection>,
) -> std::result::Result<Json<OptimizeResponse>, ApiError> {
    let Json(req) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /optimize"
    );

    // The blocking task keeps running past the deadline; only the response is cut short.
    let task = tokio::task::spawn_blocking(move || req.solve());
    let solution = match tokio::time::timeout(state.timeout, task).await {
        Err(_) => {
            tracing::warn!(timeout_secs = state.timeout.as_secs(), "optimization timed out");
            return Err(ApiError::Timeout(state.timeout));
        }
        Ok(Err(join_err)) => {
            let msg = format!("optimization task failed: {join_err}");
            tracing::error!("{msg}");
            sentry::capture_message(&msg, sentry::Level::Error);
            return Err(ApiError::Internal(msg));
        }
        Ok(Ok(result)) => result.inspect_err(|e| tracing::info!(error = %e, "rejected"))?,
    };

    Ok(Json(OptimizeResponse::from(solution)))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/optimize", post(optimize))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
