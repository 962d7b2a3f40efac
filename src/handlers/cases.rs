use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;

use crate::{errors::ServiceError, AppState};

#[derive(Debug, Deserialize)]
pub struct SolveCaseRequest {
    pub item_id: String,
}

/// POST /solve_case - resolve the delivery-delay case for one order.
///
/// Replies with one of the two templated strings as plain text; errors map
/// through [`ServiceError`] to their HTTP statuses.
async fn solve_case(
    State(state): State<AppState>,
    Json(request): Json<SolveCaseRequest>,
) -> Result<String, ServiceError> {
    state.cases.resolve_case(&request.item_id).await
}

pub fn case_routes() -> Router<AppState> {
    Router::new().route("/solve_case", post(solve_case))
}
