use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{WidgetAction, WidgetQuery, WidgetRequest, WidgetResponse},
    routes::AppState,
};

/// Handler for widget listings
///
/// Options missing from the query string fall back to the configured defaults.
pub async fn widget(
    State(state): State<Arc<AppState>>,
    Path(action): Path<WidgetAction>,
    Query(query): Query<WidgetQuery>,
    request_id: Option<Extension<RequestId>>,
) -> AppResult<Json<WidgetResponse>> {
    let request = WidgetRequest::new(action, query.resolve(&state.defaults));

    tracing::info!(
        action = %action,
        limit = request.options.limit,
        tag = request.options.tag().unwrap_or_default(),
        request_id = request_id.as_ref().map(|Extension(id)| id.as_str()).unwrap_or("unknown"),
        "Serving widget"
    );

    let response = state.aggregator.handle(&request).await?;
    Ok(Json(response))
}
