use axum::{extract::Path, http::StatusCode, Json};
use contracts::dashboards::d100_sales_analysis::{
    SalesDashboardResponse, SalesDimension, SalesFilterOptions, SalesFilterState,
};
use contracts::shared::view::SectionResponse;
use serde::Serialize;

use crate::dashboards::d100_sales_analysis::service;
use crate::shared::error::DashboardError;
use crate::system::initialization::runtime;
use crate::system::session::SessionKey;

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub invalidated: bool,
}

/// GET /api/d100/filter_options
pub async fn get_filter_options(
    SessionKey(session): SessionKey,
) -> Result<Json<SalesFilterOptions>, StatusCode> {
    let ctx = runtime().sales(&session);
    match service::get_filter_options(&ctx).await {
        Ok(options) => {
            tracing::info!(
                "D100 Dashboard: Returning filter options ({} categories, {} regions, {} segments)",
                options.categories.len(),
                options.regions.len(),
                options.segments.len()
            );
            Ok(Json(options))
        }
        Err(e) => {
            tracing::error!("D100 Dashboard: Failed to load filter options: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/d100/refresh
pub async fn refresh(SessionKey(session): SessionKey) -> Json<RefreshResponse> {
    let invalidated = service::refresh(&runtime().sales(&session)).await;
    tracing::info!(
        "D100 Dashboard: Refresh for session {} (cached entry dropped: {})",
        session,
        invalidated
    );
    Json(RefreshResponse { invalidated })
}

/// POST /api/d100/dashboard
pub async fn get_dashboard(
    SessionKey(session): SessionKey,
    Json(state): Json<SalesFilterState>,
) -> Json<SalesDashboardResponse> {
    tracing::info!("D100 Dashboard: Building dashboard for session {}", session);
    Json(service::get_dashboard(&runtime().sales(&session), &state).await)
}

/// POST /api/d100/summary
pub async fn get_summary(
    SessionKey(session): SessionKey,
    Json(state): Json<SalesFilterState>,
) -> Json<SectionResponse> {
    Json(service::get_summary_section(&runtime().sales(&session), &state).await)
}

/// POST /api/d100/rollup/:dimension (category | region | segment)
pub async fn get_rollup(
    SessionKey(session): SessionKey,
    Path(dimension): Path<String>,
    Json(state): Json<SalesFilterState>,
) -> Result<Json<SectionResponse>, StatusCode> {
    let dimension: SalesDimension = dimension.parse().map_err(|_| {
        tracing::warn!("D100 Dashboard: {}", DashboardError::UnknownDimension(dimension.clone()));
        StatusCode::BAD_REQUEST
    })?;

    let response = service::get_rollup_section(&runtime().sales(&session), &state, dimension).await;
    Ok(Json(response))
}

/// POST /api/d100/detail
pub async fn get_detail(
    SessionKey(session): SessionKey,
    Json(state): Json<SalesFilterState>,
) -> Json<SectionResponse> {
    Json(service::get_detail_section(&runtime().sales(&session), &state).await)
}
