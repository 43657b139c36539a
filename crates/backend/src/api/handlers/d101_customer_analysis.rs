use axum::{extract::Path, http::StatusCode, Json};
use contracts::dashboards::d101_customer_analysis::{
    CustomerDashboardResponse, CustomerDimension, CustomerFilterOptions, CustomerFilterState,
};
use contracts::shared::view::SectionResponse;

use super::d100_sales_analysis::RefreshResponse;
use crate::dashboards::d101_customer_analysis::service;
use crate::shared::error::DashboardError;
use crate::system::initialization::runtime;
use crate::system::session::SessionKey;

/// GET /api/d101/filter_options
pub async fn get_filter_options(
    SessionKey(session): SessionKey,
) -> Result<Json<CustomerFilterOptions>, StatusCode> {
    match service::get_filter_options(&runtime().customers(&session)).await {
        Ok(options) => {
            tracing::info!(
                "D101 Dashboard: Returning filter options ({} customers, {} countries)",
                options.customer_count,
                options.countries.len()
            );
            Ok(Json(options))
        }
        Err(e) => {
            tracing::error!("D101 Dashboard: Failed to load customers: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/d101/refresh
pub async fn refresh(SessionKey(session): SessionKey) -> Json<RefreshResponse> {
    let invalidated = service::refresh(&runtime().customers(&session)).await;
    tracing::info!(
        "D101 Dashboard: Refresh for session {} (cached entry dropped: {})",
        session,
        invalidated
    );
    Json(RefreshResponse { invalidated })
}

/// POST /api/d101/dashboard
pub async fn get_dashboard(
    SessionKey(session): SessionKey,
    Json(state): Json<CustomerFilterState>,
) -> Json<CustomerDashboardResponse> {
    tracing::info!("D101 Dashboard: Building dashboard for session {}", session);
    Json(service::get_dashboard(&runtime().customers(&session), &state).await)
}

/// POST /api/d101/top_customers
pub async fn get_top_customers(
    SessionKey(session): SessionKey,
    Json(state): Json<CustomerFilterState>,
) -> Json<SectionResponse> {
    Json(service::get_top_customers_section(&runtime().customers(&session), &state).await)
}

/// POST /api/d101/rollup/:dimension (city | country)
pub async fn get_rollup(
    SessionKey(session): SessionKey,
    Path(dimension): Path<String>,
    Json(state): Json<CustomerFilterState>,
) -> Result<Json<SectionResponse>, StatusCode> {
    let dimension: CustomerDimension = dimension.parse().map_err(|_| {
        tracing::warn!("D101 Dashboard: {}", DashboardError::UnknownDimension(dimension.clone()));
        StatusCode::BAD_REQUEST
    })?;

    let response = service::get_rollup_section(&runtime().customers(&session), &state, dimension).await;
    Ok(Json(response))
}

/// POST /api/d101/histogram
pub async fn get_histogram(
    SessionKey(session): SessionKey,
    Json(state): Json<CustomerFilterState>,
) -> Json<SectionResponse> {
    Json(service::get_histogram_section(&runtime().customers(&session), &state).await)
}

/// POST /api/d101/detail
pub async fn get_detail(
    SessionKey(session): SessionKey,
    Json(state): Json<CustomerFilterState>,
) -> Json<SectionResponse> {
    Json(service::get_detail_section(&runtime().customers(&session), &state).await)
}
