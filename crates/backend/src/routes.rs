use axum::{
    routing::{get, post},
    Router,
};

use crate::api::handlers;

/// All application routes
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/session", post(handlers::session::create_session))
        // ========================================
        // D100 SALES ANALYSIS DASHBOARD
        // ========================================
        .route(
            "/api/d100/filter_options",
            get(handlers::d100_sales_analysis::get_filter_options),
        )
        .route(
            "/api/d100/refresh",
            post(handlers::d100_sales_analysis::refresh),
        )
        .route(
            "/api/d100/dashboard",
            post(handlers::d100_sales_analysis::get_dashboard),
        )
        .route(
            "/api/d100/summary",
            post(handlers::d100_sales_analysis::get_summary),
        )
        .route(
            "/api/d100/rollup/:dimension",
            post(handlers::d100_sales_analysis::get_rollup),
        )
        .route(
            "/api/d100/detail",
            post(handlers::d100_sales_analysis::get_detail),
        )
        // ========================================
        // D101 CUSTOMER ANALYSIS DASHBOARD
        // ========================================
        .route(
            "/api/d101/filter_options",
            get(handlers::d101_customer_analysis::get_filter_options),
        )
        .route(
            "/api/d101/refresh",
            post(handlers::d101_customer_analysis::refresh),
        )
        .route(
            "/api/d101/dashboard",
            post(handlers::d101_customer_analysis::get_dashboard),
        )
        .route(
            "/api/d101/top_customers",
            post(handlers::d101_customer_analysis::get_top_customers),
        )
        .route(
            "/api/d101/rollup/:dimension",
            post(handlers::d101_customer_analysis::get_rollup),
        )
        .route(
            "/api/d101/histogram",
            post(handlers::d101_customer_analysis::get_histogram),
        )
        .route(
            "/api/d101/detail",
            post(handlers::d101_customer_analysis::get_detail),
        )
}
