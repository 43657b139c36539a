use axum::Json;
use contracts::shared::session::SessionResponse;

/// POST /api/session
///
/// Mints a fresh id for the `x-session-id` header, so two browser tabs keep
/// separate option caches.
pub async fn create_session() -> Json<SessionResponse> {
    let session_id = uuid::Uuid::new_v4().to_string();
    tracing::info!("New dashboard session {}", session_id);
    Json(SessionResponse { session_id })
}
