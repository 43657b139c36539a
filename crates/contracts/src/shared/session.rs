use serde::{Deserialize, Serialize};

/// Response of `POST /api/session`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Value to send back in the `x-session-id` header
    pub session_id: String,
}
