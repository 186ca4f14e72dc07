//! Response envelope shared by every admin endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{ status?, message?, data? }` as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Usually `"success"`; some deployments send a number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}
