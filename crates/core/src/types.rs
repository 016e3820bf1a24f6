//! Classification result model shared across the engine and the front end.

use serde::{Deserialize, Serialize};

/// A validated catalog match.
///
/// `service_name` is always the catalog's canonical name for `service_id`,
/// never text supplied by the oracle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceMatch {
    /// Catalog identifier.
    pub service_id: u32,
    /// Canonical catalog name.
    pub service_name: String,
}

/// Outcome of a classification request.
///
/// Serializes to the wire envelope
/// `{"success": bool, "data": {...}, "error": "..."}` where `data` is always
/// present (zero-valued on failure) and `error` is omitted on success.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Whether a catalog service was resolved.
    pub success: bool,
    /// The resolved service; zero-valued when `success` is false.
    #[serde(default)]
    pub data: ServiceMatch,
    /// Failure description, set only when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ClassificationResult {
    /// Build a successful result for a validated catalog entry.
    pub fn matched(service_id: u32, service_name: impl Into<String>) -> Self {
        Self {
            success: true,
            data: ServiceMatch {
                service_id,
                service_name: service_name.into(),
            },
            error: None,
        }
    }

    /// Build a failed result carrying an error message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: ServiceMatch::default(),
            error: Some(message.into()),
        }
    }
}
