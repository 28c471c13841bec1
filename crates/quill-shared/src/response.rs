//! Standardized API response envelopes.
//!
//! Every payload travels as `{success, data, ...}`; errors as
//! `{success: false, message}` with an optional `detail` outside production.

use serde::{Deserialize, Serialize};

/// Pagination metadata for list responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub pages: u64,
}

/// Standard successful API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            meta: None,
        }
    }

    pub fn ok_with_meta(data: T, meta: PageMeta) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            meta: Some(meta),
        }
    }
}

/// Error body: `{success: false, message}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    /// Included only outside production environments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_omits_empty_fields() {
        let json = serde_json::to_value(ApiResponse::ok(1)).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": 1}));
    }

    #[test]
    fn error_envelope_shape() {
        let json = serde_json::to_value(ErrorResponse::new("Post not found")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "message": "Post not found"})
        );
    }
}
