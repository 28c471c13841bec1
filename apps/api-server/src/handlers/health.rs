//! Health check endpoint.

use actix_web::HttpResponse;
use serde::Serialize;

use crate::telemetry::TelemetryConfig;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: String,
    pub version: &'static str,
    pub timestamp: String,
}

/// GET /api/health - liveness probe reporting the service identity.
pub async fn health_check() -> HttpResponse {
    let response = HealthResponse {
        status: "ok",
        service: TelemetryConfig::from_env().service_name,
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    HttpResponse::Ok().json(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reports_ok_with_service_identity() {
        let response = health_check().await;
        assert_eq!(response.status(), actix_web::http::StatusCode::OK);

        let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "quill-api");
        assert!(json["version"].as_str().is_some_and(|v| !v.is_empty()));
    }
}
