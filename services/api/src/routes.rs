use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::infra::AppState;
use sim_scoring::scoring::{
    ExportFormat, ReportStore, ScoringError, ScoringService, SessionId, SessionStore, UserId,
};

/// Router builder exposing the scoring endpoints for a session.
pub(crate) fn scoring_router<S, R>(service: Arc<ScoringService<S, R>>) -> Router
where
    S: SessionStore + 'static,
    R: ReportStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/sessions/:session_id/scores",
            get(session_scores_handler::<S, R>),
        )
        .route(
            "/api/v1/sessions/:session_id/reports/:user_id",
            post(final_report_handler::<S, R>),
        )
        .route(
            "/api/v1/sessions/:session_id/export",
            get(export_handler::<S, R>),
        )
        .with_state(service)
}

pub(crate) fn with_operational_routes(router: Router) -> Router {
    router
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn session_scores_handler<S, R>(
    State(service): State<Arc<ScoringService<S, R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    R: ReportStore + 'static,
{
    let session = SessionId(session_id);
    match service.session_scores(&session) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn final_report_handler<S, R>(
    State(service): State<Arc<ScoringService<S, R>>>,
    Path((session_id, user_id)): Path<(String, String)>,
) -> Response
where
    S: SessionStore + 'static,
    R: ReportStore + 'static,
{
    let session = SessionId(session_id);
    let user = UserId(user_id);
    match service.final_report(&session, &user) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExportQuery {
    #[serde(default)]
    pub(crate) format: Option<String>,
}

pub(crate) async fn export_handler<S, R>(
    State(service): State<Arc<ScoringService<S, R>>>,
    Path(session_id): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Response
where
    S: SessionStore + 'static,
    R: ReportStore + 'static,
{
    let format = match query.format.as_deref() {
        Some(raw) => match raw.parse::<ExportFormat>() {
            Ok(format) => format,
            Err(error) => {
                let payload = json!({ "error": error.to_string() });
                return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
            }
        },
        None => ExportFormat::Json,
    };

    let session = SessionId(session_id);
    match service.export(&session, format) {
        Ok(export) => {
            let disposition = format!("attachment; filename=\"{}\"", export.filename);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, export.content_type.to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                export.body,
            )
                .into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: ScoringError) -> Response {
    match error {
        ScoringError::SessionNotFound(session) => {
            let payload = json!({
                "error": "session not found",
                "session_id": session.0,
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        ScoringError::UserNotFound { session, user } => {
            let payload = json!({
                "error": "user is not a participant in the session",
                "session_id": session.0,
                "user_id": user.0,
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        // Format strings are parsed in the export handler; by the time a
        // ScoringError reaches here the format was already valid.
        other => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{seed_demo_session, InMemoryReportStore, InMemorySessionStore};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn seeded_router() -> (Router, SessionId) {
        let sessions = Arc::new(InMemorySessionStore::default());
        let session = seed_demo_session(&sessions);
        let reports = Arc::new(InMemoryReportStore::default());
        let service = Arc::new(ScoringService::new(sessions, reports));
        (scoring_router(service), session)
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("body is json")
    }

    #[tokio::test]
    async fn scores_endpoint_returns_ranked_session() {
        let (router, session) = seeded_router();
        let request = Request::builder()
            .uri(format!("/api/v1/sessions/{}/scores", session.0))
            .body(Body::empty())
            .expect("request builds");

        let response = router.oneshot(request).await.expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let scores = body["user_scores"].as_array().expect("scores array");
        assert_eq!(scores.len(), 4);
        assert_eq!(scores[0]["rank"], 1);
        assert_eq!(scores[0]["user_id"], "u-imani");
    }

    #[tokio::test]
    async fn scores_endpoint_rejects_unknown_session() {
        let (router, _) = seeded_router();
        let request = Request::builder()
            .uri("/api/v1/sessions/no-such-session/scores")
            .body(Body::empty())
            .expect("request builds");

        let response = router.oneshot(request).await.expect("router responds");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["error"], "session not found");
    }

    #[tokio::test]
    async fn report_endpoint_builds_report_for_participant() {
        let (router, session) = seeded_router();
        let request = Request::builder()
            .method("POST")
            .uri(format!("/api/v1/sessions/{}/reports/u-keiko", session.0))
            .body(Body::empty())
            .expect("request builds");

        let response = router.oneshot(request).await.expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["user_id"], "u-keiko");
        assert!(body["competency_scores"]
            .as_array()
            .is_some_and(|scores| scores.len() == 10));
    }

    #[tokio::test]
    async fn report_endpoint_rejects_unknown_user() {
        let (router, session) = seeded_router();
        let request = Request::builder()
            .method("POST")
            .uri(format!("/api/v1/sessions/{}/reports/u-ghost", session.0))
            .body(Body::empty())
            .expect("request builds");

        let response = router.oneshot(request).await.expect("router responds");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn export_endpoint_streams_csv_attachment() {
        let (router, session) = seeded_router();
        let request = Request::builder()
            .uri(format!("/api/v1/sessions/{}/export?format=csv", session.0))
            .body(Body::empty())
            .expect("request builds");

        let response = router.oneshot(request).await.expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
            Some("text/csv")
        );
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_DISPOSITION)
                .and_then(|value| value.to_str().ok()),
            Some(format!("attachment; filename=\"scoring_results_{}.csv\"", session.0).as_str())
        );

        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        let text = String::from_utf8(bytes.to_vec()).expect("csv is utf-8");
        assert!(text.starts_with("Rank,User Name,Total Score,Overall Percentage"));
    }

    #[tokio::test]
    async fn export_endpoint_defaults_to_json() {
        let (router, session) = seeded_router();
        let request = Request::builder()
            .uri(format!("/api/v1/sessions/{}/export", session.0))
            .body(Body::empty())
            .expect("request builds");

        let response = router.oneshot(request).await.expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
            Some("application/json")
        );
    }

    #[tokio::test]
    async fn export_endpoint_rejects_unknown_format() {
        let (router, session) = seeded_router();
        let request = Request::builder()
            .uri(format!("/api/v1/sessions/{}/export?format=xml", session.0))
            .body(Body::empty())
            .expect("request builds");

        let response = router.oneshot(request).await.expect("router responds");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
