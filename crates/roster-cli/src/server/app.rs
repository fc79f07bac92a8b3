//! Axum application setup.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use super::handlers;
use super::state::AppState;

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Gateways
        .route("/generate-rule", post(handlers::generate_rule))
        .route("/validate", post(handlers::validate_rows))
        // Datasets and grids
        .route("/upload/:dataset", post(handlers::upload_dataset))
        .route("/grid/:dataset", get(handlers::get_grid))
        .route("/grid/:dataset/cell", post(handlers::edit_cell))
        .route("/grid/:dataset/revalidate", post(handlers::revalidate))
        .route("/summary", get(handlers::get_summary))
        // Rules
        .route("/rules", get(handlers::list_rules).post(handlers::add_rule))
        .route("/rules/generate", post(handlers::add_generated_rule))
        // Exports
        .route("/export/rules", get(handlers::export_rules))
        .route("/export/:dataset", get(handlers::export_dataset));

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(state)
}

/// Start the web server.
pub async fn run_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));

    tracing::info!(%addr, "server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use roster::{GridConfig, MockProvider, Session};

    use super::*;

    fn test_state(provider: Arc<MockProvider>) -> AppState {
        AppState::new(
            Session::new(),
            provider,
            GridConfig {
                debounce: Duration::from_secs(3600),
            },
        )
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn json_body(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validate_returns_errors() {
        let provider = Arc::new(MockProvider::new());
        provider.push_reply("[{\"rowIndex\":0,\"field\":\"email\",\"message\":\"Missing email\"}]");
        let app = create_router(test_state(provider));

        let (status, body) = send(
            &app,
            post_json(
                "/api/validate",
                json!({"type": "clients", "data": [{"id": "1", "email": ""}]}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json_body(&body),
            json!({"errors": [{"rowIndex": 0, "field": "email", "message": "Missing email"}]})
        );
    }

    #[tokio::test]
    async fn test_validate_failure_is_500_with_empty_errors() {
        let provider = Arc::new(MockProvider::new());
        provider.push_reply("no array here");
        let app = create_router(test_state(provider));

        let (status, body) = send(
            &app,
            post_json("/api/validate", json!({"type": "tasks", "data": []})),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(&body);
        assert_eq!(body, json!({"errors": [], "error": "Validation failed."}));
    }

    #[tokio::test]
    async fn test_generate_rule() {
        let provider = Arc::new(MockProvider::new());
        provider.push_reply("```json\n{\"type\":\"coRun\",\"tasks\":[\"T1\",\"T2\"]}\n```");
        provider.push_reply("I am not sure.");
        let app = create_router(test_state(provider));

        let (status, body) = send(
            &app,
            post_json("/api/generate-rule", json!({"prompt": "Run T1 with T2"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json_body(&body),
            json!({"rule": {"type": "coRun", "tasks": ["T1", "T2"]}})
        );

        let (status, body) = send(
            &app,
            post_json("/api/generate-rule", json!({"prompt": "something"})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(&body), json!({"error": "AI failed to parse rule."}));
    }

    #[tokio::test]
    async fn test_upload_edit_and_export() {
        let app = create_router(test_state(Arc::new(MockProvider::new())));

        let upload = Request::post("/api/upload/clients")
            .body(Body::from("id,email\n1,a@x.com\n2,\n"))
            .unwrap();
        let (status, body) = send(&app, upload).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json_body(&body),
            json!({"dataset": "clients", "rows": 2, "columns": ["id", "email"]})
        );

        let (status, body) = send(
            &app,
            post_json(
                "/api/grid/clients/cell",
                json!({"rowIndex": 1, "column": "email", "value": "b@x.com"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["rows"][1][1]["value"], "b@x.com");

        let response = app.clone().oneshot(get("/api/export/clients")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv;charset=utf-8"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"clients.csv\""
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"id,email\n\"1\",\"a@x.com\"\n\"2\",\"b@x.com\"");
    }

    #[tokio::test]
    async fn test_bad_targets() {
        let app = create_router(test_state(Arc::new(MockProvider::new())));

        let (status, _) = send(&app, get("/api/grid/projects")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, get("/api/export/workers")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            post_json(
                "/api/grid/tasks/cell",
                json!({"rowIndex": 0, "column": "id", "value": "x"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rules_flow_and_export_order() {
        let provider = Arc::new(MockProvider::new());
        provider.push_reply("{\"type\":\"loadLimit\",\"group\":\"Backend\",\"maxSlotsPerPhase\":3}");
        let app = create_router(test_state(provider));

        let (status, _) = send(
            &app,
            post_json("/api/rules", json!({"type": "coRun", "coRunTasks": "T1", "priority": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            post_json(
                "/api/rules",
                json!({"type": "coRun", "coRunTasks": "T1, T2", "priority": 3}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json_body(&body)["rule"],
            json!({"type": "coRun", "tasks": ["T1", "T2"], "priority": 3})
        );

        let (status, _) = send(
            &app,
            post_json(
                "/api/rules/generate",
                json!({"prompt": "Limit Backend group to 3 tasks per phase", "priority": 1}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, get("/api/rules")).await;
        let listed = json_body(&body);
        assert_eq!(listed[0]["type"], "coRun");
        assert_eq!(listed[1]["type"], "loadLimit");

        let (status, body) = send(&app, get("/api/export/rules")).await;
        assert_eq!(status, StatusCode::OK);
        let exported = json_body(&body);
        assert_eq!(exported[0]["type"], "loadLimit");
        assert_eq!(exported[1]["type"], "coRun");
    }

    #[tokio::test]
    async fn test_revalidate_updates_summary() {
        let provider = Arc::new(MockProvider::new());
        provider.push_reply("[{\"rowIndex\":0,\"field\":\"ID\",\"message\":\"Duplicate\"}]");
        let app = create_router(test_state(provider));

        let upload = Request::post("/api/upload/workers")
            .body(Body::from("id\nW1\nW1\n"))
            .unwrap();
        send(&app, upload).await;

        let (status, body) = send(
            &app,
            Request::post("/api/grid/workers/revalidate")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let grid = json_body(&body);
        assert_eq!(grid["rows"][0][0]["error"], "Duplicate");
        assert_eq!(grid["loading"], false);

        let (_, body) = send(&app, get("/api/summary")).await;
        assert_eq!(
            json_body(&body),
            json!({"clients": 0, "workers": 1, "tasks": 0, "total": 1})
        );
    }
}
