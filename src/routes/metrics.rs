use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use prometheus::{Encoder, TextEncoder};

use crate::AppState;

/// GET /metrics — Prometheus scrape endpoint. Every call hits the upstream API.
pub async fn metrics_handler(State(state): State<AppState>) -> Result<impl IntoResponse, StatusCode> {
    let body = state.collector.render().await.map_err(|e| {
        tracing::error!("Metrics: encoding failed: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(([(header::CONTENT_TYPE, TextEncoder::new().format_type().to_string())], body))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
        Router,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::{
        app,
        services::{
            metrics::PlanMetricsCollector,
            plan_api::{
                tests::{json_upstream, spawn_upstream, test_config},
                PlanApiClient,
            },
        },
        AppState,
    };

    fn state_for(api_url: String) -> AppState {
        let config = test_config(api_url);
        let api = PlanApiClient::new(&config).unwrap();
        AppState {
            collector: PlanMetricsCollector::new(api, config.username.clone()),
        }
    }

    async fn scrape(state: AppState) -> (StatusCode, String, String) {
        let request = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
        let response = app(state).oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_metrics_serves_upstream_values() {
        let addr = spawn_upstream(json_upstream(
            r#"{"parallel_sessions_running":3,"team_parallel_sessions_max_allowed":10,"parallel_sessions_max_allowed":5,"queued_sessions":1,"queued_sessions_max_allowed":2}"#,
        ))
        .await;

        let (status, content_type, body) =
            scrape(state_for(format!("http://{addr}/automate/plan.json"))).await;

        assert_eq!(status, StatusCode::OK);
        assert!(content_type.starts_with("text/plain"));
        for line in [
            r#"browserstack_plan_parallel_sessions_running{plan="acct1"} 3"#,
            r#"browserstack_plan_team_parallel_sessions_max_allowed{plan="acct1"} 10"#,
            r#"browserstack_plan_parallel_sessions_max_allowed{plan="acct1"} 5"#,
            r#"browserstack_plan_queued_sessions{plan="acct1"} 1"#,
            r#"browserstack_plan_queued_sessions_max_allowed{plan="acct1"} 2"#,
            r#"browserstack_plan_up{plan="acct1"} 1"#,
        ] {
            assert!(body.lines().any(|l| l == line), "missing line: {line}\n{body}");
        }
    }

    #[tokio::test]
    async fn test_metrics_still_answers_when_upstream_fails() {
        let upstream = Router::new().route(
            "/automate/plan.json",
            get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let addr = spawn_upstream(upstream).await;

        let (status, _, body) = scrape(state_for(format!("http://{addr}/automate/plan.json"))).await;

        assert_eq!(status, StatusCode::OK);
        let series: Vec<&str> = body
            .lines()
            .filter(|l| l.starts_with("browserstack_plan_"))
            .collect();
        assert_eq!(series.len(), 6, "{body}");
        assert!(series.iter().all(|l| l.contains(r#"{plan="acct1"}"#) && l.ends_with(" 0")));
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_metrics_exposes_process_series() {
        let addr = spawn_upstream(json_upstream(r#"{"queued_sessions":1}"#)).await;

        let (status, _, body) = scrape(state_for(format!("http://{addr}/automate/plan.json"))).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.lines().any(|l| l.starts_with("process_resident_memory_bytes ")), "{body}");
        assert!(body.lines().any(|l| l.starts_with("process_cpu_seconds_total ")), "{body}");
    }

    #[tokio::test]
    async fn test_health_does_not_touch_upstream() {
        // Nothing listens here; /health must answer regardless.
        let state = state_for("http://127.0.0.1:9/automate/plan.json".to_string());

        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app(state).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }
}
