use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::middleware::{logging_middleware, metrics_middleware};
use super::state::AppState;
use super::{health, model_metrics, outlets, predict};
use crate::infrastructure::observability::{PrometheusMetrics, create_metrics_router};

/// CORS policy open to every origin, method and header
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the full router; the Prometheus endpoint is merged when enabled
pub fn create_router(state: AppState, metrics: Option<PrometheusMetrics>) -> Router {
    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .route("/predict", post(predict::predict))
        .route("/outlets", get(outlets::list_outlets))
        .route("/outlets/{outlet}", get(outlets::outlet_news))
        .route("/model/metrics", get(model_metrics::model_metrics))
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http());

    if let Some(m) = metrics {
        router = router.merge(create_metrics_router(m));
    }

    router.layer(cors_layer())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::classifier::mock::MockClassifier;
    use crate::domain::news::mock::{MockNewsSearch, MockScraper};
    use crate::domain::tracking::mock::MockExperimentTracker;
    use crate::domain::{ModelRegistry, ModelVariant, RunMetrics, SearchResponse};
    use crate::infrastructure::news::OutletNewsService;

    struct Harness {
        classifier: Arc<MockClassifier>,
        search: Arc<MockNewsSearch>,
        scraper: Arc<MockScraper>,
        state: AppState,
    }

    impl Harness {
        fn new(classifier: MockClassifier, search: MockNewsSearch, scraper: MockScraper) -> Self {
            let classifier = Arc::new(classifier);
            let search = Arc::new(search);
            let scraper = Arc::new(scraper);

            let state = AppState::new(
                ModelRegistry::single(classifier.clone()),
                OutletNewsService::new(search.clone(), scraper.clone()),
            );

            Self {
                classifier,
                search,
                scraper,
                state,
            }
        }

        fn basic() -> Self {
            Self::new(
                MockClassifier::new(ModelVariant::Bert),
                MockNewsSearch::with_urls(&[]),
                MockScraper::new(),
            )
        }

        fn router(&self) -> Router {
            create_router(self.state.clone(), None)
        }
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, body)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn predict_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(Harness::basic().router(), get_request("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_predict_with_default_model() {
        let harness = Harness::basic();

        let (status, body) = send(
            harness.router(),
            predict_request(json!({"title": "Tax cuts", "content": "The bill passed."})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["prediction"], "Right");
        let probabilities: Vec<f64> = body["probabilities"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p.as_f64().unwrap())
            .collect();
        assert_eq!(probabilities.len(), 3);
        assert!((probabilities.iter().sum::<f64>() - 1.0).abs() < 1e-3);
        assert!((body["confidence"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(harness.classifier.calls(), 1);
    }

    #[tokio::test]
    async fn test_predict_with_explicit_model() {
        let harness = Harness::basic();

        let (status, _) = send(
            harness.router(),
            predict_request(json!({"title": "t", "content": "c", "model_name": "bert"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_predict_unknown_model_skips_inference() {
        let harness = Harness::basic();

        let (status, body) = send(
            harness.router(),
            predict_request(json!({"title": "t", "content": "c", "model_name": "gpt-9"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "invalid_request_error");
        assert_eq!(harness.classifier.calls(), 0);
    }

    #[tokio::test]
    async fn test_predict_unloaded_variant_is_bad_request() {
        let harness = Harness::basic();

        let (status, body) = send(
            harness.router(),
            predict_request(json!({"title": "t", "content": "c", "model_name": "bert-lora"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"].as_str().unwrap().contains("not loaded"));
        assert_eq!(harness.classifier.calls(), 0);
    }

    #[tokio::test]
    async fn test_predict_missing_field_is_client_error() {
        let harness = Harness::basic();

        let (status, body) = send(harness.router(), predict_request(json!({"title": "t"}))).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "json_parse_error");
        assert_eq!(harness.classifier.calls(), 0);
    }

    #[tokio::test]
    async fn test_predict_failure_is_server_error() {
        let harness = Harness::new(
            MockClassifier::new(ModelVariant::Bert).with_error("tensor shape mismatch"),
            MockNewsSearch::with_urls(&[]),
            MockScraper::new(),
        );

        let (status, body) = send(
            harness.router(),
            predict_request(json!({"title": "t", "content": "c"})),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["error"]["message"],
            "Prediction failed: tensor shape mismatch"
        );
    }

    #[tokio::test]
    async fn test_list_outlets() {
        let (status, body) = send(Harness::basic().router(), get_request("/outlets")).await;

        assert_eq!(status, StatusCode::OK);
        let names = body.as_array().unwrap();
        assert_eq!(names.len(), crate::domain::news::NEWS_OUTLETS.len());
        assert_eq!(names[0], "ABC News");
    }

    #[tokio::test]
    async fn test_outlet_news() {
        let harness = Harness::new(
            MockClassifier::new(ModelVariant::Bert),
            MockNewsSearch::with_urls(&["https://bbc.co.uk/1", "https://bbc.co.uk/2"]),
            MockScraper::new()
                .with_page("https://bbc.co.uk/1", "First body")
                .with_failure("https://bbc.co.uk/2", 500),
        );

        let (status, body) = send(harness.router(), get_request("/outlets/BBC%20News?q=budget")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{"title": "Article 0", "content": "First body"}]));
        assert_eq!(harness.search.calls(), 1);
        assert_eq!(harness.scraper.requested().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_outlet_skips_news_api() {
        let harness = Harness::basic();

        let (status, body) = send(harness.router(), get_request("/outlets/Daily%20Planet")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "No outlets found.");
        assert_eq!(harness.search.calls(), 0);
    }

    #[tokio::test]
    async fn test_outlet_without_results_is_not_found() {
        let harness = Harness::new(
            MockClassifier::new(ModelVariant::Bert),
            MockNewsSearch::new(SearchResponse {
                status: "error".to_string(),
                code: Some("apiKeyInvalid".to_string()),
                ..SearchResponse::default()
            }),
            MockScraper::new(),
        );

        let (status, body) = send(harness.router(), get_request("/outlets/CNN")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "No articles found for outlet 'CNN'");
        assert!(harness.scraper.requested().is_empty());
    }

    #[tokio::test]
    async fn test_outlet_search_failure_is_bad_gateway() {
        let harness = Harness::new(
            MockClassifier::new(ModelVariant::Bert),
            MockNewsSearch::with_urls(&[]).with_error("connection refused"),
            MockScraper::new(),
        );

        let (status, body) = send(harness.router(), get_request("/outlets/CNN")).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["type"], "upstream_error");
    }

    #[tokio::test]
    async fn test_model_metrics_without_tracking() {
        let (status, _) = send(Harness::basic().router(), get_request("/model/metrics")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_model_metrics() {
        let mut metrics = BTreeMap::new();
        metrics.insert("accuracy".to_string(), 0.9);
        let tracker = MockExperimentTracker::new().with_run(RunMetrics {
            experiment_name: "leaning".to_string(),
            run_id: "run-1".to_string(),
            run_name: None,
            status: Some("FINISHED".to_string()),
            start_time: None,
            metrics,
        });

        let harness = Harness::basic();
        let router = create_router(
            harness.state.clone().with_tracking(Arc::new(tracker), "leaning"),
            None,
        );

        let (status, body) = send(router, get_request("/model/metrics")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["run_id"], "run-1");
        assert_eq!(body["metrics"]["accuracy"], 0.9);
    }

    #[tokio::test]
    async fn test_model_metrics_unknown_experiment() {
        let harness = Harness::basic();
        let router = create_router(
            harness
                .state
                .clone()
                .with_tracking(Arc::new(MockExperimentTracker::new()), "missing"),
            None,
        );

        let (status, _) = send(router, get_request("/model/metrics")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/predict")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();

        let response = Harness::basic().router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }
}
