//! In-process dispatch through a fully wired service.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use restkit::error::{BoxError, ClassifiedError, ErrorKind, Severity};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::Level;

mod common;

#[tokio::test]
async fn test_health_alive_scenario() {
    let (service, sink) = common::test_service();
    let router = service.into_router();

    let response = router
        .dispatch(common::request(Method::GET, "/health/alive"))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::body_json(response).await, json!({ "status": "ok" }));

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, Level::INFO);
    assert_eq!(records[0].path, "/health/alive");
    assert_eq!(records[0].method, "GET");
    assert_eq!(records[0].status, 200);
    assert!(records[0].error.is_none());
}

#[tokio::test]
async fn test_unregistered_method_scenario() {
    let (service, sink) = common::test_service();
    let router = service.into_router();

    let response = router
        .dispatch(common::request(Method::DELETE, "/health/alive"))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(common::body_json(response).await, json!({ "error": "404 Not Found" }));

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, Level::INFO);
    let details = records[0].error.as_ref().unwrap();
    assert_eq!(details.operation, "notFoundHandler");
    assert_eq!(details.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_unregistered_paths_are_not_found() {
    let (service, _) = common::test_service();
    let router = service.into_router();

    for (method, path) in [
        (Method::GET, "/health"),
        (Method::GET, "/health/alive/"),
        (Method::POST, "/anything"),
        (Method::PUT, "/"),
    ] {
        let response = router.dispatch(common::request(method, path)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{path}");
        assert!(common::body_json(response).await.get("error").is_some());
    }
}

#[tokio::test]
async fn test_panic_scenario() {
    let (service, sink) = common::test_service();
    let router = service.into_router();

    let response = router
        .dispatch(common::request(Method::GET, "/explode"))
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        common::body_json(response).await,
        json!({ "error": "Internal Server Error" })
    );

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, Level::ERROR);
    let details = records[0].error.as_ref().unwrap();
    assert_eq!(details.operation, "panicHandler");
    assert_eq!(details.kind, ErrorKind::InternalServerError);
    assert_eq!(details.severity, "severe");
    assert_eq!(records[0].fault.as_deref(), Some("handler panicked: handler blew up"));
}

#[tokio::test]
async fn test_handler_error_cause_is_logged_only() {
    let (mut service, sink) = common::test_service();
    service.router_mut().get("/orders", |_req: Request<Body>| async move {
        Err::<axum::response::Response, BoxError>("db down".into())
    });
    let router = service.into_router();

    let response = router.dispatch(common::request(Method::GET, "/orders")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        common::body_json(response).await,
        json!({ "error": "Internal Server Error" })
    );

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, Level::ERROR);
    assert_eq!(records[0].error.as_ref().unwrap().operation, "panicHandler");
    assert_eq!(records[0].fault.as_deref(), Some("handler returned an error: db down"));
}

#[tokio::test]
async fn test_duration_measured_from_dispatch() {
    let (mut service, sink) = common::test_service();
    let codec = service.codec().clone();
    service.router_mut().get("/slow", move |req: Request<Body>| {
        let codec = codec.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(40)).await;
            let (head, _) = req.into_parts();
            Ok::<_, BoxError>(codec.write(&head, &json!({ "done": true })))
        }
    });
    let router = service.into_router();

    let response = router.dispatch(common::request(Method::GET, "/slow")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert!(records[0].duration >= Duration::from_millis(40), "{:?}", records[0].duration);
    assert!(records[0].fault.is_none());
}

#[tokio::test]
async fn test_options_lists_registered_methods() {
    let (mut service, sink) = common::test_service();
    service.router_mut().post("/items", |_req: Request<Body>| async move {
        Ok::<_, BoxError>(axum::response::Response::new(Body::empty()))
    });
    let router = service.into_router();

    let response = router
        .dispatch(common::request(Method::OPTIONS, "/items"))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let allow = response.headers()[header::ALLOW].to_str().unwrap().to_string();
    let mut methods: Vec<&str> = allow.split(", ").collect();
    methods.sort_unstable();
    assert_eq!(methods, vec!["GET", "OPTIONS", "POST"]);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.is_empty());
    assert!(sink.is_empty());
}

#[derive(Debug, Deserialize)]
struct Greeting {
    name: String,
}

#[tokio::test]
async fn test_handler_decodes_and_classifies() {
    let (mut service, sink) = common::test_service();
    let codec = service.codec().clone();
    service.router_mut().post("/greet", move |req: Request<Body>| {
        let codec = codec.clone();
        async move {
            let (head, body) = req.into_parts();
            let response = match codec.read_json::<Greeting>(body).await {
                Ok(greeting) if greeting.name.is_empty() => {
                    let err = ClassifiedError::new(
                        "name is required",
                        ErrorKind::BadRequest,
                        Severity::Warn,
                    )
                    .with_op("greet");
                    codec.write_error_code(&head, err.status().as_u16(), &err)
                }
                Ok(greeting) => codec.write_code(&head, 201, &json!({ "hello": greeting.name })),
                Err(err) => {
                    let err = ClassifiedError::from(err);
                    codec.write_error_code(&head, err.status().as_u16(), &err)
                }
            };
            Ok::<_, BoxError>(response)
        }
    });
    let router = service.into_router();

    let post = |body: &'static str| {
        Request::builder()
            .method(Method::POST)
            .uri("/greet")
            .body(Body::from(body))
            .unwrap()
    };

    let response = router.dispatch(post(r#"{"name":"ada"}"#)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(common::body_json(response).await, json!({ "hello": "ada" }));

    let response = router.dispatch(post(r#"{"name":""}"#)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(common::body_json(response).await, json!({ "error": "name is required" }));

    let response = router.dispatch(post("not json")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let records = sink.take();
    assert_eq!(records.len(), 3);
    assert_eq!(records[1].error.as_ref().unwrap().operation, "greet");
    assert_eq!(records[1].error.as_ref().unwrap().severity, "warn");
    assert_eq!(records[2].error.as_ref().unwrap().operation, "decodeRequest");
    assert!(records.iter().all(|r| r.level == Level::INFO));
}
