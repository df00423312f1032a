//! Client integration tests.
//!
//! Each test runs the client against an in-process HTTP server that records
//! every request it receives and answers with canned responses.

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::routing::get;
use chronos_client::{ChronosClient, ClientConfig, ClientError, SchedulerApi};
use chronos_core::domain::job::{Job, Jobs};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A request as the server saw it
#[derive(Debug, Clone)]
struct Recorded {
    method: Method,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    body: Bytes,
}

impl Recorded {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// Stand-in scheduler: records requests, replies per path
#[derive(Clone, Default)]
struct FakeScheduler {
    requests: Arc<Mutex<Vec<Recorded>>>,
    responses: Arc<Mutex<HashMap<String, (StatusCode, String)>>>,
}

impl FakeScheduler {
    fn respond(&self, path: &str, status: StatusCode, body: &str) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .insert(path.to_string(), (status, body.to_string()));
        self
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    fn last(&self) -> Recorded {
        self.requests().pop().expect("no request recorded")
    }

    async fn spawn(&self) -> SocketAddr {
        let app = Router::new()
            .route("/echo/scheduler/jobs/search", get(echo_search))
            .fallback(record)
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        addr
    }
}

async fn record(
    State(scheduler): State<FakeScheduler>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    scheduler.requests.lock().unwrap().push(Recorded {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body,
    });

    scheduler
        .responses
        .lock()
        .unwrap()
        .get(uri.path())
        .cloned()
        .unwrap_or((StatusCode::OK, String::new()))
}

/// Answers a search with a single job named after the query, after a delay
/// that makes concurrent requests overlap
async fn echo_search(Query(params): Query<HashMap<String, String>>) -> axum::Json<Value> {
    let name = params.get("name").cloned().unwrap_or_default();
    let delay = if name == "slow" { 150 } else { 10 };
    tokio::time::sleep(Duration::from_millis(delay)).await;

    axum::Json(json!([{ "name": name, "command": "true" }]))
}

fn config(addr: SocketAddr, prefix: &str) -> ClientConfig {
    ClientConfig::new(&format!("http://{}", addr))
        .unwrap()
        .with_api_prefix(prefix)
}

async fn client(scheduler: &FakeScheduler) -> ChronosClient {
    let addr = scheduler.spawn().await;
    ChronosClient::new(config(addr, "")).unwrap()
}

// =============================================================================
// Connectivity check
// =============================================================================

#[tokio::test]
async fn test_connect_lists_jobs_under_prefix() {
    let scheduler = FakeScheduler::default();
    scheduler.respond("/v1/scheduler/jobs", StatusCode::OK, "[]");
    let addr = scheduler.spawn().await;

    ChronosClient::connect(config(addr, "v1")).await.unwrap();

    let request = scheduler.last();
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.path, "/v1/scheduler/jobs");
    assert_eq!(request.query, None);
}

#[tokio::test]
async fn test_connect_without_prefix_uses_root_paths() {
    let scheduler = FakeScheduler::default();
    let addr = scheduler.spawn().await;

    ChronosClient::connect(config(addr, "")).await.unwrap();

    assert_eq!(scheduler.last().path, "/scheduler/jobs");
}

#[tokio::test]
async fn test_connect_reports_server_error_as_unreachable() {
    let scheduler = FakeScheduler::default();
    scheduler.respond("/v1/scheduler/jobs", StatusCode::INTERNAL_SERVER_ERROR, "");
    let addr = scheduler.spawn().await;

    let err = ChronosClient::connect(config(addr, "v1")).await.unwrap_err();

    assert!(err.is_unreachable());
    assert_eq!(
        err.to_string(),
        "Could not reach chronos cluster: 500 Internal Server Error"
    );
}

#[tokio::test]
async fn test_connect_reports_refused_connection_as_unreachable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = ChronosClient::connect(config(addr, "")).await.unwrap_err();

    match &err {
        ClientError::Unreachable(inner) => {
            assert!(matches!(**inner, ClientError::Transport(_)));
        }
        other => panic!("expected unreachable error, got {other:?}"),
    }
    assert_eq!(err.status(), None);
    assert!(
        err.to_string()
            .starts_with("Could not reach chronos cluster: HTTP request failed")
    );
}

// =============================================================================
// Executor
// =============================================================================

#[tokio::test]
async fn test_request_carries_json_headers_and_credentials() {
    let scheduler = FakeScheduler::default();
    let addr = scheduler.spawn().await;
    let client =
        ChronosClient::new(config(addr, "").with_basic_auth("admin", "secret")).unwrap();

    client.jobs().await.unwrap();

    let headers = scheduler.last().headers;
    assert_eq!(headers["content-type"], "application/json");
    assert_eq!(headers["accept"], "application/json");
    assert_eq!(headers["authorization"], "Basic YWRtaW46c2VjcmV0");
}

#[tokio::test]
async fn test_empty_body_leaves_result_slot_untouched() {
    let scheduler = FakeScheduler::default();
    let client = client(&scheduler).await;

    let mut slot = vec![Job::new("untouched", "true")];
    let status = client
        .execute(Method::GET, "scheduler/jobs", &[], None::<&()>, &mut slot)
        .await
        .unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(slot, vec![Job::new("untouched", "true")]);
}

#[tokio::test]
async fn test_error_body_is_decoded_before_failing() {
    let scheduler = FakeScheduler::default();
    scheduler.respond(
        "/scheduler/jobs",
        StatusCode::INTERNAL_SERVER_ERROR,
        r#"{"message":"storage unavailable"}"#,
    );
    let client = client(&scheduler).await;

    let mut slot = Value::Null;
    let err = client
        .execute(Method::GET, "scheduler/jobs", &[], None::<&()>, &mut slot)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Service { status: 500, .. }));
    assert!(err.to_string().contains("500"));
    assert_eq!(slot, json!({ "message": "storage unavailable" }));
}

#[tokio::test]
async fn test_malformed_body_fails_even_on_success() {
    let scheduler = FakeScheduler::default();
    scheduler.respond("/scheduler/jobs", StatusCode::OK, "<html>oops</html>");
    let client = client(&scheduler).await;

    let err = client.jobs().await.unwrap_err();

    assert!(matches!(err, ClientError::Decode { status: 200, .. }));
    assert_eq!(err.status(), Some(200));
}

#[tokio::test]
async fn test_shape_mismatch_is_a_decode_error() {
    let scheduler = FakeScheduler::default();
    scheduler.respond("/scheduler/jobs", StatusCode::OK, r#"{"jobs": []}"#);
    let client = client(&scheduler).await;

    assert!(matches!(
        client.jobs().await,
        Err(ClientError::Decode { .. })
    ));
}

#[tokio::test]
async fn test_not_found_keeps_raw_status() {
    let scheduler = FakeScheduler::default();
    scheduler.respond("/scheduler/job/missing", StatusCode::NOT_FOUND, "");
    let client = client(&scheduler).await;

    let err = client.delete_job("missing").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "404 Not Found");
}

#[tokio::test]
async fn test_unserializable_body_sends_nothing() {
    let scheduler = FakeScheduler::default();
    let client = client(&scheduler).await;

    // Non-string map keys cannot be encoded as JSON
    let body: HashMap<(u8, u8), u8> = HashMap::from([((1, 2), 3)]);
    let err = client
        .execute(Method::POST, "scheduler/iso8601", &[], Some(&body), &mut Value::Null)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Serialization(_)));
    assert!(scheduler.requests().is_empty());
}

#[tokio::test]
async fn test_concurrent_calls_build_independent_targets() {
    let scheduler = FakeScheduler::default();
    let addr = scheduler.spawn().await;
    let client = ChronosClient::new(config(addr, "echo")).unwrap();

    let (slow, fast, all) = tokio::join!(
        client.search_jobs("slow"),
        client.search_jobs("fast"),
        client.jobs(),
    );

    assert_eq!(slow.unwrap()[0].name, "slow");
    assert_eq!(fast.unwrap()[0].name, "fast");
    all.unwrap();

    let listed = scheduler.last();
    assert_eq!(listed.path, "/echo/scheduler/jobs");
    assert_eq!(listed.query, None);
}

// =============================================================================
// Operations
// =============================================================================

#[tokio::test]
async fn test_jobs_decodes_listing() {
    let scheduler = FakeScheduler::default();
    scheduler.respond(
        "/scheduler/jobs",
        StatusCode::OK,
        concat!(
            r#"[{"name":"a","command":"true","successCount":4},"#,
            r#"{"name":"b","command":"false","parents":["a"]}]"#,
        ),
    );
    let client = client(&scheduler).await;

    let jobs: Jobs = client.jobs().await.unwrap();

    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].name, "a");
    assert_eq!(jobs[0].success_count, Some(4));
    assert_eq!(jobs[1].parents, vec!["a".to_string()]);
}

#[tokio::test]
async fn test_jobs_tolerates_null_fields() {
    let scheduler = FakeScheduler::default();
    scheduler.respond(
        "/scheduler/jobs",
        StatusCode::OK,
        concat!(
            r#"[{"name":"a","command":null,"parents":null,"uris":null,"#,
            r#""environmentVariables":null,"arguments":null,"constraints":null,"#,
            r#""container":{"type":"DOCKER","volumes":null,"parameters":null}}]"#,
        ),
    );
    let client = client(&scheduler).await;

    let jobs = client.jobs().await.unwrap();

    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].name, "a");
    assert_eq!(jobs[0].command, "");
    assert!(jobs[0].parents.is_empty());
    assert!(jobs[0].uris.is_empty());
    assert!(jobs[0].environment_variables.is_empty());
    let container = jobs[0].container.as_ref().unwrap();
    assert!(container.volumes.is_empty());
    assert!(container.parameters.is_empty());
}

#[tokio::test]
async fn test_search_sends_name_query() {
    let scheduler = FakeScheduler::default();
    scheduler.respond("/scheduler/jobs/search", StatusCode::OK, r#"[{"name":"nightly etl"}]"#);
    let client = client(&scheduler).await;

    let jobs = client.search_jobs("nightly etl").await.unwrap();

    assert_eq!(jobs[0].name, "nightly etl");
    let request = scheduler.last();
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.query.as_deref(), Some("name=nightly+etl"));
}

#[tokio::test]
async fn test_search_with_blank_name_sends_nothing() {
    let scheduler = FakeScheduler::default();
    let client = client(&scheduler).await;

    for name in ["", "   ", "\t\n"] {
        let err = client.search_jobs(name).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    assert!(scheduler.requests().is_empty());
}

#[tokio::test]
async fn test_delete_endpoints() {
    let scheduler = FakeScheduler::default();
    let client = client(&scheduler).await;

    client.delete_job("etl").await.unwrap();
    client.delete_job_tasks("etl").await.unwrap();
    client.delete_job("nightly 100%").await.unwrap();
    client.delete_job_tasks("a%20b").await.unwrap();

    let requests = scheduler.requests();
    assert_eq!(requests[0].method, Method::DELETE);
    assert_eq!(requests[0].path, "/scheduler/job/etl");
    assert_eq!(requests[1].method, Method::DELETE);
    assert_eq!(requests[1].path, "/scheduler/task/kill/etl");
    assert_eq!(requests[2].path, "/scheduler/job/nightly%20100%25");
    assert_eq!(requests[3].path, "/scheduler/task/kill/a%2520b");
    assert!(requests.iter().all(|r| r.body.is_empty()));
}

#[tokio::test]
async fn test_start_job_keeps_argument_order() {
    let scheduler = FakeScheduler::default();
    let client = client(&scheduler).await;

    let args = vec![
        ("zone".to_string(), "eu".to_string()),
        ("date".to_string(), "2024-01-01".to_string()),
    ];
    client.start_job("etl", &args).await.unwrap();

    let request = scheduler.last();
    assert_eq!(request.method, Method::PUT);
    assert_eq!(request.path, "/scheduler/job/etl");
    assert_eq!(request.query.as_deref(), Some("zone=eu&date=2024-01-01"));
}

#[tokio::test]
async fn test_add_scheduled_and_dependent_jobs() {
    let scheduler = FakeScheduler::default();
    let client = client(&scheduler).await;

    let scheduled = Job::scheduled("extract", "extract.sh", "R/2024-01-01T00:00:00Z/P1D");
    let dependent = Job::dependent("load", "load.sh", ["extract"]);
    client.add_scheduled_job(&scheduled).await.unwrap();
    client.add_dependent_job(&dependent).await.unwrap();

    let requests = scheduler.requests();
    assert_eq!(requests[0].method, Method::POST);
    assert_eq!(requests[0].path, "/scheduler/iso8601");
    assert_eq!(
        requests[0].json(),
        json!({
            "name": "extract",
            "command": "extract.sh",
            "schedule": "R/2024-01-01T00:00:00Z/P1D"
        })
    );
    assert_eq!(requests[1].method, Method::POST);
    assert_eq!(requests[1].path, "/scheduler/dependency");
    assert_eq!(
        requests[1].json(),
        json!({ "name": "load", "command": "load.sh", "parents": ["extract"] })
    );
}

#[tokio::test]
async fn test_run_once_now_overwrites_schedule_and_epsilon() {
    let scheduler = FakeScheduler::default();
    let client = client(&scheduler).await;

    let mut job = Job {
        retries: Some(3),
        epsilon: Some("PT1M".to_string()),
        ..Job::scheduled("report", "report.sh", "R/2024-01-01T00:00:00Z/PT1H")
    };
    client.run_once_now_job(&mut job).await.unwrap();

    assert_eq!(job.schedule.as_deref(), Some("R1//PT2M"));
    assert_eq!(job.epsilon.as_deref(), Some("PT10M"));

    let request = scheduler.last();
    assert_eq!(request.path, "/scheduler/iso8601");
    assert_eq!(
        request.json(),
        json!({
            "name": "report",
            "command": "report.sh",
            "retries": 3,
            "epsilon": "PT10M",
            "schedule": "R1//PT2M"
        })
    );
}

#[tokio::test]
async fn test_unschedule_submits_zero_repetitions() {
    let scheduler = FakeScheduler::default();
    let client = client(&scheduler).await;

    let mut job = Job {
        shell: Some(true),
        ..Job::scheduled("report", "report.sh", "R/2024-01-01T00:00:00Z/PT1H")
    };
    client.unschedule_job(&mut job).await.unwrap();

    let request = scheduler.last();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/scheduler/iso8601");
    assert_eq!(
        request.json(),
        json!({
            "name": "report",
            "command": "report.sh",
            "shell": true,
            "schedule": "R0//PT0M"
        })
    );
}
