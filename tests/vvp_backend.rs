//! End-to-end tests against an in-process mock of the VVP REST API.
//!
//! The mock classifies statements by their first keyword the way the real
//! backend does for the cases exercised here, and records every call it gets.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use vvp_sql::{
    connect_vvp, flink_sql, ConnectOptions, ConnectOutcome, ReqwestTransport, SessionRegistry,
    SqlOptions, SqlOutcome, SqlService, VvpError,
};

#[derive(Clone, Default)]
struct MockVvp {
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockVvp {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn executes(&self) -> usize {
        self.calls().iter().filter(|c| c.ends_with(":execute")).count()
    }
}

fn validation_result(sql: &str) -> Option<&'static str> {
    let keyword = sql.split_whitespace().next().unwrap_or("").to_uppercase();
    match keyword.as_str() {
        "CREATE" | "DROP" | "ALTER" => Some("VALIDATION_RESULT_VALID_DDL_STATEMENT"),
        "SHOW" | "DESCRIBE" | "USE" => Some("VALIDATION_RESULT_VALID_COMMAND_STATEMENT"),
        "SELECT" => Some("VALIDATION_RESULT_VALID_SELECT_QUERY"),
        "INSERT" => Some("VALIDATION_RESULT_VALID_INSERT_QUERY"),
        "EXPLODE" => None,
        _ => Some("VALIDATION_RESULT_INVALID"),
    }
}

async fn list_namespaces(State(state): State<MockVvp>) -> Json<Value> {
    state.calls.lock().unwrap().push("GET namespaces".to_string());
    Json(json!({
        "namespaces": [
            {"name": "namespaces/default"},
            {"name": "namespaces/analytics"}
        ]
    }))
}

async fn sql_scripts(
    State(state): State<MockVvp>,
    Path((namespace, action)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    state
        .calls
        .lock()
        .unwrap()
        .push(format!("{}/{}", namespace, action));

    match action.as_str() {
        "sqlscripts:validate" => {
            let script = body["script"].as_str().unwrap_or_default();
            match validation_result(script) {
                None => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
                Some(result) if result.ends_with("_STATEMENT") => {
                    Json(json!({"validationResult": result})).into_response()
                }
                Some(result) => Json(json!({
                    "validationResult": result,
                    "errorDetails": {"message": format!("{} is not supported", script)}
                }))
                .into_response(),
            }
        }
        "sqlscripts:execute" => {
            let statement = body["statement"].as_str().unwrap_or_default();
            if statement.to_uppercase().starts_with("SHOW") {
                Json(json!({
                    "resultTable": {
                        "headers": [{"name": "table name"}],
                        "rows": [
                            {"cells": [{"value": "orders"}]},
                            {"cells": [{"value": "payments"}]}
                        ]
                    }
                }))
                .into_response()
            } else {
                Json(json!({"result": "RESULT_SUCCESS"})).into_response()
            }
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn start_mock() -> (MockVvp, SocketAddr) {
    let state = MockVvp::default();
    let app = Router::new()
        .route("/namespaces/v1/namespaces", get(list_namespaces))
        .route("/sql/v1beta1/namespaces/{namespace}/{action}", post(sql_scripts))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (state, addr)
}

struct Client {
    registry: SessionRegistry,
    transport: Arc<ReqwestTransport>,
    service: SqlService,
}

impl Client {
    fn new() -> Self {
        let transport = Arc::new(ReqwestTransport::new(5).unwrap());
        let service = SqlService::new(transport.clone());
        Self {
            registry: SessionRegistry::new(),
            transport,
            service,
        }
    }

    async fn connect(&mut self, options: ConnectOptions) -> vvp_sql::Result<ConnectOutcome> {
        connect_vvp(&mut self.registry, self.transport.as_ref(), &options).await
    }

    async fn sql(&self, cell: &str) -> vvp_sql::Result<SqlOutcome> {
        flink_sql(&self.registry, &self.service, &SqlOptions::default(), cell).await
    }
}

fn options(addr: SocketAddr) -> ConnectOptions {
    ConnectOptions::new(addr.ip().to_string()).with_port(addr.port())
}

#[tokio::test]
async fn test_list_namespaces() {
    let (mock, addr) = start_mock().await;
    let mut client = Client::new();

    let outcome = client.connect(options(addr)).await.unwrap();
    assert_eq!(
        outcome,
        ConnectOutcome::Namespaces(vec!["default".to_string(), "analytics".to_string()])
    );
    assert_eq!(mock.calls(), vec!["GET namespaces"]);
}

#[tokio::test]
async fn test_show_tables_returns_table() {
    let (mock, addr) = start_mock().await;
    let mut client = Client::new();
    client
        .connect(options(addr).with_namespace("default").with_session("session1"))
        .await
        .unwrap();

    let outcome = client.sql("SHOW TABLES").await.unwrap();
    let table = outcome.as_table().expect("SHOW TABLES returns a table");
    assert!(table.column_index("table name").is_some());
    assert_eq!(table.rows, vec![vec![json!("orders")], vec![json!("payments")]]);
    assert_eq!(
        mock.calls(),
        vec!["default/sqlscripts:validate", "default/sqlscripts:execute"]
    );
}

#[tokio::test]
async fn test_create_table_returns_raw_json() {
    let (_mock, addr) = start_mock().await;
    let mut client = Client::new();
    client
        .connect(options(addr).with_namespace("default").with_session("session1"))
        .await
        .unwrap();

    let outcome = client
        .sql("CREATE TABLE `orders` (id INT) WITH ('connector' = 'kafka')")
        .await
        .unwrap();
    assert_eq!(outcome, SqlOutcome::Raw(json!({"result": "RESULT_SUCCESS"})));
}

#[tokio::test]
async fn test_select_is_rejected_without_execute() {
    let (mock, addr) = start_mock().await;
    let mut client = Client::new();
    client
        .connect(options(addr).with_namespace("default").with_session("session1"))
        .await
        .unwrap();

    let error = client.sql("SELECT * FROM orders").await.unwrap_err();
    match &error {
        VvpError::SqlSyntaxOrUnsupported { message, details, .. } => {
            assert_eq!(message, "SELECT * FROM orders is not supported");
            assert_eq!(
                details.as_ref().unwrap()["validationResult"],
                "VALIDATION_RESULT_VALID_SELECT_QUERY"
            );
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(mock.executes(), 0);
}

#[tokio::test]
async fn test_validate_server_error() {
    let (mock, addr) = start_mock().await;
    let mut client = Client::new();
    client
        .connect(options(addr).with_namespace("default").with_session("session1"))
        .await
        .unwrap();

    let error = client.sql("EXPLODE now").await.unwrap_err();
    assert_eq!(error.status(), Some(500));
    assert_eq!(error.sql(), Some("EXPLODE now"));
    assert_eq!(mock.executes(), 0);
}

#[tokio::test]
async fn test_sessions_target_their_namespace() {
    let (mock, addr) = start_mock().await;
    let mut client = Client::new();
    client
        .connect(options(addr).with_namespace("default").with_session("first"))
        .await
        .unwrap();
    client
        .connect(options(addr).with_namespace("analytics").with_session("second"))
        .await
        .unwrap();

    // Latest session is the default
    client.sql("SHOW TABLES").await.unwrap();
    flink_sql(
        &client.registry,
        &client.service,
        &SqlOptions::with_session("first"),
        "DROP TABLE orders",
    )
    .await
    .unwrap();

    assert_eq!(
        mock.calls(),
        vec![
            "analytics/sqlscripts:validate",
            "analytics/sqlscripts:execute",
            "default/sqlscripts:validate",
            "default/sqlscripts:execute",
        ]
    );
}

#[tokio::test]
async fn test_empty_cell_makes_no_calls() {
    let (mock, addr) = start_mock().await;
    let mut client = Client::new();
    client
        .connect(options(addr).with_namespace("default").with_session("session1"))
        .await
        .unwrap();

    assert!(client.sql("").await.unwrap().is_noop());
    assert!(mock.calls().is_empty());
}
