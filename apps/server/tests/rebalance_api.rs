use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use rebalancer_server::{api::app_router, build_state, config::Config};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let config = Config::default();
    let state = build_state(&config);
    app_router(state, &config)
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn two_fund_input() -> Value {
    json!({
        "funds": ["A", "B"],
        "countries": ["X", "Y"],
        "assets": { "A": 1000, "B": 0 },
        "compositions": { "A": { "X": 100 }, "B": { "Y": 100 } },
        "targets": { "X": 50, "Y": 50 },
        "recurringInvestment": 0,
        "recurringAllocation": { "A": 50, "B": 50 },
        "growthInvestment": 1000
    })
}

#[tokio::test]
async fn healthz_works() {
    let (status, body) = send(app(), "GET", "/api/v1/healthz", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn template_is_returned() {
    let (status, body) = send(app(), "GET", "/api/v1/rebalance/template", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["funds"].as_array().map(Vec::len), Some(5));
    assert_eq!(body["countries"].as_array().and_then(|c| c.last()), Some(&json!("Other")));
}

#[tokio::test]
async fn calculate_returns_proposal() {
    let (status, body) = send(
        app(),
        "POST",
        "/api/v1/rebalance/calculate",
        Some(two_fund_input()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["strategy"]["type"], "greedy");
    assert_eq!(body["proposal"][1]["fund"], "B");
    assert_eq!(body["proposal"][1]["amount"].as_f64(), Some(1000.0));
    assert_eq!(body["future"]["rows"][0]["ratio"].as_f64(), Some(50.0));
}

#[tokio::test]
async fn calculate_with_priority_fund() {
    let mut input = two_fund_input();
    input["priorityFund"] = json!("A");

    let (status, body) = send(app(), "POST", "/api/v1/rebalance/calculate", Some(input)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["strategy"]["type"], "priorityBiased");
    assert_eq!(body["strategy"]["priorityFund"], "A");
}

#[tokio::test]
async fn calculate_rejects_bad_percentages() {
    let mut input = two_fund_input();
    input["targets"]["X"] = json!(70);

    let (status, body) = send(app(), "POST", "/api/v1/rebalance/calculate", Some(input)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Target allocation must sum to 100%"));
}

#[tokio::test]
async fn calculate_rejects_too_many_steps() {
    let mut input = two_fund_input();
    input["growthInvestment"] = json!(1000000);
    input["stepAmount"] = json!(0.01);

    let (status, body) = send(app(), "POST", "/api/v1/rebalance/calculate", Some(input)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("optimizer steps"));
}

#[tokio::test]
async fn calculate_rejects_huge_assets() {
    let mut input = two_fund_input();
    input["assets"] = json!({ "A": 5e28, "B": 5e28 });

    let (status, body) = send(app(), "POST", "/api/v1/rebalance/calculate", Some(input)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("must not exceed"));
}

#[tokio::test]
async fn amount_expression_is_evaluated() {
    let (status, body) = send(
        app(),
        "POST",
        "/api/v1/rebalance/amounts/evaluate",
        Some(json!({ "expression": "10000*12" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"].as_f64(), Some(120000.0));

    let (status, body) = send(
        app(),
        "POST",
        "/api/v1/rebalance/amounts/evaluate",
        Some(json!({ "expression": "abc" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("unexpected character 'a'"));
}

#[tokio::test]
async fn fund_edits_round_trip() {
    let (status, added) = send(
        app(),
        "POST",
        "/api/v1/rebalance/funds",
        Some(json!({ "input": two_fund_input(), "name": "C" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(added["funds"], json!(["A", "B", "C"]));

    let (status, renamed) = send(
        app(),
        "PUT",
        "/api/v1/rebalance/funds",
        Some(json!({ "input": added, "oldName": "C", "newName": "Cash" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["funds"], json!(["A", "B", "Cash"]));

    let (status, removed) = send(
        app(),
        "POST",
        "/api/v1/rebalance/funds/remove",
        Some(json!({ "input": renamed, "name": "Cash" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed["funds"], json!(["A", "B"]));
}

#[tokio::test]
async fn removing_unknown_fund_is_not_found() {
    let (status, body) = send(
        app(),
        "POST",
        "/api/v1/rebalance/funds/remove",
        Some(json!({ "input": two_fund_input(), "name": "Z" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn country_constraints_are_conflicts() {
    let (status, _) = send(
        app(),
        "POST",
        "/api/v1/rebalance/countries/remove",
        Some(json!({ "input": two_fund_input(), "name": "X" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, added) = send(
        app(),
        "POST",
        "/api/v1/rebalance/countries",
        Some(json!({ "input": two_fund_input(), "name": "Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(added["countries"], json!(["X", "Y", "Z"]));
}
