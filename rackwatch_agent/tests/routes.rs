//! Endpoint tests over a real socket.

use rackwatch_agent::routes::{ALLOCATE_PATH, COOLING_PATH, FORECAST_PATH, STATUS_PATH};
use rackwatch_agent::types::{Allocation, CoolingPlan, Forecast, SystemStatus};
use rackwatch_agent::{build_router, AppState};
use serde_json::json;

async fn serve(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, build_router(state)).await;
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn health_and_status() {
    let base = serve(AppState::seeded(1)).await;
    let client = reqwest::Client::new();

    let health = client.get(format!("{base}/health")).send().await.unwrap();
    assert!(health.status().is_success());
    assert_eq!(health.text().await.unwrap(), "ok");

    let status: SystemStatus = client
        .get(format!("{base}{STATUS_PATH}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status.servers.len(), 4);
    assert_eq!(status.servers[2].status, "hibernating");
    assert_eq!(status.energy.renewable, 65.0);
    assert_eq!(status.cooling.level, "medium");
    assert!(!status.timestamp.is_empty());
}

#[tokio::test]
async fn forecast_then_allocate() {
    let base = serve(AppState::seeded(7)).await;
    let client = reqwest::Client::new();

    let forecast: Forecast = client
        .get(format!("{base}{FORECAST_PATH}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(forecast.forecasts.len(), 24);

    let allocation: Allocation = client
        .post(format!("{base}{ALLOCATE_PATH}"))
        .json(&forecast)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(allocation.decisions.len(), 4);
    let valid = ["activate", "migrate_workload", "hibernate", "maintain"];
    assert!(allocation.decisions.iter().all(|d| valid.contains(&d.action.as_str())));
}

#[tokio::test]
async fn cooling_accepts_partial_input() {
    let state = AppState::seeded(3);
    let base = serve(state.clone()).await;
    let client = reqwest::Client::new();

    let plan: CoolingPlan = client
        .post(format!("{base}{COOLING_PATH}"))
        .json(&json!({}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(plan.cooling_level, "medium");

    let plan: CoolingPlan = client
        .post(format!("{base}{COOLING_PATH}"))
        .json(&json!({"servers": [{"temperature": 20.0, "cpu": 10.0, "memory": 20.0}]}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(plan.cooling_level, "very_low");
    assert_eq!(plan.fan_speed_percent, 10);

    assert_eq!(state.requests.load(std::sync::atomic::Ordering::Relaxed), 2);
}

#[tokio::test]
async fn malformed_body_is_a_client_error() {
    let base = serve(AppState::seeded(3)).await;
    let resp = reqwest::Client::new()
        .post(format!("{base}{COOLING_PATH}"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
}
