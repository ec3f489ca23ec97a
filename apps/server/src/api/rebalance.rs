use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use rebalancer_core::inputs::CalculationInput;
use rebalancer_core::rebalance::RebalanceResult;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::task;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundRequest {
    pub input: CalculationInput,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameFundRequest {
    pub input: CalculationInput,
    pub old_name: String,
    pub new_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryRequest {
    pub input: CalculationInput,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountExpressionRequest {
    pub expression: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountResponse {
    pub amount: Decimal,
}

async fn get_template(State(state): State<Arc<AppState>>) -> Json<CalculationInput> {
    Json(state.rebalance_service.template())
}

async fn calculate(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CalculationInput>,
) -> ApiResult<Json<RebalanceResult>> {
    // Optimizer runs are CPU bound
    let service = state.rebalance_service.clone();
    let result = task::spawn_blocking(move || service.calculate(input))
        .await
        .map_err(|e| ApiError::Internal(format!("Calculation task failed: {}", e)))??;
    tracing::debug!(
        "Calculated {} proposal with error {}",
        result.strategy.as_str(),
        result.error
    );
    Ok(Json(result))
}

async fn evaluate_amount(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AmountExpressionRequest>,
) -> ApiResult<Json<AmountResponse>> {
    let amount = state.rebalance_service.evaluate_amount(&req.expression)?;
    Ok(Json(AmountResponse { amount }))
}

async fn add_fund(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FundRequest>,
) -> ApiResult<Json<CalculationInput>> {
    let input = state.rebalance_service.add_fund(req.input, &req.name)?;
    Ok(Json(input))
}

async fn rename_fund(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RenameFundRequest>,
) -> ApiResult<Json<CalculationInput>> {
    let input = state
        .rebalance_service
        .rename_fund(req.input, &req.old_name, &req.new_name)?;
    Ok(Json(input))
}

async fn remove_fund(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FundRequest>,
) -> ApiResult<Json<CalculationInput>> {
    let input = state.rebalance_service.remove_fund(req.input, &req.name)?;
    Ok(Json(input))
}

async fn add_country(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CountryRequest>,
) -> ApiResult<Json<CalculationInput>> {
    let input = state.rebalance_service.add_country(req.input, &req.name)?;
    Ok(Json(input))
}

async fn remove_country(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CountryRequest>,
) -> ApiResult<Json<CalculationInput>> {
    let input = state
        .rebalance_service
        .remove_country(req.input, &req.name)?;
    Ok(Json(input))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rebalance/template", get(get_template))
        .route("/rebalance/calculate", post(calculate))
        .route("/rebalance/amounts/evaluate", post(evaluate_amount))
        .route("/rebalance/funds", post(add_fund).put(rename_fund))
        .route("/rebalance/funds/remove", post(remove_fund))
        .route("/rebalance/countries", post(add_country))
        .route("/rebalance/countries/remove", post(remove_country))
}
