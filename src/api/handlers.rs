use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::error::ApiError;
use crate::api::routes::AppState;
use crate::error::PortfolioError;
use crate::quote::parse_quote_date;
use crate::types::position::PositionRecord;
use crate::types::trade::Trade;

fn trade_payload(payload: Result<Json<Trade>, JsonRejection>) -> Result<Trade, ApiError> {
    payload
        .map(|Json(trade)| trade)
        .map_err(|rejection| PortfolioError::InvalidInput(rejection.body_text()).into())
}

pub async fn buy(
    State(state): State<AppState>,
    payload: Result<Json<Trade>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let outcome = state.service.submit_buy(trade_payload(payload)?).await?;
    Ok(Json(json!({
        "message": "Successfully added new stock position!",
        "trade_value": outcome.trade_value,
    })))
}

pub async fn sell(
    State(state): State<AppState>,
    payload: Result<Json<Trade>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let outcome = state.service.submit_sell(trade_payload(payload)?).await?;
    Ok(Json(json!({
        "message": "Successfully sold stock position!",
        "trade_value": outcome.trade_value,
    })))
}

pub async fn list_positions(
    State(state): State<AppState>,
) -> Result<Json<Vec<PositionRecord>>, ApiError> {
    Ok(Json(state.service.list_positions().await?))
}

#[derive(Debug, Deserialize)]
pub struct RefreshParams {
    /// Day the refresh runs as; defaults to the current UTC date.
    pub date: Option<String>,
}

pub async fn refresh_prices(
    State(state): State<AppState>,
    Query(params): Query<RefreshParams>,
) -> Result<Json<Value>, ApiError> {
    let current = Utc::now().date_naive();
    let today = match params.date {
        Some(raw) => parse_quote_date(&raw).ok_or_else(|| {
            PortfolioError::InvalidInput(format!("expecting date as YYYY-MM-DD, got {raw}"))
        })?,
        None => current,
    };
    if today > current {
        return Err(PortfolioError::InvalidInput(format!(
            "refresh date {today} is in the future"
        ))
        .into());
    }
    let refreshed = state.service.refresh_prices(today).await?;
    Ok(Json(json!({ "refreshed": refreshed })))
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
