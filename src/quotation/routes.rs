//! HTTP handlers for the quotation API.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::error::Result;
use crate::AppState;

use super::defaults::build_default_quote_input;
use super::input::QuoteInput;
use super::responses::{
    CalculateQuoteResponse, NextQuoteNumberResponse, QuoteListItemResponse, QuoteRecordResponse,
};
use super::services;
use super::settings::PricingSettings;

/// Routes mounted under `/api/operations`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pricing-settings", get(pricing_settings))
        .route("/quotes", get(list_quotes).post(create_quote))
        .route("/quotes/default", get(default_quote))
        .route("/quotes/calculate", post(calculate_quote))
        .route("/quotes/next-number", post(next_quote_number))
        .route("/quotes/by-number/:quote_number", get(get_quote_by_number))
        .route("/quotes/:id", get(get_quote).put(update_quote))
}

/// Blank quote seeded with the configured pricing settings
async fn default_quote(State(state): State<AppState>) -> Json<QuoteInput> {
    let mut input = build_default_quote_input();
    input.pricing_settings = Some(state.pricing.as_ref().clone().into());
    Json(input)
}

async fn pricing_settings(State(state): State<AppState>) -> Json<PricingSettings> {
    Json(state.pricing.as_ref().clone())
}

/// Price a quote without saving it
async fn calculate_quote(
    State(state): State<AppState>,
    payload: std::result::Result<Json<QuoteInput>, JsonRejection>,
) -> Result<Json<CalculateQuoteResponse>> {
    let Json(input) = payload?;
    let (input, computed) = services::price_quote(input, &state.pricing)?;
    Ok(Json(CalculateQuoteResponse { input, computed }))
}

async fn list_quotes(State(state): State<AppState>) -> Result<Json<Vec<QuoteListItemResponse>>> {
    let quotes = services::list_quotes(&state.db).await?;
    Ok(Json(quotes.iter().map(|q| q.to_list_item()).collect()))
}

async fn create_quote(
    State(state): State<AppState>,
    payload: std::result::Result<Json<QuoteInput>, JsonRejection>,
) -> Result<(StatusCode, Json<QuoteRecordResponse>)> {
    let Json(input) = payload?;
    let record = services::create_quote(&state.db, &state.cache, &state.pricing, input).await?;
    Ok((StatusCode::CREATED, Json(record.to_response())))
}

async fn get_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuoteRecordResponse>> {
    let record = services::get_quote(&state.db, &state.cache, id).await?;
    Ok(Json(record.to_response()))
}

async fn get_quote_by_number(
    State(state): State<AppState>,
    Path(quote_number): Path<String>,
) -> Result<Json<QuoteRecordResponse>> {
    let record = services::get_quote_by_number(&state.db, &quote_number).await?;
    Ok(Json(record.to_response()))
}

async fn update_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: std::result::Result<Json<QuoteInput>, JsonRejection>,
) -> Result<Json<QuoteRecordResponse>> {
    let Json(input) = payload?;
    let record =
        services::update_quote(&state.db, &state.cache, &state.pricing, id, input).await?;
    Ok(Json(record.to_response()))
}

async fn next_quote_number(State(state): State<AppState>) -> Result<Json<NextQuoteNumberResponse>> {
    let quote_number = services::reserve_quote_number(&state.db).await?;
    Ok(Json(NextQuoteNumberResponse { quote_number }))
}
