//! JSON API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState};
use lungnan_core::health::HealthSnapshot;
use lungnan_core::models::{
    CategoryRule, CustomCategory, ParsedTransaction, PeriodSummary, SummaryPeriod, TransactionKind,
};
use lungnan_core::parser::{infer_message_kind, parse_transactions};
use lungnan_core::CategoryRules;

/// Request body for parsing a message
#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub text: String,
    /// Resolve categories with this user's custom rules as well
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub message_kind: Option<TransactionKind>,
    pub transactions: Vec<ParsedTransaction>,
}

/// POST /api/parse - Parse a message without recording it
pub async fn parse_message(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ParseRequest>,
) -> Result<Json<ParseResponse>, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::bad_request("text cannot be empty"));
    }

    let transactions = match req.user_id.as_deref() {
        Some(user_id) => {
            let rules = state.db.merged_category_rules(user_id)?;
            parse_transactions(&req.text, Some(&rules))
        }
        None => parse_transactions(&req.text, None),
    };

    Ok(Json(ParseResponse {
        message_kind: infer_message_kind(&req.text),
        transactions,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// `today` (default) or `month`
    pub period: Option<String>,
}

/// GET /api/users/:user_id/summary - Totals for today or this month
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(params): Query<SummaryQuery>,
) -> Result<Json<PeriodSummary>, AppError> {
    let period = match params.period.as_deref() {
        Some(p) => p
            .parse::<SummaryPeriod>()
            .map_err(|e| AppError::bad_request(&e))?,
        None => SummaryPeriod::Today,
    };

    let summary = state
        .db
        .summary(&user_id, period, Local::now().date_naive())?;
    Ok(Json(summary))
}

/// GET /api/users/:user_id/health - This month's financial health
pub async fn get_health(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<HealthSnapshot>, AppError> {
    let health = state
        .db
        .financial_health(&user_id, Local::now().date_naive())?;
    Ok(Json(health))
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub custom: Vec<CustomCategory>,
    pub builtin: Vec<CategoryRule>,
}

/// GET /api/users/:user_id/categories - Custom and built-in category rules
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<CategoriesResponse>, AppError> {
    let custom = state.db.list_custom_categories(&user_id)?;
    let builtin = CategoryRules::builtin().iter().cloned().collect();
    Ok(Json(CategoriesResponse { custom, builtin }))
}
