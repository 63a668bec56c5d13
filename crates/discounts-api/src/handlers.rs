//! API request handlers for discount queries and form submissions

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use discounts_common::{Category, Discount, DiscountSummary, StoreError};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    ledger::Ledger,
    submission::{FormFields, MissingFields, Submission},
    AppState,
};

/// Body of every 500 response; causes are logged, never returned
pub const SERVER_ERROR_MESSAGE: &str =
    "There seems to be a problem with the server, please try again later!";

/// Body of a successful form submission
pub const SUBMISSION_ACCEPTED: &str = "Your information has been processed!";

/// API Error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(
        "Invalid query parameter: please put one of the following: {}.",
        Category::valid_values()
    )]
    InvalidFilter(String),

    #[error("Missing query parameter: {0}")]
    MissingParameter(&'static str),

    #[error(transparent)]
    MissingFields(#[from] MissingFields),

    #[error("No discount found with id: {0}")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidFilter(_)
            | ApiError::MissingParameter(_)
            | ApiError::MissingFields(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            ApiError::Storage(cause) => {
                error!("Storage failure: {}", cause);
                (status, SERVER_ERROR_MESSAGE).into_response()
            }
            other => {
                warn!("Rejected request: {}", other);
                (status, other.to_string()).into_response()
            }
        }
    }
}

/// Query string of `GET /alldiscounts`
#[derive(Debug, Deserialize)]
pub struct DiscountsQuery {
    #[serde(rename = "type")]
    pub category: Option<String>,
}

/// Query string of `GET /discount`
#[derive(Debug, Deserialize)]
pub struct DiscountQuery {
    pub id: Option<String>,
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "discounts-api"
    }))
}

/// List name, icon and id of every discount, optionally for one category
pub async fn list_discounts_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DiscountsQuery>,
) -> Result<Json<Vec<DiscountSummary>>, ApiError> {
    let filter = query
        .category
        .as_deref()
        .map(str::parse::<Category>)
        .transpose()
        .map_err(|e| ApiError::InvalidFilter(e.0))?;

    info!(
        "Listing discounts for {}",
        filter.map_or("all categories", |c| c.as_str())
    );

    let discounts = state.catalog.list(filter).await?;
    Ok(Json(discounts))
}

/// Full record of a single discount
pub async fn get_discount_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DiscountQuery>,
) -> Result<Json<Discount>, ApiError> {
    let id = query.id.ok_or(ApiError::MissingParameter("id"))?;
    info!("Getting discount: {}", id);

    match state.catalog.find(&id).await? {
        Some(discount) => Ok(Json(discount)),
        None => Err(ApiError::NotFound(id)),
    }
}

/// All FAQs, as published
pub async fn list_faqs_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Value>>, ApiError> {
    info!("Listing FAQs");

    let faqs = state.faqs.load().await?;
    Ok(Json(faqs))
}

/// Store customer feedback
pub async fn submit_feedback_handler(
    State(state): State<Arc<AppState>>,
    form: FormFields,
) -> Result<&'static str, ApiError> {
    info!("Receiving feedback submission");
    submit(&state.feedback, &form).await
}

/// Store a loyalty programme signup
pub async fn submit_loyal_user_handler(
    State(state): State<Arc<AppState>>,
    form: FormFields,
) -> Result<&'static str, ApiError> {
    info!("Receiving loyal user signup");
    submit(&state.loyal_users, &form).await
}

async fn submit<T: Submission>(
    ledger: &Ledger<T>,
    form: &FormFields,
) -> Result<&'static str, ApiError> {
    let record = T::from_form(form)?;
    let total = ledger.append(&record).await?;

    info!(
        "Stored submission in {} ({} total)",
        ledger.path().display(),
        total
    );
    Ok(SUBMISSION_ACCEPTED)
}
