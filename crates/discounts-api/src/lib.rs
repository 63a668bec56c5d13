//! Food Discounts API
//!
//! Serves the Pasadena/Glendale food discount catalog and stores the
//! feedback and loyalty forms submitted from the storefront.
//!
//! ## Architecture
//!
//! Everything lives on the filesystem under one data directory:
//! - a read-only catalog tree of per-establishment discount files
//! - a read-only FAQ file
//! - two append-only ledgers for form submissions
//!
//! ## Endpoints
//!
//! - `GET /alldiscounts?type={restaurants|cafes}` - List discount summaries
//! - `GET /discount?id=<id>` - Get a full discount record
//! - `GET /discountfaqs` - List FAQs
//! - `POST /discountfeedback` - Submit feedback (name, email, message)
//! - `POST /discountloyalusers` - Join the loyalty programme (name, email, phone)
//! - `GET /health` - Health check
//!
//! Any other path is served from the public directory, when one is configured.

pub mod catalog;
pub mod config;
pub mod faq;
pub mod handlers;
pub mod json_file;
pub mod ledger;
pub mod submission;

use axum::{
    routing::{get, post},
    Router,
};
use discounts_common::{Feedback, LoyalUser};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::catalog::CatalogStore;
use crate::config::{Config, FAQS_FILE, FEEDBACK_FILE, LOYAL_USERS_FILE};
use crate::faq::FaqStore;
use crate::ledger::Ledger;

/// Application state shared across handlers
pub struct AppState {
    pub catalog: CatalogStore,

    pub faqs: FaqStore,

    pub feedback: Ledger<Feedback>,

    pub loyal_users: Ledger<LoyalUser>,

    /// Static front-end served for unmatched routes
    pub public_dir: Option<PathBuf>,
}

impl AppState {
    /// State for a data directory laid out with the default file names
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            faqs: FaqStore::new(data_dir.join(FAQS_FILE)),
            feedback: Ledger::new(data_dir.join(FEEDBACK_FILE)),
            loyal_users: Ledger::new(data_dir.join(LOYAL_USERS_FILE)),
            catalog: CatalogStore::new(data_dir),
            public_dir: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let public_dir = config
            .public_dir
            .is_dir()
            .then(|| config.public_dir.clone());

        Self {
            catalog: CatalogStore::new(config.data_dir.clone()),
            faqs: FaqStore::new(config.faqs_path()),
            feedback: Ledger::new(config.feedback_path()),
            loyal_users: Ledger::new(config.loyal_users_path()),
            public_dir,
        }
    }

    pub fn with_public_dir(mut self, public_dir: PathBuf) -> Self {
        self.public_dir = Some(public_dir);
        self
    }
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let public_dir = state.public_dir.clone();
    let state = Arc::new(state);

    let mut router = Router::new()
        // Health check
        .route("/health", get(handlers::health_handler))
        // Catalog queries
        .route("/alldiscounts", get(handlers::list_discounts_handler))
        .route("/discount", get(handlers::get_discount_handler))
        .route("/discountfaqs", get(handlers::list_faqs_handler))
        // Form submissions
        .route("/discountfeedback", post(handlers::submit_feedback_handler))
        .route(
            "/discountloyalusers",
            post(handlers::submit_loyal_user_handler),
        );

    if let Some(public_dir) = public_dir {
        router = router.fallback_service(ServeDir::new(public_dir));
    }

    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
