//! OAuth credential lifecycle, Data API fetchers, and the analytics
//! aggregator for a creator's own channel.

pub mod analytics;
pub mod auth;
pub mod client;
pub mod dashboard;
pub mod error;
pub mod normalize;
pub mod types;
pub mod videos;

pub use analytics::{ensure_available, ReportQuery};
pub use auth::{
    authorize_url, Clock, CredentialStore, ExchangeOutcome, FixedClock, RefreshOutcome,
    SystemClock, TokenExchanger, TokenRecord, TokenRefresher, TokenSupplier,
};
pub use client::YoutubeClient;
pub use dashboard::{load_dashboard, Dashboard, DisplaySummary};
pub use error::{FetchStage, YoutubeError};
