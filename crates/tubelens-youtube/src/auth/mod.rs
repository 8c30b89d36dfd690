//! Credential lifecycle: code exchange, refresh, and supply of valid tokens.

pub mod clock;
pub mod exchange;
pub mod oauth;
pub mod refresh;
pub mod store;
pub mod supplier;

pub use clock::{Clock, FixedClock, SystemClock};
pub use exchange::{ExchangeOutcome, TokenExchanger};
pub use oauth::authorize_url;
pub use refresh::{RefreshOutcome, TokenRefresher};
pub use store::{CredentialStore, TokenRecord};
pub use supplier::{TokenSupplier, REFRESH_MARGIN_SECS};
