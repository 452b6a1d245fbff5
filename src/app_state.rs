use std::sync::Arc;

use crate::db::{EventLedger, HistoryStore, ProfileStore};
use crate::kafka::HrEventPublisher;

/// Shared state handed to every HTTP handler.
///
/// Stores are trait objects so handlers stay testable without a database.
pub struct AppState {
    pub ledger: Arc<dyn EventLedger>,
    pub profiles: Arc<dyn ProfileStore>,
    pub history: Arc<dyn HistoryStore>,
    pub publisher: Arc<HrEventPublisher>,
}
