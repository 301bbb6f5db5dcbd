use crate::db::{HandStore, ScanOrder, StoreError};
use crate::domain::TimeWindow;
use crate::engine::{build_report, AggregationSettings, Report};
use std::sync::Arc;
use tracing::info;

/// Loads stored hands and aggregates them into a report.
#[derive(Clone)]
pub struct Reporter {
    store: Arc<dyn HandStore>,
}

impl Reporter {
    pub fn new(store: Arc<dyn HandStore>) -> Self {
        Self { store }
    }

    /// Scan hands oldest first within `window` and build the report.
    ///
    /// An empty window is not an error; the report is zero-valued.
    pub async fn build(
        &self,
        window: Option<&TimeWindow>,
        settings: &AggregationSettings,
    ) -> Result<Report, StoreError> {
        let hands = self.store.scan_hands(ScanOrder::OldestFirst, window).await?;
        info!(hands = hands.len(), interval = settings.interval, "aggregating report");
        Ok(build_report(&hands, settings))
    }
}
