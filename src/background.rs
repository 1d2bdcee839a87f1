use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, info_span, Instrument};
use crate::state::AppState;

/// Rebuilds the spatial indexes from the entity store on a fixed cadence.
/// Searches between two refreshes serve the previous snapshot, so a new
/// venue or event becomes discoverable within one interval.
pub async fn start_index_refresher(state: Arc<AppState>) {
    info!(
        "Starting index refresher, interval {}s",
        state.config.index_refresh_secs
    );

    loop {
        async {
            match state.venue_index.refresh(state.venue_repo.as_ref()).await {
                Ok(count) => debug!("Venue index refreshed, {} entries", count),
                Err(e) => error!("Venue index refresh failed: {:?}", e),
            }
            match state.event_index.refresh(state.event_repo.as_ref()).await {
                Ok(count) => debug!("Event index refreshed, {} entries", count),
                Err(e) => error!("Event index refresh failed: {:?}", e),
            }
        }
        .instrument(info_span!("index_refresh"))
        .await;

        sleep(Duration::from_secs(state.config.index_refresh_secs)).await;
    }
}
