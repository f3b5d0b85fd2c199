use std::sync::Arc;
use std::time::Duration;

use dashboard_logging::{rag_debug, rag_info, rag_warn};
use tokio::runtime::Handle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, EventSink, RagApi};

pub const DEFAULT_STATS_INTERVAL: Duration = Duration::from_secs(30);
const MIN_STATS_INTERVAL: Duration = Duration::from_millis(10);

/// Recurring index-stats fetch. Fires once immediately, then every `interval`.
///
/// Failures are logged and forwarded like successes; they never stop the loop.
/// Dropping the poller cancels it.
pub struct StatsPoller {
    cancel: CancellationToken,
}

impl StatsPoller {
    pub fn spawn(
        runtime: &Handle,
        api: Arc<dyn RagApi>,
        interval: Duration,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let interval = interval.max(MIN_STATS_INTERVAL);
        rag_info!("Stats poller started (every {:?})", interval);
        runtime.spawn(run(api, interval, sink, cancel.clone()));
        Self { cancel }
    }
}

impl Drop for StatsPoller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run(
    api: Arc<dyn RagApi>,
    interval: Duration,
    sink: Arc<dyn EventSink>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            result = api.index_stats() => result,
        };
        match &result {
            Ok(stats) => rag_debug!("Index stats: {} documents", stats.total_documents),
            Err(err) => rag_warn!("Stats refresh failed: {}", err),
        }
        sink.emit(EngineEvent::StatsFetched(result));
    }

    rag_info!("Stats poller stopped");
}
