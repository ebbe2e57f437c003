use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::executor::{Event, EventSink};

#[derive(Debug, Clone, Default)]
pub struct RunMetrics {
    pub run_id: Option<Uuid>,
    pub started_at: Option<Instant>,
    pub finished_at: Option<Instant>,
    pub total_duration: Option<Duration>,
    pub txs_submitted: usize,
    pub txs_completed: usize,
    pub batches_submitted: usize,
    pub chain_switches: usize,
    pub onramps_opened: usize,
    pub onramps_completed: usize,
    pub runs_completed: usize,
    pub runs_failed: usize,
    pub runs_cancelled: usize,
}

impl RunMetrics {
    fn finish(&mut self) {
        self.finished_at = Some(Instant::now());
        if let (Some(start), Some(end)) = (self.started_at, self.finished_at) {
            self.total_duration = Some(end.duration_since(start));
        }
    }
}

/// Event sink that folds the run's event stream into counters a host can
/// scrape after the fact.
pub struct MetricsCollector {
    metrics: Arc<Mutex<RunMetrics>>,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            metrics: Arc::new(Mutex::new(RunMetrics::default())),
        }
    }

    pub async fn current(&self) -> RunMetrics {
        self.metrics.lock().await.clone()
    }
}

#[async_trait]
impl EventSink for MetricsCollector {
    async fn emit(&self, event: Event) {
        let mut m = self.metrics.lock().await;
        match event {
            Event::RunStarted { run_id, .. } => {
                m.run_id = Some(run_id);
                m.started_at = Some(Instant::now());
                m.finished_at = None;
                m.total_duration = None;
            }
            Event::OnrampOpened { .. } => m.onramps_opened += 1,
            Event::OnrampCompleted { .. } => m.onramps_completed += 1,
            Event::OnrampFailed { .. } => {}
            Event::ChainSwitched { .. } => m.chain_switches += 1,
            Event::TransactionSubmitted { .. } => m.txs_submitted += 1,
            Event::BatchSubmitted { ref indices, .. } => {
                m.batches_submitted += 1;
                m.txs_submitted += indices.len();
            }
            Event::TransactionCompleted { .. } => m.txs_completed += 1,
            Event::RunCompleted { .. } => {
                m.runs_completed += 1;
                m.finish();
            }
            Event::RunFailed { .. } => {
                m.runs_failed += 1;
                m.finish();
            }
            Event::RunCancelled { .. } => {
                m.runs_cancelled += 1;
                m.finish();
            }
        }
    }
}
