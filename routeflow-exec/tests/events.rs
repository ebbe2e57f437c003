use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use routeflow_core::{BridgeStatus, PreparedTransaction, Route, RouteKind, RouteStep, TxAction};
use routeflow_exec::api::{ApiError, StatusApi, StatusSnapshot};
use routeflow_exec::executor::{
    Account, CompositeEventSink, Event, EventSink, ExecutorConfig, ExecutorDeps, MetricsCollector,
    NoOpWindowOpener, PollConfig, StepExecutor, TxHandle, WalletError,
};

struct StubAccount {
    batching: bool,
    chain: Mutex<u64>,
    counter: AtomicUsize,
}

impl StubAccount {
    fn new(batching: bool) -> Self {
        Self {
            batching,
            chain: Mutex::new(1),
            counter: AtomicUsize::new(0),
        }
    }

    fn next_hash(&self) -> String {
        format!("0xhash{}", self.counter.fetch_add(1, Ordering::SeqCst))
    }
}

#[async_trait]
impl Account for StubAccount {
    fn address(&self) -> String {
        "0xwallet".to_string()
    }

    async fn active_chain(&self) -> Result<u64, WalletError> {
        Ok(*self.chain.lock().unwrap())
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError> {
        *self.chain.lock().unwrap() = chain_id;
        Ok(())
    }

    async fn send_transaction(&self, tx: &PreparedTransaction) -> Result<TxHandle, WalletError> {
        Ok(TxHandle {
            chain_id: tx.chain_id,
            tx_hash: self.next_hash(),
        })
    }

    fn supports_batching(&self) -> bool {
        self.batching
    }

    async fn send_batch(&self, txs: &[PreparedTransaction]) -> Result<TxHandle, WalletError> {
        Ok(TxHandle {
            chain_id: txs[0].chain_id,
            tx_hash: self.next_hash(),
        })
    }

    async fn wait_for_confirmation(
        &self,
        _chain_id: u64,
        _tx_hash: &str,
    ) -> Result<(), WalletError> {
        Ok(())
    }
}

struct CompletingStatusApi;

#[async_trait]
impl StatusApi for CompletingStatusApi {
    async fn transaction_status(
        &self,
        _chain_id: u64,
        _tx_hash: &str,
    ) -> Result<StatusSnapshot, ApiError> {
        Ok(StatusSnapshot {
            status: BridgeStatus::Completed,
            detail: serde_json::json!({}),
        })
    }

    async fn onramp_status(&self, _session_id: &str) -> Result<StatusSnapshot, ApiError> {
        unimplemented!("no onramp leg in these tests")
    }
}

/// Records the type tag of every event it sees, in order.
struct CollectingSink {
    tags: Mutex<Vec<&'static str>>,
}

impl CollectingSink {
    fn new() -> Self {
        Self {
            tags: Mutex::new(Vec::new()),
        }
    }

    fn tags(&self) -> Vec<&'static str> {
        self.tags.lock().unwrap().clone()
    }
}

fn tag(event: &Event) -> &'static str {
    match event {
        Event::RunStarted { .. } => "run.started",
        Event::OnrampOpened { .. } => "onramp.opened",
        Event::OnrampCompleted { .. } => "onramp.completed",
        Event::OnrampFailed { .. } => "onramp.failed",
        Event::ChainSwitched { .. } => "chain.switched",
        Event::TransactionSubmitted { .. } => "tx.submitted",
        Event::BatchSubmitted { .. } => "batch.submitted",
        Event::TransactionCompleted { .. } => "tx.completed",
        Event::RunCompleted { .. } => "run.completed",
        Event::RunFailed { .. } => "run.failed",
        Event::RunCancelled { .. } => "run.cancelled",
    }
}

#[async_trait]
impl EventSink for CollectingSink {
    async fn emit(&self, event: Event) {
        self.tags.lock().unwrap().push(tag(&event));
    }
}

struct SharedSink(Arc<CollectingSink>);

#[async_trait]
impl EventSink for SharedSink {
    async fn emit(&self, event: Event) {
        self.0.emit(event).await;
    }
}

fn tx(chain_id: u64) -> PreparedTransaction {
    PreparedTransaction {
        chain_id,
        to: "0x000000000000000000000000000000000000dead".to_string(),
        data: "0x01".to_string(),
        value: "0x0".to_string(),
        action: TxAction::Other,
    }
}

fn route(chains: &[u64]) -> Route {
    Route {
        kind: RouteKind::Buy,
        steps: vec![RouteStep {
            transactions: chains.iter().copied().map(tx).collect(),
        }],
        onramp: None,
    }
}

fn fast_config() -> ExecutorConfig {
    ExecutorConfig {
        poll: PollConfig {
            interval: Duration::from_millis(2),
            ..PollConfig::default()
        },
        settle_delay: Duration::from_millis(1),
        auto_start_delay: Duration::from_millis(1),
    }
}

fn executor(r: Route, batching: bool, events: Arc<dyn EventSink>) -> StepExecutor {
    StepExecutor::with_route(
        r,
        fast_config(),
        ExecutorDeps {
            account: Some(Arc::new(StubAccount::new(batching))),
            status: Arc::new(CompletingStatusApi),
            window: Arc::new(NoOpWindowOpener),
            events,
        },
    )
}

#[tokio::test]
async fn a_run_emits_events_in_lifecycle_order() {
    let sink = Arc::new(CollectingSink::new());
    let exec = executor(route(&[1]), false, sink.clone());

    exec.start().await.expect("run succeeds");
    assert_eq!(
        sink.tags(),
        vec!["run.started", "tx.submitted", "tx.completed", "run.completed"]
    );
}

#[tokio::test]
async fn a_chain_switch_is_reported_before_the_submission() {
    let sink = Arc::new(CollectingSink::new());
    let exec = executor(route(&[10]), false, sink.clone());

    exec.start().await.expect("run succeeds");
    assert_eq!(
        sink.tags(),
        vec![
            "run.started",
            "chain.switched",
            "tx.submitted",
            "tx.completed",
            "run.completed"
        ]
    );
}

#[tokio::test]
async fn composite_sink_fans_out_to_every_member() {
    let first = Arc::new(CollectingSink::new());
    let second = Arc::new(CollectingSink::new());
    let mut composite = CompositeEventSink::new();
    composite.add(Box::new(SharedSink(first.clone())));
    composite.add(Box::new(SharedSink(second.clone())));

    let exec = executor(route(&[1]), false, Arc::new(composite));
    exec.start().await.expect("run succeeds");

    assert_eq!(first.tags(), second.tags());
    assert_eq!(first.tags().first(), Some(&"run.started"));
    assert_eq!(first.tags().last(), Some(&"run.completed"));
}

#[tokio::test]
async fn metrics_collector_counts_a_batched_run() {
    let metrics = Arc::new(MetricsCollector::new());
    let exec = executor(route(&[1, 1, 10]), true, metrics.clone());

    exec.start().await.expect("run succeeds");
    let m = metrics.current().await;
    assert_eq!(m.batches_submitted, 1);
    assert_eq!(m.txs_submitted, 3);
    assert_eq!(m.txs_completed, 3);
    assert_eq!(m.chain_switches, 1);
    assert_eq!(m.runs_completed, 1);
    assert_eq!(m.runs_failed, 0);
    assert!(m.total_duration.is_some());
}

#[tokio::test]
async fn a_failed_run_counts_once_and_still_closes_the_timer() {
    struct FailingStatusApi;

    #[async_trait]
    impl StatusApi for FailingStatusApi {
        async fn transaction_status(
            &self,
            _chain_id: u64,
            _tx_hash: &str,
        ) -> Result<StatusSnapshot, ApiError> {
            Ok(StatusSnapshot {
                status: BridgeStatus::Failed,
                detail: serde_json::json!({}),
            })
        }

        async fn onramp_status(&self, _session_id: &str) -> Result<StatusSnapshot, ApiError> {
            unimplemented!("no onramp leg in these tests")
        }
    }

    let metrics = Arc::new(MetricsCollector::new());
    let exec = StepExecutor::with_route(
        route(&[1]),
        fast_config(),
        ExecutorDeps {
            account: Some(Arc::new(StubAccount::new(false))),
            status: Arc::new(FailingStatusApi),
            window: Arc::new(NoOpWindowOpener),
            events: metrics.clone(),
        },
    );

    exec.start().await.unwrap_err();
    let m = metrics.current().await;
    assert_eq!(m.runs_failed, 1);
    assert_eq!(m.runs_completed, 0);
    assert_eq!(m.txs_submitted, 1);
    assert_eq!(m.txs_completed, 0);
    assert!(m.total_duration.is_some());
}
