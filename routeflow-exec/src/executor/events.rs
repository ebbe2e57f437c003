use async_trait::async_trait;
use routeflow_core::RouteKind;
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub enum Event {
    RunStarted {
        run_id: Uuid,
        route_kind: RouteKind,
    },
    OnrampOpened {
        run_id: Uuid,
        session_id: String,
    },
    OnrampCompleted {
        run_id: Uuid,
        session_id: String,
    },
    OnrampFailed {
        run_id: Uuid,
        session_id: String,
    },
    ChainSwitched {
        run_id: Uuid,
        chain_id: u64,
    },
    TransactionSubmitted {
        run_id: Uuid,
        index: usize,
        chain_id: u64,
        tx_hash: String,
    },
    BatchSubmitted {
        run_id: Uuid,
        indices: Vec<usize>,
        chain_id: u64,
        tx_hash: String,
    },
    TransactionCompleted {
        run_id: Uuid,
        index: usize,
    },
    RunCompleted {
        run_id: Uuid,
        completed: usize,
    },
    RunFailed {
        run_id: Uuid,
        message: String,
    },
    RunCancelled {
        run_id: Uuid,
    },
}

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: Event);
}

pub struct CompositeEventSink {
    sinks: Vec<Box<dyn EventSink>>,
}

impl Default for CompositeEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositeEventSink {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn add(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }
}

#[async_trait]
impl EventSink for CompositeEventSink {
    async fn emit(&self, event: Event) {
        for sink in &self.sinks {
            let event_clone = event.clone();
            sink.emit(event_clone).await;
        }
    }
}

pub struct StdoutEventSink;

#[async_trait]
impl EventSink for StdoutEventSink {
    async fn emit(&self, event: Event) {
        let json = match event {
            Event::RunStarted { run_id, route_kind } => {
                json!({ "type": "run.started", "run_id": run_id.to_string(), "route_kind": route_kind.as_str() })
            }
            Event::OnrampOpened { run_id, session_id } => {
                json!({ "type": "onramp.opened", "run_id": run_id.to_string(), "session_id": session_id })
            }
            Event::OnrampCompleted { run_id, session_id } => {
                json!({ "type": "onramp.completed", "run_id": run_id.to_string(), "session_id": session_id })
            }
            Event::OnrampFailed { run_id, session_id } => {
                json!({ "type": "onramp.failed", "run_id": run_id.to_string(), "session_id": session_id })
            }
            Event::ChainSwitched { run_id, chain_id } => {
                json!({ "type": "chain.switched", "run_id": run_id.to_string(), "chain_id": chain_id })
            }
            Event::TransactionSubmitted { run_id, index, chain_id, tx_hash } => {
                json!({ "type": "tx.submitted", "run_id": run_id.to_string(), "index": index, "chain_id": chain_id, "tx_hash": tx_hash })
            }
            Event::BatchSubmitted { run_id, indices, chain_id, tx_hash } => {
                json!({ "type": "batch.submitted", "run_id": run_id.to_string(), "indices": indices, "chain_id": chain_id, "tx_hash": tx_hash })
            }
            Event::TransactionCompleted { run_id, index } => {
                json!({ "type": "tx.completed", "run_id": run_id.to_string(), "index": index })
            }
            Event::RunCompleted { run_id, completed } => {
                json!({ "type": "run.completed", "run_id": run_id.to_string(), "completed": completed })
            }
            Event::RunFailed { run_id, message } => {
                json!({ "type": "run.failed", "run_id": run_id.to_string(), "message": message })
            }
            Event::RunCancelled { run_id } => {
                json!({ "type": "run.cancelled", "run_id": run_id.to_string() })
            }
        };
        println!("{}", serde_json::to_string(&json).unwrap_or_default());
    }
}

pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: Event) {}
}
