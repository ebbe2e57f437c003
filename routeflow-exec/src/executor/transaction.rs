use routeflow_core::{CompletedStatus, FlatTx, RouteKind};
use uuid::Uuid;

use crate::api::{StatusApi, StatusSnapshot};
use crate::executor::cancel::CancelToken;
use crate::executor::events::{Event, EventSink};
use crate::executor::poller::{poll_until, PollError};
use crate::executor::result::ExecError;
use crate::executor::types::ExecutorConfig;
use crate::executor::wallet::{Account, TxHandle};

/// Drives one transaction (or one batch) to a terminal state.
pub(crate) struct TxWorker<'a> {
    pub(crate) run_id: Uuid,
    pub(crate) account: &'a dyn Account,
    pub(crate) status: &'a dyn StatusApi,
    pub(crate) events: &'a dyn EventSink,
    pub(crate) config: &'a ExecutorConfig,
}

impl TxWorker<'_> {
    /// Submits a single transaction and waits for its terminal state.
    ///
    /// Approval and fee legs have no bridge-level status: they wait for
    /// on-chain confirmation plus a settle delay instead of polling, and
    /// contribute no completed-status record.
    pub(crate) async fn execute_single(
        &self,
        flat: &FlatTx,
        kind: RouteKind,
        cancel: &CancelToken,
    ) -> Result<Option<CompletedStatus>, ExecError> {
        let handle = self.account.send_transaction(&flat.tx).await?;
        self.events
            .emit(Event::TransactionSubmitted {
                run_id: self.run_id,
                index: flat.index,
                chain_id: handle.chain_id,
                tx_hash: handle.tx_hash.clone(),
            })
            .await;

        let completed = if flat.tx.action.is_chain_only() {
            self.account
                .wait_for_confirmation(handle.chain_id, &handle.tx_hash)
                .await?;
            self.settle(cancel).await?;
            None
        } else {
            let snap = self.poll_terminal(&handle, cancel).await?;
            Some(self.completed_or_fail(kind, &handle, snap)?)
        };

        self.events
            .emit(Event::TransactionCompleted {
                run_id: self.run_id,
                index: flat.index,
            })
            .await;
        Ok(completed)
    }

    /// Submits consecutive same-chain transactions as one wallet call and
    /// polls the returned hash as representative of the whole batch.
    pub(crate) async fn execute_batch(
        &self,
        batch: &[FlatTx],
        kind: RouteKind,
        cancel: &CancelToken,
    ) -> Result<Option<CompletedStatus>, ExecError> {
        if batch.is_empty() {
            return Err(ExecError::EmptyBatch);
        }
        if !self.account.supports_batching() {
            return Err(ExecError::BatchUnsupported);
        }
        let chain_id = batch[0].tx.chain_id;
        if batch.iter().any(|f| f.tx.chain_id != chain_id) {
            return Err(ExecError::MixedChainBatch);
        }

        let txs: Vec<_> = batch.iter().map(|f| f.tx.clone()).collect();
        let handle = self.account.send_batch(&txs).await?;
        self.events
            .emit(Event::BatchSubmitted {
                run_id: self.run_id,
                indices: batch.iter().map(|f| f.index).collect(),
                chain_id: handle.chain_id,
                tx_hash: handle.tx_hash.clone(),
            })
            .await;

        let completed = if batch.iter().all(|f| f.tx.action.is_chain_only()) {
            self.account
                .wait_for_confirmation(handle.chain_id, &handle.tx_hash)
                .await?;
            self.settle(cancel).await?;
            None
        } else {
            let snap = self.poll_terminal(&handle, cancel).await?;
            Some(self.completed_or_fail(kind, &handle, snap)?)
        };

        for flat in batch {
            self.events
                .emit(Event::TransactionCompleted {
                    run_id: self.run_id,
                    index: flat.index,
                })
                .await;
        }
        Ok(completed)
    }

    async fn poll_terminal(
        &self,
        handle: &TxHandle,
        cancel: &CancelToken,
    ) -> Result<StatusSnapshot, ExecError> {
        let result = poll_until(&self.config.poll, cancel, || async {
            let snap = self
                .status
                .transaction_status(handle.chain_id, &handle.tx_hash)
                .await?;
            Ok(snap.status.is_terminal().then_some(snap))
        })
        .await;
        match result {
            Ok(snap) => Ok(snap),
            Err(PollError::Aborted) => Err(ExecError::Aborted),
            Err(PollError::Task(e)) => Err(ExecError::Api(e)),
        }
    }

    fn completed_or_fail(
        &self,
        kind: RouteKind,
        handle: &TxHandle,
        snap: StatusSnapshot,
    ) -> Result<CompletedStatus, ExecError> {
        match snap.status {
            routeflow_core::BridgeStatus::Completed => Ok(CompletedStatus::for_transaction(
                kind,
                handle.chain_id,
                handle.tx_hash.clone(),
                snap.detail,
            )),
            _ => Err(ExecError::PaymentFailed {
                chain_id: handle.chain_id,
                tx_hash: handle.tx_hash.clone(),
            }),
        }
    }

    /// Cancellable settle pause after chain-only confirmations.
    async fn settle(&self, cancel: &CancelToken) -> Result<(), ExecError> {
        tokio::select! {
            _ = tokio::time::sleep(self.config.settle_delay) => Ok(()),
            _ = cancel.cancelled() => Err(ExecError::Aborted),
        }
    }
}
