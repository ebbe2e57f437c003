use std::sync::{Arc, Mutex, MutexGuard};

use routeflow_core::{
    batch_window, flatten_route, percent_complete, CompletedStatus, FlatTx, OnrampLeg,
    OnrampStatus, Route, RouteKind,
};
use uuid::Uuid;

use crate::api::StatusApi;
use crate::executor::cancel::CancelToken;
use crate::executor::events::{Event, EventSink};
use crate::executor::onramp::OnrampWorker;
use crate::executor::result::{ExecError, RunOutcome};
use crate::executor::state::{ExecutionPhase, RunState, StateSnapshot};
use crate::executor::transaction::TxWorker;
use crate::executor::types::ExecutorConfig;
use crate::executor::wallet::Account;
use crate::executor::window::WindowOpener;

pub struct ExecutorDeps {
    /// The connected account, when the host has one.
    pub account: Option<Arc<dyn Account>>,
    pub status: Arc<dyn StatusApi>,
    pub window: Arc<dyn WindowOpener>,
    pub events: Arc<dyn EventSink>,
}

#[derive(Clone)]
struct PlannedRoute {
    kind: RouteKind,
    onramp: Option<OnrampLeg>,
    txs: Arc<Vec<FlatTx>>,
}

/// Sequences a prepared route to completion: onramp leg first, then the
/// flattened transactions in order, batching consecutive same-chain legs
/// when the account can.
///
/// At most one run executes at a time; `cancel` and the read surface may be
/// called from other tasks while a run is in flight.
pub struct StepExecutor {
    run_id: Uuid,
    config: ExecutorConfig,
    deps: ExecutorDeps,
    route: Mutex<Option<PlannedRoute>>,
    state: Mutex<RunState>,
    cancel: Mutex<CancelToken>,
    statuses: Mutex<Vec<CompletedStatus>>,
}

// Lock poisoning carries no meaning here: state mutations are plain field
// writes that cannot be observed half-done. Recover the guard.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

impl StepExecutor {
    /// Executor waiting for a quote; reports the `fetching` phase until
    /// [`StepExecutor::set_route`] delivers one.
    pub fn new(config: ExecutorConfig, deps: ExecutorDeps) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            config,
            deps,
            route: Mutex::new(None),
            state: Mutex::new(RunState::new()),
            cancel: Mutex::new(CancelToken::new()),
            statuses: Mutex::new(Vec::new()),
        }
    }

    pub fn with_route(route: Route, config: ExecutorConfig, deps: ExecutorDeps) -> Self {
        let exec = Self::new(config, deps);
        exec.set_route(route);
        exec
    }

    /// Installs a freshly fetched route, flattening its steps once. Any
    /// bookkeeping from a previous route is discarded.
    pub fn set_route(&self, route: Route) {
        let planned = PlannedRoute {
            kind: route.kind,
            onramp: route.onramp.clone(),
            txs: Arc::new(flatten_route(&route)),
        };
        let has_onramp = planned.onramp.is_some();
        *lock(&self.route) = Some(planned);
        lock(&self.state).route_ready(has_onramp);
        lock(&self.statuses).clear();
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Begins a run. No-op (`AlreadyRunning`) while another run executes;
    /// fails with `NoRoute` before a quote has arrived. A fresh run starts
    /// at transaction 0; after a failure it resumes at the failed index.
    pub async fn start(&self) -> Result<RunOutcome, ExecError> {
        self.run_with(None).await
    }

    /// Deferred first start: reports `auto-starting` for the configured
    /// delay, then runs. Cancellable during the wait.
    pub async fn auto_start(&self) -> Result<RunOutcome, ExecError> {
        if lock(&self.route).is_none() {
            return Err(ExecError::NoRoute);
        }
        let gen = match lock(&self.state).begin_auto_start() {
            Some(gen) => gen,
            None => return Ok(RunOutcome::AlreadyRunning),
        };
        let token = self.fresh_token();
        tokio::select! {
            _ = tokio::time::sleep(self.config.auto_start_delay) => {}
            _ = token.cancelled() => {
                lock(&self.state).cancel_run(gen);
                self.deps.events.emit(Event::RunCancelled { run_id: self.run_id }).await;
                return Ok(RunOutcome::Cancelled);
            }
        }
        self.run_with(Some(token)).await
    }

    /// Signals the active run's cancellation token. The run observes the
    /// token at its next poll or wait boundary and transitions itself back
    /// to `idle`; forcing the phase from here would reopen the run slot
    /// while the cancelled run is still unwinding an in-flight call. An
    /// onramp leg caught mid-flight rolls back to `pending` so a later run
    /// can resume it without a second payment page.
    pub fn cancel(&self) {
        lock(&self.cancel).cancel();
    }

    /// Re-runs after a failure, resuming from the failed transaction index.
    /// Completed indices are never re-submitted.
    pub async fn retry(&self) -> Result<RunOutcome, ExecError> {
        {
            let mut st = lock(&self.state);
            if st.phase == ExecutionPhase::Executing {
                return Ok(RunOutcome::AlreadyRunning);
            }
            if st.error.is_none() {
                return Err(ExecError::NothingToRetry);
            }
            st.clear_error();
            st.reset_failed_onramp();
        }
        self.start().await
    }

    /// Whole-run progress in percent, onramp leg included.
    pub fn progress(&self) -> u8 {
        let (total, has_onramp) = match lock(&self.route).as_ref() {
            Some(p) => (p.txs.len(), p.onramp.is_some()),
            None => (0, false),
        };
        let st = lock(&self.state);
        percent_complete(
            st.completed.len(),
            total,
            has_onramp,
            st.onramp == Some(OnrampStatus::Completed),
        )
    }

    /// Step position of the transaction currently executing, if any.
    pub fn current_step(&self) -> Option<usize> {
        let current = lock(&self.state).current_tx?;
        lock(&self.route)
            .as_ref()
            .and_then(|p| p.txs.get(current))
            .map(|f| f.step_index)
    }

    pub fn snapshot(&self) -> StateSnapshot {
        lock(&self.state).snapshot()
    }

    fn fresh_token(&self) -> CancelToken {
        let token = CancelToken::new();
        *lock(&self.cancel) = token.clone();
        token
    }

    /// `token` is `Some` only when the caller already holds the run slot
    /// (auto-start). Otherwise a fresh token is installed after admission,
    /// so a rejected `start()` never disturbs the in-flight run's token.
    async fn run_with(&self, token: Option<CancelToken>) -> Result<RunOutcome, ExecError> {
        let planned = match lock(&self.route).as_ref() {
            Some(p) => p.clone(),
            None => return Err(ExecError::NoRoute),
        };
        let (fresh, gen) = {
            let mut st = lock(&self.state);
            let fresh = st.current_tx.is_none();
            let gen = match st.try_begin() {
                Some(gen) => gen,
                None => return Ok(RunOutcome::AlreadyRunning),
            };
            if fresh {
                st.completed.clear();
            }
            (fresh, gen)
        };
        if fresh {
            lock(&self.statuses).clear();
        }
        let token = match token {
            Some(token) => token,
            None => self.fresh_token(),
        };
        self.deps
            .events
            .emit(Event::RunStarted {
                run_id: self.run_id,
                route_kind: planned.kind,
            })
            .await;

        match self.execute(&planned, &token).await {
            Ok(()) => {
                lock(&self.state).finish_run(gen);
                let statuses: Vec<CompletedStatus> = lock(&self.statuses).drain(..).collect();
                self.deps
                    .events
                    .emit(Event::RunCompleted {
                        run_id: self.run_id,
                        completed: statuses.len(),
                    })
                    .await;
                Ok(RunOutcome::Completed(statuses))
            }
            Err(ExecError::Aborted) => {
                lock(&self.state).cancel_run(gen);
                self.deps
                    .events
                    .emit(Event::RunCancelled {
                        run_id: self.run_id,
                    })
                    .await;
                Ok(RunOutcome::Cancelled)
            }
            Err(err) => {
                lock(&self.state).fail_run(gen, err.clone());
                self.deps
                    .events
                    .emit(Event::RunFailed {
                        run_id: self.run_id,
                        message: err.to_string(),
                    })
                    .await;
                Err(err)
            }
        }
    }

    async fn execute(&self, planned: &PlannedRoute, token: &CancelToken) -> Result<(), ExecError> {
        if planned.kind == RouteKind::Onramp {
            if let Some(leg) = &planned.onramp {
                self.execute_onramp(leg, token).await?;
            }
        }

        let account = self
            .deps
            .account
            .clone()
            .ok_or(ExecError::WalletNotConnected)?;

        let txs = planned.txs.as_ref();
        let mut i = lock(&self.state).current_tx.unwrap_or(0);
        while i < txs.len() {
            if token.is_cancelled() {
                return Err(ExecError::Aborted);
            }
            lock(&self.state).set_current(i);
            let flat = &txs[i];

            let active = account.active_chain().await?;
            if active != flat.tx.chain_id {
                account.switch_chain(flat.tx.chain_id).await?;
                self.deps
                    .events
                    .emit(Event::ChainSwitched {
                        run_id: self.run_id,
                        chain_id: flat.tx.chain_id,
                    })
                    .await;
            }

            let worker = TxWorker {
                run_id: self.run_id,
                account: account.as_ref(),
                status: self.deps.status.as_ref(),
                events: self.deps.events.as_ref(),
                config: &self.config,
            };
            let end = batch_window(txs, i, account.supports_batching());
            if end - i > 1 {
                if let Some(status) = worker.execute_batch(&txs[i..end], planned.kind, token).await?
                {
                    lock(&self.statuses).push(status);
                }
                let mut st = lock(&self.state);
                for j in i..end {
                    st.mark_completed(j);
                }
                i = end;
            } else {
                if let Some(status) = worker.execute_single(flat, planned.kind, token).await? {
                    lock(&self.statuses).push(status);
                }
                lock(&self.state).mark_completed(i);
                i += 1;
            }
        }

        if token.is_cancelled() {
            return Err(ExecError::Aborted);
        }
        Ok(())
    }

    async fn execute_onramp(&self, leg: &OnrampLeg, token: &CancelToken) -> Result<(), ExecError> {
        // Never re-run a leg that is already executing or settled; the
        // payment page must not open twice for one session.
        if lock(&self.state).onramp != Some(OnrampStatus::Pending) {
            return Ok(());
        }
        lock(&self.state).onramp_executing();

        let worker = OnrampWorker {
            run_id: self.run_id,
            status: self.deps.status.as_ref(),
            window: self.deps.window.as_ref(),
            events: self.deps.events.as_ref(),
            config: &self.config,
        };
        match worker.execute(leg, token).await {
            Ok(status) => {
                lock(&self.state).onramp_completed();
                lock(&self.statuses).push(status);
                Ok(())
            }
            Err(ExecError::Aborted) => {
                // cancel_run rolls the leg back to pending.
                Err(ExecError::Aborted)
            }
            Err(err @ ExecError::OnrampFailed { .. }) => {
                lock(&self.state).onramp_failed();
                Err(err)
            }
            Err(err) => {
                // Transient failure before the session settled; allow a
                // retry to pick the leg back up.
                let mut st = lock(&self.state);
                if st.onramp == Some(OnrampStatus::Executing) {
                    st.onramp = Some(OnrampStatus::Pending);
                }
                Err(err)
            }
        }
    }
}
