use std::collections::BTreeSet;

use routeflow_core::OnrampStatus;

use crate::executor::result::ExecError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionPhase {
    /// Quote not yet ready.
    Fetching,
    Idle,
    /// Deferred kick-off counting down before the first wallet prompt.
    AutoStarting,
    Executing,
}

impl ExecutionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionPhase::Fetching => "fetching",
            ExecutionPhase::Idle => "idle",
            ExecutionPhase::AutoStarting => "auto-starting",
            ExecutionPhase::Executing => "executing",
        }
    }
}

/// Read-only view of the run state for host UIs.
#[derive(Debug, Clone)]
pub struct StateSnapshot {
    pub phase: ExecutionPhase,
    pub current_tx: Option<usize>,
    pub completed_count: usize,
    pub onramp: Option<OnrampStatus>,
    pub error: Option<ExecError>,
}

/// The single state value for one executor, transitioned only through the
/// methods below. Keeping every cell behind one lock and one transition
/// surface rules out torn updates when async callbacks race.
#[derive(Debug)]
pub(crate) struct RunState {
    pub(crate) phase: ExecutionPhase,
    pub(crate) current_tx: Option<usize>,
    pub(crate) completed: BTreeSet<usize>,
    pub(crate) onramp: Option<OnrampStatus>,
    pub(crate) error: Option<ExecError>,
    /// Admission counter. Each admitted run holds the value it was admitted
    /// under; terminal transitions from a run that is no longer current are
    /// discarded, so a superseded run can never reopen the run slot.
    run_gen: u64,
}

impl RunState {
    pub(crate) fn new() -> Self {
        Self {
            phase: ExecutionPhase::Fetching,
            current_tx: None,
            completed: BTreeSet::new(),
            onramp: None,
            error: None,
            run_gen: 0,
        }
    }

    pub(crate) fn route_ready(&mut self, has_onramp: bool) {
        if matches!(self.phase, ExecutionPhase::Fetching) {
            self.phase = ExecutionPhase::Idle;
        }
        self.onramp = has_onramp.then_some(OnrampStatus::Pending);
        self.current_tx = None;
        self.completed.clear();
        self.error = None;
    }

    /// Moves to `Executing` when allowed, returning the admitted run's
    /// generation; `None` means a run is already in flight.
    pub(crate) fn try_begin(&mut self) -> Option<u64> {
        match self.phase {
            ExecutionPhase::Idle | ExecutionPhase::AutoStarting => {
                self.run_gen += 1;
                self.phase = ExecutionPhase::Executing;
                self.error = None;
                Some(self.run_gen)
            }
            ExecutionPhase::Executing | ExecutionPhase::Fetching => None,
        }
    }

    pub(crate) fn begin_auto_start(&mut self) -> Option<u64> {
        if matches!(self.phase, ExecutionPhase::Idle) {
            self.run_gen += 1;
            self.phase = ExecutionPhase::AutoStarting;
            Some(self.run_gen)
        } else {
            None
        }
    }

    pub(crate) fn set_current(&mut self, index: usize) {
        self.current_tx = Some(index);
    }

    /// Completion only grows within a run.
    pub(crate) fn mark_completed(&mut self, index: usize) {
        self.completed.insert(index);
    }

    pub(crate) fn finish_run(&mut self, gen: u64) {
        if gen != self.run_gen {
            return;
        }
        self.phase = ExecutionPhase::Idle;
        self.current_tx = None;
    }

    /// Failure keeps `current_tx` so a retry resumes at the failed index.
    pub(crate) fn fail_run(&mut self, gen: u64, error: ExecError) {
        if gen != self.run_gen {
            return;
        }
        self.phase = ExecutionPhase::Idle;
        self.error = Some(error);
    }

    pub(crate) fn cancel_run(&mut self, gen: u64) {
        if gen != self.run_gen {
            return;
        }
        self.phase = ExecutionPhase::Idle;
        if self.onramp == Some(OnrampStatus::Executing) {
            self.onramp = Some(OnrampStatus::Pending);
        }
    }

    pub(crate) fn onramp_executing(&mut self) {
        self.onramp = Some(OnrampStatus::Executing);
    }

    pub(crate) fn onramp_completed(&mut self) {
        self.onramp = Some(OnrampStatus::Completed);
    }

    pub(crate) fn onramp_failed(&mut self) {
        self.onramp = Some(OnrampStatus::Failed);
    }

    pub(crate) fn clear_error(&mut self) -> Option<ExecError> {
        self.error.take()
    }

    /// A retry re-runs a failed onramp leg from scratch rather than
    /// skipping it and reporting an empty success.
    pub(crate) fn reset_failed_onramp(&mut self) {
        if self.onramp == Some(OnrampStatus::Failed) {
            self.onramp = Some(OnrampStatus::Pending);
        }
    }

    pub(crate) fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            phase: self.phase,
            current_tx: self.current_tx,
            completed_count: self.completed.len(),
            onramp: self.onramp,
            error: self.error.clone(),
        }
    }
}
