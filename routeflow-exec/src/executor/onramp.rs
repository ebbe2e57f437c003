use routeflow_core::{BridgeStatus, CompletedStatus, OnrampLeg};
use uuid::Uuid;

use crate::api::StatusApi;
use crate::executor::cancel::CancelToken;
use crate::executor::events::{Event, EventSink};
use crate::executor::poller::{poll_until, PollError};
use crate::executor::result::ExecError;
use crate::executor::types::ExecutorConfig;
use crate::executor::window::WindowOpener;

/// Drives the fiat onramp leg: surfaces the hosted payment page once, then
/// polls the session until it settles.
pub(crate) struct OnrampWorker<'a> {
    pub(crate) run_id: Uuid,
    pub(crate) status: &'a dyn StatusApi,
    pub(crate) window: &'a dyn WindowOpener,
    pub(crate) events: &'a dyn EventSink,
    pub(crate) config: &'a ExecutorConfig,
}

impl OnrampWorker<'_> {
    pub(crate) async fn execute(
        &self,
        leg: &OnrampLeg,
        cancel: &CancelToken,
    ) -> Result<CompletedStatus, ExecError> {
        self.window.open(&leg.url)?;
        self.events
            .emit(Event::OnrampOpened {
                run_id: self.run_id,
                session_id: leg.session_id.clone(),
            })
            .await;

        let result = poll_until(&self.config.poll, cancel, || async {
            let snap = self.status.onramp_status(&leg.session_id).await?;
            Ok(snap.status.is_terminal().then_some(snap))
        })
        .await;

        let snap = match result {
            Ok(snap) => snap,
            Err(PollError::Aborted) => return Err(ExecError::Aborted),
            Err(PollError::Task(e)) => return Err(ExecError::Api(e)),
        };

        match snap.status {
            BridgeStatus::Completed => {
                self.events
                    .emit(Event::OnrampCompleted {
                        run_id: self.run_id,
                        session_id: leg.session_id.clone(),
                    })
                    .await;
                Ok(CompletedStatus::Onramp {
                    session_id: leg.session_id.clone(),
                    detail: snap.detail,
                })
            }
            _ => {
                self.events
                    .emit(Event::OnrampFailed {
                        run_id: self.run_id,
                        session_id: leg.session_id.clone(),
                    })
                    .await;
                Err(ExecError::OnrampFailed {
                    session_id: leg.session_id.clone(),
                })
            }
        }
    }
}
