use routeflow_core::CompletedStatus;

use crate::api::ApiError;
use crate::executor::wallet::WalletError;
use crate::executor::window::WindowError;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ExecError {
    #[error("no prepared route to execute")]
    NoRoute,
    #[error("wallet not connected")]
    WalletNotConnected,
    #[error("no transactions to batch")]
    EmptyBatch,
    #[error("batch transactions must share one chain")]
    MixedChainBatch,
    #[error("account does not support batch transactions")]
    BatchUnsupported,
    #[error("payment failed on chain {chain_id} (tx {tx_hash})")]
    PaymentFailed { chain_id: u64, tx_hash: String },
    #[error("onramp session {session_id} failed")]
    OnrampFailed { session_id: String },
    #[error("no failed run to retry")]
    NothingToRetry,
    #[error(transparent)]
    Wallet(#[from] WalletError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Window(#[from] WindowError),
    /// Internal marker for a cancelled run; surfaced to callers as
    /// [`RunOutcome::Cancelled`], never as a recorded error.
    #[error("execution aborted")]
    Aborted,
    #[error("unexpected execution failure: {0}")]
    Unknown(String),
}

/// How a run ended when it did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// All legs reached a terminal success; statuses are in completion order.
    Completed(Vec<CompletedStatus>),
    Cancelled,
    /// `start()` found another run already executing and did nothing.
    AlreadyRunning,
}
