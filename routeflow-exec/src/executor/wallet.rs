use async_trait::async_trait;
use routeflow_core::PreparedTransaction;

#[derive(Debug, Clone, thiserror::Error)]
pub enum WalletError {
    #[error("user rejected the request: {0}")]
    Rejected(String),
    #[error("wallet does not support {0}")]
    Unsupported(&'static str),
    #[error("chain switch to {chain_id} failed: {message}")]
    ChainSwitch { chain_id: u64, message: String },
    #[error("wallet error: {0}")]
    Other(String),
}

/// Hash of a submitted transaction (or batch) on its chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxHandle {
    pub chain_id: u64,
    pub tx_hash: String,
}

/// The connected wallet account, the external authority for everything
/// chain-side: building, signing, broadcasting, receipt waits.
///
/// All mutating calls are serialized through the run loop; no two are ever
/// in flight concurrently from this crate.
#[async_trait]
pub trait Account: Send + Sync {
    fn address(&self) -> String;

    async fn active_chain(&self) -> Result<u64, WalletError>;

    /// Suspends until the wallet confirms or rejects the switch.
    async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError>;

    async fn send_transaction(&self, tx: &PreparedTransaction) -> Result<TxHandle, WalletError>;

    /// Whether [`Account::send_batch`] is available for this account.
    fn supports_batching(&self) -> bool {
        false
    }

    /// Submits several same-chain transactions in one wallet call,
    /// preserving their relative order.
    async fn send_batch(&self, txs: &[PreparedTransaction]) -> Result<TxHandle, WalletError> {
        let _ = txs;
        Err(WalletError::Unsupported("batch transactions"))
    }

    /// Waits for on-chain inclusion of a previously submitted transaction.
    async fn wait_for_confirmation(&self, chain_id: u64, tx_hash: &str)
        -> Result<(), WalletError>;
}
