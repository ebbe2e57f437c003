use serde_json::Value as JsonValue;

/// Status the bridge reports for a transaction or onramp session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BridgeStatus {
    NotFound,
    Pending,
    Completed,
    Failed,
}

impl BridgeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BridgeStatus::NotFound => "NOT_FOUND",
            BridgeStatus::Pending => "PENDING",
            BridgeStatus::Completed => "COMPLETED",
            BridgeStatus::Failed => "FAILED",
        }
    }

    /// Terminal statuses end polling for the leg they describe.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BridgeStatus::Completed | BridgeStatus::Failed)
    }
}

/// Terminal status of one completed leg, tagged by the route kind it
/// belongs to. Accumulated in completion order for the duration of a run
/// and handed to the caller when the run finishes.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CompletedStatus {
    Buy {
        #[serde(rename = "chainId")]
        chain_id: u64,
        #[serde(rename = "transactionHash")]
        tx_hash: String,
        detail: JsonValue,
    },
    Sell {
        #[serde(rename = "chainId")]
        chain_id: u64,
        #[serde(rename = "transactionHash")]
        tx_hash: String,
        detail: JsonValue,
    },
    Transfer {
        #[serde(rename = "chainId")]
        chain_id: u64,
        #[serde(rename = "transactionHash")]
        tx_hash: String,
        detail: JsonValue,
    },
    Onramp {
        #[serde(rename = "sessionId")]
        session_id: String,
        detail: JsonValue,
    },
}

impl CompletedStatus {
    /// Builds the transaction-leg variant matching the route kind.
    ///
    /// Onramp routes never reach this path for their transactions with an
    /// onramp discriminant; any swap transactions appended to an onramp
    /// route settle like a buy.
    pub fn for_transaction(
        kind: crate::types::RouteKind,
        chain_id: u64,
        tx_hash: String,
        detail: JsonValue,
    ) -> Self {
        match kind {
            crate::types::RouteKind::Sell => CompletedStatus::Sell {
                chain_id,
                tx_hash,
                detail,
            },
            crate::types::RouteKind::Transfer => CompletedStatus::Transfer {
                chain_id,
                tx_hash,
                detail,
            },
            crate::types::RouteKind::Buy | crate::types::RouteKind::Onramp => {
                CompletedStatus::Buy {
                    chain_id,
                    tx_hash,
                    detail,
                }
            }
        }
    }

    pub fn kind_str(&self) -> &'static str {
        match self {
            CompletedStatus::Buy { .. } => "buy",
            CompletedStatus::Sell { .. } => "sell",
            CompletedStatus::Transfer { .. } => "transfer",
            CompletedStatus::Onramp { .. } => "onramp",
        }
    }
}
