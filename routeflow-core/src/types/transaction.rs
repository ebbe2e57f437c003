/// Action tag the quote endpoint attaches to each prepared transaction.
///
/// Approvals and fee payments settle on-chain only; everything else is
/// tracked end to end by the bridge status endpoint. Vendor action strings
/// we do not recognise fold into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxAction {
    Approval,
    Fee,
    #[serde(other)]
    Other,
}

impl TxAction {
    /// Whether the transaction settles on-chain without a bridge-level status.
    pub fn is_chain_only(&self) -> bool {
        matches!(self, TxAction::Approval | TxAction::Fee)
    }
}

/// One prepared on-chain call. Calldata and value are opaque 0x-hex strings;
/// building, signing, and broadcasting are the wallet's business.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PreparedTransaction {
    #[serde(rename = "chainId")]
    pub chain_id: u64,

    pub to: String,

    pub data: String,

    pub value: String,

    pub action: TxAction,
}
