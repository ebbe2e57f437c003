/// The fiat leg of an onramp route: a hosted payment page plus the session
/// id the status endpoint is keyed by.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OnrampLeg {
    #[serde(rename = "sessionId")]
    pub session_id: String,

    pub url: String,
}

/// Local lifecycle of the onramp leg within a run.
///
/// `Executing` rolls back to `Pending` on cancellation so a later run can
/// retry without opening the payment page twice for a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnrampStatus {
    Pending,
    Executing,
    Completed,
    Failed,
}

impl OnrampStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OnrampStatus::Pending => "pending",
            OnrampStatus::Executing => "executing",
            OnrampStatus::Completed => "completed",
            OnrampStatus::Failed => "failed",
        }
    }
}
