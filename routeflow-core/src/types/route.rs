use crate::error::{RouteError, RouteValidator};
use crate::types::{OnrampLeg, PreparedTransaction};

/// The kind of prepared operation a route carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    Buy,
    Sell,
    Transfer,
    Onramp,
}

impl RouteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteKind::Buy => "buy",
            RouteKind::Sell => "sell",
            RouteKind::Transfer => "transfer",
            RouteKind::Onramp => "onramp",
        }
    }
}

/// A prepared multi-step plan returned by the quote endpoint.
///
/// Immutable once fetched; if the inputs change, a new route is prepared
/// rather than mutating this one.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Route {
    #[serde(rename = "type")]
    pub kind: RouteKind,

    pub steps: Vec<RouteStep>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onramp: Option<OnrampLeg>,
}

/// One logical stage of a route, holding zero or more chain transactions.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RouteStep {
    pub transactions: Vec<PreparedTransaction>,
}

impl Route {
    pub fn from_json_str(raw: &str) -> Result<Self, RouteError> {
        let route: Route = serde_json::from_str(raw)?;
        route.validate()?;
        Ok(route)
    }

    /// Total number of transactions across all steps.
    pub fn transaction_count(&self) -> usize {
        self.steps.iter().map(|s| s.transactions.len()).sum()
    }

    pub fn has_onramp(&self) -> bool {
        self.onramp.is_some()
    }

    /// Structural checks on a freshly fetched route.
    pub fn validate(&self) -> Result<(), RouteError> {
        let mut v = RouteValidator::new();
        if self.kind == RouteKind::Onramp && self.onramp.is_none() {
            v.push("onramp", "onramp routes must carry an onramp leg");
        }
        if let Some(leg) = &self.onramp {
            if leg.session_id.is_empty() {
                v.push("onramp.sessionId", "must not be empty");
            }
            if leg.url.is_empty() {
                v.push("onramp.url", "must not be empty");
            }
        }
        for (si, step) in self.steps.iter().enumerate() {
            for (ti, tx) in step.transactions.iter().enumerate() {
                let path = format!("steps[{si}].transactions[{ti}]");
                if tx.to.is_empty() {
                    v.push(format!("{path}.to"), "must not be empty");
                }
                if !tx.data.starts_with("0x") {
                    v.push(format!("{path}.data"), "must be 0x-prefixed call data");
                }
                if !tx.value.starts_with("0x") {
                    v.push(format!("{path}.value"), "must be a 0x-prefixed amount");
                }
            }
        }
        v.finish().map_err(RouteError::from)
    }
}
