mod onramp;
mod route;
mod status;
mod transaction;

pub use onramp::{OnrampLeg, OnrampStatus};
pub use route::{Route, RouteKind, RouteStep};
pub use status::{BridgeStatus, CompletedStatus};
pub use transaction::{PreparedTransaction, TxAction};
