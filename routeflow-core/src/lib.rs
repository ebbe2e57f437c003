#![forbid(unsafe_code)]

pub mod error;
pub mod flatten;
pub mod progress;
pub mod types;

pub use crate::error::{RouteError, Violation};
pub use crate::flatten::{batch_window, flatten_route, FlatTx};
pub use crate::progress::percent_complete;
pub use crate::types::{
    BridgeStatus, CompletedStatus, OnrampLeg, OnrampStatus, PreparedTransaction, Route, RouteKind,
    RouteStep, TxAction,
};
