#![forbid(unsafe_code)]

//! Runtime engine for executing prepared bridge/payment routes.
//!
//! The route model lives in `routeflow-core`; this crate owns the run loop,
//! polling, cancellation, and the trait seams for the wallet, the bridge
//! status endpoint, and the host window adapter.

pub mod api;
pub mod executor;

pub use crate::api::{
    ApiError, BridgeApiConfig, HttpBridgeClient, QuoteApi, QuoteRequest, StatusApi, StatusSnapshot,
};
pub use crate::executor::StepExecutor;
