mod cancel;
pub mod events;
pub mod metrics;
mod onramp;
pub mod poller;
mod result;
mod runner;
mod state;
mod transaction;
mod types;
pub mod wallet;
pub mod window;

pub use cancel::CancelToken;
pub use events::{CompositeEventSink, Event, EventSink, NoOpEventSink, StdoutEventSink};
pub use metrics::{MetricsCollector, RunMetrics};
pub use poller::{poll_until, PollConfig, PollError};
pub use result::{ExecError, RunOutcome};
pub use runner::{ExecutorDeps, StepExecutor};
pub use state::{ExecutionPhase, StateSnapshot};
pub use types::ExecutorConfig;
pub use wallet::{Account, TxHandle, WalletError};
pub use window::{NoOpWindowOpener, StdoutWindowOpener, WindowError, WindowOpener};
