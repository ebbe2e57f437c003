use serde_json::json;

#[derive(Debug, Clone, thiserror::Error)]
#[error("failed to open {url}: {message}")]
pub struct WindowError {
    pub url: String,
    pub message: String,
}

/// How an onramp payment URL reaches the user: a web popup, a native
/// intent, or (here) a terminal line. Opening a window has user-visible
/// consequences, so callers must never invoke it spuriously.
pub trait WindowOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<(), WindowError>;
}

/// Prints the URL as a JSON line for terminal hosts.
pub struct StdoutWindowOpener;

impl WindowOpener for StdoutWindowOpener {
    fn open(&self, url: &str) -> Result<(), WindowError> {
        println!(
            "{}",
            serde_json::to_string(&json!({ "type": "window.open", "url": url }))
                .unwrap_or_default()
        );
        Ok(())
    }
}

pub struct NoOpWindowOpener;

impl WindowOpener for NoOpWindowOpener {
    fn open(&self, _url: &str) -> Result<(), WindowError> {
        Ok(())
    }
}
