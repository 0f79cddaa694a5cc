//! Execution strategies for the fallback gateway

use async_trait::async_trait;
use skillbar_core::{ExecutionGateway, FallbackGateway};
use skillbar_types::GatewayError;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::config::StrategyKind;

/// Build the gateway chain in configured order
pub fn build_gateway(kinds: &[StrategyKind]) -> FallbackGateway {
    let mut gateway = FallbackGateway::new();
    for kind in kinds {
        match kind {
            StrategyKind::Clipboard => gateway.push(Box::new(ClipboardGateway::new())),
            StrategyKind::Stdout => gateway.push(Box::new(StdoutGateway)),
        }
    }
    gateway
}

/// Attempts to open the clipboard before giving up
const OPEN_ATTEMPTS: u32 = 3;
const OPEN_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Open the system clipboard, retrying while it is not ready yet
fn open_clipboard() -> Result<arboard::Clipboard, GatewayError> {
    let mut attempt = 1;
    loop {
        match arboard::Clipboard::new() {
            Ok(clipboard) => return Ok(clipboard),
            Err(e) if attempt >= OPEN_ATTEMPTS => {
                return Err(GatewayError::Unavailable(e.to_string()));
            }
            Err(e) => {
                debug!("Clipboard not ready (attempt {}): {}", attempt, e);
                attempt += 1;
                thread::sleep(OPEN_RETRY_DELAY);
            }
        }
    }
}

/// Copies the payload to the system clipboard
///
/// The clipboard handle is opened lazily and kept alive, since on some
/// platforms the copied text is only served while it exists.
pub struct ClipboardGateway {
    clipboard: Arc<Mutex<Option<arboard::Clipboard>>>,
}

impl ClipboardGateway {
    pub fn new() -> Self {
        Self {
            clipboard: Arc::new(Mutex::new(None)),
        }
    }
}

impl Default for ClipboardGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExecutionGateway for ClipboardGateway {
    fn name(&self) -> &str {
        "clipboard"
    }

    async fn dispatch(&self, payload: &str) -> Result<(), GatewayError> {
        let clipboard = Arc::clone(&self.clipboard);
        let text = payload.to_string();

        tokio::task::spawn_blocking(move || {
            let mut guard = clipboard
                .lock()
                .map_err(|_| GatewayError::Unavailable("clipboard lock poisoned".to_string()))?;

            if guard.is_none() {
                *guard = Some(open_clipboard()?);
            }

            let clipboard = guard
                .as_mut()
                .ok_or_else(|| GatewayError::Unavailable("clipboard not available".to_string()))?;

            clipboard
                .set_text(text)
                .map_err(|e| GatewayError::Rejected {
                    strategy: "clipboard".to_string(),
                    reason: e.to_string(),
                })?;

            debug!("Copied invocation to clipboard");
            Ok::<(), GatewayError>(())
        })
        .await
        .map_err(|e| GatewayError::Unavailable(format!("clipboard task failed: {}", e)))?
    }
}

/// Prints the payload on its own line, for piping into other tools
pub struct StdoutGateway;

#[async_trait]
impl ExecutionGateway for StdoutGateway {
    fn name(&self) -> &str {
        "stdout"
    }

    async fn dispatch(&self, payload: &str) -> Result<(), GatewayError> {
        let mut stdout = tokio::io::stdout();
        let line = format!("{}\n", payload);

        stdout
            .write_all(line.as_bytes())
            .await
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;
        stdout
            .flush()
            .await
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;
        Ok(())
    }
}
