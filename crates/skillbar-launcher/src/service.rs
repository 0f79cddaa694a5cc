use crate::config::{Config, UsageBackend};
use crate::strategies::build_gateway;
use crate::view::render;
use anyhow::{anyhow, Context, Result};
use skillbar_core::{
    load_catalog, ExecutionGateway, FallbackGateway, Launcher, UsageStorage, UsageStore,
};
use skillbar_persistence::{JsonUsageStorage, SqliteUsageStorage};
use skillbar_types::{GatewayError, Invocation, KeyAction, LauncherOutcome};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

type DispatchResult = (Invocation, Result<(), GatewayError>);

/// How long shutdown waits for hand-offs still in flight
const DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// One line of driver input
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Quit,
    Key(KeyAction),
    Input(String),
}

/// `:quit` and `:<key>` are commands, anything else replaces the input
fn parse_command(line: &str) -> Result<Command, String> {
    match line.strip_prefix(':') {
        Some(rest) if rest.trim().eq_ignore_ascii_case("quit") => Ok(Command::Quit),
        Some(rest) => rest.parse().map(Command::Key),
        None => Ok(Command::Input(line.to_string())),
    }
}

/// Launcher service - wires storage, catalog and gateway to stdin
pub struct LauncherService {
    config: Config,
}

impl LauncherService {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    async fn open_storage(&self) -> Result<Arc<dyn UsageStorage>> {
        let path = self.config.usage_path();

        let storage: Arc<dyn UsageStorage> = match self.config.usage.backend {
            UsageBackend::Sqlite => {
                let path = path
                    .to_str()
                    .ok_or_else(|| anyhow!("Usage path is not valid UTF-8: {:?}", path))?;
                Arc::new(SqliteUsageStorage::new(path).await?)
            }
            UsageBackend::Json => Arc::new(JsonUsageStorage::new(path)),
        };

        info!("Usage backend: {:?}", self.config.usage.backend);
        Ok(storage)
    }

    /// Run the launcher until `:quit`, EOF or Ctrl+C
    pub async fn run(self) -> Result<()> {
        skillbar_logging::init_logging(&self.config.logging.level, self.config.logging.json)?;
        info!("Starting skillbar");
        for path in &self.config.created_paths {
            info!("Created default config: {}", path.display());
        }

        let storage = self.open_storage().await?;
        let usage = UsageStore::load(storage).await;
        let persister = usage.spawn_persister();

        let catalog_path = self.config.catalog_path();
        let skills = load_catalog(&catalog_path)
            .with_context(|| format!("Failed to load skill catalog {:?}", catalog_path))?;

        let gateway = Arc::new(build_gateway(&self.config.gateway.strategies));
        info!("Execution strategies: {:?}", gateway.strategy_names());

        let mut launcher = Launcher::new(skills, usage);
        let (result_tx, mut result_rx) = mpsc::unbounded_channel::<DispatchResult>();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        print!("{}", render(&launcher));

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read stdin")? else {
                        info!("Input closed, shutting down");
                        break;
                    };

                    match parse_command(&line) {
                        Ok(Command::Quit) => break,
                        Ok(Command::Key(action)) => {
                            on_key(&mut launcher, action, &gateway, &result_tx).await;
                        }
                        Ok(Command::Input(text)) => launcher.set_input(text),
                        Err(e) => {
                            warn!("{}", e);
                            continue;
                        }
                    }
                }
                Some((invocation, result)) = result_rx.recv() => {
                    apply_result(&mut launcher, invocation, result);
                }
                _ = signal::ctrl_c() => {
                    info!("Received Ctrl+C, shutting down");
                    break;
                }
            }

            print!("{}", render(&launcher));
        }

        drop(result_tx);
        drain_results(&mut launcher, &mut result_rx, DRAIN_TIMEOUT).await;

        if let Err(e) = launcher.usage().sync().await {
            warn!("Failed to flush usage history: {:#}", e);
        }

        drop(launcher);
        if let Some(handle) = persister {
            if let Err(e) = handle.await {
                warn!("Usage persister task failed: {}", e);
            }
        }

        info!("Skillbar stopped");
        Ok(())
    }
}

/// Report a finished hand-off and record usage on success
fn apply_result(
    launcher: &mut Launcher,
    invocation: Invocation,
    result: Result<(), GatewayError>,
) {
    match launcher.finish_execute(invocation, result) {
        Ok(invocation) => println!("Executed: {}", invocation),
        Err(e) => {
            error!("{}", e);
            println!("Error: {}", e);
        }
    }
}

/// Apply hand-offs that complete after the loop ended, waiting at most `wait`
///
/// Stops once every sender is gone and returns how many results were applied.
async fn drain_results(
    launcher: &mut Launcher,
    results: &mut mpsc::UnboundedReceiver<DispatchResult>,
    wait: Duration,
) -> usize {
    let mut applied = 0;
    let drain = async {
        while let Some((invocation, result)) = results.recv().await {
            apply_result(launcher, invocation, result);
            applied += 1;
        }
    };

    if timeout(wait, drain).await.is_err() {
        warn!("Gave up waiting for in-flight hand-offs after {:?}", wait);
    }
    applied
}

/// Apply one key; execution is dispatched in the background
async fn on_key(
    launcher: &mut Launcher,
    action: KeyAction,
    gateway: &Arc<FallbackGateway>,
    results: &mpsc::UnboundedSender<DispatchResult>,
) {
    if action == KeyAction::Execute {
        let Some(invocation) = launcher.prepare_execute() else {
            debug!("No skill selected");
            return;
        };

        let gateway = Arc::clone(gateway);
        let results = results.clone();
        tokio::spawn(async move {
            let result = gateway.dispatch(&invocation.payload).await;
            let _ = results.send((invocation, result));
        });
        return;
    }

    match launcher.handle_key(action, gateway.as_ref()).await {
        Ok(LauncherOutcome::Completed(text)) => debug!("Completed input to {}", text),
        Ok(LauncherOutcome::Dismissed) => println!("(launcher hidden)"),
        Ok(_) => {}
        Err(e) => error!("{}", e),
    }
}
