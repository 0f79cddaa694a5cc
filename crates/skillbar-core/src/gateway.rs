//! Execution gateway boundary
//!
//! The core hands a resolved invocation string to a gateway and only cares
//! whether the hand-off succeeded.

use async_trait::async_trait;
use skillbar_types::GatewayError;
use tracing::{debug, warn};

/// Receiver of resolved invocation payloads (clipboard, pipe, process...)
#[async_trait]
pub trait ExecutionGateway: Send + Sync {
    /// Short strategy name used in logs and error reports
    fn name(&self) -> &str;

    /// Hand `payload` off; `Ok` means the hand-off is confirmed
    async fn dispatch(&self, payload: &str) -> Result<(), GatewayError>;
}

/// Ordered chain of strategies, tried until one succeeds
#[derive(Default)]
pub struct FallbackGateway {
    strategies: Vec<Box<dyn ExecutionGateway>>,
}

impl FallbackGateway {
    /// Empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a strategy to the end of the chain
    pub fn with_strategy(mut self, strategy: impl ExecutionGateway + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Append an already boxed strategy
    pub fn push(&mut self, strategy: Box<dyn ExecutionGateway>) {
        self.strategies.push(strategy);
    }

    /// Strategy names in trial order
    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Number of strategies
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Chain has no strategies
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

#[async_trait]
impl ExecutionGateway for FallbackGateway {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn dispatch(&self, payload: &str) -> Result<(), GatewayError> {
        if self.strategies.is_empty() {
            return Err(GatewayError::NoStrategies);
        }

        let mut attempts = Vec::with_capacity(self.strategies.len());
        for strategy in &self.strategies {
            match strategy.dispatch(payload).await {
                Ok(()) => {
                    debug!("Dispatched via '{}'", strategy.name());
                    return Ok(());
                }
                Err(e) => {
                    warn!("Strategy '{}' failed: {}", strategy.name(), e);
                    attempts.push(format!("{}: {}", strategy.name(), e));
                }
            }
        }

        Err(GatewayError::Exhausted { attempts })
    }
}
