use anyhow::bail;
use async_trait::async_trait;
use rust_decimal::Decimal;
use splitcheck_core::{PaymentMethod, PaymentProcessor};
use tracing::info;

use crate::config::ProcessorConfig;

/// Stand-in payment terminal: accepts every charge up to an optional ceiling
pub struct SimulatedProcessor {
    decline_above: Option<Decimal>,
}

impl SimulatedProcessor {
    pub fn new(config: &ProcessorConfig) -> Self {
        Self {
            decline_above: config.decline_above,
        }
    }
}

#[async_trait]
impl PaymentProcessor for SimulatedProcessor {
    async fn charge(&self, amount: Decimal, method: PaymentMethod) -> anyhow::Result<()> {
        if let Some(limit) = self.decline_above {
            if amount > limit {
                bail!("{} charge of {} declined (limit {})", method, amount, limit);
            }
        }

        info!("Approved {} charge of {}", method, amount);
        Ok(())
    }

    fn name(&self) -> &str {
        "simulated"
    }
}
