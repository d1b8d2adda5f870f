use crate::domain::PaymentMethod;
use crate::math::sum_amounts;
use crate::split::{SplitId, SplitSession};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Charges a split's amount before it is recorded as paid
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Charges `amount` using `method`
    async fn charge(&self, amount: Decimal, method: PaymentMethod) -> anyhow::Result<()>;

    /// Returns processor name
    fn name(&self) -> &str;
}

/// Per-split view of the session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SplitSummary {
    pub id: SplitId,
    pub label: String,
    pub item_count: usize,
    pub total: Decimal,
    pub payment: Option<PaymentMethod>,
}

/// Snapshot of the whole session's settlement state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSummary {
    pub splits: Vec<SplitSummary>,

    /// Sum over every line of the order
    pub total: Decimal,

    /// Amount already settled
    pub paid_total: Decimal,

    /// Amount still owed by unpaid splits
    pub outstanding_total: Decimal,

    pub complete: bool,
}

impl SplitSession {
    /// Records a split as paid.
    ///
    /// Idempotent: a split that is already paid keeps its original method
    /// and nothing is re-notified. Unknown splits are ignored.
    pub fn mark_paid(&mut self, split_id: SplitId, method: PaymentMethod) -> bool {
        let Some(split) = self.splits.iter_mut().find(|split| split.id == split_id) else {
            debug!("Ignoring payment for unknown {}", split_id);
            return false;
        };

        if split.is_paid() {
            debug!("{} is already paid, ignoring repeated settlement", split_id);
            return false;
        }

        split.payment = Some(method);
        info!("Marked {} ({}) paid by {}", split_id, split.label, method);

        self.check_completion();
        true
    }

    /// True when every split holding items is paid; empty splits never block
    pub fn is_complete(&self) -> bool {
        self.splits
            .iter()
            .all(|split| split.is_empty() || split.is_paid())
    }

    /// Charges the split's total through `processor`, then marks it paid.
    ///
    /// Returns `Ok(false)` for unknown or already-paid splits without
    /// charging. If the charge fails the split stays unpaid and can be retried.
    pub async fn settle(
        &mut self,
        split_id: SplitId,
        method: PaymentMethod,
        processor: &dyn PaymentProcessor,
    ) -> crate::Result<bool> {
        let Some(split) = self.split(split_id) else {
            debug!("Ignoring settlement of unknown {}", split_id);
            return Ok(false);
        };

        if split.is_paid() {
            debug!("{} is already paid, skipping charge", split_id);
            return Ok(false);
        }

        let amount = self.split_total(split_id);
        info!(
            "Charging {} for {} via {} ({})",
            amount,
            split_id,
            processor.name(),
            method
        );

        if let Err(e) = processor.charge(amount, method).await {
            warn!("Payment for {} failed: {:#}", split_id, e);
            return Err(crate::Error::PaymentFailed(format!("{}: {:#}", split_id, e)));
        }

        Ok(self.mark_paid(split_id, method))
    }

    /// Builds a snapshot of totals and payment state
    pub fn summary(&self) -> SessionSummary {
        let splits: Vec<SplitSummary> = self
            .splits
            .iter()
            .map(|split| SplitSummary {
                id: split.id,
                label: split.label.clone(),
                item_count: split.item_ids.len(),
                total: self.split_total(split.id),
                payment: split.payment,
            })
            .collect();

        let paid_total = sum_amounts(
            splits
                .iter()
                .filter(|split| split.payment.is_some())
                .map(|split| split.total),
        )
        .unwrap_or(Decimal::ZERO);
        let total = self.total();

        SessionSummary {
            splits,
            total,
            paid_total,
            outstanding_total: total - paid_total,
            complete: self.is_complete(),
        }
    }

    /// Fires the completion notification on the first transition to complete
    pub(crate) fn check_completion(&mut self) {
        if self.completion_notified || !self.is_complete() {
            return;
        }

        self.completion_notified = true;
        info!("All splits settled, session complete");

        if let Some(observer) = &self.observer {
            observer.session_completed();
        }
    }
}
