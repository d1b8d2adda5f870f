use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use splitcheck_core::{DropTarget, ItemId, PaymentMethod, PaymentProcessor, SplitId, SplitSession};
use std::path::Path;
use tracing::{info, warn};

/// One user interaction recorded against a split session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Add a payer; omitting the label uses the configured prefix
    AddSplit {
        #[serde(default)]
        label: Option<String>,
    },
    RemoveSplit {
        split: SplitId,
    },
    /// Drag an item onto a split, another item, or nowhere
    Move {
        item: ItemId,
        target: DropTarget,
    },
    Pay {
        split: SplitId,
        method: PaymentMethod,
    },
}

/// Outcome counters of a replay
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplayReport {
    pub applied: usize,
    pub ignored: usize,
    pub failed_payments: Vec<String>,
}

pub fn load_script(path: &Path) -> Result<Vec<Action>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid script {}", path.display()))
}

/// Applies actions in order. Failed payments are recorded and replay continues.
pub async fn replay(
    session: &mut SplitSession,
    actions: &[Action],
    processor: &dyn PaymentProcessor,
) -> ReplayReport {
    let mut report = ReplayReport::default();

    for action in actions {
        let applied = match action {
            Action::AddSplit { label } => {
                match label {
                    Some(label) => session.create_split(label.clone()),
                    None => session.add_split(),
                };
                true
            }
            Action::RemoveSplit { split } => session.remove_split(*split),
            Action::Move { item, target } => session.move_item(item, target),
            Action::Pay { split, method } => match session.settle(*split, *method, processor).await {
                Ok(applied) => applied,
                Err(e) => {
                    warn!("{}", e);
                    report.failed_payments.push(e.to_string());
                    false
                }
            },
        };

        if applied {
            report.applied += 1;
        } else {
            report.ignored += 1;
        }
    }

    info!(
        "Replayed {} actions: {} applied, {} ignored",
        actions.len(),
        report.applied,
        report.ignored
    );
    report
}
