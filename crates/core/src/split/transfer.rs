use super::{SplitId, SplitSession};
use crate::domain::ItemId;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Where a dragged item was released
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DropTarget {
    /// Dropped onto a split container
    Split(SplitId),

    /// Dropped onto another item; the destination is whichever split holds it
    Item(ItemId),

    /// Released outside every container
    Outside,
}

impl SplitSession {
    /// Resolves a drop target to the split it designates
    pub fn resolve_target(&self, target: &DropTarget) -> Option<SplitId> {
        match target {
            DropTarget::Split(split_id) => self.split(*split_id).map(|split| split.id),
            DropTarget::Item(item_id) => self.split_of(item_id),
            DropTarget::Outside => None,
        }
    }

    /// Commits a drag gesture: moves `item_id` from wherever it is to the
    /// split designated by `target`.
    ///
    /// Anything that cannot be resolved leaves the session untouched.
    pub fn move_item(&mut self, item_id: &ItemId, target: &DropTarget) -> bool {
        let Some(from) = self.split_of(item_id) else {
            debug!("Ignoring drop of unassigned item {}", item_id);
            return false;
        };

        let Some(to) = self.resolve_target(target) else {
            debug!("Ignoring drop of {}: no destination for {:?}", item_id, target);
            return false;
        };

        self.transfer_item(item_id, from, to)
    }
}
