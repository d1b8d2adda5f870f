use super::{Split, SplitId, SplitSession, MIN_SPLITS};
use crate::domain::ItemId;
use crate::math::sum_amounts;
use rust_decimal::Decimal;
use tracing::{debug, info};

impl SplitSession {
    /// Appends an empty, unpaid split with the given label
    pub fn create_split(&mut self, label: impl Into<String>) -> SplitId {
        let id = self.allocate_id();
        let split = Split::new(id, label, Vec::new());

        info!("Created {} ({})", id, split.label);
        self.splits.push(split);
        id
    }

    /// Appends an empty split labelled from the configured prefix
    pub fn add_split(&mut self) -> SplitId {
        let label = self.default_label(SplitId(self.next_id));
        self.create_split(label)
    }

    /// Removes a split, merging its items into the first remaining split.
    ///
    /// No-op when the session would drop below [`MIN_SPLITS`] or the split
    /// does not exist. The target receives the items whatever its paid state.
    pub fn remove_split(&mut self, split_id: SplitId) -> bool {
        if self.splits.len() <= MIN_SPLITS {
            debug!("Ignoring removal of {}: session keeps at least {} splits", split_id, MIN_SPLITS);
            return false;
        }

        let Some(position) = self.position_of(split_id) else {
            debug!("Ignoring removal of unknown {}", split_id);
            return false;
        };

        let removed = self.splits.remove(position);
        let target = &mut self.splits[0];
        let merged = removed.item_ids.len();
        target.item_ids.extend(removed.item_ids);

        info!(
            "Removed {} ({}), merged {} items into {}",
            removed.id, removed.label, merged, target.id
        );

        self.check_completion();
        true
    }

    /// Moves an item from one split to the end of another.
    ///
    /// No-op when the splits are the same, either split is missing or
    /// settled, or the item is not currently in `from`.
    pub fn transfer_item(&mut self, item_id: &ItemId, from: SplitId, to: SplitId) -> bool {
        if from == to {
            debug!("Ignoring transfer of {} onto its own split {}", item_id, from);
            return false;
        }

        let (Some(from_pos), Some(to_pos)) = (self.position_of(from), self.position_of(to)) else {
            debug!("Ignoring transfer of {}: {} or {} does not exist", item_id, from, to);
            return false;
        };

        if self.splits[from_pos].is_paid() || self.splits[to_pos].is_paid() {
            debug!("Ignoring transfer of {}: {} or {} is already paid", item_id, from, to);
            return false;
        }

        let Some(item_pos) = self.splits[from_pos]
            .item_ids
            .iter()
            .position(|id| id == item_id)
        else {
            debug!("Ignoring transfer: {} is not in {}", item_id, from);
            return false;
        };

        let moved = self.splits[from_pos].item_ids.remove(item_pos);
        self.splits[to_pos].item_ids.push(moved);

        info!("Moved item {} from {} to {}", item_id, from, to);

        self.check_completion();
        true
    }

    /// Sum of the line totals currently assigned to a split.
    ///
    /// Ids missing from the registry contribute zero; an unknown split totals zero.
    pub fn split_total(&self, split_id: SplitId) -> Decimal {
        self.split(split_id)
            .and_then(|split| {
                sum_amounts(split.item_ids.iter().map(|id| self.items.line_total_of(id)))
            })
            // A split holds a subset of the registry, bounded by its checked total
            .unwrap_or(Decimal::ZERO)
    }

    /// Session total, derived from the registry
    pub fn total(&self) -> Decimal {
        self.items.total()
    }
}
