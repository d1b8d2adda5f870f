pub mod partition;
pub mod transfer;

use crate::domain::{ItemId, LineItems, PaymentMethod};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use transfer::DropTarget;

/// A session never holds fewer splits than this
pub const MIN_SPLITS: usize = 2;

/// Split identifier, assigned in creation order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct SplitId(pub u32);

impl fmt::Display for SplitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "split-{}", self.0)
    }
}

/// One payer's share of the order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Split {
    /// Unique split identifier
    pub id: SplitId,

    /// Display name (e.g. "Persona 1")
    pub label: String,

    /// Items assigned to this payer, in arrival order
    pub item_ids: Vec<ItemId>,

    /// Set once the split is settled; `None` while unpaid
    pub payment: Option<PaymentMethod>,
}

impl Split {
    /// Creates a new unpaid split
    pub fn new(id: SplitId, label: impl Into<String>, item_ids: Vec<ItemId>) -> Self {
        Self {
            id,
            label: label.into(),
            item_ids,
            payment: None,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.payment.is_some()
    }

    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment
    }

    pub fn contains(&self, item_id: &ItemId) -> bool {
        self.item_ids.contains(item_id)
    }

    pub fn is_empty(&self) -> bool {
        self.item_ids.is_empty()
    }
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SessionConfig {
    /// Prefix for auto-generated split labels
    pub label_prefix: String,

    /// Currency symbol used when rendering amounts
    pub currency: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            label_prefix: "Persona".to_string(),
            currency: "$".to_string(),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> crate::Result<()> {
        if self.label_prefix.trim().is_empty() {
            return Err(crate::Error::ConfigError(
                "label_prefix must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Receives the one-shot notification that every non-empty split is paid.
///
/// The host uses it to close the table, print receipts, and so on.
pub trait SessionObserver: Send + Sync {
    fn session_completed(&self);
}

impl<F> SessionObserver for F
where
    F: Fn() + Send + Sync,
{
    fn session_completed(&self) {
        self()
    }
}

/// In-memory state of one bill-splitting session.
///
/// Owns the line-item registry and the partition of its ids across splits.
/// Every item id of the registry sits in exactly one split at all times.
pub struct SplitSession {
    pub(crate) items: LineItems,
    pub(crate) splits: Vec<Split>,
    pub(crate) config: SessionConfig,
    pub(crate) next_id: u32,
    pub(crate) observer: Option<Box<dyn SessionObserver>>,
    pub(crate) completion_notified: bool,
}

impl SplitSession {
    /// Starts a session with two splits: the first holds every item, the second is empty
    pub fn new(items: LineItems, config: SessionConfig) -> Self {
        let mut session = Self {
            items,
            splits: Vec::with_capacity(MIN_SPLITS),
            config,
            next_id: 1,
            observer: None,
            completion_notified: false,
        };

        let all_items: Vec<ItemId> = session.items.ids().cloned().collect();
        let first = session.allocate_id();
        let label = session.default_label(first);
        session.splits.push(Split::new(first, label, all_items));

        let second = session.allocate_id();
        let label = session.default_label(second);
        session.splits.push(Split::new(second, label, Vec::new()));

        // An order with nothing on it never transitions, so it never notifies
        session.completion_notified = session.is_complete();
        session
    }

    /// Installs the completion observer
    pub fn with_observer(mut self, observer: impl SessionObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn set_observer(&mut self, observer: impl SessionObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn items(&self) -> &LineItems {
        &self.items
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Splits in creation order
    pub fn splits(&self) -> &[Split] {
        &self.splits
    }

    pub fn split(&self, split_id: SplitId) -> Option<&Split> {
        self.splits.iter().find(|split| split.id == split_id)
    }

    /// Split currently holding the given item
    pub fn split_of(&self, item_id: &ItemId) -> Option<SplitId> {
        self.splits
            .iter()
            .find(|split| split.contains(item_id))
            .map(|split| split.id)
    }

    /// Whether the completion notification has already been delivered
    pub fn completion_notified(&self) -> bool {
        self.completion_notified
    }

    pub(crate) fn allocate_id(&mut self) -> SplitId {
        let id = SplitId(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn default_label(&self, split_id: SplitId) -> String {
        format!("{} {}", self.config.label_prefix, split_id.0)
    }

    pub(crate) fn position_of(&self, split_id: SplitId) -> Option<usize> {
        self.splits.iter().position(|split| split.id == split_id)
    }
}

impl fmt::Debug for SplitSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplitSession")
            .field("items", &self.items)
            .field("splits", &self.splits)
            .field("config", &self.config)
            .field("has_observer", &self.observer.is_some())
            .field("completion_notified", &self.completion_notified)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderItem;
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn create_test_items() -> LineItems {
        LineItems::new(vec![
            OrderItem::new("1", "Tacos al Pastor", Decimal::from(45), 3),
            OrderItem::new("2", "Molcajete Mixto", Decimal::from(189), 1),
        ])
        .unwrap()
    }

    #[test]
    fn test_default_session_layout() {
        let session = SplitSession::new(create_test_items(), SessionConfig::default());

        assert_eq!(session.splits().len(), MIN_SPLITS);
        let first = &session.splits()[0];
        let second = &session.splits()[1];

        assert_eq!(first.label, "Persona 1");
        assert_eq!(first.item_ids, vec![ItemId::from("1"), ItemId::from("2")]);
        assert!(!first.is_paid());

        assert_eq!(second.label, "Persona 2");
        assert!(second.is_empty());
        assert!(!session.completion_notified());
    }

    #[test]
    fn test_label_prefix_from_config() {
        let config = SessionConfig {
            label_prefix: "Guest".to_string(),
            ..SessionConfig::default()
        };
        let session = SplitSession::new(create_test_items(), config);
        assert_eq!(session.splits()[1].label, "Guest 2");
    }

    #[test]
    fn test_config_validation() {
        assert!(SessionConfig::default().validate().is_ok());

        let config = SessionConfig {
            label_prefix: "  ".to_string(),
            ..SessionConfig::default()
        };
        assert!(matches!(config.validate(), Err(crate::Error::ConfigError(_))));
    }

    #[test]
    fn test_split_of() {
        let session = SplitSession::new(create_test_items(), SessionConfig::default());
        assert_eq!(session.split_of(&ItemId::from("2")), Some(SplitId(1)));
        assert_eq!(session.split_of(&ItemId::from("9")), None);
    }

    #[test]
    fn test_empty_order_starts_complete_without_notifying() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let mut session = SplitSession::new(LineItems::default(), SessionConfig::default())
            .with_observer(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });

        assert!(session.is_complete());
        assert!(session.completion_notified());

        assert!(session.mark_paid(SplitId(1), PaymentMethod::Cash));
        let third = session.add_split();
        assert!(session.remove_split(third));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_split_id_display() {
        assert_eq!(SplitId(3).to_string(), "split-3");
    }
}
