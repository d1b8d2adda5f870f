use proptest::prelude::*;
use rust_decimal::Decimal;
use splitcheck_core::{
    DropTarget, ItemId, LineItems, OrderItem, PaymentMethod, SessionConfig, SplitId, SplitSession,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Op {
    Create,
    Remove(usize),
    Transfer { item: usize, from: usize, to: usize },
    Drop { item: usize, onto_item: Option<usize>, split: usize },
    Pay { split: usize, method: usize },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Create),
        (0usize..8).prop_map(Op::Remove),
        (0usize..10, 0usize..8, 0usize..8).prop_map(|(item, from, to)| Op::Transfer { item, from, to }),
        (0usize..10, prop::option::of(0usize..10), 0usize..8)
            .prop_map(|(item, onto_item, split)| Op::Drop { item, onto_item, split }),
        (0usize..8, 0usize..3).prop_map(|(split, method)| Op::Pay { split, method }),
    ]
}

fn build_items(prices: &[(u32, u32)]) -> LineItems {
    let items = prices
        .iter()
        .enumerate()
        .map(|(idx, &(cents, qty))| {
            OrderItem::new(
                (idx + 1).to_string(),
                format!("Item {}", idx + 1),
                Decimal::new(i64::from(cents), 2),
                qty,
            )
        })
        .collect();
    LineItems::new(items).expect("valid items")
}

/// Out-of-range indexes map to an unknown split id
fn pick_split(session: &SplitSession, idx: usize) -> SplitId {
    let splits = session.splits();
    splits.get(idx).map(|s| s.id).unwrap_or(SplitId(999))
}

fn pick_item(idx: usize) -> ItemId {
    ItemId::new((idx + 1).to_string())
}

fn apply(session: &mut SplitSession, op: &Op) {
    match *op {
        Op::Create => {
            session.add_split();
        }
        Op::Remove(idx) => {
            let id = pick_split(session, idx);
            session.remove_split(id);
        }
        Op::Transfer { item, from, to } => {
            let from = pick_split(session, from);
            let to = pick_split(session, to);
            session.transfer_item(&pick_item(item), from, to);
        }
        Op::Drop { item, onto_item, split } => {
            let target = match onto_item {
                Some(other) => DropTarget::Item(pick_item(other)),
                None if split == 7 => DropTarget::Outside,
                None => DropTarget::Split(pick_split(session, split)),
            };
            session.move_item(&pick_item(item), &target);
        }
        Op::Pay { split, method } => {
            let id = pick_split(session, split);
            session.mark_paid(id, PaymentMethod::ALL[method]);
        }
    }
}

fn assert_partition(session: &SplitSession) {
    let mut seen = HashSet::new();
    for split in session.splits() {
        for id in &split.item_ids {
            assert!(seen.insert(id.clone()), "item {} assigned twice", id);
        }
    }
    let expected: HashSet<ItemId> = session.items().ids().cloned().collect();
    assert_eq!(seen, expected);
}

proptest! {
    #[test]
    fn partition_and_conservation_hold(
        prices in prop::collection::vec((0u32..=50_000, 1u32..=6), 0..=10),
        ops in prop::collection::vec(op_strategy(), 0..=40),
    ) {
        let mut session = SplitSession::new(build_items(&prices), SessionConfig::default());
        let total = session.total();

        for op in &ops {
            apply(&mut session, op);

            assert_partition(&session);
            prop_assert!(session.splits().len() >= splitcheck_core::MIN_SPLITS);

            let split_sum: Decimal = session
                .splits()
                .iter()
                .map(|split| session.split_total(split.id))
                .sum();
            prop_assert_eq!(split_sum, total);

            let summary = session.summary();
            prop_assert_eq!(summary.paid_total + summary.outstanding_total, summary.total);
        }
    }

    #[test]
    fn completion_notifies_at_most_once(
        prices in prop::collection::vec((1u32..=50_000, 1u32..=6), 1..=10),
        ops in prop::collection::vec(op_strategy(), 0..=40),
    ) {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let mut session = SplitSession::new(build_items(&prices), SessionConfig::default())
            .with_observer(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });

        for op in &ops {
            apply(&mut session, op);
            prop_assert!(fired.load(Ordering::SeqCst) <= 1);
        }

        let ids: Vec<SplitId> = session.splits().iter().map(|s| s.id).collect();
        for id in ids {
            session.mark_paid(id, PaymentMethod::Cash);
        }

        prop_assert!(session.is_complete());
        prop_assert_eq!(fired.load(Ordering::SeqCst), 1);
        prop_assert!(session.completion_notified());
    }

    #[test]
    fn repeated_mark_paid_changes_nothing(
        prices in prop::collection::vec((1u32..=50_000, 1u32..=6), 1..=10),
        first in 0usize..3,
        second in 0usize..3,
    ) {
        let mut session = SplitSession::new(build_items(&prices), SessionConfig::default());
        session.mark_paid(SplitId(1), PaymentMethod::ALL[first]);
        let before = session.summary();

        prop_assert!(!session.mark_paid(SplitId(1), PaymentMethod::ALL[second]));
        prop_assert_eq!(session.summary(), before);
    }
}

#[test]
fn reference_scenario() {
    let items = LineItems::new(vec![
        OrderItem::new("1", "Tacos al Pastor", Decimal::from(45), 3),
        OrderItem::new("2", "Molcajete Mixto", Decimal::from(189), 1),
    ])
    .unwrap();

    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();
    let mut session = SplitSession::new(items, SessionConfig::default()).with_observer(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let (first, second) = (SplitId(1), SplitId(2));
    assert_eq!(session.total(), Decimal::from(324));
    assert_eq!(session.split_total(first), Decimal::from(324));
    assert_eq!(session.split_total(second), Decimal::ZERO);

    assert!(session.transfer_item(&ItemId::from("1"), first, second));
    assert_eq!(session.split_total(first), Decimal::from(189));
    assert_eq!(session.split_total(second), Decimal::from(135));

    session.mark_paid(first, PaymentMethod::Card);
    assert!(!session.is_complete());
    session.mark_paid(second, PaymentMethod::Cash);
    assert!(session.is_complete());
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    session.mark_paid(second, PaymentMethod::Cash);
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[test]
fn invalid_transfer_leaves_splits_untouched() {
    let mut session = SplitSession::new(LineItems::sample(), SessionConfig::default());
    let before: Vec<Vec<ItemId>> = session.splits().iter().map(|s| s.item_ids.clone()).collect();

    assert!(!session.transfer_item(&ItemId::from("missing-item"), SplitId(1), SplitId(2)));

    let after: Vec<Vec<ItemId>> = session.splits().iter().map(|s| s.item_ids.clone()).collect();
    assert_eq!(before, after);
}

#[test]
fn two_split_session_cannot_shrink() {
    let mut session = SplitSession::new(LineItems::sample(), SessionConfig::default());
    session.move_item(&ItemId::from("3"), &DropTarget::Split(SplitId(2)));

    assert!(!session.remove_split(SplitId(1)));
    assert!(!session.remove_split(SplitId(2)));
    assert_eq!(session.splits().len(), 2);
    assert_eq!(session.split_of(&ItemId::from("3")), Some(SplitId(2)));
}

#[test]
fn order_near_decimal_limit_settles_without_overflow() {
    let items = LineItems::new(vec![
        OrderItem::new("1", "Banquete", Decimal::MAX - Decimal::ONE, 1),
        OrderItem::new("2", "Propina", Decimal::ONE, 1),
    ])
    .unwrap();
    let mut session = SplitSession::new(items, SessionConfig::default());

    session.transfer_item(&ItemId::from("2"), SplitId(1), SplitId(2));
    session.mark_paid(SplitId(1), PaymentMethod::Card);

    let summary = session.summary();
    assert_eq!(summary.total, Decimal::MAX);
    assert_eq!(summary.paid_total, Decimal::MAX - Decimal::ONE);
    assert_eq!(summary.outstanding_total, Decimal::ONE);
    assert_eq!(session.split_total(SplitId(2)), Decimal::ONE);
}

#[test]
fn overflowing_order_is_rejected_before_a_session_exists() {
    let json = r#"[{"id":"1","name":"A","unit_price":"50000000000000000000000000000","quantity":2}]"#;
    assert!(LineItems::from_json(json).is_err());
}
