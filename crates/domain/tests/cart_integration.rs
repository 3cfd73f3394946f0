//! Integration tests for the cart engine.
//!
//! These tests drive a cart session against the built-in catalog and check
//! the kit and stock caps across whole sequences of changes.

use std::num::NonZeroU32;

use common::{ItemId, KitId};
use domain::{
    CartError, CartEvent, CartSession, CartState, CatalogSnapshot, KitDefinition, MenuItem, Money,
    default_catalog,
};

fn kit(meals: u32) -> KitDefinition {
    KitDefinition::new(
        format!("kit{meals}"),
        format!("Kit {meals}"),
        NonZeroU32::new(meals).unwrap(),
        Money::from_reais(17 * i64::from(meals)),
    )
}

fn session_with_kit(meals: u32) -> CartSession {
    let mut session = CartSession::new();
    session.select_kit(kit(meals));
    session
}

mod scenarios {
    use super::*;

    #[test]
    fn five_adds_fill_kit_five() {
        let mut session = session_with_kit(5);
        let item = MenuItem::new("1", "Bobó de Frango", 10);

        for n in 1..=4 {
            let events = session.add_one(&item).unwrap();
            assert!(!events.iter().any(CartEvent::is_limit_notification));
            assert_eq!(session.cart().total_reserved(), n);
            assert!(!session.cart().is_complete());
        }

        let events = session.add_one(&item).unwrap();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], CartEvent::QuantityChanged(_)));
        assert!(events[1].is_limit_notification());
        assert!(session.cart().is_complete());
        assert!(session.cart().can_checkout());
    }

    #[test]
    fn third_add_hits_item_stock() {
        let mut session = session_with_kit(5);
        let item = MenuItem::new("9", "Feijuca Fit", 2);

        session.add_one(&item).unwrap();
        session.add_one(&item).unwrap();

        let err = session.add_one(&item).unwrap_err();
        assert_eq!(
            err,
            CartError::ItemStockLimitReached {
                item_id: ItemId::new("9"),
                stock: 2
            }
        );
        assert_eq!(session.cart().quantity_of(&item.id), 2);
        assert!(session.cart().is_item_at_stock_limit(&item));
    }

    #[test]
    fn full_unit_kit_rejects_second_item() {
        let mut session = session_with_kit(1);
        let x = MenuItem::new("1", "Bobó de Frango", 10);
        let y = MenuItem::new("5", "Kibe de Forno", 10);
        session.add_one(&x).unwrap();
        let before = session.cart().clone();

        let err = session.add_one(&y).unwrap_err();
        assert!(err.is_limit_notification());
        assert_eq!(session.cart(), &before);
        assert_eq!(session.cart().quantity_of(&y.id), 0);
    }

    #[test]
    fn selecting_new_kit_clears_cart() {
        let mut session = session_with_kit(5);
        let item = MenuItem::new("1", "Bobó de Frango", 10);
        session.add_one(&item).unwrap();
        session.add_one(&item).unwrap();

        session.select_kit(kit(10));

        assert!(session.cart().is_empty());
        assert_eq!(session.cart().total_reserved(), 0);
        assert_eq!(session.cart().remaining(), 10);
        assert_eq!(session.cart().state(), CartState::Empty);
    }
}

mod quantity_changes {
    use super::*;

    #[test]
    fn decrement_to_zero_removes_entry() {
        let catalog = default_catalog();
        let mut session = session_with_kit(5);
        let id = ItemId::new("3");

        session.change_quantity(&id, 2, &catalog).unwrap();
        session.change_quantity(&id, -1, &catalog).unwrap();
        assert_eq!(session.cart().quantity_of(&id), 1);

        session.change_quantity(&id, -1, &catalog).unwrap();
        assert!(session.cart().items().iter().all(|line| line.id() != &id));
    }

    #[test]
    fn decrement_absent_item_has_no_effect() {
        let catalog = default_catalog();
        let mut session = session_with_kit(5);
        let before = session.cart().clone();

        let events = session
            .change_quantity(&ItemId::new("1"), -1, &catalog)
            .unwrap();

        assert!(events.is_empty());
        assert_eq!(session.cart(), &before);
    }

    #[test]
    fn increase_without_kit_is_rejected() {
        let catalog = default_catalog();
        let mut session = CartSession::new();
        assert_eq!(
            session.change_quantity(&ItemId::new("1"), 1, &catalog),
            Err(CartError::NoKitSelected)
        );
    }

    #[test]
    fn kit_lookup_by_id() {
        let catalog = default_catalog();
        let kit5 = catalog.kit(&KitId::from("kit5")).unwrap().clone();

        let mut session = CartSession::new();
        session.select_kit(kit5);
        session
            .change_quantity(&ItemId::new("1"), 5, &catalog)
            .unwrap();
        assert!(session.cart().can_checkout());
    }
}

mod invariants {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Add(usize),
        Change(usize, i32),
        Clear,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0..4usize).prop_map(Op::Add),
            4 => (0..4usize, -3..=3i32).prop_map(|(item, delta)| Op::Change(item, delta)),
            1 => Just(Op::Clear),
        ]
    }

    fn small_catalog() -> CatalogSnapshot {
        CatalogSnapshot::new(
            vec![kit(5)],
            vec![
                MenuItem::new("1", "Bobó de Frango", 3),
                MenuItem::new("2", "Escondidinho", 1),
                MenuItem::new("3", "Kibe de Forno", 0),
                MenuItem::new("4", "Rubacão Fit", 6),
            ],
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: kit and stock caps hold after every step, and checkout
        /// is allowed exactly when the kit is full.
        #[test]
        fn caps_hold_for_any_sequence(ops in prop::collection::vec(op_strategy(), 0..200)) {
            let catalog = small_catalog();
            let mut session = session_with_kit(5);

            for op in ops {
                // Rejections are expected; only the caps matter here.
                let _ = match op {
                    Op::Add(index) => session.add_one(&catalog.items()[index]),
                    Op::Change(index, delta) => {
                        let id = catalog.items()[index].id.clone();
                        session.change_quantity(&id, delta, &catalog)
                    }
                    Op::Clear => Ok(session.clear()),
                };

                let cart = session.cart();
                prop_assert!(cart.total_reserved() <= 5);
                for line in cart.items() {
                    prop_assert!(line.quantity > 0);
                    prop_assert!(line.quantity <= catalog.stock_of(line.id()).unwrap_or(0));
                }
                prop_assert_eq!(cart.can_checkout(), cart.total_reserved() == 5);
            }
        }
    }
}
