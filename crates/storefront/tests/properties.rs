#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use proptest::prelude::*;
use queens_beauty_core::{Price, Product, ProductDraft, ProductId};
use queens_beauty_storefront::{ACTIVE_OFFSET, Cart, Carousel};
use rust_decimal::Decimal;

fn product(id: i64, price: u32) -> Product {
    ProductDraft {
        name: format!("Product {id}"),
        description: String::new(),
        price: Price::from_shillings(price),
        image: None,
    }
    .into_product(ProductId::new(id))
}

fn catalog(prices: &[u32]) -> Vec<Product> {
    prices
        .iter()
        .zip(1..)
        .map(|(price, id)| product(id, *price))
        .collect()
}

#[derive(Debug, Clone)]
enum CartOp {
    Add(usize),
    Remove(usize),
    Adjust(usize, i32),
}

fn cart_op(catalog_len: usize) -> impl Strategy<Value = CartOp> {
    prop_oneof![
        (0..catalog_len).prop_map(CartOp::Add),
        (0..catalog_len).prop_map(CartOp::Remove),
        (0..catalog_len, -5i32..5).prop_map(|(i, d)| CartOp::Adjust(i, d)),
    ]
}

proptest! {
    #[test]
    fn prop_repeated_add_counts_calls(times in 1u32..50, price in 0u32..10_000) {
        let p = product(1, price);
        let mut cart = Cart::new();
        for _ in 0..times {
            cart.add(&p);
        }
        prop_assert_eq!(cart.get(p.id).unwrap().quantity(), times);
        prop_assert_eq!(cart.item_count(), times);
    }

    #[test]
    fn prop_adjust_never_drops_below_one(deltas in prop::collection::vec(any::<i32>(), 1..30)) {
        let p = product(1, 100);
        let mut cart = Cart::new();
        cart.add(&p);
        for delta in deltas {
            let quantity = cart.adjust_quantity(p.id, delta).unwrap();
            prop_assert!(quantity >= 1);
            prop_assert_eq!(cart.items().len(), 1);
        }
    }

    #[test]
    fn prop_total_matches_independent_sum(
        prices in prop::collection::vec(0u32..100_000, 1..8),
        ops in prop::collection::vec(cart_op(8), 0..60),
    ) {
        let products = catalog(&prices);
        let mut cart = Cart::new();
        for op in ops {
            match op {
                CartOp::Add(i) => {
                    if let Some(p) = products.get(i) {
                        cart.add(p);
                    }
                }
                CartOp::Remove(i) => {
                    if let Some(p) = products.get(i) {
                        cart.remove(p.id);
                    }
                }
                CartOp::Adjust(i, delta) => {
                    if let Some(p) = products.get(i) {
                        cart.adjust_quantity(p.id, delta);
                    }
                }
            }
        }

        let expected: Decimal = cart
            .items()
            .iter()
            .map(|item| item.product().price.amount() * Decimal::from(item.quantity()))
            .sum();
        prop_assert_eq!(cart.total().amount(), expected);
        prop_assert!(cart.items().iter().all(|item| item.quantity() >= 1));
    }

    #[test]
    fn prop_advance_then_retreat_restores_window(len in 1usize..20, steps in 0usize..40) {
        let prices = vec![100; len];
        let mut carousel = Carousel::new(&catalog(&prices));
        for _ in 0..steps {
            carousel.advance();
        }
        let before = carousel.ids();

        carousel.advance();
        carousel.retreat();
        prop_assert_eq!(carousel.ids(), before.clone());

        carousel.retreat();
        carousel.advance();
        prop_assert_eq!(carousel.ids(), before);
    }

    #[test]
    fn prop_jump_places_target_at_active_offset(len in 2usize..20, target in 0usize..20, steps in 0usize..20) {
        let products = catalog(&vec![100; len]);
        let target = products[target % len].id;
        let mut carousel = Carousel::new(&products);
        for _ in 0..steps {
            carousel.advance();
        }

        prop_assert!(carousel.jump_to(target, &products));
        prop_assert_eq!(carousel.ids()[ACTIVE_OFFSET], target);
        prop_assert!(!carousel.auto_advance_enabled());

        let mut ids = carousel.ids();
        ids.sort();
        let mut expected: Vec<ProductId> = products.iter().map(|p| p.id).collect();
        expected.sort();
        prop_assert_eq!(ids, expected);

        carousel.enable_auto_advance();
        prop_assert!(carousel.auto_advance_enabled());
    }
}
