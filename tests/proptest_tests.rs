//! Property-based tests for resolution and aggregation.
//!
//! Run with: `cargo test --test proptest_tests`

#![cfg(feature = "datev")]

use std::collections::HashMap;

use kontierung::core::*;
use kontierung::datev::*;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn context() -> MessageContext<'static> {
    MessageContext::new("invoice", "1000", "10001", "Storefront")
        .customer("Kunde AG")
        .customer_group("Händler")
}

// ── Proptest Strategies ─────────────────────────────────────────────────────

/// Override values: mostly short digit strings, some garbage.
fn arb_override() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop_oneof![
        "[0-9]{1,3}",
        "[0-9]{2}",
        "[ a-z0-9-]{0,4}",
    ])
}

/// Cost center candidates around the length and charset boundaries.
fn arb_cost_center() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop_oneof![
        "[A-Za-z0-9_ ]{1,40}",
        "[A-Za-z0-9_ ./äö-]{1,12}",
    ])
}

/// Signed price (-999.99 to 999.99).
fn arb_price() -> impl Strategy<Value = Decimal> {
    (-99_999i64..=99_999i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_rate() -> impl Strategy<Value = Decimal> {
    prop_oneof![Just(dec!(0)), Just(dec!(7)), Just(dec!(19))]
}

fn arb_tax_status() -> impl Strategy<Value = TaxStatus> {
    prop_oneof![
        Just(TaxStatus::Gross),
        Just(TaxStatus::Net),
        Just(TaxStatus::Free)
    ]
}

/// Product lines over a small product pool so cost centers repeat.
fn arb_lines() -> impl Strategy<Value = Vec<OrderLine>> {
    prop::collection::vec((0usize..4, 1u32..=5, arb_price(), arb_rate()), 1..=8).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (product, quantity, price, rate))| {
                OrderLineBuilder::new(format!("{}", i + 1), format!("Item {}", i + 1), quantity, price)
                    .product(format!("p-{product}"))
                    .tax(rate)
                    .build()
            })
            .collect()
    })
}

/// Products p-0 and p-1 carry cost centers, p-2 and p-3 do not.
fn product_cost_centers() -> HashMap<String, CostCenter> {
    [("p-0", "LAGER"), ("p-1", "BUECHER")]
        .into_iter()
        .map(|(id, cc)| (id.to_string(), CostCenter::parse(cc).unwrap().unwrap()))
        .collect()
}

fn aggregate(lines: &[OrderLine], status: TaxStatus) -> PriceItemCollection {
    let map = product_cost_centers();
    aggregate_price_items(lines, |id| map.get(id).cloned(), status)
}

// ── Property Tests ──────────────────────────────────────────────────────────

proptest! {
    /// The first valid level wins; each rejected level above it logs one warning.
    #[test]
    fn company_code_precedence(
        customer in arb_override(),
        group in arb_override(),
        default in -10i64..=120,
    ) {
        let overrides = CompanyCodeOverrides::new(customer.as_deref(), group.as_deref());
        let r = resolve_company_code(default, &overrides, &context());

        let mut expected = None;
        let mut rejected = 0;
        for candidate in [customer.as_deref(), group.as_deref()].into_iter().flatten() {
            match CompanyCode::parse_override(candidate) {
                Ok(code) => {
                    expected = Some(code);
                    break;
                }
                Err(_) => rejected += 1,
            }
        }
        if expected.is_none() {
            match CompanyCode::from_default(default) {
                Ok(code) => expected = Some(code),
                Err(_) => rejected += 1,
            }
        }

        prop_assert_eq!(r.company_code, expected);
        prop_assert_eq!(r.messages.len(), rejected);
        prop_assert!(r.company_code.is_none_or(|c| c.value() <= CompanyCode::MAX));
    }

    /// Accepted cost centers never exceed the length limit or the charset.
    #[test]
    fn accepted_cost_centers_are_well_formed(value in "\\PC{0,40}") {
        if let Ok(Some(cc)) = CostCenter::parse(&value) {
            prop_assert!(cc.as_str().chars().count() <= CostCenter::MAX_LENGTH);
            prop_assert!(
                cc.as_str()
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ' ')
            );
        }
    }

    /// Switching the order transposes the pair and changes nothing else.
    #[test]
    fn switch_transposes_pair(sc in arb_cost_center(), product in arb_cost_center()) {
        let straight = resolve_cost_centers(sc.as_deref(), product.as_deref(), false, &context());
        let switched = resolve_cost_centers(sc.as_deref(), product.as_deref(), true, &context());

        prop_assert_eq!(&straight.pair.first, &switched.pair.second);
        prop_assert_eq!(&straight.pair.second, &switched.pair.first);
        prop_assert_eq!(straight.messages, switched.messages);
    }

    /// Every tax rate bucket of the aggregate nets to zero.
    #[test]
    fn aggregate_is_zero_sum_per_rate(lines in arb_lines(), status in arb_tax_status()) {
        let items = aggregate(&lines, status);

        for rate in items.tax_rates() {
            prop_assert_eq!(items.total_for_rate(rate), Decimal::ZERO);
        }
        prop_assert!(items.iter().all(|i| !i.amount.is_zero()));
        if status == TaxStatus::Free {
            prop_assert!(items.iter().all(|i| i.tax_rate.is_none()));
        }
    }

    /// Merging the aggregate into the base breakdown keeps the order total.
    #[test]
    fn merged_breakdown_keeps_order_total(lines in arb_lines(), status in arb_tax_status()) {
        let mut builder = OrderBuilder::new("10001", "sc", "Storefront").tax_status(status);
        for line in lines {
            builder = builder.add_line(line);
        }
        let order = builder.build();

        let merged = base_breakdown(&order)
            .merge(aggregate(&order.lines, order.tax_status))
            .without_zero_amounts();

        prop_assert_eq!(merged.total(), order.amount_total());
    }

    /// Same input, same items in the same order.
    #[test]
    fn aggregation_is_deterministic(lines in arb_lines(), status in arb_tax_status()) {
        prop_assert_eq!(
            aggregate(&lines, status).into_vec(),
            aggregate(&lines, status).into_vec()
        );
    }
}
