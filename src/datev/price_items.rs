//! Price items: accounting amounts bucketed by cost center and tax rate.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use super::cost_center::CostCenter;
use crate::core::{LineKind, Order, OrderLine, TaxStatus};

/// An aggregated accounting amount.
///
/// `tax_rate` is `None` for tax-free orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceItem {
    pub cost_center: Option<CostCenter>,
    pub tax_rate: Option<Decimal>,
    pub amount: Decimal,
}

impl PriceItem {
    pub fn new(cost_center: Option<CostCenter>, tax_rate: Option<Decimal>, amount: Decimal) -> Self {
        Self {
            cost_center,
            tax_rate,
            amount,
        }
    }

    fn key(&self) -> PriceKey {
        (self.cost_center.clone(), self.tax_rate)
    }
}

// Decimal orders numerically, so 19 and 19.00 share a key.
type PriceKey = (Option<CostCenter>, Option<Decimal>);

/// Price items keyed by `(cost center, tax rate)`.
///
/// Adding an amount for an existing key sums into that item; new keys are
/// appended, so iteration follows first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PriceItemCollection {
    items: Vec<PriceItem>,
    #[serde(skip)]
    index: BTreeMap<PriceKey, usize>,
}

impl PriceItemCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an amount to the item with the same key, or append a new item.
    ///
    /// Sums saturate at [`Decimal::MAX`] / [`Decimal::MIN`].
    pub fn add(&mut self, item: PriceItem) {
        match self.index.get(&item.key()) {
            Some(&pos) => {
                let existing = &mut self.items[pos];
                existing.amount = existing.amount.saturating_add(item.amount);
            }
            None => {
                self.index.insert(item.key(), self.items.len());
                self.items.push(item);
            }
        }
    }

    /// By-value [`add`](Self::add), for folding.
    pub fn with(mut self, item: PriceItem) -> Self {
        self.add(item);
        self
    }

    /// Add every item of `other`, in its order.
    pub fn merge(self, other: PriceItemCollection) -> Self {
        other.items.into_iter().fold(self, Self::with)
    }

    /// Drop items whose amount is exactly zero.
    pub fn without_zero_amounts(self) -> Self {
        self.items
            .into_iter()
            .filter(|item| !item.amount.is_zero())
            .collect()
    }

    pub fn get(&self, cost_center: Option<&CostCenter>, tax_rate: Option<Decimal>) -> Option<&PriceItem> {
        self.index
            .get(&(cost_center.cloned(), tax_rate))
            .map(|&pos| &self.items[pos])
    }

    /// Sum of all amounts at `tax_rate`, across all cost centers.
    pub fn total_for_rate(&self, tax_rate: Option<Decimal>) -> Decimal {
        self.items
            .iter()
            .filter(|item| item.tax_rate == tax_rate)
            .fold(Decimal::ZERO, |sum, item| sum.saturating_add(item.amount))
    }

    /// Distinct tax rates in order of first appearance.
    pub fn tax_rates(&self) -> Vec<Option<Decimal>> {
        let mut rates: Vec<Option<Decimal>> = Vec::new();
        for item in &self.items {
            if !rates.contains(&item.tax_rate) {
                rates.push(item.tax_rate);
            }
        }
        rates
    }

    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .fold(Decimal::ZERO, |sum, item| sum.saturating_add(item.amount))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PriceItem> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<PriceItem> {
        self.items
    }
}

impl FromIterator<PriceItem> for PriceItemCollection {
    fn from_iter<T: IntoIterator<Item = PriceItem>>(iter: T) -> Self {
        iter.into_iter().fold(Self::new(), Self::with)
    }
}

impl IntoIterator for PriceItemCollection {
    type Item = PriceItem;
    type IntoIter = std::vec::IntoIter<PriceItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a PriceItemCollection {
    type Item = &'a PriceItem;
    type IntoIter = std::slice::Iter<'a, PriceItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Attribute an amount to a cost center and take it back from "no cost
/// center" at the same tax rate.
fn offsetting(cost_center: &CostCenter, tax_rate: Option<Decimal>, amount: Decimal) -> [PriceItem; 2] {
    [
        PriceItem::new(Some(cost_center.clone()), tax_rate, amount),
        PriceItem::new(None, tax_rate, -amount),
    ]
}

/// Fold order lines into cost-center price items.
///
/// `cost_center_of` maps a product id to that product's cost center. Only
/// [`LineKind::Product`] lines with a product id are looked up; lines whose
/// product has no cost center contribute nothing.
/// Every attributed amount is mirrored by a negative amount without cost
/// center, so the result sums to zero per tax rate and can be merged into
/// the order's base breakdown (see [`base_breakdown`]) without changing
/// totals. Zero-amount items are removed.
pub fn aggregate_price_items<F>(
    lines: &[OrderLine],
    mut cost_center_of: F,
    tax_status: TaxStatus,
) -> PriceItemCollection
where
    F: FnMut(&str) -> Option<CostCenter>,
{
    let mut contributions = Vec::new();

    for line in lines {
        if line.kind != LineKind::Product {
            continue;
        }
        let Some(product_id) = line.product_id.as_deref() else {
            continue;
        };
        let Some(cost_center) = cost_center_of(product_id) else {
            continue;
        };

        match tax_status {
            TaxStatus::Free => {
                contributions.extend(offsetting(&cost_center, None, line.total_price));
            }
            TaxStatus::Gross | TaxStatus::Net => {
                for tax in &line.calculated_taxes {
                    contributions.extend(offsetting(&cost_center, Some(tax.tax_rate), tax.price));
                }
            }
        }
    }

    contributions
        .into_iter()
        .fold(PriceItemCollection::new(), PriceItemCollection::with)
        .without_zero_amounts()
}

/// The order's amounts without cost centers: one item per tax rate, or a
/// single untaxed item for tax-free orders.
///
/// Lines of a taxed order that carry no tax breakdown land in the untaxed
/// bucket so no amount is lost.
pub fn base_breakdown(order: &Order) -> PriceItemCollection {
    match order.tax_status {
        TaxStatus::Free => PriceItemCollection::new().with(PriceItem::new(None, None, order.amount_total())),
        TaxStatus::Gross | TaxStatus::Net => order
            .lines
            .iter()
            .flat_map(|line| {
                if line.calculated_taxes.is_empty() {
                    vec![PriceItem::new(None, None, line.total_price)]
                } else {
                    line.calculated_taxes
                        .iter()
                        .map(|tax| PriceItem::new(None, Some(tax.tax_rate), tax.price))
                        .collect()
                }
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CalculatedTax, OrderBuilder, OrderLineBuilder};
    use rust_decimal_macros::dec;

    fn cc(value: &str) -> CostCenter {
        CostCenter::parse(value).unwrap().unwrap()
    }

    #[test]
    fn same_key_is_merged() {
        let items = PriceItemCollection::new()
            .with(PriceItem::new(Some(cc("A")), Some(dec!(19)), dec!(10)))
            .with(PriceItem::new(None, Some(dec!(19)), dec!(5)))
            .with(PriceItem::new(Some(cc("A")), Some(dec!(19.00)), dec!(2.50)));
        assert_eq!(items.len(), 2);
        assert_eq!(
            items.get(Some(&cc("A")), Some(dec!(19))).map(|i| i.amount),
            Some(dec!(12.50))
        );
    }

    #[test]
    fn none_and_zero_rate_are_different_keys() {
        let items = PriceItemCollection::new()
            .with(PriceItem::new(None, None, dec!(1)))
            .with(PriceItem::new(None, Some(dec!(0)), dec!(1)));
        assert_eq!(items.len(), 2);
        assert_eq!(items.tax_rates(), vec![None, Some(dec!(0))]);
    }

    #[test]
    fn pruning_removes_only_zero_amounts() {
        let items = PriceItemCollection::new()
            .with(PriceItem::new(Some(cc("A")), Some(dec!(7)), dec!(3)))
            .with(PriceItem::new(Some(cc("A")), Some(dec!(7)), dec!(-3.00)))
            .with(PriceItem::new(None, Some(dec!(7)), dec!(1)))
            .without_zero_amounts();
        assert_eq!(items.len(), 1);
        assert_eq!(items.get(Some(&cc("A")), Some(dec!(7))), None);
        assert!(items.get(None, Some(dec!(7))).is_some());
    }

    #[test]
    fn mixed_rate_line_is_split() {
        let lines = vec![
            OrderLineBuilder::new("1", "Bundle", 1, dec!(30))
                .product("p1")
                .add_tax(CalculatedTax::new(dec!(19), dec!(20)))
                .add_tax(CalculatedTax::new(dec!(7), dec!(10)))
                .build(),
        ];
        let items = aggregate_price_items(&lines, |_| Some(cc("MIX")), TaxStatus::Gross);
        let amounts: Vec<_> = items.iter().map(|i| i.amount).collect();
        assert_eq!(amounts, [dec!(20), dec!(-20), dec!(10), dec!(-10)]);
        assert_eq!(items.total_for_rate(Some(dec!(19))), dec!(0));
        assert_eq!(items.total_for_rate(Some(dec!(7))), dec!(0));
    }

    #[test]
    fn tax_free_uses_line_total_without_rate() {
        let lines = vec![
            OrderLineBuilder::new("1", "Export", 2, dec!(40))
                .product("p1")
                .tax(dec!(19))
                .build(),
        ];
        let items = aggregate_price_items(&lines, |_| Some(cc("EXPORT")), TaxStatus::Free);
        assert_eq!(items.len(), 2);
        assert_eq!(
            items.get(Some(&cc("EXPORT")), None).map(|i| i.amount),
            Some(dec!(80))
        );
        assert_eq!(items.get(None, None).map(|i| i.amount), Some(dec!(-80)));
    }

    #[test]
    fn lines_without_product_are_skipped() {
        let mut asked = Vec::new();
        let lines = vec![
            OrderLineBuilder::new("1", "Gutschein", 1, dec!(-5)).tax(dec!(19)).build(),
            OrderLineBuilder::new("2", "Ware", 1, dec!(5)).product("p1").tax(dec!(19)).build(),
        ];
        let items = aggregate_price_items(
            &lines,
            |id| {
                asked.push(id.to_string());
                None
            },
            TaxStatus::Gross,
        );
        assert!(items.is_empty());
        assert_eq!(asked, ["p1"]);
    }

    #[test]
    fn only_product_lines_are_attributed() {
        let lines = vec![
            OrderLineBuilder::new("1", "Rabatt", 1, dec!(-10))
                .product("p1")
                .kind(LineKind::Promotion)
                .tax(dec!(19))
                .build(),
            OrderLineBuilder::new("2", "Ware", 1, dec!(40)).product("p1").tax(dec!(19)).build(),
        ];
        let items = aggregate_price_items(&lines, |_| Some(cc("LAGER")), TaxStatus::Gross);
        assert_eq!(
            items.get(Some(&cc("LAGER")), Some(dec!(19))).map(|i| i.amount),
            Some(dec!(40))
        );
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn sums_saturate_at_decimal_bounds() {
        let line = OrderLineBuilder::new("1", "X", 1, Decimal::MAX)
            .product("p1")
            .tax(dec!(19))
            .build();
        let lines = vec![line.clone(), line];
        let items = aggregate_price_items(&lines, |_| Some(cc("A")), TaxStatus::Gross);
        assert_eq!(
            items.get(Some(&cc("A")), Some(dec!(19))).map(|i| i.amount),
            Some(Decimal::MAX)
        );
        assert_eq!(items.get(None, Some(dec!(19))).map(|i| i.amount), Some(-Decimal::MAX));
        assert_eq!(items.total(), Decimal::ZERO);
    }

    #[test]
    fn base_breakdown_per_rate() {
        let order = OrderBuilder::new("10001", "sc", "Storefront")
            .add_line(OrderLineBuilder::new("1", "A", 1, dec!(100)).tax(dec!(19)).build())
            .add_line(OrderLineBuilder::new("2", "B", 1, dec!(10)).tax(dec!(7)).build())
            .add_line(OrderLineBuilder::new("3", "C", 1, dec!(50)).tax(dec!(19)).build())
            .add_line(OrderLineBuilder::new("4", "D", 1, dec!(1)).build())
            .build();
        let base = base_breakdown(&order);
        assert_eq!(base.tax_rates(), vec![Some(dec!(19)), Some(dec!(7)), None]);
        assert_eq!(base.total_for_rate(Some(dec!(19))), dec!(150));
        assert_eq!(base.total(), order.amount_total());
    }
}
