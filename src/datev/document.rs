//! Accounting document generation.
//!
//! Ties resolvers and aggregation together: one order in, one accounting
//! document with revenue postings and diagnostics out.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use super::accounts::{ChartOfAccounts, revenue_account};
use super::company_code::{CompanyCode, CompanyCodeOverrides};
use super::cost_center::{CostCenter, CostCenterPair, CostCenterSlot, validate_cost_center};
use super::feature::{CompanyCodeGate, CostCenterGate, FeatureFlags};
use super::lookup::ProductLookup;
use super::messages::{self, MessageContext};
use super::price_items::{PriceItemCollection, aggregate_price_items, base_breakdown};
use super::settings::DatevSettings;
use crate::core::{MessageLog, Order};

/// The document an accounting export belongs to (invoice, credit note, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentReference {
    /// Technical document type, e.g. `invoice` or `credit_note`.
    pub document_type: String,
    pub document_number: String,
    pub date: NaiveDate,
}

impl DocumentReference {
    pub fn new(
        document_type: impl Into<String>,
        document_number: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            document_type: document_type.into(),
            document_number: document_number.into(),
            date,
        }
    }
}

/// One revenue posting of an accounting document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevenuePosting {
    /// Signed amount; negative amounts reduce revenue.
    pub amount: Decimal,
    /// `None` for tax-free orders.
    pub tax_rate: Option<Decimal>,
    pub revenue_account: u32,
    pub is_automatik: bool,
    pub company_code: Option<CompanyCode>,
    /// KOST1.
    pub cost_center_1: Option<CostCenter>,
    /// KOST2.
    pub cost_center_2: Option<CostCenter>,
}

/// Revenue postings of one order document plus the diagnostics collected
/// while building them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountingDocument {
    pub reference: DocumentReference,
    pub order_number: String,
    /// Chart the revenue accounts of `postings` belong to.
    pub chart: ChartOfAccounts,
    pub company_code: Option<CompanyCode>,
    pub postings: Vec<RevenuePosting>,
    pub messages: MessageLog,
}

impl AccountingDocument {
    /// Sum of all posting amounts; equals the order total. Saturates like
    /// [`Order::amount_total`].
    pub fn total(&self) -> Decimal {
        self.postings
            .iter()
            .fold(Decimal::ZERO, |sum, p| sum.saturating_add(p.amount))
    }
}

/// Builds [`AccountingDocument`]s from orders.
///
/// Generation is deterministic: identical inputs give identical postings and
/// identical messages in identical order.
pub struct AccountingDocumentGenerator<'a, F: ?Sized, L: ?Sized> {
    flags: &'a F,
    products: &'a L,
}

impl<'a, F, L> AccountingDocumentGenerator<'a, F, L>
where
    F: FeatureFlags + ?Sized,
    L: ProductLookup + ?Sized,
{
    pub fn new(flags: &'a F, products: &'a L) -> Self {
        Self { flags, products }
    }

    pub fn generate(
        &self,
        order: &Order,
        reference: &DocumentReference,
        settings: &DatevSettings,
        overrides: &CompanyCodeOverrides,
    ) -> AccountingDocument {
        debug!(
            order = %order.number,
            document = %reference.document_number,
            "generating accounting document"
        );

        let mut context = MessageContext::new(
            &reference.document_type,
            &reference.document_number,
            &order.number,
            &order.sales_channel.name,
        );
        if let Some(customer) = &order.customer {
            context = context.customer(&customer.name);
            if let Some(group) = &customer.group {
                context = context.customer_group(group);
            }
        }

        let mut log = MessageLog::new();

        let company = CompanyCodeGate::new(self.flags).resolve(settings, overrides, &context);
        log.extend(company.messages);

        let (sales_channel_cost_center, attributed) = if CostCenterGate::new(self.flags).is_open(settings) {
            let sales_channel = validate_cost_center(
                settings.sales_channel_cost_center.as_deref(),
                CostCenterSlot::SalesChannel,
                &context,
                &mut log,
            );
            let attributed = self.attribute_to_cost_centers(order, &context, &mut log);
            (sales_channel, attributed)
        } else {
            (None, PriceItemCollection::new())
        };

        let postings: Vec<RevenuePosting> = base_breakdown(order)
            .merge(attributed)
            .without_zero_amounts()
            .into_iter()
            .map(|item| {
                let mapping = revenue_account(settings.chart, item.tax_rate);
                let pair = CostCenterPair::ordered(
                    sales_channel_cost_center.clone(),
                    item.cost_center,
                    settings.switch_cost_centers_order,
                );
                RevenuePosting {
                    amount: item.amount,
                    tax_rate: item.tax_rate,
                    revenue_account: mapping.revenue_account,
                    is_automatik: mapping.is_automatik,
                    company_code: company.company_code,
                    cost_center_1: pair.first,
                    cost_center_2: pair.second,
                }
            })
            .collect();

        debug!(
            order = %order.number,
            postings = postings.len(),
            messages = log.len(),
            "accounting document generated"
        );

        AccountingDocument {
            reference: reference.clone(),
            order_number: order.number.clone(),
            chart: settings.chart,
            company_code: company.company_code,
            postings,
            messages: log,
        }
    }

    /// Aggregate product lines by product cost center. Each product is looked
    /// up and validated once, in order of first appearance.
    fn attribute_to_cost_centers(
        &self,
        order: &Order,
        context: &MessageContext<'_>,
        log: &mut MessageLog,
    ) -> PriceItemCollection {
        let mut resolved: BTreeMap<String, Option<CostCenter>> = BTreeMap::new();

        aggregate_price_items(
            &order.lines,
            |product_id| {
                if let Some(cost_center) = resolved.get(product_id) {
                    return cost_center.clone();
                }
                let cost_center = match self.products.find(product_id) {
                    Some(product) => validate_cost_center(
                        product.cost_center.as_deref(),
                        CostCenterSlot::Product,
                        &context.product(&product.product_number),
                        log,
                    ),
                    None => {
                        log.push(messages::product_not_found(product_id, context));
                        None
                    }
                };
                resolved.insert(product_id.to_string(), cost_center.clone());
                cost_center
            },
            order.tax_status,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{OrderBuilder, OrderLineBuilder};
    use crate::datev::feature::StaticFeatureFlags;
    use crate::datev::lookup::ProductCostCenter;
    use crate::datev::settings::DatevSettingsBuilder;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn reference() -> DocumentReference {
        DocumentReference::new("invoice", "1000", NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
    }

    fn products() -> HashMap<String, ProductCostCenter> {
        HashMap::from([
            ("p-a".to_string(), ProductCostCenter::new("SW-A", None)),
            ("p-b".to_string(), ProductCostCenter::new("SW-B", Some("WAREHOUSE1"))),
            ("p-bad".to_string(), ProductCostCenter::new("SW-BAD", Some("A-B"))),
        ])
    }

    #[test]
    fn disabled_features_give_plain_tax_breakdown() {
        let order = OrderBuilder::new("10001", "sc", "Storefront")
            .add_line(OrderLineBuilder::new("1", "A", 1, dec!(100)).product("p-a").tax(dec!(19)).build())
            .add_line(OrderLineBuilder::new("2", "B", 1, dec!(50)).product("p-b").tax(dec!(19)).build())
            .build();
        let flags = StaticFeatureFlags::new();
        let products = products();
        let doc = AccountingDocumentGenerator::new(&flags, &products).generate(
            &order,
            &reference(),
            &DatevSettingsBuilder::new().company_codes(1).cost_centers(None).build(),
            &CompanyCodeOverrides::default(),
        );
        assert_eq!(doc.postings.len(), 1);
        assert_eq!(doc.postings[0].amount, dec!(150));
        assert_eq!(doc.postings[0].revenue_account, 8400);
        assert_eq!(doc.company_code, None);
        assert!(doc.messages.is_empty());
    }

    #[test]
    fn invalid_product_cost_center_is_reported_once() {
        let order = OrderBuilder::new("10001", "sc", "Storefront")
            .add_line(OrderLineBuilder::new("1", "X", 1, dec!(10)).product("p-bad").tax(dec!(19)).build())
            .add_line(OrderLineBuilder::new("2", "X", 2, dec!(10)).product("p-bad").tax(dec!(19)).build())
            .build();
        let flags = StaticFeatureFlags::all();
        let products = products();
        let doc = AccountingDocumentGenerator::new(&flags, &products).generate(
            &order,
            &reference(),
            &DatevSettingsBuilder::new().cost_centers(None).build(),
            &CompanyCodeOverrides::default(),
        );
        assert_eq!(doc.messages.len(), 1);
        let msg = doc.messages.iter().next().unwrap();
        assert_eq!(msg.code(), messages::COST_CENTER_PRODUCT_INVALID);
        assert_eq!(msg.meta_value("productNumber"), Some("SW-BAD"));
        assert_eq!(doc.postings.len(), 1);
        assert_eq!(doc.total(), dec!(30));
    }
}
