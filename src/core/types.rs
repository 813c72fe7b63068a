use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How the prices of an order are to be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxStatus {
    /// Prices include tax.
    Gross,
    /// Prices exclude tax.
    Net,
    /// Tax-free order (e.g. export); amounts carry no tax rate.
    Free,
}

/// Kind of order line.
///
/// Only [`LineKind::Product`] lines can carry a product cost center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Product,
    Custom,
    Promotion,
    Credit,
}

/// Portion of a line's total price at one tax rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatedTax {
    /// Tax rate in percent (e.g. 19).
    pub tax_rate: Decimal,
    /// Amount of the line's price taxed at this rate.
    pub price: Decimal,
}

impl CalculatedTax {
    pub fn new(tax_rate: Decimal, price: Decimal) -> Self {
        Self { tax_rate, price }
    }
}

/// An order line, reduced to what cost allocation needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Line identifier, unique within the order.
    pub id: String,
    /// Display label.
    pub label: String,
    pub kind: LineKind,
    /// Referenced product, `None` for custom lines or deleted products.
    pub product_id: Option<String>,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub total_price: Decimal,
    /// Per-tax-rate breakdown of `total_price`. Mixed-rate lines have several.
    pub calculated_taxes: Vec<CalculatedTax>,
}

/// Builder for [`OrderLine`].
///
/// A defaulted total saturates instead of overflowing, so amounts near
/// [`Decimal::MAX`] are clamped rather than panicking.
///
/// ```
/// use kontierung::core::*;
/// use rust_decimal_macros::dec;
///
/// let line = OrderLineBuilder::new("1", "Palette", 2, dec!(24.95))
///     .product("0190c5ba")
///     .tax(dec!(19))
///     .build();
///
/// assert_eq!(line.total_price, dec!(49.90));
/// assert_eq!(line.calculated_taxes, vec![CalculatedTax::new(dec!(19), dec!(49.90))]);
/// ```
pub struct OrderLineBuilder {
    id: String,
    label: String,
    kind: LineKind,
    product_id: Option<String>,
    unit_price: Decimal,
    quantity: u32,
    total_price: Option<Decimal>,
    tax_rate: Option<Decimal>,
    calculated_taxes: Vec<CalculatedTax>,
}

impl OrderLineBuilder {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        quantity: u32,
        unit_price: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: LineKind::Custom,
            product_id: None,
            unit_price,
            quantity,
            total_price: None,
            tax_rate: None,
            calculated_taxes: Vec::new(),
        }
    }

    /// Reference a product; also marks the line as [`LineKind::Product`].
    pub fn product(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self.kind = LineKind::Product;
        self
    }

    pub fn kind(mut self, kind: LineKind) -> Self {
        self.kind = kind;
        self
    }

    /// Override the computed `unit_price * quantity` total.
    pub fn total_price(mut self, total: Decimal) -> Self {
        self.total_price = Some(total);
        self
    }

    /// Tax the whole line at a single rate.
    pub fn tax(mut self, rate: Decimal) -> Self {
        self.tax_rate = Some(rate);
        self
    }

    /// Add an explicit per-rate portion (for mixed-rate lines such as bundles).
    pub fn add_tax(mut self, tax: CalculatedTax) -> Self {
        self.calculated_taxes.push(tax);
        self
    }

    pub fn build(self) -> OrderLine {
        let total_price = self
            .total_price
            .unwrap_or_else(|| self.unit_price.saturating_mul(Decimal::from(self.quantity)));

        let calculated_taxes = match (self.tax_rate, self.calculated_taxes.is_empty()) {
            (Some(rate), true) => vec![CalculatedTax::new(rate, total_price)],
            (_, _) => self.calculated_taxes,
        };

        OrderLine {
            id: self.id,
            label: self.label,
            kind: self.kind,
            product_id: self.product_id,
            unit_price: self.unit_price,
            quantity: self.quantity,
            total_price,
            calculated_taxes,
        }
    }
}

/// Sales channel the order was placed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesChannelRef {
    pub id: String,
    pub name: String,
}

/// Ordering customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRef {
    pub number: String,
    pub name: String,
    /// Name of the customer group, if any.
    pub group: Option<String>,
}

/// An order, reduced to what cost allocation needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub number: String,
    pub tax_status: TaxStatus,
    pub sales_channel: SalesChannelRef,
    pub customer: Option<CustomerRef>,
    pub lines: Vec<OrderLine>,
}

impl Order {
    /// Sum of all line totals, saturating at [`Decimal::MAX`] / [`Decimal::MIN`].
    pub fn amount_total(&self) -> Decimal {
        self.lines
            .iter()
            .fold(Decimal::ZERO, |sum, l| sum.saturating_add(l.total_price))
    }
}

/// Builder for [`Order`].
pub struct OrderBuilder {
    number: String,
    tax_status: TaxStatus,
    sales_channel: SalesChannelRef,
    customer: Option<CustomerRef>,
    lines: Vec<OrderLine>,
}

impl OrderBuilder {
    pub fn new(
        number: impl Into<String>,
        sales_channel_id: impl Into<String>,
        sales_channel_name: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            tax_status: TaxStatus::Gross,
            sales_channel: SalesChannelRef {
                id: sales_channel_id.into(),
                name: sales_channel_name.into(),
            },
            customer: None,
            lines: Vec::new(),
        }
    }

    pub fn tax_status(mut self, status: TaxStatus) -> Self {
        self.tax_status = status;
        self
    }

    pub fn customer(mut self, number: impl Into<String>, name: impl Into<String>) -> Self {
        self.customer = Some(CustomerRef {
            number: number.into(),
            name: name.into(),
            group: None,
        });
        self
    }

    /// Set the customer group name. Has no effect without a customer.
    pub fn customer_group(mut self, group: impl Into<String>) -> Self {
        if let Some(customer) = self.customer.as_mut() {
            customer.group = Some(group.into());
        }
        self
    }

    pub fn add_line(mut self, line: OrderLine) -> Self {
        self.lines.push(line);
        self
    }

    pub fn build(self) -> Order {
        Order {
            number: self.number,
            tax_status: self.tax_status,
            sales_channel: self.sales_channel,
            customer: self.customer,
            lines: self.lines,
        }
    }
}
