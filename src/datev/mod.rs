//! DATEV company codes, cost centers and price-item aggregation.
//!
//! Resolves the company code (Buchungskreis) of an accounting document and
//! the cost centers (Kostenstellen) of its revenue postings from
//! per-customer, per-customer-group, per-sales-channel and per-product
//! configuration. Invalid values never abort generation; they are replaced
//! by the next valid value (or none) and reported as diagnostics.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use kontierung::core::*;
//! use kontierung::datev::*;
//! use rust_decimal_macros::dec;
//! use std::collections::HashMap;
//!
//! let order = OrderBuilder::new("10001", "sc-1", "Storefront")
//!     .customer("K-1", "Kunde AG")
//!     .add_line(OrderLineBuilder::new("1", "Regal", 1, dec!(50)).product("p-b").tax(dec!(19)).build())
//!     .build();
//!
//! let products = HashMap::from([
//!     ("p-b".to_string(), ProductCostCenter::new("SW-B", Some("WAREHOUSE1"))),
//! ]);
//! let settings = DatevSettingsBuilder::new().company_codes(7).cost_centers(None).build();
//! let flags = StaticFeatureFlags::all();
//!
//! let doc = AccountingDocumentGenerator::new(&flags, &products).generate(
//!     &order,
//!     &DocumentReference::new("invoice", "1000", NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()),
//!     &settings,
//!     &CompanyCodeOverrides::new(Some("42"), None),
//! );
//!
//! assert_eq!(doc.company_code.map(|c| c.value()), Some(42));
//! assert_eq!(doc.postings.len(), 1);
//! assert_eq!(doc.total(), dec!(50));
//! ```

mod accounts;
mod company_code;
mod cost_center;
mod document;
#[cfg(feature = "extf")]
mod extf;
mod feature;
mod lookup;
pub mod messages;
mod price_items;
mod settings;

pub use accounts::{AccountMapping, ChartOfAccounts, bu_key, revenue_account};
pub use company_code::{
    CompanyCode, CompanyCodeOverrides, CompanyCodeResolution, CompanyCodeSource,
    InvalidCompanyCode, resolve_company_code,
};
pub use cost_center::{
    CostCenter, CostCenterPair, CostCenterResolution, CostCenterSlot, InvalidCostCenter,
    resolve_cost_centers, validate_cost_center,
};
pub use document::{
    AccountingDocument, AccountingDocumentGenerator, DocumentReference, RevenuePosting,
};
#[cfg(feature = "extf")]
pub use extf::{ExtfConfig, to_extf};
pub use feature::{
    COMPANY_CODES_FEATURE, COST_CENTERS_FEATURE, CompanyCodeGate, CostCenterGate, FeatureFlags,
    StaticFeatureFlags,
};
pub use lookup::{
    COMPANY_CODE_FIELD, COST_CENTER_FIELD, CustomFields, ProductCostCenter, ProductLookup,
};
pub use messages::MessageContext;
pub use price_items::{PriceItem, PriceItemCollection, aggregate_price_items, base_breakdown};
pub use settings::{DatevSettings, DatevSettingsBuilder, InMemorySettings, SettingsProvider};
