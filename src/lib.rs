//! # kontierung
//!
//! DATEV cost allocation for shop orders: resolves the company code
//! (Buchungskreis) of an accounting document, the cost centers
//! (Kostenstellen) of its revenue postings, and folds order-line amounts
//! into a minimal set of price items keyed by cost center and tax rate.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! Invalid configuration never aborts document generation: it degrades to a
//! lower-precedence value (or none) and is reported as a bilingual
//! [`DiagnosticMessage`](crate::core::DiagnosticMessage).
//!
//! ## Quick Start
//!
//! ```rust
//! use kontierung::core::*;
//! use kontierung::datev::*;
//! use rust_decimal_macros::dec;
//!
//! let lines = vec![
//!     OrderLineBuilder::new("1", "Schrauben", 1, dec!(100)).product("p-a").tax(dec!(19)).build(),
//!     OrderLineBuilder::new("2", "Regal", 1, dec!(50)).product("p-b").tax(dec!(19)).build(),
//! ];
//!
//! let items = aggregate_price_items(
//!     &lines,
//!     |product_id| match product_id {
//!         "p-b" => CostCenter::parse("WAREHOUSE1").ok().flatten(),
//!         _ => None,
//!     },
//!     TaxStatus::Gross,
//! );
//!
//! assert_eq!(items.len(), 2);
//! assert_eq!(items.total_for_rate(Some(dec!(19))), dec!(0));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Order types, diagnostics, errors |
//! | `datev` (default) | Company codes, cost centers, price-item aggregation, accounting documents |
//! | `extf` | DATEV Buchungsstapel EXTF CSV export with KOST1/KOST2 |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "datev")]
pub mod datev;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
