//! Cost center (Kostenstelle) validation and slot ordering.

use std::fmt;

use serde::Serialize;

use super::messages::{self, MessageContext};
use crate::core::MessageLog;

/// A validated cost center: 1 to 36 ASCII letters, digits, underscores or spaces.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CostCenter(String);

impl CostCenter {
    pub const MAX_LENGTH: usize = 36;

    /// Parse a configured cost center.
    ///
    /// The empty string means "not configured" and yields `Ok(None)`.
    pub fn parse(value: &str) -> Result<Option<Self>, InvalidCostCenter> {
        if value.is_empty() {
            return Ok(None);
        }

        let length = value.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(InvalidCostCenter::TooLong { length });
        }

        if let Some(character) = value.chars().find(|c| !is_cost_center_char(*c)) {
            return Err(InvalidCostCenter::InvalidCharacter { character });
        }

        Ok(Some(Self(value.to_string())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_cost_center_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == ' '
}

impl fmt::Display for CostCenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CostCenter {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Why a cost center was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidCostCenter {
    TooLong { length: usize },
    InvalidCharacter { character: char },
}

impl fmt::Display for InvalidCostCenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLong { length } => write!(
                f,
                "cost center has {length} characters, at most {} are allowed",
                CostCenter::MAX_LENGTH
            ),
            Self::InvalidCharacter { character } => {
                write!(f, "cost center contains invalid character '{character}'")
            }
        }
    }
}

impl std::error::Error for InvalidCostCenter {}

/// Which configuration a cost center came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CostCenterSlot {
    SalesChannel,
    Product,
}

/// Validate one configured cost center.
///
/// Absence is always valid. An invalid value is dropped and reported with
/// one warning naming the slot.
pub fn validate_cost_center(
    value: Option<&str>,
    slot: CostCenterSlot,
    context: &MessageContext<'_>,
    log: &mut MessageLog,
) -> Option<CostCenter> {
    let value = value?;
    match CostCenter::parse(value) {
        Ok(cost_center) => cost_center,
        Err(reason) => {
            log.push(messages::cost_center_invalid(slot, value, &reason, context));
            None
        }
    }
}

/// Cost centers for DATEV fields KOST1 and KOST2.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CostCenterPair {
    pub first: Option<CostCenter>,
    pub second: Option<CostCenter>,
}

impl CostCenterPair {
    /// Sales channel first and product second, or the other way round when
    /// `switch_order` is set.
    pub fn ordered(
        sales_channel: Option<CostCenter>,
        product: Option<CostCenter>,
        switch_order: bool,
    ) -> Self {
        if switch_order {
            Self {
                first: product,
                second: sales_channel,
            }
        } else {
            Self {
                first: sales_channel,
                second: product,
            }
        }
    }
}

/// Outcome of [`resolve_cost_centers`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CostCenterResolution {
    pub pair: CostCenterPair,
    pub messages: MessageLog,
}

/// Validate the sales channel and product cost centers independently and
/// put them into slot order.
///
/// ```
/// use kontierung::datev::*;
///
/// let context = MessageContext::new("invoice", "1000", "10001", "Storefront");
/// let r = resolve_cost_centers(Some("SHOP"), Some("A-B"), false, &context);
///
/// assert_eq!(r.pair.first.as_ref().map(CostCenter::as_str), Some("SHOP"));
/// assert_eq!(r.pair.second, None);
/// assert_eq!(r.messages.len(), 1);
/// ```
pub fn resolve_cost_centers(
    sales_channel: Option<&str>,
    product: Option<&str>,
    switch_order: bool,
    context: &MessageContext<'_>,
) -> CostCenterResolution {
    let mut log = MessageLog::new();
    let sales_channel =
        validate_cost_center(sales_channel, CostCenterSlot::SalesChannel, context, &mut log);
    let product = validate_cost_center(product, CostCenterSlot::Product, context, &mut log);

    CostCenterResolution {
        pair: CostCenterPair::ordered(sales_channel, product, switch_order),
        messages: log,
    }
}
