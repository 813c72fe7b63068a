//! Feature gates for company codes and cost centers.

use std::collections::BTreeSet;

use tracing::trace;

use super::company_code::{CompanyCodeOverrides, CompanyCodeResolution, resolve_company_code};
use super::cost_center::{CostCenterResolution, resolve_cost_centers};
use super::messages::MessageContext;
use super::settings::DatevSettings;

pub const COMPANY_CODES_FEATURE: &str = "DATEV_COMPANY_CODES";
pub const COST_CENTERS_FEATURE: &str = "DATEV_COST_CENTERS";

/// Answers whether a named feature is active.
pub trait FeatureFlags {
    fn is_active(&self, flag: &str) -> bool;
}

impl<F> FeatureFlags for F
where
    F: Fn(&str) -> bool,
{
    fn is_active(&self, flag: &str) -> bool {
        self(flag)
    }
}

/// A fixed set of active flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticFeatureFlags {
    active: BTreeSet<String>,
}

impl StaticFeatureFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, flag: impl Into<String>) -> Self {
        self.active.insert(flag.into());
        self
    }

    /// Both DATEV features.
    pub fn all() -> Self {
        Self::new()
            .with(COMPANY_CODES_FEATURE)
            .with(COST_CENTERS_FEATURE)
    }
}

impl FeatureFlags for StaticFeatureFlags {
    fn is_active(&self, flag: &str) -> bool {
        self.active.contains(flag)
    }
}

impl<S: Into<String>> FromIterator<S> for StaticFeatureFlags {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            active: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Company code resolution, open only if the feature is active and the
/// sales channel enables company codes.
pub struct CompanyCodeGate<'a, F: ?Sized> {
    flags: &'a F,
}

impl<'a, F: FeatureFlags + ?Sized> CompanyCodeGate<'a, F> {
    pub fn new(flags: &'a F) -> Self {
        Self { flags }
    }

    pub fn is_open(&self, settings: &DatevSettings) -> bool {
        settings.company_codes_active && self.flags.is_active(COMPANY_CODES_FEATURE)
    }

    /// Resolve, or return an empty resolution when the gate is closed.
    pub fn resolve(
        &self,
        settings: &DatevSettings,
        overrides: &CompanyCodeOverrides,
        context: &MessageContext<'_>,
    ) -> CompanyCodeResolution {
        if !self.is_open(settings) {
            trace!(order = context.order_number, "company codes disabled");
            return CompanyCodeResolution::default();
        }
        resolve_company_code(settings.default_company_code, overrides, context)
    }
}

/// Cost center resolution, open only if the feature is active and the
/// sales channel enables cost centers.
pub struct CostCenterGate<'a, F: ?Sized> {
    flags: &'a F,
}

impl<'a, F: FeatureFlags + ?Sized> CostCenterGate<'a, F> {
    pub fn new(flags: &'a F) -> Self {
        Self { flags }
    }

    pub fn is_open(&self, settings: &DatevSettings) -> bool {
        settings.cost_centers_active && self.flags.is_active(COST_CENTERS_FEATURE)
    }

    /// Resolve the cost center slots for one product cost center, or return
    /// empty slots when the gate is closed.
    pub fn resolve(
        &self,
        settings: &DatevSettings,
        product_cost_center: Option<&str>,
        context: &MessageContext<'_>,
    ) -> CostCenterResolution {
        if !self.is_open(settings) {
            trace!(order = context.order_number, "cost centers disabled");
            return CostCenterResolution::default();
        }
        resolve_cost_centers(
            settings.sales_channel_cost_center.as_deref(),
            product_cost_center,
            settings.switch_cost_centers_order,
            context,
        )
    }
}
