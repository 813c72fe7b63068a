//! Per-sales-channel DATEV settings.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::accounts::ChartOfAccounts;
use crate::core::KontierungError;

/// DATEV settings of one sales channel.
///
/// Missing fields deserialize to their defaults, so a partial JSON object
/// is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DatevSettings {
    /// Stamp a company code onto revenue postings.
    pub company_codes_active: bool,
    /// Fallback company code, valid range 0..=99 (checked on use).
    pub default_company_code: i64,
    /// Assign cost centers to revenue postings.
    pub cost_centers_active: bool,
    /// Cost center of the sales channel itself (raw, checked on use).
    pub sales_channel_cost_center: Option<String>,
    /// Put the product cost center into KOST1 and the sales channel's into KOST2.
    pub switch_cost_centers_order: bool,
    pub chart: ChartOfAccounts,
}

impl Default for DatevSettings {
    fn default() -> Self {
        Self {
            company_codes_active: false,
            default_company_code: 0,
            cost_centers_active: false,
            sales_channel_cost_center: None,
            switch_cost_centers_order: false,
            chart: ChartOfAccounts::SKR03,
        }
    }
}

impl DatevSettings {
    /// Parse settings from a JSON object.
    pub fn from_json(json: &str) -> Result<Self, KontierungError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Builder for [`DatevSettings`].
///
/// # Example
///
/// ```
/// use kontierung::datev::DatevSettingsBuilder;
///
/// let settings = DatevSettingsBuilder::new()
///     .company_codes(12)
///     .cost_centers(Some("SHOP"))
///     .switch_cost_centers_order(true)
///     .build();
///
/// assert!(settings.company_codes_active);
/// assert_eq!(settings.default_company_code, 12);
/// ```
#[derive(Debug, Default)]
pub struct DatevSettingsBuilder {
    settings: DatevSettings,
}

impl DatevSettingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable company codes with the given sales channel default.
    pub fn company_codes(mut self, default_company_code: i64) -> Self {
        self.settings.company_codes_active = true;
        self.settings.default_company_code = default_company_code;
        self
    }

    /// Enable cost centers, optionally with a sales channel cost center.
    pub fn cost_centers(mut self, sales_channel_cost_center: Option<&str>) -> Self {
        self.settings.cost_centers_active = true;
        self.settings.sales_channel_cost_center = sales_channel_cost_center.map(str::to_string);
        self
    }

    pub fn switch_cost_centers_order(mut self, switch: bool) -> Self {
        self.settings.switch_cost_centers_order = switch;
        self
    }

    pub fn chart(mut self, chart: ChartOfAccounts) -> Self {
        self.settings.chart = chart;
        self
    }

    pub fn build(self) -> DatevSettings {
        self.settings
    }
}

/// Source of per-sales-channel settings.
pub trait SettingsProvider {
    fn settings_for(&self, sales_channel_id: &str) -> Option<DatevSettings>;

    /// Settings of a sales channel, or defaults (everything off) if unknown.
    fn settings_or_default(&self, sales_channel_id: &str) -> DatevSettings {
        self.settings_for(sales_channel_id).unwrap_or_default()
    }
}

/// Settings held in memory, keyed by sales channel id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InMemorySettings {
    by_sales_channel: HashMap<String, DatevSettings>,
}

impl InMemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sales_channel_id: impl Into<String>, settings: DatevSettings) {
        self.by_sales_channel.insert(sales_channel_id.into(), settings);
    }

    /// Parse a JSON object mapping sales channel ids to settings.
    pub fn from_json(json: &str) -> Result<Self, KontierungError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl SettingsProvider for InMemorySettings {
    fn settings_for(&self, sales_channel_id: &str) -> Option<DatevSettings> {
        self.by_sales_channel.get(sales_channel_id).cloned()
    }
}
