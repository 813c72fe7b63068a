//! Typed access to custom fields and the product cost-center lookup.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Custom field holding a company code override (customer, customer group).
pub const COMPANY_CODE_FIELD: &str = "datev_company_code";
/// Custom field holding a cost center (product).
pub const COST_CENTER_FIELD: &str = "datev_cost_center";

/// Untyped custom fields of an entity, read through typed accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomFields(Map<String, Value>);

impl CustomFields {
    /// Wrap a JSON value; anything but an object yields empty fields.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    /// Read a field as text.
    ///
    /// Strings are returned as stored (empty strings count as absent),
    /// integers are rendered in decimal. Other values are absent.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for CustomFields {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// A product's number and configured cost center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCostCenter {
    pub product_number: String,
    /// Raw, not yet validated.
    pub cost_center: Option<String>,
}

impl ProductCostCenter {
    pub fn new(product_number: impl Into<String>, cost_center: Option<&str>) -> Self {
        Self {
            product_number: product_number.into(),
            cost_center: cost_center.map(str::to_string),
        }
    }

    pub fn from_custom_fields(product_number: impl Into<String>, fields: &CustomFields) -> Self {
        Self {
            product_number: product_number.into(),
            cost_center: fields.text(COST_CENTER_FIELD),
        }
    }
}

/// Finds products by id.
///
/// `None` means the product does not exist (anymore).
pub trait ProductLookup {
    fn find(&self, product_id: &str) -> Option<ProductCostCenter>;
}

impl ProductLookup for HashMap<String, ProductCostCenter> {
    fn find(&self, product_id: &str) -> Option<ProductCostCenter> {
        self.get(product_id).cloned()
    }
}

impl ProductLookup for BTreeMap<String, ProductCostCenter> {
    fn find(&self, product_id: &str) -> Option<ProductCostCenter> {
        self.get(product_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_reads_strings_and_integers() {
        let fields = CustomFields::from_value(json!({
            "s": "07",
            "empty": "",
            "int": 42,
            "float": 4.2,
            "bool": true,
            "null": null,
        }));
        assert_eq!(fields.text("s").as_deref(), Some("07"));
        assert_eq!(fields.text("empty"), None);
        assert_eq!(fields.text("int").as_deref(), Some("42"));
        assert_eq!(fields.text("float"), None);
        assert_eq!(fields.text("bool"), None);
        assert_eq!(fields.text("null"), None);
        assert_eq!(fields.text("missing"), None);
    }

    #[test]
    fn non_object_is_empty() {
        assert_eq!(CustomFields::from_value(json!([1, 2])), CustomFields::default());
    }

    #[test]
    fn product_from_custom_fields() {
        let fields = CustomFields::from_value(json!({ "datev_cost_center": "LAGER 1" }));
        let product = ProductCostCenter::from_custom_fields("SW-1", &fields);
        assert_eq!(product.cost_center.as_deref(), Some("LAGER 1"));

        let lookup: HashMap<String, ProductCostCenter> =
            HashMap::from([("p1".to_string(), product.clone())]);
        assert_eq!(lookup.find("p1"), Some(product));
        assert_eq!(lookup.find("p2"), None);
    }
}
