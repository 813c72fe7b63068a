//! Message texts for rejected configuration values.
//!
//! Every message carries the rejected value and whatever names and numbers
//! the caller knows, so the user can find the offending configuration.

use crate::core::{DiagnosticMessage, LocalizedText, Severity};

use super::company_code::CompanyCodeSource;
use super::cost_center::{CostCenterSlot, InvalidCostCenter};

pub const COMPANY_CODE_CUSTOMER_INVALID: &str = "COMPANY_CODE_CUSTOMER_INVALID";
pub const COMPANY_CODE_CUSTOMER_GROUP_INVALID: &str = "COMPANY_CODE_CUSTOMER_GROUP_INVALID";
pub const COMPANY_CODE_DEFAULT_INVALID: &str = "COMPANY_CODE_DEFAULT_INVALID";
pub const COST_CENTER_SALES_CHANNEL_INVALID: &str = "COST_CENTER_SALES_CHANNEL_INVALID";
pub const COST_CENTER_PRODUCT_INVALID: &str = "COST_CENTER_PRODUCT_INVALID";
pub const PRODUCT_NOT_FOUND: &str = "PRODUCT_NOT_FOUND";

/// Names and numbers interpolated into messages.
///
/// Only `Some` fields end up in a message's metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageContext<'a> {
    pub document_type: &'a str,
    pub document_number: &'a str,
    pub order_number: &'a str,
    pub sales_channel_name: &'a str,
    pub customer_name: Option<&'a str>,
    pub customer_group_name: Option<&'a str>,
    pub product_number: Option<&'a str>,
}

impl<'a> MessageContext<'a> {
    pub fn new(
        document_type: &'a str,
        document_number: &'a str,
        order_number: &'a str,
        sales_channel_name: &'a str,
    ) -> Self {
        Self {
            document_type,
            document_number,
            order_number,
            sales_channel_name,
            customer_name: None,
            customer_group_name: None,
            product_number: None,
        }
    }

    pub fn customer(mut self, name: &'a str) -> Self {
        self.customer_name = Some(name);
        self
    }

    pub fn customer_group(mut self, name: &'a str) -> Self {
        self.customer_group_name = Some(name);
        self
    }

    /// Narrow the context to a single product.
    pub fn product<'b>(&self, number: &'b str) -> MessageContext<'b>
    where
        'a: 'b,
    {
        MessageContext {
            document_type: self.document_type,
            document_number: self.document_number,
            order_number: self.order_number,
            sales_channel_name: self.sales_channel_name,
            customer_name: self.customer_name,
            customer_group_name: self.customer_group_name,
            product_number: Some(number),
        }
    }

    fn attach(&self, mut message: DiagnosticMessage) -> DiagnosticMessage {
        message = message
            .with_meta("documentType", self.document_type)
            .with_meta("documentNumber", self.document_number)
            .with_meta("orderNumber", self.order_number)
            .with_meta("salesChannelName", self.sales_channel_name);
        if let Some(name) = self.customer_name {
            message = message.with_meta("customerName", name);
        }
        if let Some(name) = self.customer_group_name {
            message = message.with_meta("customerGroupName", name);
        }
        if let Some(number) = self.product_number {
            message = message.with_meta("productNumber", number);
        }
        message
    }

    fn document_de(&self) -> String {
        format!(
            "{} {} (Bestellung {})",
            self.document_type, self.document_number, self.order_number
        )
    }

    fn document_en(&self) -> String {
        format!(
            "{} {} (order {})",
            self.document_type, self.document_number, self.order_number
        )
    }
}

/// A customer or customer group override failed the two-digit check.
pub(crate) fn company_code_override_invalid(
    source: CompanyCodeSource,
    value: &str,
    context: &MessageContext<'_>,
) -> DiagnosticMessage {
    let (code, owner_de, owner_en, owner_name) = match source {
        CompanyCodeSource::CustomerGroup => (
            COMPANY_CODE_CUSTOMER_GROUP_INVALID,
            "an der Kundengruppe",
            "customer group",
            context.customer_group_name.unwrap_or_default(),
        ),
        _ => (
            COMPANY_CODE_CUSTOMER_INVALID,
            "am Kunden",
            "customer",
            context.customer_name.unwrap_or_default(),
        ),
    };

    let text = LocalizedText::new(
        format!(
            "Der {owner_de} \"{owner_name}\" hinterlegte Buchungskreis \"{value}\" ist ungültig. \
             Ein Buchungskreis muss aus genau zwei Ziffern bestehen. \
             Für {} wird stattdessen der nächste gültige Buchungskreis verwendet.",
            context.document_de()
        ),
        format!(
            "The company code \"{value}\" configured for {owner_en} \"{owner_name}\" is invalid. \
             A company code must consist of exactly two digits. \
             The next valid company code is used for {} instead.",
            context.document_en()
        ),
    );

    context.attach(DiagnosticMessage::new(code, Severity::Warning, text).with_meta("value", value))
}

/// The sales channel default is outside 0..=99.
pub(crate) fn default_company_code_invalid(
    value: i64,
    context: &MessageContext<'_>,
) -> DiagnosticMessage {
    let text = LocalizedText::new(
        format!(
            "Der im Verkaufskanal \"{}\" hinterlegte Standard-Buchungskreis \"{value}\" ist ungültig. \
             Ein Buchungskreis muss zwischen 0 und 99 liegen. \
             {} wird ohne Buchungskreis exportiert.",
            context.sales_channel_name,
            context.document_de()
        ),
        format!(
            "The default company code \"{value}\" configured for sales channel \"{}\" is invalid. \
             A company code must be between 0 and 99. \
             {} is exported without a company code.",
            context.sales_channel_name,
            context.document_en()
        ),
    );

    context.attach(
        DiagnosticMessage::new(COMPANY_CODE_DEFAULT_INVALID, Severity::Warning, text)
            .with_meta("value", value.to_string()),
    )
}

pub(crate) fn cost_center_invalid(
    slot: CostCenterSlot,
    value: &str,
    reason: &InvalidCostCenter,
    context: &MessageContext<'_>,
) -> DiagnosticMessage {
    let (code, owner_de, owner_en) = match slot {
        CostCenterSlot::SalesChannel => (
            COST_CENTER_SALES_CHANNEL_INVALID,
            format!("im Verkaufskanal \"{}\"", context.sales_channel_name),
            format!("sales channel \"{}\"", context.sales_channel_name),
        ),
        CostCenterSlot::Product => {
            let number = context.product_number.unwrap_or_default();
            (
                COST_CENTER_PRODUCT_INVALID,
                format!("am Produkt \"{number}\""),
                format!("product \"{number}\""),
            )
        }
    };

    let text = LocalizedText::new(
        format!(
            "Die {owner_de} hinterlegte Kostenstelle \"{value}\" ist ungültig. \
             Eine Kostenstelle darf höchstens 36 Zeichen lang sein und nur Buchstaben, Ziffern, \
             Unterstriche und Leerzeichen enthalten. {} wird ohne diese Kostenstelle exportiert.",
            context.document_de()
        ),
        format!(
            "The cost center \"{value}\" configured for {owner_en} is invalid. \
             A cost center may be at most 36 characters long and may only contain letters, digits, \
             underscores and spaces. {} is exported without this cost center.",
            context.document_en()
        ),
    );

    context.attach(
        DiagnosticMessage::new(code, Severity::Warning, text)
            .with_meta("value", value)
            .with_meta("reason", reason.to_string()),
    )
}

/// A line references a product the lookup no longer knows.
pub(crate) fn product_not_found(product_id: &str, context: &MessageContext<'_>) -> DiagnosticMessage {
    let text = LocalizedText::new(
        format!(
            "Ein Produkt aus {} existiert nicht mehr. Die Position wird keiner Kostenstelle zugeordnet.",
            context.document_de()
        ),
        format!(
            "A product of {} no longer exists. The line is not assigned to a cost center.",
            context.document_en()
        ),
    );

    context.attach(
        DiagnosticMessage::new(PRODUCT_NOT_FOUND, Severity::Info, text)
            .with_meta("productId", product_id),
    )
}
